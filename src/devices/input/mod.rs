//! # Input Device Module
//!
//! Polled keyboard access for the display refresh loop.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐  IRQ1   ┌──────────────┐  tick   ┌──────────────┐
//! │   PS/2 Port  │ ──────▶ │ScancodeQueue │ ──────▶ │ Screen       │
//! │   0x60       │         │ (lock-free)  │  poll   │ ::refresh    │
//! └──────────────┘         └──────────────┘         └──────────────┘
//! ```
//!
//! The interrupt handler only enqueues raw scancodes. Decoding happens when
//! the refresh tick drains the queue through a [`KeySource`].

/// Non-blocking source of decoded keystrokes.
pub trait KeySource {
    /// Whether input is waiting to be read.
    fn has_pending_key(&mut self) -> bool;

    /// Consumes pending input and returns the decoded character. `None`
    /// if that input decoded to nothing (key releases, modifiers) or the
    /// queue ran dry; more input may still be pending after a `None`.
    fn read_key(&mut self) -> Option<char>;
}

impl<K: KeySource + ?Sized> KeySource for &mut K {
    fn has_pending_key(&mut self) -> bool {
        (**self).has_pending_key()
    }

    fn read_key(&mut self) -> Option<char> {
        (**self).read_key()
    }
}
