//! Device Subsystem
//!
//! Hardware device drivers and abstractions:
//! - `display`: mode negotiation, bank switching and the refresh loop
//! - `drivers`: PS/2 keyboard driver
//! - `framebuffer`: colors and the off-screen canvas
//! - `input`: polled key source consumed by the refresh loop

pub mod display;
pub mod drivers;
pub mod framebuffer;
pub mod input;
