//! Device Drivers
//!
//! - PS/2 Keyboard (IRQ1)

pub mod ps2_keyboard;

pub use ps2_keyboard::{KeyEvent, Ps2Keyboard, ScancodeDecoder, ScancodeQueue, SCANCODES};
