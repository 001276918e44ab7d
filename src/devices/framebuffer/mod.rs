//! # Framebuffer Graphics Module
//!
//! Color values and the off-screen canvas the compositor draws into.
//!
//! ## Modules
//!
//! - `canvas`: `Canvas`, a packed backing buffer with checked and unchecked
//!   pixel writes and an `embedded_graphics` draw target
//! - `color`: `Color` type with common color constants
//!
//! ## Pixel layout
//!
//! Pixels are packed with no row padding: the byte offset of `(x, y)` is
//! `x * bpp + y * width * bpp`. The hardware pitch only matters when the
//! driver copies the canvas out (see `devices::display`).

pub mod canvas;
pub mod color;

pub use canvas::{Canvas, ChannelOrder};
pub use color::Color;
