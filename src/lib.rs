//! # Kernel windowing & display core
//!
//! Scene graph of nested surfaces (windows, views, labels, images) and the
//! display driver that negotiates a graphics mode, owns the backing buffer
//! and refreshes the hardware framebuffer on a timer.
//!
//! The library is `no_std`; unit tests build against `std` on the host.

#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub mod allocators;
pub mod config;
pub mod data_structures;
pub mod devices;
pub mod error;
pub mod logger;
pub mod timer;
pub mod ui;

pub use error::{GfxError, Result};
