//! # Kernel Initialization Module
//!
//! - `init`: ordered init phases with status tracking
//! - `status`: per-component status table, reported once boot finishes
//!
//! ## Example
//!
//! ```ignore
//! let screen = init_phase(init::DISPLAY, || open_screen())?;
//! status::report();
//! ```

pub mod init;
pub mod status;

pub use init::{init_kernel, init_phase};
