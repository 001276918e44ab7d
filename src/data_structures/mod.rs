//! # Data Structures Module
//!
//! Collections shared by the scene graph and the drivers.
//!
//! ## Modules
//!
//! - `bounded`: `BoundedList`, an insertion-ordered list with a hard capacity
//!   ceiling fixed at creation
//!
//! ## Overview
//!
//! Kernel code must not grow collections behind the caller's back. Storage
//! for a `BoundedList` is reserved once, fallibly, and every later insert
//! either fits or is refused.

pub mod bounded;

pub use bounded::BoundedList;
