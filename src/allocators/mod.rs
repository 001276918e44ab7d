//! Kernel heap allocators.

pub mod block;

pub use block::{BlockHeap, LockedHeap, PAGE_SIZE};
