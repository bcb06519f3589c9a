//! Counter storage for rategate.
//!
//! This module provides persistent storage for the review counters,
//! supporting file-based and in-memory backends.

pub mod file;
pub mod memory;
pub mod traits;

pub use file::FileCounterStore;
pub use memory::MemoryCounterStore;
pub use traits::CounterStore;
