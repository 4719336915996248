//! In-memory storage module
//!
//! Provides the core data structures for storing key-value pairs in memory.
//! This module is independent of protocol and command handling (loose coupling).

mod entry;
mod memory;
mod value;
mod zset;

pub use entry::Entry;
pub use memory::MemoryStore;
pub use value::Value;
pub use zset::{Score, SortedSet};
