//! Typed containers over a remote store
//!
//! Each container is a handle made of a key and a client. It holds no data
//! of its own: every call is one or more round trips to the store.

mod base;
mod hash;
mod list;
mod set;
mod sorted_set;

pub use base::{Container, ContainerBase};
pub use hash::Hash;
pub use list::{List, ListIter, DEFAULT_CHUNK_SIZE};
pub use set::Set;
pub use sorted_set::SortedSet;
