//! Command execution context

use crate::store::MemoryStore;

/// Context provided to commands during execution
///
/// Gives commands access to the keyspace and nothing else.
pub struct CommandContext {
    /// The memory store
    pub store: MemoryStore,
}

impl CommandContext {
    /// Create a new command context
    pub fn new() -> Self {
        CommandContext {
            store: MemoryStore::new(),
        }
    }

    /// Create a context with a specific store capacity
    pub fn with_capacity(capacity: usize) -> Self {
        CommandContext {
            store: MemoryStore::with_capacity(capacity),
        }
    }
}

impl Default for CommandContext {
    fn default() -> Self {
        Self::new()
    }
}
