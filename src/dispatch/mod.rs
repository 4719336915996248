//! Command dispatcher
//!
//! Routes incoming commands to the appropriate handler.
//! This module provides loose coupling between the server and command implementations.

use crate::commands::{CommandContext, CommandRegistry};
use crate::protocol::RespValue;
use tracing::{debug, warn};

/// Command dispatcher
///
/// Receives RESP commands, validates them, and routes to appropriate handlers
pub struct Dispatcher {
    /// Command registry
    registry: CommandRegistry,

    /// Command execution context
    context: CommandContext,
}

impl Dispatcher {
    /// Create a new dispatcher
    pub fn new() -> Self {
        Dispatcher {
            registry: CommandRegistry::new(),
            context: CommandContext::new(),
        }
    }

    /// Create a dispatcher with specified store capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Dispatcher {
            registry: CommandRegistry::new(),
            context: CommandContext::with_capacity(capacity),
        }
    }

    /// Dispatch a command
    ///
    /// Takes a RESP value (expected to be an array), extracts the command name
    /// and arguments, then routes to the appropriate handler.
    pub fn dispatch(&mut self, value: RespValue) -> RespValue {
        // Commands should be arrays
        let args = match value.as_array() {
            Some(arr) if !arr.is_empty() => arr,
            Some(_) => {
                return RespValue::error("ERR empty command array");
            }
            None => {
                return RespValue::error("ERR expected array");
            }
        };

        // First element is the command name
        let cmd_name = match args[0].as_bulk_string() {
            Some(name) => match std::str::from_utf8(name) {
                Ok(s) => s,
                Err(_) => {
                    return RespValue::error("ERR invalid command name encoding");
                }
            },
            None => {
                return RespValue::error("ERR command name must be a bulk string");
            }
        };

        debug!("Dispatching command: {}", cmd_name);

        // Look up the command
        let command = match self.registry.get(cmd_name) {
            Some(cmd) => cmd,
            None => {
                warn!("Unknown command: {}", cmd_name);
                return RespValue::error(format!("ERR unknown command '{}'", cmd_name));
            }
        };

        // Extract arguments (everything after the command name)
        let cmd_args = &args[1..];

        // Validate argument count
        let too_many = command.max_args().map_or(false, |max| cmd_args.len() > max);
        if cmd_args.len() < command.min_args() || too_many {
            return RespValue::error(format!(
                "ERR wrong number of arguments for '{}' command",
                cmd_name.to_lowercase()
            ));
        }

        // Execute the command
        command.execute(&mut self.context, cmd_args)
    }

    /// Run a queued transaction
    ///
    /// Every command runs back to back against this dispatcher; errors are
    /// reported per command in the reply array and do not abort the batch.
    pub fn dispatch_batch(&mut self, commands: Vec<RespValue>) -> RespValue {
        debug!("Executing batch of {} commands", commands.len());
        RespValue::array(commands.into_iter().map(|cmd| self.dispatch(cmd)).collect())
    }

    /// Get reference to the context (for testing/inspection)
    pub fn context(&self) -> &CommandContext {
        &self.context
    }

    /// Get mutable reference to the context (for testing/inspection)
    pub fn context_mut(&mut self) -> &mut CommandContext {
        &mut self.context
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}
