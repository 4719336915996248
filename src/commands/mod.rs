//! Command execution module
//!
//! Provides a unified interface for all commands through the Command trait.
//! Each command family is implemented in a separate file for high cohesion.

/// Unwrap a `Result<T, RespValue>` or return the error reply from the command
macro_rules! try_reply {
    ($expr:expr) => {
        match $expr {
            Ok(value) => value,
            Err(reply) => return reply,
        }
    };
}

pub(crate) use try_reply;

mod context;
mod registry;

// Command implementations
mod admin;
mod hash;
mod key;
mod list;
mod set;
mod ttl;
mod zset;

pub use context::CommandContext;
pub use registry::CommandRegistry;

use crate::protocol::RespValue;
use crate::store::Value;
use bytes::Bytes;

/// Command execution trait
///
/// All commands implement this trait with a single execute method.
/// This provides loose coupling between command implementations and the dispatcher.
pub trait Command: Send + Sync {
    /// Execute the command with the given context and arguments
    ///
    /// Arguments:
    /// - ctx: mutable reference to the command context (contains the store)
    /// - args: command arguments (excluding the command name itself)
    ///
    /// Returns:
    /// - RespValue representing the response to send to the client
    fn execute(&self, ctx: &mut CommandContext, args: &[RespValue]) -> RespValue;

    /// Get the command name (for debugging/logging)
    fn name(&self) -> &'static str;

    /// Get the minimum number of arguments required
    fn min_args(&self) -> usize {
        0
    }

    /// Get the maximum number of arguments (None = unlimited)
    fn max_args(&self) -> Option<usize> {
        None
    }
}

pub(crate) const WRONGTYPE: &str =
    "WRONGTYPE Operation against a key holding the wrong kind of value";

/// Error reply for a bad argument count
pub(crate) fn wrong_args(name: &str) -> RespValue {
    RespValue::error(format!("ERR wrong number of arguments for '{}' command", name))
}

/// Helper function to extract bulk string from RespValue
pub(crate) fn extract_bulk_string(value: &RespValue) -> Result<&Bytes, RespValue> {
    value
        .as_bulk_string()
        .ok_or_else(|| RespValue::error("ERR Expected bulk string"))
}

/// Extract every argument as a bulk string
pub(crate) fn extract_bulk_strings(values: &[RespValue]) -> Result<Vec<Bytes>, RespValue> {
    values.iter().map(|v| extract_bulk_string(v).cloned()).collect()
}

/// Helper function to extract integer from RespValue or parse from bulk string
pub(crate) fn extract_integer(value: &RespValue) -> Result<i64, RespValue> {
    match value {
        RespValue::Integer(i) => Ok(*i),
        RespValue::BulkString(bytes) => std::str::from_utf8(bytes)
            .ok()
            .and_then(|s| s.parse::<i64>().ok())
            .ok_or_else(|| RespValue::error("ERR value is not an integer or out of range")),
        _ => Err(RespValue::error("ERR value is not an integer or out of range")),
    }
}

/// Extract a float (score) argument
pub(crate) fn extract_float(value: &RespValue) -> Result<f64, RespValue> {
    extract_bulk_string(value)
        .ok()
        .and_then(|raw| crate::protocol::parse_score(raw))
        .ok_or_else(|| RespValue::error("ERR value is not a valid float"))
}

/// Read-only view of the value at `key`, checked against the expected type
///
/// Returns Ok(None) when the key does not exist.
pub(crate) fn read_value<'a, T>(
    ctx: &'a mut CommandContext,
    key: &Bytes,
    project: fn(&Value) -> Option<&T>,
) -> Result<Option<&'a T>, RespValue> {
    match ctx.store.get(key) {
        Some(value) => project(value).map(Some).ok_or_else(|| RespValue::error(WRONGTYPE)),
        None => Ok(None),
    }
}

/// Mutable view of an existing value at `key`, checked against the expected type
pub(crate) fn modify_value<'a, T>(
    ctx: &'a mut CommandContext,
    key: &Bytes,
    project: fn(&mut Value) -> Option<&mut T>,
) -> Result<Option<&'a mut T>, RespValue> {
    match ctx.store.get_mut(key) {
        Some(value) => project(value).map(Some).ok_or_else(|| RespValue::error(WRONGTYPE)),
        None => Ok(None),
    }
}

/// Mutable view of the value at `key`, creating an empty one if absent
pub(crate) fn write_value<'a, T>(
    ctx: &'a mut CommandContext,
    key: &Bytes,
    empty: fn() -> Value,
    project: fn(&mut Value) -> Option<&mut T>,
) -> Result<&'a mut T, RespValue> {
    let value = ctx.store.get_or_insert_with(key, empty);
    project(value).ok_or_else(|| RespValue::error(WRONGTYPE))
}

/// Turn a list of members into an array reply
pub(crate) fn bulk_array<'a>(items: impl IntoIterator<Item = &'a Bytes>) -> RespValue {
    RespValue::array(items.into_iter().map(|b| RespValue::bulk_string(b.clone())).collect())
}
