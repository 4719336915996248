//! Key-value client capability
//!
//! Containers talk to the store through [`KvClient`], which only knows how
//! to run raw commands. [`Commands`] layers one typed method per store
//! command on top of any client.

mod commands;
mod error;
mod local;
mod tcp;

pub use commands::{Cmd, Commands};
pub use error::ClientError;
pub use local::LocalClient;
pub use tcp::TcpClient;

use crate::protocol::RespValue;
use bytes::Bytes;
use std::sync::Arc;

/// Something that can run commands against a store
pub trait KvClient: Send + Sync {
    /// Run one command (name first, then arguments) and return the raw reply
    ///
    /// Error replies come back as `Ok(RespValue::Error(..))`.
    fn execute(&self, command: Vec<Bytes>) -> Result<RespValue, ClientError>;

    /// Run several commands with no other command interleaved
    ///
    /// The default runs them one by one and gives no isolation.
    fn execute_atomic(&self, commands: Vec<Vec<Bytes>>) -> Result<Vec<RespValue>, ClientError> {
        commands.into_iter().map(|command| self.execute(command)).collect()
    }

    /// Identifies the store; two clients with the same endpoint share a keyspace
    fn endpoint(&self) -> String;
}

/// Shared client handle held by containers
pub type Client = Arc<dyn KvClient>;
