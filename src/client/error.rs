//! Client errors

use crate::protocol::RespError;
use thiserror::Error;

/// Errors raised while talking to the store
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("protocol error: {0}")]
    Protocol(#[from] RespError),

    /// The store answered with an error reply
    #[error("server error: {0}")]
    Server(String),

    /// The reply does not have the shape the command promises
    #[error("unexpected reply: {0}")]
    UnexpectedReply(String),

    #[error("connection closed by peer")]
    Closed,

    #[error("backend lock poisoned")]
    LockPoisoned,
}

impl ClientError {
    pub(crate) fn timed_out(what: &str) -> Self {
        ClientError::Io(std::io::Error::new(
            std::io::ErrorKind::TimedOut,
            format!("{} timed out", what),
        ))
    }
}
