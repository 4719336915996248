//! Container errors

use crate::client::ClientError;
use thiserror::Error;

/// Errors raised by container operations
#[derive(Debug, Error)]
pub enum ContainerError {
    /// A member, field or index the operation requires is missing
    #[error("{item} not found in '{key}'")]
    NotFound { key: String, item: String },

    /// Pop or shift on an empty collection
    #[error("'{key}' is empty")]
    Empty { key: String },

    /// An operand or destination cannot take part in the operation
    #[error("invalid operand: {0}")]
    InvalidOperand(String),

    #[error(transparent)]
    Client(#[from] ClientError),
}

pub type Result<T> = std::result::Result<T, ContainerError>;
