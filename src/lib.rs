//! ferrum-containers - typed Set, List, SortedSet and Hash containers over a
//! Redis-compatible key-value store
//!
//! The crate is layered with strong cohesion and loose coupling:
//! - `containers` only talks to the store through the `client` capability
//! - `client` speaks to an embedded backend or to any RESP2 server over TCP
//! - the embedded backend (`store`, `commands`, `dispatch`) and its `server`
//!   know nothing about containers

pub mod client;
pub mod commands;
pub mod config;
pub mod containers;
pub mod dispatch;
pub mod error;
pub mod protocol;
pub mod server;
pub mod store;

/// Re-export commonly used types
pub use client::{Client, ClientError, Commands, KvClient, LocalClient, TcpClient};
pub use config::{ClientConfig, ServerConfig};
pub use containers::{Container, Hash, List, Set, SortedSet};
pub use error::{ContainerError, Result};
pub use protocol::{RespError, RespValue};
