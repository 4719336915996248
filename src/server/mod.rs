//! Server module
//!
//! Handles TCP connections and manages the event loop.
//! This module is responsible for accepting connections and delegating
//! command processing to the dispatcher.

mod connection;

use crate::config::ServerConfig;
use crate::dispatch::Dispatcher;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;
use tracing::{error, info};

pub use connection::Connection;

/// Run the server
///
/// Starts the TCP server described by `config` with a fresh backend.
pub async fn run(config: &ServerConfig) -> anyhow::Result<()> {
    let dispatcher = Arc::new(Mutex::new(Dispatcher::with_capacity(config.capacity)));
    run_with_dispatcher(&config.addr, dispatcher).await
}

/// Run the server with a provided dispatcher
///
/// Allows sharing the same backend with in-process clients.
pub async fn run_with_dispatcher(
    addr: &str,
    dispatcher: Arc<Mutex<Dispatcher>>,
) -> anyhow::Result<()> {
    // Bind the TCP listener
    let listener = TcpListener::bind(addr).await?;
    info!("RESP server listening on {}", listener.local_addr()?);

    serve(listener, dispatcher).await
}

/// Accept connections on an already bound listener
pub async fn serve(
    listener: TcpListener,
    dispatcher: Arc<Mutex<Dispatcher>>,
) -> anyhow::Result<()> {
    loop {
        // Accept incoming connections
        let (socket, addr) = listener.accept().await?;
        info!("New RESP connection from {}", addr);

        // Clone the dispatcher Arc for this connection
        let dispatcher = dispatcher.clone();

        // Spawn a new task to handle this connection
        tokio::spawn(async move {
            let mut connection = Connection::new(socket);

            if let Err(e) = connection.handle(dispatcher).await {
                error!("Connection error from {}: {}", addr, e);
            }

            info!("Connection closed: {}", addr);
        });
    }
}
