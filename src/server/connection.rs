//! Connection handling
//!
//! Manages individual client connections, parsing RESP commands
//! and sending responses.

use crate::dispatch::Dispatcher;
use crate::protocol::{RespEncoder, RespParser, RespValue};
use anyhow::{anyhow, bail};
use bytes::BytesMut;
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::{debug, warn};

/// Connection handler
pub struct Connection {
    /// TCP stream
    stream: TcpStream,

    /// Read buffer
    read_buffer: BytesMut,

    /// Write buffer
    write_buffer: BytesMut,

    /// Commands queued since MULTI, if a transaction is open
    transaction: Option<Vec<RespValue>>,
}

impl Connection {
    /// Create a new connection handler
    pub fn new(stream: TcpStream) -> Self {
        Connection {
            stream,
            read_buffer: BytesMut::with_capacity(4096),
            write_buffer: BytesMut::with_capacity(4096),
            transaction: None,
        }
    }

    /// Handle the connection
    ///
    /// Reads commands from the client, dispatches them, and sends responses.
    pub async fn handle(&mut self, dispatcher: Arc<Mutex<Dispatcher>>) -> anyhow::Result<()> {
        loop {
            // Read data from the socket
            let n = self.stream.read_buf(&mut self.read_buffer).await?;

            // Connection closed
            if n == 0 {
                if self.read_buffer.is_empty() {
                    return Ok(());
                }
                bail!("connection reset by peer");
            }

            debug!("Read {} bytes", n);

            // Try to parse commands from the buffer
            loop {
                match RespParser::parse(&mut self.read_buffer) {
                    Ok(Some(value)) => {
                        debug!("Parsed command: {}", value);

                        let response = self.process(value, &dispatcher)?;

                        debug!("Response: {}", response);

                        // Encode and send the response
                        self.send_response(response).await?;
                    }
                    Ok(None) => {
                        // Need more data
                        debug!("Need more data to complete command");
                        break;
                    }
                    Err(e) => {
                        // Protocol error, the rest of the buffer cannot be trusted
                        warn!("Protocol error: {}", e);
                        self.read_buffer.clear();
                        let error_response = RespValue::error(format!("ERR protocol error: {}", e));
                        self.send_response(error_response).await?;
                        break;
                    }
                }
            }
        }
    }

    /// Apply transaction control or run a command
    ///
    /// The dispatcher lock is only held inside this call, never across an await.
    fn process(
        &mut self,
        value: RespValue,
        dispatcher: &Mutex<Dispatcher>,
    ) -> anyhow::Result<RespValue> {
        let lock = || dispatcher.lock().map_err(|_| anyhow!("dispatcher lock poisoned"));

        let name = value.command_name();
        let in_transaction = self.transaction.is_some();

        let response = match (name.as_deref(), in_transaction) {
            (Some("MULTI"), true) => RespValue::error("ERR MULTI calls can not be nested"),
            (Some("MULTI"), false) => {
                self.transaction = Some(Vec::new());
                RespValue::ok()
            }
            (Some("EXEC"), true) => {
                let queued = self.transaction.take().unwrap_or_default();
                lock()?.dispatch_batch(queued)
            }
            (Some("EXEC"), false) => RespValue::error("ERR EXEC without MULTI"),
            (Some("DISCARD"), true) => {
                self.transaction = None;
                RespValue::ok()
            }
            (Some("DISCARD"), false) => RespValue::error("ERR DISCARD without MULTI"),
            (_, true) => {
                self.transaction.get_or_insert_with(Vec::new).push(value);
                RespValue::simple_string("QUEUED")
            }
            (_, false) => lock()?.dispatch(value),
        };

        Ok(response)
    }

    /// Send a response to the client
    async fn send_response(&mut self, response: RespValue) -> anyhow::Result<()> {
        // Encode the response
        self.write_buffer.clear();
        RespEncoder::encode_to(&mut self.write_buffer, &response);

        // Write to the socket
        self.stream.write_all(&self.write_buffer).await?;
        self.stream.flush().await?;

        Ok(())
    }
}
