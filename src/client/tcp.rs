//! Blocking RESP2 client over TCP

use super::{ClientError, KvClient};
use crate::config::ClientConfig;
use crate::protocol::{RespEncoder, RespParser, RespValue};
use bytes::{Bytes, BytesMut};
use std::sync::Mutex;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::runtime::Runtime;
use tokio::time::timeout;
use tracing::debug;

/// Client speaking RESP2 to a Redis-compatible server
///
/// The connection is driven on a private current-thread runtime, so the
/// client must not be used from inside another tokio runtime.
///
/// A transport error or timeout drops the connection, since a late reply
/// could still arrive on it. The next call opens a fresh one.
pub struct TcpClient {
    addr: String,
    runtime: Runtime,
    connection: Mutex<Option<Connection>>,
    read_timeout: Duration,
    write_timeout: Duration,
}

struct Connection {
    stream: TcpStream,
    buffer: BytesMut,
}

impl Connection {
    async fn open(addr: &str, connect_timeout: Duration) -> Result<Self, ClientError> {
        let stream = timeout(connect_timeout, TcpStream::connect(addr))
            .await
            .map_err(|_| ClientError::timed_out("connect"))??;
        stream.set_nodelay(true)?;
        debug!("Connected to {}", addr);

        Ok(Connection {
            stream,
            buffer: BytesMut::with_capacity(4096),
        })
    }

    async fn send(
        &mut self,
        frames: &[RespValue],
        write_timeout: Duration,
    ) -> Result<(), ClientError> {
        let mut out = BytesMut::new();
        for frame in frames {
            RespEncoder::encode_to(&mut out, frame);
        }

        timeout(write_timeout, self.stream.write_all(&out))
            .await
            .map_err(|_| ClientError::timed_out("write"))??;
        Ok(())
    }

    async fn read_reply(&mut self, read_timeout: Duration) -> Result<RespValue, ClientError> {
        loop {
            if let Some(reply) = RespParser::parse(&mut self.buffer)? {
                return Ok(reply);
            }

            let n = timeout(read_timeout, self.stream.read_buf(&mut self.buffer))
                .await
                .map_err(|_| ClientError::timed_out("read"))??;
            if n == 0 {
                return Err(ClientError::Closed);
            }
        }
    }
}

impl TcpClient {
    /// Connect to the server named in `config`
    pub fn connect(config: &ClientConfig) -> Result<Self, ClientError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;

        let write_timeout = config.write_timeout();
        let connection = runtime.block_on(Connection::open(&config.addr, write_timeout))?;

        Ok(TcpClient {
            addr: config.addr.clone(),
            runtime,
            connection: Mutex::new(Some(connection)),
            read_timeout: config.read_timeout(),
            write_timeout,
        })
    }

    /// Send `frames` and read `replies` replies back on one connection
    ///
    /// Any error leaves the stream in an unknown state, so the connection
    /// is discarded along with whatever it had buffered.
    fn round_trip(
        &self,
        frames: &[RespValue],
        replies: usize,
    ) -> Result<Vec<RespValue>, ClientError> {
        let mut slot = self.connection.lock().map_err(|_| ClientError::LockPoisoned)?;

        let result = self.runtime.block_on(async {
            if slot.is_none() {
                *slot = Some(Connection::open(&self.addr, self.write_timeout).await?);
            }
            let connection = slot.as_mut().ok_or(ClientError::Closed)?;

            connection.send(frames, self.write_timeout).await?;
            let mut out = Vec::with_capacity(replies);
            for _ in 0..replies {
                out.push(connection.read_reply(self.read_timeout).await?);
            }
            Ok::<_, ClientError>(out)
        });

        if let Err(e) = &result {
            debug!("Dropping connection to {}: {}", self.addr, e);
            *slot = None;
        }
        result
    }
}

impl KvClient for TcpClient {
    fn execute(&self, command: Vec<Bytes>) -> Result<RespValue, ClientError> {
        self.round_trip(&[RespValue::command(command)], 1)?
            .pop()
            .ok_or(ClientError::Closed)
    }

    /// Sends the batch wrapped in MULTI/EXEC in a single write
    fn execute_atomic(&self, commands: Vec<Vec<Bytes>>) -> Result<Vec<RespValue>, ClientError> {
        let count = commands.len();
        let mut frames = Vec::with_capacity(count + 2);
        frames.push(RespValue::command(vec![Bytes::from_static(b"MULTI")]));
        frames.extend(commands.into_iter().map(RespValue::command));
        frames.push(RespValue::command(vec![Bytes::from_static(b"EXEC")]));

        // MULTI, one QUEUED per command, then EXEC
        let mut replies = self.round_trip(&frames, count + 2)?;
        let exec = replies.pop().ok_or(ClientError::Closed)?;
        let queue_error = replies.into_iter().find_map(|reply| match reply {
            RespValue::Error(message) => Some(message),
            _ => None,
        });

        match exec {
            RespValue::Array(replies) => Ok(replies),
            RespValue::Error(message) => Err(ClientError::Server(message)),
            RespValue::Null => Err(ClientError::Server(
                queue_error.unwrap_or_else(|| "transaction aborted".to_string()),
            )),
            other => Err(ClientError::UnexpectedReply(format!(
                "expected EXEC array, got {}",
                other
            ))),
        }
    }

    fn endpoint(&self) -> String {
        format!("tcp://{}", self.addr)
    }
}
