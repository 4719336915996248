//! In-process client over the embedded backend

use super::{ClientError, KvClient};
use crate::dispatch::Dispatcher;
use crate::protocol::RespValue;
use bytes::Bytes;
use std::sync::{Arc, Mutex};
use tracing::debug;

/// Client running commands directly against a [`Dispatcher`]
///
/// Clones share the same backend. The dispatcher can also be handed to
/// [`crate::server::run_with_dispatcher`] so TCP clients see the same keyspace.
#[derive(Clone)]
pub struct LocalClient {
    dispatcher: Arc<Mutex<Dispatcher>>,
}

impl LocalClient {
    /// Client over a fresh, empty backend
    pub fn new() -> Self {
        Self::with_dispatcher(Arc::new(Mutex::new(Dispatcher::new())))
    }

    pub fn with_dispatcher(dispatcher: Arc<Mutex<Dispatcher>>) -> Self {
        LocalClient { dispatcher }
    }

    pub fn dispatcher(&self) -> Arc<Mutex<Dispatcher>> {
        self.dispatcher.clone()
    }
}

impl Default for LocalClient {
    fn default() -> Self {
        Self::new()
    }
}

impl KvClient for LocalClient {
    fn execute(&self, command: Vec<Bytes>) -> Result<RespValue, ClientError> {
        let mut dispatcher = self.dispatcher.lock().map_err(|_| ClientError::LockPoisoned)?;
        Ok(dispatcher.dispatch(RespValue::command(command)))
    }

    /// Holds the backend lock for the whole batch
    fn execute_atomic(&self, commands: Vec<Vec<Bytes>>) -> Result<Vec<RespValue>, ClientError> {
        debug!("Local atomic batch of {} commands", commands.len());
        let mut dispatcher = self.dispatcher.lock().map_err(|_| ClientError::LockPoisoned)?;
        Ok(commands
            .into_iter()
            .map(|command| dispatcher.dispatch(RespValue::command(command)))
            .collect())
    }

    fn endpoint(&self) -> String {
        format!("local://{:p}", Arc::as_ptr(&self.dispatcher))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::Commands;

    #[test]
    fn test_clones_share_endpoint() {
        let client = LocalClient::new();
        let other = client.clone();
        assert_eq!(client.endpoint(), other.endpoint());
        assert_ne!(client.endpoint(), LocalClient::new().endpoint());

        client.sadd("s", ["a"]).unwrap();
        assert!(other.sismember("s", "a").unwrap());
    }

    #[test]
    fn test_atomic_batch_replies_in_order() {
        let client = LocalClient::new();
        let replies = client
            .execute_atomic(vec![
                vec![Bytes::from("RPUSH"), Bytes::from("l"), Bytes::from("a")],
                vec![Bytes::from("LLEN"), Bytes::from("l")],
                vec![Bytes::from("NOPE")],
            ])
            .unwrap();

        assert_eq!(replies[0], RespValue::integer(1));
        assert_eq!(replies[1], RespValue::integer(1));
        assert!(replies[2].is_error());
    }
}
