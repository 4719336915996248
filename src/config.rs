//! Configuration for the server binary and the TCP client

use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Environment variable overriding the listen address
pub const ADDR_ENV: &str = "FERRUM_ADDR";

const DEFAULT_ADDR: &str = "127.0.0.1:6379";

/// Server settings
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Listen address
    pub addr: String,

    /// Initial keyspace capacity
    pub capacity: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            addr: DEFAULT_ADDR.to_string(),
            capacity: 1024,
        }
    }
}

impl ServerConfig {
    /// Load settings from an optional JSON file, then apply `FERRUM_ADDR`
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_json(&std::fs::read_to_string(path)?)?,
            None => Self::default(),
        };

        if let Ok(addr) = std::env::var(ADDR_ENV) {
            config.addr = addr;
        }

        Ok(config)
    }

    /// Parse settings from JSON, missing fields take their default
    pub fn from_json(raw: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }
}

/// TCP client settings
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Server address
    pub addr: String,

    /// Read timeout in milliseconds
    pub read_timeout_ms: u64,

    /// Write (and connect) timeout in milliseconds
    pub write_timeout_ms: u64,
}

impl ClientConfig {
    /// Settings for `addr` with default timeouts
    pub fn new(addr: impl Into<String>) -> Self {
        ClientConfig {
            addr: addr.into(),
            ..Self::default()
        }
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }

    pub fn write_timeout(&self) -> Duration {
        Duration::from_millis(self.write_timeout_ms)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            addr: DEFAULT_ADDR.to_string(),
            read_timeout_ms: 5000,
            write_timeout_ms: 5000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = ServerConfig::from_json(r#"{"addr": "0.0.0.0:7000"}"#).unwrap();
        assert_eq!(config.addr, "0.0.0.0:7000");
        assert_eq!(config.capacity, 1024);

        let client: ClientConfig = serde_json::from_str(r#"{"read_timeout_ms": 250}"#).unwrap();
        assert_eq!(client.read_timeout(), Duration::from_millis(250));
        assert_eq!(client.write_timeout(), Duration::from_secs(5));
        assert_eq!(client.addr, DEFAULT_ADDR);
    }

    #[test]
    fn test_invalid_json() {
        assert!(ServerConfig::from_json("{not json").is_err());
    }
}
