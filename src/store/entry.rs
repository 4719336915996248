//! Entry structure for key-value pairs

use super::value::Value;
use bytes::Bytes;
use std::time::{Duration, Instant};

/// Represents a single entry in the store
#[derive(Debug, Clone)]
pub struct Entry {
    /// The key
    pub key: Bytes,

    /// The value
    pub value: Value,

    /// Optional expiration time (absolute)
    pub expire_at: Option<Instant>,
}

impl Entry {
    /// Create a new entry without expiration
    pub fn new(key: impl Into<Bytes>, value: Value) -> Self {
        Entry {
            key: key.into(),
            value,
            expire_at: None,
        }
    }

    /// Check if the entry has expired
    pub fn is_expired(&self) -> bool {
        match self.expire_at {
            Some(expire_at) => Instant::now() >= expire_at,
            None => false,
        }
    }

    /// Expire the entry `ttl` from now
    pub fn expire_in(&mut self, ttl: Duration) {
        self.expire_at = Some(Instant::now() + ttl);
    }

    /// Remove expiration
    pub fn persist(&mut self) {
        self.expire_at = None;
    }

    /// Get remaining TTL in seconds
    ///
    /// Returns -1 when the entry has no expiration and -2 once it has expired.
    pub fn ttl_seconds(&self) -> i64 {
        match self.expire_at {
            Some(expire_at) => {
                let now = Instant::now();
                if expire_at > now {
                    // Round up so a freshly set TTL of N reads back as N
                    let remaining = expire_at.duration_since(now);
                    let secs = remaining.as_secs() as i64;
                    if remaining.subsec_nanos() > 0 { secs + 1 } else { secs }
                } else {
                    -2
                }
            }
            None => -1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ttl_seconds() {
        let mut entry = Entry::new("key", Value::string("value"));
        assert_eq!(entry.ttl_seconds(), -1);
        assert!(!entry.is_expired());

        entry.expire_in(Duration::from_secs(100));
        let ttl = entry.ttl_seconds();
        assert!(ttl >= 99 && ttl <= 100);

        entry.persist();
        assert_eq!(entry.ttl_seconds(), -1);
    }

    #[test]
    fn test_expired_entry() {
        let mut entry = Entry::new("key", Value::string("value"));
        entry.expire_in(Duration::ZERO);
        assert!(entry.is_expired());
        assert_eq!(entry.ttl_seconds(), -2);
    }
}
