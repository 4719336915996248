//! Identity and key-level operations shared by every container

use crate::client::{Client, Commands};
use crate::error::{ContainerError, Result};
use std::fmt;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Key and client handle of a container
///
/// An empty key means the container is unbound.
#[derive(Clone)]
pub struct ContainerBase {
    key: String,
    client: Client,
}

impl ContainerBase {
    pub fn new(key: impl Into<String>, client: Client) -> Self {
        ContainerBase {
            key: key.into(),
            client,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn is_bound(&self) -> bool {
        !self.key.is_empty()
    }

    /// Same key on the same store
    pub fn same_entity(&self, other: &ContainerBase) -> bool {
        self.key == other.key && self.client.endpoint() == other.client.endpoint()
    }

    pub(crate) fn not_found(&self, item: impl fmt::Display) -> ContainerError {
        ContainerError::NotFound {
            key: self.key.clone(),
            item: item.to_string(),
        }
    }

    pub(crate) fn empty(&self) -> ContainerError {
        ContainerError::Empty {
            key: self.key.clone(),
        }
    }

    /// Fails unless the container is bound to a key
    pub(crate) fn require_bound(&self) -> Result<()> {
        if self.is_bound() {
            Ok(())
        } else {
            Err(ContainerError::InvalidOperand(
                "container is not bound to a key".to_string(),
            ))
        }
    }

    /// Fails unless both containers are bound and live on the same store
    pub(crate) fn require_compatible(&self, other: &ContainerBase) -> Result<()> {
        self.require_bound()?;
        other.require_bound()?;

        let (ours, theirs) = (self.client.endpoint(), other.client.endpoint());
        if ours != theirs {
            return Err(ContainerError::InvalidOperand(format!(
                "'{}' lives on {} but '{}' lives on {}",
                other.key, theirs, self.key, ours
            )));
        }
        Ok(())
    }
}

impl fmt::Debug for ContainerBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContainerBase")
            .field("key", &self.key)
            .field("endpoint", &self.client.endpoint())
            .finish()
    }
}

/// Operations every container supports
pub trait Container {
    fn base(&self) -> &ContainerBase;

    /// Number of elements, 0 for a missing key
    fn len(&self) -> Result<usize>;

    fn key(&self) -> &str {
        self.base().key()
    }

    fn client(&self) -> &Client {
        self.base().client()
    }

    fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    fn exists(&self) -> Result<bool> {
        Ok(self.client().exists(self.key())?)
    }

    /// Remove the key and its contents; a missing key is not an error
    fn clear(&self) -> Result<()> {
        self.client().del(self.key())?;
        Ok(())
    }

    fn delete(&self) -> Result<()> {
        self.clear()
    }

    /// Expire the key after `ttl`, rounded up to whole seconds
    ///
    /// A zero duration deletes the key. Returns false when the key is missing.
    fn expire(&self, ttl: Duration) -> Result<bool> {
        let mut seconds = ttl.as_secs();
        if ttl.subsec_nanos() > 0 {
            seconds += 1;
        }
        let seconds = i64::try_from(seconds).unwrap_or(i64::MAX);
        Ok(self.client().expire(self.key(), seconds)?)
    }

    /// Expire the key at `when`; a time in the past deletes it
    fn expire_at(&self, when: SystemTime) -> Result<bool> {
        let timestamp = when
            .duration_since(UNIX_EPOCH)
            .map(|since| i64::try_from(since.as_secs()).unwrap_or(i64::MAX))
            .unwrap_or(0);
        Ok(self.client().expireat(self.key(), timestamp)?)
    }

    /// Remaining time to live, None when the key is missing or never expires
    fn ttl(&self) -> Result<Option<Duration>> {
        let seconds = self.client().ttl(self.key())?;
        Ok(u64::try_from(seconds).ok().map(Duration::from_secs))
    }

    fn same_entity(&self, other: &dyn Container) -> bool {
        self.base().same_entity(other.base())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::LocalClient;
    use crate::containers::Set;
    use std::sync::Arc;

    #[test]
    fn test_clear_and_exists() {
        let client: Client = Arc::new(LocalClient::new());
        let set = Set::new("s", client);

        assert!(!set.exists().unwrap());
        set.clear().unwrap();

        set.add("a").unwrap();
        assert!(set.exists().unwrap());
        set.delete().unwrap();
        assert!(!set.exists().unwrap());
        assert!(set.is_empty().unwrap());

        // The handle stays usable after deletion
        set.add("b").unwrap();
        assert_eq!(set.len().unwrap(), 1);
    }

    #[test]
    fn test_expiry() {
        let client: Client = Arc::new(LocalClient::new());
        let set = Set::new("s", client);

        assert!(!set.expire(Duration::from_secs(10)).unwrap());
        set.add("a").unwrap();
        assert_eq!(set.ttl().unwrap(), None);

        assert!(set.expire(Duration::from_millis(1500)).unwrap());
        let ttl = set.ttl().unwrap().unwrap();
        assert!(ttl <= Duration::from_secs(2) && ttl >= Duration::from_secs(1));

        assert!(set.expire_at(SystemTime::now() + Duration::from_secs(3600)).unwrap());
        assert!(set.ttl().unwrap().unwrap() > Duration::from_secs(3500));

        assert!(set.expire(Duration::ZERO).unwrap());
        assert!(!set.exists().unwrap());
    }

    #[test]
    fn test_same_entity() {
        let client: Client = Arc::new(LocalClient::new());
        let a = Set::new("s", client.clone());
        let b = Set::new("s", client.clone());
        let c = Set::new("t", client);
        let elsewhere = Set::new("s", Arc::new(LocalClient::new()));

        assert!(a.same_entity(&b));
        assert!(!a.same_entity(&c));
        assert!(!a.same_entity(&elsewhere));
    }

    #[test]
    fn test_compatibility_checks() {
        let client: Client = Arc::new(LocalClient::new());
        let bound = ContainerBase::new("a", client.clone());
        let unbound = ContainerBase::new("", client);
        let elsewhere = ContainerBase::new("b", Arc::new(LocalClient::new()));

        assert!(matches!(
            bound.require_compatible(&unbound),
            Err(ContainerError::InvalidOperand(_))
        ));
        assert!(matches!(
            bound.require_compatible(&elsewhere),
            Err(ContainerError::InvalidOperand(_))
        ));
        assert!(bound.require_compatible(&bound.clone()).is_ok());
    }
}
