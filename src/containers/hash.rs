//! Hash container

use super::base::{Container, ContainerBase};
use crate::client::{Client, Commands};
use crate::error::Result;
use std::collections::HashMap;

/// A remote map of string fields to string values
#[derive(Debug, Clone)]
pub struct Hash {
    base: ContainerBase,
}

impl Container for Hash {
    fn base(&self) -> &ContainerBase {
        &self.base
    }

    fn len(&self) -> Result<usize> {
        Ok(self.client().hlen(self.key())? as usize)
    }
}

impl Hash {
    pub fn new(key: impl Into<String>, client: Client) -> Self {
        Hash {
            base: ContainerBase::new(key, client),
        }
    }

    /// Set a field, returns true if the field is new
    pub fn set(&self, field: &str, value: &str) -> Result<bool> {
        Ok(self.client().hset(self.key(), field, value)?)
    }

    /// Set several fields with one command, returns how many were new
    pub fn update<I, K, V>(&self, pairs: I) -> Result<usize>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let pairs: Vec<(String, String)> = pairs
            .into_iter()
            .map(|(field, value)| (field.as_ref().to_string(), value.as_ref().to_string()))
            .collect();
        if pairs.is_empty() {
            return Ok(0);
        }
        Ok(self.client().hmset(self.key(), pairs)? as usize)
    }

    /// Value of a field, failing with `NotFound` when it is absent
    pub fn get(&self, field: &str) -> Result<String> {
        self.get_opt(field)?
            .ok_or_else(|| self.base.not_found(field))
    }

    pub fn get_opt(&self, field: &str) -> Result<Option<String>> {
        Ok(self.client().hget(self.key(), field)?)
    }

    /// Delete a field, failing with `NotFound` when it is absent
    pub fn remove(&self, field: &str) -> Result<()> {
        if self.client().hdel(self.key(), [field])? == 0 {
            return Err(self.base.not_found(field));
        }
        Ok(())
    }

    /// Delete a field if present
    pub fn discard(&self, field: &str) -> Result<()> {
        self.client().hdel(self.key(), [field])?;
        Ok(())
    }

    pub fn contains(&self, field: &str) -> Result<bool> {
        Ok(self.client().hexists(self.key(), field)?)
    }

    /// Add `delta` to an integer field (0 if absent) and return the result
    pub fn incr_by(&self, field: &str, delta: i64) -> Result<i64> {
        Ok(self.client().hincrby(self.key(), field, delta)?)
    }

    /// Field/value pairs of one snapshot, sorted by field
    pub fn entries(&self) -> Result<Vec<(String, String)>> {
        let mut entries = self.client().hgetall(self.key())?;
        entries.sort_unstable_by(|a, b| a.0.cmp(&b.0));
        Ok(entries)
    }

    /// Field names, sorted
    pub fn keys(&self) -> Result<Vec<String>> {
        Ok(self.entries()?.into_iter().map(|(field, _)| field).collect())
    }

    /// Values, in the order of `keys()`
    pub fn values(&self) -> Result<Vec<String>> {
        Ok(self.entries()?.into_iter().map(|(_, value)| value).collect())
    }

    pub fn to_map(&self) -> Result<HashMap<String, String>> {
        Ok(self.client().hgetall(self.key())?.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::LocalClient;
    use crate::error::ContainerError;
    use std::sync::Arc;

    fn hash() -> Hash {
        let client: Client = Arc::new(LocalClient::new());
        Hash::new("h", client)
    }

    #[test]
    fn test_set_get_delete() {
        let hash = hash();
        assert!(hash.set("name", "ada").unwrap());
        assert!(!hash.set("name", "grace").unwrap());
        assert_eq!(hash.get("name").unwrap(), "grace");
        assert!(hash.contains("name").unwrap());

        hash.remove("name").unwrap();
        assert!(!hash.contains("name").unwrap());
        assert!(matches!(hash.get("name"), Err(ContainerError::NotFound { .. })));
        assert_eq!(hash.get_opt("name").unwrap(), None);
        assert!(!hash.exists().unwrap());
    }

    #[test]
    fn test_remove_vs_discard() {
        let hash = hash();
        hash.set("a", "1").unwrap();

        assert!(matches!(hash.remove("missing"), Err(ContainerError::NotFound { .. })));
        hash.discard("missing").unwrap();
        hash.discard("a").unwrap();
        assert_eq!(hash.len().unwrap(), 0);
    }

    #[test]
    fn test_snapshots_are_consistent() {
        let hash = hash();
        assert_eq!(hash.update([("b", "2"), ("a", "1"), ("c", "3")]).unwrap(), 3);
        assert_eq!(hash.update(Vec::<(String, String)>::new()).unwrap(), 0);

        assert_eq!(hash.keys().unwrap(), vec!["a", "b", "c"]);
        assert_eq!(hash.values().unwrap(), vec!["1", "2", "3"]);
        assert_eq!(
            hash.entries().unwrap(),
            vec![
                ("a".to_string(), "1".to_string()),
                ("b".to_string(), "2".to_string()),
                ("c".to_string(), "3".to_string()),
            ]
        );

        let map = hash.to_map().unwrap();
        assert_eq!(map.len(), 3);
        assert_eq!(map["b"], "2");
    }

    #[test]
    fn test_incr_by() {
        let hash = hash();
        assert_eq!(hash.incr_by("visits", 2).unwrap(), 2);
        assert_eq!(hash.incr_by("visits", 3).unwrap(), 5);
        assert_eq!(hash.get("visits").unwrap(), "5");

        hash.set("name", "ada").unwrap();
        assert!(matches!(hash.incr_by("name", 1), Err(ContainerError::Client(_))));
    }

    #[test]
    fn test_empty_hash() {
        let hash = hash();
        assert!(hash.keys().unwrap().is_empty());
        assert!(hash.to_map().unwrap().is_empty());
        assert_eq!(hash.len().unwrap(), 0);
    }
}
