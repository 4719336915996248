//! In-memory storage implementation

use super::entry::Entry;
use super::value::Value;
use bytes::Bytes;
use siphasher::sip::SipHasher13;
use std::collections::HashMap;
use std::hash::BuildHasherDefault;
use std::time::Duration;

/// Type alias for our hash map with SipHasher
type StoreMap = HashMap<Bytes, Entry, BuildHasherDefault<SipHasher13>>;

/// In-memory key-value store
///
/// Single-threaded keyspace; callers serialize access (the dispatcher sits
/// behind a mutex). Expired keys are removed lazily when touched.
pub struct MemoryStore {
    /// The main storage map
    store: StoreMap,
}

impl MemoryStore {
    /// Create a new memory store with default capacity
    pub fn new() -> Self {
        Self::with_capacity(1024)
    }

    /// Create a new memory store with specified initial capacity
    pub fn with_capacity(capacity: usize) -> Self {
        MemoryStore {
            store: HashMap::with_capacity_and_hasher(
                capacity,
                BuildHasherDefault::<SipHasher13>::default(),
            ),
        }
    }

    /// Drop the key if its entry has expired
    fn evict_if_expired(&mut self, key: &Bytes) {
        let expired = self.store.get(key).map(Entry::is_expired).unwrap_or(false);
        if expired {
            self.store.remove(key);
        }
    }

    /// Set a key-value pair, replacing any previous value and expiration
    pub fn set(&mut self, key: impl Into<Bytes>, value: Value) -> bool {
        let key = key.into();
        self.evict_if_expired(&key);
        let entry = Entry::new(key.clone(), value);
        self.store.insert(key, entry).is_none()
    }

    /// Get a value by key, returns None if not found or expired
    pub fn get(&mut self, key: &Bytes) -> Option<&Value> {
        self.evict_if_expired(key);
        self.store.get(key).map(|entry| &entry.value)
    }

    /// Get a mutable reference to a value by key
    pub fn get_mut(&mut self, key: &Bytes) -> Option<&mut Value> {
        self.evict_if_expired(key);
        self.store.get_mut(key).map(|entry| &mut entry.value)
    }

    /// Get the value for a key, inserting `default()` when the key is absent
    pub fn get_or_insert_with(
        &mut self,
        key: &Bytes,
        default: impl FnOnce() -> Value,
    ) -> &mut Value {
        self.evict_if_expired(key);
        let entry = self
            .store
            .entry(key.clone())
            .or_insert_with(|| Entry::new(key.clone(), default()));
        &mut entry.value
    }

    /// Remove the key if it holds a collection with no elements left
    pub fn remove_if_empty(&mut self, key: &Bytes) {
        let empty = self
            .store
            .get(key)
            .map(|entry| entry.value.is_empty_collection())
            .unwrap_or(false);
        if empty {
            self.store.remove(key);
        }
    }

    /// Delete a key, returns true if the key existed
    pub fn delete(&mut self, key: &Bytes) -> bool {
        match self.store.remove(key) {
            Some(entry) => !entry.is_expired(),
            None => false,
        }
    }

    /// Check if a key exists (and is not expired)
    pub fn exists(&mut self, key: &Bytes) -> bool {
        self.evict_if_expired(key);
        self.store.contains_key(key)
    }

    /// Expire a key after `ttl`. A zero TTL deletes the key immediately.
    ///
    /// Returns false if the key does not exist.
    pub fn expire(&mut self, key: &Bytes, ttl: Duration) -> bool {
        self.evict_if_expired(key);
        if ttl.is_zero() {
            return self.store.remove(key).is_some();
        }
        match self.store.get_mut(key) {
            Some(entry) => {
                entry.expire_in(ttl);
                true
            }
            None => false,
        }
    }

    /// Get TTL for a key in seconds
    ///
    /// Returns:
    /// - n >= 0: remaining TTL in seconds
    /// - -1: key exists but has no expiration
    /// - -2: key does not exist or is expired
    pub fn ttl(&mut self, key: &Bytes) -> i64 {
        self.evict_if_expired(key);
        self.store.get(key).map(Entry::ttl_seconds).unwrap_or(-2)
    }

    /// Remove all keys
    pub fn clear(&mut self) {
        self.store.clear();
    }

    /// Get the number of active keys (excluding expired)
    pub fn len(&self) -> usize {
        self.store.values().filter(|entry| !entry.is_expired()).count()
    }

    /// Check if the store is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_set_get() {
        let mut store = MemoryStore::new();
        store.set("key1", Value::string("value1"));

        let value = store.get(&Bytes::from("key1")).unwrap();
        assert_eq!(value.as_string().unwrap(), &Bytes::from("value1"));
    }

    #[test]
    fn test_delete() {
        let mut store = MemoryStore::new();
        store.set("key1", Value::string("value1"));

        assert!(store.delete(&Bytes::from("key1")));
        assert!(!store.delete(&Bytes::from("key1")));
        assert!(!store.exists(&Bytes::from("key1")));
    }

    #[test]
    fn test_get_or_insert_with() {
        let mut store = MemoryStore::new();
        let key = Bytes::from("myset");

        store
            .get_or_insert_with(&key, Value::empty_set)
            .as_set_mut()
            .unwrap()
            .insert(Bytes::from("a"));
        let set = store.get_or_insert_with(&key, Value::empty_set).as_set().unwrap();
        assert_eq!(set.len(), 1);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_remove_if_empty() {
        let mut store = MemoryStore::new();
        let key = Bytes::from("mylist");
        store.set(key.clone(), Value::empty_list());
        store.remove_if_empty(&key);
        assert!(!store.exists(&key));

        store.set(key.clone(), Value::string(""));
        store.remove_if_empty(&key);
        assert!(store.exists(&key));
    }

    #[test]
    fn test_expiration() {
        let mut store = MemoryStore::new();
        let key = Bytes::from("key1");
        store.set(key.clone(), Value::string("value1"));
        assert_eq!(store.ttl(&key), -1);

        assert!(store.expire(&key, Duration::from_millis(50)));
        assert!(store.exists(&key));

        std::thread::sleep(Duration::from_millis(100));

        assert!(!store.exists(&key));
        assert_eq!(store.ttl(&key), -2);
        assert!(!store.expire(&key, Duration::from_secs(10)));
    }

    #[test]
    fn test_zero_ttl_deletes() {
        let mut store = MemoryStore::new();
        let key = Bytes::from("key1");
        store.set(key.clone(), Value::string("value1"));
        assert!(store.expire(&key, Duration::ZERO));
        assert!(!store.exists(&key));
    }
}
