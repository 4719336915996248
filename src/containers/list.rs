//! List container and its chunked iterator

use super::base::{Container, ContainerBase};
use crate::client::{Client, ClientError, Cmd, Commands};
use crate::error::Result;
use crate::protocol::RespValue;
use std::collections::VecDeque;
use std::ops::{Bound, RangeBounds};

/// Elements fetched per range query while iterating
pub const DEFAULT_CHUNK_SIZE: usize = 100;

/// A remote list of strings
///
/// Negative indices count from the end, `-1` being the last element.
#[derive(Debug, Clone)]
pub struct List {
    base: ContainerBase,
    chunk_size: usize,
}

impl Container for List {
    fn base(&self) -> &ContainerBase {
        &self.base
    }

    fn len(&self) -> Result<usize> {
        Ok(self.client().llen(self.key())? as usize)
    }
}

impl List {
    pub fn new(key: impl Into<String>, client: Client) -> Self {
        List {
            base: ContainerBase::new(key, client),
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    /// Fetch `chunk_size` elements per round trip when iterating
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Add a value at the tail
    pub fn append(&self, value: &str) -> Result<()> {
        self.client().rpush(self.key(), [value])?;
        Ok(())
    }

    pub fn push(&self, value: &str) -> Result<()> {
        self.append(value)
    }

    /// Remove and return the tail
    pub fn pop(&self) -> Result<String> {
        self.client()
            .rpop(self.key())?
            .ok_or_else(|| self.base.empty())
    }

    /// Add a value at the head
    pub fn unshift(&self, value: &str) -> Result<()> {
        self.client().lpush(self.key(), [value])?;
        Ok(())
    }

    /// Remove and return the head
    pub fn shift(&self) -> Result<String> {
        self.client()
            .lpop(self.key())?
            .ok_or_else(|| self.base.empty())
    }

    /// Append every value, in order
    pub fn extend<I, S>(&self, values: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let values: Vec<String> = values.into_iter().map(|v| v.as_ref().to_string()).collect();
        if !values.is_empty() {
            self.client().rpush(self.key(), &values)?;
        }
        Ok(())
    }

    /// Append the current contents of `other`
    pub fn extend_from(&self, other: &List) -> Result<()> {
        other.base.require_bound()?;
        self.extend(other.members()?)
    }

    /// Remove the first occurrence of `value`
    pub fn remove(&self, value: &str) -> Result<()> {
        if self.client().lrem(self.key(), 1, value)? == 0 {
            return Err(self.base.not_found(value));
        }
        Ok(())
    }

    /// Keep only the elements between `start` and `end`, both inclusive
    pub fn trim(&self, start: i64, end: i64) -> Result<()> {
        self.client().ltrim(self.key(), start, end)?;
        Ok(())
    }

    /// Reverse the stored order in place
    ///
    /// The elements are read first and then rewritten in one atomic batch.
    /// Writes from other handles that land between the read and the rewrite
    /// are lost.
    pub fn reverse(&self) -> Result<()> {
        let items = self.members()?;
        if items.len() < 2 {
            return Ok(());
        }

        let rewrite = vec![
            Cmd::new("DEL").arg(self.key()).into_parts(),
            Cmd::new("RPUSH")
                .arg(self.key())
                .args(items.iter().rev())
                .into_parts(),
        ];
        for reply in self.client().execute_atomic(rewrite)? {
            if let RespValue::Error(message) = reply {
                return Err(ClientError::Server(message).into());
            }
        }
        Ok(())
    }

    /// Element at `index`
    pub fn get(&self, index: i64) -> Result<String> {
        self.client()
            .lindex(self.key(), index)?
            .ok_or_else(|| self.base.not_found(format!("index {}", index)))
    }

    /// Replace the element at `index`
    pub fn set(&self, index: i64, value: &str) -> Result<()> {
        match self.client().lset(self.key(), index, value) {
            Ok(()) => Ok(()),
            Err(ClientError::Server(message))
                if message.contains("index out of range") || message.contains("no such key") =>
            {
                Err(self.base.not_found(format!("index {}", index)))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Elements covered by `range`, e.g. `..`, `1..3`, `1..=2` or `-2..`
    pub fn range<R: RangeBounds<i64>>(&self, range: R) -> Result<Vec<String>> {
        let start = match range.start_bound() {
            Bound::Included(&start) => start,
            Bound::Excluded(&start) => start.saturating_add(1),
            Bound::Unbounded => 0,
        };
        let end = match range.end_bound() {
            Bound::Included(&end) => end,
            Bound::Excluded(&0) => return Ok(Vec::new()),
            Bound::Excluded(&end) => end.saturating_sub(1),
            Bound::Unbounded => -1,
        };
        Ok(self.client().lrange(self.key(), start, end)?)
    }

    /// Snapshot of every element
    pub fn members(&self) -> Result<Vec<String>> {
        self.range(..)
    }

    pub fn contains(&self, value: &str) -> Result<bool> {
        for item in self.iter() {
            if item? == value {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Lazy pass over the list, fetching `chunk_size` elements at a time
    ///
    /// Every call starts a new pass. Writes made during a pass may or may not
    /// be observed.
    pub fn iter(&self) -> ListIter<'_> {
        ListIter {
            list: self,
            next_index: 0,
            buffer: VecDeque::new(),
            done: false,
        }
    }
}

impl<'a> IntoIterator for &'a List {
    type Item = Result<String>;
    type IntoIter = ListIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator returned by [`List::iter`]
///
/// Stops after the first error.
pub struct ListIter<'a> {
    list: &'a List,
    next_index: i64,
    buffer: VecDeque<String>,
    done: bool,
}

impl<'a> ListIter<'a> {
    fn fetch(&mut self) -> Result<()> {
        let size = self.list.chunk_size as i64;
        let chunk = self
            .list
            .client()
            .lrange(self.list.key(), self.next_index, self.next_index + size - 1)?;

        if (chunk.len() as i64) < size {
            self.done = true;
        }
        self.next_index += chunk.len() as i64;
        self.buffer.extend(chunk);
        Ok(())
    }
}

impl<'a> Iterator for ListIter<'a> {
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.buffer.is_empty() && !self.done {
            if let Err(e) = self.fetch() {
                self.done = true;
                return Some(Err(e));
            }
        }
        self.buffer.pop_front().map(Ok)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::LocalClient;
    use crate::error::ContainerError;
    use std::sync::Arc;

    fn list_of(key: &str, values: &[&str]) -> List {
        let client: Client = Arc::new(LocalClient::new());
        let list = List::new(key, client);
        list.extend(values.iter().copied()).unwrap();
        list
    }

    #[test]
    fn test_append_pop_round_trip() {
        let list = list_of("l", &["a"]);
        list.append("b").unwrap();
        assert_eq!(list.pop().unwrap(), "b");
        assert_eq!(list.members().unwrap(), vec!["a"]);

        list.push("c").unwrap();
        list.unshift("z").unwrap();
        assert_eq!(list.members().unwrap(), vec!["z", "a", "c"]);
        assert_eq!(list.shift().unwrap(), "z");
        assert_eq!(list.len().unwrap(), 2);
    }

    #[test]
    fn test_pop_empty() {
        let list = list_of("l", &[]);
        assert!(matches!(list.pop(), Err(ContainerError::Empty { .. })));
        assert!(matches!(list.shift(), Err(ContainerError::Empty { .. })));
    }

    #[test]
    fn test_extend() {
        let list = list_of("l", &["a", "b"]);
        list.extend(["c", "d"]).unwrap();
        assert_eq!(list.members().unwrap(), vec!["a", "b", "c", "d"]);

        list.extend(Vec::<String>::new()).unwrap();
        assert_eq!(list.len().unwrap(), 4);

        let other = List::new("other", list.client().clone());
        other.extend(["x", "y"]).unwrap();
        list.extend_from(&other).unwrap();
        assert_eq!(list.range(-2..).unwrap(), vec!["x", "y"]);
        assert_eq!(other.len().unwrap(), 2);
    }

    #[test]
    fn test_remove() {
        let list = list_of("l", &["a", "b", "a"]);
        list.remove("a").unwrap();
        assert_eq!(list.members().unwrap(), vec!["b", "a"]);
        assert!(matches!(list.remove("z"), Err(ContainerError::NotFound { .. })));
    }

    #[test]
    fn test_trim_and_reverse() {
        let list = list_of("l", &["a", "b", "c", "d", "e"]);
        list.trim(1, 3).unwrap();
        assert_eq!(list.members().unwrap(), vec!["b", "c", "d"]);

        list.reverse().unwrap();
        assert_eq!(list.members().unwrap(), vec!["d", "c", "b"]);

        let single = list_of("single", &["x"]);
        single.reverse().unwrap();
        assert_eq!(single.members().unwrap(), vec!["x"]);
    }

    #[test]
    fn test_get_and_set() {
        let list = list_of("l", &["a", "b", "c"]);
        assert_eq!(list.get(0).unwrap(), "a");
        assert_eq!(list.get(-1).unwrap(), "c");
        assert!(matches!(list.get(3), Err(ContainerError::NotFound { .. })));

        list.set(1, "B").unwrap();
        list.set(-1, "C").unwrap();
        assert_eq!(list.members().unwrap(), vec!["a", "B", "C"]);
        assert!(matches!(list.set(5, "x"), Err(ContainerError::NotFound { .. })));

        let missing = List::new("missing", list.client().clone());
        assert!(matches!(missing.set(0, "x"), Err(ContainerError::NotFound { .. })));
    }

    #[test]
    fn test_range() {
        let list = list_of("l", &["a", "b", "c", "d"]);
        assert_eq!(list.range(..).unwrap(), vec!["a", "b", "c", "d"]);
        assert_eq!(list.range(1..3).unwrap(), vec!["b", "c"]);
        assert_eq!(list.range(1..=2).unwrap(), vec!["b", "c"]);
        assert_eq!(list.range(-2..).unwrap(), vec!["c", "d"]);
        assert_eq!(list.range(..-1).unwrap(), vec!["a", "b", "c"]);
        assert!(list.range(0..0).unwrap().is_empty());
        assert!(list.range(10..).unwrap().is_empty());
    }

    #[test]
    fn test_range_extreme_bounds() {
        let list = list_of("l", &["a", "b"]);
        let after_max = (Bound::Excluded(i64::MAX), Bound::Unbounded);
        assert!(list.range(after_max).unwrap().is_empty());
        assert!(list.range(..i64::MIN).unwrap().is_empty());
        assert_eq!(list.range(i64::MIN..i64::MAX).unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn test_contains() {
        let list = list_of("l", &["a", "b"]);
        assert!(list.contains("b").unwrap());
        assert!(!list.contains("z").unwrap());
    }

    #[test]
    fn test_iteration_in_chunks() {
        let values: Vec<String> = (0..25).map(|i| i.to_string()).collect();
        let list = list_of("l", &[]).with_chunk_size(10);
        list.extend(&values).unwrap();

        let seen: Vec<String> = list.iter().collect::<Result<_>>().unwrap();
        assert_eq!(seen, values);

        // Restartable
        let again: Vec<String> = (&list).into_iter().map(|v| v.unwrap()).collect();
        assert_eq!(again, values);

        // Exact multiple of the chunk size
        let list = list.with_chunk_size(5);
        assert_eq!(list.iter().count(), 25);
        assert_eq!(List::new("missing", list.client().clone()).iter().count(), 0);
    }

    #[test]
    fn test_chunk_size_minimum() {
        let list = list_of("l", &["a", "b"]).with_chunk_size(0);
        assert_eq!(list.chunk_size(), 1);
        assert_eq!(list.iter().count(), 2);
    }
}
