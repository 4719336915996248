//! Sorted set container

use super::base::{Container, ContainerBase};
use crate::client::{Client, Commands};
use crate::error::Result;
use std::ops::Bound;

/// A remote set of members ordered by score
///
/// Members with equal scores are ordered by member name.
#[derive(Debug, Clone)]
pub struct SortedSet {
    base: ContainerBase,
}

impl Container for SortedSet {
    fn base(&self) -> &ContainerBase {
        &self.base
    }

    fn len(&self) -> Result<usize> {
        Ok(self.client().zcard(self.key())? as usize)
    }
}

impl SortedSet {
    pub fn new(key: impl Into<String>, client: Client) -> Self {
        SortedSet {
            base: ContainerBase::new(key, client),
        }
    }

    /// Insert a member or update its score, returns true if it was new
    pub fn add(&self, member: &str, score: f64) -> Result<bool> {
        Ok(self.client().zadd(self.key(), member, score)? > 0)
    }

    /// Add `delta` to the member's score (0 if absent) and return the new score
    pub fn incr_by(&self, member: &str, delta: f64) -> Result<f64> {
        Ok(self.client().zincrby(self.key(), member, delta)?)
    }

    /// Remove a member, failing with `NotFound` when it is absent
    pub fn remove(&self, member: &str) -> Result<()> {
        if self.client().zrem(self.key(), [member])? == 0 {
            return Err(self.base.not_found(member));
        }
        Ok(())
    }

    /// Remove a member if present
    pub fn discard(&self, member: &str) -> Result<()> {
        self.client().zrem(self.key(), [member])?;
        Ok(())
    }

    pub fn contains(&self, member: &str) -> Result<bool> {
        Ok(self.client().zscore(self.key(), member)?.is_some())
    }

    pub fn score(&self, member: &str) -> Result<f64> {
        self.client()
            .zscore(self.key(), member)?
            .ok_or_else(|| self.base.not_found(member))
    }

    /// Position in ascending order, starting at 0
    pub fn rank(&self, member: &str) -> Result<usize> {
        self.client()
            .zrank(self.key(), member)?
            .map(|rank| rank as usize)
            .ok_or_else(|| self.base.not_found(member))
    }

    /// Position in descending order, starting at 0
    pub fn revrank(&self, member: &str) -> Result<usize> {
        self.client()
            .zrevrank(self.key(), member)?
            .map(|rank| rank as usize)
            .ok_or_else(|| self.base.not_found(member))
    }

    /// Members in ascending order
    pub fn members(&self) -> Result<Vec<String>> {
        Ok(self.client().zrange(self.key(), 0, -1)?)
    }

    /// Members in descending order
    pub fn revmembers(&self) -> Result<Vec<String>> {
        Ok(self.client().zrevrange(self.key(), 0, -1)?)
    }

    /// Members with a score within the bounds, ascending
    pub fn range_by_score(&self, min: Bound<f64>, max: Bound<f64>) -> Result<Vec<String>> {
        Ok(self.client().zrangebyscore(self.key(), min, max)?)
    }

    /// Score <= `score`
    pub fn le(&self, score: f64) -> Result<Vec<String>> {
        self.range_by_score(Bound::Unbounded, Bound::Included(score))
    }

    /// Score < `score`
    pub fn lt(&self, score: f64) -> Result<Vec<String>> {
        self.range_by_score(Bound::Unbounded, Bound::Excluded(score))
    }

    /// Score >= `score`
    pub fn ge(&self, score: f64) -> Result<Vec<String>> {
        self.range_by_score(Bound::Included(score), Bound::Unbounded)
    }

    /// Score > `score`
    pub fn gt(&self, score: f64) -> Result<Vec<String>> {
        self.range_by_score(Bound::Excluded(score), Bound::Unbounded)
    }

    /// Score == `score`
    pub fn eq(&self, score: f64) -> Result<Vec<String>> {
        self.between(score, score)
    }

    /// `min` <= score <= `max`
    pub fn between(&self, min: f64, max: f64) -> Result<Vec<String>> {
        self.range_by_score(Bound::Included(min), Bound::Included(max))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::LocalClient;
    use crate::error::ContainerError;
    use std::sync::Arc;

    fn ages() -> SortedSet {
        let client: Client = Arc::new(LocalClient::new());
        let ages = SortedSet::new("ages", client);
        let scores = [("1", 29.0), ("2", 39.0), ("3", 15.0), ("4", 35.0), ("5", 98.0), ("6", 5.0)];
        for (member, score) in scores {
            assert!(ages.add(member, score).unwrap());
        }
        ages
    }

    #[test]
    fn test_scores_and_ranks() {
        let ages = ages();
        assert_eq!(ages.len().unwrap(), 6);
        assert_eq!(ages.score("4").unwrap(), 35.0);
        assert_eq!(ages.rank("6").unwrap(), 0);
        assert_eq!(ages.revrank("6").unwrap(), 5);
        assert_eq!(ages.rank("4").unwrap(), 3);
        assert_eq!(ages.rank("5").unwrap(), 5);
        assert_eq!(ages.le(35.0).unwrap(), vec!["6", "3", "1", "4"]);
    }

    #[test]
    fn test_range_queries() {
        let ages = ages();
        assert!(ages.add("7", 35.0).unwrap());

        assert_eq!(ages.eq(35.0).unwrap(), vec!["4", "7"]);
        assert_eq!(ages.lt(29.0).unwrap(), vec!["6", "3"]);
        assert_eq!(ages.le(29.0).unwrap(), vec!["6", "3", "1"]);
        assert_eq!(ages.gt(30.0).unwrap(), vec!["4", "7", "2", "5"]);
        assert_eq!(ages.ge(39.0).unwrap(), vec!["2", "5"]);
        assert_eq!(ages.between(15.0, 35.0).unwrap(), vec!["3", "1", "4", "7"]);
        assert!(ages.gt(98.0).unwrap().is_empty());
        assert_eq!(
            ages.range_by_score(Bound::Excluded(5.0), Bound::Excluded(29.0)).unwrap(),
            vec!["3"]
        );
    }

    #[test]
    fn test_rank_is_monotonic_in_score() {
        let ages = ages();
        let members = ages.members().unwrap();
        let scores: Vec<f64> = members.iter().map(|m| ages.score(m).unwrap()).collect();
        assert!(scores.windows(2).all(|pair| pair[0] <= pair[1]));
        for (i, member) in members.iter().enumerate() {
            assert_eq!(ages.rank(member).unwrap(), i);
        }

        let mut reversed = ages.revmembers().unwrap();
        reversed.reverse();
        assert_eq!(reversed, members);
    }

    #[test]
    fn test_update_score() {
        let ages = ages();
        assert!(!ages.add("6", 100.0).unwrap());
        assert_eq!(ages.len().unwrap(), 6);
        assert_eq!(ages.revrank("6").unwrap(), 0);
        assert_eq!(ages.incr_by("6", -90.0).unwrap(), 10.0);
        assert_eq!(ages.rank("6").unwrap(), 0);
        assert_eq!(ages.incr_by("8", 1.5).unwrap(), 1.5);
    }

    #[test]
    fn test_missing_members() {
        let ages = ages();
        assert!(matches!(ages.score("x"), Err(ContainerError::NotFound { .. })));
        assert!(matches!(ages.rank("x"), Err(ContainerError::NotFound { .. })));
        assert!(matches!(ages.revrank("x"), Err(ContainerError::NotFound { .. })));
        assert!(matches!(ages.remove("x"), Err(ContainerError::NotFound { .. })));
        ages.discard("x").unwrap();

        ages.remove("1").unwrap();
        assert!(!ages.contains("1").unwrap());
        assert_eq!(ages.len().unwrap(), 5);
    }

    #[test]
    fn test_infinite_scores() {
        let ages = ages();
        ages.add("forever", f64::INFINITY).unwrap();
        assert_eq!(ages.score("forever").unwrap(), f64::INFINITY);
        assert_eq!(ages.ge(100.0).unwrap(), vec!["forever"]);
    }
}
