//! Sorted set value (member -> score, ordered by score)

use bytes::Bytes;
use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};
use std::ops::Bound;

/// Score wrapper with a total order so it can live in a `BTreeSet`
#[derive(Debug, Clone, Copy)]
pub struct Score(pub f64);

impl PartialEq for Score {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Score {}

impl PartialOrd for Score {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Score {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

/// Sorted set storage
///
/// Members are kept twice: a hash map for O(1) score lookup and an ordered
/// index of `(score, member)` pairs. Members sharing a score are ordered by
/// their bytes, which makes every range query deterministic.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SortedSet {
    scores: HashMap<Bytes, f64>,
    ordered: BTreeSet<(Score, Bytes)>,
}

impl SortedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a member or update its score. Returns true if the member is new.
    pub fn insert(&mut self, member: Bytes, score: f64) -> bool {
        // -0.0 and 0.0 must land on the same slot
        let score = score + 0.0;
        match self.scores.insert(member.clone(), score) {
            Some(previous) => {
                self.ordered.remove(&(Score(previous), member.clone()));
                self.ordered.insert((Score(score), member));
                false
            }
            None => {
                self.ordered.insert((Score(score), member));
                true
            }
        }
    }

    /// Remove a member, returns true if it was present
    pub fn remove(&mut self, member: &Bytes) -> bool {
        match self.scores.remove(member) {
            Some(score) => {
                self.ordered.remove(&(Score(score), member.clone()));
                true
            }
            None => false,
        }
    }

    /// Add `delta` to the score of a member (missing members start at 0)
    pub fn incr(&mut self, member: Bytes, delta: f64) -> f64 {
        let score = self.scores.get(&member).copied().unwrap_or(0.0) + delta;
        self.insert(member, score);
        score
    }

    pub fn score(&self, member: &Bytes) -> Option<f64> {
        self.scores.get(member).copied()
    }

    /// Zero-based position in ascending order
    pub fn rank(&self, member: &Bytes) -> Option<usize> {
        let score = self.scores.get(member)?;
        Some(self.ordered.range(..(Score(*score), member.clone())).count())
    }

    /// Zero-based position in descending order
    pub fn rev_rank(&self, member: &Bytes) -> Option<usize> {
        self.rank(member).map(|rank| self.len() - 1 - rank)
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Iterate members in ascending order
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (&Bytes, f64)> {
        self.ordered.iter().map(|(score, member)| (member, score.0))
    }

    /// Members whose score lies between the two bounds, ascending
    pub fn range_by_score(&self, min: Bound<f64>, max: Bound<f64>) -> Vec<(Bytes, f64)> {
        self.ordered
            .iter()
            .skip_while(|(score, _)| !above_min(score.0, min))
            .take_while(|(score, _)| below_max(score.0, max))
            .map(|(score, member)| (member.clone(), score.0))
            .collect()
    }
}

fn above_min(score: f64, min: Bound<f64>) -> bool {
    match min {
        Bound::Included(min) => score >= min,
        Bound::Excluded(min) => score > min,
        Bound::Unbounded => true,
    }
}

fn below_max(score: f64, max: Bound<f64>) -> bool {
    match max {
        Bound::Included(max) => score <= max,
        Bound::Excluded(max) => score < max,
        Bound::Unbounded => true,
    }
}
