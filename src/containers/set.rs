//! Set container

use super::base::{Container, ContainerBase};
use crate::client::{Client, Commands};
use crate::error::Result;
use std::cmp::Ordering;
use std::collections::HashSet;

/// A remote set of strings
#[derive(Debug, Clone)]
pub struct Set {
    base: ContainerBase,
}

impl Container for Set {
    fn base(&self) -> &ContainerBase {
        &self.base
    }

    fn len(&self) -> Result<usize> {
        Ok(self.client().scard(self.key())? as usize)
    }
}

impl Set {
    pub fn new(key: impl Into<String>, client: Client) -> Self {
        Set {
            base: ContainerBase::new(key, client),
        }
    }

    /// Add a member, returns true if it was not already present
    pub fn add(&self, member: &str) -> Result<bool> {
        Ok(self.client().sadd(self.key(), [member])? > 0)
    }

    /// Add several members, returns how many were new
    pub fn add_all<I, S>(&self, members: I) -> Result<usize>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let members: Vec<String> = members.into_iter().map(|m| m.as_ref().to_string()).collect();
        if members.is_empty() {
            return Ok(0);
        }
        Ok(self.client().sadd(self.key(), &members)? as usize)
    }

    /// Remove a member if present
    pub fn discard(&self, member: &str) -> Result<()> {
        self.client().srem(self.key(), [member])?;
        Ok(())
    }

    /// Remove a member, failing with `NotFound` when it is absent
    pub fn remove(&self, member: &str) -> Result<()> {
        if self.client().srem(self.key(), [member])? == 0 {
            return Err(self.base.not_found(member));
        }
        Ok(())
    }

    /// Remove and return an arbitrary member
    pub fn pop(&self) -> Result<String> {
        self.client()
            .spop(self.key())?
            .ok_or_else(|| self.base.empty())
    }

    /// An arbitrary member, left in place
    pub fn random_member(&self) -> Result<Option<String>> {
        Ok(self.client().srandmember(self.key())?)
    }

    pub fn contains(&self, member: &str) -> Result<bool> {
        Ok(self.client().sismember(self.key(), member)?)
    }

    /// Snapshot of the members
    pub fn members(&self) -> Result<HashSet<String>> {
        Ok(self.client().smembers(self.key())?.into_iter().collect())
    }

    /// Copy the members into `new_key` on the same store
    pub fn copy(&self, new_key: &str) -> Result<Set> {
        let copy = Set::new(new_key, self.client().clone());
        self.base.require_compatible(&copy.base)?;
        self.client().sunionstore(new_key, &[self.key()])?;
        Ok(copy)
    }

    /// Add every member of `other`
    pub fn update(&self, other: &Set) -> Result<()> {
        self.union_update(other)
    }

    pub fn union_update(&self, other: &Set) -> Result<()> {
        self.base.require_compatible(&other.base)?;
        self.client().sunionstore(self.key(), &[self.key(), other.key()])?;
        Ok(())
    }

    /// Keep only members also in `other`
    pub fn intersection_update(&self, other: &Set) -> Result<()> {
        self.base.require_compatible(&other.base)?;
        self.client().sinterstore(self.key(), &[self.key(), other.key()])?;
        Ok(())
    }

    /// Drop members present in `other`
    pub fn difference_update(&self, other: &Set) -> Result<()> {
        self.base.require_compatible(&other.base)?;
        self.client().sdiffstore(self.key(), &[self.key(), other.key()])?;
        Ok(())
    }

    /// Store the union of self and `others` under `dest_key`
    pub fn union(&self, dest_key: &str, others: &[&Set]) -> Result<Set> {
        let (dest, keys) = self.operands(dest_key, others)?;
        self.client().sunionstore(dest_key, &keys)?;
        Ok(dest)
    }

    /// Store the intersection of self and `others` under `dest_key`
    pub fn intersection(&self, dest_key: &str, others: &[&Set]) -> Result<Set> {
        let (dest, keys) = self.operands(dest_key, others)?;
        self.client().sinterstore(dest_key, &keys)?;
        Ok(dest)
    }

    /// Store the members of self missing from every set in `others` under `dest_key`
    pub fn difference(&self, dest_key: &str, others: &[&Set]) -> Result<Set> {
        let (dest, keys) = self.operands(dest_key, others)?;
        self.client().sdiffstore(dest_key, &keys)?;
        Ok(dest)
    }

    /// Destination handle and source keys for a derived operation
    fn operands<'a>(&'a self, dest_key: &str, others: &[&'a Set]) -> Result<(Set, Vec<&'a str>)> {
        let dest = Set::new(dest_key, self.client().clone());
        self.base.require_compatible(&dest.base)?;

        let mut keys = vec![self.key()];
        for other in others {
            self.base.require_compatible(&other.base)?;
            keys.push(other.key());
        }
        Ok((dest, keys))
    }

    /// Both snapshots, for comparisons
    fn snapshots(&self, other: &Set) -> Result<(HashSet<String>, HashSet<String>)> {
        self.base.require_bound()?;
        other.base.require_bound()?;
        Ok((self.members()?, other.members()?))
    }

    /// Same members, regardless of key
    pub fn equals(&self, other: &Set) -> Result<bool> {
        let (ours, theirs) = self.snapshots(other)?;
        Ok(ours == theirs)
    }

    pub fn is_subset(&self, other: &Set) -> Result<bool> {
        let (ours, theirs) = self.snapshots(other)?;
        Ok(ours.is_subset(&theirs))
    }

    pub fn is_superset(&self, other: &Set) -> Result<bool> {
        let (ours, theirs) = self.snapshots(other)?;
        Ok(ours.is_superset(&theirs))
    }

    pub fn is_proper_subset(&self, other: &Set) -> Result<bool> {
        Ok(self.compare(other)? == Some(Ordering::Less))
    }

    pub fn is_proper_superset(&self, other: &Set) -> Result<bool> {
        Ok(self.compare(other)? == Some(Ordering::Greater))
    }

    pub fn is_disjoint(&self, other: &Set) -> Result<bool> {
        let (ours, theirs) = self.snapshots(other)?;
        Ok(ours.is_disjoint(&theirs))
    }

    /// Inclusion order: `Less` for a proper subset, `Greater` for a proper
    /// superset, `None` when neither contains the other
    pub fn compare(&self, other: &Set) -> Result<Option<Ordering>> {
        let (ours, theirs) = self.snapshots(other)?;
        let ordering = if ours == theirs {
            Some(Ordering::Equal)
        } else if ours.is_subset(&theirs) {
            Some(Ordering::Less)
        } else if ours.is_superset(&theirs) {
            Some(Ordering::Greater)
        } else {
            None
        };
        Ok(ordering)
    }
}
