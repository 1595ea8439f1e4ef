//! Channel membership set

use super::types::Principal;
use std::collections::HashSet;

/// Set of principals associated with one channel
///
/// Listing order is join order. Callers must treat it as a set; the order is
/// only kept so API responses are stable.
#[derive(Debug, Clone, Default)]
pub struct MembershipSet {
    order: Vec<Principal>,
    index: HashSet<Principal>,
}

/// The member was not present
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotAMember;

impl MembershipSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set seeded with the channel owner
    pub fn with_owner(owner: Principal) -> Self {
        let mut set = Self::new();
        set.add(owner);
        set
    }

    /// Insert `member`; returns false if it was already present
    pub fn add(&mut self, member: Principal) -> bool {
        if self.index.contains(&member) {
            return false;
        }
        self.index.insert(member.clone());
        self.order.push(member);
        true
    }

    pub fn remove(&mut self, member: &Principal) -> Result<(), NotAMember> {
        if !self.index.remove(member) {
            return Err(NotAMember);
        }
        self.order.retain(|m| m != member);
        Ok(())
    }

    pub fn contains(&self, member: &Principal) -> bool {
        self.index.contains(member)
    }

    pub fn list(&self) -> Vec<Principal> {
        self.order.clone()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub(crate) fn clear(&mut self) {
        self.order.clear();
        self.index.clear();
    }
}
