//! Component id ↔ group allocation, in first-registration order.
//!
//! Groups position a component's rules in the sheet. Because a group is
//! assigned when a style is *defined*, output follows definition order no
//! matter in which order components later render.

use std::collections::HashMap;

use crate::error::{Result, StyleError};

/// Highest group id the allocator hands out.
pub const MAX_GROUP: u32 = 1 << 30;

/// Bidirectional component id ↔ group registry.
///
/// Group `0` is never assigned; the first registered id gets group `1`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GroupIdAllocator {
    id_to_group: HashMap<String, u32>,
    group_to_id: HashMap<u32, String>,
    next_free: u32,
}

impl Default for GroupIdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl GroupIdAllocator {
    pub fn new() -> Self {
        Self {
            id_to_group: HashMap::new(),
            group_to_id: HashMap::new(),
            next_free: 1,
        }
    }

    /// Group for `id`, allocating the next free one on first use.
    ///
    /// Idempotent: later calls return the same group.
    pub fn group_for_id(&mut self, id: &str) -> Result<u32> {
        if let Some(&group) = self.id_to_group.get(id) {
            return Ok(group);
        }

        while self.group_to_id.contains_key(&self.next_free) {
            self.next_free += 1;
        }

        let group = self.next_free;
        if group > MAX_GROUP {
            return Err(StyleError::GroupOverflow { limit: MAX_GROUP });
        }
        self.next_free += 1;

        self.id_to_group.insert(id.to_string(), group);
        self.group_to_id.insert(group, id.to_string());
        Ok(group)
    }

    /// Group for `id` without allocating.
    #[inline]
    pub fn get(&self, id: &str) -> Option<u32> {
        self.id_to_group.get(id).copied()
    }

    /// Group → component id
    #[inline]
    pub fn id_for_group(&self, group: u32) -> Option<&str> {
        self.group_to_id.get(&group).map(String::as_str)
    }

    /// Pin `id` to `group`, as recorded by a previous run.
    ///
    /// Allocation resumes right after `group`; occupied groups are skipped.
    pub fn set_group_for_id(&mut self, id: &str, group: u32) {
        if let Some(old) = self.id_to_group.insert(id.to_string(), group)
            && old != group
        {
            self.group_to_id.remove(&old);
        }
        if let Some(previous_owner) = self.group_to_id.insert(group, id.to_string())
            && previous_owner != id
        {
            self.id_to_group.remove(&previous_owner);
        }
        self.next_free = group + 1;
    }

    /// Every `(group, id)` pair, ordered by group.
    pub fn groups(&self) -> Vec<(u32, &str)> {
        let mut groups: Vec<(u32, &str)> = self
            .group_to_id
            .iter()
            .map(|(&group, id)| (group, id.as_str()))
            .collect();
        groups.sort_unstable_by_key(|&(group, _)| group);
        groups
    }

    /// Number of registered ids.
    #[inline]
    pub fn len(&self) -> usize {
        self.id_to_group.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.id_to_group.is_empty()
    }
}
