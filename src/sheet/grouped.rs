//! Keeps each group's rules contiguous and the groups in id order.

use std::collections::BTreeMap;

use super::group_ids::MAX_GROUP;
use super::tag::Tag;
use crate::SPLITTER;
use crate::error::{Result, StyleError};

/// Wraps a [`Tag`] and tracks how many rules each group owns.
///
/// Rules for group `g` live at `index_of_group(g)..index_of_group(g + 1)`,
/// so inserting into an early group shifts later groups instead of
/// interleaving with them. Only groups holding rules take up space, so a
/// high group number read back from server markup costs one entry.
#[derive(Debug)]
pub struct GroupedTag {
    group_sizes: BTreeMap<u32, u32>,
    tag: Box<dyn Tag>,
}

impl GroupedTag {
    pub fn new(tag: Box<dyn Tag>) -> Self {
        Self {
            group_sizes: BTreeMap::new(),
            tag,
        }
    }

    /// Number of groups currently holding rules.
    #[inline]
    pub fn group_count(&self) -> usize {
        self.group_sizes.len()
    }

    /// Total rules held by the underlying tag.
    #[inline]
    pub fn rule_count(&self) -> usize {
        self.tag.len()
    }

    /// Number of rules owned by `group`.
    #[inline]
    pub fn group_len(&self, group: u32) -> usize {
        self.group_sizes.get(&group).copied().unwrap_or(0) as usize
    }

    /// Tag index of the first rule of `group`.
    pub fn index_of_group(&self, group: u32) -> usize {
        self.group_sizes.range(..group).map(|(_, &n)| n as usize).sum()
    }

    /// Append `rules` to the end of `group`.
    ///
    /// Rules the tag refuses are skipped and not counted. Groups past
    /// [`MAX_GROUP`] are rejected before anything is inserted.
    pub fn insert_rules(&mut self, group: u32, rules: &[String]) -> Result<()> {
        if group > MAX_GROUP {
            return Err(StyleError::GroupOverflow { limit: MAX_GROUP });
        }

        let mut rule_index = self.index_of_group(group + 1);
        let mut inserted = 0;
        for rule in rules {
            if self.tag.insert_rule(rule_index, rule) {
                inserted += 1;
                rule_index += 1;
            }
        }
        if inserted > 0 {
            *self.group_sizes.entry(group).or_insert(0) += inserted;
        }
        Ok(())
    }

    /// Delete every rule of `group`.
    pub fn clear_group(&mut self, group: u32) {
        let Some(length) = self.group_sizes.remove(&group) else {
            return;
        };
        let start = self.index_of_group(group);
        for _ in 0..length {
            self.tag.delete_rule(start);
        }
    }

    /// Rules of `group`, each followed by the splitter.
    pub fn get_group(&self, group: u32) -> String {
        let length = self.group_len(group);
        if length == 0 {
            return String::new();
        }
        let start = self.index_of_group(group);
        let mut css = String::new();
        for i in start..start + length {
            css.push_str(self.tag.get_rule(i));
            css.push_str(SPLITTER);
        }
        css
    }
}
