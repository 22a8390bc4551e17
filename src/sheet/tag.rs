//! Insertion targets behind a [`StyleSheet`](super::StyleSheet).
//!
//! - [`VirtualTag`] keeps rules in memory (server rendering, tests)
//! - [`LiveTag`] forwards to a host-provided live stylesheet that may
//!   reject rules

use std::fmt;

/// An indexable list of CSS rule texts.
pub trait Tag: Send + Sync + fmt::Debug {
    /// Number of rules currently held.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Insert `rule` at `index`. Returns `false` when the rule was not
    /// inserted; the caller treats that as "rule absent".
    fn insert_rule(&mut self, index: usize, rule: &str) -> bool;

    fn delete_rule(&mut self, index: usize);

    /// Rule text at `index`, empty when out of range.
    fn get_rule(&self, index: usize) -> &str;
}

/// Array-backed tag that never touches a live document.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VirtualTag {
    rules: Vec<String>,
}

impl VirtualTag {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Tag for VirtualTag {
    #[inline]
    fn len(&self) -> usize {
        self.rules.len()
    }

    fn insert_rule(&mut self, index: usize, rule: &str) -> bool {
        if index <= self.rules.len() {
            self.rules.insert(index, rule.to_string());
            true
        } else {
            false
        }
    }

    fn delete_rule(&mut self, index: usize) {
        if index < self.rules.len() {
            self.rules.remove(index);
        }
    }

    fn get_rule(&self, index: usize) -> &str {
        self.rules.get(index).map_or("", String::as_str)
    }
}

/// A live stylesheet owned by the host (a browser CSSOM binding, a GPU
/// renderer's style store, ...).
pub trait LiveSheet: Send + Sync + fmt::Debug {
    /// Parse and insert `rule` at `index`; `Err` carries the rejection reason.
    fn insert_rule(&mut self, rule: &str, index: usize) -> Result<(), String>;

    fn delete_rule(&mut self, index: usize);

    /// Serialized text of the rule at `index`, if any.
    fn css_text(&self, index: usize) -> Option<&str>;
}

/// Tag over a [`LiveSheet`]. Rejected rules are dropped silently.
#[derive(Debug)]
pub struct LiveTag<S: LiveSheet> {
    sheet: S,
    length: usize,
}

impl<S: LiveSheet> LiveTag<S> {
    pub fn new(sheet: S) -> Self {
        Self { sheet, length: 0 }
    }

    /// The wrapped host sheet.
    pub fn sheet(&self) -> &S {
        &self.sheet
    }
}

impl<S: LiveSheet> Tag for LiveTag<S> {
    #[inline]
    fn len(&self) -> usize {
        self.length
    }

    fn insert_rule(&mut self, index: usize, rule: &str) -> bool {
        match self.sheet.insert_rule(rule, index) {
            Ok(()) => {
                self.length += 1;
                true
            }
            Err(reason) => {
                tracing::debug!(index, %reason, rule, "live sheet rejected rule");
                false
            }
        }
    }

    fn delete_rule(&mut self, index: usize) {
        if index < self.length {
            self.sheet.delete_rule(index);
            self.length -= 1;
        }
    }

    fn get_rule(&self, index: usize) -> &str {
        self.sheet.css_text(index).unwrap_or("")
    }
}
