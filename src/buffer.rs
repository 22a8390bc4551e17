//! CSS computed during generation but not yet committed.

/// Rules for one generated name, waiting to be committed to a sheet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingRules {
    pub component_id: String,
    pub name: String,
    pub rules: Vec<String>,
}

impl PendingRules {
    pub fn new(component_id: impl Into<String>, name: impl Into<String>, rules: Vec<String>) -> Self {
        Self {
            component_id: component_id.into(),
            name: name.into(),
            rules,
        }
    }
}

/// Pending side effects of a generation pass.
///
/// Dropping a buffer without flushing it discards the work; nothing reached
/// the sheet.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InsertionBuffer {
    pending: Vec<PendingRules>,
}

impl InsertionBuffer {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, rules: PendingRules) {
        self.pending.push(rules);
    }

    /// Whether `(component_id, name)` is already queued.
    pub fn contains(&self, component_id: &str, name: &str) -> bool {
        self.pending
            .iter()
            .any(|p| p.component_id == component_id && p.name == name)
    }

    /// Move every entry of `other` to the end of this buffer.
    pub fn append(&mut self, other: &mut InsertionBuffer) {
        self.pending.append(&mut other.pending);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PendingRules> + '_ {
        self.pending.iter()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }

    /// Take every entry, leaving the buffer empty.
    pub(crate) fn take(&mut self) -> Vec<PendingRules> {
        std::mem::take(&mut self.pending)
    }

    /// Put entries back at the front, ahead of anything queued since.
    pub(crate) fn requeue(&mut self, entries: impl IntoIterator<Item = PendingRules>) {
        self.pending.splice(0..0, entries);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_contains_append() {
        let mut a = InsertionBuffer::new();
        a.push(PendingRules::new("A", "x", vec![".x{color:red;}".into()]));
        assert!(a.contains("A", "x"));
        assert!(!a.contains("B", "x"));

        let mut b = InsertionBuffer::new();
        b.push(PendingRules::new("B", "y", vec![]));
        a.append(&mut b);

        assert_eq!(a.len(), 2);
        assert!(b.is_empty());
        let names: Vec<&str> = a.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["x", "y"]);
    }

    #[test]
    fn take_empties_and_requeue_restores_order() {
        let mut buffer = InsertionBuffer::new();
        buffer.push(PendingRules::new("A", "x", vec![]));
        buffer.push(PendingRules::new("A", "y", vec![]));

        let mut taken = buffer.take().into_iter();
        assert!(buffer.is_empty());
        taken.next();

        buffer.push(PendingRules::new("B", "z", vec![]));
        buffer.requeue(taken);
        let names: Vec<&str> = buffer.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["y", "z"]);
    }
}
