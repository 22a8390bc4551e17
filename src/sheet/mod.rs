//! Stylesheet registry: which names exist per component, and the ordered
//! rule text behind them.

mod group_ids;
mod grouped;
mod rehydrate;
pub mod tag;

use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::Serialize;

pub use group_ids::{GroupIdAllocator, MAX_GROUP};
pub use grouped::GroupedTag;
pub use tag::{LiveSheet, LiveTag, Tag, VirtualTag};

use crate::buffer::InsertionBuffer;
use crate::error::Result;

/// Options fixed for the lifetime of a sheet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SheetOptions {
    /// Production mode enables the static-rules cache and drops literal
    /// fragments from dynamic class hashes.
    ///
    /// Default: `true` in release builds, `false` with debug assertions.
    pub production: bool,
}

impl Default for SheetOptions {
    fn default() -> Self {
        Self {
            production: !cfg!(debug_assertions),
        }
    }
}

impl SheetOptions {
    /// Builder method: set production mode and return self.
    pub fn production(mut self, production: bool) -> Self {
        self.production = production;
        self
    }
}

/// One entry of the rehydration manifest.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ManifestEntry {
    pub group: u32,
    pub component_id: String,
    pub names: Vec<String>,
}

/// Names generated for one component, in generation order.
#[derive(Clone, Debug, Default)]
struct NameSet {
    order: Vec<String>,
    lookup: HashSet<String>,
}

impl NameSet {
    fn insert(&mut self, name: &str) -> bool {
        if self.lookup.contains(name) {
            return false;
        }
        self.lookup.insert(name.to_string());
        self.order.push(name.to_string());
        true
    }

    fn clear(&mut self) {
        self.order.clear();
        self.lookup.clear();
    }
}

/// A stylesheet: registry of emitted names plus grouped rule storage.
///
/// Sheets are independent; nothing is shared between two instances. All
/// mutation goes through `&mut self`, generation only ever borrows.
pub struct StyleSheet {
    options: SheetOptions,
    names: HashMap<String, NameSet>,
    groups: GroupIdAllocator,
    global_instances: HashMap<String, u32>,
    tag: GroupedTag,
}

impl Default for StyleSheet {
    fn default() -> Self {
        Self::new(SheetOptions::default())
    }
}

impl fmt::Debug for StyleSheet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StyleSheet")
            .field("options", &self.options)
            .field("components", &self.names.len())
            .field("rules", &self.tag.rule_count())
            .finish()
    }
}

impl StyleSheet {
    /// A sheet backed by an in-memory [`VirtualTag`].
    pub fn new(options: SheetOptions) -> Self {
        Self::with_tag(options, Box::new(VirtualTag::new()))
    }

    /// A sheet backed by any tag, e.g. a [`LiveTag`] over a host sheet.
    pub fn with_tag(options: SheetOptions, tag: Box<dyn Tag>) -> Self {
        Self {
            options,
            names: HashMap::new(),
            groups: GroupIdAllocator::new(),
            global_instances: HashMap::new(),
            tag: GroupedTag::new(tag),
        }
    }

    /// A new sheet over `tag` that keeps this sheet's names and group
    /// assignments but none of its rule text.
    pub fn reconstruct_with_tag(&self, options: SheetOptions, tag: Box<dyn Tag>) -> Self {
        Self {
            options,
            names: self.names.clone(),
            groups: self.groups.clone(),
            global_instances: self.global_instances.clone(),
            tag: GroupedTag::new(tag),
        }
    }

    #[inline]
    pub fn options(&self) -> &SheetOptions {
        &self.options
    }

    #[inline]
    pub fn is_production(&self) -> bool {
        self.options.production
    }

    /// Reserve a group for `id`. Call once per style definition, at
    /// definition time, so output follows definition order.
    pub fn register_id(&mut self, id: &str) -> Result<u32> {
        self.groups.group_for_id(id)
    }

    /// Group assigned to `id`, if any.
    #[inline]
    pub fn group_for_id(&self, id: &str) -> Option<u32> {
        self.groups.get(id)
    }

    #[inline]
    pub fn id_for_group(&self, group: u32) -> Option<&str> {
        self.groups.id_for_group(group)
    }

    /// Whether rules for `(id, name)` were already emitted.
    #[inline]
    pub fn has_name_for_id(&self, id: &str, name: &str) -> bool {
        self.names.get(id).is_some_and(|set| set.lookup.contains(name))
    }

    /// Number of names emitted for `id`.
    #[inline]
    pub fn name_count(&self, id: &str) -> usize {
        self.names.get(id).map_or(0, |set| set.order.len())
    }

    /// Names emitted for `id`, in emission order.
    pub fn names_for_id(&self, id: &str) -> impl Iterator<Item = &str> + '_ {
        self.names
            .get(id)
            .into_iter()
            .flat_map(|set| set.order.iter().map(String::as_str))
    }

    /// Mark `(id, name)` as present without inserting rule text.
    pub fn register_name(&mut self, id: &str, name: &str) -> Result<()> {
        self.groups.group_for_id(id)?;
        self.names.entry(id.to_string()).or_default().insert(name);
        Ok(())
    }

    /// Mark `(id, name)` present and append `rules` to the group of `id`.
    pub fn insert_rules(&mut self, id: &str, name: &str, rules: &[String]) -> Result<()> {
        self.register_name(id, name)?;
        let group = self.groups.group_for_id(id)?;
        tracing::trace!(id, name, group, count = rules.len(), "inserting rules");
        self.tag.insert_rules(group, rules)
    }

    /// Forget every name of `id`; rule text stays.
    pub fn clear_names(&mut self, id: &str) {
        if let Some(set) = self.names.get_mut(id) {
            set.clear();
        }
    }

    /// Delete the rule text and names of `id`.
    pub fn clear_rules(&mut self, id: &str) -> Result<()> {
        let group = self.groups.group_for_id(id)?;
        self.tag.clear_group(group);
        self.clear_names(id);
        Ok(())
    }

    /// Count another mounted instance of global style `id`.
    pub fn allocate_gs_instance(&mut self, id: &str) -> u32 {
        let count = self.global_instances.entry(id.to_string()).or_insert(0);
        *count += 1;
        *count
    }

    /// Commit a generation pass. Entries whose name is already present are
    /// skipped, so flushing the same work twice inserts it once.
    ///
    /// On error the failing entry and everything after it stay in `buffer`.
    pub fn flush_styles(&mut self, buffer: &mut InsertionBuffer) -> Result<()> {
        let mut entries = buffer.take().into_iter();
        while let Some(pending) = entries.next() {
            if self.has_name_for_id(&pending.component_id, &pending.name) {
                continue;
            }
            if let Err(err) = self.insert_rules(&pending.component_id, &pending.name, &pending.rules) {
                buffer.requeue(std::iter::once(pending).chain(entries));
                return Err(err);
            }
        }
        Ok(())
    }

    /// Total rule count in the underlying tag.
    #[inline]
    pub fn rule_count(&self) -> usize {
        self.tag.rule_count()
    }

    /// Rule text of one group, each rule followed by the splitter.
    pub fn group_text(&self, group: u32) -> String {
        self.tag.get_group(group)
    }

    /// Full stylesheet text with rehydration markers, groups in id order.
    pub fn get_style_text(&self) -> String {
        rehydrate::output_sheet(self)
    }

    /// Which names each group carries, groups in id order.
    pub fn get_manifest(&self) -> Vec<ManifestEntry> {
        rehydrate::manifest(self)
    }

    /// Load previously emitted stylesheet text (the body of a `<style>`
    /// block) into this sheet.
    pub fn rehydrate(&mut self, css: &str) -> Result<()> {
        rehydrate::rehydrate_sheet(self, css)
    }

    /// Scan server-rendered markup for style blocks written by this engine
    /// version and rehydrate each.
    pub fn rehydrate_from_markup(&mut self, html: &str) -> Result<()> {
        rehydrate::rehydrate_from_markup(self, html)
    }
}

impl fmt::Display for StyleSheet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.get_style_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SPLITTER;
    use crate::buffer::PendingRules;
    use crate::error::StyleError;
    use crate::sheet::tag::tests::PickySheet;

    fn lines(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn insert_marks_name_present() {
        let mut sheet = StyleSheet::default();
        assert!(!sheet.has_name_for_id("A", "x"));
        sheet.insert_rules("A", "x", &lines(&[".x{color:red;}"])).unwrap();
        assert!(sheet.has_name_for_id("A", "x"));
        assert!(!sheet.has_name_for_id("B", "x"));
        assert_eq!(sheet.rule_count(), 1);
    }

    #[test]
    fn output_follows_registration_not_insertion() {
        let mut sheet = StyleSheet::default();
        sheet.register_id("A").unwrap();
        sheet.register_id("B").unwrap();
        sheet.register_id("C").unwrap();

        sheet.insert_rules("C", "c", &lines(&[".c{}"])).unwrap();
        sheet.insert_rules("B", "b", &lines(&[".b{}"])).unwrap();
        sheet.insert_rules("A", "a", &lines(&[".a{}"])).unwrap();

        let css = sheet.to_string();
        let a = css.find(".a{}").unwrap();
        let b = css.find(".b{}").unwrap();
        let c = css.find(".c{}").unwrap();
        assert!(a < b && b < c);
    }

    #[test]
    fn flush_inserts_each_name_once() {
        let mut sheet = StyleSheet::default();
        let mut buffer = InsertionBuffer::new();
        buffer.push(PendingRules::new("A", "x", lines(&[".x{}"])));
        buffer.push(PendingRules::new("A", "x", lines(&[".x{}"])));
        sheet.flush_styles(&mut buffer).unwrap();

        assert!(buffer.is_empty());
        assert_eq!(sheet.rule_count(), 1);

        buffer.push(PendingRules::new("A", "x", lines(&[".x{}"])));
        sheet.flush_styles(&mut buffer).unwrap();
        assert_eq!(sheet.rule_count(), 1);
    }

    #[test]
    fn clear_rules_drops_text_and_names() {
        let mut sheet = StyleSheet::default();
        sheet.insert_rules("G1", "G1", &lines(&["body{margin:0;}"])).unwrap();
        sheet.insert_rules("B", "b", &lines(&[".b{}"])).unwrap();
        sheet.clear_rules("G1").unwrap();

        assert!(!sheet.has_name_for_id("G1", "G1"));
        assert_eq!(sheet.rule_count(), 1);
        assert_eq!(sheet.names_for_id("B").collect::<Vec<_>>(), vec!["b"]);
    }

    #[test]
    fn rejected_rules_keep_their_name() {
        let tag = LiveTag::new(PickySheet::default());
        let mut sheet = StyleSheet::with_tag(SheetOptions::default(), Box::new(tag));
        sheet.insert_rules("A", "x", &lines(&[".x{color:invalid;}"])).unwrap();

        // known but not backed by a rule
        assert!(sheet.has_name_for_id("A", "x"));
        assert_eq!(sheet.rule_count(), 0);
        assert_eq!(sheet.get_style_text(), "");
        // nothing was emitted, so nothing is listed either
        assert!(sheet.get_manifest().is_empty());
    }

    #[test]
    fn failed_flush_keeps_the_rest_queued() {
        let mut sheet = StyleSheet::default();
        sheet.register_id("A").unwrap();
        sheet.groups.set_group_for_id("Last", MAX_GROUP);

        let mut buffer = InsertionBuffer::new();
        buffer.push(PendingRules::new("A", "x", lines(&[".x{}"])));
        buffer.push(PendingRules::new("Unplaced", "y", lines(&[".y{}"])));
        buffer.push(PendingRules::new("A", "z", lines(&[".z{}"])));

        assert_eq!(
            sheet.flush_styles(&mut buffer),
            Err(StyleError::GroupOverflow { limit: MAX_GROUP })
        );
        assert!(sheet.has_name_for_id("A", "x"));
        assert_eq!(sheet.rule_count(), 1);

        let queued: Vec<&str> = buffer.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(queued, vec!["y", "z"]);
    }

    #[test]
    fn global_instances_count_up() {
        let mut sheet = StyleSheet::default();
        assert_eq!(sheet.allocate_gs_instance("sc-global"), 1);
        assert_eq!(sheet.allocate_gs_instance("sc-global"), 2);
        assert_eq!(sheet.allocate_gs_instance("other"), 1);
    }

    #[test]
    fn reconstruct_keeps_names_not_rules() {
        let mut sheet = StyleSheet::default();
        sheet.insert_rules("A", "x", &lines(&[".x{}"])).unwrap();
        let fresh = sheet.reconstruct_with_tag(SheetOptions::default(), Box::new(VirtualTag::new()));
        assert!(fresh.has_name_for_id("A", "x"));
        assert_eq!(fresh.group_for_id("A"), sheet.group_for_id("A"));
        assert_eq!(fresh.rule_count(), 0);
    }

    #[test]
    fn group_text_has_splitters() {
        let mut sheet = StyleSheet::default();
        let group = sheet.register_id("A").unwrap();
        sheet.insert_rules("A", "x", &lines(&[".x{}", ".x:hover{}"])).unwrap();
        assert_eq!(sheet.group_text(group), format!(".x{{}}{SPLITTER}.x:hover{{}}{SPLITTER}"));
    }
}
