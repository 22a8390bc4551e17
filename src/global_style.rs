//! Unscoped global rules, owned per mounted instance.

use crate::buffer::InsertionBuffer;
use crate::error::Result;
use crate::flatten::flatten;
use crate::rules::{ExecutionContext, Interpolation, RuleSet};
use crate::sheet::StyleSheet;
use crate::stylis::Stylis;

/// Rules emitted without a wrapping class, e.g. `body { margin: 0 }`.
///
/// Each mounted instance owns the group `component_id + instance`, so
/// instances can re-render and unmount independently.
#[derive(Clone, Debug)]
pub struct GlobalStyle {
    rules: RuleSet,
    component_id: String,
    is_static: bool,
}

impl GlobalStyle {
    pub fn new(rules: RuleSet, component_id: impl Into<String>) -> Self {
        let is_static = rules.is_static();
        Self {
            rules,
            component_id: component_id.into(),
            is_static,
        }
    }

    /// Reserve the group of the first instance so global rules sort by
    /// definition order like component rules.
    pub fn register(&self, sheet: &mut StyleSheet) -> Result<u32> {
        sheet.register_id(&self.instance_id(1))
    }

    #[inline]
    pub fn component_id(&self) -> &str {
        &self.component_id
    }

    #[inline]
    pub fn is_static(&self) -> bool {
        self.is_static
    }

    /// Sheet id of one mounted instance.
    pub fn instance_id(&self, instance: u32) -> String {
        format!("{}{}", self.component_id, instance)
    }

    /// Flatten, transform and insert the rules of `instance`.
    pub fn create_styles(
        &self,
        instance: u32,
        context: &ExecutionContext,
        sheet: &mut StyleSheet,
        stylis: &Stylis,
    ) -> Result<()> {
        let id = self.instance_id(instance);
        let mut buffer = InsertionBuffer::new();
        let css = flatten(&Interpolation::Rules(self.rules.clone()), context, sheet, stylis, &mut buffer)?.concat();
        let rules = stylis.compile(&css, "", None, &id)?;

        sheet.flush_styles(&mut buffer)?;
        sheet.insert_rules(&id, &id, &rules)
    }

    /// Delete the rules of `instance`.
    pub fn remove_styles(&self, instance: u32, sheet: &mut StyleSheet) -> Result<()> {
        sheet.clear_rules(&self.instance_id(instance))
    }

    /// Replace the rules of `instance` with a fresh render.
    pub fn render_styles(
        &self,
        instance: u32,
        context: &ExecutionContext,
        sheet: &mut StyleSheet,
        stylis: &Stylis,
    ) -> Result<()> {
        // later instances sort after every group registered so far
        sheet.register_id(&self.instance_id(instance))?;
        self.remove_styles(instance, sheet)?;
        self.create_styles(instance, context, sheet, stylis)
    }
}
