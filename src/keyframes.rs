//! Keyframes definitions, named by the hash of their body.

use crate::buffer::{InsertionBuffer, PendingRules};
use crate::error::Result;
use crate::flatten::flatten;
use crate::hash::generate_component_id;
use crate::rules::{ExecutionContext, Interpolation, RuleSet};
use crate::sheet::StyleSheet;
use crate::stylis::Stylis;

/// An `@keyframes` block referenced by name from style rules.
///
/// The rule is injected lazily, the first time a referencing style is
/// generated against a sheet that does not have it yet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Keyframes {
    id: String,
    name: String,
    rules: String,
}

impl Keyframes {
    /// Keyframes from a rule set. Function fragments see an empty context.
    pub fn new(rules: RuleSet) -> Result<Self> {
        let sheet = StyleSheet::default();
        let mut scratch = InsertionBuffer::new();
        let css = flatten(
            &Interpolation::Rules(rules),
            &ExecutionContext::new(),
            &sheet,
            &Stylis::new(),
            &mut scratch,
        )?
        .concat();
        Ok(Self::from_css(css))
    }

    /// Keyframes from a plain body, e.g. `"from{opacity:0} to{opacity:1}"`.
    pub fn from_css(css: impl Into<String>) -> Self {
        let rules = css.into();
        let name = generate_component_id(&rules);
        Self {
            id: format!("sc-keyframes-{name}"),
            name,
            rules,
        }
    }

    /// Sheet id the `@keyframes` rule is stored under.
    #[inline]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Name without the plugin suffix.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn rules(&self) -> &str {
        &self.rules
    }

    /// Animation name under `stylis`: plugin sets give distinct names.
    pub fn resolved_name(&self, stylis: &Stylis) -> String {
        format!("{}{}", self.name, stylis.hash())
    }

    /// Queue the `@keyframes` rule unless `sheet` or `buffer` already has
    /// it, returning the resolved name.
    pub(crate) fn inject(&self, sheet: &StyleSheet, stylis: &Stylis, buffer: &mut InsertionBuffer) -> Result<String> {
        let name = self.resolved_name(stylis);
        if !sheet.has_name_for_id(&self.id, &name) && !buffer.contains(&self.id, &name) {
            let rules = stylis.compile(&self.rules, &name, Some("@keyframes"), &self.id)?;
            buffer.push(PendingRules::new(self.id.clone(), name.clone(), rules));
        }
        Ok(name)
    }
}
