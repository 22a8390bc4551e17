//! Class name generation for one style definition.
//!
//! ## Generation
//!
//! ```text
//! generate_and_insert(ctx, &sheet, &stylis)
//!   ├─ base style first (its names prefix ours)
//!   ├─ static:  cached (name, css), flattened once per instance
//!   └─ dynamic: flatten per fragment, hash, transform only when new
//!   → ("base-name name", InsertionBuffer)
//! ```
//!
//! Nothing reaches the sheet until the caller flushes the returned buffer.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

use crate::buffer::{InsertionBuffer, PendingRules};
use crate::error::Result;
use crate::flatten::flatten;
use crate::hash::{SEED, generate_alphabetic_name, phash};
use crate::rules::{ExecutionContext, Interpolation, RuleSet};
use crate::sheet::StyleSheet;
use crate::stylis::Stylis;

/// Distinct class names per component before a development warning.
pub const TOO_MANY_CLASSES: usize = 200;

/// Flattened CSS and name of a static style, computed once.
#[derive(Debug)]
struct StaticRules {
    name: String,
    css: String,
}

/// A style definition bound to a component id.
#[derive(Debug)]
pub struct ComponentStyle {
    rules: RuleSet,
    component_id: String,
    base_style: Option<Arc<ComponentStyle>>,
    is_static: bool,
    base_hash: u32,
    static_cache: OnceLock<StaticRules>,
    warned: AtomicBool,
}

impl ComponentStyle {
    /// Define a style. Register it with each sheet via [`register`] right
    /// away so its rules sort by definition order.
    ///
    /// [`register`]: ComponentStyle::register
    pub fn new(rules: RuleSet, component_id: impl Into<String>, base_style: Option<Arc<ComponentStyle>>) -> Self {
        let component_id = component_id.into();
        let is_static = rules.is_static() && base_style.as_ref().is_none_or(|base| base.is_static);
        let base_hash = phash(SEED, &component_id);
        Self {
            rules,
            component_id,
            base_style,
            is_static,
            base_hash,
            static_cache: OnceLock::new(),
            warned: AtomicBool::new(false),
        }
    }

    /// Reserve this component's group in `sheet`.
    pub fn register(&self, sheet: &mut StyleSheet) -> Result<u32> {
        sheet.register_id(&self.component_id)
    }

    #[inline]
    pub fn component_id(&self) -> &str {
        &self.component_id
    }

    #[inline]
    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    #[inline]
    pub fn base_style(&self) -> Option<&Arc<ComponentStyle>> {
        self.base_style.as_ref()
    }

    /// Whether the rules and the whole base chain are context-independent.
    #[inline]
    pub fn is_static(&self) -> bool {
        self.is_static
    }

    /// Class names for `context`, plus the rules the sheet does not have yet.
    ///
    /// Does not touch `sheet`; commit with [`StyleSheet::flush_styles`].
    pub fn generate_and_insert(
        &self,
        context: &ExecutionContext,
        sheet: &StyleSheet,
        stylis: &Stylis,
    ) -> Result<(String, InsertionBuffer)> {
        let mut buffer = InsertionBuffer::new();
        let names = self.generate(context, sheet, stylis, &mut buffer, true)?;
        Ok((names, buffer))
    }

    /// Class names only; nothing is transformed or queued.
    pub fn generate_class_name(&self, context: &ExecutionContext, sheet: &StyleSheet, stylis: &Stylis) -> Result<String> {
        let mut scratch = InsertionBuffer::new();
        self.generate(context, sheet, stylis, &mut scratch, false)
    }

    /// Generate and flush in one step.
    pub fn insert_styles(&self, context: &ExecutionContext, sheet: &mut StyleSheet, stylis: &Stylis) -> Result<String> {
        let (names, mut buffer) = self.generate_and_insert(context, sheet, stylis)?;
        sheet.flush_styles(&mut buffer)?;
        Ok(names)
    }

    fn generate(
        &self,
        context: &ExecutionContext,
        sheet: &StyleSheet,
        stylis: &Stylis,
        buffer: &mut InsertionBuffer,
        emit: bool,
    ) -> Result<String> {
        let mut names = match &self.base_style {
            Some(base) => base.generate(context, sheet, stylis, buffer, emit)?,
            None => String::new(),
        };

        let own = if self.is_static && sheet.is_production() && !stylis.has_plugins() {
            Some(self.generate_static(context, sheet, stylis, buffer, emit)?)
        } else {
            self.generate_dynamic(context, sheet, stylis, buffer, emit)?
        };

        if let Some(name) = own {
            if !names.is_empty() {
                names.push(' ');
            }
            names.push_str(&name);
        }

        if emit && !sheet.is_production() {
            self.warn_if_too_many_classes(sheet, buffer);
        }

        Ok(names)
    }

    fn generate_static(
        &self,
        context: &ExecutionContext,
        sheet: &StyleSheet,
        stylis: &Stylis,
        buffer: &mut InsertionBuffer,
        emit: bool,
    ) -> Result<String> {
        let cached = match self.static_cache.get() {
            Some(cached) => cached,
            None => {
                let css = flatten(&Interpolation::Rules(self.rules.clone()), context, sheet, stylis, buffer)?.concat();
                let name = generate_alphabetic_name(phash(self.base_hash, &css));
                self.static_cache.get_or_init(|| StaticRules { name, css })
            }
        };

        if emit {
            self.queue(&cached.name, &cached.css, sheet, stylis, buffer)?;
        }
        Ok(cached.name.clone())
    }

    fn generate_dynamic(
        &self,
        context: &ExecutionContext,
        sheet: &StyleSheet,
        stylis: &Stylis,
        buffer: &mut InsertionBuffer,
        emit: bool,
    ) -> Result<Option<String>> {
        let mut css = String::new();
        let mut dynamic_hash = phash(self.base_hash, stylis.hash());

        for (i, part) in self.rules.iter().enumerate() {
            match part {
                Interpolation::Str(literal) => {
                    css.push_str(literal);
                    if !sheet.is_production() {
                        dynamic_hash = phash(dynamic_hash, literal);
                    }
                }
                part if part.is_falsish() => {}
                part => {
                    let flat = flatten(part, context, sheet, stylis, buffer)?.concat();
                    dynamic_hash = phash(dynamic_hash, &format!("{flat}{i}"));
                    css.push_str(&flat);
                }
            }
        }

        if css.is_empty() {
            return Ok(None);
        }

        let name = generate_alphabetic_name(dynamic_hash);
        if emit {
            self.queue(&name, &css, sheet, stylis, buffer)?;
        }
        Ok(Some(name))
    }

    /// Transform `css` under `.name` and buffer it, unless already known.
    fn queue(&self, name: &str, css: &str, sheet: &StyleSheet, stylis: &Stylis, buffer: &mut InsertionBuffer) -> Result<()> {
        if sheet.has_name_for_id(&self.component_id, name) || buffer.contains(&self.component_id, name) {
            return Ok(());
        }
        let rules = stylis.compile(css, &format!(".{name}"), None, &self.component_id)?;
        buffer.push(PendingRules::new(self.component_id.clone(), name, rules));
        Ok(())
    }

    fn warn_if_too_many_classes(&self, sheet: &StyleSheet, buffer: &InsertionBuffer) {
        let pending = buffer.iter().filter(|p| p.component_id == self.component_id).count();
        let count = sheet.name_count(&self.component_id) + pending;
        if count >= TOO_MANY_CLASSES && !self.warned.swap(true, Ordering::Relaxed) {
            tracing::warn!(
                component_id = %self.component_id,
                count,
                "over {TOO_MANY_CLASSES} classes were generated for this component; \
                 consider inline styles or attributes for frequently changing values"
            );
        }
    }
}
