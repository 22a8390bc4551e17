//! Turns flattened component CSS into standalone rules.
//!
//! ```text
//! compile("color:red; &:hover{color:blue}", ".abc", None, "Button-x")
//!   → [".abc{color:red;}", ".abc:hover{color:blue;}"]
//! ```
//!
//! Plugins see each emitted style rule's declaration block and may rewrite
//! it. The plugin set is part of every dynamic class name through
//! [`Stylis::hash`].

mod parse;
mod prefixer;
mod rtl;

use std::fmt;
use std::sync::Arc;

pub use prefixer::PrefixerPlugin;
pub use rtl::RtlPlugin;

use self::parse::{Node, collapse_whitespace, split_top_level};
use crate::error::{Result, StyleError};
use crate::hash::{DJB2_SEED, phash};

/// Rewrites the declarations of one emitted style rule.
pub trait StylisPlugin: Send + Sync {
    /// Stable, non-empty name; it feeds [`Stylis::hash`].
    fn name(&self) -> &str;

    /// Rewrite `declarations` (`prop:value;` pairs) of the rule whose
    /// resolved selector list is `selector`. `parent` is the enclosing
    /// at-rule prelude, if any.
    fn transform(&self, declarations: &str, selector: &str, parent: Option<&str>, component_id: &str) -> String;
}

/// Options fixed when the transform is built.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StylisOptions {
    /// Selector prepended to every emitted style rule, e.g. `#app`.
    pub namespace: Option<String>,
    /// Add vendor-prefixed declarations through [`PrefixerPlugin`], ahead
    /// of the other plugins.
    pub prefix: bool,
}

/// A configured CSS transform.
#[derive(Clone, Default)]
pub struct Stylis {
    options: StylisOptions,
    plugins: Vec<Arc<dyn StylisPlugin>>,
    hash: String,
}

impl fmt::Debug for Stylis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.plugins.iter().map(|p| p.name()).collect();
        f.debug_struct("Stylis")
            .field("options", &self.options)
            .field("plugins", &names)
            .field("hash", &self.hash)
            .finish()
    }
}

impl Stylis {
    /// Transform without plugins or namespace.
    pub fn new() -> Self {
        Self::default()
    }

    /// Transform with options and an ordered plugin list.
    ///
    /// With [`StylisOptions::prefix`] set, the prefixer runs first and is
    /// folded into [`Stylis::hash`] like any other plugin.
    pub fn with_plugins(options: StylisOptions, plugins: Vec<Arc<dyn StylisPlugin>>) -> Result<Self> {
        if plugins.iter().any(|p| p.name().is_empty()) {
            return Err(StyleError::UnnamedPlugin);
        }

        let plugins: Vec<Arc<dyn StylisPlugin>> = if options.prefix {
            std::iter::once(Arc::new(PrefixerPlugin) as Arc<dyn StylisPlugin>)
                .chain(plugins)
                .collect()
        } else {
            plugins
        };

        let hash = if plugins.is_empty() {
            String::new()
        } else {
            let folded = plugins.iter().fold(DJB2_SEED, |h, p| phash(h, p.name()));
            (folded as i32).to_string()
        };

        Ok(Self {
            options,
            plugins,
            hash,
        })
    }

    /// Transform with only a namespace.
    pub fn with_namespace(namespace: impl Into<String>) -> Self {
        Self {
            options: StylisOptions {
                namespace: Some(namespace.into()),
                ..StylisOptions::default()
            },
            ..Self::default()
        }
    }

    /// Plugin fingerprint; empty without plugins.
    #[inline]
    pub fn hash(&self) -> &str {
        &self.hash
    }

    #[inline]
    pub fn has_plugins(&self) -> bool {
        !self.plugins.is_empty()
    }

    #[inline]
    pub fn namespace(&self) -> Option<&str> {
        self.options.namespace.as_deref()
    }

    #[inline]
    pub fn is_prefixing(&self) -> bool {
        self.options.prefix
    }

    #[inline]
    pub fn options(&self) -> &StylisOptions {
        &self.options
    }

    /// Compile `css` into standalone rules.
    ///
    /// The input is wrapped as `<prefix> <selector>{css}` when either is
    /// given; with neither, `css` must already be a list of rules. Hoisted
    /// statements (`@import`, `@charset`, `@namespace`) come first.
    pub fn compile(&self, css: &str, selector: &str, prefix: Option<&str>, component_id: &str) -> Result<Vec<String>> {
        let malformed = |reason: String| StyleError::MalformedCss {
            component_id: component_id.to_string(),
            reason,
        };

        let css = parse::strip_comments(css).map_err(malformed)?;
        let source = match (prefix, selector) {
            (None, "") => css,
            (Some(prefix), selector) => format!("{prefix} {selector}{{{css}}}"),
            (None, selector) => format!("{selector}{{{css}}}"),
        };
        let nodes = parse::parse(&source).map_err(malformed)?;

        let mut compiler = Compiler {
            stylis: self,
            root: selector.trim(),
            component_id,
            hoisted: Vec::new(),
        };
        let mut rules = Vec::new();
        compiler.emit_rule(&[], &nodes, None, &mut rules);

        let mut out = compiler.hoisted;
        out.extend(rules);
        Ok(out)
    }
}

// ============================================================================
// Rule emission
// ============================================================================

/// At-rules whose children are resolved against the enclosing selectors.
const NESTING_AT_RULES: &[&str] = &["media", "supports", "container", "layer", "document"];

/// Statements emitted ahead of every rule.
const HOISTED_AT_RULES: &[&str] = &["import", "charset", "namespace"];

struct Compiler<'a> {
    stylis: &'a Stylis,
    /// The component's own selector, e.g. `.abc`.
    root: &'a str,
    component_id: &'a str,
    hoisted: Vec<String>,
}

impl Compiler<'_> {
    /// Emit the declarations of `children` under `selectors`, then every
    /// nested rule.
    fn emit_rule(&mut self, selectors: &[String], children: &[Node], parent: Option<&str>, out: &mut Vec<String>) {
        let mut decls = String::new();
        for child in children {
            if let Node::Decl { prop, value } = child {
                decls.push_str(prop);
                decls.push(':');
                decls.push_str(value);
                decls.push(';');
            }
        }

        if !selectors.is_empty() && !decls.is_empty() {
            let selector = self.namespaced(selectors);
            for plugin in &self.stylis.plugins {
                decls = plugin.transform(&decls, &selector, parent, self.component_id);
            }
            if !decls.is_empty() {
                out.push(format!("{selector}{{{decls}}}"));
            }
        }

        for child in children {
            match child {
                Node::Decl { .. } => {}
                Node::Statement(statement) => self.statement(statement, out),
                Node::Block { prelude, children } if prelude.starts_with('@') => {
                    let name = at_rule_name(prelude);
                    if NESTING_AT_RULES.contains(&name.as_str()) {
                        let mut inner = Vec::new();
                        self.emit_rule(selectors, children, Some(prelude.as_str()), &mut inner);
                        if !inner.is_empty() {
                            out.push(format!("{prelude}{{{}}}", inner.concat()));
                        }
                    } else {
                        let body = serialize_verbatim(children);
                        if !body.is_empty() || name == "font-face" {
                            out.push(format!("{prelude}{{{body}}}"));
                        }
                    }
                }
                Node::Block { prelude, children } => {
                    let resolved = self.resolve(selectors, prelude);
                    self.emit_rule(&resolved, children, parent, out);
                }
            }
        }
    }

    fn statement(&mut self, statement: &str, out: &mut Vec<String>) {
        if HOISTED_AT_RULES.contains(&at_rule_name(statement).as_str()) {
            self.hoisted.push(format!("{statement};"));
        } else {
            out.push(format!("{statement};"));
        }
    }

    /// Resolve a nested selector list against its parents.
    ///
    /// `&` stands for each parent; a child without `&` is a descendant.
    fn resolve(&self, parents: &[String], prelude: &str) -> Vec<String> {
        let children: Vec<String> = split_top_level(prelude, ',')
            .into_iter()
            .map(normalize_selector)
            .filter(|s| !s.is_empty())
            .collect();

        if parents.is_empty() {
            return children;
        }

        let mut resolved = Vec::with_capacity(children.len() * parents.len());
        for child in &children {
            for parent in parents {
                let selector = if child.contains('&') {
                    let joined = normalize_selector(&child.replace('&', parent));
                    self.replace_self_references(&joined)
                } else {
                    normalize_selector(&format!("{parent} {child}"))
                };
                resolved.push(selector);
            }
        }
        resolved
    }

    /// Every occurrence of the component's own selector after the first
    /// becomes `.<componentId>`, unless it directly follows another one
    /// (`&&` raises specificity instead).
    fn replace_self_references(&self, selector: &str) -> String {
        let root = self.root;
        if root.is_empty() || !root.starts_with('.') {
            return selector.to_string();
        }

        let mut out = String::with_capacity(selector.len());
        let mut seen = false;
        let mut rest = selector;

        while let Some(at) = rest.find(root) {
            let after = &rest[at + root.len()..];
            let whole_word = !after.starts_with(|c: char| c.is_ascii_alphanumeric() || c == '-' || c == '_');
            out.push_str(&rest[..at]);

            if whole_word {
                let consecutive = out.ends_with(root);
                if seen && !consecutive {
                    out.push('.');
                    out.push_str(self.component_id);
                } else {
                    out.push_str(root);
                }
                seen = true;
            } else {
                out.push_str(root);
            }
            rest = after;
        }
        out.push_str(rest);
        out
    }

    fn namespaced(&self, selectors: &[String]) -> String {
        match self.stylis.namespace() {
            Some(ns) => selectors
                .iter()
                .map(|s| format!("{ns} {s}"))
                .collect::<Vec<_>>()
                .join(","),
            None => selectors.join(","),
        }
    }
}

/// Lowercased at-rule name without `@` or vendor prefix.
fn at_rule_name(prelude: &str) -> String {
    let name: String = prelude
        .trim_start_matches('@')
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric() || *c == '-')
        .collect::<String>()
        .to_ascii_lowercase();
    for vendor in ["-webkit-", "-moz-", "-ms-", "-o-"] {
        if let Some(rest) = name.strip_prefix(vendor) {
            return rest.to_string();
        }
    }
    name
}

/// Whitespace collapsed; no spaces around `>`, `+`, `~`, or after commas.
fn normalize_selector(selector: &str) -> String {
    let collapsed = collapse_whitespace(selector);
    let mut out = String::with_capacity(collapsed.len());
    let mut chars = collapsed.chars().peekable();
    let mut brackets = 0usize;

    while let Some(c) = chars.next() {
        match c {
            '[' => brackets += 1,
            ']' => brackets = brackets.saturating_sub(1),
            _ => {}
        }
        if brackets == 0 && matches!(c, '>' | '+' | '~' | ',') {
            while out.ends_with(' ') {
                out.pop();
            }
            out.push(c);
            while chars.peek() == Some(&' ') {
                chars.next();
            }
            continue;
        }
        out.push(c);
    }
    out
}

/// Body of a block at-rule whose selectors are not component-relative.
fn serialize_verbatim(nodes: &[Node]) -> String {
    let mut out = String::new();
    for node in nodes {
        match node {
            Node::Decl { prop, value } => {
                out.push_str(prop);
                out.push(':');
                out.push_str(value);
                out.push(';');
            }
            Node::Block { prelude, children } => {
                out.push_str(&normalize_selector(prelude));
                out.push('{');
                out.push_str(&serialize_verbatim(children));
                out.push('}');
            }
            Node::Statement(statement) => {
                out.push_str(statement);
                out.push(';');
            }
        }
    }
    out
}
