//! Component id generation from display names.

use std::collections::HashMap;

use crate::SC_VERSION;
use crate::hash::generate_component_id;

/// Hands out unique, readable component ids: `Button-kGxTp`, `Button-bXVhbT`.
///
/// The same display name gets a new id on every call; ids are stable across
/// runs as long as components are defined in the same order.
#[derive(Clone, Debug, Default)]
pub struct ComponentIdGenerator {
    counts: HashMap<String, u32>,
}

impl ComponentIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next id for `display_name`, nested under `parent` when given.
    pub fn generate(&mut self, display_name: &str, parent: Option<&str>) -> String {
        let name = escape(display_name);
        let count = self.counts.entry(name.clone()).or_insert(0);
        *count += 1;

        let id = format!("{name}-{}", generate_component_id(&format!("{SC_VERSION}{name}{count}")));
        match parent {
            Some(parent) => format!("{parent}-{id}"),
            None => id,
        }
    }
}

/// Replace runs of characters outside `[A-Za-z0-9_-]` with `-` and trim
/// dashes; `sc` when nothing is left.
pub fn escape(display_name: &str) -> String {
    let mut out = String::with_capacity(display_name.len());
    let mut pending_dash = false;
    for c in display_name.chars() {
        if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
            if pending_dash {
                out.push('-');
                pending_dash = false;
            }
            out.push(c);
        } else {
            pending_dash = true;
        }
    }

    let trimmed = out.trim_matches('-');
    if trimmed.is_empty() {
        "sc".to_string()
    } else {
        trimmed.to_string()
    }
}
