//! Right-to-left transform plugin.

use super::StylisPlugin;
use super::parse::split_top_level;

/// Mirrors horizontal properties and values for right-to-left layouts.
///
/// - `margin-left` ↔ `margin-right`, `left` ↔ `right`, ...
/// - `float`, `clear`, `text-align`: `left` ↔ `right`
/// - four-value `margin`/`padding`/`inset`/`border-{width,style,color}`:
///   second and fourth values swap
/// - four-value `border-radius`: `a b c d` → `b a d c`
#[derive(Clone, Copy, Debug, Default)]
pub struct RtlPlugin;

impl RtlPlugin {
    pub const NAME: &'static str = "rtl";
}

impl StylisPlugin for RtlPlugin {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn transform(&self, declarations: &str, _selector: &str, _parent: Option<&str>, _component_id: &str) -> String {
        let mut out = String::with_capacity(declarations.len());
        for decl in split_top_level(declarations, ';') {
            let Some((prop, value)) = decl.split_once(':') else {
                continue;
            };
            let prop = flip_property(prop);
            let value = flip_value(&prop, value);
            out.push_str(&prop);
            out.push(':');
            out.push_str(&value);
            out.push(';');
        }
        out
    }
}

fn flip_property(prop: &str) -> String {
    prop.split('-')
        .map(|part| match part {
            "left" => "right",
            "right" => "left",
            other => other,
        })
        .collect::<Vec<_>>()
        .join("-")
}

fn flip_value(prop: &str, value: &str) -> String {
    let (value, important) = match value.strip_suffix("!important") {
        Some(rest) => (rest.trim_end(), "!important"),
        None => (value, ""),
    };

    let flipped = match prop {
        "float" | "clear" | "text-align" => match value {
            "left" => "right".to_string(),
            "right" => "left".to_string(),
            other => other.to_string(),
        },
        "margin" | "padding" | "inset" | "border-width" | "border-style" | "border-color" => {
            let mut parts = split_top_level(value, ' ');
            if parts.len() == 4 {
                parts.swap(1, 3);
            }
            parts.join(" ")
        }
        "border-radius" if !value.contains('/') => {
            let parts = split_top_level(value, ' ');
            if let [a, b, c, d] = parts.as_slice() {
                format!("{b} {a} {d} {c}")
            } else {
                value.to_string()
            }
        }
        _ => value.to_string(),
    };

    if important.is_empty() {
        flipped
    } else {
        format!("{flipped} {important}")
    }
}
