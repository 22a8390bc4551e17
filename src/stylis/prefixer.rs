//! Vendor prefixing for older browsers.

use super::StylisPlugin;
use super::parse::split_top_level;

/// Adds `-webkit-`, `-moz-` and `-ms-` variants ahead of the standard
/// declaration for properties and values that still need them.
///
/// Enabled through [`StylisOptions::prefix`](super::StylisOptions::prefix);
/// runs before any user plugin.
#[derive(Clone, Copy, Debug, Default)]
pub struct PrefixerPlugin;

impl PrefixerPlugin {
    pub const NAME: &'static str = "prefixer";
}

/// Properties that only ever gained a `-webkit-` form.
const WEBKIT: &[&str] = &[
    "animation",
    "animation-delay",
    "animation-direction",
    "animation-duration",
    "animation-fill-mode",
    "animation-iteration-count",
    "animation-name",
    "animation-play-state",
    "animation-timing-function",
    "backdrop-filter",
    "backface-visibility",
    "box-decoration-break",
    "clip-path",
    "column-count",
    "column-gap",
    "columns",
    "flex-basis",
    "flex-flow",
    "flex-grow",
    "flex-shrink",
    "mask",
    "mask-image",
    "mask-position",
    "mask-repeat",
    "mask-size",
    "perspective",
    "text-decoration",
    "text-size-adjust",
    "transform",
    "transform-origin",
    "transition",
    "transition-delay",
    "transition-duration",
    "transition-property",
    "transition-timing-function",
];

/// Properties prefixed for every engine.
const ALL_ENGINES: &[&str] = &["appearance", "hyphens", "user-select"];

/// Flexbox properties with their legacy IE10 name.
const FLEX_MS: &[(&str, &str)] = &[
    ("flex", "-ms-flex"),
    ("flex-direction", "-ms-flex-direction"),
    ("flex-wrap", "-ms-flex-wrap"),
    ("order", "-ms-flex-order"),
    ("align-items", "-ms-flex-align"),
    ("align-self", "-ms-flex-item-align"),
    ("align-content", "-ms-flex-line-pack"),
    ("justify-content", "-ms-flex-pack"),
];

/// Values that size to content.
const INTRINSIC_SIZES: &[&str] = &["fit-content", "max-content", "min-content"];

impl StylisPlugin for PrefixerPlugin {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn transform(&self, declarations: &str, _selector: &str, _parent: Option<&str>, _component_id: &str) -> String {
        let mut out = String::with_capacity(declarations.len() * 2);
        for decl in split_top_level(declarations, ';') {
            let Some((prop, value)) = decl.split_once(':') else {
                continue;
            };
            prefix_declaration(prop, value, &mut out);
            push(&mut out, prop, value);
        }
        out
    }
}

fn push(out: &mut String, prop: &str, value: &str) {
    out.push_str(prop);
    out.push(':');
    out.push_str(value);
    out.push(';');
}

/// Append the vendor variants of `prop:value`, not the declaration itself.
fn prefix_declaration(prop: &str, value: &str, out: &mut String) {
    if prop.starts_with('-') {
        return;
    }

    if WEBKIT.contains(&prop) {
        push(out, &format!("-webkit-{prop}"), value);
    }

    if ALL_ENGINES.contains(&prop) {
        push(out, &format!("-webkit-{prop}"), value);
        push(out, &format!("-moz-{prop}"), value);
        push(out, &format!("-ms-{prop}"), value);
    }

    if let Some(&(_, ms)) = FLEX_MS.iter().find(|(name, _)| *name == prop) {
        push(out, &format!("-webkit-{prop}"), value);
        push(out, ms, &legacy_flex_value(value));
    }

    match (prop, value) {
        ("display", "flex") => {
            push(out, prop, "-webkit-box");
            push(out, prop, "-webkit-flex");
            push(out, prop, "-ms-flexbox");
        }
        ("display", "inline-flex") => {
            push(out, prop, "-webkit-inline-box");
            push(out, prop, "-webkit-inline-flex");
            push(out, prop, "-ms-inline-flexbox");
        }
        ("position", "sticky") => push(out, prop, "-webkit-sticky"),
        ("tab-size", _) => push(out, "-moz-tab-size", value),
        (
            "width" | "height" | "min-width" | "min-height" | "max-width" | "max-height",
            _,
        ) if INTRINSIC_SIZES.contains(&value) => {
            push(out, prop, &format!("-webkit-{value}"));
            push(out, prop, &format!("-moz-{value}"));
        }
        _ => {}
    }
}

/// IE10 spelled the box alignment keywords differently.
fn legacy_flex_value(value: &str) -> String {
    match value {
        "flex-start" => "start".to_string(),
        "flex-end" => "end".to_string(),
        "space-between" => "justify".to_string(),
        "space-around" => "distribute".to_string(),
        other => other.to_string(),
    }
}
