//! Resolve a rule set against an execution context into a flat
//! list of CSS strings.

use crate::buffer::InsertionBuffer;
use crate::error::Result;
use crate::rules::{CssObject, ExecutionContext, Interpolation};
use crate::sheet::StyleSheet;
use crate::stylis::Stylis;

#[cfg(test)]
thread_local! {
    /// Number of top-level `flatten` calls on this thread.
    pub(crate) static FLATTEN_CALLS: std::cell::Cell<usize> = const { std::cell::Cell::new(0) };
}

/// Properties whose numeric values are emitted without a `px` suffix.
///
/// Stored lowercase with hyphens removed so both `zIndex` and `z-index` match.
const UNITLESS: &[&str] = &[
    "animationiterationcount",
    "aspectratio",
    "borderimageoutset",
    "borderimageslice",
    "borderimagewidth",
    "boxflex",
    "boxflexgroup",
    "boxordinalgroup",
    "columncount",
    "columns",
    "flex",
    "flexgrow",
    "flexpositive",
    "flexshrink",
    "flexnegative",
    "flexorder",
    "gridrow",
    "gridrowend",
    "gridrowspan",
    "gridrowstart",
    "gridcolumn",
    "gridcolumnend",
    "gridcolumnspan",
    "gridcolumnstart",
    "msgridrow",
    "msgridrowspan",
    "msgridcolumn",
    "msgridcolumnspan",
    "fontweight",
    "lineheight",
    "opacity",
    "order",
    "orphans",
    "scale",
    "tabsize",
    "widows",
    "zindex",
    "zoom",
    "webkitlineclamp",
    "fillopacity",
    "floodopacity",
    "stopopacity",
    "strokedasharray",
    "strokedashoffset",
    "strokemiterlimit",
    "strokeopacity",
    "strokewidth",
];

/// Flatten one fragment into CSS strings.
///
/// - falsy values (`null`, `false`, `""`) disappear, `0` survives as `"0"`
/// - functions are called with `context` and their result flattened
/// - component references become `.<componentId>`
/// - keyframes references become their name and queue their `@keyframes`
///   rule into `buffer` when the sheet does not have it yet
pub fn flatten(
    chunk: &Interpolation,
    context: &ExecutionContext,
    sheet: &StyleSheet,
    stylis: &Stylis,
    buffer: &mut InsertionBuffer,
) -> Result<Vec<String>> {
    #[cfg(test)]
    FLATTEN_CALLS.with(|calls| calls.set(calls.get() + 1));

    let mut out = Vec::new();
    Flattener {
        context,
        sheet,
        stylis,
        buffer,
    }
    .flatten_into(chunk, &mut out)?;
    Ok(out)
}

struct Flattener<'a> {
    context: &'a ExecutionContext,
    sheet: &'a StyleSheet,
    stylis: &'a Stylis,
    buffer: &'a mut InsertionBuffer,
}

impl Flattener<'_> {
    fn flatten_into(&mut self, chunk: &Interpolation, out: &mut Vec<String>) -> Result<()> {
        if chunk.is_falsish() {
            return Ok(());
        }
        match chunk {
            Interpolation::Str(s) => out.push(s.to_string()),
            Interpolation::Number(n) => out.push(format_number(*n)),
            Interpolation::Bool(b) => out.push(b.to_string()),
            Interpolation::Null => {}
            Interpolation::Func(f) => {
                let resolved = (**f)(self.context);
                self.flatten_into(&resolved, out)?;
            }
            Interpolation::Rules(rules) => {
                for part in rules {
                    self.flatten_into(part, out)?;
                }
            }
            Interpolation::Object(obj) => self.object_into(obj, out)?,
            Interpolation::Component(style) => out.push(format!(".{}", style.component_id())),
            Interpolation::Keyframes(keyframes) => {
                let name = keyframes.inject(self.sheet, self.stylis, self.buffer)?;
                out.push(name);
            }
        }
        Ok(())
    }

    fn object_into(&mut self, obj: &CssObject, out: &mut Vec<String>) -> Result<()> {
        for (key, value) in obj {
            if value.is_falsish() {
                continue;
            }
            match value {
                Interpolation::Object(nested) => {
                    out.push(format!("{key} {{"));
                    self.object_into(nested, out)?;
                    out.push("}".to_string());
                }
                Interpolation::Func(_)
                | Interpolation::Rules(_)
                | Interpolation::Component(_)
                | Interpolation::Keyframes(_) => {
                    out.push(format!("{}:", hyphenate(key)));
                    self.flatten_into(value, out)?;
                    out.push(";".to_string());
                }
                _ => out.push(format!(
                    "{}: {};",
                    hyphenate(key),
                    add_unit_if_needed(key, value)
                )),
            }
        }
        Ok(())
    }
}

fn format_number(n: f64) -> String {
    if n == 0.0 {
        // also normalises -0
        "0".to_string()
    } else {
        n.to_string()
    }
}

/// `borderWidth` → `border-width`, `msTransition` → `-ms-transition`.
///
/// Custom properties (`--brand-color`) pass through untouched.
pub fn hyphenate(name: &str) -> String {
    if name.starts_with("--") {
        return name.to_string();
    }
    let mut output = String::with_capacity(name.len() + 4);
    for c in name.chars() {
        if c.is_ascii_uppercase() {
            output.push('-');
            output.push(c.to_ascii_lowercase());
        } else {
            output.push(c);
        }
    }
    if output.starts_with("ms-") {
        output.insert(0, '-');
    }
    output
}

fn is_unitless(name: &str) -> bool {
    let key: String = name
        .chars()
        .filter(|&c| c != '-')
        .map(|c| c.to_ascii_lowercase())
        .collect();
    UNITLESS.contains(&key.as_str())
}

/// Render an object value, appending `px` to non-zero numbers of properties
/// that take a length.
pub fn add_unit_if_needed(name: &str, value: &Interpolation) -> String {
    match value {
        Interpolation::Null | Interpolation::Bool(_) => String::new(),
        Interpolation::Number(n) if *n != 0.0 && !is_unitless(name) && !name.starts_with("--") => {
            format!("{}px", format_number(*n))
        }
        Interpolation::Number(n) => format_number(*n),
        Interpolation::Str(s) => s.trim().to_string(),
        _ => String::new(),
    }
}
