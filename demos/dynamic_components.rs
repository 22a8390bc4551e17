//! Dynamic component styles.
//!
//! This example shows how to:
//! - Define styles with the `css!` macro, mixing literals and closures
//! - Generate class names from props and commit them to a sheet
//! - Extend a base style and reference keyframes
//! - Turn on vendor prefixes for the CSS transform

use std::sync::Arc;

use serde_json::json;
use styled_sheet::*;

fn main() -> Result<()> {
    println!("=== Dynamic Components Example ===\n");

    let mut sheet = StyleSheet::new(SheetOptions::default().production(true));
    let stylis = Stylis::with_plugins(
        StylisOptions {
            prefix: true,
            ..StylisOptions::default()
        },
        Vec::new(),
    )?;
    let mut ids = ComponentIdGenerator::new();

    // -------------------------------------------------------------------------
    // 1. Definitions register their group up front
    // -------------------------------------------------------------------------
    let pulse = Arc::new(Keyframes::from_css("from { opacity: 0.6; } to { opacity: 1; }"));
    let text = Arc::new(ComponentStyle::new(
        css!("font-family: sans-serif; user-select: none;"),
        ids.generate("Text", None),
        None,
    ));
    let button = ComponentStyle::new(
        css!(
            "display: flex; padding: 4px 8px; color: ${}; animation: ${} 2s infinite;",
            |ctx: &ExecutionContext| ctx.prop_str("tone").unwrap_or("black").to_string(),
            pulse.clone()
        ),
        ids.generate("Button", None),
        Some(text.clone()),
    );
    text.register(&mut sheet)?;
    button.register(&mut sheet)?;

    println!("1. Component ids:");
    println!("   Text:   {}", text.component_id());
    println!("   Button: {}", button.component_id());
    println!();

    // -------------------------------------------------------------------------
    // 2. Each distinct prop set gets its own class
    // -------------------------------------------------------------------------
    println!("2. Class names per prop set:");
    for tone in ["crimson", "teal", "crimson"] {
        let ctx = ExecutionContext::from_props(json!({ "tone": tone }));
        let (names, mut pending) = button.generate_and_insert(&ctx, &sheet, &stylis)?;
        println!("   tone={tone:<8} -> \"{names}\" ({} pending)", pending.len());
        sheet.flush_styles(&mut pending)?;
    }
    println!();

    // -------------------------------------------------------------------------
    // 3. The resulting sheet
    // -------------------------------------------------------------------------
    println!("3. Stylesheet ({} rules):", sheet.rule_count());
    for rule in sheet.get_style_text().split(SPLITTER).filter(|r| !r.is_empty()) {
        println!("   {rule}");
    }

    Ok(())
}
