//! Server rendering and client rehydration.
//!
//! This example shows how to:
//! - Collect styles of one render in a `ServerStyleSheet`
//! - Emit `<style>` tags and a manifest
//! - Rehydrate a client sheet from the markup without inserting rules twice

use serde_json::json;
use styled_sheet::*;

fn card() -> ComponentStyle {
    ComponentStyle::new(
        css!(
            "border-radius: 4px; background: ${}; &:hover { opacity: 0.9; }",
            |ctx: &ExecutionContext| {
                ctx.theme_value("surface")
                    .and_then(|v| v.as_str())
                    .unwrap_or("white")
                    .to_string()
            }
        ),
        "Card-demo",
        None,
    )
}

fn main() -> Result<()> {
    println!("=== SSR and Rehydration Example ===\n");

    let stylis = Stylis::new();
    let ctx = ExecutionContext::new().with_theme(json!({ "surface": "#fafafa" }));

    // -------------------------------------------------------------------------
    // 1. Server render
    // -------------------------------------------------------------------------
    let mut server = ServerStyleSheet::default().with_nonce("r4nd0m");
    let reset = GlobalStyle::new(css!("body { margin: 0; }"), "sc-global-reset");
    let style = card();
    {
        let sheet = server.sheet_mut()?;
        reset.register(sheet)?;
        style.register(sheet)?;

        let instance = sheet.allocate_gs_instance(reset.component_id());
        reset.render_styles(instance, &ctx, sheet, &stylis)?;
        let name = style.insert_styles(&ctx, sheet, &stylis)?;
        println!("1. Server rendered class: {name}");
    }

    let tags = server.get_style_tags()?;
    let manifest = server.sheet()?.get_manifest();
    server.seal();

    println!("   Style tags:\n   {}", tags.replace('\n', "\n   "));
    println!(
        "   Manifest: {}",
        serde_json::to_string(&manifest).unwrap_or_default()
    );
    println!();

    // -------------------------------------------------------------------------
    // 2. Client boot
    // -------------------------------------------------------------------------
    let html = format!("<html><head>{tags}</head><body></body></html>");
    let mut client = StyleSheet::default();
    client.rehydrate_from_markup(&html)?;
    let rehydrated = client.rule_count();
    println!("2. Client rehydrated {rehydrated} rules");

    let client_card = card();
    client_card.register(&mut client)?;
    let (name, mut pending) = client_card.generate_and_insert(&ctx, &client, &stylis)?;
    client.flush_styles(&mut pending)?;

    println!("   Client class:  {name}");
    println!("   Rules after first client render: {}", client.rule_count());
    println!("   Nothing inserted twice? {}", client.rule_count() == rehydrated);

    Ok(())
}
