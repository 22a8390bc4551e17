use std::sync::Arc;

use serde_json::json;
use styled_sheet::*;

fn dev_sheet() -> StyleSheet {
    StyleSheet::new(SheetOptions::default().production(false))
}

fn prod_sheet() -> StyleSheet {
    StyleSheet::new(SheetOptions::default().production(true))
}

fn prop_color() -> RuleSet {
    css!(
        "color: ${};",
        |ctx: &ExecutionContext| ctx.prop_str("c").unwrap_or("black").to_string()
    )
}

// =============================================================================
// Class names
// =============================================================================

#[test]
fn same_inputs_same_class_name() {
    let stylis = Stylis::new();
    let ctx = ExecutionContext::from_props(json!({ "c": "red" }));

    // two independent sheets, two independent definitions
    let a = ComponentStyle::new(prop_color(), "Title-x1", None);
    let b = ComponentStyle::new(prop_color(), "Title-x1", None);
    let (name_a, _) = a.generate_and_insert(&ctx, &dev_sheet(), &stylis).unwrap();
    let (name_b, _) = b.generate_and_insert(&ctx, &dev_sheet(), &stylis).unwrap();

    assert_eq!(name_a, name_b);
}

#[test]
fn component_id_changes_the_class_name() {
    let stylis = Stylis::new();
    let sheet = dev_sheet();
    let ctx = ExecutionContext::from_props(json!({ "c": "red" }));

    let a = ComponentStyle::new(prop_color(), "A-one", None);
    let b = ComponentStyle::new(prop_color(), "B-two", None);

    let (name_a, buffer_a) = a.generate_and_insert(&ctx, &sheet, &stylis).unwrap();
    let (name_b, buffer_b) = b.generate_and_insert(&ctx, &sheet, &stylis).unwrap();

    assert_ne!(name_a, name_b);
    let css_a = &buffer_a.iter().next().unwrap().rules[0];
    let css_b = &buffer_b.iter().next().unwrap().rules[0];
    assert_eq!(css_a, &format!(".{name_a}{{color:red;}}"));
    assert_eq!(css_b, &format!(".{name_b}{{color:red;}}"));
}

#[test]
fn interpolation_position_changes_the_class_name() {
    let stylis = Stylis::new();
    let sheet = prod_sheet();
    let ctx = ExecutionContext::new();

    let first = ComponentStyle::new(
        css!("${}${}", |_: &ExecutionContext| "color:red;", |_: &ExecutionContext| ""),
        "Same-id",
        None,
    );
    let second = ComponentStyle::new(
        css!("${}${}", |_: &ExecutionContext| "", |_: &ExecutionContext| "color:red;"),
        "Same-id",
        None,
    );

    let (name_first, pending_first) = first.generate_and_insert(&ctx, &sheet, &stylis).unwrap();
    let (name_second, pending_second) = second.generate_and_insert(&ctx, &sheet, &stylis).unwrap();

    assert_ne!(name_first, name_second);
    // the CSS itself is identical
    assert_eq!(
        pending_first.iter().next().unwrap().rules[0].replace(&name_first, "X"),
        pending_second.iter().next().unwrap().rules[0].replace(&name_second, "X"),
    );
}

// =============================================================================
// Sheet effects
// =============================================================================

#[test]
fn repeated_generation_inserts_once() {
    let stylis = Stylis::new();
    let mut sheet = dev_sheet();
    let style = ComponentStyle::new(prop_color(), "Button-z", None);
    style.register(&mut sheet).unwrap();
    let ctx = ExecutionContext::from_props(json!({ "c": "blue" }));

    let mut names = Vec::new();
    for _ in 0..5 {
        let (name, mut pending) = style.generate_and_insert(&ctx, &sheet, &stylis).unwrap();
        sheet.flush_styles(&mut pending).unwrap();
        names.push(name);
    }

    assert!(names.windows(2).all(|w| w[0] == w[1]));
    assert_eq!(sheet.rule_count(), 1);
    assert_eq!(sheet.name_count("Button-z"), 1);
}

#[test]
fn flushing_the_same_buffer_twice_is_harmless() {
    let stylis = Stylis::new();
    let mut sheet = dev_sheet();
    let style = ComponentStyle::new(prop_color(), "Button-z", None);

    let (_, pending) = style
        .generate_and_insert(&ExecutionContext::new(), &sheet, &stylis)
        .unwrap();
    sheet.flush_styles(&mut pending.clone()).unwrap();
    sheet.flush_styles(&mut pending.clone()).unwrap();

    assert_eq!(sheet.rule_count(), 1);
}

#[test]
fn output_follows_definition_order() {
    let stylis = Stylis::new();
    let mut sheet = dev_sheet();
    let ctx = ExecutionContext::new();

    let a = ComponentStyle::new(RuleSet::literal("color: red;"), "A-1", None);
    let b = ComponentStyle::new(RuleSet::literal("color: green;"), "B-2", None);
    let c = ComponentStyle::new(RuleSet::literal("color: blue;"), "C-3", None);
    for style in [&a, &b, &c] {
        style.register(&mut sheet).unwrap();
    }

    let name_c = c.insert_styles(&ctx, &mut sheet, &stylis).unwrap();
    let name_b = b.insert_styles(&ctx, &mut sheet, &stylis).unwrap();
    let name_a = a.insert_styles(&ctx, &mut sheet, &stylis).unwrap();

    let css = sheet.get_style_text();
    let pos = |name: &str| css.find(&format!(".{name}{{")).unwrap();
    assert!(pos(&name_a) < pos(&name_b));
    assert!(pos(&name_b) < pos(&name_c));
}

#[test]
fn heading_static_rule_scenario() {
    let stylis = Stylis::new();
    let mut sheet = prod_sheet();
    let heading = ComponentStyle::new(RuleSet::literal("color: red;"), "Heading-abc1", None);
    heading.register(&mut sheet).unwrap();

    let (first, mut pending) = heading
        .generate_and_insert(&ExecutionContext::new(), &sheet, &stylis)
        .unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending.iter().next().unwrap().rules, vec![format!(".{first}{{color:red;}}")]);
    sheet.flush_styles(&mut pending).unwrap();

    let (second, pending) = heading
        .generate_and_insert(&ExecutionContext::new(), &sheet, &stylis)
        .unwrap();
    assert_eq!(first, second);
    assert!(pending.is_empty());
}

#[test]
fn zero_values_survive_object_styles() {
    let stylis = Stylis::new();
    let sheet = dev_sheet();
    let style = ComponentStyle::new(
        css!("${}", |_: &ExecutionContext| json!({
            "borderWidth": 0,
            "colorA": null,
            "colorB": false
        })),
        "Box-0",
        None,
    );

    let (name, pending) = style
        .generate_and_insert(&ExecutionContext::new(), &sheet, &stylis)
        .unwrap();
    assert_eq!(pending.iter().next().unwrap().rules, vec![format!(".{name}{{border-width:0;}}")]);
}

// =============================================================================
// Composition
// =============================================================================

#[test]
fn extended_styles_carry_base_classes() {
    let stylis = Stylis::new();
    let mut sheet = dev_sheet();
    let ctx = ExecutionContext::from_props(json!({ "c": "navy" }));

    let base = Arc::new(ComponentStyle::new(prop_color(), "Text-a", None));
    let link = ComponentStyle::new(css!("text-decoration: underline;"), "Link-b", Some(base.clone()));
    base.register(&mut sheet).unwrap();
    link.register(&mut sheet).unwrap();

    let names = link.insert_styles(&ctx, &mut sheet, &stylis).unwrap();
    let base_name = base.generate_class_name(&ctx, &sheet, &stylis).unwrap();

    assert!(names.starts_with(&format!("{base_name} ")));
    assert_eq!(sheet.rule_count(), 2);
}

#[test]
fn component_selectors_reference_other_components() {
    let stylis = Stylis::new();
    let mut sheet = dev_sheet();
    let icon = Arc::new(ComponentStyle::new(css!("width: 16px;"), "Icon-i", None));
    let button = ComponentStyle::new(css!("${}{ margin-right: 4px; }", icon.clone()), "Button-b", None);

    let name = button
        .insert_styles(&ExecutionContext::new(), &mut sheet, &stylis)
        .unwrap();
    assert!(sheet
        .get_style_text()
        .contains(&format!(".{name} .Icon-i{{margin-right:4px;}}")));
}

#[test]
fn keyframes_are_inserted_with_the_first_user() {
    let stylis = Stylis::new();
    let mut sheet = dev_sheet();
    let fade = Arc::new(Keyframes::from_css("from { opacity: 0; } to { opacity: 1; }"));
    let toast = ComponentStyle::new(css!("animation: ${} 1s;", fade.clone()), "Toast-t", None);
    toast.register(&mut sheet).unwrap();

    let (_, mut pending) = toast
        .generate_and_insert(&ExecutionContext::new(), &sheet, &stylis)
        .unwrap();
    assert_eq!(pending.len(), 2);
    sheet.flush_styles(&mut pending).unwrap();

    assert!(sheet.has_name_for_id(fade.id(), fade.name()));
    let css = sheet.get_style_text();
    assert!(css.contains(&format!("@keyframes {}{{from{{opacity:0;}}to{{opacity:1;}}}}", fade.name())));
    assert!(css.contains(&format!("animation:{} 1s;", fade.name())));

    let (_, pending) = toast
        .generate_and_insert(&ExecutionContext::new(), &sheet, &stylis)
        .unwrap();
    assert!(pending.is_empty());
}

#[test]
fn theme_values_reach_functions() {
    let stylis = Stylis::new();
    let sheet = dev_sheet();
    let style = ComponentStyle::new(
        css!("background: ${};", |ctx: &ExecutionContext| {
            ctx.theme_value("colors.primary")
                .and_then(|v| v.as_str())
                .unwrap_or("gray")
                .to_string()
        }),
        "Panel-p",
        None,
    );
    let ctx = ExecutionContext::new().with_theme(json!({ "colors": { "primary": "teal" } }));

    let (name, pending) = style.generate_and_insert(&ctx, &sheet, &stylis).unwrap();
    assert_eq!(pending.iter().next().unwrap().rules, vec![format!(".{name}{{background:teal;}}")]);
}

#[test]
fn generated_ids_keep_components_apart() {
    let stylis = Stylis::new();
    let sheet = dev_sheet();
    let mut ids = ComponentIdGenerator::new();

    let first = ComponentStyle::new(css!("color: red;"), ids.generate("Card", None), None);
    let second = ComponentStyle::new(css!("color: red;"), ids.generate("Card", None), None);

    let a = first.generate_class_name(&ExecutionContext::new(), &sheet, &stylis).unwrap();
    let b = second.generate_class_name(&ExecutionContext::new(), &sheet, &stylis).unwrap();
    assert_ne!(a, b);
}
