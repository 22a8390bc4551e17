//! Sheet text output and rehydration.
//!
//! Every group is written as its rules followed by one marker rule:
//!
//! ```text
//! .a{color:red;}/*!sc*/
//! data-styled.g1[id="Button-abc"]{content:"a,"}/*!sc*/
//! ```
//!
//! Reading the text back restores the group assignment and the names, so a
//! client never regenerates CSS the server already sent.

use std::sync::LazyLock;

use regex::Regex;

use super::{ManifestEntry, MAX_GROUP, StyleSheet};
use crate::error::Result;
use crate::{SC_ATTR, SC_ATTR_VERSION, SC_VERSION, SPLITTER};

static MARKER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^data-styled\.g(\d+)\[id="([\w\d-]+)"\].*?"([^"]*)"#).expect("valid marker regex")
});

static STYLE_BLOCK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<style\b([^>]*)>(.*?)</style>").expect("valid style block regex")
});

static ATTR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"([\w-]+)(?:\s*=\s*"([^"]*)")?"#).expect("valid attribute regex"));

/// Value written to the style attribute of a tag the client owns.
const SC_ATTR_ACTIVE: &str = "active";

// ============================================================================
// Output
// ============================================================================

pub(super) fn output_sheet(sheet: &StyleSheet) -> String {
    let mut css = String::new();

    for (group, id) in sheet.groups.groups() {
        let Some(names) = sheet.names.get(id) else {
            continue;
        };
        let rules = sheet.tag.get_group(group);
        if names.order.is_empty() || rules.is_empty() {
            continue;
        }

        let mut content = String::new();
        for name in &names.order {
            content.push_str(name);
            content.push(',');
        }

        css.push_str(&rules);
        css.push_str(&format!("{SC_ATTR}.g{group}[id=\"{id}\"]{{content:\"{content}\"}}"));
        css.push_str(SPLITTER);
    }

    css
}

pub(super) fn manifest(sheet: &StyleSheet) -> Vec<ManifestEntry> {
    sheet
        .groups
        .groups()
        .into_iter()
        .filter_map(|(group, id)| {
            let names = sheet.names.get(id)?;
            if names.order.is_empty() || sheet.tag.group_len(group) == 0 {
                return None;
            }
            Some(ManifestEntry {
                group,
                component_id: id.to_string(),
                names: names.order.clone(),
            })
        })
        .collect()
}

// ============================================================================
// Rehydration
// ============================================================================

pub(super) fn rehydrate_sheet(sheet: &mut StyleSheet, css: &str) -> Result<()> {
    let mut rules: Vec<String> = Vec::new();

    for part in css.split(SPLITTER) {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }

        let Some(marker) = MARKER_RE.captures(part) else {
            rules.push(part.to_string());
            continue;
        };

        let group = marker[1].parse::<u32>().ok().filter(|&g| g <= MAX_GROUP);
        let id = &marker[2];

        match group {
            Some(group) if group != 0 && !rules.is_empty() => {
                sheet.groups.set_group_for_id(id, group);
                for name in marker[3].split(',').filter(|n| !n.is_empty()) {
                    sheet.register_name(id, name)?;
                }
                sheet.tag.insert_rules(group, &rules)?;
                tracing::trace!(id, group, count = rules.len(), "rehydrated group");
            }
            Some(group) if group != 0 => {
                // marker without rules: names stay unknown and get regenerated
                sheet.groups.set_group_for_id(id, group);
            }
            _ => {
                tracing::debug!(marker = part, "ignoring unusable marker");
            }
        }

        rules.clear();
    }

    if !rules.is_empty() {
        tracing::warn!(count = rules.len(), "dropping rules after the last group marker");
    }

    Ok(())
}

pub(super) fn rehydrate_from_markup(sheet: &mut StyleSheet, html: &str) -> Result<()> {
    for block in STYLE_BLOCK_RE.captures_iter(html) {
        let attrs = &block[1];
        let mut owned = false;
        let mut version_matches = false;

        for attr in ATTR_RE.captures_iter(attrs) {
            let value = attr.get(2).map_or("", |m| m.as_str());
            match &attr[1] {
                SC_ATTR => owned = value != SC_ATTR_ACTIVE,
                SC_ATTR_VERSION => version_matches = value == SC_VERSION,
                _ => {}
            }
        }

        if owned && version_matches {
            rehydrate_sheet(sheet, &block[2])?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::buffer::{InsertionBuffer, PendingRules};
    use crate::error::StyleError;
    use crate::sheet::{MAX_GROUP, StyleSheet};
    use crate::{SC_VERSION, SPLITTER};

    fn lines(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn output_writes_rules_then_marker() {
        let mut sheet = StyleSheet::default();
        sheet.register_id("Button-abc").unwrap();
        sheet.insert_rules("Button-abc", "a", &lines(&[".a{color:red;}"])).unwrap();
        sheet.insert_rules("Button-abc", "b", &lines(&[".b{color:blue;}"])).unwrap();

        let expected = format!(
            ".a{{color:red;}}{SPLITTER}.b{{color:blue;}}{SPLITTER}data-styled.g1[id=\"Button-abc\"]{{content:\"a,b,\"}}{SPLITTER}"
        );
        assert_eq!(sheet.get_style_text(), expected);
    }

    #[test]
    fn empty_sheet_outputs_nothing() {
        let mut sheet = StyleSheet::default();
        sheet.register_id("A").unwrap();
        assert_eq!(sheet.get_style_text(), "");
        assert!(sheet.get_manifest().is_empty());
    }

    #[test]
    fn round_trip_restores_groups_and_names() {
        let mut server = StyleSheet::default();
        server.register_id("First").unwrap();
        server.register_id("Second").unwrap();
        server.insert_rules("Second", "s", &lines(&[".s{}"])).unwrap();
        server.insert_rules("First", "f", &lines(&[".f{}", ".f:hover{}"])).unwrap();
        let text = server.get_style_text();

        let mut client = StyleSheet::default();
        client.rehydrate(&text).unwrap();

        assert_eq!(client.group_for_id("First"), Some(1));
        assert_eq!(client.group_for_id("Second"), Some(2));
        assert!(client.has_name_for_id("First", "f"));
        assert!(client.has_name_for_id("Second", "s"));
        assert_eq!(client.rule_count(), 3);
        assert_eq!(client.get_style_text(), text);
        assert_eq!(client.get_manifest(), server.get_manifest());
    }

    #[test]
    fn new_ids_allocate_after_rehydrated_groups() {
        let mut client = StyleSheet::default();
        client
            .rehydrate(&format!(
                ".x{{}}{SPLITTER}data-styled.g5[id=\"X\"]{{content:\"x,\"}}{SPLITTER}"
            ))
            .unwrap();
        assert_eq!(client.register_id("Y").unwrap(), 6);
    }

    #[test]
    fn marker_without_rules_registers_no_names() {
        let mut client = StyleSheet::default();
        client
            .rehydrate(&format!("data-styled.g2[id=\"A\"]{{content:\"a,\"}}{SPLITTER}"))
            .unwrap();
        assert!(!client.has_name_for_id("A", "a"));
        assert_eq!(client.group_for_id("A"), Some(2));
    }

    #[test]
    fn marker_without_rules_is_refilled_in_its_group() {
        let mut client = StyleSheet::default();
        client
            .rehydrate(&format!(
                ".b{{}}{SPLITTER}data-styled.g1[id=\"B\"]{{content:\"b,\"}}{SPLITTER}\
                 data-styled.g2[id=\"A\"]{{content:\"a,\"}}{SPLITTER}\
                 .c{{}}{SPLITTER}data-styled.g3[id=\"C\"]{{content:\"c,\"}}{SPLITTER}"
            ))
            .unwrap();

        let mut buffer = InsertionBuffer::new();
        buffer.push(PendingRules::new("A", "a", lines(&[".a{}"])));
        client.flush_styles(&mut buffer).unwrap();

        assert!(client.has_name_for_id("A", "a"));
        assert_eq!(client.group_text(2), format!(".a{{}}{SPLITTER}"));
        let css = client.get_style_text();
        assert!(css.find(".b{}").unwrap() < css.find(".a{}").unwrap());
        assert!(css.find(".a{}").unwrap() < css.find(".c{}").unwrap());
    }

    #[test]
    fn highest_group_marker_stays_cheap() {
        let mut client = StyleSheet::default();
        client
            .rehydrate(&format!(
                ".a{{}}{SPLITTER}data-styled.g{MAX_GROUP}[id=\"X\"]{{content:\"a,\"}}{SPLITTER}\
                 .b{{}}{SPLITTER}data-styled.g{}[id=\"Y\"]{{content:\"b,\"}}{SPLITTER}",
                MAX_GROUP + 1
            ))
            .unwrap();

        assert!(client.has_name_for_id("X", "a"));
        assert_eq!(client.group_for_id("X"), Some(MAX_GROUP));
        assert!(!client.has_name_for_id("Y", "b"));
        assert_eq!(client.rule_count(), 1);

        // every group is taken now
        assert_eq!(client.register_id("Z"), Err(StyleError::GroupOverflow { limit: MAX_GROUP }));
    }

    #[test]
    fn group_zero_and_trailing_rules_are_ignored() {
        let mut client = StyleSheet::default();
        client
            .rehydrate(&format!(
                ".z{{}}{SPLITTER}data-styled.g0[id=\"Z\"]{{content:\"z,\"}}{SPLITTER}.orphan{{}}{SPLITTER}"
            ))
            .unwrap();
        assert!(!client.has_name_for_id("Z", "z"));
        assert_eq!(client.rule_count(), 0);
    }

    #[test]
    fn markup_matches_version_and_skips_active_tags() {
        let body = format!(".a{{}}{SPLITTER}data-styled.g1[id=\"A\"]{{content:\"a,\"}}{SPLITTER}");
        let other = format!(".b{{}}{SPLITTER}data-styled.g2[id=\"B\"]{{content:\"b,\"}}{SPLITTER}");
        let active = format!(".c{{}}{SPLITTER}data-styled.g3[id=\"C\"]{{content:\"c,\"}}{SPLITTER}");
        let html = format!(
            "<html><head>\
             <style data-styled=\"true\" data-styled-version=\"{SC_VERSION}\">{body}</style>\
             <style data-styled=\"true\" data-styled-version=\"0.0.0-old\">{other}</style>\
             <style data-styled=\"active\" data-styled-version=\"{SC_VERSION}\">{active}</style>\
             <style>.plain{{}}</style>\
             </head></html>"
        );

        let mut client = StyleSheet::default();
        client.rehydrate_from_markup(&html).unwrap();

        assert!(client.has_name_for_id("A", "a"));
        assert!(!client.has_name_for_id("B", "b"));
        assert!(!client.has_name_for_id("C", "c"));
        assert_eq!(client.rule_count(), 1);
    }
}
