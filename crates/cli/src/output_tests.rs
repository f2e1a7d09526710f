// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serde_json::json;
use twr_core::record::record;
use twr_core::{Catalog, ListPage, Outcome};

fn render(rendered: &Rendered, format: OutputFormat) -> String {
    let catalog = Catalog::builtin().unwrap();
    let def = catalog.get("user").unwrap();
    let mut out = Vec::new();
    let style = Style {
        format,
        color: false,
    };
    print(rendered, def, style, &mut out).unwrap();
    String::from_utf8(out).unwrap()
}

fn users() -> Rendered {
    Rendered::Page(ListPage {
        count: 2,
        next: Some(2),
        previous: None,
        results: vec![
            record([("id", json!(1)), ("username", json!("al"))]),
            record([("id", json!(12)), ("username", json!("bo"))]),
        ],
    })
}

#[test]
fn json_is_pretty_printed_envelope() {
    let outcome = Rendered::Outcome(Outcome::changed(
        Some(json!(3)),
        record([("username", json!("al"))]),
    ));
    assert_eq!(
        render(&outcome, OutputFormat::Json),
        "{\n  \"changed\": true,\n  \"id\": 3,\n  \"username\": \"al\"\n}\n"
    );
}

#[test]
fn yaml_output() {
    let rendered = Rendered::Record(record([("id", json!(1)), ("username", json!("al"))]));
    assert_eq!(render(&rendered, OutputFormat::Yaml), "id: 1\nusername: al\n");
}

#[test]
fn id_format_prints_one_key_per_record() {
    assert_eq!(render(&users(), OutputFormat::Id), "1\n12\n");
}

#[test]
fn human_list_is_a_table_with_next_page() {
    let output = render(&users(), OutputFormat::Human);
    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(lines[1], "id username");
    assert!(lines.contains(&" 1 al"));
    assert!(lines.contains(&"12 bo"));
    assert_eq!(lines.last(), Some(&"(next page: 2)"));
}

#[test]
fn human_bare_outcome_reports_change() {
    let rendered = Rendered::Outcome(Outcome::bare(false));
    assert_eq!(render(&rendered, OutputFormat::Human), "OK. (changed: false)\n");
}

#[test]
fn human_empty_list() {
    let rendered = Rendered::Page(ListPage::default());
    assert_eq!(render(&rendered, OutputFormat::Human), "No records found.\n");
}

#[test]
fn streamed_output_prints_nothing_more() {
    assert_eq!(render(&Rendered::Nothing, OutputFormat::Json), "");
}

#[test]
fn records_without_display_fields_show_their_own_keys() {
    let rendered = Rendered::Record(record([("status", json!("running")), ("elapsed", json!(3.5))]));
    let output = render(&rendered, OutputFormat::Human);
    assert!(output.lines().any(|line| line.starts_with("status")));
}
