// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fixed-width text tables for human-readable output

use serde_json::Value;

use crate::record::{text, Record};

/// Render `rows` as a table with `=` rules above and below the header
/// and after the last row. Numbers are right-aligned.
pub fn render_table(columns: &[String], rows: &[Record]) -> String {
    let cells: Vec<Vec<(String, bool)>> = rows
        .iter()
        .map(|row| {
            columns
                .iter()
                .map(|column| cell(row.get(column)))
                .collect()
        })
        .collect();

    let widths: Vec<usize> = columns
        .iter()
        .enumerate()
        .map(|(i, column)| {
            cells
                .iter()
                .map(|row| row[i].0.chars().count())
                .chain(std::iter::once(column.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let rule = widths
        .iter()
        .map(|w| "=".repeat(*w))
        .collect::<Vec<_>>()
        .join(" ");
    let header = columns
        .iter()
        .zip(&widths)
        .map(|(column, width)| format!("{:<width$}", column, width = width))
        .collect::<Vec<_>>()
        .join(" ");

    let mut lines = vec![rule.clone(), header.trim_end().to_string(), rule.clone()];
    for row in &cells {
        let line = row
            .iter()
            .zip(&widths)
            .map(|((value, numeric), width)| {
                if *numeric {
                    format!("{:>width$}", value, width = width)
                } else {
                    format!("{:<width$}", value, width = width)
                }
            })
            .collect::<Vec<_>>()
            .join(" ");
        lines.push(line.trim_end().to_string());
    }
    lines.push(rule);
    lines.join("\n")
}

fn cell(value: Option<&Value>) -> (String, bool) {
    match value {
        None | Some(Value::Null) => (String::new(), false),
        Some(Value::Number(n)) => (n.to_string(), true),
        Some(Value::Bool(b)) => (b.to_string(), false),
        Some(other) => (text(other).replace('\n', " "), false),
    }
}

#[cfg(test)]
#[path = "table_tests.rs"]
mod tests;
