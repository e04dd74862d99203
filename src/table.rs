//! Plain-text rendering of query results for the terminal.

use std::fmt::Write as _;

use crate::{aggregate::Aggregation, dataset::Table};

/// Left-aligned columns separated by two spaces, with a dashed rule under
/// the header. Newlines and tabs inside cells are flattened to spaces.
pub fn render_table(headers: &[String], rows: &[Vec<String>]) -> String {
    let mut widths = headers
        .iter()
        .map(|h| h.chars().count().max(3))
        .collect::<Vec<_>>();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(flatten(cell).chars().count());
        }
    }

    let mut output = String::new();
    let _ = writeln!(output, "{}", format_row(headers, &widths));
    let rule = widths.iter().map(|w| "-".repeat(*w)).collect::<Vec<_>>();
    let _ = writeln!(output, "{}", format_row(&rule, &widths));
    for row in rows {
        let _ = writeln!(output, "{}", format_row(row, &widths));
    }
    output
}

pub fn render_aggregation(aggregation: &Aggregation) -> String {
    render_table(&aggregation.headers(), &aggregation.render_rows())
}

pub fn render_records(table: &Table) -> String {
    let rows = (0..table.len())
        .map(|idx| table.display_row(idx))
        .collect::<Vec<_>>();
    render_table(table.columns(), &rows)
}

fn format_row(values: &[String], widths: &[usize]) -> String {
    let line = values
        .iter()
        .zip(widths)
        .map(|(value, width)| format!("{:<width$}", flatten(value), width = *width))
        .collect::<Vec<_>>()
        .join("  ");
    line.trim_end().to_string()
}

fn flatten(value: &str) -> String {
    value.replace(['\n', '\r', '\t'], " ")
}
