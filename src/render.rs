//! Markdown and JSON rendering of a [`SchemaReport`].

use std::fmt::Write as _;

use crate::report::{ModelingCandidate, SchemaReport};
use crate::summary::{ColumnSummary, TableSummary};

/// Render the full report: one table per file, then the ranked candidates (when any).
pub fn render_markdown(report: &SchemaReport) -> String {
    let mut parts = vec!["## Schema Summary\n".to_string()];
    parts.extend(report.tables.iter().map(table_markdown));
    if !report.candidates.is_empty() {
        parts.push(candidates_markdown(&report.candidates));
    }
    parts.join("\n")
}

/// Render the per-file summaries as a pretty-printed JSON array.
pub fn render_json(tables: &[TableSummary]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(tables)
}

fn table_markdown(table: &TableSummary) -> String {
    let mut out = format!(
        "### {} ({} rows)\n",
        escape_cell(&table.file_name()),
        group_thousands(table.row_count)
    );
    out.push_str("| Column | Type | Role | Coverage | Distinct | Examples | Notes |\n");
    out.push_str("| --- | --- | --- | --- | --- | --- | --- |\n");
    for column in &table.columns {
        out.push_str(&column_row(column));
        out.push('\n');
    }
    out
}

fn column_row(c: &ColumnSummary) -> String {
    let notes: Vec<&str> = c.notes.iter().map(|n| n.as_str()).collect();
    format!(
        "| {} | {} | {} | {:.1}% | {} | {} | {} |",
        escape_cell(&c.name),
        c.dtype,
        c.role,
        c.coverage_pct,
        c.distinct_count,
        escape_cell(&c.examples.join(", ")),
        notes.join("; "),
    )
}

fn candidates_markdown(candidates: &[ModelingCandidate]) -> String {
    let mut out = String::from("### Modeling candidates\n");
    out.push_str("| Column | Role | Coverage | Distinct |\n| --- | --- | --- | --- |\n");
    for c in candidates {
        let _ = writeln!(
            out,
            "| {} | {} | {:.1}% | {} |",
            escape_cell(&c.key),
            c.role,
            c.coverage_pct,
            c.distinct_count
        );
    }
    out
}

/// Keep cell text on one line and stop `|` from splitting the cell.
fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|").replace(['\r', '\n'], " ")
}

fn group_thousands(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
