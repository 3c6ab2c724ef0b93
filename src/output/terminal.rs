// Colored terminal output for tidy summaries and baked datasets.

use colored::Colorize;

use crate::data::{ColumnData, Dataset};
use crate::steps::TidyRow;

/// Placeholder shown for values a step has not resolved yet.
pub const UNRESOLVED: &str = "<unresolved>";

/// Display tidy rows as a table.
pub fn display_tidy(rows: &[TidyRow]) {
    if rows.is_empty() {
        println!("No columns selected.");
        return;
    }

    println!(
        "  {:<32} {:<14} {:<12}",
        "Terms".dimmed(),
        "Value".dimmed(),
        "Id".dimmed(),
    );
    println!("  {}", "-".repeat(60).dimmed());

    for row in rows {
        let value = match &row.value {
            Some(v) => v.green(),
            None => UNRESOLVED.yellow(),
        };
        println!(
            "  {:<32} {:<14} {:<12}",
            super::truncate_chars(&row.terms, 29),
            value,
            row.id
        );
    }
}

/// Display the first `limit` rows of every column.
pub fn display_dataset(data: &Dataset, limit: usize) {
    println!(
        "\n{}",
        format!(
            "=== Dataset ({} rows x {} columns) ===",
            data.n_rows(),
            data.n_cols()
        )
        .bold()
    );

    for column in data.columns() {
        println!(
            "\n  {} {}",
            column.name.bold(),
            format!("<{}>", column.data.kind()).dimmed()
        );
        for i in 0..data.n_rows().min(limit) {
            println!("    {:>3}. {}", i + 1, preview_cell(&column.data, i));
        }
    }

    if data.n_rows() > limit {
        println!("\n  ... {} more rows", data.n_rows() - limit);
    }
}

fn preview_cell(data: &ColumnData, row: usize) -> String {
    let text = match data {
        ColumnData::Text(values) => values[row].clone().unwrap_or_else(|| "NA".to_string()),
        ColumnData::Factor { levels, codes } => codes[row]
            .and_then(|c| levels.get(c).cloned())
            .unwrap_or_else(|| "NA".to_string()),
        ColumnData::Numeric(values) => values[row]
            .map(|v| v.to_string())
            .unwrap_or_else(|| "NA".to_string()),
        ColumnData::Tokens(rows) => format!("[{}]", rows[row].join(", ")),
    };
    super::truncate_chars(&text, 100)
}
