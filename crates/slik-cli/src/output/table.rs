use slik_core::model::{CellValue, Column};
use slik_core::ConversionResult;

/// Columns shown in the terminal preview; the spreadsheet carries all of them.
const PREVIEW_COLUMNS: &[Column] = &[
    Column::Category,
    Column::DebtorName,
    Column::BankCode,
    Column::Branch,
    Column::AccountNumber,
    Column::InstrumentType,
    Column::Balance,
    Column::Quality,
    Column::MaturityDate,
];

const MAX_CELL_WIDTH: usize = 32;

pub fn print(result: &ConversionResult) {
    print!("{}", format_preview(result));
}

pub fn format_preview(result: &ConversionResult) -> String {
    let mut out = String::new();
    let table = &result.table;

    if table.is_empty() {
        out.push_str("No records found.\n");
    } else {
        let cells: Vec<Vec<String>> = table
            .rows
            .iter()
            .enumerate()
            .map(|(i, _)| {
                PREVIEW_COLUMNS
                    .iter()
                    .map(|&col| {
                        table
                            .cell(i, col)
                            .map(display_cell)
                            .unwrap_or_default()
                    })
                    .collect()
            })
            .collect();

        let widths: Vec<usize> = PREVIEW_COLUMNS
            .iter()
            .enumerate()
            .map(|(j, col)| {
                cells
                    .iter()
                    .map(|row| row[j].chars().count())
                    .chain(std::iter::once(col.header().chars().count()))
                    .max()
                    .unwrap_or(0)
                    .min(MAX_CELL_WIDTH)
            })
            .collect();

        let header: Vec<String> = PREVIEW_COLUMNS
            .iter()
            .zip(&widths)
            .map(|(col, &w)| pad(col.header(), w))
            .collect();
        out.push_str(&format!("  {}\n", header.join("  ")));
        let rule: Vec<String> = widths.iter().map(|&w| "-".repeat(w)).collect();
        out.push_str(&format!("  {}\n", rule.join("  ")));

        for row in &cells {
            let line: Vec<String> = row
                .iter()
                .zip(&widths)
                .map(|(cell, &w)| pad(cell, w))
                .collect();
            out.push_str(&format!("  {}\n", line.join("  ").trim_end()));
        }
    }

    out.push('\n');
    let counts: Vec<String> = result
        .category_counts
        .iter()
        .map(|(c, n)| format!("{}: {n}", c.label()))
        .collect();
    out.push_str(&format!("  {} row(s) ({})\n", table.len(), counts.join(", ")));

    for w in &result.warnings {
        out.push_str(&format!("  warning: {}: {}\n", w.source, w.reason));
    }

    out
}

fn display_cell(cell: &CellValue) -> String {
    match cell {
        CellValue::Date(d) => d.format("%d/%m/%Y").to_string(),
        other => other.to_string(),
    }
}

/// Left-align `s` in `width` characters, cutting it with '~' when too long.
fn pad(s: &str, width: usize) -> String {
    let len = s.chars().count();
    if len > width {
        let mut cut: String = s.chars().take(width.saturating_sub(1)).collect();
        cut.push('~');
        cut
    } else {
        format!("{s}{}", " ".repeat(width - len))
    }
}
