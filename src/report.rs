//! Rendering of filtered views for people and for other programs.

use crate::api::write_csv;
use crate::error::Res;
use crate::model::{LedgerKind, Record};
use crate::store::FilteredView;

/// Renders `view` as CSV: the ledger's header row, then one row per entry in view order.
///
/// Amounts are written the way they are stored, without a currency symbol, so the file can be
/// opened in any spreadsheet.
pub(crate) fn to_csv(kind: LedgerKind, view: &FilteredView) -> Res<String> {
    let mut rows = Vec::with_capacity(view.len() + 1);
    rows.push(kind.headers().iter().map(|h| h.to_string()).collect());
    rows.extend(view.iter().map(|entry| csv_row(entry.record())));
    write_csv(&rows)
}

fn csv_row(record: &Record) -> Vec<String> {
    vec![
        record.label().to_string(),
        record.amount().to_string(),
        record.date_cell(),
        record.notes().to_string(),
    ]
}

/// Renders `view` as an aligned text table. `#` is the position to pass to `update` and
/// `delete`, `Row` is the worksheet row the record lives on.
pub(crate) fn to_table(kind: LedgerKind, view: &FilteredView, symbol: &str) -> String {
    let header: Vec<String> = ["#", "Row"]
        .into_iter()
        .chain(kind.headers().iter().copied())
        .map(String::from)
        .collect();
    let body: Vec<Vec<String>> = view
        .iter()
        .map(|entry| {
            let record = entry.record();
            vec![
                entry.position().to_string(),
                entry.position().sheet_row().to_string(),
                record.label().to_string(),
                record.amount().display_with(symbol),
                record.date_cell(),
                record.notes().to_string(),
            ]
        })
        .collect();

    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for row in &body {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_line(&mut out, &header, &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    push_line(&mut out, &rule, &widths);
    for row in &body {
        push_line(&mut out, row, &widths);
    }
    out
}

/// Writes one table line. The `#`, `Row` and amount columns are right-aligned.
fn push_line(out: &mut String, cells: &[String], widths: &[usize]) {
    let line: Vec<String> = cells
        .iter()
        .zip(widths)
        .enumerate()
        .map(|(ix, (cell, width))| {
            let pad = width.saturating_sub(cell.chars().count());
            if matches!(ix, 0 | 1 | 3) {
                format!("{}{cell}", " ".repeat(pad))
            } else {
                format!("{cell}{}", " ".repeat(pad))
            }
        })
        .collect();
    out.push_str(line.join("  ").trim_end());
    out.push('\n');
}
