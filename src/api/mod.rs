//! Access to the backing store.
//!
//! The `Sheet` trait is the minimal contract a backing store has to satisfy: worksheets of rows
//! of strings, with a header row on top. `Ledger` binds a `Sheet` to one ledger worksheet and
//! provides the position-addressed record operations on top of it.

mod csv_sheet;
mod ledger;
#[cfg(test)]
mod memory_sheet;

pub(crate) use csv_sheet::{write_csv, CsvSheet};
#[cfg(test)]
pub(crate) use csv_sheet::parse_csv;
pub use ledger::{EditSession, Ledger, RecordEdits};
#[cfg(test)]
pub(crate) use memory_sheet::MemorySheet;

use crate::error::Res;
use crate::model::{LedgerKind, SheetRow};
use crate::Config;

/// A spreadsheet made of named worksheets. Row 1 of each worksheet is its header row.
///
/// Each method performs exactly one storage operation. Any error means the store could not be
/// reached or did not hold what was expected.
#[async_trait::async_trait]
pub(crate) trait Sheet: Send {
    /// Returns every row of the worksheet `name`, the header row first.
    async fn read_all(&mut self, name: &str) -> Res<Vec<Vec<String>>>;

    /// Adds one row after the last row of the worksheet.
    async fn append_one(&mut self, name: &str, values: &[String]) -> Res<()>;

    /// Overwrites one existing record row.
    async fn write_range(&mut self, name: &str, row: SheetRow, values: &[String]) -> Res<()>;

    /// Deletes one record row. Every later row moves up by one.
    async fn remove_at(&mut self, name: &str, row: SheetRow) -> Res<()>;

    /// Creates the worksheet with `headers` as its header row unless it already exists.
    async fn create_if_absent(&mut self, name: &str, headers: &[&str]) -> Res<()>;
}

/// Opens the ledger of `kind` in the spreadsheet configured by `config`.
pub fn ledger(config: &Config, kind: LedgerKind) -> Ledger {
    let sheet = CsvSheet::new(config.spreadsheet_dir());
    Ledger::new(Box::new(sheet), kind, config.title(kind))
}

/// Looks up the row at `row` in `rows`, failing if the worksheet is too short to hold it.
fn record_row_index(rows: &[Vec<String>], name: &str, row: SheetRow) -> Res<usize> {
    let ix = row.storage_index();
    anyhow::ensure!(
        ix < rows.len(),
        "Row {row} does not exist in worksheet '{name}', which has {} rows",
        rows.len()
    );
    Ok(ix)
}
