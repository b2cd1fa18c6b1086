//! Record operations on one ledger worksheet.
//!
//! `Ledger` reads the worksheet into a `Table` before every operation, applies the operation to
//! the table first so that bounds and validation are checked without touching storage, and only
//! then issues a single storage call. Because every position-addressed write is preceded by a
//! fresh read, a position is always checked against the worksheet as it is at that moment.

use crate::api::Sheet;
use crate::error::{Error, ErrorType, IntoResult, Result};
use crate::model::{Amount, LedgerKind, Mapping, Position, Record};
use crate::store::{FilterCriteria, FilteredView, Table};
use anyhow::Context;
use chrono::NaiveDate;
use tracing::{debug, warn};

pub struct Ledger {
    sheet: Box<dyn Sheet>,
    kind: LedgerKind,
    title: String,
}

/// A worksheet as read at one moment: its header mapping, its raw rows (header first) and the
/// records parsed from them.
struct Snapshot {
    mapping: Mapping,
    rows: Vec<Vec<String>>,
    table: Table,
}

impl Snapshot {
    fn parse(kind: LedgerKind, title: &str, rows: Vec<Vec<String>>) -> anyhow::Result<Self> {
        let header = rows
            .first()
            .with_context(|| format!("Worksheet '{title}' has no header row"))?;
        let mapping = Mapping::new(header.iter().cloned())
            .with_context(|| format!("Unable to read the header row of worksheet '{title}'"))?;
        anyhow::ensure!(
            !mapping.is_empty(),
            "Worksheet '{title}' has a blank header row"
        );
        let missing = mapping.missing(kind.headers());
        if !missing.is_empty() {
            warn!("Worksheet '{title}' is missing the columns {missing:?}, they read as empty");
        }
        let records = rows
            .iter()
            .skip(1)
            .map(|row| Record::from_row(kind, &mapping, row))
            .collect();
        Ok(Self {
            mapping,
            rows,
            table: Table::from_records(records),
        })
    }

    /// The raw row for `position` with `record` written over the ledger's columns.
    fn row_for(&self, kind: LedgerKind, position: Position, record: &Record) -> Vec<String> {
        let mut row = self
            .rows
            .get(position.storage_index())
            .cloned()
            .unwrap_or_default();
        if row.len() < self.mapping.len() {
            row.resize(self.mapping.len(), String::new());
        }
        record.write_row(kind, &self.mapping, &mut row);
        row
    }
}

impl Ledger {
    pub(crate) fn new(sheet: Box<dyn Sheet>, kind: LedgerKind, title: impl Into<String>) -> Self {
        Self {
            sheet,
            kind,
            title: title.into(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Creates the worksheet with the ledger's header row if it does not exist yet.
    pub async fn ensure(&mut self) -> Result<()> {
        self.sheet
            .create_if_absent(&self.title, self.kind.headers())
            .await
            .with_context(|| format!("Unable to create worksheet '{}'", self.title))
            .pub_result(ErrorType::BackingStore)
    }

    async fn snapshot(&mut self) -> Result<Snapshot> {
        let rows = self
            .sheet
            .read_all(&self.title)
            .await
            .with_context(|| format!("Unable to read worksheet '{}'", self.title))
            .pub_result(ErrorType::BackingStore)?;
        Snapshot::parse(self.kind, &self.title, rows).pub_result(ErrorType::BackingStore)
    }

    /// Reads every record of the worksheet.
    pub async fn table(&mut self) -> Result<Table> {
        Ok(self.snapshot().await?.table)
    }

    pub async fn filter(&mut self, criteria: &FilterCriteria) -> Result<FilteredView> {
        Ok(self.snapshot().await?.table.filter(criteria))
    }

    pub async fn total(&mut self) -> Result<Amount> {
        Ok(self.snapshot().await?.table.total())
    }

    /// Validates `record` and adds it after the last row. Returns its position.
    pub async fn append(&mut self, record: Record) -> Result<Position> {
        let mut snapshot = self.snapshot().await?;
        let position = snapshot.table.append(record.clone())?;
        let row = snapshot.row_for(self.kind, position, &record);
        self.sheet
            .append_one(&self.title, &row)
            .await
            .with_context(|| format!("Unable to append to worksheet '{}'", self.title))
            .pub_result(ErrorType::BackingStore)?;
        debug!(
            "Appended {} '{}' at position {position} (row {})",
            self.kind.noun(),
            record.label(),
            position.sheet_row()
        );
        Ok(position)
    }

    /// Replaces the record at the absolute `position`.
    pub async fn update(&mut self, position: Position, record: Record) -> Result<()> {
        let mut snapshot = self.snapshot().await?;
        snapshot.table.update(position, record.clone())?;
        self.write(&snapshot, position, &record).await
    }

    /// Removes the record at the absolute `position` and returns it. Positions after it shift
    /// down by one, so any position computed before this call must be computed again.
    pub async fn delete(&mut self, position: Position) -> Result<Record> {
        let mut snapshot = self.snapshot().await?;
        let removed = snapshot.table.delete(position)?;
        self.remove(position).await?;
        Ok(removed)
    }

    /// Loads the record at `position` for editing.
    pub async fn load(&mut self, position: Position) -> Result<EditSession> {
        let snapshot = self.snapshot().await?;
        let record = snapshot.table.get(position)?.clone();
        Ok(EditSession {
            kind: self.kind,
            position,
            snapshot: record,
        })
    }

    /// Writes `record` over the row loaded by `session`, unless that row changed since it was
    /// loaded.
    pub async fn save(&mut self, session: EditSession, record: Record) -> Result<()> {
        let mut snapshot = self.snapshot().await?;
        self.check_session(&snapshot, &session)?;
        snapshot.table.update(session.position, record.clone())?;
        self.write(&snapshot, session.position, &record).await
    }

    /// Deletes the row loaded by `session`, unless that row changed since it was loaded.
    pub async fn discard(&mut self, session: EditSession) -> Result<Record> {
        let mut snapshot = self.snapshot().await?;
        self.check_session(&snapshot, &session)?;
        let removed = snapshot.table.delete(session.position)?;
        self.remove(session.position).await?;
        Ok(removed)
    }

    fn check_session(&self, snapshot: &Snapshot, session: &EditSession) -> Result<()> {
        if session.kind != self.kind {
            return Err(Error::validation(format!(
                "A {} edit cannot be applied to the {} ledger",
                session.kind.noun(),
                self.kind.noun()
            )));
        }
        let current = snapshot.table.get(session.position)?;
        if current != &session.snapshot {
            return Err(Error::stale(format!(
                "The {} at position {} changed after it was loaded, list the {} again",
                self.kind.noun(),
                session.position,
                self.kind
            )));
        }
        Ok(())
    }

    async fn write(
        &mut self,
        snapshot: &Snapshot,
        position: Position,
        record: &Record,
    ) -> Result<()> {
        let row = snapshot.row_for(self.kind, position, record);
        self.sheet
            .write_range(&self.title, position.sheet_row(), &row)
            .await
            .with_context(|| {
                format!(
                    "Unable to write {} of worksheet '{}'",
                    position.sheet_row().range(row.len()),
                    self.title
                )
            })
            .pub_result(ErrorType::BackingStore)?;
        debug!(
            "Updated {} at position {position} (row {})",
            self.kind.noun(),
            position.sheet_row()
        );
        Ok(())
    }

    async fn remove(&mut self, position: Position) -> Result<()> {
        self.sheet
            .remove_at(&self.title, position.sheet_row())
            .await
            .with_context(|| {
                format!(
                    "Unable to delete row {} of worksheet '{}'",
                    position.sheet_row(),
                    self.title
                )
            })
            .pub_result(ErrorType::BackingStore)?;
        debug!(
            "Deleted {} at position {position} (row {})",
            self.kind.noun(),
            position.sheet_row()
        );
        Ok(())
    }
}

/// A record loaded for editing: its position and a copy of the record as it was when loaded.
/// Consumed by `Ledger::save` or `Ledger::discard`.
#[derive(Debug, Eq, PartialEq)]
pub struct EditSession {
    kind: LedgerKind,
    position: Position,
    snapshot: Record,
}

impl EditSession {
    pub fn position(&self) -> Position {
        self.position
    }

    pub fn record(&self) -> &Record {
        &self.snapshot
    }

    /// The loaded record with `edits` laid over it.
    pub fn apply(&self, edits: RecordEdits) -> Record {
        let mut record = self.snapshot.clone();
        if let Some(label) = edits.label {
            record.set_label(label);
        }
        if let Some(amount) = edits.amount {
            record.set_amount(amount);
        }
        if let Some(date) = edits.date {
            record.set_date(date);
        }
        if let Some(notes) = edits.notes {
            record.set_notes(notes);
        }
        record
    }
}

/// Field values to change on a loaded record. `None` keeps the loaded value.
#[derive(Debug, Default, Clone, Eq, PartialEq)]
pub struct RecordEdits {
    pub label: Option<String>,
    pub amount: Option<Amount>,
    pub date: Option<NaiveDate>,
    pub notes: Option<String>,
}

impl RecordEdits {
    pub fn is_empty(&self) -> bool {
        self.label.is_none() && self.amount.is_none() && self.date.is_none() && self.notes.is_none()
    }
}
