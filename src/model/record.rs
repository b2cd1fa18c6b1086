use crate::error::{Error, Result};
use crate::model::{Amount, LedgerKind, Mapping};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::warn;

/// Date formats accepted when reading a worksheet. The first one is also the written format.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d"];

/// One row of a ledger: who or what it was for, how much, when, and free-form notes.
///
/// A `Record` built by `Record::new` is not checked until it is handed to the store, which calls
/// `Record::validate`. Records read from a worksheet are never rejected, because dropping a row
/// would shift the position of every row after it.
#[derive(Default, Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Record {
    label: String,
    amount: Amount,
    /// `None` only for rows read from a worksheet whose date cell is blank or unreadable.
    date: Option<NaiveDate>,
    notes: String,
}

impl Record {
    pub fn new(
        label: impl Into<String>,
        amount: Amount,
        date: NaiveDate,
        notes: impl Into<String>,
    ) -> Self {
        Self {
            label: label.into(),
            amount,
            date: Some(date),
            notes: notes.into(),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }

    pub fn set_label(&mut self, label: impl Into<String>) {
        self.label = label.into();
    }

    pub fn set_amount(&mut self, amount: Amount) {
        self.amount = amount;
    }

    pub fn set_date(&mut self, date: NaiveDate) {
        self.date = Some(date);
    }

    pub fn set_notes(&mut self, notes: impl Into<String>) {
        self.notes = notes.into();
    }

    /// Checks the rules every stored record must satisfy: a non-blank label, an amount that is
    /// not negative and is whole cents, and a date.
    pub fn validate(&self) -> Result<()> {
        if self.label.trim().is_empty() {
            return Err(Error::validation("The name must not be empty"));
        }
        if self.amount.is_negative() {
            return Err(Error::validation(format!(
                "The amount must not be negative, got {}",
                self.amount
            )));
        }
        if !self.amount.is_whole_cents() {
            return Err(Error::validation(format!(
                "The amount must have at most two decimal places, got {}",
                self.amount.value()
            )));
        }
        if self.date.is_none() {
            return Err(Error::validation("A date is required"));
        }
        Ok(())
    }

    /// Reads a record out of a worksheet row, locating each field by header. Unreadable amounts
    /// become zero and unreadable dates become `None`, both with a warning.
    pub(crate) fn from_row(kind: LedgerKind, mapping: &Mapping, row: &[String]) -> Self {
        let label = mapping.cell(row, kind.label_header()).to_string();

        let amount_cell = mapping.cell(row, kind.amount_header());
        let amount = Amount::from_str(amount_cell).unwrap_or_else(|e| {
            warn!("Treating unreadable {kind} amount '{amount_cell}' for '{label}' as zero: {e}");
            Amount::ZERO
        });

        let date_cell = mapping.cell(row, kind.date_header());
        let date = parse_date(date_cell);
        if date.is_none() && !date_cell.trim().is_empty() {
            warn!("Unreadable {kind} date '{date_cell}' for '{label}'");
        }

        Self {
            label,
            amount,
            date,
            notes: mapping.cell(row, kind.notes_header()).to_string(),
        }
    }

    /// Writes this record's fields into `row` under their headers. Cells under other headers
    /// are left as they are.
    pub(crate) fn write_row(&self, kind: LedgerKind, mapping: &Mapping, row: &mut Vec<String>) {
        let cells = [
            (kind.label_header(), self.label.clone()),
            (kind.amount_header(), self.amount.to_string()),
            (kind.date_header(), self.date_cell()),
            (kind.notes_header(), self.notes.clone()),
        ];
        for (header, value) in cells {
            if !mapping.set_cell(row, header, value) {
                warn!("The {kind} worksheet has no '{header}' column, the value was not written");
            }
        }
    }

    /// The date as written to a worksheet, or an empty string when there is none.
    pub fn date_cell(&self) -> String {
        self.date
            .map(|d| d.format(DATE_FORMATS[0]).to_string())
            .unwrap_or_default()
    }
}

/// Parses a date cell in any of the accepted formats.
pub(crate) fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}
