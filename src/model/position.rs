//! Record positions and worksheet rows.
//!
//! A worksheet holds one header row followed by records. A `Position` is the zero-based index of
//! a record in the full, unfiltered table. A `SheetRow` is the one-based row number a spreadsheet
//! shows, which counts the header. The record at `Position(0)` lives on `SheetRow(2)`.
//!
//! All arithmetic between the two lives in this module.

use anyhow::bail;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of header rows above the first record.
pub const HEADER_ROWS: usize = 1;

/// The one-based worksheet row of the first record.
const FIRST_RECORD_ROW: usize = HEADER_ROWS + 1;

/// The zero-based absolute position of a record in a table. Stable until a record at or before
/// it is deleted.
#[derive(
    Debug, Default, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Position(usize);

impl Position {
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(&self) -> usize {
        self.0
    }

    /// The one-based worksheet row holding this record.
    pub fn sheet_row(&self) -> SheetRow {
        SheetRow(self.0 + FIRST_RECORD_ROW)
    }

    /// The index of this record in the raw rows of a worksheet, where index 0 is the header.
    pub fn storage_index(&self) -> usize {
        self.0 + HEADER_ROWS
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Position {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let index = s
            .trim()
            .parse::<usize>()
            .map_err(|e| anyhow::anyhow!("Invalid position '{s}': {e}"))?;
        Ok(Position(index))
    }
}

impl From<SheetRow> for Position {
    fn from(row: SheetRow) -> Self {
        row.position()
    }
}

/// A one-based worksheet row that holds a record. Rows 0 and 1 are not record rows and cannot be
/// constructed.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub struct SheetRow(usize);

impl SheetRow {
    pub fn new(row: usize) -> anyhow::Result<Self> {
        if row < FIRST_RECORD_ROW {
            bail!("Worksheet row {row} does not hold a record, the first record is on row {FIRST_RECORD_ROW}");
        }
        Ok(Self(row))
    }

    /// The one-based row number.
    pub fn number(&self) -> usize {
        self.0
    }

    pub fn position(&self) -> Position {
        Position(self.0 - FIRST_RECORD_ROW)
    }

    /// The index of this row in the raw rows of a worksheet, where index 0 is the header.
    pub fn storage_index(&self) -> usize {
        self.0 - 1
    }

    /// The A1-notation range covering the first `columns` cells of this row, e.g. `A2:D2`.
    pub fn range(&self, columns: usize) -> String {
        let last = column_letters(columns.max(1) - 1);
        format!("A{row}:{last}{row}", row = self.0)
    }
}

impl fmt::Display for SheetRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<usize> for SheetRow {
    type Error = anyhow::Error;

    fn try_from(row: usize) -> Result<Self, Self::Error> {
        SheetRow::new(row)
    }
}

impl From<SheetRow> for usize {
    fn from(row: SheetRow) -> Self {
        row.0
    }
}

impl From<Position> for SheetRow {
    fn from(position: Position) -> Self {
        position.sheet_row()
    }
}

/// Converts a zero-based column index into spreadsheet letters: 0 -> A, 25 -> Z, 26 -> AA.
fn column_letters(mut ix: usize) -> String {
    let mut letters = Vec::new();
    loop {
        letters.push(b'A' + (ix % 26) as u8);
        if ix < 26 {
            break;
        }
        ix = ix / 26 - 1;
    }
    letters.reverse();
    String::from_utf8_lossy(&letters).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_record_is_row_two() {
        let row = Position::new(0).sheet_row();
        assert_eq!(row.number(), 2);
        assert_eq!(row.storage_index(), 1);
        assert_eq!(Position::new(0).storage_index(), 1);
    }

    #[test]
    fn test_position_row_conversions_agree() {
        for ix in 0..500 {
            let position = Position::new(ix);
            let row = position.sheet_row();
            assert_eq!(row.number(), ix + 2);
            assert_eq!(row.position(), position);
            assert_eq!(row.storage_index(), position.storage_index());
            assert_eq!(SheetRow::new(row.number()).unwrap(), row);
            assert_eq!(Position::from(SheetRow::from(position)), position);
        }
    }

    #[test]
    fn test_header_and_row_zero_are_not_record_rows() {
        assert!(SheetRow::new(0).is_err());
        assert!(SheetRow::new(1).is_err());
        assert_eq!(SheetRow::new(2).unwrap().position(), Position::new(0));
    }

    #[test]
    fn test_range() {
        assert_eq!(Position::new(0).sheet_row().range(4), "A2:D2");
        assert_eq!(Position::new(8).sheet_row().range(4), "A10:D10");
        assert_eq!(SheetRow::new(3).unwrap().range(1), "A3:A3");
        assert_eq!(SheetRow::new(3).unwrap().range(0), "A3:A3");
        assert_eq!(SheetRow::new(5).unwrap().range(28), "A5:AB5");
    }

    #[test]
    fn test_column_letters() {
        assert_eq!(column_letters(0), "A");
        assert_eq!(column_letters(25), "Z");
        assert_eq!(column_letters(26), "AA");
        assert_eq!(column_letters(51), "AZ");
        assert_eq!(column_letters(52), "BA");
        assert_eq!(column_letters(701), "ZZ");
        assert_eq!(column_letters(702), "AAA");
    }

    #[test]
    fn test_position_from_str() {
        assert_eq!("3".parse::<Position>().unwrap(), Position::new(3));
        assert_eq!(" 0 ".parse::<Position>().unwrap(), Position::new(0));
        assert!("-1".parse::<Position>().is_err());
        assert!("two".parse::<Position>().is_err());
    }

    #[test]
    fn test_serde() {
        assert_eq!(serde_json::to_string(&Position::new(4)).unwrap(), "4");
        assert_eq!(
            serde_json::to_string(&Position::new(4).sheet_row()).unwrap(),
            "6"
        );
        let row: SheetRow = serde_json::from_str("6").unwrap();
        assert_eq!(row.position(), Position::new(4));
        assert!(serde_json::from_str::<SheetRow>("1").is_err());
    }
}
