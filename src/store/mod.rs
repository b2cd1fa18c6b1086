//! The in-memory record table with positional addressing.
//!
//! `Table` holds the records of one worksheet in storage order. Every record is addressed by its
//! absolute `Position`. Filtering produces a `FilteredView` whose entries carry those absolute
//! positions, so that a row picked from a filtered listing maps back to the right record.
//!
//! Deleting a record shifts every later record down by one. Positions computed before a delete
//! are stale afterwards and must be recomputed by filtering again.

mod filter;

pub use filter::{FilterCriteria, FilteredView, ViewEntry};

use crate::error::{Error, Result};
use crate::model::{Amount, Position, Record};
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Table {
    records: Vec<Record>,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps records that were read from storage. They are not validated.
    pub fn from_records(records: Vec<Record>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn get(&self, position: Position) -> Result<&Record> {
        self.check(position)?;
        Ok(&self.records[position.index()])
    }

    /// Validates `record` and adds it to the end. Returns its position, which is the length of
    /// the table before the append.
    pub fn append(&mut self, record: Record) -> Result<Position> {
        record.validate()?;
        let position = Position::new(self.records.len());
        self.records.push(record);
        Ok(position)
    }

    /// Returns the matching records, in table order, tagged with their absolute positions.
    pub fn filter(&self, criteria: &FilterCriteria) -> FilteredView {
        FilteredView::new(
            self.records
                .iter()
                .enumerate()
                .filter(|(_, record)| criteria.matches(record))
                .map(|(ix, record)| ViewEntry::new(Position::new(ix), record.clone()))
                .collect(),
        )
    }

    /// Replaces the record at `position`. No other position is touched.
    pub fn update(&mut self, position: Position, record: Record) -> Result<()> {
        self.check(position)?;
        record.validate()?;
        self.records[position.index()] = record;
        Ok(())
    }

    /// Removes and returns the record at `position`. Every later record moves down by one.
    pub fn delete(&mut self, position: Position) -> Result<Record> {
        self.check(position)?;
        Ok(self.records.remove(position.index()))
    }

    /// Sum of all amounts, zero when the table is empty.
    pub fn total(&self) -> Amount {
        self.records.iter().map(Record::amount).sum()
    }

    /// Fails with an out-of-range error unless `position` addresses a record.
    pub fn check(&self, position: Position) -> Result<()> {
        if position.index() >= self.records.len() {
            return Err(Error::out_of_range(format!(
                "Position {position} is out of range, the table has {} record{}",
                self.records.len(),
                if self.records.len() == 1 { "" } else { "s" }
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorType;
    use chrono::NaiveDate;
    use std::str::FromStr;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn record(label: &str, amount: &str, day: u32) -> Record {
        Record::new(label, Amount::from_str(amount).unwrap(), date(2024, 1, day), "")
    }

    fn table_of(labels: &[&str]) -> Table {
        let mut table = Table::new();
        for (ix, label) in labels.iter().enumerate() {
            table
                .append(record(label, &format!("{}", ix + 1), ix as u32 + 1))
                .unwrap();
        }
        table
    }

    #[test]
    fn test_append_returns_last_position() {
        let mut table = table_of(&["a", "b"]);
        let r = record("Carol", "30", 3);
        let position = table.append(r.clone()).unwrap();
        assert_eq!(position, Position::new(2));
        let view = table.filter(&FilterCriteria::all());
        let last = view.entries().last().unwrap();
        assert_eq!(last.position(), position);
        assert_eq!(last.record(), &r);
    }

    #[test]
    fn test_append_rejects_invalid() {
        let mut table = Table::new();
        let err = table.append(record("", "10", 1)).unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Validation);
        let err = table.append(record("Bob", "-1", 1)).unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Validation);
        assert!(table.is_empty());
    }

    #[test]
    fn test_filter_on_empty_table() {
        let table = Table::new();
        assert!(table.filter(&FilterCriteria::label("x")).is_empty());
        assert!(table.filter(&FilterCriteria::all()).is_empty());
    }

    #[test]
    fn test_filter_tags_absolute_positions() {
        let table = table_of(&["Alice", "Bob", "Alicia", "Carl", "Malia"]);
        let view = table.filter(&FilterCriteria::label("ali"));
        assert_eq!(
            view.positions(),
            vec![Position::new(0), Position::new(2), Position::new(4)]
        );
        // The second row shown is the third record of the table
        assert_eq!(view.get(1).unwrap().record().label(), "Alicia");
        assert_eq!(view.get(1).unwrap().position(), Position::new(2));
    }

    #[test]
    fn test_filter_is_repeatable_and_does_not_mutate() {
        let table = table_of(&["Alice", "Bob", "Alicia"]);
        let before = table.clone();
        let criteria = FilterCriteria::label("a");
        let first = table.filter(&criteria);
        let second = table.filter(&criteria);
        assert_eq!(first, second);
        assert_eq!(table, before);
    }

    #[test]
    fn test_update_changes_only_its_position() {
        let mut table = table_of(&["a", "b", "c", "d"]);
        let before = table.clone();
        let replacement = record("B2", "99", 20);
        table
            .update(Position::new(1), replacement.clone())
            .unwrap();
        assert_eq!(table.len(), before.len());
        for (ix, (now, was)) in table.records().iter().zip(before.records()).enumerate() {
            if ix == 1 {
                assert_eq!(now, &replacement);
            } else {
                assert_eq!(now, was);
            }
        }
    }

    #[test]
    fn test_update_through_filtered_view_addresses_absolute_row() {
        let mut table = table_of(&["Bob", "Alice", "Carl", "Alicia"]);
        let view = table.filter(&FilterCriteria::label("ali"));
        // The first row of the filtered listing is record 1 of the table, not record 0
        let entry = view.get(0).unwrap();
        table
            .update(entry.position(), record("Alice Cruz", "5", 2))
            .unwrap();
        assert_eq!(table.records()[0].label(), "Bob");
        assert_eq!(table.records()[1].label(), "Alice Cruz");
    }

    #[test]
    fn test_update_out_of_range() {
        let mut table = table_of(&["a", "b"]);
        let err = table
            .update(Position::new(5), record("x", "1", 1))
            .unwrap_err();
        assert_eq!(err.error_type(), ErrorType::OutOfRange);
        let err = table
            .update(Position::new(2), record("x", "1", 1))
            .unwrap_err();
        assert_eq!(err.error_type(), ErrorType::OutOfRange);
    }

    #[test]
    fn test_update_rejects_invalid_without_mutating() {
        let mut table = table_of(&["a", "b"]);
        let before = table.clone();
        let err = table
            .update(Position::new(0), record("", "1", 1))
            .unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Validation);
        assert_eq!(table, before);
    }

    #[test]
    fn test_delete_shifts_later_positions() {
        let mut table = table_of(&["a", "b", "c", "d", "e"]);
        let before = table.clone();
        let removed = table.delete(Position::new(2)).unwrap();
        assert_eq!(&removed, &before.records()[2]);
        assert_eq!(table.len(), before.len() - 1);
        for ix in 0..2 {
            assert_eq!(table.records()[ix], before.records()[ix]);
        }
        for ix in 3..before.len() {
            assert_eq!(table.records()[ix - 1], before.records()[ix]);
        }
    }

    #[test]
    fn test_positions_are_stale_after_delete() {
        let mut table = table_of(&["Alice", "Bob", "Alicia"]);
        let view = table.filter(&FilterCriteria::label("ali"));
        let stale = view.positions();
        assert_eq!(stale, vec![Position::new(0), Position::new(2)]);

        table.delete(stale[0]).unwrap();

        // Position 2 no longer exists
        let err = table.delete(stale[1]).unwrap_err();
        assert_eq!(err.error_type(), ErrorType::OutOfRange);

        // Filtering again yields the fresh position
        let fresh = table.filter(&FilterCriteria::label("ali"));
        assert_eq!(fresh.positions(), vec![Position::new(1)]);
        table.delete(fresh.positions()[0]).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.records()[0].label(), "Bob");
    }

    #[test]
    fn test_delete_out_of_range() {
        let mut table = Table::new();
        let err = table.delete(Position::new(0)).unwrap_err();
        assert_eq!(err.error_type(), ErrorType::OutOfRange);
    }

    #[test]
    fn test_total() {
        assert!(Table::new().total().is_zero());
        let mut table = Table::new();
        table.append(record("a", "10.5", 1)).unwrap();
        table.append(record("b", "2.25", 2)).unwrap();
        assert_eq!(table.total(), Amount::from_str("12.75").unwrap());
    }

    #[test]
    fn test_end_to_end() {
        let mut table = Table::new();
        let alice = record("Alice", "100.0", 5);
        let bob = record("Bob", "50.0", 10);
        table.append(alice.clone()).unwrap();
        table.append(bob.clone()).unwrap();

        let view = table.filter(&FilterCriteria::label("ali"));
        assert_eq!(view.len(), 1);
        assert_eq!(view.get(0).unwrap().position(), Position::new(0));
        assert_eq!(view.get(0).unwrap().record(), &alice);

        table.delete(Position::new(0)).unwrap();

        let view = table.filter(&FilterCriteria::all());
        assert_eq!(view.len(), 1);
        assert_eq!(view.get(0).unwrap().position(), Position::new(0));
        assert_eq!(view.get(0).unwrap().record(), &bob);
    }
}
