use crate::error::{Error, Result};
use crate::model::{Amount, Position, Record};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Selects records by a case-insensitive substring of the label and an inclusive date range.
/// Either end of the range may be left open. An empty criteria matches every record.
#[derive(Debug, Default, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct FilterCriteria {
    /// Stored lowercased.
    label: Option<String>,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
}

impl FilterCriteria {
    /// Builds criteria from optional parts. A blank label means no label filter.
    ///
    /// # Errors
    /// - Returns a validation error if `from` is after `to`.
    pub fn new(
        label: Option<&str>,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Self> {
        if let (Some(from), Some(to)) = (from, to) {
            if from > to {
                return Err(Error::validation(format!(
                    "The start date {from} is after the end date {to}"
                )));
            }
        }
        Ok(Self {
            label: normalize_label(label),
            from,
            to,
        })
    }

    /// Criteria that match every record.
    pub fn all() -> Self {
        Self::default()
    }

    /// Criteria that match labels containing `needle`, ignoring case. A blank needle matches
    /// every record.
    pub fn label(needle: &str) -> Self {
        Self {
            label: normalize_label(Some(needle)),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.label.is_none() && self.from.is_none() && self.to.is_none()
    }

    /// A record without a date never matches once either date bound is set.
    pub fn matches(&self, record: &Record) -> bool {
        if let Some(needle) = &self.label {
            if !record.label().to_lowercase().contains(needle.as_str()) {
                return false;
            }
        }
        if self.from.is_none() && self.to.is_none() {
            return true;
        }
        let Some(date) = record.date() else {
            return false;
        };
        self.from.map_or(true, |from| date >= from) && self.to.map_or(true, |to| date <= to)
    }
}

fn normalize_label(label: Option<&str>) -> Option<String> {
    label
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase)
}

/// One record of a `FilteredView`, tagged with its absolute position in the full table.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct ViewEntry {
    position: Position,
    record: Record,
}

impl ViewEntry {
    pub(crate) fn new(position: Position, record: Record) -> Self {
        Self { position, record }
    }

    /// The absolute position of the record. This, never the entry's index within the view, is
    /// what update and delete take.
    pub fn position(&self) -> Position {
        self.position
    }

    pub fn record(&self) -> &Record {
        &self.record
    }
}

/// The records of a table that matched some `FilterCriteria`, in table order.
#[derive(Debug, Default, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilteredView {
    entries: Vec<ViewEntry>,
}

impl FilteredView {
    pub(crate) fn new(entries: Vec<ViewEntry>) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[ViewEntry] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &ViewEntry> {
        self.entries.iter()
    }

    /// The entry shown at `view_index`. Use its `position()` to address the record.
    pub fn get(&self, view_index: usize) -> Option<&ViewEntry> {
        self.entries.get(view_index)
    }

    pub fn positions(&self) -> Vec<Position> {
        self.entries.iter().map(ViewEntry::position).collect()
    }

    /// Sum of the amounts in the view, zero when empty.
    pub fn total(&self) -> Amount {
        self.entries.iter().map(|e| e.record.amount()).sum()
    }
}

impl IntoIterator for FilteredView {
    type Item = ViewEntry;
    type IntoIter = std::vec::IntoIter<ViewEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
