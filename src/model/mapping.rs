use std::collections::HashMap;
use std::error::Error as StdError;
use std::fmt::{Display, Formatter};

#[derive(Debug, Default, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct MappingError(String);

impl Display for MappingError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl StdError for MappingError {}

/// The header row of a worksheet. Fields are located by header name rather than by column
/// index, so a worksheet whose columns were reordered by hand is still read correctly.
///
/// Header names are compared after trimming and ignoring case.
#[derive(Default, Debug, Clone, Eq, PartialEq)]
pub struct Mapping {
    headers: Vec<String>,
    header_map: HashMap<String, usize>,
}

impl Mapping {
    pub fn new<S, I>(headers: I) -> Result<Self, MappingError>
    where
        S: Into<String>,
        I: IntoIterator<Item = S>,
    {
        let headers: Vec<String> = headers.into_iter().map(|s| s.into()).collect();
        let mut header_map = HashMap::new();
        for (ix, header) in headers.iter().enumerate() {
            let key = normalize(header);
            // Blank header cells are common in hand-edited sheets and are never looked up
            if key.is_empty() {
                continue;
            }
            if header_map.insert(key, ix).is_some() {
                return Err(MappingError(format!(
                    "Encountered a duplicate header '{header}'"
                )));
            }
        }
        Ok(Self {
            headers,
            header_map,
        })
    }

    pub fn len(&self) -> usize {
        self.headers.len()
    }

    /// True when no header cell has a name, e.g. a header row of blank cells.
    pub fn is_empty(&self) -> bool {
        self.header_map.is_empty()
    }

    pub fn index_of(&self, header: &str) -> Option<usize> {
        self.header_map.get(&normalize(header)).copied()
    }

    /// Returns the cell of `row` under `header`, or an empty string when the worksheet has no such
    /// column or the row is shorter than the header.
    pub fn cell<'a>(&self, row: &'a [String], header: &str) -> &'a str {
        self.index_of(header)
            .and_then(|ix| row.get(ix))
            .map(String::as_str)
            .unwrap_or_default()
    }

    /// Writes `value` into `row` under `header`, growing the row if it is short. Returns false
    /// when the worksheet has no such column.
    pub fn set_cell(&self, row: &mut Vec<String>, header: &str, value: impl Into<String>) -> bool {
        let Some(ix) = self.index_of(header) else {
            return false;
        };
        if row.len() <= ix {
            row.resize(ix + 1, String::new());
        }
        row[ix] = value.into();
        true
    }

    /// Lists the `expected` headers that this worksheet does not have.
    pub fn missing<'a>(&self, expected: &[&'a str]) -> Vec<&'a str> {
        expected
            .iter()
            .filter(|h| self.index_of(h).is_none())
            .copied()
            .collect()
    }
}

fn normalize(header: &str) -> String {
    header.trim().to_lowercase()
}
