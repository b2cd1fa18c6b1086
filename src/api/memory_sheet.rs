//! Implements the `Sheet` trait with in-memory data for testing purposes.

use crate::api::{record_row_index, Sheet};
use crate::error::Res;
use crate::model::SheetRow;
use anyhow::{bail, Context};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

type Worksheets = HashMap<String, Vec<Vec<String>>>;

/// An in-memory spreadsheet. Clones share the same data, so a test can hand one clone to a
/// `Ledger` and inspect or tamper with the rows through another.
#[derive(Clone, Default)]
pub(crate) struct MemorySheet {
    data: Arc<Mutex<Worksheets>>,
    offline: Arc<AtomicBool>,
    calls: Arc<AtomicUsize>,
}

impl MemorySheet {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Makes every following call fail as if the store could not be reached.
    pub(crate) fn go_offline(&self) {
        self.offline.store(true, Ordering::SeqCst);
    }

    /// The rows of worksheet `name`, header first, or an empty list if it does not exist.
    pub(crate) fn rows(&self, name: &str) -> Vec<Vec<String>> {
        self.lock().get(name).cloned().unwrap_or_default()
    }

    pub(crate) fn set_rows(&self, name: &str, rows: Vec<Vec<String>>) {
        self.lock().insert(name.to_string(), rows);
    }

    /// The number of `Sheet` calls made so far, successful or not.
    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Worksheets> {
        self.data.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn check(&self) -> Res<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.offline.load(Ordering::SeqCst) {
            bail!("The spreadsheet service is unreachable");
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl Sheet for MemorySheet {
    async fn read_all(&mut self, name: &str) -> Res<Vec<Vec<String>>> {
        self.check()?;
        self.lock()
            .get(name)
            .with_context(|| format!("Worksheet '{name}' not found"))
            .cloned()
    }

    async fn append_one(&mut self, name: &str, values: &[String]) -> Res<()> {
        self.check()?;
        let mut data = self.lock();
        let rows = data
            .get_mut(name)
            .with_context(|| format!("Worksheet '{name}' not found"))?;
        rows.push(values.to_vec());
        Ok(())
    }

    async fn write_range(&mut self, name: &str, row: SheetRow, values: &[String]) -> Res<()> {
        self.check()?;
        let mut data = self.lock();
        let rows = data
            .get_mut(name)
            .with_context(|| format!("Worksheet '{name}' not found"))?;
        let ix = record_row_index(rows, name, row)?;
        rows[ix] = values.to_vec();
        Ok(())
    }

    async fn remove_at(&mut self, name: &str, row: SheetRow) -> Res<()> {
        self.check()?;
        let mut data = self.lock();
        let rows = data
            .get_mut(name)
            .with_context(|| format!("Worksheet '{name}' not found"))?;
        let ix = record_row_index(rows, name, row)?;
        rows.remove(ix);
        Ok(())
    }

    async fn create_if_absent(&mut self, name: &str, headers: &[&str]) -> Res<()> {
        self.check()?;
        self.lock()
            .entry(name.to_string())
            .or_insert_with(|| vec![headers.iter().map(|h| h.to_string()).collect()]);
        Ok(())
    }
}
