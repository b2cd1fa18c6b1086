//! Implements the `Sheet` trait with one CSV file per worksheet.
//!
//! A spreadsheet is a directory and each worksheet is `<title>.csv` inside it. Every write
//! rewrites the whole file, which is fine for the few hundred rows a clinic ledger holds.

use crate::api::{record_row_index, Sheet};
use crate::error::Res;
use crate::model::SheetRow;
use crate::utils;
use anyhow::{bail, Context};
use std::io::Cursor;
use std::path::PathBuf;
use tracing::trace;

pub(crate) struct CsvSheet {
    dir: PathBuf,
}

impl CsvSheet {
    pub(crate) fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.csv"))
    }

    async fn load(&self, name: &str) -> Res<Vec<Vec<String>>> {
        let path = self.path(name);
        if !utils::exists(&path).await {
            bail!("Worksheet '{name}' does not exist at {}", path.display());
        }
        let data = utils::read(&path).await?;
        parse_csv(&data).with_context(|| format!("Unable to parse worksheet '{name}'"))
    }

    async fn save(&self, name: &str, rows: &[Vec<String>]) -> Res<()> {
        let data = write_csv(rows).with_context(|| format!("Unable to encode worksheet '{name}'"))?;
        utils::write(self.path(name), data).await
    }
}

#[async_trait::async_trait]
impl Sheet for CsvSheet {
    async fn read_all(&mut self, name: &str) -> Res<Vec<Vec<String>>> {
        trace!("read_all for {name}");
        self.load(name).await
    }

    async fn append_one(&mut self, name: &str, values: &[String]) -> Res<()> {
        trace!("append_one for {name}");
        let mut rows = self.load(name).await?;
        rows.push(values.to_vec());
        self.save(name, &rows).await
    }

    async fn write_range(&mut self, name: &str, row: SheetRow, values: &[String]) -> Res<()> {
        trace!("write_range for {name} at {}", row.range(values.len()));
        let mut rows = self.load(name).await?;
        let ix = record_row_index(&rows, name, row)?;
        rows[ix] = values.to_vec();
        self.save(name, &rows).await
    }

    async fn remove_at(&mut self, name: &str, row: SheetRow) -> Res<()> {
        trace!("remove_at for {name} at row {row}");
        let mut rows = self.load(name).await?;
        let ix = record_row_index(&rows, name, row)?;
        rows.remove(ix);
        self.save(name, &rows).await
    }

    async fn create_if_absent(&mut self, name: &str, headers: &[&str]) -> Res<()> {
        let path = self.path(name);
        if utils::exists(&path).await {
            trace!("Worksheet '{name}' already exists");
            return Ok(());
        }
        utils::make_dir(&self.dir).await?;
        let header_row: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
        self.save(name, &[header_row]).await
    }
}

/// Parses CSV text into rows. Rows may have differing lengths.
pub(crate) fn parse_csv(data: &str) -> Res<Vec<Vec<String>>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(Cursor::new(data.as_bytes()));

    let mut rows: Vec<Vec<String>> = Vec::new();
    for result in rdr.records() {
        let record = result?;
        rows.push(record.iter().map(|field| field.to_string()).collect());
    }
    Ok(rows)
}

/// Encodes rows as CSV text.
pub(crate) fn write_csv(rows: &[Vec<String>]) -> Res<String> {
    let mut wtr = csv::WriterBuilder::new()
        .flexible(true)
        .from_writer(Vec::new());
    for row in rows {
        wtr.write_record(row)?;
    }
    let bytes = wtr.into_inner().context("Unable to flush CSV writer")?;
    String::from_utf8(bytes).context("CSV output was not UTF-8")
}
