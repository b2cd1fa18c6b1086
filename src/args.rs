//! These structs provide the CLI interface for the ledger CLI.

use crate::config::DEFAULT_SPREADSHEET;
use crate::model::{parse_date, Amount, LedgerKind, Position};
use crate::store::FilterCriteria;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::error;
use tracing_subscriber::filter::LevelFilter;

/// ledger: record clinic payments and expenses.
///
/// Patient payments and clinic expenses are kept in two worksheets of a spreadsheet stored in
/// your ledger home directory. You can add records, list them with filters, total them, export
/// them as CSV, and edit or delete them by position.
///
/// Positions are the `#` column shown by `ledger list`. They count every record of the worksheet
/// from 0, whatever filter was used for the listing. Deleting a record moves every record after
/// it up by one, so list again before editing or deleting another one.
#[derive(Debug, Parser, Clone)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub fn new(common: Common, command: Command) -> Self {
        Self { common, command }
    }

    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create the ledger home directory, its configuration file and both worksheets.
    ///
    /// Running it again is harmless: an existing configuration is kept and missing worksheets are
    /// created.
    Init(InitArgs),
    /// Add a payment or an expense.
    Add(AddArgs),
    /// List payments or expenses, optionally filtered by name and date range.
    List(ListArgs),
    /// Change fields of the record at a position. Fields that are not given keep their value.
    Update(UpdateArgs),
    /// Delete the record at a position.
    Delete(DeleteArgs),
    /// Write the filtered payments or expenses to a CSV file.
    Export(ExportArgs),
    /// Show total payments, total expenses and net income.
    Summary,
}

/// Arguments common to all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG.
    #[arg(long, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,

    /// The directory where ledger data and configuration is held. Defaults to ~/clinic-ledger
    #[arg(long, env = "LEDGER_HOME", default_value_t = default_ledger_home())]
    ledger_home: DisplayPath,
}

impl Common {
    pub fn new(log_level: LevelFilter, ledger_home: PathBuf) -> Self {
        Self {
            log_level,
            ledger_home: ledger_home.into(),
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn ledger_home(&self) -> &DisplayPath {
        &self.ledger_home
    }
}

/// Args for the `ledger init` command.
#[derive(Debug, Parser, Clone)]
pub struct InitArgs {
    /// The name of the spreadsheet that holds the Payments and Expenses worksheets.
    #[arg(long, default_value = DEFAULT_SPREADSHEET)]
    spreadsheet_name: String,
}

impl InitArgs {
    pub fn new(spreadsheet_name: impl Into<String>) -> Self {
        Self {
            spreadsheet_name: spreadsheet_name.into(),
        }
    }

    pub fn spreadsheet_name(&self) -> &str {
        &self.spreadsheet_name
    }
}

/// Args for the `ledger add` command.
#[derive(Debug, Parser, Clone)]
pub struct AddArgs {
    /// Which ledger to add to.
    kind: LedgerKind,

    /// The patient name for a payment or the expense name for an expense.
    #[arg(long, visible_alias = "name")]
    label: String,

    /// The amount, e.g. 1500 or 1,500.00. Must not be negative.
    #[arg(long, allow_hyphen_values = true)]
    amount: Amount,

    /// The date as YYYY-MM-DD or M/D/YYYY. Defaults to today.
    #[arg(long, value_parser = parse_date_arg)]
    date: Option<NaiveDate>,

    /// Free-form notes.
    #[arg(long)]
    notes: Option<String>,
}

impl AddArgs {
    pub fn new(
        kind: LedgerKind,
        label: impl Into<String>,
        amount: Amount,
        date: Option<NaiveDate>,
        notes: Option<String>,
    ) -> Self {
        Self {
            kind,
            label: label.into(),
            amount,
            date,
            notes,
        }
    }

    pub fn kind(&self) -> LedgerKind {
        self.kind
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

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }
}

/// Filters shared by `ledger list` and `ledger export`.
#[derive(Debug, Default, Parser, Clone)]
pub struct FilterArgs {
    /// Only records whose name contains this text, ignoring case.
    #[arg(long, visible_alias = "name")]
    label: Option<String>,

    /// Only records dated on or after this date.
    #[arg(long, value_parser = parse_date_arg)]
    from: Option<NaiveDate>,

    /// Only records dated on or before this date.
    #[arg(long, value_parser = parse_date_arg)]
    to: Option<NaiveDate>,
}

impl FilterArgs {
    pub fn new(label: Option<String>, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        Self { label, from, to }
    }

    /// Converts the filter arguments into `FilterCriteria`, checking the date range.
    pub fn criteria(&self) -> crate::Result<FilterCriteria> {
        FilterCriteria::new(self.label.as_deref(), self.from, self.to)
    }
}

/// How `ledger list` prints its records.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// An aligned table with positions, worksheet rows and totals.
    #[default]
    Table,
    /// JSON with positions, records and totals.
    Json,
    /// CSV with the header row first, like `ledger export`.
    Csv,
}

serde_plain::derive_display_from_serialize!(OutputFormat);
serde_plain::derive_fromstr_from_deserialize!(OutputFormat);

/// Args for the `ledger list` command.
#[derive(Debug, Parser, Clone)]
pub struct ListArgs {
    /// Which ledger to list.
    kind: LedgerKind,

    #[clap(flatten)]
    filter: FilterArgs,

    /// Output format.
    #[arg(long, default_value_t = OutputFormat::Table)]
    format: OutputFormat,
}

impl ListArgs {
    pub fn new(kind: LedgerKind, filter: FilterArgs, format: OutputFormat) -> Self {
        Self {
            kind,
            filter,
            format,
        }
    }

    pub fn kind(&self) -> LedgerKind {
        self.kind
    }

    pub fn filter(&self) -> &FilterArgs {
        &self.filter
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }
}

/// Args for the `ledger update` command.
#[derive(Debug, Parser, Clone)]
pub struct UpdateArgs {
    /// Which ledger holds the record.
    kind: LedgerKind,

    /// The position of the record, as shown in the `#` column of `ledger list`.
    position: Position,

    /// New patient or expense name.
    #[arg(long, visible_alias = "name")]
    label: Option<String>,

    /// New amount.
    #[arg(long, allow_hyphen_values = true)]
    amount: Option<Amount>,

    /// New date.
    #[arg(long, value_parser = parse_date_arg)]
    date: Option<NaiveDate>,

    /// New notes. Pass an empty string to clear them.
    #[arg(long)]
    notes: Option<String>,
}

impl UpdateArgs {
    pub fn new(kind: LedgerKind, position: Position) -> Self {
        Self {
            kind,
            position,
            label: None,
            amount: None,
            date: None,
            notes: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_amount(mut self, amount: Amount) -> Self {
        self.amount = Some(amount);
        self
    }

    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn kind(&self) -> LedgerKind {
        self.kind
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn amount(&self) -> Option<Amount> {
        self.amount
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }
}

/// Args for the `ledger delete` command.
#[derive(Debug, Parser, Clone)]
pub struct DeleteArgs {
    /// Which ledger holds the record.
    kind: LedgerKind,

    /// The position of the record, as shown in the `#` column of `ledger list`.
    position: Position,
}

impl DeleteArgs {
    pub fn new(kind: LedgerKind, position: Position) -> Self {
        Self { kind, position }
    }

    pub fn kind(&self) -> LedgerKind {
        self.kind
    }

    pub fn position(&self) -> Position {
        self.position
    }
}

/// Args for the `ledger export` command.
#[derive(Debug, Parser, Clone)]
pub struct ExportArgs {
    /// Which ledger to export.
    kind: LedgerKind,

    #[clap(flatten)]
    filter: FilterArgs,

    /// The CSV file to write, e.g. filtered_payments.csv
    #[arg(long, short)]
    output: PathBuf,
}

impl ExportArgs {
    pub fn new(kind: LedgerKind, filter: FilterArgs, output: impl Into<PathBuf>) -> Self {
        Self {
            kind,
            filter,
            output: output.into(),
        }
    }

    pub fn kind(&self) -> LedgerKind {
        self.kind
    }

    pub fn filter(&self) -> &FilterArgs {
        &self.filter
    }

    pub fn output(&self) -> &Path {
        &self.output
    }
}

fn parse_date_arg(s: &str) -> Result<NaiveDate, String> {
    parse_date(s).ok_or_else(|| format!("'{s}' is not a date, use YYYY-MM-DD or M/D/YYYY"))
}

fn default_ledger_home() -> DisplayPath {
    DisplayPath(match dirs::home_dir() {
        Some(home) => home.join("clinic-ledger"),
        None => {
            error!(
                "There was an error when trying to get your home directory. You can get around \
                this by providing --ledger-home or LEDGER_HOME instead of relying on the default \
                ledger home directory. If you continue using the program right now, you may have \
                problems!",
            );
            PathBuf::from("clinic-ledger")
        }
    })
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct DisplayPath(PathBuf);

impl From<PathBuf> for DisplayPath {
    fn from(value: PathBuf) -> Self {
        DisplayPath(value)
    }
}

impl Deref for DisplayPath {
    type Target = Path;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<Path> for DisplayPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl Display for DisplayPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_string_lossy())
    }
}

impl FromStr for DisplayPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(PathBuf::from(s)))
    }
}

impl DisplayPath {
    pub fn path(&self) -> &Path {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorType;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("ledger").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_parse_add() {
        let args = parse(&[
            "--ledger-home",
            "/tmp/l",
            "add",
            "payments",
            "--name",
            "Alice",
            "--amount",
            "1,500.50",
            "--date",
            "1/5/2024",
        ]);
        assert_eq!(args.common().ledger_home().path(), Path::new("/tmp/l"));
        let Command::Add(add) = args.command() else {
            panic!("expected add, got {:?}", args.command());
        };
        assert_eq!(add.kind(), LedgerKind::Payments);
        assert_eq!(add.label(), "Alice");
        assert_eq!(add.amount(), Amount::from_str("1500.50").unwrap());
        assert_eq!(add.date(), NaiveDate::from_ymd_opt(2024, 1, 5));
        assert_eq!(add.notes(), None);
    }

    #[test]
    fn test_parse_list_filters() {
        let args = parse(&[
            "list",
            "expenses",
            "--label",
            "gloves",
            "--from",
            "2024-01-01",
            "--format",
            "csv",
        ]);
        let Command::List(list) = args.command() else {
            panic!("expected list");
        };
        assert_eq!(list.kind(), LedgerKind::Expenses);
        assert_eq!(list.format(), OutputFormat::Csv);
        let criteria = list.filter().criteria().unwrap();
        assert!(!criteria.is_empty());
    }

    #[test]
    fn test_parse_update_and_delete_positions() {
        let args = parse(&["update", "payments", "3", "--notes", ""]);
        let Command::Update(update) = args.command() else {
            panic!("expected update");
        };
        assert_eq!(update.position(), Position::new(3));
        assert_eq!(update.notes(), Some(""));
        assert_eq!(update.label(), None);

        let args = parse(&["delete", "expenses", "0"]);
        let Command::Delete(delete) = args.command() else {
            panic!("expected delete");
        };
        assert_eq!(delete.position(), Position::new(0));
    }

    #[test]
    fn test_bad_values_are_rejected() {
        for bad in [
            vec!["ledger", "add", "payments", "--label", "A", "--amount", "lots"],
            vec!["ledger", "add", "payments", "--label", "A", "--amount", "1", "--date", "soon"],
            vec!["ledger", "delete", "payments", "-1"],
            vec!["ledger", "list", "refunds"],
        ] {
            assert!(Args::try_parse_from(bad.clone()).is_err(), "{bad:?}");
        }
    }

    #[test]
    fn test_reversed_range() {
        let filter = FilterArgs::new(
            None,
            NaiveDate::from_ymd_opt(2024, 2, 1),
            NaiveDate::from_ymd_opt(2024, 1, 1),
        );
        assert_eq!(
            filter.criteria().unwrap_err().error_type(),
            ErrorType::Validation
        );
    }
}
