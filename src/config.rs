//! Configuration file handling for the clinic ledger.
//!
//! The configuration file is stored at `$LEDGER_HOME/config.json` and names the spreadsheet, the
//! titles of its two worksheets and the currency symbol used when showing amounts. Worksheets are
//! kept under `$LEDGER_HOME/sheets/<spreadsheet name>/`.

use crate::error::{ErrorType, IntoResult, Res, Result};
use crate::model::LedgerKind;
use crate::utils;
use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const APP_NAME: &str = "clinic-ledger";
const CONFIG_VERSION: u8 = 1;
const SHEETS: &str = "sheets";
const CONFIG_JSON: &str = "config.json";
pub(crate) const DEFAULT_SPREADSHEET: &str = "PatientPayments";
const PAYMENTS_TITLE: &str = "Payments";
const EXPENSES_TITLE: &str = "Expenses";
const CURRENCY_SYMBOL: &str = "₱";

/// The `Config` object represents the configuration of the app. You instantiate it by providing
/// the path to `$LEDGER_HOME` and from there it loads `$LEDGER_HOME/config.json`.
#[derive(Debug, Clone)]
pub struct Config {
    root: PathBuf,
    sheets: PathBuf,
    config_path: PathBuf,
    config_file: ConfigFile,
}

impl Config {
    /// Creates the ledger home directory, its `sheets` subdirectory and an initial `config.json`.
    ///
    /// # Arguments
    /// - `dir` - The directory that will be the ledger home, e.g. `$HOME/clinic-ledger`
    /// - `spreadsheet_name` - The name of the spreadsheet holding the two worksheets
    ///
    /// # Errors
    /// - Returns an error if `config.json` already exists or if any file operation fails.
    pub async fn create(dir: impl Into<PathBuf>, spreadsheet_name: &str) -> Result<Self> {
        Self::create_inner(dir.into(), spreadsheet_name)
            .await
            .pub_result(ErrorType::Config)
    }

    async fn create_inner(maybe_relative: PathBuf, spreadsheet_name: &str) -> Res<Self> {
        if spreadsheet_name.trim().is_empty() {
            bail!("The spreadsheet name must not be empty");
        }
        utils::make_dir(&maybe_relative)
            .await
            .context("Unable to create the ledger home directory")?;
        let root = utils::canonicalize(&maybe_relative).await?;

        let config_path = root.join(CONFIG_JSON);
        if utils::exists(&config_path).await {
            bail!(
                "A config file already exists at '{}'",
                config_path.display()
            );
        }

        let sheets = root.join(SHEETS);
        utils::make_dir(&sheets).await?;

        let config_file = ConfigFile {
            spreadsheet_name: spreadsheet_name.trim().to_string(),
            ..ConfigFile::default()
        };
        config_file.save(&config_path).await?;

        Ok(Self {
            root,
            sheets,
            config_path,
            config_file,
        })
    }

    /// This will
    /// - validate that `ledger_home` exists and that the config file exists
    /// - load the config file
    /// - validate that the sheets directory exists
    pub async fn load(ledger_home: impl Into<PathBuf>) -> Result<Self> {
        Self::load_inner(ledger_home.into())
            .await
            .pub_result(ErrorType::Config)
    }

    async fn load_inner(maybe_relative: PathBuf) -> Res<Self> {
        let root = utils::canonicalize(&maybe_relative)
            .await
            .context("The ledger home directory is missing, run 'ledger init' first")?;

        let config_path = root.join(CONFIG_JSON);
        if !config_path.is_file() {
            bail!(
                "The config file is missing '{}', run 'ledger init' first",
                config_path.display()
            )
        }
        let config_file = ConfigFile::load(&config_path).await?;

        let config = Self {
            sheets: root.join(SHEETS),
            root,
            config_path,
            config_file,
        };
        if !config.sheets.is_dir() {
            bail!(
                "The sheets directory is missing '{}'",
                config.sheets.display()
            )
        }
        Ok(config)
    }

    /// Loads the config in `ledger_home` if there is one, otherwise creates it.
    pub async fn load_or_create(
        ledger_home: impl Into<PathBuf>,
        spreadsheet_name: &str,
    ) -> Result<(Self, bool)> {
        let home = ledger_home.into();
        if utils::exists(&home.join(CONFIG_JSON)).await {
            Ok((Self::load(home).await?, false))
        } else {
            Ok((Self::create(home, spreadsheet_name).await?, true))
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn spreadsheet_name(&self) -> &str {
        &self.config_file.spreadsheet_name
    }

    /// The directory holding the worksheets of the configured spreadsheet.
    pub fn spreadsheet_dir(&self) -> PathBuf {
        self.sheets.join(&self.config_file.spreadsheet_name)
    }

    /// The worksheet title for the ledger of `kind`.
    pub fn title(&self, kind: LedgerKind) -> &str {
        match kind {
            LedgerKind::Payments => &self.config_file.payments_title,
            LedgerKind::Expenses => &self.config_file.expenses_title,
        }
    }

    pub fn currency_symbol(&self) -> &str {
        &self.config_file.currency_symbol
    }
}

/// Represents the serialization and deserialization format of the configuration file.
///
/// Example configuration:
/// ```json
/// {
///   "app_name": "clinic-ledger",
///   "config_version": 1,
///   "spreadsheet_name": "PatientPayments",
///   "payments_title": "Payments",
///   "expenses_title": "Expenses",
///   "currency_symbol": "₱"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
struct ConfigFile {
    /// Application name, should always be "clinic-ledger"
    app_name: String,

    /// Configuration file version
    config_version: u8,

    /// Name of the spreadsheet that holds the worksheets
    spreadsheet_name: String,

    /// Title of the worksheet holding patient payments
    #[serde(default = "default_payments_title")]
    payments_title: String,

    /// Title of the worksheet holding clinic expenses
    #[serde(default = "default_expenses_title")]
    expenses_title: String,

    /// Symbol shown in front of amounts
    #[serde(default = "default_currency_symbol")]
    currency_symbol: String,
}

fn default_payments_title() -> String {
    PAYMENTS_TITLE.to_string()
}

fn default_expenses_title() -> String {
    EXPENSES_TITLE.to_string()
}

fn default_currency_symbol() -> String {
    CURRENCY_SYMBOL.to_string()
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            app_name: APP_NAME.to_string(),
            config_version: CONFIG_VERSION,
            spreadsheet_name: DEFAULT_SPREADSHEET.to_string(),
            payments_title: default_payments_title(),
            expenses_title: default_expenses_title(),
            currency_symbol: default_currency_symbol(),
        }
    }
}

impl ConfigFile {
    /// Loads a ConfigFile asynchronously from the specified path.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed, or if it belongs to another app
    async fn load(path: impl AsRef<Path>) -> Res<Self> {
        let path = path.as_ref();
        let config: ConfigFile = utils::deserialize(path).await?;

        anyhow::ensure!(
            config.app_name == APP_NAME,
            "Invalid app_name in config file: expected '{}', got '{}'",
            APP_NAME,
            config.app_name
        );
        anyhow::ensure!(
            config.payments_title != config.expenses_title,
            "The payments and expenses worksheets must have different titles, both are '{}'",
            config.payments_title
        );

        Ok(config)
    }

    /// Saves the ConfigFile to the specified path.
    async fn save(&self, path: impl AsRef<Path>) -> Res<()> {
        let p = path.as_ref();
        let data = serde_json::to_string_pretty(self).context("Unable to serialize config")?;
        utils::write(p, data)
            .await
            .context("Unable to write config file")
    }
}
