use crate::api;
use crate::args::InitArgs;
use crate::commands::Out;
use crate::model::LedgerKind;
use crate::{Config, Result};
use std::path::Path;
use tracing::debug;

/// Creates the ledger home directory, `config.json` and the worksheets of both ledgers.
///
/// Running it on an existing ledger home keeps its configuration, `args` is then ignored, and
/// only creates worksheets that are missing.
///
/// # Arguments
/// - `ledger_home` - The directory that will be the root of the ledger data, e.g.
///   `$HOME/clinic-ledger`
/// - `args` - The name of the spreadsheet to create
///
/// # Errors
/// - Returns an error if any file operations fail.
pub async fn init(ledger_home: &Path, args: &InitArgs) -> Result<Out<()>> {
    let (config, created) = Config::load_or_create(ledger_home, args.spreadsheet_name()).await?;
    for kind in LedgerKind::ALL {
        let mut ledger = api::ledger(&config, kind);
        ledger.ensure().await?;
        debug!("Worksheet '{}' is ready", ledger.title());
    }

    let message = if created {
        format!(
            "Created the ledger at '{}' with spreadsheet '{}'",
            config.root().display(),
            config.spreadsheet_name()
        )
    } else {
        format!(
            "The ledger at '{}' already exists, spreadsheet '{}' is ready",
            config.root().display(),
            config.spreadsheet_name()
        )
    };
    Ok(message.into())
}
