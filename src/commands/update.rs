use crate::api::{self, RecordEdits};
use crate::args::UpdateArgs;
use crate::commands::Out;
use crate::error::Error;
use crate::model::Record;
use crate::{Config, Result};
use tracing::debug;

/// Changes the fields given in `args` on the record at an absolute position. Fields that are not
/// given keep their current value.
///
/// # Errors
/// - Returns a validation error if no field is given or if the edited record is invalid.
/// - Returns an out of range error if there is no record at the position.
/// - Returns a stale error if the record changed between being loaded and being written.
pub async fn update(config: Config, args: &UpdateArgs) -> Result<Out<Record>> {
    let edits = RecordEdits {
        label: args.label().map(|s| s.trim().to_string()),
        amount: args.amount(),
        date: args.date(),
        notes: args.notes().map(String::from),
    };
    if edits.is_empty() {
        return Err(Error::validation(
            "Nothing to update, give at least one of --label, --amount, --date or --notes",
        ));
    }

    let mut ledger = api::ledger(&config, args.kind());
    let session = ledger.load(args.position()).await?;
    let position = session.position();
    debug!("Loaded {:?} at position {position}", session.record());
    let record = session.apply(edits);
    ledger.save(session, record.clone()).await?;

    let message = format!(
        "Updated {} '{}' at position {position} (row {})",
        args.kind().noun(),
        record.label(),
        position.sheet_row()
    );
    Ok(Out::new(message, record))
}
