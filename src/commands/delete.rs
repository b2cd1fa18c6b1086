//! Delete command handler.

use crate::api;
use crate::args::DeleteArgs;
use crate::commands::Out;
use crate::model::Record;
use crate::{Config, Result};
use tracing::debug;

/// Deletes the record at an absolute position and returns it. The record is loaded first and
/// the delete is refused if it changed before the row is removed.
///
/// Every record after it moves up one position, so positions from an earlier listing are stale
/// once this returns.
pub async fn delete(config: Config, args: &DeleteArgs) -> Result<Out<Record>> {
    let mut ledger = api::ledger(&config, args.kind());
    let session = ledger.load(args.position()).await?;
    debug!("Deleting {:?}", session.record());
    let removed = ledger.discard(session).await?;

    let message = format!(
        "Deleted {} '{}' of {} at position {}",
        args.kind().noun(),
        removed.label(),
        removed.amount().display_with(config.currency_symbol()),
        args.position()
    );
    Ok(Out::new(message, removed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args::{FilterArgs, ListArgs, OutputFormat};
    use crate::commands::list;
    use crate::error::ErrorType;
    use crate::model::{LedgerKind, Position};
    use crate::test::TestEnv;

    #[tokio::test]
    async fn test_delete_by_filtered_position() {
        let env = TestEnv::new().await;
        env.add(LedgerKind::Payments, "Alice", "100", 5).await;
        env.add(LedgerKind::Payments, "Bob", "50", 10).await;

        let filter = FilterArgs::new(Some(String::from("bob")), None, None);
        let args = ListArgs::new(LedgerKind::Payments, filter, OutputFormat::Table);
        let out = list(env.config(), &args).await.unwrap();
        let position = out.structure().unwrap().entries().get(0).unwrap().position();
        assert_eq!(position, Position::new(1));

        let out = delete(env.config(), &DeleteArgs::new(LedgerKind::Payments, position))
            .await
            .unwrap();
        assert_eq!(out.structure().unwrap().label(), "Bob");
        assert_eq!(
            out.message(),
            "Deleted payment 'Bob' of ₱50.00 at position 1"
        );

        let rows = env.rows(LedgerKind::Payments).await;
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1][0], "Alice");
    }

    #[tokio::test]
    async fn test_delete_out_of_range() {
        let env = TestEnv::new().await;
        env.add(LedgerKind::Expenses, "Gloves", "200", 3).await;
        let args = DeleteArgs::new(LedgerKind::Expenses, Position::new(1));
        let err = delete(env.config(), &args).await.unwrap_err();
        assert_eq!(err.error_type(), ErrorType::OutOfRange);
        assert_eq!(env.rows(LedgerKind::Expenses).await.len(), 2);
    }
}
