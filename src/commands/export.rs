use crate::api;
use crate::args::ExportArgs;
use crate::commands::{count, Out};
use crate::error::{ErrorType, IntoResult};
use crate::{report, utils};
use crate::{Config, Result};
use anyhow::Context;
use std::path::PathBuf;

/// Writes the records matching the filter in `args` to a CSV file, header row first.
///
/// Unlike `list`, an unreadable worksheet is an error here, so that an export never silently
/// produces an empty file.
pub async fn export(config: Config, args: &ExportArgs) -> Result<Out<PathBuf>> {
    let criteria = args.filter().criteria()?;
    let mut ledger = api::ledger(&config, args.kind());
    let view = ledger.filter(&criteria).await?;

    let data = report::to_csv(args.kind(), &view).pub_result(ErrorType::Io)?;
    let path = args.output().to_path_buf();
    utils::write(&path, data)
        .await
        .with_context(|| format!("Unable to export {}", args.kind()))
        .pub_result(ErrorType::Io)?;

    let message = format!(
        "Exported {} to '{}'",
        count(view.len(), args.kind().noun()),
        path.display()
    );
    Ok(Out::new(message, path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args::FilterArgs;
    use crate::model::LedgerKind;
    use crate::test::TestEnv;

    #[tokio::test]
    async fn test_export_filtered() {
        let env = TestEnv::new().await;
        env.add(LedgerKind::Payments, "Alice", "100", 5).await;
        env.add(LedgerKind::Payments, "Bob", "50", 10).await;
        let output = env.path("filtered_payments.csv");

        let filter = FilterArgs::new(Some(String::from("bob")), None, None);
        let args = ExportArgs::new(LedgerKind::Payments, filter, &output);
        let out = export(env.config(), &args).await.unwrap();
        assert!(out.message().starts_with("Exported 1 payment to"));

        let text = std::fs::read_to_string(&output).unwrap();
        assert_eq!(
            text,
            "Patient Name,Amount Paid,Date,Notes\nBob,50.00,2024-01-10,\n"
        );
    }

    #[tokio::test]
    async fn test_export_errors() {
        let env = TestEnv::new().await;
        let args = ExportArgs::new(
            LedgerKind::Expenses,
            FilterArgs::default(),
            env.path("missing/dir/out.csv"),
        );
        let err = export(env.config(), &args).await.unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Io);

        env.break_worksheet(LedgerKind::Expenses).await;
        let args = ExportArgs::new(LedgerKind::Expenses, FilterArgs::default(), env.path("e.csv"));
        let err = export(env.config(), &args).await.unwrap_err();
        assert!(err.is_backing_store());
        assert!(!env.path("e.csv").exists());
    }
}
