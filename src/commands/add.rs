use crate::api;
use crate::args::AddArgs;
use crate::commands::Out;
use crate::model::{Position, Record};
use crate::{Config, Result};
use chrono::Local;

/// Adds a record to the ledger named in `args`. The date defaults to today.
///
/// # Errors
/// - Returns a validation error if the name is blank or the amount is negative. Nothing is written
///   in that case.
/// - Returns a backing store error if the worksheet cannot be read or written.
pub async fn add(config: Config, args: &AddArgs) -> Result<Out<Position>> {
    let date = args.date().unwrap_or_else(|| Local::now().date_naive());
    let record = Record::new(
        args.label().trim(),
        args.amount(),
        date,
        args.notes().unwrap_or_default(),
    );
    let mut ledger = api::ledger(&config, args.kind());
    let position = ledger.append(record).await?;

    let message = format!(
        "Added {} '{}' of {} on {date} at position {position}",
        args.kind().noun(),
        args.label().trim(),
        args.amount().display_with(config.currency_symbol()),
    );
    Ok(Out::new(message, position))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorType;
    use crate::model::{Amount, LedgerKind};
    use crate::test::TestEnv;
    use chrono::NaiveDate;
    use std::str::FromStr;

    #[tokio::test]
    async fn test_add_appends_in_order() {
        let env = TestEnv::new().await;
        let date = NaiveDate::from_ymd_opt(2024, 1, 5);
        let alice = AddArgs::new(
            LedgerKind::Payments,
            " Alice ",
            Amount::from_str("1,500").unwrap(),
            date,
            Some(String::from("cleaning")),
        );
        let out = add(env.config(), &alice).await.unwrap();
        assert_eq!(out.structure(), Some(&Position::new(0)));
        assert_eq!(
            out.message(),
            "Added payment 'Alice' of ₱1,500.00 on 2024-01-05 at position 0"
        );

        let gloves = AddArgs::new(
            LedgerKind::Expenses,
            "Gloves",
            Amount::from_str("200").unwrap(),
            date,
            None,
        );
        let out = add(env.config(), &gloves).await.unwrap();
        assert_eq!(out.structure(), Some(&Position::new(0)));

        assert_eq!(
            env.rows(LedgerKind::Payments).await[1],
            vec!["Alice", "1500.00", "2024-01-05", "cleaning"]
        );
        assert_eq!(
            env.rows(LedgerKind::Expenses).await[1],
            vec!["Gloves", "200.00", "2024-01-05", ""]
        );
    }

    #[tokio::test]
    async fn test_add_defaults_to_today() {
        let env = TestEnv::new().await;
        let args = AddArgs::new(
            LedgerKind::Payments,
            "Bob",
            Amount::from_str("50").unwrap(),
            None,
            None,
        );
        add(env.config(), &args).await.unwrap();
        let today = Local::now().date_naive().format("%Y-%m-%d").to_string();
        assert_eq!(env.rows(LedgerKind::Payments).await[1][2], today);
    }

    #[tokio::test]
    async fn test_add_rejects_invalid() {
        let env = TestEnv::new().await;
        for (label, amount) in [("   ", "10"), ("Carl", "-5")] {
            let args = AddArgs::new(
                LedgerKind::Payments,
                label,
                Amount::from_str(amount).unwrap(),
                None,
                None,
            );
            let err = add(env.config(), &args).await.unwrap_err();
            assert_eq!(err.error_type(), ErrorType::Validation);
        }
        assert_eq!(env.rows(LedgerKind::Payments).await.len(), 1);
    }

    #[tokio::test]
    async fn test_add_fails_when_store_unavailable() {
        let env = TestEnv::new().await;
        env.break_worksheet(LedgerKind::Payments).await;
        let args = AddArgs::new(
            LedgerKind::Payments,
            "Alice",
            Amount::from_str("1").unwrap(),
            None,
            None,
        );
        let err = add(env.config(), &args).await.unwrap_err();
        assert!(err.is_backing_store());
    }
}
