use crate::api;
use crate::commands::Out;
use crate::model::{Amount, LedgerKind};
use crate::{Config, Result};
use serde::Serialize;
use std::fmt::{Display, Formatter};
use tracing::warn;

/// Totals across both ledgers.
#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    total_payments: Amount,
    total_expenses: Amount,
    /// Payments minus expenses. May be negative.
    net_income: Amount,
    #[serde(skip)]
    currency_symbol: String,
}

impl Summary {
    pub fn total_payments(&self) -> Amount {
        self.total_payments
    }

    pub fn total_expenses(&self) -> Amount {
        self.total_expenses
    }

    pub fn net_income(&self) -> Amount {
        self.net_income
    }
}

impl Display for Summary {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let symbol = &self.currency_symbol;
        writeln!(
            f,
            "Total payments: {}",
            self.total_payments.display_with(symbol)
        )?;
        writeln!(
            f,
            "Total expenses: {}",
            self.total_expenses.display_with(symbol)
        )?;
        writeln!(f, "Net income:     {}", self.net_income.display_with(symbol))
    }
}

/// Totals the payments and the expenses and computes net income.
///
/// A ledger whose worksheet cannot be read counts as zero and a warning is logged.
pub async fn summary(config: Config) -> Result<Out<Summary>> {
    let total_payments = total_or_zero(&config, LedgerKind::Payments).await?;
    let total_expenses = total_or_zero(&config, LedgerKind::Expenses).await?;
    let summary = Summary {
        total_payments,
        total_expenses,
        net_income: total_payments - total_expenses,
        currency_symbol: config.currency_symbol().to_string(),
    };
    let message = format!(
        "Net income is {}",
        summary.net_income.display_with(config.currency_symbol())
    );
    Ok(Out::new(message, summary))
}

async fn total_or_zero(config: &Config, kind: LedgerKind) -> Result<Amount> {
    let mut ledger = api::ledger(config, kind);
    match ledger.total().await {
        Ok(total) => Ok(total),
        Err(e) if e.is_backing_store() => {
            warn!(
                "Unable to read worksheet '{}', counting {kind} as zero: {e}",
                ledger.title()
            );
            Ok(Amount::ZERO)
        }
        Err(e) => Err(e),
    }
}
