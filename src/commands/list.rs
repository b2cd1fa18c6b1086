use crate::api;
use crate::args::{ListArgs, OutputFormat};
use crate::commands::{count, Out};
use crate::error::{ErrorType, IntoResult};
use crate::model::{Amount, LedgerKind};
use crate::report;
use crate::store::{FilteredView, Table};
use crate::{Config, Result};
use serde::Serialize;
use std::fmt::{Display, Formatter};
use tracing::warn;

/// The records of a ledger that matched a filter, with totals, as printed by `ledger list`.
#[derive(Debug, Clone, Serialize)]
pub struct Listing {
    kind: LedgerKind,
    /// Sum of every record in the ledger.
    total: Amount,
    /// Sum of the listed records.
    filtered_total: Amount,
    entries: FilteredView,
    /// The listing in the requested output format.
    #[serde(skip)]
    rendered: String,
}

impl Listing {
    pub fn kind(&self) -> LedgerKind {
        self.kind
    }

    pub fn total(&self) -> Amount {
        self.total
    }

    pub fn filtered_total(&self) -> Amount {
        self.filtered_total
    }

    pub fn entries(&self) -> &FilteredView {
        &self.entries
    }
}

impl Display for Listing {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.rendered)
    }
}

/// Lists the records of a ledger that match the filter in `args`.
///
/// Each listed record carries its absolute position in the ledger, which is what `update` and
/// `delete` take. If the worksheet cannot be read, a warning is logged and an empty listing is
/// returned instead of an error.
///
/// # Errors
/// - Returns a validation error if the date range is reversed.
pub async fn list(config: Config, args: &ListArgs) -> Result<Out<Listing>> {
    let kind = args.kind();
    let criteria = args.filter().criteria()?;
    let mut ledger = api::ledger(&config, kind);

    let table = match ledger.table().await {
        Ok(table) => table,
        Err(e) if e.is_backing_store() => {
            warn!(
                "Unable to read worksheet '{}', showing no {}: {e}",
                ledger.title(),
                kind
            );
            Table::new()
        }
        Err(e) => return Err(e),
    };
    let entries = table.filter(&criteria);

    let mut listing = Listing {
        kind,
        total: table.total(),
        filtered_total: entries.total(),
        entries,
        rendered: String::new(),
    };
    listing.rendered = render(&listing, args.format(), config.currency_symbol())?;

    let message = if criteria.is_empty() {
        format!("Found {}", count(listing.entries.len(), kind.noun()))
    } else {
        format!(
            "Found {} of {} matching the filter",
            count(listing.entries.len(), kind.noun()),
            table.len()
        )
    };
    Ok(Out::new(message, listing))
}

fn render(listing: &Listing, format: OutputFormat, symbol: &str) -> Result<String> {
    match format {
        OutputFormat::Table => {
            let mut out = report::to_table(listing.kind, &listing.entries, symbol);
            out.push_str(&format!(
                "\nTotal shown: {}\nTotal {}: {}\n",
                listing.filtered_total.display_with(symbol),
                listing.kind,
                listing.total.display_with(symbol)
            ));
            Ok(out)
        }
        OutputFormat::Json => serde_json::to_string_pretty(listing)
            .map(|json| json + "\n")
            .pub_result(ErrorType::Io),
        OutputFormat::Csv => report::to_csv(listing.kind, &listing.entries).pub_result(ErrorType::Io),
    }
}
