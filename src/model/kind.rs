use serde::{Deserialize, Serialize};

/// The two ledgers kept by the clinic. Both have the same shape: a label, an amount, a date and
/// notes. They differ only in the header text of the label and amount columns.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    Eq,
    PartialEq,
    Ord,
    PartialOrd,
    Hash,
    Serialize,
    Deserialize,
    clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum LedgerKind {
    /// Payments received from patients.
    #[default]
    Payments,
    /// Money spent by the clinic.
    Expenses,
}

serde_plain::derive_display_from_serialize!(LedgerKind);
serde_plain::derive_fromstr_from_deserialize!(LedgerKind);

pub(crate) const PATIENT_NAME_STR: &str = "Patient Name";
pub(crate) const AMOUNT_PAID_STR: &str = "Amount Paid";
pub(crate) const EXPENSE_NAME_STR: &str = "Expense Name";
pub(crate) const AMOUNT_STR: &str = "Amount";
pub(crate) const DATE_STR: &str = "Date";
pub(crate) const NOTES_STR: &str = "Notes";

const PAYMENT_HEADERS: [&str; 4] = [PATIENT_NAME_STR, AMOUNT_PAID_STR, DATE_STR, NOTES_STR];
const EXPENSE_HEADERS: [&str; 4] = [EXPENSE_NAME_STR, AMOUNT_STR, DATE_STR, NOTES_STR];

impl LedgerKind {
    pub const ALL: [LedgerKind; 2] = [LedgerKind::Payments, LedgerKind::Expenses];

    /// The header row written when the worksheet is created, in column order.
    pub fn headers(&self) -> &'static [&'static str] {
        match self {
            LedgerKind::Payments => &PAYMENT_HEADERS,
            LedgerKind::Expenses => &EXPENSE_HEADERS,
        }
    }

    pub fn label_header(&self) -> &'static str {
        self.headers()[0]
    }

    pub fn amount_header(&self) -> &'static str {
        self.headers()[1]
    }

    pub fn date_header(&self) -> &'static str {
        DATE_STR
    }

    pub fn notes_header(&self) -> &'static str {
        NOTES_STR
    }

    /// A singular noun for messages, e.g. "payment".
    pub fn noun(&self) -> &'static str {
        match self {
            LedgerKind::Payments => "payment",
            LedgerKind::Expenses => "expense",
        }
    }
}
