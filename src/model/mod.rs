//! Types that represent the core data model, such as `Record` and `Amount`.
mod amount;
mod kind;
mod mapping;
mod position;
mod record;

pub use amount::{Amount, AmountError};
pub use kind::LedgerKind;
pub use mapping::{Mapping, MappingError};
pub use position::{Position, SheetRow, HEADER_ROWS};
pub(crate) use record::parse_date;
pub use record::Record;
