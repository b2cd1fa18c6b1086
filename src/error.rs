//! The public error type.
//!
//! Internally the crate uses `anyhow` and attaches context as errors bubble up. At public
//! boundaries an error is tagged with an `ErrorType` so that callers can tell a rejected input
//! apart from a missing row or an unreachable backing store.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Internal result type. Converted to `Result` with `IntoResult::pub_result`.
pub(crate) type Res<T> = anyhow::Result<T>;

/// The result type returned by the public functions of this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// The kind of failure. No failure of any kind leaves a worksheet partially modified.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorType {
    /// A record or filter was rejected, e.g. an empty label or a negative amount.
    Validation,
    /// A position does not address a record in the current table.
    OutOfRange,
    /// The record at a position changed after it was loaded for editing.
    Stale,
    /// The backing store could not be reached, read or written.
    BackingStore,
    /// The ledger home directory or its configuration file is missing or invalid.
    Config,
    /// A local file, other than a worksheet, could not be written.
    Io,
}

serde_plain::derive_display_from_serialize!(ErrorType);
serde_plain::derive_fromstr_from_deserialize!(ErrorType);

/// An error tagged with its `ErrorType`.
#[derive(Debug)]
pub struct Error {
    error_type: ErrorType,
    inner: anyhow::Error,
}

impl Error {
    pub fn new(error_type: ErrorType, inner: impl Into<anyhow::Error>) -> Self {
        Self {
            error_type,
            inner: inner.into(),
        }
    }

    pub(crate) fn validation(message: impl Display) -> Self {
        Self::new(ErrorType::Validation, anyhow::anyhow!("{message}"))
    }

    pub(crate) fn out_of_range(message: impl Display) -> Self {
        Self::new(ErrorType::OutOfRange, anyhow::anyhow!("{message}"))
    }

    pub(crate) fn stale(message: impl Display) -> Self {
        Self::new(ErrorType::Stale, anyhow::anyhow!("{message}"))
    }

    pub fn error_type(&self) -> ErrorType {
        self.error_type
    }

    /// True when the failure came from the backing store rather than from the caller's input.
    pub fn is_backing_store(&self) -> bool {
        self.error_type == ErrorType::BackingStore
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} error: {:#}", self.error_type, self.inner)
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&*self.inner)
    }
}

/// Converts an internal result into a public `Result` tagged with an `ErrorType`.
pub(crate) trait IntoResult<T> {
    fn pub_result(self, error_type: ErrorType) -> Result<T>;
}

impl<T, E> IntoResult<T> for std::result::Result<T, E>
where
    E: Into<anyhow::Error>,
{
    fn pub_result(self, error_type: ErrorType) -> Result<T> {
        self.map_err(|e| Error::new(error_type, e))
    }
}
