//! Amount type for handling monetary values as they appear in ledger worksheets.
//!
//! Worksheets written by this crate hold plain decimals such as `1234.50`. Sheets edited by
//! hand may also contain a currency symbol and thousands separators, so those are accepted when
//! parsing.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::error::Error;
use std::fmt;
use std::fmt::{Debug, Display, Formatter};
use std::iter::Sum;
use std::ops::{Add, Sub};
use std::str::FromStr;

/// Represents an amount of money.
///
/// The storage form, produced by `Display`, always has two decimal places and no symbol. Use
/// `Amount::display_with` for the human-readable form.
///
/// # Examples
///
/// ```
/// # use clinic_ledger::model::Amount;
/// # use std::str::FromStr;
/// let amount = Amount::from_str("₱1,234.5").unwrap();
/// assert_eq!(amount.to_string(), "1234.50");
/// assert_eq!(amount.display_with("₱"), "₱1,234.50");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount(Decimal);

impl Amount {
    pub const ZERO: Amount = Amount(Decimal::ZERO);

    /// Returns the underlying Decimal value.
    pub fn value(&self) -> Decimal {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// True when the amount has no more than two decimal places, i.e. it is stored exactly.
    pub fn is_whole_cents(&self) -> bool {
        self.0.normalize().scale() <= 2
    }

    /// Returns true if the amount is below zero. Negative zero is not negative.
    pub fn is_negative(&self) -> bool {
        !self.is_zero() && self.0.is_sign_negative()
    }

    /// Formats the amount with `symbol` and thousands separators, e.g. `-₱60,000.00`.
    pub fn display_with(&self, symbol: &str) -> String {
        let sign = if self.is_negative() { "-" } else { "" };
        let num = self.0.abs().to_f64().unwrap_or_default();
        format!("{sign}{symbol}{}", format_num::format_num!(",.2", num))
    }
}

/// An error that can occur when parsing strings into `Amount` values.
#[derive(Debug)]
pub struct AmountError {
    input: String,
    source: Option<rust_decimal::Error>,
}

impl AmountError {
    fn new(input: &str, source: Option<rust_decimal::Error>) -> Self {
        Self {
            input: input.to_string(),
            source,
        }
    }
}

impl Display for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' is not an amount", self.input)?;
        if let Some(source) = &self.source {
            write!(f, ": {source}")?;
        }
        Ok(())
    }
}

impl Error for AmountError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.source.as_ref().map(|e| e as &(dyn Error + 'static))
    }
}

/// Accepts an optional `-`, then at most one currency prefix (a single symbol such as `₱` or
/// `$`, or a three letter code such as `PHP`), then digits with optional thousands separators.
impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Ok(Amount::ZERO);
        }

        let (negative, unsigned) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed),
        };
        let number = strip_currency(unsigned).trim_start();

        if number.is_empty()
            || !number
                .chars()
                .all(|c| c.is_ascii_digit() || c == '.' || c == ',')
            || !grouping_ok(number)
        {
            return Err(AmountError::new(s, None));
        }

        let value = Decimal::from_str(&number.replace(',', ""))
            .map_err(|e| AmountError::new(s, Some(e)))?;
        Ok(Amount(if negative { -value } else { value }))
    }
}

fn strip_currency(s: &str) -> &str {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if !c.is_alphanumeric() && !c.is_whitespace() && !".,+-".contains(c) => {
            chars.as_str()
        }
        _ if s.len() >= 3 && s.as_bytes()[..3].iter().all(u8::is_ascii_uppercase) => &s[3..],
        _ => s,
    }
}

/// Thousands separators may only appear in the whole part, between groups of three digits.
fn grouping_ok(number: &str) -> bool {
    let (whole, fraction) = number.split_once('.').unwrap_or((number, ""));
    if fraction.contains(',') {
        return false;
    }
    let mut groups = whole.split(',');
    let first_ok = groups
        .next()
        .is_some_and(|g| !whole.contains(',') || (1..=3).contains(&g.len()));
    first_ok && groups.all(|g| g.len() == 3)
}

impl Display for Amount {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Amount::from_str(&s).map_err(serde::de::Error::custom)
    }
}

impl Add for Amount {
    type Output = Amount;

    fn add(self, rhs: Self) -> Self::Output {
        Amount(self.0 + rhs.0)
    }
}

impl Sub for Amount {
    type Output = Amount;

    fn sub(self, rhs: Self) -> Self::Output {
        Amount(self.0 - rhs.0)
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Amount::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Amount> for Amount {
    fn sum<I: Iterator<Item = &'a Amount>>(iter: I) -> Self {
        iter.copied().sum()
    }
}
