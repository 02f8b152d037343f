//! Money in integer minor units and the price shapes returned by search.
//!
//! Vendure transmits every amount as an integer count of the currency's minor
//! unit (cents for USD). Display code converts by dividing by 100; nothing in
//! the storefront stores fractional amounts.

use core::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// An amount in minor currency units (e.g., cents).
///
/// ```
/// use ever_and_always_core::Money;
///
/// let price = Money::from_minor(129_999);
/// assert_eq!(price.to_major().to_string(), "1299.99");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Create an amount from minor units.
    #[must_use]
    pub const fn from_minor(minor: i64) -> Self {
        Self(minor)
    }

    /// The raw minor-unit value.
    #[must_use]
    pub const fn minor_units(self) -> i64 {
        self.0
    }

    /// The amount in major units with two decimal places.
    #[must_use]
    pub fn to_major(self) -> Decimal {
        Decimal::new(self.0, 2)
    }

    /// The amount in major units as a float, for range comparisons against
    /// user-entered bounds.
    #[must_use]
    #[allow(clippy::cast_precision_loss)] // catalogue prices are far below 2^52 cents
    pub fn to_major_f64(self) -> f64 {
        self.0 as f64 / 100.0
    }
}

/// Price of a search result: a single value when all variants share a price,
/// otherwise the range across variants.
///
/// Deserializes directly from the shop API's `SearchResultPrice` union, which
/// is discriminated by `__typename`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "__typename")]
pub enum PriceSummary {
    #[serde(rename = "SinglePrice")]
    Single { value: Money },
    #[serde(rename = "PriceRange")]
    Range { min: Money, max: Money },
}

impl PriceSummary {
    /// The lowest price a shopper can pay: the value, or the minimum of a range.
    #[must_use]
    pub const fn lowest(&self) -> Money {
        match self {
            Self::Single { value } => *value,
            Self::Range { min, .. } => *min,
        }
    }

    /// [`lowest`](Self::lowest) in display units.
    #[must_use]
    pub fn lowest_major(&self) -> f64 {
        self.lowest().to_major_f64()
    }

    /// Whether variants are priced differently (shown as "from ...").
    #[must_use]
    pub fn is_range(&self) -> bool {
        matches!(self, Self::Range { min, max } if min != max)
    }
}

/// Error returned when a currency code is not one the storefront sells in.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unsupported currency code: {0}")]
pub struct UnknownCurrency(pub String);

/// ISO 4217 currency codes offered by the storefront's channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    USD,
    EUR,
    GBP,
    CAD,
    AUD,
}

impl CurrencyCode {
    /// The ISO code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::USD => "USD",
            Self::EUR => "EUR",
            Self::GBP => "GBP",
            Self::CAD => "CAD",
            Self::AUD => "AUD",
        }
    }

    /// Prefix used by en-US currency formatting.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::USD => "$",
            Self::EUR => "€",
            Self::GBP => "£",
            Self::CAD => "CA$",
            Self::AUD => "A$",
        }
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for CurrencyCode {
    type Err = UnknownCurrency;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "USD" => Ok(Self::USD),
            "EUR" => Ok(Self::EUR),
            "GBP" => Ok(Self::GBP),
            "CAD" => Ok(Self::CAD),
            "AUD" => Ok(Self::AUD),
            _ => Err(UnknownCurrency(s.to_string())),
        }
    }
}

/// Format a minor-unit amount the way an en-US shopper expects to read it.
///
/// Codes outside [`CurrencyCode`] fall back to a code prefix.
///
/// ```
/// use ever_and_always_core::{Money, format_price};
///
/// assert_eq!(format_price(Money::from_minor(123_450), "USD"), "$1,234.50");
/// assert_eq!(format_price(Money::from_minor(99), "GBP"), "£0.99");
/// assert_eq!(format_price(Money::from_minor(500), "JPY"), "JPY\u{a0}5.00");
/// ```
#[must_use]
pub fn format_price(amount: Money, currency: &str) -> String {
    let minor = amount.minor_units();
    let sign = if minor < 0 { "-" } else { "" };
    let abs = minor.unsigned_abs();
    let number = format!("{}.{:02}", group_thousands(abs / 100), abs % 100);

    match currency.parse::<CurrencyCode>() {
        Ok(code) => format!("{sign}{}{number}", code.symbol()),
        Err(_) => format!("{sign}{currency}\u{a0}{number}"),
    }
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_to_major_divides_by_hundred() {
        assert_eq!(Money::from_minor(50_000).to_major(), Decimal::new(500, 0));
        assert!((Money::from_minor(129_999).to_major_f64() - 1299.99).abs() < 1e-9);
    }

    #[test]
    fn test_format_price_groups_thousands() {
        assert_eq!(format_price(Money::from_minor(0), "USD"), "$0.00");
        assert_eq!(format_price(Money::from_minor(100_000), "USD"), "$1,000.00");
        assert_eq!(
            format_price(Money::from_minor(123_456_789), "USD"),
            "$1,234,567.89"
        );
        assert_eq!(format_price(Money::from_minor(45_000), "CAD"), "CA$450.00");
    }

    #[test]
    fn test_format_price_negative() {
        assert_eq!(format_price(Money::from_minor(-2_500), "EUR"), "-€25.00");
    }

    #[test]
    fn test_currency_parse_is_case_insensitive() {
        assert_eq!("usd".parse::<CurrencyCode>().unwrap(), CurrencyCode::USD);
        assert!("XYZ".parse::<CurrencyCode>().is_err());
    }

    #[test]
    fn test_price_summary_from_shop_api() {
        let single: PriceSummary =
            serde_json::from_str(r#"{"__typename":"SinglePrice","value":45000}"#).unwrap();
        assert_eq!(single.lowest(), Money::from_minor(45_000));
        assert!(!single.is_range());

        let range: PriceSummary =
            serde_json::from_str(r#"{"__typename":"PriceRange","min":30000,"max":90000}"#)
                .unwrap();
        assert_eq!(range.lowest(), Money::from_minor(30_000));
        assert!((range.lowest_major() - 300.0).abs() < f64::EPSILON);
        assert!(range.is_range());
    }

    #[test]
    fn test_collapsed_range_is_not_a_range() {
        let range = PriceSummary::Range {
            min: Money::from_minor(100),
            max: Money::from_minor(100),
        };
        assert!(!range.is_range());
    }
}
