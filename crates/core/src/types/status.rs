//! Stock level reported for product variants.

use serde::{Deserialize, Serialize};

/// Availability of a variant as exposed by the shop API's `stockLevel` field.
///
/// The default stock display strategy reports `IN_STOCK`, `LOW_STOCK` or
/// `OUT_OF_STOCK`; custom strategies may return other strings (such as an exact
/// count), which are treated as purchasable.
///
/// ```
/// use ever_and_always_core::StockLevel;
///
/// assert!(!StockLevel::parse("OUT_OF_STOCK").is_available());
/// assert!(StockLevel::parse("LOW_STOCK").is_available());
/// assert!(StockLevel::parse("12").is_available());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum StockLevel {
    InStock,
    LowStock,
    OutOfStock,
    Other(String),
}

impl StockLevel {
    /// Interpret a raw `stockLevel` value.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw {
            "IN_STOCK" => Self::InStock,
            "LOW_STOCK" => Self::LowStock,
            "OUT_OF_STOCK" => Self::OutOfStock,
            other => Self::Other(other.to_string()),
        }
    }

    /// Whether the variant can be added to an order.
    #[must_use]
    pub const fn is_available(&self) -> bool {
        !matches!(self, Self::OutOfStock)
    }

    /// The wire representation.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::InStock => "IN_STOCK",
            Self::LowStock => "LOW_STOCK",
            Self::OutOfStock => "OUT_OF_STOCK",
            Self::Other(raw) => raw,
        }
    }
}

impl From<String> for StockLevel {
    fn from(raw: String) -> Self {
        Self::parse(&raw)
    }
}

impl From<StockLevel> for String {
    fn from(level: StockLevel) -> Self {
        level.as_str().to_string()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_stock_level_round_trips_wire_values() {
        for raw in ["IN_STOCK", "LOW_STOCK", "OUT_OF_STOCK", "3"] {
            assert_eq!(StockLevel::parse(raw).as_str(), raw);
        }
    }

    #[test]
    fn test_stock_level_deserializes_from_string() {
        let level: StockLevel = serde_json::from_str("\"OUT_OF_STOCK\"").unwrap();
        assert_eq!(level, StockLevel::OutOfStock);
        assert!(!level.is_available());
    }
}
