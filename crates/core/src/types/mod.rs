//! Core types for the Ever and Always storefront.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod price;
pub mod status;

pub use email::{Email, EmailError};
pub use id::*;
pub use price::{CurrencyCode, Money, PriceSummary, UnknownCurrency, format_price};
pub use status::StockLevel;
