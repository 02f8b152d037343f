//! Ever and Always Core - Shared domain types.
//!
//! This crate provides the types the storefront builds on when it talks to the
//! Vendure shop API:
//! - Prices in integer minor units and the single/range price union
//! - Currency codes and en-US price formatting
//! - Validated email addresses
//! - Stock levels and typed string IDs
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O and no HTTP
//! clients. This keeps it lightweight and easy to test in isolation.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, money, emails, and stock levels

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
