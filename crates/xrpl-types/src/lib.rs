//! Core value types and protocol constants for the XRP Ledger model.
//!
//! This crate provides the foundational types used across the xrpl-rs
//! workspace: validated currency amounts (native drops and issued tokens),
//! currency codes, account address format checks, and the protocol constants
//! that bound them.

pub mod address;
pub mod amount;
pub mod constants;
pub mod currency;

pub use address::{AccountAddress, AddressError};
pub use amount::{AmountError, CurrencyAmount, IssuedAmount, XrpAmount};
pub use currency::{AssetId, CurrencyCode, CurrencyError};
