//! Typed XRP Ledger transaction construction, validation, and wire conversion.
//!
//! Provides strongly-typed transaction structures for every modeled
//! transaction type, a builder pattern that validates cross-field legality
//! rules at finalization, flag bitmask handling with lossless round-trip of
//! unknown bits, and conversion to/from the ledger's JSON wire format with
//! preservation of unrecognized fields.

pub mod builder;
pub mod derived;
pub mod entity;
pub mod fee;
pub mod flags;
pub mod invariants;
pub mod payload;
pub mod unknown;
pub mod wire;

pub use builder::{BuildError, TransactionBuilder};
pub use entity::{Memo, SignerEntry, Transaction, TxType};
pub use flags::{FlagError, FlagSet, FlagSetBuilder};
pub use invariants::InvariantViolation;
pub use payload::TxPayload;
pub use unknown::{FieldBagError, UnknownFieldBag};
pub use wire::WireError;
