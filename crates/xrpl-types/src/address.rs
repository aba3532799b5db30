//! Classic account address format validation.
//!
//! A classic address is the base58 encoding (ledger alphabet) of a 20-byte
//! account ID with a type prefix and checksum, always starting with `r`.
//! This crate validates shape only; checksum verification needs the hashing
//! stack, which lives with the signing collaborator.

use thiserror::Error;

/// The ledger's base58 alphabet (note: no 0, O, I, or l).
const BASE58_ALPHABET: &str = "rpshnaf39wBUDNEGHJKLM4PQRST7VWXYZ2bcdeCg65jkm8oFqi1tuvAxyz";

/// Minimum length of an encoded classic address.
const MIN_ADDRESS_LEN: usize = 25;

/// Maximum length of an encoded classic address.
const MAX_ADDRESS_LEN: usize = 35;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AddressError {
    #[error("address must be a non-empty string")]
    Empty,

    #[error("invalid address length ({0})")]
    InvalidLength(usize),

    #[error("classic address must start with 'r', got {0:?}")]
    BadPrefix(char),

    #[error("address contains {0:?}, not in the base58 alphabet")]
    InvalidCharacter(char),
}

/// A shape-validated classic account address.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AccountAddress(String);

impl AccountAddress {
    /// Validate and wrap an address string.
    pub fn new(address: &str) -> Result<Self, AddressError> {
        let address = address.trim();
        if address.is_empty() {
            return Err(AddressError::Empty);
        }
        if address.len() < MIN_ADDRESS_LEN || address.len() > MAX_ADDRESS_LEN {
            return Err(AddressError::InvalidLength(address.len()));
        }
        let first = address.chars().next().unwrap_or_default();
        if first != 'r' {
            return Err(AddressError::BadPrefix(first));
        }
        if let Some(bad) = address.chars().find(|c| !BASE58_ALPHABET.contains(*c)) {
            return Err(AddressError::InvalidCharacter(bad));
        }
        Ok(Self(address.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for AccountAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
