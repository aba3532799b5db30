//! Currency codes and AMM asset references.
//!
//! A currency is either a 3-character ISO-like code or a 40-hex-digit custom
//! code (160 bits). The native code "XRP" is reserved: native amounts carry
//! no currency field at all, so "XRP" is never valid as an issued currency.

use crate::address::{AccountAddress, AddressError};
use crate::constants::{HEX_CURRENCY_LEN, NATIVE_CURRENCY, STANDARD_CURRENCY_LEN};
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CurrencyError {
    #[error("currency code must be {STANDARD_CURRENCY_LEN} characters or {HEX_CURRENCY_LEN} hex digits, got {0:?}")]
    BadLength(String),

    #[error("currency code {0:?} contains a non-alphanumeric character")]
    BadCharacter(String),

    #[error("currency code {0:?} is not valid hex")]
    BadHex(String),

    #[error("the native code {NATIVE_CURRENCY:?} is reserved and cannot be issued")]
    ReservedNative,

    #[error("asset with currency {0:?} requires an issuer")]
    MissingIssuer(String),

    #[error("the native asset cannot carry an issuer")]
    UnexpectedIssuer,

    #[error("asset issuer: {0}")]
    Issuer(#[from] AddressError),
}

/// A validated issued-currency code.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CurrencyCode(String);

impl CurrencyCode {
    /// Validate and wrap a currency code.
    pub fn new(code: &str) -> Result<Self, CurrencyError> {
        match code.len() {
            STANDARD_CURRENCY_LEN => {
                if code == NATIVE_CURRENCY {
                    return Err(CurrencyError::ReservedNative);
                }
                if !code.chars().all(|c| c.is_ascii_alphanumeric()) {
                    return Err(CurrencyError::BadCharacter(code.to_string()));
                }
            }
            HEX_CURRENCY_LEN => {
                if hex::decode(code).is_err() {
                    return Err(CurrencyError::BadHex(code.to_string()));
                }
            }
            _ => return Err(CurrencyError::BadLength(code.to_string())),
        }
        Ok(Self(code.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this is a 160-bit hex custom code.
    pub fn is_hex(&self) -> bool {
        self.0.len() == HEX_CURRENCY_LEN
    }
}

impl std::fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An asset reference as used by the AMM transactions: the native asset, or
/// an issued currency plus its issuer. Wire form is an object holding
/// `currency` and, for issued assets, `issuer`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetId {
    Xrp,
    Issued {
        currency: CurrencyCode,
        issuer: AccountAddress,
    },
}

impl AssetId {
    /// Build an asset reference from raw wire strings.
    pub fn new(currency: &str, issuer: Option<&str>) -> Result<Self, CurrencyError> {
        if currency == NATIVE_CURRENCY {
            if issuer.is_some() {
                return Err(CurrencyError::UnexpectedIssuer);
            }
            return Ok(Self::Xrp);
        }
        let code = CurrencyCode::new(currency)?;
        let issuer = issuer.ok_or_else(|| CurrencyError::MissingIssuer(currency.to_string()))?;
        Ok(Self::Issued {
            currency: code,
            issuer: AccountAddress::new(issuer)?,
        })
    }

    pub fn from_json(v: &Value) -> Result<Self, CurrencyError> {
        let currency = v
            .get("currency")
            .and_then(|c| c.as_str())
            .ok_or_else(|| CurrencyError::BadLength(String::new()))?;
        let issuer = v.get("issuer").and_then(|i| i.as_str());
        Self::new(currency, issuer)
    }

    pub fn to_json(&self) -> Value {
        match self {
            Self::Xrp => serde_json::json!({ "currency": NATIVE_CURRENCY }),
            Self::Issued { currency, issuer } => serde_json::json!({
                "currency": currency.as_str(),
                "issuer": issuer.as_str(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ISSUER: &str = "rvYAfWj5gh67oV6fW32ZzP3Aw4Eubs59B";

    #[test]
    fn test_standard_code() {
        let c = CurrencyCode::new("USD").unwrap();
        assert_eq!(c.as_str(), "USD");
        assert!(!c.is_hex());
    }

    #[test]
    fn test_hex_code() {
        let c = CurrencyCode::new("0158415500000000C1F76FF6ECB0BAC600000000").unwrap();
        assert!(c.is_hex());
    }

    #[test]
    fn test_reserved_native_rejected() {
        assert_eq!(CurrencyCode::new("XRP"), Err(CurrencyError::ReservedNative));
    }

    #[test]
    fn test_bad_lengths() {
        assert!(matches!(CurrencyCode::new(""), Err(CurrencyError::BadLength(_))));
        assert!(matches!(CurrencyCode::new("US"), Err(CurrencyError::BadLength(_))));
        assert!(matches!(CurrencyCode::new("USDX"), Err(CurrencyError::BadLength(_))));
    }

    #[test]
    fn test_bad_characters() {
        assert!(matches!(CurrencyCode::new("U$D"), Err(CurrencyError::BadCharacter(_))));
        let not_hex = "Z158415500000000C1F76FF6ECB0BAC600000000";
        assert!(matches!(CurrencyCode::new(not_hex), Err(CurrencyError::BadHex(_))));
    }

    #[test]
    fn test_asset_native() {
        let a = AssetId::new("XRP", None).unwrap();
        assert_eq!(a, AssetId::Xrp);
        let json = a.to_json();
        assert_eq!(AssetId::from_json(&json).unwrap(), AssetId::Xrp);
    }

    #[test]
    fn test_asset_native_with_issuer_rejected() {
        assert_eq!(
            AssetId::new("XRP", Some(ISSUER)),
            Err(CurrencyError::UnexpectedIssuer)
        );
    }

    #[test]
    fn test_asset_issued_requires_issuer() {
        assert!(matches!(
            AssetId::new("USD", None),
            Err(CurrencyError::MissingIssuer(_))
        ));
    }

    #[test]
    fn test_asset_issued_roundtrip() {
        let a = AssetId::new("USD", Some(ISSUER)).unwrap();
        let json = a.to_json();
        assert_eq!(AssetId::from_json(&json).unwrap(), a);
    }
}
