//! Currency amounts: native drops and issued-currency values.
//!
//! `CurrencyAmount` is a closed tagged union. External code branches on the
//! variant through [`CurrencyAmount::map`] only, so a new variant can never
//! be silently mishandled. Issued values keep their decimal literal verbatim
//! (no float round-trip); validation bounds precision and exponent without
//! rewriting the digits.

use crate::address::{AccountAddress, AddressError};
use crate::constants::{
    MAX_DROPS, MAX_ISSUED_EXPONENT, MAX_ISSUED_PRECISION, MIN_ISSUED_EXPONENT,
};
use crate::currency::{CurrencyCode, CurrencyError};
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AmountError {
    #[error("drops value {0} exceeds the protocol ceiling of {MAX_DROPS}")]
    DropsOutOfRange(u64),

    #[error("malformed decimal literal {0:?}")]
    BadDecimal(String),

    #[error("value {value:?} carries {digits} significant digits, max is {MAX_ISSUED_PRECISION}")]
    TooManyDigits { value: String, digits: u32 },

    #[error("value {value:?} normalizes to exponent {exponent}, outside [{MIN_ISSUED_EXPONENT}, {MAX_ISSUED_EXPONENT}]")]
    ExponentOutOfRange { value: String, exponent: i32 },

    #[error("{op} is defined only for two native amounts")]
    IncompatibleOperands { op: &'static str },

    #[error("{op} result falls outside the native amount range")]
    ArithmeticOverflow { op: &'static str },

    #[error(transparent)]
    Currency(#[from] CurrencyError),

    #[error("issuer address: {0}")]
    Issuer(#[from] AddressError),

    #[error("cannot read an amount from wire value {0}")]
    BadWireShape(String),
}

// ─── Native Amounts ─────────────────────────────────────────────────────────

/// A validated native amount: an integer count of drops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct XrpAmount {
    drops: u64,
}

impl XrpAmount {
    /// Wrap a drops count, enforcing the protocol ceiling.
    pub fn from_drops(drops: u64) -> Result<Self, AmountError> {
        if drops > MAX_DROPS {
            return Err(AmountError::DropsOutOfRange(drops));
        }
        Ok(Self { drops })
    }

    pub fn drops(&self) -> u64 {
        self.drops
    }

    /// Add drops, clamping at the protocol ceiling instead of failing.
    pub fn saturating_add_drops(self, extra: u64) -> Self {
        Self {
            drops: self.drops.saturating_add(extra).min(MAX_DROPS),
        }
    }

    /// Parse from the wire form: a decimal-digit string, no sign, no point.
    pub fn from_wire(s: &str) -> Result<Self, AmountError> {
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(AmountError::BadDecimal(s.to_string()));
        }
        let drops: u64 = s
            .parse()
            .map_err(|_| AmountError::DropsOutOfRange(u64::MAX))?;
        Self::from_drops(drops)
    }
}

impl Default for XrpAmount {
    /// Zero drops.
    fn default() -> Self {
        Self { drops: 0 }
    }
}

impl std::fmt::Display for XrpAmount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.drops)
    }
}

// ─── Issued Amounts ─────────────────────────────────────────────────────────

/// A validated issued-currency amount: decimal value, currency code, issuer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedAmount {
    value: String,
    currency: CurrencyCode,
    issuer: AccountAddress,
}

impl IssuedAmount {
    /// Validate the decimal literal and assemble an issued amount. The
    /// literal is stored verbatim so re-serialization is lossless.
    pub fn new(
        value: &str,
        currency: CurrencyCode,
        issuer: AccountAddress,
    ) -> Result<Self, AmountError> {
        validate_decimal(value)?;
        Ok(Self {
            value: value.to_string(),
            currency,
            issuer,
        })
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn currency(&self) -> &CurrencyCode {
        &self.currency
    }

    pub fn issuer(&self) -> &AccountAddress {
        &self.issuer
    }

    /// Wire form: a `{currency, value, issuer}` object.
    pub fn to_json(&self) -> Value {
        serde_json::json!({
            "currency": self.currency.as_str(),
            "value": self.value,
            "issuer": self.issuer.as_str(),
        })
    }
}

// ─── The Amount Union ───────────────────────────────────────────────────────

/// A transaction amount: either native drops or an issued-currency value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CurrencyAmount {
    Xrp(XrpAmount),
    Issued(IssuedAmount),
}

impl CurrencyAmount {
    /// Construct a native amount, enforcing the drops ceiling.
    pub fn native(drops: u64) -> Result<Self, AmountError> {
        Ok(Self::Xrp(XrpAmount::from_drops(drops)?))
    }

    /// Construct an issued amount from raw strings, validating each part.
    pub fn issued(value: &str, currency: &str, issuer: &str) -> Result<Self, AmountError> {
        let code = CurrencyCode::new(currency)?;
        let issuer = AccountAddress::new(issuer)?;
        Ok(Self::Issued(IssuedAmount::new(value, code, issuer)?))
    }

    /// Exhaustive dispatch over the two variants. The only sanctioned way
    /// for external code to branch on the variant.
    pub fn map<R>(
        &self,
        on_native: impl FnOnce(&XrpAmount) -> R,
        on_issued: impl FnOnce(&IssuedAmount) -> R,
    ) -> R {
        match self {
            Self::Xrp(x) => on_native(x),
            Self::Issued(i) => on_issued(i),
        }
    }

    pub fn is_native(&self) -> bool {
        matches!(self, Self::Xrp(_))
    }

    /// Add two native amounts.
    pub fn plus(&self, other: &Self) -> Result<Self, AmountError> {
        let (a, b) = native_pair(self, other, "plus")?;
        let sum = a
            .checked_add(b)
            .ok_or(AmountError::ArithmeticOverflow { op: "plus" })?;
        Self::native(sum).map_err(|_| AmountError::ArithmeticOverflow { op: "plus" })
    }

    /// Subtract two native amounts.
    pub fn minus(&self, other: &Self) -> Result<Self, AmountError> {
        let (a, b) = native_pair(self, other, "minus")?;
        let diff = a
            .checked_sub(b)
            .ok_or(AmountError::ArithmeticOverflow { op: "minus" })?;
        Self::native(diff).map_err(|_| AmountError::ArithmeticOverflow { op: "minus" })
    }

    /// Multiply two native amounts.
    pub fn times(&self, other: &Self) -> Result<Self, AmountError> {
        let (a, b) = native_pair(self, other, "times")?;
        let product = a
            .checked_mul(b)
            .ok_or(AmountError::ArithmeticOverflow { op: "times" })?;
        Self::native(product).map_err(|_| AmountError::ArithmeticOverflow { op: "times" })
    }

    /// Wire form: native as a decimal string, issued as a
    /// `{currency, value, issuer}` object.
    pub fn to_json(&self) -> Value {
        match self {
            Self::Xrp(x) => Value::String(x.drops().to_string()),
            Self::Issued(i) => i.to_json(),
        }
    }

    pub fn from_json(v: &Value) -> Result<Self, AmountError> {
        match v {
            Value::String(s) => Ok(Self::Xrp(XrpAmount::from_wire(s)?)),
            Value::Object(obj) => {
                let field = |name: &str| {
                    obj.get(name)
                        .and_then(|x| x.as_str())
                        .ok_or_else(|| AmountError::BadWireShape(v.to_string()))
                };
                Self::issued(field("value")?, field("currency")?, field("issuer")?)
            }
            other => Err(AmountError::BadWireShape(other.to_string())),
        }
    }
}

fn native_pair(
    a: &CurrencyAmount,
    b: &CurrencyAmount,
    op: &'static str,
) -> Result<(u64, u64), AmountError> {
    match (a, b) {
        (CurrencyAmount::Xrp(x), CurrencyAmount::Xrp(y)) => Ok((x.drops(), y.drops())),
        _ => Err(AmountError::IncompatibleOperands { op }),
    }
}

// ─── Decimal Validation ─────────────────────────────────────────────────────

/// Check a decimal literal against the issued-value bounds: at most 16
/// significant digits, normalized exponent within [-96, 80]. The literal is
/// never rewritten; only its shape is inspected.
fn validate_decimal(s: &str) -> Result<(), AmountError> {
    let bad = || AmountError::BadDecimal(s.to_string());

    let body = s.strip_prefix('-').or_else(|| s.strip_prefix('+')).unwrap_or(s);
    if body.is_empty() {
        return Err(bad());
    }

    let (mantissa, exp_part) = match body.find(['e', 'E']) {
        Some(pos) => (&body[..pos], Some(&body[pos + 1..])),
        None => (body, None),
    };

    let explicit_exp: i64 = match exp_part {
        Some(e) if !e.is_empty() => e.parse().map_err(|_| bad())?,
        Some(_) => return Err(bad()),
        None => 0,
    };

    let (int_part, frac_part) = match mantissa.find('.') {
        Some(pos) => (&mantissa[..pos], &mantissa[pos + 1..]),
        None => (mantissa, ""),
    };
    if int_part.is_empty() && frac_part.is_empty() {
        return Err(bad());
    }
    if !int_part.bytes().all(|b| b.is_ascii_digit())
        || !frac_part.bytes().all(|b| b.is_ascii_digit())
    {
        return Err(bad());
    }

    // Walk the digits once to find the significant span.
    let digits: Vec<u8> = int_part.bytes().chain(frac_part.bytes()).collect();
    let first_sig = digits.iter().position(|&b| b != b'0');
    let Some(first_sig) = first_sig else {
        // All zeros: canonical zero, always representable.
        return Ok(());
    };
    let last_sig = digits.iter().rposition(|&b| b != b'0').unwrap_or(first_sig);
    let sig_digits = (last_sig - first_sig + 1) as u32;

    if sig_digits > MAX_ISSUED_PRECISION {
        return Err(AmountError::TooManyDigits {
            value: s.to_string(),
            digits: sig_digits,
        });
    }

    // Exponent of the most significant digit, then shift to the canonical
    // 16-digit-mantissa form the protocol bounds are stated in.
    let adjusted = int_part.len() as i64 - 1 - first_sig as i64 + explicit_exp;
    let normalized = adjusted - (MAX_ISSUED_PRECISION as i64 - 1);
    if normalized < MIN_ISSUED_EXPONENT as i64 || normalized > MAX_ISSUED_EXPONENT as i64 {
        return Err(AmountError::ExponentOutOfRange {
            value: s.to_string(),
            exponent: normalized as i32,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const ISSUER: &str = "rvYAfWj5gh67oV6fW32ZzP3Aw4Eubs59B";

    #[test]
    fn test_native_within_ceiling() {
        let a = CurrencyAmount::native(25_000_000).unwrap();
        assert!(a.is_native());
        assert_eq!(a.map(|x| x.drops(), |_| 0), 25_000_000);
    }

    #[test]
    fn test_native_ceiling_enforced() {
        assert!(CurrencyAmount::native(MAX_DROPS).is_ok());
        assert_eq!(
            CurrencyAmount::native(MAX_DROPS + 1),
            Err(AmountError::DropsOutOfRange(MAX_DROPS + 1))
        );
    }

    #[test]
    fn test_issued_basic() {
        let a = CurrencyAmount::issued("123.45", "USD", ISSUER).unwrap();
        a.map(
            |_| panic!("expected issued"),
            |i| {
                assert_eq!(i.value(), "123.45");
                assert_eq!(i.currency().as_str(), "USD");
            },
        );
    }

    #[test]
    fn test_issued_rejects_native_code() {
        assert!(matches!(
            CurrencyAmount::issued("1", "XRP", ISSUER),
            Err(AmountError::Currency(CurrencyError::ReservedNative))
        ));
    }

    #[test]
    fn test_decimal_malformed() {
        for bad in ["", "-", "1.2.3", "abc", "1e", "--1", "1,5"] {
            assert!(
                matches!(validate_decimal(bad), Err(AmountError::BadDecimal(_))),
                "{:?} should be malformed",
                bad
            );
        }
    }

    #[test]
    fn test_decimal_accepts_shapes() {
        for ok in ["0", "-0.0", "1", "123.45", "1e10", "-3.14E-5", ".5", "5."] {
            assert_eq!(validate_decimal(ok), Ok(()), "{:?} should validate", ok);
        }
    }

    #[test]
    fn test_decimal_precision_limit() {
        // 16 significant digits pass, 17 fail.
        assert_eq!(validate_decimal("1234567890.123456"), Ok(()));
        assert!(matches!(
            validate_decimal("1234567890.1234567"),
            Err(AmountError::TooManyDigits { digits: 17, .. })
        ));
        // Leading/trailing zeros are not significant.
        assert_eq!(validate_decimal("000123456789012345600000"), Ok(()));
    }

    #[test]
    fn test_decimal_exponent_bounds() {
        assert_eq!(validate_decimal("1e80"), Ok(()));
        assert_eq!(validate_decimal("9999999999999999e80"), Ok(()));
        assert!(matches!(
            validate_decimal("1e96"),
            Err(AmountError::ExponentOutOfRange { .. })
        ));
        assert_eq!(validate_decimal("1e-81"), Ok(()));
        assert!(matches!(
            validate_decimal("1e-82"),
            Err(AmountError::ExponentOutOfRange { .. })
        ));
    }

    #[test]
    fn test_arithmetic_native_only() {
        let a = CurrencyAmount::native(10).unwrap();
        let b = CurrencyAmount::native(4).unwrap();
        assert_eq!(a.plus(&b), CurrencyAmount::native(14));
        assert_eq!(a.minus(&b), CurrencyAmount::native(6));
        assert_eq!(a.times(&b), CurrencyAmount::native(40));

        let issued = CurrencyAmount::issued("1", "USD", ISSUER).unwrap();
        assert_eq!(
            a.plus(&issued),
            Err(AmountError::IncompatibleOperands { op: "plus" })
        );
        assert_eq!(
            issued.minus(&issued),
            Err(AmountError::IncompatibleOperands { op: "minus" })
        );
    }

    #[test]
    fn test_arithmetic_overflow() {
        let big = CurrencyAmount::native(MAX_DROPS).unwrap();
        let one = CurrencyAmount::native(1).unwrap();
        assert_eq!(
            big.plus(&one),
            Err(AmountError::ArithmeticOverflow { op: "plus" })
        );
        assert_eq!(
            one.minus(&big),
            Err(AmountError::ArithmeticOverflow { op: "minus" })
        );
        assert_eq!(
            big.times(&big),
            Err(AmountError::ArithmeticOverflow { op: "times" })
        );
    }

    #[test]
    fn test_native_wire_roundtrip() {
        let a = CurrencyAmount::native(25_000_000).unwrap();
        let json = a.to_json();
        assert_eq!(json, Value::String("25000000".to_string()));
        assert_eq!(CurrencyAmount::from_json(&json).unwrap(), a);
    }

    #[test]
    fn test_issued_wire_roundtrip() {
        let a = CurrencyAmount::issued("99.999", "EUR", ISSUER).unwrap();
        let json = a.to_json();
        assert_eq!(json["currency"], "EUR");
        assert_eq!(json["value"], "99.999");
        assert_eq!(CurrencyAmount::from_json(&json).unwrap(), a);
    }

    #[test]
    fn test_wire_rejects_signed_or_fractional_native() {
        for bad in ["-5", "1.5", "", "1e3"] {
            let v = Value::String(bad.to_string());
            assert!(CurrencyAmount::from_json(&v).is_err(), "{:?}", bad);
        }
        assert!(CurrencyAmount::from_json(&Value::from(5u64)).is_err());
    }

    #[test]
    fn test_saturating_add_drops() {
        let a = XrpAmount::default().saturating_add_drops(10);
        assert_eq!(a.drops(), 10);
        let near = XrpAmount::from_drops(MAX_DROPS - 1).unwrap();
        assert_eq!(near.saturating_add_drops(100).drops(), MAX_DROPS);
    }

    #[test]
    fn test_from_wire_overflow_u64() {
        // 21 digits: parses as a decimal string but cannot fit in drops.
        assert!(XrpAmount::from_wire("999999999999999999999").is_err());
    }
}
