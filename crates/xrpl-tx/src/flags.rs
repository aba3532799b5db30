//! Transaction flag bitmasks.
//!
//! A [`FlagSet`] aggregates named boolean options into the single unsigned
//! integer carried in the wire `Flags` field. Decoding keeps any bit that is
//! not mapped to a name for the transaction type in a residual slot, so
//! re-encoding reproduces the original integer exactly even when the server
//! speaks a newer protocol revision.
//!
//! Whether a transaction carries a flag set at all is decided one level up:
//! `Transaction` holds an `Option<FlagSet>`, and an explicit zero (built via
//! [`FlagSet::empty`]) is distinct from an absent field.

use crate::entity::TxType;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FlagError {
    #[error("flag {name:?} is not defined for {tx_type}")]
    UnknownOption { name: String, tx_type: TxType },
}

/// The canonical-signature bit, set on virtually every transaction.
pub const TF_FULLY_CANONICAL_SIG: u32 = 0x8000_0000;

/// A named flag bit for one transaction type.
#[derive(Debug, Clone, Copy)]
pub struct FlagDef {
    pub name: &'static str,
    pub bit: u32,
}

const fn def(name: &'static str, bit: u32) -> FlagDef {
    FlagDef { name, bit }
}

// ─── Per-Type Option Tables ─────────────────────────────────────────────────

static PAYMENT_FLAGS: [FlagDef; 3] = [
    def("tfNoRippleDirect", 0x0001_0000),
    def("tfPartialPayment", 0x0002_0000),
    def("tfLimitQuality", 0x0004_0000),
];

static ACCOUNT_SET_FLAGS: [FlagDef; 6] = [
    def("tfRequireDestTag", 0x0001_0000),
    def("tfOptionalDestTag", 0x0002_0000),
    def("tfRequireAuth", 0x0004_0000),
    def("tfOptionalAuth", 0x0008_0000),
    def("tfDisallowXRP", 0x0010_0000),
    def("tfAllowXRP", 0x0020_0000),
];

static TRUST_SET_FLAGS: [FlagDef; 5] = [
    def("tfSetfAuth", 0x0001_0000),
    def("tfSetNoRipple", 0x0002_0000),
    def("tfClearNoRipple", 0x0004_0000),
    def("tfSetFreeze", 0x0010_0000),
    def("tfClearFreeze", 0x0020_0000),
];

static OFFER_CREATE_FLAGS: [FlagDef; 4] = [
    def("tfPassive", 0x0001_0000),
    def("tfImmediateOrCancel", 0x0002_0000),
    def("tfFillOrKill", 0x0004_0000),
    def("tfSell", 0x0008_0000),
];

static PAYMENT_CHANNEL_CLAIM_FLAGS: [FlagDef; 2] = [
    def("tfRenew", 0x0001_0000),
    def("tfClose", 0x0002_0000),
];

static NFTOKEN_MINT_FLAGS: [FlagDef; 4] = [
    def("tfBurnable", 0x0000_0001),
    def("tfOnlyXRP", 0x0000_0002),
    def("tfTrustLine", 0x0000_0004),
    def("tfTransferable", 0x0000_0008),
];

static NFTOKEN_CREATE_OFFER_FLAGS: [FlagDef; 1] = [def("tfSellNFToken", 0x0000_0001)];

static AMM_DEPOSIT_FLAGS: [FlagDef; 6] = [
    def("tfLPToken", 0x0001_0000),
    def("tfSingleAsset", 0x0008_0000),
    def("tfTwoAsset", 0x0010_0000),
    def("tfOneAssetLPToken", 0x0020_0000),
    def("tfLimitLPToken", 0x0040_0000),
    def("tfTwoAssetIfEmpty", 0x0080_0000),
];

static AMM_WITHDRAW_FLAGS: [FlagDef; 7] = [
    def("tfLPToken", 0x0001_0000),
    def("tfWithdrawAll", 0x0002_0000),
    def("tfOneAssetWithdrawAll", 0x0004_0000),
    def("tfSingleAsset", 0x0008_0000),
    def("tfTwoAsset", 0x0010_0000),
    def("tfOneAssetLPToken", 0x0020_0000),
    def("tfLimitLPToken", 0x0040_0000),
];

/// The type-specific flag options. The canonical-signature bit is universal
/// and not repeated here.
pub fn flag_options(tx_type: TxType) -> &'static [FlagDef] {
    match tx_type {
        TxType::Payment => &PAYMENT_FLAGS,
        TxType::AccountSet => &ACCOUNT_SET_FLAGS,
        TxType::TrustSet => &TRUST_SET_FLAGS,
        TxType::OfferCreate => &OFFER_CREATE_FLAGS,
        TxType::PaymentChannelClaim => &PAYMENT_CHANNEL_CLAIM_FLAGS,
        TxType::NfTokenMint => &NFTOKEN_MINT_FLAGS,
        TxType::NfTokenCreateOffer => &NFTOKEN_CREATE_OFFER_FLAGS,
        TxType::AmmDeposit => &AMM_DEPOSIT_FLAGS,
        TxType::AmmWithdraw => &AMM_WITHDRAW_FLAGS,
        _ => &[],
    }
}

fn lookup(tx_type: TxType, name: &str) -> Option<u32> {
    if name == "tfFullyCanonicalSig" {
        return Some(TF_FULLY_CANONICAL_SIG);
    }
    flag_options(tx_type)
        .iter()
        .find(|d| d.name == name)
        .map(|d| d.bit)
}

fn known_mask(tx_type: TxType) -> u32 {
    flag_options(tx_type)
        .iter()
        .fold(TF_FULLY_CANONICAL_SIG, |mask, d| mask | d.bit)
}

// ─── FlagSet ────────────────────────────────────────────────────────────────

/// An immutable set of flag bits for one transaction type: named bits plus a
/// residual of bits decoded from the wire that no name maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlagSet {
    tx_type: TxType,
    named: u32,
    unknown: u32,
}

impl FlagSet {
    /// Start a builder seeded with the canonical-signature bit.
    pub fn builder(tx_type: TxType) -> FlagSetBuilder {
        FlagSetBuilder {
            tx_type,
            bits: TF_FULLY_CANONICAL_SIG,
        }
    }

    /// The explicit-zero flag set: value 0, canonical bit not set. Distinct
    /// from omitting the `Flags` field, which is `None` at the entity level.
    pub fn empty(tx_type: TxType) -> Self {
        Self {
            tx_type,
            named: 0,
            unknown: 0,
        }
    }

    /// Reconstruct from a raw wire integer. Bits without a name for this
    /// type land in the residual slot and survive re-encoding unchanged.
    pub fn decode(raw: u32, tx_type: TxType) -> Self {
        let mask = known_mask(tx_type);
        Self {
            tx_type,
            named: raw & mask,
            unknown: raw & !mask,
        }
    }

    /// The wire integer: all named bits OR the unknown-bit residual.
    pub fn encode(&self) -> u32 {
        self.named | self.unknown
    }

    pub fn tx_type(&self) -> TxType {
        self.tx_type
    }

    /// Whether a named option is set.
    pub fn is_set(&self, name: &str) -> Result<bool, FlagError> {
        let bit = lookup(self.tx_type, name).ok_or_else(|| FlagError::UnknownOption {
            name: name.to_string(),
            tx_type: self.tx_type,
        })?;
        Ok(self.named & bit != 0)
    }

    /// The names of all set options, table order.
    pub fn named_bits(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        if self.named & TF_FULLY_CANONICAL_SIG != 0 {
            names.push("tfFullyCanonicalSig");
        }
        for d in flag_options(self.tx_type) {
            if self.named & d.bit != 0 {
                names.push(d.name);
            }
        }
        names
    }

    /// Bits decoded from the wire that map to no known name.
    pub fn unknown_bits(&self) -> u32 {
        self.unknown
    }
}

/// Mutable staging for a [`FlagSet`]; consumed by [`FlagSetBuilder::build`].
#[derive(Debug, Clone)]
pub struct FlagSetBuilder {
    tx_type: TxType,
    bits: u32,
}

impl FlagSetBuilder {
    /// Set or clear a named option.
    pub fn with(mut self, name: &str, on: bool) -> Result<Self, FlagError> {
        let bit = lookup(self.tx_type, name).ok_or_else(|| FlagError::UnknownOption {
            name: name.to_string(),
            tx_type: self.tx_type,
        })?;
        if on {
            self.bits |= bit;
        } else {
            self.bits &= !bit;
        }
        Ok(self)
    }

    /// Finalize. Bit assembly only; cross-field legality involving flags is
    /// checked by the transaction invariants, which can also see fields
    /// outside the flag set.
    pub fn build(self) -> FlagSet {
        FlagSet {
            tx_type: self.tx_type,
            named: self.bits,
            unknown: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_seeds_canonical_bit() {
        let f = FlagSet::builder(TxType::Payment).build();
        assert_eq!(f.encode(), TF_FULLY_CANONICAL_SIG);
        assert!(f.is_set("tfFullyCanonicalSig").unwrap());
    }

    #[test]
    fn test_with_set_and_clear() {
        let f = FlagSet::builder(TxType::Payment)
            .with("tfPartialPayment", true)
            .unwrap()
            .with("tfLimitQuality", true)
            .unwrap()
            .with("tfLimitQuality", false)
            .unwrap()
            .build();
        assert!(f.is_set("tfPartialPayment").unwrap());
        assert!(!f.is_set("tfLimitQuality").unwrap());
        assert_eq!(f.encode(), TF_FULLY_CANONICAL_SIG | 0x0002_0000);
    }

    #[test]
    fn test_unknown_option_rejected() {
        let err = FlagSet::builder(TxType::Payment)
            .with("tfSell", true)
            .unwrap_err();
        assert_eq!(
            err,
            FlagError::UnknownOption {
                name: "tfSell".to_string(),
                tx_type: TxType::Payment,
            }
        );
    }

    #[test]
    fn test_empty_is_zero_without_canonical() {
        let f = FlagSet::empty(TxType::AccountSet);
        assert_eq!(f.encode(), 0);
        assert!(!f.is_set("tfFullyCanonicalSig").unwrap());
    }

    #[test]
    fn test_decode_names_known_bits() {
        let raw = TF_FULLY_CANONICAL_SIG | 0x0002_0000;
        let f = FlagSet::decode(raw, TxType::Payment);
        assert_eq!(
            f.named_bits(),
            vec!["tfFullyCanonicalSig", "tfPartialPayment"]
        );
        assert_eq!(f.unknown_bits(), 0);
        assert_eq!(f.encode(), raw);
    }

    #[test]
    fn test_decode_preserves_foreign_bits() {
        // 0x0800_0000 maps to no Payment option.
        let raw = TF_FULLY_CANONICAL_SIG | 0x0002_0000 | 0x0800_0000;
        let f = FlagSet::decode(raw, TxType::Payment);
        assert_eq!(f.unknown_bits(), 0x0800_0000);
        assert_eq!(f.encode(), raw);
    }

    #[test]
    fn test_decode_per_type_scoping() {
        // The same bit names different options per type.
        let f = FlagSet::decode(0x0002_0000, TxType::TrustSet);
        assert_eq!(f.named_bits(), vec!["tfSetNoRipple"]);
        let f = FlagSet::decode(0x0002_0000, TxType::OfferCancel);
        assert_eq!(f.named_bits(), Vec::<&str>::new());
        assert_eq!(f.unknown_bits(), 0x0002_0000);
    }

    #[test]
    fn test_all_subsets_roundtrip() {
        // Every subset of the OfferCreate options survives encode/decode.
        let options = flag_options(TxType::OfferCreate);
        for subset in 0u32..(1 << options.len()) {
            let mut builder = FlagSet::builder(TxType::OfferCreate);
            let mut expected = vec!["tfFullyCanonicalSig"];
            for (i, d) in options.iter().enumerate() {
                let on = subset & (1 << i) != 0;
                builder = builder.with(d.name, on).unwrap();
                if on {
                    expected.push(d.name);
                }
            }
            let f = builder.build();
            let decoded = FlagSet::decode(f.encode(), TxType::OfferCreate);
            assert_eq!(decoded.named_bits(), expected);
            assert_eq!(decoded, f);
        }
    }
}
