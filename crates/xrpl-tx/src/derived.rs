//! Derived-flag resolution for the AMM transactions.
//!
//! An AMM deposit or withdrawal does not choose its mode flag directly: the
//! mode is implied by which of the optional amount fields are populated.
//! Resolution is a pure function of a field-presence snapshot so it can be
//! tested without building an entity, and it runs at finalization before the
//! invariant checks (some of which are conditioned on the resolved mode).

use crate::entity::TxType;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResolveError {
    #[error("no {tx_type} mode matches the populated fields ({present})")]
    Ambiguous { tx_type: TxType, present: String },

    #[error("populated fields ({present}) match more than one {tx_type} mode: {matched}")]
    Conflicting {
        tx_type: TxType,
        present: String,
        matched: String,
    },
}

/// Which of the four optional AMM amount fields are populated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AmmFieldPresence {
    pub amount: bool,
    pub amount2: bool,
    /// `LPTokenOut` on a deposit, `LPTokenIn` on a withdrawal.
    pub lp_token: bool,
    pub e_price: bool,
}

impl AmmFieldPresence {
    fn describe(&self) -> String {
        let mut names = Vec::new();
        if self.amount {
            names.push("Amount");
        }
        if self.amount2 {
            names.push("Amount2");
        }
        if self.lp_token {
            names.push("LPToken");
        }
        if self.e_price {
            names.push("EPrice");
        }
        if names.is_empty() {
            "none".to_string()
        } else {
            names.join("+")
        }
    }
}

/// One resolved mode: the flag name and its bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DerivedMode {
    pub name: &'static str,
    pub bit: u32,
}

struct ModeRow {
    mode: DerivedMode,
    pattern: AmmFieldPresence,
}

const fn row(name: &'static str, bit: u32, pattern: AmmFieldPresence) -> ModeRow {
    ModeRow {
        mode: DerivedMode { name, bit },
        pattern,
    }
}

const fn presence(amount: bool, amount2: bool, lp_token: bool, e_price: bool) -> AmmFieldPresence {
    AmmFieldPresence {
        amount,
        amount2,
        lp_token,
        e_price,
    }
}

/// The five derivable deposit modes. Patterns are exact: a row matches only
/// when present and absent fields both agree.
static DEPOSIT_MODES: [ModeRow; 5] = [
    row("tfLPToken", 0x0001_0000, presence(false, false, true, false)),
    row("tfTwoAsset", 0x0010_0000, presence(true, true, false, false)),
    row("tfSingleAsset", 0x0008_0000, presence(true, false, false, false)),
    row("tfOneAssetLPToken", 0x0020_0000, presence(true, false, true, false)),
    row("tfLimitLPToken", 0x0040_0000, presence(true, false, false, true)),
];

/// The five derivable withdrawal modes (the withdraw-all flags are explicit
/// user choices, not derivable, and are checked by the invariants instead).
static WITHDRAW_MODES: [ModeRow; 5] = [
    row("tfLPToken", 0x0001_0000, presence(false, false, true, false)),
    row("tfTwoAsset", 0x0010_0000, presence(true, true, false, false)),
    row("tfSingleAsset", 0x0008_0000, presence(true, false, false, false)),
    row("tfOneAssetLPToken", 0x0020_0000, presence(true, false, true, false)),
    row("tfLimitLPToken", 0x0040_0000, presence(true, false, false, true)),
];

/// OR of all derivable deposit-mode bits.
pub(crate) fn deposit_mode_mask() -> u32 {
    DEPOSIT_MODES.iter().fold(0, |m, r| m | r.mode.bit)
}

/// OR of all derivable withdrawal-mode bits.
pub(crate) fn withdraw_mode_mask() -> u32 {
    WITHDRAW_MODES.iter().fold(0, |m, r| m | r.mode.bit)
}

/// Whether this transaction type computes its flags from field presence.
pub fn derives_flags(tx_type: TxType) -> bool {
    matches!(tx_type, TxType::AmmDeposit | TxType::AmmWithdraw)
}

/// Resolve the deposit mode implied by the presence snapshot.
pub fn resolve_deposit_mode(p: &AmmFieldPresence) -> Result<DerivedMode, ResolveError> {
    resolve(TxType::AmmDeposit, &DEPOSIT_MODES, p)
}

/// Resolve the withdrawal mode implied by the presence snapshot.
pub fn resolve_withdraw_mode(p: &AmmFieldPresence) -> Result<DerivedMode, ResolveError> {
    resolve(TxType::AmmWithdraw, &WITHDRAW_MODES, p)
}

fn resolve(
    tx_type: TxType,
    table: &'static [ModeRow],
    p: &AmmFieldPresence,
) -> Result<DerivedMode, ResolveError> {
    let matched: Vec<&ModeRow> = table.iter().filter(|r| r.pattern == *p).collect();
    match matched.as_slice() {
        [one] => Ok(one.mode),
        [] => Err(ResolveError::Ambiguous {
            tx_type,
            present: p.describe(),
        }),
        many => Err(ResolveError::Conflicting {
            tx_type,
            present: p.describe(),
            matched: many
                .iter()
                .map(|r| r.mode.name)
                .collect::<Vec<_>>()
                .join(", "),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_patterns() -> impl Iterator<Item = AmmFieldPresence> {
        (0u8..16).map(|bits| AmmFieldPresence {
            amount: bits & 1 != 0,
            amount2: bits & 2 != 0,
            lp_token: bits & 4 != 0,
            e_price: bits & 8 != 0,
        })
    }

    #[test]
    fn test_deposit_legal_patterns() {
        let cases = [
            (presence(false, false, true, false), "tfLPToken"),
            (presence(true, true, false, false), "tfTwoAsset"),
            (presence(true, false, false, false), "tfSingleAsset"),
            (presence(true, false, true, false), "tfOneAssetLPToken"),
            (presence(true, false, false, true), "tfLimitLPToken"),
        ];
        for (p, expected) in cases {
            assert_eq!(resolve_deposit_mode(&p).unwrap().name, expected);
        }
    }

    #[test]
    fn test_deposit_modes_are_distinct() {
        let mut seen = std::collections::HashSet::new();
        for p in all_patterns() {
            if let Ok(mode) = resolve_deposit_mode(&p) {
                assert!(seen.insert(mode.bit), "mode {} resolved twice", mode.name);
            }
        }
        assert_eq!(seen.len(), 5);
    }

    #[test]
    fn test_deposit_illegal_patterns_are_ambiguous() {
        // lp_token+amount2 with nothing else matches no mode.
        let p = presence(false, true, true, false);
        assert!(matches!(
            resolve_deposit_mode(&p),
            Err(ResolveError::Ambiguous { .. })
        ));
        // Nothing populated at all.
        assert!(matches!(
            resolve_deposit_mode(&AmmFieldPresence::default()),
            Err(ResolveError::Ambiguous { .. })
        ));
    }

    #[test]
    fn test_deposit_table_is_total_and_disjoint() {
        // Exactly one mode or Ambiguous for every one of the 16 patterns;
        // Conflicting must be structurally unreachable.
        let mut resolved = 0;
        for p in all_patterns() {
            match resolve_deposit_mode(&p) {
                Ok(_) => resolved += 1,
                Err(ResolveError::Ambiguous { .. }) => {}
                Err(e @ ResolveError::Conflicting { .. }) => {
                    panic!("table rows overlap: {}", e)
                }
            }
        }
        assert_eq!(resolved, 5);
    }

    #[test]
    fn test_withdraw_table_mirrors_deposit() {
        for p in all_patterns() {
            match (resolve_deposit_mode(&p), resolve_withdraw_mode(&p)) {
                (Ok(d), Ok(w)) => assert_eq!(d, w),
                (Err(_), Err(_)) => {}
                (d, w) => panic!("tables disagree on {:?}: {:?} vs {:?}", p, d, w),
            }
        }
    }

    #[test]
    fn test_mode_masks() {
        assert_eq!(deposit_mode_mask(), 0x0079_0000);
        assert_eq!(withdraw_mode_mask(), 0x0079_0000);
    }

    #[test]
    fn test_derives_flags() {
        assert!(derives_flags(TxType::AmmDeposit));
        assert!(derives_flags(TxType::AmmWithdraw));
        assert!(!derives_flags(TxType::Payment));
    }
}
