//! EscrowFinish fee floor computation.
//!
//! Finishing an escrow that carries a crypto-condition fulfillment costs more
//! than the base fee: a fixed surcharge plus a per-chunk charge on the
//! fulfillment's encoded size. The same function backs the invariant check
//! and lets callers pre-compute a sufficient fee.

use xrpl_types::constants::{
    ESCROW_FINISH_SURCHARGE_DROPS, FULFILLMENT_CHUNK_BYTES, FULFILLMENT_CHUNK_FEE_DROPS,
};
use xrpl_types::XrpAmount;

/// The minimum fee for an EscrowFinish presenting a fulfillment of
/// `fulfillment_size_bytes` encoded bytes, given the current ledger base fee.
///
/// `current + surcharge + per_chunk * ceil(size / chunk)`; with the 10-drop
/// reference base fee this floors at 330 drops.
pub fn compute_finish_fee(current_ledger_fee: XrpAmount, fulfillment_size_bytes: usize) -> XrpAmount {
    let chunks = (fulfillment_size_bytes as u64).div_ceil(FULFILLMENT_CHUNK_BYTES);
    let extra = ESCROW_FINISH_SURCHARGE_DROPS
        .saturating_add(FULFILLMENT_CHUNK_FEE_DROPS.saturating_mul(chunks));
    current_ledger_fee.saturating_add_drops(extra)
}

#[cfg(test)]
mod tests {
    use super::*;
    use xrpl_types::constants::{DEFAULT_BASE_FEE_DROPS, MAX_DROPS};

    fn base() -> XrpAmount {
        XrpAmount::from_drops(DEFAULT_BASE_FEE_DROPS).unwrap()
    }

    #[test]
    fn test_floor_with_empty_fulfillment() {
        assert_eq!(compute_finish_fee(base(), 0).drops(), 330);
    }

    #[test]
    fn test_chunks_are_ceiled() {
        assert_eq!(compute_finish_fee(base(), 1).drops(), 340);
        assert_eq!(compute_finish_fee(base(), 16).drops(), 340);
        assert_eq!(compute_finish_fee(base(), 17).drops(), 350);
        assert_eq!(compute_finish_fee(base(), 32).drops(), 350);
        assert_eq!(compute_finish_fee(base(), 33).drops(), 360);
    }

    #[test]
    fn test_tracks_current_ledger_fee() {
        let raised = XrpAmount::from_drops(50).unwrap();
        assert_eq!(compute_finish_fee(raised, 0).drops(), 370);
    }

    #[test]
    fn test_saturates_at_ceiling() {
        let huge = XrpAmount::from_drops(MAX_DROPS).unwrap();
        assert_eq!(compute_finish_fee(huge, 64).drops(), MAX_DROPS);
    }
}
