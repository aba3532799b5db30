//! XRP Ledger protocol constants and amount formatting helpers.
//!
//! Reference values match rippled's protocol definitions (SystemParameters.h,
//! STAmount.h, Escrow.cpp).

// =============================================================================
// Native Amount Bounds
// =============================================================================

/// Drops per XRP (10^6).
pub const DROPS_PER_XRP: u64 = 1_000_000;

/// Total XRP ever issued (100 billion).
pub const MAX_XRP: u64 = 100_000_000_000;

/// Protocol ceiling for a drops value: 100 billion XRP in drops (10^17).
pub const MAX_DROPS: u64 = MAX_XRP * DROPS_PER_XRP;

// =============================================================================
// Issued Amount Bounds
// =============================================================================

/// Maximum significant digits an issued-currency value may carry.
pub const MAX_ISSUED_PRECISION: u32 = 16;

/// Smallest normalized exponent of an issued-currency value.
pub const MIN_ISSUED_EXPONENT: i32 = -96;

/// Largest normalized exponent of an issued-currency value.
pub const MAX_ISSUED_EXPONENT: i32 = 80;

// =============================================================================
// Currency Codes
// =============================================================================

/// Length of a standard (ISO-like) currency code.
pub const STANDARD_CURRENCY_LEN: usize = 3;

/// Length of a hex custom currency code (160 bits).
pub const HEX_CURRENCY_LEN: usize = 40;

/// The reserved native-asset code. Never valid as an issued currency.
pub const NATIVE_CURRENCY: &str = "XRP";

// =============================================================================
// AccountSet Field Ranges
// =============================================================================

/// Lowest non-zero TransferRate (no fee; 1.0 scaled by 10^9).
pub const MIN_TRANSFER_RATE: u32 = 1_000_000_000;

/// Highest TransferRate (a 100% transfer fee).
pub const MAX_TRANSFER_RATE: u32 = 2_000_000_000;

/// Lowest non-zero TickSize.
pub const MIN_TICK_SIZE: u8 = 3;

/// Highest TickSize.
pub const MAX_TICK_SIZE: u8 = 15;

/// Exact hex-character count of an EmailHash (128-bit MD5).
pub const EMAIL_HASH_LEN: usize = 32;

// =============================================================================
// NFToken Bounds
// =============================================================================

/// Maximum NFToken TransferFee (50% in units of 0.001%).
pub const MAX_NFTOKEN_TRANSFER_FEE: u16 = 50_000;

// =============================================================================
// AMM Bounds
// =============================================================================

/// Maximum AMM trading fee (1% in units of 0.001%).
pub const MAX_AMM_TRADING_FEE: u16 = 1_000;

// =============================================================================
// Collection Bounds
// =============================================================================

/// Maximum entries in a signer list.
pub const MAX_SIGNER_ENTRIES: usize = 32;

/// Maximum tickets created by one TicketCreate.
pub const MAX_TICKET_COUNT: u32 = 250;

// =============================================================================
// Fee Constants
// =============================================================================

/// Reference base transaction fee in drops.
pub const DEFAULT_BASE_FEE_DROPS: u64 = 10;

/// Fixed surcharge added to an EscrowFinish that presents a fulfillment.
pub const ESCROW_FINISH_SURCHARGE_DROPS: u64 = 320;

/// Fulfillment size is charged per chunk of this many bytes.
pub const FULFILLMENT_CHUNK_BYTES: u64 = 16;

/// Fee per fulfillment chunk, in drops.
pub const FULFILLMENT_CHUNK_FEE_DROPS: u64 = 10;

// =============================================================================
// Amount Formatting
// =============================================================================

/// Format a drops amount as a human-readable XRP string (e.g., 1.234567).
pub fn format_xrp(drops: u64) -> String {
    let whole = drops / DROPS_PER_XRP;
    let frac = drops % DROPS_PER_XRP;
    if frac == 0 {
        format!("{}.0", whole)
    } else {
        let frac_str = format!("{:06}", frac);
        let trimmed = frac_str.trim_end_matches('0');
        format!("{}.{}", whole, trimmed)
    }
}

/// Parse a human-readable XRP string to drops.
pub fn parse_xrp(s: &str) -> Option<u64> {
    let s = s.trim();
    let (whole_str, frac_str) = if let Some(dot_pos) = s.find('.') {
        (&s[..dot_pos], &s[dot_pos + 1..])
    } else {
        (s, "")
    };

    let whole: u64 = whole_str.parse().ok()?;
    let frac: u64 = if frac_str.is_empty() {
        0
    } else {
        if frac_str.len() > 6 {
            return None;
        }
        let padded = format!("{:0<6}", frac_str);
        padded.parse().ok()?
    };

    let drops = whole.checked_mul(DROPS_PER_XRP)?.checked_add(frac)?;
    if drops > MAX_DROPS {
        return None;
    }
    Some(drops)
}
