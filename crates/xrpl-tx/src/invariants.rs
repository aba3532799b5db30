//! Cross-field legality rules, run once when a transaction is finalized.
//!
//! One consolidated validator keyed on the type tag, so every rule lives in
//! one place and each is independently testable. A violation names the
//! offending field(s). Checks short-circuit on the first violation; nothing
//! here performs I/O or mutates the entity.

use crate::derived::{
    self, resolve_deposit_mode, resolve_withdraw_mode, AmmFieldPresence, ResolveError,
};
use crate::entity::Transaction;
use crate::fee::compute_finish_fee;
use crate::payload::{self, TxPayload};
use xrpl_types::constants::{
    DEFAULT_BASE_FEE_DROPS, EMAIL_HASH_LEN, MAX_AMM_TRADING_FEE, MAX_NFTOKEN_TRANSFER_FEE,
    MAX_SIGNER_ENTRIES, MAX_TICKET_COUNT, MAX_TICK_SIZE, MAX_TRANSFER_RATE, MIN_TICK_SIZE,
    MIN_TRANSFER_RATE,
};
use thiserror::Error;
use xrpl_types::XrpAmount;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvariantViolation {
    #[error("{field_a} and {field_b} cannot both be present")]
    MutuallyExclusive {
        field_a: &'static str,
        field_b: &'static str,
    },

    #[error("exactly one of {field_a} or {field_b} must be present")]
    ExactlyOneRequired {
        field_a: &'static str,
        field_b: &'static str,
    },

    #[error("at least one of {field_a} or {field_b} must be present")]
    AtLeastOneRequired {
        field_a: &'static str,
        field_b: &'static str,
    },

    #[error("{field} requires {requires}")]
    PresenceDependency {
        field: &'static str,
        requires: &'static str,
    },

    #[error("{earlier_field} ({earlier}) must be strictly earlier than {later_field} ({later})")]
    Ordering {
        earlier_field: &'static str,
        later_field: &'static str,
        earlier: u32,
        later: u32,
    },

    #[error("{field} is {value}, outside [{min}, {max}]{zero_hint}")]
    Range {
        field: &'static str,
        value: u64,
        min: u64,
        max: u64,
        /// Set when 0 is an accepted escape value outside the range.
        zero_hint: &'static str,
    },

    #[error("{field} must be exactly {expected} hex characters, got {actual}")]
    FixedLength {
        field: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("{field} is not a hex string")]
    NotHex { field: &'static str },

    #[error("{field} must not be empty")]
    EmptyCollection { field: &'static str },

    #[error("{field} holds {actual} entries, more than the maximum {max}")]
    CollectionTooLarge {
        field: &'static str,
        max: usize,
        actual: usize,
    },

    #[error("SignerQuorum {quorum} exceeds the total signer weight {total}")]
    QuorumExceedsWeights { quorum: u32, total: u32 },

    #[error("SignerEntries must be omitted when SignerQuorum is 0")]
    SignerListDeletionWithEntries,

    #[error("declared fee of {fee_drops} drops is below the required floor of {required_drops}")]
    FeeBelowFloor { fee_drops: u64, required_drops: u64 },

    #[error("{field} must differ from the sending Account")]
    SelfReference { field: &'static str },

    #[error("a buy offer (tfSellNFToken unset) must name the token's Owner")]
    BuyOfferRequiresOwner,

    #[error("a sell offer (tfSellNFToken set) must not name an Owner")]
    SellOfferWithOwner,

    #[error(transparent)]
    Mode(#[from] ResolveError),

    #[error("explicit flags select a different mode than the populated fields imply ({resolved})")]
    ModeMismatch { resolved: &'static str },
}

/// Run every invariant applicable to this transaction's type.
pub fn validate(tx: &Transaction) -> Result<(), InvariantViolation> {
    check_common(tx)?;
    match tx.payload() {
        TxPayload::Payment(p) => check_payment(tx, p),
        TxPayload::AccountSet(p) => check_account_set(p),
        TxPayload::AccountDelete(p) => check_account_delete(tx, p),
        TxPayload::TrustSet(_) => check_trust_set(tx),
        TxPayload::OfferCreate(_) => check_offer_create(tx),
        TxPayload::EscrowCreate(p) => check_escrow_create(p),
        TxPayload::EscrowFinish(p) => check_escrow_finish(tx, p),
        TxPayload::CheckCreate(p) => check_check_create(tx, p),
        TxPayload::CheckCash(p) => check_check_cash(p),
        TxPayload::DepositPreauth(p) => check_deposit_preauth(tx, p),
        TxPayload::TicketCreate(p) => check_ticket_create(p),
        TxPayload::SignerListSet(p) => check_signer_list_set(tx, p),
        TxPayload::PaymentChannelClaim(p) => check_payment_channel_claim(p),
        TxPayload::NfTokenMint(p) => check_nftoken_mint(tx, p),
        TxPayload::NfTokenCreateOffer(p) => check_nftoken_create_offer(tx, p),
        TxPayload::NfTokenAcceptOffer(p) => check_nftoken_accept_offer(p),
        TxPayload::NfTokenCancelOffer(p) => check_nftoken_cancel_offer(p),
        TxPayload::AmmCreate(p) => check_amm_create(p),
        TxPayload::AmmDeposit(p) => check_amm_deposit(tx, p),
        TxPayload::AmmWithdraw(p) => check_amm_withdraw(tx, p),
        TxPayload::Clawback(p) => check_clawback(tx, p),
        TxPayload::SetRegularKey(_)
        | TxPayload::OfferCancel(_)
        | TxPayload::EscrowCancel(_)
        | TxPayload::CheckCancel(_)
        | TxPayload::PaymentChannelCreate(_)
        | TxPayload::PaymentChannelFund(_)
        | TxPayload::NfTokenBurn(_) => Ok(()),
    }
}

// ─── Helpers ────────────────────────────────────────────────────────────────

fn flag_set(tx: &Transaction, name: &str) -> bool {
    tx.flags()
        .map(|f| f.is_set(name).unwrap_or(false))
        .unwrap_or(false)
}

fn hex_bytes(field: &'static str, s: &str) -> Result<usize, InvariantViolation> {
    hex::decode(s)
        .map(|b| b.len())
        .map_err(|_| InvariantViolation::NotHex { field })
}

// ─── Universal Fields ───────────────────────────────────────────────────────

fn check_common(tx: &Transaction) -> Result<(), InvariantViolation> {
    if let Some(id) = tx.account_txn_id() {
        if id.len() != 64 {
            return Err(InvariantViolation::FixedLength {
                field: "AccountTxnID",
                expected: 64,
                actual: id.len(),
            });
        }
        hex_bytes("AccountTxnID", id)?;
    }
    Ok(())
}

// ─── Payments and Account Settings ──────────────────────────────────────────

fn check_payment(tx: &Transaction, p: &payload::Payment) -> Result<(), InvariantViolation> {
    if p.deliver_min.is_some() && !flag_set(tx, "tfPartialPayment") {
        return Err(InvariantViolation::PresenceDependency {
            field: "DeliverMin",
            requires: "tfPartialPayment",
        });
    }
    Ok(())
}

fn check_account_set(p: &payload::AccountSet) -> Result<(), InvariantViolation> {
    if let (Some(set), Some(clear)) = (p.set_flag, p.clear_flag) {
        if set == clear {
            return Err(InvariantViolation::MutuallyExclusive {
                field_a: "SetFlag",
                field_b: "ClearFlag",
            });
        }
    }
    if let Some(rate) = p.transfer_rate {
        if rate != 0 && !(MIN_TRANSFER_RATE..=MAX_TRANSFER_RATE).contains(&rate) {
            return Err(InvariantViolation::Range {
                field: "TransferRate",
                value: rate as u64,
                min: MIN_TRANSFER_RATE as u64,
                max: MAX_TRANSFER_RATE as u64,
                zero_hint: " (or exactly 0)",
            });
        }
    }
    if let Some(size) = p.tick_size {
        if size != 0 && !(MIN_TICK_SIZE..=MAX_TICK_SIZE).contains(&size) {
            return Err(InvariantViolation::Range {
                field: "TickSize",
                value: size as u64,
                min: MIN_TICK_SIZE as u64,
                max: MAX_TICK_SIZE as u64,
                zero_hint: " (or exactly 0)",
            });
        }
    }
    if let Some(hash) = &p.email_hash {
        if hash.len() != EMAIL_HASH_LEN {
            return Err(InvariantViolation::FixedLength {
                field: "EmailHash",
                expected: EMAIL_HASH_LEN,
                actual: hash.len(),
            });
        }
        hex_bytes("EmailHash", hash)?;
    }
    Ok(())
}

fn check_account_delete(
    tx: &Transaction,
    p: &payload::AccountDelete,
) -> Result<(), InvariantViolation> {
    if p.destination == *tx.account() {
        return Err(InvariantViolation::SelfReference {
            field: "Destination",
        });
    }
    Ok(())
}

fn check_trust_set(tx: &Transaction) -> Result<(), InvariantViolation> {
    if flag_set(tx, "tfSetNoRipple") && flag_set(tx, "tfClearNoRipple") {
        return Err(InvariantViolation::MutuallyExclusive {
            field_a: "tfSetNoRipple",
            field_b: "tfClearNoRipple",
        });
    }
    if flag_set(tx, "tfSetFreeze") && flag_set(tx, "tfClearFreeze") {
        return Err(InvariantViolation::MutuallyExclusive {
            field_a: "tfSetFreeze",
            field_b: "tfClearFreeze",
        });
    }
    Ok(())
}

fn check_offer_create(tx: &Transaction) -> Result<(), InvariantViolation> {
    if flag_set(tx, "tfImmediateOrCancel") && flag_set(tx, "tfFillOrKill") {
        return Err(InvariantViolation::MutuallyExclusive {
            field_a: "tfImmediateOrCancel",
            field_b: "tfFillOrKill",
        });
    }
    Ok(())
}

// ─── Escrows ────────────────────────────────────────────────────────────────

fn check_escrow_create(p: &payload::EscrowCreate) -> Result<(), InvariantViolation> {
    if p.finish_after.is_none() && p.condition.is_none() {
        return Err(InvariantViolation::AtLeastOneRequired {
            field_a: "FinishAfter",
            field_b: "Condition",
        });
    }
    if let (Some(finish), Some(cancel)) = (p.finish_after, p.cancel_after) {
        if finish >= cancel {
            return Err(InvariantViolation::Ordering {
                earlier_field: "FinishAfter",
                later_field: "CancelAfter",
                earlier: finish,
                later: cancel,
            });
        }
    }
    if let Some(condition) = &p.condition {
        hex_bytes("Condition", condition)?;
    }
    Ok(())
}

fn check_escrow_finish(tx: &Transaction, p: &payload::EscrowFinish) -> Result<(), InvariantViolation> {
    match (&p.condition, &p.fulfillment) {
        (Some(_), None) => {
            return Err(InvariantViolation::PresenceDependency {
                field: "Condition",
                requires: "Fulfillment",
            })
        }
        (None, Some(_)) => {
            return Err(InvariantViolation::PresenceDependency {
                field: "Fulfillment",
                requires: "Condition",
            })
        }
        _ => {}
    }
    if let Some(fulfillment) = &p.fulfillment {
        if let Some(condition) = &p.condition {
            hex_bytes("Condition", condition)?;
        }
        let size = hex_bytes("Fulfillment", fulfillment)?;
        let base = XrpAmount::default().saturating_add_drops(DEFAULT_BASE_FEE_DROPS);
        let required = compute_finish_fee(base, size);
        if tx.fee() < required {
            return Err(InvariantViolation::FeeBelowFloor {
                fee_drops: tx.fee().drops(),
                required_drops: required.drops(),
            });
        }
    }
    Ok(())
}

// ─── Checks ─────────────────────────────────────────────────────────────────

fn check_check_create(tx: &Transaction, p: &payload::CheckCreate) -> Result<(), InvariantViolation> {
    if p.destination == *tx.account() {
        return Err(InvariantViolation::SelfReference {
            field: "Destination",
        });
    }
    Ok(())
}

fn check_check_cash(p: &payload::CheckCash) -> Result<(), InvariantViolation> {
    if p.amount.is_some() == p.deliver_min.is_some() {
        return Err(InvariantViolation::ExactlyOneRequired {
            field_a: "Amount",
            field_b: "DeliverMin",
        });
    }
    Ok(())
}

fn check_deposit_preauth(
    tx: &Transaction,
    p: &payload::DepositPreauth,
) -> Result<(), InvariantViolation> {
    if p.authorize.is_some() == p.unauthorize.is_some() {
        return Err(InvariantViolation::ExactlyOneRequired {
            field_a: "Authorize",
            field_b: "Unauthorize",
        });
    }
    if p.authorize.as_ref() == Some(tx.account()) {
        return Err(InvariantViolation::SelfReference { field: "Authorize" });
    }
    Ok(())
}

// ─── Tickets and Signer Lists ───────────────────────────────────────────────

fn check_ticket_create(p: &payload::TicketCreate) -> Result<(), InvariantViolation> {
    if p.ticket_count == 0 || p.ticket_count > MAX_TICKET_COUNT {
        return Err(InvariantViolation::Range {
            field: "TicketCount",
            value: p.ticket_count as u64,
            min: 1,
            max: MAX_TICKET_COUNT as u64,
            zero_hint: "",
        });
    }
    Ok(())
}

fn check_signer_list_set(
    tx: &Transaction,
    p: &payload::SignerListSet,
) -> Result<(), InvariantViolation> {
    if p.signer_quorum == 0 {
        if !p.signer_entries.is_empty() {
            return Err(InvariantViolation::SignerListDeletionWithEntries);
        }
        return Ok(());
    }
    if p.signer_entries.is_empty() {
        return Err(InvariantViolation::EmptyCollection {
            field: "SignerEntries",
        });
    }
    if p.signer_entries.len() > MAX_SIGNER_ENTRIES {
        return Err(InvariantViolation::CollectionTooLarge {
            field: "SignerEntries",
            max: MAX_SIGNER_ENTRIES,
            actual: p.signer_entries.len(),
        });
    }
    if p.signer_entries
        .iter()
        .any(|e| e.account == tx.account().as_str())
    {
        return Err(InvariantViolation::SelfReference {
            field: "SignerEntries",
        });
    }
    let total: u32 = p.signer_entries.iter().map(|e| e.signer_weight as u32).sum();
    if p.signer_quorum > total {
        return Err(InvariantViolation::QuorumExceedsWeights {
            quorum: p.signer_quorum,
            total,
        });
    }
    Ok(())
}

// ─── Payment Channels ───────────────────────────────────────────────────────

fn check_payment_channel_claim(
    p: &payload::PaymentChannelClaim,
) -> Result<(), InvariantViolation> {
    if p.signature.is_some() && p.public_key.is_none() {
        return Err(InvariantViolation::PresenceDependency {
            field: "Signature",
            requires: "PublicKey",
        });
    }
    Ok(())
}

// ─── NFTokens ───────────────────────────────────────────────────────────────

fn check_nftoken_mint(tx: &Transaction, p: &payload::NfTokenMint) -> Result<(), InvariantViolation> {
    if let Some(fee) = p.transfer_fee {
        if fee > MAX_NFTOKEN_TRANSFER_FEE {
            return Err(InvariantViolation::Range {
                field: "TransferFee",
                value: fee as u64,
                min: 0,
                max: MAX_NFTOKEN_TRANSFER_FEE as u64,
                zero_hint: "",
            });
        }
        if !flag_set(tx, "tfTransferable") {
            return Err(InvariantViolation::PresenceDependency {
                field: "TransferFee",
                requires: "tfTransferable",
            });
        }
    }
    if p.issuer.as_ref() == Some(tx.account()) {
        return Err(InvariantViolation::SelfReference { field: "Issuer" });
    }
    Ok(())
}

fn check_nftoken_create_offer(
    tx: &Transaction,
    p: &payload::NfTokenCreateOffer,
) -> Result<(), InvariantViolation> {
    let selling = flag_set(tx, "tfSellNFToken");
    match (&p.owner, selling) {
        (Some(_), true) => return Err(InvariantViolation::SellOfferWithOwner),
        (None, false) => return Err(InvariantViolation::BuyOfferRequiresOwner),
        _ => {}
    }
    if p.owner.as_ref() == Some(tx.account()) {
        return Err(InvariantViolation::SelfReference { field: "Owner" });
    }
    Ok(())
}

fn check_nftoken_accept_offer(
    p: &payload::NfTokenAcceptOffer,
) -> Result<(), InvariantViolation> {
    if p.nftoken_sell_offer.is_none() && p.nftoken_buy_offer.is_none() {
        return Err(InvariantViolation::AtLeastOneRequired {
            field_a: "NFTokenSellOffer",
            field_b: "NFTokenBuyOffer",
        });
    }
    if p.nftoken_broker_fee.is_some()
        && (p.nftoken_sell_offer.is_none() || p.nftoken_buy_offer.is_none())
    {
        return Err(InvariantViolation::PresenceDependency {
            field: "NFTokenBrokerFee",
            requires: "both NFTokenSellOffer and NFTokenBuyOffer",
        });
    }
    Ok(())
}

fn check_nftoken_cancel_offer(
    p: &payload::NfTokenCancelOffer,
) -> Result<(), InvariantViolation> {
    if p.nftoken_offers.is_empty() {
        return Err(InvariantViolation::EmptyCollection {
            field: "NFTokenOffers",
        });
    }
    Ok(())
}

// ─── AMM ────────────────────────────────────────────────────────────────────

fn check_amm_create(p: &payload::AmmCreate) -> Result<(), InvariantViolation> {
    if p.trading_fee > MAX_AMM_TRADING_FEE {
        return Err(InvariantViolation::Range {
            field: "TradingFee",
            value: p.trading_fee as u64,
            min: 0,
            max: MAX_AMM_TRADING_FEE as u64,
            zero_hint: "",
        });
    }
    Ok(())
}

fn check_amm_deposit(tx: &Transaction, p: &payload::AmmDeposit) -> Result<(), InvariantViolation> {
    let presence = p.presence();
    if flag_set(tx, "tfTwoAssetIfEmpty") {
        // Explicit bootstrap mode; requires exactly the two-asset field pair.
        let expected = AmmFieldPresence {
            amount: true,
            amount2: true,
            lp_token: false,
            e_price: false,
        };
        if presence != expected {
            return Err(InvariantViolation::PresenceDependency {
                field: "tfTwoAssetIfEmpty",
                requires: "Amount and Amount2 (and no LPTokenOut/EPrice)",
            });
        }
        return Ok(());
    }
    let mode = resolve_deposit_mode(&presence)?;
    check_mode_agreement(tx, mode.name, mode.bit, derived::deposit_mode_mask())
}

fn check_amm_withdraw(tx: &Transaction, p: &payload::AmmWithdraw) -> Result<(), InvariantViolation> {
    let presence = p.presence();
    if flag_set(tx, "tfWithdrawAll") {
        if presence != AmmFieldPresence::default() {
            return Err(InvariantViolation::PresenceDependency {
                field: "tfWithdrawAll",
                requires: "all amount fields to be omitted",
            });
        }
        return Ok(());
    }
    if flag_set(tx, "tfOneAssetWithdrawAll") {
        let expected = AmmFieldPresence {
            amount: true,
            amount2: false,
            lp_token: false,
            e_price: false,
        };
        if presence != expected {
            return Err(InvariantViolation::PresenceDependency {
                field: "tfOneAssetWithdrawAll",
                requires: "Amount alone",
            });
        }
        return Ok(());
    }
    let mode = resolve_withdraw_mode(&presence)?;
    check_mode_agreement(tx, mode.name, mode.bit, derived::withdraw_mode_mask())
}

/// An explicit flag set may carry no mode bit (the resolver's answer stands)
/// or exactly the resolved one; any other mode bit contradicts the fields.
fn check_mode_agreement(
    tx: &Transaction,
    resolved_name: &'static str,
    resolved_bit: u32,
    mode_mask: u32,
) -> Result<(), InvariantViolation> {
    if let Some(flags) = tx.flags() {
        let set = flags.encode() & mode_mask;
        if set != 0 && set != resolved_bit {
            return Err(InvariantViolation::ModeMismatch {
                resolved: resolved_name,
            });
        }
    }
    Ok(())
}

// ─── Clawback ───────────────────────────────────────────────────────────────

fn check_clawback(tx: &Transaction, p: &payload::Clawback) -> Result<(), InvariantViolation> {
    // The amount's issuer field names the holder being clawed from.
    if p.amount.issuer() == tx.account() {
        return Err(InvariantViolation::SelfReference {
            field: "Amount.issuer",
        });
    }
    Ok(())
}
