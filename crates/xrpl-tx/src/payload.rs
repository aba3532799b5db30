//! Per-transaction-type field sets.
//!
//! One struct per transaction type, aggregated in [`TxPayload`]. These are
//! plain data: each field is already a validated value type (amounts,
//! addresses, asset references) or an opaque hex/string passthrough, and the
//! cross-field legality rules live in [`crate::invariants`], applied when
//! the enclosing transaction is finalized.

use crate::derived::AmmFieldPresence;
use crate::entity::TxType;
use serde::Deserialize;
use serde_json::Value;
use xrpl_types::{AccountAddress, AssetId, CurrencyAmount, IssuedAmount, XrpAmount};

/// Send value from one account to another.
#[derive(Debug, Clone, PartialEq)]
pub struct Payment {
    pub amount: CurrencyAmount,
    pub destination: AccountAddress,
    pub destination_tag: Option<u32>,
    pub invoice_id: Option<String>,
    pub send_max: Option<CurrencyAmount>,
    pub deliver_min: Option<CurrencyAmount>,
    /// Opaque path set; routing is the server's concern.
    pub paths: Option<Value>,
}

/// Modify account settings.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AccountSet {
    pub set_flag: Option<u32>,
    pub clear_flag: Option<u32>,
    pub domain: Option<String>,
    pub email_hash: Option<String>,
    pub message_key: Option<String>,
    pub transfer_rate: Option<u32>,
    pub tick_size: Option<u8>,
}

/// Delete the sending account, sending its remaining XRP to another.
#[derive(Debug, Clone, PartialEq)]
pub struct AccountDelete {
    pub destination: AccountAddress,
    pub destination_tag: Option<u32>,
}

/// Assign, change, or remove the account's regular key pair.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SetRegularKey {
    pub regular_key: Option<AccountAddress>,
}

/// Create or modify a trust line.
#[derive(Debug, Clone, PartialEq)]
pub struct TrustSet {
    pub limit_amount: IssuedAmount,
    pub quality_in: Option<u32>,
    pub quality_out: Option<u32>,
}

/// Place an offer in the decentralized exchange.
#[derive(Debug, Clone, PartialEq)]
pub struct OfferCreate {
    pub taker_gets: CurrencyAmount,
    pub taker_pays: CurrencyAmount,
    pub expiration: Option<u32>,
    pub offer_sequence: Option<u32>,
}

/// Withdraw a previously placed offer.
#[derive(Debug, Clone, PartialEq)]
pub struct OfferCancel {
    pub offer_sequence: u32,
}

/// Sequester XRP until a time passes or a condition is met.
#[derive(Debug, Clone, PartialEq)]
pub struct EscrowCreate {
    pub amount: XrpAmount,
    pub destination: AccountAddress,
    pub destination_tag: Option<u32>,
    pub cancel_after: Option<u32>,
    pub finish_after: Option<u32>,
    pub condition: Option<String>,
}

/// Deliver escrowed XRP to its recipient.
#[derive(Debug, Clone, PartialEq)]
pub struct EscrowFinish {
    pub owner: AccountAddress,
    pub offer_sequence: u32,
    pub condition: Option<String>,
    pub fulfillment: Option<String>,
}

/// Return escrowed XRP to its sender.
#[derive(Debug, Clone, PartialEq)]
pub struct EscrowCancel {
    pub owner: AccountAddress,
    pub offer_sequence: u32,
}

/// Create a deferred payment the destination can cash.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckCreate {
    pub destination: AccountAddress,
    pub send_max: CurrencyAmount,
    pub destination_tag: Option<u32>,
    pub expiration: Option<u32>,
    pub invoice_id: Option<String>,
}

/// Redeem a check, for an exact amount or a minimum.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckCash {
    pub check_id: String,
    pub amount: Option<CurrencyAmount>,
    pub deliver_min: Option<CurrencyAmount>,
}

/// Void a check.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckCancel {
    pub check_id: String,
}

/// Grant or revoke preauthorization for deposits.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DepositPreauth {
    pub authorize: Option<AccountAddress>,
    pub unauthorize: Option<AccountAddress>,
}

/// Set aside sequence numbers as tickets.
#[derive(Debug, Clone, PartialEq)]
pub struct TicketCreate {
    pub ticket_count: u32,
}

/// One weighted entry of a signer list.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SignerListEntry {
    #[serde(rename = "Account")]
    pub account: String,
    #[serde(rename = "SignerWeight")]
    pub signer_weight: u16,
}

/// Install or delete the account's multi-signing list. A quorum of zero
/// deletes the list.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SignerListSet {
    pub signer_quorum: u32,
    pub signer_entries: Vec<SignerListEntry>,
}

/// Open a unidirectional XRP payment channel.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentChannelCreate {
    pub amount: XrpAmount,
    pub destination: AccountAddress,
    pub settle_delay: u32,
    pub public_key: String,
    pub cancel_after: Option<u32>,
    pub destination_tag: Option<u32>,
}

/// Add XRP to an open payment channel.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentChannelFund {
    pub channel: String,
    pub amount: XrpAmount,
    pub expiration: Option<u32>,
}

/// Redeem from, adjust, or close a payment channel.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentChannelClaim {
    pub channel: String,
    pub balance: Option<XrpAmount>,
    pub amount: Option<XrpAmount>,
    pub signature: Option<String>,
    pub public_key: Option<String>,
}

/// Mint a non-fungible token.
#[derive(Debug, Clone, PartialEq)]
pub struct NfTokenMint {
    pub nftoken_taxon: u32,
    pub issuer: Option<AccountAddress>,
    pub transfer_fee: Option<u16>,
    pub uri: Option<String>,
}

/// Destroy a non-fungible token.
#[derive(Debug, Clone, PartialEq)]
pub struct NfTokenBurn {
    pub nftoken_id: String,
    pub owner: Option<AccountAddress>,
}

/// Offer to buy or sell a non-fungible token.
#[derive(Debug, Clone, PartialEq)]
pub struct NfTokenCreateOffer {
    pub nftoken_id: String,
    pub amount: CurrencyAmount,
    pub owner: Option<AccountAddress>,
    pub destination: Option<AccountAddress>,
    pub expiration: Option<u32>,
}

/// Accept a buy or sell offer, directly or in brokered mode.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NfTokenAcceptOffer {
    pub nftoken_sell_offer: Option<String>,
    pub nftoken_buy_offer: Option<String>,
    pub nftoken_broker_fee: Option<CurrencyAmount>,
}

/// Cancel existing token offers.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NfTokenCancelOffer {
    pub nftoken_offers: Vec<String>,
}

/// Create a liquidity pool for an asset pair.
#[derive(Debug, Clone, PartialEq)]
pub struct AmmCreate {
    pub amount: CurrencyAmount,
    pub amount2: CurrencyAmount,
    pub trading_fee: u16,
}

/// Deposit into a liquidity pool. The deposit mode is not chosen directly:
/// it is derived from which of the optional amount fields are populated.
#[derive(Debug, Clone, PartialEq)]
pub struct AmmDeposit {
    pub asset: AssetId,
    pub asset2: AssetId,
    pub amount: Option<CurrencyAmount>,
    pub amount2: Option<CurrencyAmount>,
    pub lp_token_out: Option<IssuedAmount>,
    pub e_price: Option<CurrencyAmount>,
}

impl AmmDeposit {
    /// Snapshot of which optional fields are populated, for mode resolution.
    pub fn presence(&self) -> AmmFieldPresence {
        AmmFieldPresence {
            amount: self.amount.is_some(),
            amount2: self.amount2.is_some(),
            lp_token: self.lp_token_out.is_some(),
            e_price: self.e_price.is_some(),
        }
    }
}

/// Withdraw from a liquidity pool. Mode derivation mirrors [`AmmDeposit`],
/// except the explicit withdraw-all flags carry their own presence rules.
#[derive(Debug, Clone, PartialEq)]
pub struct AmmWithdraw {
    pub asset: AssetId,
    pub asset2: AssetId,
    pub amount: Option<CurrencyAmount>,
    pub amount2: Option<CurrencyAmount>,
    pub lp_token_in: Option<IssuedAmount>,
    pub e_price: Option<CurrencyAmount>,
}

impl AmmWithdraw {
    /// Snapshot of which optional fields are populated, for mode resolution.
    pub fn presence(&self) -> AmmFieldPresence {
        AmmFieldPresence {
            amount: self.amount.is_some(),
            amount2: self.amount2.is_some(),
            lp_token: self.lp_token_in.is_some(),
            e_price: self.e_price.is_some(),
        }
    }
}

/// Claw back issued tokens from a holder. The amount's issuer field names
/// the holder being clawed from.
#[derive(Debug, Clone, PartialEq)]
pub struct Clawback {
    pub amount: IssuedAmount,
}

// ─── The Payload Union ──────────────────────────────────────────────────────

/// The type-specific portion of a transaction.
#[derive(Debug, Clone, PartialEq)]
pub enum TxPayload {
    Payment(Payment),
    AccountSet(AccountSet),
    AccountDelete(AccountDelete),
    SetRegularKey(SetRegularKey),
    TrustSet(TrustSet),
    OfferCreate(OfferCreate),
    OfferCancel(OfferCancel),
    EscrowCreate(EscrowCreate),
    EscrowFinish(EscrowFinish),
    EscrowCancel(EscrowCancel),
    CheckCreate(CheckCreate),
    CheckCash(CheckCash),
    CheckCancel(CheckCancel),
    DepositPreauth(DepositPreauth),
    TicketCreate(TicketCreate),
    SignerListSet(SignerListSet),
    PaymentChannelCreate(PaymentChannelCreate),
    PaymentChannelFund(PaymentChannelFund),
    PaymentChannelClaim(PaymentChannelClaim),
    NfTokenMint(NfTokenMint),
    NfTokenBurn(NfTokenBurn),
    NfTokenCreateOffer(NfTokenCreateOffer),
    NfTokenAcceptOffer(NfTokenAcceptOffer),
    NfTokenCancelOffer(NfTokenCancelOffer),
    AmmCreate(AmmCreate),
    AmmDeposit(AmmDeposit),
    AmmWithdraw(AmmWithdraw),
    Clawback(Clawback),
}

impl TxPayload {
    /// The type tag this payload belongs to.
    pub fn tx_type(&self) -> TxType {
        match self {
            Self::Payment(_) => TxType::Payment,
            Self::AccountSet(_) => TxType::AccountSet,
            Self::AccountDelete(_) => TxType::AccountDelete,
            Self::SetRegularKey(_) => TxType::SetRegularKey,
            Self::TrustSet(_) => TxType::TrustSet,
            Self::OfferCreate(_) => TxType::OfferCreate,
            Self::OfferCancel(_) => TxType::OfferCancel,
            Self::EscrowCreate(_) => TxType::EscrowCreate,
            Self::EscrowFinish(_) => TxType::EscrowFinish,
            Self::EscrowCancel(_) => TxType::EscrowCancel,
            Self::CheckCreate(_) => TxType::CheckCreate,
            Self::CheckCash(_) => TxType::CheckCash,
            Self::CheckCancel(_) => TxType::CheckCancel,
            Self::DepositPreauth(_) => TxType::DepositPreauth,
            Self::TicketCreate(_) => TxType::TicketCreate,
            Self::SignerListSet(_) => TxType::SignerListSet,
            Self::PaymentChannelCreate(_) => TxType::PaymentChannelCreate,
            Self::PaymentChannelFund(_) => TxType::PaymentChannelFund,
            Self::PaymentChannelClaim(_) => TxType::PaymentChannelClaim,
            Self::NfTokenMint(_) => TxType::NfTokenMint,
            Self::NfTokenBurn(_) => TxType::NfTokenBurn,
            Self::NfTokenCreateOffer(_) => TxType::NfTokenCreateOffer,
            Self::NfTokenAcceptOffer(_) => TxType::NfTokenAcceptOffer,
            Self::NfTokenCancelOffer(_) => TxType::NfTokenCancelOffer,
            Self::AmmCreate(_) => TxType::AmmCreate,
            Self::AmmDeposit(_) => TxType::AmmDeposit,
            Self::AmmWithdraw(_) => TxType::AmmWithdraw,
            Self::Clawback(_) => TxType::Clawback,
        }
    }
}
