//! The transaction aggregate and its universal sub-objects.
//!
//! A [`Transaction`] is immutable once built: construction goes through
//! [`crate::builder::TransactionBuilder`] or [`Transaction::from_json`], both
//! of which run the per-type invariant checks exactly once at finalization.
//! Fields are therefore private; read access goes through accessors.

use crate::flags::FlagSet;
use crate::payload::TxPayload;
use crate::unknown::UnknownFieldBag;
use serde::Deserialize;
use xrpl_types::{AccountAddress, XrpAmount};

// ─── Transaction Types ──────────────────────────────────────────────────────

/// Every transaction type this model understands. The type tag selects the
/// payload field set, the flag option table, and the invariant checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TxType {
    Payment,
    AccountSet,
    AccountDelete,
    SetRegularKey,
    TrustSet,
    OfferCreate,
    OfferCancel,
    EscrowCreate,
    EscrowFinish,
    EscrowCancel,
    CheckCreate,
    CheckCash,
    CheckCancel,
    DepositPreauth,
    TicketCreate,
    SignerListSet,
    PaymentChannelCreate,
    PaymentChannelFund,
    PaymentChannelClaim,
    NfTokenMint,
    NfTokenBurn,
    NfTokenCreateOffer,
    NfTokenAcceptOffer,
    NfTokenCancelOffer,
    AmmCreate,
    AmmDeposit,
    AmmWithdraw,
    Clawback,
}

impl TxType {
    /// The name carried in the wire `TransactionType` field.
    pub fn wire_name(&self) -> &'static str {
        match self {
            Self::Payment => "Payment",
            Self::AccountSet => "AccountSet",
            Self::AccountDelete => "AccountDelete",
            Self::SetRegularKey => "SetRegularKey",
            Self::TrustSet => "TrustSet",
            Self::OfferCreate => "OfferCreate",
            Self::OfferCancel => "OfferCancel",
            Self::EscrowCreate => "EscrowCreate",
            Self::EscrowFinish => "EscrowFinish",
            Self::EscrowCancel => "EscrowCancel",
            Self::CheckCreate => "CheckCreate",
            Self::CheckCash => "CheckCash",
            Self::CheckCancel => "CheckCancel",
            Self::DepositPreauth => "DepositPreauth",
            Self::TicketCreate => "TicketCreate",
            Self::SignerListSet => "SignerListSet",
            Self::PaymentChannelCreate => "PaymentChannelCreate",
            Self::PaymentChannelFund => "PaymentChannelFund",
            Self::PaymentChannelClaim => "PaymentChannelClaim",
            Self::NfTokenMint => "NFTokenMint",
            Self::NfTokenBurn => "NFTokenBurn",
            Self::NfTokenCreateOffer => "NFTokenCreateOffer",
            Self::NfTokenAcceptOffer => "NFTokenAcceptOffer",
            Self::NfTokenCancelOffer => "NFTokenCancelOffer",
            Self::AmmCreate => "AMMCreate",
            Self::AmmDeposit => "AMMDeposit",
            Self::AmmWithdraw => "AMMWithdraw",
            Self::Clawback => "Clawback",
        }
    }

    /// Parse a wire `TransactionType` name.
    pub fn from_wire_name(name: &str) -> Option<Self> {
        ALL_TX_TYPES.iter().copied().find(|t| t.wire_name() == name)
    }
}

impl std::fmt::Display for TxType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.wire_name())
    }
}

/// All modeled transaction types, for table iteration and tests.
pub static ALL_TX_TYPES: [TxType; 28] = [
    TxType::Payment,
    TxType::AccountSet,
    TxType::AccountDelete,
    TxType::SetRegularKey,
    TxType::TrustSet,
    TxType::OfferCreate,
    TxType::OfferCancel,
    TxType::EscrowCreate,
    TxType::EscrowFinish,
    TxType::EscrowCancel,
    TxType::CheckCreate,
    TxType::CheckCash,
    TxType::CheckCancel,
    TxType::DepositPreauth,
    TxType::TicketCreate,
    TxType::SignerListSet,
    TxType::PaymentChannelCreate,
    TxType::PaymentChannelFund,
    TxType::PaymentChannelClaim,
    TxType::NfTokenMint,
    TxType::NfTokenBurn,
    TxType::NfTokenCreateOffer,
    TxType::NfTokenAcceptOffer,
    TxType::NfTokenCancelOffer,
    TxType::AmmCreate,
    TxType::AmmDeposit,
    TxType::AmmWithdraw,
    TxType::Clawback,
];

// ─── Universal Sub-Objects ──────────────────────────────────────────────────

/// An arbitrary memo attached to a transaction. All parts are hex strings
/// on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct Memo {
    #[serde(rename = "MemoData", default)]
    pub memo_data: Option<String>,
    #[serde(rename = "MemoType", default)]
    pub memo_type: Option<String>,
    #[serde(rename = "MemoFormat", default)]
    pub memo_format: Option<String>,
}

/// One multi-signature over the transaction. Signature material is opaque to
/// this model; the signing collaborator produces and checks it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SignerEntry {
    #[serde(rename = "Account")]
    pub account: String,
    #[serde(rename = "TxnSignature")]
    pub txn_signature: String,
    #[serde(rename = "SigningPubKey")]
    pub signing_pub_key: String,
}

// ─── The Aggregate ──────────────────────────────────────────────────────────

/// A finalized, validated transaction.
///
/// Holds the universal fields, the type-specific payload, the flag set (an
/// absent flag set is distinct from an explicit zero), and the bag of wire
/// fields the typed schema does not recognize.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub(crate) account: AccountAddress,
    pub(crate) fee: XrpAmount,
    pub(crate) sequence: u32,
    pub(crate) flags: Option<FlagSet>,
    pub(crate) last_ledger_sequence: Option<u32>,
    pub(crate) account_txn_id: Option<String>,
    pub(crate) source_tag: Option<u32>,
    pub(crate) signing_pub_key: Option<String>,
    pub(crate) txn_signature: Option<String>,
    pub(crate) memos: Vec<Memo>,
    pub(crate) signers: Vec<SignerEntry>,
    pub(crate) payload: TxPayload,
    pub(crate) unknown_fields: UnknownFieldBag,
}

impl Transaction {
    pub fn tx_type(&self) -> TxType {
        self.payload.tx_type()
    }

    pub fn account(&self) -> &AccountAddress {
        &self.account
    }

    pub fn fee(&self) -> XrpAmount {
        self.fee
    }

    pub fn sequence(&self) -> u32 {
        self.sequence
    }

    /// The flag set, if one is carried. `None` means the wire payload omits
    /// the `Flags` field entirely.
    pub fn flags(&self) -> Option<&FlagSet> {
        self.flags.as_ref()
    }

    pub fn last_ledger_sequence(&self) -> Option<u32> {
        self.last_ledger_sequence
    }

    pub fn account_txn_id(&self) -> Option<&str> {
        self.account_txn_id.as_deref()
    }

    pub fn source_tag(&self) -> Option<u32> {
        self.source_tag
    }

    pub fn signing_pub_key(&self) -> Option<&str> {
        self.signing_pub_key.as_deref()
    }

    pub fn txn_signature(&self) -> Option<&str> {
        self.txn_signature.as_deref()
    }

    pub fn memos(&self) -> &[Memo] {
        &self.memos
    }

    pub fn signers(&self) -> &[SignerEntry] {
        &self.signers
    }

    pub fn payload(&self) -> &TxPayload {
        &self.payload
    }

    pub fn unknown_fields(&self) -> &UnknownFieldBag {
        &self.unknown_fields
    }
}
