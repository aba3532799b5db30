//! Conversion between [`Transaction`] and the JSON wire format.
//!
//! Decoding binds recognized field names to typed fields, routes everything
//! else into the unknown-field bag, and validates invariants before the
//! entity is handed out. Encoding supplies name→value pairs; the canonical
//! ordering of fields inside the signed blob is the encoding engine's
//! concern, not this model's.

use crate::entity::{Memo, SignerEntry, Transaction, TxType};
use crate::flags::FlagSet;
use crate::invariants::{self, InvariantViolation};
use crate::payload::{self, TxPayload};
use crate::unknown::{FieldBagError, UnknownFieldBag};
use serde_json::{Map, Value};
use thiserror::Error;
use xrpl_types::{
    AccountAddress, AddressError, AmountError, AssetId, CurrencyAmount, CurrencyError,
    IssuedAmount, XrpAmount,
};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WireError {
    #[error("transaction payload is not a JSON object")]
    NotAnObject,

    #[error("missing required field {field:?}")]
    MissingField { field: &'static str },

    #[error("field {field:?}: expected {expected}")]
    Deserialization {
        field: &'static str,
        expected: &'static str,
    },

    #[error("unrecognized TransactionType {0:?}")]
    UnknownTxType(String),

    #[error("field {field:?}: {source}")]
    Amount {
        field: &'static str,
        source: AmountError,
    },

    #[error("field {field:?}: {source}")]
    Address {
        field: &'static str,
        source: AddressError,
    },

    #[error("field {field:?}: {source}")]
    Asset {
        field: &'static str,
        source: CurrencyError,
    },

    #[error(transparent)]
    Bag(#[from] FieldBagError),

    #[error(transparent)]
    Invariant(#[from] InvariantViolation),
}

// ─── Recognized Field Tables ────────────────────────────────────────────────

/// Fields common to every transaction type.
static COMMON_FIELDS: [&str; 12] = [
    "TransactionType",
    "Account",
    "Fee",
    "Sequence",
    "Flags",
    "LastLedgerSequence",
    "AccountTxnID",
    "SourceTag",
    "SigningPubKey",
    "TxnSignature",
    "Memos",
    "Signers",
];

fn type_fields(tx_type: TxType) -> &'static [&'static str] {
    match tx_type {
        TxType::Payment => &[
            "Amount",
            "Destination",
            "DestinationTag",
            "InvoiceID",
            "SendMax",
            "DeliverMin",
            "Paths",
        ],
        TxType::AccountSet => &[
            "SetFlag",
            "ClearFlag",
            "Domain",
            "EmailHash",
            "MessageKey",
            "TransferRate",
            "TickSize",
        ],
        TxType::AccountDelete => &["Destination", "DestinationTag"],
        TxType::SetRegularKey => &["RegularKey"],
        TxType::TrustSet => &["LimitAmount", "QualityIn", "QualityOut"],
        TxType::OfferCreate => &["TakerGets", "TakerPays", "Expiration", "OfferSequence"],
        TxType::OfferCancel => &["OfferSequence"],
        TxType::EscrowCreate => &[
            "Amount",
            "Destination",
            "DestinationTag",
            "CancelAfter",
            "FinishAfter",
            "Condition",
        ],
        TxType::EscrowFinish => &["Owner", "OfferSequence", "Condition", "Fulfillment"],
        TxType::EscrowCancel => &["Owner", "OfferSequence"],
        TxType::CheckCreate => &[
            "Destination",
            "SendMax",
            "DestinationTag",
            "Expiration",
            "InvoiceID",
        ],
        TxType::CheckCash => &["CheckID", "Amount", "DeliverMin"],
        TxType::CheckCancel => &["CheckID"],
        TxType::DepositPreauth => &["Authorize", "Unauthorize"],
        TxType::TicketCreate => &["TicketCount"],
        TxType::SignerListSet => &["SignerQuorum", "SignerEntries"],
        TxType::PaymentChannelCreate => &[
            "Amount",
            "Destination",
            "SettleDelay",
            "PublicKey",
            "CancelAfter",
            "DestinationTag",
        ],
        TxType::PaymentChannelFund => &["Channel", "Amount", "Expiration"],
        TxType::PaymentChannelClaim => &["Channel", "Balance", "Amount", "Signature", "PublicKey"],
        TxType::NfTokenMint => &["NFTokenTaxon", "Issuer", "TransferFee", "URI"],
        TxType::NfTokenBurn => &["NFTokenID", "Owner"],
        TxType::NfTokenCreateOffer => &[
            "NFTokenID",
            "Amount",
            "Owner",
            "Destination",
            "Expiration",
        ],
        TxType::NfTokenAcceptOffer => &[
            "NFTokenSellOffer",
            "NFTokenBuyOffer",
            "NFTokenBrokerFee",
        ],
        TxType::NfTokenCancelOffer => &["NFTokenOffers"],
        TxType::AmmCreate => &["Amount", "Amount2", "TradingFee"],
        TxType::AmmDeposit => &["Asset", "Asset2", "Amount", "Amount2", "LPTokenOut", "EPrice"],
        TxType::AmmWithdraw => &["Asset", "Asset2", "Amount", "Amount2", "LPTokenIn", "EPrice"],
        TxType::Clawback => &["Amount"],
    }
}

/// Every field name the typed schema recognizes for `tx_type`.
pub fn recognized_fields(tx_type: TxType) -> Vec<&'static str> {
    COMMON_FIELDS
        .iter()
        .chain(type_fields(tx_type))
        .copied()
        .collect()
}

// ─── Field Readers ──────────────────────────────────────────────────────────

fn req<'a>(obj: &'a Map<String, Value>, field: &'static str) -> Result<&'a Value, WireError> {
    obj.get(field).ok_or(WireError::MissingField { field })
}

fn req_str<'a>(obj: &'a Map<String, Value>, field: &'static str) -> Result<&'a str, WireError> {
    req(obj, field)?.as_str().ok_or(WireError::Deserialization {
        field,
        expected: "a string",
    })
}

fn opt_str<'a>(
    obj: &'a Map<String, Value>,
    field: &'static str,
) -> Result<Option<&'a str>, WireError> {
    match obj.get(field) {
        None => Ok(None),
        Some(v) => v.as_str().map(Some).ok_or(WireError::Deserialization {
            field,
            expected: "a string",
        }),
    }
}

fn opt_string(obj: &Map<String, Value>, field: &'static str) -> Result<Option<String>, WireError> {
    Ok(opt_str(obj, field)?.map(str::to_string))
}

fn read_u32(v: &Value, field: &'static str) -> Result<u32, WireError> {
    v.as_u64()
        .and_then(|n| u32::try_from(n).ok())
        .ok_or(WireError::Deserialization {
            field,
            expected: "an unsigned 32-bit integer",
        })
}

fn req_u32(obj: &Map<String, Value>, field: &'static str) -> Result<u32, WireError> {
    read_u32(req(obj, field)?, field)
}

fn opt_u32(obj: &Map<String, Value>, field: &'static str) -> Result<Option<u32>, WireError> {
    obj.get(field).map(|v| read_u32(v, field)).transpose()
}

fn opt_u16(obj: &Map<String, Value>, field: &'static str) -> Result<Option<u16>, WireError> {
    match opt_u32(obj, field)? {
        None => Ok(None),
        Some(n) => u16::try_from(n).map(Some).map_err(|_| WireError::Deserialization {
            field,
            expected: "an unsigned 16-bit integer",
        }),
    }
}

fn req_u16(obj: &Map<String, Value>, field: &'static str) -> Result<u16, WireError> {
    opt_u16(obj, field)?.ok_or(WireError::MissingField { field })
}

fn opt_u8(obj: &Map<String, Value>, field: &'static str) -> Result<Option<u8>, WireError> {
    match opt_u32(obj, field)? {
        None => Ok(None),
        Some(n) => u8::try_from(n).map(Some).map_err(|_| WireError::Deserialization {
            field,
            expected: "an unsigned 8-bit integer",
        }),
    }
}

fn req_address(obj: &Map<String, Value>, field: &'static str) -> Result<AccountAddress, WireError> {
    AccountAddress::new(req_str(obj, field)?)
        .map_err(|source| WireError::Address { field, source })
}

fn opt_address(
    obj: &Map<String, Value>,
    field: &'static str,
) -> Result<Option<AccountAddress>, WireError> {
    match opt_str(obj, field)? {
        None => Ok(None),
        Some(s) => AccountAddress::new(s)
            .map(Some)
            .map_err(|source| WireError::Address { field, source }),
    }
}

fn req_amount(obj: &Map<String, Value>, field: &'static str) -> Result<CurrencyAmount, WireError> {
    CurrencyAmount::from_json(req(obj, field)?)
        .map_err(|source| WireError::Amount { field, source })
}

fn opt_amount(
    obj: &Map<String, Value>,
    field: &'static str,
) -> Result<Option<CurrencyAmount>, WireError> {
    obj.get(field)
        .map(|v| CurrencyAmount::from_json(v).map_err(|source| WireError::Amount { field, source }))
        .transpose()
}

fn req_xrp(obj: &Map<String, Value>, field: &'static str) -> Result<XrpAmount, WireError> {
    XrpAmount::from_wire(req_str(obj, field)?)
        .map_err(|source| WireError::Amount { field, source })
}

fn opt_xrp(obj: &Map<String, Value>, field: &'static str) -> Result<Option<XrpAmount>, WireError> {
    match opt_str(obj, field)? {
        None => Ok(None),
        Some(s) => XrpAmount::from_wire(s)
            .map(Some)
            .map_err(|source| WireError::Amount { field, source }),
    }
}

fn req_issued(obj: &Map<String, Value>, field: &'static str) -> Result<IssuedAmount, WireError> {
    let amount = req_amount(obj, field)?;
    amount
        .map(|_| None, |issued| Some(issued.clone()))
        .ok_or(WireError::Deserialization {
            field,
            expected: "an issued-currency amount object",
        })
}

fn opt_issued(
    obj: &Map<String, Value>,
    field: &'static str,
) -> Result<Option<IssuedAmount>, WireError> {
    match opt_amount(obj, field)? {
        None => Ok(None),
        Some(amount) => amount
            .map(|_| None, |issued| Some(issued.clone()))
            .map(Some)
            .ok_or(WireError::Deserialization {
                field,
                expected: "an issued-currency amount object",
            }),
    }
}

fn req_asset(obj: &Map<String, Value>, field: &'static str) -> Result<AssetId, WireError> {
    AssetId::from_json(req(obj, field)?).map_err(|source| WireError::Asset { field, source })
}

// ─── Payload Decoding ───────────────────────────────────────────────────────

fn decode_payload(tx_type: TxType, obj: &Map<String, Value>) -> Result<TxPayload, WireError> {
    let payload = match tx_type {
        TxType::Payment => TxPayload::Payment(payload::Payment {
            amount: req_amount(obj, "Amount")?,
            destination: req_address(obj, "Destination")?,
            destination_tag: opt_u32(obj, "DestinationTag")?,
            invoice_id: opt_string(obj, "InvoiceID")?,
            send_max: opt_amount(obj, "SendMax")?,
            deliver_min: opt_amount(obj, "DeliverMin")?,
            paths: obj.get("Paths").cloned(),
        }),
        TxType::AccountSet => TxPayload::AccountSet(payload::AccountSet {
            set_flag: opt_u32(obj, "SetFlag")?,
            clear_flag: opt_u32(obj, "ClearFlag")?,
            domain: opt_string(obj, "Domain")?,
            email_hash: opt_string(obj, "EmailHash")?,
            message_key: opt_string(obj, "MessageKey")?,
            transfer_rate: opt_u32(obj, "TransferRate")?,
            tick_size: opt_u8(obj, "TickSize")?,
        }),
        TxType::AccountDelete => TxPayload::AccountDelete(payload::AccountDelete {
            destination: req_address(obj, "Destination")?,
            destination_tag: opt_u32(obj, "DestinationTag")?,
        }),
        TxType::SetRegularKey => TxPayload::SetRegularKey(payload::SetRegularKey {
            regular_key: opt_address(obj, "RegularKey")?,
        }),
        TxType::TrustSet => TxPayload::TrustSet(payload::TrustSet {
            limit_amount: req_issued(obj, "LimitAmount")?,
            quality_in: opt_u32(obj, "QualityIn")?,
            quality_out: opt_u32(obj, "QualityOut")?,
        }),
        TxType::OfferCreate => TxPayload::OfferCreate(payload::OfferCreate {
            taker_gets: req_amount(obj, "TakerGets")?,
            taker_pays: req_amount(obj, "TakerPays")?,
            expiration: opt_u32(obj, "Expiration")?,
            offer_sequence: opt_u32(obj, "OfferSequence")?,
        }),
        TxType::OfferCancel => TxPayload::OfferCancel(payload::OfferCancel {
            offer_sequence: req_u32(obj, "OfferSequence")?,
        }),
        TxType::EscrowCreate => TxPayload::EscrowCreate(payload::EscrowCreate {
            amount: req_xrp(obj, "Amount")?,
            destination: req_address(obj, "Destination")?,
            destination_tag: opt_u32(obj, "DestinationTag")?,
            cancel_after: opt_u32(obj, "CancelAfter")?,
            finish_after: opt_u32(obj, "FinishAfter")?,
            condition: opt_string(obj, "Condition")?,
        }),
        TxType::EscrowFinish => TxPayload::EscrowFinish(payload::EscrowFinish {
            owner: req_address(obj, "Owner")?,
            offer_sequence: req_u32(obj, "OfferSequence")?,
            condition: opt_string(obj, "Condition")?,
            fulfillment: opt_string(obj, "Fulfillment")?,
        }),
        TxType::EscrowCancel => TxPayload::EscrowCancel(payload::EscrowCancel {
            owner: req_address(obj, "Owner")?,
            offer_sequence: req_u32(obj, "OfferSequence")?,
        }),
        TxType::CheckCreate => TxPayload::CheckCreate(payload::CheckCreate {
            destination: req_address(obj, "Destination")?,
            send_max: req_amount(obj, "SendMax")?,
            destination_tag: opt_u32(obj, "DestinationTag")?,
            expiration: opt_u32(obj, "Expiration")?,
            invoice_id: opt_string(obj, "InvoiceID")?,
        }),
        TxType::CheckCash => TxPayload::CheckCash(payload::CheckCash {
            check_id: req_str(obj, "CheckID")?.to_string(),
            amount: opt_amount(obj, "Amount")?,
            deliver_min: opt_amount(obj, "DeliverMin")?,
        }),
        TxType::CheckCancel => TxPayload::CheckCancel(payload::CheckCancel {
            check_id: req_str(obj, "CheckID")?.to_string(),
        }),
        TxType::DepositPreauth => TxPayload::DepositPreauth(payload::DepositPreauth {
            authorize: opt_address(obj, "Authorize")?,
            unauthorize: opt_address(obj, "Unauthorize")?,
        }),
        TxType::TicketCreate => TxPayload::TicketCreate(payload::TicketCreate {
            ticket_count: req_u32(obj, "TicketCount")?,
        }),
        TxType::SignerListSet => TxPayload::SignerListSet(payload::SignerListSet {
            signer_quorum: req_u32(obj, "SignerQuorum")?,
            signer_entries: decode_wrapped_list(obj, "SignerEntries", "SignerEntry")?,
        }),
        TxType::PaymentChannelCreate => {
            TxPayload::PaymentChannelCreate(payload::PaymentChannelCreate {
                amount: req_xrp(obj, "Amount")?,
                destination: req_address(obj, "Destination")?,
                settle_delay: req_u32(obj, "SettleDelay")?,
                public_key: req_str(obj, "PublicKey")?.to_string(),
                cancel_after: opt_u32(obj, "CancelAfter")?,
                destination_tag: opt_u32(obj, "DestinationTag")?,
            })
        }
        TxType::PaymentChannelFund => TxPayload::PaymentChannelFund(payload::PaymentChannelFund {
            channel: req_str(obj, "Channel")?.to_string(),
            amount: req_xrp(obj, "Amount")?,
            expiration: opt_u32(obj, "Expiration")?,
        }),
        TxType::PaymentChannelClaim => {
            TxPayload::PaymentChannelClaim(payload::PaymentChannelClaim {
                channel: req_str(obj, "Channel")?.to_string(),
                balance: opt_xrp(obj, "Balance")?,
                amount: opt_xrp(obj, "Amount")?,
                signature: opt_string(obj, "Signature")?,
                public_key: opt_string(obj, "PublicKey")?,
            })
        }
        TxType::NfTokenMint => TxPayload::NfTokenMint(payload::NfTokenMint {
            nftoken_taxon: req_u32(obj, "NFTokenTaxon")?,
            issuer: opt_address(obj, "Issuer")?,
            transfer_fee: opt_u16(obj, "TransferFee")?,
            uri: opt_string(obj, "URI")?,
        }),
        TxType::NfTokenBurn => TxPayload::NfTokenBurn(payload::NfTokenBurn {
            nftoken_id: req_str(obj, "NFTokenID")?.to_string(),
            owner: opt_address(obj, "Owner")?,
        }),
        TxType::NfTokenCreateOffer => {
            TxPayload::NfTokenCreateOffer(payload::NfTokenCreateOffer {
                nftoken_id: req_str(obj, "NFTokenID")?.to_string(),
                amount: req_amount(obj, "Amount")?,
                owner: opt_address(obj, "Owner")?,
                destination: opt_address(obj, "Destination")?,
                expiration: opt_u32(obj, "Expiration")?,
            })
        }
        TxType::NfTokenAcceptOffer => {
            TxPayload::NfTokenAcceptOffer(payload::NfTokenAcceptOffer {
                nftoken_sell_offer: opt_string(obj, "NFTokenSellOffer")?,
                nftoken_buy_offer: opt_string(obj, "NFTokenBuyOffer")?,
                nftoken_broker_fee: opt_amount(obj, "NFTokenBrokerFee")?,
            })
        }
        TxType::NfTokenCancelOffer => {
            let offers = req(obj, "NFTokenOffers")?
                .as_array()
                .ok_or(WireError::Deserialization {
                    field: "NFTokenOffers",
                    expected: "an array of offer identifiers",
                })?
                .iter()
                .map(|v| {
                    v.as_str()
                        .map(str::to_string)
                        .ok_or(WireError::Deserialization {
                            field: "NFTokenOffers",
                            expected: "an array of offer identifiers",
                        })
                })
                .collect::<Result<Vec<_>, _>>()?;
            TxPayload::NfTokenCancelOffer(payload::NfTokenCancelOffer {
                nftoken_offers: offers,
            })
        }
        TxType::AmmCreate => TxPayload::AmmCreate(payload::AmmCreate {
            amount: req_amount(obj, "Amount")?,
            amount2: req_amount(obj, "Amount2")?,
            trading_fee: req_u16(obj, "TradingFee")?,
        }),
        TxType::AmmDeposit => TxPayload::AmmDeposit(payload::AmmDeposit {
            asset: req_asset(obj, "Asset")?,
            asset2: req_asset(obj, "Asset2")?,
            amount: opt_amount(obj, "Amount")?,
            amount2: opt_amount(obj, "Amount2")?,
            lp_token_out: opt_issued(obj, "LPTokenOut")?,
            e_price: opt_amount(obj, "EPrice")?,
        }),
        TxType::AmmWithdraw => TxPayload::AmmWithdraw(payload::AmmWithdraw {
            asset: req_asset(obj, "Asset")?,
            asset2: req_asset(obj, "Asset2")?,
            amount: opt_amount(obj, "Amount")?,
            amount2: opt_amount(obj, "Amount2")?,
            lp_token_in: opt_issued(obj, "LPTokenIn")?,
            e_price: opt_amount(obj, "EPrice")?,
        }),
        TxType::Clawback => TxPayload::Clawback(payload::Clawback {
            amount: req_issued(obj, "Amount")?,
        }),
    };
    Ok(payload)
}

/// Decode one of the wire's wrapped arrays (`Memos`, `Signers`,
/// `SignerEntries`): each element is an object holding the entry under a
/// single wrapper key.
fn decode_wrapped_list<T: serde::de::DeserializeOwned>(
    obj: &Map<String, Value>,
    field: &'static str,
    wrapper: &'static str,
) -> Result<Vec<T>, WireError> {
    let Some(v) = obj.get(field) else {
        return Ok(Vec::new());
    };
    let items = v.as_array().ok_or(WireError::Deserialization {
        field,
        expected: "an array of wrapped entries",
    })?;
    items
        .iter()
        .map(|item| {
            item.get(wrapper)
                .and_then(|inner| serde_json::from_value(inner.clone()).ok())
                .ok_or(WireError::Deserialization {
                    field,
                    expected: "an array of wrapped entries",
                })
        })
        .collect()
}

// ─── Payload Encoding ───────────────────────────────────────────────────────

fn put(obj: &mut Map<String, Value>, field: &str, value: Value) {
    obj.insert(field.to_string(), value);
}

fn put_str(obj: &mut Map<String, Value>, field: &str, value: &str) {
    put(obj, field, Value::String(value.to_string()));
}

fn put_opt_str(obj: &mut Map<String, Value>, field: &str, value: &Option<String>) {
    if let Some(s) = value {
        put_str(obj, field, s);
    }
}

fn put_opt_u32(obj: &mut Map<String, Value>, field: &str, value: Option<u32>) {
    if let Some(n) = value {
        put(obj, field, Value::from(n));
    }
}

fn put_opt_amount(obj: &mut Map<String, Value>, field: &str, value: &Option<CurrencyAmount>) {
    if let Some(a) = value {
        put(obj, field, a.to_json());
    }
}

fn put_xrp(obj: &mut Map<String, Value>, field: &str, value: XrpAmount) {
    put(obj, field, Value::String(value.drops().to_string()));
}

fn put_opt_xrp(obj: &mut Map<String, Value>, field: &str, value: Option<XrpAmount>) {
    if let Some(x) = value {
        put_xrp(obj, field, x);
    }
}

fn put_opt_address(obj: &mut Map<String, Value>, field: &str, value: &Option<AccountAddress>) {
    if let Some(a) = value {
        put_str(obj, field, a.as_str());
    }
}

fn encode_payload(p: &TxPayload, obj: &mut Map<String, Value>) {
    match p {
        TxPayload::Payment(p) => {
            put(obj, "Amount", p.amount.to_json());
            put_str(obj, "Destination", p.destination.as_str());
            put_opt_u32(obj, "DestinationTag", p.destination_tag);
            put_opt_str(obj, "InvoiceID", &p.invoice_id);
            put_opt_amount(obj, "SendMax", &p.send_max);
            put_opt_amount(obj, "DeliverMin", &p.deliver_min);
            if let Some(paths) = &p.paths {
                put(obj, "Paths", paths.clone());
            }
        }
        TxPayload::AccountSet(p) => {
            put_opt_u32(obj, "SetFlag", p.set_flag);
            put_opt_u32(obj, "ClearFlag", p.clear_flag);
            put_opt_str(obj, "Domain", &p.domain);
            put_opt_str(obj, "EmailHash", &p.email_hash);
            put_opt_str(obj, "MessageKey", &p.message_key);
            put_opt_u32(obj, "TransferRate", p.transfer_rate);
            put_opt_u32(obj, "TickSize", p.tick_size.map(u32::from));
        }
        TxPayload::AccountDelete(p) => {
            put_str(obj, "Destination", p.destination.as_str());
            put_opt_u32(obj, "DestinationTag", p.destination_tag);
        }
        TxPayload::SetRegularKey(p) => {
            put_opt_address(obj, "RegularKey", &p.regular_key);
        }
        TxPayload::TrustSet(p) => {
            put(obj, "LimitAmount", p.limit_amount.to_json());
            put_opt_u32(obj, "QualityIn", p.quality_in);
            put_opt_u32(obj, "QualityOut", p.quality_out);
        }
        TxPayload::OfferCreate(p) => {
            put(obj, "TakerGets", p.taker_gets.to_json());
            put(obj, "TakerPays", p.taker_pays.to_json());
            put_opt_u32(obj, "Expiration", p.expiration);
            put_opt_u32(obj, "OfferSequence", p.offer_sequence);
        }
        TxPayload::OfferCancel(p) => {
            put(obj, "OfferSequence", Value::from(p.offer_sequence));
        }
        TxPayload::EscrowCreate(p) => {
            put_xrp(obj, "Amount", p.amount);
            put_str(obj, "Destination", p.destination.as_str());
            put_opt_u32(obj, "DestinationTag", p.destination_tag);
            put_opt_u32(obj, "CancelAfter", p.cancel_after);
            put_opt_u32(obj, "FinishAfter", p.finish_after);
            put_opt_str(obj, "Condition", &p.condition);
        }
        TxPayload::EscrowFinish(p) => {
            put_str(obj, "Owner", p.owner.as_str());
            put(obj, "OfferSequence", Value::from(p.offer_sequence));
            put_opt_str(obj, "Condition", &p.condition);
            put_opt_str(obj, "Fulfillment", &p.fulfillment);
        }
        TxPayload::EscrowCancel(p) => {
            put_str(obj, "Owner", p.owner.as_str());
            put(obj, "OfferSequence", Value::from(p.offer_sequence));
        }
        TxPayload::CheckCreate(p) => {
            put_str(obj, "Destination", p.destination.as_str());
            put(obj, "SendMax", p.send_max.to_json());
            put_opt_u32(obj, "DestinationTag", p.destination_tag);
            put_opt_u32(obj, "Expiration", p.expiration);
            put_opt_str(obj, "InvoiceID", &p.invoice_id);
        }
        TxPayload::CheckCash(p) => {
            put_str(obj, "CheckID", &p.check_id);
            put_opt_amount(obj, "Amount", &p.amount);
            put_opt_amount(obj, "DeliverMin", &p.deliver_min);
        }
        TxPayload::CheckCancel(p) => {
            put_str(obj, "CheckID", &p.check_id);
        }
        TxPayload::DepositPreauth(p) => {
            put_opt_address(obj, "Authorize", &p.authorize);
            put_opt_address(obj, "Unauthorize", &p.unauthorize);
        }
        TxPayload::TicketCreate(p) => {
            put(obj, "TicketCount", Value::from(p.ticket_count));
        }
        TxPayload::SignerListSet(p) => {
            put(obj, "SignerQuorum", Value::from(p.signer_quorum));
            if !p.signer_entries.is_empty() {
                let entries: Vec<Value> = p
                    .signer_entries
                    .iter()
                    .map(|e| {
                        serde_json::json!({
                            "SignerEntry": {
                                "Account": e.account,
                                "SignerWeight": e.signer_weight,
                            }
                        })
                    })
                    .collect();
                put(obj, "SignerEntries", Value::Array(entries));
            }
        }
        TxPayload::PaymentChannelCreate(p) => {
            put_xrp(obj, "Amount", p.amount);
            put_str(obj, "Destination", p.destination.as_str());
            put(obj, "SettleDelay", Value::from(p.settle_delay));
            put_str(obj, "PublicKey", &p.public_key);
            put_opt_u32(obj, "CancelAfter", p.cancel_after);
            put_opt_u32(obj, "DestinationTag", p.destination_tag);
        }
        TxPayload::PaymentChannelFund(p) => {
            put_str(obj, "Channel", &p.channel);
            put_xrp(obj, "Amount", p.amount);
            put_opt_u32(obj, "Expiration", p.expiration);
        }
        TxPayload::PaymentChannelClaim(p) => {
            put_str(obj, "Channel", &p.channel);
            put_opt_xrp(obj, "Balance", p.balance);
            put_opt_xrp(obj, "Amount", p.amount);
            put_opt_str(obj, "Signature", &p.signature);
            put_opt_str(obj, "PublicKey", &p.public_key);
        }
        TxPayload::NfTokenMint(p) => {
            put(obj, "NFTokenTaxon", Value::from(p.nftoken_taxon));
            put_opt_address(obj, "Issuer", &p.issuer);
            put_opt_u32(obj, "TransferFee", p.transfer_fee.map(u32::from));
            put_opt_str(obj, "URI", &p.uri);
        }
        TxPayload::NfTokenBurn(p) => {
            put_str(obj, "NFTokenID", &p.nftoken_id);
            put_opt_address(obj, "Owner", &p.owner);
        }
        TxPayload::NfTokenCreateOffer(p) => {
            put_str(obj, "NFTokenID", &p.nftoken_id);
            put(obj, "Amount", p.amount.to_json());
            put_opt_address(obj, "Owner", &p.owner);
            put_opt_address(obj, "Destination", &p.destination);
            put_opt_u32(obj, "Expiration", p.expiration);
        }
        TxPayload::NfTokenAcceptOffer(p) => {
            put_opt_str(obj, "NFTokenSellOffer", &p.nftoken_sell_offer);
            put_opt_str(obj, "NFTokenBuyOffer", &p.nftoken_buy_offer);
            put_opt_amount(obj, "NFTokenBrokerFee", &p.nftoken_broker_fee);
        }
        TxPayload::NfTokenCancelOffer(p) => {
            let offers: Vec<Value> = p
                .nftoken_offers
                .iter()
                .map(|o| Value::String(o.clone()))
                .collect();
            put(obj, "NFTokenOffers", Value::Array(offers));
        }
        TxPayload::AmmCreate(p) => {
            put(obj, "Amount", p.amount.to_json());
            put(obj, "Amount2", p.amount2.to_json());
            put(obj, "TradingFee", Value::from(p.trading_fee));
        }
        TxPayload::AmmDeposit(p) => {
            put(obj, "Asset", p.asset.to_json());
            put(obj, "Asset2", p.asset2.to_json());
            put_opt_amount(obj, "Amount", &p.amount);
            put_opt_amount(obj, "Amount2", &p.amount2);
            if let Some(lp) = &p.lp_token_out {
                put(obj, "LPTokenOut", lp.to_json());
            }
            put_opt_amount(obj, "EPrice", &p.e_price);
        }
        TxPayload::AmmWithdraw(p) => {
            put(obj, "Asset", p.asset.to_json());
            put(obj, "Asset2", p.asset2.to_json());
            put_opt_amount(obj, "Amount", &p.amount);
            put_opt_amount(obj, "Amount2", &p.amount2);
            if let Some(lp) = &p.lp_token_in {
                put(obj, "LPTokenIn", lp.to_json());
            }
            put_opt_amount(obj, "EPrice", &p.e_price);
        }
        TxPayload::Clawback(p) => {
            put(obj, "Amount", p.amount.to_json());
        }
    }
}

// ─── Universal Sub-Object Encoding/Decoding ─────────────────────────────────

fn memo_to_json(m: &Memo) -> Value {
    let mut inner = Map::new();
    if let Some(d) = &m.memo_data {
        inner.insert("MemoData".to_string(), Value::String(d.clone()));
    }
    if let Some(t) = &m.memo_type {
        inner.insert("MemoType".to_string(), Value::String(t.clone()));
    }
    if let Some(f) = &m.memo_format {
        inner.insert("MemoFormat".to_string(), Value::String(f.clone()));
    }
    serde_json::json!({ "Memo": Value::Object(inner) })
}

fn signer_to_json(s: &SignerEntry) -> Value {
    serde_json::json!({
        "Signer": {
            "Account": s.account,
            "TxnSignature": s.txn_signature,
            "SigningPubKey": s.signing_pub_key,
        }
    })
}

// ─── Transaction Conversion ─────────────────────────────────────────────────

impl Transaction {
    /// Emit the wire JSON object: universal fields, the payload's fields,
    /// and the unknown-field bag entries (insertion order).
    pub fn to_json(&self) -> Value {
        let mut obj = Map::new();
        put_str(&mut obj, "TransactionType", self.tx_type().wire_name());
        put_str(&mut obj, "Account", self.account.as_str());
        put_xrp(&mut obj, "Fee", self.fee);
        put(&mut obj, "Sequence", Value::from(self.sequence));
        if let Some(flags) = &self.flags {
            put(&mut obj, "Flags", Value::from(flags.encode()));
        }
        put_opt_u32(&mut obj, "LastLedgerSequence", self.last_ledger_sequence);
        put_opt_str(&mut obj, "AccountTxnID", &self.account_txn_id);
        put_opt_u32(&mut obj, "SourceTag", self.source_tag);
        put_opt_str(&mut obj, "SigningPubKey", &self.signing_pub_key);
        put_opt_str(&mut obj, "TxnSignature", &self.txn_signature);
        if !self.memos.is_empty() {
            let memos: Vec<Value> = self.memos.iter().map(memo_to_json).collect();
            put(&mut obj, "Memos", Value::Array(memos));
        }
        if !self.signers.is_empty() {
            let signers: Vec<Value> = self.signers.iter().map(signer_to_json).collect();
            put(&mut obj, "Signers", Value::Array(signers));
        }
        encode_payload(&self.payload, &mut obj);
        for (key, value) in self.unknown_fields.iter() {
            put(&mut obj, key, value.clone());
        }
        Value::Object(obj)
    }

    /// Bind a raw wire object to a typed, validated transaction. Fields the
    /// schema does not recognize are preserved in the unknown-field bag.
    pub fn from_json(v: &Value) -> Result<Self, WireError> {
        let obj = v.as_object().ok_or(WireError::NotAnObject)?;

        let type_name = req_str(obj, "TransactionType")?;
        let tx_type = TxType::from_wire_name(type_name)
            .ok_or_else(|| WireError::UnknownTxType(type_name.to_string()))?;

        let payload = decode_payload(tx_type, obj)?;
        let flags = opt_u32(obj, "Flags")?.map(|raw| FlagSet::decode(raw, tx_type));

        let recognized = recognized_fields(tx_type);
        let mut unknown_fields = UnknownFieldBag::new();
        for (key, value) in obj {
            if !recognized.contains(&key.as_str()) {
                log::trace!("preserving unrecognized field {:?}", key);
                unknown_fields.insert(key, value.clone(), &recognized)?;
            }
        }

        let tx = Transaction {
            account: req_address(obj, "Account")?,
            fee: req_xrp(obj, "Fee")?,
            sequence: req_u32(obj, "Sequence")?,
            flags,
            last_ledger_sequence: opt_u32(obj, "LastLedgerSequence")?,
            account_txn_id: opt_string(obj, "AccountTxnID")?,
            source_tag: opt_u32(obj, "SourceTag")?,
            signing_pub_key: opt_string(obj, "SigningPubKey")?,
            txn_signature: opt_string(obj, "TxnSignature")?,
            memos: decode_wrapped_list(obj, "Memos", "Memo")?,
            signers: decode_wrapped_list(obj, "Signers", "Signer")?,
            payload,
            unknown_fields,
        };
        invariants::validate(&tx)?;
        Ok(tx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const ACCOUNT: &str = "rvYAfWj5gh67oV6fW32ZzP3Aw4Eubs59B";
    const DEST: &str = "rN7n7otQDd6FczFgLdSqtcsAUxDkw6fzRH";

    fn payment_json() -> Value {
        json!({
            "TransactionType": "Payment",
            "Account": ACCOUNT,
            "Destination": DEST,
            "Amount": "25000000",
            "Fee": "10",
            "Sequence": 2,
        })
    }

    #[test]
    fn test_payment_decode_binds_typed_fields() {
        let tx = Transaction::from_json(&payment_json()).unwrap();
        assert_eq!(tx.tx_type(), TxType::Payment);
        assert_eq!(tx.account().as_str(), ACCOUNT);
        assert_eq!(tx.fee().drops(), 10);
        assert_eq!(tx.sequence(), 2);
        assert!(tx.flags().is_none());
        match tx.payload() {
            TxPayload::Payment(p) => {
                assert!(p.amount.is_native());
                assert_eq!(p.destination.as_str(), DEST);
            }
            other => panic!("wrong payload: {:?}", other),
        }
    }

    #[test]
    fn test_encode_reproduces_original_object() {
        let original = payment_json();
        let tx = Transaction::from_json(&original).unwrap();
        assert_eq!(tx.to_json(), original);
    }

    #[test]
    fn test_flags_absent_is_distinct_from_zero() {
        let absent = Transaction::from_json(&payment_json()).unwrap();
        assert!(absent.flags().is_none());
        assert!(absent.to_json().get("Flags").is_none());

        let mut with_zero = payment_json();
        with_zero["Flags"] = json!(0);
        let zero = Transaction::from_json(&with_zero).unwrap();
        assert_eq!(zero.flags().map(|f| f.encode()), Some(0));
        assert_eq!(zero.to_json()["Flags"], json!(0));
        assert_ne!(absent, zero);
    }

    #[test]
    fn test_unknown_fields_routed_and_preserved() {
        let mut original = payment_json();
        original["FutureAmendmentField"] = json!({"nested": [1, 2, 3]});
        original["NetworkID"] = json!(1025);
        let tx = Transaction::from_json(&original).unwrap();
        assert_eq!(tx.unknown_fields().len(), 2);
        assert_eq!(
            tx.unknown_fields().get("NetworkID"),
            Some(&json!(1025))
        );
        assert_eq!(tx.to_json(), original);
    }

    #[test]
    fn test_missing_required_field() {
        let mut v = payment_json();
        v.as_object_mut().unwrap().remove("Amount");
        assert_eq!(
            Transaction::from_json(&v).unwrap_err(),
            WireError::MissingField { field: "Amount" }
        );
    }

    #[test]
    fn test_type_mismatch_names_the_field() {
        let mut v = payment_json();
        v["Sequence"] = json!("2");
        assert_eq!(
            Transaction::from_json(&v).unwrap_err(),
            WireError::Deserialization {
                field: "Sequence",
                expected: "an unsigned 32-bit integer",
            }
        );
    }

    #[test]
    fn test_unknown_transaction_type() {
        let mut v = payment_json();
        v["TransactionType"] = json!("XChainCommit");
        assert_eq!(
            Transaction::from_json(&v).unwrap_err(),
            WireError::UnknownTxType("XChainCommit".to_string())
        );
    }

    #[test]
    fn test_bad_address_names_the_field() {
        let mut v = payment_json();
        v["Destination"] = json!("not-an-address");
        assert!(matches!(
            Transaction::from_json(&v).unwrap_err(),
            WireError::Address {
                field: "Destination",
                ..
            }
        ));
    }

    #[test]
    fn test_decode_rejects_invalid_amount() {
        let mut v = payment_json();
        v["Amount"] = json!("-5");
        assert!(matches!(
            Transaction::from_json(&v).unwrap_err(),
            WireError::Amount { field: "Amount", .. }
        ));
    }

    #[test]
    fn test_issued_field_rejects_native_shape() {
        let v = json!({
            "TransactionType": "TrustSet",
            "Account": ACCOUNT,
            "Fee": "10",
            "Sequence": 3,
            "LimitAmount": "1000",
        });
        assert_eq!(
            Transaction::from_json(&v).unwrap_err(),
            WireError::Deserialization {
                field: "LimitAmount",
                expected: "an issued-currency amount object",
            }
        );
    }

    #[test]
    fn test_memos_and_signers_roundtrip() {
        let original = json!({
            "TransactionType": "Payment",
            "Account": ACCOUNT,
            "Destination": DEST,
            "Amount": "1000",
            "Fee": "10",
            "Sequence": 2,
            "Memos": [
                { "Memo": { "MemoData": "72656e74", "MemoType": "687474703a2f2f" } },
                { "Memo": { "MemoData": "cafe" } }
            ],
            "Signers": [
                { "Signer": {
                    "Account": DEST,
                    "TxnSignature": "3045022100",
                    "SigningPubKey": "ED5F5AC8B98974A3CA843326D9B88CEBD0560177B973EE0B149F782CFAA06DC66A"
                } }
            ],
        });
        let tx = Transaction::from_json(&original).unwrap();
        assert_eq!(tx.memos().len(), 2);
        assert_eq!(tx.memos()[0].memo_data.as_deref(), Some("72656e74"));
        assert_eq!(tx.signers().len(), 1);
        assert_eq!(tx.to_json(), original);
    }

    #[test]
    fn test_malformed_memo_wrapper() {
        let v = json!({
            "TransactionType": "Payment",
            "Account": ACCOUNT,
            "Destination": DEST,
            "Amount": "1000",
            "Fee": "10",
            "Sequence": 2,
            "Memos": [ { "NotAMemo": {} } ],
        });
        assert_eq!(
            Transaction::from_json(&v).unwrap_err(),
            WireError::Deserialization {
                field: "Memos",
                expected: "an array of wrapped entries",
            }
        );
    }

    #[test]
    fn test_nftoken_offers_must_be_strings() {
        let v = json!({
            "TransactionType": "NFTokenCancelOffer",
            "Account": ACCOUNT,
            "Fee": "10",
            "Sequence": 4,
            "NFTokenOffers": [17],
        });
        assert_eq!(
            Transaction::from_json(&v).unwrap_err(),
            WireError::Deserialization {
                field: "NFTokenOffers",
                expected: "an array of offer identifiers",
            }
        );
    }

    #[test]
    fn test_decode_runs_invariants() {
        let v = json!({
            "TransactionType": "CheckCash",
            "Account": ACCOUNT,
            "Fee": "10",
            "Sequence": 5,
            "CheckID": "C".repeat(64),
        });
        assert!(matches!(
            Transaction::from_json(&v).unwrap_err(),
            WireError::Invariant(InvariantViolation::ExactlyOneRequired { .. })
        ));
    }

    #[test]
    fn test_recognized_fields_cover_common_and_type() {
        let fields = recognized_fields(TxType::Payment);
        assert!(fields.contains(&"Fee"));
        assert!(fields.contains(&"SendMax"));
        assert!(!fields.contains(&"TakerGets"));
    }
}
