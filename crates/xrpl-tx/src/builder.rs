//! Transaction builder.
//!
//! The builder is the mutable staging phase: setters accumulate fields, and
//! [`TransactionBuilder::build`] finalizes in one step. Finalization derives
//! the flag value for the transaction types that compute it from field
//! presence, then runs the invariant checks, so no partially-valid
//! transaction is ever observable.

use crate::derived::{resolve_deposit_mode, resolve_withdraw_mode, DerivedMode, ResolveError};
use crate::entity::{Memo, SignerEntry, Transaction, TxType};
use crate::flags::{FlagError, FlagSet};
use crate::invariants::{self, InvariantViolation};
use crate::payload::TxPayload;
use crate::unknown::UnknownFieldBag;
use thiserror::Error;
use xrpl_types::{AccountAddress, XrpAmount};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BuildError {
    #[error("transaction requires an Account")]
    MissingAccount,

    #[error("transaction requires a Fee")]
    MissingFee,

    #[error("transaction requires a Sequence")]
    MissingSequence,

    #[error(transparent)]
    Flag(#[from] FlagError),

    #[error(transparent)]
    Invariant(#[from] InvariantViolation),
}

/// Staging struct for one transaction. Consumed by [`Self::build`].
pub struct TransactionBuilder {
    payload: TxPayload,
    account: Option<AccountAddress>,
    fee: Option<XrpAmount>,
    sequence: Option<u32>,
    flags: Option<FlagSet>,
    last_ledger_sequence: Option<u32>,
    account_txn_id: Option<String>,
    source_tag: Option<u32>,
    signing_pub_key: Option<String>,
    txn_signature: Option<String>,
    memos: Vec<Memo>,
    signers: Vec<SignerEntry>,
}

impl TransactionBuilder {
    /// Start building a transaction of the type implied by `payload`.
    pub fn new(payload: TxPayload) -> Self {
        Self {
            payload,
            account: None,
            fee: None,
            sequence: None,
            flags: None,
            last_ledger_sequence: None,
            account_txn_id: None,
            source_tag: None,
            signing_pub_key: None,
            txn_signature: None,
            memos: Vec::new(),
            signers: Vec::new(),
        }
    }

    /// Set the sending account.
    pub fn account(mut self, account: AccountAddress) -> Self {
        self.account = Some(account);
        self
    }

    /// Set the declared fee.
    pub fn fee(mut self, fee: XrpAmount) -> Self {
        self.fee = Some(fee);
        self
    }

    /// Set the account sequence number.
    pub fn sequence(mut self, sequence: u32) -> Self {
        self.sequence = Some(sequence);
        self
    }

    /// Attach an explicit flag set. Passing [`FlagSet::empty`] sends an
    /// explicit zero; never calling this omits the `Flags` field entirely.
    pub fn flags(mut self, flags: FlagSet) -> Self {
        self.flags = Some(flags);
        self
    }

    /// Set the last ledger index this transaction is valid in.
    pub fn last_ledger_sequence(mut self, seq: u32) -> Self {
        self.last_ledger_sequence = Some(seq);
        self
    }

    /// Require the previous transaction from this account to be the one
    /// with this hash.
    pub fn account_txn_id(mut self, id: &str) -> Self {
        self.account_txn_id = Some(id.to_string());
        self
    }

    /// Set the source tag.
    pub fn source_tag(mut self, tag: u32) -> Self {
        self.source_tag = Some(tag);
        self
    }

    /// Set the single-signature public key.
    pub fn signing_pub_key(mut self, key: &str) -> Self {
        self.signing_pub_key = Some(key.to_string());
        self
    }

    /// Set the single signature.
    pub fn txn_signature(mut self, sig: &str) -> Self {
        self.txn_signature = Some(sig.to_string());
        self
    }

    /// Attach a memo.
    pub fn memo(mut self, memo: Memo) -> Self {
        self.memos.push(memo);
        self
    }

    /// Attach a multi-signature entry.
    pub fn signer(mut self, signer: SignerEntry) -> Self {
        self.signers.push(signer);
        self
    }

    /// Finalize: derive flags where applicable, validate, and freeze.
    pub fn build(self) -> Result<Transaction, BuildError> {
        let account = self.account.ok_or(BuildError::MissingAccount)?;
        let fee = self.fee.ok_or(BuildError::MissingFee)?;
        let sequence = self.sequence.ok_or(BuildError::MissingSequence)?;

        let tx_type = self.payload.tx_type();
        let flags = match (self.flags, &self.payload) {
            (Some(flags), _) => Some(flags),
            (None, TxPayload::AmmDeposit(p)) => {
                Some(derived_flag_set(tx_type, resolve_deposit_mode(&p.presence()))?)
            }
            (None, TxPayload::AmmWithdraw(p)) => {
                Some(derived_flag_set(tx_type, resolve_withdraw_mode(&p.presence()))?)
            }
            (None, _) => None,
        };

        let tx = Transaction {
            account,
            fee,
            sequence,
            flags,
            last_ledger_sequence: self.last_ledger_sequence,
            account_txn_id: self.account_txn_id,
            source_tag: self.source_tag,
            signing_pub_key: self.signing_pub_key,
            txn_signature: self.txn_signature,
            memos: self.memos,
            signers: self.signers,
            payload: self.payload,
            unknown_fields: UnknownFieldBag::new(),
        };
        invariants::validate(&tx)?;
        Ok(tx)
    }
}

impl Transaction {
    /// Shorthand for [`TransactionBuilder::new`].
    pub fn builder(payload: TxPayload) -> TransactionBuilder {
        TransactionBuilder::new(payload)
    }
}

fn derived_flag_set(
    tx_type: TxType,
    resolved: Result<DerivedMode, ResolveError>,
) -> Result<FlagSet, BuildError> {
    let mode = resolved.map_err(InvariantViolation::from)?;
    log::debug!("{} resolved to mode {}", tx_type, mode.name);
    Ok(FlagSet::builder(tx_type).with(mode.name, true)?.build())
}
