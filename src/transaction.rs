/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! Defines the parsed-transaction input contract of the engine.
//!
//! A [Txn] arrives already schema-validated and deserialized by the
//! transaction-processing pipeline; this engine never touches wire bytes.
//! `Option` fields preserve the wire format's has-field presence bits: an
//! absent field is `None`, an explicitly-emptied field is `Some` of an empty
//! value. Extractors must not infer presence from lengths alone.

use crate::types::{EntityId, Key, Operation, SigUsage, Timestamp, TokenKind};

/// One parsed transaction, as handed over by the pipeline.
#[derive(Clone, Debug, PartialEq)]
pub struct Txn {
    /// Transaction memo; counts toward every operation's envelope bytes.
    pub memo: String,
    /// Signature counts and map size, resolved upstream.
    pub sig_usage: SigUsage,
    /// Consensus-assigned time. Schedule selection and rate staleness use this,
    /// never the wall clock, so a fee stays reproducible after the fact.
    pub consensus_time: Timestamp,
    pub body: TxnBody,
}

/// Operation-specific payload of a transaction.
#[derive(Clone, Debug, PartialEq)]
pub enum TxnBody {
    TokenCreate(TokenCreateBody),
    TokenUpdate(TokenUpdateBody),
    TokenMint(TokenMintBody),
    TokenBurn(TokenBurnBody),
    TokenWipe(TokenWipeBody),
    TokenAssociate(TokenAssociateBody),
    TokenDissociate(TokenDissociateBody),
    TokenFreeze(TokenFreezeBody),
    TokenUnfreeze(TokenUnfreezeBody),
    TokenPause(TokenPauseBody),
    TokenUnpause(TokenUnpauseBody),
    TokenFeeScheduleUpdate(TokenFeeScheduleUpdateBody),
    CryptoCreate(CryptoCreateBody),
    CryptoUpdate(CryptoUpdateBody),
    CryptoTransfer(CryptoTransferBody),
    CryptoDelete(CryptoDeleteBody),
    FileCreate(FileCreateBody),
    FileAppend(FileAppendBody),
    FileUpdate(FileUpdateBody),
}

impl TxnBody {
    pub fn operation(&self) -> Operation {
        match self {
            TxnBody::TokenCreate(_) => Operation::TokenCreate,
            TxnBody::TokenUpdate(_) => Operation::TokenUpdate,
            TxnBody::TokenMint(_) => Operation::TokenMint,
            TxnBody::TokenBurn(_) => Operation::TokenBurn,
            TxnBody::TokenWipe(_) => Operation::TokenWipe,
            TxnBody::TokenAssociate(_) => Operation::TokenAssociate,
            TxnBody::TokenDissociate(_) => Operation::TokenDissociate,
            TxnBody::TokenFreeze(_) => Operation::TokenFreeze,
            TxnBody::TokenUnfreeze(_) => Operation::TokenUnfreeze,
            TxnBody::TokenPause(_) => Operation::TokenPause,
            TxnBody::TokenUnpause(_) => Operation::TokenUnpause,
            TxnBody::TokenFeeScheduleUpdate(_) => Operation::TokenFeeScheduleUpdate,
            TxnBody::CryptoCreate(_) => Operation::CryptoCreate,
            TxnBody::CryptoUpdate(_) => Operation::CryptoUpdate,
            TxnBody::CryptoTransfer(_) => Operation::CryptoTransfer,
            TxnBody::CryptoDelete(_) => Operation::CryptoDelete,
            TxnBody::FileCreate(_) => Operation::FileCreate,
            TxnBody::FileAppend(_) => Operation::FileAppend,
            TxnBody::FileUpdate(_) => Operation::FileUpdate,
        }
    }
}

/* ↓↓↓ Token operation bodies ↓↓↓ */

#[derive(Clone, Debug, PartialEq)]
pub struct TokenCreateBody {
    pub name: String,
    pub symbol: String,
    pub memo: String,
    pub kind: TokenKind,
    pub treasury: EntityId,
    pub admin_key: Option<Key>,
    pub kyc_key: Option<Key>,
    pub freeze_key: Option<Key>,
    pub wipe_key: Option<Key>,
    pub supply_key: Option<Key>,
    pub fee_schedule_key: Option<Key>,
    pub pause_key: Option<Key>,
    /// Serialized size of the custom fee section; 0 when no custom fees.
    pub custom_fee_bytes: u32,
    pub auto_renew_account: Option<EntityId>,
    /// Seconds of rent purchased up front.
    pub auto_renew_period: i64,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct TokenUpdateBody {
    pub token: EntityId,
    pub name: Option<String>,
    pub symbol: Option<String>,
    pub memo: Option<String>,
    pub admin_key: Option<Key>,
    pub kyc_key: Option<Key>,
    pub freeze_key: Option<Key>,
    pub wipe_key: Option<Key>,
    pub supply_key: Option<Key>,
    pub fee_schedule_key: Option<Key>,
    pub pause_key: Option<Key>,
    /// Requested treasury change.
    pub treasury: Option<EntityId>,
    pub expiry: Option<Timestamp>,
    pub auto_renew_period: Option<i64>,
    /// Requested new auto-renew account. Mutually exclusive with
    /// [Self::remove_auto_renew_account]; both set is a caller contract
    /// violation the extractor rejects.
    pub auto_renew_account: Option<EntityId>,
    pub remove_auto_renew_account: bool,
}

/// A mint is fungible (bare `amount`) or unique (list of `metadata` blobs),
/// never both and never neither; the shape decides the sub-type.
#[derive(Clone, Debug, PartialEq)]
pub struct TokenMintBody {
    pub token: EntityId,
    pub amount: Option<u64>,
    pub metadata: Vec<Vec<u8>>,
}

/// A burn is fungible (bare `amount`) or unique (list of serial numbers).
#[derive(Clone, Debug, PartialEq)]
pub struct TokenBurnBody {
    pub token: EntityId,
    pub amount: Option<u64>,
    pub serial_numbers: Vec<i64>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TokenWipeBody {
    pub token: EntityId,
    pub account: EntityId,
    pub amount: Option<u64>,
    pub serial_numbers: Vec<i64>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TokenAssociateBody {
    pub account: EntityId,
    pub tokens: Vec<EntityId>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TokenDissociateBody {
    pub account: EntityId,
    pub tokens: Vec<EntityId>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TokenFreezeBody {
    pub token: EntityId,
    pub account: EntityId,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TokenUnfreezeBody {
    pub token: EntityId,
    pub account: EntityId,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TokenPauseBody {
    pub token: EntityId,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TokenUnpauseBody {
    pub token: EntityId,
}

/// Priced by transmitted and stored representation bytes, not named fields.
/// The count covers the fully assembled new representation, regardless of how
/// many calls assembled it.
#[derive(Clone, Debug, PartialEq)]
pub struct TokenFeeScheduleUpdateBody {
    pub token: EntityId,
    pub num_bytes_in_new_fee_schedule_repr: u32,
}

/* ↓↓↓ Crypto operation bodies ↓↓↓ */

#[derive(Clone, Debug, PartialEq)]
pub struct CryptoCreateBody {
    pub key: Key,
    pub memo: String,
    pub auto_renew_period: i64,
    pub max_auto_associations: u32,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct CryptoUpdateBody {
    pub account: EntityId,
    pub key: Option<Key>,
    pub memo: Option<String>,
    pub expiry: Option<Timestamp>,
    pub auto_renew_period: Option<i64>,
    pub max_auto_associations: Option<u32>,
}

/// Transfer shape reduced to the counts that drive the record payload.
/// The pipeline resolves the full lists; pricing only needs their sizes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CryptoTransferBody {
    pub num_hbar_adjustments: u32,
    /// Fungible token balance adjustments, across all tokens involved.
    pub num_token_adjustments: u32,
    /// Unique token ownership changes.
    pub num_ownership_changes: u32,
    pub num_tokens_involved: u32,
    /// Whether any involved token carries a custom fee schedule.
    pub involves_custom_fees: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CryptoDeleteBody {
    pub account: EntityId,
    /// Account receiving the remaining balance.
    pub transfer_account: EntityId,
}

/* ↓↓↓ File operation bodies ↓↓↓ */

#[derive(Clone, Debug, PartialEq)]
pub struct FileCreateBody {
    pub contents_len: u32,
    pub keys: Vec<Key>,
    pub expiry: Timestamp,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FileAppendBody {
    pub file: EntityId,
    pub bytes_added: u32,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct FileUpdateBody {
    pub file: EntityId,
    pub new_contents_len: Option<u32>,
    pub new_keys: Option<Vec<Key>>,
    pub new_expiry: Option<Timestamp>,
}
