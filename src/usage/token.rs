/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! Functions extracting the resource usage of each token operation, and the
//! immutable metadata values they produce.
//!
//! Every extractor is a pure function of the parsed transaction and the extant
//! context the caller resolved; none touches state or clocks. The
//! correctness-critical decision in this family is sub-type selection for mint,
//! burn and wipe: unique-token shapes are priced per serial number while
//! fungible shapes are priced per bare amount, and picking the wrong branch
//! silently mis-prices the transaction. Shape discrimination therefore fails
//! fast on ambiguous requests instead of guessing.

use crate::constants::{
    encoded_len, field_delta, lifetime_extension, relative_lifetime, BASIC_ENTITY_ID_SIZE,
    LONG_SIZE, TOKEN_ENTITY_BASE_SIZE, TOKEN_REL_SIZE,
};
use crate::context::{ExtantFeeScheduleContext, ExtantTokenContext};
use crate::error::FeeError;
use crate::transaction::{
    TokenAssociateBody, TokenBurnBody, TokenCreateBody, TokenDissociateBody,
    TokenFeeScheduleUpdateBody, TokenFreezeBody, TokenMintBody, TokenPauseBody,
    TokenUnfreezeBody, TokenUnpauseBody, TokenUpdateBody, TokenWipeBody, Txn,
};
use crate::types::{Key, SubType, TokenKind};
use crate::usage::{base_meta, OpUsage, UsageEstimate, UsageMetadata};

/* ↓↓↓ Metadata value types ↓↓↓ */

/// Usage of a token creation: everything transmitted is newly stored.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TokenCreateMeta {
    pub sub_type: SubType,
    pub new_name_len: u32,
    pub new_symbol_len: u32,
    pub new_memo_len: u32,
    pub new_keys_size: u32,
    pub custom_fee_bytes: u32,
    pub has_auto_renew_account: bool,
    /// Seconds of rent purchased up front.
    pub auto_renew_period: u64,
}

impl TokenCreateMeta {
    pub(crate) fn apply(&self, est: &mut UsageEstimate) {
        let named_bytes = (new_field(self.new_name_len)
            + new_field(self.new_symbol_len)
            + new_field(self.new_memo_len)) as u64;
        let new_bytes = named_bytes
            .saturating_add(self.new_keys_size as u64)
            .saturating_add(self.custom_fee_bytes as u64);

        let mut payload = new_bytes.saturating_add((BASIC_ENTITY_ID_SIZE + LONG_SIZE) as u64);
        if self.has_auto_renew_account {
            payload = payload.saturating_add(BASIC_ENTITY_ID_SIZE as u64);
        }
        est.add_bpt(payload);
        est.add_service_bytes(new_bytes);

        let entity_bytes = (TOKEN_ENTITY_BASE_SIZE as u64).saturating_add(new_bytes);
        est.add_rbs(entity_bytes, self.auto_renew_period);
        // the treasury relation is created along with the token
        est.add_rbs(TOKEN_REL_SIZE as u64, self.auto_renew_period);
    }
}

/// New lengths a token update requests per mutable field; `None` preserves the
/// wire format's absent-field bits and is distinct from an explicit empty value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TokenUpdateFieldLens {
    pub name: Option<u32>,
    pub symbol: Option<u32>,
    pub memo: Option<u32>,
    /// Aggregate serialized size of all keys being replaced.
    pub keys: Option<u32>,
}

/// Inputs to [TokenUpdateMeta::new], computed by the extractor against the
/// extant context.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TokenUpdateParts {
    pub new_lens: TokenUpdateFieldLens,
    /// Seconds of rent extension purchased; already clamped to ≥ 0.
    pub new_effective_lifetime: u64,
    pub has_treasury: bool,
    pub has_auto_renew_account: bool,
    pub remove_auto_renew_account: bool,
    /// Net growth in stored bytes across all replaced fields.
    pub byte_delta: u64,
    /// Serialized token footprint after the update applies.
    pub entity_bytes_after: u64,
    /// Bytes of the update payload transmitted on the wire.
    pub transmitted_bytes: u64,
}

/// Usage of a token update. The auto-renew flags are validated at construction
/// and kept private so no value with both set can exist.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TokenUpdateMeta {
    pub new_lens: TokenUpdateFieldLens,
    pub new_effective_lifetime: u64,
    pub has_treasury: bool,
    has_auto_renew_account: bool,
    remove_auto_renew_account: bool,
    byte_delta: u64,
    entity_bytes_after: u64,
    transmitted_bytes: u64,
}

impl TokenUpdateMeta {
    pub fn new(parts: TokenUpdateParts) -> Result<Self, FeeError> {
        if parts.has_auto_renew_account && parts.remove_auto_renew_account {
            return Err(FeeError::InvalidUsageRequest(
                "update both sets and removes the auto-renew account",
            ));
        }
        Ok(Self {
            new_lens: parts.new_lens,
            new_effective_lifetime: parts.new_effective_lifetime,
            has_treasury: parts.has_treasury,
            has_auto_renew_account: parts.has_auto_renew_account,
            remove_auto_renew_account: parts.remove_auto_renew_account,
            byte_delta: parts.byte_delta,
            entity_bytes_after: parts.entity_bytes_after,
            transmitted_bytes: parts.transmitted_bytes,
        })
    }

    pub fn has_auto_renew_account(&self) -> bool {
        self.has_auto_renew_account
    }

    pub fn remove_auto_renew_account(&self) -> bool {
        self.remove_auto_renew_account
    }

    pub(crate) fn apply(&self, est: &mut UsageEstimate) {
        est.add_bpt(self.transmitted_bytes);
        est.add_service_bytes(self.byte_delta);
        est.add_rbs(self.entity_bytes_after, self.new_effective_lifetime);
    }
}

/// Usage of a mint. Unique mints store their metadata for the token's
/// remaining lifetime; fungible mints only adjust the supply.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TokenMintMeta {
    pub sub_type: SubType,
    pub serial_nums_count: u32,
    /// Serialized payload: the bare amount, or the metadata blobs.
    pub payload_bytes: u32,
    /// Remaining lifetime of the token, over which minted metadata is stored.
    pub expected_lifetime: u64,
}

impl TokenMintMeta {
    pub(crate) fn apply(&self, est: &mut UsageEstimate) {
        est.add_bpt((BASIC_ENTITY_ID_SIZE as u64).saturating_add(self.payload_bytes as u64));
        est.add_service_bytes(self.payload_bytes as u64);
        if self.sub_type == SubType::TokenNonFungibleUnique {
            est.add_rbs(self.payload_bytes as u64, self.expected_lifetime);
        }
    }
}

/// Usage of a burn: priced per serial number for unique tokens, per bare
/// amount for fungible ones.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TokenBurnMeta {
    pub sub_type: SubType,
    pub serial_nums_count: u32,
    pub payload_bytes: u32,
}

impl TokenBurnMeta {
    pub(crate) fn apply(&self, est: &mut UsageEstimate) {
        est.add_bpt((BASIC_ENTITY_ID_SIZE as u64).saturating_add(self.payload_bytes as u64));
        est.add_service_bytes(self.payload_bytes as u64);
    }
}

/// Usage of a wipe: a burn targeted at a specific account.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TokenWipeMeta {
    pub sub_type: SubType,
    pub serial_nums_count: u32,
    pub payload_bytes: u32,
}

impl TokenWipeMeta {
    pub(crate) fn apply(&self, est: &mut UsageEstimate) {
        est.add_bpt((2 * BASIC_ENTITY_ID_SIZE as u64).saturating_add(self.payload_bytes as u64));
        est.add_service_bytes(self.payload_bytes as u64);
    }
}

/// Usage of an associate: each new relationship is rented for the token's
/// remaining lifetime.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TokenAssociateMeta {
    pub num_tokens: u32,
    pub relative_lifetime: u64,
}

impl TokenAssociateMeta {
    pub(crate) fn apply(&self, est: &mut UsageEstimate) {
        let n = self.num_tokens as u64;
        est.add_bpt((BASIC_ENTITY_ID_SIZE as u64).saturating_mul(n.saturating_add(1)));
        est.add_service_bytes((TOKEN_REL_SIZE as u64).saturating_mul(n));
        est.add_rbs(
            (TOKEN_REL_SIZE as u64).saturating_mul(n),
            self.relative_lifetime,
        );
    }
}

/// Usage of a dissociate: ids on the wire, no new storage.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TokenDissociateMeta {
    pub num_tokens: u32,
}

impl TokenDissociateMeta {
    pub(crate) fn apply(&self, est: &mut UsageEstimate) {
        let n = self.num_tokens as u64;
        est.add_bpt((BASIC_ENTITY_ID_SIZE as u64).saturating_mul(n.saturating_add(1)));
    }
}

/// Freeze carries a token id and an account id, nothing else.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TokenFreezeMeta;

impl TokenFreezeMeta {
    pub(crate) fn apply(&self, est: &mut UsageEstimate) {
        est.add_bpt(2 * BASIC_ENTITY_ID_SIZE as u64);
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TokenUnfreezeMeta;

impl TokenUnfreezeMeta {
    pub(crate) fn apply(&self, est: &mut UsageEstimate) {
        est.add_bpt(2 * BASIC_ENTITY_ID_SIZE as u64);
    }
}

/// Pause carries only the token id.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TokenPauseMeta;

impl TokenPauseMeta {
    pub(crate) fn apply(&self, est: &mut UsageEstimate) {
        est.add_bpt(BASIC_ENTITY_ID_SIZE as u64);
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TokenUnpauseMeta;

impl TokenUnpauseMeta {
    pub(crate) fn apply(&self, est: &mut UsageEstimate) {
        est.add_bpt(BASIC_ENTITY_ID_SIZE as u64);
    }
}

/// Usage of a custom fee schedule update, priced by representation bytes
/// rather than named fields: pay for what is transmitted and stored.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FeeScheduleUpdateMeta {
    /// Total bytes of the assembled new representation, however many calls
    /// assembled it.
    pub num_bytes_in_new_fee_schedule_repr: u32,
    /// Growth over the extant representation, clamped to ≥ 0.
    pub byte_delta: u64,
    /// Remaining lifetime of the owning token.
    pub relative_lifetime: u64,
}

impl FeeScheduleUpdateMeta {
    pub(crate) fn apply(&self, est: &mut UsageEstimate) {
        let repr = self.num_bytes_in_new_fee_schedule_repr as u64;
        est.add_bpt((BASIC_ENTITY_ID_SIZE as u64).saturating_add(repr));
        est.add_service_bytes(self.byte_delta);
        est.add_rbs(repr, self.relative_lifetime);
    }
}

/* ↓↓↓ Extractors ↓↓↓ */

/// Computes the resource usage of a token creation.
pub fn token_create_usage(txn: &Txn, body: &TokenCreateBody) -> Result<UsageMetadata, FeeError> {
    if body.auto_renew_period < 0 {
        return Err(FeeError::InvalidUsageRequest("negative auto-renew period"));
    }
    let sub_type = creation_sub_type(body.kind, body.custom_fee_bytes > 0);
    let meta = TokenCreateMeta {
        sub_type,
        new_name_len: body.name.len() as u32,
        new_symbol_len: body.symbol.len() as u32,
        new_memo_len: body.memo.len() as u32,
        new_keys_size: keys_size(&[
            &body.admin_key,
            &body.kyc_key,
            &body.freeze_key,
            &body.wipe_key,
            &body.supply_key,
            &body.fee_schedule_key,
            &body.pause_key,
        ]),
        custom_fee_bytes: body.custom_fee_bytes,
        has_auto_renew_account: body.auto_renew_account.is_some(),
        auto_renew_period: body.auto_renew_period as u64,
    };
    Ok(UsageMetadata {
        base: base_meta(txn, 0),
        op: OpUsage::TokenCreate(meta),
    })
}

/// Computes the resource usage of a token update against the extant token.
///
/// An unset field contributes no byte delta while an explicitly-emptied field
/// still bills its minimum encoded length; the distinction comes from the
/// body's `Option` fields, never from lengths. An update that shortens the
/// expiry purchases zero rent extension, never a negative charge.
pub fn token_update_usage(
    txn: &Txn,
    body: &TokenUpdateBody,
    ctx: &ExtantTokenContext,
) -> Result<UsageMetadata, FeeError> {
    if matches!(body.auto_renew_period, Some(p) if p < 0) {
        return Err(FeeError::InvalidUsageRequest("negative auto-renew period"));
    }

    let new_keys = replacement_keys_size(&[
        &body.admin_key,
        &body.kyc_key,
        &body.freeze_key,
        &body.wipe_key,
        &body.supply_key,
        &body.fee_schedule_key,
        &body.pause_key,
    ]);
    let new_lens = TokenUpdateFieldLens {
        name: body.name.as_ref().map(|s| s.len() as u32),
        symbol: body.symbol.as_ref().map(|s| s.len() as u32),
        memo: body.memo.as_ref().map(|s| s.len() as u32),
        keys: new_keys,
    };

    // keys are billed as an aggregate replacement against the extant aggregate
    let keys_delta = match new_keys {
        Some(n) => (n as u64).saturating_sub(ctx.keys_size as u64),
        None => 0,
    };
    // granting an auto-renew account where none existed stores a new id
    let grants_auto_renew = body.auto_renew_account.is_some() && !ctx.has_auto_renew_account;
    let byte_delta = field_delta(as_usize(new_lens.name), ctx.name_len as usize)
        .saturating_add(field_delta(
            as_usize(new_lens.symbol),
            ctx.symbol_len as usize,
        ))
        .saturating_add(field_delta(as_usize(new_lens.memo), ctx.memo_len as usize))
        .saturating_add(keys_delta)
        .saturating_add(if grants_auto_renew {
            BASIC_ENTITY_ID_SIZE as u64
        } else {
            0
        });

    let keeps_auto_renew = body.auto_renew_account.is_some()
        || (ctx.has_auto_renew_account && !body.remove_auto_renew_account);
    let entity_bytes_after = (TOKEN_ENTITY_BASE_SIZE as u64)
        .saturating_add(after_field(new_lens.name, ctx.name_len))
        .saturating_add(after_field(new_lens.symbol, ctx.symbol_len))
        .saturating_add(after_field(new_lens.memo, ctx.memo_len))
        .saturating_add(new_keys.unwrap_or(ctx.keys_size) as u64)
        .saturating_add(if keeps_auto_renew {
            BASIC_ENTITY_ID_SIZE as u64
        } else {
            0
        });

    let mut transmitted = (BASIC_ENTITY_ID_SIZE as u64)
        .saturating_add(transmitted_field(new_lens.name))
        .saturating_add(transmitted_field(new_lens.symbol))
        .saturating_add(transmitted_field(new_lens.memo))
        .saturating_add(new_keys.unwrap_or(0) as u64);
    if body.treasury.is_some() {
        transmitted = transmitted.saturating_add(BASIC_ENTITY_ID_SIZE as u64);
    }
    if body.auto_renew_account.is_some() {
        transmitted = transmitted.saturating_add(BASIC_ENTITY_ID_SIZE as u64);
    }
    if body.expiry.is_some() {
        transmitted = transmitted.saturating_add(LONG_SIZE as u64);
    }
    if body.auto_renew_period.is_some() {
        transmitted = transmitted.saturating_add(LONG_SIZE as u64);
    }

    let meta = TokenUpdateMeta::new(TokenUpdateParts {
        new_lens,
        new_effective_lifetime: body
            .expiry
            .map(|e| lifetime_extension(e, ctx.expiry))
            .unwrap_or(0),
        has_treasury: body.treasury.is_some(),
        has_auto_renew_account: body.auto_renew_account.is_some(),
        remove_auto_renew_account: body.remove_auto_renew_account,
        byte_delta,
        entity_bytes_after,
        transmitted_bytes: transmitted,
    })?;

    Ok(UsageMetadata {
        base: base_meta(txn, 0),
        op: OpUsage::TokenUpdate(meta),
    })
}

/// Computes the resource usage of a mint, selecting the sub-type from the
/// transaction shape: a metadata list means non-fungible-unique, a bare amount
/// means fungible-common.
pub fn token_mint_usage(
    txn: &Txn,
    body: &TokenMintBody,
    ctx: &ExtantTokenContext,
) -> Result<UsageMetadata, FeeError> {
    let meta = match (body.amount, body.metadata.is_empty()) {
        (Some(_), true) => TokenMintMeta {
            sub_type: SubType::TokenFungibleCommon,
            serial_nums_count: 0,
            payload_bytes: LONG_SIZE as u32,
            expected_lifetime: 0,
        },
        (None, false) => TokenMintMeta {
            sub_type: SubType::TokenNonFungibleUnique,
            serial_nums_count: body.metadata.len() as u32,
            payload_bytes: body
                .metadata
                .iter()
                .map(|m| encoded_len(m.len()) as u32)
                .sum(),
            expected_lifetime: relative_lifetime(ctx.expiry, txn.consensus_time),
        },
        _ => {
            return Err(FeeError::InvalidUsageRequest(
                "mint must carry either an amount or a metadata list",
            ))
        }
    };
    Ok(UsageMetadata {
        base: base_meta(txn, 0),
        op: OpUsage::TokenMint(meta),
    })
}

/// Computes the resource usage of a burn; unique burns are priced per serial
/// number, fungible burns per bare amount.
pub fn token_burn_usage(txn: &Txn, body: &TokenBurnBody) -> Result<UsageMetadata, FeeError> {
    let (sub_type, serial_nums_count, payload_bytes) =
        burn_shape(body.amount, &body.serial_numbers)?;
    Ok(UsageMetadata {
        base: base_meta(txn, 0),
        op: OpUsage::TokenBurn(TokenBurnMeta {
            sub_type,
            serial_nums_count,
            payload_bytes,
        }),
    })
}

/// Computes the resource usage of a wipe; same shape discrimination as a burn.
pub fn token_wipe_usage(txn: &Txn, body: &TokenWipeBody) -> Result<UsageMetadata, FeeError> {
    let (sub_type, serial_nums_count, payload_bytes) =
        burn_shape(body.amount, &body.serial_numbers)?;
    Ok(UsageMetadata {
        base: base_meta(txn, 0),
        op: OpUsage::TokenWipe(TokenWipeMeta {
            sub_type,
            serial_nums_count,
            payload_bytes,
        }),
    })
}

/// Computes the resource usage of associating `tokens` with an account. Each
/// relationship is rented for the remaining lifetime of the extant token.
pub fn token_associate_usage(
    txn: &Txn,
    body: &TokenAssociateBody,
    ctx: &ExtantTokenContext,
) -> Result<UsageMetadata, FeeError> {
    Ok(UsageMetadata {
        base: base_meta(txn, 0),
        op: OpUsage::TokenAssociate(TokenAssociateMeta {
            num_tokens: body.tokens.len() as u32,
            relative_lifetime: relative_lifetime(ctx.expiry, txn.consensus_time),
        }),
    })
}

/// Computes the resource usage of a dissociate.
pub fn token_dissociate_usage(
    txn: &Txn,
    body: &TokenDissociateBody,
) -> Result<UsageMetadata, FeeError> {
    Ok(UsageMetadata {
        base: base_meta(txn, 0),
        op: OpUsage::TokenDissociate(TokenDissociateMeta {
            num_tokens: body.tokens.len() as u32,
        }),
    })
}

pub fn token_freeze_usage(txn: &Txn, _body: &TokenFreezeBody) -> Result<UsageMetadata, FeeError> {
    Ok(UsageMetadata {
        base: base_meta(txn, 0),
        op: OpUsage::TokenFreeze(TokenFreezeMeta),
    })
}

pub fn token_unfreeze_usage(
    txn: &Txn,
    _body: &TokenUnfreezeBody,
) -> Result<UsageMetadata, FeeError> {
    Ok(UsageMetadata {
        base: base_meta(txn, 0),
        op: OpUsage::TokenUnfreeze(TokenUnfreezeMeta),
    })
}

pub fn token_pause_usage(txn: &Txn, _body: &TokenPauseBody) -> Result<UsageMetadata, FeeError> {
    Ok(UsageMetadata {
        base: base_meta(txn, 0),
        op: OpUsage::TokenPause(TokenPauseMeta),
    })
}

pub fn token_unpause_usage(txn: &Txn, _body: &TokenUnpauseBody) -> Result<UsageMetadata, FeeError> {
    Ok(UsageMetadata {
        base: base_meta(txn, 0),
        op: OpUsage::TokenUnpause(TokenUnpauseMeta),
    })
}

/// Computes the resource usage of replacing a token's custom fee schedule.
/// The new representation is billed in full against the remaining token
/// lifetime; growth over the extant representation feeds the byte price.
pub fn fee_schedule_update_usage(
    txn: &Txn,
    body: &TokenFeeScheduleUpdateBody,
    ctx: &ExtantFeeScheduleContext,
) -> Result<UsageMetadata, FeeError> {
    let new_repr = body.num_bytes_in_new_fee_schedule_repr as u64;
    Ok(UsageMetadata {
        base: base_meta(txn, 0),
        op: OpUsage::TokenFeeScheduleUpdate(FeeScheduleUpdateMeta {
            num_bytes_in_new_fee_schedule_repr: body.num_bytes_in_new_fee_schedule_repr,
            byte_delta: new_repr.saturating_sub(ctx.num_bytes_in_repr as u64),
            relative_lifetime: relative_lifetime(ctx.expiry, txn.consensus_time),
        }),
    })
}

/* ↓↓↓ Shared shape helpers ↓↓↓ */

fn creation_sub_type(kind: TokenKind, with_custom_fees: bool) -> SubType {
    match (kind, with_custom_fees) {
        (TokenKind::FungibleCommon, false) => SubType::TokenFungibleCommon,
        (TokenKind::FungibleCommon, true) => SubType::TokenFungibleCommonWithCustomFees,
        (TokenKind::NonFungibleUnique, false) => SubType::TokenNonFungibleUnique,
        (TokenKind::NonFungibleUnique, true) => SubType::TokenNonFungibleUniqueWithCustomFees,
    }
}

fn burn_shape(amount: Option<u64>, serials: &[i64]) -> Result<(SubType, u32, u32), FeeError> {
    match (amount, serials.is_empty()) {
        (Some(_), true) => Ok((SubType::TokenFungibleCommon, 0, LONG_SIZE as u32)),
        (None, false) => Ok((
            SubType::TokenNonFungibleUnique,
            serials.len() as u32,
            (serials.len() * LONG_SIZE) as u32,
        )),
        _ => Err(FeeError::InvalidUsageRequest(
            "burn must carry either an amount or a serial number list",
        )),
    }
}

/// Aggregate serialized size of the keys present on a creation body.
fn keys_size(keys: &[&Option<Key>]) -> u32 {
    keys.iter()
        .filter_map(|k| k.as_ref())
        .map(|k| k.serialized_size() as u32)
        .sum()
}

/// Aggregate replacement size for an update: `None` when no key field is
/// present at all, so no-key updates bill nothing for keys.
fn replacement_keys_size(keys: &[&Option<Key>]) -> Option<u32> {
    if keys.iter().all(|k| k.is_none()) {
        None
    } else {
        Some(keys_size(keys))
    }
}

/// Encoded size of a newly created field; an empty value was never stored and
/// contributes nothing here (creation has no has-field bits to preserve).
fn new_field(len: u32) -> usize {
    if len > 0 {
        encoded_len(len as usize)
    } else {
        0
    }
}

/// Encoded size a field will occupy after the update applies.
fn after_field(new: Option<u32>, old: u32) -> u64 {
    match new {
        Some(len) => encoded_len(len as usize) as u64,
        None => {
            if old > 0 {
                encoded_len(old as usize) as u64
            } else {
                0
            }
        }
    }
}

/// Bytes a present field puts on the wire.
fn transmitted_field(new: Option<u32>) -> u64 {
    match new {
        Some(len) => encoded_len(len as usize) as u64,
        None => 0,
    }
}

fn as_usize(v: Option<u32>) -> Option<usize> {
    v.map(|x| x as usize)
}
