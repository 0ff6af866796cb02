/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! Functions extracting the resource usage of each account operation.
//!
//! The transfer extractor owns the widest sub-type partition in the engine:
//! a transfer is priced as plain ℏ movement, fungible-token movement or unique
//! ownership change, each optionally upgraded by custom-fee involvement, and
//! exactly one of those five sub-types is selected for any accepted shape.

use crate::constants::{
    encoded_len, field_delta, lifetime_extension, BASIC_ENTITY_ID_SIZE,
    CRYPTO_ENTITY_BASE_SIZE, INT_SIZE, LONG_SIZE, TOKEN_REL_SIZE,
};
use crate::context::ExtantCryptoContext;
use crate::error::FeeError;
use crate::transaction::{
    CryptoCreateBody, CryptoDeleteBody, CryptoTransferBody, CryptoUpdateBody, Txn,
};
use crate::types::SubType;
use crate::usage::{base_meta, OpUsage, UsageEstimate, UsageMetadata};

/* ↓↓↓ Metadata value types ↓↓↓ */

/// Usage of an account creation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CryptoCreateMeta {
    pub new_key_size: u32,
    pub new_memo_len: u32,
    pub auto_renew_period: u64,
    pub max_auto_associations: u32,
}

impl CryptoCreateMeta {
    pub(crate) fn apply(&self, est: &mut UsageEstimate) {
        let new_bytes = (self.new_key_size as u64).saturating_add(new_field(self.new_memo_len));
        est.add_bpt(new_bytes.saturating_add((LONG_SIZE + INT_SIZE) as u64));
        est.add_service_bytes(new_bytes);

        let entity_bytes = (CRYPTO_ENTITY_BASE_SIZE as u64)
            .saturating_add(new_bytes)
            .saturating_add((self.max_auto_associations as u64).saturating_mul(INT_SIZE as u64));
        est.add_rbs(entity_bytes, self.auto_renew_period);
    }
}

/// Usage of an account update: field growth plus any purchased rent extension.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CryptoUpdateMeta {
    pub new_key_size: Option<u32>,
    pub new_memo_len: Option<u32>,
    pub new_max_auto_associations: Option<u32>,
    pub new_effective_lifetime: u64,
    pub byte_delta: u64,
    pub entity_bytes_after: u64,
    pub transmitted_bytes: u64,
}

impl CryptoUpdateMeta {
    pub(crate) fn apply(&self, est: &mut UsageEstimate) {
        est.add_bpt(self.transmitted_bytes);
        est.add_service_bytes(self.byte_delta);
        est.add_rbs(self.entity_bytes_after, self.new_effective_lifetime);
    }
}

/// Usage of a transfer. The counts drive the record payload size, which is
/// carried in the base metadata's explicit transfer bytes; this variant only
/// pins the sub-type and the counts the schedule discriminates on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CryptoTransferMeta {
    pub sub_type: SubType,
    pub num_hbar_adjustments: u32,
    pub num_token_adjustments: u32,
    pub num_ownership_changes: u32,
    pub num_tokens_involved: u32,
}

impl CryptoTransferMeta {
    pub(crate) fn apply(&self, _est: &mut UsageEstimate) {
        // the record payload already flows in through the base metadata
    }
}

/// Deleting an account writes a remainder transfer record.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CryptoDeleteMeta;

impl CryptoDeleteMeta {
    pub(crate) fn apply(&self, est: &mut UsageEstimate) {
        est.add_bpt((2 * BASIC_ENTITY_ID_SIZE + BASIC_ENTITY_ID_SIZE + LONG_SIZE) as u64);
    }
}

/* ↓↓↓ Extractors ↓↓↓ */

/// Computes the resource usage of an account creation.
pub fn crypto_create_usage(txn: &Txn, body: &CryptoCreateBody) -> Result<UsageMetadata, FeeError> {
    if body.auto_renew_period < 0 {
        return Err(FeeError::InvalidUsageRequest("negative auto-renew period"));
    }
    Ok(UsageMetadata {
        base: base_meta(txn, 0),
        op: OpUsage::CryptoCreate(CryptoCreateMeta {
            new_key_size: body.key.serialized_size() as u32,
            new_memo_len: body.memo.len() as u32,
            auto_renew_period: body.auto_renew_period as u64,
            max_auto_associations: body.max_auto_associations,
        }),
    })
}

/// Computes the resource usage of an account update against the extant
/// account. Field presence rules match the token update extractor.
pub fn crypto_update_usage(
    txn: &Txn,
    body: &CryptoUpdateBody,
    ctx: &ExtantCryptoContext,
) -> Result<UsageMetadata, FeeError> {
    if matches!(body.auto_renew_period, Some(p) if p < 0) {
        return Err(FeeError::InvalidUsageRequest("negative auto-renew period"));
    }

    let new_key_size = body.key.as_ref().map(|k| k.serialized_size() as u32);
    let new_memo_len = body.memo.as_ref().map(|m| m.len() as u32);

    let key_delta = match new_key_size {
        Some(n) => (n as u64).saturating_sub(ctx.key_size as u64),
        None => 0,
    };
    // growth in reserved auto-association slots is billed per slot
    let slots_delta = match body.max_auto_associations {
        Some(n) => (n as u64)
            .saturating_sub(ctx.max_auto_associations as u64)
            .saturating_mul(INT_SIZE as u64),
        None => 0,
    };
    let byte_delta = key_delta
        .saturating_add(field_delta(
            new_memo_len.map(|l| l as usize),
            ctx.memo_len as usize,
        ))
        .saturating_add(slots_delta);

    // relationships and any proxy id survive the update and stay rented
    let entity_bytes_after = (CRYPTO_ENTITY_BASE_SIZE as u64)
        .saturating_add(new_key_size.unwrap_or(ctx.key_size) as u64)
        .saturating_add(after_field(new_memo_len, ctx.memo_len))
        .saturating_add(
            (body.max_auto_associations.unwrap_or(ctx.max_auto_associations) as u64)
                .saturating_mul(INT_SIZE as u64),
        )
        .saturating_add((ctx.num_token_rels as u64).saturating_mul(TOKEN_REL_SIZE as u64))
        .saturating_add(if ctx.has_proxy {
            BASIC_ENTITY_ID_SIZE as u64
        } else {
            0
        });

    let mut transmitted = (BASIC_ENTITY_ID_SIZE as u64)
        .saturating_add(new_key_size.unwrap_or(0) as u64)
        .saturating_add(
            new_memo_len
                .map(|l| encoded_len(l as usize) as u64)
                .unwrap_or(0),
        );
    if body.expiry.is_some() {
        transmitted = transmitted.saturating_add(LONG_SIZE as u64);
    }
    if body.auto_renew_period.is_some() {
        transmitted = transmitted.saturating_add(LONG_SIZE as u64);
    }
    if body.max_auto_associations.is_some() {
        transmitted = transmitted.saturating_add(INT_SIZE as u64);
    }

    Ok(UsageMetadata {
        base: base_meta(txn, 0),
        op: OpUsage::CryptoUpdate(CryptoUpdateMeta {
            new_key_size,
            new_memo_len,
            new_max_auto_associations: body.max_auto_associations,
            new_effective_lifetime: body
                .expiry
                .map(|e| lifetime_extension(e, ctx.expiry))
                .unwrap_or(0),
            byte_delta,
            entity_bytes_after,
            transmitted_bytes: transmitted,
        }),
    })
}

/// Computes the resource usage of a transfer, selecting the single sub-type
/// the shape maps to. Unique ownership changes dominate fungible adjustments
/// when both appear, and custom-fee involvement upgrades either token
/// sub-type; plain ℏ movement prices as the default sub-type.
pub fn crypto_transfer_usage(
    txn: &Txn,
    body: &CryptoTransferBody,
) -> Result<UsageMetadata, FeeError> {
    let sub_type = if body.num_ownership_changes > 0 {
        if body.involves_custom_fees {
            SubType::TokenNonFungibleUniqueWithCustomFees
        } else {
            SubType::TokenNonFungibleUnique
        }
    } else if body.num_token_adjustments > 0 || body.num_tokens_involved > 0 {
        if body.involves_custom_fees {
            SubType::TokenFungibleCommonWithCustomFees
        } else {
            SubType::TokenFungibleCommon
        }
    } else {
        SubType::Default
    };

    let record_bytes = (body.num_hbar_adjustments as u64)
        .saturating_mul((BASIC_ENTITY_ID_SIZE + LONG_SIZE) as u64)
        .saturating_add(
            (body.num_tokens_involved as u64).saturating_mul(BASIC_ENTITY_ID_SIZE as u64),
        )
        .saturating_add(
            (body.num_token_adjustments as u64)
                .saturating_mul((BASIC_ENTITY_ID_SIZE + LONG_SIZE) as u64),
        )
        .saturating_add(
            (body.num_ownership_changes as u64)
                .saturating_mul((2 * BASIC_ENTITY_ID_SIZE + LONG_SIZE) as u64),
        );

    Ok(UsageMetadata {
        base: base_meta(txn, u32::try_from(record_bytes).unwrap_or(u32::MAX)),
        op: OpUsage::CryptoTransfer(CryptoTransferMeta {
            sub_type,
            num_hbar_adjustments: body.num_hbar_adjustments,
            num_token_adjustments: body.num_token_adjustments,
            num_ownership_changes: body.num_ownership_changes,
            num_tokens_involved: body.num_tokens_involved,
        }),
    })
}

/// Computes the resource usage of an account deletion.
pub fn crypto_delete_usage(txn: &Txn, _body: &CryptoDeleteBody) -> Result<UsageMetadata, FeeError> {
    Ok(UsageMetadata {
        base: base_meta(txn, 0),
        op: OpUsage::CryptoDelete(CryptoDeleteMeta),
    })
}

/* ↓↓↓ Shared field helpers ↓↓↓ */

fn new_field(len: u32) -> u64 {
    if len > 0 {
        encoded_len(len as usize) as u64
    } else {
        0
    }
}

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
