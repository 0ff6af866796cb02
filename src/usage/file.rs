/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! Functions extracting the resource usage of each file operation.
//!
//! File contents are long-lived payload storage, so they accrue
//! storage-byte-seconds rather than the rent-byte-seconds used for entity
//! bookkeeping.

use crate::constants::{
    encoded_len, lifetime_extension, relative_lifetime, BASIC_ENTITY_ID_SIZE,
    FILE_ENTITY_BASE_SIZE, KEY_WRAPPER_SIZE, LONG_SIZE,
};
use crate::context::ExtantFileContext;
use crate::error::FeeError;
use crate::transaction::{FileAppendBody, FileCreateBody, FileUpdateBody, Txn};
use crate::types::Key;
use crate::usage::{base_meta, OpUsage, UsageEstimate, UsageMetadata};

/* ↓↓↓ Metadata value types ↓↓↓ */

/// Usage of a file creation: contents and keys are stored until expiry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FileCreateMeta {
    pub new_contents_len: u32,
    pub new_keys_size: u32,
    /// Seconds until the requested expiry.
    pub lifetime: u64,
}

impl FileCreateMeta {
    pub(crate) fn apply(&self, est: &mut UsageEstimate) {
        let new_bytes = new_field(self.new_contents_len).saturating_add(self.new_keys_size as u64);
        est.add_bpt(new_bytes.saturating_add(LONG_SIZE as u64));
        est.add_service_bytes(new_bytes);
        est.add_sbs(
            (FILE_ENTITY_BASE_SIZE as u64).saturating_add(new_bytes),
            self.lifetime,
        );
    }
}

/// Usage of an append: the added bytes are stored for the file's remaining
/// lifetime. The total is whatever this call carries; assembling a payload
/// over several appends bills each call for its own bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FileAppendMeta {
    pub bytes_added: u32,
    pub lifetime: u64,
}

impl FileAppendMeta {
    pub(crate) fn apply(&self, est: &mut UsageEstimate) {
        let added = self.bytes_added as u64;
        est.add_bpt((BASIC_ENTITY_ID_SIZE as u64).saturating_add(added));
        est.add_service_bytes(added);
        est.add_sbs(added, self.lifetime);
    }
}

/// Usage of a file update: content and key growth plus purchased lifetime.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FileUpdateMeta {
    pub new_contents_len: Option<u32>,
    pub new_keys_size: Option<u32>,
    pub new_effective_lifetime: u64,
    pub byte_delta: u64,
    pub entity_bytes_after: u64,
    pub transmitted_bytes: u64,
}

impl FileUpdateMeta {
    pub(crate) fn apply(&self, est: &mut UsageEstimate) {
        est.add_bpt(self.transmitted_bytes);
        est.add_service_bytes(self.byte_delta);
        est.add_sbs(self.entity_bytes_after, self.new_effective_lifetime);
    }
}

/* ↓↓↓ Extractors ↓↓↓ */

/// Computes the resource usage of a file creation.
pub fn file_create_usage(txn: &Txn, body: &FileCreateBody) -> Result<UsageMetadata, FeeError> {
    Ok(UsageMetadata {
        base: base_meta(txn, 0),
        op: OpUsage::FileCreate(FileCreateMeta {
            new_contents_len: body.contents_len,
            new_keys_size: wacl_size(&body.keys),
            lifetime: relative_lifetime(body.expiry, txn.consensus_time),
        }),
    })
}

/// Computes the resource usage of appending to the extant file.
pub fn file_append_usage(
    txn: &Txn,
    body: &FileAppendBody,
    ctx: &ExtantFileContext,
) -> Result<UsageMetadata, FeeError> {
    Ok(UsageMetadata {
        base: base_meta(txn, 0),
        op: OpUsage::FileAppend(FileAppendMeta {
            bytes_added: body.bytes_added,
            lifetime: relative_lifetime(ctx.expiry, txn.consensus_time),
        }),
    })
}

/// Computes the resource usage of a file update against the extant file.
/// Shrinking contents or shortening the expiry never bills negative amounts.
pub fn file_update_usage(
    txn: &Txn,
    body: &FileUpdateBody,
    ctx: &ExtantFileContext,
) -> Result<UsageMetadata, FeeError> {
    let new_keys_size = body.new_keys.as_ref().map(|k| wacl_size(k));

    let contents_delta = match body.new_contents_len {
        Some(n) => (n as u64).saturating_sub(ctx.size as u64),
        None => 0,
    };
    let keys_delta = match new_keys_size {
        Some(n) => (n as u64).saturating_sub(ctx.keys_size as u64),
        None => 0,
    };

    let entity_bytes_after = (FILE_ENTITY_BASE_SIZE as u64)
        .saturating_add(body.new_contents_len.unwrap_or(ctx.size) as u64)
        .saturating_add(new_keys_size.unwrap_or(ctx.keys_size) as u64);

    let mut transmitted = (BASIC_ENTITY_ID_SIZE as u64)
        .saturating_add(
            body.new_contents_len
                .map(|l| encoded_len(l as usize) as u64)
                .unwrap_or(0),
        )
        .saturating_add(new_keys_size.unwrap_or(0) as u64);
    if body.new_expiry.is_some() {
        transmitted = transmitted.saturating_add(LONG_SIZE as u64);
    }

    Ok(UsageMetadata {
        base: base_meta(txn, 0),
        op: OpUsage::FileUpdate(FileUpdateMeta {
            new_contents_len: body.new_contents_len,
            new_keys_size,
            new_effective_lifetime: body
                .new_expiry
                .map(|e| lifetime_extension(e, ctx.expiry))
                .unwrap_or(0),
            byte_delta: contents_delta.saturating_add(keys_delta),
            entity_bytes_after,
            transmitted_bytes: transmitted,
        }),
    })
}

/* ↓↓↓ Shared helpers ↓↓↓ */

/// Serialized size of a file's access-control key list.
fn wacl_size(keys: &[Key]) -> u32 {
    (KEY_WRAPPER_SIZE
        + keys
            .iter()
            .map(|k| k.serialized_size())
            .sum::<usize>()) as u32
}

fn new_field(len: u32) -> u64 {
    if len > 0 {
        encoded_len(len as usize) as u64
    } else {
        0
    }
}
