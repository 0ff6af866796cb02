/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! Defines all components related to resource-usage metadata.
//!
//! A [UsageMetadata] records the resource delta one transaction causes: bytes
//! transmitted, bytes newly stored, verifications required and rent purchased.
//! It is built once per transaction by the operation's extractor, consumed once
//! by the [fee calculator](crate::calculator) and then discarded; nothing in
//! this module mutates after construction.

pub mod token;
pub use token::*;

pub mod crypto;
pub use crypto::*;

pub mod file;
pub use file::*;

use crate::constants::{BASIC_TX_BODY_SIZE, BASIC_TX_RECORD_SIZE, RECEIPT_STORAGE_SECS};
use crate::types::{Operation, SigUsage, SubType};

/// Resource footprint of the common transaction envelope, identical across
/// operations: the memo, any explicit transfer-record payload and the
/// signature map.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BaseTxnMeta {
    pub memo_bytes: u32,
    /// Serialized size of the transfer-record payload the transaction writes.
    /// Zero for every operation except crypto transfers.
    pub explicit_xfer_bytes: u32,
    pub sig_usage: SigUsage,
}

/// Immutable record of the resource delta caused by one transaction: the
/// common envelope footprint plus one operation-specific variant.
#[derive(Clone, Debug, PartialEq)]
pub struct UsageMetadata {
    pub base: BaseTxnMeta,
    pub op: OpUsage,
}

/// Closed union of the operation-specific usage variants. Every priced
/// operation has exactly one variant here and one extractor producing it.
#[derive(Clone, Debug, PartialEq)]
pub enum OpUsage {
    TokenCreate(TokenCreateMeta),
    TokenUpdate(TokenUpdateMeta),
    TokenMint(TokenMintMeta),
    TokenBurn(TokenBurnMeta),
    TokenWipe(TokenWipeMeta),
    TokenAssociate(TokenAssociateMeta),
    TokenDissociate(TokenDissociateMeta),
    TokenFreeze(TokenFreezeMeta),
    TokenUnfreeze(TokenUnfreezeMeta),
    TokenPause(TokenPauseMeta),
    TokenUnpause(TokenUnpauseMeta),
    TokenFeeScheduleUpdate(FeeScheduleUpdateMeta),
    CryptoCreate(CryptoCreateMeta),
    CryptoUpdate(CryptoUpdateMeta),
    CryptoTransfer(CryptoTransferMeta),
    CryptoDelete(CryptoDeleteMeta),
    FileCreate(FileCreateMeta),
    FileAppend(FileAppendMeta),
    FileUpdate(FileUpdateMeta),
}

/// The flat usage vector the calculator prices. All accumulation saturates;
/// the calculator widens to 128 bits before multiplying by prices.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UsageEstimate {
    pub sub_type: SubType,
    /// Bytes per transaction: serialized envelope plus operation payload.
    pub bpt: u64,
    /// Total signature verifications.
    pub vpt: u64,
    /// Verifications attributable to the payer.
    pub payer_vpt: u64,
    /// Net new bytes billed at the schedule's byte price.
    pub service_byte_delta: u64,
    /// Rent-byte-seconds: record retention plus entity rent extension.
    pub rbs: u64,
    /// Storage-byte-seconds for long-lived payload storage.
    pub sbs: u64,
}

impl UsageEstimate {
    fn new(sub_type: SubType) -> Self {
        Self {
            sub_type,
            bpt: 0,
            vpt: 0,
            payer_vpt: 0,
            service_byte_delta: 0,
            rbs: 0,
            sbs: 0,
        }
    }

    pub(crate) fn add_bpt(&mut self, bytes: u64) {
        self.bpt = self.bpt.saturating_add(bytes);
    }

    pub(crate) fn add_service_bytes(&mut self, bytes: u64) {
        self.service_byte_delta = self.service_byte_delta.saturating_add(bytes);
    }

    /// Charge `bytes` of rented storage for `secs` seconds.
    pub(crate) fn add_rbs(&mut self, bytes: u64, secs: u64) {
        self.rbs = self.rbs.saturating_add(bytes.saturating_mul(secs));
    }

    /// Charge `bytes` of long-lived storage for `secs` seconds.
    pub(crate) fn add_sbs(&mut self, bytes: u64, secs: u64) {
        self.sbs = self.sbs.saturating_add(bytes.saturating_mul(secs));
    }
}

impl UsageMetadata {
    /// The operation this metadata was extracted from.
    pub fn operation(&self) -> Operation {
        match &self.op {
            OpUsage::TokenCreate(_) => Operation::TokenCreate,
            OpUsage::TokenUpdate(_) => Operation::TokenUpdate,
            OpUsage::TokenMint(_) => Operation::TokenMint,
            OpUsage::TokenBurn(_) => Operation::TokenBurn,
            OpUsage::TokenWipe(_) => Operation::TokenWipe,
            OpUsage::TokenAssociate(_) => Operation::TokenAssociate,
            OpUsage::TokenDissociate(_) => Operation::TokenDissociate,
            OpUsage::TokenFreeze(_) => Operation::TokenFreeze,
            OpUsage::TokenUnfreeze(_) => Operation::TokenUnfreeze,
            OpUsage::TokenPause(_) => Operation::TokenPause,
            OpUsage::TokenUnpause(_) => Operation::TokenUnpause,
            OpUsage::TokenFeeScheduleUpdate(_) => Operation::TokenFeeScheduleUpdate,
            OpUsage::CryptoCreate(_) => Operation::CryptoCreate,
            OpUsage::CryptoUpdate(_) => Operation::CryptoUpdate,
            OpUsage::CryptoTransfer(_) => Operation::CryptoTransfer,
            OpUsage::CryptoDelete(_) => Operation::CryptoDelete,
            OpUsage::FileCreate(_) => Operation::FileCreate,
            OpUsage::FileAppend(_) => Operation::FileAppend,
            OpUsage::FileUpdate(_) => Operation::FileUpdate,
        }
    }

    /// The single pricing sub-type this transaction maps to.
    pub fn sub_type(&self) -> SubType {
        match &self.op {
            OpUsage::TokenCreate(m) => m.sub_type,
            OpUsage::TokenMint(m) => m.sub_type,
            OpUsage::TokenBurn(m) => m.sub_type,
            OpUsage::TokenWipe(m) => m.sub_type,
            OpUsage::CryptoTransfer(m) => m.sub_type,
            _ => SubType::Default,
        }
    }

    /// Serialized size of the submitted transaction envelope plus payload.
    pub fn bytes_per_transaction(&self) -> u64 {
        self.usage_estimate().bpt
    }

    /// Reduce the metadata to the flat vector the calculator prices.
    ///
    /// Every transaction first contributes its envelope usage: body and
    /// signature bytes to `bpt`, verification counts to `vpt`, and the record
    /// the network retains for [RECEIPT_STORAGE_SECS] to `rbs`. The
    /// operation-specific variant then layers its own contribution on top.
    pub fn usage_estimate(&self) -> UsageEstimate {
        let mut est = UsageEstimate::new(self.sub_type());

        let memo = self.base.memo_bytes as u64;
        let xfers = self.base.explicit_xfer_bytes as u64;
        est.add_bpt(
            (BASIC_TX_BODY_SIZE as u64)
                .saturating_add(memo)
                .saturating_add(xfers)
                .saturating_add(self.base.sig_usage.sig_map_bytes as u64),
        );
        est.vpt = self.base.sig_usage.num_sigs as u64;
        est.payer_vpt = self.base.sig_usage.num_payer_sigs as u64;
        est.add_rbs(
            (BASIC_TX_RECORD_SIZE as u64)
                .saturating_add(memo)
                .saturating_add(xfers),
            RECEIPT_STORAGE_SECS,
        );

        match &self.op {
            OpUsage::TokenCreate(m) => m.apply(&mut est),
            OpUsage::TokenUpdate(m) => m.apply(&mut est),
            OpUsage::TokenMint(m) => m.apply(&mut est),
            OpUsage::TokenBurn(m) => m.apply(&mut est),
            OpUsage::TokenWipe(m) => m.apply(&mut est),
            OpUsage::TokenAssociate(m) => m.apply(&mut est),
            OpUsage::TokenDissociate(m) => m.apply(&mut est),
            OpUsage::TokenFreeze(m) => m.apply(&mut est),
            OpUsage::TokenUnfreeze(m) => m.apply(&mut est),
            OpUsage::TokenPause(m) => m.apply(&mut est),
            OpUsage::TokenUnpause(m) => m.apply(&mut est),
            OpUsage::TokenFeeScheduleUpdate(m) => m.apply(&mut est),
            OpUsage::CryptoCreate(m) => m.apply(&mut est),
            OpUsage::CryptoUpdate(m) => m.apply(&mut est),
            OpUsage::CryptoTransfer(m) => m.apply(&mut est),
            OpUsage::CryptoDelete(m) => m.apply(&mut est),
            OpUsage::FileCreate(m) => m.apply(&mut est),
            OpUsage::FileAppend(m) => m.apply(&mut est),
            OpUsage::FileUpdate(m) => m.apply(&mut est),
        }

        est
    }
}

/// Envelope usage shared by every extractor. Operations that write no transfer
/// record pass 0 for `explicit_xfer_bytes`.
pub(crate) fn base_meta(txn: &crate::transaction::Txn, explicit_xfer_bytes: u32) -> BaseTxnMeta {
    BaseTxnMeta {
        memo_bytes: txn.memo.len() as u32,
        explicit_xfer_bytes,
        sig_usage: txn.sig_usage,
    }
}
