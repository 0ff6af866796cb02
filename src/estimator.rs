/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! The engine's entry point: dispatches a parsed transaction to its usage
//! extractor, selects the active schedule entry and prices the result.
//!
//! Everything here is a pure, synchronous function over immutable inputs.
//! Any number of transactions can be priced in parallel with no locking,
//! because each call receives its own context and schedule snapshots.

use crate::calculator::{fee_components, FeeComponents};
use crate::context::{
    ExtantCryptoContext, ExtantFeeScheduleContext, ExtantFileContext, ExtantTokenContext,
};
use crate::error::FeeError;
use crate::schedule::{ExchangeRate, FeeSchedule};
use crate::transaction::{Txn, TxnBody};
use crate::usage::{self, UsageMetadata};

/// The extant snapshot accompanying a transaction, matching the kind of entity
/// it mutates. Operations that create entities or only carry ids take
/// [Extant::None].
#[derive(Clone, Copy, Debug)]
pub enum Extant<'a> {
    None,
    Token(&'a ExtantTokenContext),
    Crypto(&'a ExtantCryptoContext),
    File(&'a ExtantFileContext),
    FeeSchedule(&'a ExtantFeeScheduleContext),
}

/// Builds the usage metadata for `txn`, routing to the operation's extractor.
/// A snapshot of the wrong entity kind is a caller contract violation.
pub fn usage_for(txn: &Txn, extant: &Extant) -> Result<UsageMetadata, FeeError> {
    match (&txn.body, *extant) {
        (TxnBody::TokenCreate(body), Extant::None) => usage::token_create_usage(txn, body),
        (TxnBody::TokenUpdate(body), Extant::Token(ctx)) => {
            usage::token_update_usage(txn, body, ctx)
        }
        (TxnBody::TokenMint(body), Extant::Token(ctx)) => usage::token_mint_usage(txn, body, ctx),
        (TxnBody::TokenBurn(body), Extant::None) => usage::token_burn_usage(txn, body),
        (TxnBody::TokenWipe(body), Extant::None) => usage::token_wipe_usage(txn, body),
        (TxnBody::TokenAssociate(body), Extant::Token(ctx)) => {
            usage::token_associate_usage(txn, body, ctx)
        }
        (TxnBody::TokenDissociate(body), Extant::None) => usage::token_dissociate_usage(txn, body),
        (TxnBody::TokenFreeze(body), Extant::None) => usage::token_freeze_usage(txn, body),
        (TxnBody::TokenUnfreeze(body), Extant::None) => usage::token_unfreeze_usage(txn, body),
        (TxnBody::TokenPause(body), Extant::None) => usage::token_pause_usage(txn, body),
        (TxnBody::TokenUnpause(body), Extant::None) => usage::token_unpause_usage(txn, body),
        (TxnBody::TokenFeeScheduleUpdate(body), Extant::FeeSchedule(ctx)) => {
            usage::fee_schedule_update_usage(txn, body, ctx)
        }
        (TxnBody::CryptoCreate(body), Extant::None) => usage::crypto_create_usage(txn, body),
        (TxnBody::CryptoUpdate(body), Extant::Crypto(ctx)) => {
            usage::crypto_update_usage(txn, body, ctx)
        }
        (TxnBody::CryptoTransfer(body), Extant::None) => usage::crypto_transfer_usage(txn, body),
        (TxnBody::CryptoDelete(body), Extant::None) => usage::crypto_delete_usage(txn, body),
        (TxnBody::FileCreate(body), Extant::None) => usage::file_create_usage(txn, body),
        (TxnBody::FileAppend(body), Extant::File(ctx)) => usage::file_append_usage(txn, body, ctx),
        (TxnBody::FileUpdate(body), Extant::File(ctx)) => usage::file_update_usage(txn, body, ctx),
        _ => Err(FeeError::InvalidUsageRequest(
            "extant snapshot does not match the operation's entity kind",
        )),
    }
}

/// Computes the full fee for one transaction: extract usage, select the
/// schedule entry active at the transaction's consensus time, and price it.
pub fn estimate_fee(
    txn: &Txn,
    extant: &Extant,
    schedule: &FeeSchedule,
    rate: &ExchangeRate,
) -> Result<FeeComponents, FeeError> {
    let meta = usage_for(txn, extant)?;
    let prices = schedule.prices_for(meta.operation(), meta.sub_type(), txn.consensus_time)?;
    fee_components(&meta, prices, rate, txn.consensus_time)
}
