/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! pchain-fees is the **usage-to-fee translation engine** sitting between
//! "transaction parsed and validated" and "transaction charged and executed".
//! It deterministically prices a transaction from the resource footprint it
//! imposes on the network and the published, versioned fee schedule.
//!
//! ```text
//! f(TX, CTX, S, R) -> F
//!
//! TX  = Parsed transaction (operation payload, memo, signature counts)
//! CTX = Extant context, the pre-transaction snapshot of the mutated entity
//! S   = Fee schedule entry active at the transaction's consensus time
//! R   = Exchange rate between schedule units and the fee currency
//! F   = Fee components {node, network, service}, in tinybars
//! ```
//!
//! ### Example
//!
//! ```rust
//! // prepare the parsed transaction (txn), the extant snapshot (extant),
//! // and the active schedule and rate, then estimate.
//! let fee = pchain_fees::estimate_fee(&txn, &extant, &schedule, &rate)?;
//! let total = fee.total()?;
//! ```
//!
//! In summary, a [usage extractor](usage) reduces the transaction and its
//! extant [context] into immutable usage metadata, and the [calculator]
//! combines that metadata with the [schedule] and exchange rate under the
//! byte-accounting [constants] of this library. Every component is a pure,
//! synchronous function over immutable values; computations for different
//! transactions share nothing and can run on any number of threads.

pub mod calculator;
pub use calculator::{fee_components, FeeComponents};

pub mod constants;

pub mod context;
pub use context::{
    ExtantCryptoContext, ExtantFeeScheduleContext, ExtantFileContext, ExtantTokenContext,
};

pub mod error;
pub use error::FeeError;

pub mod estimator;
pub use estimator::{estimate_fee, usage_for, Extant};

pub mod schedule;
pub use schedule::{ExchangeRate, FeePrices, FeeSchedule, ScheduleEntry};

pub mod transaction;

pub mod types;
pub use types::{Operation, SigUsage, SubType, Timestamp, Tinybars};

pub mod usage;
pub use usage::{UsageEstimate, UsageMetadata};
