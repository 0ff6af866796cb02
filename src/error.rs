/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! error defines the error taxonomy of a fee computation.
//!
//! Every variant is local and non-retriable: it signals either an upstream
//! validation gap or a configuration gap, and the same inputs will fail the
//! same way again. Callers must surface these instead of defaulting a fee,
//! since an under-charge and an over-charge are both defects.

use crate::types::{Operation, SubType, Timestamp};

/// Descriptive error definitions of a fee computation.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum FeeError {
    /// The extractor received a self-contradictory transaction shape, e.g.
    /// conflicting auto-renew flags, a mint that is both fungible and unique,
    /// or a negative supplied duration. Should be unreachable given upstream
    /// schema validation; never resolved silently.
    #[error("invalid usage request: {0}")]
    InvalidUsageRequest(&'static str),

    /// No price is published for this operation and sub-type at the
    /// transaction's consensus time.
    #[error("no fee schedule entry for {operation:?}/{sub_type:?}")]
    UnknownScheduleEntry {
        operation: Operation,
        sub_type: SubType,
    },

    /// The supplied exchange rate expired before the transaction's consensus
    /// time. This check is the calculator's only awareness of time.
    #[error("exchange rate expired at {expiry}, consensus time is {at}")]
    StaleExchangeRate { expiry: Timestamp, at: Timestamp },

    /// A checked total exceeded the 64-bit fee range. Intermediates widen to
    /// 128 bits, so this only surfaces when summing already-clamped components.
    #[error("fee computation overflowed the 64-bit fee range")]
    ArithmeticOverflow,
}
