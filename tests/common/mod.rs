#![allow(dead_code)]

//! Shared fixtures for the integration suites: a canonical schedule, exchange
//! rates and transaction envelopes.

use pchain_fees::schedule::{ExchangeRate, FeePrices, FeeSchedule, ScheduleEntry};
use pchain_fees::transaction::{Txn, TxnBody};
use pchain_fees::types::{Operation, SigUsage, SubType, Timestamp};

/// Canonical consensus time used across the suites.
pub const NOW: Timestamp = 1_700_000_000;

/// One signature from the payer over a 64-byte signature map.
pub const SINGLE_SIG: SigUsage = SigUsage {
    num_sigs: 1,
    sig_map_bytes: 64,
    num_payer_sigs: 1,
};

/// Prices with every coefficient distinct, so a term landing in the wrong
/// slot shows up in expected values.
pub fn canonical_prices() -> FeePrices {
    FeePrices {
        base: 1_000_000,
        bpt_price: 10,
        vpt_price: 2_000,
        rbh_price: 3_600,
        sbh_price: 700,
        min: 0,
        max: u64::MAX,
    }
}

/// A schedule publishing [canonical_prices] for `(op, sub_type)` pairs,
/// effective well before [NOW].
pub fn schedule_for(pairs: &[(Operation, SubType)]) -> FeeSchedule {
    FeeSchedule::new(
        pairs
            .iter()
            .map(|&(operation, sub_type)| ScheduleEntry {
                operation,
                sub_type,
                effective_from: 0,
                prices: canonical_prices(),
            })
            .collect(),
    )
}

/// A rate under which one fee-schedule unit converts to exactly one tinybar,
/// keeping expected values readable.
pub fn identity_rate() -> ExchangeRate {
    ExchangeRate {
        hbar_equiv: 1_000,
        cent_equiv: 1,
        expiry: NOW + 3_600,
    }
}

/// A transaction envelope with no memo and a single payer signature.
pub fn txn(body: TxnBody) -> Txn {
    Txn {
        memo: String::new(),
        sig_usage: SINGLE_SIG,
        consensus_time: NOW,
        body,
    }
}
