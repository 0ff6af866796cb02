/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! Defines the published fee schedule this engine prices against, and the
//! exchange rate between schedule units and the ledger's fee currency.
//!
//! Both are operator-supplied, versioned configuration: this engine only ever
//! reads them. A schedule handed to a fee computation must never be mutated
//! in place; publishing a new schedule is an atomic reference swap by the
//! configuration-loading collaborator, so in-flight computations always see a
//! fully-formed table.

use serde::{Deserialize, Serialize};

use crate::constants::FEE_SCHEDULE_UNIT_DIVISOR;
use crate::error::FeeError;
use crate::types::{Operation, SubType, Timestamp};

/// Price coefficients for one operation and sub-type, in fee-schedule units
/// (thousandths of a tinycent) per resource unit.
///
/// `min` and `max` bound each priced fee component in tinybars, after exchange
/// conversion. A schedule with `min > max` is an operator error; clamping
/// resolves it in favor of `max`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeePrices {
    /// Flat term charged on the service component.
    pub base: u64,
    /// Price per byte transmitted or newly stored.
    pub bpt_price: u64,
    /// Price per signature verification.
    pub vpt_price: u64,
    /// Price per rent-byte-hour.
    pub rbh_price: u64,
    /// Price per storage-byte-hour.
    pub sbh_price: u64,
    /// Component floor in tinybars.
    pub min: u64,
    /// Component ceiling in tinybars.
    pub max: u64,
}

/// One versioned row of the fee schedule.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub operation: Operation,
    pub sub_type: SubType,
    /// Consensus time this entry takes effect.
    pub effective_from: Timestamp,
    pub prices: FeePrices,
}

/// The versioned table of published prices, keyed by
/// `(operation, sub_type, effective_from)`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FeeSchedule {
    entries: Vec<ScheduleEntry>,
}

impl FeeSchedule {
    pub fn new(entries: Vec<ScheduleEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[ScheduleEntry] {
        &self.entries
    }

    /// Selects the prices for `(operation, sub_type)` effective at consensus
    /// time `at`: the entry with the latest `effective_from ≤ at`. Using the
    /// transaction's consensus time, never the wall clock, keeps a fee
    /// reproducible after the fact.
    pub fn prices_for(
        &self,
        operation: Operation,
        sub_type: SubType,
        at: Timestamp,
    ) -> Result<&FeePrices, FeeError> {
        let entry = self
            .entries
            .iter()
            .filter(|e| e.operation == operation && e.sub_type == sub_type && e.effective_from <= at)
            .max_by_key(|e| e.effective_from)
            .ok_or(FeeError::UnknownScheduleEntry {
                operation,
                sub_type,
            })?;
        tracing::debug!(
            ?operation,
            ?sub_type,
            effective_from = entry.effective_from,
            "selected fee schedule entry"
        );
        Ok(&entry.prices)
    }
}

/// Conversion between fee-schedule units and tinybars: `hbar_equiv` ℏ trade
/// for `cent_equiv` cents until `expiry`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeRate {
    pub hbar_equiv: u32,
    pub cent_equiv: u32,
    /// Consensus time after which this rate may no longer be used.
    pub expiry: Timestamp,
}

impl ExchangeRate {
    /// Fails with [FeeError::StaleExchangeRate] when this rate expired before
    /// consensus time `at`.
    pub fn check_fresh(&self, at: Timestamp) -> Result<(), FeeError> {
        if self.expiry < at {
            return Err(FeeError::StaleExchangeRate {
                expiry: self.expiry,
                at,
            });
        }
        Ok(())
    }

    /// Converts `units` of raw priced usage (fee-schedule units) to tinybars,
    /// multiplying before dividing so truncation happens once.
    pub(crate) fn to_tinybars(&self, units: u128) -> Result<u128, FeeError> {
        if self.cent_equiv == 0 {
            return Err(FeeError::InvalidUsageRequest("exchange rate cent_equiv is zero"));
        }
        Ok(units
            .saturating_mul(self.hbar_equiv as u128)
            / (self.cent_equiv as u128 * FEE_SCHEDULE_UNIT_DIVISOR as u128))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(op: Operation, sub: SubType, from: Timestamp, base: u64) -> ScheduleEntry {
        ScheduleEntry {
            operation: op,
            sub_type: sub,
            effective_from: from,
            prices: FeePrices {
                base,
                max: u64::MAX,
                ..Default::default()
            },
        }
    }

    #[test]
    fn selects_latest_entry_not_after_consensus_time() {
        let schedule = FeeSchedule::new(vec![
            entry(Operation::TokenMint, SubType::TokenFungibleCommon, 100, 1),
            entry(Operation::TokenMint, SubType::TokenFungibleCommon, 200, 2),
            entry(Operation::TokenMint, SubType::TokenFungibleCommon, 300, 3),
        ]);

        let prices = |at| {
            schedule
                .prices_for(Operation::TokenMint, SubType::TokenFungibleCommon, at)
                .unwrap()
                .base
        };
        assert_eq!(prices(100), 1);
        assert_eq!(prices(250), 2);
        assert_eq!(prices(1_000), 3);
    }

    #[test]
    fn missing_entry_is_an_error() {
        let schedule = FeeSchedule::new(vec![entry(
            Operation::TokenMint,
            SubType::TokenFungibleCommon,
            100,
            1,
        )]);

        // wrong sub-type
        let err = schedule
            .prices_for(Operation::TokenMint, SubType::TokenNonFungibleUnique, 500)
            .unwrap_err();
        assert_eq!(
            err,
            FeeError::UnknownScheduleEntry {
                operation: Operation::TokenMint,
                sub_type: SubType::TokenNonFungibleUnique,
            }
        );

        // before the first effective time
        assert!(schedule
            .prices_for(Operation::TokenMint, SubType::TokenFungibleCommon, 99)
            .is_err());
    }

    #[test]
    fn rate_staleness_is_strict() {
        let rate = ExchangeRate {
            hbar_equiv: 1,
            cent_equiv: 12,
            expiry: 1_000,
        };
        assert!(rate.check_fresh(1_000).is_ok());
        assert!(rate.check_fresh(1_001).is_err());
    }
}
