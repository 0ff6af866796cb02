/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! The generic fee calculator: one usage metadata value, one fee schedule
//! entry and one exchange rate in, a three-part fee out.
//!
//! The computation is identical for every operation; this uniformity is the
//! reason usage extraction and fee calculation are separate components. All
//! arithmetic is integer — two nodes disagreeing on a fee by one unit is a
//! consensus-safety concern — and every multiplication runs in 128-bit
//! intermediates so nothing can wrap.

use crate::constants::{rbh, NETWORK_FEE_MULTIPLIER};
use crate::error::FeeError;
use crate::schedule::{ExchangeRate, FeePrices};
use crate::types::{Timestamp, Tinybars};
use crate::usage::UsageMetadata;

/// The three-part fee for one transaction, in tinybars. The caller debits the
/// payer and credits the submitting node, the network and the service accounts
/// respectively.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FeeComponents {
    pub node: Tinybars,
    pub network: Tinybars,
    pub service: Tinybars,
}

impl FeeComponents {
    /// Total billed fee. Components are individually clamped to the schedule's
    /// band, but their sum can still exceed the 64-bit range, which surfaces
    /// as [FeeError::ArithmeticOverflow] rather than wrapping.
    pub fn total(&self) -> Result<Tinybars, FeeError> {
        self.node
            .checked_add(self.network)
            .and_then(|v| v.checked_add(self.service))
            .ok_or(FeeError::ArithmeticOverflow)
    }
}

/// Computes the fee components owed for `meta` under `prices`, converting to
/// tinybars at `rate`.
///
/// The formula, with `E` the usage estimate and all terms in fee-schedule
/// units until conversion:
///
/// ```text
/// service = base + E.service_byte_delta·bpt_price
///         + rbh(E.rbs)·rbh_price + rbh(E.sbs)·sbh_price + E.vpt·vpt_price
/// network = NETWORK_FEE_MULTIPLIER · (E.bpt·bpt_price + E.vpt·vpt_price)
/// node    = E.bpt·bpt_price + E.payer_vpt·vpt_price
/// ```
///
/// The network component covers gossip and bandwidth and is independent of
/// storage duration; the node component reflects the submitting node's
/// workload, driven by the envelope size and payer verifications. Each
/// converted component is independently clamped to `[prices.min, prices.max]`.
pub fn fee_components(
    meta: &UsageMetadata,
    prices: &FeePrices,
    rate: &ExchangeRate,
    at: Timestamp,
) -> Result<FeeComponents, FeeError> {
    rate.check_fresh(at)?;
    let est = meta.usage_estimate();

    let bpt_term = est.bpt as u128 * prices.bpt_price as u128;
    let vpt_term = est.vpt as u128 * prices.vpt_price as u128;
    let payer_vpt_term = est.payer_vpt as u128 * prices.vpt_price as u128;

    let service_raw = prices.base as u128
        + est.service_byte_delta as u128 * prices.bpt_price as u128
        + rbh(est.rbs) as u128 * prices.rbh_price as u128
        + rbh(est.sbs) as u128 * prices.sbh_price as u128
        + vpt_term;
    let network_raw = NETWORK_FEE_MULTIPLIER as u128 * (bpt_term + vpt_term);
    let node_raw = bpt_term + payer_vpt_term;

    let components = FeeComponents {
        node: clamped(rate.to_tinybars(node_raw)?, prices),
        network: clamped(rate.to_tinybars(network_raw)?, prices),
        service: clamped(rate.to_tinybars(service_raw)?, prices),
    };
    tracing::debug!(
        node = components.node,
        network = components.network,
        service = components.service,
        "computed fee components"
    );
    Ok(components)
}

/// Clamp a converted component into the schedule's band. The `max` bound wins
/// over a misconfigured `min > max`.
fn clamped(tinybars: u128, prices: &FeePrices) -> Tinybars {
    let bounded = tinybars.max(prices.min as u128).min(prices.max as u128);
    // cannot exceed prices.max, which is a u64
    bounded as Tinybars
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_applies_floor_then_ceiling() {
        let prices = FeePrices {
            min: 10,
            max: 100,
            ..Default::default()
        };
        assert_eq!(clamped(0, &prices), 10);
        assert_eq!(clamped(50, &prices), 50);
        assert_eq!(clamped(1_000, &prices), 100);
    }

    #[test]
    fn misconfigured_band_resolves_to_max() {
        let prices = FeePrices {
            min: 100,
            max: 10,
            ..Default::default()
        };
        assert_eq!(clamped(50, &prices), 10);
    }

    #[test]
    fn total_overflow_is_an_error() {
        let fee = FeeComponents {
            node: u64::MAX,
            network: 1,
            service: 0,
        };
        assert_eq!(fee.total(), Err(FeeError::ArithmeticOverflow));
    }
}
