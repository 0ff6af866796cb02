/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! Defines common data structures to be used inside this library, or from outside application.

use serde::{Deserialize, Serialize};

use crate::constants::{
    ECDSA_SECP256K1_KEY_BYTES, ED25519_KEY_BYTES, INT_SIZE, KEY_WRAPPER_SIZE,
};

/// Unix seconds. Consensus-assigned times and expiries are always in seconds.
pub type Timestamp = i64;

/// The ledger's smallest fee-currency unit.
pub type Tinybars = u64;

/// An entity number. Byte accounting only ever measures the serialized id
/// footprint, which is fixed, so the number itself never feeds a formula.
pub type EntityId = u64;

/// Every operation this engine can price. The fee schedule is keyed by this
/// enumeration together with [SubType].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operation {
    TokenCreate,
    TokenUpdate,
    TokenMint,
    TokenBurn,
    TokenWipe,
    TokenAssociate,
    TokenDissociate,
    TokenFreeze,
    TokenUnfreeze,
    TokenPause,
    TokenUnpause,
    TokenFeeScheduleUpdate,
    CryptoCreate,
    CryptoUpdate,
    CryptoTransfer,
    CryptoDelete,
    FileCreate,
    FileAppend,
    FileUpdate,
}

/// Pricing-relevant asset variant of an operation. A closed enumeration: every
/// transaction shape an extractor accepts maps to exactly one value, and no
/// "unspecified" value exists to reach the calculator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SubType {
    Default,
    TokenFungibleCommon,
    TokenNonFungibleUnique,
    TokenFungibleCommonWithCustomFees,
    TokenNonFungibleUniqueWithCustomFees,
}

/// Whether a token tracks a common fungible balance or unique serial numbers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenKind {
    FungibleCommon,
    NonFungibleUnique,
}

/// Signature footprint of a transaction. Verification itself happens upstream;
/// only the counts and the serialized map size reach pricing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SigUsage {
    /// Total signature verifications the transaction requires.
    pub num_sigs: u32,
    /// Serialized size of the signature map.
    pub sig_map_bytes: u32,
    /// Verifications attributable to the payer, which drive the node component.
    pub num_payer_sigs: u32,
}

impl SigUsage {
    pub fn new(num_sigs: u32, sig_map_bytes: u32, num_payer_sigs: u32) -> Self {
        Self {
            num_sigs,
            sig_map_bytes,
            num_payer_sigs,
        }
    }
}

/// Structural model of a key, sufficient for byte accounting. Storage rent is
/// driven by serialized key bytes, including list and threshold wrapper
/// overhead, never by the logical key count.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Key {
    Ed25519,
    EcdsaSecp256k1,
    KeyList(Vec<Key>),
    Threshold { threshold: u32, keys: Vec<Key> },
}

impl Key {
    /// Serialized size of this key tree in bytes.
    pub fn serialized_size(&self) -> usize {
        match self {
            Key::Ed25519 => KEY_WRAPPER_SIZE + ED25519_KEY_BYTES,
            Key::EcdsaSecp256k1 => KEY_WRAPPER_SIZE + ECDSA_SECP256K1_KEY_BYTES,
            Key::KeyList(keys) => KEY_WRAPPER_SIZE
                .saturating_add(keys.iter().map(Key::serialized_size).sum::<usize>()),
            Key::Threshold { keys, .. } => KEY_WRAPPER_SIZE
                .saturating_add(INT_SIZE)
                .saturating_add(keys.iter().map(Key::serialized_size).sum::<usize>()),
        }
    }
}
