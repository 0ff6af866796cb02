/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! Constants and formulas which are primitives used in the byte accounting and
//! pricing logic of the [usage extractors](crate::usage) and the
//! [fee calculator](crate::calculator).
//!
//! Sizes are serialized sizes on the wire and in state, never logical field
//! counts. The table below lists the accounting concept each constant backs.
//!
//! |Concept                        | Related Function / Constants          |
//! |:---                           |:---                                   |
//! |basic envelope size            | [BASIC_TX_BODY_SIZE]                  |
//! |record retained per txn        | [BASIC_TX_RECORD_SIZE], [RECEIPT_STORAGE_SECS] |
//! |entity id footprint            | [BASIC_ENTITY_ID_SIZE]                |
//! |present-field overhead         | [FIELD_HEADER_SIZE], [encoded_len]    |
//! |field growth billing           | [field_delta]                         |
//! |rent unit conversion           | [HRS_DIVISOR], [rbh]                  |
//! |schedule unit conversion       | [FEE_SCHEDULE_UNIT_DIVISOR]           |
//! |gossip surcharge               | [NETWORK_FEE_MULTIPLIER]              |
//! |lifetime clamping              | [lifetime_extension], [relative_lifetime] |

/* ↓↓↓ Primitive serialized sizes ↓↓↓ */

/// Serialized size of a 64-bit integer field.
pub const LONG_SIZE: usize = 8;
/// Serialized size of a 32-bit integer field.
pub const INT_SIZE: usize = 4;
/// Serialized size of a boolean field.
pub const BOOL_SIZE: usize = 4;
/// Overhead of one present-but-possibly-empty field (tag plus length prefix).
/// A field that is explicitly set to empty still occupies this many bytes,
/// which is why an "emptying" update is never free.
pub const FIELD_HEADER_SIZE: usize = 2;
/// Serialized size of an entity id (shard, realm and number, one long each).
pub const BASIC_ENTITY_ID_SIZE: usize = 24;

/* ↓↓↓ Transaction envelope and record sizes ↓↓↓ */

/// Serialized size of the common fields every transaction body carries
/// (payer id, valid-start time, valid duration, fee limit and node id),
/// before the memo, the operation payload and the signature map.
pub const BASIC_TX_BODY_SIZE: usize = 76;
/// Serialized size of the minimum transaction record retained by the network
/// after a transaction completes (receipt, ids, running hash and timestamps).
pub const BASIC_TX_RECORD_SIZE: usize = 132;
/// Number of seconds the network retains the record of a completed transaction.
pub const RECEIPT_STORAGE_SECS: u64 = 180;

/* ↓↓↓ Key serialization sizes ↓↓↓ */

/// Serialized size of an Ed25519 public key leaf.
pub const ED25519_KEY_BYTES: usize = 32;
/// Serialized size of a compressed ECDSA secp256k1 public key leaf.
pub const ECDSA_SECP256K1_KEY_BYTES: usize = 33;
/// Per-node overhead of a key-list or threshold-key wrapper.
pub const KEY_WRAPPER_SIZE: usize = 2;

/* ↓↓↓ Entity storage footprints ↓↓↓ */

/// Fixed serialized footprint of a token entity, excluding its variable-length
/// name, symbol, memo and keys: treasury and auto-renew ids, expiry,
/// auto-renew period, supply fields and status flags.
pub const TOKEN_ENTITY_BASE_SIZE: usize = 2 * BASIC_ENTITY_ID_SIZE + 4 * LONG_SIZE + 2 * BOOL_SIZE;
/// Serialized footprint of one account-token relationship
/// (token id, balance, and kyc/freeze flags).
pub const TOKEN_REL_SIZE: usize = BASIC_ENTITY_ID_SIZE + LONG_SIZE + 2 * BOOL_SIZE;
/// Fixed serialized footprint of an account entity, excluding its
/// variable-length memo and key.
pub const CRYPTO_ENTITY_BASE_SIZE: usize = 4 * LONG_SIZE + 3 * BOOL_SIZE + 3 * INT_SIZE;
/// Fixed serialized footprint of a file entity, excluding contents and keys.
pub const FILE_ENTITY_BASE_SIZE: usize = BASIC_ENTITY_ID_SIZE + 2 * LONG_SIZE + BOOL_SIZE;

/* ↓↓↓ Pricing unit conversions ↓↓↓ */

/// Seconds per hour, the divisor turning byte-seconds into byte-hours.
pub const HRS_DIVISOR: u64 = 3600;
/// Fee-schedule prices are expressed in thousandths of a tinycent; raw priced
/// usage is divided by this factor on the way to tinybars.
pub const FEE_SCHEDULE_UNIT_DIVISOR: u64 = 1000;
/// Fixed multiple the network component charges on top of the byte and
/// verification terms, covering gossip and bandwidth. Storage duration never
/// feeds this component.
pub const NETWORK_FEE_MULTIPLIER: u64 = 2;

/* ↓↓↓ Byte accounting formulas ↓↓↓ */

/// Serialized size of a present field of `len` content bytes. A present-but-empty
/// field still measures [FIELD_HEADER_SIZE], never 0.
pub const fn encoded_len(len: usize) -> usize {
    FIELD_HEADER_SIZE + len
}

/// Net growth in billed bytes when a field of extant length `old` is replaced by
/// a requested value of length `new`.
///
/// - `new == None`: the field is absent from the request and contributes 0.
/// - An extant length of 0 means the field is not stored at all, so a
///   present-but-empty replacement is pure growth of [FIELD_HEADER_SIZE] bytes.
/// - Shrinking a field contributes 0, never a negative amount.
pub const fn field_delta(new: Option<usize>, old: usize) -> u64 {
    match new {
        None => 0,
        Some(new_len) => {
            let new_encoded = encoded_len(new_len) as u64;
            let old_encoded = if old > 0 { encoded_len(old) as u64 } else { 0 };
            new_encoded.saturating_sub(old_encoded)
        }
    }
}

/// Rent-byte-hours purchased by `rbs` rent-byte-seconds, rounded up so that any
/// nonzero rent is charged at least one hour.
pub const fn rbh(rbs: u64) -> u64 {
    rbs.saturating_add(HRS_DIVISOR - 1).saturating_div(HRS_DIVISOR)
}

/// Seconds of rent extension purchased by moving an expiry from `old` to `new`.
/// Shortening an expiry purchases nothing; it never produces a negative charge.
pub const fn lifetime_extension(new: i64, old: i64) -> u64 {
    if new > old {
        (new - old) as u64
    } else {
        0
    }
}

/// Seconds remaining until `expiry` as seen from consensus time `now`, clamped
/// to zero for entities that are already past expiry.
pub const fn relative_lifetime(expiry: i64, now: i64) -> u64 {
    if expiry > now {
        (expiry - now) as u64
    } else {
        0
    }
}
