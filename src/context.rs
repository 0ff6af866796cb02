//! Defines the extant-context snapshots a fee computation reads.
//! A snapshot captures the size and shape an entity already has before the
//! transaction applies, so extractors can bill growth rather than totals.
//! Snapshots are taken by the state-read layer when fee estimation begins,
//! passed in by value, consumed by a single computation and discarded.

use crate::types::Timestamp;

/// Pre-transaction shape of a token entity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ExtantTokenContext {
    pub symbol_len: u32,
    pub name_len: u32,
    pub memo_len: u32,
    /// Serialized size of all keys currently on the token.
    pub keys_size: u32,
    pub expiry: Timestamp,
    pub has_auto_renew_account: bool,
}

/// Pre-transaction shape of an account entity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ExtantCryptoContext {
    /// Serialized size of the account's key.
    pub key_size: u32,
    pub memo_len: u32,
    pub expiry: Timestamp,
    pub has_proxy: bool,
    pub num_token_rels: u32,
    pub max_auto_associations: u32,
}

/// Pre-transaction shape of a file entity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ExtantFileContext {
    /// Current contents size in bytes.
    pub size: u32,
    /// Serialized size of the file's access-control keys.
    pub keys_size: u32,
    pub expiry: Timestamp,
}

/// Pre-transaction shape of a token's custom fee schedule.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ExtantFeeScheduleContext {
    /// Serialized size of the currently stored fee schedule representation.
    pub num_bytes_in_repr: u32,
    /// Expiry of the token the schedule belongs to.
    pub expiry: Timestamp,
}
