//! Behavior of the usage extractors: byte accounting, sub-type selection and
//! rejection of self-contradictory shapes.

use pchain_fees::constants::{
    BASIC_ENTITY_ID_SIZE, BASIC_TX_BODY_SIZE, BASIC_TX_RECORD_SIZE, CRYPTO_ENTITY_BASE_SIZE,
    FIELD_HEADER_SIZE, FILE_ENTITY_BASE_SIZE, LONG_SIZE, RECEIPT_STORAGE_SECS,
    TOKEN_ENTITY_BASE_SIZE, TOKEN_REL_SIZE,
};
use pchain_fees::context::{
    ExtantCryptoContext, ExtantFeeScheduleContext, ExtantFileContext, ExtantTokenContext,
};
use pchain_fees::error::FeeError;
use pchain_fees::transaction::{
    CryptoCreateBody, CryptoDeleteBody, CryptoTransferBody, CryptoUpdateBody, FileAppendBody,
    FileUpdateBody, TokenAssociateBody, TokenBurnBody, TokenCreateBody, TokenDissociateBody,
    TokenFeeScheduleUpdateBody, TokenFreezeBody, TokenMintBody, TokenPauseBody, TokenUnfreezeBody,
    TokenUnpauseBody, TokenUpdateBody, TxnBody,
};
use pchain_fees::types::{Key, SubType, TokenKind};
use pchain_fees::usage::{TokenUpdateMeta, TokenUpdateParts};
use pchain_fees::{usage_for, Extant};

mod common;
use common::{txn, NOW, SINGLE_SIG};

fn a_token_context() -> ExtantTokenContext {
    ExtantTokenContext {
        symbol_len: 4,
        name_len: 12,
        memo_len: 4,
        keys_size: 34,
        expiry: NOW + 7_776_000,
        has_auto_renew_account: false,
    }
}

/// A memo-only update bills exactly the memo growth, and an unchanged expiry
/// purchases no rent extension.
#[test]
fn token_update_memo_growth_only() {
    let body = TokenUpdateBody {
        token: 1_234,
        memo: Some("0123456789".to_string()),
        ..Default::default()
    };
    let ctx = a_token_context();
    let meta = usage_for(
        &txn(TxnBody::TokenUpdate(body)),
        &Extant::Token(&ctx),
    )
    .unwrap();

    let est = meta.usage_estimate();
    // memo went from 4 to 10 content bytes; headers cancel in the delta
    assert_eq!(est.service_byte_delta, 6);
    // nothing extends the entity's life, so only the record is rented
    assert_eq!(est.rbs, RECEIPT_STORAGE_SECS * BASIC_TX_RECORD_SIZE as u64);
    assert_eq!(est.sbs, 0);
    // envelope + sig map + token id + encoded memo on the wire
    assert_eq!(
        est.bpt,
        (BASIC_TX_BODY_SIZE + 64 + BASIC_ENTITY_ID_SIZE + FIELD_HEADER_SIZE + 10) as u64
    );
    assert_eq!(est.vpt, 1);
    assert_eq!(est.sub_type, SubType::Default);
}

/// Emptying a stored field is not free: the explicit empty value still
/// occupies its minimum encoded length.
#[test]
fn token_update_explicit_empty_memo_is_not_free() {
    let mut ctx = a_token_context();
    ctx.memo_len = 0;
    let body = TokenUpdateBody {
        token: 1_234,
        memo: Some(String::new()),
        ..Default::default()
    };
    let meta = usage_for(&txn(TxnBody::TokenUpdate(body)), &Extant::Token(&ctx)).unwrap();
    assert_eq!(
        meta.usage_estimate().service_byte_delta,
        FIELD_HEADER_SIZE as u64
    );

    // whereas an absent memo contributes nothing at all
    let body = TokenUpdateBody {
        token: 1_234,
        ..Default::default()
    };
    let meta = usage_for(&txn(TxnBody::TokenUpdate(body)), &Extant::Token(&ctx)).unwrap();
    assert_eq!(meta.usage_estimate().service_byte_delta, 0);
}

/// Shortening the expiry purchases nothing; extending it rents the post-update
/// entity footprint for the extension.
#[test]
fn token_update_expiry_extension_is_clamped() {
    let ctx = a_token_context();

    let shortened = TokenUpdateBody {
        token: 1_234,
        expiry: Some(ctx.expiry - 1_000),
        ..Default::default()
    };
    let meta = usage_for(&txn(TxnBody::TokenUpdate(shortened)), &Extant::Token(&ctx)).unwrap();
    assert_eq!(
        meta.usage_estimate().rbs,
        RECEIPT_STORAGE_SECS * BASIC_TX_RECORD_SIZE as u64
    );

    let extended = TokenUpdateBody {
        token: 1_234,
        expiry: Some(ctx.expiry + 3_600),
        ..Default::default()
    };
    let meta = usage_for(&txn(TxnBody::TokenUpdate(extended)), &Extant::Token(&ctx)).unwrap();
    let est = meta.usage_estimate();
    assert!(est.rbs > RECEIPT_STORAGE_SECS * BASIC_TX_RECORD_SIZE as u64);
}

/// Conflicting auto-renew flags are a caller contract violation, rejected at
/// metadata construction; no usage value exists afterwards.
#[test]
fn token_update_auto_renew_exclusivity() {
    let body = TokenUpdateBody {
        token: 1_234,
        auto_renew_account: Some(5_678),
        remove_auto_renew_account: true,
        ..Default::default()
    };
    let ctx = a_token_context();
    let err = usage_for(&txn(TxnBody::TokenUpdate(body)), &Extant::Token(&ctx)).unwrap_err();
    assert!(matches!(err, FeeError::InvalidUsageRequest(_)));

    // the constructor itself enforces the invariant
    let parts = TokenUpdateParts {
        has_auto_renew_account: true,
        remove_auto_renew_account: true,
        ..Default::default()
    };
    assert!(TokenUpdateMeta::new(parts).is_err());
}

/// A metadata list means non-fungible-unique, a bare amount fungible-common;
/// ambiguous shapes never reach the calculator.
#[test]
fn mint_sub_type_follows_transaction_shape() {
    let ctx = a_token_context();

    let fungible = TokenMintBody {
        token: 1_234,
        amount: Some(1_000),
        metadata: vec![],
    };
    let meta = usage_for(&txn(TxnBody::TokenMint(fungible)), &Extant::Token(&ctx)).unwrap();
    assert_eq!(meta.sub_type(), SubType::TokenFungibleCommon);

    let unique = TokenMintBody {
        token: 1_234,
        amount: None,
        metadata: vec![vec![0u8; 100]],
    };
    let meta = usage_for(&txn(TxnBody::TokenMint(unique)), &Extant::Token(&ctx)).unwrap();
    assert_eq!(meta.sub_type(), SubType::TokenNonFungibleUnique);
    // minted metadata is stored for the token's remaining lifetime
    let est = meta.usage_estimate();
    assert!(est.rbs > RECEIPT_STORAGE_SECS * BASIC_TX_RECORD_SIZE as u64);

    let both = TokenMintBody {
        token: 1_234,
        amount: Some(1),
        metadata: vec![vec![1]],
    };
    assert!(usage_for(&txn(TxnBody::TokenMint(both)), &Extant::Token(&ctx)).is_err());

    let neither = TokenMintBody {
        token: 1_234,
        amount: None,
        metadata: vec![],
    };
    assert!(usage_for(&txn(TxnBody::TokenMint(neither)), &Extant::Token(&ctx)).is_err());
}

/// Unique burns are priced per serial number.
#[test]
fn burn_counts_serial_numbers() {
    let body = TokenBurnBody {
        token: 1_234,
        amount: None,
        serial_numbers: vec![1, 2, 3, 4, 5],
    };
    let meta = usage_for(&txn(TxnBody::TokenBurn(body)), &Extant::None).unwrap();
    assert_eq!(meta.sub_type(), SubType::TokenNonFungibleUnique);
    let est = meta.usage_estimate();
    assert_eq!(est.service_byte_delta, (5 * LONG_SIZE) as u64);

    let fungible = TokenBurnBody {
        token: 1_234,
        amount: Some(10_000),
        serial_numbers: vec![],
    };
    let meta = usage_for(&txn(TxnBody::TokenBurn(fungible)), &Extant::None).unwrap();
    assert_eq!(meta.sub_type(), SubType::TokenFungibleCommon);
    assert_eq!(meta.usage_estimate().service_byte_delta, LONG_SIZE as u64);
}

/// Each new relationship is rented for the token's remaining lifetime.
#[test]
fn associate_rents_relationships() {
    let mut ctx = a_token_context();
    ctx.expiry = NOW + 1_000;
    let body = TokenAssociateBody {
        account: 42,
        tokens: vec![1, 2, 3],
    };
    let meta = usage_for(&txn(TxnBody::TokenAssociate(body)), &Extant::Token(&ctx)).unwrap();
    let est = meta.usage_estimate();
    assert_eq!(
        est.rbs,
        RECEIPT_STORAGE_SECS * BASIC_TX_RECORD_SIZE as u64 + 3 * TOKEN_REL_SIZE as u64 * 1_000
    );
    assert_eq!(est.service_byte_delta, 3 * TOKEN_REL_SIZE as u64);
}

/// The schedule-update fee depends on the total assembled representation,
/// regardless of how many calls assembled it.
#[test]
fn fee_schedule_update_is_priced_by_total_repr_bytes() {
    let ctx = ExtantFeeScheduleContext {
        num_bytes_in_repr: 200,
        expiry: NOW + 3_600,
    };

    let chunks: [u32; 2] = [500, 500];
    let assembled = TokenFeeScheduleUpdateBody {
        token: 1_234,
        num_bytes_in_new_fee_schedule_repr: chunks.iter().sum(),
    };
    let direct = TokenFeeScheduleUpdateBody {
        token: 1_234,
        num_bytes_in_new_fee_schedule_repr: 1_000,
    };

    let assembled_meta = usage_for(
        &txn(TxnBody::TokenFeeScheduleUpdate(assembled)),
        &Extant::FeeSchedule(&ctx),
    )
    .unwrap();
    let direct_meta = usage_for(
        &txn(TxnBody::TokenFeeScheduleUpdate(direct)),
        &Extant::FeeSchedule(&ctx),
    )
    .unwrap();
    assert_eq!(assembled_meta, direct_meta);

    let est = assembled_meta.usage_estimate();
    // growth over the 200 extant bytes feeds the byte price
    assert_eq!(est.service_byte_delta, 800);
    // the full new representation is rented for the token's remaining life
    assert_eq!(
        est.rbs,
        RECEIPT_STORAGE_SECS * BASIC_TX_RECORD_SIZE as u64 + 1_000 * 3_600
    );
}

/// Transfer sub-type partition: exactly one sub-type per shape, unique
/// ownership changes dominating, custom fees upgrading.
#[test]
fn transfer_sub_type_partition() {
    let cases = [
        (CryptoTransferBody { num_hbar_adjustments: 2, ..Default::default() }, SubType::Default),
        (
            CryptoTransferBody {
                num_token_adjustments: 2,
                num_tokens_involved: 1,
                ..Default::default()
            },
            SubType::TokenFungibleCommon,
        ),
        (
            CryptoTransferBody {
                num_token_adjustments: 2,
                num_tokens_involved: 1,
                involves_custom_fees: true,
                ..Default::default()
            },
            SubType::TokenFungibleCommonWithCustomFees,
        ),
        (
            CryptoTransferBody {
                num_ownership_changes: 1,
                num_tokens_involved: 1,
                ..Default::default()
            },
            SubType::TokenNonFungibleUnique,
        ),
        (
            // mixed transfers price as the unique sub-type
            CryptoTransferBody {
                num_token_adjustments: 2,
                num_ownership_changes: 1,
                num_tokens_involved: 2,
                involves_custom_fees: true,
                ..Default::default()
            },
            SubType::TokenNonFungibleUniqueWithCustomFees,
        ),
    ];
    for (body, expected) in cases {
        let meta = usage_for(&txn(TxnBody::CryptoTransfer(body)), &Extant::None).unwrap();
        assert_eq!(meta.sub_type(), expected, "shape {body:?}");
    }
}

/// The transfer-record payload flows through the envelope usage.
#[test]
fn transfer_record_bytes_reach_the_estimate() {
    let body = CryptoTransferBody {
        num_hbar_adjustments: 2,
        ..Default::default()
    };
    let meta = usage_for(&txn(TxnBody::CryptoTransfer(body)), &Extant::None).unwrap();
    let record_bytes = 2 * (BASIC_ENTITY_ID_SIZE + LONG_SIZE) as u64;
    assert_eq!(meta.base.explicit_xfer_bytes as u64, record_bytes);

    let est = meta.usage_estimate();
    assert_eq!(est.bpt, (BASIC_TX_BODY_SIZE + 64) as u64 + record_bytes);
    assert_eq!(
        est.rbs,
        RECEIPT_STORAGE_SECS * (BASIC_TX_RECORD_SIZE as u64 + record_bytes)
    );
}

/// Appended file bytes are long-lived storage, billed for the remaining life.
#[test]
fn file_append_accrues_storage_byte_seconds() {
    let ctx = ExtantFileContext {
        size: 5_000,
        keys_size: 70,
        expiry: NOW + 7_200,
    };
    let body = FileAppendBody {
        file: 9,
        bytes_added: 1_000,
    };
    let meta = usage_for(&txn(TxnBody::FileAppend(body)), &Extant::File(&ctx)).unwrap();
    let est = meta.usage_estimate();
    assert_eq!(est.sbs, 1_000 * 7_200);
    assert_eq!(est.service_byte_delta, 1_000);
    assert_eq!(
        est.bpt,
        (BASIC_TX_BODY_SIZE + 64 + BASIC_ENTITY_ID_SIZE + 1_000) as u64
    );
}

/// A snapshot of the wrong entity kind is rejected, never silently ignored.
#[test]
fn mismatched_extant_snapshot_is_rejected() {
    let body = TokenUpdateBody {
        token: 1_234,
        ..Default::default()
    };
    let err = usage_for(&txn(TxnBody::TokenUpdate(body)), &Extant::None).unwrap_err();
    assert!(matches!(err, FeeError::InvalidUsageRequest(_)));
}

/// Negative durations are defensive failures, not silently clamped.
#[test]
fn negative_auto_renew_period_is_rejected() {
    let body = TokenUpdateBody {
        token: 1_234,
        auto_renew_period: Some(-1),
        ..Default::default()
    };
    let ctx = a_token_context();
    assert!(matches!(
        usage_for(&txn(TxnBody::TokenUpdate(body)), &Extant::Token(&ctx)),
        Err(FeeError::InvalidUsageRequest(_))
    ));
}

/// Creating a token stores everything it transmits, rents the new entity and
/// its treasury relation for the purchased period, and partitions sub-types
/// by token kind and custom-fee presence.
#[test]
fn token_create_rents_the_new_entity() {
    let body = TokenCreateBody {
        name: "012345678912".to_string(),
        symbol: "ABCD".to_string(),
        memo: String::new(),
        kind: TokenKind::FungibleCommon,
        treasury: 1_001,
        admin_key: Some(Key::Ed25519),
        kyc_key: None,
        freeze_key: None,
        wipe_key: None,
        supply_key: None,
        fee_schedule_key: None,
        pause_key: None,
        custom_fee_bytes: 0,
        auto_renew_account: None,
        auto_renew_period: 7_776_000,
    };

    let meta = usage_for(&txn(TxnBody::TokenCreate(body.clone())), &Extant::None).unwrap();
    assert_eq!(meta.sub_type(), SubType::TokenFungibleCommon);

    let est = meta.usage_estimate();
    // name and symbol encoded, the admin key, and nothing for the empty memo
    let new_bytes = (FIELD_HEADER_SIZE + 12 + FIELD_HEADER_SIZE + 4 + 34) as u64;
    assert_eq!(est.service_byte_delta, new_bytes);
    assert_eq!(
        est.rbs,
        RECEIPT_STORAGE_SECS * BASIC_TX_RECORD_SIZE as u64
            + (TOKEN_ENTITY_BASE_SIZE as u64 + new_bytes) * 7_776_000
            + TOKEN_REL_SIZE as u64 * 7_776_000
    );

    let mut unique = body;
    unique.kind = TokenKind::NonFungibleUnique;
    unique.custom_fee_bytes = 64;
    let meta = usage_for(&txn(TxnBody::TokenCreate(unique)), &Extant::None).unwrap();
    assert_eq!(
        meta.sub_type(),
        SubType::TokenNonFungibleUniqueWithCustomFees
    );
}

/// Account creation rents the new entity for the purchased period; the key and
/// memo are its variable-size parts.
#[test]
fn crypto_create_bills_key_and_memo() {
    let body = CryptoCreateBody {
        key: Key::Ed25519,
        memo: "abc".to_string(),
        auto_renew_period: 7_776_000,
        max_auto_associations: 0,
    };
    let meta = usage_for(&txn(TxnBody::CryptoCreate(body)), &Extant::None).unwrap();
    let est = meta.usage_estimate();

    let new_bytes = (34 + FIELD_HEADER_SIZE + 3) as u64;
    assert_eq!(est.service_byte_delta, new_bytes);
    assert_eq!(
        est.rbs,
        RECEIPT_STORAGE_SECS * BASIC_TX_RECORD_SIZE as u64
            + (CRYPTO_ENTITY_BASE_SIZE as u64 + new_bytes) * 7_776_000
    );
}

/// Replacing an account key bills the growth over the extant key and rents the
/// post-update footprint for any purchased extension.
#[test]
fn crypto_update_bills_key_growth_and_extension() {
    let ctx = ExtantCryptoContext {
        key_size: 34,
        memo_len: 4,
        expiry: NOW + 1_000,
        has_proxy: false,
        num_token_rels: 0,
        max_auto_associations: 0,
    };
    let body = CryptoUpdateBody {
        account: 42,
        key: Some(Key::Threshold {
            threshold: 1,
            keys: vec![Key::Ed25519, Key::Ed25519],
        }),
        expiry: Some(NOW + 2_000),
        ..Default::default()
    };
    let meta = usage_for(&txn(TxnBody::CryptoUpdate(body)), &Extant::Crypto(&ctx)).unwrap();
    let est = meta.usage_estimate();

    // threshold key of two leaves: 2 + 4 + 2·34 = 74 bytes, growing by 40
    assert_eq!(est.service_byte_delta, 74 - 34);
    let entity_after = CRYPTO_ENTITY_BASE_SIZE as u64 + 74 + (FIELD_HEADER_SIZE + 4) as u64;
    assert_eq!(
        est.rbs,
        RECEIPT_STORAGE_SECS * BASIC_TX_RECORD_SIZE as u64 + entity_after * 1_000
    );
}

/// Growing file contents bills the growth and stores the post-update footprint
/// for the purchased extension.
#[test]
fn file_update_bills_content_growth() {
    let ctx = ExtantFileContext {
        size: 1_000,
        keys_size: 70,
        expiry: NOW + 100,
    };
    let body = FileUpdateBody {
        file: 9,
        new_contents_len: Some(1_500),
        new_expiry: Some(NOW + 200),
        ..Default::default()
    };
    let meta = usage_for(&txn(TxnBody::FileUpdate(body)), &Extant::File(&ctx)).unwrap();
    let est = meta.usage_estimate();

    assert_eq!(est.service_byte_delta, 500);
    assert_eq!(
        est.sbs,
        (FILE_ENTITY_BASE_SIZE as u64 + 1_500 + 70) * 100
    );
}

/// Operations that only carry ids bill the envelope and those ids; they store
/// nothing new.
#[test]
fn flat_operations_store_nothing() {
    let bodies = [
        TxnBody::TokenFreeze(TokenFreezeBody { token: 1, account: 2 }),
        TxnBody::TokenUnfreeze(TokenUnfreezeBody { token: 1, account: 2 }),
        TxnBody::TokenPause(TokenPauseBody { token: 1 }),
        TxnBody::TokenUnpause(TokenUnpauseBody { token: 1 }),
        TxnBody::TokenDissociate(TokenDissociateBody {
            account: 2,
            tokens: vec![1, 3],
        }),
        TxnBody::CryptoDelete(CryptoDeleteBody {
            account: 2,
            transfer_account: 3,
        }),
    ];
    for body in bodies {
        let meta = usage_for(&txn(body), &Extant::None).unwrap();
        let est = meta.usage_estimate();
        assert_eq!(est.service_byte_delta, 0, "{:?}", meta.operation());
        assert_eq!(est.sbs, 0, "{:?}", meta.operation());
        assert_eq!(
            est.rbs,
            RECEIPT_STORAGE_SECS * BASIC_TX_RECORD_SIZE as u64,
            "{:?}",
            meta.operation()
        );
        assert!(est.bpt > (BASIC_TX_BODY_SIZE + 64) as u64);
        assert_eq!(est.sub_type, SubType::Default);
    }
}

/// The memo on the envelope counts toward every operation's usage.
#[test]
fn envelope_memo_reaches_base_usage() {
    let mut t = txn(TxnBody::TokenPause(TokenPauseBody { token: 7 }));
    t.memo = "settling invoices".to_string();
    let meta = usage_for(&t, &Extant::None).unwrap();
    assert_eq!(meta.base.memo_bytes, 17);
    assert_eq!(meta.base.sig_usage, SINGLE_SIG);
    let est = meta.usage_estimate();
    assert_eq!(
        est.bpt,
        (BASIC_TX_BODY_SIZE + 17 + 64 + BASIC_ENTITY_ID_SIZE) as u64
    );
}
