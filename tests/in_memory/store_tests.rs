//! Storage contract tests for [`InMemoryBridgeMessageRepository`].

use crate::in_memory::helpers::{bridge_message, l1_repo, runtime};
use alloy_primitives::U256;
use bridge_store::bridge_message::{
    adapters::memory::InMemoryBridgeMessageRepository,
    domain::{BridgeMessageFilter, EventGuid, L1ToL2, RelayStatus},
    ports::{BridgeMessageRepository, BridgeMessageStoreError, BridgeMessageView},
};
use rstest::rstest;
use std::io;
use tokio::runtime::Runtime;

type L1Repo = InMemoryBridgeMessageRepository<L1ToL2>;

#[rstest]
fn stored_batch_is_visible_by_hash(runtime: io::Result<Runtime>, l1_repo: L1Repo) {
    let rt = runtime.expect("runtime creation");
    let batch = vec![bridge_message(0x01, 1), bridge_message(0x02, 2)];

    rt.block_on(l1_repo.store_messages(&batch)).expect("store");

    for expected in &batch {
        let found = rt
            .block_on(l1_repo.message(expected.message_hash()))
            .expect("lookup");
        assert_eq!(found.as_ref(), Some(expected));
    }
    assert_eq!(l1_repo.len().expect("lock healthy"), 2);
}

#[rstest]
fn repository_stores_new_messages_unrelayed(runtime: io::Result<Runtime>, l1_repo: L1Repo) {
    let rt = runtime.expect("runtime creation");
    let mut premarked = bridge_message::<L1ToL2>(0xaa, 1);
    premarked
        .mark_relayed(EventGuid::new())
        .expect("relay on fresh message succeeds");

    rt.block_on(l1_repo.store_messages(std::slice::from_ref(&premarked)))
        .expect("store");
    let stored = rt
        .block_on(l1_repo.message(premarked.message_hash()))
        .expect("lookup")
        .expect("message stored");
    assert_eq!(stored.relay_status(), RelayStatus::Sent);

    let relay = EventGuid::new();
    rt.block_on(l1_repo.mark_relayed(premarked.message_hash(), relay))
        .expect("first observed relay succeeds");
    let relayed = rt
        .block_on(l1_repo.message(premarked.message_hash()))
        .expect("lookup")
        .expect("message stored");
    assert_eq!(relayed.relay_status(), RelayStatus::Relayed(relay));
}

#[rstest]
fn repository_rejects_hash_repeated_within_batch(runtime: io::Result<Runtime>, l1_repo: L1Repo) {
    let rt = runtime.expect("runtime creation");
    let message = bridge_message(0x01, 1);

    let result = rt.block_on(l1_repo.store_messages(&[message.clone(), message.clone()]));

    assert!(
        matches!(result, Err(BridgeMessageStoreError::DuplicateMessage(hash)) if hash == message.message_hash()),
        "repository should reject repeated hashes even without service validation"
    );
    assert!(l1_repo.is_empty().expect("lock healthy"));
}

#[rstest]
fn failed_batch_leaves_store_unchanged(runtime: io::Result<Runtime>, l1_repo: L1Repo) {
    let rt = runtime.expect("runtime creation");
    let existing = bridge_message(0x01, 1);
    rt.block_on(l1_repo.store_messages(std::slice::from_ref(&existing)))
        .expect("first store");

    let result = rt.block_on(l1_repo.store_messages(&[
        bridge_message(0x02, 2),
        bridge_message(0x03, 3),
        existing,
    ]));

    assert!(matches!(
        result,
        Err(BridgeMessageStoreError::DuplicateMessage(_))
    ));
    assert_eq!(l1_repo.len().expect("lock healthy"), 1);
}

#[rstest]
fn filter_ties_break_on_hash(runtime: io::Result<Runtime>, l1_repo: L1Repo) {
    let rt = runtime.expect("runtime creation");
    rt.block_on(l1_repo.store_messages(&[
        bridge_message(0x09, 4),
        bridge_message(0x04, 4),
        bridge_message(0x06, 4),
    ]))
    .expect("store");

    let found = rt
        .block_on(l1_repo.message_with_filter(&BridgeMessageFilter::new().with_nonce(U256::from(4_u8))))
        .expect("lookup")
        .expect("a message should match");

    assert_eq!(found.message_hash(), bridge_message::<L1ToL2>(0x04, 4).message_hash());
}

#[rstest]
fn clones_share_state(runtime: io::Result<Runtime>, l1_repo: L1Repo) {
    let rt = runtime.expect("runtime creation");
    let clone = l1_repo.clone();
    let message = bridge_message(0x01, 1);

    rt.block_on(clone.store_messages(std::slice::from_ref(&message)))
        .expect("store");

    let found = rt
        .block_on(l1_repo.message(message.message_hash()))
        .expect("lookup");
    assert_eq!(found, Some(message));
}
