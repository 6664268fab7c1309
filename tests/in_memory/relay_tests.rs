//! Relay contract tests for [`InMemoryBridgeMessageRepository`].

use crate::in_memory::helpers::{bridge_message, l1_repo, runtime};
use bridge_store::bridge_message::{
    adapters::memory::InMemoryBridgeMessageRepository,
    domain::{EventGuid, L1ToL2, L2ToL1, MessageHash, RelayStatus},
    ports::{BridgeMessageRepository, BridgeMessageStoreError, BridgeMessageView},
};
use rstest::rstest;
use std::io;
use std::sync::Arc;
use tokio::runtime::Runtime;

type L1Repo = InMemoryBridgeMessageRepository<L1ToL2>;

#[rstest]
fn relay_of_unknown_hash_reports_direction(runtime: io::Result<Runtime>) {
    let rt = runtime.expect("runtime creation");
    let repo = InMemoryBridgeMessageRepository::<L2ToL1>::new();
    let hash = MessageHash::from_bytes([0xaa; 32]);

    let err = rt
        .block_on(repo.mark_relayed(hash, EventGuid::new()))
        .expect_err("unknown hash must fail");

    assert_eq!(
        err.to_string(),
        format!("L2BridgeMessage with message hash 0x{} not found", "aa".repeat(32))
    );
    assert!(repo.is_empty().expect("lock healthy"));
}

#[rstest]
fn relay_then_conflicting_relay(runtime: io::Result<Runtime>, l1_repo: L1Repo) {
    let rt = runtime.expect("runtime creation");
    let message = bridge_message(0x01, 1);
    rt.block_on(l1_repo.store_messages(std::slice::from_ref(&message)))
        .expect("store");
    let first = EventGuid::new();

    rt.block_on(l1_repo.mark_relayed(message.message_hash(), first))
        .expect("first relay");
    rt.block_on(l1_repo.mark_relayed(message.message_hash(), first))
        .expect("same relay again");
    let result = rt.block_on(l1_repo.mark_relayed(message.message_hash(), EventGuid::new()));

    assert!(matches!(
        result,
        Err(BridgeMessageStoreError::AlreadyRelayed { relayed_by, .. }) if relayed_by == first
    ));
    let stored = rt
        .block_on(l1_repo.message(message.message_hash()))
        .expect("lookup")
        .expect("message exists");
    assert_eq!(stored.relay_status(), RelayStatus::Relayed(first));
}

#[rstest]
fn concurrent_relays_elect_one_winner(l1_repo: L1Repo) {
    let rt = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(4)
        .build()
        .expect("runtime creation");
    let message = bridge_message(0x01, 1);
    rt.block_on(l1_repo.store_messages(std::slice::from_ref(&message)))
        .expect("store");
    let repo = Arc::new(l1_repo);
    let hash = message.message_hash();

    let results = rt.block_on(async {
        let handles: Vec<_> = (0..16)
            .map(|_| {
                let repo = Arc::clone(&repo);
                tokio::spawn(async move { repo.mark_relayed(hash, EventGuid::new()).await })
            })
            .collect();
        let mut results = Vec::with_capacity(handles.len());
        for handle in handles {
            results.push(handle.await.expect("relay task"));
        }
        results
    });

    assert_eq!(results.iter().filter(|result| result.is_ok()).count(), 1);
    assert!(
        results
            .iter()
            .filter_map(|result| result.as_ref().err())
            .all(|err| matches!(err, BridgeMessageStoreError::AlreadyRelayed { .. }))
    );
}
