//! In-memory repository for bridge message tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::bridge_message::{
    domain::{
        BridgeMessageFilter, DirectedBridgeMessage, EventGuid, MessageDirection, MessageHash,
        RelayConflict,
    },
    ports::{
        BridgeMessageRepository, BridgeMessageStoreError, BridgeMessageStoreResult,
        BridgeMessageView,
    },
};

/// Thread-safe in-memory bridge message repository for one direction.
///
/// Every operation runs under a single lock acquisition, so batches are
/// all-or-nothing and relay marking cannot lose updates.
#[derive(Debug, Clone, Default)]
pub struct InMemoryBridgeMessageRepository<D: MessageDirection> {
    state: Arc<RwLock<HashMap<MessageHash, DirectedBridgeMessage<D>>>>,
}

impl<D: MessageDirection> InMemoryBridgeMessageRepository<D> {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Returns the number of stored messages.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeMessageStoreError::Persistence`] when the lock is
    /// poisoned.
    pub fn len(&self) -> BridgeMessageStoreResult<usize> {
        let state = self.state.read().map_err(|err| {
            BridgeMessageStoreError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(state.len())
    }

    /// Returns `true` when no message is stored.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeMessageStoreError::Persistence`] when the lock is
    /// poisoned.
    pub fn is_empty(&self) -> BridgeMessageStoreResult<bool> {
        self.len().map(|count| count == 0)
    }
}

#[async_trait]
impl<D: MessageDirection> BridgeMessageView<D> for InMemoryBridgeMessageRepository<D> {
    async fn message_with_filter(
        &self,
        filter: &BridgeMessageFilter,
    ) -> BridgeMessageStoreResult<Option<DirectedBridgeMessage<D>>> {
        let state = self.state.read().map_err(|err| {
            BridgeMessageStoreError::persistence(std::io::Error::other(err.to_string()))
        })?;
        let found = state
            .values()
            .filter(|stored| filter.matches(stored.message()))
            .min_by_key(|stored| (stored.message().nonce(), stored.message_hash()))
            .cloned();
        Ok(found)
    }
}

#[async_trait]
impl<D: MessageDirection> BridgeMessageRepository<D> for InMemoryBridgeMessageRepository<D> {
    /// New records are always stored unrelayed.
    async fn store_messages(
        &self,
        messages: &[DirectedBridgeMessage<D>],
    ) -> BridgeMessageStoreResult<()> {
        let mut state = self.state.write().map_err(|err| {
            BridgeMessageStoreError::persistence(std::io::Error::other(err.to_string()))
        })?;

        let mut staged = HashMap::with_capacity(messages.len());
        for message in messages {
            let hash = message.message_hash();
            if state.contains_key(&hash) || staged.contains_key(&hash) {
                return Err(BridgeMessageStoreError::DuplicateMessage(hash));
            }
            staged.insert(hash, message.to_unrelayed());
        }

        state.extend(staged);
        Ok(())
    }

    async fn mark_relayed(
        &self,
        message_hash: MessageHash,
        relay_event: EventGuid,
    ) -> BridgeMessageStoreResult<()> {
        let mut state = self.state.write().map_err(|err| {
            BridgeMessageStoreError::persistence(std::io::Error::other(err.to_string()))
        })?;

        let stored = state
            .get_mut(&message_hash)
            .ok_or_else(|| BridgeMessageStoreError::relay_target_missing::<D>(message_hash))?;

        stored
            .mark_relayed(relay_event)
            .map(drop)
            .map_err(|RelayConflict { relayed_by, .. }| {
                BridgeMessageStoreError::already_relayed::<D>(message_hash, relayed_by)
            })
    }
}
