//! Repository ports for bridge message persistence and relay correlation.

use crate::bridge_message::domain::{
    BridgeMessageFilter, DirectedBridgeMessage, EventGuid, MessageDirection, MessageHash,
};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for bridge message store operations.
pub type BridgeMessageStoreResult<T> = Result<T, BridgeMessageStoreError>;

/// Read-only lookups over one direction's messages.
#[async_trait]
pub trait BridgeMessageView<D: MessageDirection>: Send + Sync {
    /// Finds a message by hash.
    ///
    /// Returns `None` when no message has the given hash.
    async fn message(
        &self,
        message_hash: MessageHash,
    ) -> BridgeMessageStoreResult<Option<DirectedBridgeMessage<D>>> {
        self.message_with_filter(&BridgeMessageFilter::by_hash(message_hash))
            .await
    }

    /// Finds the first message matching every supplied filter field.
    ///
    /// Returns `None` when nothing matches. Among several matches the one
    /// with the lowest `(nonce, message_hash)` is returned.
    async fn message_with_filter(
        &self,
        filter: &BridgeMessageFilter,
    ) -> BridgeMessageStoreResult<Option<DirectedBridgeMessage<D>>>;
}

/// Write access to one direction's messages.
#[async_trait]
pub trait BridgeMessageRepository<D: MessageDirection>: BridgeMessageView<D> {
    /// Stores a batch of sent messages atomically.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeMessageStoreError::DuplicateMessage`] when any hash is
    /// already stored or repeated in the batch. Nothing from a failed batch
    /// is persisted.
    async fn store_messages(
        &self,
        messages: &[DirectedBridgeMessage<D>],
    ) -> BridgeMessageStoreResult<()>;

    /// Records the relay event for a stored message.
    ///
    /// Succeeds without change when the message was already relayed by the
    /// same event.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeMessageStoreError::RelayTargetMissing`] when no
    /// message has the hash, or [`BridgeMessageStoreError::AlreadyRelayed`]
    /// when a different event relayed it first.
    async fn mark_relayed(
        &self,
        message_hash: MessageHash,
        relay_event: EventGuid,
    ) -> BridgeMessageStoreResult<()>;
}

/// Errors returned by bridge message repository implementations.
#[derive(Debug, Clone, Error)]
pub enum BridgeMessageStoreError {
    /// A message with the same hash already exists.
    #[error("duplicate message hash: {0}")]
    DuplicateMessage(MessageHash),

    /// A relay was observed for a message that was never stored.
    #[error("{direction} with message hash {message_hash} not found")]
    RelayTargetMissing {
        /// Record label of the direction searched.
        direction: &'static str,
        /// Hash named by the relay event.
        message_hash: MessageHash,
    },

    /// The message was already relayed by a different event.
    #[error("{direction} with message hash {message_hash} already relayed by event {relayed_by}")]
    AlreadyRelayed {
        /// Record label of the direction searched.
        direction: &'static str,
        /// Hash named by the relay event.
        message_hash: MessageHash,
        /// Event that relayed the message first.
        relayed_by: EventGuid,
    },

    /// Persisted data could not be reconstructed into domain types.
    #[error("invalid persisted data: {0}")]
    InvalidPersistedData(Arc<dyn std::error::Error + Send + Sync>),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl BridgeMessageStoreError {
    /// Wraps a data-quality or decoding error from persisted rows.
    pub fn invalid_persisted_data(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::InvalidPersistedData(Arc::new(err))
    }

    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }

    /// Builds the error for a relay naming an unknown message.
    #[must_use]
    pub const fn relay_target_missing<D: MessageDirection>(message_hash: MessageHash) -> Self {
        Self::RelayTargetMissing {
            direction: D::LABEL,
            message_hash,
        }
    }

    /// Builds the error for a relay conflicting with an earlier one.
    #[must_use]
    pub const fn already_relayed<D: MessageDirection>(
        message_hash: MessageHash,
        relayed_by: EventGuid,
    ) -> Self {
        Self::AlreadyRelayed {
            direction: D::LABEL,
            message_hash,
            relayed_by,
        }
    }
}
