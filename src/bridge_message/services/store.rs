//! Service layer for storing, looking up, and relaying bridge messages.
//!
//! Provides [`BridgeMessageService`], which validates batches before they
//! reach a repository and records each write with `tracing`.

use crate::bridge_message::{
    domain::{
        BridgeMessageDomainError, BridgeMessageFilter, DirectedBridgeMessage, EventGuid,
        MessageDirection, MessageHash, ensure_unique_hashes, ensure_unrelayed,
    },
    ports::{BridgeMessageRepository, BridgeMessageStoreError},
};
use std::marker::PhantomData;
use std::sync::Arc;
use thiserror::Error;

/// Service-level errors for bridge message operations.
#[derive(Debug, Clone, Error)]
pub enum BridgeMessageServiceError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] BridgeMessageDomainError),
    /// Repository operation failed.
    #[error(transparent)]
    Store(#[from] BridgeMessageStoreError),
}

/// Result type for bridge message service operations.
pub type BridgeMessageServiceResult<T> = Result<T, BridgeMessageServiceError>;

/// Orchestrates bridge message persistence for one direction.
pub struct BridgeMessageService<D, R>
where
    D: MessageDirection,
    R: BridgeMessageRepository<D>,
{
    repository: Arc<R>,
    direction: PhantomData<D>,
}

impl<D, R> Clone for BridgeMessageService<D, R>
where
    D: MessageDirection,
    R: BridgeMessageRepository<D>,
{
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            direction: PhantomData,
        }
    }
}

impl<D, R> std::fmt::Debug for BridgeMessageService<D, R>
where
    D: MessageDirection,
    R: BridgeMessageRepository<D>,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BridgeMessageService")
            .field("direction", &D::LABEL)
            .finish_non_exhaustive()
    }
}

impl<D, R> BridgeMessageService<D, R>
where
    D: MessageDirection,
    R: BridgeMessageRepository<D>,
{
    /// Creates a new bridge message service.
    #[must_use]
    pub const fn new(repository: Arc<R>) -> Self {
        Self {
            repository,
            direction: PhantomData,
        }
    }

    /// Returns the underlying repository.
    #[must_use]
    pub const fn repository(&self) -> &Arc<R> {
        &self.repository
    }

    /// Stores a batch of sent messages atomically.
    ///
    /// An empty batch succeeds without touching the repository.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeMessageServiceError::Domain`] when the batch repeats a
    /// hash or holds an already relayed message, or [`BridgeMessageServiceError::Store`] when the repository
    /// rejects it. Nothing from a rejected batch is persisted.
    pub async fn store_messages(
        &self,
        messages: &[DirectedBridgeMessage<D>],
    ) -> BridgeMessageServiceResult<()> {
        if messages.is_empty() {
            return Ok(());
        }
        ensure_unique_hashes(messages)?;
        ensure_unrelayed(messages)?;
        self.repository.store_messages(messages).await?;
        tracing::debug!(
            target: "bridge_store",
            direction = D::LABEL,
            count = messages.len(),
            "stored bridge messages"
        );
        Ok(())
    }

    /// Finds a message by hash.
    ///
    /// Returns `Ok(None)` when no message has the given hash.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeMessageServiceError::Store`] when the lookup fails.
    pub async fn message(
        &self,
        message_hash: MessageHash,
    ) -> BridgeMessageServiceResult<Option<DirectedBridgeMessage<D>>> {
        tracing::trace!(
            target: "bridge_store",
            direction = D::LABEL,
            %message_hash,
            "looking up bridge message"
        );
        Ok(self.repository.message(message_hash).await?)
    }

    /// Finds the lowest-nonce message matching every supplied filter field.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeMessageServiceError::Store`] when the lookup fails.
    pub async fn message_with_filter(
        &self,
        filter: &BridgeMessageFilter,
    ) -> BridgeMessageServiceResult<Option<DirectedBridgeMessage<D>>> {
        tracing::trace!(
            target: "bridge_store",
            direction = D::LABEL,
            ?filter,
            "filtering bridge messages"
        );
        Ok(self.repository.message_with_filter(filter).await?)
    }

    /// Records that `relay_event` relayed the message with `message_hash`.
    ///
    /// Repeating the call with the same event succeeds without change.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeMessageServiceError::Store`] wrapping
    /// [`BridgeMessageStoreError::RelayTargetMissing`] for an unknown hash or
    /// [`BridgeMessageStoreError::AlreadyRelayed`] when another event relayed
    /// the message first.
    pub async fn mark_relayed(
        &self,
        message_hash: MessageHash,
        relay_event: EventGuid,
    ) -> BridgeMessageServiceResult<()> {
        self.repository
            .mark_relayed(message_hash, relay_event)
            .await?;
        tracing::debug!(
            target: "bridge_store",
            direction = D::LABEL,
            %message_hash,
            %relay_event,
            "marked bridge message relayed"
        );
        Ok(())
    }
}
