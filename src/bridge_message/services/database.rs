//! Two-direction facade over the bridge message services.

use super::store::{BridgeMessageService, BridgeMessageServiceResult};
use crate::bridge_message::{
    adapters::{
        memory::InMemoryBridgeMessageRepository,
        postgres::{BridgePgPool, PostgresBridgeMessageRepository},
    },
    domain::{
        BridgeMessageFilter, EventGuid, L1BridgeMessage, L1ToL2, L2BridgeMessage, L2ToL1,
        MessageHash,
    },
    ports::BridgeMessageRepository,
};
use crate::config::{StoreConfig, StoreConfigError};
use std::sync::Arc;

/// Bridge message store covering both directions.
///
/// Holds one [`BridgeMessageService`] per direction and exposes the
/// operations under their direction-qualified names.
#[derive(Debug, Clone)]
pub struct BridgeMessagesDb<L1R, L2R>
where
    L1R: BridgeMessageRepository<L1ToL2>,
    L2R: BridgeMessageRepository<L2ToL1>,
{
    l1: BridgeMessageService<L1ToL2, L1R>,
    l2: BridgeMessageService<L2ToL1, L2R>,
}

/// Facade backed by `PostgreSQL`.
pub type PostgresBridgeMessagesDb = BridgeMessagesDb<
    PostgresBridgeMessageRepository<L1ToL2>,
    PostgresBridgeMessageRepository<L2ToL1>,
>;

/// Facade backed by process memory.
pub type InMemoryBridgeMessagesDb =
    BridgeMessagesDb<InMemoryBridgeMessageRepository<L1ToL2>, InMemoryBridgeMessageRepository<L2ToL1>>;

impl<L1R, L2R> BridgeMessagesDb<L1R, L2R>
where
    L1R: BridgeMessageRepository<L1ToL2>,
    L2R: BridgeMessageRepository<L2ToL1>,
{
    /// Creates a facade over one repository per direction.
    #[must_use]
    pub const fn new(l1_repository: Arc<L1R>, l2_repository: Arc<L2R>) -> Self {
        Self {
            l1: BridgeMessageService::new(l1_repository),
            l2: BridgeMessageService::new(l2_repository),
        }
    }

    /// Service for messages sent from L1.
    #[must_use]
    pub const fn l1(&self) -> &BridgeMessageService<L1ToL2, L1R> {
        &self.l1
    }

    /// Service for messages sent from L2.
    #[must_use]
    pub const fn l2(&self) -> &BridgeMessageService<L2ToL1, L2R> {
        &self.l2
    }

    /// Stores a batch of L1-origin messages atomically.
    ///
    /// # Errors
    ///
    /// See [`BridgeMessageService::store_messages`].
    pub async fn store_l1_bridge_messages(
        &self,
        messages: &[L1BridgeMessage],
    ) -> BridgeMessageServiceResult<()> {
        self.l1.store_messages(messages).await
    }

    /// Finds an L1-origin message by hash.
    ///
    /// # Errors
    ///
    /// See [`BridgeMessageService::message`].
    pub async fn l1_bridge_message(
        &self,
        message_hash: MessageHash,
    ) -> BridgeMessageServiceResult<Option<L1BridgeMessage>> {
        self.l1.message(message_hash).await
    }

    /// Finds the lowest-nonce L1-origin message matching `filter`.
    ///
    /// # Errors
    ///
    /// See [`BridgeMessageService::message_with_filter`].
    pub async fn l1_bridge_message_with_filter(
        &self,
        filter: &BridgeMessageFilter,
    ) -> BridgeMessageServiceResult<Option<L1BridgeMessage>> {
        self.l1.message_with_filter(filter).await
    }

    /// Records the L2 event that relayed an L1-origin message.
    ///
    /// # Errors
    ///
    /// See [`BridgeMessageService::mark_relayed`].
    pub async fn mark_relayed_l1_bridge_message(
        &self,
        message_hash: MessageHash,
        relay_event: EventGuid,
    ) -> BridgeMessageServiceResult<()> {
        self.l1.mark_relayed(message_hash, relay_event).await
    }

    /// Stores a batch of L2-origin messages atomically.
    ///
    /// # Errors
    ///
    /// See [`BridgeMessageService::store_messages`].
    pub async fn store_l2_bridge_messages(
        &self,
        messages: &[L2BridgeMessage],
    ) -> BridgeMessageServiceResult<()> {
        self.l2.store_messages(messages).await
    }

    /// Finds an L2-origin message by hash.
    ///
    /// # Errors
    ///
    /// See [`BridgeMessageService::message`].
    pub async fn l2_bridge_message(
        &self,
        message_hash: MessageHash,
    ) -> BridgeMessageServiceResult<Option<L2BridgeMessage>> {
        self.l2.message(message_hash).await
    }

    /// Finds the lowest-nonce L2-origin message matching `filter`.
    ///
    /// # Errors
    ///
    /// See [`BridgeMessageService::message_with_filter`].
    pub async fn l2_bridge_message_with_filter(
        &self,
        filter: &BridgeMessageFilter,
    ) -> BridgeMessageServiceResult<Option<L2BridgeMessage>> {
        self.l2.message_with_filter(filter).await
    }

    /// Records the L1 event that relayed an L2-origin message.
    ///
    /// # Errors
    ///
    /// See [`BridgeMessageService::mark_relayed`].
    pub async fn mark_relayed_l2_bridge_message(
        &self,
        message_hash: MessageHash,
        relay_event: EventGuid,
    ) -> BridgeMessageServiceResult<()> {
        self.l2.mark_relayed(message_hash, relay_event).await
    }
}

impl PostgresBridgeMessagesDb {
    /// Creates a facade whose repositories share one connection pool.
    #[must_use]
    pub fn from_pool(pool: BridgePgPool) -> Self {
        Self::new(
            Arc::new(PostgresBridgeMessageRepository::new(pool.clone())),
            Arc::new(PostgresBridgeMessageRepository::new(pool)),
        )
    }

    /// Builds a connection pool from `config` and wraps it in a facade.
    ///
    /// # Errors
    ///
    /// Returns [`StoreConfigError`] when the configuration is invalid or the
    /// pool cannot be built.
    pub fn connect(config: &StoreConfig) -> Result<Self, StoreConfigError> {
        Ok(Self::from_pool(config.build_pool()?))
    }
}

impl InMemoryBridgeMessagesDb {
    /// Creates an empty facade held entirely in memory.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(InMemoryBridgeMessageRepository::new()),
            Arc::new(InMemoryBridgeMessageRepository::new()),
        )
    }
}
