//! `PostgreSQL` repository implementation for bridge messages.

use super::tables::BridgeMessageTable;
use crate::bridge_message::{
    domain::{BridgeMessageFilter, DirectedBridgeMessage, EventGuid, MessageHash},
    ports::{
        BridgeMessageRepository, BridgeMessageStoreError, BridgeMessageStoreResult,
        BridgeMessageView,
    },
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool};
use std::marker::PhantomData;

/// `PostgreSQL` connection pool type used by bridge message adapters.
pub type BridgePgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed bridge message repository for one direction.
///
/// Uses Diesel with r2d2 connection pooling. Every operation runs on
/// tokio's blocking pool via [`tokio::task::spawn_blocking`] so the async
/// runtime is never blocked on I/O.
///
/// # Example
///
/// ```ignore
/// use bridge_store::bridge_message::adapters::postgres::PostgresBridgeMessageRepository;
/// use bridge_store::bridge_message::domain::L1ToL2;
/// use diesel::r2d2::{ConnectionManager, Pool};
/// use diesel::PgConnection;
///
/// let manager = ConnectionManager::<PgConnection>::new("postgres://...");
/// let pool = Pool::builder().build(manager).expect("pool");
/// let repo = PostgresBridgeMessageRepository::<L1ToL2>::new(pool);
/// ```
#[derive(Debug, Clone)]
pub struct PostgresBridgeMessageRepository<D: BridgeMessageTable> {
    pool: BridgePgPool,
    direction: PhantomData<D>,
}

impl<D: BridgeMessageTable> PostgresBridgeMessageRepository<D> {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: BridgePgPool) -> Self {
        Self {
            pool,
            direction: PhantomData,
        }
    }

    /// Returns a reference to the connection pool.
    #[must_use]
    pub const fn pool(&self) -> &BridgePgPool {
        &self.pool
    }

    async fn run_blocking<F, T>(&self, f: F) -> BridgeMessageStoreResult<T>
    where
        F: FnOnce(&mut PgConnection) -> BridgeMessageStoreResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(BridgeMessageStoreError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(BridgeMessageStoreError::persistence)?
    }
}

#[async_trait]
impl<D: BridgeMessageTable> BridgeMessageView<D> for PostgresBridgeMessageRepository<D> {
    async fn message_with_filter(
        &self,
        filter: &BridgeMessageFilter,
    ) -> BridgeMessageStoreResult<Option<DirectedBridgeMessage<D>>> {
        let owned_filter = filter.clone();
        self.run_blocking(move |connection| D::find(connection, &owned_filter))
            .await
    }
}

#[async_trait]
impl<D: BridgeMessageTable> BridgeMessageRepository<D> for PostgresBridgeMessageRepository<D> {
    async fn store_messages(
        &self,
        messages: &[DirectedBridgeMessage<D>],
    ) -> BridgeMessageStoreResult<()> {
        let batch = messages.to_vec();
        self.run_blocking(move |connection| D::insert_batch(connection, &batch))
            .await
    }

    async fn mark_relayed(
        &self,
        message_hash: MessageHash,
        relay_event: EventGuid,
    ) -> BridgeMessageStoreResult<()> {
        self.run_blocking(move |connection| D::mark_relayed(connection, message_hash, relay_event))
            .await
    }
}
