//! Application services for bridge message storage and relay correlation.

mod database;
mod store;

pub use database::{BridgeMessagesDb, InMemoryBridgeMessagesDb, PostgresBridgeMessagesDb};
pub use store::{BridgeMessageService, BridgeMessageServiceError, BridgeMessageServiceResult};
