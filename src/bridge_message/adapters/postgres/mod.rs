//! `PostgreSQL` adapters for bridge message persistence.
//!
//! Each direction is stored in its own table (`l1_bridge_messages`,
//! `l2_bridge_messages`); the DDL lives in the crate's `migrations/`
//! directory.

mod models;
mod repository;
mod schema;
mod tables;

pub use repository::{BridgePgPool, PostgresBridgeMessageRepository};
pub use tables::BridgeMessageTable;
