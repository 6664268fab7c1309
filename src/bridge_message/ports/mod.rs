//! Port contracts for bridge message persistence.
//!
//! Ports define infrastructure-agnostic interfaces used by the bridge
//! message services and by downstream readers.

pub mod repository;

pub use repository::{
    BridgeMessageRepository, BridgeMessageStoreError, BridgeMessageStoreResult, BridgeMessageView,
};
