//! In-memory adapters for bridge message persistence.

mod repository;

pub use repository::InMemoryBridgeMessageRepository;
