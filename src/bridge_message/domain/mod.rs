//! Domain model for cross-domain bridge messages.
//!
//! A bridge message is recorded when the ingestion pipeline observes it
//! being sent on one domain, and transitions once to relayed when its
//! execution on the other domain is observed. Both directions share one
//! record shape, parameterized by a [`MessageDirection`] marker.

mod direction;
mod error;
mod filter;
mod ids;
mod message;
mod transaction;

pub use direction::{L1ToL2, L2ToL1, MessageDirection};
pub use error::{BridgeMessageDomainError, ParseMessageHashError, RelayConflict};
pub use filter::BridgeMessageFilter;
pub use ids::{EventGuid, MessageHash};
pub use message::{
    BridgeMessage, DirectedBridgeMessage, L1BridgeMessage, L2BridgeMessage,
    PersistedBridgeMessage, RelayOutcome, RelayStatus, SentMessage, ensure_unique_hashes, ensure_unrelayed,
};
pub use transaction::Transaction;
