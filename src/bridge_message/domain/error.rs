//! Error types for bridge message domain validation and parsing.

use super::{EventGuid, MessageHash};
use alloy_primitives::hex::FromHexError;
use thiserror::Error;

/// Errors returned by bridge message domain rules.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BridgeMessageDomainError {
    /// The same message hash appears more than once in a single batch.
    #[error("message hash {0} appears more than once in the batch")]
    DuplicateInBatch(MessageHash),

    /// A message submitted for storage already carries a relay event.
    #[error("message hash {0} is already relayed; new messages must be stored unrelayed")]
    RelayedAtCreation(MessageHash),
}

/// A relay refused because a different event relayed the message first.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("message {message_hash} already relayed by event {relayed_by}, refusing {attempted}")]
pub struct RelayConflict {
    /// Hash of the conflicting message.
    pub message_hash: MessageHash,
    /// Event that relayed the message first.
    pub relayed_by: EventGuid,
    /// Event whose relay was refused.
    pub attempted: EventGuid,
}

/// Error returned while parsing a message hash from text.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid message hash '{input}': {source}")]
pub struct ParseMessageHashError {
    /// The rejected input.
    pub input: String,
    /// Underlying hex decoding failure.
    #[source]
    pub source: FromHexError,
}
