//! Bridge message records and their relay lifecycle.

use super::{
    BridgeMessageDomainError, EventGuid, L1ToL2, L2ToL1, MessageDirection, MessageHash,
    RelayConflict, Transaction,
};
use alloy_primitives::{B256, U256};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::marker::PhantomData;

/// Relay lifecycle of a bridge message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "state", content = "relayed_by", rename_all = "snake_case")]
pub enum RelayStatus {
    /// The message was sent and no relay has been observed yet.
    Sent,
    /// The message was executed on the destination domain.
    Relayed(EventGuid),
}

/// Outcome of a successful relay transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayOutcome {
    /// The relay field moved from absent to the given event.
    Marked,
    /// The message was already relayed by the same event.
    AlreadyMarked,
}

/// Fields of a freshly observed sent message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    /// Content-derived message identity.
    pub message_hash: MessageHash,
    /// Nonce assigned by the messenger contract.
    pub nonce: U256,
    /// Pipeline event that observed the send.
    pub sent_message_event_guid: EventGuid,
    /// Transaction that dispatched the message.
    pub tx: Transaction,
    /// Gas limit for execution on the destination domain.
    pub gas_limit: U256,
}

/// Parameter object for reconstructing a persisted bridge message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedBridgeMessage {
    /// Persisted message identity.
    pub message_hash: MessageHash,
    /// Persisted nonce.
    pub nonce: U256,
    /// Persisted sent event identifier.
    pub sent_message_event_guid: EventGuid,
    /// Persisted relay event identifier, if relayed.
    pub relayed_message_event_guid: Option<EventGuid>,
    /// Persisted transaction metadata.
    pub tx: Transaction,
    /// Persisted gas limit.
    pub gas_limit: U256,
}

/// A cross-domain message shared by both bridge directions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeMessage {
    message_hash: MessageHash,
    nonce: U256,
    sent_message_event_guid: EventGuid,
    relayed_message_event_guid: Option<EventGuid>,
    tx: Transaction,
    gas_limit: U256,
}

impl BridgeMessage {
    /// Creates a message in the [`RelayStatus::Sent`] state.
    #[must_use]
    pub fn sent(message: SentMessage) -> Self {
        let SentMessage {
            message_hash,
            nonce,
            sent_message_event_guid,
            tx,
            gas_limit,
        } = message;
        Self {
            message_hash,
            nonce,
            sent_message_event_guid,
            relayed_message_event_guid: None,
            tx,
            gas_limit,
        }
    }

    /// Reconstructs a message from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedBridgeMessage) -> Self {
        Self {
            message_hash: data.message_hash,
            nonce: data.nonce,
            sent_message_event_guid: data.sent_message_event_guid,
            relayed_message_event_guid: data.relayed_message_event_guid,
            tx: data.tx,
            gas_limit: data.gas_limit,
        }
    }

    /// Returns the message hash.
    #[must_use]
    pub const fn message_hash(&self) -> MessageHash {
        self.message_hash
    }

    /// Returns the message nonce.
    #[must_use]
    pub const fn nonce(&self) -> U256 {
        self.nonce
    }

    /// Returns the event that recorded the send.
    #[must_use]
    pub const fn sent_message_event_guid(&self) -> EventGuid {
        self.sent_message_event_guid
    }

    /// Returns the event that recorded the relay, if any.
    #[must_use]
    pub const fn relayed_message_event_guid(&self) -> Option<EventGuid> {
        self.relayed_message_event_guid
    }

    /// Returns the origin transaction metadata.
    #[must_use]
    pub const fn tx(&self) -> &Transaction {
        &self.tx
    }

    /// Returns the destination gas limit.
    #[must_use]
    pub const fn gas_limit(&self) -> U256 {
        self.gas_limit
    }

    /// Returns the relay lifecycle state.
    #[must_use]
    pub const fn relay_status(&self) -> RelayStatus {
        match self.relayed_message_event_guid {
            Some(guid) => RelayStatus::Relayed(guid),
            None => RelayStatus::Sent,
        }
    }

    /// Records the relay event for this message.
    ///
    /// Relaying again with the same event is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`RelayConflict`] when a different event already relayed the
    /// message; the stored event is kept.
    pub fn mark_relayed(&mut self, relay_event: EventGuid) -> Result<RelayOutcome, RelayConflict> {
        match self.relayed_message_event_guid {
            None => {
                self.relayed_message_event_guid = Some(relay_event);
                Ok(RelayOutcome::Marked)
            }
            Some(existing) if existing == relay_event => Ok(RelayOutcome::AlreadyMarked),
            Some(existing) => Err(RelayConflict {
                message_hash: self.message_hash,
                relayed_by: existing,
                attempted: relay_event,
            }),
        }
    }
}

/// A bridge message bound to its direction of travel.
///
/// The linked transaction hash is the deposit source hash for
/// [`L1ToL2`] messages and the withdrawal hash for [`L2ToL1`] messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct DirectedBridgeMessage<D: MessageDirection> {
    #[serde(flatten)]
    message: BridgeMessage,
    linked_transaction_hash: B256,
    #[serde(skip)]
    direction: PhantomData<D>,
}

/// Message sent from L1, linked to its deposit transaction.
pub type L1BridgeMessage = DirectedBridgeMessage<L1ToL2>;

/// Message sent from L2, linked to its withdrawal transaction.
pub type L2BridgeMessage = DirectedBridgeMessage<L2ToL1>;

impl<D: MessageDirection> DirectedBridgeMessage<D> {
    /// Binds a message to its direction-specific linked transaction hash.
    #[must_use]
    pub const fn new(message: BridgeMessage, linked_transaction_hash: B256) -> Self {
        Self {
            message,
            linked_transaction_hash,
            direction: PhantomData,
        }
    }

    /// Returns the shared message fields.
    #[must_use]
    pub const fn message(&self) -> &BridgeMessage {
        &self.message
    }

    /// Consumes the record, returning the shared message fields.
    #[must_use]
    pub fn into_message(self) -> BridgeMessage {
        self.message
    }

    /// Returns the message hash.
    #[must_use]
    pub const fn message_hash(&self) -> MessageHash {
        self.message.message_hash
    }

    /// Returns the relay lifecycle state.
    #[must_use]
    pub const fn relay_status(&self) -> RelayStatus {
        self.message.relay_status()
    }

    /// Returns the direction-specific linked transaction hash.
    #[must_use]
    pub const fn linked_transaction_hash(&self) -> B256 {
        self.linked_transaction_hash
    }

    /// Records the relay event for this message.
    ///
    /// # Errors
    ///
    /// See [`BridgeMessage::mark_relayed`].
    pub fn mark_relayed(&mut self, relay_event: EventGuid) -> Result<RelayOutcome, RelayConflict> {
        self.message.mark_relayed(relay_event)
    }

    /// Returns a copy of the record with the relay event cleared.
    #[must_use]
    pub(crate) fn to_unrelayed(&self) -> Self {
        let mut record = self.clone();
        record.message.relayed_message_event_guid = None;
        record
    }
}

impl DirectedBridgeMessage<L1ToL2> {
    /// Returns the hash of the deposit transaction that emitted the message.
    #[must_use]
    pub const fn transaction_source_hash(&self) -> B256 {
        self.linked_transaction_hash
    }
}

impl DirectedBridgeMessage<L2ToL1> {
    /// Returns the hash of the withdrawal transaction that emitted the message.
    #[must_use]
    pub const fn transaction_withdrawal_hash(&self) -> B256 {
        self.linked_transaction_hash
    }
}

/// Checks that every message in a batch has a distinct hash.
///
/// # Errors
///
/// Returns [`BridgeMessageDomainError::DuplicateInBatch`] naming the first
/// repeated hash.
pub fn ensure_unique_hashes<D: MessageDirection>(
    messages: &[DirectedBridgeMessage<D>],
) -> Result<(), BridgeMessageDomainError> {
    let mut seen = HashSet::with_capacity(messages.len());
    messages
        .iter()
        .map(DirectedBridgeMessage::message_hash)
        .find(|hash| !seen.insert(*hash))
        .map_or(Ok(()), |hash| {
            Err(BridgeMessageDomainError::DuplicateInBatch(hash))
        })
}

/// Checks that no message in a batch has been relayed yet.
///
/// # Errors
///
/// Returns [`BridgeMessageDomainError::RelayedAtCreation`] naming the first
/// message that already carries a relay event.
pub fn ensure_unrelayed<D: MessageDirection>(
    messages: &[DirectedBridgeMessage<D>],
) -> Result<(), BridgeMessageDomainError> {
    messages
        .iter()
        .find(|message| message.relay_status() != RelayStatus::Sent)
        .map_or(Ok(()), |message| {
            Err(BridgeMessageDomainError::RelayedAtCreation(
                message.message_hash(),
            ))
        })
}
