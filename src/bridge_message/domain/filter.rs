//! Field-equality filters for bridge message lookups.

use super::{BridgeMessage, EventGuid, MessageHash};
use alloy_primitives::{Address, Bytes, U256};

/// Conjunctive equality filter over bridge message fields.
///
/// Every supplied field must match; unsupplied fields are unconstrained.
/// A supplied field constrains the match even when it holds a zero value.
/// When several records match, stores return the one with the lowest
/// `(nonce, message_hash)`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BridgeMessageFilter {
    message_hash: Option<MessageHash>,
    nonce: Option<U256>,
    sent_message_event_guid: Option<EventGuid>,
    relayed_message_event_guid: Option<EventGuid>,
    gas_limit: Option<U256>,
    from_address: Option<Address>,
    to_address: Option<Address>,
    amount: Option<U256>,
    data: Option<Bytes>,
    timestamp: Option<u64>,
}

impl BridgeMessageFilter {
    /// Creates a filter that matches every message.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a filter selecting a single message by hash.
    #[must_use]
    pub fn by_hash(message_hash: MessageHash) -> Self {
        Self::new().with_message_hash(message_hash)
    }

    /// Constrains the message hash.
    #[must_use]
    pub const fn with_message_hash(mut self, message_hash: MessageHash) -> Self {
        self.message_hash = Some(message_hash);
        self
    }

    /// Constrains the nonce.
    #[must_use]
    pub const fn with_nonce(mut self, nonce: U256) -> Self {
        self.nonce = Some(nonce);
        self
    }

    /// Constrains the sent event identifier.
    #[must_use]
    pub const fn with_sent_message_event_guid(mut self, guid: EventGuid) -> Self {
        self.sent_message_event_guid = Some(guid);
        self
    }

    /// Constrains the relay event identifier.
    #[must_use]
    pub const fn with_relayed_message_event_guid(mut self, guid: EventGuid) -> Self {
        self.relayed_message_event_guid = Some(guid);
        self
    }

    /// Constrains the destination gas limit.
    #[must_use]
    pub const fn with_gas_limit(mut self, gas_limit: U256) -> Self {
        self.gas_limit = Some(gas_limit);
        self
    }

    /// Constrains the origin transaction sender.
    #[must_use]
    pub const fn with_from_address(mut self, address: Address) -> Self {
        self.from_address = Some(address);
        self
    }

    /// Constrains the origin transaction target.
    #[must_use]
    pub const fn with_to_address(mut self, address: Address) -> Self {
        self.to_address = Some(address);
        self
    }

    /// Constrains the transferred amount.
    #[must_use]
    pub const fn with_amount(mut self, amount: U256) -> Self {
        self.amount = Some(amount);
        self
    }

    /// Constrains the message calldata.
    #[must_use]
    pub fn with_data(mut self, data: Bytes) -> Self {
        self.data = Some(data);
        self
    }

    /// Constrains the origin block timestamp.
    #[must_use]
    pub const fn with_timestamp(mut self, timestamp: u64) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Returns the message hash constraint.
    #[must_use]
    pub const fn message_hash(&self) -> Option<MessageHash> {
        self.message_hash
    }

    /// Returns the nonce constraint.
    #[must_use]
    pub const fn nonce(&self) -> Option<U256> {
        self.nonce
    }

    /// Returns the sent event constraint.
    #[must_use]
    pub const fn sent_message_event_guid(&self) -> Option<EventGuid> {
        self.sent_message_event_guid
    }

    /// Returns the relay event constraint.
    #[must_use]
    pub const fn relayed_message_event_guid(&self) -> Option<EventGuid> {
        self.relayed_message_event_guid
    }

    /// Returns the gas limit constraint.
    #[must_use]
    pub const fn gas_limit(&self) -> Option<U256> {
        self.gas_limit
    }

    /// Returns the sender constraint.
    #[must_use]
    pub const fn from_address(&self) -> Option<Address> {
        self.from_address
    }

    /// Returns the target constraint.
    #[must_use]
    pub const fn to_address(&self) -> Option<Address> {
        self.to_address
    }

    /// Returns the amount constraint.
    #[must_use]
    pub const fn amount(&self) -> Option<U256> {
        self.amount
    }

    /// Returns the calldata constraint.
    #[must_use]
    pub const fn data(&self) -> Option<&Bytes> {
        self.data.as_ref()
    }

    /// Returns the timestamp constraint.
    #[must_use]
    pub const fn timestamp(&self) -> Option<u64> {
        self.timestamp
    }

    /// Returns `true` when no field is constrained.
    #[must_use]
    pub fn is_unconstrained(&self) -> bool {
        *self == Self::default()
    }

    /// Returns `true` when every supplied field equals the message's value.
    #[must_use]
    pub fn matches(&self, message: &BridgeMessage) -> bool {
        let tx = message.tx();
        field_matches(self.message_hash, message.message_hash())
            && field_matches(self.nonce, message.nonce())
            && field_matches(self.sent_message_event_guid, message.sent_message_event_guid())
            && self
                .relayed_message_event_guid
                .is_none_or(|guid| message.relayed_message_event_guid() == Some(guid))
            && field_matches(self.gas_limit, message.gas_limit())
            && field_matches(self.from_address, tx.from_address())
            && field_matches(self.to_address, tx.to_address())
            && field_matches(self.amount, tx.amount())
            && self.data.as_ref().is_none_or(|data| data == tx.data())
            && field_matches(self.timestamp, tx.timestamp())
    }
}

fn field_matches<T: PartialEq>(constraint: Option<T>, actual: T) -> bool {
    constraint.is_none_or(|expected| expected == actual)
}
