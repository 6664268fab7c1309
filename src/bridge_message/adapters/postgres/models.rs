//! Diesel row models and column codecs for bridge message persistence.

use crate::bridge_message::{
    domain::{
        BridgeMessage, DirectedBridgeMessage, EventGuid, MessageDirection, MessageHash,
        PersistedBridgeMessage, Transaction,
    },
    ports::{BridgeMessageStoreError, BridgeMessageStoreResult},
};
use alloy_primitives::{Address, B256, Bytes, U256, hex};
use bigdecimal::BigDecimal;
use bigdecimal::num_bigint::{BigInt, Sign};
use diesel::prelude::*;
use std::str::FromStr;
use thiserror::Error;

/// Column values of one bridge message row, in table column order.
///
/// Both directional tables share this shape; the third column holds the
/// direction-specific linked transaction hash.
#[derive(Debug, Clone, PartialEq, Queryable)]
pub(super) struct BridgeMessageRow {
    /// `0x`-prefixed message hash.
    pub message_hash: String,
    /// Messenger nonce.
    pub nonce: BigDecimal,
    /// Deposit source hash or withdrawal hash.
    pub linked_transaction_hash: String,
    /// Pipeline event that observed the send.
    pub sent_message_event_guid: uuid::Uuid,
    /// Pipeline event that observed the relay.
    pub relayed_message_event_guid: Option<uuid::Uuid>,
    /// Origin transaction sender.
    pub from_address: String,
    /// Origin transaction target.
    pub to_address: String,
    /// Transferred value.
    pub amount: BigDecimal,
    /// Destination gas limit.
    pub gas_limit: BigDecimal,
    /// Message calldata.
    pub data: Vec<u8>,
    /// Origin block timestamp in seconds.
    pub timestamp: i64,
}

/// Reasons a stored column cannot be decoded into a domain value.
#[derive(Debug, Error)]
pub(super) enum ColumnDecodeError {
    #[error("column {column} holds invalid hex '{value}': {source}")]
    Hex {
        column: &'static str,
        value: String,
        #[source]
        source: hex::FromHexError,
    },

    #[error("column {column} holds {value}, which is not an unsigned 256-bit integer")]
    Uint256 { column: &'static str, value: String },

    #[error("column timestamp holds negative value {0}")]
    NegativeTimestamp(i64),
}

impl BridgeMessageRow {
    /// Encodes a domain message into row values.
    pub(super) fn from_domain<D: MessageDirection>(
        message: &DirectedBridgeMessage<D>,
    ) -> BridgeMessageStoreResult<Self> {
        let base = message.message();
        let tx = base.tx();
        let timestamp =
            i64::try_from(tx.timestamp()).map_err(BridgeMessageStoreError::persistence)?;

        Ok(Self {
            message_hash: base.message_hash().to_hex(),
            nonce: u256_to_numeric(base.nonce()),
            linked_transaction_hash: encode_hash(message.linked_transaction_hash()),
            sent_message_event_guid: base.sent_message_event_guid().into_inner(),
            relayed_message_event_guid: base
                .relayed_message_event_guid()
                .map(EventGuid::into_inner),
            from_address: encode_address(tx.from_address()),
            to_address: encode_address(tx.to_address()),
            amount: u256_to_numeric(tx.amount()),
            gas_limit: u256_to_numeric(base.gas_limit()),
            data: tx.data().to_vec(),
            timestamp,
        })
    }

    /// Decodes row values into a domain message.
    pub(super) fn into_domain<D: MessageDirection>(
        self,
    ) -> BridgeMessageStoreResult<DirectedBridgeMessage<D>> {
        self.decode()
            .map_err(BridgeMessageStoreError::invalid_persisted_data)
    }

    fn decode<D: MessageDirection>(self) -> Result<DirectedBridgeMessage<D>, ColumnDecodeError> {
        let Self {
            message_hash,
            nonce,
            linked_transaction_hash,
            sent_message_event_guid,
            relayed_message_event_guid,
            from_address,
            to_address,
            amount,
            gas_limit,
            data,
            timestamp,
        } = self;

        let tx = Transaction::new(
            decode_address("from_address", &from_address)?,
            decode_address("to_address", &to_address)?,
            numeric_to_u256("amount", &amount)?,
            Bytes::from(data),
            u64::try_from(timestamp).map_err(|_| ColumnDecodeError::NegativeTimestamp(timestamp))?,
        );
        let message = BridgeMessage::from_persisted(PersistedBridgeMessage {
            message_hash: MessageHash::new(decode_hash("message_hash", &message_hash)?),
            nonce: numeric_to_u256("nonce", &nonce)?,
            sent_message_event_guid: EventGuid::from_uuid(sent_message_event_guid),
            relayed_message_event_guid: relayed_message_event_guid.map(EventGuid::from_uuid),
            tx,
            gas_limit: numeric_to_u256("gas_limit", &gas_limit)?,
        });
        let linked = decode_hash(D::LINKAGE_FIELD, &linked_transaction_hash)?;
        Ok(DirectedBridgeMessage::new(message, linked))
    }
}

/// Encodes a 32-byte hash as `0x`-prefixed lowercase hex.
pub(super) fn encode_hash(hash: B256) -> String {
    hex::encode_prefixed(hash)
}

/// Encodes an address as `0x`-prefixed lowercase hex.
pub(super) fn encode_address(address: Address) -> String {
    hex::encode_prefixed(address)
}

/// Decodes a stored message hash column.
pub(super) fn decode_message_hash(value: &str) -> BridgeMessageStoreResult<MessageHash> {
    decode_hash("message_hash", value)
        .map(MessageHash::new)
        .map_err(BridgeMessageStoreError::invalid_persisted_data)
}

fn decode_hash(column: &'static str, value: &str) -> Result<B256, ColumnDecodeError> {
    B256::from_str(value).map_err(|source| ColumnDecodeError::Hex {
        column,
        value: value.to_owned(),
        source,
    })
}

fn decode_address(column: &'static str, value: &str) -> Result<Address, ColumnDecodeError> {
    Address::from_str(value).map_err(|source| ColumnDecodeError::Hex {
        column,
        value: value.to_owned(),
        source,
    })
}

/// Converts a 256-bit integer into a scale-0 numeric.
pub(super) fn u256_to_numeric(value: U256) -> BigDecimal {
    let digits = value
        .as_limbs()
        .iter()
        .rev()
        .fold(BigInt::from(0_u8), |acc, limb| (acc << 64_u32) + BigInt::from(*limb));
    BigDecimal::from(digits)
}

fn numeric_to_u256(column: &'static str, value: &BigDecimal) -> Result<U256, ColumnDecodeError> {
    let out_of_range = || ColumnDecodeError::Uint256 {
        column,
        value: value.to_string(),
    };
    if !value.is_integer() {
        return Err(out_of_range());
    }
    let (digits, _) = value.with_scale(0).into_bigint_and_exponent();
    if digits.sign() == Sign::Minus {
        return Err(out_of_range());
    }
    U256::from_str(&digits.to_string()).map_err(|_| out_of_range())
}
