//! Per-direction table operations for the `PostgreSQL` repository.
//!
//! Both directional tables share a layout apart from the linkage column,
//! so the statements are generated once and instantiated per table.

use super::models::{BridgeMessageRow, decode_message_hash, encode_address, u256_to_numeric};
use super::schema::{l1_bridge_messages, l2_bridge_messages};
use crate::bridge_message::{
    domain::{
        BridgeMessageFilter, DirectedBridgeMessage, EventGuid, L1ToL2, L2ToL1, MessageDirection,
        MessageHash,
    },
    ports::{BridgeMessageStoreError, BridgeMessageStoreResult},
};
use diesel::pg::PgConnection;
use diesel::prelude::*;

/// Rows per `INSERT` statement; keeps bind parameters under the protocol
/// limit of 65535.
const INSERT_CHUNK_ROWS: usize = 4096;

/// Direction whose messages live in a dedicated `PostgreSQL` table.
///
/// Implemented for [`L1ToL2`] (`l1_bridge_messages`) and [`L2ToL1`]
/// (`l2_bridge_messages`). Every method runs on a caller-supplied
/// connection and opens its own transaction where atomicity matters.
pub trait BridgeMessageTable: MessageDirection {
    /// Inserts a batch in one transaction, chunking large batches.
    ///
    /// The relay column is always written as `NULL`.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeMessageStoreError::DuplicateMessage`] for the lowest
    /// already-stored hash, or a persistence error; nothing is inserted on
    /// failure.
    fn insert_batch(
        connection: &mut PgConnection,
        messages: &[DirectedBridgeMessage<Self>],
    ) -> BridgeMessageStoreResult<()>;

    /// Loads the lowest `(nonce, message_hash)` row matching the filter.
    ///
    /// # Errors
    ///
    /// Returns a persistence error on query failure or
    /// [`BridgeMessageStoreError::InvalidPersistedData`] for undecodable rows.
    fn find(
        connection: &mut PgConnection,
        filter: &BridgeMessageFilter,
    ) -> BridgeMessageStoreResult<Option<DirectedBridgeMessage<Self>>>;

    /// Sets the relay event only where it is still unset.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeMessageStoreError::RelayTargetMissing`] or
    /// [`BridgeMessageStoreError::AlreadyRelayed`] when no row changed.
    fn mark_relayed(
        connection: &mut PgConnection,
        message_hash: MessageHash,
        relay_event: EventGuid,
    ) -> BridgeMessageStoreResult<()>;
}

impl From<diesel::result::Error> for BridgeMessageStoreError {
    fn from(err: diesel::result::Error) -> Self {
        Self::persistence(err)
    }
}

macro_rules! bridge_message_table {
    ($direction:ty, $table:ident, $linkage:ident) => {
        impl BridgeMessageTable for $direction {
            fn insert_batch(
                connection: &mut PgConnection,
                messages: &[DirectedBridgeMessage<Self>],
            ) -> BridgeMessageStoreResult<()> {
                let rows = messages
                    .iter()
                    .map(BridgeMessageRow::from_domain)
                    .collect::<BridgeMessageStoreResult<Vec<_>>>()?;
                let hashes: Vec<String> = rows.iter().map(|row| row.message_hash.clone()).collect();

                connection.transaction::<_, BridgeMessageStoreError, _>(|tx| {
                    let existing = $table::table
                        .filter($table::message_hash.eq_any(&hashes))
                        .select($table::message_hash)
                        .order($table::message_hash.asc())
                        .first::<String>(tx)
                        .optional()?;
                    if let Some(stored) = existing {
                        return Err(BridgeMessageStoreError::DuplicateMessage(
                            decode_message_hash(&stored)?,
                        ));
                    }

                    let mut remaining = rows.into_iter();
                    loop {
                        let chunk: Vec<_> = remaining
                            .by_ref()
                            .take(INSERT_CHUNK_ROWS)
                            .map(|row| {
                                (
                                    $table::message_hash.eq(row.message_hash),
                                    $table::nonce.eq(row.nonce),
                                    $table::$linkage.eq(row.linked_transaction_hash),
                                    $table::sent_message_event_guid.eq(row.sent_message_event_guid),
                                    $table::relayed_message_event_guid
                                        .eq(None::<uuid::Uuid>),
                                    $table::from_address.eq(row.from_address),
                                    $table::to_address.eq(row.to_address),
                                    $table::amount.eq(row.amount),
                                    $table::gas_limit.eq(row.gas_limit),
                                    $table::data.eq(row.data),
                                    $table::timestamp.eq(row.timestamp),
                                )
                            })
                            .collect();
                        if chunk.is_empty() {
                            return Ok(());
                        }
                        diesel::insert_into($table::table)
                            .values(&chunk)
                            .execute(tx)?;
                    }
                })
            }

            fn find(
                connection: &mut PgConnection,
                filter: &BridgeMessageFilter,
            ) -> BridgeMessageStoreResult<Option<DirectedBridgeMessage<Self>>> {
                let mut query = $table::table
                    .select((
                        $table::message_hash,
                        $table::nonce,
                        $table::$linkage,
                        $table::sent_message_event_guid,
                        $table::relayed_message_event_guid,
                        $table::from_address,
                        $table::to_address,
                        $table::amount,
                        $table::gas_limit,
                        $table::data,
                        $table::timestamp,
                    ))
                    .into_boxed();

                if let Some(hash) = filter.message_hash() {
                    query = query.filter($table::message_hash.eq(hash.to_hex()));
                }
                if let Some(nonce) = filter.nonce() {
                    query = query.filter($table::nonce.eq(u256_to_numeric(nonce)));
                }
                if let Some(guid) = filter.sent_message_event_guid() {
                    query = query.filter($table::sent_message_event_guid.eq(guid.into_inner()));
                }
                if let Some(guid) = filter.relayed_message_event_guid() {
                    query =
                        query.filter($table::relayed_message_event_guid.eq(guid.into_inner()));
                }
                if let Some(gas_limit) = filter.gas_limit() {
                    query = query.filter($table::gas_limit.eq(u256_to_numeric(gas_limit)));
                }
                if let Some(address) = filter.from_address() {
                    query = query.filter($table::from_address.eq(encode_address(address)));
                }
                if let Some(address) = filter.to_address() {
                    query = query.filter($table::to_address.eq(encode_address(address)));
                }
                if let Some(amount) = filter.amount() {
                    query = query.filter($table::amount.eq(u256_to_numeric(amount)));
                }
                if let Some(data) = filter.data() {
                    query = query.filter($table::data.eq(data.to_vec()));
                }
                if let Some(timestamp) = filter.timestamp() {
                    let Ok(stored_timestamp) = i64::try_from(timestamp) else {
                        return Ok(None);
                    };
                    query = query.filter($table::timestamp.eq(stored_timestamp));
                }

                query
                    .order(($table::nonce.asc(), $table::message_hash.asc()))
                    .first::<BridgeMessageRow>(connection)
                    .optional()?
                    .map(BridgeMessageRow::into_domain::<Self>)
                    .transpose()
            }

            fn mark_relayed(
                connection: &mut PgConnection,
                message_hash: MessageHash,
                relay_event: EventGuid,
            ) -> BridgeMessageStoreResult<()> {
                let hash = message_hash.to_hex();
                let guid = relay_event.into_inner();

                connection.transaction::<_, BridgeMessageStoreError, _>(|tx| {
                    let updated = diesel::update(
                        $table::table
                            .filter($table::message_hash.eq(&hash))
                            .filter($table::relayed_message_event_guid.is_null()),
                    )
                    .set($table::relayed_message_event_guid.eq(Some(guid)))
                    .execute(tx)?;
                    if updated > 0 {
                        return Ok(());
                    }

                    let current = $table::table
                        .filter($table::message_hash.eq(&hash))
                        .select($table::relayed_message_event_guid)
                        .first::<Option<uuid::Uuid>>(tx)
                        .optional()?;
                    resolve_unchanged_relay::<Self>(message_hash, relay_event, current)
                })
            }
        }
    };
}

bridge_message_table!(L1ToL2, l1_bridge_messages, transaction_source_hash);
bridge_message_table!(L2ToL1, l2_bridge_messages, transaction_withdrawal_hash);

/// Explains why a conditional relay update changed no row.
fn resolve_unchanged_relay<D: MessageDirection>(
    message_hash: MessageHash,
    relay_event: EventGuid,
    current: Option<Option<uuid::Uuid>>,
) -> BridgeMessageStoreResult<()> {
    match current {
        None => Err(BridgeMessageStoreError::relay_target_missing::<D>(
            message_hash,
        )),
        Some(Some(existing)) if existing == relay_event.into_inner() => Ok(()),
        Some(Some(existing)) => Err(BridgeMessageStoreError::already_relayed::<D>(
            message_hash,
            EventGuid::from_uuid(existing),
        )),
        Some(None) => Err(BridgeMessageStoreError::persistence(std::io::Error::other(
            format!("{} {message_hash} kept an unset relay field after update", D::LABEL),
        ))),
    }
}
