//! Shared world state for relay correlation BDD scenarios.

use std::collections::HashMap;

use alloy_primitives::{Address, B256, Bytes, U256};
use bridge_store::bridge_message::{
    domain::{
        BridgeMessage, DirectedBridgeMessage, EventGuid, MessageDirection, MessageHash,
        RelayStatus, SentMessage, Transaction,
    },
    services::{BridgeMessageServiceResult, InMemoryBridgeMessagesDb},
};
use rstest::fixture;

/// Direction named in a scenario step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Sent from L1.
    L1,
    /// Sent from L2.
    L2,
}

impl Direction {
    /// Parses `L1` or `L2`.
    pub fn parse(label: &str) -> Result<Self, eyre::Report> {
        match label.trim() {
            "L1" => Ok(Self::L1),
            "L2" => Ok(Self::L2),
            other => Err(eyre::eyre!("unknown direction '{other}'")),
        }
    }
}

/// Scenario world for relay correlation behaviour tests.
pub struct RelayWorld {
    /// Store under test.
    pub db: InMemoryBridgeMessagesDb,
    /// Relay events by scenario name.
    pub events: HashMap<String, EventGuid>,
    /// Result of the last relay attempt made in a `When` step.
    pub last_relay_result: Option<BridgeMessageServiceResult<()>>,
}

impl RelayWorld {
    /// Creates a world with an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            db: InMemoryBridgeMessagesDb::in_memory(),
            events: HashMap::new(),
            last_relay_result: None,
        }
    }

    /// Returns the event registered under `name`, creating it on first use.
    pub fn event(&mut self, name: &str) -> EventGuid {
        *self.events.entry(name.to_owned()).or_default()
    }

    /// Records a relay in `direction`, returning the store's verdict.
    pub fn relay(
        &mut self,
        direction: Direction,
        hash: MessageHash,
        event_name: &str,
    ) -> BridgeMessageServiceResult<()> {
        let event = self.event(event_name);
        match direction {
            Direction::L1 => run_async(self.db.mark_relayed_l1_bridge_message(hash, event)),
            Direction::L2 => run_async(self.db.mark_relayed_l2_bridge_message(hash, event)),
        }
    }

    /// Looks up the relay status of a stored message.
    pub fn relay_status(
        &self,
        direction: Direction,
        hash: MessageHash,
    ) -> Result<Option<RelayStatus>, eyre::Report> {
        let status = match direction {
            Direction::L1 => run_async(self.db.l1_bridge_message(hash))?
                .map(|message| message.relay_status()),
            Direction::L2 => run_async(self.db.l2_bridge_message(hash))?
                .map(|message| message.relay_status()),
        };
        Ok(status)
    }
}

impl Default for RelayWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> RelayWorld {
    RelayWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}

/// Parses a hash byte such as `0xAA` into a hash repeating that byte.
pub fn hash_from_byte(label: &str) -> Result<MessageHash, eyre::Report> {
    let digits = label.trim().trim_start_matches("0x");
    let byte = u8::from_str_radix(digits, 16)
        .map_err(|err| eyre::eyre!("invalid hash byte '{label}': {err}"))?;
    Ok(MessageHash::from_bytes([byte; 32]))
}

/// Builds an unrelayed message with the given hash and nonce.
pub fn sent_message<D: MessageDirection>(hash: MessageHash, nonce: u64) -> DirectedBridgeMessage<D> {
    let message = BridgeMessage::sent(SentMessage {
        message_hash: hash,
        nonce: U256::from(nonce),
        sent_message_event_guid: EventGuid::new(),
        tx: Transaction::new(
            Address::repeat_byte(0x01),
            Address::repeat_byte(0x02),
            U256::ZERO,
            Bytes::new(),
            1_700_000_000,
        ),
        gas_limit: U256::from(100_000_u32),
    });
    DirectedBridgeMessage::new(message, B256::ZERO)
}
