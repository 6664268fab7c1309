//! Origin transaction metadata embedded in every bridge message.

use alloy_primitives::{Address, Bytes, U256};
use serde::{Deserialize, Serialize};

/// The on-chain transaction that dispatched a bridge message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    from_address: Address,
    to_address: Address,
    amount: U256,
    data: Bytes,
    timestamp: u64,
}

impl Transaction {
    /// Creates transaction metadata.
    ///
    /// `timestamp` is the block time in seconds since the Unix epoch.
    #[must_use]
    pub const fn new(
        from_address: Address,
        to_address: Address,
        amount: U256,
        data: Bytes,
        timestamp: u64,
    ) -> Self {
        Self {
            from_address,
            to_address,
            amount,
            data,
            timestamp,
        }
    }

    /// Returns the sender address.
    #[must_use]
    pub const fn from_address(&self) -> Address {
        self.from_address
    }

    /// Returns the target address on the destination domain.
    #[must_use]
    pub const fn to_address(&self) -> Address {
        self.to_address
    }

    /// Returns the value transferred with the message.
    #[must_use]
    pub const fn amount(&self) -> U256 {
        self.amount
    }

    /// Returns the message calldata.
    #[must_use]
    pub const fn data(&self) -> &Bytes {
        &self.data
    }

    /// Returns the block timestamp in seconds.
    #[must_use]
    pub const fn timestamp(&self) -> u64 {
        self.timestamp
    }
}
