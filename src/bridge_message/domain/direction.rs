//! Direction markers distinguishing L1-origin from L2-origin messages.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::Hash;

mod sealed {
    pub trait Sealed {}

    impl Sealed for super::L1ToL2 {}
    impl Sealed for super::L2ToL1 {}
}

/// Direction of travel for a bridge message.
///
/// Implemented only by [`L1ToL2`] and [`L2ToL1`]. Each direction names the
/// transaction hash that links a message to the transaction which emitted
/// it on its origin domain.
pub trait MessageDirection:
    sealed::Sealed
    + fmt::Debug
    + Clone
    + Copy
    + PartialEq
    + Eq
    + Hash
    + Default
    + Send
    + Sync
    + 'static
{
    /// Record label used in diagnostics, e.g. `L1BridgeMessage`.
    const LABEL: &'static str;

    /// Name of the direction-specific linkage field.
    const LINKAGE_FIELD: &'static str;
}

/// Messages sent from L1 and relayed on L2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct L1ToL2;

impl MessageDirection for L1ToL2 {
    const LABEL: &'static str = "L1BridgeMessage";
    const LINKAGE_FIELD: &'static str = "transaction_source_hash";
}

/// Messages sent from L2 and relayed on L1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct L2ToL1;

impl MessageDirection for L2ToL1 {
    const LABEL: &'static str = "L2BridgeMessage";
    const LINKAGE_FIELD: &'static str = "transaction_withdrawal_hash";
}
