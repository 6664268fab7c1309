//! Identifier types for the bridge message domain.

use super::ParseMessageHashError;
use alloy_primitives::{B256, hex};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Content-derived identity of a cross-domain message.
///
/// The hash is the sole key of a message within a directional table and is
/// what correlates a relay observation back to the original sent record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageHash(B256);

impl MessageHash {
    /// Wraps an existing 32-byte hash.
    #[must_use]
    pub const fn new(hash: B256) -> Self {
        Self(hash)
    }

    /// Creates a message hash from raw bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(B256::new(bytes))
    }

    /// Returns the wrapped hash.
    #[must_use]
    pub const fn into_inner(self) -> B256 {
        self.0
    }

    /// Returns the `0x`-prefixed lowercase hex encoding used in storage.
    #[must_use]
    pub fn to_hex(&self) -> String {
        hex::encode_prefixed(self.0)
    }
}

impl From<B256> for MessageHash {
    fn from(hash: B256) -> Self {
        Self(hash)
    }
}

impl AsRef<B256> for MessageHash {
    fn as_ref(&self) -> &B256 {
        &self.0
    }
}

impl FromStr for MessageHash {
    type Err = ParseMessageHashError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        B256::from_str(value)
            .map(Self)
            .map_err(|source| ParseMessageHashError {
                input: value.to_owned(),
                source,
            })
    }
}

impl fmt::Display for MessageHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Identifier of an ingestion-pipeline event record.
///
/// Used for traceability only; correlation always goes through
/// [`MessageHash`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventGuid(Uuid);

impl EventGuid {
    /// Creates a new random event identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates an event identifier from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the wrapped UUID.
    #[must_use]
    pub const fn into_inner(self) -> Uuid {
        self.0
    }
}

impl Default for EventGuid {
    fn default() -> Self {
        Self::new()
    }
}

impl AsRef<Uuid> for EventGuid {
    fn as_ref(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for EventGuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
