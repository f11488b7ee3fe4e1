//! Identifiers used throughout RxClear.
//!
//! `ClaimKey` is a content digest (SHA-256), `Address` is a raw 32-byte
//! account key, and `RecordId` uses UUIDv7 for time-ordered lexicographic
//! sorting of audit records.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// ClaimKey
// ---------------------------------------------------------------------------

/// Content hash uniquely identifying a pharmaceutical claim.
///
/// Computed by the registry as a domain-separated SHA-256 digest over the
/// canonical claim fields. The join key across registry, rebate engine,
/// and settlement engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct ClaimKey(pub [u8; 32]);

impl ClaimKey {
    #[must_use]
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    #[must_use]
    pub fn short(&self) -> String {
        hex::encode(&self.0[..4])
    }
}

impl fmt::Display for ClaimKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "claim:{}", hex::encode(&self.0[..8]))
    }
}

// ---------------------------------------------------------------------------
// Address
// ---------------------------------------------------------------------------

/// A ledger account identifier (raw 32-byte key).
///
/// Pharmacies, PBMs, manufacturers, oracles, treasuries, and the escrow
/// itself are all addressed this way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct Address(pub [u8; 32]);

impl Address {
    #[must_use]
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    #[must_use]
    pub fn short(&self) -> String {
        hex::encode(&self.0[..4])
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "addr:{}", hex::encode(&self.0[..8]))
    }
}

// ---------------------------------------------------------------------------
// AssetId
// ---------------------------------------------------------------------------

/// Numeric asset identifier.
///
/// `AssetId::NATIVE` (0) is the stake currency moved by payment operations;
/// rebates move in the settlement asset configured on the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct AssetId(pub u64);

impl AssetId {
    /// The native stake currency.
    pub const NATIVE: Self = Self(crate::constants::NATIVE_ASSET_ID);

    #[must_use]
    pub fn is_native(&self) -> bool {
        *self == Self::NATIVE
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "asset:{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// RecordId
// ---------------------------------------------------------------------------

/// Globally unique audit record identifier. Uses UUIDv7 for time-ordered sorting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct RecordId(pub Uuid);

impl RecordId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for RecordId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rec:{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn claim_key_display_is_prefixed_hex() {
        let key = ClaimKey::from_bytes([0xAB; 32]);
        assert_eq!(format!("{key}"), "claim:abababababababab");
        assert_eq!(key.short(), "abababab");
    }

    #[test]
    fn address_display_is_prefixed_hex() {
        let addr = Address::from_bytes([0x01; 32]);
        assert_eq!(format!("{addr}"), "addr:0101010101010101");
    }

    #[test]
    fn native_asset_id() {
        assert!(AssetId::NATIVE.is_native());
        assert!(!AssetId(31566704).is_native());
    }

    #[test]
    fn record_id_uniqueness_and_ordering() {
        let a = RecordId::new();
        let b = RecordId::new();
        assert_ne!(a, b);
        assert!(a < b);
    }

    #[test]
    fn serde_roundtrips() {
        let key = ClaimKey::from_bytes([9u8; 32]);
        let json = serde_json::to_string(&key).unwrap();
        let back: ClaimKey = serde_json::from_str(&json).unwrap();
        assert_eq!(key, back);

        let addr = Address::from_bytes([3u8; 32]);
        let json = serde_json::to_string(&addr).unwrap();
        let back: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(addr, back);
    }
}
