//! The append-only audit trail.
//!
//! Records form a SHA-256 hash chain: each record commits to its
//! predecessor's hash, so any tampering with a committed record breaks
//! every later link. Committed records are never mutated.
//!
//! [`AuditTrail::mark`] / [`AuditTrail::revert_to`] exist for one purpose:
//! when an atomic operation group aborts, the host discards the records the
//! group appended, so a log lands with its settlement or not at all.

use chrono::{DateTime, Utc};
use rxclear_types::{RecordId, Result, RxclearError};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::event::AuditEvent;

/// Hash of the empty chain head.
const GENESIS_HASH: [u8; 32] = [0u8; 32];

/// One committed audit record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditRecord {
    /// Position in the trail (0-based, dense).
    pub seq: u64,
    /// Globally unique record identifier (UUIDv7, time-ordered).
    pub id: RecordId,
    /// The audited fact.
    pub event: AuditEvent,
    /// When the record was appended.
    pub recorded_at: DateTime<Utc>,
    /// Hash of the preceding record (genesis hash for the first).
    pub prev_hash: [u8; 32],
    /// This record's own chain hash.
    pub record_hash: [u8; 32],
}

/// A position in the trail that the trail can be reverted to.
///
/// Obtained from [`AuditTrail::mark`] before executing an atomic group.
#[derive(Debug, Clone, Copy)]
pub struct AuditMark {
    len: usize,
    head: [u8; 32],
}

/// Append-only, hash-chained audit log.
#[derive(Debug, Clone, Default)]
pub struct AuditTrail {
    records: Vec<AuditRecord>,
    head: [u8; 32],
}

impl AuditTrail {
    /// Create an empty trail.
    #[must_use]
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            head: GENESIS_HASH,
        }
    }

    /// Append an event. Infallible: the commitment is computed over the
    /// closed event type directly, with no serializer in the path.
    pub fn record(&mut self, event: AuditEvent, now: DateTime<Utc>) -> RecordId {
        let seq = self.records.len() as u64;
        let prev_hash = self.head;
        let record_hash = Self::chain_hash(seq, &prev_hash, now, &event);
        let id = RecordId::new();

        tracing::debug!(seq, event = event.name(), "audit record appended");

        self.records.push(AuditRecord {
            seq,
            id,
            event,
            recorded_at: now,
            prev_hash,
            record_hash,
        });
        self.head = record_hash;
        id
    }

    /// Take a mark at the current trail position.
    #[must_use]
    pub fn mark(&self) -> AuditMark {
        AuditMark {
            len: self.records.len(),
            head: self.head,
        }
    }

    /// Discard every record appended after `mark`.
    ///
    /// Called only when an atomic group aborts; records appended before
    /// the mark are untouched.
    pub fn revert_to(&mut self, mark: AuditMark) {
        debug_assert!(mark.len <= self.records.len(), "mark from a longer trail");
        self.records.truncate(mark.len);
        self.head = mark.head;
    }

    /// Verify every link of the chain.
    ///
    /// # Errors
    /// Returns [`RxclearError::Internal`] naming the first broken record.
    pub fn verify_chain(&self) -> Result<()> {
        let mut expected_prev = GENESIS_HASH;
        for record in &self.records {
            if record.prev_hash != expected_prev {
                return Err(RxclearError::Internal(format!(
                    "audit chain broken at seq {}: prev-hash mismatch",
                    record.seq
                )));
            }
            let recomputed = Self::chain_hash(
                record.seq,
                &record.prev_hash,
                record.recorded_at,
                &record.event,
            );
            if recomputed != record.record_hash {
                return Err(RxclearError::Internal(format!(
                    "audit chain broken at seq {}: record hash mismatch",
                    record.seq
                )));
            }
            expected_prev = record.record_hash;
        }
        Ok(())
    }

    /// All committed records, in append order.
    #[must_use]
    pub fn records(&self) -> &[AuditRecord] {
        &self.records
    }

    /// The most recently committed record.
    #[must_use]
    pub fn last(&self) -> Option<&AuditRecord> {
        self.records.last()
    }

    /// Current chain head hash.
    #[must_use]
    pub fn head(&self) -> [u8; 32] {
        self.head
    }

    /// Number of committed records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the trail is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn chain_hash(
        seq: u64,
        prev_hash: &[u8; 32],
        recorded_at: DateTime<Utc>,
        event: &AuditEvent,
    ) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(b"rxclear:audit:v1:");
        hasher.update(seq.to_le_bytes());
        hasher.update(prev_hash);
        hasher.update(recorded_at.timestamp_micros().to_le_bytes());
        event.write_commitment(&mut hasher);
        hasher.finalize().into()
    }
}
