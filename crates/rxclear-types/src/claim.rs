//! Claim submission and metadata types.
//!
//! A [`ClaimSubmission`] carries the full provenance of a dispensed drug:
//! claim identity, NDC code, pharmacy NPI, batch/lot numbers, expiration,
//! and country of dispensation, plus the oracle signature attesting to the
//! claim's authenticity. The registry derives the [`ClaimKey`] from the
//! canonical submission fields.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::{ClaimKey, Result, RxclearError};

/// A pharmaceutical claim as submitted to the registry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClaimSubmission {
    /// Unique claim identifier from the pharmacy system.
    pub claim_id: String,
    /// National Drug Code (11-digit standard).
    pub ndc_code: String,
    /// National Provider Identifier of the dispensing pharmacy.
    pub pharmacy_npi: String,
    /// When the drug was dispensed.
    pub dispense_date: DateTime<Utc>,
    /// Manufacturer batch identifier.
    pub batch_number: String,
    /// Specific lot within the batch.
    pub lot_number: String,
    /// Drug expiration date.
    pub expiration_date: DateTime<Utc>,
    /// ISO 3166-1 alpha-2 country code of the pharmacy (e.g., "US").
    pub country_code: String,
    /// Ed25519 oracle signature over the claim digest.
    pub oracle_sig: Vec<u8>,
}

impl ClaimSubmission {
    /// Canonical bytes committed to by the claim key.
    ///
    /// Format: `claim_id || ndc || npi || dispense_ts(8) || batch || lot`.
    /// The oracle signature is deliberately excluded so the key is a pure
    /// content hash.
    #[must_use]
    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut payload = Vec::with_capacity(128);
        payload.extend_from_slice(self.claim_id.as_bytes());
        payload.extend_from_slice(self.ndc_code.as_bytes());
        payload.extend_from_slice(self.pharmacy_npi.as_bytes());
        payload.extend_from_slice(&self.dispense_date.timestamp().to_le_bytes());
        payload.extend_from_slice(self.batch_number.as_bytes());
        payload.extend_from_slice(self.lot_number.as_bytes());
        payload
    }

    /// Deterministic claim key: domain-separated SHA-256 over the
    /// canonical submission bytes.
    #[must_use]
    pub fn claim_key(&self) -> ClaimKey {
        let mut hasher = Sha256::new();
        hasher.update(b"rxclear:claim:v1:");
        hasher.update(self.canonical_bytes());
        ClaimKey(hasher.finalize().into())
    }

    /// Batch identifier used for recall tracking: `"{ndc}-{batch}"`.
    #[must_use]
    pub fn batch_id(&self) -> String {
        format!("{}-{}", self.ndc_code, self.batch_number)
    }
}

/// Stored claim metadata, retrievable by claim key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimMetadata {
    pub claim_id: String,
    pub ndc_code: String,
    pub pharmacy_npi: String,
    pub dispense_date: DateTime<Utc>,
    pub batch_number: String,
    pub lot_number: String,
    pub expiration_date: DateTime<Utc>,
    pub country_code: String,
}

impl ClaimMetadata {
    #[must_use]
    pub fn from_submission(submission: &ClaimSubmission) -> Self {
        Self {
            claim_id: submission.claim_id.clone(),
            ndc_code: submission.ndc_code.clone(),
            pharmacy_npi: submission.pharmacy_npi.clone(),
            dispense_date: submission.dispense_date,
            batch_number: submission.batch_number.clone(),
            lot_number: submission.lot_number.clone(),
            expiration_date: submission.expiration_date,
            country_code: submission.country_code.clone(),
        }
    }

    /// JSON encoding for indexers and compliance tooling.
    ///
    /// # Errors
    /// Returns [`RxclearError::Serialization`] if encoding fails.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| RxclearError::Serialization(e.to_string()))
    }
}

/// FDA recall classification severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecallSeverity {
    /// Class I: reasonable probability of serious harm or death.
    LifeThreatening,
    /// Class II: temporary or reversible adverse effects.
    Serious,
    /// Class III: unlikely to cause adverse effects.
    Minor,
}

impl std::fmt::Display for RecallSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LifeThreatening => write!(f, "LIFE_THREATENING"),
            Self::Serious => write!(f, "SERIOUS"),
            Self::Minor => write!(f, "MINOR"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn submission() -> ClaimSubmission {
        ClaimSubmission {
            claim_id: "RX-2024-000123".into(),
            ndc_code: "00002-3227-30".into(),
            pharmacy_npi: "1234567890".into(),
            dispense_date: Utc.with_ymd_and_hms(2024, 6, 1, 14, 30, 0).unwrap(),
            batch_number: "B4457".into(),
            lot_number: "L91".into(),
            expiration_date: Utc.with_ymd_and_hms(2026, 6, 1, 0, 0, 0).unwrap(),
            country_code: "US".into(),
            oracle_sig: vec![1u8; 64],
        }
    }

    #[test]
    fn claim_key_is_deterministic() {
        let a = submission().claim_key();
        let b = submission().claim_key();
        assert_eq!(a, b);
    }

    #[test]
    fn claim_key_ignores_signature() {
        let mut with_other_sig = submission();
        with_other_sig.oracle_sig = vec![2u8; 64];
        assert_eq!(submission().claim_key(), with_other_sig.claim_key());
    }

    #[test]
    fn claim_key_changes_with_content() {
        let mut other = submission();
        other.lot_number = "L92".into();
        assert_ne!(submission().claim_key(), other.claim_key());
    }

    #[test]
    fn batch_id_joins_ndc_and_batch() {
        assert_eq!(submission().batch_id(), "00002-3227-30-B4457");
    }

    #[test]
    fn metadata_json_roundtrip() {
        let meta = ClaimMetadata::from_submission(&submission());
        let json = meta.to_json().unwrap();
        let back: ClaimMetadata = serde_json::from_str(&json).unwrap();
        assert_eq!(meta, back);
    }

    #[test]
    fn recall_severity_display() {
        assert_eq!(
            format!("{}", RecallSeverity::LifeThreatening),
            "LIFE_THREATENING"
        );
        assert_eq!(format!("{}", RecallSeverity::Minor), "MINOR");
    }
}
