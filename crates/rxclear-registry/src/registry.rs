//! Claim registry — deduplication, oracle verification, and provenance.
//!
//! The registry is the trust layer of the pipeline: it derives the content
//! hash that every downstream component joins on, hard-rejects duplicate
//! submissions, and verifies that a designated oracle signed the claim
//! digest. It also tracks batch/lot provenance so recalled or expired
//! dispensations are flagged to the audit trail.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use ed25519_dalek::{Signature, VerifyingKey};
use rxclear_audit::{AuditEvent, AuditTrail};
use rxclear_types::{ClaimKey, ClaimMetadata, ClaimSubmission, RecallSeverity, Result, RxclearError};

/// Prevents duplicate claims and stores verified claim metadata.
///
/// A claim is accepted exactly once; resubmission of the same content is a
/// hard rejection. Claims for recalled batches or expired drugs are still
/// accepted (the dispensation already happened) but flagged for
/// investigation.
pub struct ClaimRegistry {
    /// The oracle key claims must be signed with.
    oracle_key: VerifyingKey,
    /// Accepted claims by content hash.
    claims: HashMap<ClaimKey, ClaimMetadata>,
    /// Claims grouped by batch id (`"{ndc}-{batch}"`), for recall impact.
    batch_claims: HashMap<String, Vec<ClaimKey>>,
    /// Recalled batches and the recall reason.
    recalled: HashMap<String, String>,
}

impl ClaimRegistry {
    /// Create a registry trusting the given oracle key.
    #[must_use]
    pub fn new(oracle_key: VerifyingKey) -> Self {
        Self {
            oracle_key,
            claims: HashMap::new(),
            batch_claims: HashMap::new(),
            recalled: HashMap::new(),
        }
    }

    /// Submit a claim.
    ///
    /// 1. Verify the oracle signature over the claim digest
    /// 2. Reject duplicates by content hash
    /// 3. Flag recalled-batch and expired-drug dispensations
    /// 4. Store metadata and link the claim to its batch
    ///
    /// # Errors
    /// - [`RxclearError::InvalidClaim`] on empty identity fields
    /// - [`RxclearError::OracleSignatureMissing`] / [`RxclearError::OracleSignatureInvalid`]
    /// - [`RxclearError::DuplicateClaim`] if the content hash is known
    pub fn submit_claim(
        &mut self,
        submission: &ClaimSubmission,
        audit: &mut AuditTrail,
        now: DateTime<Utc>,
    ) -> Result<ClaimKey> {
        if submission.claim_id.is_empty() || submission.ndc_code.is_empty() {
            return Err(RxclearError::InvalidClaim {
                reason: "claim_id and ndc_code are required".into(),
            });
        }

        let claim_key = submission.claim_key();
        self.verify_oracle_signature(&claim_key, &submission.oracle_sig)?;

        if self.claims.contains_key(&claim_key) {
            return Err(RxclearError::DuplicateClaim(claim_key));
        }

        let batch_id = submission.batch_id();
        if self.recalled.contains_key(&batch_id) {
            tracing::warn!(%claim_key, %batch_id, "claim accepted for recalled batch");
            audit.record(
                AuditEvent::RecalledDrugDispensed {
                    claim_key,
                    batch_id: batch_id.clone(),
                    pharmacy_npi: submission.pharmacy_npi.clone(),
                },
                now,
            );
        }
        if submission.expiration_date < now {
            audit.record(
                AuditEvent::ExpiredDrugDispensed {
                    claim_key,
                    ndc_code: submission.ndc_code.clone(),
                    pharmacy_npi: submission.pharmacy_npi.clone(),
                    expiration_date: submission.expiration_date,
                },
                now,
            );
        }

        self.claims
            .insert(claim_key, ClaimMetadata::from_submission(submission));
        self.batch_claims.entry(batch_id).or_default().push(claim_key);

        audit.record(
            AuditEvent::ClaimSubmitted {
                claim_key,
                claim_id: submission.claim_id.clone(),
                ndc_code: submission.ndc_code.clone(),
                pharmacy_npi: submission.pharmacy_npi.clone(),
                dispense_date: submission.dispense_date,
            },
            now,
        );

        Ok(claim_key)
    }

    /// Whether a claim with this key has been accepted.
    #[must_use]
    pub fn is_claim_valid(&self, claim_key: &ClaimKey) -> bool {
        self.claims.contains_key(claim_key)
    }

    /// Retrieve stored claim metadata.
    ///
    /// # Errors
    /// Returns [`RxclearError::ClaimNotFound`] for unknown keys.
    pub fn get_claim_metadata(&self, claim_key: &ClaimKey) -> Result<&ClaimMetadata> {
        self.claims
            .get(claim_key)
            .ok_or(RxclearError::ClaimNotFound(*claim_key))
    }

    /// Issue a recall for a batch and report how many accepted claims it
    /// affects.
    pub fn issue_recall(
        &mut self,
        ndc_code: &str,
        batch_number: &str,
        reason: &str,
        severity: RecallSeverity,
        audit: &mut AuditTrail,
        now: DateTime<Utc>,
    ) -> usize {
        let batch_id = format!("{ndc_code}-{batch_number}");
        self.recalled.insert(batch_id.clone(), reason.to_string());

        let affected = self
            .batch_claims
            .get(&batch_id)
            .map_or(0, Vec::len);

        audit.record(
            AuditEvent::RecallIssued {
                batch_id,
                reason: reason.to_string(),
                severity,
                affected_claims: affected as u64,
            },
            now,
        );
        affected
    }

    /// Whether a batch is under recall.
    #[must_use]
    pub fn is_batch_recalled(&self, ndc_code: &str, batch_number: &str) -> bool {
        self.recalled
            .contains_key(&format!("{ndc_code}-{batch_number}"))
    }

    /// Number of accepted claims for a batch.
    #[must_use]
    pub fn batch_claim_count(&self, ndc_code: &str, batch_number: &str) -> usize {
        self.batch_claims
            .get(&format!("{ndc_code}-{batch_number}"))
            .map_or(0, Vec::len)
    }

    /// Total number of accepted claims.
    #[must_use]
    pub fn claim_count(&self) -> usize {
        self.claims.len()
    }

    fn verify_oracle_signature(&self, claim_key: &ClaimKey, sig: &[u8]) -> Result<()> {
        if sig.is_empty() {
            return Err(RxclearError::OracleSignatureMissing);
        }
        let signature =
            Signature::from_slice(sig).map_err(|_| RxclearError::OracleSignatureInvalid)?;
        self.oracle_key
            .verify_strict(claim_key.as_bytes(), &signature)
            .map_err(|_| RxclearError::OracleSignatureInvalid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use ed25519_dalek::{Signer, SigningKey};
    use rand::rngs::OsRng;

    fn oracle() -> SigningKey {
        SigningKey::generate(&mut OsRng)
    }

    fn submission(claim_id: &str) -> ClaimSubmission {
        ClaimSubmission {
            claim_id: claim_id.into(),
            ndc_code: "00002-3227-30".into(),
            pharmacy_npi: "1234567890".into(),
            dispense_date: Utc.with_ymd_and_hms(2024, 6, 1, 14, 30, 0).unwrap(),
            batch_number: "B4457".into(),
            lot_number: "L91".into(),
            expiration_date: Utc.with_ymd_and_hms(2099, 1, 1, 0, 0, 0).unwrap(),
            country_code: "US".into(),
            oracle_sig: Vec::new(),
        }
    }

    fn signed(oracle: &SigningKey, claim_id: &str) -> ClaimSubmission {
        let mut s = submission(claim_id);
        s.oracle_sig = oracle.sign(s.claim_key().as_bytes()).to_bytes().to_vec();
        s
    }

    #[test]
    fn submit_stores_claim_and_metadata() {
        let oracle = oracle();
        let mut registry = ClaimRegistry::new(oracle.verifying_key());
        let mut audit = AuditTrail::new();

        let sub = signed(&oracle, "RX-1");
        let key = registry
            .submit_claim(&sub, &mut audit, Utc::now())
            .unwrap();

        assert!(registry.is_claim_valid(&key));
        assert_eq!(registry.claim_count(), 1);
        let meta = registry.get_claim_metadata(&key).unwrap();
        assert_eq!(meta.claim_id, "RX-1");
        assert_eq!(audit.len(), 1);
        assert_eq!(audit.last().unwrap().event.name(), "CLAIM_SUBMITTED");
    }

    #[test]
    fn duplicate_claim_rejected() {
        let oracle = oracle();
        let mut registry = ClaimRegistry::new(oracle.verifying_key());
        let mut audit = AuditTrail::new();

        let sub = signed(&oracle, "RX-1");
        registry.submit_claim(&sub, &mut audit, Utc::now()).unwrap();

        let err = registry
            .submit_claim(&sub, &mut audit, Utc::now())
            .unwrap_err();
        assert!(matches!(err, RxclearError::DuplicateClaim(_)));
        assert_eq!(registry.claim_count(), 1);
    }

    #[test]
    fn missing_signature_rejected() {
        let oracle = oracle();
        let mut registry = ClaimRegistry::new(oracle.verifying_key());
        let mut audit = AuditTrail::new();

        let err = registry
            .submit_claim(&submission("RX-1"), &mut audit, Utc::now())
            .unwrap_err();
        assert!(matches!(err, RxclearError::OracleSignatureMissing));
        assert!(audit.is_empty());
    }

    #[test]
    fn wrong_oracle_rejected() {
        let trusted = oracle();
        let impostor = oracle();
        let mut registry = ClaimRegistry::new(trusted.verifying_key());
        let mut audit = AuditTrail::new();

        let sub = signed(&impostor, "RX-1");
        let err = registry
            .submit_claim(&sub, &mut audit, Utc::now())
            .unwrap_err();
        assert!(matches!(err, RxclearError::OracleSignatureInvalid));
    }

    #[test]
    fn tampered_content_fails_verification() {
        let oracle = oracle();
        let mut registry = ClaimRegistry::new(oracle.verifying_key());
        let mut audit = AuditTrail::new();

        // Sign one claim, then alter the content so the digest moves.
        let mut sub = signed(&oracle, "RX-1");
        sub.lot_number = "L-FORGED".into();

        let err = registry
            .submit_claim(&sub, &mut audit, Utc::now())
            .unwrap_err();
        assert!(matches!(err, RxclearError::OracleSignatureInvalid));
    }

    #[test]
    fn empty_identity_fields_rejected() {
        let oracle = oracle();
        let mut registry = ClaimRegistry::new(oracle.verifying_key());
        let mut audit = AuditTrail::new();

        let mut sub = submission("");
        sub.oracle_sig = vec![0u8; 64];
        let err = registry
            .submit_claim(&sub, &mut audit, Utc::now())
            .unwrap_err();
        assert!(matches!(err, RxclearError::InvalidClaim { .. }));
    }

    #[test]
    fn unknown_claim_not_found() {
        let registry = ClaimRegistry::new(oracle().verifying_key());
        let key = ClaimKey::from_bytes([0xFF; 32]);
        assert!(!registry.is_claim_valid(&key));
        let err = registry.get_claim_metadata(&key).unwrap_err();
        assert!(matches!(err, RxclearError::ClaimNotFound(_)));
    }

    #[test]
    fn recall_flags_later_dispensations() {
        let oracle = oracle();
        let mut registry = ClaimRegistry::new(oracle.verifying_key());
        let mut audit = AuditTrail::new();
        let now = Utc::now();

        // One claim in the batch before the recall.
        registry
            .submit_claim(&signed(&oracle, "RX-1"), &mut audit, now)
            .unwrap();

        let affected = registry.issue_recall(
            "00002-3227-30",
            "B4457",
            "sterility failure",
            RecallSeverity::LifeThreatening,
            &mut audit,
            now,
        );
        assert_eq!(affected, 1);
        assert!(registry.is_batch_recalled("00002-3227-30", "B4457"));

        // A second claim for the recalled batch is accepted but flagged.
        registry
            .submit_claim(&signed(&oracle, "RX-2"), &mut audit, now)
            .unwrap();
        assert_eq!(registry.batch_claim_count("00002-3227-30", "B4457"), 2);

        let names: Vec<_> = audit.records().iter().map(|r| r.event.name()).collect();
        assert!(names.contains(&"DRUG_RECALL_ISSUED"));
        assert!(names.contains(&"RECALLED_DRUG_DISPENSED"));
        audit.verify_chain().unwrap();
    }

    #[test]
    fn expired_drug_flagged_but_accepted() {
        let oracle = oracle();
        let mut registry = ClaimRegistry::new(oracle.verifying_key());
        let mut audit = AuditTrail::new();

        let mut sub = submission("RX-EXP");
        sub.expiration_date = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        sub.oracle_sig = oracle.sign(sub.claim_key().as_bytes()).to_bytes().to_vec();

        let key = registry
            .submit_claim(&sub, &mut audit, Utc::now())
            .unwrap();
        assert!(registry.is_claim_valid(&key));

        let names: Vec<_> = audit.records().iter().map(|r| r.event.name()).collect();
        assert_eq!(names, vec!["EXPIRED_DRUG_DISPENSED", "CLAIM_SUBMITTED"]);
    }
}
