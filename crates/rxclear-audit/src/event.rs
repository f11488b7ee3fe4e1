//! The closed audit event vocabulary.
//!
//! Every compliance-relevant fact in the clearing pipeline is one of these
//! variants. Events are committed into the trail's hash chain field by
//! field, so the commitment does not depend on any serializer.

use chrono::{DateTime, Utc};
use rxclear_types::{Address, Amount, ClaimKey, RecallSeverity};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// A structured audit fact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuditEvent {
    /// A claim passed ingestion and was stored.
    ClaimSubmitted {
        claim_key: ClaimKey,
        claim_id: String,
        ndc_code: String,
        pharmacy_npi: String,
        dispense_date: DateTime<Utc>,
    },
    /// A claim was accepted for a batch under an active recall.
    RecalledDrugDispensed {
        claim_key: ClaimKey,
        batch_id: String,
        pharmacy_npi: String,
    },
    /// A claim was accepted for a drug past its expiration date.
    ExpiredDrugDispensed {
        claim_key: ClaimKey,
        ndc_code: String,
        pharmacy_npi: String,
        expiration_date: DateTime<Utc>,
    },
    /// A batch recall was issued.
    RecallIssued {
        batch_id: String,
        reason: String,
        severity: RecallSeverity,
        affected_claims: u64,
    },
    /// A manufacturer registered a tier schedule.
    ScheduleRegistered {
        manufacturer: Address,
        base_bps: u64,
        volume_threshold: u64,
        bonus_bps: u64,
    },
    /// Anti-competitive schedule terms detected (biosimilar exclusion).
    FormularyLock {
        manufacturer: Address,
        base_bps: u64,
        note: String,
    },
    /// A claim's volume crossed into the bonus tier.
    BonusTierActivated {
        claim_key: ClaimKey,
        manufacturer: Address,
        current_volume: u64,
    },
    /// A rebate accrual was computed.
    RebateCalculated {
        claim_key: ClaimKey,
        manufacturer: Address,
        wac_price: Amount,
        effective_bps: u64,
        rebate_amount: Amount,
    },
    /// The escrow received funding.
    EscrowFunded { sender: Address, amount: Amount },
    /// A rebate settled: payee and fee transfers committed atomically.
    RebateSettled {
        claim_key: ClaimKey,
        payee_address: Address,
        fee_recipient_address: Address,
        payee_amount: Amount,
        fee_amount: Amount,
    },
    /// A party disputed a claim.
    DisputeLogged {
        claim_key: ClaimKey,
        disputing_party: Address,
        reason: String,
        disputed_amount: Amount,
    },
    /// A manufacturer crossed a cumulative volume milestone.
    VolumeMilestone {
        manufacturer: Address,
        total_volume: u64,
        milestone: String,
    },
}

impl AuditEvent {
    /// Canonical event name, as indexed by compliance tooling.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::ClaimSubmitted { .. } => "CLAIM_SUBMITTED",
            Self::RecalledDrugDispensed { .. } => "RECALLED_DRUG_DISPENSED",
            Self::ExpiredDrugDispensed { .. } => "EXPIRED_DRUG_DISPENSED",
            Self::RecallIssued { .. } => "DRUG_RECALL_ISSUED",
            Self::ScheduleRegistered { .. } => "SCHEDULE_REGISTERED",
            Self::FormularyLock { .. } => "FORMULARY_LOCK",
            Self::BonusTierActivated { .. } => "BONUS_TIER_ACTIVATED",
            Self::RebateCalculated { .. } => "REBATE_CALCULATED",
            Self::EscrowFunded { .. } => "ESCROW_FUNDED",
            Self::RebateSettled { .. } => "REBATE_SETTLED",
            Self::DisputeLogged { .. } => "DISPUTE_LOGGED",
            Self::VolumeMilestone { .. } => "VOLUME_MILESTONE",
        }
    }

    /// Feed this event's fields into a hash commitment.
    ///
    /// Field order is fixed; each variant starts with its canonical name
    /// so distinct variants can never collide.
    pub fn write_commitment(&self, hasher: &mut Sha256) {
        hasher.update(self.name().as_bytes());
        match self {
            Self::ClaimSubmitted {
                claim_key,
                claim_id,
                ndc_code,
                pharmacy_npi,
                dispense_date,
            } => {
                hasher.update(claim_key.as_bytes());
                hasher.update(claim_id.as_bytes());
                hasher.update(ndc_code.as_bytes());
                hasher.update(pharmacy_npi.as_bytes());
                hasher.update(dispense_date.timestamp().to_le_bytes());
            }
            Self::RecalledDrugDispensed {
                claim_key,
                batch_id,
                pharmacy_npi,
            } => {
                hasher.update(claim_key.as_bytes());
                hasher.update(batch_id.as_bytes());
                hasher.update(pharmacy_npi.as_bytes());
            }
            Self::ExpiredDrugDispensed {
                claim_key,
                ndc_code,
                pharmacy_npi,
                expiration_date,
            } => {
                hasher.update(claim_key.as_bytes());
                hasher.update(ndc_code.as_bytes());
                hasher.update(pharmacy_npi.as_bytes());
                hasher.update(expiration_date.timestamp().to_le_bytes());
            }
            Self::RecallIssued {
                batch_id,
                reason,
                severity,
                affected_claims,
            } => {
                hasher.update(batch_id.as_bytes());
                hasher.update(reason.as_bytes());
                hasher.update(severity.to_string().as_bytes());
                hasher.update(affected_claims.to_le_bytes());
            }
            Self::ScheduleRegistered {
                manufacturer,
                base_bps,
                volume_threshold,
                bonus_bps,
            } => {
                hasher.update(manufacturer.as_bytes());
                hasher.update(base_bps.to_le_bytes());
                hasher.update(volume_threshold.to_le_bytes());
                hasher.update(bonus_bps.to_le_bytes());
            }
            Self::FormularyLock {
                manufacturer,
                base_bps,
                note,
            } => {
                hasher.update(manufacturer.as_bytes());
                hasher.update(base_bps.to_le_bytes());
                hasher.update(note.as_bytes());
            }
            Self::BonusTierActivated {
                claim_key,
                manufacturer,
                current_volume,
            } => {
                hasher.update(claim_key.as_bytes());
                hasher.update(manufacturer.as_bytes());
                hasher.update(current_volume.to_le_bytes());
            }
            Self::RebateCalculated {
                claim_key,
                manufacturer,
                wac_price,
                effective_bps,
                rebate_amount,
            } => {
                hasher.update(claim_key.as_bytes());
                hasher.update(manufacturer.as_bytes());
                hasher.update(wac_price.micro().to_le_bytes());
                hasher.update(effective_bps.to_le_bytes());
                hasher.update(rebate_amount.micro().to_le_bytes());
            }
            Self::EscrowFunded { sender, amount } => {
                hasher.update(sender.as_bytes());
                hasher.update(amount.micro().to_le_bytes());
            }
            Self::RebateSettled {
                claim_key,
                payee_address,
                fee_recipient_address,
                payee_amount,
                fee_amount,
            } => {
                hasher.update(claim_key.as_bytes());
                hasher.update(payee_address.as_bytes());
                hasher.update(fee_recipient_address.as_bytes());
                hasher.update(payee_amount.micro().to_le_bytes());
                hasher.update(fee_amount.micro().to_le_bytes());
            }
            Self::DisputeLogged {
                claim_key,
                disputing_party,
                reason,
                disputed_amount,
            } => {
                hasher.update(claim_key.as_bytes());
                hasher.update(disputing_party.as_bytes());
                hasher.update(reason.as_bytes());
                hasher.update(disputed_amount.micro().to_le_bytes());
            }
            Self::VolumeMilestone {
                manufacturer,
                total_volume,
                milestone,
            } => {
                hasher.update(manufacturer.as_bytes());
                hasher.update(total_volume.to_le_bytes());
                hasher.update(milestone.as_bytes());
            }
        }
    }
}

impl std::fmt::Display for AuditEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
