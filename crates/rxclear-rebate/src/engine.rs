//! Rebate engine — tier schedules and accrual computation.
//!
//! One accrual per claim key, ever: recomputing an already-accrued claim is
//! rejected rather than silently returning a possibly different amount.
//! Per-manufacturer running totals use checked arithmetic throughout.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rxclear_audit::{AuditEvent, AuditTrail};
use rxclear_types::{
    Address, Amount, ClaimKey, RebateAccrual, Result, RxclearError, TierSchedule,
};

/// Manages rebate schedules and computes per-claim accruals.
pub struct RebateEngine {
    /// Registered schedules by manufacturer.
    schedules: HashMap<Address, TierSchedule>,
    /// Per-claim accrued liabilities. Write-once.
    accruals: HashMap<ClaimKey, RebateAccrual>,
    /// Total accrued liability per manufacturer.
    totals: HashMap<Address, Amount>,
}

impl RebateEngine {
    /// Create an empty rebate engine.
    #[must_use]
    pub fn new() -> Self {
        Self {
            schedules: HashMap::new(),
            accruals: HashMap::new(),
            totals: HashMap::new(),
        }
    }

    /// Register (or replace) a manufacturer's tier schedule.
    ///
    /// A schedule excluding biosimilars is accepted but flagged to the
    /// audit trail as a potential anti-competitive practice.
    ///
    /// # Errors
    /// Returns [`RxclearError::InvalidSchedule`] on out-of-bounds rates.
    pub fn register_schedule(
        &mut self,
        manufacturer: Address,
        schedule: TierSchedule,
        audit: &mut AuditTrail,
        now: DateTime<Utc>,
    ) -> Result<()> {
        schedule.validate()?;

        if schedule.excludes_biosimilars {
            tracing::warn!(%manufacturer, "biosimilar exclusion in schedule");
            audit.record(
                AuditEvent::FormularyLock {
                    manufacturer,
                    base_bps: schedule.base_bps,
                    note: "Biosimilar exclusion detected - regulatory review required".into(),
                },
                now,
            );
        }

        self.schedules.insert(manufacturer, schedule);
        self.totals.entry(manufacturer).or_insert(Amount::ZERO);

        audit.record(
            AuditEvent::ScheduleRegistered {
                manufacturer,
                base_bps: schedule.base_bps,
                volume_threshold: schedule.volume_threshold,
                bonus_bps: schedule.bonus_bps,
            },
            now,
        );
        Ok(())
    }

    /// Compute the rebate accrual for one claim.
    ///
    /// Applies the manufacturer's schedule to the claim's WAC price at the
    /// given cumulative volume; above the threshold the bonus tier adds to
    /// the base rate.
    ///
    /// # Errors
    /// - [`RxclearError::ManufacturerNotRegistered`] without a schedule
    /// - [`RxclearError::DuplicateAccrual`] if the claim was already accrued
    /// - [`RxclearError::AmountOverflow`] if the liability total saturates
    pub fn calculate_accrual(
        &mut self,
        claim_key: ClaimKey,
        manufacturer: Address,
        wac_price: Amount,
        current_volume: u64,
        audit: &mut AuditTrail,
        now: DateTime<Utc>,
    ) -> Result<Amount> {
        let schedule = self
            .schedules
            .get(&manufacturer)
            .copied()
            .ok_or(RxclearError::ManufacturerNotRegistered(manufacturer))?;

        if self.accruals.contains_key(&claim_key) {
            return Err(RxclearError::DuplicateAccrual(claim_key));
        }

        let effective_bps = schedule.effective_bps(current_volume);
        if schedule.bonus_applies(current_volume) {
            audit.record(
                AuditEvent::BonusTierActivated {
                    claim_key,
                    manufacturer,
                    current_volume,
                },
                now,
            );
        }

        let amount = wac_price.bps_of(effective_bps)?;
        let total = self
            .totals
            .get(&manufacturer)
            .copied()
            .unwrap_or(Amount::ZERO)
            .checked_add(amount)?;

        self.accruals.insert(
            claim_key,
            RebateAccrual {
                claim_key,
                manufacturer,
                wac_price,
                effective_bps,
                amount,
            },
        );
        self.totals.insert(manufacturer, total);

        audit.record(
            AuditEvent::RebateCalculated {
                claim_key,
                manufacturer,
                wac_price,
                effective_bps,
                rebate_amount: amount,
            },
            now,
        );
        Ok(amount)
    }

    /// Retrieve the accrual for a claim.
    ///
    /// # Errors
    /// Returns [`RxclearError::AccrualNotFound`] if no accrual exists.
    pub fn get_accrual(&self, claim_key: &ClaimKey) -> Result<&RebateAccrual> {
        self.accruals
            .get(claim_key)
            .ok_or(RxclearError::AccrualNotFound(*claim_key))
    }

    /// Total accrued liability for a manufacturer (zero if unknown).
    #[must_use]
    pub fn manufacturer_total(&self, manufacturer: &Address) -> Amount {
        self.totals
            .get(manufacturer)
            .copied()
            .unwrap_or(Amount::ZERO)
    }

    /// Whether a manufacturer has a registered schedule.
    #[must_use]
    pub fn is_registered(&self, manufacturer: &Address) -> bool {
        self.schedules.contains_key(manufacturer)
    }
}

impl Default for RebateEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manufacturer() -> Address {
        Address::from_bytes([0x4D; 32])
    }

    fn key(n: u8) -> ClaimKey {
        ClaimKey::from_bytes([n; 32])
    }

    fn schedule() -> TierSchedule {
        TierSchedule {
            base_bps: 1500,
            volume_threshold: 10_000,
            bonus_bps: 500,
            excludes_biosimilars: false,
        }
    }

    fn engine_with_schedule() -> (RebateEngine, AuditTrail) {
        let mut engine = RebateEngine::new();
        let mut audit = AuditTrail::new();
        engine
            .register_schedule(manufacturer(), schedule(), &mut audit, Utc::now())
            .unwrap();
        (engine, audit)
    }

    #[test]
    fn base_tier_accrual() {
        let (mut engine, mut audit) = engine_with_schedule();

        // 15% of 2_000_000 microUSD = 300_000
        let amount = engine
            .calculate_accrual(
                key(1),
                manufacturer(),
                Amount::new(2_000_000),
                5_000,
                &mut audit,
                Utc::now(),
            )
            .unwrap();
        assert_eq!(amount, Amount::new(300_000));
        assert_eq!(engine.manufacturer_total(&manufacturer()), amount);

        let accrual = engine.get_accrual(&key(1)).unwrap();
        assert_eq!(accrual.effective_bps, 1500);
    }

    #[test]
    fn bonus_tier_above_threshold() {
        let (mut engine, mut audit) = engine_with_schedule();

        // 20% of 2_000_000 = 400_000, and the bonus event is recorded
        let amount = engine
            .calculate_accrual(
                key(1),
                manufacturer(),
                Amount::new(2_000_000),
                10_001,
                &mut audit,
                Utc::now(),
            )
            .unwrap();
        assert_eq!(amount, Amount::new(400_000));

        let names: Vec<_> = audit.records().iter().map(|r| r.event.name()).collect();
        assert!(names.contains(&"BONUS_TIER_ACTIVATED"));
    }

    #[test]
    fn recomputation_rejected() {
        let (mut engine, mut audit) = engine_with_schedule();
        engine
            .calculate_accrual(
                key(1),
                manufacturer(),
                Amount::new(1_000_000),
                0,
                &mut audit,
                Utc::now(),
            )
            .unwrap();

        let err = engine
            .calculate_accrual(
                key(1),
                manufacturer(),
                Amount::new(9_999_999),
                0,
                &mut audit,
                Utc::now(),
            )
            .unwrap_err();
        assert!(matches!(err, RxclearError::DuplicateAccrual(_)));

        // The stored accrual is the original one.
        assert_eq!(engine.get_accrual(&key(1)).unwrap().amount, Amount::new(150_000));
    }

    #[test]
    fn unregistered_manufacturer_rejected() {
        let mut engine = RebateEngine::new();
        let mut audit = AuditTrail::new();
        let err = engine
            .calculate_accrual(
                key(1),
                manufacturer(),
                Amount::new(100),
                0,
                &mut audit,
                Utc::now(),
            )
            .unwrap_err();
        assert!(matches!(err, RxclearError::ManufacturerNotRegistered(_)));
    }

    #[test]
    fn totals_accumulate_across_claims() {
        let (mut engine, mut audit) = engine_with_schedule();
        let now = Utc::now();
        engine
            .calculate_accrual(key(1), manufacturer(), Amount::new(1_000_000), 0, &mut audit, now)
            .unwrap();
        engine
            .calculate_accrual(key(2), manufacturer(), Amount::new(3_000_000), 0, &mut audit, now)
            .unwrap();
        // 150_000 + 450_000
        assert_eq!(
            engine.manufacturer_total(&manufacturer()),
            Amount::new(600_000)
        );
    }

    #[test]
    fn biosimilar_exclusion_flagged() {
        let mut engine = RebateEngine::new();
        let mut audit = AuditTrail::new();
        let mut s = schedule();
        s.excludes_biosimilars = true;

        engine
            .register_schedule(manufacturer(), s, &mut audit, Utc::now())
            .unwrap();

        let names: Vec<_> = audit.records().iter().map(|r| r.event.name()).collect();
        assert_eq!(names, vec!["FORMULARY_LOCK", "SCHEDULE_REGISTERED"]);
    }

    #[test]
    fn invalid_schedule_rejected() {
        let mut engine = RebateEngine::new();
        let mut audit = AuditTrail::new();
        let bad = TierSchedule {
            base_bps: 9_999,
            volume_threshold: 0,
            bonus_bps: 2,
            excludes_biosimilars: false,
        };
        let err = engine
            .register_schedule(manufacturer(), bad, &mut audit, Utc::now())
            .unwrap_err();
        assert!(matches!(err, RxclearError::InvalidSchedule { .. }));
        assert!(!engine.is_registered(&manufacturer()));
    }

    #[test]
    fn unknown_accrual_not_found() {
        let engine = RebateEngine::new();
        let err = engine.get_accrual(&key(9)).unwrap_err();
        assert!(matches!(err, RxclearError::AccrualNotFound(_)));
    }
}
