//! Tiered rebate schedules and per-claim accruals.
//!
//! A manufacturer registers a [`TierSchedule`]; the rebate engine applies it
//! to each claim's wholesale acquisition cost (WAC). Above the volume
//! threshold, the bonus tier adds to the base rate.

use serde::{Deserialize, Serialize};

use crate::constants::BPS_SCALE;
use crate::{Address, Amount, ClaimKey, Result, RxclearError};

/// A manufacturer's volume-tiered rebate schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierSchedule {
    /// Base rebate rate in basis points (e.g., 1500 = 15%).
    pub base_bps: u64,
    /// Cumulative dispensed-unit threshold unlocking the bonus tier.
    pub volume_threshold: u64,
    /// Additional bonus rate in basis points above the threshold.
    pub bonus_bps: u64,
    /// Whether the schedule excludes biosimilars. Flagged to the audit
    /// trail as a potential anti-competitive practice.
    pub excludes_biosimilars: bool,
}

impl TierSchedule {
    /// Validate rate bounds: the combined rate may never exceed 100%.
    ///
    /// # Errors
    /// Returns [`RxclearError::InvalidSchedule`] on out-of-bounds rates.
    pub fn validate(&self) -> Result<()> {
        let combined = self.base_bps.saturating_add(self.bonus_bps);
        if combined > BPS_SCALE {
            return Err(RxclearError::InvalidSchedule {
                reason: format!("combined rate {combined} bps exceeds {BPS_SCALE}"),
            });
        }
        Ok(())
    }

    /// Effective rate for a claim at the given cumulative volume.
    #[must_use]
    pub fn effective_bps(&self, current_volume: u64) -> u64 {
        if current_volume > self.volume_threshold {
            self.base_bps + self.bonus_bps
        } else {
            self.base_bps
        }
    }

    /// Whether the bonus tier applies at the given volume.
    #[must_use]
    pub fn bonus_applies(&self, current_volume: u64) -> bool {
        current_volume > self.volume_threshold
    }
}

/// A computed rebate liability for one claim. Created exactly once per
/// claim key and never mutated afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RebateAccrual {
    /// The claim this accrual settles.
    pub claim_key: ClaimKey,
    /// The manufacturer owing the rebate.
    pub manufacturer: Address,
    /// Wholesale Acquisition Cost the rate was applied to, in micro-USD.
    pub wac_price: Amount,
    /// The rate that was applied, in basis points.
    pub effective_bps: u64,
    /// The accrued rebate liability, in micro-USD.
    pub amount: Amount,
}
