//! Configuration for the settlement engine.

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_MIN_ORACLE_STAKE, FEE_CAP_BPS};
use crate::{Address, Amount, AssetId, Result, RxclearError};

/// Where the oracle's stake payment must land.
///
/// The underlying oracle scheme specifies no slashing or stake-return
/// mechanism; the stake's disposition is policy, not protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StakeDisposition {
    /// Stake must be paid to the escrow's own address.
    Escrow,
    /// Stake must be paid to a designated treasury address.
    Treasury(Address),
    /// Any receiver qualifies; only the amount is checked.
    Any,
}

/// Oracle stake requirements for settlement authorization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakePolicy {
    /// Minimum stake amount, in native micro-units.
    pub min_stake: Amount,
    /// Required stake recipient.
    pub disposition: StakeDisposition,
}

impl Default for StakePolicy {
    fn default() -> Self {
        Self {
            min_stake: Amount::new(DEFAULT_MIN_ORACLE_STAKE),
            disposition: StakeDisposition::Escrow,
        }
    }
}

/// Configuration for one settlement engine deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementConfig {
    /// The escrow's own account address.
    pub escrow_address: Address,
    /// The settlement asset the escrow holds and pays out.
    pub asset_id: AssetId,
    /// Administrative fee rate in basis points. Validated against
    /// [`FEE_CAP_BPS`] at construction; callers cannot raise it later.
    pub admin_fee_bps: u64,
    /// Oracle stake policy.
    pub stake: StakePolicy,
}

impl SettlementConfig {
    /// Create a config with the default stake policy.
    ///
    /// # Errors
    /// Returns [`RxclearError::Configuration`] if `admin_fee_bps` exceeds
    /// the hard [`FEE_CAP_BPS`] ceiling.
    pub fn new(escrow_address: Address, asset_id: AssetId, admin_fee_bps: u64) -> Result<Self> {
        if admin_fee_bps > FEE_CAP_BPS {
            return Err(RxclearError::Configuration(format!(
                "admin fee {admin_fee_bps} bps exceeds the {FEE_CAP_BPS} bps cap"
            )));
        }
        Ok(Self {
            escrow_address,
            asset_id,
            admin_fee_bps,
            stake: StakePolicy::default(),
        })
    }

    /// Replace the stake policy.
    #[must_use]
    pub fn with_stake_policy(mut self, stake: StakePolicy) -> Self {
        self.stake = stake;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn escrow() -> Address {
        Address::from_bytes([0xEE; 32])
    }

    #[test]
    fn config_accepts_fee_at_cap() {
        let cfg = SettlementConfig::new(escrow(), AssetId(31566704), FEE_CAP_BPS).unwrap();
        assert_eq!(cfg.admin_fee_bps, 300);
        assert_eq!(cfg.stake.min_stake, Amount::new(1_000));
        assert_eq!(cfg.stake.disposition, StakeDisposition::Escrow);
    }

    #[test]
    fn config_rejects_fee_over_cap() {
        let err = SettlementConfig::new(escrow(), AssetId(1), 301).unwrap_err();
        assert!(matches!(err, RxclearError::Configuration(_)));
    }

    #[test]
    fn stake_policy_override() {
        let treasury = Address::from_bytes([0x77; 32]);
        let cfg = SettlementConfig::new(escrow(), AssetId(1), 250)
            .unwrap()
            .with_stake_policy(StakePolicy {
                min_stake: Amount::new(5_000),
                disposition: StakeDisposition::Treasury(treasury),
            });
        assert_eq!(cfg.stake.min_stake, Amount::new(5_000));
        assert_eq!(cfg.stake.disposition, StakeDisposition::Treasury(treasury));
    }

    #[test]
    fn config_serde_roundtrip() {
        let cfg = SettlementConfig::new(escrow(), AssetId(9), 100).unwrap();
        let json = serde_json::to_string(&cfg).unwrap();
        let back: SettlementConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(cfg, back);
    }
}
