//! The escrow vault — pooled settlement funds.
//!
//! One vault per settlement engine deployment. Deposits come from funding
//! transfers addressed to the escrow; the only debit path is the engine's
//! own settlement flow. Every mutation validates first, so the balance can
//! never go negative: there is no insolvent state to represent.

use rxclear_types::{Amount, AssetId, Result, RxclearError};

/// Pooled funds backing rebate settlements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EscrowVault {
    /// The settlement asset this vault holds.
    asset_id: AssetId,
    /// Funds available for settlement.
    available: Amount,
}

impl EscrowVault {
    /// Create an empty vault for the given asset.
    #[must_use]
    pub fn new(asset_id: AssetId) -> Self {
        Self {
            asset_id,
            available: Amount::ZERO,
        }
    }

    /// The asset this vault holds.
    #[must_use]
    pub fn asset_id(&self) -> AssetId {
        self.asset_id
    }

    /// Funds currently available for settlement.
    #[must_use]
    pub fn balance(&self) -> Amount {
        self.available
    }

    /// Accept a deposit.
    ///
    /// # Errors
    /// Returns [`RxclearError::AmountOverflow`] if the balance saturates.
    pub fn deposit(&mut self, amount: Amount) -> Result<()> {
        self.available = self.available.checked_add(amount)?;
        Ok(())
    }

    /// Debit the vault for a settlement. Validates before mutating —
    /// a rejected debit leaves the balance untouched.
    ///
    /// Internal to the settlement crate: the engine is the only caller,
    /// and only after every settlement precondition has passed.
    ///
    /// # Errors
    /// Returns [`RxclearError::InsufficientEscrow`] if the vault cannot
    /// cover the amount.
    pub(crate) fn debit(&mut self, amount: Amount) -> Result<()> {
        if amount > self.available {
            return Err(RxclearError::InsufficientEscrow {
                requested: amount,
                available: self.available,
            });
        }
        self.available = self.available.checked_sub(amount)?;
        Ok(())
    }
}
