//! Escrow conservation invariant checker.
//!
//! Mathematical invariant enforced over the vault's lifetime:
//! ```text
//! vault.balance == Σ(deposits) - Σ(settled rebates)
//! ```
//!
//! If this invariant ever breaks, something has gone catastrophically
//! wrong — a debit without a settlement, a settlement without a debit, or
//! a partially applied group. This is the ultimate safety net.

use rxclear_types::{Amount, Result, RxclearError};

/// Tracks cumulative escrow in/outflows and validates conservation.
#[derive(Debug, Clone, Copy, Default)]
pub struct EscrowConservation {
    /// Total deposited since genesis.
    total_deposits: Amount,
    /// Total paid out through settlements since genesis.
    total_settled: Amount,
}

impl EscrowConservation {
    /// Create a fresh tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a deposit.
    ///
    /// # Errors
    /// Returns [`RxclearError::AmountOverflow`] if the running total saturates.
    pub fn record_deposit(&mut self, amount: Amount) -> Result<()> {
        self.total_deposits = self.total_deposits.checked_add(amount)?;
        Ok(())
    }

    /// Record a settlement payout.
    ///
    /// # Errors
    /// Returns [`RxclearError::AmountOverflow`] if the running total saturates.
    pub fn record_settlement(&mut self, amount: Amount) -> Result<()> {
        self.total_settled = self.total_settled.checked_add(amount)?;
        Ok(())
    }

    /// Expected vault balance: deposits minus settlements.
    ///
    /// # Errors
    /// Returns [`RxclearError::EscrowConservationViolation`] if more has
    /// settled than was ever deposited.
    pub fn expected_balance(&self) -> Result<Amount> {
        self.total_deposits.checked_sub(self.total_settled).map_err(|_| {
            RxclearError::EscrowConservationViolation {
                reason: format!(
                    "settled total {} exceeds deposited total {}",
                    self.total_settled, self.total_deposits
                ),
            }
        })
    }

    /// Verify the actual vault balance against the expected one.
    ///
    /// # Errors
    /// Returns [`RxclearError::EscrowConservationViolation`] on mismatch.
    pub fn verify(&self, actual: Amount) -> Result<()> {
        let expected = self.expected_balance()?;
        if actual != expected {
            return Err(RxclearError::EscrowConservationViolation {
                reason: format!(
                    "actual balance {actual} != expected {expected} \
                     (deposits={}, settled={})",
                    self.total_deposits, self.total_settled
                ),
            });
        }
        Ok(())
    }

    /// Total deposited since genesis.
    #[must_use]
    pub fn total_deposits(&self) -> Amount {
        self.total_deposits
    }

    /// Total settled since genesis.
    #[must_use]
    pub fn total_settled(&self) -> Amount {
        self.total_settled
    }
}
