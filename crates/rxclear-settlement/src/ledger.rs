//! Per-account asset ledger.
//!
//! Tracks `(address, asset)` balances for every party outside the escrow
//! vault: pharmacies, PBMs, oracles, manufacturers. All mutations are
//! atomic: either the full operation succeeds or the balance is unchanged.

use std::collections::HashMap;

use rxclear_types::{Address, Amount, AssetId, Result, RxclearError};

/// Account balances per `(address, asset)` pair.
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    balances: HashMap<(Address, AssetId), Amount>,
}

impl Ledger {
    /// Create an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self {
            balances: HashMap::new(),
        }
    }

    /// Credit an account.
    ///
    /// # Errors
    /// Returns [`RxclearError::AmountOverflow`] if the balance saturates.
    pub fn credit(&mut self, address: Address, asset_id: AssetId, amount: Amount) -> Result<()> {
        let entry = self.balances.entry((address, asset_id)).or_default();
        *entry = entry.checked_add(amount)?;
        Ok(())
    }

    /// Debit an account. Validates before mutating.
    ///
    /// # Errors
    /// Returns [`RxclearError::InsufficientFunds`] if the balance cannot
    /// cover the debit; the balance is left unchanged.
    pub fn debit(&mut self, address: Address, asset_id: AssetId, amount: Amount) -> Result<()> {
        let available = self.balance_of(&address, asset_id);
        if available < amount {
            return Err(RxclearError::InsufficientFunds {
                needed: amount,
                available,
            });
        }
        self.balances
            .insert((address, asset_id), available.checked_sub(amount)?);
        Ok(())
    }

    /// Move funds between accounts. All checks run before any mutation,
    /// so a failed transfer leaves both accounts untouched.
    ///
    /// # Errors
    /// - [`RxclearError::InsufficientFunds`] if the sender cannot cover it
    /// - [`RxclearError::AmountOverflow`] if the receiver would saturate
    pub fn transfer(
        &mut self,
        sender: Address,
        receiver: Address,
        asset_id: AssetId,
        amount: Amount,
    ) -> Result<()> {
        let sender_balance = self.balance_of(&sender, asset_id);
        if sender_balance < amount {
            return Err(RxclearError::InsufficientFunds {
                needed: amount,
                available: sender_balance,
            });
        }
        let receiver_after = self.balance_of(&receiver, asset_id).checked_add(amount)?;

        self.balances
            .insert((sender, asset_id), sender_balance.checked_sub(amount)?);
        self.balances.insert((receiver, asset_id), receiver_after);
        Ok(())
    }

    /// Balance of an account (zero if unknown).
    #[must_use]
    pub fn balance_of(&self, address: &Address, asset_id: AssetId) -> Amount {
        self.balances
            .get(&(*address, asset_id))
            .copied()
            .unwrap_or(Amount::ZERO)
    }

    /// Sum of all account balances in one asset.
    #[must_use]
    pub fn total_in_asset(&self, asset_id: AssetId) -> Amount {
        let total = self
            .balances
            .iter()
            .filter(|((_, a), _)| *a == asset_id)
            .map(|(_, amount)| u128::from(amount.micro()))
            .sum::<u128>();
        // Sums of valid u64 balances in one asset fit u64 in practice;
        // clamp defensively rather than panic.
        Amount::new(u64::try_from(total).unwrap_or(u64::MAX))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(n: u8) -> Address {
        Address::from_bytes([n; 32])
    }

    const USDC: AssetId = AssetId(31566704);

    #[test]
    fn credit_and_balance() {
        let mut ledger = Ledger::new();
        ledger.credit(addr(1), USDC, Amount::new(500)).unwrap();
        assert_eq!(ledger.balance_of(&addr(1), USDC), Amount::new(500));
        assert_eq!(ledger.balance_of(&addr(1), AssetId::NATIVE), Amount::ZERO);
    }

    #[test]
    fn debit_insufficient_rejected() {
        let mut ledger = Ledger::new();
        ledger.credit(addr(1), USDC, Amount::new(100)).unwrap();
        let err = ledger.debit(addr(1), USDC, Amount::new(101)).unwrap_err();
        assert!(matches!(err, RxclearError::InsufficientFunds { .. }));
        assert_eq!(ledger.balance_of(&addr(1), USDC), Amount::new(100));
    }

    #[test]
    fn transfer_moves_funds() {
        let mut ledger = Ledger::new();
        ledger.credit(addr(1), USDC, Amount::new(1_000)).unwrap();
        ledger
            .transfer(addr(1), addr(2), USDC, Amount::new(400))
            .unwrap();
        assert_eq!(ledger.balance_of(&addr(1), USDC), Amount::new(600));
        assert_eq!(ledger.balance_of(&addr(2), USDC), Amount::new(400));
    }

    #[test]
    fn transfer_insufficient_leaves_both_untouched() {
        let mut ledger = Ledger::new();
        ledger.credit(addr(1), USDC, Amount::new(100)).unwrap();
        let err = ledger
            .transfer(addr(1), addr(2), USDC, Amount::new(200))
            .unwrap_err();
        assert!(matches!(err, RxclearError::InsufficientFunds { .. }));
        assert_eq!(ledger.balance_of(&addr(1), USDC), Amount::new(100));
        assert_eq!(ledger.balance_of(&addr(2), USDC), Amount::ZERO);
    }

    #[test]
    fn transfer_receiver_overflow_leaves_both_untouched() {
        let mut ledger = Ledger::new();
        ledger.credit(addr(1), USDC, Amount::new(100)).unwrap();
        ledger.credit(addr(2), USDC, Amount::new(u64::MAX)).unwrap();
        let err = ledger
            .transfer(addr(1), addr(2), USDC, Amount::new(1))
            .unwrap_err();
        assert!(matches!(err, RxclearError::AmountOverflow { .. }));
        assert_eq!(ledger.balance_of(&addr(1), USDC), Amount::new(100));
        assert_eq!(ledger.balance_of(&addr(2), USDC), Amount::new(u64::MAX));
    }

    #[test]
    fn assets_are_independent() {
        let mut ledger = Ledger::new();
        ledger
            .credit(addr(1), AssetId::NATIVE, Amount::new(1_000))
            .unwrap();
        ledger.credit(addr(1), USDC, Amount::new(77)).unwrap();
        assert_eq!(
            ledger.balance_of(&addr(1), AssetId::NATIVE),
            Amount::new(1_000)
        );
        assert_eq!(ledger.balance_of(&addr(1), USDC), Amount::new(77));
        assert_eq!(ledger.total_in_asset(USDC), Amount::new(77));
    }
}
