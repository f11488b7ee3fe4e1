//! Settlement receipts.
//!
//! A [`SettlementReceipt`] is returned to the caller on every successful
//! settlement and mirrors the `RebateSettled` audit record appended in the
//! same atomic group. The engine keeps no durable copy.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Address, Amount, ClaimKey};

/// Proof of a completed rebate settlement: amounts, recipients, timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementReceipt {
    /// The claim that was settled.
    pub claim_key: ClaimKey,
    /// Amount transferred to the pharmacy.
    pub payee_amount: Amount,
    /// Administrative fee transferred to the fee recipient.
    pub fee_amount: Amount,
    /// The pharmacy's receiving address.
    pub payee_address: Address,
    /// The fee collector's address (typically the PBM).
    pub fee_recipient_address: Address,
    /// When the settlement committed.
    pub settled_at: DateTime<Utc>,
}

impl SettlementReceipt {
    /// The total rebate this receipt accounts for.
    ///
    /// Payee and fee originate from a single `u64` rebate split, so the
    /// sum cannot overflow.
    #[must_use]
    pub fn rebate_amount(&self) -> Amount {
        Amount::new(self.payee_amount.micro() + self.fee_amount.micro())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rebate_amount_sums_parts() {
        let receipt = SettlementReceipt {
            claim_key: ClaimKey::from_bytes([1u8; 32]),
            payee_amount: Amount::new(14_550_000),
            fee_amount: Amount::new(450_000),
            payee_address: Address::from_bytes([2u8; 32]),
            fee_recipient_address: Address::from_bytes([3u8; 32]),
            settled_at: Utc::now(),
        };
        assert_eq!(receipt.rebate_amount(), Amount::new(15_000_000));
    }

    #[test]
    fn receipt_serde_roundtrip() {
        let receipt = SettlementReceipt {
            claim_key: ClaimKey::from_bytes([7u8; 32]),
            payee_amount: Amount::new(97),
            fee_amount: Amount::new(3),
            payee_address: Address::from_bytes([8u8; 32]),
            fee_recipient_address: Address::from_bytes([9u8; 32]),
            settled_at: Utc::now(),
        };
        let json = serde_json::to_string(&receipt).unwrap();
        let back: SettlementReceipt = serde_json::from_str(&json).unwrap();
        assert_eq!(receipt, back);
    }
}
