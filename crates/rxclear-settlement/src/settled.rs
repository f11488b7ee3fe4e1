//! Settled-claim tracking — prevents double-settlement.
//!
//! Each claim key can be settled at most once across the engine's entire
//! history. The set is deliberately unbounded: evicting old keys would
//! re-open the double-payment window for any claim that outlives the
//! cache, so the full history is kept.

use std::collections::HashSet;

use rxclear_types::{ClaimKey, Result, RxclearError};

/// Atomic check-and-set over the set of settled claim keys.
#[derive(Debug, Clone, Default)]
pub struct SettledClaims {
    settled: HashSet<ClaimKey>,
}

impl SettledClaims {
    /// Create an empty tracker.
    #[must_use]
    pub fn new() -> Self {
        Self {
            settled: HashSet::new(),
        }
    }

    /// Mark a claim as settled.
    ///
    /// # Errors
    /// Returns [`RxclearError::DuplicateSettlement`] if the claim was
    /// already settled; the set is unchanged.
    pub fn mark_settled(&mut self, claim_key: ClaimKey) -> Result<()> {
        if !self.settled.insert(claim_key) {
            return Err(RxclearError::DuplicateSettlement(claim_key));
        }
        Ok(())
    }

    /// Whether a claim has been settled.
    #[must_use]
    pub fn is_settled(&self, claim_key: &ClaimKey) -> bool {
        self.settled.contains(claim_key)
    }

    /// Number of settled claims.
    #[must_use]
    pub fn len(&self) -> usize {
        self.settled.len()
    }

    /// Whether no claim has settled yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.settled.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(n: u8) -> ClaimKey {
        ClaimKey::from_bytes([n; 32])
    }

    #[test]
    fn first_settle_ok() {
        let mut settled = SettledClaims::new();
        settled.mark_settled(key(1)).unwrap();
        assert!(settled.is_settled(&key(1)));
        assert_eq!(settled.len(), 1);
    }

    #[test]
    fn double_settle_blocked() {
        let mut settled = SettledClaims::new();
        settled.mark_settled(key(1)).unwrap();
        let err = settled.mark_settled(key(1)).unwrap_err();
        assert!(
            matches!(err, RxclearError::DuplicateSettlement(k) if k == key(1)),
            "Expected DuplicateSettlement, got: {err:?}"
        );
        assert_eq!(settled.len(), 1);
    }

    #[test]
    fn different_claims_ok() {
        let mut settled = SettledClaims::new();
        settled.mark_settled(key(1)).unwrap();
        settled.mark_settled(key(2)).unwrap();
        settled.mark_settled(key(3)).unwrap();
        assert_eq!(settled.len(), 3);
    }

    #[test]
    fn empty_tracker() {
        let settled = SettledClaims::new();
        assert!(settled.is_empty());
        assert!(!settled.is_settled(&key(1)));
    }
}
