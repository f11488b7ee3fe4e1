//! The settlement engine.
//!
//! Executes exactly one rebate payout per call, contingent on an oracle
//! authorization present in the same atomic group, and enforces the fee
//! cap unconditionally. Every precondition is checked before any state is
//! touched; the first mutation happens only once failure is no longer
//! possible, so a caller observing an error sees fully unchanged state.
//!
//! The engine never trusts a caller-supplied fee split: the fee is
//! re-derived here from the rebate amount and the engine's own capped rate.

use chrono::{DateTime, Utc};
use rxclear_audit::{AuditEvent, AuditTrail};
use rxclear_types::{
    Amount, ClaimKey, Result, RxclearError, SettlementConfig, SettlementReceipt, StakeDisposition,
    constants,
};

use crate::conservation::EscrowConservation;
use crate::escrow::EscrowVault;
use crate::group::{GroupContext, Operation, SettlementRequest};
use crate::settled::SettledClaims;

/// Settlement engine state: escrow vault, settled-claim set, conservation
/// tracker, and the deployment configuration.
///
/// `Clone` exists so the host can snapshot the engine before executing an
/// atomic group and restore it wholesale if the group aborts.
#[derive(Debug, Clone)]
pub struct SettlementEngine {
    config: SettlementConfig,
    vault: EscrowVault,
    settled: SettledClaims,
    conservation: EscrowConservation,
}

impl SettlementEngine {
    /// Create an engine with an empty vault.
    #[must_use]
    pub fn new(config: SettlementConfig) -> Self {
        Self {
            vault: EscrowVault::new(config.asset_id),
            settled: SettledClaims::new(),
            conservation: EscrowConservation::new(),
            config,
        }
    }

    /// The deployment configuration.
    #[must_use]
    pub fn config(&self) -> &SettlementConfig {
        &self.config
    }

    /// Funds currently available for settlement.
    #[must_use]
    pub fn escrow_balance(&self) -> Amount {
        self.vault.balance()
    }

    /// Whether a claim has been settled by this engine.
    #[must_use]
    pub fn is_settled(&self, claim_key: &ClaimKey) -> bool {
        self.settled.is_settled(claim_key)
    }

    /// Number of claims settled over the engine's history.
    #[must_use]
    pub fn settled_count(&self) -> usize {
        self.settled.len()
    }

    /// Accept an escrow deposit.
    ///
    /// # Errors
    /// Returns [`RxclearError::AmountOverflow`] if the vault saturates.
    pub fn deposit(&mut self, amount: Amount) -> Result<()> {
        self.vault.deposit(amount)?;
        self.conservation.record_deposit(amount)
    }

    /// Verify the escrow conservation invariant against the live vault.
    ///
    /// # Errors
    /// Returns [`RxclearError::EscrowConservationViolation`] on mismatch.
    pub fn verify_conservation(&self) -> Result<()> {
        self.conservation.verify(self.vault.balance())
    }

    /// Settle one rebate claim.
    ///
    /// Preconditions, checked in order, all before any mutation:
    /// 1. the group holds at least two operations;
    /// 2. the operation at `auth_op_index` is another group member, is a
    ///    payment, meets the minimum stake, and satisfies the stake
    ///    disposition policy;
    /// 3. the claim has not been settled before;
    /// 4. the vault covers the rebate;
    /// 5. the fee split computes without overflow.
    ///
    /// On success the vault is debited, the claim marked settled, and the
    /// `RebateSettled` record appended — one indivisible step from the
    /// perspective of any later observer. The returned receipt's payee and
    /// fee amounts always sum to the rebate exactly.
    ///
    /// # Errors
    /// One of the group-structure, authorization, settlement, or
    /// arithmetic kinds; any error means nothing changed here, and the
    /// host aborts the surrounding group as a whole.
    pub fn settle(
        &mut self,
        ctx: &GroupContext<'_>,
        req: &SettlementRequest,
        audit: &mut AuditTrail,
        now: DateTime<Utc>,
    ) -> Result<SettlementReceipt> {
        let group_size = ctx.group_size();
        if group_size < constants::MIN_GROUP_SIZE {
            return Err(RxclearError::GroupTooSmall { group_size });
        }

        self.verify_authorization(ctx, req.auth_op_index)?;

        if self.settled.is_settled(&req.claim_key) {
            return Err(RxclearError::DuplicateSettlement(req.claim_key));
        }

        let available = self.vault.balance();
        if req.rebate_amount > available {
            return Err(RxclearError::InsufficientEscrow {
                requested: req.rebate_amount,
                available,
            });
        }

        let (payee_amount, fee_amount) = req.rebate_amount.split_fee(self.config.admin_fee_bps)?;

        // All preconditions hold; apply the settlement.
        self.vault.debit(req.rebate_amount)?;
        self.settled.mark_settled(req.claim_key)?;
        self.conservation.record_settlement(req.rebate_amount)?;

        audit.record(
            AuditEvent::RebateSettled {
                claim_key: req.claim_key,
                payee_address: req.payee_address,
                fee_recipient_address: req.fee_recipient_address,
                payee_amount,
                fee_amount,
            },
            now,
        );

        tracing::info!(
            claim_key = %req.claim_key,
            payee = %payee_amount,
            fee = %fee_amount,
            escrow_remaining = %self.vault.balance(),
            "rebate settled"
        );

        Ok(SettlementReceipt {
            claim_key: req.claim_key,
            payee_amount,
            fee_amount,
            payee_address: req.payee_address,
            fee_recipient_address: req.fee_recipient_address,
            settled_at: now,
        })
    }

    /// Check the authorization operation at `index` in the live group.
    fn verify_authorization(&self, ctx: &GroupContext<'_>, index: u64) -> Result<()> {
        let out_of_range = RxclearError::AuthIndexOutOfRange {
            index,
            group_size: ctx.group_size(),
        };
        let Ok(idx) = usize::try_from(index) else {
            return Err(out_of_range);
        };
        if idx >= ctx.group_size() {
            return Err(out_of_range);
        }
        if idx == ctx.current_index() {
            return Err(RxclearError::AuthIndexSelfReferential { index });
        }

        // Bounds were checked above; the view cannot fail here.
        let Some(Operation::Payment {
            receiver, amount, ..
        }) = ctx.operation_at(index)
        else {
            return Err(RxclearError::AuthNotPayment { index });
        };

        if *amount < self.config.stake.min_stake {
            return Err(RxclearError::StakeBelowMinimum {
                staked: *amount,
                required: self.config.stake.min_stake,
            });
        }

        match self.config.stake.disposition {
            StakeDisposition::Escrow => {
                if *receiver != self.config.escrow_address {
                    return Err(RxclearError::StakeRecipientMismatch { actual: *receiver });
                }
            }
            StakeDisposition::Treasury(treasury) => {
                if *receiver != treasury {
                    return Err(RxclearError::StakeRecipientMismatch { actual: *receiver });
                }
            }
            StakeDisposition::Any => {}
        }
        Ok(())
    }
}
