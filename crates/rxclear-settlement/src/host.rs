//! Atomic group execution host.
//!
//! The host stands in for the underlying ledger's atomic-group primitive:
//! operations submitted together either all take effect or none do. It
//! executes each operation in order against the engine and the account
//! ledger; on the first failure it restores the pre-group snapshot and
//! reverts the audit trail's uncommitted tail, then surfaces the single
//! group-level error. Callers never observe partial state.
//!
//! Funding transfers addressed to the escrow in its settlement asset are
//! routed into the vault; the settlement call's payouts are drawn from the
//! vault and credited to recipients within the same group.

use chrono::{DateTime, Utc};
use rxclear_audit::{AuditEvent, AuditTrail};
use rxclear_types::{Address, Amount, AssetId, Result, SettlementConfig, SettlementReceipt};

use crate::engine::SettlementEngine;
use crate::group::{GroupContext, Operation};
use crate::ledger::Ledger;

/// The observable outcome of one operation in a committed group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpOutcome {
    /// A native payment posted.
    Payment,
    /// An asset transfer posted between ordinary accounts.
    AssetTransfer,
    /// A funding transfer landed in the escrow vault.
    EscrowFunded(Amount),
    /// A settlement committed.
    Settled(SettlementReceipt),
}

/// Executes atomic operation groups against a settlement engine and an
/// account ledger.
pub struct SettlementHost {
    engine: SettlementEngine,
    ledger: Ledger,
}

impl SettlementHost {
    /// Create a host around a fresh engine and empty ledger.
    #[must_use]
    pub fn new(config: SettlementConfig) -> Self {
        Self {
            engine: SettlementEngine::new(config),
            ledger: Ledger::new(),
        }
    }

    /// Seed an account balance (external on-ramp; not part of any group).
    ///
    /// # Errors
    /// Returns [`rxclear_types::RxclearError::AmountOverflow`] if the
    /// account saturates.
    pub fn credit_account(
        &mut self,
        address: Address,
        asset_id: AssetId,
        amount: Amount,
    ) -> Result<()> {
        self.ledger.credit(address, asset_id, amount)
    }

    /// Balance of an ordinary ledger account.
    #[must_use]
    pub fn balance_of(&self, address: &Address, asset_id: AssetId) -> Amount {
        self.ledger.balance_of(address, asset_id)
    }

    /// Funds currently available in the escrow vault.
    #[must_use]
    pub fn escrow_balance(&self) -> Amount {
        self.engine.escrow_balance()
    }

    /// The settlement engine (read-only).
    #[must_use]
    pub fn engine(&self) -> &SettlementEngine {
        &self.engine
    }

    /// Fund the escrow with a single-operation group.
    ///
    /// # Errors
    /// Fails as the equivalent one-operation `submit_group` would.
    pub fn deposit(
        &mut self,
        sender: Address,
        amount: Amount,
        audit: &mut AuditTrail,
        now: DateTime<Utc>,
    ) -> Result<Amount> {
        let op = Operation::AssetTransfer {
            sender,
            receiver: self.engine.config().escrow_address,
            asset_id: self.engine.config().asset_id,
            amount,
        };
        self.submit_group(&[op], audit, now)?;
        Ok(self.escrow_balance())
    }

    /// Execute an atomic group: all operations post, or none do.
    ///
    /// # Errors
    /// The first failing operation's error, after every effect of the
    /// group — ledger movements, escrow mutations, settled-claim marks,
    /// audit records — has been rolled back.
    pub fn submit_group(
        &mut self,
        ops: &[Operation],
        audit: &mut AuditTrail,
        now: DateTime<Utc>,
    ) -> Result<Vec<OpOutcome>> {
        let engine_snapshot = self.engine.clone();
        let ledger_snapshot = self.ledger.clone();
        let audit_mark = audit.mark();

        match self.apply_group(ops, audit, now) {
            Ok(outcomes) => Ok(outcomes),
            Err(err) => {
                self.engine = engine_snapshot;
                self.ledger = ledger_snapshot;
                audit.revert_to(audit_mark);
                tracing::warn!(group_size = ops.len(), error = %err, "atomic group aborted");
                Err(err)
            }
        }
    }

    fn apply_group(
        &mut self,
        ops: &[Operation],
        audit: &mut AuditTrail,
        now: DateTime<Utc>,
    ) -> Result<Vec<OpOutcome>> {
        let escrow_address = self.engine.config().escrow_address;
        let settlement_asset = self.engine.config().asset_id;

        let mut outcomes = Vec::with_capacity(ops.len());
        for (index, op) in ops.iter().enumerate() {
            let outcome = match op {
                Operation::Payment {
                    sender,
                    receiver,
                    amount,
                } => {
                    self.ledger
                        .transfer(*sender, *receiver, AssetId::NATIVE, *amount)?;
                    OpOutcome::Payment
                }
                Operation::AssetTransfer {
                    sender,
                    receiver,
                    asset_id,
                    amount,
                } => {
                    if *receiver == escrow_address && *asset_id == settlement_asset {
                        // Funding: debit the sender, credit the vault.
                        self.ledger.debit(*sender, *asset_id, *amount)?;
                        self.engine.deposit(*amount)?;
                        audit.record(
                            AuditEvent::EscrowFunded {
                                sender: *sender,
                                amount: *amount,
                            },
                            now,
                        );
                        OpOutcome::EscrowFunded(*amount)
                    } else {
                        self.ledger
                            .transfer(*sender, *receiver, *asset_id, *amount)?;
                        OpOutcome::AssetTransfer
                    }
                }
                Operation::SettleClaim(req) => {
                    let ctx = GroupContext::new(ops, index);
                    let receipt = self.engine.settle(&ctx, req, audit, now)?;

                    // Payouts drawn from the vault, same atomic unit.
                    self.ledger.credit(
                        receipt.payee_address,
                        settlement_asset,
                        receipt.payee_amount,
                    )?;
                    if !receipt.fee_amount.is_zero() {
                        self.ledger.credit(
                            receipt.fee_recipient_address,
                            settlement_asset,
                            receipt.fee_amount,
                        )?;
                    }
                    OpOutcome::Settled(receipt)
                }
            };
            outcomes.push(outcome);
        }
        Ok(outcomes)
    }
}
