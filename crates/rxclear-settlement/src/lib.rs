//! # rxclear-settlement
//!
//! **Settlement Core**: atomic operation groups, escrow vault, and
//! oracle-authorized rebate payouts.
//!
//! ## Architecture
//!
//! A settlement is submitted as an atomic group of at least two
//! operations: the oracle's stake payment and the settlement call that
//! references it by group position. The [`SettlementHost`] executes the
//! group all-or-nothing:
//!
//! 1. [`SettlementEngine`] validates group structure and authorization
//! 2. Duplicate-settlement and escrow-coverage checks pass
//! 3. The fee split is re-derived under the hard 3% cap
//! 4. The vault is debited; payee and fee transfers post
//! 5. A `RebateSettled` record lands on the audit trail
//!
//! Any failure aborts the whole group — the stake payment included — so an
//! authorization can never be consumed without its settlement, nor a
//! settlement land without its authorization.
//!
//! ## Group Structure
//!
//! ```text
//! [0] Payment (oracle stake, >= minimum)   ┐ atomic
//! [1] SettleClaim { auth_op_index: 0, .. } ┘ group
//! ```

pub mod conservation;
pub mod engine;
pub mod escrow;
pub mod group;
pub mod host;
pub mod ledger;
pub mod settled;

pub use conservation::EscrowConservation;
pub use engine::SettlementEngine;
pub use escrow::EscrowVault;
pub use group::{GroupContext, Operation, OperationKind, SettlementRequest};
pub use host::{OpOutcome, SettlementHost};
pub use ledger::Ledger;
pub use settled::SettledClaims;
