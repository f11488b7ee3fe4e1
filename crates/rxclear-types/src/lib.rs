//! # rxclear-types
//!
//! Shared types, errors, and configuration for the **RxClear** rebate
//! clearing workspace.
//!
//! This crate is the leaf dependency of the workspace — every other crate
//! depends on it. It defines:
//!
//! - **Identifiers**: [`ClaimKey`], [`Address`], [`AssetId`], [`RecordId`]
//! - **Amounts**: [`Amount`] — checked `u64` micro-unit arithmetic
//! - **Claim model**: [`ClaimSubmission`], [`ClaimMetadata`], [`RecallSeverity`]
//! - **Rebate model**: [`TierSchedule`], [`RebateAccrual`]
//! - **Receipt model**: [`SettlementReceipt`]
//! - **Configuration**: [`SettlementConfig`], [`StakePolicy`], [`StakeDisposition`]
//! - **Errors**: [`RxclearError`] with `RX_ERR_` prefix codes
//! - **Constants**: fee cap, stake defaults, group-size minimum

pub mod amount;
pub mod claim;
pub mod config;
pub mod constants;
pub mod error;
pub mod ids;
pub mod receipt;
pub mod schedule;

// Re-export all primary types at crate root for ergonomic imports:
//   use rxclear_types::{Amount, ClaimKey, SettlementConfig, ...};

pub use amount::*;
pub use claim::*;
pub use config::*;
pub use error::*;
pub use ids::*;
pub use receipt::*;
pub use schedule::*;

// Constants are accessed via `rxclear_types::constants::FOO`
// (not re-exported to avoid name collisions).
