//! # rxclear-rebate
//!
//! **Calculation Engine**: volume-tiered rebate schedules and per-claim
//! accruals.
//!
//! Manufacturers register a [`TierSchedule`]; each claim's Wholesale
//! Acquisition Cost is scaled by the effective basis-point rate (base, or
//! base + bonus above the volume threshold). Accrual is write-once per
//! claim key, and per-manufacturer liability totals use checked arithmetic.
//!
//! [`TierSchedule`]: rxclear_types::TierSchedule

pub mod engine;

pub use engine::RebateEngine;
