//! # rxclear-registry
//!
//! **Trust Layer**: claim ingestion and deduplication.
//!
//! The registry derives each claim's content hash (the [`ClaimKey`] every
//! downstream component joins on), hard-rejects duplicates, verifies the
//! oracle's ed25519 signature over the digest, and tracks batch/lot
//! provenance for recall management.
//!
//! ## Claim Flow
//!
//! ```text
//! pharmacy → ClaimRegistry.submit_claim() → ClaimKey
//!          → RebateEngine.calculate_accrual() → Amount
//!          → SettlementHost.submit_group()    → SettlementReceipt
//! ```
//!
//! [`ClaimKey`]: rxclear_types::ClaimKey

pub mod registry;

pub use registry::ClaimRegistry;
