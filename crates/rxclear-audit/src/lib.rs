//! # rxclear-audit
//!
//! **Compliance Rail**: the append-only, hash-chained audit trail.
//!
//! Every significant action in the clearing pipeline (claim submitted,
//! accrual computed, escrow funded, rebate settled, recall issued) is
//! recorded as an [`AuditRecord`] whose hash commits to its predecessor —
//! tampering with any committed record breaks every later link.
//!
//! The trail participates in atomic groups: the settlement host takes a
//! [`AuditTrail::mark`] before executing a group and reverts to it if the
//! group aborts, so a record lands with its settlement or not at all.

pub mod event;
pub mod trail;

pub use event::AuditEvent;
pub use trail::{AuditMark, AuditRecord, AuditTrail};
