//! Error types for the RxClear clearing workspace.
//!
//! All errors use the `RX_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by subsystem:
//! - 1xx: Claim registry errors
//! - 2xx: Rebate engine errors
//! - 3xx: Group structure errors
//! - 4xx: Authorization errors
//! - 5xx: Settlement errors
//! - 6xx: Ledger / escrow errors
//! - 7xx: Arithmetic errors
//! - 9xx: General / internal errors

use thiserror::Error;

use crate::{Address, Amount, ClaimKey};

/// Central error enum for all RxClear operations.
#[derive(Debug, Error)]
pub enum RxclearError {
    // =================================================================
    // Claim Registry Errors (1xx)
    // =================================================================
    /// A claim with this content hash was already submitted.
    #[error("RX_ERR_100: Claim already submitted: {0}")]
    DuplicateClaim(ClaimKey),

    /// The requested claim key is unknown to the registry.
    #[error("RX_ERR_101: Claim not found: {0}")]
    ClaimNotFound(ClaimKey),

    /// The claim submission carried no oracle signature.
    #[error("RX_ERR_102: Oracle signature required")]
    OracleSignatureMissing,

    /// The oracle signature did not verify against the claim digest.
    #[error("RX_ERR_103: Oracle signature verification failed")]
    OracleSignatureInvalid,

    /// The claim submission failed field validation.
    #[error("RX_ERR_104: Invalid claim: {reason}")]
    InvalidClaim { reason: String },

    // =================================================================
    // Rebate Engine Errors (2xx)
    // =================================================================
    /// No tier schedule is registered for this manufacturer.
    #[error("RX_ERR_200: Manufacturer not registered: {0}")]
    ManufacturerNotRegistered(Address),

    /// An accrual already exists for this claim key (idempotency guard).
    #[error("RX_ERR_201: Accrual already computed for claim: {0}")]
    DuplicateAccrual(ClaimKey),

    /// No accrual has been computed for this claim key.
    #[error("RX_ERR_202: Accrual not found for claim: {0}")]
    AccrualNotFound(ClaimKey),

    /// The tier schedule is structurally invalid (bps out of bounds, etc.).
    #[error("RX_ERR_203: Invalid tier schedule: {reason}")]
    InvalidSchedule { reason: String },

    // =================================================================
    // Group Structure Errors (3xx)
    // =================================================================
    /// The settlement call arrived outside an atomic group of sufficient size.
    #[error("RX_ERR_300: Atomic group too small: {group_size} operation(s)")]
    GroupTooSmall { group_size: usize },

    /// The authorization index points outside the current group.
    #[error("RX_ERR_301: Authorization index {index} out of range for group of {group_size}")]
    AuthIndexOutOfRange { index: u64, group_size: usize },

    /// The authorization index points at the settlement call itself.
    #[error("RX_ERR_302: Authorization index {index} is self-referential")]
    AuthIndexSelfReferential { index: u64 },

    // =================================================================
    // Authorization Errors (4xx)
    // =================================================================
    /// The referenced operation is not a payment-kind transfer.
    #[error("RX_ERR_400: Operation at index {index} is not a payment")]
    AuthNotPayment { index: u64 },

    /// The oracle's stake payment is below the required minimum.
    #[error("RX_ERR_401: Oracle stake below minimum: staked {staked}, required {required}")]
    StakeBelowMinimum { staked: Amount, required: Amount },

    /// The stake payment's receiver violates the configured disposition.
    #[error("RX_ERR_402: Stake recipient {actual} does not satisfy stake policy")]
    StakeRecipientMismatch { actual: Address },

    // =================================================================
    // Settlement Errors (5xx)
    // =================================================================
    /// The claim was already settled (double-payment guard).
    #[error("RX_ERR_500: Claim already settled: {0}")]
    DuplicateSettlement(ClaimKey),

    /// The escrow cannot cover the requested rebate.
    #[error("RX_ERR_501: Insufficient escrow: requested {requested}, available {available}")]
    InsufficientEscrow {
        requested: Amount,
        available: Amount,
    },

    // =================================================================
    // Ledger / Escrow Errors (6xx)
    // =================================================================
    /// An account lacks the funds for a value transfer.
    #[error("RX_ERR_600: Insufficient funds: needed {needed}, available {available}")]
    InsufficientFunds { needed: Amount, available: Amount },

    /// Escrow conservation invariant violated — critical safety alert.
    #[error("RX_ERR_601: Escrow conservation violation: {reason}")]
    EscrowConservationViolation { reason: String },

    // =================================================================
    // Arithmetic Errors (7xx)
    // =================================================================
    /// A fixed-width amount computation would overflow. Never wrapped silently.
    #[error("RX_ERR_700: Amount overflow during {context}")]
    AmountOverflow { context: &'static str },

    // =================================================================
    // General / Internal (9xx)
    // =================================================================
    /// Unrecoverable internal error.
    #[error("RX_ERR_900: Internal error: {0}")]
    Internal(String),

    /// Serialization / deserialization error.
    #[error("RX_ERR_901: Serialization error: {0}")]
    Serialization(String),

    /// Configuration error (fee cap exceeded, missing fields, etc.).
    #[error("RX_ERR_902: Configuration error: {0}")]
    Configuration(String),
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, RxclearError>;
