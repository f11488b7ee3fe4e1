//! System-wide constants for the RxClear clearing engine.

/// Hard ceiling on the administrative fee, in basis points (3%).
/// Compile-time fixed; no caller-supplied input can raise it.
pub const FEE_CAP_BPS: u64 = 300;

/// Basis-point denominator (10_000 = 100%).
pub const BPS_SCALE: u64 = 10_000;

/// Minimum number of operations in an atomic group carrying a settlement.
/// A lone settlement call can never carry a co-signed authorization.
pub const MIN_GROUP_SIZE: usize = 2;

/// Default minimum oracle stake, in native micro-units.
pub const DEFAULT_MIN_ORACLE_STAKE: u64 = 1_000;

/// Asset ID reserved for the native stake currency.
pub const NATIVE_ASSET_ID: u64 = 0;

/// Version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine name.
pub const ENGINE_NAME: &str = "RxClear";
