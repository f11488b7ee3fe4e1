//! Fixed-width amount arithmetic for the RxClear accounting model.
//!
//! All monetary values are `u64` micro-units (micro-USD for rebate flows,
//! native micro-units for stake payments). Arithmetic is checked: any
//! operation that would overflow the accounting type is rejected with
//! [`RxclearError::AmountOverflow`], never wrapped silently.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::BPS_SCALE;
use crate::{Result, RxclearError};

/// An amount in micro-units.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Amount(pub u64);

impl Amount {
    /// Zero micro-units.
    pub const ZERO: Self = Self(0);

    #[must_use]
    pub const fn new(micro_units: u64) -> Self {
        Self(micro_units)
    }

    /// The raw micro-unit value.
    #[must_use]
    pub const fn micro(self) -> u64 {
        self.0
    }

    #[must_use]
    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Checked addition.
    ///
    /// # Errors
    /// Returns [`RxclearError::AmountOverflow`] if the sum exceeds `u64::MAX`.
    pub fn checked_add(self, other: Self) -> Result<Self> {
        self.0
            .checked_add(other.0)
            .map(Self)
            .ok_or(RxclearError::AmountOverflow { context: "addition" })
    }

    /// Checked subtraction.
    ///
    /// # Errors
    /// Returns [`RxclearError::AmountOverflow`] if `other > self`.
    pub fn checked_sub(self, other: Self) -> Result<Self> {
        self.0
            .checked_sub(other.0)
            .map(Self)
            .ok_or(RxclearError::AmountOverflow {
                context: "subtraction",
            })
    }

    /// Basis-point fraction of this amount, rounding toward zero:
    /// `self * bps / 10_000` in integer arithmetic.
    ///
    /// # Errors
    /// Returns [`RxclearError::AmountOverflow`] if `self * bps` overflows
    /// the fixed-width accounting type.
    pub fn bps_of(self, bps: u64) -> Result<Self> {
        self.0
            .checked_mul(bps)
            .map(|scaled| Self(scaled / BPS_SCALE))
            .ok_or(RxclearError::AmountOverflow {
                context: "basis-point scaling",
            })
    }

    /// Split this amount into `(payee, fee)` where the fee is `fee_bps`
    /// of the whole. The two parts always sum back to `self` exactly.
    ///
    /// # Errors
    /// Returns [`RxclearError::AmountOverflow`] if the fee computation
    /// overflows.
    pub fn split_fee(self, fee_bps: u64) -> Result<(Self, Self)> {
        let fee = self.bps_of(fee_bps)?;
        let payee = self.checked_sub(fee)?;
        Ok((payee, fee))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
