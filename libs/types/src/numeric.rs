//! Fixed-point asset amounts
//!
//! All ledger arithmetic happens on `Wei`, an unsigned integer count of the
//! smallest asset unit, with checked operations only. Human-facing ether
//! values go through `rust_decimal` so "0.1" is exactly 10^17 wei with no
//! floating-point rounding.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::AmountError;

/// Number of wei in one ether.
pub const WEI_PER_ETHER: u128 = 1_000_000_000_000_000_000;

/// Decimal places of one ether.
pub const ETHER_DECIMALS: u32 = 18;

/// An amount of the custodied asset in its smallest unit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Wei(u128);

impl Wei {
    pub const ZERO: Wei = Wei(0);

    /// Create from a raw wei count
    pub const fn new(wei: u128) -> Self {
        Self(wei)
    }

    /// Create from a whole number of ether
    pub const fn from_ether(ether: u64) -> Self {
        Self(ether as u128 * WEI_PER_ETHER)
    }

    /// Parse a decimal ether string such as `"0.8"` or `"2"`.
    pub fn from_ether_str(s: &str) -> Result<Self, AmountError> {
        let value =
            Decimal::from_str_exact(s.trim()).map_err(|_| AmountError::Invalid(s.to_string()))?;
        Self::from_ether_decimal(value)
    }

    /// Convert a decimal ether value into wei.
    ///
    /// Rejects negative values and anything finer than one wei.
    pub fn from_ether_decimal(value: Decimal) -> Result<Self, AmountError> {
        if value.is_sign_negative() && !value.is_zero() {
            return Err(AmountError::Negative(value.to_string()));
        }
        let value = value.normalize();
        let scale = value.scale();
        if scale > ETHER_DECIMALS {
            return Err(AmountError::TooPrecise(value.to_string()));
        }

        let mantissa = u128::try_from(value.mantissa()).map_err(|_| AmountError::OutOfRange)?;
        10u128
            .checked_pow(ETHER_DECIMALS - scale)
            .and_then(|factor| mantissa.checked_mul(factor))
            .map(Self)
            .ok_or(AmountError::OutOfRange)
    }

    /// Convert to a decimal ether value.
    ///
    /// Fails only for amounts beyond the 96-bit decimal mantissa (~79 billion ether).
    pub fn to_ether(&self) -> Result<Decimal, AmountError> {
        let signed = i128::try_from(self.0).map_err(|_| AmountError::OutOfRange)?;
        Decimal::try_from_i128_with_scale(signed, ETHER_DECIMALS)
            .map(|d| d.normalize())
            .map_err(|_| AmountError::OutOfRange)
    }

    /// Display adapter rendering the amount in ether (`0.6`, `2`).
    pub fn ether(self) -> Ether {
        Ether(self)
    }

    /// Raw wei count
    pub const fn as_u128(&self) -> u128 {
        self.0
    }

    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn checked_add(self, rhs: Wei) -> Option<Wei> {
        self.0.checked_add(rhs.0).map(Wei)
    }

    pub fn checked_sub(self, rhs: Wei) -> Option<Wei> {
        self.0.checked_sub(rhs.0).map(Wei)
    }

    /// Multiply a unit price by a unit count.
    pub fn checked_mul(self, count: u64) -> Option<Wei> {
        self.0.checked_mul(count as u128).map(Wei)
    }

    pub fn saturating_sub(self, rhs: Wei) -> Wei {
        Wei(self.0.saturating_sub(rhs.0))
    }
}

impl fmt::Display for Wei {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} wei", self.0)
    }
}

/// Ether rendering of a `Wei` amount, trailing zeros trimmed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ether(Wei);

impl fmt::Display for Ether {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0 .0 / WEI_PER_ETHER;
        let frac = self.0 .0 % WEI_PER_ETHER;
        if frac == 0 {
            return write!(f, "{}", whole);
        }
        let digits = format!("{:018}", frac);
        write!(f, "{}.{}", whole, digits.trim_end_matches('0'))
    }
}
