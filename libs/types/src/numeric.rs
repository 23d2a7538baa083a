//! Integer value types for amounts and prices
//!
//! All matching arithmetic is exact integer arithmetic: amounts are
//! satoshi quantities and prices are probability percentages. No
//! floating point or decimal types appear anywhere in the match path,
//! which makes quantity conservation hold bit-for-bit.

use crate::errors::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Sub};

/// A non-negative amount of satoshis.
///
/// Serializes as a plain JSON number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Amount(u64);

impl Amount {
    pub const ZERO: Amount = Amount(0);

    /// Build an amount from an untrusted signed value.
    ///
    /// Fails with [`ValidationError::InvalidAmount`] on negative input.
    pub fn try_new(sats: i64) -> Result<Self, ValidationError> {
        if sats < 0 {
            return Err(ValidationError::InvalidAmount(sats));
        }
        Ok(Self(sats as u64))
    }

    /// Build an amount from a known-good satoshi count.
    pub fn from_sats(sats: u64) -> Self {
        Self(sats)
    }

    /// The underlying satoshi value.
    pub fn sats(&self) -> u64 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// The smaller of two amounts.
    pub fn min(a: Amount, b: Amount) -> Amount {
        if a <= b {
            a
        } else {
            b
        }
    }
}

impl Add for Amount {
    type Output = Amount;

    fn add(self, rhs: Amount) -> Amount {
        Amount(self.0 + rhs.0)
    }
}

impl AddAssign for Amount {
    fn add_assign(&mut self, rhs: Amount) {
        self.0 += rhs.0;
    }
}

impl Sub for Amount {
    type Output = Amount;

    /// # Panics
    /// Panics if `rhs` exceeds `self`. An amount can never go negative;
    /// an underflow here means book corruption, not a recoverable error.
    fn sub(self, rhs: Amount) -> Amount {
        assert!(rhs.0 <= self.0, "amount underflow: {} - {}", self.0, rhs.0);
        Amount(self.0 - rhs.0)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A probability price in the range [1, 99], representing a percentage
/// chance of the outcome. Used for limit order prices in binary outcome
/// markets.
///
/// Serializes as a plain JSON number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(u8);

impl Price {
    /// Build a price from an untrusted value.
    ///
    /// Fails with [`ValidationError::InvalidPrice`] outside [1, 99].
    pub fn try_new(value: i64) -> Result<Self, ValidationError> {
        if !(1..=99).contains(&value) {
            return Err(ValidationError::InvalidPrice(value));
        }
        Ok(Self(value as u8))
    }

    /// The price value, always in [1, 99].
    pub fn value(&self) -> u8 {
        self.0
    }

    /// The complementary probability (100 - this).
    ///
    /// A buy at this price and a buy of the complementary outcome at the
    /// complement jointly fund a complete set worth exactly 100.
    pub fn complement(&self) -> Price {
        Price(100 - self.0)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
