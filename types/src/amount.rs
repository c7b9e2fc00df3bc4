//! Ledger amounts as fixed-point integers.
//!
//! Amounts are represented as integer counts of the smallest ledger unit
//! (satoshis) to avoid floating-point drift. The only place a float exists
//! is the Ledger Reader boundary, where some data sources report BTC-style
//! decimal values; `from_btc` converts and rejects anything unrepresentable.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Sub};

use crate::error::TypeError;

/// Smallest ledger units per whole coin.
pub const SATS_PER_COIN: u64 = 100_000_000;

/// An amount in smallest ledger units.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Amount(u64);

impl Amount {
    pub const ZERO: Self = Self(0);

    pub fn from_sats(sats: u64) -> Self {
        Self(sats)
    }

    /// Convert a floating-point coin value reported by a data source.
    ///
    /// Rounds to the nearest satoshi. Rejects negative, non-finite, and
    /// out-of-range values.
    pub fn from_btc(btc: f64) -> Result<Self, TypeError> {
        if !btc.is_finite() || btc < 0.0 {
            return Err(TypeError::InvalidAmount(format!(
                "not a valid coin value: {btc}"
            )));
        }
        let sats = (btc * SATS_PER_COIN as f64).round();
        if sats > u64::MAX as f64 {
            return Err(TypeError::InvalidAmount(format!("value out of range: {btc}")));
        }
        Ok(Self(sats as u64))
    }

    pub fn sats(&self) -> u64 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    pub fn checked_sub(self, other: Self) -> Option<Self> {
        self.0.checked_sub(other.0).map(Self)
    }

    pub fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }

    pub fn saturating_sub(self, other: Self) -> Self {
        Self(self.0.saturating_sub(other.0))
    }
}

impl Add for Amount {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Amount {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        Self(iter.map(|a| a.0).sum())
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} sats", self.0)
    }
}
