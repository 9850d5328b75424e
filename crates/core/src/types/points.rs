//! Reward points, the storefront's only currency.
//!
//! One point is one unit of redemption cost. Points are never fractional and
//! never negative, so they are held as a `u64`.

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Mul};

use serde::{Deserialize, Serialize};

/// An amount of reward points.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Points(u64);

impl Points {
    /// Zero points.
    pub const ZERO: Self = Self(0);

    /// Create a new amount.
    #[must_use]
    pub const fn new(amount: u64) -> Self {
        Self(amount)
    }

    /// Get the underlying amount.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }

    /// Difference `self - other`, or zero when `other` is larger.
    #[must_use]
    pub const fn saturating_sub(self, other: Self) -> Self {
        Self(self.0.saturating_sub(other.0))
    }
}

impl Add for Points {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }
}

/// Line cost: unit points times quantity.
impl Mul<u32> for Points {
    type Output = Self;

    fn mul(self, quantity: u32) -> Self {
        Self(self.0.saturating_mul(u64::from(quantity)))
    }
}

impl Sum for Points {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl From<u64> for Points {
    fn from(amount: u64) -> Self {
        Self(amount)
    }
}

impl fmt::Display for Points {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} points", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_cost() {
        assert_eq!(Points::new(200) * 2, Points::new(400));
        assert_eq!(Points::new(350) * 0, Points::ZERO);
    }

    #[test]
    fn test_sum() {
        let total: Points = [Points::new(400), Points::new(350)].into_iter().sum();
        assert_eq!(total, Points::new(750));
    }

    #[test]
    fn test_saturating_sub() {
        assert_eq!(Points::new(700).saturating_sub(Points::new(750)), Points::ZERO);
        assert_eq!(Points::new(800).saturating_sub(Points::new(750)), Points::new(50));
    }

    #[test]
    fn test_display() {
        assert_eq!(Points::new(750).to_string(), "750 points");
    }
}
