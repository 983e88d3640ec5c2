//! Amounts in the network currency.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Neg, Sub};

/// Number of tinybars (the minor unit) in one hbar.
pub const TINYBAR_PER_HBAR: i64 = 100_000_000;

/// An amount of network currency, stored in tinybars.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Hbar(i64);

impl Hbar {
    pub const ZERO: Hbar = Hbar(0);

    /// Whole hbars.
    pub const fn new(hbars: i64) -> Self {
        Hbar(hbars.saturating_mul(TINYBAR_PER_HBAR))
    }

    pub const fn from_tinybars(tinybars: i64) -> Self {
        Hbar(tinybars)
    }

    pub const fn to_tinybars(self) -> i64 {
        self.0
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }
}

impl Add for Hbar {
    type Output = Hbar;

    fn add(self, rhs: Hbar) -> Hbar {
        Hbar(self.0.saturating_add(rhs.0))
    }
}

impl Sub for Hbar {
    type Output = Hbar;

    fn sub(self, rhs: Hbar) -> Hbar {
        Hbar(self.0.saturating_sub(rhs.0))
    }
}

impl Neg for Hbar {
    type Output = Hbar;

    fn neg(self) -> Hbar {
        Hbar(self.0.saturating_neg())
    }
}

impl fmt::Display for Hbar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 % TINYBAR_PER_HBAR == 0 {
            write!(f, "{} ℏ", self.0 / TINYBAR_PER_HBAR)
        } else {
            write!(f, "{} tℏ", self.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversions() {
        assert_eq!(Hbar::new(2).to_tinybars(), 200_000_000);
        assert_eq!(Hbar::from_tinybars(25).to_tinybars(), 25);
        assert!(Hbar::ZERO.is_zero());
    }

    #[test]
    fn ordering_and_arithmetic() {
        assert!(Hbar::from_tinybars(24) < Hbar::from_tinybars(25));
        assert_eq!(Hbar::new(1) - Hbar::from_tinybars(1), Hbar::from_tinybars(99_999_999));
        assert_eq!(-Hbar::from_tinybars(5), Hbar::from_tinybars(-5));
        assert_eq!(Hbar::from_tinybars(i64::MAX) + Hbar::new(1), Hbar::from_tinybars(i64::MAX));
    }

    #[test]
    fn display() {
        assert_eq!(Hbar::new(1).to_string(), "1 ℏ");
        assert_eq!(Hbar::from_tinybars(25).to_string(), "25 tℏ");
    }
}
