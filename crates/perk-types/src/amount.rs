use serde::{Deserialize, Serialize};
use std::fmt;

/// Whole-token reward amount. No fractional units exist in this system.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct TokenAmount(u64);

impl TokenAmount {
    pub const ZERO: Self = Self(0);

    pub fn from_units(units: u64) -> Self {
        Self(units)
    }

    pub fn to_units(&self) -> u64 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn checked_add(&self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    pub fn checked_sub(&self, other: Self) -> Option<Self> {
        self.0.checked_sub(other.0).map(Self)
    }

    pub fn saturating_add(&self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }

    pub fn saturating_sub(&self, other: Self) -> Self {
        Self(self.0.saturating_sub(other.0))
    }
}

impl fmt::Display for TokenAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} PERK", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checked_arithmetic() {
        let a = TokenAmount::from_units(10);
        let b = TokenAmount::from_units(3);

        assert_eq!(a.checked_add(b), Some(TokenAmount::from_units(13)));
        assert_eq!(a.checked_sub(b), Some(TokenAmount::from_units(7)));
        assert_eq!(b.checked_sub(a), None);
        assert_eq!(TokenAmount::from_units(u64::MAX).checked_add(b), None);
    }

    #[test]
    fn test_saturating_arithmetic() {
        let max = TokenAmount::from_units(u64::MAX);
        let one = TokenAmount::from_units(1);

        assert_eq!(max.saturating_add(one), max);
        assert_eq!(TokenAmount::ZERO.saturating_sub(one), TokenAmount::ZERO);
    }

    #[test]
    fn test_display() {
        assert_eq!(TokenAmount::from_units(42).to_string(), "42 PERK");
    }
}
