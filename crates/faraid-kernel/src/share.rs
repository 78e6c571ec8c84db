//! Fractions of the net estate.

use serde::{Deserialize, Serialize};

/// A share of the net estate, kept as an exact ratio for labelling and
/// converted to `f64` only when applied to an amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fraction {
    pub numerator: u32,
    pub denominator: u32,
}

impl Fraction {
    pub const HALF: Fraction = Fraction::new(1, 2);
    pub const THIRD: Fraction = Fraction::new(1, 3);
    pub const QUARTER: Fraction = Fraction::new(1, 4);
    pub const SIXTH: Fraction = Fraction::new(1, 6);
    pub const EIGHTH: Fraction = Fraction::new(1, 8);
    pub const TWO_THIRDS: Fraction = Fraction::new(2, 3);

    pub const fn new(numerator: u32, denominator: u32) -> Self {
        Self {
            numerator,
            denominator,
        }
    }

    pub fn value(self) -> f64 {
        f64::from(self.numerator) / f64::from(self.denominator)
    }

    /// This fraction applied to `amount`.
    pub fn of(self, amount: f64) -> f64 {
        amount * f64::from(self.numerator) / f64::from(self.denominator)
    }

    /// The share of one member when `members` split this fraction equally.
    ///
    /// A zero member count is treated as one.
    pub fn per_member(self, members: u32) -> Fraction {
        let members = members.max(1);
        Fraction::new(self.numerator, self.denominator.saturating_mul(members)).reduced()
    }

    /// Sum of two fractions, reduced.
    pub fn plus(self, other: Fraction) -> Fraction {
        let numerator = self
            .numerator
            .saturating_mul(other.denominator)
            .saturating_add(other.numerator.saturating_mul(self.denominator));
        Fraction::new(numerator, self.denominator.saturating_mul(other.denominator)).reduced()
    }

    pub fn reduced(self) -> Fraction {
        let divisor = gcd(self.numerator, self.denominator);
        if divisor <= 1 {
            return self;
        }
        Fraction::new(self.numerator / divisor, self.denominator / divisor)
    }
}

impl std::fmt::Display for Fraction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

fn gcd(mut a: u32, mut b: u32) -> u32 {
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn applies_to_amounts() {
        assert_eq!(Fraction::EIGHTH.of(1000.0), 125.0);
        assert_eq!(Fraction::TWO_THIRDS.of(1200.0), 800.0);
    }

    #[test]
    fn per_member_divides_and_reduces() {
        assert_eq!(Fraction::TWO_THIRDS.per_member(2), Fraction::THIRD);
        assert_eq!(Fraction::TWO_THIRDS.per_member(3), Fraction::new(2, 9));
        assert_eq!(Fraction::SIXTH.per_member(0), Fraction::SIXTH);
    }

    #[test]
    fn sums_reduce() {
        assert_eq!(Fraction::HALF.plus(Fraction::QUARTER), Fraction::new(3, 4));
        assert_eq!(Fraction::SIXTH.plus(Fraction::THIRD), Fraction::HALF);
        assert_eq!(Fraction::new(0, 1).plus(Fraction::EIGHTH), Fraction::EIGHTH);
    }

    #[test]
    fn displays_as_ratio() {
        insta::assert_snapshot!(Fraction::TWO_THIRDS.to_string(), @"2/3");
        insta::assert_snapshot!(Fraction::SIXTH.per_member(4).to_string(), @"1/24");
    }
}
