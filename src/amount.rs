use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::iter::Sum;
use std::ops::Add;

/// The value carried by a transaction output.
/// ScroogeCoin values are real quantities, so a NaN value can be constructed. It is never
/// accepted by the validator.
#[derive(Copy, Clone, PartialOrd, PartialEq, Debug, Default, Serialize, Deserialize)]
pub struct Amount(f64);

impl Amount {
    pub fn new(value: f64) -> Self {
        Amount(value)
    }

    pub fn zero() -> Self {
        Self::new(0.0)
    }

    /// Returns true for values that may appear in an output, i.e. greater than or equal to zero.
    /// NaN is not a valid value.
    pub fn is_non_negative(&self) -> bool {
        self.0 >= 0.0
    }
}

impl Add for Amount {
    type Output = Amount;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sum<Amount> for Amount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::zero(), Add::add)
    }
}

impl<'a> Sum<&'a Amount> for Amount {
    fn sum<I: Iterator<Item = &'a Amount>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

impl From<f64> for Amount {
    fn from(value: f64) -> Self {
        Self::new(value)
    }
}

impl From<i32> for Amount {
    fn from(value: i32) -> Self {
        Self(value as f64)
    }
}

impl Display for Amount {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} SCR", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sum_of_amounts() {
        let amounts = vec![Amount::from(1), Amount::from(2.5), Amount::from(3)];
        assert_eq!(amounts.iter().sum::<Amount>(), Amount::new(6.5));
        assert_eq!(Vec::<Amount>::new().into_iter().sum::<Amount>(), Amount::zero());
    }

    #[test]
    fn sign_inspection() {
        assert!(Amount::zero().is_non_negative());
        assert!(Amount::new(0.01).is_non_negative());
        assert!(!Amount::new(-0.01).is_non_negative());
        assert!(!Amount::new(f64::NAN).is_non_negative());
    }

    #[test]
    fn display_with_unit() {
        assert_eq!(Amount::from(10).to_string(), "10 SCR");
    }
}
