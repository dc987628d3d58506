use crate::scalar::Scalar;

use std::collections::BTreeMap;
use std::iter::FromIterator;
use std::ops::{Add, Mul, Neg, Sub};

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Variable {
    /// Private witness value, indexed in allocation order.
    Private(usize),
    /// Represents the constant 1.
    One,
    /// Public input, indexed by its position in the public input vector.
    Input(usize),
}

/// Represents a linear combination of [`Variable`]s. Each term is a
/// `(Variable, Scalar)` pair; a variable may appear more than once until
/// the combination is compacted.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LinearCombination {
    pub terms: Vec<(Variable, Scalar)>,
}

impl LinearCombination {
    pub fn zero() -> Self {
        LinearCombination::default()
    }

    pub fn constant(value: Scalar) -> Self {
        LinearCombination::from(value)
    }

    /// Merges repeated variables and drops zero coefficients.
    pub fn compact(self) -> Self {
        let mut merged: BTreeMap<Variable, Scalar> = BTreeMap::new();
        for (var, coeff) in self.terms {
            *merged.entry(var).or_insert_with(Scalar::zero) += coeff;
        }
        merged.into_iter().filter(|(_, c)| !c.is_zero()).collect()
    }

    /// Evaluates the combination, `value_of` supplying each variable's value.
    pub fn evaluate<F>(&self, mut value_of: F) -> Option<Scalar>
    where
        F: FnMut(Variable) -> Option<Scalar>,
    {
        self.terms
            .iter()
            .map(|(var, coeff)| value_of(*var).map(|v| v * *coeff))
            .sum()
    }
}

impl From<Variable> for LinearCombination {
    fn from(v: Variable) -> LinearCombination {
        LinearCombination {
            terms: vec![(v, Scalar::one())],
        }
    }
}

impl From<Scalar> for LinearCombination {
    fn from(s: Scalar) -> LinearCombination {
        LinearCombination {
            terms: vec![(Variable::One, s)],
        }
    }
}

impl FromIterator<(Variable, Scalar)> for LinearCombination {
    fn from_iter<T>(iter: T) -> Self
    where
        T: IntoIterator<Item = (Variable, Scalar)>,
    {
        LinearCombination {
            terms: iter.into_iter().collect(),
        }
    }
}

impl<'a> FromIterator<&'a (Variable, Scalar)> for LinearCombination {
    fn from_iter<T>(iter: T) -> Self
    where
        T: IntoIterator<Item = &'a (Variable, Scalar)>,
    {
        LinearCombination {
            terms: iter.into_iter().cloned().collect(),
        }
    }
}

// Arithmetic on linear combinations

impl Neg for LinearCombination {
    type Output = Self;

    fn neg(mut self) -> Self::Output {
        for (_, s) in self.terms.iter_mut() {
            *s = -*s;
        }
        self
    }
}

impl<L: Into<LinearCombination>> Add<L> for LinearCombination {
    type Output = Self;

    fn add(mut self, rhs: L) -> Self::Output {
        self.terms.extend(rhs.into().terms);
        self
    }
}

impl<L: Into<LinearCombination>> Sub<L> for LinearCombination {
    type Output = Self;

    fn sub(mut self, rhs: L) -> Self::Output {
        self.terms
            .extend(rhs.into().terms.into_iter().map(|(var, coeff)| (var, -coeff)));
        self
    }
}

impl Mul<Scalar> for LinearCombination {
    type Output = Self;

    fn mul(mut self, rhs: Scalar) -> Self::Output {
        for (_, s) in self.terms.iter_mut() {
            *s *= rhs;
        }
        self
    }
}

// Arithmetic on variables produces linear combinations

impl<L: Into<LinearCombination>> Add<L> for Variable {
    type Output = LinearCombination;

    fn add(self, other: L) -> Self::Output {
        LinearCombination::from(self) + other.into()
    }
}

impl<L: Into<LinearCombination>> Sub<L> for Variable {
    type Output = LinearCombination;

    fn sub(self, other: L) -> Self::Output {
        LinearCombination::from(self) - other.into()
    }
}

impl Neg for Variable {
    type Output = LinearCombination;

    fn neg(self) -> Self::Output {
        -LinearCombination::from(self)
    }
}

impl Add<Variable> for Scalar {
    type Output = LinearCombination;

    fn add(self, other: Variable) -> Self::Output {
        LinearCombination {
            terms: vec![(Variable::One, self), (other, Scalar::one())],
        }
    }
}

impl Sub<Variable> for Scalar {
    type Output = LinearCombination;

    fn sub(self, other: Variable) -> Self::Output {
        LinearCombination {
            terms: vec![(Variable::One, self), (other, -Scalar::one())],
        }
    }
}

impl Mul<Variable> for Scalar {
    type Output = LinearCombination;

    fn mul(self, other: Variable) -> Self::Output {
        LinearCombination {
            terms: vec![(other, self)],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compact_merges_and_drops() {
        let x = Variable::Private(0);
        let y = Variable::Input(1);
        let lc = (x + y) + Scalar::from_u64(3) * x - y;
        let compact = lc.compact();
        assert_eq!(compact.terms, vec![(x, Scalar::from_u64(4))]);
    }

    #[test]
    fn test_evaluate() {
        let x = Variable::Private(0);
        let lc = Scalar::from_u64(2) * x + Scalar::from_u64(5);
        let value = lc.evaluate(|v| match v {
            Variable::Private(0) => Some(Scalar::from_u64(10)),
            Variable::One => Some(Scalar::one()),
            _ => None,
        });
        assert_eq!(value, Some(Scalar::from_u64(25)));

        let missing = LinearCombination::from(Variable::Input(0)).evaluate(|_| None);
        assert_eq!(missing, None);
    }

    #[test]
    fn test_scaling_and_negation() {
        let x = Variable::Private(2);
        let lc = -(LinearCombination::from(x) * Scalar::from_u64(3));
        assert_eq!(lc.terms, vec![(x, -Scalar::from_u64(3))]);
    }
}
