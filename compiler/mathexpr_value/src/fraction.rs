//! Exact rational numbers.

use std::cmp::Ordering;
use std::fmt;

use num_integer::Integer;

use crate::errors::{division_by_zero, type_error, EvalError, EvalResult};

/// A reduced fraction with a positive denominator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Fraction {
    num: i64,
    den: i64,
}

fn overflow() -> EvalError {
    EvalError::new("Fraction overflow")
}

fn narrow(n: i128) -> EvalResult<i64> {
    i64::try_from(n).map_err(|_| overflow())
}

impl Fraction {
    pub fn new(num: i64, den: i64) -> EvalResult<Self> {
        if den == 0 {
            return Err(division_by_zero());
        }
        Self::reduce(i128::from(num), i128::from(den))
    }

    pub fn integer(n: i64) -> Self {
        Fraction { num: n, den: 1 }
    }

    fn reduce(num: i128, den: i128) -> EvalResult<Self> {
        let gcd = num.gcd(&den).max(1);
        let sign = if den < 0 { -1 } else { 1 };
        Ok(Fraction {
            num: narrow(sign * num / gcd)?,
            den: narrow(sign * den / gcd)?,
        })
    }

    /// Exact conversion of a finite decimal number, e.g. `0.25` to `1/4`.
    pub fn from_f64(x: f64) -> EvalResult<Self> {
        if !x.is_finite() {
            return Err(type_error("a finite number", &x.to_string()));
        }
        let mut scale: i64 = 1;
        for _ in 0..=15 {
            let scaled = x * scale as f64;
            let rounded = scaled.round();
            if (scaled - rounded).abs() <= f64::EPSILON * scaled.abs().max(1.0) * 4.0 {
                if rounded.abs() >= i64::MAX as f64 {
                    return Err(overflow());
                }
                return Fraction::new(rounded as i64, scale);
            }
            scale = scale.checked_mul(10).ok_or_else(overflow)?;
        }
        Err(overflow())
    }

    pub fn numerator(&self) -> i64 {
        self.num
    }

    pub fn denominator(&self) -> i64 {
        self.den
    }

    pub fn is_zero(&self) -> bool {
        self.num == 0
    }

    pub fn to_f64(&self) -> f64 {
        self.num as f64 / self.den as f64
    }

    pub fn checked_add(&self, other: &Fraction) -> EvalResult<Fraction> {
        let (a, b, c, d) = self.wide(other);
        Self::reduce(a * d + c * b, b * d)
    }

    pub fn checked_sub(&self, other: &Fraction) -> EvalResult<Fraction> {
        let (a, b, c, d) = self.wide(other);
        Self::reduce(a * d - c * b, b * d)
    }

    pub fn checked_mul(&self, other: &Fraction) -> EvalResult<Fraction> {
        let (a, b, c, d) = self.wide(other);
        Self::reduce(a * c, b * d)
    }

    pub fn checked_div(&self, other: &Fraction) -> EvalResult<Fraction> {
        if other.is_zero() {
            return Err(division_by_zero());
        }
        let (a, b, c, d) = self.wide(other);
        Self::reduce(a * d, b * c)
    }

    pub fn checked_neg(&self) -> EvalResult<Fraction> {
        Self::reduce(-i128::from(self.num), i128::from(self.den))
    }

    fn wide(&self, other: &Fraction) -> (i128, i128, i128, i128) {
        (
            i128::from(self.num),
            i128::from(self.den),
            i128::from(other.num),
            i128::from(other.den),
        )
    }
}

impl PartialOrd for Fraction {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Fraction {
    fn cmp(&self, other: &Self) -> Ordering {
        let (a, b, c, d) = self.wide(other);
        (a * d).cmp(&(c * b))
    }
}

impl fmt::Display for Fraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.den == 1 {
            write!(f, "{}", self.num)
        } else {
            write!(f, "{}/{}", self.num, self.den)
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
