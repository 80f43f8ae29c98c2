//! Arbitrary precision decimal numbers
//!
//! A [`Decimal`] is a sign, an unsigned integer coefficient and a base-ten
//! exponent: `(-1)^sign * coefficient * 10^exponent`. Trailing zeros are
//! significant for display (`1010.100` keeps its three fractional digits) but
//! not for numeric comparison.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::{Add, Neg};
use std::str::FromStr;

use num::bigint::Sign;
use num::{BigInt, BigUint, Integer, One, Zero};

use crate::error::{OrcError, Result};

/// Largest exponent magnitude accepted when parsing.
pub const MAX_EXPONENT: i64 = 999_999;

/// Decimal digits of a [`Decimal`], most significant first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecimalTuple {
    /// 0 for positive, 1 for negative
    pub sign: u8,
    pub digits: Vec<u8>,
    pub exponent: i64,
}

#[derive(Debug, Clone)]
pub struct Decimal {
    negative: bool,
    coefficient: BigUint,
    exponent: i64,
}

pub(crate) fn ten_pow(n: u64) -> BigUint {
    num::pow(BigUint::from(10u8), n as usize)
}

impl Decimal {
    /// Build from a signed coefficient and exponent
    pub fn new(coefficient: BigInt, exponent: i64) -> Self {
        let (sign, magnitude) = coefficient.into_parts();
        Self {
            negative: sign == Sign::Minus,
            coefficient: magnitude,
            exponent,
        }
    }

    /// `value * 10^-scale`
    pub fn from_scaled(value: BigInt, scale: u32) -> Self {
        Self::new(value, -(scale as i64))
    }

    pub fn zero() -> Self {
        Self::new(BigInt::zero(), 0)
    }

    pub fn is_zero(&self) -> bool {
        self.coefficient.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        self.negative && !self.is_zero()
    }

    pub fn exponent(&self) -> i64 {
        self.exponent
    }

    /// The coefficient with the sign applied
    pub fn signed_coefficient(&self) -> BigInt {
        let sign = if self.negative { Sign::Minus } else { Sign::Plus };
        BigInt::from_biguint(sign, self.coefficient.clone())
    }

    /// Number of digits in the coefficient (`0` has one digit)
    pub fn digit_count(&self) -> usize {
        self.digits().len()
    }

    fn digits(&self) -> Vec<u8> {
        if self.coefficient.is_zero() {
            return vec![0];
        }
        let mut digits = self.coefficient.to_radix_le(10);
        digits.reverse();
        digits
    }

    pub fn as_tuple(&self) -> DecimalTuple {
        DecimalTuple {
            sign: u8::from(self.negative),
            digits: self.digits(),
            exponent: self.exponent,
        }
    }

    /// Round to `scale` fractional digits (ROUND_HALF_EVEN) under a context of
    /// `precision` significant digits.
    ///
    /// Fails with a conversion error when the rounded coefficient needs more
    /// than `precision` digits.
    pub fn quantize(&self, scale: u32, precision: u32) -> Result<Decimal> {
        let target = -(scale as i64);
        let coefficient = match self.exponent.cmp(&target) {
            Ordering::Equal => self.coefficient.clone(),
            Ordering::Greater => {
                &self.coefficient * ten_pow(self.exponent.abs_diff(target))
            }
            Ordering::Less => {
                let divisor = ten_pow(target.abs_diff(self.exponent));
                let (quotient, remainder) = self.coefficient.div_rem(&divisor);
                let twice: BigUint = remainder << 1u32;
                match twice.cmp(&divisor) {
                    Ordering::Greater => quotient + BigUint::one(),
                    Ordering::Equal if quotient.is_odd() => quotient + BigUint::one(),
                    _ => quotient,
                }
            }
        };
        let quantized = Decimal {
            negative: self.negative,
            coefficient,
            exponent: target,
        };
        if quantized.digit_count() > precision as usize {
            return Err(OrcError::conversion(format!(
                "{} does not fit decimal({},{})",
                self, precision, scale
            )));
        }
        Ok(quantized)
    }

    /// Both coefficients rescaled to the smaller exponent
    fn aligned(&self, other: &Decimal) -> (BigInt, BigInt, i64) {
        let exponent = self.exponent.min(other.exponent);
        let lhs = self.signed_coefficient()
            * BigInt::from(ten_pow(self.exponent.abs_diff(exponent)));
        let rhs = other.signed_coefficient()
            * BigInt::from(ten_pow(other.exponent.abs_diff(exponent)));
        (lhs, rhs, exponent)
    }

    /// Numeric ordering, then exponent, so that `1.0` and `1.00` are distinct
    pub fn total_cmp(&self, other: &Decimal) -> Ordering {
        self.cmp(other).then_with(|| {
            let by_exponent = self.exponent.cmp(&other.exponent);
            if self.is_negative() {
                by_exponent.reverse()
            } else {
                by_exponent
            }
        })
    }

    fn normalized(&self) -> (bool, BigUint, i64) {
        if self.coefficient.is_zero() {
            return (false, BigUint::zero(), 0);
        }
        let ten = BigUint::from(10u8);
        let mut coefficient = self.coefficient.clone();
        let mut exponent = self.exponent;
        loop {
            let (quotient, remainder) = coefficient.div_rem(&ten);
            if !remainder.is_zero() {
                break;
            }
            coefficient = quotient;
            exponent += 1;
        }
        (self.negative, coefficient, exponent)
    }
}

impl FromStr for Decimal {
    type Err = OrcError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || OrcError::conversion(format!("Invalid decimal literal: {:?}", s));
        let text = s.trim();
        let (negative, unsigned) = match text.as_bytes().first() {
            Some(b'-') => (true, &text[1..]),
            Some(b'+') => (false, &text[1..]),
            _ => (false, text),
        };
        let (mantissa, exp_part) = match unsigned.find(|c: char| c == 'e' || c == 'E') {
            Some(pos) => (&unsigned[..pos], Some(&unsigned[pos + 1..])),
            None => (unsigned, None),
        };
        let (int_part, frac_part) = match mantissa.split_once('.') {
            Some((int_part, frac_part)) => (int_part, frac_part),
            None => (mantissa, ""),
        };
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(invalid());
        }
        if !int_part.bytes().chain(frac_part.bytes()).all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let mut exponent = match exp_part {
            Some(exp) => exp.parse::<i64>().map_err(|_| invalid())?,
            None => 0,
        };
        if exponent.abs() > MAX_EXPONENT {
            return Err(OrcError::conversion(format!(
                "Decimal exponent out of range: {:?}",
                s
            )));
        }
        exponent -= frac_part.len() as i64;
        let digits = format!("{}{}", int_part, frac_part);
        let coefficient = BigUint::parse_bytes(digits.as_bytes(), 10).ok_or_else(invalid)?;
        Ok(Decimal {
            negative,
            coefficient,
            exponent,
        })
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits: String = self
            .digits()
            .iter()
            .map(|d| char::from(b'0' + d))
            .collect();
        let len = digits.len() as i64;
        let leftdigits = self.exponent + len;
        let dotplace = if self.exponent <= 0 && leftdigits > -6 {
            leftdigits
        } else {
            1
        };
        if self.negative {
            f.write_str("-")?;
        }
        if dotplace <= 0 {
            write!(f, "0.{}{}", "0".repeat((-dotplace) as usize), digits)?;
        } else if dotplace >= len {
            write!(f, "{}{}", digits, "0".repeat((dotplace - len) as usize))?;
        } else {
            let (int_part, frac_part) = digits.split_at(dotplace as usize);
            write!(f, "{}.{}", int_part, frac_part)?;
        }
        if leftdigits != dotplace {
            write!(f, "E{:+}", leftdigits - dotplace)?;
        }
        Ok(())
    }
}

impl PartialEq for Decimal {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Decimal {}

impl PartialOrd for Decimal {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Decimal {
    fn cmp(&self, other: &Self) -> Ordering {
        let (lhs, rhs, _) = self.aligned(other);
        lhs.cmp(&rhs)
    }
}

impl Hash for Decimal {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.normalized().hash(state);
    }
}

impl Add for &Decimal {
    type Output = Decimal;

    fn add(self, rhs: &Decimal) -> Decimal {
        let (lhs, rhs, exponent) = self.aligned(rhs);
        Decimal::new(lhs + rhs, exponent)
    }
}

impl Add for Decimal {
    type Output = Decimal;

    fn add(self, rhs: Decimal) -> Decimal {
        &self + &rhs
    }
}

impl Neg for Decimal {
    type Output = Decimal;

    fn neg(mut self) -> Decimal {
        self.negative = !self.negative;
        self
    }
}

impl From<i64> for Decimal {
    fn from(value: i64) -> Self {
        Decimal::new(BigInt::from(value), 0)
    }
}

impl From<BigInt> for Decimal {
    fn from(value: BigInt) -> Self {
        Decimal::new(value, 0)
    }
}
