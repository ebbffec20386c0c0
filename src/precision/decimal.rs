//! Arbitrary-precision decimal floating point.
//!
//! A [`Decimal`] is `mantissa × 10^exponent` with a big-integer mantissa.
//! Arithmetic rounds half-even to the significant-digit budget of the
//! [`PrecisionContext`] passed to each operation; parsing and `f64`
//! conversion in are exact (every finite double has a finite decimal
//! expansion). Values are kept canonical (the mantissa is never divisible
//! by ten and zero is `0 × 10^0`), so equality is structural and exact.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use num::bigint::BigInt;
use num::traits::{Pow, Signed, Zero};
use num::Integer;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Error, Result};
use crate::precision::context::PrecisionContext;

/// Guard digits appended when a far-smaller addend is folded into a sticky
/// digit instead of being aligned in full.
const STICKY_GUARD: i64 = 4;

/// A decimal floating-point number with an arbitrary-precision mantissa.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Decimal {
    mantissa: BigInt,
    exponent: i64,
}

/// 10^exp as a big integer.
fn pow10(exp: u64) -> BigInt {
    Pow::pow(BigInt::from(10u32), exp)
}

/// Number of decimal digits in the magnitude of a nonzero integer.
fn digit_count(value: &BigInt) -> u64 {
    debug_assert!(!value.is_zero());
    value.magnitude().to_string().len() as u64
}

/// Rounds `num / den` (both positive) half-even to exactly `digits`
/// significant digits, returning the mantissa and its decimal exponent.
///
/// The returned mantissa may carry one extra digit when rounding rolls a
/// run of nines over (e.g. 999.6 at three digits becomes 1000); callers
/// normalize afterwards.
fn round_magnitude_scaled(num: &BigInt, den: &BigInt, digits: u32) -> (BigInt, i64) {
    debug_assert!(num.is_positive() && den.is_positive());
    let target = i64::from(digits.max(1));
    let mut shift = target + digit_count(den) as i64 - digit_count(num) as i64;
    loop {
        let (scaled_num, scaled_den) = if shift >= 0 {
            (num * pow10(shift as u64), den.clone())
        } else {
            (num.clone(), den * pow10(shift.unsigned_abs()))
        };
        let (quotient, remainder) = scaled_num.div_rem(&scaled_den);
        let width = if quotient.is_zero() {
            0
        } else {
            digit_count(&quotient) as i64
        };
        if width != target {
            // digit-count estimate was off; re-aim and retry
            shift += target - width;
            continue;
        }
        let twice: BigInt = &remainder * 2;
        let rounded = match twice.cmp(&scaled_den) {
            Ordering::Greater => quotient + 1,
            Ordering::Less => quotient,
            Ordering::Equal => {
                if quotient.is_even() {
                    quotient
                } else {
                    quotient + 1
                }
            }
        };
        return (rounded, -shift);
    }
}

impl Decimal {
    // =========================================================================
    // Construction
    // =========================================================================

    /// Exact zero.
    pub fn zero() -> Self {
        Self {
            mantissa: BigInt::zero(),
            exponent: 0,
        }
    }

    /// Exact one.
    pub fn one() -> Self {
        Self {
            mantissa: BigInt::from(1u32),
            exponent: 0,
        }
    }

    /// Exact conversion from an unsigned integer.
    pub fn from_u64(value: u64) -> Self {
        Self::normalize(BigInt::from(value), 0)
    }

    /// Exact conversion from a signed integer.
    pub fn from_i64(value: i64) -> Self {
        Self::normalize(BigInt::from(value), 0)
    }

    /// Exact conversion from a big integer.
    pub fn from_bigint(value: BigInt) -> Self {
        Self::normalize(value, 0)
    }

    /// Exact `mantissa × 10^exponent`.
    pub fn from_scaled(mantissa: i64, exponent: i64) -> Self {
        Self::normalize(BigInt::from(mantissa), exponent)
    }

    /// Exact conversion from a finite `f64`.
    ///
    /// Every finite double `m × 2^e` has a finite decimal expansion
    /// (`m × 5^|e| × 10^e` for negative e), which is preserved in full.
    /// Note that e.g. `from_f64(0.1)` therefore differs from `parse("0.1")`
    /// by the usual binary representation error.
    ///
    /// # Returns
    ///
    /// The exact decimal value, or [`Error::NonFiniteValue`] for NaN and
    /// infinities.
    pub fn from_f64(value: f64) -> Result<Self> {
        if !value.is_finite() {
            return Err(Error::NonFiniteValue { value });
        }
        if value == 0.0 {
            return Ok(Self::zero());
        }
        let bits = value.to_bits();
        let negative = bits >> 63 == 1;
        let biased = ((bits >> 52) & 0x7ff) as i64;
        let fraction = bits & 0x000f_ffff_ffff_ffff;
        let (magnitude, exponent2) = if biased == 0 {
            (BigInt::from(fraction), -1074i64)
        } else {
            (BigInt::from(fraction | (1u64 << 52)), biased - 1075)
        };
        let mantissa2 = if negative { -magnitude } else { magnitude };
        let dec = if exponent2 >= 0 {
            Self::normalize(mantissa2 << exponent2 as usize, 0)
        } else {
            let scale = exponent2.unsigned_abs();
            Self::normalize(mantissa2 * Pow::pow(BigInt::from(5u32), scale), exponent2)
        };
        Ok(dec)
    }

    /// Parses a decimal literal (`-12.345e-6` style), exactly.
    pub fn parse(input: &str) -> Result<Self> {
        let parse_err = || Error::DecimalParse {
            input: input.to_string(),
        };
        let text = input.trim();
        let (negative, text) = match text.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, text.strip_prefix('+').unwrap_or(text)),
        };
        let (number, exp_part) = match text.split_once(['e', 'E']) {
            Some((num, exp)) => (num, Some(exp)),
            None => (text, None),
        };
        let (int_part, frac_part) = match number.split_once('.') {
            Some((int, frac)) => (int, frac),
            None => (number, ""),
        };
        let digits: String = [int_part, frac_part].concat();
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(parse_err());
        }
        let mut exponent: i64 = match exp_part {
            Some(exp) => exp.parse().map_err(|_| parse_err())?,
            None => 0,
        };
        exponent -= frac_part.len() as i64;
        let magnitude = BigInt::parse_bytes(digits.as_bytes(), 10).ok_or_else(parse_err)?;
        let mantissa = if negative { -magnitude } else { magnitude };
        Ok(Self::normalize(mantissa, exponent))
    }

    /// Canonicalizes a raw (mantissa, exponent) pair.
    fn normalize(mut mantissa: BigInt, mut exponent: i64) -> Self {
        if mantissa.is_zero() {
            return Self::zero();
        }
        let ten = BigInt::from(10u32);
        loop {
            let (quotient, remainder) = mantissa.div_rem(&ten);
            if !remainder.is_zero() {
                break;
            }
            mantissa = quotient;
            exponent += 1;
        }
        Self { mantissa, exponent }
    }

    /// Constructs from a raw pair, rounding to the given digit budget.
    fn rounded_with(mantissa: BigInt, exponent: i64, digits: u32) -> Self {
        if mantissa.is_zero() {
            return Self::zero();
        }
        if digit_count(&mantissa) <= u64::from(digits) {
            return Self::normalize(mantissa, exponent);
        }
        let negative = mantissa.is_negative();
        let (quotient, delta) = round_magnitude_scaled(&mantissa.abs(), &BigInt::from(1u32), digits);
        let rounded = if negative { -quotient } else { quotient };
        Self::normalize(rounded, exponent + delta)
    }

    fn rounded(mantissa: BigInt, exponent: i64, ctx: &PrecisionContext) -> Self {
        Self::rounded_with(mantissa, exponent, ctx.decimal_digits())
    }

    // =========================================================================
    // Inspection
    // =========================================================================

    pub fn is_zero(&self) -> bool {
        self.mantissa.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        self.mantissa.is_negative()
    }

    /// Decimal position of the leading digit: the value's magnitude lies in
    /// `[10^(lead-1), 10^lead)`.
    fn lead(&self) -> i64 {
        debug_assert!(!self.is_zero());
        self.exponent + digit_count(&self.mantissa) as i64
    }

    // =========================================================================
    // Arithmetic
    // =========================================================================

    /// Sum, rounded to the context budget.
    pub fn add(&self, other: &Decimal, ctx: &PrecisionContext) -> Decimal {
        if self.is_zero() {
            return Self::rounded(other.mantissa.clone(), other.exponent, ctx);
        }
        if other.is_zero() {
            return Self::rounded(self.mantissa.clone(), self.exponent, ctx);
        }
        let (hi, lo) = if self.lead() >= other.lead() {
            (self, other)
        } else {
            (other, self)
        };
        // A far-smaller addend cannot change any kept digit; fold it into a
        // sticky digit below the rounding cutoff instead of aligning in full.
        let hi_width = digit_count(&hi.mantissa) as i64;
        let pad = (i64::from(ctx.decimal_digits()) + STICKY_GUARD - hi_width).max(STICKY_GUARD);
        if lo.lead() <= hi.exponent - pad {
            let mut padded = &hi.mantissa * pow10(pad as u64);
            if lo.is_negative() {
                padded -= 1;
            } else {
                padded += 1;
            }
            return Self::rounded(padded, hi.exponent - pad, ctx);
        }
        let min_exp = self.exponent.min(other.exponent);
        let a = &self.mantissa * pow10((self.exponent - min_exp) as u64);
        let b = &other.mantissa * pow10((other.exponent - min_exp) as u64);
        Self::rounded(a + b, min_exp, ctx)
    }

    /// Difference, rounded to the context budget.
    pub fn sub(&self, other: &Decimal, ctx: &PrecisionContext) -> Decimal {
        self.add(&other.neg(), ctx)
    }

    /// Product, rounded to the context budget.
    pub fn mul(&self, other: &Decimal, ctx: &PrecisionContext) -> Decimal {
        Self::rounded(
            &self.mantissa * &other.mantissa,
            self.exponent + other.exponent,
            ctx,
        )
    }

    /// Integer power by squaring, rounding after each multiplication.
    ///
    /// `powi(0)` is one for every base, including zero.
    pub fn powi(&self, exp: u64, ctx: &PrecisionContext) -> Decimal {
        let mut result = Decimal::one();
        let mut base = self.clone();
        let mut remaining = exp;
        while remaining > 0 {
            if remaining & 1 == 1 {
                result = result.mul(&base, ctx);
            }
            remaining >>= 1;
            if remaining > 0 {
                base = base.mul(&base, ctx);
            }
        }
        result
    }

    /// Quotient, correctly rounded to the context budget.
    pub fn div(&self, other: &Decimal, ctx: &PrecisionContext) -> Result<Decimal> {
        if other.is_zero() {
            return Err(Error::DivisionByZero);
        }
        if self.is_zero() {
            return Ok(Self::zero());
        }
        let negative = self.is_negative() != other.is_negative();
        let (quotient, delta) = round_magnitude_scaled(
            &self.mantissa.abs(),
            &other.mantissa.abs(),
            ctx.decimal_digits(),
        );
        let mantissa = if negative { -quotient } else { quotient };
        Ok(Self::normalize(
            mantissa,
            self.exponent - other.exponent + delta,
        ))
    }

    pub fn neg(&self) -> Decimal {
        Decimal {
            mantissa: -&self.mantissa,
            exponent: self.exponent,
        }
    }

    pub fn abs(&self) -> Decimal {
        Decimal {
            mantissa: self.mantissa.abs(),
            exponent: self.exponent,
        }
    }

    /// Re-rounds to an explicit digit budget (presentation use).
    pub fn round_to_digits(&self, digits: u32) -> Decimal {
        Self::rounded_with(self.mantissa.clone(), self.exponent, digits.max(1))
    }

    // =========================================================================
    // Conversion out
    // =========================================================================

    /// Nearest `f64`, refusing to lose a nonzero value.
    ///
    /// # Returns
    ///
    /// The correctly rounded double, [`Error::ConversionUnderflow`] when a
    /// nonzero value would round to zero (indistinguishable from exact
    /// zero), or [`Error::ConversionOverflow`] beyond double range.
    pub fn to_f64(&self) -> Result<f64> {
        if self.is_zero() {
            return Ok(0.0);
        }
        let value = self.to_f64_lossy();
        if value == 0.0 {
            Err(Error::ConversionUnderflow {
                value: self.to_scientific(12),
            })
        } else if value.is_infinite() {
            Err(Error::ConversionOverflow {
                value: self.to_scientific(12),
            })
        } else {
            Ok(value)
        }
    }

    /// Nearest `f64` for display-only use; underflows to zero and overflows
    /// to infinity without complaint.
    pub fn to_f64_lossy(&self) -> f64 {
        // one correctly rounded step through the platform parser
        self.to_string().parse::<f64>().unwrap_or(f64::NAN)
    }

    /// Smallest integer not below the value, exactly.
    pub fn to_integer_ceil(&self) -> BigInt {
        if self.exponent >= 0 {
            &self.mantissa * pow10(self.exponent as u64)
        } else {
            self.mantissa.div_ceil(&pow10(self.exponent.unsigned_abs()))
        }
    }

    /// Decomposes into `(mantissa, exponent)` with
    /// `value = mantissa × 10^exponent`.
    pub fn into_parts(self) -> (BigInt, i64) {
        (self.mantissa, self.exponent)
    }

    /// Scientific notation rounded to `sig_digits` significant digits.
    pub fn to_scientific(&self, sig_digits: u32) -> String {
        self.round_to_digits(sig_digits).to_string()
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            return write!(f, "0");
        }
        let sign = if self.is_negative() { "-" } else { "" };
        let digits = self.mantissa.magnitude().to_string();
        let sci_exp = self.exponent + digits.len() as i64 - 1;
        if digits.len() == 1 {
            write!(f, "{sign}{digits}e{sci_exp}")
        } else {
            write!(f, "{sign}{}.{}e{sci_exp}", &digits[..1], &digits[1..])
        }
    }
}

impl FromStr for Decimal {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

// Serialized as its scientific string, which round-trips losslessly; JSON
// numbers would truncate a 100-digit mantissa.
impl Serialize for Decimal {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Decimal {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Decimal::parse(&raw).map_err(serde::de::Error::custom)
    }
}

impl PartialOrd for Decimal {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Decimal {
    fn cmp(&self, other: &Self) -> Ordering {
        let self_sign = self.mantissa.sign();
        let other_sign = other.mantissa.sign();
        if self_sign != other_sign {
            return self_sign.cmp(&other_sign);
        }
        if self.is_zero() {
            return Ordering::Equal;
        }
        // same nonzero sign: magnitude class decides without alignment
        let lead_order = self.lead().cmp(&other.lead());
        if lead_order != Ordering::Equal {
            return if self.is_negative() {
                lead_order.reverse()
            } else {
                lead_order
            };
        }
        let min_exp = self.exponent.min(other.exponent);
        let a = &self.mantissa * pow10((self.exponent - min_exp) as u64);
        let b = &other.mantissa * pow10((other.exponent - min_exp) as u64);
        a.cmp(&b)
    }
}

// =============================================================================
// Tests
// =============================================================================
