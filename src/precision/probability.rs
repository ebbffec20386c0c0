//! Probabilities as range-checked decimals.
//!
//! [`Probability`] wraps a [`Decimal`] known to lie in `[0, 1]`. The
//! checked constructors are the only way in; the arithmetic kept on the
//! type (complement, product, powers) is closed over the unit interval,
//! so results skip re-validation. Open-ended accumulation goes through
//! [`Probability::from_accumulated`], which distinguishes rounding drift
//! just above one from genuinely out-of-range sums.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Error, Result};
use crate::precision::context::PrecisionContext;
use crate::precision::decimal::Decimal;

/// A decimal probability in `[0, 1]`.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Probability(Decimal);

impl Probability {
    /// Certain failure impossible: exact zero.
    pub fn zero() -> Self {
        Probability(Decimal::zero())
    }

    /// Certainty: exact one.
    pub fn one() -> Self {
        Probability(Decimal::one())
    }

    /// Validates a decimal as a probability.
    ///
    /// # Returns
    ///
    /// The wrapped value, or [`Error::ProbabilityOutOfRange`] outside
    /// `[0, 1]`.
    pub fn new(value: Decimal) -> Result<Self> {
        if value.is_negative() || value > Decimal::one() {
            return Err(Error::ProbabilityOutOfRange {
                value: value.to_scientific(12),
            });
        }
        Ok(Probability(value))
    }

    /// Converts a double exactly (its full binary expansion) and validates
    /// the range.
    pub fn from_f64(value: f64) -> Result<Self> {
        Self::new(Decimal::from_f64(value)?)
    }

    /// Parses a decimal literal and validates the range.
    pub fn parse(input: &str) -> Result<Self> {
        Self::new(Decimal::parse(input)?)
    }

    /// Accepts the result of summing `terms` rounded probability terms.
    ///
    /// A sum that is mathematically at most one can land a few ulps above
    /// it after per-term rounding. Values within `terms × 10^(2-D)` of one
    /// (`D` the context digit budget) snap to one; anything further out is
    /// a real range violation and is rejected.
    pub(crate) fn from_accumulated(
        value: Decimal,
        terms: u64,
        ctx: &PrecisionContext,
    ) -> Result<Self> {
        if value <= Decimal::one() {
            return Self::new(value);
        }
        let tolerance = Decimal::from_u64(terms.max(1)).mul(
            &Decimal::from_scaled(1, 2 - i64::from(ctx.decimal_digits())),
            ctx,
        );
        let excess = value.sub(&Decimal::one(), ctx);
        if excess <= tolerance {
            Ok(Self::one())
        } else {
            Err(Error::ProbabilityOutOfRange {
                value: value.to_scientific(12),
            })
        }
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn is_one(&self) -> bool {
        self.0 == Decimal::one()
    }

    /// The underlying decimal.
    pub fn value(&self) -> &Decimal {
        &self.0
    }

    /// Unwraps into the underlying decimal.
    pub fn into_decimal(self) -> Decimal {
        self.0
    }

    /// `1 - p`; stays in range by construction.
    pub fn complement(&self, ctx: &PrecisionContext) -> Probability {
        Probability(Decimal::one().sub(&self.0, ctx))
    }

    /// Product of two probabilities.
    pub fn mul(&self, other: &Probability, ctx: &PrecisionContext) -> Probability {
        Probability(self.0.mul(&other.0, ctx))
    }

    /// `p^exp`, with `powi(0) = 1`.
    pub fn powi(&self, exp: u64, ctx: &PrecisionContext) -> Probability {
        Probability(self.0.powi(exp, ctx))
    }

    /// Nearest `f64`, erroring instead of silently flushing a small
    /// nonzero probability to zero.
    pub fn to_f64(&self) -> Result<f64> {
        self.0.to_f64()
    }

    /// Nearest `f64` for display-only use.
    pub fn to_f64_lossy(&self) -> f64 {
        self.0.to_f64_lossy()
    }

    /// Scientific notation rounded to `sig_digits` significant digits.
    pub fn to_scientific(&self, sig_digits: u32) -> String {
        self.0.to_scientific(sig_digits)
    }
}

impl fmt::Display for Probability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl Serialize for Probability {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

// Deserialization re-validates the range, so out-of-range values cannot
// arrive through persisted reports.
impl<'de> Deserialize<'de> for Probability {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = Decimal::deserialize(deserializer)?;
        Probability::new(value).map_err(serde::de::Error::custom)
    }
}

// =============================================================================
// Tests
// =============================================================================
