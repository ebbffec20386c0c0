//! Precision configuration.
//!
//! The configuration is an explicit, immutable value threaded into every
//! arithmetic call rather than a process-wide mutable setting, so no later
//! caller can change the precision mid-computation and make results
//! incomparable.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Minimum supported significant-digit budget.
///
/// Below this, complement-style cancellations (`1 − x` with x near 1) in the
/// codeword-failure and non-detectable-error paths can silently destroy every
/// meaningful digit, so smaller budgets are rejected outright.
pub const MIN_DECIMAL_DIGITS: u32 = 100;

/// Default significant-digit budget.
pub const DEFAULT_DECIMAL_DIGITS: u32 = 100;

/// Default binomial-expansion envelope.
///
/// Covers every practical chipkill regime (data words up to 8 Kibit with
/// generous correction strength) while refusing expansions whose cost and
/// memory footprint grow quadratically with n.
pub const DEFAULT_MAX_BINOMIAL_N: u64 = 16_384;

/// Immutable numeric configuration for all probability arithmetic.
///
/// Construct once, pass by reference everywhere. Serializable so sweep
/// layers can persist the numeric configuration alongside their results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawPrecisionContext")]
pub struct PrecisionContext {
    decimal_digits: u32,
    max_binomial_n: u64,
}

impl PrecisionContext {
    /// Creates a context with the given significant-digit budget and
    /// binomial envelope.
    ///
    /// # Arguments
    ///
    /// * `decimal_digits` - Significant digits kept by every arithmetic
    ///   operation; must be at least [`MIN_DECIMAL_DIGITS`]
    /// * `max_binomial_n` - Largest supported n in `C(n, j)` expansions
    ///
    /// # Returns
    ///
    /// The validated context, or [`Error::InvalidPrecision`] when the digit
    /// budget is below the supported floor.
    pub fn new(decimal_digits: u32, max_binomial_n: u64) -> Result<Self> {
        if decimal_digits < MIN_DECIMAL_DIGITS {
            return Err(Error::InvalidPrecision {
                digits: decimal_digits,
                min: MIN_DECIMAL_DIGITS,
            });
        }
        Ok(Self {
            decimal_digits,
            max_binomial_n,
        })
    }

    /// Creates a context with the given digit budget and the default
    /// binomial envelope.
    pub fn with_digits(decimal_digits: u32) -> Result<Self> {
        Self::new(decimal_digits, DEFAULT_MAX_BINOMIAL_N)
    }

    /// Significant digits kept by every arithmetic operation.
    pub fn decimal_digits(&self) -> u32 {
        self.decimal_digits
    }

    /// Largest supported n in binomial expansions.
    pub fn max_binomial_n(&self) -> u64 {
        self.max_binomial_n
    }

    /// Checks that a binomial expansion of the given size stays within the
    /// configured envelope.
    pub fn check_binomial_envelope(&self, n: u64) -> Result<()> {
        if n > self.max_binomial_n {
            return Err(Error::PrecisionExhausted {
                n,
                limit: self.max_binomial_n,
            });
        }
        Ok(())
    }
}

impl Default for PrecisionContext {
    fn default() -> Self {
        Self {
            decimal_digits: DEFAULT_DECIMAL_DIGITS,
            max_binomial_n: DEFAULT_MAX_BINOMIAL_N,
        }
    }
}

/// Mirror struct routing deserialization through validation.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPrecisionContext {
    #[serde(default = "default_decimal_digits")]
    decimal_digits: u32,
    #[serde(default = "default_max_binomial_n")]
    max_binomial_n: u64,
}

fn default_decimal_digits() -> u32 {
    DEFAULT_DECIMAL_DIGITS
}

fn default_max_binomial_n() -> u64 {
    DEFAULT_MAX_BINOMIAL_N
}

impl TryFrom<RawPrecisionContext> for PrecisionContext {
    type Error = Error;

    fn try_from(raw: RawPrecisionContext) -> Result<Self> {
        Self::new(raw.decimal_digits, raw.max_binomial_n)
    }
}

// =============================================================================
// Tests
// =============================================================================
