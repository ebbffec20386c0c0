//! BCH parameter sizing and codeword failure probabilities.

use std::fmt;

use num::bigint::BigInt;
use num::traits::Zero;
use serde::{Deserialize, Serialize};

use crate::combinatorics::{binomial, binomial_tail, log2_bigint};
use crate::error::{Error, Result};
use crate::precision::{Decimal, PrecisionContext, Probability};

/// Empirical failure factor of the outer structural code layered on top of
/// the BCH inner code (0.018). A documented constant of the composite
/// scheme, not derived from first principles.
pub fn outer_code_factor() -> Decimal {
    Decimal::from_scaled(18, -3)
}

/// Minimal codeword length for a BCH-style code over `k` data bits
/// correcting `t` bad bits: `k + ceil(t · (log2(k) + 1))`.
///
/// A standard length approximation, not an exact BCH table lookup.
pub fn codeword_length(k: u64, t: u64) -> Result<u64> {
    if k < 1 {
        return Err(Error::InvalidDataWordLength { k });
    }
    let parity = (t as f64 * ((k as f64).log2() + 1.0)).ceil() as u64;
    Ok(k + parity)
}

/// Inverse of [`codeword_length`]: the largest `t` a code of length `n`
/// over `k` data bits can correct, `floor((n-k) / (log2(k) + 1))`.
pub fn max_correctable_bits(n: u64, k: u64) -> Result<u64> {
    if k < 1 {
        return Err(Error::InvalidDataWordLength { k });
    }
    if n < k {
        return Err(Error::InvalidCodeParameters { n, k });
    }
    Ok(((n - k) as f64 / ((k as f64).log2() + 1.0)).floor() as u64)
}

/// Hamming-style rate bound for a length-`n` code correcting `t` bits:
/// `1 - log2(Σ_{j=1}^{t} C(n,j)) / n`.
///
/// # Returns
///
/// The rate bound, or [`Error::HammingBoundUndefined`] for `n < 1` or
/// `t < 1` (the volume sum would be empty).
pub fn hamming_bound(n: u64, t: u64) -> Result<f64> {
    if n < 1 || t < 1 {
        return Err(Error::HammingBoundUndefined { n, t });
    }
    let mut volume = BigInt::zero();
    for j in 1..=t.min(n) {
        volume += binomial(n, j);
    }
    Ok(1.0 - log2_bigint(&volume) / n as f64)
}

// =============================================================================
// Code parameters
// =============================================================================

/// A validated `BCH(n, k, t)` parameter triple.
///
/// `n` is always the minimal codeword length for `(k, t)` per
/// [`codeword_length`]; the only way to construct one is
/// [`CodeParameters::for_correction`], and deserialization re-checks the
/// relationship, so a triple with an inconsistent length cannot circulate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawCodeParameters")]
pub struct CodeParameters {
    n: u64,
    k: u64,
    t: u64,
}

impl CodeParameters {
    /// Sizes a code over `k` data bits correcting `t` bad bits.
    pub fn for_correction(k: u64, t: u64) -> Result<Self> {
        let n = codeword_length(k, t)?;
        Ok(Self { n, k, t })
    }

    /// Codeword length in bits.
    pub fn n(&self) -> u64 {
        self.n
    }

    /// Data-word length in bits.
    pub fn k(&self) -> u64 {
        self.k
    }

    /// Maximum correctable bad bits per codeword.
    pub fn t(&self) -> u64 {
        self.t
    }

    /// Redundant bits carried per codeword.
    pub fn parity_bits(&self) -> u64 {
        self.n - self.k
    }
}

impl fmt::Display for CodeParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BCH(n={}, k={}, t={})", self.n, self.k, self.t)
    }
}

/// Mirror struct routing deserialization through validation.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCodeParameters {
    n: u64,
    k: u64,
    t: u64,
}

impl TryFrom<RawCodeParameters> for CodeParameters {
    type Error = Error;

    fn try_from(raw: RawCodeParameters) -> Result<Self> {
        let code = CodeParameters::for_correction(raw.k, raw.t)?;
        if code.n != raw.n {
            return Err(Error::InvalidCodeParameters { n: raw.n, k: raw.k });
        }
        Ok(code)
    }
}

// =============================================================================
// Failure probabilities
// =============================================================================

/// Which form of the codeword failure sum to evaluate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EvaluationMode {
    /// Keep only the `i = t+1` term of the tail. Valid when rber is small
    /// enough that `(1-rber)^(n-i)` is near one and higher-order terms are
    /// negligible; this is the fast default.
    Approximate,
    /// Full tail over `i ∈ (t, n]`. Use when rber is not small, or to
    /// audit the approximation.
    Exact,
}

/// Probability a codeword suffers more bad bits than it can correct.
///
/// # Arguments
///
/// * `n` - Codeword length in bits
/// * `t` - Correction capacity in bits; `t >= n` means every pattern is
///   correctable and the probability is exactly zero
/// * `rber` - Raw per-bit error rate
/// * `mode` - Approximate (single dominant term) or exact (full tail)
pub fn codeword_failure_probability(
    n: u64,
    t: u64,
    rber: &Probability,
    mode: EvaluationMode,
    ctx: &PrecisionContext,
) -> Result<Probability> {
    if t >= n {
        return Ok(Probability::zero());
    }
    match mode {
        EvaluationMode::Approximate => binomial_tail(n, rber, t + 1, t + 1, ctx),
        EvaluationMode::Exact => binomial_tail(n, rber, t + 1, n, ctx),
    }
}

/// Probability the composite chipkill scheme fails on one codeword:
/// the outer-code factor times the approximate BCH failure probability.
pub fn chipkill_failure_probability(
    code: &CodeParameters,
    rber: &Probability,
    ctx: &PrecisionContext,
) -> Result<Probability> {
    let inner = codeword_failure_probability(
        code.n(),
        code.t(),
        rber,
        EvaluationMode::Approximate,
        ctx,
    )?;
    Probability::new(outer_code_factor().mul(inner.value(), ctx))
}

/// Uncorrectable bit-error rate after code protection: the exact codeword
/// failure probability amortized per codeword bit.
pub fn uncorrectable_bit_error_rate(
    n: u64,
    t: u64,
    rber: &Probability,
    ctx: &PrecisionContext,
) -> Result<Probability> {
    let failure = codeword_failure_probability(n, t, rber, EvaluationMode::Exact, ctx)?;
    let per_bit = failure.value().div(&Decimal::from_u64(n), ctx)?;
    Probability::new(per_bit)
}

// =============================================================================
// Tests
// =============================================================================
