//! Combinatorial probability kernel.
//!
//! Exact big-integer binomial coefficients and the binomial-tail sum that
//! every higher layer leans on: "at least m of n redundant units failed"
//! and "more than t of n bits flipped" are both tails of the same
//! distribution. Coefficients are exact; tail terms are evaluated in
//! context-precision decimals so probabilities far below the double range
//! (1e-50 and smaller) keep their leading digits.

use num::bigint::BigInt;
use num::traits::{One, Signed, ToPrimitive, Zero};

use crate::error::{Error, Result};
use crate::geometry::BlockGeometry;
use crate::precision::{Decimal, PrecisionContext, Probability};

/// Exact binomial coefficient `C(n, k)`.
///
/// Returns zero when `k > n`, matching the combinatorial convention used
/// throughout the codeword and miscorrection sums.
pub fn binomial(n: u64, k: u64) -> BigInt {
    if k > n {
        return BigInt::zero();
    }
    let k = k.min(n - k);
    let mut result = BigInt::one();
    // each partial product C(n, i+1) is an integer, so the division is exact
    for i in 0..k {
        result = result * (n - i) / (i + 1);
    }
    result
}

/// Binomial tail `B(n, p, [lo, hi]) = Σ C(n,i) · p^i · (1-p)^(n-i)` over the
/// inclusive index range.
///
/// # Arguments
///
/// * `n` - Number of independent trials
/// * `p` - Per-trial failure probability
/// * `lo`, `hi` - Inclusive range of failure counts to sum; an inverted
///   range is the empty sum (zero)
///
/// # Returns
///
/// The summed probability, [`Error::InvalidTailRange`] when `hi > n`, or
/// [`Error::PrecisionExhausted`] when `n` falls outside the configured
/// binomial envelope.
pub fn binomial_tail(
    n: u64,
    p: &Probability,
    lo: u64,
    hi: u64,
    ctx: &PrecisionContext,
) -> Result<Probability> {
    ctx.check_binomial_envelope(n)?;
    if hi > n {
        return Err(Error::InvalidTailRange { n, lo, hi });
    }
    if lo > hi {
        return Ok(Probability::zero());
    }
    let q = p.complement(ctx);
    let mut sum = Decimal::zero();
    let mut coeff = binomial(n, lo);
    let mut i = lo;
    loop {
        let term = Decimal::from_bigint(coeff.clone())
            .mul(&p.value().powi(i, ctx), ctx)
            .mul(&q.value().powi(n - i, ctx), ctx);
        sum = sum.add(&term, ctx);
        if i == hi {
            break;
        }
        coeff = coeff * (n - i) / (i + 1);
        i += 1;
    }
    Probability::from_accumulated(sum, hi - lo + 1, ctx)
}

/// Full row `C(n, 0..=n)` of Pascal's triangle, exactly.
///
/// One multiplicative pass; cheaper than n+1 independent [`binomial`]
/// calls when a sum needs every coefficient.
pub(crate) fn binomial_row(n: u64) -> Vec<BigInt> {
    let mut row = Vec::with_capacity(n as usize + 1);
    row.push(BigInt::one());
    for j in 0..n {
        let next = &row[j as usize] * (n - j) / (j + 1);
        row.push(next);
    }
    row
}

/// Failure probability aggregated over `lines` independent cache lines:
/// `1 - (1 - p_line)^lines`.
pub(crate) fn lines_failure_probability(
    lines: u64,
    p_line: &Probability,
    ctx: &PrecisionContext,
) -> Probability {
    p_line.complement(ctx).powi(lines, ctx).complement(ctx)
}

/// Probability that reading a whole block fails, given a per-cache-line
/// failure probability: `1 - (1 - p_line)^ceil(block/line)`.
///
/// Independent line failures; the ceiling treats a partially filled final
/// cache line as a full one.
pub fn cache_line_to_block_failure(
    geometry: &BlockGeometry,
    p_line: &Probability,
    ctx: &PrecisionContext,
) -> Probability {
    lines_failure_probability(geometry.lines_per_block(), p_line, ctx)
}

/// `log2` of a positive big integer, accurate to double precision.
pub(crate) fn log2_bigint(value: &BigInt) -> f64 {
    debug_assert!(value.is_positive());
    let bits = value.bits();
    if bits <= 53 {
        return value.to_f64().unwrap_or(0.0).log2();
    }
    let shift = bits - 53;
    let top = value >> shift;
    top.to_f64().unwrap_or(0.0).log2() + shift as f64
}

// =============================================================================
// Tests
// =============================================================================
