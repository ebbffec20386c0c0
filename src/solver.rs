//! Storage-overhead accounting and the minimal-overhead search.
//!
//! Overhead here is the storage a code configuration costs on top of the
//! payload: the redundant bits `r = n - k` plus a fixed bookkeeping tax of
//! one byte per eight payload bytes, expressed as a percentage. The search
//! walks correction capabilities from zero upward, prices each candidate
//! code, evaluates the end-to-end unavailability it yields under the
//! chosen redundancy scheme, and stops at the first (hence cheapest)
//! configuration that drives unavailability strictly below the target.
//!
//! Stronger correction always costs more storage, but nothing here assumes
//! unavailability falls monotonically with `t`; every capability up to the
//! bound is evaluated in order and judged on its own.

use std::fmt;

use num::bigint::BigInt;
use num::traits::{Pow, ToPrimitive, Zero};
use num::Integer;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::chipkill::{chipkill_failure_probability, CodeParameters};
use crate::error::{Error, Result};
use crate::geometry::BlockGeometry;
use crate::precision::{Decimal, PrecisionContext, Probability};
use crate::scheme::RedundancyScheme;

/// Exclusive upper bound on the correction capabilities the search
/// examines: candidates are `t ∈ [0, 40)`.
pub const CORRECTION_SEARCH_LIMIT: u64 = 40;

/// Storage overhead of an `(n, k)` code as a percentage of payload:
/// `(r/k + (1 + r/k)/8) · 100` with `r = n - k`.
///
/// The first term is the redundant-bit cost; the second charges one
/// bookkeeping byte per eight payload bytes on the whole codeword, so the
/// floor is 12.5% even at `n = k`.
pub fn storage_overhead_percent(n: u64, k: u64) -> Result<f64> {
    if k < 1 {
        return Err(Error::InvalidDataWordLength { k });
    }
    if n < k {
        return Err(Error::InvalidCodeParameters { n, k });
    }
    let ratio = (n - k) as f64 / k as f64;
    Ok((ratio + (1.0 + ratio) / 8.0) * 100.0)
}

/// Inverse of [`storage_overhead_percent`]: the smallest codeword length
/// `n >= k` whose overhead reaches `overhead_percent`.
///
/// At equality `100·v = (900·r + 100·k) / (8·k)`, so the redundant-bit
/// count is `r = ceil((8·k·v - 100·k) / 900)`, clamped at zero. The
/// ceiling is taken in exact integer arithmetic on the double's decimal
/// expansion; evaluating it in floating point can land on the wrong side
/// of an integer boundary and misprice the code by one whole unit of `t`.
///
/// # Returns
///
/// The codeword length, [`Error::InvalidOverheadTarget`] for a
/// non-finite or negative percentage (or one so large `n` leaves `u64`),
/// or [`Error::InvalidDataWordLength`] for `k = 0`.
pub fn code_length_for_overhead(overhead_percent: f64, k: u64) -> Result<u64> {
    if k < 1 {
        return Err(Error::InvalidDataWordLength { k });
    }
    if !overhead_percent.is_finite() || overhead_percent < 0.0 {
        return Err(Error::InvalidOverheadTarget {
            value: overhead_percent,
        });
    }
    let (mantissa, exponent) = Decimal::from_f64(overhead_percent)?.into_parts();
    let eight_k = BigInt::from(k) * 8u32;
    let hundred_k = BigInt::from(k) * 100u32;
    let (numerator, denominator) = if exponent >= 0 {
        let scaled = mantissa * Pow::pow(BigInt::from(10u32), exponent as u64);
        (eight_k * scaled - hundred_k, BigInt::from(900u32))
    } else {
        let scale = Pow::pow(BigInt::from(10u32), exponent.unsigned_abs());
        (
            eight_k * mantissa - hundred_k * &scale,
            BigInt::from(900u32) * scale,
        )
    };
    let redundant = numerator.div_ceil(&denominator).max(BigInt::zero());
    (BigInt::from(k) + redundant)
        .to_u64()
        .ok_or(Error::InvalidOverheadTarget {
            value: overhead_percent,
        })
}

// =============================================================================
// Search outcome
// =============================================================================

/// A code configuration found by the search, with its price and the
/// unavailability it achieves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverheadSolution {
    code: CodeParameters,
    storage_overhead_percent: f64,
    due_probability: Probability,
}

impl OverheadSolution {
    /// The selected code parameters.
    pub fn code(&self) -> &CodeParameters {
        &self.code
    }

    /// Storage overhead of the selected code, in percent.
    pub fn storage_overhead_percent(&self) -> f64 {
        self.storage_overhead_percent
    }

    /// End-to-end unavailability the selected code achieves.
    pub fn due_probability(&self) -> &Probability {
        &self.due_probability
    }
}

impl fmt::Display for OverheadSolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} at {}% storage overhead, DUE {}",
            self.code,
            self.storage_overhead_percent,
            self.due_probability.to_scientific(6)
        )
    }
}

/// Result of [`minimal_overhead_for_reliability_target`].
///
/// Exhaustion is an answer, not an error: the model evaluated every
/// candidate and none met the target. Callers decide whether that means
/// relaxing the target or changing the scheme.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "camelCase")]
pub enum SearchOutcome {
    /// The cheapest configuration meeting the target.
    #[serde(rename_all = "camelCase")]
    Converged { solution: OverheadSolution },

    /// No capability below `search_limit` met the target.
    #[serde(rename_all = "camelCase")]
    Exhausted { search_limit: u64 },
}

impl SearchOutcome {
    pub fn is_converged(&self) -> bool {
        matches!(self, Self::Converged { .. })
    }

    /// The solution, when the search converged.
    pub fn solution(&self) -> Option<&OverheadSolution> {
        match self {
            Self::Converged { solution } => Some(solution),
            Self::Exhausted { .. } => None,
        }
    }
}

impl fmt::Display for SearchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Converged { solution } => solution.fmt(f),
            Self::Exhausted { search_limit } => {
                write!(f, "no code with t < {search_limit} met the target")
            }
        }
    }
}

// =============================================================================
// Search
// =============================================================================

/// Finds the cheapest chipkill code driving block unavailability strictly
/// below `target_due` under the given redundancy scheme.
///
/// For each correction capability `t` from zero up to
/// [`CORRECTION_SEARCH_LIMIT`], sizes the minimal code over `k` data bits,
/// evaluates its composite failure probability at `rber`, propagates that
/// through the scheme on the given geometry, and returns the first
/// capability whose unavailability beats the target. Since codeword length
/// grows with `t`, the first hit is the minimal-overhead one.
///
/// # Arguments
///
/// * `k` - Data-word length in bits per codeword
/// * `rber` - Raw per-bit error rate of the underlying devices
/// * `scheme` - Redundancy scheme protecting the block
/// * `geometry` - Block and cache-line sizes of the protected read
/// * `target_due` - Unavailability the configuration must stay below
/// * `ctx` - Precision configuration for all intermediate arithmetic
#[instrument(
    skip(rber, scheme, geometry, target_due, ctx),
    fields(scheme = %scheme, target = %target_due.to_scientific(6))
)]
pub fn minimal_overhead_for_reliability_target(
    k: u64,
    rber: &Probability,
    scheme: &RedundancyScheme,
    geometry: &BlockGeometry,
    target_due: &Probability,
    ctx: &PrecisionContext,
) -> Result<SearchOutcome> {
    scheme.validate()?;
    for t in 0..CORRECTION_SEARCH_LIMIT {
        let code = CodeParameters::for_correction(k, t)?;
        let p_codeword = chipkill_failure_probability(&code, rber, ctx)?;
        let p_due = scheme.probability_of_data_unavailability(geometry, &p_codeword, ctx)?;
        let overhead = storage_overhead_percent(code.n(), k)?;
        debug!(
            t,
            n = code.n(),
            overhead_percent = overhead,
            p_codeword = %p_codeword.to_scientific(6),
            p_due = %p_due.to_scientific(6),
            "evaluated candidate correction capability"
        );
        if p_due < *target_due {
            info!(code = %code, overhead_percent = overhead, "reliability target met");
            return Ok(SearchOutcome::Converged {
                solution: OverheadSolution {
                    code,
                    storage_overhead_percent: overhead,
                    due_probability: p_due,
                },
            });
        }
    }
    info!(
        search_limit = CORRECTION_SEARCH_LIMIT,
        "no correction capability within the search bound met the target"
    );
    Ok(SearchOutcome::Exhausted {
        search_limit: CORRECTION_SEARCH_LIMIT,
    })
}

// =============================================================================
// Tests
// =============================================================================
