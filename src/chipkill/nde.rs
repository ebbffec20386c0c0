//! Non-detectable (silent) error probabilities.
//!
//! A codeword with more than `t` bad bits usually raises a detected
//! failure, but some error patterns land within distance `t` of a
//! different valid codeword and get "corrected" into it: corruption the
//! code neither fixes nor reports. [`miscorrection_weight`] scores a given
//! total error count `w` by summing, over excess-error counts `s` and
//! bit-position overlaps `j`, how many of the `C(n, w)` patterns alias
//! this way; [`non_detectable_error_probability`] folds those weights into
//! the binomial error distribution.
//!
//! The weight terms all share the denominator `(n+1)^t · C(n, w)`, so the
//! numerator is accumulated as an exact big integer and divided once. That
//! keeps the sum free of intermediate rounding and makes results in the
//! 1e-50 range trustworthy to the context's digit budget.

use num::bigint::BigInt;
use num::traits::{Pow, ToPrimitive, Zero};
use tracing::debug;

use crate::combinatorics::{binomial, binomial_row};
use crate::error::{Error, Result};
use crate::precision::{Decimal, PrecisionContext, Probability};

/// Number of aliasing error patterns at total error count `w`, summed over
/// excess errors `s ∈ [0, t]` and overlaps `j ∈ [w-s, w+s]`, as an exact
/// integer. The caller divides by `(n+1)^t · C(n, w)`.
fn miscorrection_numerator(n: u64, w: u64, t: u64, row: &[BigInt]) -> BigInt {
    let mut numer = BigInt::zero();
    for s in 0..=t {
        for j in (w - s)..=(w + s) {
            let flips_outside = binomial(n - j, (s + w - j).div_ceil(2));
            let flips_inside = binomial(j, (s + j - w).div_ceil(2));
            numer += &row[j as usize] * flips_outside * flips_inside;
        }
    }
    numer
}

fn check_error_count_band(n: u64, w: u64, t: u64) -> Result<()> {
    let below = w < t.saturating_add(1);
    let above = w.checked_add(t).map_or(true, |top| top > n);
    if below || above {
        return Err(Error::ErrorCountOutOfBand { n, w, t });
    }
    Ok(())
}

fn weight_from_row(
    n: u64,
    w: u64,
    t: u64,
    row: &[BigInt],
    ctx: &PrecisionContext,
) -> Result<Decimal> {
    let numer = miscorrection_numerator(n, w, t, row);
    let denom = Pow::pow(BigInt::from(n + 1), t) * &row[w as usize];
    Decimal::from_bigint(numer).div(&Decimal::from_bigint(denom), ctx)
}

/// Relative weight of miscorrection at exactly `w` total bad bits in an
/// `(n, t)` code.
///
/// Defined on the band `t+1 <= w <= n-t` where both a detected failure and
/// an aliased codeword are possible. Not itself a probability: small
/// codes weight some counts above one.
///
/// # Returns
///
/// The weight, [`Error::ErrorCountOutOfBand`] outside the band, or
/// [`Error::PrecisionExhausted`] beyond the binomial envelope.
pub fn miscorrection_weight(
    n: u64,
    w: u64,
    t: u64,
    ctx: &PrecisionContext,
) -> Result<Decimal> {
    ctx.check_binomial_envelope(n)?;
    check_error_count_band(n, w, t)?;
    let row = binomial_row(n);
    weight_from_row(n, w, t, &row, ctx)
}

/// Probability of a silent (non-detectable) error in an `(n, t)` code at
/// raw bit-error rate `rber`: the miscorrection weight folded into the
/// binomial distribution of error counts over `w ∈ (t, n-t]`.
///
/// Codes too short to have a miscorrection band (`n < 2t+1`) cannot alias
/// and return exactly zero.
pub fn non_detectable_error_probability(
    n: u64,
    t: u64,
    rber: &Probability,
    ctx: &PrecisionContext,
) -> Result<Probability> {
    ctx.check_binomial_envelope(n)?;
    if t >= n || n - t < t + 1 {
        return Ok(Probability::zero());
    }
    let row = binomial_row(n);
    let survives = rber.complement(ctx);
    let mut sum = Decimal::zero();
    let mut terms = 0u64;
    for w in (t + 1)..=(n - t) {
        // C(n, w) cancels between the weight denominator and the pmf
        let term = Decimal::from_bigint(miscorrection_numerator(n, w, t, &row))
            .mul(&rber.value().powi(w, ctx), ctx)
            .mul(&survives.value().powi(n - w, ctx), ctx);
        sum = sum.add(&term, ctx);
        terms += 1;
    }
    let shared_denominator = Decimal::from_bigint(Pow::pow(BigInt::from(n + 1), t));
    let total = sum.div(&shared_denominator, ctx)?;
    debug!(n, t, terms, "folded miscorrection weights over the error-count band");
    Probability::from_accumulated(total, terms.max(1), ctx)
}

/// Silent-corruption estimate for the symbol-level outer code: 72 8-bit
/// symbols (64 data + 8 parity) correcting 2 symbol errors. Multiplies the
/// probability that exactly 7 symbols go bad by the fraction of such
/// patterns that alias into a valid codeword.
///
/// Plain double precision suffices here; the result sits far above the
/// f64 underflow range for any plausible rber.
pub fn symbol_miscorrection_probability(rber: f64) -> Result<f64> {
    if !rber.is_finite() {
        return Err(Error::NonFiniteValue { value: rber });
    }
    if !(0.0..=1.0).contains(&rber) {
        return Err(Error::ProbabilityOutOfRange {
            value: rber.to_string(),
        });
    }
    const DATA_SYMBOLS: u64 = 64;
    const PARITY_SYMBOLS: u64 = 8;
    const CORRECTABLE_SYMBOLS: u64 = 2;
    const SYMBOL_BITS: i32 = 8;

    let total = DATA_SYMBOLS + PARITY_SYMBOLS;
    let fatal = PARITY_SYMBOLS + 1 - CORRECTABLE_SYMBOLS;

    let symbol_ok = (1.0 - rber).powi(SYMBOL_BITS);
    let symbol_bad = 1.0 - symbol_ok;
    let bad_pattern = binomial(total, fatal).to_f64().unwrap_or(f64::INFINITY)
        * symbol_bad.powi(fatal as i32)
        * symbol_ok.powi((total - fatal) as i32);
    let aliasing = binomial(total, CORRECTABLE_SYMBOLS)
        .to_f64()
        .unwrap_or(f64::INFINITY)
        * 2f64.powi(
            SYMBOL_BITS * (CORRECTABLE_SYMBOLS + DATA_SYMBOLS) as i32
                - SYMBOL_BITS * total as i32,
        );
    Ok(bad_pattern * aliasing)
}

// =============================================================================
// Tests
// =============================================================================
