//! Erasure coding: n fragments, any k reconstruct the block.

use crate::combinatorics::{binomial, binomial_tail, lines_failure_probability};
use crate::error::Result;
use crate::geometry::BlockGeometry;
use crate::precision::{Decimal, PrecisionContext, Probability};

/// Per-fragment failure probability for a block split into `data_fragments`
/// equal parts, each fragment seeing a proportionally smaller read.
fn fragment_failure(
    data_fragments: u64,
    geometry: &BlockGeometry,
    p_line: &Probability,
    ctx: &PrecisionContext,
) -> Probability {
    let lines = geometry.lines_per_fragment(data_fragments);
    lines_failure_probability(lines, p_line, ctx)
}

/// The block is lost when more than `n - k` fragments fail, leaving fewer
/// than `k` to reconstruct from.
pub(super) fn data_unavailability(
    total_fragments: u64,
    data_fragments: u64,
    geometry: &BlockGeometry,
    p_line: &Probability,
    ctx: &PrecisionContext,
) -> Result<Probability> {
    let p_fragment = fragment_failure(data_fragments, geometry, p_line, ctx);
    let tolerated = total_fragments - data_fragments;
    binomial_tail(total_fragments, &p_fragment, tolerated + 1, total_fragments, ctx)
}

/// Expected fragments read beyond the `k` baseline, over a negative-binomial
/// distribution of retries capped at the `m = n - k` spares:
///
/// `-k + Σ_{i=0}^{m} C(k+i-1, i) · p^i · (1-p)^k · (k+i)`
pub(super) fn performance_overhead(
    total_fragments: u64,
    data_fragments: u64,
    geometry: &BlockGeometry,
    p_line: &Probability,
    ctx: &PrecisionContext,
) -> Result<f64> {
    ctx.check_binomial_envelope(total_fragments)?;
    let p_fragment = fragment_failure(data_fragments, geometry, p_line, ctx);
    let all_data_survive = p_fragment.complement(ctx).powi(data_fragments, ctx);
    let spares = total_fragments - data_fragments;
    let mut sum = Decimal::zero();
    for extra in 0..=spares {
        let ways = binomial(data_fragments + extra - 1, extra);
        let term = Decimal::from_bigint(ways)
            .mul(&p_fragment.value().powi(extra, ctx), ctx)
            .mul(all_data_survive.value(), ctx)
            .mul(&Decimal::from_u64(data_fragments + extra), ctx);
        sum = sum.add(&term, ctx);
    }
    Ok(sum
        .sub(&Decimal::from_u64(data_fragments), ctx)
        .to_f64_lossy())
}

// =============================================================================
// Tests
// =============================================================================
