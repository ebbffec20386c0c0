//! Complete replication: n full copies, any one serves the read.

use crate::combinatorics::cache_line_to_block_failure;
use crate::geometry::BlockGeometry;
use crate::precision::{Decimal, PrecisionContext, Probability};

/// All `replicas` independent copies must fail for the block to be lost.
pub(super) fn data_unavailability(
    replicas: u64,
    geometry: &BlockGeometry,
    p_line: &Probability,
    ctx: &PrecisionContext,
) -> Probability {
    cache_line_to_block_failure(geometry, p_line, ctx).powi(replicas, ctx)
}

/// Expected sequential retries across replicas before a copy survives,
/// minus the one baseline read:
///
/// `-1 + Σ_{i=0}^{n-1} p^i · (1-p) · (i+1)`
///
/// Ranges over `[-1, n-1]`; the `-1` floor is reached only in the
/// degenerate all-copies-always-fail case.
pub(super) fn performance_overhead(
    replicas: u64,
    geometry: &BlockGeometry,
    p_line: &Probability,
    ctx: &PrecisionContext,
) -> f64 {
    let pb = cache_line_to_block_failure(geometry, p_line, ctx);
    let survives = pb.complement(ctx);
    let mut sum = Decimal::zero();
    for attempt in 0..replicas {
        let term = pb
            .value()
            .powi(attempt, ctx)
            .mul(survives.value(), ctx)
            .mul(&Decimal::from_u64(attempt + 1), ctx);
        sum = sum.add(&term, ctx);
    }
    sum.sub(&Decimal::one(), ctx).to_f64_lossy()
}

// =============================================================================
// Tests
// =============================================================================
