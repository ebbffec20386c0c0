//! Property-Based Tests for the Reliability Model
//!
//! Uses proptest to verify structural identities of the combinatorial
//! kernel and ordering laws of the decimal substrate and the failure
//! models across wide input ranges.
//!
//! # Test Properties
//!
//! 1. **Decimal Substrate Laws**: display/parse round-trip, total ordering
//! 2. **Combinatorial Identities**: Pascal's rule, symmetry, tail bounds
//! 3. **Propagation Laws**: block failure dominates line failure
//! 4. **Scheme Ordering**: more redundancy never hurts availability
//! 5. **Code Model Ordering**: approximate vs exact tails, monotonicity
//!    in rber and correction capability
//! 6. **Solver Consistency**: overhead inversion, strictness, minimality,
//!    repeated evaluation

#![cfg(test)]

use std::cmp::Ordering;

use proptest::prelude::*;

use crate::chipkill::{
    chipkill_failure_probability, codeword_failure_probability, codeword_length,
    max_correctable_bits, CodeParameters, EvaluationMode,
};
use crate::combinatorics::{binomial, binomial_tail, cache_line_to_block_failure};
use crate::geometry::BlockGeometry;
use crate::precision::{Decimal, PrecisionContext, Probability};
use crate::scheme::RedundancyScheme;
use crate::solver::{
    code_length_for_overhead, minimal_overhead_for_reliability_target, storage_overhead_percent,
};

// =============================================================================
// Property Strategies
// =============================================================================

/// Strategy for decimals with short mantissas, whose pairwise sums stay
/// inside the digit budget and therefore compute exactly.
fn scaled_decimal_strategy() -> impl Strategy<Value = Decimal> {
    (any::<i64>(), -40i64..=40).prop_map(|(m, e)| Decimal::from_scaled(m, e))
}

/// Strategy for decimals spanning sign, scale, and mantissa width (binary
/// doubles expand to long exact mantissas).
fn decimal_strategy() -> impl Strategy<Value = Decimal> {
    prop_oneof![
        scaled_decimal_strategy(),
        (-1.0e12f64..=1.0e12).prop_map(|v| Decimal::from_f64(v).expect("finite doubles convert")),
    ]
}

/// Strategy for `(n, k)` with `1 <= k <= n`.
fn coefficient_strategy() -> impl Strategy<Value = (u64, u64)> {
    (1u64..=80).prop_flat_map(|n| (Just(n), 1..=n))
}

/// Strategy for `(n, lo, hi)` with `0 <= lo <= hi <= n`.
fn tail_bounds_strategy() -> impl Strategy<Value = (u64, u64, u64)> {
    (1u64..=96)
        .prop_flat_map(|n| (Just(n), 0..=n))
        .prop_flat_map(|(n, lo)| (Just(n), Just(lo), lo..=n))
}

/// Strategy for probabilities across the full unit interval.
fn unit_probability_strategy() -> impl Strategy<Value = Probability> {
    (0.0f64..=1.0).prop_map(|v| Probability::from_f64(v).expect("doubles in [0, 1] are valid"))
}

/// Strategy for probabilities bounded away from one, where the ordering
/// gaps under test stay far above rounding drift.
fn moderate_probability_strategy() -> impl Strategy<Value = Probability> {
    (0.0f64..=0.9).prop_map(|v| Probability::from_f64(v).expect("doubles in [0, 0.9] are valid"))
}

/// Strategy for exact one-digit probabilities `d/10`.
fn tenth_probability_strategy() -> impl Strategy<Value = Probability> {
    (0i64..=10)
        .prop_map(|d| Probability::new(Decimal::from_scaled(d, -1)).expect("tenths are in range"))
}

/// Strategy for small raw bit-error rates, inside the validity regime of
/// the single-term approximation.
fn small_rber_strategy() -> impl Strategy<Value = Probability> {
    (1u32..=9, -9i32..=-5).prop_map(|(mantissa, exp)| {
        Probability::parse(&format!("{mantissa}e{exp}")).expect("literal in range")
    })
}

/// Strategy for power-of-two data-word lengths, where codeword sizing and
/// overhead doubles are exact.
fn pow2_data_bits_strategy() -> impl Strategy<Value = u64> {
    (6u32..=11).prop_map(|shift| 1u64 << shift)
}

/// Strategy for valid geometries with line-aligned blocks.
fn aligned_geometry_strategy() -> impl Strategy<Value = BlockGeometry> {
    (1u64..=64, prop_oneof![Just(64u64), Just(128), Just(512)]).prop_map(|(lines, line_size)| {
        BlockGeometry::new(lines * line_size, line_size).expect("aligned geometry is valid")
    })
}

/// Strategy for erasure configurations `(total, data)` with
/// `data <= total <= data + 4`.
fn ec_config_strategy() -> impl Strategy<Value = (u64, u64)> {
    (1u64..=8).prop_flat_map(|data| (data..=data + 4, Just(data)))
}

/// Strategy for a pair of search-target exponents, loose first.
fn ordered_target_exponents_strategy() -> impl Strategy<Value = (i32, i32)> {
    (-25i32..=-5).prop_flat_map(|tight| (tight..=-5, Just(tight)))
}

// =============================================================================
// Decimal Substrate Properties
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Property: Rendering a decimal and parsing it back is the identity.
    #[test]
    fn prop_display_parse_round_trip(value in decimal_strategy()) {
        let rendered = value.to_string();
        let parsed = Decimal::parse(&rendered)?;
        prop_assert_eq!(parsed, value, "round-trip changed {}", rendered);
    }

    /// Property: The ordering is total, transitive, agrees with structural
    /// equality, and reverses under negation.
    #[test]
    fn prop_ordering_is_total_and_transitive(
        a in decimal_strategy(),
        b in decimal_strategy(),
        c in decimal_strategy(),
    ) {
        prop_assert!(a <= b || b <= a);
        if a <= b && b <= a {
            prop_assert_eq!(&a, &b);
        }
        if a <= b && b <= c {
            prop_assert!(a <= c);
        }
        prop_assert_eq!(a.cmp(&b) == Ordering::Equal, a == b);
        prop_assert_eq!(a <= b, b.neg() <= a.neg());
    }

    /// Property: Adding the same value to both sides preserves order (the
    /// short mantissas keep every sum exact).
    #[test]
    fn prop_addition_preserves_order(
        a in scaled_decimal_strategy(),
        b in scaled_decimal_strategy(),
        d in scaled_decimal_strategy(),
    ) {
        let c = PrecisionContext::default();
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(lo.add(&d, &c) <= hi.add(&d, &c));
    }
}

// =============================================================================
// Combinatorial Properties
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Property: Pascal's rule holds for exact coefficients.
    #[test]
    fn prop_binomial_pascal_rule((n, k) in coefficient_strategy()) {
        let lhs = binomial(n, k);
        let rhs = binomial(n - 1, k - 1) + binomial(n - 1, k);
        prop_assert_eq!(lhs, rhs, "Pascal's rule failed for n={}, k={}", n, k);
    }

    /// Property: Choosing k of n equals choosing the n-k left behind.
    #[test]
    fn prop_binomial_symmetry((n, k) in coefficient_strategy()) {
        prop_assert_eq!(binomial(n, k), binomial(n, n - k));
    }

    /// Property: A binomial tail is a probability, and widening its range
    /// never decreases it.
    #[test]
    fn prop_tail_widening_never_decreases(
        (n, lo, hi) in tail_bounds_strategy(),
        p in unit_probability_strategy(),
    ) {
        let c = PrecisionContext::default();
        let narrow = binomial_tail(n, &p, lo, hi, &c)?;
        let wide = binomial_tail(n, &p, lo, n, &c)?;
        prop_assert!(narrow <= wide, "tail shrank when widened: n={}, lo={}, hi={}", n, lo, hi);
        prop_assert!(wide <= Probability::one());
    }

    /// Property: Summing the whole distribution lands within drift of one.
    #[test]
    fn prop_tail_full_distribution_sums_to_one(
        n in 1u64..=96,
        p in unit_probability_strategy(),
    ) {
        let c = PrecisionContext::default();
        let total = binomial_tail(n, &p, 0, n, &c)?;
        let drift = Decimal::one().sub(total.value(), &c).abs();
        prop_assert!(
            drift <= Decimal::from_scaled(1, -90),
            "distribution sum drifted by {} at n={}", drift.to_scientific(6), n
        );
    }

    /// Property: A block fails no less often than any single line in it.
    #[test]
    fn prop_block_failure_dominates_line_failure(
        geometry in aligned_geometry_strategy(),
        p in unit_probability_strategy(),
    ) {
        let c = PrecisionContext::default();
        let pb = cache_line_to_block_failure(&geometry, &p, &c);
        prop_assert!(pb >= p);
        prop_assert!(pb <= Probability::one());
    }
}

// =============================================================================
// Scheme Ordering Properties
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    /// Property: Another replica never makes a block less available.
    #[test]
    fn prop_more_replicas_never_hurt(
        geometry in aligned_geometry_strategy(),
        p in moderate_probability_strategy(),
        replicas in 1u64..=6,
    ) {
        let c = PrecisionContext::default();
        let fewer = RedundancyScheme::replication(replicas)?;
        let more = RedundancyScheme::replication(replicas + 1)?;
        let due_fewer = fewer.probability_of_data_unavailability(&geometry, &p, &c)?;
        let due_more = more.probability_of_data_unavailability(&geometry, &p, &c)?;
        prop_assert!(due_more <= due_fewer, "replica {} hurt availability", replicas + 1);
    }

    /// Property: An extra parity fragment at the same data width never
    /// makes a block less available.
    #[test]
    fn prop_extra_parity_never_hurts(
        geometry in aligned_geometry_strategy(),
        p in moderate_probability_strategy(),
        (total, data) in ec_config_strategy(),
    ) {
        let c = PrecisionContext::default();
        let base = RedundancyScheme::erasure(total, data)?;
        let extended = RedundancyScheme::erasure(total + 1, data)?;
        let due_base = base.probability_of_data_unavailability(&geometry, &p, &c)?;
        let due_extended = extended.probability_of_data_unavailability(&geometry, &p, &c)?;
        prop_assert!(
            due_extended <= due_base,
            "parity fragment hurt availability at n={}, k={}", total, data
        );
    }

    /// Property: Requiring every fragment of an evenly divided block is
    /// exactly one unreplicated copy, digit for digit.
    #[test]
    fn prop_full_stripe_equals_single_copy(
        width in 1u64..=6,
        fragment_lines in 1u64..=10,
        p in tenth_probability_strategy(),
    ) {
        let c = PrecisionContext::default();
        let geometry = BlockGeometry::new(width * fragment_lines * 64, 64)?;
        let ec = RedundancyScheme::erasure(width, width)?;
        let single = RedundancyScheme::replication(1)?;
        let due_ec = ec.probability_of_data_unavailability(&geometry, &p, &c)?;
        let due_single = single.probability_of_data_unavailability(&geometry, &p, &c)?;
        prop_assert_eq!(due_ec, due_single);
    }
}

// =============================================================================
// Code Model Properties
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(30))]

    /// Property: Sizing a code then asking its capability returns t.
    #[test]
    fn prop_sizing_round_trip(
        k in pow2_data_bits_strategy(),
        t in 0u64..=40,
    ) {
        let n = codeword_length(k, t)?;
        prop_assert_eq!(max_correctable_bits(n, k)?, t);
    }

    /// Property: The single-term approximation never exceeds the full tail.
    #[test]
    fn prop_approximate_below_exact(
        k in pow2_data_bits_strategy(),
        t in 0u64..=5,
        rber in small_rber_strategy(),
    ) {
        let c = PrecisionContext::default();
        let n = codeword_length(k, t)?;
        let approx = codeword_failure_probability(n, t, &rber, EvaluationMode::Approximate, &c)?;
        let exact = codeword_failure_probability(n, t, &rber, EvaluationMode::Exact, &c)?;
        prop_assert!(approx <= exact);
    }

    /// Property: Composite failure grows with the raw bit-error rate.
    #[test]
    fn prop_failure_monotone_in_rber(
        k in pow2_data_bits_strategy(),
        t in 0u64..=5,
        a in small_rber_strategy(),
        b in small_rber_strategy(),
    ) {
        let c = PrecisionContext::default();
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        let code = CodeParameters::for_correction(k, t)?;
        let p_low = chipkill_failure_probability(&code, &low, &c)?;
        let p_high = chipkill_failure_probability(&code, &high, &c)?;
        prop_assert!(p_low <= p_high);
    }

    /// Property: One more bit of correction never raises composite failure
    /// in the small-rber regime, codeword growth included.
    #[test]
    fn prop_stronger_correction_never_raises_failure(
        k in pow2_data_bits_strategy(),
        t in 0u64..=5,
        rber in small_rber_strategy(),
    ) {
        let c = PrecisionContext::default();
        let weaker = CodeParameters::for_correction(k, t)?;
        let stronger = CodeParameters::for_correction(k, t + 1)?;
        let p_weaker = chipkill_failure_probability(&weaker, &rber, &c)?;
        let p_stronger = chipkill_failure_probability(&stronger, &rber, &c)?;
        prop_assert!(p_stronger <= p_weaker);
    }
}

// =============================================================================
// Solver Properties
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    /// Property: Storage overhead inverts exactly for power-of-two k.
    #[test]
    fn prop_overhead_inversion(
        k in pow2_data_bits_strategy(),
        redundant in 0u64..=480,
    ) {
        let n = k + redundant;
        let overhead = storage_overhead_percent(n, k)?;
        prop_assert_eq!(code_length_for_overhead(overhead, k)?, n);
    }

    /// Property: A converged search beats the target strictly, and the
    /// capability one step weaker misses it.
    #[test]
    fn prop_search_returns_first_sufficient_capability(
        target_exp in -25i32..=-8,
    ) {
        let c = PrecisionContext::default();
        let geometry = BlockGeometry::new(4096, 64)?;
        let scheme = RedundancyScheme::replication(3)?;
        let rber = Probability::from_f64(1e-4)?;
        let target = Probability::parse(&format!("1e{target_exp}"))?;
        let outcome =
            minimal_overhead_for_reliability_target(64, &rber, &scheme, &geometry, &target, &c)?;
        let solution = outcome.solution().expect("targets in this range converge");
        prop_assert!(solution.due_probability() < &target);

        let t = solution.code().t();
        if t > 0 {
            let weaker = CodeParameters::for_correction(64, t - 1)?;
            let p_weaker = chipkill_failure_probability(&weaker, &rber, &c)?;
            let due_weaker =
                scheme.probability_of_data_unavailability(&geometry, &p_weaker, &c)?;
            prop_assert!(due_weaker >= target, "search skipped a cheaper capability");
        }
    }

    /// Property: Tightening the target never lowers the overhead.
    #[test]
    fn prop_tighter_target_never_cheaper(
        (loose_exp, tight_exp) in ordered_target_exponents_strategy(),
    ) {
        let c = PrecisionContext::default();
        let geometry = BlockGeometry::new(4096, 64)?;
        let scheme = RedundancyScheme::replication(3)?;
        let rber = Probability::from_f64(1e-4)?;
        let loose = Probability::parse(&format!("1e{loose_exp}"))?;
        let tight = Probability::parse(&format!("1e{tight_exp}"))?;
        let loose_outcome =
            minimal_overhead_for_reliability_target(64, &rber, &scheme, &geometry, &loose, &c)?;
        let tight_outcome =
            minimal_overhead_for_reliability_target(64, &rber, &scheme, &geometry, &tight, &c)?;
        let loose_solution = loose_outcome.solution().expect("loose target converges");
        let tight_solution = tight_outcome.solution().expect("tight target converges");
        prop_assert!(
            loose_solution.storage_overhead_percent()
                <= tight_solution.storage_overhead_percent()
        );
    }

    /// Property: Re-evaluating with identical inputs reproduces the result
    /// structurally, digit for digit.
    #[test]
    fn prop_repeated_evaluation_is_identical(
        k in pow2_data_bits_strategy(),
        t in 0u64..=5,
        rber in small_rber_strategy(),
        target_exp in -25i32..=-8,
    ) {
        let c = PrecisionContext::default();
        let code = CodeParameters::for_correction(k, t)?;
        let first = chipkill_failure_probability(&code, &rber, &c)?;
        let second = chipkill_failure_probability(&code, &rber, &c)?;
        prop_assert_eq!(first, second);

        let geometry = BlockGeometry::new(4096, 64)?;
        let scheme = RedundancyScheme::replication(3)?;
        let target = Probability::parse(&format!("1e{target_exp}"))?;
        let once =
            minimal_overhead_for_reliability_target(64, &rber, &scheme, &geometry, &target, &c)?;
        let again =
            minimal_overhead_for_reliability_target(64, &rber, &scheme, &geometry, &target, &c)?;
        prop_assert_eq!(once, again);
    }
}
