//! Analytical reliability model for chipkill-protected rack-scale storage.
//!
//! Data blocks live on memory devices whose raw bit-error rate is tamed by
//! an inner BCH-style chipkill code, and the blocks themselves are
//! protected by an outer redundancy scheme, either complete replication or
//! erasure coding. This crate computes what that stack delivers: the
//! probability a block read fails outright (detected uncorrectable error),
//! the probability corruption slips through silently (non-detectable
//! error), and what the protection costs in storage and bandwidth.
//!
//! # Architecture
//!
//! ```text
//! raw bit errors (rber)
//!        │
//!        ▼
//! ┌──────────────────┐   per-codeword    ┌──────────────────┐
//! │  chipkill model  │──────────────────►│ redundancy scheme│
//! │  BCH(n, k, t) +  │  failure prob     │ replication / EC │
//! │  outer code      │                   │ over a geometry  │
//! └──────────────────┘                   └────────┬─────────┘
//!        ▲                                        │ block DUE
//!        │ candidate t                            ▼
//! ┌──────┴───────────────────────────────────────────────────┐
//! │ solver: minimal storage overhead meeting a DUE target    │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! The probabilities involved sit far below what `f64` can carry through a
//! binomial-tail sum (tabulated silent-error rates bottom out near 1e-54),
//! so every model quantity flows through the arbitrary-precision decimals
//! in [`precision`], with combinatorial terms kept as exact big integers
//! until the final division.
//!
//! # Modules
//!
//! - [`precision`] - Decimal arithmetic with a configured digit budget
//! - [`combinatorics`] - Exact binomial coefficients and tail sums
//! - [`geometry`] - Block and cache-line sizing
//! - [`scheme`] - Replication and erasure-coding unavailability models
//! - [`chipkill`] - Inner-code sizing, failure, and silent-error rates
//! - [`solver`] - Overhead accounting and the minimal-overhead search
//! - [`error`] - Error types

pub mod chipkill;
pub mod combinatorics;
pub mod error;
pub mod geometry;
pub mod precision;
pub mod scheme;
pub mod solver;

#[cfg(test)]
mod proptest;

// Re-export the types most callers touch
pub use chipkill::{CodeParameters, EvaluationMode};
pub use error::{Error, Result};
pub use geometry::BlockGeometry;
pub use precision::{Decimal, PrecisionContext, Probability};
pub use scheme::RedundancyScheme;
pub use solver::{
    minimal_overhead_for_reliability_target, OverheadSolution, SearchOutcome,
    CORRECTION_SEARCH_LIMIT,
};
