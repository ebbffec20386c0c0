//! Redundancy scheme abstraction.
//!
//! A closed variant over the two supported strategies:
//!
//! ```text
//!   ┌─────────────────────────┐    ┌──────────────────────────┐
//!   │   CompleteReplication   │    │       ErasureCoding      │
//!   │   n full copies, any    │    │   n fragments, any k     │
//!   │   one suffices          │    │   reconstruct the block  │
//!   └────────────┬────────────┘    └────────────┬─────────────┘
//!                └─────────────┬────────────────┘
//!                              ▼
//!              probability_of_data_unavailability
//!              relative_performance_overhead
//! ```
//!
//! Both variants answer the same two questions for a given geometry and
//! per-cache-line failure probability: how likely is the block to become
//! unavailable, and how many extra fragment reads does the scheme cost
//! relative to reading once.

mod erasure;
mod replication;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::geometry::BlockGeometry;
use crate::precision::{PrecisionContext, Probability};

/// A redundancy strategy protecting one data block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "scheme", rename_all = "camelCase")]
pub enum RedundancyScheme {
    /// `replicas` full copies; any single surviving copy serves the read.
    #[serde(rename_all = "camelCase")]
    CompleteReplication { replicas: u64 },

    /// `total_fragments` fragments of which any `data_fragments` suffice to
    /// reconstruct; tolerates `total - data` losses.
    #[serde(rename_all = "camelCase")]
    ErasureCoding {
        total_fragments: u64,
        data_fragments: u64,
    },
}

impl RedundancyScheme {
    /// Complete replication with `replicas >= 1` copies.
    pub fn replication(replicas: u64) -> Result<Self> {
        let scheme = Self::CompleteReplication { replicas };
        scheme.validate()?;
        Ok(scheme)
    }

    /// Erasure coding with `1 <= data_fragments <= total_fragments`.
    pub fn erasure(total_fragments: u64, data_fragments: u64) -> Result<Self> {
        let scheme = Self::ErasureCoding {
            total_fragments,
            data_fragments,
        };
        scheme.validate()?;
        Ok(scheme)
    }

    /// Checks the variant's structural invariants.
    ///
    /// Schemes can be built directly as enum literals (and arrive that way
    /// from deserialization of externally produced sweeps), so every
    /// operation re-validates before computing.
    pub fn validate(&self) -> Result<()> {
        match *self {
            Self::CompleteReplication { replicas } => {
                if replicas < 1 {
                    return Err(Error::InvalidSchemeConfig(format!(
                        "complete replication requires at least one replica, got {replicas}"
                    )));
                }
            }
            Self::ErasureCoding {
                total_fragments,
                data_fragments,
            } => {
                if data_fragments < 1 || data_fragments > total_fragments {
                    return Err(Error::InvalidSchemeConfig(format!(
                        "erasure coding requires 1 <= k <= n, got n={total_fragments}, \
                         k={data_fragments}"
                    )));
                }
            }
        }
        Ok(())
    }

    /// Number of unit losses the scheme absorbs without data loss.
    pub fn fault_tolerance(&self) -> u64 {
        match *self {
            Self::CompleteReplication { replicas } => replicas.saturating_sub(1),
            Self::ErasureCoding {
                total_fragments,
                data_fragments,
            } => total_fragments.saturating_sub(data_fragments),
        }
    }

    /// Probability the block cannot be served (DUE), given independent
    /// per-cache-line failures at `p_line`.
    ///
    /// # Arguments
    ///
    /// * `geometry` - Block and cache-line sizes of the protected read
    /// * `p_line` - Per-cache-line failure probability
    /// * `ctx` - Precision configuration for all intermediate arithmetic
    pub fn probability_of_data_unavailability(
        &self,
        geometry: &BlockGeometry,
        p_line: &Probability,
        ctx: &PrecisionContext,
    ) -> Result<Probability> {
        self.validate()?;
        match *self {
            Self::CompleteReplication { replicas } => Ok(replication::data_unavailability(
                replicas, geometry, p_line, ctx,
            )),
            Self::ErasureCoding {
                total_fragments,
                data_fragments,
            } => erasure::data_unavailability(total_fragments, data_fragments, geometry, p_line, ctx),
        }
    }

    /// Expected extra fragment reads relative to a single unprotected read;
    /// zero means no overhead, and the value is never below minus one.
    ///
    /// An analytic retry expectation, not a queuing model.
    pub fn relative_performance_overhead(
        &self,
        geometry: &BlockGeometry,
        p_line: &Probability,
        ctx: &PrecisionContext,
    ) -> Result<f64> {
        self.validate()?;
        match *self {
            Self::CompleteReplication { replicas } => Ok(replication::performance_overhead(
                replicas, geometry, p_line, ctx,
            )),
            Self::ErasureCoding {
                total_fragments,
                data_fragments,
            } => erasure::performance_overhead(total_fragments, data_fragments, geometry, p_line, ctx),
        }
    }
}

impl fmt::Display for RedundancyScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::CompleteReplication { replicas } => {
                write!(f, "completeReplication(n={replicas})")
            }
            Self::ErasureCoding {
                total_fragments,
                data_fragments,
            } => write!(f, "erasureCoding(n={total_fragments}, k={data_fragments})"),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combinatorics::cache_line_to_block_failure;
    use assert_matches::assert_matches;

    fn ctx() -> PrecisionContext {
        PrecisionContext::default()
    }

    fn prob(s: &str) -> Probability {
        Probability::parse(s).expect("test literal")
    }

    #[test]
    fn test_constructors_validate() {
        assert!(RedundancyScheme::replication(3).is_ok());
        assert!(RedundancyScheme::erasure(6, 4).is_ok());
        assert_matches!(
            RedundancyScheme::replication(0),
            Err(Error::InvalidSchemeConfig(_))
        );
        assert_matches!(
            RedundancyScheme::erasure(4, 6),
            Err(Error::InvalidSchemeConfig(_))
        );
        assert_matches!(
            RedundancyScheme::erasure(4, 0),
            Err(Error::InvalidSchemeConfig(_))
        );
    }

    #[test]
    fn test_operations_reject_invalid_literals() {
        let c = ctx();
        let g = BlockGeometry::new(4096, 64).expect("valid geometry");
        let bad = RedundancyScheme::ErasureCoding {
            total_fragments: 2,
            data_fragments: 5,
        };
        assert_matches!(
            bad.probability_of_data_unavailability(&g, &prob("0.1"), &c),
            Err(Error::InvalidSchemeConfig(_))
        );
    }

    #[test]
    fn test_fault_tolerance() {
        assert_eq!(
            RedundancyScheme::replication(3).expect("valid").fault_tolerance(),
            2
        );
        assert_eq!(
            RedundancyScheme::erasure(6, 4).expect("valid").fault_tolerance(),
            2
        );
        assert_eq!(
            RedundancyScheme::erasure(4, 4).expect("valid").fault_tolerance(),
            0
        );
    }

    #[test]
    fn test_replication_equals_block_failure_power() {
        let c = ctx();
        let g = BlockGeometry::new(128, 64).expect("valid geometry");
        let p = prob("0.1");
        let pb = cache_line_to_block_failure(&g, &p, &c);
        for n in 1..=4 {
            let scheme = RedundancyScheme::replication(n).expect("valid");
            let due = scheme
                .probability_of_data_unavailability(&g, &p, &c)
                .expect("due");
            assert_eq!(due, pb.powi(n, &c));
        }
    }

    #[test]
    fn test_single_replica_is_plain_block_failure() {
        let c = ctx();
        let g = BlockGeometry::new(4096, 64).expect("valid geometry");
        let p = prob("0.003");
        let scheme = RedundancyScheme::replication(1).expect("valid");
        let due = scheme
            .probability_of_data_unavailability(&g, &p, &c)
            .expect("due");
        assert_eq!(due, cache_line_to_block_failure(&g, &p, &c));
    }

    #[test]
    fn test_zero_redundancy_erasure_matches_single_copy() {
        // with k = n every fragment is data and any loss is fatal, which is
        // exactly one unreplicated copy; on line-aligned fragments the two
        // computations agree digit for digit
        let c = ctx();
        let g = BlockGeometry::new(4096, 64).expect("valid geometry");
        let p = prob("0.1");
        let ec = RedundancyScheme::erasure(4, 4).expect("valid");
        let single = RedundancyScheme::replication(1).expect("valid");
        assert_eq!(
            ec.probability_of_data_unavailability(&g, &p, &c).expect("due"),
            single
                .probability_of_data_unavailability(&g, &p, &c)
                .expect("due")
        );
    }

    #[test]
    fn test_serde_tagged_representation() {
        let scheme = RedundancyScheme::erasure(6, 4).expect("valid");
        let json = serde_json::to_string(&scheme).expect("serialize");
        assert!(json.contains(r#""scheme":"erasureCoding""#));
        assert!(json.contains(r#""totalFragments":6"#));
        let back: RedundancyScheme = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, scheme);

        let rep = RedundancyScheme::replication(3).expect("valid");
        let json = serde_json::to_string(&rep).expect("serialize");
        assert!(json.contains(r#""scheme":"completeReplication""#));
    }

    #[test]
    fn test_display() {
        assert_eq!(
            RedundancyScheme::replication(3).expect("valid").to_string(),
            "completeReplication(n=3)"
        );
        assert_eq!(
            RedundancyScheme::erasure(6, 4).expect("valid").to_string(),
            "erasureCoding(n=6, k=4)"
        );
    }
}
