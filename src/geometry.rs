//! Block and cache-line read geometry.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Physical read geometry: a data block striped across device cache lines.
///
/// The cache line is the unit that fails or survives as a whole; block-level
/// probabilities aggregate over the lines a read touches. Invariant:
/// `block_size_bytes >= cache_line_size_bytes >= 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawBlockGeometry")]
pub struct BlockGeometry {
    block_size_bytes: u64,
    cache_line_size_bytes: u64,
}

impl BlockGeometry {
    /// Validates and constructs a geometry.
    ///
    /// # Returns
    ///
    /// The geometry, or [`Error::InvalidGeometry`] unless
    /// `block_size_bytes >= cache_line_size_bytes >= 1`.
    pub fn new(block_size_bytes: u64, cache_line_size_bytes: u64) -> Result<Self> {
        if cache_line_size_bytes < 1 || block_size_bytes < cache_line_size_bytes {
            return Err(Error::InvalidGeometry {
                block_size_bytes,
                cache_line_size_bytes,
            });
        }
        Ok(Self {
            block_size_bytes,
            cache_line_size_bytes,
        })
    }

    pub fn block_size_bytes(&self) -> u64 {
        self.block_size_bytes
    }

    pub fn cache_line_size_bytes(&self) -> u64 {
        self.cache_line_size_bytes
    }

    /// Cache lines covering one block; a partially filled final line counts
    /// in full (conservative).
    pub fn lines_per_block(&self) -> u64 {
        self.block_size_bytes.div_ceil(self.cache_line_size_bytes)
    }

    /// Cache lines covering one erasure fragment when the block splits into
    /// `data_fragments` equal parts, again rounding partial lines up.
    pub fn lines_per_fragment(&self, data_fragments: u64) -> u64 {
        debug_assert!(data_fragments >= 1);
        let per_fragment_denominator =
            u128::from(data_fragments) * u128::from(self.cache_line_size_bytes);
        u128::from(self.block_size_bytes).div_ceil(per_fragment_denominator) as u64
    }
}

/// Mirror struct routing deserialization through validation.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawBlockGeometry {
    block_size_bytes: u64,
    cache_line_size_bytes: u64,
}

impl TryFrom<RawBlockGeometry> for BlockGeometry {
    type Error = Error;

    fn try_from(raw: RawBlockGeometry) -> Result<Self> {
        Self::new(raw.block_size_bytes, raw.cache_line_size_bytes)
    }
}

// =============================================================================
// Tests
// =============================================================================
