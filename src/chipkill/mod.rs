//! Chipkill Code Module
//!
//! This module models the BCH-style error-correcting codes that protect
//! individual memory devices, the inner layer beneath block-level
//! replication or erasure coding.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Chipkill Code Module                            │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                          │
//! │  ┌──────────────────┐   ┌──────────────────┐   ┌─────────────────────┐  │
//! │  │  Code Geometry   │   │  Silent Errors   │   │  Precomputed Table  │  │
//! │  │  & Failure Rates │   │  (miscorrection) │   │  (reference regime) │  │
//! │  └──────────────────┘   └──────────────────┘   └─────────────────────┘  │
//! │           │                      │                        │             │
//! │           └──────────────────────┴────────────────────────┘             │
//! │                                  │                                      │
//! │                    detected + undetected failure rates                  │
//! │                                                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Components
//!
//! - **Code Geometry & Failure Rates** (`code.rs`): sizes BCH codewords for
//!   a data-word length and correction capability, bounds the capability a
//!   parity budget can buy, and computes detected-failure probabilities:
//!   - Codeword length and maximum correctable bits
//!   - Hamming-bound code-rate ceiling
//!   - Per-codeword and per-chipkill-region failure probabilities
//!   - Uncorrectable bit-error rate
//!
//! - **Silent Errors** (`nde.rs`): miscorrection analysis, the error
//!   patterns a bounded-distance decoder maps onto the wrong codeword:
//!   - Per-error-count miscorrection weights
//!   - Exact non-detectable-error probability
//!   - Symbol-level outer-code silent-corruption estimate
//!
//! - **Precomputed Table** (`nde_table.rs`): non-detectable-error
//!   probabilities for the reference regime (2048 data bits at raw
//!   bit-error rate 2e-4), with strict and clamped accessors.

pub mod code;
pub mod nde;
pub mod nde_table;

pub use code::{
    chipkill_failure_probability, codeword_failure_probability, codeword_length, hamming_bound,
    max_correctable_bits, outer_code_factor, uncorrectable_bit_error_rate, CodeParameters,
    EvaluationMode,
};
pub use nde::{
    miscorrection_weight, non_detectable_error_probability, symbol_miscorrection_probability,
};
pub use nde_table::{
    non_detectable_error_from_table, non_detectable_error_from_table_clamped, TABLE_DATA_BITS,
    TABLE_MAX_CORRECTION, TABLE_RBER, TABLE_REVISION,
};
