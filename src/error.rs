//! Error types for the reliability model

use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the reliability model
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    // =========================================================================
    // Domain Violations
    // =========================================================================
    /// Block geometry violates block >= cache line >= 1
    #[error(
        "Invalid block geometry: block size {block_size_bytes} B must be >= \
         cache line size {cache_line_size_bytes} B >= 1"
    )]
    InvalidGeometry {
        block_size_bytes: u64,
        cache_line_size_bytes: u64,
    },

    /// Code parameters violate n >= k >= 1
    #[error("Invalid code parameters: codeword length {n} must be >= data length {k} >= 1")]
    InvalidCodeParameters { n: u64, k: u64 },

    /// Data word length must be at least one bit
    #[error("Invalid data word length k={k}: must be >= 1")]
    InvalidDataWordLength { k: u64 },

    /// Redundancy scheme configuration is invalid
    #[error("Invalid redundancy scheme: {0}")]
    InvalidSchemeConfig(String),

    /// A probability value fell outside [0, 1]
    #[error("Probability out of range [0, 1]: {value}")]
    ProbabilityOutOfRange { value: String },

    /// A floating-point input was NaN or infinite
    #[error("Non-finite value where a finite number is required: {value}")]
    NonFiniteValue { value: f64 },

    /// Binomial tail range exceeds the number of trials
    #[error("Tail range [{lo}, {hi}] exceeds trial count n={n}")]
    InvalidTailRange { n: u64, lo: u64, hi: u64 },

    /// Miscorrection weight queried outside its defined error-count band
    #[error(
        "Miscorrection weight undefined for w={w}: requires t+1 <= w <= n-t \
         (n={n}, t={t})"
    )]
    ErrorCountOutOfBand { n: u64, w: u64, t: u64 },

    /// Hamming bound requires a positive length and at least one correctable bit
    #[error("Hamming bound undefined for n={n}, t={t}: requires n >= 1 and t >= 1")]
    HammingBoundUndefined { n: u64, t: u64 },

    /// Storage overhead target must be a finite, non-negative percentage
    #[error("Invalid storage overhead target {value}%: must be finite and >= 0")]
    InvalidOverheadTarget { value: f64 },

    // =========================================================================
    // Precision Errors
    // =========================================================================
    /// Requested precision is below the supported floor
    #[error("Precision of {digits} significant digits is below the supported minimum {min}")]
    InvalidPrecision { digits: u32, min: u32 },

    /// A decimal string could not be parsed
    #[error("Failed to parse decimal literal: {input:?}")]
    DecimalParse { input: String },

    /// Binomial expansion exceeds the configured envelope
    #[error(
        "Binomial expansion n={n} exceeds the configured limit {limit}; \
         refusing to compute with degraded precision"
    )]
    PrecisionExhausted { n: u64, limit: u64 },

    /// A nonzero value would round to zero in double precision
    #[error("Value {value} underflows f64; a zero result would be indistinguishable from exact zero")]
    ConversionUnderflow { value: String },

    /// A value exceeds the representable range of double precision
    #[error("Value {value} overflows f64")]
    ConversionOverflow { value: String },

    /// Division by zero in decimal arithmetic
    #[error("Division by zero")]
    DivisionByZero,

    // =========================================================================
    // Table Errors
    // =========================================================================
    /// Precomputed NDE table index outside its validity range
    #[error(
        "Non-detectable-error table has no entry for t={t}: valid range is \
         0..={max} (use the clamped lookup to accept the boundary approximation)"
    )]
    TableIndexOutOfRange { t: u64, max: u64 },
}
