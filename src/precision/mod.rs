//! Precision Arithmetic Substrate
//!
//! Every probability in this crate flows through this module. Device-level
//! reliability figures routinely sit below 1e-50 (non-detectable-error rates
//! reach 1e-54 in the reference regime), where `f64` either underflows to
//! zero or loses every significant digit inside binomial-tail sums. The
//! substrate provides decimal floating-point values with an explicitly
//! configured significant-digit budget, so those quantities stay exact enough
//! to compare, rank, and render.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                 Precision Arithmetic Substrate              │
//! ├─────────────────────────────────────────────────────────────┤
//! │                                                             │
//! │  ┌────────────────┐   ┌────────────┐   ┌────────────────┐   │
//! │  │ PrecisionContext│  │  Decimal   │   │  Probability   │   │
//! │  │ (digit budget,  │──│ (BigInt ·  │──►│ (Decimal in    │   │
//! │  │  binomial       │  │  10^exp)   │   │  [0, 1])       │   │
//! │  │  envelope)      │  └────────────┘   └────────────────┘   │
//! │  └────────────────┘                                         │
//! │                                                             │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Components
//!
//! - **PrecisionContext** (`context.rs`): immutable configuration threaded
//!   into every arithmetic call. Holds the significant-digit budget (at
//!   least 100) and the supported binomial-expansion envelope.
//!
//! - **Decimal** (`decimal.rs`): sign-magnitude decimal floating point,
//!   `mantissa × 10^exponent` with an arbitrary-precision integer mantissa.
//!   Every arithmetic operation rounds half-even to the configured digit
//!   budget. Values parsed from decimal literals or converted from `f64`
//!   are held exactly.
//!
//! - **Probability** (`probability.rs`): a `Decimal` constrained to [0, 1].
//!   Construction outside the range is a domain error, never a clamp.
//!
//! # Numeric envelope
//!
//! With a budget of D significant digits, summing up to n+1 nonnegative
//! terms costs at most ~log10(n) + 1 digits of drift, and a complement
//! `1 − x` for x near 1 loses the leading-zero run of the difference. The
//! default D = 100 supports the crate's full operating range (codeword
//! lengths in the low thousands, probabilities down to ~1e-80 after
//! complements) with at least 90 trustworthy digits. Computations that
//! would leave the envelope fail with [`crate::Error::PrecisionExhausted`]
//! rather than degrade silently.

pub mod context;
pub mod decimal;
pub mod probability;

pub use context::{
    PrecisionContext, DEFAULT_DECIMAL_DIGITS, DEFAULT_MAX_BINOMIAL_N, MIN_DECIMAL_DIGITS,
};
pub use decimal::Decimal;
pub use probability::Probability;
