//! Deterministic bar-sequence generators
//!
//! # Archetypes
//!
//! - **Trend**: uptrend / downtrend / sideways. Pure functions of their inputs, no randomness.
//! - **Random walk**: uniform per-bar change, seeded through [`SeedStream`](crate::rng::SeedStream).
//! - **Edge cases**: zero-range, gapped opens, extreme magnitudes, micro volatility.
//!
//! Every generator upholds `high >= max(open, close)` and `low <= min(open, close)`.

pub mod edge;
pub mod random_walk;
pub mod trend;

pub use edge::*;
pub use random_walk::*;
pub use trend::*;
