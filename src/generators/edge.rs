//! Pathological sequences that stress numeric guards in the engine under test

use std::fmt;
use std::str::FromStr;

use super::random_walk;
use crate::{rng::SeedStream, Bar, FixtureError, Price, Volatility};

/// Start price shared by the zero-range and gap families
const EDGE_START: f64 = 100.0;

/// O = H = L = C on every bar; the price drifts by `U(-0.5, 0.5)`.
///
/// Exercises divide-by-zero guards (zero body, zero range).
pub fn zero_range(rng: &mut SeedStream, n: usize) -> Vec<Bar> {
    let mut price = EDGE_START;
    (0..n)
        .map(|_| {
            price += rng.uniform(-0.5, 0.5);
            Bar::flat(price)
        })
        .collect()
}

/// Every open gaps 5-15% away from the previous close, in a random direction.
pub fn gaps(rng: &mut SeedStream, n: usize) -> Vec<Bar> {
    let mut price = EDGE_START;
    let mut bars = Vec::with_capacity(n);

    for _ in 0..n {
        let gap = rng.uniform(0.05, 0.15) * price * rng.sign();
        let open = price + gap;
        let close = open + rng.uniform(-2.0, 2.0);
        let high = open.max(close) + rng.uniform(0.0, 1.0);
        let low = open.min(close) - rng.uniform(0.0, 1.0);
        bars.push(Bar::new(open, high, low, close));
        price = close;
    }

    bars
}

/// Random walk around 1e6
pub fn extreme_high(rng: &mut SeedStream, n: usize) -> Vec<Bar> {
    random_walk(
        rng,
        n,
        Price::new_const(1_000_000.0),
        Volatility::new_const(50_000.0),
    )
}

/// Penny-stock prices around 0.05
pub fn extreme_low(rng: &mut SeedStream, n: usize) -> Vec<Bar> {
    random_walk(rng, n, Price::new_const(0.05), Volatility::new_const(0.005))
}

/// Bodies and shadows close to zero
pub fn micro_volatility(rng: &mut SeedStream, n: usize) -> Vec<Bar> {
    random_walk(rng, n, Price::new_const(100.0), Volatility::new_const(0.01))
}

// ============================================================
// EDGE CASE ARCHETYPES
// ============================================================

/// Named edge-case archetype, as exported in the `edge_cases` section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EdgeCase {
    ZeroRange,
    Gaps,
    ExtremeHigh,
    ExtremeLow,
    MicroVolatility,
}

impl EdgeCase {
    pub const ALL: [EdgeCase; 5] = [
        EdgeCase::ZeroRange,
        EdgeCase::Gaps,
        EdgeCase::ExtremeHigh,
        EdgeCase::ExtremeLow,
        EdgeCase::MicroVolatility,
    ];

    pub fn name(self) -> &'static str {
        match self {
            EdgeCase::ZeroRange => "zero_range",
            EdgeCase::Gaps => "gaps",
            EdgeCase::ExtremeHigh => "extreme_high",
            EdgeCase::ExtremeLow => "extreme_low",
            EdgeCase::MicroVolatility => "micro_volatility",
        }
    }

    /// Draws `n` bars from `rng`. Reseed first if the output must be reproducible.
    pub fn generate(self, rng: &mut SeedStream, n: usize) -> Vec<Bar> {
        match self {
            EdgeCase::ZeroRange => zero_range(rng, n),
            EdgeCase::Gaps => gaps(rng, n),
            EdgeCase::ExtremeHigh => extreme_high(rng, n),
            EdgeCase::ExtremeLow => extreme_low(rng, n),
            EdgeCase::MicroVolatility => micro_volatility(rng, n),
        }
    }
}

impl fmt::Display for EdgeCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EdgeCase {
    type Err = FixtureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EdgeCase::ALL
            .into_iter()
            .find(|c| c.name() == s)
            .ok_or_else(|| FixtureError::InvalidConfig(format!("unknown edge case: {s}")))
    }
}
