//! # YACPD Fixtures - TA-Lib reference corpus for YACPD
//!
//! Builds the deterministic fixture corpus that `yacpd`'s cross-validation suite
//! replays offline. Every verdict comes from an external oracle (TA-Lib behind a
//! process bridge); this crate only constructs bar sequences, asks the oracle,
//! and exports what it answered.
//!
//! ## Quick Start
//!
//! ```rust
//! use yacpd_fixtures::prelude::*;
//!
//! // Seeded generators are reproducible byte for byte
//! let mut rng = SeedStream::new(42);
//! let a = random_walk(&mut rng, 50, Price::new_const(100.0), Volatility::new_const(5.0));
//! rng.reseed(42);
//! let b = random_walk(&mut rng, 50, Price::new_const(100.0), Volatility::new_const(5.0));
//! assert_eq!(a, b);
//! assert!(a.iter().all(|bar| bar.is_well_formed()));
//!
//! // Any oracle can be injected; here a stub that never detects anything
//! let oracle = FnOracle::new(|_, series: &PriceSeries| Ok(vec![0; series.len()]));
//! let fixture = build_fixture(fixture_spec(PatternFunction::Doji), &oracle).unwrap();
//! assert_eq!(fixture.bars.len(), fixture.result.len());
//! assert!(fixture.detected_at.is_empty());
//! ```

pub mod config;
pub mod export;
pub mod fixtures;
pub mod generators;
pub mod logging;
pub mod oracle;
pub mod quotes;
pub mod rng;
pub mod validation;

pub mod prelude {
    pub use crate::{
        // Configuration
        config::Config,
        // Export
        export::{
            build_compact_corpus, build_enhanced_corpus, export_test_cases, CompactCorpus,
            EnhancedCorpus, FixtureOutcome, CORPUS_V1, CORPUS_V2,
        },
        // Fixtures
        fixtures::{build_all, build_fixture, fixture_spec, Fixture, FixtureSpec, FIXTURES},
        // Generators
        generators::{downtrend, random_walk, sideways, uptrend, EdgeCase},
        // Oracle
        oracle::{
            detected_indices, FnOracle, Oracle, OracleError, OracleStatus, PatternFunction,
            PriceSeries, ProcessOracle, Verdict,
        },
        // Quotes
        quotes::{QuoteError, QuoteProvider, QuoteSource, YahooQuotes},
        // Random stream
        rng::SeedStream,
        // Types
        Bar,
        // Errors
        FixtureError,
        OHLCVExt,
        Price,
        Result,
        Volatility,
        OHLCV,
    };
}

// ============================================================
// ERRORS
// ============================================================

pub type Result<T> = std::result::Result<T, FixtureError>;

/// Errors that can occur while building or exporting fixtures
#[derive(Debug, thiserror::Error)]
pub enum FixtureError {
    #[error("Invalid value: {0}")]
    InvalidValue(&'static str),

    #[error("{field} = {value} out of range [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Oracle(#[from] oracle::OracleError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

// ============================================================
// CONSTANTS
// ============================================================

/// Placebo volume attached to every synthetic bar
pub const DEFAULT_VOLUME: f64 = 1000.0;

/// Tolerance for near-equal price comparisons.
///
/// The oracle's own thresholds are opaque, so this only guards our side:
/// the geometric invariant check and hand-tuned "same price" fixtures.
pub const PRICE_EPSILON: f64 = 1e-9;

// ============================================================
// VALIDATED TYPES
// ============================================================

/// Random-walk volatility (finite, >= 0)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Volatility(f64);

impl Volatility {
    /// Create a new Volatility, validating the value is finite and non-negative
    pub fn new(value: f64) -> Result<Self> {
        if value.is_nan() || value.is_infinite() {
            return Err(FixtureError::InvalidValue(
                "Volatility cannot be NaN or infinite",
            ));
        }
        if value < 0.0 {
            return Err(FixtureError::OutOfRange {
                field: "Volatility",
                value,
                min: 0.0,
                max: f64::MAX,
            });
        }
        Ok(Self(value))
    }

    /// Create a Volatility from a compile-time constant (library internal use)
    #[doc(hidden)]
    pub const fn new_const(value: f64) -> Self {
        Self(value)
    }

    #[inline]
    pub fn get(self) -> f64 {
        self.0
    }
}

impl serde::Serialize for Volatility {
    fn serialize<S: serde::Serializer>(&self, s: S) -> std::result::Result<S::Ok, S::Error> {
        self.0.serialize(s)
    }
}

impl<'de> serde::Deserialize<'de> for Volatility {
    fn deserialize<D: serde::Deserializer<'de>>(d: D) -> std::result::Result<Self, D::Error> {
        let value = f64::deserialize(d)?;
        Volatility::new(value).map_err(serde::de::Error::custom)
    }
}

/// Starting price of a generated sequence (finite, > 0)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Price(f64);

impl Price {
    /// Create a new Price, validating the value is finite and positive
    pub fn new(value: f64) -> Result<Self> {
        if value.is_nan() || value.is_infinite() {
            return Err(FixtureError::InvalidValue("Price cannot be NaN or infinite"));
        }
        if value <= 0.0 {
            return Err(FixtureError::OutOfRange {
                field: "Price",
                value,
                min: f64::MIN_POSITIVE,
                max: f64::MAX,
            });
        }
        Ok(Self(value))
    }

    #[doc(hidden)]
    pub const fn new_const(value: f64) -> Self {
        Self(value)
    }

    #[inline]
    pub fn get(self) -> f64 {
        self.0
    }
}

impl serde::Serialize for Price {
    fn serialize<S: serde::Serializer>(&self, s: S) -> std::result::Result<S::Ok, S::Error> {
        self.0.serialize(s)
    }
}

impl<'de> serde::Deserialize<'de> for Price {
    fn deserialize<D: serde::Deserializer<'de>>(d: D) -> std::result::Result<Self, D::Error> {
        let value = f64::deserialize(d)?;
        Price::new(value).map_err(serde::de::Error::custom)
    }
}

// ============================================================
// OHLCV TRAITS
// ============================================================

/// Core OHLCV data trait
pub trait OHLCV {
    fn open(&self) -> f64;
    fn high(&self) -> f64;
    fn low(&self) -> f64;
    fn close(&self) -> f64;
    fn volume(&self) -> f64;
}

/// Extension trait with computed properties for OHLCV data
pub trait OHLCVExt: OHLCV {
    #[inline]
    fn body(&self) -> f64 {
        (self.close() - self.open()).abs()
    }

    #[inline]
    fn range(&self) -> f64 {
        self.high() - self.low()
    }

    #[inline]
    fn upper_shadow(&self) -> f64 {
        self.high() - self.open().max(self.close())
    }

    #[inline]
    fn lower_shadow(&self) -> f64 {
        self.open().min(self.close()) - self.low()
    }

    #[inline]
    fn is_bullish(&self) -> bool {
        self.close() > self.open()
    }

    #[inline]
    fn is_bearish(&self) -> bool {
        self.close() < self.open()
    }

    /// O = H = L = C within [`PRICE_EPSILON`]
    #[inline]
    fn is_zero_range(&self) -> bool {
        self.range().abs() <= PRICE_EPSILON && self.body() <= PRICE_EPSILON
    }

    /// high >= max(open, close) and low <= min(open, close)
    #[inline]
    fn is_well_formed(&self) -> bool {
        self.validate().is_ok()
    }

    /// Validate OHLC consistency
    fn validate(&self) -> Result<()> {
        let values = [self.open(), self.high(), self.low(), self.close()];
        if values.iter().any(|v| v.is_nan()) {
            return Err(FixtureError::InvalidValue("NaN in OHLC"));
        }
        if values.iter().any(|v| v.is_infinite()) {
            return Err(FixtureError::InvalidValue("Infinite value in OHLC"));
        }
        if self.high() + PRICE_EPSILON < self.open().max(self.close()) {
            return Err(FixtureError::InvalidValue("high < max(open, close)"));
        }
        if self.low() - PRICE_EPSILON > self.open().min(self.close()) {
            return Err(FixtureError::InvalidValue("low > min(open, close)"));
        }
        Ok(())
    }
}

impl<T: OHLCV> OHLCVExt for T {}

// ============================================================
// BAR
// ============================================================

fn default_volume() -> f64 {
    DEFAULT_VOLUME
}

/// One OHLCV observation. Serialized as `{"o","h","l","c"}`; volume stays local.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Bar {
    #[serde(rename = "o")]
    pub open: f64,
    #[serde(rename = "h")]
    pub high: f64,
    #[serde(rename = "l")]
    pub low: f64,
    #[serde(rename = "c")]
    pub close: f64,
    #[serde(skip, default = "default_volume")]
    pub volume: f64,
}

impl Bar {
    pub const fn new(open: f64, high: f64, low: f64, close: f64) -> Self {
        Self {
            open,
            high,
            low,
            close,
            volume: DEFAULT_VOLUME,
        }
    }

    /// A bar where open, high, low and close are all `price`
    pub const fn flat(price: f64) -> Self {
        Self::new(price, price, price, price)
    }
}

impl OHLCV for Bar {
    fn open(&self) -> f64 {
        self.open
    }

    fn high(&self) -> f64 {
        self.high
    }

    fn low(&self) -> f64 {
        self.low
    }

    fn close(&self) -> f64 {
        self.close
    }

    fn volume(&self) -> f64 {
        self.volume
    }
}

/// Index of the first bar that breaks the geometric invariant, if any
pub fn first_malformed(bars: &[Bar]) -> Option<usize> {
    bars.iter().position(|b| !b.is_well_formed())
}

// ============================================================
// TESTS
// ============================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_volatility_validation() {
        assert!(Volatility::new(0.0).is_ok());
        assert!(Volatility::new(30.0).is_ok());
        assert!(Volatility::new(-0.1).is_err());
        assert!(Volatility::new(f64::NAN).is_err());
        assert!(Volatility::new(f64::INFINITY).is_err());
    }

    #[test]
    fn test_price_validation() {
        assert!(Price::new(0.05).is_ok());
        assert!(Price::new(1_000_000.0).is_ok());
        assert!(Price::new(0.0).is_err());
        assert!(Price::new(-5.0).is_err());
        assert!(Price::new(f64::NAN).is_err());
    }

    #[test]
    fn test_ohlcv_ext() {
        let bar = Bar::new(100.0, 110.0, 90.0, 105.0);
        assert_eq!(bar.body(), 5.0);
        assert_eq!(bar.range(), 20.0);
        assert_eq!(bar.upper_shadow(), 5.0);
        assert_eq!(bar.lower_shadow(), 10.0);
        assert!(bar.is_bullish());
        assert!(!bar.is_bearish());
        assert!(bar.is_well_formed());
    }

    #[test]
    fn test_malformed_bars() {
        // high below close
        assert!(!Bar::new(100.0, 101.0, 99.0, 102.0).is_well_formed());
        // low above open
        assert!(!Bar::new(100.0, 105.0, 100.5, 104.0).is_well_formed());
        assert!(!Bar::new(f64::NAN, 1.0, 0.0, 0.5).is_well_formed());

        let bars = vec![
            Bar::new(1.0, 2.0, 0.5, 1.5),
            Bar::new(1.0, 1.2, 0.5, 1.5),
        ];
        assert_eq!(first_malformed(&bars), Some(1));
    }

    #[test]
    fn test_zero_range_is_boundary_case() {
        let bar = Bar::flat(42.0);
        assert!(bar.is_zero_range());
        assert!(bar.is_well_formed());
        assert_eq!(bar.volume, DEFAULT_VOLUME);
    }

    #[test]
    fn test_bar_wire_format() {
        let bar = Bar::new(1.0, 2.0, 0.5, 1.5);
        let json = serde_json::to_string(&bar).unwrap();
        assert_eq!(json, r#"{"o":1.0,"h":2.0,"l":0.5,"c":1.5}"#);

        let back: Bar = serde_json::from_str(&json).unwrap();
        assert_eq!(back, bar);
        assert_eq!(back.volume, DEFAULT_VOLUME);
    }
}
