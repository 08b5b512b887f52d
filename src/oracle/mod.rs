//! Oracle capability
//!
//! The oracle is the trusted reference implementation (TA-Lib). It exposes one
//! function per candlestick pattern: four equal-length price columns in, one
//! integer verdict per bar out. Only the sign of a verdict is meaningful.
//!
//! The set of functions is closed and fixed at build time by [`PatternFunction`].

use std::fmt;
use std::str::FromStr;

use crate::Bar;

pub mod process;

pub use process::ProcessOracle;

/// Oracle output for one bar: 0 = no pattern, sign = direction
pub type Verdict = i32;

// ============================================================
// ERRORS
// ============================================================

/// Errors raised while talking to the oracle
#[derive(Debug, thiserror::Error)]
pub enum OracleError {
    #[error("Oracle unavailable: {0}")]
    Unavailable(String),

    #[error("Failed to spawn oracle `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Oracle exited with {status}: {stderr}")]
    Exit { status: String, stderr: String },

    #[error("Oracle protocol error: {0}")]
    Protocol(String),

    #[error("{function} failed in oracle: {message}")]
    Function {
        function: PatternFunction,
        message: String,
    },

    #[error("{function} returned {got} verdicts for {expected} bars")]
    ShapeMismatch {
        function: PatternFunction,
        expected: usize,
        got: usize,
    },

    #[error("Price columns differ in length: open={open} high={high} low={low} close={close}")]
    LengthMismatch {
        open: usize,
        high: usize,
        low: usize,
        close: usize,
    },
}

// ============================================================
// PATTERN FUNCTION TABLE - generated via macro
// ============================================================

/// Macro to generate the closed table of oracle entry points
macro_rules! define_pattern_functions {
    (
        $(
            $variant:ident => $name:literal
        ),* $(,)?
    ) => {
        /// Every candlestick function the oracle exposes
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum PatternFunction {
            $($variant),*
        }

        impl PatternFunction {
            /// All functions, sorted by oracle name
            pub const ALL: [PatternFunction; define_pattern_functions!(@count $($variant)*)] = [
                $(PatternFunction::$variant),*
            ];

            /// Oracle function name, e.g. `"CDLDOJI"`
            #[inline]
            pub fn name(self) -> &'static str {
                match self {
                    $(PatternFunction::$variant => $name),*
                }
            }

            pub fn from_name(name: &str) -> Option<Self> {
                match name {
                    $($name => Some(PatternFunction::$variant),)*
                    _ => None,
                }
            }
        }
    };
    (@count) => { 0 };
    (@count $head:ident $($tail:ident)*) => { 1 + define_pattern_functions!(@count $($tail)*) };
}

// Apply macro - all 61 TA-Lib CDL functions
define_pattern_functions! {
    TwoCrows => "CDL2CROWS",
    ThreeBlackCrows => "CDL3BLACKCROWS",
    ThreeInside => "CDL3INSIDE",
    ThreeLineStrike => "CDL3LINESTRIKE",
    ThreeOutside => "CDL3OUTSIDE",
    ThreeStarsInSouth => "CDL3STARSINSOUTH",
    ThreeWhiteSoldiers => "CDL3WHITESOLDIERS",
    AbandonedBaby => "CDLABANDONEDBABY",
    AdvanceBlock => "CDLADVANCEBLOCK",
    BeltHold => "CDLBELTHOLD",
    Breakaway => "CDLBREAKAWAY",
    ClosingMarubozu => "CDLCLOSINGMARUBOZU",
    ConcealingBabySwallow => "CDLCONCEALBABYSWALL",
    Counterattack => "CDLCOUNTERATTACK",
    DarkCloudCover => "CDLDARKCLOUDCOVER",
    Doji => "CDLDOJI",
    DojiStar => "CDLDOJISTAR",
    DragonflyDoji => "CDLDRAGONFLYDOJI",
    Engulfing => "CDLENGULFING",
    EveningDojiStar => "CDLEVENINGDOJISTAR",
    EveningStar => "CDLEVENINGSTAR",
    GapSideSideWhite => "CDLGAPSIDESIDEWHITE",
    GravestoneDoji => "CDLGRAVESTONEDOJI",
    Hammer => "CDLHAMMER",
    HangingMan => "CDLHANGINGMAN",
    Harami => "CDLHARAMI",
    HaramiCross => "CDLHARAMICROSS",
    HighWave => "CDLHIGHWAVE",
    Hikkake => "CDLHIKKAKE",
    HikkakeMod => "CDLHIKKAKEMOD",
    HomingPigeon => "CDLHOMINGPIGEON",
    IdenticalThreeCrows => "CDLIDENTICAL3CROWS",
    InNeck => "CDLINNECK",
    InvertedHammer => "CDLINVERTEDHAMMER",
    Kicking => "CDLKICKING",
    KickingByLength => "CDLKICKINGBYLENGTH",
    LadderBottom => "CDLLADDERBOTTOM",
    LongLeggedDoji => "CDLLONGLEGGEDDOJI",
    LongLine => "CDLLONGLINE",
    Marubozu => "CDLMARUBOZU",
    MatchingLow => "CDLMATCHINGLOW",
    MatHold => "CDLMATHOLD",
    MorningDojiStar => "CDLMORNINGDOJISTAR",
    MorningStar => "CDLMORNINGSTAR",
    OnNeck => "CDLONNECK",
    Piercing => "CDLPIERCING",
    RickshawMan => "CDLRICKSHAWMAN",
    RiseFallThreeMethods => "CDLRISEFALL3METHODS",
    SeparatingLines => "CDLSEPARATINGLINES",
    ShootingStar => "CDLSHOOTINGSTAR",
    ShortLine => "CDLSHORTLINE",
    SpinningTop => "CDLSPINNINGTOP",
    StalledPattern => "CDLSTALLEDPATTERN",
    StickSandwich => "CDLSTICKSANDWICH",
    Takuri => "CDLTAKURI",
    TasukiGap => "CDLTASUKIGAP",
    Thrusting => "CDLTHRUSTING",
    Tristar => "CDLTRISTAR",
    Unique3River => "CDLUNIQUE3RIVER",
    UpsideGapTwoCrows => "CDLUPSIDEGAP2CROWS",
    XSideGapThreeMethods => "CDLXSIDEGAP3METHODS",
}

impl fmt::Display for PatternFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PatternFunction {
    type Err = OracleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PatternFunction::from_name(s)
            .ok_or_else(|| OracleError::Protocol(format!("unknown pattern function: {s}")))
    }
}

impl serde::Serialize for PatternFunction {
    fn serialize<S: serde::Serializer>(&self, s: S) -> std::result::Result<S::Ok, S::Error> {
        s.serialize_str(self.name())
    }
}

impl<'de> serde::Deserialize<'de> for PatternFunction {
    fn deserialize<D: serde::Deserializer<'de>>(d: D) -> std::result::Result<Self, D::Error> {
        let name = String::deserialize(d)?;
        PatternFunction::from_name(&name)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown pattern function: {name}")))
    }
}

// ============================================================
// PRICE SERIES
// ============================================================

/// Column-oriented OHLC input, the shape the oracle consumes
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceSeries {
    pub open: Vec<f64>,
    pub high: Vec<f64>,
    pub low: Vec<f64>,
    pub close: Vec<f64>,
}

impl PriceSeries {
    pub fn from_bars(bars: &[Bar]) -> Self {
        let mut series = Self {
            open: Vec::with_capacity(bars.len()),
            high: Vec::with_capacity(bars.len()),
            low: Vec::with_capacity(bars.len()),
            close: Vec::with_capacity(bars.len()),
        };
        for b in bars {
            series.open.push(b.open);
            series.high.push(b.high);
            series.low.push(b.low);
            series.close.push(b.close);
        }
        series
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.open.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.open.is_empty()
    }

    /// All four columns must have the same length
    pub fn validate(&self) -> Result<(), OracleError> {
        let n = self.open.len();
        if self.high.len() != n || self.low.len() != n || self.close.len() != n {
            return Err(OracleError::LengthMismatch {
                open: n,
                high: self.high.len(),
                low: self.low.len(),
                close: self.close.len(),
            });
        }
        Ok(())
    }
}

// ============================================================
// ORACLE TRAIT
// ============================================================

/// Reference implementation of the candlestick functions
pub trait Oracle: Send + Sync {
    /// Verdicts for one function over the whole series
    fn evaluate(
        &self,
        function: PatternFunction,
        series: &PriceSeries,
    ) -> Result<Vec<Verdict>, OracleError>;

    /// Verdicts for several functions over the same series.
    ///
    /// Each function succeeds or fails on its own. Implementations backed by a
    /// process should override this to batch the calls.
    fn evaluate_many(
        &self,
        functions: &[PatternFunction],
        series: &PriceSeries,
    ) -> Vec<(PatternFunction, Result<Vec<Verdict>, OracleError>)> {
        functions
            .iter()
            .map(|&f| (f, self.evaluate(f, series)))
            .collect()
    }

    /// Names of the candlestick functions the oracle exposes
    fn functions(&self) -> Result<Vec<String>, OracleError> {
        Ok(PatternFunction::ALL
            .iter()
            .map(|f| f.name().to_string())
            .collect())
    }
}

/// Oracle backed by a closure. Useful for in-process bindings and test doubles.
pub struct FnOracle<F> {
    f: F,
}

impl<F> FnOracle<F>
where
    F: Fn(PatternFunction, &PriceSeries) -> Result<Vec<Verdict>, OracleError> + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> Oracle for FnOracle<F>
where
    F: Fn(PatternFunction, &PriceSeries) -> Result<Vec<Verdict>, OracleError> + Send + Sync,
{
    fn evaluate(
        &self,
        function: PatternFunction,
        series: &PriceSeries,
    ) -> Result<Vec<Verdict>, OracleError> {
        series.validate()?;
        let verdicts = (self.f)(function, series)?;
        check_shape(function, series, verdicts)
    }
}

/// Result of probing for the oracle at startup
pub enum OracleStatus<O> {
    Available(O),
    Unavailable { reason: String },
}

impl<O> OracleStatus<O> {
    pub fn is_available(&self) -> bool {
        matches!(self, OracleStatus::Available(_))
    }

    /// Unwrap the oracle or turn absence into an error
    pub fn into_result(self) -> Result<O, OracleError> {
        match self {
            OracleStatus::Available(o) => Ok(o),
            OracleStatus::Unavailable { reason } => Err(OracleError::Unavailable(reason)),
        }
    }
}

// ============================================================
// HELPERS
// ============================================================

/// Reject oracle output that does not line up with its input
pub fn check_shape(
    function: PatternFunction,
    series: &PriceSeries,
    verdicts: Vec<Verdict>,
) -> Result<Vec<Verdict>, OracleError> {
    if verdicts.len() != series.len() {
        return Err(OracleError::ShapeMismatch {
            function,
            expected: series.len(),
            got: verdicts.len(),
        });
    }
    Ok(verdicts)
}

/// Sorted, duplicate-free indices of non-zero verdicts
pub fn detected_indices(verdicts: &[Verdict]) -> Vec<usize> {
    verdicts
        .iter()
        .enumerate()
        .filter_map(|(i, &v)| (v != 0).then_some(i))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_has_61_sorted_functions() {
        assert_eq!(PatternFunction::ALL.len(), 61);
        let names: Vec<&str> = PatternFunction::ALL.iter().map(|f| f.name()).collect();
        let mut sorted = names.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(names, sorted);
        assert!(names.iter().all(|n| n.starts_with("CDL")));
    }

    #[test]
    fn test_name_round_trip() {
        for f in PatternFunction::ALL {
            assert_eq!(PatternFunction::from_name(f.name()), Some(f));
            assert_eq!(f.to_string().parse::<PatternFunction>().unwrap(), f);
        }
        assert_eq!(PatternFunction::from_name("CDL_DOJI"), None);
        assert!("SMA".parse::<PatternFunction>().is_err());
    }

    #[test]
    fn test_serde_uses_oracle_names() {
        let json = serde_json::to_string(&PatternFunction::IdenticalThreeCrows).unwrap();
        assert_eq!(json, "\"CDLIDENTICAL3CROWS\"");
        let back: PatternFunction = serde_json::from_str(&json).unwrap();
        assert_eq!(back, PatternFunction::IdenticalThreeCrows);
    }

    #[test]
    fn test_price_series_from_bars() {
        let bars = vec![Bar::new(1.0, 2.0, 0.5, 1.5), Bar::new(1.5, 3.0, 1.0, 2.5)];
        let series = PriceSeries::from_bars(&bars);
        assert_eq!(series.len(), 2);
        assert_eq!(series.open, vec![1.0, 1.5]);
        assert_eq!(series.close, vec![1.5, 2.5]);
        assert!(series.validate().is_ok());
    }

    #[test]
    fn test_length_mismatch() {
        let series = PriceSeries {
            open: vec![1.0, 2.0],
            high: vec![2.0],
            low: vec![0.5, 1.0],
            close: vec![1.5, 1.5],
        };
        assert!(matches!(
            series.validate(),
            Err(OracleError::LengthMismatch { high: 1, .. })
        ));
    }

    #[test]
    fn test_detected_indices() {
        assert_eq!(detected_indices(&[0, 100, 0, -100, 200]), vec![1, 3, 4]);
        assert!(detected_indices(&[0, 0, 0]).is_empty());
        assert!(detected_indices(&[]).is_empty());
    }

    #[test]
    fn test_fn_oracle_checks_shape() {
        let oracle = FnOracle::new(|_, _: &PriceSeries| Ok(vec![0, 100]));
        let series = PriceSeries::from_bars(&[Bar::flat(1.0); 3]);
        let err = oracle.evaluate(PatternFunction::Doji, &series).unwrap_err();
        assert!(matches!(
            err,
            OracleError::ShapeMismatch {
                expected: 3,
                got: 2,
                ..
            }
        ));
    }

    #[test]
    fn test_evaluate_many_isolates_failures() {
        let oracle = FnOracle::new(|f, s: &PriceSeries| match f {
            PatternFunction::Hikkake => Err(OracleError::Function {
                function: f,
                message: "boom".into(),
            }),
            _ => Ok(vec![0; s.len()]),
        });
        let series = PriceSeries::from_bars(&[Bar::flat(1.0); 4]);
        let out = oracle.evaluate_many(
            &[PatternFunction::Doji, PatternFunction::Hikkake, PatternFunction::Hammer],
            &series,
        );
        assert_eq!(out.len(), 3);
        assert!(out[0].1.is_ok());
        assert!(out[1].1.is_err());
        assert!(out[2].1.is_ok());
    }

    #[test]
    fn test_status_into_result() {
        let ok: OracleStatus<u8> = OracleStatus::Available(1);
        assert!(ok.is_available());
        assert_eq!(ok.into_result().unwrap(), 1);

        let missing: OracleStatus<u8> = OracleStatus::Unavailable {
            reason: "no talib".into(),
        };
        assert!(matches!(
            missing.into_result(),
            Err(OracleError::Unavailable(r)) if r == "no talib"
        ));
    }
}
