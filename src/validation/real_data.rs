//! Real-data tier: detection counts on recent daily SPY quotes.

use std::fmt;

use tracing::{info, warn};

use crate::oracle::{Oracle, PatternFunction, PriceSeries, Verdict};
use crate::quotes::{require_bars, QuoteSource};

pub const REAL_TICKER: &str = "SPY";
pub const REAL_RANGE: &str = "6mo";
/// Fewer bars than this and the tier is skipped
pub const MIN_REAL_BARS: usize = 50;

pub const REAL_PATTERNS: [PatternFunction; 10] = [
    PatternFunction::Doji,
    PatternFunction::Engulfing,
    PatternFunction::Hammer,
    PatternFunction::HangingMan,
    PatternFunction::MorningStar,
    PatternFunction::EveningStar,
    PatternFunction::ThreeWhiteSoldiers,
    PatternFunction::ThreeBlackCrows,
    PatternFunction::Marubozu,
    PatternFunction::SpinningTop,
];

/// Detections split by verdict sign
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DirectionCounts {
    pub bullish: usize,
    pub bearish: usize,
    pub total: usize,
}

impl DirectionCounts {
    pub fn from_verdicts(verdicts: &[Verdict]) -> Self {
        let bullish = verdicts.iter().filter(|&&v| v > 0).count();
        let bearish = verdicts.iter().filter(|&&v| v < 0).count();
        Self {
            bullish,
            bearish,
            total: bullish + bearish,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RealDataStatus {
    Success {
        bars_tested: usize,
        detections: Vec<(PatternFunction, DirectionCounts)>,
        /// Functions the oracle failed on; the rest still report counts
        errors: Vec<(PatternFunction, String)>,
    },
    Skipped {
        reason: String,
    },
    Error {
        message: String,
    },
}

impl RealDataStatus {
    pub fn name(&self) -> &'static str {
        match self {
            RealDataStatus::Success { .. } => "success",
            RealDataStatus::Skipped { .. } => "skipped",
            RealDataStatus::Error { .. } => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RealDataReport {
    pub ticker: &'static str,
    pub status: RealDataStatus,
}

impl fmt::Display for RealDataReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        super::banner(f, "REAL MARKET DATA TESTS")?;
        match &self.status {
            RealDataStatus::Success {
                bars_tested,
                detections,
                errors,
            } => {
                writeln!(f, "Testing on {bars_tested} bars of {} data\n", self.ticker)?;
                for (pattern, c) in detections {
                    if c.total > 0 {
                        writeln!(
                            f,
                            "  {pattern}: {} ({} bullish, {} bearish)",
                            c.total, c.bullish, c.bearish
                        )?;
                    } else {
                        writeln!(f, "  {pattern}: 0 detections")?;
                    }
                }
                for (pattern, message) in errors {
                    writeln!(f, "  [ERROR] {pattern}: {message}")?;
                }
                Ok(())
            }
            RealDataStatus::Skipped { reason } => writeln!(f, "[SKIP] {reason}"),
            RealDataStatus::Error { message } => writeln!(f, "[ERROR] {message}"),
        }
    }
}

pub fn run_real_data(oracle: &dyn Oracle, quotes: &QuoteSource) -> RealDataReport {
    info!(ticker = REAL_TICKER, range = REAL_RANGE, "Real-data tier started");
    let status = evaluate_real(oracle, quotes);
    info!(status = status.name(), "Real-data tier finished");
    RealDataReport {
        ticker: REAL_TICKER,
        status,
    }
}

fn evaluate_real(oracle: &dyn Oracle, quotes: &QuoteSource) -> RealDataStatus {
    let provider = match quotes {
        QuoteSource::Available(p) => p,
        QuoteSource::Unavailable { reason } => {
            return RealDataStatus::Skipped {
                reason: reason.clone(),
            }
        }
    };

    let bars = match provider.fetch(REAL_TICKER, REAL_RANGE) {
        Ok(bars) => bars,
        Err(e) => {
            warn!(ticker = REAL_TICKER, error = %e, "Quote fetch failed");
            return RealDataStatus::Error {
                message: e.to_string(),
            };
        }
    };

    let bars = match require_bars(REAL_TICKER, bars, MIN_REAL_BARS) {
        Ok(bars) => bars,
        Err(e) => {
            info!(error = %e, "Not enough quotes");
            return RealDataStatus::Skipped {
                reason: "Insufficient data downloaded".into(),
            };
        }
    };

    let series = PriceSeries::from_bars(&bars);
    let mut detections = Vec::with_capacity(REAL_PATTERNS.len());
    let mut errors = Vec::new();
    for (pattern, outcome) in oracle.evaluate_many(&REAL_PATTERNS, &series) {
        match outcome {
            Ok(verdicts) => detections.push((pattern, DirectionCounts::from_verdicts(&verdicts))),
            Err(e) => {
                warn!(%pattern, error = %e, "Oracle failed on real quotes");
                errors.push((pattern, e.to_string()));
            }
        }
    }

    RealDataStatus::Success {
        bars_tested: bars.len(),
        detections,
        errors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_counts() {
        let c = DirectionCounts::from_verdicts(&[0, 100, -100, 200, 0, -80]);
        assert_eq!(
            c,
            DirectionCounts {
                bullish: 2,
                bearish: 2,
                total: 4
            }
        );
    }

    #[test]
    fn test_display_lists_failed_functions() {
        let report = RealDataReport {
            ticker: REAL_TICKER,
            status: RealDataStatus::Success {
                bars_tested: 120,
                detections: vec![(PatternFunction::Doji, DirectionCounts::from_verdicts(&[100, 0]))],
                errors: vec![(PatternFunction::HangingMan, "simulated".into())],
            },
        };
        let text = report.to_string();
        assert!(text.contains("  CDLDOJI: 1 (1 bullish, 0 bearish)"));
        assert!(text.contains("  [ERROR] CDLHANGINGMAN: simulated"));
    }

    #[test]
    fn test_status_names() {
        assert_eq!(
            RealDataStatus::Skipped {
                reason: String::new()
            }
            .name(),
            "skipped"
        );
        assert_eq!(
            RealDataStatus::Error {
                message: String::new()
            }
            .name(),
            "error"
        );
    }
}
