//! Negative tier: quiet, near-flat data should not trigger directional patterns.

use std::fmt;

use tracing::{info, warn};

use super::Status;
use crate::oracle::{detected_indices, Oracle, PatternFunction, PriceSeries};
use crate::Bar;

/// Bars in the flat sequence
pub const FLAT_BARS: usize = 100;

/// The one quiet candle the whole sequence repeats
pub const FLAT_BAR: Bar = Bar::new(100.0, 100.5, 99.5, 100.1);

/// Label recorded for every check in this tier
pub const TEST_TYPE: &str = "flat_data";

/// Patterns checked against flat data
pub const NEGATIVE_SUBSET: [PatternFunction; 7] = [
    PatternFunction::Doji,
    PatternFunction::Engulfing,
    PatternFunction::Hammer,
    PatternFunction::MorningStar,
    PatternFunction::ThreeWhiteSoldiers,
    PatternFunction::ThreeBlackCrows,
    PatternFunction::Marubozu,
];

/// What a pattern is allowed to do on flat data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlatExpectation {
    /// Small bodies are the pattern; firing or not both pass
    Indecision,
    /// Any detection is a false positive
    MustStayQuiet,
}

impl FlatExpectation {
    pub fn of(function: PatternFunction) -> Self {
        match function {
            PatternFunction::Doji => FlatExpectation::Indecision,
            _ => FlatExpectation::MustStayQuiet,
        }
    }
}

pub fn flat_sequence(n: usize) -> Vec<Bar> {
    vec![FLAT_BAR; n]
}

#[derive(Debug, Clone)]
pub struct NegativeCheck {
    pub pattern: PatternFunction,
    pub status: Status,
    pub test_type: &'static str,
    pub detections: Vec<usize>,
    pub error: Option<String>,
}

impl fmt::Display for NegativeCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (status, pattern) = (self.status, self.pattern);
        if let Some(e) = &self.error {
            return write!(f, "{status} {pattern}: {e}");
        }
        match (FlatExpectation::of(pattern), self.detections.len()) {
            (FlatExpectation::Indecision, 0) => {
                write!(f, "{status} {pattern}: Didn't detect doji on flat data")
            }
            (FlatExpectation::Indecision, n) => write!(
                f,
                "{status} {pattern}: Correctly detects on flat data ({n} times)"
            ),
            (FlatExpectation::MustStayQuiet, 0) => {
                write!(f, "{status} {pattern}: No false positives on flat data")
            }
            (FlatExpectation::MustStayQuiet, _) => {
                let head: Vec<usize> = self.detections.iter().take(5).copied().collect();
                write!(f, "{status} {pattern}: False positives at {head:?}...")
            }
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct NegativeReport {
    pub passed: usize,
    pub failed: usize,
    pub details: Vec<NegativeCheck>,
}

impl fmt::Display for NegativeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        super::banner(f, "NEGATIVE TESTS (False Positive Checks)")?;
        for check in &self.details {
            writeln!(f, "{check}")?;
        }
        Ok(())
    }
}

/// Classify one oracle answer on flat data
fn classify(pattern: PatternFunction, detections: &[usize]) -> Status {
    match (FlatExpectation::of(pattern), detections.is_empty()) {
        (FlatExpectation::Indecision, false) => Status::Pass,
        (FlatExpectation::Indecision, true) => Status::Warn,
        (FlatExpectation::MustStayQuiet, true) => Status::Pass,
        (FlatExpectation::MustStayQuiet, false) => Status::Fail,
    }
}

pub fn run_negative(oracle: &dyn Oracle) -> NegativeReport {
    info!("Negative tier started");

    let series = PriceSeries::from_bars(&flat_sequence(FLAT_BARS));
    let mut report = NegativeReport::default();

    for (pattern, outcome) in oracle.evaluate_many(&NEGATIVE_SUBSET, &series) {
        let check = match outcome {
            Ok(verdicts) => {
                let detections = detected_indices(&verdicts);
                let status = classify(pattern, &detections);
                NegativeCheck {
                    pattern,
                    status,
                    test_type: TEST_TYPE,
                    detections,
                    error: None,
                }
            }
            Err(e) => {
                warn!(%pattern, error = %e, "Oracle failed on flat data");
                NegativeCheck {
                    pattern,
                    status: Status::Fail,
                    test_type: TEST_TYPE,
                    detections: Vec::new(),
                    error: Some(e.to_string()),
                }
            }
        };

        // An indecision pattern that stays quiet still counts as a pass
        match check.status {
            Status::Fail => report.failed += 1,
            Status::Pass | Status::Warn => report.passed += 1,
        }
        report.details.push(check);
    }

    info!(
        passed = report.passed,
        failed = report.failed,
        "Negative tier finished"
    );
    report
}
