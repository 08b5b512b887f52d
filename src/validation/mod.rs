//! Validation tiers
//!
//! Each tier composes generator -> oracle -> aggregation and returns a report.
//! Reports render their console lines through `Display`; nothing here prints.
//!
//! # Tiers
//!
//! - **Positive**: every fixture should fire ([`positive`])
//! - **Negative**: flat data should stay quiet ([`negative`])
//! - **Fuzz**: detection rates on seeded random walks ([`fuzz`])
//! - **Real data**: counts on downloaded quotes ([`real_data`])

use std::fmt;

use crate::oracle::Oracle;
use crate::quotes::QuoteSource;

pub mod fuzz;
pub mod negative;
pub mod positive;
pub mod real_data;

pub use fuzz::{run_fuzz, FuzzReport, ALL_TIERS_FUZZ_ITERATIONS, DEFAULT_FUZZ_ITERATIONS};
pub use negative::{run_negative, FlatExpectation, NegativeReport};
pub use positive::{run_positive, PositiveReport};
pub use real_data::{run_real_data, DirectionCounts, RealDataReport, RealDataStatus};

/// Per-check outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    Pass,
    Warn,
    Fail,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Status::Pass => "[PASS]",
            Status::Warn => "[WARN]",
            Status::Fail => "[FAIL]",
        })
    }
}

pub(crate) fn banner(f: &mut fmt::Formatter<'_>, title: &str) -> fmt::Result {
    let rule = "=".repeat(60);
    writeln!(f, "\n{rule}\n{title}\n{rule}")
}

/// Results of a full run over every tier
#[derive(Debug, Clone)]
pub struct SuiteReport {
    pub positive: PositiveReport,
    pub negative: NegativeReport,
    pub fuzz: FuzzReport,
    pub real_data: RealDataReport,
}

impl SuiteReport {
    /// Closing summary block
    pub fn summary(&self) -> Summary<'_> {
        Summary(self)
    }

    /// No check failed outright
    pub fn is_clean(&self) -> bool {
        self.positive.failed == 0 && self.negative.failed == 0
    }
}

pub struct Summary<'a>(&'a SuiteReport);

impl fmt::Display for Summary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let r = self.0;
        banner(f, "SUMMARY")?;
        writeln!(
            f,
            "Positive tests: {} passed, {} warned, {} failed",
            r.positive.passed, r.positive.warned, r.positive.failed
        )?;
        writeln!(
            f,
            "Negative tests: {} passed, {} failed",
            r.negative.passed, r.negative.failed
        )?;
        writeln!(
            f,
            "Fuzz tests: {} iterations, {} total detections",
            r.fuzz.iterations, r.fuzz.total_detections
        )?;
        writeln!(f, "Real data tests: {}", r.real_data.status.name())
    }
}

/// Positive, negative, fuzz (50 rounds), then real data
pub fn run_all(oracle: &dyn Oracle, quotes: &QuoteSource, parallel: bool) -> SuiteReport {
    SuiteReport {
        positive: run_positive(oracle, parallel),
        negative: run_negative(oracle),
        fuzz: run_fuzz(oracle, ALL_TIERS_FUZZ_ITERATIONS, parallel),
        real_data: run_real_data(oracle, quotes),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_labels() {
        assert_eq!(Status::Pass.to_string(), "[PASS]");
        assert_eq!(Status::Warn.to_string(), "[WARN]");
        assert_eq!(Status::Fail.to_string(), "[FAIL]");
    }
}
