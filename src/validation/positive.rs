//! Positive tier: every fixture should make the oracle fire at least once.

use std::fmt;

use tracing::{info, warn};

use super::Status;
use crate::fixtures::{build_all, build_all_parallel};
use crate::oracle::{Oracle, PatternFunction};

/// Outcome for one fixture
#[derive(Debug, Clone)]
pub struct PatternCheck {
    pub pattern: PatternFunction,
    pub status: Status,
    pub detected_at: Vec<usize>,
    pub error: Option<String>,
}

impl fmt::Display for PatternCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.status, &self.error) {
            (Status::Fail, Some(e)) => write!(f, "{} {}: {}", self.status, self.pattern, e),
            (Status::Pass, _) => write!(
                f,
                "{} {}: Detected at {:?}",
                self.status, self.pattern, self.detected_at
            ),
            _ => write!(
                f,
                "{} {}: Not detected (strict TA-Lib params)",
                self.status, self.pattern
            ),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PositiveReport {
    pub passed: usize,
    pub warned: usize,
    pub failed: usize,
    pub details: Vec<PatternCheck>,
}

impl PositiveReport {
    pub fn total(&self) -> usize {
        self.details.len()
    }
}

impl fmt::Display for PositiveReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        super::banner(f, "POSITIVE TESTS - All 61 TA-Lib Patterns")?;
        for check in &self.details {
            writeln!(f, "{check}")?;
        }
        Ok(())
    }
}

/// Run all 61 fixtures. One failing pattern never stops the others.
pub fn run_positive(oracle: &dyn Oracle, parallel: bool) -> PositiveReport {
    info!(parallel, "Positive tier started");

    let outcomes = if parallel {
        build_all_parallel(oracle)
    } else {
        build_all(oracle)
    };

    let mut report = PositiveReport::default();
    for (pattern, outcome) in outcomes {
        let check = match outcome {
            Ok(fixture) if fixture.detected() => {
                report.passed += 1;
                PatternCheck {
                    pattern,
                    status: Status::Pass,
                    detected_at: fixture.detected_at,
                    error: None,
                }
            }
            Ok(_) => {
                report.warned += 1;
                PatternCheck {
                    pattern,
                    status: Status::Warn,
                    detected_at: Vec::new(),
                    error: None,
                }
            }
            Err(e) => {
                warn!(%pattern, error = %e, "Fixture failed");
                report.failed += 1;
                PatternCheck {
                    pattern,
                    status: Status::Fail,
                    detected_at: Vec::new(),
                    error: Some(e.to_string()),
                }
            }
        };
        report.details.push(check);
    }

    info!(
        passed = report.passed,
        warned = report.warned,
        failed = report.failed,
        "Positive tier finished"
    );
    report
}
