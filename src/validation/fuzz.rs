//! Fuzz tier: detection frequencies over seeded random walks. Never asserts.

use std::fmt;

use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::generators::random_walk;
use crate::oracle::{Oracle, PatternFunction, PriceSeries};
use crate::rng::SeedStream;
use crate::{Bar, Price, Volatility};

/// Bars per fuzz round
pub const FUZZ_BARS: usize = 50;
pub const FUZZ_BASE: Price = Price::new_const(100.0);
pub const FUZZ_VOLATILITY: Volatility = Volatility::new_const(5.0);

/// Rounds for the stand-alone fuzz mode
pub const DEFAULT_FUZZ_ITERATIONS: usize = 100;
/// Rounds when every tier runs
pub const ALL_TIERS_FUZZ_ITERATIONS: usize = 50;

pub const FUZZ_PATTERNS: [PatternFunction; 6] = [
    PatternFunction::Doji,
    PatternFunction::Engulfing,
    PatternFunction::Hammer,
    PatternFunction::Marubozu,
    PatternFunction::MorningStar,
    PatternFunction::ThreeWhiteSoldiers,
];

/// Bars for fuzz round `round`: seed = round index, 50-bar walk from 100 at volatility 5
pub fn fuzz_round_bars(round: u64) -> Vec<Bar> {
    let mut rng = SeedStream::new(round);
    random_walk(&mut rng, FUZZ_BARS, FUZZ_BASE, FUZZ_VOLATILITY)
}

#[derive(Debug, Clone, PartialEq)]
pub struct FuzzReport {
    pub iterations: usize,
    pub patterns_tested: usize,
    pub total_detections: usize,
    /// Detections per pattern, in [`FUZZ_PATTERNS`] order
    pub counts: Vec<(PatternFunction, usize)>,
    /// Oracle calls that failed and were left out of the counts
    pub errors: usize,
}

impl FuzzReport {
    fn empty(iterations: usize) -> Self {
        Self {
            iterations,
            patterns_tested: FUZZ_PATTERNS.len(),
            total_detections: 0,
            counts: FUZZ_PATTERNS.iter().map(|&f| (f, 0)).collect(),
            errors: 0,
        }
    }

    fn merge(mut self, other: Self) -> Self {
        for ((_, a), (_, b)) in self.counts.iter_mut().zip(other.counts) {
            *a += b;
        }
        self.total_detections += other.total_detections;
        self.errors += other.errors;
        self
    }

    pub fn count(&self, pattern: PatternFunction) -> usize {
        self.counts
            .iter()
            .find(|(f, _)| *f == pattern)
            .map_or(0, |(_, c)| *c)
    }

    /// Percentage of all fuzzed bars where `pattern` fired
    pub fn rate(&self, pattern: PatternFunction) -> f64 {
        let bars = self.iterations * FUZZ_BARS;
        if bars == 0 {
            return 0.0;
        }
        self.count(pattern) as f64 / bars as f64 * 100.0
    }
}

impl fmt::Display for FuzzReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        super::banner(f, &format!("FUZZ TESTING ({} iterations)", self.iterations))?;
        writeln!(
            f,
            "\nDetection rates over {} random datasets ({FUZZ_BARS} bars each):",
            self.iterations
        )?;
        for (pattern, count) in &self.counts {
            writeln!(
                f,
                "  {pattern}: {count} detections ({:.2}% of bars)",
                self.rate(*pattern)
            )?;
        }
        if self.errors > 0 {
            writeln!(f, "\nOracle errors: {}", self.errors)?;
        }
        writeln!(f, "\nTotal detections: {}", self.total_detections)
    }
}

fn run_round(oracle: &dyn Oracle, round: usize) -> FuzzReport {
    let series = PriceSeries::from_bars(&fuzz_round_bars(round as u64));
    let mut report = FuzzReport::empty(0);

    for ((pattern, outcome), (_, count)) in oracle
        .evaluate_many(&FUZZ_PATTERNS, &series)
        .into_iter()
        .zip(report.counts.iter_mut())
    {
        match outcome {
            Ok(verdicts) => {
                let n = verdicts.iter().filter(|&&v| v != 0).count();
                *count += n;
                report.total_detections += n;
            }
            Err(e) => {
                warn!(round, %pattern, error = %e, "Fuzz oracle call failed");
                report.errors += 1;
            }
        }
    }

    debug!(round, detections = report.total_detections, "Fuzz round done");
    report
}

/// Each round reseeds with its own index, so the parallel path yields the same counts.
pub fn run_fuzz(oracle: &dyn Oracle, iterations: usize, parallel: bool) -> FuzzReport {
    info!(iterations, parallel, "Fuzz tier started");

    let base = FuzzReport::empty(iterations);
    let report = if parallel {
        let rounds = (0..iterations)
            .into_par_iter()
            .map(|round| run_round(oracle, round))
            .reduce(|| FuzzReport::empty(0), FuzzReport::merge);
        base.merge(rounds)
    } else {
        (0..iterations)
            .map(|round| run_round(oracle, round))
            .fold(base, FuzzReport::merge)
    };

    info!(
        total_detections = report.total_detections,
        errors = report.errors,
        "Fuzz tier finished"
    );
    report
}
