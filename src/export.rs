//! Versioned corpus export
//!
//! Two schemas, each built fully in memory and serialized once:
//!
//! - **v1** ([`CompactCorpus`]): the 61 fixtures plus small fuzz rounds.
//! - **v2** ([`EnhancedCorpus`]): edge-case archetypes, heavy fuzz and real quotes.
//!
//! Every result map is keyed by oracle function name and covers all functions
//! the oracle answered; a function that failed is logged and left out.

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::Path;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::fixtures::{build_all, build_all_parallel, Fixture};
use crate::generators::{random_walk, EdgeCase};
use crate::oracle::{Oracle, PatternFunction, PriceSeries, Verdict};
use crate::quotes::QuoteSource;
use crate::rng::SeedStream;
use crate::validation::fuzz::fuzz_round_bars;
use crate::{Bar, Price, Result, Volatility};

pub const CORPUS_V1: u32 = 1;
pub const CORPUS_V2: u32 = 2;

/// Seed every edge-case archetype is drawn from
pub const EDGE_CASE_SEED: u64 = 42;
pub const EDGE_CASE_BARS: usize = 100;

/// Enhanced fuzz round `i` draws from seed `ENHANCED_SEED_OFFSET + i`
pub const ENHANCED_SEED_OFFSET: u64 = 1000;
pub const ENHANCED_FUZZ_BARS: usize = 500;
pub const ENHANCED_VOLATILITY_RANGE: (f64, f64) = (0.5, 30.0);
pub const ENHANCED_BASE_RANGE: (f64, f64) = (10.0, 5000.0);

pub const REAL_DATA_TICKERS: [&str; 4] = ["SPY", "AMD", "AAPL", "BTC-USD"];
pub const REAL_DATA_RANGE: &str = "20y";

/// Verdicts per oracle function
pub type ResultMap = BTreeMap<PatternFunction, Vec<Verdict>>;

// ============================================================
// SCHEMA V1
// ============================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompactCase {
    pub bars: Vec<Bar>,
    pub result: Vec<Verdict>,
    pub detected_at: Vec<usize>,
}

impl From<Fixture> for CompactCase {
    fn from(f: Fixture) -> Self {
        Self {
            bars: f.bars,
            result: f.result,
            detected_at: f.detected_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuzzRound {
    pub seed: u64,
    pub bars: Vec<Bar>,
    pub results: ResultMap,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompactCorpus {
    pub version: u32,
    pub test_cases: BTreeMap<PatternFunction, CompactCase>,
    pub fuzz: Vec<FuzzRound>,
}

// ============================================================
// SCHEMA V2
// ============================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeCaseData {
    pub bars: Vec<Bar>,
    pub results: ResultMap,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnhancedFuzzRound {
    pub seed: u64,
    pub bars_count: usize,
    pub volatility: Volatility,
    pub base: Price,
    pub bars: Vec<Bar>,
    pub results: ResultMap,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RealTickerData {
    pub bars: Vec<Bar>,
    pub bar_count: usize,
    pub results: ResultMap,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnhancedCorpus {
    pub version: u32,
    pub edge_cases: BTreeMap<String, EdgeCaseData>,
    pub enhanced_fuzz: Vec<EnhancedFuzzRound>,
    /// Empty when no quotes could be fetched
    pub real_data: BTreeMap<String, RealTickerData>,
}

// ============================================================
// FILE EXPORT
// ============================================================

/// Entry of the `--export` file: a fixture, or why it could not be built
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FixtureOutcome {
    Fixture(Fixture),
    Failed { error: String },
}

// ============================================================
// BUILDERS
// ============================================================

/// Every oracle function over one sequence. Failures are logged and omitted.
pub fn evaluate_all(oracle: &dyn Oracle, bars: &[Bar]) -> ResultMap {
    let series = PriceSeries::from_bars(bars);
    oracle
        .evaluate_many(&PatternFunction::ALL, &series)
        .into_iter()
        .filter_map(|(function, outcome)| match outcome {
            Ok(verdicts) => Some((function, verdicts)),
            Err(e) => {
                warn!(%function, error = %e, "Oracle call failed; omitted from results");
                None
            }
        })
        .collect()
}

fn compact_fuzz_round(oracle: &dyn Oracle, round: usize) -> FuzzRound {
    let bars = fuzz_round_bars(round as u64);
    let results = evaluate_all(oracle, &bars);
    debug!(round, "Compact fuzz round built");
    FuzzRound {
        seed: round as u64,
        bars,
        results,
    }
}

/// Schema v1: 61 fixtures plus `config.fuzz_rounds` 50-bar rounds
pub fn build_compact_corpus(oracle: &dyn Oracle, config: &Config) -> CompactCorpus {
    info!(fuzz_rounds = config.fuzz_rounds, "Building compact corpus");

    let fixtures = if config.parallel {
        build_all_parallel(oracle)
    } else {
        build_all(oracle)
    };

    let test_cases = fixtures
        .into_iter()
        .filter_map(|(function, outcome)| match outcome {
            Ok(fixture) => Some((function, CompactCase::from(fixture))),
            Err(e) => {
                warn!(%function, error = %e, "Fixture failed; left out of test_cases");
                None
            }
        })
        .collect();

    let fuzz = if config.parallel {
        (0..config.fuzz_rounds)
            .into_par_iter()
            .map(|round| compact_fuzz_round(oracle, round))
            .collect()
    } else {
        (0..config.fuzz_rounds)
            .map(|round| compact_fuzz_round(oracle, round))
            .collect()
    };

    CompactCorpus {
        version: CORPUS_V1,
        test_cases,
        fuzz,
    }
}

/// Edge-case archetype drawn from a fresh stream seeded with [`EDGE_CASE_SEED`]
pub fn edge_case_bars(case: EdgeCase) -> Vec<Bar> {
    let mut rng = SeedStream::new(EDGE_CASE_SEED);
    case.generate(&mut rng, EDGE_CASE_BARS)
}

/// Inputs of enhanced round `round`: volatility, then base, then the walk, all from one stream
pub fn enhanced_round_inputs(round: usize) -> Result<(u64, Volatility, Price, Vec<Bar>)> {
    let seed = ENHANCED_SEED_OFFSET + round as u64;
    let mut rng = SeedStream::new(seed);
    let volatility = Volatility::new(
        rng.uniform(ENHANCED_VOLATILITY_RANGE.0, ENHANCED_VOLATILITY_RANGE.1),
    )?;
    let base = Price::new(rng.uniform(ENHANCED_BASE_RANGE.0, ENHANCED_BASE_RANGE.1))?;
    let bars = random_walk(&mut rng, ENHANCED_FUZZ_BARS, base, volatility);
    Ok((seed, volatility, base, bars))
}

fn enhanced_fuzz_round(oracle: &dyn Oracle, round: usize) -> Result<EnhancedFuzzRound> {
    let (seed, volatility, base, bars) = enhanced_round_inputs(round)?;
    let results = evaluate_all(oracle, &bars);
    debug!(seed, volatility = volatility.get(), base = base.get(), "Enhanced fuzz round built");
    Ok(EnhancedFuzzRound {
        seed,
        bars_count: bars.len(),
        volatility,
        base,
        bars,
        results,
    })
}

fn real_data_section(oracle: &dyn Oracle, quotes: &QuoteSource) -> BTreeMap<String, RealTickerData> {
    let provider = match quotes {
        QuoteSource::Available(p) => p,
        QuoteSource::Unavailable { reason } => {
            info!(%reason, "Quotes unavailable; real_data left empty");
            return BTreeMap::new();
        }
    };

    let mut section = BTreeMap::new();
    for ticker in REAL_DATA_TICKERS {
        match provider.fetch(ticker, REAL_DATA_RANGE) {
            Ok(bars) => {
                let results = evaluate_all(oracle, &bars);
                section.insert(
                    ticker.to_string(),
                    RealTickerData {
                        bar_count: bars.len(),
                        bars,
                        results,
                    },
                );
            }
            Err(e) => warn!(ticker, error = %e, "Skipping ticker"),
        }
    }
    section
}

/// Schema v2: edge cases, `config.enhanced_fuzz_rounds` heavy rounds, real quotes
pub fn build_enhanced_corpus(
    oracle: &dyn Oracle,
    quotes: &QuoteSource,
    config: &Config,
) -> Result<EnhancedCorpus> {
    info!(
        enhanced_fuzz_rounds = config.enhanced_fuzz_rounds,
        quotes = quotes.is_available(),
        "Building enhanced corpus"
    );

    let edge_cases = EdgeCase::ALL
        .iter()
        .map(|&case| {
            let bars = edge_case_bars(case);
            let results = evaluate_all(oracle, &bars);
            (case.name().to_string(), EdgeCaseData { bars, results })
        })
        .collect();

    let enhanced_fuzz = if config.parallel {
        (0..config.enhanced_fuzz_rounds)
            .into_par_iter()
            .map(|round| enhanced_fuzz_round(oracle, round))
            .collect::<Result<Vec<_>>>()?
    } else {
        (0..config.enhanced_fuzz_rounds)
            .map(|round| enhanced_fuzz_round(oracle, round))
            .collect::<Result<Vec<_>>>()?
    };

    Ok(EnhancedCorpus {
        version: CORPUS_V2,
        edge_cases,
        enhanced_fuzz,
        real_data: real_data_section(oracle, quotes),
    })
}

/// Every fixture keyed by name; failures become `{"error": ...}` entries
pub fn build_test_cases(
    oracle: &dyn Oracle,
    parallel: bool,
) -> BTreeMap<PatternFunction, FixtureOutcome> {
    let fixtures = if parallel {
        build_all_parallel(oracle)
    } else {
        build_all(oracle)
    };
    fixtures
        .into_iter()
        .map(|(function, outcome)| {
            let entry = match outcome {
                Ok(fixture) => FixtureOutcome::Fixture(fixture),
                Err(e) => FixtureOutcome::Failed {
                    error: e.to_string(),
                },
            };
            (function, entry)
        })
        .collect()
}

// ============================================================
// SERIALIZATION
// ============================================================

/// Serialize `value` once; compact unless `pretty`
pub fn write_json<W: Write, T: Serialize>(mut writer: W, value: &T, pretty: bool) -> Result<()> {
    if pretty {
        serde_json::to_writer_pretty(&mut writer, value)?;
    } else {
        serde_json::to_writer(&mut writer, value)?;
    }
    writer.flush()?;
    Ok(())
}

/// Write the pretty-printed test-case file, creating parent directories.
///
/// Returns how many entries were written.
pub fn export_test_cases(oracle: &dyn Oracle, path: &Path, parallel: bool) -> Result<usize> {
    let cases = build_test_cases(oracle, parallel);

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let file = fs::File::create(path)?;
    write_json(std::io::BufWriter::new(file), &cases, true)?;

    info!(path = %path.display(), entries = cases.len(), "Test cases exported");
    Ok(cases.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enhanced_inputs_deterministic() {
        let (seed, v, b, bars) = enhanced_round_inputs(0).unwrap();
        assert_eq!(seed, 1000);
        assert!((0.5..30.0).contains(&v.get()));
        assert!((10.0..5000.0).contains(&b.get()));
        assert_eq!(bars.len(), ENHANCED_FUZZ_BARS);
        assert_eq!(bars[0].open, b.get());

        let again = enhanced_round_inputs(0).unwrap();
        assert_eq!(again.3, bars);
        assert_ne!(enhanced_round_inputs(1).unwrap().3, bars);
    }

    #[test]
    fn test_edge_case_bars_reseeded_per_case() {
        for case in EdgeCase::ALL {
            let a = edge_case_bars(case);
            assert_eq!(a.len(), EDGE_CASE_BARS);
            assert_eq!(a, edge_case_bars(case));
        }
    }

    #[test]
    fn test_fixture_outcome_wire_format() {
        let failed = FixtureOutcome::Failed {
            error: "boom".into(),
        };
        assert_eq!(serde_json::to_string(&failed).unwrap(), r#"{"error":"boom"}"#);

        let back: FixtureOutcome = serde_json::from_str(r#"{"error":"boom"}"#).unwrap();
        assert_eq!(back, failed);
    }

    #[test]
    fn test_write_json_compact_and_pretty() {
        let mut map = BTreeMap::new();
        map.insert("a", 1);

        let mut compact = Vec::new();
        write_json(&mut compact, &map, false).unwrap();
        assert_eq!(compact, br#"{"a":1}"#);

        let mut pretty = Vec::new();
        write_json(&mut pretty, &map, true).unwrap();
        assert_eq!(String::from_utf8(pretty).unwrap(), "{\n  \"a\": 1\n}");
    }
}
