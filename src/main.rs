//! yacpd-fixtures: TA-Lib reference corpus generator and validation runner
//!
//! ```bash
//! # All tiers plus a summary
//! yacpd-fixtures
//!
//! # Compact corpus (schema v1) on stdout, for tests/talib_crossval.rs
//! YACPD_FUZZ_ROUNDS=20 yacpd-fixtures --export-json > corpus_v1.json
//!
//! # Enhanced corpus (schema v2) without network access
//! yacpd-fixtures --export-enhanced-json --offline > corpus_v2.json
//! ```

use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgGroup, Parser};
use tracing::Level;

use yacpd_fixtures::config::Config;
use yacpd_fixtures::export::{
    build_compact_corpus, build_enhanced_corpus, export_test_cases, write_json,
};
use yacpd_fixtures::logging::init_logging;
use yacpd_fixtures::oracle::{Oracle, ProcessOracle};
use yacpd_fixtures::quotes::QuoteSource;
use yacpd_fixtures::validation::{
    run_all, run_fuzz, run_negative, run_positive, run_real_data, DEFAULT_FUZZ_ITERATIONS,
};

/// Deterministic TA-Lib fixture corpus for YACPD cross-validation
#[derive(Parser, Debug)]
#[command(name = "yacpd-fixtures", version)]
#[command(about = "Build and validate the TA-Lib candlestick reference corpus")]
#[command(group(
    ArgGroup::new("mode")
        .args(["positive", "negative", "fuzz", "real", "export", "export_json", "export_enhanced_json", "list"])
        .multiple(false)
))]
struct Args {
    /// Run only the positive tier
    #[arg(long)]
    positive: bool,

    /// Run only the negative tier
    #[arg(long)]
    negative: bool,

    /// Run only the fuzz tier (100 rounds)
    #[arg(long)]
    fuzz: bool,

    /// Run only the real-data tier
    #[arg(long)]
    real: bool,

    /// Write all fixtures to a pretty-printed JSON file
    #[arg(long)]
    export: bool,

    /// Print the compact corpus (schema v1) to stdout
    #[arg(long)]
    export_json: bool,

    /// Print the enhanced corpus (schema v2) to stdout
    #[arg(long)]
    export_enhanced_json: bool,

    /// List the candlestick functions the oracle exposes
    #[arg(long)]
    list: bool,

    /// Destination for --export
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Oracle bridge command line; quote paths that contain spaces
    #[arg(long, env = "YACPD_ORACLE_CMD", value_name = "CMD")]
    oracle_cmd: Option<String>,

    /// Build fixtures and fuzz rounds in parallel
    #[arg(long)]
    parallel: bool,

    /// Never touch the network; real-data sections are skipped
    #[arg(long)]
    offline: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    All,
    Positive,
    Negative,
    Fuzz,
    Real,
    Export,
    ExportJson,
    ExportEnhancedJson,
    List,
}

impl Mode {
    /// Stdout carries a JSON document, so keep the log quiet
    fn is_export(self) -> bool {
        matches!(self, Mode::ExportJson | Mode::ExportEnhancedJson | Mode::Export)
    }

    fn needs_quotes(self) -> bool {
        matches!(self, Mode::All | Mode::Real | Mode::ExportEnhancedJson)
    }
}

impl Args {
    fn mode(&self) -> Mode {
        match self {
            a if a.export_enhanced_json => Mode::ExportEnhancedJson,
            a if a.export_json => Mode::ExportJson,
            a if a.list => Mode::List,
            a if a.export => Mode::Export,
            a if a.positive => Mode::Positive,
            a if a.negative => Mode::Negative,
            a if a.fuzz => Mode::Fuzz,
            a if a.real => Mode::Real,
            _ => Mode::All,
        }
    }

    fn apply(&self, config: &mut Config) {
        if let Some(output) = &self.output {
            config.output_path = output.clone();
        }
        if let Some(cmd) = &self.oracle_cmd {
            config.oracle_command = cmd.clone();
        }
        config.parallel |= self.parallel;
        config.offline |= self.offline;
    }
}

fn quote_source(config: &Config) -> QuoteSource {
    if config.offline {
        QuoteSource::unavailable("offline mode")
    } else {
        QuoteSource::yahoo(&config.quotes_url, config.quotes_timeout)
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let mode = args.mode();

    init_logging(if mode.is_export() { Level::WARN } else { Level::INFO });

    let mut config = Config::from_env();
    args.apply(&mut config);
    tracing::debug!(?mode, ?config, "Starting");

    let oracle = ProcessOracle::connect(&config.oracle_command)
        .into_result()
        .with_context(|| {
            format!(
                "TA-Lib oracle not available via `{}` (install TA-Lib: pip install TA-Lib)",
                config.oracle_command
            )
        })?;

    let quotes = if mode.needs_quotes() {
        quote_source(&config)
    } else {
        QuoteSource::unavailable("not needed")
    };

    let parallel = config.parallel;
    match mode {
        Mode::ExportEnhancedJson => {
            let corpus = build_enhanced_corpus(&oracle, &quotes, &config)?;
            write_json(io::stdout().lock(), &corpus, false)
                .context("Failed to write enhanced corpus")?;
        }
        Mode::ExportJson => {
            let corpus = build_compact_corpus(&oracle, &config);
            write_json(io::stdout().lock(), &corpus, false)
                .context("Failed to write compact corpus")?;
        }
        Mode::Export => {
            export_test_cases(&oracle, &config.output_path, parallel).with_context(|| {
                format!("Failed to export to {}", config.output_path.display())
            })?;
            println!("Test cases exported to: {}", config.output_path.display());
        }
        Mode::List => {
            let mut names = oracle.functions().context("Oracle could not list functions")?;
            names.sort();
            println!("\nTA-Lib CDL Functions ({} total):", names.len());
            for name in names {
                println!("  - {name}");
            }
        }
        Mode::Positive => print!("{}", run_positive(&oracle, parallel)),
        Mode::Negative => print!("{}", run_negative(&oracle)),
        Mode::Fuzz => print!("{}", run_fuzz(&oracle, DEFAULT_FUZZ_ITERATIONS, parallel)),
        Mode::Real => print!("{}", run_real_data(&oracle, &quotes)),
        Mode::All => {
            let report = run_all(&oracle, &quotes, parallel);
            print!("{}", report.positive);
            print!("{}", report.negative);
            print!("{}", report.fuzz);
            print!("{}", report.real_data);
            print!("{}", report.summary());
        }
    }

    Ok(())
}
