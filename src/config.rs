//! Runtime configuration
//!
//! Everything comes from the environment with a default; the CLI overlays its
//! flags on top. A value that does not parse falls back to its default with a
//! warning instead of aborting the run.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::oracle::process::DEFAULT_ORACLE_COMMAND;
use crate::quotes::{DEFAULT_QUOTES_URL, DEFAULT_TIMEOUT};
use crate::{FixtureError, Result};

pub const DEFAULT_FUZZ_ROUNDS: usize = 10;
pub const DEFAULT_ENHANCED_FUZZ_ROUNDS: usize = 100;
pub const DEFAULT_OUTPUT_PATH: &str = "tests/talib_test_cases.json";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Compact corpus fuzz rounds (`YACPD_FUZZ_ROUNDS`)
    pub fuzz_rounds: usize,
    /// Enhanced corpus fuzz rounds (`YACPD_ENHANCED_FUZZ_ROUNDS`)
    pub enhanced_fuzz_rounds: usize,
    /// Oracle bridge command line (`YACPD_ORACLE_CMD`). Quote words that
    /// contain spaces; there is no other shell syntax.
    pub oracle_command: String,
    /// Chart endpoint (`YACPD_QUOTES_URL`)
    pub quotes_url: String,
    pub quotes_timeout: Duration,
    /// Disable the quote capability (`YACPD_OFFLINE`)
    pub offline: bool,
    /// Destination of the `--export` file
    pub output_path: PathBuf,
    /// Build fixtures and fuzz rounds on the rayon pool
    pub parallel: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            fuzz_rounds: DEFAULT_FUZZ_ROUNDS,
            enhanced_fuzz_rounds: DEFAULT_ENHANCED_FUZZ_ROUNDS,
            oracle_command: DEFAULT_ORACLE_COMMAND.to_string(),
            quotes_url: DEFAULT_QUOTES_URL.to_string(),
            quotes_timeout: DEFAULT_TIMEOUT,
            offline: false,
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            parallel: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build from any key lookup; `from_env` passes the process environment
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let d = Self::default();
        Self {
            fuzz_rounds: lookup_usize(&lookup, "YACPD_FUZZ_ROUNDS", d.fuzz_rounds),
            enhanced_fuzz_rounds: lookup_usize(
                &lookup,
                "YACPD_ENHANCED_FUZZ_ROUNDS",
                d.enhanced_fuzz_rounds,
            ),
            oracle_command: lookup_str(&lookup, "YACPD_ORACLE_CMD", &d.oracle_command),
            quotes_url: lookup_str(&lookup, "YACPD_QUOTES_URL", &d.quotes_url),
            offline: lookup_bool(&lookup, "YACPD_OFFLINE", d.offline),
            ..d
        }
    }
}

fn lookup_str<F: Fn(&str) -> Option<String>>(lookup: &F, name: &str, default: &str) -> String {
    lookup(name)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn lookup_usize<F: Fn(&str) -> Option<String>>(lookup: &F, name: &str, default: usize) -> usize {
    match lookup(name).map(|s| s.trim().to_string()) {
        None => default,
        Some(s) if s.is_empty() => default,
        Some(s) => parse_usize(name, &s).unwrap_or_else(|e| {
            tracing::warn!(error = %e, default, "Using default");
            default
        }),
    }
}

fn parse_usize(name: &str, raw: &str) -> Result<usize> {
    raw.parse()
        .map_err(|e| FixtureError::InvalidConfig(format!("{name}={raw:?}: {e}")))
}

fn lookup_bool<F: Fn(&str) -> Option<String>>(lookup: &F, name: &str, default: bool) -> bool {
    lookup(name)
        .map(|s| matches!(s.trim().to_lowercase().as_str(), "1" | "true" | "yes" | "y" | "on"))
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|k| vars.get(k).cloned())
    }

    #[test]
    fn test_parse_usize_reports_variable() {
        assert_eq!(parse_usize("YACPD_FUZZ_ROUNDS", "12").unwrap(), 12);
        match parse_usize("YACPD_FUZZ_ROUNDS", "ten") {
            Err(FixtureError::InvalidConfig(msg)) => {
                assert!(msg.starts_with("YACPD_FUZZ_ROUNDS=\"ten\""), "{msg}")
            }
            other => panic!("expected invalid config, got {other:?}"),
        }
    }

    #[test]
    fn test_defaults() {
        let c = config_from(&[]);
        assert_eq!(c, Config::default());
        assert_eq!(c.fuzz_rounds, 10);
        assert_eq!(c.enhanced_fuzz_rounds, 100);
        assert_eq!(c.output_path, PathBuf::from("tests/talib_test_cases.json"));
    }

    #[test]
    fn test_overrides() {
        let c = config_from(&[
            ("YACPD_FUZZ_ROUNDS", "3"),
            ("YACPD_ENHANCED_FUZZ_ROUNDS", " 0 "),
            ("YACPD_ORACLE_CMD", "conda run -n trade python3 scripts/talib_oracle.py"),
            ("YACPD_OFFLINE", "yes"),
        ]);
        assert_eq!(c.fuzz_rounds, 3);
        assert_eq!(c.enhanced_fuzz_rounds, 0);
        assert!(c.oracle_command.starts_with("conda run"));
        assert!(c.offline);
        assert_eq!(c.quotes_url, DEFAULT_QUOTES_URL);
    }

    #[test]
    fn test_invalid_numbers_fall_back() {
        let c = config_from(&[("YACPD_FUZZ_ROUNDS", "ten"), ("YACPD_ENHANCED_FUZZ_ROUNDS", "-1")]);
        assert_eq!(c.fuzz_rounds, DEFAULT_FUZZ_ROUNDS);
        assert_eq!(c.enhanced_fuzz_rounds, DEFAULT_ENHANCED_FUZZ_ROUNDS);
    }
}
