//! Subprocess oracle: one JSON request on stdin, one JSON response on stdout.

use std::collections::BTreeMap;
use std::io::Write;
use std::process::{Command, Stdio};

use serde::{Deserialize, Serialize};

use super::{check_shape, Oracle, OracleError, OracleStatus, PatternFunction, PriceSeries, Verdict};

/// Command used when nothing else is configured
pub const DEFAULT_ORACLE_COMMAND: &str = "python3 scripts/talib_oracle.py";

#[derive(Debug, Serialize)]
#[serde(tag = "op", rename_all = "lowercase")]
enum Request<'a> {
    List,
    Evaluate {
        functions: Vec<&'static str>,
        open: &'a [f64],
        high: &'a [f64],
        low: &'a [f64],
        close: &'a [f64],
    },
}

#[derive(Debug, Deserialize)]
struct EvaluateResponse {
    #[serde(default)]
    results: BTreeMap<String, Vec<Verdict>>,
    #[serde(default)]
    errors: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct ListResponse {
    functions: Vec<String>,
}

/// Oracle reached through an external bridge process
#[derive(Debug, Clone)]
pub struct ProcessOracle {
    program: String,
    args: Vec<String>,
}

impl ProcessOracle {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Split a command line into program and arguments.
    ///
    /// Words are separated by whitespace; single or double quotes keep a word
    /// with spaces together (`python3 "/opt/ta tools/bridge.py"`). No escapes
    /// and no shell expansion.
    pub fn from_command_line(command: &str) -> Result<Self, OracleError> {
        let mut parts = split_command(command)?.into_iter();
        let program = parts
            .next()
            .ok_or_else(|| OracleError::Unavailable("empty oracle command".into()))?;
        Ok(Self::new(program, parts.collect()))
    }

    pub fn command_line(&self) -> String {
        std::iter::once(&self.program)
            .chain(&self.args)
            .map(|word| {
                if word.is_empty() || word.contains(char::is_whitespace) {
                    format!("\"{word}\"")
                } else {
                    word.clone()
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Probe the bridge with a `list` request.
    ///
    /// Absence of the process, of the reference library, or of any known
    /// function all count as unavailable.
    pub fn connect(command: &str) -> OracleStatus<Self> {
        let oracle = match Self::from_command_line(command) {
            Ok(o) => o,
            Err(e) => return OracleStatus::Unavailable { reason: e.to_string() },
        };

        match oracle.functions() {
            Ok(names) => {
                let known = names
                    .iter()
                    .filter(|n| PatternFunction::from_name(n).is_some())
                    .count();
                if known == 0 {
                    return OracleStatus::Unavailable {
                        reason: format!("`{command}` exposes no candlestick functions"),
                    };
                }
                if known < PatternFunction::ALL.len() {
                    tracing::warn!(
                        known,
                        expected = PatternFunction::ALL.len(),
                        "Oracle exposes fewer functions than expected"
                    );
                }
                tracing::debug!(command, known, "Oracle available");
                OracleStatus::Available(oracle)
            }
            Err(e) => OracleStatus::Unavailable { reason: e.to_string() },
        }
    }

    fn call(&self, request: &Request<'_>) -> Result<Vec<u8>, OracleError> {
        let payload =
            serde_json::to_vec(request).map_err(|e| OracleError::Protocol(e.to_string()))?;

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| OracleError::Spawn {
                command: self.command_line(),
                source,
            })?;

        // The bridge reads all of stdin before writing anything. A bridge that
        // dies early closes the pipe; its exit status and stderr say why.
        let write_result = match child.stdin.take() {
            Some(mut stdin) => stdin.write_all(&payload),
            None => Ok(()),
        };

        let output = child
            .wait_with_output()
            .map_err(|e| OracleError::Protocol(format!("reading response: {e}")))?;

        if !output.status.success() {
            return Err(OracleError::Exit {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        write_result.map_err(|e| OracleError::Protocol(format!("writing request: {e}")))?;
        Ok(output.stdout)
    }
}

fn parse<T: serde::de::DeserializeOwned>(stdout: &[u8]) -> Result<T, OracleError> {
    serde_json::from_slice(stdout).map_err(|e| {
        let text = String::from_utf8_lossy(stdout);
        OracleError::Protocol(format!(
            "{e}; first 200 chars: {}",
            text.chars().take(200).collect::<String>()
        ))
    })
}

impl Oracle for ProcessOracle {
    fn evaluate(
        &self,
        function: PatternFunction,
        series: &PriceSeries,
    ) -> Result<Vec<Verdict>, OracleError> {
        self.evaluate_many(&[function], series)
            .pop()
            .map(|(_, r)| r)
            .unwrap_or_else(|| Err(OracleError::Protocol("empty response".into())))
    }

    /// One process per batch; per-function failures reported by the bridge stay isolated.
    fn evaluate_many(
        &self,
        functions: &[PatternFunction],
        series: &PriceSeries,
    ) -> Vec<(PatternFunction, Result<Vec<Verdict>, OracleError>)> {
        let fail_all = |e: OracleError| -> Vec<(PatternFunction, Result<Vec<Verdict>, OracleError>)> {
            let message = e.to_string();
            functions
                .iter()
                .map(|&f| {
                    (
                        f,
                        Err(OracleError::Function {
                            function: f,
                            message: message.clone(),
                        }),
                    )
                })
                .collect()
        };

        if let Err(e) = series.validate() {
            return fail_all(e);
        }

        let request = Request::Evaluate {
            functions: functions.iter().map(|f| f.name()).collect(),
            open: &series.open,
            high: &series.high,
            low: &series.low,
            close: &series.close,
        };

        let mut response: EvaluateResponse = match self.call(&request).and_then(|out| parse(&out)) {
            Ok(r) => r,
            Err(e) => return fail_all(e),
        };

        functions
            .iter()
            .map(|&f| {
                let verdicts = response.results.remove(f.name());
                let result = match (verdicts, response.errors.remove(f.name())) {
                    (Some(verdicts), _) => check_shape(f, series, verdicts),
                    (None, Some(message)) => Err(OracleError::Function { function: f, message }),
                    (None, None) => Err(OracleError::Function {
                        function: f,
                        message: "missing from oracle response".into(),
                    }),
                };
                (f, result)
            })
            .collect()
    }

    fn functions(&self) -> Result<Vec<String>, OracleError> {
        let out = self.call(&Request::List)?;
        let response: ListResponse = parse(&out)?;
        Ok(response.functions)
    }
}

fn split_command(command: &str) -> Result<Vec<String>, OracleError> {
    let mut words = Vec::new();
    let mut word = String::new();
    let mut in_word = false;
    let mut quote: Option<char> = None;

    for c in command.chars() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => word.push(c),
            None if c == '"' || c == '\'' => {
                quote = Some(c);
                in_word = true;
            }
            None if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut word));
                    in_word = false;
                }
            }
            None => {
                word.push(c);
                in_word = true;
            }
        }
    }

    if let Some(q) = quote {
        return Err(OracleError::Unavailable(format!(
            "unterminated {q} in oracle command `{command}`"
        )));
    }
    if in_word {
        words.push(word);
    }
    Ok(words)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_command_line() {
        let oracle = ProcessOracle::from_command_line("python3  scripts/talib_oracle.py").unwrap();
        assert_eq!(oracle.program, "python3");
        assert_eq!(oracle.args, vec!["scripts/talib_oracle.py"]);
        assert_eq!(oracle.command_line(), DEFAULT_ORACLE_COMMAND);

        assert!(ProcessOracle::from_command_line("   ").is_err());
    }

    #[test]
    fn test_from_command_line_quoted_path() {
        let oracle =
            ProcessOracle::from_command_line(r#"python3 "/opt/ta tools/bridge.py" --mode 'a b'"#)
                .unwrap();
        assert_eq!(oracle.program, "python3");
        assert_eq!(oracle.args, vec!["/opt/ta tools/bridge.py", "--mode", "a b"]);
        assert_eq!(
            oracle.command_line(),
            r#"python3 "/opt/ta tools/bridge.py" --mode "a b""#
        );

        let spaced = ProcessOracle::from_command_line(r#""/opt/my python/bin/python3" x.py"#).unwrap();
        assert_eq!(spaced.program, "/opt/my python/bin/python3");

        assert!(matches!(
            ProcessOracle::from_command_line(r#"python3 "scripts/oracle.py"#),
            Err(OracleError::Unavailable(_))
        ));
    }

    #[test]
    fn test_request_wire_format() {
        let list = serde_json::to_string(&Request::List).unwrap();
        assert_eq!(list, r#"{"op":"list"}"#);

        let eval = Request::Evaluate {
            functions: vec!["CDLDOJI"],
            open: &[1.0],
            high: &[2.0],
            low: &[0.5],
            close: &[1.0],
        };
        let json = serde_json::to_string(&eval).unwrap();
        assert_eq!(
            json,
            r#"{"op":"evaluate","functions":["CDLDOJI"],"open":[1.0],"high":[2.0],"low":[0.5],"close":[1.0]}"#
        );
    }

    #[test]
    fn test_response_parsing() {
        let r: EvaluateResponse =
            parse(br#"{"results":{"CDLDOJI":[0,100]},"errors":{"CDLHAMMER":"bad"}}"#).unwrap();
        assert_eq!(r.results["CDLDOJI"], vec![0, 100]);
        assert_eq!(r.errors["CDLHAMMER"], "bad");

        let r: EvaluateResponse = parse(br#"{"results":{}}"#).unwrap();
        assert!(r.errors.is_empty());

        assert!(matches!(
            parse::<ListResponse>(b"Traceback (most recent call last)"),
            Err(OracleError::Protocol(_))
        ));
    }

    #[test]
    fn test_missing_program_is_unavailable() {
        let status = ProcessOracle::connect("yacpd-no-such-oracle-binary --flag");
        assert!(!status.is_available());
    }

    #[test]
    fn test_spawn_failure_isolated_per_function() {
        let oracle = ProcessOracle::new("yacpd-no-such-oracle-binary", vec![]);
        let series = PriceSeries::from_bars(&[crate::Bar::flat(1.0); 3]);
        let out = oracle.evaluate_many(&[PatternFunction::Doji, PatternFunction::Hammer], &series);
        assert_eq!(out.len(), 2);
        assert!(out.iter().all(|(_, r)| matches!(r, Err(OracleError::Function { .. }))));
    }

    #[cfg(unix)]
    #[test]
    fn test_early_exit_keeps_bridge_stderr() {
        // Exits without reading stdin; the request is larger than a pipe buffer
        let oracle = ProcessOracle::new(
            "sh",
            vec![
                "-c".into(),
                "echo 'TA-Lib not available' >&2; exit 2".into(),
            ],
        );
        let request = Request::Evaluate {
            functions: vec!["CDLDOJI"],
            open: &[100.0; 20_000],
            high: &[101.0; 20_000],
            low: &[99.0; 20_000],
            close: &[100.5; 20_000],
        };

        match oracle.call(&request) {
            Err(OracleError::Exit { status, stderr }) => {
                assert!(status.contains('2'), "{status}");
                assert_eq!(stderr, "TA-Lib not available");
            }
            other => panic!("expected exit error, got {other:?}"),
        }

        let series = PriceSeries::from_bars(&[crate::Bar::flat(1.0); 20_000]);
        let out = oracle.evaluate(PatternFunction::Doji, &series);
        assert!(out.unwrap_err().to_string().contains("TA-Lib not available"));
    }
}
