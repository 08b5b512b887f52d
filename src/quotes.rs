//! Real market quotes
//!
//! Optional capability used by the real-data tier and the `real_data` section
//! of the enhanced corpus. Absence is an explicit [`QuoteSource::Unavailable`]
//! value; callers skip, they never fail the run.

use std::time::Duration;

use reqwest::blocking::Client;
use serde::Deserialize;
use tracing::debug;

use crate::Bar;

/// Yahoo Finance v8 chart endpoint
pub const DEFAULT_QUOTES_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors raised while fetching or decoding quotes
#[derive(Debug, thiserror::Error)]
pub enum QuoteError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{ticker}: server answered {status}")]
    Status { ticker: String, status: u16 },

    #[error("Unexpected quote payload: {0}")]
    Shape(String),

    #[error("{ticker}: {got} bars, need at least {min}")]
    Insufficient {
        ticker: String,
        got: usize,
        min: usize,
    },
}

/// Daily OHLC history for a ticker
pub trait QuoteProvider: Send + Sync {
    /// `range` uses the provider's own vocabulary (`"6mo"`, `"20y"`)
    fn fetch(&self, ticker: &str, range: &str) -> Result<Vec<Bar>, QuoteError>;
}

/// Quote capability as resolved at startup
pub enum QuoteSource {
    Available(Box<dyn QuoteProvider>),
    Unavailable { reason: String },
}

impl QuoteSource {
    pub fn unavailable(reason: impl Into<String>) -> Self {
        QuoteSource::Unavailable {
            reason: reason.into(),
        }
    }

    /// Yahoo-backed source; a client that cannot be built counts as unavailable
    pub fn yahoo(base_url: &str, timeout: Duration) -> Self {
        match YahooQuotes::new(base_url, timeout) {
            Ok(q) => QuoteSource::Available(Box::new(q)),
            Err(e) => Self::unavailable(e.to_string()),
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, QuoteSource::Available(_))
    }
}

/// Reject a history shorter than `min` bars
pub fn require_bars(ticker: &str, bars: Vec<Bar>, min: usize) -> Result<Vec<Bar>, QuoteError> {
    if bars.len() < min {
        return Err(QuoteError::Insufficient {
            ticker: ticker.to_string(),
            got: bars.len(),
            min,
        });
    }
    Ok(bars)
}

// ============================================================
// YAHOO ADAPTER
// ============================================================

pub struct YahooQuotes {
    client: Client,
    base_url: String,
}

impl YahooQuotes {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, QuoteError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent("Mozilla/5.0 (yacpd-fixtures)")
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

impl QuoteProvider for YahooQuotes {
    fn fetch(&self, ticker: &str, range: &str) -> Result<Vec<Bar>, QuoteError> {
        let url = format!("{}/{}", self.base_url, ticker);
        debug!(%url, range, "Fetching quotes");

        let response = self
            .client
            .get(&url)
            .query(&[("range", range), ("interval", "1d")])
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(QuoteError::Status {
                ticker: ticker.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text()?;
        let bars = parse_chart(&body)?;
        debug!(ticker, bars = bars.len(), "Fetched quotes");
        Ok(bars)
    }
}

#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    result: Option<Vec<ChartResult>>,
    error: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<QuoteTable>,
}

#[derive(Debug, Deserialize)]
struct QuoteTable {
    open: Vec<Option<f64>>,
    high: Vec<Option<f64>>,
    low: Vec<Option<f64>>,
    close: Vec<Option<f64>>,
}

/// Flatten a v8 chart payload into bars.
///
/// Rows with any missing OHLC value (holidays, halted sessions) are dropped.
pub fn parse_chart(body: &str) -> Result<Vec<Bar>, QuoteError> {
    let envelope: ChartEnvelope =
        serde_json::from_str(body).map_err(|e| QuoteError::Shape(e.to_string()))?;

    if let Some(err) = envelope.chart.error.filter(|e| !e.is_null()) {
        return Err(QuoteError::Shape(format!("chart error: {err}")));
    }

    let table = envelope
        .chart
        .result
        .and_then(|r| r.into_iter().next())
        .and_then(|r| r.indicators.quote.into_iter().next())
        .ok_or_else(|| QuoteError::Shape("no quote table in chart result".into()))?;

    let n = table.open.len();
    if table.high.len() != n || table.low.len() != n || table.close.len() != n {
        return Err(QuoteError::Shape("quote columns differ in length".into()));
    }

    let bars = (0..n)
        .filter_map(|i| {
            Some(Bar::new(
                table.open[i]?,
                table.high[i]?,
                table.low[i]?,
                table.close[i]?,
            ))
        })
        .collect();
    Ok(bars)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_chart_drops_null_rows() {
        let body = r#"{"chart":{"result":[{"meta":{"symbol":"SPY"},"timestamp":[1,2,3],
            "indicators":{"quote":[{"open":[1.0,null,3.0],"high":[2.0,2.5,4.0],
            "low":[0.5,1.0,2.5],"close":[1.5,2.0,3.5],"volume":[10,20,30]}]}}],"error":null}}"#;
        let bars = parse_chart(body).unwrap();
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0], Bar::new(1.0, 2.0, 0.5, 1.5));
        assert_eq!(bars[1], Bar::new(3.0, 4.0, 2.5, 3.5));
    }

    #[test]
    fn test_parse_chart_error_payload() {
        let body = r#"{"chart":{"result":null,"error":{"code":"Not Found","description":"No data found"}}}"#;
        assert!(matches!(parse_chart(body), Err(QuoteError::Shape(_))));
    }

    #[test]
    fn test_parse_chart_ragged_columns() {
        let body = r#"{"chart":{"result":[{"indicators":{"quote":[{"open":[1.0],"high":[2.0,3.0],
            "low":[0.5],"close":[1.5]}]}}],"error":null}}"#;
        assert!(matches!(parse_chart(body), Err(QuoteError::Shape(_))));
    }

    #[test]
    fn test_parse_chart_garbage() {
        assert!(matches!(parse_chart("<html>"), Err(QuoteError::Shape(_))));
    }

    #[test]
    fn test_require_bars() {
        assert!(require_bars("SPY", vec![Bar::flat(1.0); 50], 50).is_ok());
        assert!(matches!(
            require_bars("SPY", vec![Bar::flat(1.0); 49], 50),
            Err(QuoteError::Insufficient { got: 49, min: 50, .. })
        ));
    }

    #[test]
    fn test_unavailable_source() {
        let source = QuoteSource::unavailable("offline");
        assert!(!source.is_available());
    }
}
