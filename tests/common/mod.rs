//! Shared in-process oracle doubles and quote stubs.

#![allow(dead_code)]

use std::collections::HashMap;

use yacpd_fixtures::prelude::*;

pub type OracleFn = fn(PatternFunction, &PriceSeries) -> std::result::Result<Vec<Verdict>, OracleError>;

/// Fires on the last bar with the direction of its body.
/// CDLDOJI instead fires on every bar whose body is at most 10% of its range.
pub fn scripted(function: PatternFunction, series: &PriceSeries) -> std::result::Result<Vec<Verdict>, OracleError> {
    let n = series.len();
    if function == PatternFunction::Doji {
        return Ok((0..n)
            .map(|i| {
                let body = (series.close[i] - series.open[i]).abs();
                let range = series.high[i] - series.low[i];
                if body <= 0.1 * range {
                    100
                } else {
                    0
                }
            })
            .collect());
    }

    let mut verdicts = vec![0; n];
    if let Some(last) = n.checked_sub(1) {
        verdicts[last] = if series.close[last] >= series.open[last] {
            100
        } else {
            -100
        };
    }
    Ok(verdicts)
}

/// Never detects anything
pub fn quiet(_: PatternFunction, series: &PriceSeries) -> std::result::Result<Vec<Verdict>, OracleError> {
    Ok(vec![0; series.len()])
}

/// Fires on every bar
pub fn noisy(_: PatternFunction, series: &PriceSeries) -> std::result::Result<Vec<Verdict>, OracleError> {
    Ok(vec![100; series.len()])
}

/// [`scripted`], except CDLHIKKAKE and CDLTRISTAR always fail
pub fn partly_broken(
    function: PatternFunction,
    series: &PriceSeries,
) -> std::result::Result<Vec<Verdict>, OracleError> {
    match function {
        PatternFunction::Hikkake | PatternFunction::Tristar => Err(OracleError::Function {
            function,
            message: "simulated failure".into(),
        }),
        _ => scripted(function, series),
    }
}

pub fn oracle(f: OracleFn) -> FnOracle<OracleFn> {
    FnOracle::new(f)
}

/// Quote provider backed by a fixed table; unknown tickers fail
pub struct StubQuotes {
    pub bars: HashMap<&'static str, Vec<Bar>>,
}

impl StubQuotes {
    pub fn with(ticker: &'static str, bars: Vec<Bar>) -> Self {
        let mut table = HashMap::new();
        table.insert(ticker, bars);
        Self { bars: table }
    }

    pub fn into_source(self) -> QuoteSource {
        QuoteSource::Available(Box::new(self))
    }
}

impl QuoteProvider for StubQuotes {
    fn fetch(&self, ticker: &str, _range: &str) -> std::result::Result<Vec<Bar>, QuoteError> {
        self.bars
            .get(ticker)
            .cloned()
            .ok_or_else(|| QuoteError::Shape(format!("no data for {ticker}")))
    }
}

/// `n` bars of a seeded random walk around 400
pub fn market_bars(n: usize) -> Vec<Bar> {
    let mut rng = SeedStream::new(7);
    random_walk(&mut rng, n, Price::new_const(400.0), Volatility::new_const(4.0))
}
