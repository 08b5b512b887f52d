//! Trend and flat context sequences
//!
//! These are the leading context most fixtures sit on: each bar is a fixed
//! offset pattern around a base that drifts by `step` per bar.

use crate::Bar;

/// Default start price for trend context
pub const TREND_START: f64 = 100.0;
/// Default per-bar drift
pub const TREND_STEP: f64 = 3.0;

/// Rising base; every candle is white with body 2 and range 4.
pub fn uptrend(n: usize, start: f64, step: f64) -> Vec<Bar> {
    (0..n)
        .map(|i| {
            let base = start + i as f64 * step;
            Bar::new(base - 1.0, base + 2.0, base - 2.0, base + 1.0)
        })
        .collect()
}

/// Falling base; every candle is black with body 2.5 and range 4.
pub fn downtrend(n: usize, start: f64, step: f64) -> Vec<Bar> {
    (0..n)
        .map(|i| {
            let base = start - i as f64 * step;
            Bar::new(base + 2.0, base + 3.0, base - 1.0, base - 0.5)
        })
        .collect()
}

/// Constant base with wide shadows; a non-trending background.
pub fn sideways(n: usize, base: f64) -> Vec<Bar> {
    vec![Bar::new(base - 2.0, base + 4.0, base - 4.0, base + 2.0); n]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::OHLCVExt;

    #[test]
    fn test_uptrend_shape() {
        let bars = uptrend(10, TREND_START, TREND_STEP);
        assert_eq!(bars.len(), 10);
        assert_eq!(bars[0], Bar::new(99.0, 102.0, 98.0, 101.0));
        assert_eq!(bars[9], Bar::new(126.0, 129.0, 125.0, 128.0));
        assert!(bars.iter().all(|b| b.is_bullish() && b.is_well_formed()));
        assert!(bars.windows(2).all(|w| w[1].close > w[0].close));
    }

    #[test]
    fn test_downtrend_shape() {
        let bars = downtrend(15, TREND_START, TREND_STEP);
        assert_eq!(bars.len(), 15);
        assert_eq!(bars[0], Bar::new(102.0, 103.0, 99.0, 99.5));
        assert_eq!(bars[14], Bar::new(60.0, 61.0, 57.0, 57.5));
        assert!(bars.iter().all(|b| b.is_bearish() && b.is_well_formed()));
        assert!(bars.windows(2).all(|w| w[1].close < w[0].close));
    }

    #[test]
    fn test_sideways_is_constant() {
        let bars = sideways(10, 100.0);
        assert!(bars.iter().all(|b| *b == Bar::new(98.0, 104.0, 96.0, 102.0)));
    }

    #[test]
    fn test_empty() {
        assert!(uptrend(0, 100.0, 3.0).is_empty());
        assert!(sideways(0, 100.0).is_empty());
    }
}
