//! Two-candle fixtures (15)

use super::{after_downtrend, after_sideways, after_uptrend};
use crate::Bar;

pub fn counterattack() -> Vec<Bar> {
    after_downtrend(
        10,
        &[
            Bar::new(72.0, 73.0, 65.0, 66.0),
            // Gaps far down, rallies back to the prior close
            Bar::new(60.0, 67.0, 59.0, 66.0),
        ],
    )
}

pub fn dark_cloud_cover() -> Vec<Bar> {
    after_uptrend(
        10,
        &[
            Bar::new(118.0, 122.0, 117.0, 121.0),
            // Opens above the prior high, closes below the prior midpoint
            Bar::new(123.0, 124.0, 118.0, 119.0),
        ],
    )
}

pub fn doji_star() -> Vec<Bar> {
    after_downtrend(
        10,
        &[
            Bar::new(72.0, 73.0, 65.0, 66.0),
            Bar::new(63.0, 64.0, 62.0, 63.0),
        ],
    )
}

/// Bullish engulfing after a decline
pub fn engulfing() -> Vec<Bar> {
    after_downtrend(
        10,
        &[
            Bar::new(80.0, 81.0, 79.0, 79.5),
            Bar::new(79.0, 82.0, 78.0, 81.5),
        ],
    )
}

pub fn harami() -> Vec<Bar> {
    after_downtrend(
        10,
        &[
            Bar::new(82.0, 83.0, 78.0, 79.0),
            Bar::new(79.5, 80.5, 79.0, 80.0),
        ],
    )
}

pub fn harami_cross() -> Vec<Bar> {
    after_downtrend(
        10,
        &[
            Bar::new(72.0, 73.0, 65.0, 66.0),
            Bar::new(69.0, 70.0, 68.0, 69.0),
        ],
    )
}

/// Two black candles, the second inside the first's body
pub fn homing_pigeon() -> Vec<Bar> {
    after_downtrend(
        10,
        &[
            Bar::new(72.0, 73.0, 65.0, 66.0),
            Bar::new(70.0, 71.0, 67.0, 68.0),
        ],
    )
}

pub fn in_neck() -> Vec<Bar> {
    after_downtrend(
        10,
        &[
            Bar::new(72.0, 73.0, 65.0, 66.0),
            // Closes a hair above the prior close
            Bar::new(64.0, 66.3, 63.0, 66.2),
        ],
    )
}

/// Black marubozu then a white marubozu gapping above it
pub fn kicking() -> Vec<Bar> {
    after_sideways(
        10,
        &[
            Bar::new(110.0, 110.0, 100.0, 100.0),
            Bar::new(112.0, 122.0, 112.0, 122.0),
        ],
    )
}

pub fn kicking_by_length() -> Vec<Bar> {
    after_sideways(
        10,
        &[
            Bar::new(110.0, 110.0, 102.0, 102.0),
            Bar::new(112.0, 125.0, 112.0, 125.0),
        ],
    )
}

pub fn matching_low() -> Vec<Bar> {
    after_downtrend(
        10,
        &[
            Bar::new(72.0, 73.0, 65.0, 66.0),
            Bar::new(70.0, 71.0, 65.0, 66.0),
        ],
    )
}

pub fn on_neck() -> Vec<Bar> {
    after_downtrend(
        10,
        &[
            Bar::new(72.0, 73.0, 65.0, 66.0),
            Bar::new(64.0, 66.0, 63.0, 65.0),
        ],
    )
}

pub fn piercing() -> Vec<Bar> {
    after_downtrend(
        10,
        &[
            Bar::new(82.0, 83.0, 78.0, 79.0),
            Bar::new(77.0, 82.0, 76.0, 81.0),
        ],
    )
}

pub fn separating_lines() -> Vec<Bar> {
    after_uptrend(
        10,
        &[
            Bar::new(128.0, 129.0, 123.0, 124.0),
            // Same open, opposite color
            Bar::new(128.0, 135.0, 127.0, 134.0),
        ],
    )
}

pub fn thrusting() -> Vec<Bar> {
    after_downtrend(
        10,
        &[
            Bar::new(72.0, 73.0, 65.0, 66.0),
            Bar::new(64.0, 69.0, 63.0, 68.0),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::OHLCVExt;

    fn tail(bars: &[Bar]) -> (Bar, Bar) {
        let n = bars.len();
        (bars[n - 2], bars[n - 1])
    }

    #[test]
    fn test_engulfing_body_covers_prior_body() {
        let (first, second) = tail(&engulfing());
        assert!(first.is_bearish() && second.is_bullish());
        assert!(second.open <= first.close && second.close >= first.open);
    }

    #[test]
    fn test_harami_inside_prior_body() {
        let (first, second) = tail(&harami());
        assert!(second.open.min(second.close) > first.close);
        assert!(second.open.max(second.close) < first.open);
    }

    #[test]
    fn test_kicking_gap() {
        let (first, second) = tail(&kicking());
        assert!(second.low > first.high);
    }
}
