//! Four- and five-candle fixtures (8)

use super::{after_downtrend, after_sideways, after_uptrend};
use crate::Bar;

pub fn three_line_strike() -> Vec<Bar> {
    after_downtrend(
        10,
        &[
            Bar::new(72.0, 73.0, 68.0, 69.0),
            Bar::new(69.0, 70.0, 65.0, 66.0),
            Bar::new(66.0, 67.0, 62.0, 63.0),
            // One white candle wiping out all three
            Bar::new(62.0, 74.0, 61.0, 73.0),
        ],
    )
}

pub fn breakaway() -> Vec<Bar> {
    after_downtrend(
        10,
        &[
            Bar::new(72.0, 73.0, 65.0, 66.0),
            Bar::new(64.0, 65.0, 62.0, 63.0),
            Bar::new(63.0, 64.0, 61.0, 62.0),
            Bar::new(62.0, 63.0, 60.0, 61.0),
            Bar::new(60.0, 70.0, 59.0, 69.0),
        ],
    )
}

/// Four black candles: two marubozu, an inverted hammer gapping down, then an engulfing black
pub fn concealing_baby_swallow() -> Vec<Bar> {
    after_downtrend(
        10,
        &[
            Bar::new(72.0, 72.0, 65.0, 65.0),
            Bar::new(65.0, 65.0, 58.0, 58.0),
            Bar::new(56.0, 60.0, 52.0, 53.0),
            Bar::new(54.0, 57.0, 50.0, 51.0),
        ],
    )
}

/// Inside bar, false breakdown, then confirmation above the inside bar's high
pub fn hikkake() -> Vec<Bar> {
    after_sideways(
        10,
        &[
            Bar::new(99.0, 101.0, 99.0, 100.0),
            Bar::new(99.5, 100.5, 99.2, 99.8),
            Bar::new(99.5, 99.8, 98.0, 98.5),
            Bar::new(98.5, 102.0, 98.0, 101.5),
            Bar::new(101.0, 103.0, 100.5, 102.5),
        ],
    )
}

/// Two nested inside bars before the false breakdown
pub fn hikkake_mod() -> Vec<Bar> {
    after_sideways(
        10,
        &[
            Bar::new(99.0, 101.0, 99.0, 100.0),
            Bar::new(99.5, 100.5, 99.2, 99.8),
            Bar::new(99.5, 100.2, 99.3, 99.5),
            Bar::new(99.5, 99.8, 98.0, 98.5),
            Bar::new(98.5, 102.0, 98.0, 101.5),
        ],
    )
}

pub fn ladder_bottom() -> Vec<Bar> {
    after_downtrend(
        10,
        &[
            Bar::new(72.0, 73.0, 68.0, 69.0),
            Bar::new(69.0, 70.0, 65.0, 66.0),
            Bar::new(66.0, 67.0, 62.0, 63.0),
            Bar::new(63.0, 64.0, 56.0, 60.0),
            Bar::new(61.0, 68.0, 60.0, 67.0),
        ],
    )
}

pub fn mat_hold() -> Vec<Bar> {
    after_uptrend(
        10,
        &[
            Bar::new(128.0, 136.0, 127.0, 135.0),
            Bar::new(134.0, 135.0, 132.0, 133.0),
            Bar::new(133.0, 134.0, 131.0, 132.0),
            Bar::new(132.0, 133.0, 130.0, 131.0),
            Bar::new(132.0, 142.0, 131.0, 141.0),
        ],
    )
}

pub fn rise_fall_three_methods() -> Vec<Bar> {
    after_uptrend(
        10,
        &[
            Bar::new(128.0, 138.0, 127.0, 137.0),
            Bar::new(136.0, 137.0, 133.0, 134.0),
            Bar::new(134.0, 135.0, 131.0, 132.0),
            Bar::new(132.0, 133.0, 129.0, 130.0),
            Bar::new(131.0, 145.0, 130.0, 144.0),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lengths() {
        assert_eq!(three_line_strike().len(), 14);
        assert_eq!(concealing_baby_swallow().len(), 14);
        for bars in [breakaway(), hikkake(), hikkake_mod(), ladder_bottom(), mat_hold()] {
            assert_eq!(bars.len(), 15);
        }
    }

    #[test]
    fn test_hikkake_inside_bar() {
        let bars = hikkake();
        let (mother, inside) = (bars[10], bars[11]);
        assert!(inside.high < mother.high && inside.low > mother.low);
    }

    #[test]
    fn test_rising_methods_holds_above_first_low() {
        let bars = rise_fall_three_methods();
        let first = bars[10];
        assert!(bars[11..14].iter().all(|b| b.low > first.low));
        assert!(bars[14].close > first.close);
    }
}
