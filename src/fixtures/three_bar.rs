//! Three-candle fixtures (21)

use super::{after_downtrend, after_uptrend};
use crate::Bar;

pub fn two_crows() -> Vec<Bar> {
    after_uptrend(
        10,
        &[
            Bar::new(128.0, 135.0, 127.0, 134.0),
            // Gaps up, closes lower but above the white body
            Bar::new(136.0, 137.0, 132.0, 133.0),
            // Opens inside the first crow, closes inside the white body
            Bar::new(134.0, 135.0, 129.0, 130.0),
        ],
    )
}

/// Flat base, a five-bar white staircase, then three long black candles.
///
/// The staircase gives the crows a prior advance to reverse.
pub fn three_black_crows() -> Vec<Bar> {
    let mut bars = vec![Bar::new(100.0, 105.0, 95.0, 102.0); 10];
    bars.extend((0..5).map(|i| {
        let step = 8.0 * i as f64;
        Bar::new(102.0 + step, 108.0 + step, 100.0 + step, 105.0 + step)
    }));
    bars.extend_from_slice(&[
        Bar::new(135.0, 137.0, 125.0, 125.0),
        Bar::new(127.0, 128.0, 115.0, 115.0),
        Bar::new(118.0, 119.0, 105.0, 105.0),
    ]);
    bars
}

pub fn three_inside() -> Vec<Bar> {
    after_downtrend(
        10,
        &[
            Bar::new(72.0, 73.0, 66.0, 67.0),
            Bar::new(68.0, 70.0, 67.5, 69.5),
            Bar::new(69.0, 74.0, 68.5, 73.0),
        ],
    )
}

pub fn three_outside() -> Vec<Bar> {
    after_downtrend(
        10,
        &[
            Bar::new(72.0, 73.0, 70.0, 71.0),
            Bar::new(70.0, 75.0, 69.0, 74.0),
            Bar::new(74.0, 78.0, 73.0, 77.0),
        ],
    )
}

pub fn three_stars_in_south() -> Vec<Bar> {
    after_downtrend(
        10,
        &[
            Bar::new(72.0, 73.0, 62.0, 65.0),
            Bar::new(66.0, 67.0, 63.0, 64.0),
            Bar::new(64.0, 65.0, 63.5, 64.5),
        ],
    )
}

pub fn three_white_soldiers() -> Vec<Bar> {
    after_downtrend(
        10,
        &[
            Bar::new(70.0, 75.0, 69.5, 74.8),
            Bar::new(73.0, 79.0, 72.5, 78.8),
            Bar::new(77.0, 83.0, 76.5, 82.8),
        ],
    )
}

pub fn abandoned_baby() -> Vec<Bar> {
    after_downtrend(
        10,
        &[
            Bar::new(72.0, 73.0, 65.0, 66.0),
            // Doji gapped below both neighbours' shadows
            Bar::new(63.0, 63.5, 62.5, 63.0),
            Bar::new(65.0, 72.0, 64.0, 71.0),
        ],
    )
}

pub fn advance_block() -> Vec<Bar> {
    after_downtrend(
        10,
        &[
            Bar::new(70.0, 78.0, 69.0, 77.0),
            Bar::new(76.0, 82.0, 75.0, 80.0),
            Bar::new(79.0, 84.0, 78.0, 81.0),
        ],
    )
}

pub fn evening_doji_star() -> Vec<Bar> {
    after_uptrend(
        10,
        &[
            Bar::new(128.0, 135.0, 127.0, 134.0),
            Bar::new(137.0, 138.0, 136.0, 137.0),
            Bar::new(135.0, 136.0, 128.0, 129.0),
        ],
    )
}

pub fn evening_star() -> Vec<Bar> {
    after_uptrend(
        10,
        &[
            Bar::new(118.0, 123.0, 117.0, 122.0),
            Bar::new(124.0, 124.5, 123.5, 123.8),
            Bar::new(123.0, 123.5, 118.0, 119.0),
        ],
    )
}

pub fn gap_side_side_white() -> Vec<Bar> {
    after_uptrend(
        10,
        &[
            Bar::new(132.0, 136.0, 131.0, 135.0),
            Bar::new(137.0, 141.0, 136.0, 140.0),
            Bar::new(137.0, 141.0, 136.0, 140.0),
        ],
    )
}

pub fn identical_three_crows() -> Vec<Bar> {
    after_uptrend(
        10,
        &[
            Bar::new(128.0, 129.0, 122.0, 123.0),
            // Each opens at the prior close
            Bar::new(123.0, 124.0, 117.0, 118.0),
            Bar::new(118.0, 119.0, 112.0, 113.0),
        ],
    )
}

pub fn morning_doji_star() -> Vec<Bar> {
    after_downtrend(
        10,
        &[
            Bar::new(72.0, 73.0, 65.0, 66.0),
            Bar::new(63.0, 64.0, 62.0, 63.0),
            Bar::new(64.0, 72.0, 63.0, 71.0),
        ],
    )
}

pub fn morning_star() -> Vec<Bar> {
    after_downtrend(
        10,
        &[
            Bar::new(82.0, 83.0, 77.0, 78.0),
            Bar::new(76.0, 76.5, 75.5, 76.2),
            Bar::new(77.0, 82.0, 76.5, 81.0),
        ],
    )
}

pub fn stalled_pattern() -> Vec<Bar> {
    after_uptrend(
        10,
        &[
            Bar::new(128.0, 136.0, 127.0, 135.0),
            Bar::new(134.0, 140.0, 133.0, 139.0),
            Bar::new(139.0, 141.0, 138.0, 140.0),
        ],
    )
}

pub fn stick_sandwich() -> Vec<Bar> {
    after_downtrend(
        10,
        &[
            Bar::new(72.0, 73.0, 65.0, 66.0),
            Bar::new(67.0, 73.0, 66.0, 72.0),
            Bar::new(71.0, 72.0, 65.0, 66.0),
        ],
    )
}

pub fn tasuki_gap() -> Vec<Bar> {
    after_uptrend(
        10,
        &[
            Bar::new(128.0, 134.0, 127.0, 133.0),
            Bar::new(135.0, 141.0, 134.0, 140.0),
            Bar::new(139.0, 140.0, 133.5, 134.0),
        ],
    )
}

/// Three dojis, the middle one gapped away
pub fn tristar() -> Vec<Bar> {
    after_downtrend(
        10,
        &[
            Bar::new(70.0, 71.0, 69.0, 70.0),
            Bar::new(67.0, 68.0, 66.0, 67.0),
            Bar::new(69.0, 70.0, 68.0, 69.0),
        ],
    )
}

pub fn unique_three_river() -> Vec<Bar> {
    after_downtrend(
        10,
        &[
            Bar::new(72.0, 73.0, 62.0, 63.0),
            Bar::new(65.0, 68.0, 58.0, 64.0),
            Bar::new(62.0, 64.0, 61.0, 63.0),
        ],
    )
}

pub fn upside_gap_two_crows() -> Vec<Bar> {
    after_uptrend(
        10,
        &[
            Bar::new(128.0, 136.0, 127.0, 135.0),
            Bar::new(139.0, 140.0, 136.0, 137.0),
            Bar::new(140.0, 141.0, 135.5, 136.0),
        ],
    )
}

pub fn x_side_gap_three_methods() -> Vec<Bar> {
    after_uptrend(
        10,
        &[
            Bar::new(128.0, 134.0, 127.0, 133.0),
            Bar::new(136.0, 142.0, 135.0, 141.0),
            // Closes the gap between the first two
            Bar::new(140.0, 141.0, 132.0, 133.0),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::OHLCVExt;

    #[test]
    fn test_three_black_crows_layout() {
        let bars = three_black_crows();
        assert_eq!(bars.len(), 18);
        assert_eq!(bars[14], Bar::new(134.0, 140.0, 132.0, 137.0));
        assert!(bars[15..].iter().all(|b| b.is_bearish()));
        assert!(bars[10..15].iter().all(|b| b.is_bullish()));
    }

    #[test]
    fn test_two_crows_tail() {
        let bars = two_crows();
        assert_eq!(bars.len(), 13);
        assert_eq!(bars[10], Bar::new(128.0, 135.0, 127.0, 134.0));
        assert!(bars[11].is_bearish() && bars[12].is_bearish());
    }

    #[test]
    fn test_soldiers_close_higher() {
        let bars = three_white_soldiers();
        let tail = &bars[10..];
        assert!(tail.iter().all(|b| b.is_bullish()));
        assert!(tail.windows(2).all(|w| w[1].close > w[0].close));
    }
}
