//! Single-candle fixtures (17)

use super::{after_downtrend, after_sideways, after_uptrend};
use crate::Bar;

/// Bullish belt-hold: opens on its low after a long decline
pub fn belt_hold() -> Vec<Bar> {
    after_downtrend(15, &[Bar::new(55.0, 62.0, 55.0, 61.5)])
}

/// White candle closing on its high
pub fn closing_marubozu() -> Vec<Bar> {
    after_sideways(10, &[Bar::new(98.0, 108.0, 97.0, 108.0)])
}

pub fn doji() -> Vec<Bar> {
    after_downtrend(10, &[Bar::new(80.0, 85.0, 75.0, 80.0)])
}

pub fn dragonfly_doji() -> Vec<Bar> {
    after_downtrend(10, &[Bar::new(80.0, 80.0, 70.0, 80.0)])
}

pub fn gravestone_doji() -> Vec<Bar> {
    after_uptrend(10, &[Bar::new(120.0, 130.0, 120.0, 120.0)])
}

/// Small body at the top, lower shadow over twice the body
pub fn hammer() -> Vec<Bar> {
    after_downtrend(15, &[Bar::new(54.0, 54.5, 48.0, 54.5)])
}

/// Hammer shape at the top of an advance
pub fn hanging_man() -> Vec<Bar> {
    after_uptrend(15, &[Bar::new(145.0, 145.5, 139.0, 145.5)])
}

pub fn high_wave() -> Vec<Bar> {
    after_sideways(10, &[Bar::new(100.0, 115.0, 85.0, 100.5)])
}

pub fn inverted_hammer() -> Vec<Bar> {
    after_downtrend(15, &[Bar::new(54.5, 61.0, 54.0, 54.0)])
}

pub fn long_legged_doji() -> Vec<Bar> {
    after_sideways(10, &[Bar::new(100.0, 112.0, 88.0, 100.0)])
}

pub fn long_line() -> Vec<Bar> {
    after_sideways(10, &[Bar::new(95.0, 112.0, 94.0, 111.0)])
}

/// No shadows at all
pub fn marubozu() -> Vec<Bar> {
    after_sideways(10, &[Bar::new(100.0, 110.0, 100.0, 110.0)])
}

/// Doji with long shadows and the body near the middle of the range
pub fn rickshaw_man() -> Vec<Bar> {
    after_sideways(10, &[Bar::new(100.0, 115.0, 85.0, 100.0)])
}

pub fn shooting_star() -> Vec<Bar> {
    after_uptrend(15, &[Bar::new(147.0, 154.0, 146.5, 146.5)])
}

pub fn short_line() -> Vec<Bar> {
    after_sideways(10, &[Bar::new(100.0, 101.0, 99.0, 100.5)])
}

pub fn spinning_top() -> Vec<Bar> {
    after_sideways(10, &[Bar::new(100.0, 108.0, 92.0, 100.5)])
}

/// Dragonfly with a lower shadow far longer than usual
pub fn takuri() -> Vec<Bar> {
    after_downtrend(15, &[Bar::new(55.0, 55.0, 35.0, 55.0)])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::OHLCVExt;

    #[test]
    fn test_tail_shapes() {
        let hammer = *hammer().last().unwrap();
        assert!(hammer.lower_shadow() > 2.0 * hammer.body());
        assert_eq!(hammer.upper_shadow(), 0.0);

        let star = *shooting_star().last().unwrap();
        assert!(star.upper_shadow() > 2.0 * star.body());

        let m = *marubozu().last().unwrap();
        assert_eq!(m.upper_shadow() + m.lower_shadow(), 0.0);

        assert_eq!(doji().last().unwrap().body(), 0.0);
    }

    #[test]
    fn test_context_lengths() {
        assert_eq!(hammer().len(), 16);
        assert_eq!(doji().len(), 11);
        assert_eq!(hanging_man()[14], Bar::new(141.0, 144.0, 140.0, 143.0));
    }
}
