//! Per-pattern fixtures
//!
//! One constructor per oracle function. Each builds a leading context
//! sequence (trend or flat, 10-15 bars) followed by 1-5 hand-tuned bars shaped
//! like the pattern, then the oracle is asked for its verdicts on the whole
//! sequence.
//!
//! # Groups
//!
//! - **Single-bar (17)**: tail of one candle
//! - **Two-bar (15)**: tail of two candles
//! - **Three-bar (21)**: tail of three candles
//! - **Multi-bar (8)**: tail of four or five candles
//!
//! The registry is the closed static table [`FIXTURES`], aligned index for
//! index with [`PatternFunction::ALL`].

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::generators::{downtrend, sideways, uptrend, TREND_START, TREND_STEP};
use crate::oracle::{detected_indices, Oracle, PatternFunction, PriceSeries, Verdict};
use crate::{Bar, Result};

pub mod multi_bar;
pub mod single_bar;
pub mod three_bar;
pub mod two_bar;

// ============================================================
// CONTEXT HELPERS
// ============================================================

fn append(mut context: Vec<Bar>, tail: &[Bar]) -> Vec<Bar> {
    context.extend_from_slice(tail);
    context
}

/// `uptrend(n, 100, 3)` followed by `tail`
pub(crate) fn after_uptrend(n: usize, tail: &[Bar]) -> Vec<Bar> {
    append(uptrend(n, TREND_START, TREND_STEP), tail)
}

/// `downtrend(n, 100, 3)` followed by `tail`
pub(crate) fn after_downtrend(n: usize, tail: &[Bar]) -> Vec<Bar> {
    append(downtrend(n, TREND_START, TREND_STEP), tail)
}

/// `sideways(n, 100)` followed by `tail`
pub(crate) fn after_sideways(n: usize, tail: &[Bar]) -> Vec<Bar> {
    append(sideways(n, TREND_START), tail)
}

// ============================================================
// FIXTURE TYPES
// ============================================================

/// Oracle verdicts captured for one constructed sequence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fixture {
    pub pattern: PatternFunction,
    pub bars: Vec<Bar>,
    pub result: Vec<Verdict>,
    pub detected_at: Vec<usize>,
}

impl Fixture {
    pub fn from_verdicts(pattern: PatternFunction, bars: Vec<Bar>, result: Vec<Verdict>) -> Self {
        let detected_at = detected_indices(&result);
        Self {
            pattern,
            bars,
            result,
            detected_at,
        }
    }

    /// Oracle fired somewhere in the sequence
    #[inline]
    pub fn detected(&self) -> bool {
        !self.detected_at.is_empty()
    }
}

/// Static registry entry: which function, and how to build its bars
#[derive(Debug, Clone, Copy)]
pub struct FixtureSpec {
    pub function: PatternFunction,
    pub description: &'static str,
    pub build: fn() -> Vec<Bar>,
}

impl FixtureSpec {
    #[inline]
    pub fn bars(&self) -> Vec<Bar> {
        (self.build)()
    }
}

macro_rules! fixture_table {
    ($($variant:ident => $build:path, $desc:literal;)*) => {
        /// All 61 fixture constructors, in [`PatternFunction::ALL`] order
        pub static FIXTURES: [FixtureSpec; PatternFunction::ALL.len()] = [
            $(FixtureSpec {
                function: PatternFunction::$variant,
                description: $desc,
                build: $build,
            }),*
        ];
    };
}

fixture_table! {
    TwoCrows => three_bar::two_crows, "Two Crows";
    ThreeBlackCrows => three_bar::three_black_crows, "Three Black Crows";
    ThreeInside => three_bar::three_inside, "Three Inside Up/Down";
    ThreeLineStrike => multi_bar::three_line_strike, "Three-Line Strike";
    ThreeOutside => three_bar::three_outside, "Three Outside Up/Down";
    ThreeStarsInSouth => three_bar::three_stars_in_south, "Three Stars In The South";
    ThreeWhiteSoldiers => three_bar::three_white_soldiers, "Three Advancing White Soldiers";
    AbandonedBaby => three_bar::abandoned_baby, "Abandoned Baby";
    AdvanceBlock => three_bar::advance_block, "Advance Block";
    BeltHold => single_bar::belt_hold, "Belt-hold";
    Breakaway => multi_bar::breakaway, "Breakaway";
    ClosingMarubozu => single_bar::closing_marubozu, "Closing Marubozu";
    ConcealingBabySwallow => multi_bar::concealing_baby_swallow, "Concealing Baby Swallow";
    Counterattack => two_bar::counterattack, "Counterattack";
    DarkCloudCover => two_bar::dark_cloud_cover, "Dark Cloud Cover";
    Doji => single_bar::doji, "Doji";
    DojiStar => two_bar::doji_star, "Doji Star";
    DragonflyDoji => single_bar::dragonfly_doji, "Dragonfly Doji";
    Engulfing => two_bar::engulfing, "Engulfing Pattern";
    EveningDojiStar => three_bar::evening_doji_star, "Evening Doji Star";
    EveningStar => three_bar::evening_star, "Evening Star";
    GapSideSideWhite => three_bar::gap_side_side_white, "Up/Down-gap side-by-side white lines";
    GravestoneDoji => single_bar::gravestone_doji, "Gravestone Doji";
    Hammer => single_bar::hammer, "Hammer";
    HangingMan => single_bar::hanging_man, "Hanging Man";
    Harami => two_bar::harami, "Harami Pattern";
    HaramiCross => two_bar::harami_cross, "Harami Cross Pattern";
    HighWave => single_bar::high_wave, "High-Wave Candle";
    Hikkake => multi_bar::hikkake, "Hikkake Pattern";
    HikkakeMod => multi_bar::hikkake_mod, "Modified Hikkake Pattern";
    HomingPigeon => two_bar::homing_pigeon, "Homing Pigeon";
    IdenticalThreeCrows => three_bar::identical_three_crows, "Identical Three Crows";
    InNeck => two_bar::in_neck, "In-Neck Pattern";
    InvertedHammer => single_bar::inverted_hammer, "Inverted Hammer";
    Kicking => two_bar::kicking, "Kicking";
    KickingByLength => two_bar::kicking_by_length, "Kicking by length";
    LadderBottom => multi_bar::ladder_bottom, "Ladder Bottom";
    LongLeggedDoji => single_bar::long_legged_doji, "Long Legged Doji";
    LongLine => single_bar::long_line, "Long Line Candle";
    Marubozu => single_bar::marubozu, "Marubozu";
    MatchingLow => two_bar::matching_low, "Matching Low";
    MatHold => multi_bar::mat_hold, "Mat Hold";
    MorningDojiStar => three_bar::morning_doji_star, "Morning Doji Star";
    MorningStar => three_bar::morning_star, "Morning Star";
    OnNeck => two_bar::on_neck, "On-Neck Pattern";
    Piercing => two_bar::piercing, "Piercing Pattern";
    RickshawMan => single_bar::rickshaw_man, "Rickshaw Man";
    RiseFallThreeMethods => multi_bar::rise_fall_three_methods, "Rising/Falling Three Methods";
    SeparatingLines => two_bar::separating_lines, "Separating Lines";
    ShootingStar => single_bar::shooting_star, "Shooting Star";
    ShortLine => single_bar::short_line, "Short Line Candle";
    SpinningTop => single_bar::spinning_top, "Spinning Top";
    StalledPattern => three_bar::stalled_pattern, "Stalled Pattern";
    StickSandwich => three_bar::stick_sandwich, "Stick Sandwich";
    Takuri => single_bar::takuri, "Takuri (Dragonfly Doji with very long lower shadow)";
    TasukiGap => three_bar::tasuki_gap, "Tasuki Gap";
    Thrusting => two_bar::thrusting, "Thrusting Pattern";
    Tristar => three_bar::tristar, "Tristar Pattern";
    Unique3River => three_bar::unique_three_river, "Unique 3 River";
    UpsideGapTwoCrows => three_bar::upside_gap_two_crows, "Upside Gap Two Crows";
    XSideGapThreeMethods => three_bar::x_side_gap_three_methods, "Upside/Downside Gap Three Methods";
}

/// Registry lookup; the table is total over [`PatternFunction`]
#[inline]
pub fn fixture_spec(function: PatternFunction) -> &'static FixtureSpec {
    &FIXTURES[function as usize]
}

// ============================================================
// BUILDING
// ============================================================

/// Build the bars for `spec`, ask the oracle, capture the verdicts.
///
/// Errors stay scoped to this one fixture.
pub fn build_fixture(spec: &FixtureSpec, oracle: &dyn Oracle) -> Result<Fixture> {
    let bars = spec.bars();
    let series = PriceSeries::from_bars(&bars);
    let result = oracle.evaluate(spec.function, &series)?;
    let fixture = Fixture::from_verdicts(spec.function, bars, result);
    tracing::debug!(
        pattern = %spec.function,
        bars = fixture.bars.len(),
        detected = ?fixture.detected_at,
        "Built fixture"
    );
    Ok(fixture)
}

/// Every fixture, in table order, each with its own outcome
pub fn build_all(oracle: &dyn Oracle) -> Vec<(PatternFunction, Result<Fixture>)> {
    FIXTURES
        .iter()
        .map(|spec| (spec.function, build_fixture(spec, oracle)))
        .collect()
}

/// [`build_all`] across the rayon pool; order and content are unchanged
pub fn build_all_parallel(oracle: &dyn Oracle) -> Vec<(PatternFunction, Result<Fixture>)> {
    FIXTURES
        .par_iter()
        .map(|spec| (spec.function, build_fixture(spec, oracle)))
        .collect()
}
