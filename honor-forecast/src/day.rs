//! Single-day state transition: marks, turn-ins, honor and overrides.
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::{ForecastConfig, Phase};
use crate::conversion::compute_turn_in_sets;
use crate::overrides::DayOverrides;
use crate::rewards::{expected_honor_per_game, expected_marks_per_game};

/// Computed result for a single forecast day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayResult {
    pub day_index: u32,
    pub date: NaiveDate,
    pub phase: Phase,

    pub games_planned: f64,
    pub honor_start: f64,
    pub marks_start: f64,

    pub expected_marks_gained: f64,
    pub marks_before_turn_in: f64,
    pub marks_reserve: f64,
    pub turn_in_sets: u32,
    pub marks_after_turn_in: f64,

    pub honor_from_bgs: f64,
    pub honor_from_daily_quest: f64,
    pub honor_from_turn_ins: f64,
    pub total_honor_gained: f64,
    pub honor_end_of_day: f64,

    pub override_applied: bool,
    /// Set by the forecast driver on the first day the target is met.
    pub is_goal_reached_day: bool,
}

/// Simulate one day starting from `honor_start` / `marks_start`.
///
/// Marks are expressed in the config's tracking units (pooled total or per
/// lane). Overrides replace only the fields they carry.
#[must_use]
pub fn simulate_day(
    day_index: u32,
    date: NaiveDate,
    honor_start: f64,
    marks_start: f64,
    config: &ForecastConfig,
    games_planned: f64,
    overrides: Option<&DayOverrides>,
) -> DayResult {
    let phase = config.phase_on(date);
    let tracking = config.mark_tracking;
    let marks_reserve = tracking.marks_reserve(config.marks_threshold_per_bg, phase);
    let bundle_size = tracking.bundle_size(phase);

    let expected_marks_gained =
        games_planned * expected_marks_per_game(config.win_rate) / tracking.gain_divisor(phase);
    let marks_before_turn_in = marks_start + expected_marks_gained;
    let turn_in_sets = compute_turn_in_sets(
        marks_before_turn_in,
        marks_reserve,
        bundle_size,
        config.enable_turn_ins,
    );
    let sets = f64::from(turn_in_sets);
    let mut marks_after_turn_in = marks_before_turn_in - sets * bundle_size;

    let honor_from_bgs =
        games_planned * expected_honor_per_game(config, phase, config.win_rate) * config.bg_honor_mult;
    let honor_from_daily_quest = config.daily_quest_honor * config.quest_honor_mult;
    let honor_from_turn_ins = sets * config.turn_in_honor * config.quest_honor_mult;
    let total_honor_gained = honor_from_bgs + honor_from_daily_quest + honor_from_turn_ins;
    let mut honor_end_of_day = honor_start + total_honor_gained;

    let mut override_applied = false;
    if let Some(overrides) = overrides {
        if let Some(actual) = overrides.actual_honor_end_of_day {
            honor_end_of_day = actual;
            override_applied = true;
        }
        if let Some(actual) = overrides.actual_marks_end_of_day {
            marks_after_turn_in = actual;
            override_applied = true;
        }
    }

    DayResult {
        day_index,
        date,
        phase,
        games_planned,
        honor_start,
        marks_start,
        expected_marks_gained,
        marks_before_turn_in,
        marks_reserve,
        turn_in_sets,
        marks_after_turn_in,
        honor_from_bgs,
        honor_from_daily_quest,
        honor_from_turn_ins,
        total_honor_gained,
        honor_end_of_day,
        override_applied,
        is_goal_reached_day: false,
    }
}
