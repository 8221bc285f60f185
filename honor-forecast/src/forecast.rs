//! Forecast driver: walks the day simulator across a date range.
use serde::{Deserialize, Serialize};

use crate::config::{ForecastConfig, Phase};
use crate::constants::{LOG_TARGET_FORECAST, OPEN_HORIZON_EXTRA_DAYS, OPEN_HORIZON_MAX_DAYS};
use crate::day::{DayResult, simulate_day};
use crate::overrides::OverrideMap;

/// Ordered day results of one run plus the daily rate that produced them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    pub days: Vec<DayResult>,
    pub games_per_day: f64,
}

impl Forecast {
    #[must_use]
    pub fn last_day(&self) -> Option<&DayResult> {
        self.days.last()
    }

    /// The day flagged as first reaching the target, if any.
    #[must_use]
    pub fn goal_day(&self) -> Option<&DayResult> {
        self.days.iter().find(|day| day.is_goal_reached_day)
    }

    #[must_use]
    pub fn final_honor(&self) -> Option<f64> {
        self.last_day().map(|day| day.honor_end_of_day)
    }
}

/// Carries end-of-day state from one simulated day into the next.
struct ForecastWalk<'a> {
    config: &'a ForecastConfig,
    overrides: &'a OverrideMap,
    games_per_day: f64,
    honor: f64,
    marks: f64,
    phase: Phase,
    goal_reached: bool,
}

impl<'a> ForecastWalk<'a> {
    fn new(config: &'a ForecastConfig, overrides: &'a OverrideMap, games_per_day: f64) -> Self {
        Self {
            config,
            overrides,
            games_per_day,
            honor: config.starting_honor,
            marks: config.starting_marks,
            phase: config.phase_on(config.start_date),
            goal_reached: false,
        }
    }

    fn next_day(&mut self, day_index: u32) -> DayResult {
        let date = self.config.date_for_day(day_index);
        let phase = self.config.phase_on(date);
        if phase != self.phase {
            self.marks = self
                .config
                .mark_tracking
                .carry_marks(self.marks, self.phase, phase);
            log::debug!(
                target: LOG_TARGET_FORECAST,
                "day {day_index} ({date}) switches phase {:?} -> {phase:?}",
                self.phase
            );
            self.phase = phase;
        }

        let mut result = simulate_day(
            day_index,
            date,
            self.honor,
            self.marks,
            self.config,
            self.games_per_day,
            self.overrides.get(day_index),
        );

        if !self.goal_reached && result.honor_end_of_day >= self.config.honor_target {
            result.is_goal_reached_day = true;
            self.goal_reached = true;
        }

        self.honor = result.honor_end_of_day;
        self.marks = result.marks_after_turn_in;
        result
    }
}

/// Forecast every day from `start_date` through `end_date` inclusive.
#[must_use]
pub fn compute_forecast(
    config: &ForecastConfig,
    overrides: &OverrideMap,
    games_per_day: f64,
) -> Forecast {
    let total_days = config.total_days();
    let mut walk = ForecastWalk::new(config, overrides, games_per_day);
    let days = (1..=total_days).map(|day| walk.next_day(day)).collect();
    Forecast {
        days,
        games_per_day,
    }
}

/// Forecast until the goal is reached, then a few extra days for context.
///
/// Stops at `OPEN_HORIZON_MAX_DAYS` when the goal is never reached.
#[must_use]
pub fn compute_forecast_open(
    config: &ForecastConfig,
    overrides: &OverrideMap,
    games_per_day: f64,
) -> Forecast {
    let mut walk = ForecastWalk::new(config, overrides, games_per_day);
    let mut days = Vec::new();
    let mut stop_after = OPEN_HORIZON_MAX_DAYS;

    for day_index in 1..=OPEN_HORIZON_MAX_DAYS {
        let result = walk.next_day(day_index);
        if result.is_goal_reached_day {
            stop_after = day_index
                .saturating_add(OPEN_HORIZON_EXTRA_DAYS)
                .min(OPEN_HORIZON_MAX_DAYS);
        }
        days.push(result);
        if day_index >= stop_after {
            break;
        }
    }

    if !walk.goal_reached {
        log::warn!(
            target: LOG_TARGET_FORECAST,
            "goal of {} honor not reached within {OPEN_HORIZON_MAX_DAYS} days at {games_per_day} games/day",
            config.honor_target
        );
    }

    Forecast {
        days,
        games_per_day,
    }
}

/// First day whose end-of-day honor meets `honor_target`.
#[must_use]
pub fn find_goal_reached_day(days: &[DayResult], honor_target: f64) -> Option<&DayResult> {
    days.iter().find(|day| day.honor_end_of_day >= honor_target)
}
