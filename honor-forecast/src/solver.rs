//! Required-rate solver: the minimum games per day that reach the honor
//! target by the end date.
//!
//! Cumulative honor is non-decreasing in the daily rate (both the battleground
//! reward and the turn-in count grow with games played), so a single bracketing
//! bisection finds the threshold.
use serde::{Deserialize, Serialize};

use crate::config::ForecastConfig;
use crate::constants::{
    LOG_TARGET_SOLVER, SOLVER_INITIAL_UPPER_BOUND, SOLVER_RATE_CEILING, SOLVER_TOLERANCE,
};
use crate::forecast::compute_forecast;
use crate::numbers::ceil_to_tenth;
use crate::overrides::OverrideMap;

/// Outcome of a rate search.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateSolution {
    /// Games per day, rounded up to one decimal.
    pub games_per_day: f64,
    /// The target is not reachable even at the search ceiling; `games_per_day`
    /// is the ceiling rather than a precise answer.
    pub at_ceiling: bool,
    /// Full-horizon simulations the search performed.
    pub simulations: u32,
}

impl RateSolution {
    const fn zero(simulations: u32) -> Self {
        Self {
            games_per_day: 0.0,
            at_ceiling: false,
            simulations,
        }
    }
}

struct RateProbe<'a> {
    config: &'a ForecastConfig,
    overrides: OverrideMap,
    simulations: u32,
}

impl<'a> RateProbe<'a> {
    fn new(config: &'a ForecastConfig) -> Self {
        Self {
            config,
            overrides: OverrideMap::empty(),
            simulations: 0,
        }
    }

    /// Whether the last simulated day meets the target at `games_per_day`.
    fn reaches(&mut self, games_per_day: f64) -> bool {
        self.simulations += 1;
        compute_forecast(self.config, &self.overrides, games_per_day)
            .final_honor()
            .is_some_and(|honor| honor >= self.config.honor_target)
    }
}

/// Find the minimal constant daily rate that reaches `honor_target` on the
/// last day of the configured horizon. Overrides are not considered.
#[must_use]
pub fn solve_required_rate(config: &ForecastConfig) -> RateSolution {
    if config.starting_honor >= config.honor_target {
        return RateSolution::zero(0);
    }

    let mut probe = RateProbe::new(config);
    if probe.reaches(0.0) {
        log::debug!(target: LOG_TARGET_SOLVER, "fixed bonuses alone reach the target");
        return RateSolution::zero(probe.simulations);
    }

    let mut low = 0.0_f64;
    let mut high = SOLVER_INITIAL_UPPER_BOUND;
    let mut high_reaches = probe.reaches(high);
    while !high_reaches && high < SOLVER_RATE_CEILING {
        high = (high * 2.0).min(SOLVER_RATE_CEILING);
        log::trace!(target: LOG_TARGET_SOLVER, "expanding upper bound to {high}");
        high_reaches = probe.reaches(high);
    }

    if !high_reaches {
        log::warn!(
            target: LOG_TARGET_SOLVER,
            "target {} unreachable within {} days even at {SOLVER_RATE_CEILING} games/day",
            config.honor_target,
            config.total_days()
        );
        return RateSolution {
            games_per_day: SOLVER_RATE_CEILING,
            at_ceiling: true,
            simulations: probe.simulations,
        };
    }

    while high - low > SOLVER_TOLERANCE {
        let mid = (low + high) / 2.0;
        if probe.reaches(mid) {
            high = mid;
        } else {
            low = mid;
        }
    }

    let games_per_day = ceil_to_tenth(high);
    log::debug!(
        target: LOG_TARGET_SOLVER,
        "solved {games_per_day} games/day after {} simulations",
        probe.simulations
    );
    RateSolution {
        games_per_day,
        at_ceiling: false,
        simulations: probe.simulations,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BgHonorConfig, BgHonorValues};
    use chrono::NaiveDate;

    fn base_config() -> ForecastConfig {
        ForecastConfig {
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
            bg_honor: BgHonorConfig::uniform(BgHonorValues::new(200.0, 100.0)),
            honor_target: 20_000.0,
            ..ForecastConfig::default()
        }
    }

    fn final_honor(cfg: &ForecastConfig, games: f64) -> f64 {
        compute_forecast(cfg, &OverrideMap::empty(), games)
            .final_honor()
            .unwrap()
    }

    #[test]
    fn solved_rate_reaches_target() {
        let cfg = base_config();
        let solution = solve_required_rate(&cfg);
        assert!(!solution.at_ceiling);
        assert!(solution.games_per_day > 0.0);
        assert!(final_honor(&cfg, solution.games_per_day) >= cfg.honor_target);
    }

    #[test]
    fn solved_rate_is_near_minimal() {
        let cfg = base_config();
        let solution = solve_required_rate(&cfg);
        let below = solution.games_per_day - 0.2;
        assert!(below > 0.0);
        assert!(final_honor(&cfg, below) < cfg.honor_target);
    }

    #[test]
    fn starting_honor_lowers_required_rate() {
        let cfg = base_config();
        let head_start = ForecastConfig {
            starting_honor: 10_000.0,
            ..base_config()
        };
        assert!(
            solve_required_rate(&head_start).games_per_day < solve_required_rate(&cfg).games_per_day
        );
    }

    #[test]
    fn disabling_turn_ins_never_lowers_required_rate() {
        let cfg = base_config();
        let no_turn_ins = ForecastConfig {
            enable_turn_ins: false,
            ..base_config()
        };
        assert!(
            solve_required_rate(&no_turn_ins).games_per_day
                >= solve_required_rate(&cfg).games_per_day
        );
    }

    #[test]
    fn daily_quest_alone_needs_no_games() {
        let cfg = ForecastConfig {
            honor_target: 4_000.0,
            ..base_config()
        };
        let solution = solve_required_rate(&cfg);
        assert!(solution.games_per_day.abs() < f64::EPSILON);
        assert_eq!(solution.simulations, 1);
    }

    #[test]
    fn met_target_short_circuits() {
        let cfg = ForecastConfig {
            starting_honor: 20_000.0,
            ..base_config()
        };
        let solution = solve_required_rate(&cfg);
        assert!(solution.games_per_day.abs() < f64::EPSILON);
        assert_eq!(solution.simulations, 0);
    }

    #[test]
    fn high_targets_expand_the_bracket() {
        let cfg = ForecastConfig {
            honor_target: 500_000.0,
            ..base_config()
        };
        let solution = solve_required_rate(&cfg);
        assert!(solution.games_per_day > SOLVER_INITIAL_UPPER_BOUND);
        assert!(!solution.at_ceiling);
        assert!(final_honor(&cfg, solution.games_per_day) >= cfg.honor_target);
    }

    #[test]
    fn rate_rounded_up_to_ceiling_is_still_reachable() {
        let cfg = ForecastConfig {
            end_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            bg_honor: BgHonorConfig::uniform(BgHonorValues::new(1.0, 1.0)),
            daily_quest_honor: 0.0,
            enable_turn_ins: false,
            honor_target: 9_999.95,
            ..base_config()
        };
        let solution = solve_required_rate(&cfg);
        assert!((solution.games_per_day - SOLVER_RATE_CEILING).abs() < f64::EPSILON);
        assert!(!solution.at_ceiling);
        assert!(final_honor(&cfg, solution.games_per_day) >= cfg.honor_target);
    }

    #[test]
    fn unreachable_target_returns_ceiling() {
        let cfg = ForecastConfig {
            honor_target: 1.0e12,
            ..base_config()
        };
        let solution = solve_required_rate(&cfg);
        assert!(solution.at_ceiling);
        assert!((solution.games_per_day - SOLVER_RATE_CEILING).abs() < f64::EPSILON);
    }
}
