//! Validated entry point: picks the rate mode, runs the forecast and derives
//! the plan and summary figures a front-end displays.
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::{ForecastConfig, RateMode};
use crate::day::DayResult;
use crate::error::ForecastError;
use crate::forecast::{Forecast, compute_forecast, compute_forecast_open};
use crate::overrides::{DayEntry, OverrideMap};
use crate::solver::solve_required_rate;
use crate::validation::validate_config;

/// The daily rate the run was built on and what it has to cover.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComputedPlan {
    /// Days in the configured window, independent of the simulated horizon.
    pub total_days: u32,
    pub honor_needed: f64,
    pub daily_games_required: f64,
    /// Solver gave up at its rate ceiling; always false in manual mode.
    pub at_ceiling: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalStatus {
    Reached,
    AfterDeadline,
    NotReached,
}

/// Headline figures for a finished run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSummary {
    pub honor_target: f64,
    pub starting_honor: f64,
    pub honor_remaining: f64,
    /// Starting honor as a share of the target, capped at 100.
    pub progress_pct: f64,
    pub starting_marks: f64,
    /// Reserve in force on the first day.
    pub marks_reserve: f64,
    pub days_simulated: u32,
    pub final_honor: Option<f64>,
    pub total_turn_in_sets: u64,
    pub goal_day: Option<u32>,
    pub goal_date: Option<NaiveDate>,
    pub goal_after_deadline: bool,
}

impl ForecastSummary {
    #[must_use]
    pub fn from_forecast(config: &ForecastConfig, forecast: &Forecast) -> Self {
        let progress_pct = if config.honor_target > 0.0 {
            (config.starting_honor / config.honor_target * 100.0).min(100.0)
        } else {
            100.0
        };
        let goal = forecast.goal_day();
        Self {
            honor_target: config.honor_target,
            starting_honor: config.starting_honor,
            honor_remaining: config.honor_needed(),
            progress_pct,
            starting_marks: config.starting_marks,
            marks_reserve: config.marks_reserve_on(config.start_date),
            days_simulated: u32::try_from(forecast.days.len()).unwrap_or(u32::MAX),
            final_honor: forecast.final_honor(),
            total_turn_in_sets: forecast
                .days
                .iter()
                .map(|day| u64::from(day.turn_in_sets))
                .sum(),
            goal_day: goal.map(|day| day.day_index),
            goal_date: goal.map(|day| day.date),
            goal_after_deadline: goal.is_some_and(|day| day.date > config.end_date),
        }
    }

    #[must_use]
    pub const fn goal_status(&self) -> GoalStatus {
        match (self.goal_day, self.goal_after_deadline) {
            (None, _) => GoalStatus::NotReached,
            (Some(_), true) => GoalStatus::AfterDeadline,
            (Some(_), false) => GoalStatus::Reached,
        }
    }
}

/// Everything one validated run produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastOutcome {
    pub rate_mode: RateMode,
    pub forecast: Forecast,
    pub plan: ComputedPlan,
    pub summary: ForecastSummary,
}

impl ForecastOutcome {
    #[must_use]
    pub fn days(&self) -> &[DayResult] {
        &self.forecast.days
    }

    #[must_use]
    pub const fn games_per_day(&self) -> f64 {
        self.forecast.games_per_day
    }

    #[must_use]
    pub fn goal_day(&self) -> Option<&DayResult> {
        self.forecast.goal_day()
    }
}

/// Validate `config`, then forecast it.
///
/// Auto mode solves for the minimum rate and forecasts the configured window
/// with the caller's overrides applied. Manual mode plays the given rate on an
/// open horizon that runs past the goal day.
///
/// # Errors
///
/// Returns [`ForecastError::InvalidConfig`] carrying every violated invariant
/// when validation fails.
pub fn run_forecast(
    config: &ForecastConfig,
    entries: &[DayEntry],
) -> Result<ForecastOutcome, ForecastError> {
    let report = validate_config(config);
    if !report.is_valid() {
        return Err(ForecastError::InvalidConfig(report));
    }

    let overrides = OverrideMap::from_entries(entries);
    let (forecast, at_ceiling) = match config.rate_mode {
        RateMode::Auto => {
            let solution = solve_required_rate(config);
            (
                compute_forecast(config, &overrides, solution.games_per_day),
                solution.at_ceiling,
            )
        }
        RateMode::Manual { games_per_day } => (
            compute_forecast_open(config, &overrides, games_per_day),
            false,
        ),
    };

    let plan = ComputedPlan {
        total_days: config.total_days(),
        honor_needed: config.honor_needed(),
        daily_games_required: forecast.games_per_day,
        at_ceiling,
    };
    let summary = ForecastSummary::from_forecast(config, &forecast);
    log::debug!(
        "forecast ready: {} days at {} games/day, goal day {:?}",
        summary.days_simulated,
        plan.daily_games_required,
        summary.goal_day
    );

    Ok(ForecastOutcome {
        rate_mode: config.rate_mode,
        forecast,
        plan,
        summary,
    })
}

/// A configuration and its day entries in one document, as exported by a
/// front-end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastRequest {
    pub config: ForecastConfig,
    #[serde(default)]
    pub entries: Vec<DayEntry>,
}

impl ForecastRequest {
    /// Parse a request document.
    ///
    /// # Errors
    ///
    /// Returns [`ForecastError::Parse`] when the JSON is malformed.
    pub fn from_json(json: &str) -> Result<Self, ForecastError> {
        Ok(serde_json::from_str(json)?)
    }

    /// # Errors
    ///
    /// See [`run_forecast`].
    pub fn run(&self) -> Result<ForecastOutcome, ForecastError> {
        run_forecast(&self.config, &self.entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::OPEN_HORIZON_EXTRA_DAYS;
    use crate::overrides::DayOverrides;

    #[test]
    fn auto_mode_reaches_goal_inside_window() {
        let cfg = ForecastConfig::default();
        let outcome = run_forecast(&cfg, &[]).unwrap();
        assert_eq!(outcome.days().len(), cfg.total_days() as usize);
        assert_eq!(outcome.summary.goal_status(), GoalStatus::Reached);
        assert!(!outcome.plan.at_ceiling);
        assert!(outcome.games_per_day() > 0.0);
        assert!(outcome.summary.final_honor.unwrap() >= cfg.honor_target);
    }

    #[test]
    fn already_met_target_needs_no_games() {
        let cfg = ForecastConfig {
            starting_honor: 80_000.0,
            ..ForecastConfig::default()
        };
        let outcome = run_forecast(&cfg, &[]).unwrap();
        assert!(outcome.games_per_day().abs() < f64::EPSILON);
        assert_eq!(outcome.summary.goal_day, Some(1));
        assert!(outcome.summary.honor_remaining.abs() < f64::EPSILON);
        assert!((outcome.summary.progress_pct - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn progress_reflects_starting_honor() {
        let cfg = ForecastConfig {
            starting_honor: 30_000.0,
            ..ForecastConfig::default()
        };
        let outcome = run_forecast(&cfg, &[]).unwrap();
        assert!((outcome.summary.progress_pct - 40.0).abs() < 1e-9);
        assert!((outcome.summary.honor_remaining - 45_000.0).abs() < 1e-9);
        assert!((outcome.plan.honor_needed - 45_000.0).abs() < 1e-9);
        assert!((outcome.summary.marks_reserve - 150.0).abs() < f64::EPSILON);
    }

    #[test]
    fn manual_mode_runs_past_the_deadline() {
        let cfg = ForecastConfig::default().with_rate_mode(RateMode::Manual { games_per_day: 1.0 });
        let outcome = run_forecast(&cfg, &[]).unwrap();
        let goal = outcome.summary.goal_day.unwrap();
        assert!(goal > cfg.total_days());
        assert_eq!(outcome.summary.goal_status(), GoalStatus::AfterDeadline);
        assert_eq!(outcome.days().len(), (goal + OPEN_HORIZON_EXTRA_DAYS) as usize);
        assert_eq!(outcome.plan.total_days, cfg.total_days());
        assert!((outcome.plan.daily_games_required - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn overrides_are_applied_in_auto_mode() {
        let cfg = ForecastConfig::default();
        let entries = vec![DayEntry::new(
            3,
            cfg.date_for_day(3),
            DayOverrides::honor(12_345.0),
        )];
        let outcome = run_forecast(&cfg, &entries).unwrap();
        assert!(outcome.days()[2].override_applied);
        assert!((outcome.days()[3].honor_start - 12_345.0).abs() < f64::EPSILON);
    }

    #[test]
    fn invalid_config_reports_every_issue() {
        let cfg = ForecastConfig {
            win_rate: 3.0,
            honor_target: -1.0,
            ..ForecastConfig::default()
        };
        let err = run_forecast(&cfg, &[]).unwrap_err();
        let report = err.report().unwrap();
        assert_eq!(report.issues.len(), 2);
        assert!(err.to_string().starts_with("invalid forecast configuration"));
    }

    #[test]
    fn request_document_round_trips_through_run() {
        let json = r#"{
            "config": {"start_date": "2024-03-01", "end_date": "2024-03-14", "honor_target": 20000},
            "entries": [{"day_index": 2, "date": "2024-03-02", "overrides": {"actual_marks_end_of_day": 30}}]
        }"#;
        let request = ForecastRequest::from_json(json).unwrap();
        assert_eq!(request.entries.len(), 1);
        let outcome = request.run().unwrap();
        assert_eq!(outcome.days().len(), 14);
        assert!((outcome.days()[2].marks_start - 30.0).abs() < f64::EPSILON);
    }

    #[test]
    fn malformed_request_is_a_parse_error() {
        let err = ForecastRequest::from_json("{\"config\": 4}").unwrap_err();
        assert!(matches!(err, ForecastError::Parse(_)));
        assert!(err.report().is_none());
    }
}
