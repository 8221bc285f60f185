//! Honor Forecast Engine
//!
//! Platform-agnostic forecasting core for battleground honor grinding.
//! Given a reward table, a marks reserve policy and a date window, the engine
//! projects day-by-day honor and marks, re-anchors on user-reported actuals,
//! and solves for the minimum games per day that reach a target.
//! This crate performs no I/O and installs no logger.

pub mod cache;
pub mod config;
pub mod constants;
pub mod conversion;
pub mod day;
pub mod error;
pub mod forecast;
pub mod numbers;
pub mod overrides;
pub mod plan;
pub mod rewards;
pub mod solver;
pub mod validation;

// Re-export commonly used types
pub use cache::{ForecastCache, input_digest};
pub use config::{
    Battleground, BgHonorConfig, BgHonorValues, ForecastConfig, MarkTracking, Phase, RateMode,
};
pub use conversion::compute_turn_in_sets;
pub use day::{DayResult, simulate_day};
pub use error::ForecastError;
pub use forecast::{Forecast, compute_forecast, compute_forecast_open, find_goal_reached_day};
pub use overrides::{DayEntry, DayOverrides, OverrideMap};
pub use plan::{
    ComputedPlan, ForecastOutcome, ForecastRequest, ForecastSummary, GoalStatus, run_forecast,
};
pub use rewards::{expected_honor_for_bg, expected_honor_per_game, expected_marks_per_game};
pub use solver::{RateSolution, solve_required_rate};
pub use validation::{ConfigIssue, ValidationReport, validate_config};
