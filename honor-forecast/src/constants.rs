//! Centralized tuning constants for the forecast engine.
//!
//! These values define the deterministic math for the simulation and the
//! search bounds of the rate solver. Keeping them together ensures the
//! engine can only be adjusted via reviewed code changes rather than through
//! external JSON assets.

// Marks per battleground outcome --------------------------------------------
pub const MARKS_PER_WIN: f64 = 3.0;
pub const MARKS_PER_LOSS: f64 = 1.0;

// Rate solver ----------------------------------------------------------------
pub const SOLVER_INITIAL_UPPER_BOUND: f64 = 100.0;
pub const SOLVER_RATE_CEILING: f64 = 10_000.0;
pub const SOLVER_TOLERANCE: f64 = 0.1;
/// Solved rates are rounded up to this many steps per game (one decimal).
pub const SOLVER_ROUNDING_STEPS: f64 = 10.0;

// Open-horizon forecasting ---------------------------------------------------
pub const OPEN_HORIZON_EXTRA_DAYS: u32 = 7;
pub const OPEN_HORIZON_MAX_DAYS: u32 = 365;

// Default configuration fallbacks ---------------------------------------------
pub(crate) const DEFAULT_WIN_RATE: f64 = 0.5;
pub(crate) const DEFAULT_MARKS_THRESHOLD_PER_BG: f64 = 50.0;
pub(crate) const DEFAULT_DAILY_QUEST_HONOR: f64 = 419.0;
pub(crate) const DEFAULT_TURN_IN_HONOR: f64 = 314.0;
pub(crate) const DEFAULT_HONOR_TARGET: f64 = 75_000.0;
pub(crate) const DEFAULT_HORIZON_DAYS: u32 = 28;

// Logging targets --------------------------------------------------------------
pub(crate) const LOG_TARGET_SOLVER: &str = "honor_forecast::solver";
pub(crate) const LOG_TARGET_FORECAST: &str = "honor_forecast::forecast";
