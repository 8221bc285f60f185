//! Forecast configuration: timeline, battleground reward table, marks policy
//! and rate mode.
use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_DAILY_QUEST_HONOR, DEFAULT_HONOR_TARGET, DEFAULT_HORIZON_DAYS,
    DEFAULT_MARKS_THRESHOLD_PER_BG, DEFAULT_TURN_IN_HONOR, DEFAULT_WIN_RATE,
};
use crate::numbers::day_span_to_u32;

const DEFAULT_CONFIG_DATA: &str = include_str!("../assets/default_config.json");

/// Battleground types a player can queue for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Battleground {
    Wsg,
    Ab,
    Av,
    Eots,
}

impl Battleground {
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Wsg => "wsg",
            Self::Ab => "ab",
            Self::Av => "av",
            Self::Eots => "eots",
        }
    }
}

const CLASSIC_BATTLEGROUNDS: [Battleground; 3] =
    [Battleground::Wsg, Battleground::Ab, Battleground::Av];
const TBC_BATTLEGROUNDS: [Battleground; 4] = [
    Battleground::Wsg,
    Battleground::Ab,
    Battleground::Av,
    Battleground::Eots,
];

/// Game phase; selects the active battleground set and the turn-in bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    #[default]
    Classic,
    Tbc,
}

impl Phase {
    #[must_use]
    pub const fn battlegrounds(self) -> &'static [Battleground] {
        match self {
            Self::Classic => &CLASSIC_BATTLEGROUNDS,
            Self::Tbc => &TBC_BATTLEGROUNDS,
        }
    }

    #[must_use]
    pub const fn num_bgs(self) -> u32 {
        match self {
            Self::Classic => 3,
            Self::Tbc => 4,
        }
    }

    /// One mark of every active battleground type buys one turn-in set.
    #[must_use]
    pub const fn marks_per_turn_in(self) -> u32 {
        self.num_bgs()
    }
}

/// Honor awarded for a single battleground outcome.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BgHonorValues {
    pub honor_per_win: f64,
    pub honor_per_loss: f64,
}

impl BgHonorValues {
    #[must_use]
    pub const fn new(honor_per_win: f64, honor_per_loss: f64) -> Self {
        Self {
            honor_per_win,
            honor_per_loss,
        }
    }
}

/// Per-battleground honor table. `eots` is only read while in the TBC phase.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BgHonorConfig {
    pub wsg: BgHonorValues,
    pub ab: BgHonorValues,
    pub av: BgHonorValues,
    pub eots: BgHonorValues,
}

impl BgHonorConfig {
    /// Same win/loss pair for every battleground.
    #[must_use]
    pub const fn uniform(values: BgHonorValues) -> Self {
        Self {
            wsg: values,
            ab: values,
            av: values,
            eots: values,
        }
    }

    #[must_use]
    pub const fn get(&self, bg: Battleground) -> &BgHonorValues {
        match bg {
            Battleground::Wsg => &self.wsg,
            Battleground::Ab => &self.ab,
            Battleground::Av => &self.av,
            Battleground::Eots => &self.eots,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Battleground, &BgHonorValues)> {
        TBC_BATTLEGROUNDS.iter().map(move |&bg| (bg, self.get(bg)))
    }
}

impl Default for BgHonorConfig {
    fn default() -> Self {
        Self {
            wsg: BgHonorValues::new(785.0, 271.0),
            ab: BgHonorValues::new(626.0, 318.0),
            av: BgHonorValues::new(687.0, 374.0),
            eots: BgHonorValues::new(700.0, 350.0),
        }
    }
}

/// How the marks resource is tracked between days.
///
/// `Pooled` keeps one total across all battlegrounds; a turn-in set consumes a
/// bundle of `num_bgs` marks and the reserve is `threshold * num_bgs`.
/// `PerLane` keeps the per-battleground count (marks spread evenly); a set
/// consumes one mark per lane and the reserve is the per-lane threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkTracking {
    #[default]
    Pooled,
    PerLane,
}

impl MarkTracking {
    #[must_use]
    pub fn marks_reserve(self, threshold_per_bg: f64, phase: Phase) -> f64 {
        match self {
            Self::Pooled => threshold_per_bg * f64::from(phase.num_bgs()),
            Self::PerLane => threshold_per_bg,
        }
    }

    #[must_use]
    pub fn bundle_size(self, phase: Phase) -> f64 {
        match self {
            Self::Pooled => f64::from(phase.marks_per_turn_in()),
            Self::PerLane => 1.0,
        }
    }

    /// Share of the day's pooled mark gain credited to the tracked quantity.
    #[must_use]
    pub fn gain_divisor(self, phase: Phase) -> f64 {
        match self {
            Self::Pooled => 1.0,
            Self::PerLane => f64::from(phase.num_bgs()),
        }
    }

    /// Convert a carried marks value from one phase's tracking units to another's.
    #[must_use]
    pub fn carry_marks(self, marks: f64, from: Phase, to: Phase) -> f64 {
        match self {
            Self::Pooled => marks,
            Self::PerLane if from == to => marks,
            Self::PerLane => marks * f64::from(from.num_bgs()) / f64::from(to.num_bgs()),
        }
    }
}

/// Whether the daily game count is solved for or supplied by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum RateMode {
    /// Solve for the minimum rate that reaches the target by `end_date`.
    #[default]
    Auto,
    /// Play a fixed number of games per day until the goal (or the day cap).
    Manual { games_per_day: f64 },
}

impl RateMode {
    #[must_use]
    pub const fn is_manual(self) -> bool {
        matches!(self, Self::Manual { .. })
    }
}

/// Complete input for one forecast run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastConfig {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub phase: Phase,
    /// Days on or after this date run in the TBC phase.
    #[serde(default)]
    pub expansion_start_date: Option<NaiveDate>,
    #[serde(default)]
    pub bg_honor: BgHonorConfig,
    #[serde(default = "default_daily_quest_honor")]
    pub daily_quest_honor: f64,
    #[serde(default = "default_turn_in_honor")]
    pub turn_in_honor: f64,
    #[serde(default = "default_win_rate")]
    pub win_rate: f64,
    #[serde(default = "default_marks_threshold")]
    pub marks_threshold_per_bg: f64,
    #[serde(default = "default_true")]
    pub enable_turn_ins: bool,
    #[serde(default)]
    pub mark_tracking: MarkTracking,
    #[serde(default = "default_one_f64")]
    pub bg_honor_mult: f64,
    #[serde(default = "default_one_f64")]
    pub quest_honor_mult: f64,
    #[serde(default = "default_honor_target")]
    pub honor_target: f64,
    #[serde(default)]
    pub starting_honor: f64,
    #[serde(default)]
    pub starting_marks: f64,
    #[serde(default)]
    pub rate_mode: RateMode,
}

impl ForecastConfig {
    /// Parse a configuration from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload is not a structurally valid configuration.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    #[must_use]
    pub fn load_from_static() -> Self {
        Self::from_json(DEFAULT_CONFIG_DATA).unwrap_or_default()
    }

    #[must_use]
    pub fn default_config() -> Self {
        Self::load_from_static()
    }

    /// Inclusive number of days between `start_date` and `end_date`.
    #[must_use]
    pub fn total_days(&self) -> u32 {
        let span = self.end_date.signed_duration_since(self.start_date).num_days();
        day_span_to_u32(span.saturating_add(1))
    }

    /// Calendar date of a 1-based day index.
    #[must_use]
    pub fn date_for_day(&self, day_index: u32) -> NaiveDate {
        let offset = Days::new(u64::from(day_index.saturating_sub(1)));
        self.start_date
            .checked_add_days(offset)
            .unwrap_or(NaiveDate::MAX)
    }

    /// Phase in effect on `date`.
    #[must_use]
    pub fn phase_on(&self, date: NaiveDate) -> Phase {
        match self.expansion_start_date {
            Some(switch) if date >= switch => Phase::Tbc,
            _ => self.phase,
        }
    }

    #[must_use]
    pub fn marks_reserve_on(&self, date: NaiveDate) -> f64 {
        self.mark_tracking
            .marks_reserve(self.marks_threshold_per_bg, self.phase_on(date))
    }

    /// Honor still missing at the start of the run.
    #[must_use]
    pub fn honor_needed(&self) -> f64 {
        (self.honor_target - self.starting_honor).max(0.0)
    }

    #[must_use]
    pub fn with_rate_mode(mut self, rate_mode: RateMode) -> Self {
        self.rate_mode = rate_mode;
        self
    }
}

impl Default for ForecastConfig {
    fn default() -> Self {
        let start_date = NaiveDate::from_ymd_opt(2024, 1, 18).unwrap_or_default();
        let end_date = start_date
            .checked_add_days(Days::new(u64::from(DEFAULT_HORIZON_DAYS - 1)))
            .unwrap_or(start_date);
        Self {
            start_date,
            end_date,
            phase: Phase::Classic,
            expansion_start_date: None,
            bg_honor: BgHonorConfig::default(),
            daily_quest_honor: DEFAULT_DAILY_QUEST_HONOR,
            turn_in_honor: DEFAULT_TURN_IN_HONOR,
            win_rate: DEFAULT_WIN_RATE,
            marks_threshold_per_bg: DEFAULT_MARKS_THRESHOLD_PER_BG,
            enable_turn_ins: true,
            mark_tracking: MarkTracking::Pooled,
            bg_honor_mult: 1.0,
            quest_honor_mult: 1.0,
            honor_target: DEFAULT_HONOR_TARGET,
            starting_honor: 0.0,
            starting_marks: 0.0,
            rate_mode: RateMode::Auto,
        }
    }
}

const fn default_true() -> bool {
    true
}

const fn default_one_f64() -> f64 {
    1.0
}

const fn default_win_rate() -> f64 {
    DEFAULT_WIN_RATE
}

const fn default_marks_threshold() -> f64 {
    DEFAULT_MARKS_THRESHOLD_PER_BG
}

const fn default_daily_quest_honor() -> f64 {
    DEFAULT_DAILY_QUEST_HONOR
}

const fn default_turn_in_honor() -> f64 {
    DEFAULT_TURN_IN_HONOR
}

const fn default_honor_target() -> f64 {
    DEFAULT_HONOR_TARGET
}
