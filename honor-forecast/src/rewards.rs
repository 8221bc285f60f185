//! Expected-value reward formulas.
//!
//! Every function here is pure and total over its numeric domain; callers are
//! expected to pass a validated win rate in `[0, 1]`.
use crate::config::{BgHonorValues, ForecastConfig, Phase};
use crate::constants::{MARKS_PER_LOSS, MARKS_PER_WIN};

/// Expected marks earned per game: `loss + (win - loss) * win_rate`.
#[must_use]
pub fn expected_marks_per_game(win_rate: f64) -> f64 {
    MARKS_PER_LOSS + (MARKS_PER_WIN - MARKS_PER_LOSS) * win_rate
}

/// Expected honor for one battleground: `p * win + (1 - p) * loss`.
#[must_use]
pub fn expected_honor_for_bg(values: &BgHonorValues, win_rate: f64) -> f64 {
    win_rate * values.honor_per_win + (1.0 - win_rate) * values.honor_per_loss
}

/// Unweighted mean of expected honor across the battlegrounds active in `phase`.
#[must_use]
pub fn expected_honor_per_game(config: &ForecastConfig, phase: Phase, win_rate: f64) -> f64 {
    let battlegrounds = phase.battlegrounds();
    let total: f64 = battlegrounds
        .iter()
        .map(|&bg| expected_honor_for_bg(config.bg_honor.get(bg), win_rate))
        .sum();
    total / f64::from(phase.num_bgs())
}
