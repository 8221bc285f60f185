//! Properties every forecast run must satisfy, whatever its inputs.
use anyhow::{Result, ensure};

use honor_forecast::{
    ForecastOutcome, ForecastRequest, OverrideMap, RateMode, compute_forecast,
    find_goal_reached_day,
};

/// Slack below the solved rate that must no longer reach the target.
const MINIMALITY_PROBE: f64 = 0.2;

/// Run every invariant check and collect the failures.
pub fn run_invariant_checks(request: &ForecastRequest, outcome: &ForecastOutcome) -> Vec<String> {
    let checks: [(&str, fn(&ForecastRequest, &ForecastOutcome) -> Result<()>); 5] = [
        ("day sequence", check_day_sequence),
        ("state chaining", check_state_chaining),
        ("goal flag", check_goal_flag),
        ("override propagation", check_override_propagation),
        ("solver", check_solver),
    ];
    checks
        .iter()
        .filter_map(|(label, check)| {
            check(request, outcome)
                .err()
                .map(|err| format!("{label}: {err:#}"))
        })
        .collect()
}

pub fn check_day_sequence(request: &ForecastRequest, outcome: &ForecastOutcome) -> Result<()> {
    for (position, day) in outcome.days().iter().enumerate() {
        let expected = u32::try_from(position + 1).unwrap_or(u32::MAX);
        ensure!(
            day.day_index == expected,
            "day at position {position} has index {}",
            day.day_index
        );
        ensure!(
            day.date == request.config.date_for_day(expected),
            "day {expected} is dated {}",
            day.date
        );
    }
    if !request.config.rate_mode.is_manual() {
        ensure!(
            outcome.days().len() == request.config.total_days() as usize,
            "fixed horizon produced {} days for a {}-day window",
            outcome.days().len(),
            request.config.total_days()
        );
    }
    Ok(())
}

pub fn check_state_chaining(request: &ForecastRequest, outcome: &ForecastOutcome) -> Result<()> {
    let config = &request.config;
    ensure!(
        outcome
            .days()
            .first()
            .is_none_or(|day| day.honor_start.to_bits() == config.starting_honor.to_bits()),
        "first day does not start from starting_honor"
    );
    for pair in outcome.days().windows(2) {
        let (prev, next) = (&pair[0], &pair[1]);
        ensure!(
            next.honor_start.to_bits() == prev.honor_end_of_day.to_bits(),
            "day {} honor_start {} != previous honor_end_of_day {}",
            next.day_index,
            next.honor_start,
            prev.honor_end_of_day
        );
        let carried = config
            .mark_tracking
            .carry_marks(prev.marks_after_turn_in, prev.phase, next.phase);
        ensure!(
            (next.marks_start - carried).abs() < 1e-9,
            "day {} marks_start {} != carried marks {carried}",
            next.day_index,
            next.marks_start
        );
    }
    Ok(())
}

pub fn check_goal_flag(request: &ForecastRequest, outcome: &ForecastOutcome) -> Result<()> {
    let flagged: Vec<u32> = outcome
        .days()
        .iter()
        .filter(|day| day.is_goal_reached_day)
        .map(|day| day.day_index)
        .collect();
    ensure!(flagged.len() <= 1, "several goal days flagged: {flagged:?}");
    let first = find_goal_reached_day(outcome.days(), request.config.honor_target)
        .map(|day| day.day_index);
    ensure!(
        flagged.first().copied() == first,
        "flagged goal day {:?} but first qualifying day is {first:?}",
        flagged.first()
    );
    ensure!(
        outcome.summary.goal_day == first,
        "summary goal day {:?} disagrees with {first:?}",
        outcome.summary.goal_day
    );
    Ok(())
}

pub fn check_override_propagation(
    request: &ForecastRequest,
    outcome: &ForecastOutcome,
) -> Result<()> {
    let overrides = OverrideMap::from_entries(&request.entries);
    for day in outcome.days() {
        let Some(entry) = overrides.get(day.day_index) else {
            ensure!(
                !day.override_applied,
                "day {} flagged as overridden without an entry",
                day.day_index
            );
            continue;
        };
        ensure!(
            day.override_applied != entry.is_empty(),
            "day {} override flag does not match its entry",
            day.day_index
        );
        if let Some(honor) = entry.actual_honor_end_of_day {
            ensure!(
                day.honor_end_of_day.to_bits() == honor.to_bits(),
                "day {} ends at {} honor, override says {honor}",
                day.day_index,
                day.honor_end_of_day
            );
        }
        if let Some(marks) = entry.actual_marks_end_of_day {
            ensure!(
                day.marks_after_turn_in.to_bits() == marks.to_bits(),
                "day {} ends with {} marks, override says {marks}",
                day.day_index,
                day.marks_after_turn_in
            );
        }
    }
    Ok(())
}

/// The solved rate reaches the target without overrides and a slightly
/// lower rate does not.
pub fn check_solver(request: &ForecastRequest, outcome: &ForecastOutcome) -> Result<()> {
    let config = &request.config;
    if config.rate_mode != RateMode::Auto || outcome.plan.at_ceiling {
        return Ok(());
    }
    let rate = outcome.games_per_day();
    ensure!(rate >= 0.0, "negative rate {rate}");
    if config.starting_honor >= config.honor_target {
        ensure!(rate.abs() < f64::EPSILON, "target already met but rate is {rate}");
        return Ok(());
    }

    let empty = OverrideMap::empty();
    let reaches = |games: f64| {
        compute_forecast(config, &empty, games)
            .final_honor()
            .is_some_and(|honor| honor >= config.honor_target)
    };
    ensure!(reaches(rate), "{rate} games/day misses the target");
    let lower = rate - MINIMALITY_PROBE;
    if lower >= 0.0 {
        ensure!(
            !reaches(lower),
            "{lower} games/day also reaches the target; {rate} is not minimal"
        );
    }
    Ok(())
}
