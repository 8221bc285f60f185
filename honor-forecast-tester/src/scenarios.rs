use std::fs;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, ensure};
use chrono::{Days, NaiveDate};

use honor_forecast::{
    DayEntry, DayOverrides, ForecastConfig, ForecastOutcome, ForecastRequest, GoalStatus,
    MarkTracking, Phase, RateMode, solve_required_rate,
};

/// Assertion hook run after a scenario's forecast completes.
type ScenarioExpectationFn =
    Arc<dyn Fn(&ForecastRequest, &ForecastOutcome) -> Result<()> + Send + Sync + 'static>;

#[derive(Clone)]
pub struct ScenarioExpectation(ScenarioExpectationFn);

impl std::fmt::Debug for ScenarioExpectation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScenarioExpectation").finish()
    }
}

impl ScenarioExpectation {
    pub fn evaluate(&self, request: &ForecastRequest, outcome: &ForecastOutcome) -> Result<()> {
        (self.0)(request, outcome)
    }
}

impl<F> From<F> for ScenarioExpectation
where
    F: Fn(&ForecastRequest, &ForecastOutcome) -> Result<()> + Send + Sync + 'static,
{
    fn from(f: F) -> Self {
        Self(Arc::new(f))
    }
}

/// A named forecast input plus the expectations specific to it.
#[derive(Debug, Clone)]
pub struct ForecastScenario {
    pub key: String,
    pub description: String,
    pub request: ForecastRequest,
    pub expectations: Vec<ScenarioExpectation>,
}

impl ForecastScenario {
    #[must_use]
    pub fn new(key: impl Into<String>, description: impl Into<String>, config: ForecastConfig) -> Self {
        Self {
            key: key.into(),
            description: description.into(),
            request: ForecastRequest {
                config,
                entries: Vec::new(),
            },
            expectations: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_entries(mut self, entries: Vec<DayEntry>) -> Self {
        self.request.entries = entries;
        self
    }

    #[must_use]
    pub fn with_expectation(mut self, expectation: impl Into<ScenarioExpectation>) -> Self {
        self.expectations.push(expectation.into());
        self
    }

    /// Load a `{config, entries}` document; the file stem becomes the key.
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let request = ForecastRequest::from_json(&raw)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        let key = path
            .file_stem()
            .map_or_else(|| "custom".to_string(), |stem| stem.to_string_lossy().into_owned());
        Ok(Self {
            key,
            description: format!("Loaded from {}", path.display()),
            request,
            expectations: Vec::new(),
        })
    }
}

const SCENARIO_KEYS: [(&str, &str); 9] = [
    ("default", "Bundled default configuration, solved rate"),
    ("no-turn-ins", "Turn-ins disabled; honor comes from games and the daily quest"),
    ("already-met", "Starting honor above the target"),
    ("quest-only", "Daily quest alone covers the target"),
    ("expansion", "Expansion begins mid-window and adds a fourth battleground"),
    ("per-lane", "Marks tracked per battleground lane"),
    ("manual", "Fixed games per day on an open horizon"),
    ("overrides", "Reported actuals re-anchor the forecast"),
    ("unreachable", "Target beyond the solver ceiling"),
];

#[must_use]
pub fn list_scenarios() -> Vec<(&'static str, &'static str)> {
    SCENARIO_KEYS.to_vec()
}

#[must_use]
pub fn scenario_keys() -> Vec<String> {
    SCENARIO_KEYS.iter().map(|(key, _)| (*key).to_string()).collect()
}

#[must_use]
pub fn get_scenario(key: &str) -> Option<ForecastScenario> {
    let description = SCENARIO_KEYS
        .iter()
        .find(|(candidate, _)| *candidate == key)
        .map(|(_, description)| *description)?;
    let base = ForecastConfig::default_config();
    let scenario = match key {
        "default" => ForecastScenario::new(key, description, base).with_expectation(goal_in_window),
        "no-turn-ins" => ForecastScenario::new(
            key,
            description,
            ForecastConfig {
                enable_turn_ins: false,
                ..base
            },
        )
        .with_expectation(no_turn_ins_expectation),
        "already-met" => ForecastScenario::new(
            key,
            description,
            ForecastConfig {
                starting_honor: base.honor_target + 5_000.0,
                ..base
            },
        )
        .with_expectation(zero_rate_goal_on_day_one),
        "quest-only" => ForecastScenario::new(
            key,
            description,
            ForecastConfig {
                honor_target: 10_000.0,
                ..base
            },
        )
        .with_expectation(quest_only_expectation),
        "expansion" => {
            let switch = offset_date(base.start_date, 14);
            ForecastScenario::new(
                key,
                description,
                ForecastConfig {
                    expansion_start_date: Some(switch),
                    ..base
                },
            )
            .with_expectation(expansion_expectation)
        }
        "per-lane" => ForecastScenario::new(
            key,
            description,
            ForecastConfig {
                mark_tracking: MarkTracking::PerLane,
                ..base
            },
        )
        .with_expectation(per_lane_expectation),
        "manual" => ForecastScenario::new(
            key,
            description,
            base.with_rate_mode(RateMode::Manual {
                games_per_day: 20.0,
            }),
        )
        .with_expectation(manual_expectation),
        "overrides" => {
            let entries = vec![
                DayEntry::new(5, offset_date(base.start_date, 4), DayOverrides::honor(15_000.0)),
                DayEntry::new(6, offset_date(base.start_date, 5), DayOverrides::marks(149.0)),
            ];
            ForecastScenario::new(key, description, base)
                .with_entries(entries)
                .with_expectation(overrides_expectation)
        }
        "unreachable" => ForecastScenario::new(
            key,
            description,
            ForecastConfig {
                honor_target: 1.0e12,
                ..base
            },
        )
        .with_expectation(unreachable_expectation),
        _ => return None,
    };
    Some(scenario)
}

fn offset_date(start: NaiveDate, days: u64) -> NaiveDate {
    start.checked_add_days(Days::new(days)).unwrap_or(start)
}

fn goal_in_window(_request: &ForecastRequest, outcome: &ForecastOutcome) -> Result<()> {
    ensure!(
        outcome.summary.goal_status() == GoalStatus::Reached,
        "goal status is {:?}",
        outcome.summary.goal_status()
    );
    ensure!(outcome.games_per_day() > 0.0, "expected a positive rate");
    Ok(())
}

fn no_turn_ins_expectation(request: &ForecastRequest, outcome: &ForecastOutcome) -> Result<()> {
    ensure!(
        outcome.days().iter().all(|day| day.turn_in_sets == 0),
        "turn-ins happened while disabled"
    );
    let with_turn_ins = ForecastConfig {
        enable_turn_ins: true,
        ..request.config.clone()
    };
    let baseline = solve_required_rate(&with_turn_ins).games_per_day;
    ensure!(
        outcome.games_per_day() >= baseline,
        "disabling turn-ins lowered the rate from {baseline} to {}",
        outcome.games_per_day()
    );
    Ok(())
}

fn zero_rate_goal_on_day_one(_request: &ForecastRequest, outcome: &ForecastOutcome) -> Result<()> {
    ensure!(
        outcome.games_per_day().abs() < f64::EPSILON,
        "expected rate 0, got {}",
        outcome.games_per_day()
    );
    ensure!(
        outcome.summary.goal_day == Some(1),
        "goal day is {:?}",
        outcome.summary.goal_day
    );
    Ok(())
}

fn quest_only_expectation(_request: &ForecastRequest, outcome: &ForecastOutcome) -> Result<()> {
    ensure!(
        outcome.games_per_day().abs() < f64::EPSILON,
        "expected rate 0, got {}",
        outcome.games_per_day()
    );
    ensure!(
        outcome.days().iter().all(|day| day.honor_from_bgs.abs() < f64::EPSILON),
        "battleground honor earned at rate 0"
    );
    ensure!(outcome.goal_day().is_some(), "goal not reached");
    Ok(())
}

fn expansion_expectation(request: &ForecastRequest, outcome: &ForecastOutcome) -> Result<()> {
    let Some(switch) = request.config.expansion_start_date else {
        anyhow::bail!("scenario has no expansion date");
    };
    for day in outcome.days() {
        let expected = if day.date >= switch {
            Phase::Tbc
        } else {
            Phase::Classic
        };
        ensure!(
            day.phase == expected,
            "day {} ({}) ran in {:?}",
            day.day_index,
            day.date,
            day.phase
        );
        let reserve = request.config.marks_threshold_per_bg * f64::from(expected.num_bgs());
        ensure!(
            (day.marks_reserve - reserve).abs() < 1e-9,
            "day {} reserve {} != {reserve}",
            day.day_index,
            day.marks_reserve
        );
    }
    Ok(())
}

fn per_lane_expectation(request: &ForecastRequest, outcome: &ForecastOutcome) -> Result<()> {
    let config = &request.config;
    let lanes = f64::from(config.phase.num_bgs());
    for day in outcome.days() {
        ensure!(
            (day.marks_reserve - config.marks_threshold_per_bg).abs() < 1e-9,
            "day {} per-lane reserve is {}",
            day.day_index,
            day.marks_reserve
        );
        let pooled_gain = day.expected_marks_gained * lanes;
        let expected = day.games_planned * honor_forecast::expected_marks_per_game(config.win_rate);
        ensure!(
            (pooled_gain - expected).abs() < 1e-9,
            "day {} lane gain {} does not split {expected} marks evenly",
            day.day_index,
            day.expected_marks_gained
        );
    }
    Ok(())
}

fn manual_expectation(request: &ForecastRequest, outcome: &ForecastOutcome) -> Result<()> {
    let RateMode::Manual { games_per_day } = request.config.rate_mode else {
        anyhow::bail!("scenario is not in manual mode");
    };
    ensure!(
        (outcome.games_per_day() - games_per_day).abs() < f64::EPSILON,
        "manual rate {games_per_day} was not used"
    );
    let goal = outcome
        .summary
        .goal_day
        .context("goal never reached in manual mode")?;
    let expected = (goal + honor_forecast::constants::OPEN_HORIZON_EXTRA_DAYS)
        .min(honor_forecast::constants::OPEN_HORIZON_MAX_DAYS);
    ensure!(
        outcome.days().len() == expected as usize,
        "open horizon ran {} days, expected {expected}",
        outcome.days().len()
    );
    Ok(())
}

fn overrides_expectation(_request: &ForecastRequest, outcome: &ForecastOutcome) -> Result<()> {
    let applied: Vec<u32> = outcome
        .days()
        .iter()
        .filter(|day| day.override_applied)
        .map(|day| day.day_index)
        .collect();
    ensure!(applied == vec![5, 6], "overrides applied on days {applied:?}");
    Ok(())
}

fn unreachable_expectation(_request: &ForecastRequest, outcome: &ForecastOutcome) -> Result<()> {
    ensure!(outcome.plan.at_ceiling, "solver did not report its ceiling");
    ensure!(
        outcome.summary.goal_status() == GoalStatus::NotReached,
        "goal status is {:?}",
        outcome.summary.goal_status()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_listed_key_resolves() {
        for key in scenario_keys() {
            let scenario = get_scenario(&key).unwrap();
            assert_eq!(scenario.key, key);
            assert!(!scenario.expectations.is_empty());
        }
        assert_eq!(scenario_keys().len(), list_scenarios().len());
    }

    #[test]
    fn unknown_key_is_none() {
        assert!(get_scenario("bogus").is_none());
    }

    #[test]
    fn catalog_expectations_hold() {
        for scenario in scenario_keys().iter().filter_map(|key| get_scenario(key)) {
            let outcome = scenario.request.run().unwrap();
            for expectation in &scenario.expectations {
                expectation
                    .evaluate(&scenario.request, &outcome)
                    .unwrap_or_else(|err| panic!("{}: {err:#}", scenario.key));
            }
        }
    }

    #[test]
    fn scenario_file_uses_stem_as_key() {
        let path = std::env::temp_dir().join("honor-forecast-scenario-stem.json");
        fs::write(
            &path,
            r#"{"config": {"start_date": "2024-05-01", "end_date": "2024-05-07"}}"#,
        )
        .unwrap();
        let scenario = ForecastScenario::from_file(&path).unwrap();
        assert_eq!(scenario.key, "honor-forecast-scenario-stem");
        assert!(scenario.request.entries.is_empty());
        assert_eq!(scenario.request.config.total_days(), 7);
    }
}
