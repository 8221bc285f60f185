use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

use crate::checks::run_invariant_checks;
use crate::scenarios::ForecastScenario;
use honor_forecast::ForecastCache;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub scenario_name: String,
    pub passed: bool,
    pub failures: Vec<String>,
    pub games_per_day: Option<f64>,
    pub goal_day: Option<u32>,
    pub days: usize,
    #[serde(with = "duration_serde")]
    pub duration: Duration,
}

pub struct ScenarioRunner {
    verbose: bool,
    cache: ForecastCache,
}

impl ScenarioRunner {
    pub fn new(verbose: bool) -> Self {
        Self {
            verbose,
            cache: ForecastCache::new(),
        }
    }

    pub fn run_all(&mut self, scenarios: &[ForecastScenario]) -> Vec<ScenarioResult> {
        scenarios
            .iter()
            .map(|scenario| self.run_scenario(scenario))
            .collect()
    }

    pub fn run_scenario(&mut self, scenario: &ForecastScenario) -> ScenarioResult {
        if self.verbose {
            println!(
                "🧪 Testing scenario: {} ({})",
                scenario.key.bright_white(),
                scenario.description
            );
        }

        let start = Instant::now();
        let request = &scenario.request;
        let outcome = match self.cache.get_or_run(&request.config, &request.entries) {
            Ok(outcome) => outcome,
            Err(err) => {
                log::warn!("scenario {} rejected: {err}", scenario.key);
                return ScenarioResult {
                    scenario_name: scenario.key.clone(),
                    passed: false,
                    failures: vec![format!("forecast failed: {err}")],
                    games_per_day: None,
                    goal_day: None,
                    days: 0,
                    duration: start.elapsed(),
                };
            }
        };

        let mut failures = run_invariant_checks(request, &outcome);
        for expectation in &scenario.expectations {
            if let Err(err) = expectation.evaluate(request, &outcome) {
                failures.push(format!("expectation: {err:#}"));
            }
        }
        let duration = start.elapsed();

        if self.verbose {
            if failures.is_empty() {
                println!(
                    "  ✅ {} days at {:.1} games/day, goal day {:?} ({duration:?})",
                    outcome.days().len(),
                    outcome.games_per_day(),
                    outcome.summary.goal_day
                );
            } else {
                for failure in &failures {
                    println!("  ❌ {}", failure.red());
                }
            }
        }

        ScenarioResult {
            scenario_name: scenario.key.clone(),
            passed: failures.is_empty(),
            failures,
            games_per_day: Some(outcome.games_per_day()),
            goal_day: outcome.summary.goal_day,
            days: outcome.days().len(),
            duration,
        }
    }

    pub const fn cache(&self) -> &ForecastCache {
        &self.cache
    }
}

mod duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_millis().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u128::deserialize(deserializer)?;
        Ok(Duration::from_millis(u64::try_from(millis).unwrap_or(0)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenarios::get_scenario;
    use honor_forecast::ForecastConfig;

    #[test]
    fn catalog_scenario_passes() {
        let mut runner = ScenarioRunner::new(false);
        let result = runner.run_scenario(&get_scenario("default").unwrap());
        assert!(result.passed, "{:?}", result.failures);
        assert_eq!(result.days, 28);
        assert!(result.goal_day.is_some());
    }

    #[test]
    fn invalid_config_is_a_failure() {
        let scenario = ForecastScenario::new(
            "broken",
            "negative win rate",
            ForecastConfig {
                win_rate: -0.5,
                ..ForecastConfig::default()
            },
        );
        let mut runner = ScenarioRunner::new(false);
        let result = runner.run_scenario(&scenario);
        assert!(!result.passed);
        assert!(result.failures[0].contains("win_rate"));
        assert!(result.games_per_day.is_none());
    }

    #[test]
    fn repeated_scenarios_hit_the_cache() {
        let scenario = get_scenario("quest-only").unwrap();
        let mut runner = ScenarioRunner::new(false);
        let results = runner.run_all(&[scenario.clone(), scenario]);
        assert!(results.iter().all(|r| r.passed));
        assert_eq!(runner.cache().hits(), 1);
    }

    #[test]
    fn result_serializes_duration_as_millis() {
        let result = ScenarioResult {
            scenario_name: "x".to_string(),
            passed: true,
            failures: Vec::new(),
            games_per_day: Some(1.5),
            goal_day: Some(3),
            days: 10,
            duration: Duration::from_millis(42),
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["duration"], 42);
    }
}
