//! Configuration validation. Collects every violated invariant instead of
//! stopping at the first one.
use std::fmt;

use chrono::NaiveDate;
use thiserror::Error;

use crate::config::{ForecastConfig, RateMode};

/// A single violated configuration invariant.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigIssue {
    #[error("{field} must be a finite number")]
    NonFinite { field: String },
    #[error("{field} must be between {min} and {max} (got {value})")]
    RangeViolation {
        field: String,
        min: f64,
        max: f64,
        value: f64,
    },
    #[error("{field} must be >= {min} (got {value})")]
    MinViolation { field: String, min: f64, value: f64 },
    #[error("{field} must be > 0 (got {value})")]
    PositiveViolation { field: String, value: f64 },
    #[error("end_date {end} must be on or after start_date {start}")]
    EndBeforeStart { start: NaiveDate, end: NaiveDate },
    #[error("expansion_start_date {date} must fall between {start} and {end}")]
    ExpansionOutsideRange {
        date: NaiveDate,
        start: NaiveDate,
        end: NaiveDate,
    },
}

impl ConfigIssue {
    #[must_use]
    pub fn field(&self) -> &str {
        match self {
            Self::NonFinite { field }
            | Self::RangeViolation { field, .. }
            | Self::MinViolation { field, .. }
            | Self::PositiveViolation { field, .. } => field.as_str(),
            Self::EndBeforeStart { .. } => "end_date",
            Self::ExpansionOutsideRange { .. } => "expansion_start_date",
        }
    }
}

/// Every issue found in one configuration, in field order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationReport {
    pub issues: Vec<ConfigIssue>,
}

impl ValidationReport {
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }

    /// Human-readable messages, one per issue.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.issues.iter().map(ToString::to_string).collect()
    }

    #[must_use]
    pub fn mentions(&self, field: &str) -> bool {
        self.issues.iter().any(|issue| issue.field() == field)
    }

    fn push(&mut self, issue: ConfigIssue) {
        self.issues.push(issue);
    }

    fn require_min(&mut self, field: &str, value: f64, min: f64) {
        if !value.is_finite() {
            self.push(ConfigIssue::NonFinite {
                field: field.to_string(),
            });
        } else if value < min {
            self.push(ConfigIssue::MinViolation {
                field: field.to_string(),
                min,
                value,
            });
        }
    }

    fn require_positive(&mut self, field: &str, value: f64) {
        if !value.is_finite() {
            self.push(ConfigIssue::NonFinite {
                field: field.to_string(),
            });
        } else if value <= 0.0 {
            self.push(ConfigIssue::PositiveViolation {
                field: field.to_string(),
                value,
            });
        }
    }

    fn require_range(&mut self, field: &str, value: f64, min: f64, max: f64) {
        if !value.is_finite() {
            self.push(ConfigIssue::NonFinite {
                field: field.to_string(),
            });
        } else if !(min..=max).contains(&value) {
            self.push(ConfigIssue::RangeViolation {
                field: field.to_string(),
                min,
                max,
                value,
            });
        }
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.messages().join("; "))
    }
}

/// Validate a configuration against every documented invariant.
#[must_use]
pub fn validate_config(config: &ForecastConfig) -> ValidationReport {
    let mut report = ValidationReport::default();

    report.require_range("win_rate", config.win_rate, 0.0, 1.0);

    for (bg, values) in config.bg_honor.iter() {
        report.require_min(
            &format!("bg_honor.{}.honor_per_win", bg.key()),
            values.honor_per_win,
            0.0,
        );
        report.require_min(
            &format!("bg_honor.{}.honor_per_loss", bg.key()),
            values.honor_per_loss,
            0.0,
        );
    }
    report.require_min("daily_quest_honor", config.daily_quest_honor, 0.0);
    report.require_min("turn_in_honor", config.turn_in_honor, 0.0);

    report.require_positive("bg_honor_mult", config.bg_honor_mult);
    report.require_positive("quest_honor_mult", config.quest_honor_mult);

    if config.end_date < config.start_date {
        report.push(ConfigIssue::EndBeforeStart {
            start: config.start_date,
            end: config.end_date,
        });
    }
    if let Some(date) = config.expansion_start_date
        && (date < config.start_date || date > config.end_date)
    {
        report.push(ConfigIssue::ExpansionOutsideRange {
            date,
            start: config.start_date,
            end: config.end_date,
        });
    }

    report.require_min("starting_honor", config.starting_honor, 0.0);
    report.require_min("starting_marks", config.starting_marks, 0.0);
    report.require_positive("honor_target", config.honor_target);
    report.require_min("marks_threshold_per_bg", config.marks_threshold_per_bg, 0.0);

    if let RateMode::Manual { games_per_day } = config.rate_mode {
        report.require_min("rate_mode.games_per_day", games_per_day, 0.0);
    }

    if !report.is_valid() {
        log::debug!("configuration rejected: {report}");
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn default_config_is_valid() {
        let report = validate_config(&ForecastConfig::default());
        assert!(report.is_valid(), "{report}");
    }

    #[test]
    fn win_rate_must_be_probability() {
        let mut cfg = ForecastConfig::default();
        cfg.win_rate = 1.5;
        let report = validate_config(&cfg);
        assert!(report.mentions("win_rate"));
        cfg.win_rate = -0.1;
        assert!(validate_config(&cfg).mentions("win_rate"));
        cfg.win_rate = f64::NAN;
        assert_eq!(
            validate_config(&cfg).issues,
            vec![ConfigIssue::NonFinite {
                field: "win_rate".to_string()
            }]
        );
    }

    #[test]
    fn collects_every_issue() {
        let cfg = ForecastConfig {
            win_rate: 2.0,
            bg_honor_mult: 0.0,
            quest_honor_mult: -1.0,
            honor_target: 0.0,
            starting_marks: -5.0,
            marks_threshold_per_bg: -1.0,
            end_date: date(2023, 1, 1),
            ..ForecastConfig::default()
        };
        let report = validate_config(&cfg);
        assert_eq!(report.issues.len(), 7);
        for field in [
            "win_rate",
            "bg_honor_mult",
            "quest_honor_mult",
            "honor_target",
            "starting_marks",
            "marks_threshold_per_bg",
            "end_date",
        ] {
            assert!(report.mentions(field), "missing {field}");
        }
        assert_eq!(report.messages().len(), 7);
    }

    #[test]
    fn negative_rewards_are_rejected_per_battleground() {
        let mut cfg = ForecastConfig::default();
        cfg.bg_honor.eots.honor_per_loss = -1.0;
        cfg.turn_in_honor = -2.0;
        let report = validate_config(&cfg);
        assert!(report.mentions("bg_honor.eots.honor_per_loss"));
        assert!(report.mentions("turn_in_honor"));
    }

    #[test]
    fn expansion_date_must_sit_inside_range() {
        let mut cfg = ForecastConfig::default();
        cfg.expansion_start_date = Some(cfg.end_date);
        assert!(validate_config(&cfg).is_valid());
        cfg.expansion_start_date = Some(date(2030, 1, 1));
        assert!(validate_config(&cfg).mentions("expansion_start_date"));
    }

    #[test]
    fn manual_rate_must_be_non_negative() {
        let cfg = ForecastConfig::default().with_rate_mode(RateMode::Manual {
            games_per_day: -3.0,
        });
        let report = validate_config(&cfg);
        assert!(report.mentions("rate_mode.games_per_day"));
        assert!(report.to_string().contains("rate_mode.games_per_day must be >= 0"));
    }

    #[test]
    fn equal_start_and_end_is_allowed() {
        let mut cfg = ForecastConfig::default();
        cfg.end_date = cfg.start_date;
        assert!(validate_config(&cfg).is_valid());
    }
}
