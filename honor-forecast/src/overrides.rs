//! Caller-supplied actual results that re-anchor the forecast.
use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Observed end-of-day values for one day. Absent fields keep the computed value.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DayOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_honor_end_of_day: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_marks_end_of_day: Option<f64>,
}

impl DayOverrides {
    #[must_use]
    pub const fn honor(value: f64) -> Self {
        Self {
            actual_honor_end_of_day: Some(value),
            actual_marks_end_of_day: None,
        }
    }

    #[must_use]
    pub const fn marks(value: f64) -> Self {
        Self {
            actual_honor_end_of_day: None,
            actual_marks_end_of_day: Some(value),
        }
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.actual_honor_end_of_day.is_none() && self.actual_marks_end_of_day.is_none()
    }
}

/// A user entry for a day, as stored by the collaborator layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayEntry {
    pub day_index: u32,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overrides: Option<DayOverrides>,
}

impl DayEntry {
    #[must_use]
    pub const fn new(day_index: u32, date: NaiveDate, overrides: DayOverrides) -> Self {
        Self {
            day_index,
            date,
            overrides: Some(overrides),
        }
    }

    /// Parse an entry list from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload is not a list of day entries.
    pub fn list_from_json(json: &str) -> Result<Vec<Self>, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Day-indexed override lookup built once per forecast run.
///
/// Later entries for the same day replace earlier ones.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OverrideMap {
    by_day: BTreeMap<u32, DayOverrides>,
}

impl OverrideMap {
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_entries(entries: &[DayEntry]) -> Self {
        let by_day = entries
            .iter()
            .filter_map(|entry| entry.overrides.map(|o| (entry.day_index, o)))
            .collect();
        Self { by_day }
    }

    #[must_use]
    pub fn get(&self, day_index: u32) -> Option<&DayOverrides> {
        self.by_day.get(&day_index)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.by_day.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_day.is_empty()
    }
}
