//! Memoized forecast runs keyed by a digest of their inputs.
use std::collections::HashMap;
use std::hash::Hasher;

use twox_hash::XxHash64;

use crate::config::ForecastConfig;
use crate::error::ForecastError;
use crate::overrides::DayEntry;
use crate::plan::{ForecastOutcome, run_forecast};

/// Stable digest of a `(config, entries)` pair.
///
/// # Errors
///
/// Returns an error if the inputs cannot be serialized.
pub fn input_digest(config: &ForecastConfig, entries: &[DayEntry]) -> Result<u64, ForecastError> {
    let bytes = serde_json::to_vec(&(config, entries))?;
    let mut hasher = XxHash64::with_seed(0);
    hasher.write(&bytes);
    Ok(hasher.finish())
}

#[derive(Debug)]
struct CachedRun {
    config: ForecastConfig,
    entries: Vec<DayEntry>,
    outcome: ForecastOutcome,
}

impl CachedRun {
    fn matches(&self, config: &ForecastConfig, entries: &[DayEntry]) -> bool {
        self.config == *config && self.entries == entries
    }
}

/// Remembers successful outcomes so identical inputs are simulated once.
///
/// Failed runs are not cached. A digest match only counts as a hit when the
/// stored inputs compare equal; otherwise the slot is replaced.
#[derive(Debug, Default)]
pub struct ForecastCache {
    outcomes: HashMap<u64, CachedRun>,
    hits: u64,
    misses: u64,
}

impl ForecastCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached outcome for these inputs, running the forecast on a miss.
    ///
    /// # Errors
    ///
    /// Propagates validation and serialization errors from the run.
    pub fn get_or_run(
        &mut self,
        config: &ForecastConfig,
        entries: &[DayEntry],
    ) -> Result<ForecastOutcome, ForecastError> {
        let key = input_digest(config, entries)?;
        if let Some(cached) = self.outcomes.get(&key)
            && cached.matches(config, entries)
        {
            self.hits += 1;
            log::trace!("forecast cache hit {key:016x}");
            return Ok(cached.outcome.clone());
        }

        self.misses += 1;
        let outcome = run_forecast(config, entries)?;
        self.outcomes.insert(
            key,
            CachedRun {
                config: config.clone(),
                entries: entries.to_vec(),
                outcome: outcome.clone(),
            },
        );
        Ok(outcome)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    #[must_use]
    pub const fn hits(&self) -> u64 {
        self.hits
    }

    #[must_use]
    pub const fn misses(&self) -> u64 {
        self.misses
    }

    pub fn clear(&mut self) {
        self.outcomes.clear();
    }
}
