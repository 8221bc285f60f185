use thiserror::Error;

use crate::validation::ValidationReport;

/// Errors returned by the validated forecast entry points.
#[derive(Debug, Error)]
pub enum ForecastError {
    #[error("invalid forecast configuration: {0}")]
    InvalidConfig(ValidationReport),
    #[error("failed to parse forecast input: {0}")]
    Parse(#[from] serde_json::Error),
}

impl ForecastError {
    /// The validation report, when the configuration was rejected.
    #[must_use]
    pub const fn report(&self) -> Option<&ValidationReport> {
        match self {
            Self::InvalidConfig(report) => Some(report),
            Self::Parse(_) => None,
        }
    }
}
