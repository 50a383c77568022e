//! Planner error types

use thiserror::Error;

/// Errors that abort a planning session before a terminal outcome is reached
///
/// Hard infeasibility (weather blocks, budget exhaustion, ...) is not an
/// error: those are expected terminal outcomes carried by
/// [`PlanOutcome`](crate::session::PlanOutcome). `PlanError` covers the two
/// cases where no outcome can be produced at all: the request never entered
/// the pipeline, or a collaborator the pipeline cannot work without failed.
#[derive(Debug, Error)]
pub enum PlanError {
    #[error("invalid trip request: {0}")]
    InvalidRequest(String),

    #[error("weather forecast unavailable: {0}")]
    Weather(String),

    #[error("lodging search failed: {0}")]
    Lodging(String),
}

/// Error returned by an external collaborator lookup
#[derive(Debug, Error)]
#[error("{0}")]
pub struct ProviderError(pub String);

impl ProviderError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PlanError::InvalidRequest("end date before start date".to_string());
        assert_eq!(err.to_string(), "invalid trip request: end date before start date");

        let err = PlanError::Weather("timeout".to_string());
        assert!(err.to_string().contains("forecast unavailable"));
    }

    #[test]
    fn test_provider_error_display() {
        let err = ProviderError::new("geocoding failed");
        assert_eq!(err.to_string(), "geocoding failed");
    }
}
