//! Error types for HighBond API operations.

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur during HighBond API operations.
#[derive(Debug, Error)]
pub enum HighbondError {
    /// Configuration is missing or incomplete.
    #[error("HighBond configuration required: {0}")]
    ConfigMissing(String),

    /// A configuration value could not be parsed.
    #[error("Invalid configuration value for {name}: '{value}'")]
    InvalidConfig { name: &'static str, value: String },

    /// Request rejected locally before anything was sent.
    #[error("Validation failed: {message}")]
    Validation { message: String },

    /// The requested resource does not exist.
    #[error("Resource not found: {path}")]
    NotFound { path: String },

    /// API request failed.
    #[error("HighBond API error: {message}")]
    ApiError {
        message: String,
        status_code: Option<u16>,
    },

    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// JSON parsing error.
    #[error("Failed to parse response: {0}")]
    ParseError(#[from] serde_json::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),

    /// Rate limited.
    #[error("Rate limited, retry after {retry_after_secs:?} seconds")]
    RateLimited { retry_after_secs: Option<u64> },

    /// A batch item did not finish before the batch deadline.
    #[error("Operation did not complete within {waited:?}")]
    Timeout { waited: Duration },
}

impl HighbondError {
    /// Build a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// HTTP status code carried by this error, if any.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::NotFound { .. } => Some(404),
            Self::RateLimited { .. } => Some(429),
            Self::ApiError { status_code, .. } => *status_code,
            Self::HttpError(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Result type alias for HighBond operations.
pub type Result<T> = core::result::Result<T, HighbondError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_message() {
        let err = HighbondError::validation("either 'owner' or 'owner_user_uid' is required");
        assert_eq!(
            err.to_string(),
            "Validation failed: either 'owner' or 'owner_user_uid' is required"
        );
        assert_eq!(err.status_code(), None);
    }

    #[test]
    fn test_status_codes() {
        let not_found = HighbondError::NotFound {
            path: "orgs/1/issues/9".to_string(),
        };
        assert_eq!(not_found.status_code(), Some(404));

        let api = HighbondError::ApiError {
            message: "bad".to_string(),
            status_code: Some(422),
        };
        assert_eq!(api.status_code(), Some(422));
    }
}
