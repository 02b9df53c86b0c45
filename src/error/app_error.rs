use thiserror::Error;

/// Application-wide error type.
///
/// Each variant maps to one HTTP status in the error handler middleware.
/// Duplicates are not errors and never reach this type.
#[derive(Error, Debug)]
pub enum AppError {
    /// Validation error with field-specific details
    #[error("Validation failed for {field}: {reason}")]
    Validation { field: String, reason: String },

    /// Malformed inbound payload
    #[error("Bad request: {message}")]
    BadRequest { message: String },

    /// Destination has no target URL or is not registered
    #[error("Destination '{destination}' is not configured")]
    ServiceUnavailable { destination: String },

    /// Rendered payload could not be serialised
    #[error("Translation failed for {destination}")]
    Translation {
        destination: String,
        #[source]
        source: serde_json::Error,
    },

    /// Destination could not be reached or did not answer in time
    #[error("Upstream error from {destination}")]
    Upstream {
        destination: String,
        #[source]
        source: anyhow::Error,
    },

    /// Configuration error with key information
    #[error("Configuration error: {key}")]
    Configuration {
        key: String,
        #[source]
        source: anyhow::Error,
    },

    /// Internal error for unexpected failures
    #[error("Internal error")]
    Internal {
        #[source]
        source: anyhow::Error,
    },
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        AppError::Internal { source: error }
    }
}

impl From<crate::config::ConfigError> for AppError {
    fn from(error: crate::config::ConfigError) -> Self {
        AppError::Configuration {
            key: error.key(),
            source: error.into(),
        }
    }
}

/// Type alias for Result with AppError to simplify function signatures
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = AppError::ServiceUnavailable {
            destination: "zulip".to_string(),
        };
        assert_eq!(err.to_string(), "Destination 'zulip' is not configured");

        let err = AppError::Validation {
            field: "fizzy.root_url".to_string(),
            reason: "relative URL without a base".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Validation failed for fizzy.root_url: relative URL without a base"
        );
    }

    #[test]
    fn test_anyhow_converts_to_internal() {
        let err: AppError = anyhow::anyhow!("boom").into();
        assert!(matches!(err, AppError::Internal { .. }));
    }

    #[test]
    fn test_config_error_converts_to_configuration() {
        let err: AppError = crate::config::ConfigError::validation("server.port", "must not be 0").into();
        match err {
            AppError::Configuration { key, .. } => assert_eq!(key, "server.port"),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
