use thiserror::Error;

#[derive(Error, Debug)]
pub enum EnrichError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Provider returned {status}: {message}")]
    ProviderError { status: u16, message: String },

    #[error("Provider response had no content: {message}")]
    MissingContent { message: String },

    #[error("Provider response violated schema: {message}")]
    SchemaViolation { message: String },

    #[error("No API key configured")]
    MissingApiKey,

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unknown {kind} id: {id}")]
    UnknownCatalogId { kind: &'static str, id: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Provider,
    Data,
    Configuration,
    Catalog,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl EnrichError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            EnrichError::ApiError(_) => ErrorCategory::Network,
            EnrichError::ProviderError { .. } | EnrichError::MissingApiKey => {
                ErrorCategory::Provider
            }
            EnrichError::SerializationError(_)
            | EnrichError::MissingContent { .. }
            | EnrichError::SchemaViolation { .. } => ErrorCategory::Data,
            EnrichError::ConfigError { .. } | EnrichError::InvalidConfigValueError { .. } => {
                ErrorCategory::Configuration
            }
            EnrichError::UnknownCatalogId { .. } => ErrorCategory::Catalog,
            EnrichError::IoError(_) => ErrorCategory::System,
        }
    }

    /// 提供者錯誤都會被降級處理，因此屬於低嚴重度
    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Network | ErrorCategory::Provider | ErrorCategory::Data => {
                ErrorSeverity::Low
            }
            ErrorCategory::Catalog => ErrorSeverity::Medium,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            EnrichError::ApiError(_) => "Check network connectivity or raise --timeout-seconds",
            EnrichError::ProviderError { status, .. } if *status == 401 || *status == 403 => {
                "Check that the API key is valid for the Gemini API"
            }
            EnrichError::ProviderError { .. } => "The provider rejected the request; try again later",
            EnrichError::MissingContent { .. } | EnrichError::SchemaViolation { .. } => {
                "The provider reply was unusable; fallback content is shown instead"
            }
            EnrichError::SerializationError(_) => "The provider reply was not valid JSON",
            EnrichError::MissingApiKey => "Set API_KEY or pass --api-key",
            EnrichError::ConfigError { .. } | EnrichError::InvalidConfigValueError { .. } => {
                "Fix the configuration file or command line flags"
            }
            EnrichError::UnknownCatalogId { .. } => "Run `miss-can list` to see valid ids",
            EnrichError::IoError(_) => "Check that the output directory is writable",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            EnrichError::UnknownCatalogId { kind, id } => {
                format!("There is no {} with id '{}' in the pantry", kind, id)
            }
            EnrichError::InvalidConfigValueError { field, reason, .. } => {
                format!("Configuration '{}' is invalid: {}", field, reason)
            }
            EnrichError::IoError(e) => format!("Could not write output: {}", e),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, EnrichError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_failures_are_low_severity() {
        let err = EnrichError::ProviderError {
            status: 500,
            message: "boom".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Provider);
        assert_eq!(err.severity(), ErrorSeverity::Low);
        assert_eq!(EnrichError::MissingApiKey.severity(), ErrorSeverity::Low);
    }

    #[test]
    fn unknown_id_message_names_the_id() {
        let err = EnrichError::UnknownCatalogId {
            kind: "product",
            id: "99".to_string(),
        };
        assert_eq!(err.severity(), ErrorSeverity::Medium);
        assert!(err.user_friendly_message().contains("'99'"));
    }

    #[test]
    fn config_errors_are_high_severity() {
        let parse = EnrichError::ConfigError {
            message: "TOML parsing error".to_string(),
        };
        let invalid = EnrichError::InvalidConfigValueError {
            field: "provider.timeout_seconds".to_string(),
            value: "0".to_string(),
            reason: "Value must be at least 1".to_string(),
        };
        for err in [&parse, &invalid] {
            assert_eq!(err.category(), ErrorCategory::Configuration);
            assert_eq!(err.severity(), ErrorSeverity::High);
        }
        assert_eq!(
            invalid.user_friendly_message(),
            "Configuration 'provider.timeout_seconds' is invalid: Value must be at least 1"
        );
    }
}
