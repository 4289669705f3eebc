#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::{CliConfig, Command};

use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_non_empty_string, validate_path, validate_positive_number, validate_url, Validate,
};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_TEXT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_IMAGE_MODEL: &str = "imagen-4.0-generate-001";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 60;

/// Fully resolved provider and output settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_key: String,
    pub base_url: String,
    pub text_model: String,
    pub image_model: String,
    pub timeout_seconds: u64,
    pub output_path: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            text_model: DEFAULT_TEXT_MODEL.to_string(),
            image_model: DEFAULT_IMAGE_MODEL.to_string(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            output_path: None,
        }
    }
}

impl ConfigProvider for Settings {
    fn api_key(&self) -> &str {
        &self.api_key
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }

    fn text_model(&self) -> &str {
        &self.text_model
    }

    fn image_model(&self) -> &str {
        &self.image_model
    }

    fn timeout_seconds(&self) -> u64 {
        self.timeout_seconds
    }

    fn output_path(&self) -> Option<&str> {
        self.output_path.as_deref()
    }
}

// An empty API key is allowed: every enrichment then degrades to fallback content.
impl Validate for Settings {
    fn validate(&self) -> Result<()> {
        validate_url("provider.base_url", &self.base_url)?;
        validate_non_empty_string("provider.text_model", &self.text_model)?;
        validate_non_empty_string("provider.image_model", &self.image_model)?;
        validate_positive_number("provider.timeout_seconds", self.timeout_seconds, 1)?;
        if let Some(path) = &self.output_path {
            validate_path("output.path", path)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::{assert_err, assert_ok};

    #[test]
    fn defaults_point_at_gemini() {
        let settings = Settings::default();
        assert_eq!(settings.base_url(), "https://generativelanguage.googleapis.com");
        assert_eq!(settings.text_model(), "gemini-2.5-flash");
        assert_eq!(settings.image_model(), "imagen-4.0-generate-001");
        assert!(settings.output_path().is_none());
        assert_ok!(settings.validate());
    }

    #[test]
    fn rejects_zero_timeout_and_bad_urls() {
        let zero = Settings {
            timeout_seconds: 0,
            ..Settings::default()
        };
        assert_err!(zero.validate());

        let bad_url = Settings {
            base_url: "generativelanguage".to_string(),
            ..Settings::default()
        };
        assert_err!(bad_url.validate());

        let blank_output = Settings {
            output_path: Some(String::new()),
            ..Settings::default()
        };
        assert_err!(blank_output.validate());
    }
}
