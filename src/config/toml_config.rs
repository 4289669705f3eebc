use crate::config::Settings;
use crate::utils::error::{EnrichError, Result};
use crate::utils::validation::Validate;
use regex::Regex;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    pub provider: Option<ProviderConfig>,
    pub output: Option<OutputConfig>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProviderConfig {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub text_model: Option<String>,
    pub image_model: Option<String>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputConfig {
    pub path: Option<String>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(EnrichError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| EnrichError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${GEMINI_API_KEY})，未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| EnrichError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// Overlays the values present in this file onto `settings`.
    pub fn apply_to(&self, settings: &mut Settings) {
        if let Some(provider) = &self.provider {
            if let Some(api_key) = &provider.api_key {
                if is_unresolved_placeholder(api_key) {
                    tracing::warn!(
                        "⚠️ provider.api_key references an unset variable ({}), ignoring it",
                        api_key
                    );
                } else {
                    settings.api_key = api_key.clone();
                }
            }
            if let Some(base_url) = &provider.base_url {
                settings.base_url = base_url.clone();
            }
            if let Some(text_model) = &provider.text_model {
                settings.text_model = text_model.clone();
            }
            if let Some(image_model) = &provider.image_model {
                settings.image_model = image_model.clone();
            }
            if let Some(timeout) = provider.timeout_seconds {
                settings.timeout_seconds = timeout;
            }
        }

        if let Some(path) = self.output.as_ref().and_then(|o| o.path.as_ref()) {
            settings.output_path = Some(path.clone());
        }
    }

    pub fn to_settings(&self) -> Settings {
        let mut settings = Settings::default();
        self.apply_to(&mut settings);
        settings
    }
}

fn is_unresolved_placeholder(value: &str) -> bool {
    value.starts_with("${") && value.ends_with('}')
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.to_settings().validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::ConfigProvider;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn parses_full_file() {
        let config = TomlConfig::from_toml_str(
            r#"
[provider]
api_key = "abc123"
base_url = "http://localhost:9000"
text_model = "gemini-2.0-flash"
timeout_seconds = 15

[output]
path = "./reports"
"#,
        )
        .unwrap();

        let settings = config.to_settings();
        assert_eq!(settings.api_key(), "abc123");
        assert_eq!(settings.base_url(), "http://localhost:9000");
        assert_eq!(settings.text_model(), "gemini-2.0-flash");
        assert_eq!(settings.image_model(), crate::config::DEFAULT_IMAGE_MODEL);
        assert_eq!(settings.timeout_seconds(), 15);
        assert_eq!(settings.output_path(), Some("./reports"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn substitutes_environment_variables() {
        std::env::set_var("MISS_CAN_TEST_KEY", "from-env");
        let config = TomlConfig::from_toml_str(
            r#"
[provider]
api_key = "${MISS_CAN_TEST_KEY}"
"#,
        )
        .unwrap();
        assert_eq!(config.to_settings().api_key, "from-env");
    }

    #[test]
    fn unresolved_key_is_ignored() {
        let config = TomlConfig::from_toml_str(
            r#"
[provider]
api_key = "${MISS_CAN_DEFINITELY_UNSET_VAR}"
"#,
        )
        .unwrap();
        assert_eq!(config.to_settings().api_key, "");
    }

    #[test]
    fn empty_file_yields_defaults() {
        let config = TomlConfig::from_toml_str("").unwrap();
        assert_eq!(config.to_settings(), Settings::default());
    }

    #[test]
    fn rejects_invalid_values() {
        let config = TomlConfig::from_toml_str(
            r#"
[provider]
timeout_seconds = 0
"#,
        )
        .unwrap();
        assert!(config.validate().is_err());

        assert!(TomlConfig::from_toml_str("[provider\nbase_url = 1").is_err());
    }

    #[test]
    fn loads_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[output]\npath = \"out\"").unwrap();
        let config = TomlConfig::from_file(file.path()).unwrap();
        assert_eq!(config.to_settings().output_path.as_deref(), Some("out"));

        assert!(matches!(
            TomlConfig::from_file("/nonexistent/miss-can.toml"),
            Err(EnrichError::IoError(_))
        ));
    }
}
