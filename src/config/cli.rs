use crate::config::toml_config::TomlConfig;
use crate::config::Settings;
use crate::utils::error::Result;
use clap::{Parser, Subcommand};

#[derive(Debug, Clone, Parser)]
#[command(name = "miss-can")]
#[command(about = "Browse the Miss Can pantry and generate AI tasting notes")]
pub struct CliConfig {
    #[command(subcommand)]
    pub command: Command,

    /// Path to a TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[arg(long, env = "API_KEY", hide_env_values = true, global = true)]
    pub api_key: Option<String>,

    #[arg(long, global = true)]
    pub base_url: Option<String>,

    #[arg(long, global = true)]
    pub text_model: Option<String>,

    #[arg(long, global = true)]
    pub image_model: Option<String>,

    #[arg(long, global = true)]
    pub timeout_seconds: Option<u64>,

    /// Directory to write enrichment reports into
    #[arg(short, long, global = true)]
    pub output: Option<String>,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Emit logs as JSON lines")]
    pub log_json: bool,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// List products and recipes
    List,
    /// Open a product and generate its tasting notes and photo
    Product { id: String },
    /// Open the product a recipe is built around
    Recipe { id: String },
}

impl CliConfig {
    /// Defaults, then the TOML file, then command line flags.
    pub fn resolve(&self) -> Result<Settings> {
        let mut settings = Settings::default();

        if let Some(path) = &self.config {
            tracing::info!("📁 Loading configuration from: {}", path);
            TomlConfig::from_file(path)?.apply_to(&mut settings);
        }

        if let Some(api_key) = &self.api_key {
            settings.api_key = api_key.clone();
        }
        if let Some(base_url) = &self.base_url {
            settings.base_url = base_url.clone();
        }
        if let Some(text_model) = &self.text_model {
            settings.text_model = text_model.clone();
        }
        if let Some(image_model) = &self.image_model {
            settings.image_model = image_model.clone();
        }
        if let Some(timeout) = self.timeout_seconds {
            settings.timeout_seconds = timeout;
        }
        if let Some(output) = &self.output {
            settings.output_path = Some(output.clone());
        }

        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn parses_product_subcommand_with_global_flags() {
        let cli = CliConfig::try_parse_from([
            "miss-can",
            "product",
            "4",
            "--timeout-seconds",
            "10",
            "--api-key",
            "k",
        ])
        .unwrap();

        assert!(matches!(&cli.command, Command::Product { id } if id == "4"));
        let settings = cli.resolve().unwrap();
        assert_eq!(settings.timeout_seconds, 10);
        assert_eq!(settings.api_key, "k");
    }

    #[test]
    fn flags_override_config_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[provider]\ntext_model = \"from-file\"\nimage_model = \"image-from-file\"\n\n[output]\npath = \"file-out\""
        )
        .unwrap();
        let path = file.path().to_string_lossy().into_owned();

        let cli = CliConfig::try_parse_from([
            "miss-can",
            "--config",
            path.as_str(),
            "--text-model",
            "from-flag",
            "recipe",
            "r2",
        ])
        .unwrap();

        let settings = cli.resolve().unwrap();
        assert_eq!(settings.text_model, "from-flag");
        assert_eq!(settings.image_model, "image-from-file");
        assert_eq!(settings.output_path.as_deref(), Some("file-out"));
    }
}
