use crate::cli::OutputFormat;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const APP_NAME: &str = "onetv";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Default output format
    pub default_output_format: OutputFormat,

    /// Timeout of one extraction attempt in seconds
    pub default_timeout: u64,

    /// Default number of retries
    pub default_retries: u32,

    /// Stream selection used when none is given, e.g. "best" or "720p,best"
    pub default_quality: Option<String>,

    /// Auto-select best quality stream by default
    pub auto_select: bool,

    /// Include extra metadata by default
    pub include_extras: bool,

    /// Enable colored output
    pub colored_output: bool,

    /// Default proxy URL (supports http, https, socks5)
    pub default_proxy: Option<String>,

    /// Default proxy username (if proxy requires authentication)
    pub default_proxy_username: Option<String>,

    /// Default proxy password (if proxy requires authentication)
    pub default_proxy_password: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_output_format: OutputFormat::Pretty,
            default_timeout: 30,
            default_retries: 3,
            default_quality: None,
            auto_select: false,
            include_extras: true,
            colored_output: true,
            default_proxy: None,
            default_proxy_username: None,
            default_proxy_password: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from an explicit file or the default location
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        match config_path {
            Some(path) => {
                if path.exists() {
                    let content = std::fs::read_to_string(path)
                        .context("Failed to read configuration file")?;
                    Self::parse(&content)
                } else {
                    Ok(Self::default())
                }
            }
            None => confy::load(APP_NAME, None).context("Failed to load configuration"),
        }
    }

    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse configuration file")
    }

    /// Get default configuration file path
    pub fn default_config_path() -> Option<PathBuf> {
        confy::get_configuration_file_path(APP_NAME, None).ok()
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let toml_string =
            toml::to_string_pretty(self).context("Failed to serialize configuration")?;

        std::fs::write(path, toml_string).context("Failed to write configuration file")?;

        Ok(())
    }

    /// Reset configuration to defaults and save
    pub fn reset(config_path: Option<&Path>) -> Result<()> {
        let path = config_path
            .map(|p| p.to_path_buf())
            .or_else(Self::default_config_path)
            .context("No configuration path available")?;

        Self::default().save(&path)
    }

    /// Show current configuration as a formatted string
    pub fn show(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize configuration for display")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shown_config_parses_back() {
        let config = AppConfig {
            default_output_format: OutputFormat::JsonCompact,
            default_quality: Some("720p,best".to_string()),
            ..AppConfig::default()
        };
        let shown = config.show().unwrap();
        assert!(shown.contains("default_output_format = \"json-compact\""));
        assert_eq!(AppConfig::parse(&shown).unwrap(), config);
    }

    #[test]
    fn missing_fields_take_defaults() {
        let config = AppConfig::parse("default_retries = 0\n").unwrap();
        assert_eq!(config.default_retries, 0);
        assert_eq!(config.default_timeout, 30);
        assert_eq!(config.default_output_format, OutputFormat::Pretty);
    }

    #[test]
    fn missing_explicit_file_is_default() {
        let config = AppConfig::load(Some(Path::new("/nonexistent/onetv/config.toml"))).unwrap();
        assert_eq!(config, AppConfig::default());
    }
}
