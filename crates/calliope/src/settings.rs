//! Configuration loading.
//!
//! Bundled defaults ship inside the binary; user overrides are read
//! from `./calliope.toml` or `~/.config/calliope/calliope.toml`, with
//! user values taking precedence.

use calliope_error::{CalliopeResult, ConfigError};
use calliope_rate_limit::RetryPolicies;
use config::{Config, File, FileFormat};
use serde::Deserialize;

/// Bundled default configuration.
const DEFAULTS: &str = include_str!("../calliope.toml");

/// Model identifiers per call kind.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelSettings {
    /// Model for text and JSON generation
    pub text: String,
    /// Model for image generation
    pub image: String,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            text: "gemini-2.5-flash".to_string(),
            image: "gemini-2.5-flash-image".to_string(),
        }
    }
}

/// Analysis stage settings.
#[derive(Debug, Clone, Copy, Deserialize, Default)]
pub struct AnalysisSettings {
    /// Ground competitor/trend findings with live web search
    #[serde(default)]
    pub web_search: bool,
}

/// Image stage settings.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ImageSettings {
    /// Image calls per minute; None means unlimited
    #[serde(default)]
    pub rpm: Option<u32>,
    /// Fixed delay between posts during the batch fill, in seconds
    #[serde(default = "default_throttle_secs")]
    pub throttle_secs: u64,
}

fn default_throttle_secs() -> u64 {
    8
}

impl Default for ImageSettings {
    fn default() -> Self {
        Self {
            rpm: None,
            throttle_secs: default_throttle_secs(),
        }
    }
}

/// Full application configuration.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct CalliopeConfig {
    /// Model identifiers
    #[serde(default)]
    pub models: ModelSettings,
    /// Analysis stage settings
    #[serde(default)]
    pub analysis: AnalysisSettings,
    /// Image stage settings
    #[serde(default)]
    pub image: ImageSettings,
    /// Retry budgets per call class
    #[serde(default)]
    pub retry: RetryPolicies,
}

impl CalliopeConfig {
    /// Load configuration: bundled defaults merged with user overrides.
    pub fn load() -> CalliopeResult<Self> {
        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULTS, FileFormat::Toml));

        if let Some(config_dir) = dirs::config_dir() {
            let user_path = config_dir.join("calliope").join("calliope.toml");
            builder = builder.add_source(
                File::from(user_path).format(FileFormat::Toml).required(false),
            );
        }

        builder = builder.add_source(
            File::with_name("calliope").format(FileFormat::Toml).required(false),
        );

        let config = builder
            .build()
            .map_err(|e| ConfigError::new(format!("Failed to load configuration: {}", e)))?;

        config
            .try_deserialize()
            .map_err(|e| ConfigError::new(format!("Invalid configuration: {}", e)).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_defaults_deserialize() {
        let config = Config::builder()
            .add_source(File::from_str(DEFAULTS, FileFormat::Toml))
            .build()
            .unwrap();
        let settings: CalliopeConfig = config.try_deserialize().unwrap();

        assert_eq!(settings.models.text, "gemini-2.5-flash");
        assert_eq!(settings.image.throttle_secs, 8);
        assert!(settings.analysis.web_search);
        assert_eq!(settings.retry.image.max_retries, 3);
        assert_eq!(settings.retry.text.backoff_factor, 1.5);
    }

    #[test]
    fn empty_config_falls_back_to_defaults() {
        let config = Config::builder()
            .add_source(File::from_str("", FileFormat::Toml))
            .build()
            .unwrap();
        let settings: CalliopeConfig = config.try_deserialize().unwrap();

        assert_eq!(settings.image.throttle_secs, 8);
        assert!(settings.image.rpm.is_none());
    }
}
