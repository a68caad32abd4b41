//! CLI configuration loading

use std::path::{Path, PathBuf};

use integration_pronunciation::PronunciationConfig;
use serde::{Deserialize, Serialize};

/// Environment variable prefix, e.g. `PRONOUNCE_PRONUNCIATION__TIMEOUT_SECS`
const ENV_PREFIX: &str = "PRONOUNCE";

/// Default configuration file name (extension optional)
const DEFAULT_CONFIG_FILE: &str = "pronounce";

/// Top-level CLI configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Provider and download settings
    #[serde(default)]
    pub pronunciation: PronunciationConfig,

    /// Directory downloaded audio is stored in
    #[serde(default = "default_media_dir")]
    pub media_dir: PathBuf,
}

fn default_media_dir() -> PathBuf {
    PathBuf::from("media")
}

impl AppConfig {
    /// Load configuration from an optional file and the environment
    ///
    /// Without an explicit path, `pronounce.toml` in the working directory is
    /// used when present.
    pub fn load(path: Option<&Path>) -> Result<Self, config::ConfigError> {
        let file = match path {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        let builder = config::Config::builder()
            .set_default("media_dir", "media")?
            // Load from file if exists
            .add_source(file)
            // Override with environment variables
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Parse configuration from TOML text
    pub fn from_toml(text: &str) -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::File::from_str(text, config::FileFormat::Toml))
            .build()?
            .try_deserialize()
    }
}
