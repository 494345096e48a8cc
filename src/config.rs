use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use validator::{Validate, ValidationErrors};

/// Errors raised while loading settings
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid configuration: {0}")]
    Invalid(#[from] ValidationErrors),
}

/// Application configuration
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct Settings {
    #[validate(nested)]
    pub provider: ProviderSettings,
    #[serde(default)]
    #[validate(nested)]
    pub reconcile: ReconcileSettings,
    #[validate(nested)]
    pub files: FileSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ProviderSettings {
    #[validate(length(min = 1))]
    pub region: String,
    #[validate(length(min = 1))]
    pub index_name: String,
    /// Country allow-list, empty means unfiltered
    #[serde(default)]
    pub countries: Vec<String>,
    pub api_key: Option<String>,
    /// Overrides the regional endpoint
    pub endpoint: Option<String>,
    /// Zero would fail every request
    #[validate(range(min = 1))]
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ReconcileSettings {
    #[serde(default = "default_confidence_threshold")]
    #[validate(range(min = 0.0, max = 1.0))]
    pub confidence_threshold: f64,
}

impl Default for ReconcileSettings {
    fn default() -> Self {
        Self {
            confidence_threshold: default_confidence_threshold(),
        }
    }
}

fn default_confidence_threshold() -> f64 { 0.8 }

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct FileSettings {
    #[validate(length(min = 1))]
    pub input: String,
    /// Base name for the success and error files
    #[validate(length(min = 1))]
    pub output: String,
    pub output_dir: Option<PathBuf>,
    /// Reject rows with unparsable coordinates instead of using 0.0
    #[serde(default)]
    pub strict_coordinates: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

fn environment() -> Environment {
    // e.g., GEOAUDIT_PROVIDER__REGION -> provider.region
    Environment::with_prefix("GEOAUDIT")
        .prefix_separator("_")
        .separator("__")
        .list_separator(",")
        .with_list_parse_key("provider.countries")
        .try_parsing(true)
}

impl Settings {
    /// Load configuration from files and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Configuration file (config/default.*)
    /// 2. Local overrides (config/local.*)
    /// 3. `extra`, when given (must exist)
    /// 4. Environment variables (prefixed with GEOAUDIT_)
    /// 5. LOCATION_API_KEY for the provider API key
    pub fn load(extra: Option<&Path>) -> Result<Self, SettingsError> {
        let mut builder = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false));

        if let Some(path) = extra {
            builder = builder.add_source(File::from(path));
        }

        let settings = builder.add_source(environment()).build()?;
        let settings = substitute_secrets(settings)?;

        Self::finish(settings)
    }

    fn finish(settings: Config) -> Result<Self, SettingsError> {
        let settings: Settings = settings.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }
}

/// Keep the provider key out of config files
fn substitute_secrets(settings: Config) -> Result<Config, ConfigError> {
    match std::env::var("LOCATION_API_KEY") {
        Ok(api_key) if !api_key.is_empty() => Config::builder()
            .add_source(settings)
            .set_override("provider.api_key", api_key)?
            .build(),
        _ => Ok(settings),
    }
}
