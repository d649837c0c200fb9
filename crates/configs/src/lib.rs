//! # configs
//!
//! Layered application settings. Sources, lowest precedence first:
//! built-in defaults, `config/default.toml`, `config/local.toml`, then
//! `UNFILTERED__SECTION__KEY` environment variables. A `.env` file is read
//! before the environment layer outside of tests.

use std::net::SocketAddr;
use std::path::Path;

use config::{Config, Environment, File, FileFormat};
use moderation_adapters::BlocklistRules;
use serde::{Deserialize, Serialize};
use services::StoreLimits;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub bind_address: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self { bind_address: "127.0.0.1:8080".to_string() }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Default `EnvFilter` directive when `RUST_LOG` is unset
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self { level: "info".to_string(), format: LogFormat::Pretty }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedGroup {
    pub name: String,
    pub description: String,
}

/// Groups created at boot; the store is volatile so they are recreated on every start.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SeedSettings {
    pub groups: Vec<SeedGroup>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub logging: LoggingSettings,
    pub limits: StoreLimits,
    pub moderation: BlocklistRules,
    pub seed: SeedSettings,
}

impl Settings {
    /// Loads from `./config` and the environment.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(Path::new("config"))
    }

    pub fn load_from(dir: &Path) -> Result<Self, ConfigError> {
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        let settings: Settings = Config::builder()
            .add_source(File::from(dir.join("default.toml")).required(false))
            .add_source(File::from(dir.join("local.toml")).required(false))
            .add_source(
                Environment::with_prefix("UNFILTERED")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;
        settings.validate()?;
        tracing::debug!(dir = %dir.display(), "configuration loaded");
        Ok(settings)
    }

    /// Parses a TOML document on top of the defaults, without touching the environment.
    pub fn from_toml(source: &str) -> Result<Self, ConfigError> {
        let settings: Settings = Config::builder()
            .add_source(File::from_str(source, FileFormat::Toml))
            .build()?
            .try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn bind_address(&self) -> Result<SocketAddr, ConfigError> {
        self.server.bind_address.parse().map_err(|e: std::net::AddrParseError| {
            ConfigError::InvalidValue("server.bind_address".to_string(), e.to_string())
        })
    }

    fn validate(&self) -> Result<(), ConfigError> {
        self.bind_address()?;
        let l = &self.limits;
        if l.group_name_min > l.group_name_max {
            return Err(ConfigError::InvalidValue(
                "limits.group_name_min".to_string(),
                format!("{} exceeds group_name_max {}", l.group_name_min, l.group_name_max),
            ));
        }
        if l.group_description_min > l.group_description_max {
            return Err(ConfigError::InvalidValue(
                "limits.group_description_min".to_string(),
                format!(
                    "{} exceeds group_description_max {}",
                    l.group_description_min, l.group_description_max
                ),
            ));
        }
        Ok(())
    }
}
