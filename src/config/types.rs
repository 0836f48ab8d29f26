//! Core configuration types and loading.

use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;
use warden_proto::Snowflake;
use zeroize::{Zeroize, ZeroizeOnDrop};

use super::validation::ValidationError;

/// Path read when no config file is given on the command line.
pub const DEFAULT_CONFIG_PATH: &str = "warden.toml";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid configuration: {}", join(.0))]
    Invalid(Vec<ValidationError>),
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// The bot's authentication token. Wiped from memory on drop.
#[derive(Clone, Default, PartialEq, Eq, Zeroize, ZeroizeOnDrop, Deserialize)]
#[serde(transparent)]
pub struct BotToken(String);

impl BotToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for BotToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BotToken(<redacted>)")
    }
}

/// Raw configuration as read from TOML and the environment.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub discord: DiscordConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
}

/// Platform credentials. All three values are required at startup.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DiscordConfig {
    pub token: Option<BotToken>,
    /// Application (client) id used to register commands.
    pub application_id: Option<String>,
    /// Guild the commands are registered in.
    pub guild_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    #[serde(default = "default_allowlist_path")]
    pub allowlist_path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            allowlist_path: default_allowlist_path(),
        }
    }
}

fn default_allowlist_path() -> PathBuf {
    PathBuf::from("whitelist.json")
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MetricsConfig {
    /// Serve `/metrics` on this port when set.
    pub port: Option<u16>,
}

/// Validated settings the process runs with.
#[derive(Debug, Clone)]
pub struct Settings {
    pub token: BotToken,
    pub application_id: Snowflake,
    pub guild_id: Snowflake,
    pub allowlist_path: PathBuf,
    pub metrics_port: Option<u16>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Like [`Config::load`], but a missing file yields the defaults.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        match Self::load(&path) {
            Err(ConfigError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.as_ref().display(), "No config file; using defaults");
                Ok(Self::default())
            }
            other => other,
        }
    }

    /// Override file values with `TOKEN`, `CLIENT_ID`, `GUILD_ID` and
    /// `WHITELIST_PATH` as reported by `lookup`. Empty values are ignored.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(token) = var("TOKEN") {
            self.discord.token = Some(BotToken::new(token));
        }
        if let Some(id) = var("CLIENT_ID") {
            self.discord.application_id = Some(id);
        }
        if let Some(id) = var("GUILD_ID") {
            self.discord.guild_id = Some(id);
        }
        if let Some(path) = var("WHITELIST_PATH") {
            self.storage.allowlist_path = PathBuf::from(path);
        }
    }

    /// Validate and resolve into [`Settings`].
    pub fn settings(&self) -> Result<Settings, ConfigError> {
        super::validation::validate(self).map_err(ConfigError::Invalid)
    }
}
