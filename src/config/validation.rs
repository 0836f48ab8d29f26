//! Configuration validation.
//!
//! Every problem is collected so the operator can fix them in one pass.

use super::{Config, Settings};
use std::path::Path;
use thiserror::Error;
use warden_proto::Snowflake;

/// Validation errors for configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("discord.token (TOKEN) is required")]
    MissingToken,
    #[error("discord.application_id (CLIENT_ID) is required")]
    MissingApplicationId,
    #[error("discord.application_id must be a numeric id, got '{0}'")]
    InvalidApplicationId(String),
    #[error("discord.guild_id (GUILD_ID) is required")]
    MissingGuildId,
    #[error("discord.guild_id must be a numeric id, got '{0}'")]
    InvalidGuildId(String),
    #[error("storage.allowlist_path parent directory does not exist: {0}")]
    AllowListDirMissing(String),
    #[error("metrics.port must not be 0")]
    InvalidMetricsPort,
}

/// Validate a configuration, returning the resolved settings or every
/// error found.
pub fn validate(config: &Config) -> Result<Settings, Vec<ValidationError>> {
    let mut errors = Vec::new();

    let token = match &config.discord.token {
        Some(token) if !token.is_empty() => Some(token.clone()),
        _ => {
            errors.push(ValidationError::MissingToken);
            None
        }
    };

    let application_id = parse_id(
        config.discord.application_id.as_deref(),
        ValidationError::MissingApplicationId,
        ValidationError::InvalidApplicationId,
        &mut errors,
    );
    let guild_id = parse_id(
        config.discord.guild_id.as_deref(),
        ValidationError::MissingGuildId,
        ValidationError::InvalidGuildId,
        &mut errors,
    );

    let path = &config.storage.allowlist_path;
    if let Some(parent) = Path::new(path).parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        errors.push(ValidationError::AllowListDirMissing(
            parent.display().to_string(),
        ));
    }

    if config.metrics.port == Some(0) {
        errors.push(ValidationError::InvalidMetricsPort);
    }

    match (token, application_id, guild_id) {
        (Some(token), Some(application_id), Some(guild_id)) if errors.is_empty() => Ok(Settings {
            token,
            application_id,
            guild_id,
            allowlist_path: path.clone(),
            metrics_port: config.metrics.port,
        }),
        _ => Err(errors),
    }
}

fn parse_id(
    raw: Option<&str>,
    missing: ValidationError,
    invalid: fn(String) -> ValidationError,
    errors: &mut Vec<ValidationError>,
) -> Option<Snowflake> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        errors.push(missing);
        return None;
    };
    match raw.parse() {
        Ok(id) => Some(id),
        Err(_) => {
            errors.push(invalid(raw.to_string()));
            None
        }
    }
}
