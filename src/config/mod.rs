//! Configuration loading and validation.
//!
//! - [`types`]: config structs, file loading and environment overrides
//! - [`validation`]: checks that resolve a [`Config`] into [`Settings`]

mod types;
mod validation;

pub use types::{
    BotToken, Config, ConfigError, DEFAULT_CONFIG_PATH, DiscordConfig, MetricsConfig, Settings,
    StorageConfig,
};
pub use validation::{ValidationError, validate};
