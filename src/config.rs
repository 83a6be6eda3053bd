//! Configuration management for simbld_users
//!
//! Values are layered: built-in defaults, then an optional `simbld_users.toml`
//! in the working directory, then `SIMBLD_USERS__*` environment variables
//! (a `.env` file is loaded first when present). Nested keys use `__`, e.g.
//! `SIMBLD_USERS__PAGINATION__MAX_LIMIT=50`.

use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;
use std::str::FromStr;
use thiserror::Error;

const CONFIG_FILE: &str = "simbld_users";
const ENV_PREFIX: &str = "SIMBLD_USERS";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration source error: {0}")]
    Source(#[from] config::ConfigError),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Complete configuration of the user catalog helpers
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct UsersConfig {
    pub log_level: String,
    pub pagination: PaginationConfig,
    pub password: PasswordPolicy,
    pub settings: SettingsDefaults,
    pub avatar: AvatarConfig,
}

/// Page size bounds applied to listing filters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PaginationConfig {
    pub default_limit: u32,
    pub max_limit: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PasswordPolicy {
    pub min_length: usize,
}

/// Values a settings row starts with when a user is created
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SettingsDefaults {
    pub theme: String,
    pub language: String,
    pub timezone: String,
    pub date_format: String,
    pub time_format: String,
    pub sidebar_collapsed: bool,
    pub items_per_page: u32,
    pub default_application_view: String,
    pub show_welcome_message: bool,
    pub default_dashboard_tab: String,
}

/// Avatar upload limits and the public location uploads are served from
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AvatarConfig {
    pub public_base_url: String,
    pub max_size_bytes: u64,
    pub allowed_mime_types: Vec<String>,
}

impl Default for UsersConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            pagination: PaginationConfig::default(),
            password: PasswordPolicy::default(),
            settings: SettingsDefaults::default(),
            avatar: AvatarConfig::default(),
        }
    }
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_limit: 10,
            max_limit: 100,
        }
    }
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            min_length: 8,
        }
    }
}

impl Default for SettingsDefaults {
    fn default() -> Self {
        Self {
            theme: "light".to_string(),
            language: "fr".to_string(),
            timezone: "Europe/Paris".to_string(),
            date_format: "DD/MM/YYYY".to_string(),
            time_format: "HH:mm".to_string(),
            sidebar_collapsed: false,
            items_per_page: 10,
            default_application_view: "list".to_string(),
            show_welcome_message: true,
            default_dashboard_tab: "overview".to_string(),
        }
    }
}

impl Default for AvatarConfig {
    fn default() -> Self {
        Self {
            public_base_url: "/uploads/avatars".to_string(),
            max_size_bytes: 5 * 1024 * 1024,
            allowed_mime_types: vec![
                "image/jpeg".to_string(),
                "image/png".to_string(),
                "image/gif".to_string(),
                "image/webp".to_string(),
            ],
        }
    }
}

/// Load configuration from `.env`, `simbld_users.toml` and the environment
pub fn load_config() -> Result<UsersConfig, ConfigError> {
    // 1. Pick up a local .env when there is one
    dotenvy::dotenv().ok();

    // 2. Layer the file and environment sources
    let source = Config::builder()
        .add_source(File::with_name(CONFIG_FILE).required(false))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("avatar.allowed_mime_types"),
        )
        .build()?;

    // 3. Deserialize and validate
    finish(source)
}

impl UsersConfig {
    /// Build a configuration from an inline TOML document
    pub fn from_toml_str(toml: &str) -> Result<Self, ConfigError> {
        let source = Config::builder().add_source(File::from_str(toml, FileFormat::Toml)).build()?;
        finish(source)
    }

    pub fn log_level_filter(&self) -> log::LevelFilter {
        log::LevelFilter::from_str(&self.log_level).unwrap_or(log::LevelFilter::Info)
    }
}

fn finish(source: Config) -> Result<UsersConfig, ConfigError> {
    let config: UsersConfig = source.try_deserialize()?;
    validate_config(&config)?;
    log::debug!(
        "Loaded users config: default_limit={}, max_limit={}",
        config.pagination.default_limit,
        config.pagination.max_limit
    );
    Ok(config)
}

fn validate_config(config: &UsersConfig) -> Result<(), ConfigError> {
    if log::LevelFilter::from_str(&config.log_level).is_err() {
        return Err(ConfigError::Invalid(format!("unknown log level '{}'", config.log_level)));
    }

    let pagination = &config.pagination;
    if pagination.max_limit == 0 {
        return Err(ConfigError::Invalid("pagination.max_limit must be positive".to_string()));
    }
    if pagination.default_limit == 0 || pagination.default_limit > pagination.max_limit {
        return Err(ConfigError::Invalid(format!(
            "pagination.default_limit must be within 1..={}",
            pagination.max_limit
        )));
    }

    if config.password.min_length == 0 {
        return Err(ConfigError::Invalid("password.min_length must be positive".to_string()));
    }

    let items = config.settings.items_per_page;
    if items == 0 || items > pagination.max_limit {
        return Err(ConfigError::Invalid(format!(
            "settings.items_per_page must be within 1..={}",
            pagination.max_limit
        )));
    }

    if config.avatar.max_size_bytes == 0 {
        return Err(ConfigError::Invalid("avatar.max_size_bytes must be positive".to_string()));
    }
    if config.avatar.allowed_mime_types.is_empty() {
        return Err(ConfigError::Invalid("avatar.allowed_mime_types can't be empty".to_string()));
    }

    Ok(())
}
