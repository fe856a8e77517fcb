use anyhow::Result;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder};
use serde::Deserialize;

use crate::constants::DEFAULT_TASK_PERMISSION;
use crate::error::{CoreError, CoreResult};
use crate::permission::Permission;
use crate::types::ResourceType;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub database: DatabaseConfig,
    pub authorization: AuthorizationConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    pub max_connections: u8,
    /// Seconds to wait for a pooled connection before failing.
    pub connect_timeout_secs: u64,
}

impl DatabaseConfig {
    /// ## Summary
    /// Returns the configured database URL.
    ///
    /// ## Errors
    /// Returns `ConfigError` if no URL is configured.
    pub fn url(&self) -> CoreResult<&str> {
        self.url
            .as_deref()
            .ok_or_else(|| CoreError::ConfigError("database.url is not set".to_string()))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthorizationConfig {
    /// When `false`, operations run without permission checks. Default
    /// authorizations are still provisioned.
    pub enabled: bool,
    pub default_task_permission: String,
    /// Permission granted to candidate groups; falls back to
    /// `default_task_permission`.
    pub default_group_task_permission: Option<String>,
    /// Require `READ_VARIABLE` instead of `READ` to read task variables.
    pub enforce_specific_variable_permission: bool,
}

impl AuthorizationConfig {
    /// ## Summary
    /// Resolves the permission granted to users linked to a task.
    ///
    /// ## Errors
    /// Returns `UnknownPermission` if the configured name is not a task permission.
    pub fn task_permission(&self) -> CoreResult<Permission> {
        Permission::for_resource(&self.default_task_permission, ResourceType::Task)
    }

    /// ## Summary
    /// Resolves the permission granted to groups linked to a task.
    ///
    /// ## Errors
    /// Returns `UnknownPermission` if the configured name is not a task permission.
    pub fn group_task_permission(&self) -> CoreResult<Permission> {
        match &self.default_group_task_permission {
            Some(name) => Permission::for_resource(name, ResourceType::Task),
            None => self.task_permission(),
        }
    }
}

impl Default for AuthorizationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            default_task_permission: DEFAULT_TASK_PERMISSION.to_string(),
            default_group_task_permission: None,
            enforce_specific_variable_permission: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl Settings {
    /// ## Summary
    /// Returns a builder seeded with the default value of every setting.
    ///
    /// ## Errors
    /// Returns an error if a default cannot be set.
    pub fn defaults() -> Result<ConfigBuilder<DefaultState>> {
        Ok(Config::builder()
            .set_default("database.max_connections", 4)?
            .set_default("database.connect_timeout_secs", 30)?
            .set_default("authorization.enabled", true)?
            .set_default("authorization.default_task_permission", DEFAULT_TASK_PERMISSION)?
            .set_default("authorization.enforce_specific_variable_permission", false)?
            .set_default("logging.level", "info")?)
    }

    /// ## Summary
    /// Loads configuration from `.env` file and environment variables into a `Settings`.
    /// Environment variables take precedence over `config.toml` values.
    ///
    /// ## Errors
    /// Returns an error if building the configuration or deserializing it fails.
    pub fn load() -> Result<Self> {
        Ok(Self::defaults()?
            // TOML file
            .add_source(config::File::with_name("config.toml").required(false))
            // Environment, TOLLGATE_AUTHORIZATION__ENABLED=false style
            .add_source(
                config::Environment::with_prefix("TOLLGATE")
                    .prefix_separator("_")
                    .separator("__")
                    .ignore_empty(true)
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize::<Settings>()?)
    }
}

/// ## Summary
/// Loads configuration from environment variables and `.env` file.
///
/// ## Errors
/// Returns an error if loading or deserializing the configuration fails.
pub fn load_config() -> Result<Settings> {
    dotenvy::dotenv().ok();

    Settings::load()
}
