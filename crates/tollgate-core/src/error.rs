use thiserror::Error;

use crate::types::ResourceType;

/// Core-level errors
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Unknown permission '{name}' for resource type '{resource_type}'")]
    UnknownPermission {
        name: String,
        resource_type: ResourceType,
    },
}

pub type CoreResult<T> = std::result::Result<T, CoreError>;
