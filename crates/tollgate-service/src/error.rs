use thiserror::Error;

use crate::auth::denied::AuthorizationDenied;
use crate::auth::validate::ReservedIdentifierUsed;

/// Service layer errors - combines all error types
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error(transparent)]
    AuthorizationDenied(#[from] AuthorizationDenied),

    #[error(transparent)]
    ReservedIdentifier(#[from] ReservedIdentifierUsed),

    #[error(transparent)]
    DatabaseError(#[from] tollgate_db::error::DbError),

    #[error(transparent)]
    CoreError(#[from] tollgate_core::error::CoreError),

    #[error("{0}")]
    NotFound(String),
}

impl ServiceError {
    /// Returns `true` for failures of the authorization store, as opposed to
    /// denials and validation errors raised for the caller.
    #[must_use]
    pub const fn is_infrastructure(&self) -> bool {
        matches!(self, Self::DatabaseError(_))
    }
}

pub type ServiceResult<T> = std::result::Result<T, ServiceError>;
