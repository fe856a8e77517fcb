use thiserror::Error;

/// Database layer errors
#[derive(Error, Debug)]
pub enum DbError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] diesel::result::Error),

    #[error("Pool error: {0}")]
    PoolError(#[from] diesel_async::pooled_connection::bb8::RunError),

    #[error("Authorization not found: {0}")]
    NotFound(uuid::Uuid),

    #[error("Expected at most one authorization, found {count}")]
    NonUniqueResult { count: usize },

    #[error(transparent)]
    CoreError(#[from] tollgate_core::error::CoreError),
}

pub type DbResult<T> = std::result::Result<T, DbError>;
