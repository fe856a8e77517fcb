use futures::future::BoxFuture;

use crate::error::DbResult;

pub mod connection;
pub mod migrate;
pub mod query_builders;
pub mod schema;

/// Source of pooled connections for the PostgreSQL store.
pub trait DbProvider: Send + Sync {
    fn get_connection(&self) -> BoxFuture<'_, DbResult<connection::DbConnection<'_>>>;
}
