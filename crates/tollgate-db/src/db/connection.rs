use std::time::Duration;

use diesel_async::AsyncPgConnection;
use diesel_async::pooled_connection::AsyncDieselConnectionManager;
use diesel_async::pooled_connection::bb8::{Pool, PooledConnection};
use futures::future::BoxFuture;
use tollgate_core::config::DatabaseConfig;

use crate::db::DbProvider;
use crate::error::DbResult;

pub type DbPool = Pool<AsyncPgConnection>;
pub type DbConnection<'pool> = PooledConnection<'pool, AsyncPgConnection>;

/// ## Summary
/// Creates the connection pool described by `config`.
///
/// Connections are opened lazily, so an unreachable server surfaces on the
/// first checkout rather than here.
///
/// ## Errors
/// Returns an error if no URL is configured or the pool cannot be built.
#[tracing::instrument(
    skip(config),
    fields(max_connections = config.max_connections, connect_timeout_secs = config.connect_timeout_secs)
)]
pub async fn create_pool(config: &DatabaseConfig) -> anyhow::Result<DbPool> {
    let manager = AsyncDieselConnectionManager::<AsyncPgConnection>::new(config.url()?);

    let pool = Pool::builder()
        .max_size(u32::from(config.max_connections.max(1)))
        .connection_timeout(Duration::from_secs(config.connect_timeout_secs))
        .test_on_check_out(false)
        .build(manager)
        .await?;

    tracing::info!("Authorization store pool ready");

    Ok(pool)
}

impl DbProvider for DbPool {
    fn get_connection(&self) -> BoxFuture<'_, DbResult<DbConnection<'_>>> {
        Box::pin(async move {
            let conn = self.get().await?;
            tracing::trace!(idle = self.state().idle_connections, "Connection checked out");
            Ok(conn)
        })
    }
}
