//! Schema setup for the authorization table.

use diesel_async::{AsyncPgConnection, SimpleAsyncConnection};

use crate::error::DbResult;

const AUTHORIZATION_RECORD: &str = include_str!("../../migrations/0001_authorization_record.sql");

/// ## Summary
/// Creates the authorization table and its indexes if they are missing.
///
/// The statements are idempotent, so this can run on every start.
///
/// ## Errors
/// Returns `DatabaseError` if a statement fails.
#[tracing::instrument(skip(conn))]
pub async fn run_migrations(conn: &mut AsyncPgConnection) -> DbResult<()> {
    conn.batch_execute(AUTHORIZATION_RECORD).await?;
    tracing::info!("Authorization schema is up to date");
    Ok(())
}
