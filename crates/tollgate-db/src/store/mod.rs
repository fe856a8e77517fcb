//! Storage seam for authorization records.

pub mod memory;
pub mod pg;


use futures::future::BoxFuture;

use crate::error::DbResult;
use crate::model::authorization::Authorization;
use crate::query::AuthorizationQuery;

pub use memory::MemoryAuthorizationStore;
pub use pg::PgAuthorizationStore;

pub type StoreFuture<'a, T> = BoxFuture<'a, DbResult<T>>;

/// Persistent set of authorization records.
///
/// Implementations must make [`save`](Self::save) an atomic upsert: a record
/// that occupies the slot of an existing one (same type, resource type,
/// resource id and user or group) merges its permissions into the existing
/// record instead of adding a second one.
pub trait AuthorizationStore: Send + Sync {
    /// ## Summary
    /// Inserts `authorization`, or merges its permissions into the record
    /// occupying the same slot. Returns the stored record.
    ///
    /// ## Errors
    /// Returns `CoreError` for malformed records and `DatabaseError`/`PoolError`
    /// when the backing store fails.
    fn save(&self, authorization: Authorization) -> StoreFuture<'_, Authorization>;

    /// ## Summary
    /// Replaces the record with the same id.
    ///
    /// ## Errors
    /// Returns `NotFound` if no record has that id.
    fn update(&self, authorization: Authorization) -> StoreFuture<'_, Authorization>;

    /// ## Summary
    /// Deletes the record with the given id. Returns `false` if it did not exist.
    ///
    /// ## Errors
    /// Returns an error if the backing store fails.
    fn delete(&self, id: uuid::Uuid) -> StoreFuture<'_, bool>;

    /// ## Summary
    /// Deletes every record whose resource id equals `resource_id`, whatever
    /// its resource type. Returns the number of deleted records.
    ///
    /// ## Errors
    /// Returns an error if the backing store fails.
    fn delete_for_resource<'a>(&'a self, resource_id: &'a str) -> StoreFuture<'a, usize>;

    /// ## Summary
    /// Returns the records matched by `query`.
    ///
    /// ## Errors
    /// Returns an error if the backing store fails.
    fn find<'a>(&'a self, query: &'a AuthorizationQuery) -> StoreFuture<'a, Vec<Authorization>>;

    /// ## Summary
    /// Returns the single record matched by `query`, if any.
    ///
    /// ## Errors
    /// Returns `NonUniqueResult` if more than one record matches.
    fn find_single<'a>(
        &'a self,
        query: &'a AuthorizationQuery,
    ) -> StoreFuture<'a, Option<Authorization>> {
        Box::pin(async move {
            let mut found = self.find(query).await?;
            match found.len() {
                0 | 1 => Ok(found.pop()),
                count => Err(crate::error::DbError::NonUniqueResult { count }),
            }
        })
    }
}
