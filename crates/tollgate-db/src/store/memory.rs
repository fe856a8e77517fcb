//! In-process store, used by tests and by embedders without a database.

use tokio::sync::RwLock;

use crate::error::{DbError, DbResult};
use crate::model::authorization::Authorization;
use crate::query::AuthorizationQuery;
use crate::store::{AuthorizationStore, StoreFuture};

#[derive(Debug, Default)]
pub struct MemoryAuthorizationStore {
    records: RwLock<Vec<Authorization>>,
}

impl MemoryAuthorizationStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    async fn upsert(&self, authorization: Authorization) -> DbResult<Authorization> {
        authorization.validate()?;

        let mut records = self.records.write().await;
        if let Some(existing) = records.iter_mut().find(|r| r.same_slot(&authorization)) {
            existing.permissions |= authorization.permissions;
            tracing::trace!(
                id = %existing.id,
                permissions = existing.permissions.bits(),
                "Merged into existing authorization"
            );
            return Ok(existing.clone());
        }

        records.push(authorization.clone());
        Ok(authorization)
    }
}

impl AuthorizationStore for MemoryAuthorizationStore {
    #[tracing::instrument(skip(self, authorization), fields(resource_id = %authorization.resource_id))]
    fn save(&self, authorization: Authorization) -> StoreFuture<'_, Authorization> {
        Box::pin(async move { self.upsert(authorization).await })
    }

    #[tracing::instrument(skip(self, authorization), fields(id = %authorization.id))]
    fn update(&self, authorization: Authorization) -> StoreFuture<'_, Authorization> {
        Box::pin(async move {
            authorization.validate()?;
            let mut records = self.records.write().await;
            let existing = records
                .iter_mut()
                .find(|r| r.id == authorization.id)
                .ok_or(DbError::NotFound(authorization.id))?;
            *existing = authorization.clone();
            Ok(authorization)
        })
    }

    #[tracing::instrument(skip(self))]
    fn delete(&self, id: uuid::Uuid) -> StoreFuture<'_, bool> {
        Box::pin(async move {
            let mut records = self.records.write().await;
            let before = records.len();
            records.retain(|r| r.id != id);
            Ok(records.len() < before)
        })
    }

    #[tracing::instrument(skip(self))]
    fn delete_for_resource<'a>(&'a self, resource_id: &'a str) -> StoreFuture<'a, usize> {
        Box::pin(async move {
            let mut records = self.records.write().await;
            let before = records.len();
            records.retain(|r| r.resource_id != resource_id);
            Ok(before - records.len())
        })
    }

    fn find<'a>(&'a self, query: &'a AuthorizationQuery) -> StoreFuture<'a, Vec<Authorization>> {
        Box::pin(async move {
            let records = self.records.read().await;
            Ok(records.iter().filter(|r| query.matches(r)).cloned().collect())
        })
    }
}
