//! `PostgreSQL` store over a bb8 pool of diesel-async connections.

use diesel::dsl::sql;
use diesel::prelude::*;
use diesel::sql_types::Integer;
use diesel_async::RunQueryDsl;

use crate::db::DbProvider;
use crate::db::connection::DbPool;
use crate::db::migrate::run_migrations;
use crate::db::query_builders;
use crate::db::schema::authorization_record;
use crate::error::{DbError, DbResult};
use crate::model::authorization::{Authorization, AuthorizationRow, NewAuthorizationRow};
use crate::query::AuthorizationQuery;
use crate::store::{AuthorizationStore, StoreFuture};

/// Merge expression for upserts; bits already stored are never dropped.
const MERGE_PERMISSIONS: &str = "authorization_record.permissions | excluded.permissions";

#[derive(Clone)]
pub struct PgAuthorizationStore {
    pool: DbPool,
}

impl PgAuthorizationStore {
    #[must_use]
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// ## Summary
    /// Creates the store and makes sure its table exists.
    ///
    /// ## Errors
    /// Returns an error if no connection can be acquired or the schema
    /// statements fail.
    pub async fn connect(pool: DbPool) -> DbResult<Self> {
        {
            let mut conn = pool.get_connection().await?;
            run_migrations(&mut conn).await?;
        }
        Ok(Self::new(pool))
    }

    /// ## Summary
    /// Loads the record with the given id.
    ///
    /// ## Errors
    /// Returns an error if the query fails or the stored row cannot be decoded.
    pub async fn get(&self, id: uuid::Uuid) -> DbResult<Option<Authorization>> {
        let mut conn = self.pool.get_connection().await?;
        let row: Option<AuthorizationRow> = query_builders::by_id(id)
            .select(AuthorizationRow::as_select())
            .first(&mut conn)
            .await
            .optional()?;

        Ok(row.map(Authorization::try_from).transpose()?)
    }

    async fn upsert(&self, authorization: Authorization) -> DbResult<Authorization> {
        authorization.validate()?;
        let mut conn = self.pool.get_connection().await?;
        let row = NewAuthorizationRow::from(&authorization);

        let insert = diesel::insert_into(authorization_record::table).values(&row);
        let saved = if authorization.user_id.is_some() {
            insert
                .on_conflict((
                    authorization_record::authorization_type,
                    authorization_record::resource_type,
                    authorization_record::resource_id,
                    authorization_record::user_id,
                ))
                .do_update()
                .set(authorization_record::permissions.eq(sql::<Integer>(MERGE_PERMISSIONS)))
                .returning(AuthorizationRow::as_returning())
                .get_result(&mut conn)
                .await?
        } else {
            insert
                .on_conflict((
                    authorization_record::authorization_type,
                    authorization_record::resource_type,
                    authorization_record::resource_id,
                    authorization_record::group_id,
                ))
                .do_update()
                .set(authorization_record::permissions.eq(sql::<Integer>(MERGE_PERMISSIONS)))
                .returning(AuthorizationRow::as_returning())
                .get_result(&mut conn)
                .await?
        };

        Ok(Authorization::try_from(saved)?)
    }

    async fn replace(&self, authorization: Authorization) -> DbResult<Authorization> {
        authorization.validate()?;
        let mut conn = self.pool.get_connection().await?;
        let row = NewAuthorizationRow::from(&authorization);

        let updated = diesel::update(authorization_record::table.find(authorization.id))
            .set(&row)
            .returning(AuthorizationRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()?
            .ok_or(DbError::NotFound(authorization.id))?;

        Ok(Authorization::try_from(updated)?)
    }

    async fn load(&self, query: &AuthorizationQuery) -> DbResult<Vec<Authorization>> {
        let mut conn = self.pool.get_connection().await?;
        let rows: Vec<AuthorizationRow> = query_builders::matching(query)
            .select(AuthorizationRow::as_select())
            .load(&mut conn)
            .await?;

        rows.into_iter()
            .map(|row| Authorization::try_from(row).map_err(DbError::from))
            .collect()
    }
}

impl AuthorizationStore for PgAuthorizationStore {
    #[tracing::instrument(skip(self, authorization), fields(resource_id = %authorization.resource_id))]
    fn save(&self, authorization: Authorization) -> StoreFuture<'_, Authorization> {
        Box::pin(async move { self.upsert(authorization).await })
    }

    #[tracing::instrument(skip(self, authorization), fields(id = %authorization.id))]
    fn update(&self, authorization: Authorization) -> StoreFuture<'_, Authorization> {
        Box::pin(async move { self.replace(authorization).await })
    }

    #[tracing::instrument(skip(self))]
    fn delete(&self, id: uuid::Uuid) -> StoreFuture<'_, bool> {
        Box::pin(async move {
            let mut conn = self.pool.get_connection().await?;
            let deleted = diesel::delete(authorization_record::table.find(id))
                .execute(&mut conn)
                .await?;
            Ok(deleted > 0)
        })
    }

    #[tracing::instrument(skip(self))]
    fn delete_for_resource<'a>(&'a self, resource_id: &'a str) -> StoreFuture<'a, usize> {
        Box::pin(async move {
            let mut conn = self.pool.get_connection().await?;
            let deleted = diesel::delete(
                authorization_record::table.filter(authorization_record::resource_id.eq(resource_id)),
            )
            .execute(&mut conn)
            .await?;
            Ok(deleted)
        })
    }

    fn find<'a>(&'a self, query: &'a AuthorizationQuery) -> StoreFuture<'a, Vec<Authorization>> {
        Box::pin(self.load(query))
    }
}
