//! Query builder functions for authorization records.

use diesel::prelude::*;

use crate::db::schema::authorization_record;
use crate::query::AuthorizationQuery;

/// ## Summary
/// Returns a query to find an authorization by ID.
#[must_use]
pub fn by_id(id: uuid::Uuid) -> authorization_record::BoxedQuery<'static, diesel::pg::Pg> {
    authorization_record::table
        .into_boxed()
        .filter(authorization_record::id.eq(id))
}

/// ## Summary
/// Returns a query selecting the records matched by `query`, ordered by id.
#[must_use]
pub fn matching(query: &AuthorizationQuery) -> authorization_record::BoxedQuery<'_, diesel::pg::Pg> {
    let mut statement = authorization_record::table.into_boxed();

    if let Some(resource_type) = query.resource_type {
        statement = statement.filter(authorization_record::resource_type.eq(resource_type.id()));
    }
    if let Some(authorization_type) = query.authorization_type {
        statement =
            statement.filter(authorization_record::authorization_type.eq(authorization_type.id()));
    }
    if !query.resource_ids.is_empty() {
        statement = statement.filter(authorization_record::resource_id.eq_any(&query.resource_ids));
    }

    statement = match (query.user_ids.is_empty(), query.group_ids.is_empty()) {
        (true, true) => statement,
        (false, true) => statement.filter(authorization_record::user_id.eq_any(&query.user_ids)),
        (true, false) => statement.filter(authorization_record::group_id.eq_any(&query.group_ids)),
        (false, false) => statement.filter(
            authorization_record::user_id
                .eq_any(&query.user_ids)
                .or(authorization_record::group_id.eq_any(&query.group_ids)),
        ),
    };

    statement.order(authorization_record::id.asc())
}
