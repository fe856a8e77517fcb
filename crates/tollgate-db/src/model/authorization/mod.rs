//! Authorization records and their table rows.

use diesel::{pg::Pg, prelude::*};
use serde::{Deserialize, Serialize};
use tollgate_core::constants::ANY;
use tollgate_core::error::{CoreError, CoreResult};
use tollgate_core::permission::PermissionMask;
use tollgate_core::types::{AuthorizationType, ResourceType};

use crate::db::schema;

/// A grant, revoke or global authorization on a resource.
///
/// `resource_id`, `user_id` and `group_id` may hold [`ANY`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Authorization {
    pub id: uuid::Uuid,
    pub authorization_type: AuthorizationType,
    pub resource_type: ResourceType,
    pub resource_id: String,
    pub permissions: PermissionMask,
    pub user_id: Option<String>,
    pub group_id: Option<String>,
}

impl Authorization {
    fn new(
        authorization_type: AuthorizationType,
        resource_type: ResourceType,
        resource_id: impl Into<String>,
        permissions: PermissionMask,
        identity: Identity,
    ) -> Self {
        let (user_id, group_id) = match identity {
            Identity::User(id) => (Some(id), None),
            Identity::Group(id) => (None, Some(id)),
        };
        Self {
            id: uuid::Uuid::now_v7(),
            authorization_type,
            resource_type,
            resource_id: resource_id.into(),
            permissions,
            user_id,
            group_id,
        }
    }

    #[must_use]
    pub fn grant_user(
        resource_type: ResourceType,
        resource_id: impl Into<String>,
        user_id: impl Into<String>,
        permissions: PermissionMask,
    ) -> Self {
        Self::new(
            AuthorizationType::Grant,
            resource_type,
            resource_id,
            permissions,
            Identity::User(user_id.into()),
        )
    }

    #[must_use]
    pub fn grant_group(
        resource_type: ResourceType,
        resource_id: impl Into<String>,
        group_id: impl Into<String>,
        permissions: PermissionMask,
    ) -> Self {
        Self::new(
            AuthorizationType::Grant,
            resource_type,
            resource_id,
            permissions,
            Identity::Group(group_id.into()),
        )
    }

    #[must_use]
    pub fn revoke_user(
        resource_type: ResourceType,
        resource_id: impl Into<String>,
        user_id: impl Into<String>,
        permissions: PermissionMask,
    ) -> Self {
        Self::new(
            AuthorizationType::Revoke,
            resource_type,
            resource_id,
            permissions,
            Identity::User(user_id.into()),
        )
    }

    #[must_use]
    pub fn revoke_group(
        resource_type: ResourceType,
        resource_id: impl Into<String>,
        group_id: impl Into<String>,
        permissions: PermissionMask,
    ) -> Self {
        Self::new(
            AuthorizationType::Revoke,
            resource_type,
            resource_id,
            permissions,
            Identity::Group(group_id.into()),
        )
    }

    /// A record granting `permissions` to every user.
    #[must_use]
    pub fn global(
        resource_type: ResourceType,
        resource_id: impl Into<String>,
        permissions: PermissionMask,
    ) -> Self {
        Self::new(
            AuthorizationType::Global,
            resource_type,
            resource_id,
            permissions,
            Identity::User(ANY.to_string()),
        )
    }

    /// Returns `true` if `other` occupies the same store slot, i.e. a save of
    /// `other` merges into this record.
    #[must_use]
    pub fn same_slot(&self, other: &Self) -> bool {
        self.authorization_type == other.authorization_type
            && self.resource_type == other.resource_type
            && self.resource_id == other.resource_id
            && self.user_id == other.user_id
            && self.group_id == other.group_id
    }

    /// ## Summary
    /// Checks the record shape before it is stored.
    ///
    /// ## Errors
    /// Returns `ValidationError` unless exactly one of `user_id` and
    /// `group_id` is set, if that id is empty, or if a global record names a
    /// concrete user.
    pub fn validate(&self) -> CoreResult<()> {
        match (&self.user_id, &self.group_id) {
            (Some(_), None) | (None, Some(_)) => {}
            _ => {
                return Err(CoreError::ValidationError(format!(
                    "authorization {} must name exactly one of user or group",
                    self.id
                )));
            }
        }
        if self.authorization_type == AuthorizationType::Global
            && self.user_id.as_deref() != Some(ANY)
        {
            return Err(CoreError::ValidationError(format!(
                "global authorization {} must apply to user {ANY}",
                self.id
            )));
        }
        if self.user_id.as_deref().or(self.group_id.as_deref()) == Some("") {
            return Err(CoreError::ValidationError(format!(
                "authorization {} has an empty user or group id",
                self.id
            )));
        }
        if self.resource_id.is_empty() {
            return Err(CoreError::ValidationError(format!(
                "authorization {} has an empty resource id",
                self.id
            )));
        }
        Ok(())
    }
}

enum Identity {
    User(String),
    Group(String),
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = schema::authorization_record)]
#[diesel(check_for_backend(Pg))]
pub struct AuthorizationRow {
    pub id: uuid::Uuid,
    pub authorization_type: i32,
    pub resource_type: i32,
    pub resource_id: String,
    pub permissions: i32,
    pub user_id: Option<String>,
    pub group_id: Option<String>,
}

impl TryFrom<AuthorizationRow> for Authorization {
    type Error = CoreError;

    fn try_from(row: AuthorizationRow) -> CoreResult<Self> {
        Ok(Self {
            id: row.id,
            authorization_type: AuthorizationType::from_id(row.authorization_type)?,
            resource_type: ResourceType::from_id(row.resource_type)?,
            resource_id: row.resource_id,
            permissions: PermissionMask::from_stored(row.permissions),
            user_id: row.user_id,
            group_id: row.group_id,
        })
    }
}

#[derive(Debug, Insertable, AsChangeset)]
#[diesel(table_name = schema::authorization_record)]
#[diesel(treat_none_as_null = true)]
pub struct NewAuthorizationRow<'a> {
    pub id: uuid::Uuid,
    pub authorization_type: i32,
    pub resource_type: i32,
    pub resource_id: &'a str,
    pub permissions: i32,
    pub user_id: Option<&'a str>,
    pub group_id: Option<&'a str>,
}

impl<'a> From<&'a Authorization> for NewAuthorizationRow<'a> {
    fn from(authorization: &'a Authorization) -> Self {
        Self {
            id: authorization.id,
            authorization_type: authorization.authorization_type.id(),
            resource_type: authorization.resource_type.id(),
            resource_id: &authorization.resource_id,
            permissions: authorization.permissions.to_stored(),
            user_id: authorization.user_id.as_deref(),
            group_id: authorization.group_id.as_deref(),
        }
    }
}
