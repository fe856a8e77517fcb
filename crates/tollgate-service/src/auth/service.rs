//! Effective-permission resolution.
//!
//! This module answers "does this identity hold permission P on resource
//! (type, id)?" from the records in an [`AuthorizationStore`].
//!
//! ## Resolution
//!
//! 1. A context without a checked identity is always authorized.
//! 2. Records are collected for the resource type whose resource id is the
//!    requested id or `*`, and whose user is the caller or `*`, or whose group
//!    is one of the caller's groups or `*`.
//! 3. Global and grant records are OR-ed into the granted mask, revoke records
//!    into the revoked mask.
//! 4. The effective mask is `granted & !revoked`, so a revoke always wins,
//!    however broad it is.
//! 5. If the effective mask lacks the permission, the check is retried on the
//!    owning resource as described by [`PermissionCheck::fallback`].
//!
//! Nothing is cached; every call reads the store.

use std::sync::Arc;

use tollgate_core::constants::ANY;
use tollgate_core::permission::PermissionMask;
use tollgate_core::types::{AuthorizationType, ResourceType};
use tollgate_db::query::AuthorizationQuery;
use tollgate_db::store::AuthorizationStore;

use crate::error::ServiceResult;

use super::check::{PermissionCheck, ResourceId};
use super::identity::{AuthContext, Identity};

/// Result of an authorization check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthzResult {
    /// Access is allowed.
    Allowed,
    /// Access is denied.
    Denied,
}

impl AuthzResult {
    /// Returns `true` if access is allowed.
    #[must_use]
    pub const fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed)
    }
}

impl From<bool> for AuthzResult {
    fn from(allowed: bool) -> Self {
        if allowed { Self::Allowed } else { Self::Denied }
    }
}

/// Granted and revoked permissions of one identity on one resource.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EffectivePermissions {
    pub granted: PermissionMask,
    pub revoked: PermissionMask,
}

impl EffectivePermissions {
    #[must_use]
    pub fn effective(self) -> PermissionMask {
        self.granted & !self.revoked
    }
}

/// Resolver over an authorization store.
#[derive(Clone)]
pub struct Authorizer {
    store: Arc<dyn AuthorizationStore>,
}

impl Authorizer {
    #[must_use]
    pub fn new(store: Arc<dyn AuthorizationStore>) -> Self {
        Self { store }
    }

    #[must_use]
    pub fn store(&self) -> &Arc<dyn AuthorizationStore> {
        &self.store
    }

    /// ## Summary
    /// Folds every record that applies to `identity` on the resource into
    /// granted and revoked masks. Fallback resources are not consulted.
    ///
    /// ## Errors
    /// Returns `DatabaseError` if the store fails.
    #[tracing::instrument(skip(self, identity), fields(user_id = %identity.user_id()))]
    pub async fn permissions(
        &self,
        identity: &Identity,
        resource_type: ResourceType,
        resource_id: &ResourceId,
    ) -> ServiceResult<EffectivePermissions> {
        let mut query = AuthorizationQuery::new()
            .resource_type(resource_type)
            .resource_id(ANY)
            .user_id(identity.user_id())
            .user_id(ANY)
            .group_ids(identity.group_ids())
            .group_id(ANY);
        if let ResourceId::Id(id) = resource_id {
            query = query.resource_id(id.as_str());
        }

        let records = self.store.find(&query).await?;

        let mut permissions = EffectivePermissions::default();
        for record in &records {
            tracing::trace!(
                id = %record.id,
                authorization_type = %record.authorization_type,
                resource_id = %record.resource_id,
                permissions = record.permissions.bits(),
                "Matching authorization"
            );
            match record.authorization_type {
                AuthorizationType::Global | AuthorizationType::Grant => {
                    permissions.granted |= record.permissions;
                }
                AuthorizationType::Revoke => permissions.revoked |= record.permissions,
            }
        }

        Ok(permissions)
    }

    /// ## Summary
    /// Checks a single permission path, including its fallbacks.
    ///
    /// ## Errors
    /// Returns `DatabaseError` if the store fails.
    #[tracing::instrument(skip(self, ctx, check), fields(check = %check))]
    pub async fn is_authorized(&self, ctx: &AuthContext, check: &PermissionCheck) -> ServiceResult<bool> {
        let Some(identity) = ctx.checked_identity() else {
            tracing::debug!("No identity to check, authorization skipped");
            return Ok(true);
        };

        tracing::debug!(
            user_id = %identity.user_id(),
            group_count = identity.group_ids().len(),
            "Authorization check started"
        );

        let mut current = Some(check.clone());
        while let Some(step) = current {
            let permissions = self
                .permissions(identity, step.resource_type, &step.resource_id)
                .await?;

            if permissions.effective().grants(step.permission) {
                tracing::debug!(
                    user_id = %identity.user_id(),
                    granted_by = %step,
                    "Authorization granted"
                );
                return Ok(true);
            }

            tracing::trace!(
                step = %step,
                granted = permissions.granted.bits(),
                revoked = permissions.revoked.bits(),
                "Permission not held"
            );
            current = step.fallback();
        }

        tracing::debug!(user_id = %identity.user_id(), "Authorization denied");
        Ok(false)
    }

    /// ## Summary
    /// Same as [`is_authorized`](Self::is_authorized), as an [`AuthzResult`].
    ///
    /// ## Errors
    /// Returns `DatabaseError` if the store fails.
    pub async fn check(&self, ctx: &AuthContext, check: &PermissionCheck) -> ServiceResult<AuthzResult> {
        Ok(self.is_authorized(ctx, check).await?.into())
    }
}
