//! Enforcement of composite checks around business operations.

use crate::error::ServiceResult;

use super::check::{CompositeCheck, PermissionCheck};
use super::denied::AuthorizationDenied;
use super::identity::AuthContext;
use super::service::{Authorizer, AuthzResult};

/// Runs an operation's permission alternatives through the [`Authorizer`]
/// and turns a failure into an [`AuthorizationDenied`].
#[derive(Clone)]
pub struct AuthorizationGuard {
    authorizer: Authorizer,
}

impl AuthorizationGuard {
    #[must_use]
    pub const fn new(authorizer: Authorizer) -> Self {
        Self { authorizer }
    }

    #[must_use]
    pub const fn authorizer(&self) -> &Authorizer {
        &self.authorizer
    }

    /// ## Summary
    /// Returns `Allowed` if any alternative passes. An empty composite, a
    /// context without identity and an unchecked context are always allowed.
    ///
    /// ## Errors
    /// Returns `DatabaseError` if the store fails.
    pub async fn check(&self, ctx: &AuthContext, composite: &CompositeCheck) -> ServiceResult<AuthzResult> {
        if composite.is_empty() || ctx.checked_identity().is_none() {
            return Ok(AuthzResult::Allowed);
        }

        for alternative in composite.alternatives() {
            if self.authorizer.is_authorized(ctx, alternative).await? {
                return Ok(AuthzResult::Allowed);
            }
        }

        Ok(AuthzResult::Denied)
    }

    /// ## Summary
    /// Check and require permission, returning an error if denied.
    ///
    /// ## Errors
    ///
    /// - Returns `AuthorizationDenied` listing every attempted permission if
    ///   no alternative passes.
    /// - Returns `DatabaseError` if the store fails.
    #[tracing::instrument(skip_all, fields(alternatives = composite.alternatives().len()))]
    pub async fn require(&self, ctx: &AuthContext, composite: &CompositeCheck) -> ServiceResult<()> {
        if !ctx.checks_enabled() {
            tracing::debug!("Checks skipped for this context");
            return Ok(());
        }

        match self.check(ctx, composite).await? {
            AuthzResult::Allowed => Ok(()),
            AuthzResult::Denied => {
                let user_id = ctx
                    .identity()
                    .map(|identity| identity.user_id().to_string())
                    .unwrap_or_default();
                let denied = AuthorizationDenied {
                    user_id,
                    missing: composite.expanded().iter().map(PermissionCheck::missing).collect(),
                };
                tracing::warn!(user_id = %denied.user_id, reason = %denied, "Authorization denied");
                Err(denied.into())
            }
        }
    }

    /// ## Summary
    /// Deletes every authorization whose resource id is `resource_id`. Called
    /// once a resource is permanently removed.
    ///
    /// ## Errors
    /// Returns `DatabaseError` if the store fails.
    #[tracing::instrument(skip(self))]
    pub async fn resource_deleted(&self, resource_id: &str) -> ServiceResult<usize> {
        let deleted = self
            .authorizer
            .store()
            .delete_for_resource(resource_id)
            .await?;
        if deleted > 0 {
            tracing::info!(resource_id, deleted, "Purged authorizations of deleted resource");
        }
        Ok(deleted)
    }
}
