//! Default authorizations for identities linked to a task.
//!
//! When a user becomes assignee, owner or candidate of a task, or a group
//! becomes a candidate, the provider grants that identity `READ` plus the
//! configured default task permission on the task. Grants are upserted, so
//! linking the same identity twice leaves one record. Unlinking never revokes.

use std::sync::Arc;

use tollgate_core::config::AuthorizationConfig;
use tollgate_core::permission::{Permission, PermissionMask};
use tollgate_core::types::ResourceType;
use tollgate_db::model::authorization::Authorization;
use tollgate_db::store::AuthorizationStore;

use crate::error::ServiceResult;
use crate::task::TaskRef;

use super::validate::{IdentityRole, ensure_not_wildcard};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityKind {
    User,
    Group,
}

/// How an identity is linked to a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkRole {
    Assignee,
    Owner,
    Candidate,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityLink {
    pub role: LinkRole,
    pub kind: IdentityKind,
    pub identity_id: String,
}

impl IdentityLink {
    #[must_use]
    pub fn assignee(user_id: impl Into<String>) -> Self {
        Self {
            role: LinkRole::Assignee,
            kind: IdentityKind::User,
            identity_id: user_id.into(),
        }
    }

    #[must_use]
    pub fn owner(user_id: impl Into<String>) -> Self {
        Self {
            role: LinkRole::Owner,
            kind: IdentityKind::User,
            identity_id: user_id.into(),
        }
    }

    #[must_use]
    pub fn candidate_user(user_id: impl Into<String>) -> Self {
        Self {
            role: LinkRole::Candidate,
            kind: IdentityKind::User,
            identity_id: user_id.into(),
        }
    }

    #[must_use]
    pub fn candidate_group(group_id: impl Into<String>) -> Self {
        Self {
            role: LinkRole::Candidate,
            kind: IdentityKind::Group,
            identity_id: group_id.into(),
        }
    }

    /// Role reported when the identity id is rejected.
    #[must_use]
    pub const fn validation_role(&self) -> IdentityRole {
        match (self.role, self.kind) {
            (LinkRole::Assignee, _) => IdentityRole::Assignee,
            (LinkRole::Owner, _) => IdentityRole::Owner,
            (LinkRole::Candidate, IdentityKind::User) => IdentityRole::UserIdentityLink,
            (LinkRole::Candidate, IdentityKind::Group) => IdentityRole::GroupIdentityLink,
        }
    }

    /// ## Summary
    /// Rejects the wildcard as the linked identity.
    ///
    /// ## Errors
    /// Returns `ReservedIdentifier` if the identity id is `*`.
    pub fn validate(&self) -> ServiceResult<()> {
        Ok(ensure_not_wildcard(&self.identity_id, self.validation_role())?)
    }
}

/// Creates or extends grants for identities linked to tasks.
#[derive(Clone)]
pub struct DefaultAuthorizationProvider {
    store: Arc<dyn AuthorizationStore>,
    user_permission: Permission,
    group_permission: Permission,
    additional: PermissionMask,
}

impl DefaultAuthorizationProvider {
    #[must_use]
    pub fn new(
        store: Arc<dyn AuthorizationStore>,
        user_permission: Permission,
        group_permission: Permission,
    ) -> Self {
        Self {
            store,
            user_permission,
            group_permission,
            additional: PermissionMask::empty(),
        }
    }

    /// ## Summary
    /// Builds a provider granting the permissions named in `config`.
    ///
    /// ## Errors
    /// Returns `CoreError::UnknownPermission` if a configured name is not a
    /// task permission.
    pub fn from_config(
        store: Arc<dyn AuthorizationStore>,
        config: &AuthorizationConfig,
    ) -> ServiceResult<Self> {
        Ok(Self::new(
            store,
            config.task_permission()?,
            config.group_task_permission()?,
        ))
    }

    /// Bundles `additional` into every grant this provider creates.
    #[must_use]
    pub fn with_additional_permissions(mut self, additional: PermissionMask) -> Self {
        self.additional |= additional;
        self
    }

    /// Permissions granted to a newly linked identity of the given kind.
    #[must_use]
    pub fn granted_permissions(&self, kind: IdentityKind) -> PermissionMask {
        let default = match kind {
            IdentityKind::User => self.user_permission,
            IdentityKind::Group => self.group_permission,
        };
        PermissionMask::READ | default.mask() | self.additional
    }

    /// ## Summary
    /// Reacts to an identity being linked to or unlinked from a task.
    ///
    /// Case tasks, unlinking and empty identity ids are ignored. Otherwise the
    /// identity id is validated before anything is written, then a grant is
    /// upserted.
    /// Returns the stored grant, if one was written.
    ///
    /// ## Errors
    ///
    /// - Returns `ReservedIdentifier` if the identity id is `*`.
    /// - Returns `DatabaseError` if the store fails.
    #[tracing::instrument(
        skip(self, task, link),
        fields(task_id = %task.id, role = ?link.role, identity_id = %link.identity_id)
    )]
    pub async fn on_identity_link_changed(
        &self,
        task: &TaskRef,
        link: &IdentityLink,
        added: bool,
    ) -> ServiceResult<Option<Authorization>> {
        if !task.is_authorization_eligible() {
            tracing::trace!("Case task, no default authorization");
            return Ok(None);
        }
        if !added {
            tracing::trace!("Identity unlinked, existing grants kept");
            return Ok(None);
        }
        if link.identity_id.is_empty() {
            tracing::trace!("Empty identity id, nothing to grant");
            return Ok(None);
        }

        link.validate()?;

        let permissions = self.granted_permissions(link.kind);
        let grant = match link.kind {
            IdentityKind::User => Authorization::grant_user(
                ResourceType::Task,
                task.id.as_str(),
                link.identity_id.as_str(),
                permissions,
            ),
            IdentityKind::Group => Authorization::grant_group(
                ResourceType::Task,
                task.id.as_str(),
                link.identity_id.as_str(),
                permissions,
            ),
        };

        let stored = self.store.save(grant).await?;
        tracing::info!(
            authorization_id = %stored.id,
            permissions = stored.permissions.bits(),
            "Default authorization provisioned"
        );
        Ok(Some(stored))
    }
}
