//! Facade the workflow engine calls around task operations.
//!
//! Each method checks the caller's permissions for one task operation and
//! then applies the authorization side effects of that operation: grants for
//! newly linked identities, purges for removed tasks. The task mutation
//! itself stays with the engine.
//!
//! ## Usage
//!
//! ```ignore
//! let authz = TaskAuthorization::new(store, &settings.authorization)?;
//! let ctx = authz.context(Some(Identity::new("demo", ["sales"])));
//! authz.claim(&ctx, &task, "demo").await?;
//! ```

use std::sync::Arc;

use tollgate_core::config::{AuthorizationConfig, Settings};
use tollgate_core::constants::{ANY, is_any};
use tollgate_db::db::connection::create_pool;
use tollgate_db::store::{AuthorizationStore, PgAuthorizationStore};

use crate::auth::guard::AuthorizationGuard;
use crate::auth::identity::{AuthContext, Identity};
use crate::auth::provider::{DefaultAuthorizationProvider, IdentityLink};
use crate::auth::service::Authorizer;
use crate::auth::validate::{IdentityRole, ensure_not_wildcard};
use crate::error::{ServiceError, ServiceResult};

use super::operation::{TaskOperation, TaskPolicy};
use super::TaskRef;

/// Owner and assignee carried by a task being saved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskSave {
    /// `true` when the task is inserted rather than updated.
    pub is_new: bool,
    pub owner: Option<String>,
    pub assignee: Option<String>,
}

/// Task authorization checks and provisioning over one store.
#[derive(Clone)]
pub struct TaskAuthorization {
    guard: AuthorizationGuard,
    provider: DefaultAuthorizationProvider,
    policy: TaskPolicy,
    enabled: bool,
}

impl TaskAuthorization {
    /// ## Summary
    /// Builds the facade over `store` with the given authorization settings.
    ///
    /// ## Errors
    /// Returns `CoreError::UnknownPermission` if a configured default
    /// permission is not a task permission.
    pub fn new(store: Arc<dyn AuthorizationStore>, config: &AuthorizationConfig) -> ServiceResult<Self> {
        let provider = DefaultAuthorizationProvider::from_config(Arc::clone(&store), config)?;
        Ok(Self {
            guard: AuthorizationGuard::new(Authorizer::new(store)),
            provider,
            policy: TaskPolicy::from_config(config),
            enabled: config.enabled,
        })
    }

    /// ## Summary
    /// Connects to the configured database, prepares the authorization table
    /// and builds the facade over it.
    ///
    /// ## Errors
    /// Returns an error if the database URL is missing, the pool or schema
    /// setup fails, or the authorization settings are invalid.
    pub async fn connect(settings: &Settings) -> anyhow::Result<Self> {
        let pool = create_pool(&settings.database).await?;
        let store = PgAuthorizationStore::connect(pool).await?;
        Ok(Self::new(Arc::new(store), &settings.authorization)?)
    }

    /// Replaces the provider, e.g. with one bundling additional permissions.
    #[must_use]
    pub fn with_provider(mut self, provider: DefaultAuthorizationProvider) -> Self {
        self.provider = provider;
        self
    }

    #[must_use]
    pub const fn provider(&self) -> &DefaultAuthorizationProvider {
        &self.provider
    }

    #[must_use]
    pub const fn guard(&self) -> &AuthorizationGuard {
        &self.guard
    }

    #[must_use]
    pub fn store(&self) -> &Arc<dyn AuthorizationStore> {
        self.guard.authorizer().store()
    }

    /// Context for a caller. When authorization is disabled in the settings
    /// the context skips checks.
    #[must_use]
    pub fn context(&self, identity: Option<Identity>) -> AuthContext {
        let ctx = identity.map_or_else(AuthContext::system, AuthContext::authenticated);
        if self.enabled { ctx } else { ctx.unchecked() }
    }

    /// ## Summary
    /// Requires the caller to be allowed to perform `operation` on `task`.
    ///
    /// ## Errors
    ///
    /// - Returns `NotFound` if the task id is `*` for an operation other than
    ///   creation.
    /// - Returns `AuthorizationDenied` if no accepted permission is held.
    /// - Returns `DatabaseError` if the store fails.
    #[tracing::instrument(skip(self, ctx, task), fields(task_id = %task.id))]
    pub async fn authorize(&self, ctx: &AuthContext, task: &TaskRef, operation: TaskOperation) -> ServiceResult<()> {
        if operation != TaskOperation::Create {
            ensure_task_id(task)?;
        }
        self.guard.require(ctx, &self.policy.checks(task, operation)).await
    }

    /// ## Summary
    /// Returns whether the caller may perform `operation` on `task`.
    ///
    /// ## Errors
    /// Returns `DatabaseError` if the store fails.
    pub async fn is_permitted(&self, ctx: &AuthContext, task: &TaskRef, operation: TaskOperation) -> ServiceResult<bool> {
        if !ctx.checks_enabled() {
            return Ok(true);
        }
        Ok(self
            .guard
            .check(ctx, &self.policy.checks(task, operation))
            .await?
            .is_allowed())
    }

    /// ## Summary
    /// Keeps the tasks the caller may read, in their original order. Used for
    /// task queries and sub-task listings.
    ///
    /// ## Errors
    /// Returns `DatabaseError` if the store fails.
    pub async fn filter_readable(&self, ctx: &AuthContext, tasks: Vec<TaskRef>) -> ServiceResult<Vec<TaskRef>> {
        let decisions = futures::future::try_join_all(
            tasks
                .iter()
                .map(|task| self.is_permitted(ctx, task, TaskOperation::Read)),
        )
        .await?;

        Ok(tasks
            .into_iter()
            .zip(decisions)
            .filter_map(|(task, readable)| readable.then_some(task))
            .collect())
    }

    /// ## Summary
    /// Authorizes saving a task and grants its owner and assignee.
    ///
    /// Owner and assignee are validated first, then creation is checked on
    /// every task for new tasks, or the update permissions for existing ones.
    ///
    /// ## Errors
    ///
    /// - Returns `ReservedIdentifier` if the owner or assignee is `*`.
    /// - Returns `AuthorizationDenied` if the caller may not save the task.
    /// - Returns `DatabaseError` if the store fails.
    pub async fn save_task(&self, ctx: &AuthContext, task: &TaskRef, save: &TaskSave) -> ServiceResult<()> {
        if !task.is_authorization_eligible() {
            return Ok(());
        }
        let owner = present(save.owner.as_deref());
        let assignee = present(save.assignee.as_deref());
        if let Some(owner) = owner {
            ensure_not_wildcard(owner, IdentityRole::Owner)?;
        }
        if let Some(assignee) = assignee {
            ensure_not_wildcard(assignee, IdentityRole::Assignee)?;
        }

        let operation = if save.is_new {
            TaskOperation::Create
        } else {
            TaskOperation::Save
        };
        self.authorize(ctx, task, operation).await?;

        if let Some(owner) = owner {
            self.provider
                .on_identity_link_changed(task, &IdentityLink::owner(owner), true)
                .await?;
        }
        if let Some(assignee) = assignee {
            self.provider
                .on_identity_link_changed(task, &IdentityLink::assignee(assignee), true)
                .await?;
        }
        Ok(())
    }

    /// ## Summary
    /// Authorizes changing the assignee and grants the new assignee.
    /// Clearing the assignee, with `None` or an empty id, keeps the previous
    /// assignee's grant.
    ///
    /// ## Errors
    /// See [`save_task`](Self::save_task).
    pub async fn set_assignee(&self, ctx: &AuthContext, task: &TaskRef, assignee: Option<&str>) -> ServiceResult<()> {
        self.link_user(ctx, task, TaskOperation::SetAssignee, present(assignee).map(IdentityLink::assignee).as_ref())
            .await
    }

    /// ## Summary
    /// Authorizes changing the owner and grants the new owner.
    ///
    /// ## Errors
    /// See [`save_task`](Self::save_task).
    pub async fn set_owner(&self, ctx: &AuthContext, task: &TaskRef, owner: Option<&str>) -> ServiceResult<()> {
        self.link_user(ctx, task, TaskOperation::SetOwner, present(owner).map(IdentityLink::owner).as_ref())
            .await
    }

    /// ## Summary
    /// Authorizes claiming the task for `user_id` (or unclaiming it with
    /// `None`) and grants the claimant.
    ///
    /// ## Errors
    /// See [`save_task`](Self::save_task).
    pub async fn claim(&self, ctx: &AuthContext, task: &TaskRef, user_id: Option<&str>) -> ServiceResult<()> {
        self.link_user(ctx, task, TaskOperation::Claim, present(user_id).map(IdentityLink::assignee).as_ref())
            .await
    }

    /// ## Summary
    /// Authorizes delegating the task to `user_id` and grants the delegate.
    ///
    /// ## Errors
    /// See [`save_task`](Self::save_task).
    pub async fn delegate(&self, ctx: &AuthContext, task: &TaskRef, user_id: &str) -> ServiceResult<()> {
        self.link_user(ctx, task, TaskOperation::Delegate, Some(&IdentityLink::assignee(user_id)))
            .await
    }

    /// ## Summary
    /// Authorizes adding a candidate user, group or other identity link and
    /// grants the linked identity.
    ///
    /// ## Errors
    ///
    /// - Returns `NotFound` if the task id is `*`.
    /// - Returns `ReservedIdentifier` if the identity id is `*`.
    /// - Returns `AuthorizationDenied` if the caller may not change links.
    /// - Returns `DatabaseError` if the store fails.
    pub async fn add_identity_link(&self, ctx: &AuthContext, task: &TaskRef, link: &IdentityLink) -> ServiceResult<()> {
        ensure_task_id(task)?;
        if !task.is_authorization_eligible() {
            return Ok(());
        }
        link.validate()?;
        self.authorize(ctx, task, TaskOperation::AddIdentityLink).await?;
        self.provider.on_identity_link_changed(task, link, true).await?;
        Ok(())
    }

    /// ## Summary
    /// Authorizes removing an identity link. Grants are left in place.
    ///
    /// ## Errors
    ///
    /// - Returns `NotFound` if the task id is `*`.
    /// - Returns `AuthorizationDenied` if the caller may not change links.
    /// - Returns `DatabaseError` if the store fails.
    pub async fn delete_identity_link(&self, ctx: &AuthContext, task: &TaskRef, link: &IdentityLink) -> ServiceResult<()> {
        self.authorize(ctx, task, TaskOperation::DeleteIdentityLink).await?;
        self.provider.on_identity_link_changed(task, link, false).await?;
        Ok(())
    }

    /// ## Errors
    /// See [`add_identity_link`](Self::add_identity_link).
    pub async fn add_candidate_user(&self, ctx: &AuthContext, task: &TaskRef, user_id: &str) -> ServiceResult<()> {
        self.add_identity_link(ctx, task, &IdentityLink::candidate_user(user_id))
            .await
    }

    /// ## Errors
    /// See [`add_identity_link`](Self::add_identity_link).
    pub async fn add_candidate_group(&self, ctx: &AuthContext, task: &TaskRef, group_id: &str) -> ServiceResult<()> {
        self.add_identity_link(ctx, task, &IdentityLink::candidate_group(group_id))
            .await
    }

    /// ## Errors
    /// See [`delete_identity_link`](Self::delete_identity_link).
    pub async fn delete_candidate_user(&self, ctx: &AuthContext, task: &TaskRef, user_id: &str) -> ServiceResult<()> {
        self.delete_identity_link(ctx, task, &IdentityLink::candidate_user(user_id))
            .await
    }

    /// ## Errors
    /// See [`delete_identity_link`](Self::delete_identity_link).
    pub async fn delete_candidate_group(&self, ctx: &AuthContext, task: &TaskRef, group_id: &str) -> ServiceResult<()> {
        self.delete_identity_link(ctx, task, &IdentityLink::candidate_group(group_id))
            .await
    }

    /// ## Summary
    /// Authorizes completing the task, then purges its authorizations.
    /// Returns the number of purged records.
    ///
    /// ## Errors
    ///
    /// - Returns `AuthorizationDenied` if the caller may not complete the task.
    /// - Returns `DatabaseError` if the store fails.
    pub async fn complete(&self, ctx: &AuthContext, task: &TaskRef) -> ServiceResult<usize> {
        self.authorize(ctx, task, TaskOperation::Complete).await?;
        self.guard.resource_deleted(&task.id).await
    }

    /// ## Summary
    /// Authorizes deleting the task, then purges its authorizations.
    /// Returns the number of purged records.
    ///
    /// ## Errors
    ///
    /// - Returns `AuthorizationDenied` if the caller lacks `DELETE` on the task.
    /// - Returns `DatabaseError` if the store fails.
    pub async fn delete_task(&self, ctx: &AuthContext, task: &TaskRef) -> ServiceResult<usize> {
        self.authorize(ctx, task, TaskOperation::Delete).await?;
        self.guard.resource_deleted(&task.id).await
    }

    /// ## Summary
    /// Deletes tasks in order. Every task is authorized before anything is
    /// purged, so a denial leaves all authorizations in place.
    ///
    /// ## Errors
    /// See [`delete_task`](Self::delete_task); the first denied task fails the call.
    pub async fn delete_tasks(&self, ctx: &AuthContext, tasks: &[TaskRef]) -> ServiceResult<usize> {
        for task in tasks {
            self.authorize(ctx, task, TaskOperation::Delete).await?;
        }
        let mut purged = 0;
        for task in tasks {
            purged += self.guard.resource_deleted(&task.id).await?;
        }
        Ok(purged)
    }

    async fn link_user(
        &self,
        ctx: &AuthContext,
        task: &TaskRef,
        operation: TaskOperation,
        link: Option<&IdentityLink>,
    ) -> ServiceResult<()> {
        ensure_task_id(task)?;
        if !task.is_authorization_eligible() {
            return Ok(());
        }
        if let Some(link) = link {
            link.validate()?;
        }

        self.authorize(ctx, task, operation).await?;

        if let Some(link) = link {
            self.provider.on_identity_link_changed(task, link, true).await?;
        }
        Ok(())
    }
}

/// An empty id clears the field like `None` does.
fn present(identity_id: Option<&str>) -> Option<&str> {
    identity_id.filter(|id| !id.is_empty())
}

fn ensure_task_id(task: &TaskRef) -> ServiceResult<()> {
    if is_any(&task.id) {
        return Err(ServiceError::NotFound(format!("Cannot find task with id {ANY}")));
    }
    Ok(())
}
