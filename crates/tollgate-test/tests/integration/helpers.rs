#![allow(clippy::expect_used, dead_code)]
//! Test helpers for integration tests.
//!
//! Each test builds its own [`Fixture`]: an in-memory authorization store and
//! a task facade over it. Tests run in parallel without sharing state.

use std::sync::Arc;

use tollgate_test::component::auth::{AuthContext, Identity};
use tollgate_test::component::config::AuthorizationConfig;
use tollgate_test::component::db::{AuthorizationQuery, AuthorizationStore, MemoryAuthorizationStore};
use tollgate_test::component::model::authorization::Authorization;
use tollgate_test::component::permission::PermissionMask;
use tollgate_test::component::task::{TaskAuthorization, TaskRef};
use tollgate_test::component::types::ResourceType;

pub use tollgate_test::component::error::ServiceError;
pub use tollgate_test::component::task::{TaskOperation, TaskSave};

pub const PROCESS_KEY: &str = "oneTaskProcess";

pub struct Fixture {
    pub store: Arc<MemoryAuthorizationStore>,
    pub authz: TaskAuthorization,
}

impl Fixture {
    pub fn new() -> Self {
        Self::with_config(&AuthorizationConfig::default())
    }

    pub fn with_config(config: &AuthorizationConfig) -> Self {
        let store = Arc::new(MemoryAuthorizationStore::new());
        let dyn_store: Arc<dyn AuthorizationStore> = store.clone();
        let authz = TaskAuthorization::new(dyn_store, config).expect("valid authorization config");
        Self { store, authz }
    }

    /// Context for `user_id` with the given groups.
    pub fn as_user(&self, user_id: &str, groups: &[&str]) -> AuthContext {
        self.authz
            .context(Some(Identity::new(user_id, groups.iter().copied())))
    }

    pub async fn grant_user(&self, resource_type: ResourceType, resource_id: &str, user_id: &str, permissions: PermissionMask) {
        self.save(Authorization::grant_user(resource_type, resource_id, user_id, permissions))
            .await;
    }

    pub async fn grant_group(&self, resource_type: ResourceType, resource_id: &str, group_id: &str, permissions: PermissionMask) {
        self.save(Authorization::grant_group(resource_type, resource_id, group_id, permissions))
            .await;
    }

    pub async fn revoke_user(&self, resource_type: ResourceType, resource_id: &str, user_id: &str, permissions: PermissionMask) {
        self.save(Authorization::revoke_user(resource_type, resource_id, user_id, permissions))
            .await;
    }

    pub async fn revoke_group(&self, resource_type: ResourceType, resource_id: &str, group_id: &str, permissions: PermissionMask) {
        self.save(Authorization::revoke_group(resource_type, resource_id, group_id, permissions))
            .await;
    }

    pub async fn save(&self, authorization: Authorization) {
        self.store.save(authorization).await.expect("save authorization");
    }

    /// Grants stored for `user_id` on the task.
    pub async fn task_grants(&self, task_id: &str, user_id: &str) -> Vec<Authorization> {
        self.store
            .find(
                &AuthorizationQuery::new()
                    .resource_type(ResourceType::Task)
                    .resource_id(task_id)
                    .user_id(user_id),
            )
            .await
            .expect("find authorizations")
    }

    pub async fn record_count(&self) -> usize {
        self.store.len().await
    }
}

pub fn process_task(task_id: &str) -> TaskRef {
    TaskRef::in_process(task_id, PROCESS_KEY, "pi-1")
}
