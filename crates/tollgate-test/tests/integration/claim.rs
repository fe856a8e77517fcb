//! Claiming tasks and the grants it leaves behind.

use tollgate_test::component::auth::AuthContext;
use tollgate_test::component::permission::{Permission, PermissionMask};
use tollgate_test::component::types::ResourceType;

use super::helpers::*;

/// ## Summary
/// A user without permissions cannot claim; once granted `UPDATE` they can,
/// and the claim gives them `READ` and `TASK_WORK` on the task.
#[test_log::test(tokio::test)]
async fn claim_is_denied_then_granted() {
    let fx = Fixture::new();
    let task = process_task("myTask");
    let demo = fx.as_user("demo", &[]);

    let err = fx
        .authz
        .claim(&demo, &task, Some("demo"))
        .await
        .expect_err("claim without permissions");
    let ServiceError::AuthorizationDenied(denied) = &err else {
        panic!("unexpected error: {err}");
    };
    assert_eq!(denied.user_id, "demo");
    assert!(denied.attempted("UPDATE"));
    assert!(denied.attempted("TASK_ASSIGN"));
    assert!(denied.attempted("UPDATE_TASK"));
    assert!(
        err.to_string()
            .starts_with("The user with id 'demo' does not have one of the following permissions: "),
        "{err}"
    );
    assert!(fx.task_grants("myTask", "demo").await.is_empty());

    fx.grant_user(ResourceType::Task, "myTask", "admin", PermissionMask::UPDATE)
        .await;
    let admin = fx.as_user("admin", &[]);
    fx.authz
        .claim(&admin, &task, Some("demo"))
        .await
        .expect("admin claims for demo");

    let grants = fx.task_grants("myTask", "demo").await;
    assert_eq!(grants.len(), 1);
    assert!(grants[0].permissions.grants(Permission::Read));
    assert!(grants[0].permissions.grants(Permission::TaskWork));
    assert_eq!(grants[0].permissions, PermissionMask::READ | PermissionMask::TASK_WORK);

    fx.authz
        .complete(&demo, &task)
        .await
        .expect("claimant completes through the default grant");
}

/// ## Summary
/// Assigning the same user twice keeps a single grant.
#[test_log::test(tokio::test)]
async fn repeated_assignment_is_idempotent() {
    let fx = Fixture::new();
    let task = process_task("myTask");
    let system = AuthContext::system();

    for _ in 0..3 {
        fx.authz
            .set_assignee(&system, &task, Some("demo"))
            .await
            .expect("assign");
    }
    fx.authz
        .set_owner(&system, &task, Some("demo"))
        .await
        .expect("owner");

    assert_eq!(fx.task_grants("myTask", "demo").await.len(), 1);
    assert_eq!(fx.record_count().await, 1);
}

/// ## Summary
/// Unassigning keeps the former assignee's grant.
#[test_log::test(tokio::test)]
async fn clearing_assignee_keeps_grant() {
    let fx = Fixture::new();
    let task = process_task("myTask");
    let system = AuthContext::system();

    fx.authz
        .set_assignee(&system, &task, Some("demo"))
        .await
        .expect("assign");
    fx.authz
        .claim(&system, &task, None)
        .await
        .expect("unclaim");

    let demo = fx.as_user("demo", &[]);
    assert!(
        fx.authz
            .is_permitted(&demo, &task, TaskOperation::Read)
            .await
            .expect("check")
    );
}

/// ## Summary
/// Delegation grants the delegate the default task permission.
#[test_log::test(tokio::test)]
async fn delegation_grants_the_delegate() {
    let fx = Fixture::new();
    let task = process_task("myTask");
    fx.grant_user(ResourceType::Task, "myTask", "demo", PermissionMask::TASK_ASSIGN)
        .await;

    fx.authz
        .delegate(&fx.as_user("demo", &[]), &task, "kermit")
        .await
        .expect("delegate");

    let grants = fx.task_grants("myTask", "kermit").await;
    assert_eq!(grants.len(), 1);
    assert_eq!(grants[0].permissions, PermissionMask::READ | PermissionMask::TASK_WORK);
}

/// ## Summary
/// `TASK_WORK` on the task is enough to claim it.
#[test_log::test(tokio::test)]
async fn task_work_on_task_allows_claim() {
    let fx = Fixture::new();
    fx.grant_user(ResourceType::Task, "myTask", "test", PermissionMask::TASK_WORK)
        .await;

    fx.authz
        .claim(&fx.as_user("test", &[]), &process_task("myTask"), Some("demo"))
        .await
        .expect("claim with TASK_WORK on the task");

    assert_eq!(fx.task_grants("myTask", "demo").await.len(), 1);
}

/// ## Summary
/// `TASK_WORK` on the process definition lets a user claim its tasks.
#[test_log::test(tokio::test)]
async fn task_work_on_definition_allows_claim() {
    let fx = Fixture::new();
    fx.grant_user(ResourceType::ProcessDefinition, PROCESS_KEY, "test", PermissionMask::TASK_WORK)
        .await;

    fx.authz
        .claim(&fx.as_user("test", &[]), &process_task("myTask"), Some("demo"))
        .await
        .expect("claim with TASK_WORK on the definition");
}

/// ## Summary
/// `TASK_WORK` on a standalone task allows the claim when `UPDATE` is revoked.
#[test_log::test(tokio::test)]
async fn task_work_allows_claim_when_update_is_revoked() {
    let fx = Fixture::new();
    let task = tollgate_test::component::task::TaskRef::standalone("myTask");
    fx.grant_user(ResourceType::Task, "myTask", "test", PermissionMask::TASK_WORK)
        .await;
    fx.revoke_user(ResourceType::Task, "myTask", "test", PermissionMask::UPDATE)
        .await;

    fx.authz
        .claim(&fx.as_user("test", &[]), &task, Some("test"))
        .await
        .expect("claim with TASK_WORK");
}
