//! Authorizations are purged when tasks end.

use tollgate_test::component::auth::AuthContext;
use tollgate_test::component::permission::PermissionMask;
use tollgate_test::component::task::TaskRef;
use tollgate_test::component::types::ResourceType;

use super::helpers::*;

/// ## Summary
/// Completing a task removes every record for it and nothing else.
#[test_log::test(tokio::test)]
async fn completion_purges_only_the_task() {
    let fx = Fixture::new();
    let task = process_task("myTask");
    let system = AuthContext::system();
    fx.authz
        .set_assignee(&system, &task, Some("demo"))
        .await
        .expect("assign");
    fx.authz
        .add_candidate_group(&system, &task, "accounting")
        .await
        .expect("group");
    fx.grant_user(ResourceType::Task, "otherTask", "demo", PermissionMask::READ)
        .await;
    fx.grant_user(ResourceType::Task, "*", "demo", PermissionMask::READ)
        .await;

    let purged = fx
        .authz
        .complete(&fx.as_user("demo", &[]), &task)
        .await
        .expect("complete");

    assert_eq!(purged, 2);
    assert_eq!(fx.record_count().await, 2);
    assert!(fx.task_grants("myTask", "demo").await.is_empty());
}

/// ## Summary
/// Deleting requires `DELETE` on the task; denial leaves records in place.
#[test_log::test(tokio::test)]
async fn deletion_requires_delete_and_purges() {
    let fx = Fixture::new();
    let task = TaskRef::standalone("myTask");
    fx.authz
        .set_assignee(&AuthContext::system(), &task, Some("demo"))
        .await
        .expect("assign");
    let demo = fx.as_user("demo", &[]);

    let err = fx.authz.delete_task(&demo, &task).await.expect_err("denied");
    assert_eq!(
        err.to_string(),
        "The user with id 'demo' does not have 'DELETE' permission on resource 'myTask' of type 'Task'."
    );
    assert_eq!(fx.record_count().await, 1);

    fx.grant_user(ResourceType::Task, "myTask", "demo", PermissionMask::DELETE)
        .await;
    assert_eq!(fx.authz.delete_task(&demo, &task).await.expect("delete"), 1);
    assert_eq!(fx.record_count().await, 0);
}

/// ## Summary
/// Deleting a task with no records purges nothing and succeeds.
#[test_log::test(tokio::test)]
async fn deleting_unprovisioned_task_is_a_no_op() {
    let fx = Fixture::new();
    let purged = fx
        .authz
        .delete_task(&AuthContext::system(), &TaskRef::standalone("ghost"))
        .await
        .expect("delete");
    assert_eq!(purged, 0);
}
