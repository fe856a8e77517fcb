//! Behavior driven by the authorization settings.

use tollgate_test::component::auth::AuthContext;
use tollgate_test::component::config::AuthorizationConfig;
use tollgate_test::component::permission::PermissionMask;
use tollgate_test::component::task::TaskRef;

use super::helpers::*;

/// ## Summary
/// With authorization disabled every operation passes, while default grants
/// are still written.
#[test_log::test(tokio::test)]
async fn disabled_authorization_skips_checks() {
    let fx = Fixture::with_config(&AuthorizationConfig {
        enabled: false,
        ..AuthorizationConfig::default()
    });
    let nobody = fx.as_user("nobody", &[]);
    let task = process_task("myTask");

    fx.authz
        .claim(&nobody, &task, Some("nobody"))
        .await
        .expect("claim unchecked");
    assert_eq!(fx.task_grants("myTask", "nobody").await.len(), 1);
    fx.authz
        .delete_task(&nobody, &task)
        .await
        .expect("delete unchecked");
}

/// ## Summary
/// A context can opt back into checks even when it started unchecked.
#[test_log::test(tokio::test)]
async fn checked_context_restores_enforcement() {
    let fx = Fixture::new();
    let ctx = fx.as_user("nobody", &[]).unchecked();
    let task = process_task("myTask");

    fx.authz
        .authorize(&ctx, &task, TaskOperation::Delete)
        .await
        .expect("unchecked");
    let err = fx
        .authz
        .authorize(&ctx.checked(), &task, TaskOperation::Delete)
        .await
        .expect_err("checked again");
    assert!(matches!(err, ServiceError::AuthorizationDenied(_)));
}

/// ## Summary
/// The configured default permissions decide what linked identities get.
#[test_log::test(tokio::test)]
async fn configured_default_permissions() {
    let fx = Fixture::with_config(&AuthorizationConfig {
        default_task_permission: "update".to_string(),
        default_group_task_permission: Some("TASK_ASSIGN".to_string()),
        ..AuthorizationConfig::default()
    });
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

    let grants = fx.task_grants("myTask", "demo").await;
    assert_eq!(grants[0].permissions, PermissionMask::READ | PermissionMask::UPDATE);

    let member = fx.as_user("fozzie", &["accounting"]);
    assert!(fx.authz.is_permitted(&member, &task, TaskOperation::SetAssignee).await.expect("check"));
    assert!(!fx.authz.is_permitted(&member, &task, TaskOperation::Complete).await.expect("check"));
}

/// ## Summary
/// Case tasks bypass checks, validation and provisioning.
#[test_log::test(tokio::test)]
async fn case_tasks_are_unrestricted() {
    let fx = Fixture::new();
    let nobody = fx.as_user("nobody", &[]);
    let case_task = TaskRef::in_case("caseTask", "ci-1");

    fx.authz
        .set_assignee(&nobody, &case_task, Some("*"))
        .await
        .expect("no validation");
    fx.authz
        .add_candidate_user(&nobody, &case_task, "demo")
        .await
        .expect("no provisioning");
    fx.authz
        .complete(&nobody, &case_task)
        .await
        .expect("no checks");
    assert_eq!(fx.record_count().await, 0);
}
