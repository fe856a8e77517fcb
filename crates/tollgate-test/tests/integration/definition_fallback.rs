//! Task checks fall back to the owning process definition.

use tollgate_test::component::permission::PermissionMask;
use tollgate_test::component::task::TaskRef;
use tollgate_test::component::types::ResourceType;

use super::helpers::*;

/// ## Summary
/// `READ_TASK` on every definition lets a user read any process task, but
/// not standalone tasks, which have no definition.
#[test_log::test(tokio::test)]
async fn read_task_on_any_definition() {
    let fx = Fixture::new();
    fx.grant_user(ResourceType::ProcessDefinition, "*", "demo", PermissionMask::READ_TASK)
        .await;
    let demo = fx.as_user("demo", &[]);

    let readable = fx
        .authz
        .filter_readable(
            &demo,
            vec![
                TaskRef::in_process("t1", "invoice", "pi-1"),
                TaskRef::in_process("t2", "oneTaskProcess", "pi-2"),
                TaskRef::standalone("t3"),
            ],
        )
        .await
        .expect("filter");

    let ids: Vec<_> = readable.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, ["t1", "t2"]);
}

/// ## Summary
/// `READ_TASK` on one definition only covers that definition's tasks.
#[test_log::test(tokio::test)]
async fn read_task_on_specific_definition() {
    let fx = Fixture::new();
    fx.grant_user(ResourceType::ProcessDefinition, "invoice", "demo", PermissionMask::READ_TASK)
        .await;
    let demo = fx.as_user("demo", &[]);

    let invoice = TaskRef::in_process("t1", "invoice", "pi-1");
    let other = TaskRef::in_process("t2", "oneTaskProcess", "pi-2");

    assert!(fx.authz.is_permitted(&demo, &invoice, TaskOperation::Read).await.expect("check"));
    assert!(!fx.authz.is_permitted(&demo, &other, TaskOperation::Read).await.expect("check"));
}

/// ## Summary
/// Definition-level `TASK_WORK` lets a user complete tasks of that process,
/// and the denial for others names both levels.
#[test_log::test(tokio::test)]
async fn task_work_on_definition() {
    let fx = Fixture::new();
    fx.grant_group(ResourceType::ProcessDefinition, PROCESS_KEY, "clerks", PermissionMask::TASK_WORK)
        .await;

    fx.authz
        .complete(&fx.as_user("demo", &["clerks"]), &process_task("myTask"))
        .await
        .expect("group member completes");

    let err = fx
        .authz
        .complete(&fx.as_user("kermit", &[]), &process_task("otherTask"))
        .await
        .expect_err("denied");
    let message = err.to_string();
    assert!(message.contains("'TASK_WORK' permission on resource 'otherTask' of type 'Task'"), "{message}");
    assert!(
        message.contains("'UPDATE_TASK' permission on resource 'oneTaskProcess' of type 'ProcessDefinition'"),
        "{message}"
    );
}

/// ## Summary
/// Variable reads accept `READ` unless specific variable permissions are
/// enforced.
#[test_log::test(tokio::test)]
async fn variable_reads_follow_policy() {
    use tollgate_test::component::config::AuthorizationConfig;

    let relaxed = Fixture::new();
    let strict = Fixture::with_config(&AuthorizationConfig {
        enforce_specific_variable_permission: true,
        ..AuthorizationConfig::default()
    });
    for fx in [&relaxed, &strict] {
        fx.grant_user(ResourceType::Task, "myTask", "demo", PermissionMask::READ)
            .await;
    }

    assert!(can_read_variables(&relaxed).await);
    assert!(!can_read_variables(&strict).await);

    strict
        .grant_user(ResourceType::ProcessDefinition, PROCESS_KEY, "demo", PermissionMask::READ_TASK_VARIABLE)
        .await;
    assert!(can_read_variables(&strict).await);
}

async fn can_read_variables(fx: &Fixture) -> bool {
    fx.authz
        .is_permitted(&fx.as_user("demo", &[]), &process_task("myTask"), TaskOperation::ReadVariables)
        .await
        .expect("check")
}
