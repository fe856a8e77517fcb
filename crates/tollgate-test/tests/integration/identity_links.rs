//! Identity link validation and provisioning.

use tollgate_test::component::auth::{AuthContext, IdentityLink};
use tollgate_test::component::permission::PermissionMask;
use tollgate_test::component::task::TaskRef;
use tollgate_test::component::types::ResourceType;

use super::helpers::*;

/// ## Summary
/// `*` is rejected as assignee, owner and candidate, with the message naming
/// the role, and nothing is written.
#[test_log::test(tokio::test)]
async fn wildcard_identities_are_rejected() {
    let fx = Fixture::new();
    let task = process_task("myTask");
    let system = AuthContext::system();

    let assignee = fx.authz.set_assignee(&system, &task, Some("*")).await;
    let owner = fx.authz.set_owner(&system, &task, Some("*")).await;
    let user = fx.authz.add_candidate_user(&system, &task, "*").await;
    let group = fx.authz.add_candidate_group(&system, &task, "*").await;

    let messages: Vec<String> = [assignee, owner, user, group]
        .into_iter()
        .map(|r| r.expect_err("wildcard rejected").to_string())
        .collect();
    assert_eq!(
        messages,
        [
            "Cannot create default authorization for assignee *: id cannot be *. * is a reserved identifier.",
            "Cannot create default authorization for owner *: id cannot be *. * is a reserved identifier.",
            "Cannot grant default authorization for identity link to user *: id cannot be *. * is a reserved identifier.",
            "Cannot grant default authorization for identity link to group *: id cannot be *. * is a reserved identifier.",
        ]
    );
    assert_eq!(fx.record_count().await, 0);
}

/// ## Summary
/// Validation runs before the permission check, so an unauthorized caller
/// sees the validation error.
#[test_log::test(tokio::test)]
async fn validation_precedes_authorization() {
    let fx = Fixture::new();
    let err = fx
        .authz
        .add_candidate_user(&fx.as_user("nobody", &[]), &process_task("myTask"), "*")
        .await
        .expect_err("rejected");

    assert!(matches!(err, ServiceError::ReservedIdentifier(_)));
}

/// ## Summary
/// A task named `*` cannot be targeted.
#[test_log::test(tokio::test)]
async fn wildcard_task_is_not_found() {
    let fx = Fixture::new();
    let err = fx
        .authz
        .add_identity_link(&AuthContext::system(), &TaskRef::standalone("*"), &IdentityLink::candidate_user("demo"))
        .await
        .expect_err("not found");

    assert_eq!(err.to_string(), "Cannot find task with id *");
}

/// ## Summary
/// Candidate groups get a group grant; members of that group can then read
/// and work the task.
#[test_log::test(tokio::test)]
async fn candidate_group_members_can_work_the_task() {
    let fx = Fixture::new();
    let task = process_task("myTask");
    fx.authz
        .add_candidate_group(&AuthContext::system(), &task, "accounting")
        .await
        .expect("link group");

    let member = fx.as_user("fozzie", &["accounting"]);
    let outsider = fx.as_user("gonzo", &["management"]);

    for operation in [TaskOperation::Read, TaskOperation::Complete] {
        assert!(fx.authz.is_permitted(&member, &task, operation).await.expect("check"));
        assert!(!fx.authz.is_permitted(&outsider, &task, operation).await.expect("check"));
    }
}

/// ## Summary
/// Saving a new task with owner and assignee grants both, after checking
/// `CREATE` on every task.
#[test_log::test(tokio::test)]
async fn new_task_provisions_owner_and_assignee() {
    let fx = Fixture::new();
    fx.grant_user(ResourceType::Task, "*", "demo", PermissionMask::CREATE)
        .await;
    let save = TaskSave {
        is_new: true,
        owner: Some("demo".to_string()),
        assignee: Some("kermit".to_string()),
    };

    fx.authz
        .save_task(&fx.as_user("demo", &[]), &TaskRef::standalone("newTask"), &save)
        .await
        .expect("create");

    assert_eq!(fx.task_grants("newTask", "demo").await.len(), 1);
    assert_eq!(fx.task_grants("newTask", "kermit").await.len(), 1);
}

/// ## Summary
/// Removing a candidate requires permission and leaves the grant in place.
#[test_log::test(tokio::test)]
async fn removing_candidate_keeps_grant() {
    let fx = Fixture::new();
    let task = process_task("myTask");
    fx.authz
        .add_candidate_user(&AuthContext::system(), &task, "demo")
        .await
        .expect("link");

    let err = fx
        .authz
        .delete_candidate_user(&fx.as_user("demo", &[]), &task, "demo")
        .await
        .expect_err("demo may not change links");
    assert!(matches!(err, ServiceError::AuthorizationDenied(_)));

    fx.authz
        .delete_candidate_user(&AuthContext::system(), &task, "demo")
        .await
        .expect("unlink");
    assert_eq!(fx.task_grants("myTask", "demo").await.len(), 1);
}

/// ## Summary
/// An empty identity id behaves like no identity: nothing is provisioned.
#[test_log::test(tokio::test)]
async fn empty_identity_ids_provision_nothing() {
    let fx = Fixture::new();
    let task = process_task("myTask");
    let system = AuthContext::system();

    fx.authz
        .set_assignee(&system, &task, Some(""))
        .await
        .expect("empty assignee");
    fx.authz
        .set_owner(&system, &task, Some(""))
        .await
        .expect("empty owner");
    fx.authz
        .add_candidate_group(&system, &task, "")
        .await
        .expect("empty candidate group");
    fx.authz
        .save_task(
            &system,
            &task,
            &TaskSave {
                is_new: true,
                owner: Some(String::new()),
                assignee: None,
            },
        )
        .await
        .expect("save with empty owner");

    assert!(fx.task_grants("myTask", "").await.is_empty());
    assert_eq!(fx.record_count().await, 0);
}
