//! Permission alternatives per task operation.

use tollgate_core::config::AuthorizationConfig;
use tollgate_core::permission::Permission;
use tollgate_core::types::ResourceType;

use crate::auth::check::{CompositeCheck, PermissionCheck};

use super::TaskRef;

/// Operations the workflow engine performs on tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskOperation {
    Create,
    Read,
    ReadIdentityLinks,
    ReadVariables,
    /// Saving changes to an existing task.
    Save,
    SetAssignee,
    SetOwner,
    Delegate,
    SetPriority,
    AddIdentityLink,
    DeleteIdentityLink,
    Claim,
    Complete,
    Resolve,
    UpdateVariables,
    Delete,
}

/// Maps task operations to the permissions that allow them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskPolicy {
    /// Variable reads need `READ_VARIABLE` rather than `READ`.
    pub enforce_specific_variable_permission: bool,
}

impl TaskPolicy {
    #[must_use]
    pub const fn from_config(config: &AuthorizationConfig) -> Self {
        Self {
            enforce_specific_variable_permission: config.enforce_specific_variable_permission,
        }
    }

    /// Task permissions accepted for `operation`, in the order they are
    /// reported when all of them are missing.
    #[must_use]
    pub const fn task_permissions(&self, operation: TaskOperation) -> &'static [Permission] {
        use Permission::{Delete, Read, ReadVariable, TaskAssign, TaskWork, Update, UpdateVariable};

        match operation {
            TaskOperation::Create => &[Permission::Create],
            TaskOperation::Read | TaskOperation::ReadIdentityLinks => &[Read],
            TaskOperation::ReadVariables if self.enforce_specific_variable_permission => &[ReadVariable],
            TaskOperation::ReadVariables => &[Read],
            TaskOperation::Save
            | TaskOperation::SetAssignee
            | TaskOperation::SetOwner
            | TaskOperation::Delegate
            | TaskOperation::SetPriority
            | TaskOperation::AddIdentityLink
            | TaskOperation::DeleteIdentityLink => &[TaskAssign, Update],
            TaskOperation::Claim => &[Update, TaskAssign, TaskWork],
            TaskOperation::Complete | TaskOperation::Resolve => &[TaskWork, Update],
            TaskOperation::UpdateVariables => &[Update, UpdateVariable],
            TaskOperation::Delete => &[Delete],
        }
    }

    /// ## Summary
    /// Builds the composite check for `operation` on `task`.
    ///
    /// Creation is checked on every task (`*`), other operations on the task
    /// itself with its process as fallback owner. Case tasks need nothing.
    #[must_use]
    pub fn checks(&self, task: &TaskRef, operation: TaskOperation) -> CompositeCheck {
        if !task.is_authorization_eligible() {
            return CompositeCheck::none();
        }

        let permissions = self.task_permissions(operation);
        if operation == TaskOperation::Create {
            return CompositeCheck::any_of(
                permissions
                    .iter()
                    .map(|p| PermissionCheck::on_any(*p, ResourceType::Task)),
            );
        }

        let lineage = task.lineage();
        CompositeCheck::any_of(permissions.iter().map(|p| {
            PermissionCheck::new(*p, ResourceType::Task, task.id.as_str()).with_lineage(lineage.clone())
        }))
    }
}
