//! Task authorization: which permissions each task operation needs, and the
//! facade the workflow engine calls around task operations.

pub mod operation;
pub mod service;


pub use operation::{TaskOperation, TaskPolicy};
pub use service::{TaskAuthorization, TaskSave};

use tollgate_core::types::Lineage;

/// What a task belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TaskScope {
    Standalone,
    Process {
        definition_key: String,
        instance_id: String,
    },
    /// Case tasks are neither checked nor provisioned.
    Case { case_instance_id: String },
}

/// The task an operation targets.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TaskRef {
    pub id: String,
    pub scope: TaskScope,
}

impl TaskRef {
    #[must_use]
    pub fn standalone(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            scope: TaskScope::Standalone,
        }
    }

    #[must_use]
    pub fn in_process(
        id: impl Into<String>,
        definition_key: impl Into<String>,
        instance_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            scope: TaskScope::Process {
                definition_key: definition_key.into(),
                instance_id: instance_id.into(),
            },
        }
    }

    #[must_use]
    pub fn in_case(id: impl Into<String>, case_instance_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            scope: TaskScope::Case {
                case_instance_id: case_instance_id.into(),
            },
        }
    }

    /// Returns `false` for case tasks.
    #[must_use]
    pub const fn is_authorization_eligible(&self) -> bool {
        !matches!(self.scope, TaskScope::Case { .. })
    }

    #[must_use]
    pub fn lineage(&self) -> Lineage {
        match &self.scope {
            TaskScope::Process {
                definition_key,
                instance_id,
            } => Lineage::process(definition_key.as_str(), instance_id.as_str()),
            TaskScope::Standalone | TaskScope::Case { .. } => Lineage::none(),
        }
    }
}
