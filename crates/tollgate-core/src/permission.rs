//! Permission flags, per-resource permission names and the fallback table.
//!
//! Every permission owns one bit of a [`PermissionMask`]. A resource type only
//! accepts the permission names it defines, and [`PermissionMask::ALL`]
//! satisfies any request.
//!
//! ## Fallback
//!
//! When a check on a concrete resource fails, the resolver may retry it on the
//! owning resource under a different permission name, e.g. `UPDATE` on a task
//! becomes `UPDATE_TASK` on its process definition. The mapping is the static
//! table returned by [`fallback`].

use std::fmt;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::types::ResourceType;

bitflags! {
    /// Set of granted or revoked permissions.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct PermissionMask: u32 {
        const READ = 1;
        const UPDATE = 1 << 1;
        const CREATE = 1 << 2;
        const DELETE = 1 << 3;
        const READ_TASK = 1 << 4;
        const UPDATE_TASK = 1 << 5;
        const CREATE_INSTANCE = 1 << 6;
        const READ_INSTANCE = 1 << 7;
        const UPDATE_INSTANCE = 1 << 8;
        const DELETE_INSTANCE = 1 << 9;
        const TASK_WORK = 1 << 10;
        const TASK_ASSIGN = 1 << 11;
        const READ_VARIABLE = 1 << 12;
        const UPDATE_VARIABLE = 1 << 13;
        const READ_TASK_VARIABLE = 1 << 14;
        const UPDATE_TASK_VARIABLE = 1 << 15;
        const ALL = u32::MAX;
    }
}

impl PermissionMask {
    /// Returns `true` if this mask satisfies `permission`.
    #[must_use]
    pub const fn grants(self, permission: Permission) -> bool {
        self.contains(permission.mask())
    }

    /// Stored representation; the bits are kept as is.
    #[must_use]
    pub const fn to_stored(self) -> i32 {
        self.bits().cast_signed()
    }

    #[must_use]
    pub const fn from_stored(stored: i32) -> Self {
        Self::from_bits_retain(stored.cast_unsigned())
    }
}

impl From<Permission> for PermissionMask {
    fn from(permission: Permission) -> Self {
        permission.mask()
    }
}

/// A single named permission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Permission {
    Read,
    Update,
    Create,
    Delete,
    ReadTask,
    UpdateTask,
    CreateInstance,
    ReadInstance,
    UpdateInstance,
    DeleteInstance,
    TaskWork,
    TaskAssign,
    ReadVariable,
    UpdateVariable,
    ReadTaskVariable,
    UpdateTaskVariable,
    All,
}

use ResourceType::{ProcessDefinition, ProcessInstance, Task};

const EVERY_RESOURCE: &[ResourceType] = &[ProcessDefinition, Task, ProcessInstance];
const DEFINITION_ONLY: &[ResourceType] = &[ProcessDefinition];
const TASK_ONLY: &[ResourceType] = &[Task];
const TASK_AND_DEFINITION: &[ResourceType] = &[Task, ProcessDefinition];

impl Permission {
    pub const VALUES: [Self; 17] = [
        Self::Read,
        Self::Update,
        Self::Create,
        Self::Delete,
        Self::ReadTask,
        Self::UpdateTask,
        Self::CreateInstance,
        Self::ReadInstance,
        Self::UpdateInstance,
        Self::DeleteInstance,
        Self::TaskWork,
        Self::TaskAssign,
        Self::ReadVariable,
        Self::UpdateVariable,
        Self::ReadTaskVariable,
        Self::UpdateTaskVariable,
        Self::All,
    ];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Read => "READ",
            Self::Update => "UPDATE",
            Self::Create => "CREATE",
            Self::Delete => "DELETE",
            Self::ReadTask => "READ_TASK",
            Self::UpdateTask => "UPDATE_TASK",
            Self::CreateInstance => "CREATE_INSTANCE",
            Self::ReadInstance => "READ_INSTANCE",
            Self::UpdateInstance => "UPDATE_INSTANCE",
            Self::DeleteInstance => "DELETE_INSTANCE",
            Self::TaskWork => "TASK_WORK",
            Self::TaskAssign => "TASK_ASSIGN",
            Self::ReadVariable => "READ_VARIABLE",
            Self::UpdateVariable => "UPDATE_VARIABLE",
            Self::ReadTaskVariable => "READ_TASK_VARIABLE",
            Self::UpdateTaskVariable => "UPDATE_TASK_VARIABLE",
            Self::All => "ALL",
        }
    }

    #[must_use]
    pub const fn mask(self) -> PermissionMask {
        match self {
            Self::Read => PermissionMask::READ,
            Self::Update => PermissionMask::UPDATE,
            Self::Create => PermissionMask::CREATE,
            Self::Delete => PermissionMask::DELETE,
            Self::ReadTask => PermissionMask::READ_TASK,
            Self::UpdateTask => PermissionMask::UPDATE_TASK,
            Self::CreateInstance => PermissionMask::CREATE_INSTANCE,
            Self::ReadInstance => PermissionMask::READ_INSTANCE,
            Self::UpdateInstance => PermissionMask::UPDATE_INSTANCE,
            Self::DeleteInstance => PermissionMask::DELETE_INSTANCE,
            Self::TaskWork => PermissionMask::TASK_WORK,
            Self::TaskAssign => PermissionMask::TASK_ASSIGN,
            Self::ReadVariable => PermissionMask::READ_VARIABLE,
            Self::UpdateVariable => PermissionMask::UPDATE_VARIABLE,
            Self::ReadTaskVariable => PermissionMask::READ_TASK_VARIABLE,
            Self::UpdateTaskVariable => PermissionMask::UPDATE_TASK_VARIABLE,
            Self::All => PermissionMask::ALL,
        }
    }

    /// Resource types that define this permission name.
    #[must_use]
    pub const fn resource_types(self) -> &'static [ResourceType] {
        match self {
            Self::Read | Self::Update | Self::Create | Self::Delete | Self::All => EVERY_RESOURCE,
            Self::TaskWork | Self::TaskAssign => TASK_AND_DEFINITION,
            Self::ReadVariable | Self::UpdateVariable => TASK_ONLY,
            Self::ReadTask
            | Self::UpdateTask
            | Self::CreateInstance
            | Self::ReadInstance
            | Self::UpdateInstance
            | Self::DeleteInstance
            | Self::ReadTaskVariable
            | Self::UpdateTaskVariable => DEFINITION_ONLY,
        }
    }

    #[must_use]
    pub fn applies_to(self, resource_type: ResourceType) -> bool {
        self.resource_types().contains(&resource_type)
    }

    /// ## Summary
    /// Resolves a permission name in the scope of a resource type.
    ///
    /// ## Errors
    /// Returns `UnknownPermission` if the name is unknown or the resource type
    /// does not define it.
    pub fn for_resource(name: &str, resource_type: ResourceType) -> CoreResult<Self> {
        Self::VALUES
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(name.trim()) && p.applies_to(resource_type))
            .ok_or_else(|| CoreError::UnknownPermission {
                name: name.to_string(),
                resource_type,
            })
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Where a failed check is retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fallback {
    pub resource_type: ResourceType,
    /// `None` means the owning resource has no counterpart and the check
    /// cannot be satisfied there.
    pub permission: Option<Permission>,
}

struct FallbackRule {
    source: ResourceType,
    permission: Permission,
    target: ResourceType,
    target_permission: Option<Permission>,
}

const fn rule(
    source: ResourceType,
    permission: Permission,
    target: ResourceType,
    target_permission: Option<Permission>,
) -> FallbackRule {
    FallbackRule {
        source,
        permission,
        target,
        target_permission,
    }
}

const FALLBACK_RULES: &[FallbackRule] = &[
    rule(Task, Permission::Read, ProcessDefinition, Some(Permission::ReadTask)),
    rule(Task, Permission::Update, ProcessDefinition, Some(Permission::UpdateTask)),
    rule(Task, Permission::Delete, ProcessDefinition, None),
    rule(Task, Permission::Create, ProcessDefinition, None),
    rule(Task, Permission::TaskAssign, ProcessDefinition, Some(Permission::TaskAssign)),
    rule(Task, Permission::TaskWork, ProcessDefinition, Some(Permission::TaskWork)),
    rule(Task, Permission::ReadVariable, ProcessDefinition, Some(Permission::ReadTaskVariable)),
    rule(Task, Permission::UpdateVariable, ProcessDefinition, Some(Permission::UpdateTaskVariable)),
    rule(ProcessInstance, Permission::Read, ProcessDefinition, Some(Permission::ReadInstance)),
    rule(ProcessInstance, Permission::Update, ProcessDefinition, Some(Permission::UpdateInstance)),
    rule(ProcessInstance, Permission::Delete, ProcessDefinition, Some(Permission::DeleteInstance)),
    rule(ProcessInstance, Permission::Create, ProcessDefinition, None),
];

/// Looks up the fallback for `permission` on `resource_type`.
#[must_use]
pub fn fallback(resource_type: ResourceType, permission: Permission) -> Option<Fallback> {
    FALLBACK_RULES
        .iter()
        .find(|r| r.source == resource_type && r.permission == permission)
        .map(|r| Fallback {
            resource_type: r.target,
            permission: r.target_permission,
        })
}
