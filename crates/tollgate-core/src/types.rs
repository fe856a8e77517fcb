//! Resource and authorization classifications.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// Category of a protected resource.
///
/// The integer id is the persisted representation, the name is what users
/// see in denial messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceType {
    ProcessDefinition,
    Task,
    ProcessInstance,
}

impl ResourceType {
    pub const ALL: [Self; 3] = [Self::ProcessDefinition, Self::Task, Self::ProcessInstance];

    /// Returns the stable integer id stored with authorization records.
    #[must_use]
    pub const fn id(self) -> i32 {
        match self {
            Self::ProcessDefinition => 6,
            Self::Task => 7,
            Self::ProcessInstance => 8,
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::ProcessDefinition => "ProcessDefinition",
            Self::Task => "Task",
            Self::ProcessInstance => "ProcessInstance",
        }
    }

    /// ## Summary
    /// Resolves a stored resource type id.
    ///
    /// ## Errors
    /// Returns `InvalidInput` for ids that do not belong to a known resource type.
    pub fn from_id(id: i32) -> CoreResult<Self> {
        Self::ALL
            .into_iter()
            .find(|rt| rt.id() == id)
            .ok_or_else(|| CoreError::InvalidInput(format!("unknown resource type id {id}")))
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Kind of an authorization record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AuthorizationType {
    /// Applies to every identity.
    Global,
    Grant,
    Revoke,
}

impl AuthorizationType {
    #[must_use]
    pub const fn id(self) -> i32 {
        match self {
            Self::Global => 0,
            Self::Grant => 1,
            Self::Revoke => 2,
        }
    }

    /// ## Summary
    /// Resolves a stored authorization type id.
    ///
    /// ## Errors
    /// Returns `InvalidInput` for ids outside `0..=2`.
    pub fn from_id(id: i32) -> CoreResult<Self> {
        match id {
            0 => Ok(Self::Global),
            1 => Ok(Self::Grant),
            2 => Ok(Self::Revoke),
            other => Err(CoreError::InvalidInput(format!(
                "unknown authorization type id {other}"
            ))),
        }
    }

    /// Returns `true` for records that add permissions.
    #[must_use]
    pub const fn is_granting(self) -> bool {
        matches!(self, Self::Global | Self::Grant)
    }
}

impl fmt::Display for AuthorizationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Global => f.write_str("GLOBAL"),
            Self::Grant => f.write_str("GRANT"),
            Self::Revoke => f.write_str("REVOKE"),
        }
    }
}

/// Ids of the resources that own a resource, used when a check falls back
/// from the resource to its owner.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Lineage {
    pub process_definition_key: Option<String>,
    pub process_instance_id: Option<String>,
}

impl Lineage {
    /// A resource with no owners.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn process(definition_key: impl Into<String>, instance_id: impl Into<String>) -> Self {
        Self {
            process_definition_key: Some(definition_key.into()),
            process_instance_id: Some(instance_id.into()),
        }
    }

    /// Returns the id of the owning resource of the given type, if known.
    #[must_use]
    pub fn owner_id(&self, owner_type: ResourceType) -> Option<&str> {
        match owner_type {
            ResourceType::ProcessDefinition => self.process_definition_key.as_deref(),
            ResourceType::ProcessInstance => self.process_instance_id.as_deref(),
            ResourceType::Task => None,
        }
    }
}
