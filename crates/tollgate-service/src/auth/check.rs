//! Permission checks and their alternatives.
//!
//! A [`PermissionCheck`] asks for one permission on one resource. A
//! [`CompositeCheck`] lists the checks an operation accepts; one passing
//! alternative is enough.

use std::fmt;

use tollgate_core::constants::ANY;
use tollgate_core::permission::{Permission, fallback};
use tollgate_core::types::{Lineage, ResourceType};

use super::denied::MissingAuthorization;

/// Resource id of a check.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ResourceId {
    /// Every resource of the type.
    Any,
    Id(String),
}

impl ResourceId {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Any => ANY,
            Self::Id(id) => id,
        }
    }

    #[must_use]
    pub const fn is_any(&self) -> bool {
        matches!(self, Self::Any)
    }
}

impl From<&str> for ResourceId {
    fn from(id: &str) -> Self {
        if id == ANY { Self::Any } else { Self::Id(id.to_string()) }
    }
}

impl From<String> for ResourceId {
    fn from(id: String) -> Self {
        if id == ANY { Self::Any } else { Self::Id(id) }
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One permission on one resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PermissionCheck {
    pub permission: Permission,
    pub resource_type: ResourceType,
    pub resource_id: ResourceId,
    /// Owners of the resource, consulted for fallback checks.
    pub lineage: Lineage,
}

impl PermissionCheck {
    #[must_use]
    pub fn new(
        permission: Permission,
        resource_type: ResourceType,
        resource_id: impl Into<ResourceId>,
    ) -> Self {
        Self {
            permission,
            resource_type,
            resource_id: resource_id.into(),
            lineage: Lineage::none(),
        }
    }

    /// A check on every resource of the type.
    #[must_use]
    pub fn on_any(permission: Permission, resource_type: ResourceType) -> Self {
        Self::new(permission, resource_type, ResourceId::Any)
    }

    #[must_use]
    pub fn with_lineage(mut self, lineage: Lineage) -> Self {
        self.lineage = lineage;
        self
    }

    /// ## Summary
    /// Returns the check to retry on the owning resource when this one fails.
    ///
    /// There is none for wildcard resource ids, for permissions the owning
    /// resource has no counterpart for, and for resources whose owner is unknown.
    #[must_use]
    pub fn fallback(&self) -> Option<Self> {
        if self.resource_id.is_any() {
            return None;
        }
        let target = fallback(self.resource_type, self.permission)?;
        let permission = target.permission?;
        let owner_id = self.lineage.owner_id(target.resource_type)?;

        Some(Self {
            permission,
            resource_type: target.resource_type,
            resource_id: ResourceId::from(owner_id),
            lineage: self.lineage.clone(),
        })
    }

    /// This check followed by its fallbacks, in the order they are tried.
    #[must_use]
    pub fn chain(&self) -> Vec<Self> {
        let mut chain = vec![self.clone()];
        while let Some(next) = chain.last().and_then(Self::fallback) {
            if chain.contains(&next) {
                break;
            }
            chain.push(next);
        }
        chain
    }

    #[must_use]
    pub fn missing(&self) -> MissingAuthorization {
        MissingAuthorization {
            permission_name: self.permission.name().to_string(),
            resource_type: self.resource_type,
            resource_id: match &self.resource_id {
                ResourceId::Any => None,
                ResourceId::Id(id) => Some(id.clone()),
            },
        }
    }
}

impl fmt::Display for PermissionCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} on {}:{}", self.permission, self.resource_type, self.resource_id)
    }
}

/// Alternative checks for one operation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompositeCheck {
    alternatives: Vec<PermissionCheck>,
}

impl CompositeCheck {
    /// A composite that requires nothing.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn single(check: PermissionCheck) -> Self {
        Self {
            alternatives: vec![check],
        }
    }

    #[must_use]
    pub fn any_of(alternatives: impl IntoIterator<Item = PermissionCheck>) -> Self {
        Self {
            alternatives: alternatives.into_iter().collect(),
        }
    }

    #[must_use]
    pub fn alternatives(&self) -> &[PermissionCheck] {
        &self.alternatives
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.alternatives.is_empty()
    }

    /// ## Summary
    /// Every check that satisfies this composite: the alternatives first, then
    /// their fallbacks, without duplicates.
    #[must_use]
    pub fn expanded(&self) -> Vec<PermissionCheck> {
        let mut expanded: Vec<PermissionCheck> = Vec::new();
        let mut push = |check: PermissionCheck| {
            if !expanded.iter().any(|c| same_target(c, &check)) {
                expanded.push(check);
            }
        };

        for check in &self.alternatives {
            push(check.clone());
        }
        for check in &self.alternatives {
            for fallback in check.chain().into_iter().skip(1) {
                push(fallback);
            }
        }

        expanded
    }
}

fn same_target(a: &PermissionCheck, b: &PermissionCheck) -> bool {
    a.permission == b.permission
        && a.resource_type == b.resource_type
        && a.resource_id == b.resource_id
}
