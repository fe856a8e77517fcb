//! Rejects the wildcard where a concrete identity is required.

use std::fmt;

use thiserror::Error;
use tollgate_core::constants::{ANY, RESERVED_IDENTIFIER_DETAIL, is_any};

/// Where an identity id was supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityRole {
    Assignee,
    Owner,
    UserIdentityLink,
    GroupIdentityLink,
}

/// The wildcard was supplied as a concrete identity.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub struct ReservedIdentifierUsed {
    pub role: IdentityRole,
}

impl fmt::Display for ReservedIdentifierUsed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.role {
            IdentityRole::Assignee => write!(
                f,
                "Cannot create default authorization for assignee {ANY}: {RESERVED_IDENTIFIER_DETAIL}"
            ),
            IdentityRole::Owner => write!(
                f,
                "Cannot create default authorization for owner {ANY}: {RESERVED_IDENTIFIER_DETAIL}"
            ),
            IdentityRole::UserIdentityLink => write!(
                f,
                "Cannot grant default authorization for identity link to user {ANY}: {RESERVED_IDENTIFIER_DETAIL}"
            ),
            IdentityRole::GroupIdentityLink => write!(
                f,
                "Cannot grant default authorization for identity link to group {ANY}: {RESERVED_IDENTIFIER_DETAIL}"
            ),
        }
    }
}

/// ## Summary
/// Fails if `identity_id` is the wildcard.
///
/// ## Errors
/// Returns `ReservedIdentifierUsed` naming `role`.
pub fn ensure_not_wildcard(identity_id: &str, role: IdentityRole) -> Result<(), ReservedIdentifierUsed> {
    if is_any(identity_id) {
        tracing::debug!(role = ?role, "Rejected wildcard identity");
        return Err(ReservedIdentifierUsed { role });
    }
    Ok(())
}
