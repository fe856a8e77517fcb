//! The error raised when no acceptable permission path is granted.

use std::fmt;

use thiserror::Error;
use tollgate_core::types::ResourceType;

/// A permission the caller was checked for and does not hold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingAuthorization {
    pub permission_name: String,
    pub resource_type: ResourceType,
    /// `None` for checks on every resource of the type.
    pub resource_id: Option<String>,
}

impl fmt::Display for MissingAuthorization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.resource_id {
            Some(id) => write!(
                f,
                "'{}' permission on resource '{id}' of type '{}'",
                self.permission_name, self.resource_type
            ),
            None => write!(
                f,
                "'{}' permission on resource '{}'",
                self.permission_name, self.resource_type
            ),
        }
    }
}

/// Denial naming the user and every permission path that was tried.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationDenied {
    pub user_id: String,
    pub missing: Vec<MissingAuthorization>,
}

impl AuthorizationDenied {
    /// Returns `true` if `permission_name` was among the attempted paths.
    #[must_use]
    pub fn attempted(&self, permission_name: &str) -> bool {
        self.missing.iter().any(|m| m.permission_name == permission_name)
    }
}

impl fmt::Display for AuthorizationDenied {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.missing.as_slice() {
            [] => write!(f, "The user with id '{}' is not authorized.", self.user_id),
            [single] => write!(f, "The user with id '{}' does not have {single}.", self.user_id),
            several => {
                write!(
                    f,
                    "The user with id '{}' does not have one of the following permissions: ",
                    self.user_id
                )?;
                for (i, missing) in several.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" or ")?;
                    }
                    write!(f, "{missing}")?;
                }
                Ok(())
            }
        }
    }
}
