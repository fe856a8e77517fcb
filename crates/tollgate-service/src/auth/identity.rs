//! Identity context for authorization checks.
//!
//! An [`AuthContext`] travels with every operation. It names the
//! authenticated user and the groups the identity collaborator resolved for
//! them, and says whether checks run at all. Skipping checks is always an
//! explicit, scoped decision: [`AuthContext::unchecked`] returns a copy, the
//! original context keeps checking.

/// An authenticated user and their group memberships.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    user_id: String,
    group_ids: Vec<String>,
}

impl Identity {
    /// ## Arguments
    ///
    /// - `user_id`: The authenticated user.
    /// - `group_ids`: Groups the user belongs to.
    #[must_use]
    pub fn new<I, S>(user_id: impl Into<String>, group_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            user_id: user_id.into(),
            group_ids: group_ids.into_iter().map(Into::into).collect(),
        }
    }

    /// A user without group memberships.
    #[must_use]
    pub fn user(user_id: impl Into<String>) -> Self {
        Self::new(user_id, std::iter::empty::<String>())
    }

    #[must_use]
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    #[must_use]
    pub fn group_ids(&self) -> &[String] {
        &self.group_ids
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Checks {
    Enabled,
    Skipped,
}

/// Per-operation authorization context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    identity: Option<Identity>,
    checks: Checks,
}

impl AuthContext {
    /// Context of an authenticated caller; checks run.
    #[must_use]
    pub const fn authenticated(identity: Identity) -> Self {
        Self {
            identity: Some(identity),
            checks: Checks::Enabled,
        }
    }

    /// Context without an identity. Every check passes.
    #[must_use]
    pub const fn system() -> Self {
        Self {
            identity: None,
            checks: Checks::Enabled,
        }
    }

    /// Same caller with checks skipped, for engine-internal work done on
    /// the caller's behalf.
    #[must_use]
    pub fn unchecked(&self) -> Self {
        Self {
            identity: self.identity.clone(),
            checks: Checks::Skipped,
        }
    }

    /// Same caller with checks running again.
    #[must_use]
    pub fn checked(&self) -> Self {
        Self {
            identity: self.identity.clone(),
            checks: Checks::Enabled,
        }
    }

    #[must_use]
    pub const fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    #[must_use]
    pub fn checks_enabled(&self) -> bool {
        self.checks == Checks::Enabled
    }

    /// The identity to check, or `None` when this context bypasses checks.
    #[must_use]
    pub fn checked_identity(&self) -> Option<&Identity> {
        match self.checks {
            Checks::Enabled => self.identity.as_ref(),
            Checks::Skipped => None,
        }
    }
}

impl From<Identity> for AuthContext {
    fn from(identity: Identity) -> Self {
        Self::authenticated(identity)
    }
}
