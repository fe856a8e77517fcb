//! Predicate for selecting authorization records.

use tollgate_core::types::{AuthorizationType, ResourceType};

use crate::model::authorization::Authorization;

/// Selects records by resource and identity.
///
/// Empty id lists do not restrict. When both `user_ids` and `group_ids` are
/// given, a record matches if either its user or its group is listed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthorizationQuery {
    pub resource_type: Option<ResourceType>,
    pub resource_ids: Vec<String>,
    pub user_ids: Vec<String>,
    pub group_ids: Vec<String>,
    pub authorization_type: Option<AuthorizationType>,
}

impl AuthorizationQuery {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn resource_type(mut self, resource_type: ResourceType) -> Self {
        self.resource_type = Some(resource_type);
        self
    }

    #[must_use]
    pub fn resource_id(mut self, resource_id: impl Into<String>) -> Self {
        self.resource_ids.push(resource_id.into());
        self
    }

    #[must_use]
    pub fn user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_ids.push(user_id.into());
        self
    }

    #[must_use]
    pub fn group_ids<I, S>(mut self, group_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.group_ids.extend(group_ids.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn group_id(self, group_id: impl Into<String>) -> Self {
        self.group_ids([group_id])
    }

    #[must_use]
    pub fn authorization_type(mut self, authorization_type: AuthorizationType) -> Self {
        self.authorization_type = Some(authorization_type);
        self
    }

    /// Returns `true` if `authorization` satisfies every restriction.
    #[must_use]
    pub fn matches(&self, authorization: &Authorization) -> bool {
        if self
            .resource_type
            .is_some_and(|rt| rt != authorization.resource_type)
        {
            return false;
        }
        if self
            .authorization_type
            .is_some_and(|t| t != authorization.authorization_type)
        {
            return false;
        }
        if !self.resource_ids.is_empty() && !self.resource_ids.contains(&authorization.resource_id)
        {
            return false;
        }
        if self.user_ids.is_empty() && self.group_ids.is_empty() {
            return true;
        }
        let user_match = authorization
            .user_id
            .as_ref()
            .is_some_and(|u| self.user_ids.contains(u));
        let group_match = authorization
            .group_id
            .as_ref()
            .is_some_and(|g| self.group_ids.contains(g));
        user_match || group_match
    }
}
