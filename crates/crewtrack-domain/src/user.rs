//! User accounts and global roles

use crate::ids::UserId;
use serde::{Deserialize, Serialize};

/// Global role attached to a user account
///
/// Roles are global, not per-project: a `ProjectManager` may still only
/// manage the projects assigned to them (see the policy crate for how the
/// two interact).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum UserRole {
    /// Regular team member
    #[serde(rename = "teamMember")]
    TeamMember,
    /// Manages assigned projects
    #[serde(rename = "projectManager")]
    ProjectManager,
    /// Full administrative access
    #[serde(rename = "admin")]
    Admin,
}

impl UserRole {
    /// Check whether this role grants administrative access
    #[inline]
    #[must_use]
    pub fn is_admin(self) -> bool {
        matches!(self, UserRole::Admin)
    }

    /// Check whether this role can be assigned projects to manage
    #[inline]
    #[must_use]
    pub fn is_manager(self) -> bool {
        matches!(self, UserRole::ProjectManager)
    }
}

impl Default for UserRole {
    fn default() -> Self {
        UserRole::TeamMember
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            UserRole::TeamMember => "teamMember",
            UserRole::ProjectManager => "projectManager",
            UserRole::Admin => "admin",
        };
        write!(f, "{label}")
    }
}

/// A user account as issued by the server
///
/// Immutable on the client except through an explicit profile update,
/// which is outside this engine's scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Stable identifier
    #[serde(rename = "_id")]
    pub id: UserId,
    /// Display name
    pub name: String,
    /// Login email, unique server-side
    pub email: String,
    /// Global role
    #[serde(default)]
    pub role: UserRole,
    /// Optional avatar image URL
    #[serde(rename = "avatar", default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

impl User {
    /// Create a user record
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<UserId>, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: email.into(),
            role: UserRole::TeamMember,
            avatar_url: None,
        }
    }

    /// With a specific role
    #[inline]
    #[must_use]
    pub fn with_role(mut self, role: UserRole) -> Self {
        self.role = role;
        self
    }

    /// With an avatar URL
    #[inline]
    #[must_use]
    pub fn with_avatar(mut self, url: impl Into<String>) -> Self {
        self.avatar_url = Some(url.into());
        self
    }
}
