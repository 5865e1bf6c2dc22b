//! The capability decision function

use crate::capability::CapabilitySet;
use crewtrack_domain::{Project, User};
use serde::{Deserialize, Serialize};

/// How far a `ProjectManager`-role actor's reach extends
///
/// Two divergent rules were observed upstream: one view granted every
/// manager-role actor full control over any project, another restricted
/// control to the project's own manager. The strict rule is the default;
/// the relaxed rule is an explicit opt-in, never a silent mix of both.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ManagerScope {
    /// Manager-role actors control only the projects they manage
    #[default]
    ManagedProjectsOnly,
    /// Any manager-role actor controls any project
    AnyProject,
}

/// The authorization policy
///
/// Pure and deterministic: the same (actor, project) pair always yields
/// the same capability set, and evaluation has no side effects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Policy {
    /// Reach of the global `ProjectManager` role
    #[serde(default)]
    pub manager_scope: ManagerScope,
}

impl Policy {
    /// Policy with the strict default scope
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Policy with a specific manager scope
    #[inline]
    #[must_use]
    pub fn with_manager_scope(scope: ManagerScope) -> Self {
        Self {
            manager_scope: scope,
        }
    }

    /// Capabilities `actor` holds on `project`
    ///
    /// - admins hold the full set, unconditionally;
    /// - the project's manager (by id) holds the full set;
    /// - other manager-role actors hold the full set only under
    ///   [`ManagerScope::AnyProject`];
    /// - team members hold the empty set. Their task self-service rights
    ///   come from the lifecycle rules, not from capabilities.
    #[must_use]
    pub fn capabilities_for(&self, actor: &User, project: &Project) -> CapabilitySet {
        if actor.role.is_admin() || project.manages(&actor.id) {
            return CapabilitySet::full();
        }
        if actor.role.is_manager() && self.manager_scope == ManagerScope::AnyProject {
            return CapabilitySet::full();
        }
        CapabilitySet::empty()
    }

    /// Whether `actor` may read this project's detail view
    ///
    /// Membership (manager included) or admin role; capability-free reads
    /// for everyone in the roster.
    #[inline]
    #[must_use]
    pub fn can_view(&self, actor: &User, project: &Project) -> bool {
        actor.role.is_admin() || project.is_member(&actor.id)
    }
}
