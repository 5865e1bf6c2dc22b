//! Projects, their membership roster, and normalization
//!
//! A project owns its task collection and carries a membership roster:
//! one manager plus a set of team members. Duplicate roster entries were
//! a recurring defect upstream (unmerged membership updates rendered the
//! same member several times), so normalization de-duplicates by id at
//! every boundary where membership is read, and guarantees the manager
//! is always part of the roster.

use crate::ids::{ProjectId, UserId};
use crate::task::Task;
use crate::user::User;
use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Overall status of a project
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ProjectStatus {
    /// Not yet begun
    #[serde(rename = "Not Started")]
    NotStarted,
    /// Actively underway
    #[serde(rename = "In Progress")]
    InProgress,
    /// Finished
    #[serde(rename = "Completed")]
    Completed,
    /// Paused
    #[serde(rename = "On Hold")]
    OnHold,
    /// Abandoned
    #[serde(rename = "Cancelled")]
    Cancelled,
}

impl ProjectStatus {
    /// Every status, in display order
    pub const ALL: [ProjectStatus; 5] = [
        ProjectStatus::NotStarted,
        ProjectStatus::InProgress,
        ProjectStatus::Completed,
        ProjectStatus::OnHold,
        ProjectStatus::Cancelled,
    ];
}

impl Default for ProjectStatus {
    fn default() -> Self {
        ProjectStatus::NotStarted
    }
}

impl std::fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            ProjectStatus::NotStarted => "Not Started",
            ProjectStatus::InProgress => "In Progress",
            ProjectStatus::Completed => "Completed",
            ProjectStatus::OnHold => "On Hold",
            ProjectStatus::Cancelled => "Cancelled",
        };
        write!(f, "{label}")
    }
}

/// A project with its roster and owned tasks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    /// Project identifier
    #[serde(rename = "_id")]
    pub id: ProjectId,
    /// Project name, required non-empty
    pub name: String,
    /// Free-form description
    #[serde(default)]
    pub description: String,
    /// Overall status
    #[serde(default)]
    pub status: ProjectStatus,
    /// The managing user; always part of the roster
    #[serde(rename = "projectManager")]
    pub project_manager: User,
    /// Team members; unique by id after normalization
    #[serde(rename = "teamMembers", default)]
    pub team_members: Vec<User>,
    /// Start date, if scheduled
    #[serde(rename = "startDate", default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    /// End date, if scheduled
    #[serde(rename = "endDate", default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    /// Client contact name
    #[serde(rename = "clientName", default, skip_serializing_if = "Option::is_none")]
    pub client_name: Option<String>,
    /// Client contact email
    #[serde(rename = "clientEmail", default, skip_serializing_if = "Option::is_none")]
    pub client_email: Option<String>,
    /// Client company
    #[serde(rename = "clientCompany", default, skip_serializing_if = "Option::is_none")]
    pub client_company: Option<String>,
    /// Owned task collection, in server order
    #[serde(default)]
    pub tasks: Vec<Task>,
}

impl Project {
    /// Create a project with an empty roster and task list
    ///
    /// The manager is inserted into the roster immediately so the
    /// manager-membership invariant holds from construction.
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<ProjectId>, name: impl Into<String>, manager: User) -> Self {
        let mut project = Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            status: ProjectStatus::NotStarted,
            team_members: vec![manager.clone()],
            project_manager: manager,
            start_date: None,
            end_date: None,
            client_name: None,
            client_email: None,
            client_company: None,
            tasks: Vec::new(),
        };
        project.normalize();
        project
    }

    /// With a status
    #[inline]
    #[must_use]
    pub fn with_status(mut self, status: ProjectStatus) -> Self {
        self.status = status;
        self
    }

    /// With an extra team member
    #[inline]
    #[must_use]
    pub fn with_member(mut self, member: User) -> Self {
        self.team_members.push(member);
        self.normalize();
        self
    }

    /// With a task appended
    #[inline]
    #[must_use]
    pub fn with_task(mut self, task: Task) -> Self {
        self.tasks.push(task);
        self.normalize();
        self
    }

    /// Normalize the project in place
    ///
    /// Restores the invariants that must hold after every mutation:
    /// the manager is in the roster, the roster holds no duplicate ids,
    /// and every owned task carries this project's id as its
    /// back-reference (embedded wire task lists omit it).
    pub fn normalize(&mut self) {
        let mut seen: IndexMap<UserId, User> = IndexMap::with_capacity(self.team_members.len() + 1);
        seen.insert(self.project_manager.id.clone(), self.project_manager.clone());
        for member in self.team_members.drain(..) {
            seen.entry(member.id.clone()).or_insert(member);
        }
        self.team_members = seen.into_values().collect();

        for task in &mut self.tasks {
            task.project_id = self.id.clone();
        }
    }

    /// The normalized roster: manager first, then members, unique by id
    ///
    /// This is the single membership-read routine; views and aggregation
    /// go through it rather than reading `team_members` raw.
    #[must_use]
    pub fn roster(&self) -> IndexMap<&UserId, &User> {
        let mut roster: IndexMap<&UserId, &User> =
            IndexMap::with_capacity(self.team_members.len() + 1);
        roster.insert(&self.project_manager.id, &self.project_manager);
        for member in &self.team_members {
            roster.entry(&member.id).or_insert(member);
        }
        roster
    }

    /// Check whether `user_id` is in the roster (manager included)
    #[inline]
    #[must_use]
    pub fn is_member(&self, user_id: &UserId) -> bool {
        self.project_manager.id == *user_id
            || self.team_members.iter().any(|m| m.id == *user_id)
    }

    /// Check whether `user_id` manages this project
    #[inline]
    #[must_use]
    pub fn manages(&self, user_id: &UserId) -> bool {
        self.project_manager.id == *user_id
    }

    /// Find an owned task by id
    #[inline]
    #[must_use]
    pub fn task(&self, task_id: &crate::ids::TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == *task_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn manager() -> User {
        User::new("pm", "Mahesh", "mahesh@example.com").with_role(crate::UserRole::ProjectManager)
    }

    #[test]
    fn manager_is_always_in_roster() {
        let project = Project::new("p1", "Atlas", manager());
        assert!(project.is_member(&"pm".into()));
        assert_eq!(project.roster().len(), 1);
    }

    #[test]
    fn roster_dedups_by_id() {
        let dup = User::new("pm", "Mahesh again", "mahesh@example.com");
        let member = User::new("u1", "Asha", "asha@example.com");
        let project = Project::new("p1", "Atlas", manager())
            .with_member(dup)
            .with_member(member.clone())
            .with_member(member);

        let roster = project.roster();
        assert_eq!(roster.len(), 2);
        // First occurrence wins: the manager's own record, then Asha.
        assert_eq!(roster[&UserId::new("pm")].name, "Mahesh");
    }

    #[test]
    fn normalize_stamps_task_back_references() {
        let project = Project::new("p7", "Atlas", manager()).with_task(Task::new("t1", "plan"));
        assert_eq!(project.tasks[0].project_id, ProjectId::new("p7"));
    }

    #[test]
    fn project_deserializes_from_wire_shape() {
        let json = r#"{
            "_id": "p1",
            "name": "Atlas",
            "description": "rollout",
            "status": "In Progress",
            "projectManager": { "_id": "pm", "name": "M", "email": "m@x.io", "role": "projectManager" },
            "teamMembers": [
                { "_id": "pm", "name": "M", "email": "m@x.io", "role": "projectManager" },
                { "_id": "u1", "name": "A", "email": "a@x.io", "role": "teamMember" }
            ],
            "startDate": "2025-10-01",
            "tasks": [],
            "taskCount": 0,
            "completedTaskCount": 0,
            "overallCompletionPercentage": 0
        }"#;
        let mut project: Project = serde_json::from_str(json).unwrap();
        project.normalize();
        assert_eq!(project.status, ProjectStatus::InProgress);
        assert_eq!(project.roster().len(), 2);
    }

    proptest! {
        #[test]
        fn roster_never_holds_duplicates(ids in proptest::collection::vec("[a-z][a-z0-9]{0,6}", 0..20)) {
            let mut project = Project::new("p1", "Atlas", manager());
            for id in &ids {
                project.team_members.push(User::new(id.as_str(), "x", "x@x.io"));
            }
            project.normalize();

            let unique: std::collections::BTreeSet<&UserId> =
                project.team_members.iter().map(|m| &m.id).collect();
            prop_assert_eq!(unique.len(), project.team_members.len());
            prop_assert!(project.is_member(&"pm".into()));
        }
    }
}
