//! Tasks and their lifecycle state
//!
//! A task carries two independent axes of state: `status` (how far the
//! work is) and `acceptance` (whether the assignee has taken the task
//! on). The lifecycle crate owns the legal moves between them; this
//! module only defines the shapes.

use crate::ids::{ProjectId, TaskId, UserId};
use crate::user::User;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Work status of a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TaskStatus {
    /// Created but not picked up
    #[serde(rename = "Not Started")]
    NotStarted,
    /// Accepted and underway
    #[serde(rename = "In Progress")]
    InProgress,
    /// Done
    #[serde(rename = "Completed")]
    Completed,
}

impl Default for TaskStatus {
    fn default() -> Self {
        TaskStatus::NotStarted
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            TaskStatus::NotStarted => "Not Started",
            TaskStatus::InProgress => "In Progress",
            TaskStatus::Completed => "Completed",
        };
        write!(f, "{label}")
    }
}

/// Whether the assignee has taken the task on
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AcceptanceStatus {
    /// Awaiting the assignee's decision
    Pending,
    /// Assignee accepted the task
    Accepted,
    /// Assignee declined the task; terminal, no un-reject exists
    RejectedByTeamMember,
}

impl Default for AcceptanceStatus {
    fn default() -> Self {
        AcceptanceStatus::Pending
    }
}

impl std::fmt::Display for AcceptanceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            AcceptanceStatus::Pending => "Pending",
            AcceptanceStatus::Accepted => "Accepted",
            AcceptanceStatus::RejectedByTeamMember => "RejectedByTeamMember",
        };
        write!(f, "{label}")
    }
}

/// A task owned by a project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Task identifier
    #[serde(rename = "_id")]
    pub id: TaskId,
    /// Back-reference to the owning project; stamped during
    /// normalization when the wire omits it (embedded task lists do)
    #[serde(rename = "projectId", default)]
    pub project_id: ProjectId,
    /// Short title, required non-empty
    pub title: String,
    /// Free-form description
    #[serde(default)]
    pub description: String,
    /// Assigned member, if any
    #[serde(rename = "assignedTo", default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<User>,
    /// Due date, if any
    #[serde(rename = "dueDate", default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    /// Work status
    #[serde(default)]
    pub status: TaskStatus,
    /// Acceptance state
    #[serde(rename = "acceptanceStatus", default)]
    pub acceptance: AcceptanceStatus,
}

impl Task {
    /// Create a task in its initial state: `(NotStarted, Pending)`
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<TaskId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            project_id: ProjectId::default(),
            title: title.into(),
            description: String::new(),
            assigned_to: None,
            due_date: None,
            status: TaskStatus::NotStarted,
            acceptance: AcceptanceStatus::Pending,
        }
    }

    /// With a description
    #[inline]
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// With an assignee
    #[inline]
    #[must_use]
    pub fn assigned_to(mut self, user: User) -> Self {
        self.assigned_to = Some(user);
        self
    }

    /// With a due date
    #[inline]
    #[must_use]
    pub fn due(mut self, date: NaiveDate) -> Self {
        self.due_date = Some(date);
        self
    }

    /// Id of the assignee, if any
    #[inline]
    #[must_use]
    pub fn assignee_id(&self) -> Option<&UserId> {
        self.assigned_to.as_ref().map(|u| &u.id)
    }

    /// Check whether `user_id` is the assignee
    #[inline]
    #[must_use]
    pub fn is_assigned_to(&self, user_id: &UserId) -> bool {
        self.assignee_id() == Some(user_id)
    }

    /// True when the task has reached `Completed`
    #[inline]
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.status == TaskStatus::Completed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_task_starts_pending_and_not_started() {
        let task = Task::new("t1", "write docs");
        assert_eq!(task.status, TaskStatus::NotStarted);
        assert_eq!(task.acceptance, AcceptanceStatus::Pending);
        assert!(task.assigned_to.is_none());
    }

    #[test]
    fn status_wire_names_use_spaces() {
        assert_eq!(
            serde_json::to_string(&TaskStatus::NotStarted).unwrap(),
            "\"Not Started\""
        );
        assert_eq!(
            serde_json::to_string(&TaskStatus::InProgress).unwrap(),
            "\"In Progress\""
        );
    }

    #[test]
    fn acceptance_wire_names() {
        assert_eq!(
            serde_json::to_string(&AcceptanceStatus::RejectedByTeamMember).unwrap(),
            "\"RejectedByTeamMember\""
        );
    }

    #[test]
    fn task_deserializes_from_embedded_wire_shape() {
        let json = r#"{
            "_id": "t9",
            "title": "Ship the beta",
            "description": "cut a build",
            "assignedTo": { "_id": "u1", "name": "Asha", "email": "a@x.io", "role": "teamMember" },
            "status": "In Progress",
            "acceptanceStatus": "Accepted",
            "dueDate": "2025-11-30"
        }"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert!(task.project_id.is_empty());
        assert_eq!(task.status, TaskStatus::InProgress);
        assert_eq!(task.acceptance, AcceptanceStatus::Accepted);
        assert!(task.is_assigned_to(&"u1".into()));
        assert_eq!(
            task.due_date,
            Some(NaiveDate::from_ymd_opt(2025, 11, 30).unwrap())
        );
    }

    #[test]
    fn assignee_checks() {
        let user = User::new("u2", "Bea", "b@x.io");
        let task = Task::new("t1", "review").assigned_to(user);
        assert!(task.is_assigned_to(&"u2".into()));
        assert!(!task.is_assigned_to(&"u3".into()));
        assert!(!task.is_completed());
    }
}
