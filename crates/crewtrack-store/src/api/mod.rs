//! The external API collaborator
//!
//! Everything the tracker service exposes, as one object-safe async
//! trait. The store talks only to this trait; the live HTTP
//! implementation lives in [`http`], and tests substitute an in-memory
//! double.

pub mod http;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use crewtrack_domain::{
    NotificationId, Project, ProjectId, ProjectStatus, Task, TaskId, TaskStatus, User, UserId,
    UserRole,
};
use crewtrack_lifecycle::AcceptanceDecision;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Login payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    /// Login email
    pub email: String,
    /// Plaintext password, sent only over the authenticated channel
    pub password: String,
}

impl Credentials {
    /// Build a credentials payload
    #[inline]
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

/// Registration payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    /// Display name
    pub name: String,
    /// Login email
    pub email: String,
    /// Plaintext password
    pub password: String,
    /// Requested global role
    pub role: UserRole,
    /// Optional avatar URL
    #[serde(rename = "avatar", default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

/// The authenticated actor plus their bearer credential
///
/// Also the exact shape persisted to client-local storage: one record,
/// actor fields and token together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    /// The actor's user record
    #[serde(flatten)]
    pub user: User,
    /// Bearer token attached to every subsequent request
    pub token: String,
}

/// Create/update payload for a project
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectDraft {
    /// Project name, required non-empty
    pub name: String,
    /// Free-form description
    #[serde(default)]
    pub description: String,
    /// Status, server default when omitted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ProjectStatus>,
    /// Id of the managing user, required on creation
    #[serde(rename = "projectManager")]
    pub project_manager: UserId,
    /// Member ids; the server de-duplicates and inserts the manager
    #[serde(rename = "teamMembers", default)]
    pub team_members: Vec<UserId>,
    /// Start date
    #[serde(rename = "startDate", default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    /// End date
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
}

impl ProjectDraft {
    /// Draft with a name and manager, everything else defaulted
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>, manager: impl Into<UserId>) -> Self {
        Self {
            name: name.into(),
            project_manager: manager.into(),
            ..Self::default()
        }
    }

    /// With a description
    #[inline]
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// With a status
    #[inline]
    #[must_use]
    pub fn with_status(mut self, status: ProjectStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// With an extra member id
    #[inline]
    #[must_use]
    pub fn with_member(mut self, member: impl Into<UserId>) -> Self {
        self.team_members.push(member.into());
        self
    }
}

/// Create/update payload for a task
///
/// Update semantics are partial: only present fields change.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskDraft {
    /// Task title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Assignee id
    #[serde(rename = "assignedTo", default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<UserId>,
    /// Due date
    #[serde(rename = "dueDate", default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    /// Work status
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
}

impl TaskDraft {
    /// Draft for a new task with the given title
    #[inline]
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    /// Update draft that only marks the task completed
    #[inline]
    #[must_use]
    pub fn completed() -> Self {
        Self {
            status: Some(TaskStatus::Completed),
            ..Self::default()
        }
    }

    /// With a description
    #[inline]
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// With an assignee
    #[inline]
    #[must_use]
    pub fn assigned_to(mut self, user: impl Into<UserId>) -> Self {
        self.assigned_to = Some(user.into());
        self
    }

    /// With a due date
    #[inline]
    #[must_use]
    pub fn due(mut self, date: NaiveDate) -> Self {
        self.due_date = Some(date);
        self
    }

    /// The draft's title, trimmed, or empty when absent
    #[inline]
    #[must_use]
    pub fn title_or_empty(&self) -> &str {
        self.title.as_deref().map(str::trim).unwrap_or_default()
    }
}

/// A task row from the assignee's "my tasks" view, with its project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignedTask {
    /// The task itself; its `project_id` back-reference is populated
    #[serde(flatten)]
    pub task: Task,
    /// Name of the owning project, for rendering
    #[serde(rename = "projectName", default)]
    pub project_name: String,
}

/// One notification for the current actor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Notification identifier
    #[serde(rename = "_id")]
    pub id: NotificationId,
    /// Sending user, absent for system notifications
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender: Option<User>,
    /// Kind discriminator as the server names it
    #[serde(rename = "type", default)]
    pub kind: String,
    /// Human-readable message
    pub message: String,
    /// In-app link target
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    /// Title of the related task, when the notification concerns one
    #[serde(rename = "relatedTaskTitle", default, skip_serializing_if = "Option::is_none")]
    pub related_task_title: Option<String>,
    /// Whether the actor has read it
    #[serde(rename = "isRead", default)]
    pub is_read: bool,
    /// Server-side creation time
    #[serde(rename = "createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<NaiveDateTime>,
}

/// The notification feed with its unread counter
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationFeed {
    /// Notifications, newest first
    #[serde(default)]
    pub data: Vec<Notification>,
    /// How many are unread
    #[serde(rename = "unreadCount", default)]
    pub unread_count: usize,
}

/// The tracker service's REST surface
///
/// Object-safe so the store can hold `Arc<dyn ProjectApi>` and tests can
/// substitute a double. Every method maps to exactly one request; the
/// store owns retries-by-user and refresh discipline.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProjectApi: Send + Sync {
    /// `POST /auth/login`
    async fn login(&self, credentials: &Credentials) -> Result<AuthUser, ApiError>;

    /// `POST /auth/register`
    async fn register(&self, request: &RegisterRequest) -> Result<AuthUser, ApiError>;

    /// `GET /auth/me`
    async fn me(&self) -> Result<User, ApiError>;

    /// `GET /projects` - every project visible to the actor
    async fn list_projects(&self) -> Result<Vec<Project>, ApiError>;

    /// `GET /projects/{id}`
    async fn get_project(&self, id: &ProjectId) -> Result<Project, ApiError>;

    /// `GET /projects/users` - users assignable to projects and tasks
    async fn assignable_users(&self) -> Result<Vec<User>, ApiError>;

    /// `POST /projects`
    async fn create_project(&self, draft: &ProjectDraft) -> Result<Project, ApiError>;

    /// `PUT /projects/{id}`
    async fn update_project(&self, id: &ProjectId, draft: &ProjectDraft)
        -> Result<Project, ApiError>;

    /// `DELETE /projects/{id}`
    async fn delete_project(&self, id: &ProjectId) -> Result<(), ApiError>;

    /// `POST /projects/{id}/members`
    async fn add_member(&self, project: &ProjectId, user: &UserId) -> Result<Project, ApiError>;

    /// `DELETE /projects/{id}/members/{userId}`
    async fn remove_member(&self, project: &ProjectId, user: &UserId)
        -> Result<Project, ApiError>;

    /// `POST /projects/{id}/tasks`
    async fn create_task(&self, project: &ProjectId, draft: &TaskDraft) -> Result<Task, ApiError>;

    /// `PUT /projects/{id}/tasks/{taskId}`
    async fn update_task(
        &self,
        project: &ProjectId,
        task: &TaskId,
        draft: &TaskDraft,
    ) -> Result<Task, ApiError>;

    /// `DELETE /projects/{id}/tasks/{taskId}`
    async fn delete_task(&self, project: &ProjectId, task: &TaskId) -> Result<(), ApiError>;

    /// `PUT /projects/{id}/tasks/{taskId}/accept` with `{acceptanceStatus}`
    async fn set_task_acceptance(
        &self,
        project: &ProjectId,
        task: &TaskId,
        decision: AcceptanceDecision,
    ) -> Result<Task, ApiError>;

    /// `GET /tasks/mytasks` - tasks assigned to the actor, with project
    async fn my_tasks(&self) -> Result<Vec<AssignedTask>, ApiError>;

    /// `GET /notifications`
    async fn notifications(&self) -> Result<NotificationFeed, ApiError>;

    /// `PUT /notifications/{id}/read`
    async fn mark_notification_read(&self, id: &NotificationId) -> Result<(), ApiError>;

    /// `PUT /notifications/readall`
    async fn mark_all_notifications_read(&self) -> Result<(), ApiError>;
}
