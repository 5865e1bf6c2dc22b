//! In-process stand-in for the tracker service
//!
//! Implements [`ProjectApi`] against in-memory state with the same
//! observable semantics as the real service: membership de-duplication
//! on add, acceptance advancing a not-started task to in-progress, and
//! member removal that leaves existing task assignments untouched. Every
//! endpoint bumps a named call counter so tests can assert on exactly
//! how many requests an operation produced.

use async_trait::async_trait;
use dashmap::DashMap;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crewtrack_domain::{
    AcceptanceStatus, NotificationId, Project, ProjectId, Task, TaskId, TaskStatus, User, UserId,
};
use crewtrack_lifecycle::AcceptanceDecision;
use crewtrack_store::{
    ApiError, AssignedTask, AuthUser, Credentials, Notification, NotificationFeed, ProjectApi,
    ProjectDraft, RegisterRequest, TaskDraft,
};

fn not_found(what: &str, id: &str) -> ApiError {
    ApiError::Status {
        status: 404,
        message: format!("{what} not found with id: {id}"),
    }
}

/// In-memory [`ProjectApi`] double
#[derive(Default)]
pub struct InMemoryApi {
    users: RwLock<Vec<(User, String)>>,
    projects: RwLock<Vec<Project>>,
    notifications: RwLock<Vec<Notification>>,
    current_user: RwLock<Option<User>>,
    next_id: AtomicUsize,
    calls: DashMap<&'static str, usize>,
    list_delay: RwLock<Option<Duration>>,
    failures: DashMap<&'static str, ApiError>,
}

impl InMemoryApi {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // ---- seeding and instrumentation ----

    pub fn seed_user(&self, user: User, password: &str) {
        self.users.write().push((user, password.to_string()));
    }

    pub fn seed_project(&self, mut project: Project) {
        project.normalize();
        self.projects.write().push(project);
    }

    pub fn push_notification(&self, notification: Notification) {
        self.notifications.write().push(notification);
    }

    /// Pretend `user` already authenticated, without a login round trip
    pub fn set_actor(&self, user: User) {
        *self.current_user.write() = Some(user);
    }

    /// Delay every `list_projects` response, to widen in-flight windows
    pub fn set_list_delay(&self, delay: Duration) {
        *self.list_delay.write() = Some(delay);
    }

    /// Fail the next call to `endpoint` with `error`
    pub fn fail_next(&self, endpoint: &'static str, error: ApiError) {
        self.failures.insert(endpoint, error);
    }

    /// How many times `endpoint` has been called
    #[must_use]
    pub fn calls(&self, endpoint: &str) -> usize {
        self.calls.get(endpoint).map(|c| *c).unwrap_or(0)
    }

    /// The projects as a fresh fetch would return them
    #[must_use]
    pub fn fresh_projects(&self) -> Vec<Project> {
        let mut projects = self.projects.read().clone();
        for project in &mut projects {
            project.normalize();
        }
        projects
    }

    // ---- internals ----

    fn record(&self, endpoint: &'static str) -> Result<(), ApiError> {
        *self.calls.entry(endpoint).or_insert(0) += 1;
        if let Some((_, error)) = self.failures.remove(endpoint) {
            return Err(error);
        }
        Ok(())
    }

    fn fresh_id(&self, prefix: &str) -> String {
        let n = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        format!("{prefix}{n:04}")
    }

    fn actor(&self) -> Result<User, ApiError> {
        self.current_user.read().clone().ok_or(ApiError::Status {
            status: 401,
            message: "Unauthorized".to_string(),
        })
    }

    fn user_by_id(&self, id: &UserId) -> Result<User, ApiError> {
        self.users
            .read()
            .iter()
            .map(|(user, _)| user)
            .find(|user| user.id == *id)
            .cloned()
            .ok_or_else(|| not_found("User", id.as_str()))
    }

    fn with_project<T>(
        &self,
        id: &ProjectId,
        f: impl FnOnce(&mut Project) -> Result<T, ApiError>,
    ) -> Result<T, ApiError> {
        let mut projects = self.projects.write();
        let project = projects
            .iter_mut()
            .find(|p| p.id == *id)
            .ok_or_else(|| not_found("Project", id.as_str()))?;
        let result = f(project)?;
        project.normalize();
        Ok(result)
    }
}

#[async_trait]
impl ProjectApi for InMemoryApi {
    async fn login(&self, credentials: &Credentials) -> Result<AuthUser, ApiError> {
        self.record("login")?;
        let matched = self
            .users
            .read()
            .iter()
            .find(|(user, password)| {
                user.email == credentials.email && *password == credentials.password
            })
            .map(|(user, _)| user.clone());
        let user = matched.ok_or(ApiError::Status {
            status: 401,
            message: "Invalid email or password".to_string(),
        })?;
        *self.current_user.write() = Some(user.clone());
        let token = format!("token-{}", user.id);
        Ok(AuthUser { user, token })
    }

    async fn register(&self, request: &RegisterRequest) -> Result<AuthUser, ApiError> {
        self.record("register")?;
        if self
            .users
            .read()
            .iter()
            .any(|(user, _)| user.email == request.email)
        {
            return Err(ApiError::Status {
                status: 400,
                message: "Email already in use".to_string(),
            });
        }
        let mut user = User::new(self.fresh_id("u"), request.name.clone(), request.email.clone())
            .with_role(request.role);
        if let Some(avatar) = &request.avatar_url {
            user = user.with_avatar(avatar.clone());
        }
        self.users
            .write()
            .push((user.clone(), request.password.clone()));
        *self.current_user.write() = Some(user.clone());
        let token = format!("token-{}", user.id);
        Ok(AuthUser { user, token })
    }

    async fn me(&self) -> Result<User, ApiError> {
        self.record("me")?;
        self.actor()
    }

    async fn list_projects(&self) -> Result<Vec<Project>, ApiError> {
        self.record("list_projects")?;
        let delay = *self.list_delay.read();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.actor()?;
        Ok(self.fresh_projects())
    }

    async fn get_project(&self, id: &ProjectId) -> Result<Project, ApiError> {
        self.record("get_project")?;
        self.projects
            .read()
            .iter()
            .find(|p| p.id == *id)
            .cloned()
            .ok_or_else(|| not_found("Project", id.as_str()))
    }

    async fn assignable_users(&self) -> Result<Vec<User>, ApiError> {
        self.record("assignable_users")?;
        let mut users: Vec<User> = self
            .users
            .read()
            .iter()
            .map(|(user, _)| user.clone())
            .collect();
        users.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(users)
    }

    async fn create_project(&self, draft: &ProjectDraft) -> Result<Project, ApiError> {
        self.record("create_project")?;
        let manager = self.user_by_id(&draft.project_manager)?;
        let mut project = Project::new(self.fresh_id("p"), draft.name.clone(), manager);
        project.description = draft.description.clone();
        if let Some(status) = draft.status {
            project.status = status;
        }
        project.start_date = draft.start_date;
        project.end_date = draft.end_date;
        project.client_name = draft.client_name.clone();
        project.client_email = draft.client_email.clone();
        project.client_company = draft.client_company.clone();
        for member_id in &draft.team_members {
            let member = self.user_by_id(member_id)?;
            project.team_members.push(member);
        }
        project.normalize();
        self.projects.write().push(project.clone());
        Ok(project)
    }

    async fn update_project(
        &self,
        id: &ProjectId,
        draft: &ProjectDraft,
    ) -> Result<Project, ApiError> {
        self.record("update_project")?;
        let manager = if draft.project_manager.is_empty() {
            None
        } else {
            Some(self.user_by_id(&draft.project_manager)?)
        };
        let members: Result<Vec<User>, ApiError> = draft
            .team_members
            .iter()
            .map(|id| self.user_by_id(id))
            .collect();
        let members = members?;
        self.with_project(id, |project| {
            project.name = draft.name.clone();
            project.description = draft.description.clone();
            if let Some(status) = draft.status {
                project.status = status;
            }
            if let Some(manager) = manager {
                project.project_manager = manager;
            }
            if !members.is_empty() {
                project.team_members = members;
            }
            project.start_date = draft.start_date;
            project.end_date = draft.end_date;
            Ok(project.clone())
        })
    }

    async fn delete_project(&self, id: &ProjectId) -> Result<(), ApiError> {
        self.record("delete_project")?;
        let mut projects = self.projects.write();
        let before = projects.len();
        projects.retain(|p| p.id != *id);
        if projects.len() == before {
            return Err(not_found("Project", id.as_str()));
        }
        Ok(())
    }

    async fn add_member(&self, project: &ProjectId, user: &UserId) -> Result<Project, ApiError> {
        self.record("add_member")?;
        let member = self.user_by_id(user)?;
        self.with_project(project, |project| {
            // Adding an existing member is a no-op, not an error.
            if !project.is_member(&member.id) {
                project.team_members.push(member);
            }
            Ok(project.clone())
        })
    }

    async fn remove_member(
        &self,
        project: &ProjectId,
        user: &UserId,
    ) -> Result<Project, ApiError> {
        self.record("remove_member")?;
        self.with_project(project, |project| {
            project.team_members.retain(|m| m.id != *user);
            // Existing assignments keep the departed assignee; the
            // aggregation layer surfaces those tasks as unassigned.
            Ok(project.clone())
        })
    }

    async fn create_task(&self, project: &ProjectId, draft: &TaskDraft) -> Result<Task, ApiError> {
        self.record("create_task")?;
        let assignee = match &draft.assigned_to {
            Some(id) => Some(self.user_by_id(id)?),
            None => None,
        };
        self.with_project(project, |project| {
            let mut task = Task::new(
                self.fresh_id("t"),
                draft.title.clone().unwrap_or_default(),
            );
            if let Some(description) = &draft.description {
                task.description = description.clone();
            }
            task.assigned_to = assignee;
            task.due_date = draft.due_date;
            project.tasks.push(task.clone());
            Ok(task)
        })
    }

    async fn update_task(
        &self,
        project: &ProjectId,
        task: &TaskId,
        draft: &TaskDraft,
    ) -> Result<Task, ApiError> {
        self.record("update_task")?;
        let assignee = match &draft.assigned_to {
            Some(id) => Some(self.user_by_id(id)?),
            None => None,
        };
        self.with_project(project, |project| {
            let found = project
                .tasks
                .iter_mut()
                .find(|t| t.id == *task)
                .ok_or_else(|| not_found("Task", task.as_str()))?;
            if let Some(title) = &draft.title {
                found.title = title.clone();
            }
            if let Some(description) = &draft.description {
                found.description = description.clone();
            }
            if let Some(assignee) = assignee {
                found.assigned_to = Some(assignee);
            }
            if let Some(due) = draft.due_date {
                found.due_date = Some(due);
            }
            if let Some(status) = draft.status {
                found.status = status;
            }
            Ok(found.clone())
        })
    }

    async fn delete_task(&self, project: &ProjectId, task: &TaskId) -> Result<(), ApiError> {
        self.record("delete_task")?;
        self.with_project(project, |project| {
            let before = project.tasks.len();
            project.tasks.retain(|t| t.id != *task);
            if project.tasks.len() == before {
                return Err(not_found("Task", task.as_str()));
            }
            Ok(())
        })
    }

    async fn set_task_acceptance(
        &self,
        project: &ProjectId,
        task: &TaskId,
        decision: AcceptanceDecision,
    ) -> Result<Task, ApiError> {
        self.record("set_task_acceptance")?;
        let actor = self.actor()?;
        self.with_project(project, |project| {
            let found = project
                .tasks
                .iter_mut()
                .find(|t| t.id == *task)
                .ok_or_else(|| not_found("Task", task.as_str()))?;
            if !found.is_assigned_to(&actor.id) {
                return Err(ApiError::Status {
                    status: 403,
                    message: "You are not assigned to this task.".to_string(),
                });
            }
            found.acceptance = decision.resolved_status();
            if found.acceptance == AcceptanceStatus::Accepted
                && found.status == TaskStatus::NotStarted
            {
                found.status = TaskStatus::InProgress;
            }
            Ok(found.clone())
        })
    }

    async fn my_tasks(&self) -> Result<Vec<AssignedTask>, ApiError> {
        self.record("my_tasks")?;
        let actor = self.actor()?;
        let projects = self.fresh_projects();
        let rows = projects
            .iter()
            .flat_map(|project| {
                project
                    .tasks
                    .iter()
                    .filter(|task| task.is_assigned_to(&actor.id))
                    .map(|task| AssignedTask {
                        task: task.clone(),
                        project_name: project.name.clone(),
                    })
                    .collect::<Vec<_>>()
            })
            .collect();
        Ok(rows)
    }

    async fn notifications(&self) -> Result<NotificationFeed, ApiError> {
        self.record("notifications")?;
        self.actor()?;
        let data = self.notifications.read().clone();
        let unread_count = data.iter().filter(|n| !n.is_read).count();
        Ok(NotificationFeed { data, unread_count })
    }

    async fn mark_notification_read(&self, id: &NotificationId) -> Result<(), ApiError> {
        self.record("mark_notification_read")?;
        let mut notifications = self.notifications.write();
        let found = notifications
            .iter_mut()
            .find(|n| n.id == *id)
            .ok_or_else(|| not_found("Notification", id.as_str()))?;
        found.is_read = true;
        Ok(())
    }

    async fn mark_all_notifications_read(&self) -> Result<(), ApiError> {
        self.record("mark_all_notifications_read")?;
        for notification in self.notifications.write().iter_mut() {
            notification.is_read = true;
        }
        Ok(())
    }
}
