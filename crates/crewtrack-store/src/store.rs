//! The session and project store
//!
//! Owns the in-memory authoritative state and every path that reads or
//! mutates it. Views hold only transient drafts; on every successful
//! submission the draft is discarded in favor of a refreshed
//! authoritative snapshot.

use crewtrack_aggregate::{dashboard, DashboardStats};
use crewtrack_domain::{NotificationId, Project, ProjectId, Task, TaskId, User, UserId};
use crewtrack_lifecycle::{allowed_actions, check, AcceptanceDecision, DraftError, TaskAction};
use crewtrack_policy::{Capability, CapabilitySet, Policy};
use futures::future::{BoxFuture, FutureExt, Shared};
use parking_lot::{Mutex, RwLock};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::api::{
    AssignedTask, AuthUser, Credentials, Notification, ProjectApi, ProjectDraft, RegisterRequest,
    TaskDraft,
};
use crate::config::StoreConfig;
use crate::error::{ApiError, StoreError, ValidationError};
use crate::session::{CredentialSlot, SessionStore};

/// How the store restores consistency after a mutation
///
/// Local optimistic patching is explicitly forbidden as the default:
/// with many independently-rendering views over one source of truth it
/// has produced silently divergent (stale, duplicated) membership
/// before. The enum is the seam where an optimistic variant could be
/// added later.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SyncPolicy {
    /// Re-fetch the full authoritative collection after every mutation,
    /// trading one extra round trip per mutation for consistency
    #[default]
    RefreshOnMutation,
}

/// One in-flight refresh, shareable between concurrent callers
type SharedRefresh = Shared<BoxFuture<'static, Result<(), ApiError>>>;

/// What the views render from
///
/// A cheap clone of the store's current state; treat it as immutable
/// between store-issued updates.
#[derive(Debug, Clone)]
pub struct StoreSnapshot {
    /// The authenticated actor, if any
    pub actor: Option<User>,
    /// Authoritative project collection
    pub projects: Arc<[Project]>,
    /// Notification feed, newest first
    pub notifications: Arc<[Notification]>,
    /// Unread notification count
    pub unread_count: usize,
    /// True while a project refresh is in flight
    pub loading: bool,
    /// Error text from the most recent failure, if any
    pub error: Option<String>,
}

impl StoreSnapshot {
    /// Find a project by id
    #[inline]
    #[must_use]
    pub fn project(&self, id: &ProjectId) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == *id)
    }

    /// Dashboard aggregates over the visible projects
    #[inline]
    #[must_use]
    pub fn dashboard_stats(&self) -> DashboardStats {
        dashboard(&self.projects)
    }
}

struct ViewState {
    actor: Option<User>,
    projects: Arc<[Project]>,
    notifications: Arc<[Notification]>,
    unread_count: usize,
    loading: bool,
    error: Option<String>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            actor: None,
            projects: Vec::new().into(),
            notifications: Vec::new().into(),
            unread_count: 0,
            loading: false,
            error: None,
        }
    }
}

struct StoreInner {
    api: Arc<dyn ProjectApi>,
    sessions: Box<dyn SessionStore>,
    policy: Policy,
    sync_policy: SyncPolicy,
    credentials: CredentialSlot,
    state: RwLock<ViewState>,
    refresh: Mutex<Option<SharedRefresh>>,
    refresh_issued: AtomicU64,
    refresh_installed: AtomicU64,
}

/// The process-wide session and project store
///
/// Cloning shares the underlying state; hand clones to each view root
/// instead of reaching for ambient globals.
#[derive(Clone)]
pub struct TrackerStore {
    inner: Arc<StoreInner>,
}

impl TrackerStore {
    /// Create a store with its own credential slot
    #[must_use]
    pub fn new(api: Arc<dyn ProjectApi>, sessions: Box<dyn SessionStore>, config: StoreConfig) -> Self {
        Self::with_credentials(api, sessions, config, CredentialSlot::new())
    }

    /// Create a store sharing a credential slot with the HTTP collaborator
    #[must_use]
    pub fn with_credentials(
        api: Arc<dyn ProjectApi>,
        sessions: Box<dyn SessionStore>,
        config: StoreConfig,
        credentials: CredentialSlot,
    ) -> Self {
        Self {
            inner: Arc::new(StoreInner {
                api,
                sessions,
                policy: config.policy(),
                sync_policy: SyncPolicy::default(),
                credentials,
                state: RwLock::new(ViewState::default()),
                refresh: Mutex::new(None),
                refresh_issued: AtomicU64::new(0),
                refresh_installed: AtomicU64::new(0),
            }),
        }
    }

    /// The active authorization policy
    #[inline]
    #[must_use]
    pub fn policy(&self) -> Policy {
        self.inner.policy
    }

    /// Current state for rendering
    #[must_use]
    pub fn snapshot(&self) -> StoreSnapshot {
        let state = self.inner.state.read();
        StoreSnapshot {
            actor: state.actor.clone(),
            projects: Arc::clone(&state.projects),
            notifications: Arc::clone(&state.notifications),
            unread_count: state.unread_count,
            loading: state.loading,
            error: state.error.clone(),
        }
    }

    // ---- session lifecycle ----

    /// Restore a persisted session, if any, and prime the collections
    ///
    /// Never fails: malformed persisted data is cleared by the session
    /// store and startup proceeds unauthenticated.
    pub async fn initialize(&self) -> Option<User> {
        let session = self.inner.sessions.load()?;
        tracing::info!(actor = %session.user.id, "restored persisted session");
        let user = self.adopt_session(&session);
        self.refresh_all().await;
        Some(user)
    }

    /// Authenticate and install the returned session
    ///
    /// # Errors
    /// - `StoreError::AuthenticationFailed` with the collaborator's
    ///   message; session state is untouched on failure
    pub async fn login(&self, email: &str, password: &str) -> Result<User, StoreError> {
        let credentials = Credentials::new(email, password);
        let session = self
            .inner
            .api
            .login(&credentials)
            .await
            .map_err(|e| StoreError::AuthenticationFailed(e.message().to_string()))?;
        Ok(self.install_session(session).await)
    }

    /// Register a new account and install the returned session
    ///
    /// # Errors
    /// - `StoreError::AuthenticationFailed` with the collaborator's
    ///   message; session state is untouched on failure
    pub async fn register(&self, request: &RegisterRequest) -> Result<User, StoreError> {
        let session = self
            .inner
            .api
            .register(request)
            .await
            .map_err(|e| StoreError::AuthenticationFailed(e.message().to_string()))?;
        Ok(self.install_session(session).await)
    }

    /// Hard reset: clear actor, credential, persisted record, and every
    /// derived collection
    pub fn logout(&self) {
        tracing::info!("logging out, resetting store state");
        self.inner.credentials.clear();
        self.inner.sessions.clear();
        *self.inner.state.write() = ViewState::default();
    }

    async fn install_session(&self, session: AuthUser) -> User {
        if let Err(err) = self.inner.sessions.save(&session) {
            tracing::warn!(%err, "failed to persist session record");
        }
        let user = self.adopt_session(&session);
        self.refresh_all().await;
        user
    }

    fn adopt_session(&self, session: &AuthUser) -> User {
        self.inner.credentials.set(session.token.clone());
        let mut state = self.inner.state.write();
        state.actor = Some(session.user.clone());
        state.error = None;
        session.user.clone()
    }

    // ---- reads ----

    /// Refresh the authoritative project collection
    ///
    /// Idempotent under concurrency: callers arriving while a refresh is
    /// in flight await the same outcome, and exactly one request reaches
    /// the collaborator per window. On failure the prior snapshot is
    /// preserved and the error recorded for display.
    ///
    /// # Errors
    /// - `StoreError::Api` when the fetch fails
    pub async fn refresh_projects(&self) -> Result<(), StoreError> {
        let shared = self.inner.join_or_start_refresh();
        shared.await.map_err(StoreError::Api)
    }

    /// Refresh the notification feed
    ///
    /// # Errors
    /// - `StoreError::Api` when the fetch fails; the prior feed is kept
    pub async fn refresh_notifications(&self) -> Result<(), StoreError> {
        match self.inner.api.notifications().await {
            Ok(feed) => {
                let mut state = self.inner.state.write();
                if state.actor.is_some() {
                    state.notifications = feed.data.into();
                    state.unread_count = feed.unread_count;
                }
                Ok(())
            }
            Err(err) => {
                tracing::warn!(%err, "notification refresh failed");
                Err(StoreError::Api(err))
            }
        }
    }

    async fn refresh_all(&self) {
        let (projects, notifications) =
            futures::join!(self.refresh_projects(), self.refresh_notifications());
        if let Err(err) = projects {
            tracing::warn!(%err, "initial project refresh failed");
        }
        if let Err(err) = notifications {
            tracing::warn!(%err, "initial notification refresh failed");
        }
    }

    /// Fetch one project's detail, defensively re-checking view access
    ///
    /// # Errors
    /// - `StoreError::NotProjectMember` when the actor is outside the
    ///   roster and not an admin
    /// - `StoreError::Api` on collaborator failure
    pub async fn project_detail(&self, id: &ProjectId) -> Result<Project, StoreError> {
        let actor = self.require_actor()?;
        let mut project = self
            .inner
            .api
            .get_project(id)
            .await
            .map_err(|e| self.record_api_error(e))?;
        project.normalize();
        if !self.inner.policy.can_view(&actor, &project) {
            return Err(StoreError::NotProjectMember);
        }
        Ok(project)
    }

    /// Users who may be added to projects or assigned to tasks
    ///
    /// # Errors
    /// - `StoreError::AuthorizationDenied` for plain team members
    pub async fn assignable_users(&self) -> Result<Vec<User>, StoreError> {
        let actor = self.require_actor()?;
        if !(actor.role.is_admin() || actor.role.is_manager()) {
            return Err(StoreError::AuthorizationDenied {
                capability: Capability::ManageMembers,
            });
        }
        self.inner
            .api
            .assignable_users()
            .await
            .map_err(|e| self.record_api_error(e))
    }

    /// Tasks assigned to the current actor, with their project context
    ///
    /// # Errors
    /// - `StoreError::Api` on collaborator failure
    pub async fn my_tasks(&self) -> Result<Vec<AssignedTask>, StoreError> {
        self.require_actor()?;
        self.inner
            .api
            .my_tasks()
            .await
            .map_err(|e| self.record_api_error(e))
    }

    /// Capabilities the current actor holds on a project in the snapshot
    ///
    /// # Errors
    /// - `StoreError::UnknownProject` for an id outside the snapshot
    pub fn capabilities_on(&self, project_id: &ProjectId) -> Result<CapabilitySet, StoreError> {
        let actor = self.require_actor()?;
        let project = self.project_by_id(project_id)?;
        Ok(self.inner.policy.capabilities_for(&actor, &project))
    }

    /// Self-service actions the actor may take on a task right now
    ///
    /// # Errors
    /// - `StoreError::UnknownProject` / `StoreError::UnknownTask` for
    ///   ids outside the snapshot
    pub fn task_actions(
        &self,
        project_id: &ProjectId,
        task_id: &TaskId,
    ) -> Result<Vec<TaskAction>, StoreError> {
        let actor = self.require_actor()?;
        let project = self.project_by_id(project_id)?;
        let task = find_task(&project, task_id)?;
        Ok(allowed_actions(task, &actor.id))
    }

    // ---- project mutations ----

    /// Create a project
    ///
    /// # Errors
    /// - `StoreError::Validation` for an empty name or missing manager
    /// - `StoreError::AuthorizationDenied` for plain team members
    pub async fn create_project(&self, draft: &ProjectDraft) -> Result<(), StoreError> {
        let actor = self.require_actor()?;
        if draft.name.trim().is_empty() {
            return Err(ValidationError::EmptyProjectName.into());
        }
        if draft.project_manager.is_empty() {
            return Err(ValidationError::MissingManager.into());
        }
        if !(actor.role.is_admin() || actor.role.is_manager()) {
            return Err(StoreError::AuthorizationDenied {
                capability: Capability::ManageProject,
            });
        }
        self.inner
            .api
            .create_project(draft)
            .await
            .map_err(|e| self.record_api_error(e))?;
        self.resync().await
    }

    /// Update a project's fields
    ///
    /// # Errors
    /// - `StoreError::AuthorizationDenied` without `ManageProject`
    pub async fn update_project(
        &self,
        project_id: &ProjectId,
        draft: &ProjectDraft,
    ) -> Result<(), StoreError> {
        self.require_capability(project_id, Capability::ManageProject)?;
        if draft.name.trim().is_empty() {
            return Err(ValidationError::EmptyProjectName.into());
        }
        self.inner
            .api
            .update_project(project_id, draft)
            .await
            .map_err(|e| self.record_api_error(e))?;
        self.resync().await
    }

    /// Delete a project and, with it, its tasks
    ///
    /// # Errors
    /// - `StoreError::AuthorizationDenied` without `ManageProject`
    pub async fn delete_project(&self, project_id: &ProjectId) -> Result<(), StoreError> {
        self.require_capability(project_id, Capability::ManageProject)?;
        self.inner
            .api
            .delete_project(project_id)
            .await
            .map_err(|e| self.record_api_error(e))?;
        self.resync().await
    }

    // ---- membership mutations ----

    /// Add a user to the roster; the service ignores duplicates
    ///
    /// # Errors
    /// - `StoreError::AuthorizationDenied` without `ManageMembers`
    pub async fn add_member(
        &self,
        project_id: &ProjectId,
        user_id: &UserId,
    ) -> Result<(), StoreError> {
        self.require_capability(project_id, Capability::ManageMembers)?;
        self.inner
            .api
            .add_member(project_id, user_id)
            .await
            .map_err(|e| self.record_api_error(e))?;
        self.resync().await
    }

    /// Remove a user from the roster
    ///
    /// Tasks already assigned to the removed member keep their stale
    /// assignee reference; aggregation surfaces them as unassigned.
    ///
    /// # Errors
    /// - `StoreError::Validation` when targeting the manager
    /// - `StoreError::AuthorizationDenied` without `ManageMembers`
    pub async fn remove_member(
        &self,
        project_id: &ProjectId,
        user_id: &UserId,
    ) -> Result<(), StoreError> {
        let project = self.require_capability(project_id, Capability::ManageMembers)?;
        if project.manages(user_id) {
            return Err(ValidationError::CannotRemoveManager.into());
        }
        self.inner
            .api
            .remove_member(project_id, user_id)
            .await
            .map_err(|e| self.record_api_error(e))?;
        self.resync().await
    }

    // ---- task mutations ----

    /// Create a task in a project
    ///
    /// # Errors
    /// - `StoreError::Validation` for an empty title or non-member
    ///   assignee
    /// - `StoreError::AuthorizationDenied` without `CreateTask`
    pub async fn create_task(
        &self,
        project_id: &ProjectId,
        draft: &TaskDraft,
    ) -> Result<(), StoreError> {
        let project = self.require_capability(project_id, Capability::CreateTask)?;
        crewtrack_lifecycle::validate_draft(
            draft.title_or_empty(),
            draft.assigned_to.as_ref(),
            &project,
        )
        .map_err(ValidationError::Task)?;
        self.inner
            .api
            .create_task(project_id, draft)
            .await
            .map_err(|e| self.record_api_error(e))?;
        self.resync().await
    }

    /// Update a task's fields
    ///
    /// Allowed for holders of `ManageProject` and for the task's
    /// assignee (self-service edits such as completion).
    ///
    /// # Errors
    /// - `StoreError::AuthorizationDenied` for everyone else
    pub async fn update_task(
        &self,
        project_id: &ProjectId,
        task_id: &TaskId,
        draft: &TaskDraft,
    ) -> Result<(), StoreError> {
        let actor = self.require_actor()?;
        let project = self.project_by_id(project_id)?;
        let task = find_task(&project, task_id)?;

        let caps = self.inner.policy.capabilities_for(&actor, &project);
        if !caps.allows(Capability::ManageProject) && !task.is_assigned_to(&actor.id) {
            return Err(StoreError::AuthorizationDenied {
                capability: Capability::ManageProject,
            });
        }
        if let Some(title) = draft.title.as_deref() {
            if title.trim().is_empty() {
                return Err(ValidationError::Task(DraftError::EmptyTitle).into());
            }
        }
        if let Some(assignee) = &draft.assigned_to {
            if !project.is_member(assignee) {
                return Err(ValidationError::Task(DraftError::AssigneeNotMember {
                    assignee: assignee.clone(),
                })
                .into());
            }
        }
        self.inner
            .api
            .update_task(project_id, task_id, draft)
            .await
            .map_err(|e| self.record_api_error(e))?;
        self.resync().await
    }

    /// Delete a task; no state precondition
    ///
    /// # Errors
    /// - `StoreError::AuthorizationDenied` without `DeleteTask`
    pub async fn delete_task(
        &self,
        project_id: &ProjectId,
        task_id: &TaskId,
    ) -> Result<(), StoreError> {
        let project = self.require_capability(project_id, Capability::DeleteTask)?;
        find_task(&project, task_id)?;
        self.inner
            .api
            .delete_task(project_id, task_id)
            .await
            .map_err(|e| self.record_api_error(e))?;
        self.resync().await
    }

    /// Accept or reject a pending task as its assignee
    ///
    /// # Errors
    /// - `StoreError::InvalidTransition` when the actor is not the
    ///   assignee or acceptance is already resolved
    pub async fn decide_task(
        &self,
        project_id: &ProjectId,
        task_id: &TaskId,
        decision: AcceptanceDecision,
    ) -> Result<(), StoreError> {
        let actor = self.require_actor()?;
        let project = self.project_by_id(project_id)?;
        let task = find_task(&project, task_id)?;
        check(task, &actor.id, decision.action())?;
        self.inner
            .api
            .set_task_acceptance(project_id, task_id, decision)
            .await
            .map_err(|e| self.record_api_error(e))?;
        self.resync().await
    }

    /// Mark an accepted task completed, as its assignee
    ///
    /// # Errors
    /// - `StoreError::InvalidTransition` unless the task is accepted and
    ///   not yet completed
    pub async fn complete_task(
        &self,
        project_id: &ProjectId,
        task_id: &TaskId,
    ) -> Result<(), StoreError> {
        let actor = self.require_actor()?;
        let project = self.project_by_id(project_id)?;
        let task = find_task(&project, task_id)?;
        check(task, &actor.id, TaskAction::Complete)?;
        self.inner
            .api
            .update_task(project_id, task_id, &TaskDraft::completed())
            .await
            .map_err(|e| self.record_api_error(e))?;
        self.resync().await
    }

    // ---- notification mutations ----

    /// Mark one notification read
    ///
    /// # Errors
    /// - `StoreError::Api` on collaborator failure
    pub async fn mark_notification_read(&self, id: &NotificationId) -> Result<(), StoreError> {
        self.require_actor()?;
        self.inner
            .api
            .mark_notification_read(id)
            .await
            .map_err(|e| self.record_api_error(e))?;
        self.refresh_notifications().await
    }

    /// Mark every notification read
    ///
    /// # Errors
    /// - `StoreError::Api` on collaborator failure
    pub async fn mark_all_notifications_read(&self) -> Result<(), StoreError> {
        self.require_actor()?;
        self.inner
            .api
            .mark_all_notifications_read()
            .await
            .map_err(|e| self.record_api_error(e))?;
        self.refresh_notifications().await
    }

    // ---- internals ----

    async fn resync(&self) -> Result<(), StoreError> {
        match self.inner.sync_policy {
            SyncPolicy::RefreshOnMutation => self.refresh_projects().await,
        }
    }

    fn require_actor(&self) -> Result<User, StoreError> {
        self.inner
            .state
            .read()
            .actor
            .clone()
            .ok_or(StoreError::NotAuthenticated)
    }

    fn project_by_id(&self, id: &ProjectId) -> Result<Project, StoreError> {
        self.inner
            .state
            .read()
            .projects
            .iter()
            .find(|p| p.id == *id)
            .cloned()
            .ok_or_else(|| StoreError::UnknownProject(id.clone()))
    }

    /// Capability preflight; returns the project for further checks
    fn require_capability(
        &self,
        project_id: &ProjectId,
        capability: Capability,
    ) -> Result<Project, StoreError> {
        let actor = self.require_actor()?;
        let project = self.project_by_id(project_id)?;
        if !self
            .inner
            .policy
            .capabilities_for(&actor, &project)
            .allows(capability)
        {
            return Err(StoreError::AuthorizationDenied { capability });
        }
        Ok(project)
    }

    fn record_api_error(&self, err: ApiError) -> StoreError {
        tracing::error!(%err, "collaborator request failed");
        self.inner.state.write().error = Some(err.message().to_string());
        StoreError::Api(err)
    }
}

impl std::fmt::Debug for TrackerStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.inner.state.read();
        f.debug_struct("TrackerStore")
            .field("actor", &state.actor.as_ref().map(|a| a.id.clone()))
            .field("projects", &state.projects.len())
            .field("loading", &state.loading)
            .finish_non_exhaustive()
    }
}

impl StoreInner {
    /// Join the in-flight refresh or start a new one
    fn join_or_start_refresh(self: &Arc<Self>) -> SharedRefresh {
        let mut slot = self.refresh.lock();
        if let Some(inflight) = slot.as_ref() {
            return inflight.clone();
        }
        let ticket = self.refresh_issued.fetch_add(1, Ordering::SeqCst) + 1;
        let inner = Arc::clone(self);
        let shared = async move { inner.run_refresh(ticket).await }.boxed().shared();
        *slot = Some(shared.clone());
        shared
    }

    async fn run_refresh(self: Arc<Self>, ticket: u64) -> Result<(), ApiError> {
        self.state.write().loading = true;
        tracing::debug!(ticket, "refreshing project collection");

        let outcome = self.api.list_projects().await;

        // The window closes once the request resolves; later callers
        // start a new refresh with a newer ticket.
        *self.refresh.lock() = None;

        let mut state = self.state.write();
        state.loading = false;
        match outcome {
            Ok(mut projects) => {
                for project in &mut projects {
                    project.normalize();
                }
                let installed = self.refresh_installed.load(Ordering::SeqCst);
                if ticket <= installed {
                    tracing::warn!(ticket, installed, "discarding stale project snapshot");
                    return Ok(());
                }
                if state.actor.is_none() {
                    tracing::debug!(ticket, "dropping refresh that outlived the session");
                    return Ok(());
                }
                self.refresh_installed.store(ticket, Ordering::SeqCst);
                state.projects = projects.into();
                state.error = None;
                tracing::info!(ticket, count = state.projects.len(), "installed project snapshot");
                Ok(())
            }
            Err(err) => {
                tracing::error!(ticket, %err, "project refresh failed");
                state.error = Some(err.message().to_string());
                Err(err)
            }
        }
    }
}

fn find_task<'a>(project: &'a Project, task_id: &TaskId) -> Result<&'a Task, StoreError> {
    project
        .task(task_id)
        .ok_or_else(|| StoreError::UnknownTask(task_id.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockProjectApi;
    use crate::session::FileSessionStore;
    use crewtrack_domain::UserRole;

    fn store_with(api: MockProjectApi) -> (TrackerStore, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let sessions = Box::new(FileSessionStore::new(dir.path().join("session.json")));
        let store = TrackerStore::new(Arc::new(api), sessions, StoreConfig::default());
        (store, dir)
    }

    fn auth_user() -> AuthUser {
        AuthUser {
            user: User::new("u1", "Asha", "asha@example.com").with_role(UserRole::Admin),
            token: "jwt".to_string(),
        }
    }

    #[tokio::test]
    async fn login_installs_actor_and_refreshes() {
        let mut api = MockProjectApi::new();
        api.expect_login().times(1).returning(|_| Ok(auth_user()));
        api.expect_list_projects().times(1).returning(|| Ok(vec![]));
        api.expect_notifications()
            .times(1)
            .returning(|| Ok(crate::api::NotificationFeed::default()));

        let (store, _dir) = store_with(api);
        let user = store.login("asha@example.com", "pw").await.unwrap();
        assert_eq!(user.id, "u1".into());

        let snapshot = store.snapshot();
        assert!(snapshot.actor.is_some());
        assert!(snapshot.projects.is_empty());
        assert!(snapshot.error.is_none());
    }

    #[tokio::test]
    async fn failed_login_leaves_session_untouched() {
        let mut api = MockProjectApi::new();
        api.expect_login().times(1).returning(|_| {
            Err(ApiError::Status {
                status: 401,
                message: "Invalid credentials".to_string(),
            })
        });

        let (store, _dir) = store_with(api);
        let err = store.login("asha@example.com", "wrong").await.unwrap_err();
        assert_eq!(
            err,
            StoreError::AuthenticationFailed("Invalid credentials".to_string())
        );
        assert!(store.snapshot().actor.is_none());
    }

    #[tokio::test]
    async fn refresh_failure_preserves_prior_snapshot() {
        let mut api = MockProjectApi::new();
        api.expect_login().returning(|_| Ok(auth_user()));
        api.expect_notifications()
            .returning(|| Ok(crate::api::NotificationFeed::default()));

        let mut calls = 0;
        api.expect_list_projects().times(2).returning_st(move || {
            calls += 1;
            if calls == 1 {
                Ok(vec![Project::new(
                    "p1",
                    "Atlas",
                    User::new("pm", "M", "m@x.io").with_role(UserRole::ProjectManager),
                )])
            } else {
                Err(ApiError::Transport("connection reset".to_string()))
            }
        });

        let (store, _dir) = store_with(api);
        store.login("a", "b").await.unwrap();
        assert_eq!(store.snapshot().projects.len(), 1);

        let err = store.refresh_projects().await.unwrap_err();
        assert!(matches!(err, StoreError::Api(ApiError::Transport(_))));

        let snapshot = store.snapshot();
        assert_eq!(snapshot.projects.len(), 1);
        assert_eq!(snapshot.error.as_deref(), Some("connection reset"));
    }

    #[tokio::test]
    async fn logout_is_a_hard_reset() {
        let mut api = MockProjectApi::new();
        api.expect_login().returning(|_| Ok(auth_user()));
        api.expect_notifications()
            .returning(|| Ok(crate::api::NotificationFeed::default()));
        api.expect_list_projects().returning(|| {
            Ok(vec![Project::new(
                "p1",
                "Atlas",
                User::new("pm", "M", "m@x.io").with_role(UserRole::ProjectManager),
            )])
        });

        let (store, _dir) = store_with(api);
        store.login("a", "b").await.unwrap();
        assert!(!store.snapshot().projects.is_empty());

        store.logout();
        let snapshot = store.snapshot();
        assert!(snapshot.actor.is_none());
        assert!(snapshot.projects.is_empty());
        assert!(snapshot.notifications.is_empty());
        assert_eq!(snapshot.unread_count, 0);
        assert!(snapshot.error.is_none());
    }

    #[tokio::test]
    async fn intents_require_an_actor() {
        let api = MockProjectApi::new();
        let (store, _dir) = store_with(api);
        let err = store
            .delete_project(&"p1".into())
            .await
            .unwrap_err();
        assert_eq!(err, StoreError::NotAuthenticated);
    }

    #[tokio::test]
    async fn unknown_project_is_reported() {
        let mut api = MockProjectApi::new();
        api.expect_login().returning(|_| Ok(auth_user()));
        api.expect_list_projects().returning(|| Ok(vec![]));
        api.expect_notifications()
            .returning(|| Ok(crate::api::NotificationFeed::default()));

        let (store, _dir) = store_with(api);
        store.login("a", "b").await.unwrap();
        let err = store.capabilities_on(&"ghost".into()).unwrap_err();
        assert_eq!(err, StoreError::UnknownProject("ghost".into()));
    }

    #[tokio::test]
    async fn create_project_validates_before_any_network_call() {
        let mut api = MockProjectApi::new();
        api.expect_login().returning(|_| Ok(auth_user()));
        api.expect_list_projects().returning(|| Ok(vec![]));
        api.expect_notifications()
            .returning(|| Ok(crate::api::NotificationFeed::default()));
        // No create_project expectation: the call must never happen.

        let (store, _dir) = store_with(api);
        store.login("a", "b").await.unwrap();

        let err = store
            .create_project(&ProjectDraft::new("   ", "pm"))
            .await
            .unwrap_err();
        assert_eq!(err, StoreError::Validation(ValidationError::EmptyProjectName));

        let err = store
            .create_project(&ProjectDraft::new("Atlas", ""))
            .await
            .unwrap_err();
        assert_eq!(err, StoreError::Validation(ValidationError::MissingManager));
    }
}
