//! End-to-end store flows against the in-memory service double

use crewtrack_aggregate::{project_progress, team_breakdown};
use crewtrack_domain::{AcceptanceStatus, TaskStatus, UserId};
use crewtrack_lifecycle::{AcceptanceDecision, TransitionError};
use crewtrack_policy::{Capability, ManagerScope};
use crewtrack_store::{
    FileSessionStore, ProjectDraft, StoreConfig, StoreError, TaskDraft, TrackerStore,
};
use crewtrack_test_utils::{notification, seeded_api, InMemoryApi, FIXTURE_PASSWORD};
use pretty_assertions::assert_eq;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

fn new_store(api: Arc<InMemoryApi>) -> (TrackerStore, TempDir) {
    new_store_with(api, StoreConfig::default())
}

fn new_store_with(api: Arc<InMemoryApi>, config: StoreConfig) -> (TrackerStore, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let sessions = Box::new(FileSessionStore::new(dir.path().join("session.json")));
    (TrackerStore::new(api, sessions, config), dir)
}

#[tokio::test]
async fn login_installs_a_normalized_snapshot() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    let api = Arc::new(seeded_api());
    let (store, _dir) = new_store(api);

    store
        .login("mahesh@example.com", FIXTURE_PASSWORD)
        .await
        .unwrap();

    let snapshot = store.snapshot();
    assert_eq!(snapshot.projects.len(), 1);
    let project = &snapshot.projects[0];
    // Manager plus two members, no duplicates.
    assert_eq!(project.roster().len(), 3);
    assert_eq!(project.tasks.len(), 2);
    // Embedded tasks carry their back-reference after normalization.
    assert!(project.tasks.iter().all(|t| t.project_id == project.id));
}

#[tokio::test]
async fn concurrent_refreshes_collapse_into_one_request() {
    let api = Arc::new(seeded_api());
    let (store, _dir) = new_store(Arc::clone(&api));
    store
        .login("mahesh@example.com", FIXTURE_PASSWORD)
        .await
        .unwrap();
    let after_login = api.calls("list_projects");

    api.set_list_delay(Duration::from_millis(50));
    let (a, b) = tokio::join!(store.refresh_projects(), store.refresh_projects());
    a.unwrap();
    b.unwrap();

    // Both callers shared one in-flight request.
    assert_eq!(api.calls("list_projects"), after_login + 1);
}

#[tokio::test]
async fn mutation_leaves_snapshot_equal_to_a_fresh_fetch() {
    let api = Arc::new(seeded_api());
    let (store, _dir) = new_store(Arc::clone(&api));
    store
        .login("mahesh@example.com", FIXTURE_PASSWORD)
        .await
        .unwrap();

    let draft = TaskDraft::new("Write release notes").assigned_to("u2");
    store.create_task(&"p1".into(), &draft).await.unwrap();

    let snapshot = store.snapshot();
    assert_eq!(snapshot.projects.to_vec(), api.fresh_projects());
    assert_eq!(snapshot.projects[0].tasks.len(), 3);
}

#[tokio::test]
async fn assignee_accepts_then_completes() {
    let api = Arc::new(seeded_api());
    let (store, _dir) = new_store(Arc::clone(&api));
    store.login("u1@example.com", FIXTURE_PASSWORD).await.unwrap();

    let project_id = "p1".into();
    let task_id = "t1".into();

    store
        .decide_task(&project_id, &task_id, AcceptanceDecision::Accepted)
        .await
        .unwrap();
    let task = store.snapshot().projects[0].task(&task_id).unwrap().clone();
    assert_eq!(task.acceptance, AcceptanceStatus::Accepted);
    // Acceptance starts the work.
    assert_eq!(task.status, TaskStatus::InProgress);

    // Accepting twice is an invalid transition, surfaced as such.
    let err = store
        .decide_task(&project_id, &task_id, AcceptanceDecision::Accepted)
        .await
        .unwrap_err();
    assert_eq!(
        err,
        StoreError::InvalidTransition(TransitionError::AcceptanceNotPending {
            current: AcceptanceStatus::Accepted
        })
    );

    store.complete_task(&project_id, &task_id).await.unwrap();
    let snapshot = store.snapshot();
    assert!(snapshot.projects[0].task(&task_id).unwrap().is_completed());

    // One of two tasks done.
    let progress = project_progress(&snapshot.projects[0]);
    assert_eq!(progress.completed_task_count, 1);
    assert_eq!(progress.completion_percentage, 50);
}

#[tokio::test]
async fn complete_without_acceptance_is_rejected() {
    let api = Arc::new(seeded_api());
    let (store, _dir) = new_store(Arc::clone(&api));
    store.login("u1@example.com", FIXTURE_PASSWORD).await.unwrap();

    let err = store
        .complete_task(&"p1".into(), &"t1".into())
        .await
        .unwrap_err();
    assert_eq!(
        err,
        StoreError::InvalidTransition(TransitionError::NotAccepted {
            current: AcceptanceStatus::Pending
        })
    );
    assert_eq!(api.calls("update_task"), 0);
}

#[tokio::test]
async fn non_assignee_accept_is_rejected_without_side_effects() {
    let api = Arc::new(seeded_api());
    let (store, _dir) = new_store(Arc::clone(&api));
    // Bea is a member but t1 is Asha's.
    store.login("u2@example.com", FIXTURE_PASSWORD).await.unwrap();

    let before = store.snapshot().projects.to_vec();
    let err = store
        .decide_task(&"p1".into(), &"t1".into(), AcceptanceDecision::Accepted)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        StoreError::InvalidTransition(TransitionError::NotAssignee { .. })
    ));
    // Rejected before any network call; no state changed anywhere.
    assert_eq!(api.calls("set_task_acceptance"), 0);
    assert_eq!(store.snapshot().projects.to_vec(), before);
}

#[tokio::test]
async fn team_member_gets_no_management_capabilities() {
    let api = Arc::new(seeded_api());
    let (store, _dir) = new_store(Arc::clone(&api));
    store.login("u1@example.com", FIXTURE_PASSWORD).await.unwrap();

    let caps = store.capabilities_on(&"p1".into()).unwrap();
    assert!(caps.is_empty());

    let err = store
        .create_task(&"p1".into(), &TaskDraft::new("nope"))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        StoreError::AuthorizationDenied {
            capability: Capability::CreateTask
        }
    );
    assert_eq!(api.calls("create_task"), 0);
}

#[tokio::test]
async fn foreign_manager_is_denied_under_the_strict_default() {
    let api = Arc::new(seeded_api());
    let (store, _dir) = new_store(Arc::clone(&api));
    // Noor manages nothing in this world.
    store.login("noor@example.com", FIXTURE_PASSWORD).await.unwrap();

    let err = store
        .create_task(&"p1".into(), &TaskDraft::new("drive-by task"))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        StoreError::AuthorizationDenied {
            capability: Capability::CreateTask
        }
    );
}

#[tokio::test]
async fn relaxed_manager_scope_is_an_explicit_opt_in() {
    let api = Arc::new(seeded_api());
    let config = StoreConfig::default().with_manager_scope(ManagerScope::AnyProject);
    let (store, _dir) = new_store_with(Arc::clone(&api), config);
    store.login("noor@example.com", FIXTURE_PASSWORD).await.unwrap();

    store
        .create_task(&"p1".into(), &TaskDraft::new("cross-project task").assigned_to("u1"))
        .await
        .unwrap();
    assert_eq!(store.snapshot().projects[0].tasks.len(), 3);
}

#[tokio::test]
async fn task_draft_validation_runs_before_the_network() {
    let api = Arc::new(seeded_api());
    let (store, _dir) = new_store(Arc::clone(&api));
    store
        .login("mahesh@example.com", FIXTURE_PASSWORD)
        .await
        .unwrap();

    let err = store
        .create_task(&"p1".into(), &TaskDraft::new("   "))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Validation(_)));

    let err = store
        .create_task(&"p1".into(), &TaskDraft::new("ok").assigned_to("stranger"))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Validation(_)));
    assert_eq!(api.calls("create_task"), 0);
}

#[tokio::test]
async fn removing_a_member_orphans_their_open_tasks() {
    let api = Arc::new(seeded_api());
    let (store, _dir) = new_store(Arc::clone(&api));
    store.login("root@example.com", FIXTURE_PASSWORD).await.unwrap();

    store
        .remove_member(&"p1".into(), &"u1".into())
        .await
        .unwrap();

    let snapshot = store.snapshot();
    let project = &snapshot.projects[0];
    let removed: UserId = "u1".into();
    assert!(!project.is_member(&removed));

    // The open task keeps its stale assignee; aggregation surfaces it
    // as unassigned and drops the departed member's breakdown.
    let breakdown = team_breakdown(project);
    assert!(breakdown.members.iter().all(|m| m.user_id != removed));
    assert_eq!(breakdown.unassigned_tasks, 1);
    assert!(project
        .tasks
        .iter()
        .any(|t| t.assignee_id() == Some(&removed)));
}

#[tokio::test]
async fn the_manager_cannot_be_removed() {
    let api = Arc::new(seeded_api());
    let (store, _dir) = new_store(Arc::clone(&api));
    store.login("root@example.com", FIXTURE_PASSWORD).await.unwrap();

    let err = store
        .remove_member(&"p1".into(), &"pm".into())
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Validation(_)));
    assert_eq!(api.calls("remove_member"), 0);
}

#[tokio::test]
async fn project_creation_round_trip() {
    let api = Arc::new(seeded_api());
    let (store, _dir) = new_store(Arc::clone(&api));
    store.login("root@example.com", FIXTURE_PASSWORD).await.unwrap();

    let draft = ProjectDraft::new("Borealis", "pm2")
        .with_description("Second rollout")
        .with_member("u2");
    store.create_project(&draft).await.unwrap();

    let snapshot = store.snapshot();
    assert_eq!(snapshot.projects.len(), 2);
    let created = snapshot
        .projects
        .iter()
        .find(|p| p.name == "Borealis")
        .unwrap();
    assert!(created.manages(&"pm2".into()));
    assert!(created.is_member(&"u2".into()));
    assert_eq!(snapshot.projects.to_vec(), api.fresh_projects());
}

#[tokio::test]
async fn corrupted_session_record_starts_unauthenticated() {
    let api = Arc::new(seeded_api());
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    std::fs::write(&path, "{definitely not json").unwrap();

    let sessions = Box::new(FileSessionStore::new(&path));
    let store = TrackerStore::new(api, sessions, StoreConfig::default());

    assert!(store.initialize().await.is_none());
    let snapshot = store.snapshot();
    assert!(snapshot.actor.is_none());
    assert!(snapshot.projects.is_empty());
    assert!(snapshot.error.is_none());
}

#[tokio::test]
async fn persisted_session_restores_across_stores() {
    let api = Arc::new(seeded_api());
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");

    {
        let sessions = Box::new(FileSessionStore::new(&path));
        let store = TrackerStore::new(Arc::clone(&api) as _, sessions, StoreConfig::default());
        store
            .login("mahesh@example.com", FIXTURE_PASSWORD)
            .await
            .unwrap();
    }

    let sessions = Box::new(FileSessionStore::new(&path));
    let store = TrackerStore::new(api, sessions, StoreConfig::default());
    let actor = store.initialize().await.unwrap();
    assert_eq!(actor.id, "pm".into());
    assert_eq!(store.snapshot().projects.len(), 1);
}

#[tokio::test]
async fn notification_reads_update_the_unread_count() {
    let api = Arc::new(seeded_api());
    api.push_notification(notification("n1", "Mahesh assigned you a task"));
    api.push_notification(notification("n2", "Mahesh added you to Atlas"));

    let (store, _dir) = new_store(Arc::clone(&api));
    store.login("u1@example.com", FIXTURE_PASSWORD).await.unwrap();
    assert_eq!(store.snapshot().unread_count, 2);

    store.mark_notification_read(&"n1".into()).await.unwrap();
    assert_eq!(store.snapshot().unread_count, 1);

    store.mark_all_notifications_read().await.unwrap();
    let snapshot = store.snapshot();
    assert_eq!(snapshot.unread_count, 0);
    assert!(snapshot.notifications.iter().all(|n| n.is_read));
}

#[tokio::test]
async fn my_tasks_returns_only_the_actors_rows() {
    let api = Arc::new(seeded_api());
    let (store, _dir) = new_store(api);
    store.login("u1@example.com", FIXTURE_PASSWORD).await.unwrap();

    let rows = store.my_tasks().await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].task.id, "t1".into());
    assert_eq!(rows[0].project_name, "Atlas");
    assert_eq!(rows[0].task.project_id, "p1".into());
}

#[tokio::test]
async fn logout_discards_everything_for_every_view() {
    let api = Arc::new(seeded_api());
    let (store, _dir) = new_store(api);
    store
        .login("mahesh@example.com", FIXTURE_PASSWORD)
        .await
        .unwrap();

    // A second view over the same store observes the same reset.
    let other_view = store.clone();
    store.logout();
    let snapshot = other_view.snapshot();
    assert!(snapshot.actor.is_none());
    assert!(snapshot.projects.is_empty());
}
