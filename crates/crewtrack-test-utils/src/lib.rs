//! Testing utilities for the Crewtrack workspace
//!
//! Shared fixtures plus [`InMemoryApi`], an in-process stand-in for the
//! tracker service with per-endpoint call counters.

#![allow(missing_docs)]

pub mod api;

pub use api::InMemoryApi;

use crewtrack_domain::{Project, Task, User, UserRole};
use crewtrack_store::Notification;

/// Password every fixture user is seeded with
pub const FIXTURE_PASSWORD: &str = "hunter2";

pub fn admin() -> User {
    User::new("adm", "Root", "root@example.com").with_role(UserRole::Admin)
}

pub fn manager() -> User {
    User::new("pm", "Mahesh", "mahesh@example.com").with_role(UserRole::ProjectManager)
}

pub fn other_manager() -> User {
    User::new("pm2", "Noor", "noor@example.com").with_role(UserRole::ProjectManager)
}

pub fn team_member(id: &str, name: &str) -> User {
    User::new(id, name, format!("{id}@example.com"))
}

/// A project managed by [`manager`] with two team members and two tasks,
/// one assigned to each member
pub fn sample_project() -> Project {
    let asha = team_member("u1", "Asha");
    let bea = team_member("u2", "Bea");
    Project::new("p1", "Atlas", manager())
        .with_member(asha.clone())
        .with_member(bea.clone())
        .with_task(Task::new("t1", "Draft the plan").assigned_to(asha))
        .with_task(Task::new("t2", "Review the plan").assigned_to(bea))
}

/// An unread notification with the given id and message
pub fn notification(id: &str, message: &str) -> Notification {
    Notification {
        id: id.into(),
        sender: None,
        kind: "generic".to_string(),
        message: message.to_string(),
        link: None,
        related_task_title: None,
        is_read: false,
        created_at: None,
    }
}

/// An [`InMemoryApi`] seeded with the fixture users and [`sample_project`]
#[must_use]
pub fn seeded_api() -> InMemoryApi {
    let api = InMemoryApi::new();
    for user in [
        admin(),
        manager(),
        other_manager(),
        team_member("u1", "Asha"),
        team_member("u2", "Bea"),
    ] {
        api.seed_user(user, FIXTURE_PASSWORD);
    }
    api.seed_project(sample_project());
    api
}
