//! Transition validation and application

use crewtrack_domain::{AcceptanceStatus, Project, Task, TaskStatus, UserId};
use serde::{Deserialize, Serialize};

/// Self-service action an assignee can take on a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskAction {
    /// Take the task on
    Accept,
    /// Decline the task; terminal for acceptance
    Reject,
    /// Mark the task done
    Complete,
}

impl std::fmt::Display for TaskAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            TaskAction::Accept => "accept",
            TaskAction::Reject => "reject",
            TaskAction::Complete => "complete",
        };
        write!(f, "{label}")
    }
}

/// The assignee's answer to a pending task, as sent on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AcceptanceDecision {
    /// Take the task on
    Accepted,
    /// Decline the task
    RejectedByTeamMember,
}

impl AcceptanceDecision {
    /// The action this decision corresponds to
    #[inline]
    #[must_use]
    pub fn action(self) -> TaskAction {
        match self {
            AcceptanceDecision::Accepted => TaskAction::Accept,
            AcceptanceDecision::RejectedByTeamMember => TaskAction::Reject,
        }
    }

    /// The acceptance state this decision resolves to
    #[inline]
    #[must_use]
    pub fn resolved_status(self) -> AcceptanceStatus {
        match self {
            AcceptanceDecision::Accepted => AcceptanceStatus::Accepted,
            AcceptanceDecision::RejectedByTeamMember => AcceptanceStatus::RejectedByTeamMember,
        }
    }
}

/// A transition whose precondition failed
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    /// Only the assignee may act on a task
    #[error("only the assignee may {action} this task")]
    NotAssignee {
        /// The attempted action
        action: TaskAction,
    },

    /// Accept/Reject require a pending acceptance state
    #[error("task acceptance already resolved to {current}")]
    AcceptanceNotPending {
        /// The acceptance state the task is in
        current: AcceptanceStatus,
    },

    /// Complete requires the task to have been accepted
    #[error("task cannot be completed while acceptance is {current}")]
    NotAccepted {
        /// The acceptance state the task is in
        current: AcceptanceStatus,
    },

    /// Complete on an already-completed task
    #[error("task is already completed")]
    AlreadyCompleted,
}

/// A create/update payload whose shape is invalid
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DraftError {
    /// Title must be non-empty after trimming
    #[error("task title is required")]
    EmptyTitle,

    /// Assignee must be a current roster member
    #[error("assignee {assignee} is not a member of the project")]
    AssigneeNotMember {
        /// The offending user id
        assignee: UserId,
    },
}

/// Validate `action` by `actor` against `task` without mutating anything
///
/// This is the preflight every caller runs before going to the network;
/// the server re-validates, the client validates defensively.
pub fn check(task: &Task, actor: &UserId, action: TaskAction) -> Result<(), TransitionError> {
    if !task.is_assigned_to(actor) {
        return Err(TransitionError::NotAssignee { action });
    }
    match action {
        TaskAction::Accept | TaskAction::Reject => {
            if task.acceptance != AcceptanceStatus::Pending {
                return Err(TransitionError::AcceptanceNotPending {
                    current: task.acceptance,
                });
            }
            Ok(())
        }
        TaskAction::Complete => {
            if task.status == TaskStatus::Completed {
                return Err(TransitionError::AlreadyCompleted);
            }
            if task.acceptance != AcceptanceStatus::Accepted {
                return Err(TransitionError::NotAccepted {
                    current: task.acceptance,
                });
            }
            Ok(())
        }
    }
}

/// Validate and apply `action` to `task` in place
///
/// Acceptance advances a not-started task to in-progress, matching the
/// service's behavior, so the two sides agree on the post-state.
pub fn apply(task: &mut Task, actor: &UserId, action: TaskAction) -> Result<(), TransitionError> {
    check(task, actor, action)?;
    match action {
        TaskAction::Accept => {
            task.acceptance = AcceptanceStatus::Accepted;
            if task.status == TaskStatus::NotStarted {
                task.status = TaskStatus::InProgress;
            }
        }
        TaskAction::Reject => {
            task.acceptance = AcceptanceStatus::RejectedByTeamMember;
        }
        TaskAction::Complete => {
            task.status = TaskStatus::Completed;
        }
    }
    Ok(())
}

/// Actions `actor` may currently take on `task`
///
/// What a view consults to decide which controls to offer; an empty
/// answer means the actor gets no task-level buttons at all.
#[must_use]
pub fn allowed_actions(task: &Task, actor: &UserId) -> Vec<TaskAction> {
    [TaskAction::Accept, TaskAction::Reject, TaskAction::Complete]
        .into_iter()
        .filter(|action| check(task, actor, *action).is_ok())
        .collect()
}

/// Validate a task draft against its owning project
///
/// Title must be non-empty after trimming; an assignee, if given, must be
/// in the project's roster (manager included). Enforced at mutation time
/// only - removing a member later does not retroactively invalidate
/// existing assignments.
pub fn validate_draft(
    title: &str,
    assignee: Option<&UserId>,
    project: &Project,
) -> Result<(), DraftError> {
    if title.trim().is_empty() {
        return Err(DraftError::EmptyTitle);
    }
    if let Some(assignee) = assignee {
        if !project.is_member(assignee) {
            return Err(DraftError::AssigneeNotMember {
                assignee: assignee.clone(),
            });
        }
    }
    Ok(())
}
