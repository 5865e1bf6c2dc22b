//! Per-project and per-member progress

use crate::percentage;
use crewtrack_domain::{Project, User, UserId, UserRole};
use serde::{Deserialize, Serialize};

/// Completion summary for one project
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectProgress {
    /// Total tasks owned by the project
    pub task_count: usize,
    /// Tasks that reached `Completed`
    pub completed_task_count: usize,
    /// `round(completed / total * 100)`, 0 for an empty project
    pub completion_percentage: u8,
}

/// Completion summary for one roster member
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberProgress {
    /// The member's id
    pub user_id: UserId,
    /// Display name, for rendering without a second lookup
    pub name: String,
    /// The member's global role; the manager is labeled as such
    pub role: UserRole,
    /// Tasks assigned to this member
    pub task_count: usize,
    /// Assigned tasks that reached `Completed`
    pub completed_task_count: usize,
    /// Independent per-member percentage, same rounding rule
    pub completion_percentage: u8,
}

/// Per-member breakdown of a project's progress
///
/// Members come from the normalized roster, manager first. Tasks whose
/// assignee is absent or no longer in the roster surface in
/// `unassigned_tasks` and contribute to no member's numbers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamBreakdown {
    /// One entry per roster member, roster order
    pub members: Vec<MemberProgress>,
    /// Tasks contributing to no member: never assigned, or orphaned by
    /// a later roster removal
    pub unassigned_tasks: usize,
}

/// Summarize a project's task collection
#[must_use]
pub fn project_progress(project: &Project) -> ProjectProgress {
    let task_count = project.tasks.len();
    let completed_task_count = project.tasks.iter().filter(|t| t.is_completed()).count();
    ProjectProgress {
        task_count,
        completed_task_count,
        completion_percentage: percentage(completed_task_count, task_count),
    }
}

/// Summarize one member's share of a project's tasks
#[must_use]
pub fn member_progress(project: &Project, member: &User) -> MemberProgress {
    let assigned: Vec<_> = project
        .tasks
        .iter()
        .filter(|t| t.is_assigned_to(&member.id))
        .collect();
    let task_count = assigned.len();
    let completed_task_count = assigned.iter().filter(|t| t.is_completed()).count();
    MemberProgress {
        user_id: member.id.clone(),
        name: member.name.clone(),
        role: member.role,
        task_count,
        completed_task_count,
        completion_percentage: percentage(completed_task_count, task_count),
    }
}

/// Break a project's progress down per roster member
#[must_use]
pub fn team_breakdown(project: &Project) -> TeamBreakdown {
    let roster = project.roster();
    let members: Vec<MemberProgress> = roster
        .values()
        .map(|member| member_progress(project, member))
        .collect();

    let unassigned_tasks = project
        .tasks
        .iter()
        .filter(|t| match t.assignee_id() {
            Some(assignee) => !roster.contains_key(assignee),
            None => true,
        })
        .count();

    TeamBreakdown {
        members,
        unassigned_tasks,
    }
}
