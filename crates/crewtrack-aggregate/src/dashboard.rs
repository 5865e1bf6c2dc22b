//! Dashboard roll-up across all visible projects

use crate::{percentage, project_progress};
use crewtrack_domain::{Project, ProjectStatus};
use serde::{Deserialize, Serialize};

/// Aggregates for the dashboard's stat tiles and overall meter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardStats {
    /// Projects not yet begun ("upcoming" on the dashboard)
    pub not_started: usize,
    /// Projects underway
    pub in_progress: usize,
    /// Finished projects
    pub completed: usize,
    /// Paused projects
    pub on_hold: usize,
    /// Abandoned projects
    pub cancelled: usize,
    /// All visible projects
    pub total_projects: usize,
    /// Tasks across every visible project
    pub total_tasks: usize,
    /// Completed tasks across every visible project
    pub completed_tasks: usize,
    /// Global percentage over the task sums, 0 when there are no tasks
    pub completion_percentage: u8,
}

impl DashboardStats {
    /// Project count for one status bucket
    #[inline]
    #[must_use]
    pub fn bucket(&self, status: ProjectStatus) -> usize {
        match status {
            ProjectStatus::NotStarted => self.not_started,
            ProjectStatus::InProgress => self.in_progress,
            ProjectStatus::Completed => self.completed,
            ProjectStatus::OnHold => self.on_hold,
            ProjectStatus::Cancelled => self.cancelled,
        }
    }
}

/// Roll up every visible project into dashboard aggregates
#[must_use]
pub fn dashboard(projects: &[Project]) -> DashboardStats {
    let mut stats = DashboardStats {
        total_projects: projects.len(),
        ..DashboardStats::default()
    };

    for project in projects {
        match project.status {
            ProjectStatus::NotStarted => stats.not_started += 1,
            ProjectStatus::InProgress => stats.in_progress += 1,
            ProjectStatus::Completed => stats.completed += 1,
            ProjectStatus::OnHold => stats.on_hold += 1,
            ProjectStatus::Cancelled => stats.cancelled += 1,
        }
        let progress = project_progress(project);
        stats.total_tasks += progress.task_count;
        stats.completed_tasks += progress.completed_task_count;
    }

    stats.completion_percentage = percentage(stats.completed_tasks, stats.total_tasks);
    stats
}
