//! Crewtrack Domain - entity shapes and invariants
//!
//! Defines the fundamental types shared by every other crate:
//! - Typed identifiers for users, projects, tasks, and notifications
//! - User accounts and their global roles
//! - Projects with their membership roster and owned task collection
//! - Tasks with their status and acceptance state
//!
//! The one routine every consumer must share lives here too: membership
//! normalization. Rosters are de-duplicated by id at every boundary where
//! membership is read, and the project manager is always part of the
//! roster.

#![warn(unreachable_pub)]
#![allow(missing_docs)]

// Core modules
pub mod ids;
pub mod project;
pub mod task;
pub mod user;

// Re-exports for convenience
pub use ids::{NotificationId, ProjectId, TaskId, UserId};
pub use project::{Project, ProjectStatus};
pub use task::{AcceptanceStatus, Task, TaskStatus};
pub use user::{User, UserRole};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with the Crewtrack domain
    pub use crate::{
        AcceptanceStatus, Project, ProjectId, ProjectStatus, Task, TaskId, TaskStatus, User,
        UserId, UserRole,
    };
}
