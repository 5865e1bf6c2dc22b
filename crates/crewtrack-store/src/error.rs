//! Error types for the store
//!
//! The taxonomy the views surface:
//! - validation failures are rejected before any network call
//! - authentication failures never mutate session state
//! - authorization denials are re-checked defensively even though a
//!   well-behaved view never offers the action
//! - network/server failures leave the prior snapshot intact
//! - lifecycle precondition violations are distinct from server errors

use crewtrack_domain::{ProjectId, TaskId};
use crewtrack_lifecycle::{DraftError, TransitionError};
use crewtrack_policy::Capability;

/// Failure reported by the external API collaborator
///
/// Clonable by design: the single-flight refresh hands the same outcome
/// to every concurrent caller.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// Non-success HTTP status, with the server's message when present
    #[error("server rejected the request ({status}): {message}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Server-provided message, or a generic fallback
        message: String,
    },

    /// Connection, DNS, or timeout failure before a response arrived
    #[error("transport error: {0}")]
    Transport(String),

    /// Response body did not match the expected shape
    #[error("malformed response: {0}")]
    Decode(String),
}

impl ApiError {
    /// The message a view should show for this failure
    #[inline]
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            ApiError::Status { message, .. } => message,
            ApiError::Transport(message) | ApiError::Decode(message) => message,
        }
    }

    /// True for a 401 response
    #[inline]
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Status { status: 401, .. })
    }
}

/// A mutation payload rejected before any network call
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// Project name must be non-empty after trimming
    #[error("project name is required")]
    EmptyProjectName,

    /// A manager must be selected when creating a project
    #[error("a project manager must be selected")]
    MissingManager,

    /// Removing the manager would break the roster invariant
    #[error("the project manager cannot be removed from the roster")]
    CannotRemoveManager,

    /// Task draft failed shape validation
    #[error(transparent)]
    Task(#[from] DraftError),
}

/// Main store error type
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// Rejected before any network call
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// Login/register rejected by the auth collaborator
    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    /// An intent was issued with no authenticated actor
    #[error("no authenticated actor")]
    NotAuthenticated,

    /// Actor lacks the capability the operation requires
    #[error("permission denied: {capability} required")]
    AuthorizationDenied {
        /// The missing capability
        capability: Capability,
    },

    /// Actor is not in the project's roster and may not read its detail
    #[error("not a member of this project")]
    NotProjectMember,

    /// Lifecycle precondition violation
    #[error("invalid transition: {0}")]
    InvalidTransition(#[from] TransitionError),

    /// The addressed project is not in the authoritative snapshot
    #[error("project not found: {0}")]
    UnknownProject(ProjectId),

    /// The addressed task is not in the addressed project
    #[error("task not found: {0}")]
    UnknownTask(TaskId),

    /// Collaborator failure; prior snapshot left intact
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl StoreError {
    /// True when re-authentication would help
    #[inline]
    #[must_use]
    pub fn is_auth(&self) -> bool {
        match self {
            StoreError::AuthenticationFailed(_) | StoreError::NotAuthenticated => true,
            StoreError::Api(err) => err.is_unauthorized(),
            _ => false,
        }
    }
}
