//! Crewtrack Lifecycle - the task state machine
//!
//! A task's state is the `(status, acceptance)` pair. This crate owns
//! the legal moves between states and who may trigger them; a failed
//! precondition is a [`TransitionError`], never a silent no-op, so a view
//! can surface it instead of mutating anything.
//!
//! Acceptance self-service (accept, reject, complete) belongs to the
//! assignee alone. Creation and deletion are capability-gated by the
//! policy crate and validated here only for shape (non-empty title,
//! assignee in roster).

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod transition;

pub use transition::{
    allowed_actions, apply, check, validate_draft, AcceptanceDecision, DraftError, TaskAction,
    TransitionError,
};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
