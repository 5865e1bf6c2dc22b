//! Crewtrack Store - session state, the authoritative snapshot, and I/O
//!
//! The store is the process root's single source of truth:
//! - holds the authenticated actor (or none) and their credential
//! - holds the authoritative project/task collection
//! - mediates every read and mutation through one refresh discipline
//!
//! Views receive the store by explicit injection, issue intents (the
//! operations on [`TrackerStore`]), and re-render from [`TrackerStore::snapshot`].
//! No view computes authorization or lifecycle transitions itself; the
//! store preflights both defensively before any network call.
//!
//! # Consistency strategy
//!
//! Mutations never patch the local collection. Every successful mutation
//! is followed by a full refresh ([`SyncPolicy::RefreshOnMutation`]), so
//! the snapshot always equals what an independent fresh fetch would
//! return. Concurrent refreshes collapse into a single network round
//! trip, and a monotonic request token discards responses that lost the
//! race to a newer one.
//!
//! # Example
//!
//! ```rust,ignore
//! use crewtrack_store::{HttpProjectApi, FileSessionStore, StoreConfig, TrackerStore};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = StoreConfig::default();
//! let api = Arc::new(HttpProjectApi::new(&config)?);
//! let sessions = Box::new(FileSessionStore::new("session.json"));
//! let store = TrackerStore::new(api, sessions, config);
//!
//! store.initialize().await;
//! store.login("asha@example.com", "hunter2").await?;
//! let snapshot = store.snapshot();
//! println!("{} projects", snapshot.projects.len());
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

// Core modules
pub mod api;
pub mod config;
pub mod error;
pub mod session;
pub mod store;

// Re-exports for convenience
pub use api::http::HttpProjectApi;
pub use api::{
    AssignedTask, AuthUser, Credentials, Notification, NotificationFeed, ProjectApi, ProjectDraft,
    RegisterRequest, TaskDraft,
};
pub use config::StoreConfig;
pub use error::{ApiError, StoreError, ValidationError};
pub use session::{CredentialSlot, FileSessionStore, SessionStore};
pub use store::{StoreSnapshot, SyncPolicy, TrackerStore};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
