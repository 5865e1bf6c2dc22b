//! Session persistence and the shared credential slot
//!
//! One serialized record holds the actor's fields and the bearer token
//! together. It is read once at startup, written on successful
//! login/register, and erased on logout. A corrupt record must never
//! crash startup: it is cleared and the client starts unauthenticated.

use parking_lot::RwLock;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::api::AuthUser;

/// Shared slot holding the current bearer token
///
/// The HTTP collaborator reads it at send time; the store writes it on
/// login/logout. Cloning shares the slot.
#[derive(Debug, Clone, Default)]
pub struct CredentialSlot {
    inner: Arc<RwLock<Option<String>>>,
}

impl CredentialSlot {
    /// Empty slot
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current token, if any
    #[inline]
    #[must_use]
    pub fn get(&self) -> Option<String> {
        self.inner.read().clone()
    }

    /// Install a token
    #[inline]
    pub fn set(&self, token: impl Into<String>) {
        *self.inner.write() = Some(token.into());
    }

    /// Drop the token
    #[inline]
    pub fn clear(&self) {
        *self.inner.write() = None;
    }

    /// True when a token is present
    #[inline]
    #[must_use]
    pub fn is_set(&self) -> bool {
        self.inner.read().is_some()
    }
}

/// Client-local persistence for the session record
pub trait SessionStore: Send + Sync {
    /// Restore the persisted session, if one exists and parses
    ///
    /// Malformed persisted data is cleared and reported as absent -
    /// session restoration failures downgrade to "no session".
    fn load(&self) -> Option<AuthUser>;

    /// Persist the session record
    ///
    /// # Errors
    /// Returns the underlying I/O error; callers may log and proceed,
    /// since a failed write must not fail a successful login.
    fn save(&self, session: &AuthUser) -> io::Result<()>;

    /// Erase the persisted record
    fn clear(&self);
}

/// File-backed session store, one JSON record per file
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    /// Store persisting to `path`
    #[inline]
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The backing path
    #[inline]
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Option<AuthUser> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return None,
            Err(err) => {
                tracing::warn!(path = %self.path.display(), %err, "session file unreadable");
                return None;
            }
        };
        match serde_json::from_str::<AuthUser>(&raw) {
            Ok(session) => Some(session),
            Err(err) => {
                tracing::warn!(
                    path = %self.path.display(),
                    %err,
                    "clearing malformed session record"
                );
                self.clear();
                None
            }
        }
    }

    fn save(&self, session: &AuthUser) -> io::Result<()> {
        let raw = serde_json::to_string(session)?;
        std::fs::write(&self.path, raw)
    }

    fn clear(&self) {
        if let Err(err) = std::fs::remove_file(&self.path) {
            if err.kind() != io::ErrorKind::NotFound {
                tracing::warn!(path = %self.path.display(), %err, "failed to erase session file");
            }
        }
    }
}
