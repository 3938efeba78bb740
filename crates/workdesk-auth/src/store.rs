//! Persisted session storage.
//!
//! The browser original kept two cookies (token + serialized profile)
//! with a fixed expiry window. Here the session is one JSON entry with
//! an `expires_at` stamp, which makes the set-together/clear-together
//! invariant structural instead of conventional.
//!
//! Loading an absent or expired entry yields `Ok(None)`; the caller
//! treats both identically (fail-closed to the login screen).

use crate::{AuthError, Session};
use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::path::PathBuf;
use tokio::fs;
use tracing::debug;

/// Default expiry window for a saved session.
///
/// Mirrors the fixed cookie lifetime of the original client (12 hours).
#[must_use]
pub fn default_session_ttl() -> Duration {
    Duration::hours(12)
}

/// Persisted session storage abstraction.
///
/// Implementations must be thread-safe (`Send + Sync`) for use across
/// async tasks. The store holds at most one session: the console is a
/// single-operator client, like one browser profile.
///
/// # Example
///
/// ```no_run
/// use workdesk_auth::{AuthError, Session, SessionStore};
///
/// async fn restore(store: &impl SessionStore) -> Result<Option<Session>, AuthError> {
///     // Absent and expired entries both come back as None.
///     store.load().await
/// }
/// ```
pub trait SessionStore: Send + Sync {
    /// Persists the session, replacing any previous entry and stamping
    /// a fresh expiry window.
    fn save(&self, session: &Session) -> impl Future<Output = Result<(), AuthError>> + Send;

    /// Loads the current session.
    ///
    /// Returns `Ok(None)` when no entry exists or the entry has
    /// expired; an expired entry is also removed.
    fn load(&self) -> impl Future<Output = Result<Option<Session>, AuthError>> + Send;

    /// Removes the session entry entirely (token and user together).
    fn clear(&self) -> impl Future<Output = Result<(), AuthError>> + Send;
}

/// On-disk envelope: the session plus its expiry stamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredEntry {
    session: Session,
    expires_at: DateTime<Utc>,
}

impl StoredEntry {
    fn new(session: &Session, ttl: Duration) -> Self {
        Self {
            session: session.clone(),
            expires_at: Utc::now() + ttl,
        }
    }

    fn is_expired(&self) -> bool {
        self.expires_at <= Utc::now()
    }
}

/// File-backed session store.
///
/// The entry lives as pretty-printed JSON inside a dedicated
/// directory; writes go through a temp file and rename. [`clear`]
/// sweeps every file in the directory, matching the original's
/// clear-all-cookies logout behavior.
///
/// [`clear`]: SessionStore::clear
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    base_path: PathBuf,
    ttl: Duration,
}

impl FileSessionStore {
    /// Creates a store rooted at `base_path` with the default TTL.
    ///
    /// The directory is created if missing.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::DirectoryCreation`] when the directory
    /// cannot be created.
    pub fn new(base_path: PathBuf) -> Result<Self, AuthError> {
        Self::with_ttl(base_path, default_session_ttl())
    }

    /// Creates a store with an explicit expiry window.
    pub fn with_ttl(base_path: PathBuf, ttl: Duration) -> Result<Self, AuthError> {
        if !base_path.exists() {
            std::fs::create_dir_all(&base_path)
                .map_err(|e| AuthError::directory_creation(&base_path, e))?;
        }
        Ok(Self { base_path, ttl })
    }

    /// Returns the storage directory.
    #[must_use]
    pub fn base_path(&self) -> &PathBuf {
        &self.base_path
    }

    fn entry_path(&self) -> PathBuf {
        self.base_path.join("session.json")
    }

    fn temp_path(&self) -> PathBuf {
        self.base_path.join(".session.json.tmp")
    }
}

impl SessionStore for FileSessionStore {
    async fn save(&self, session: &Session) -> Result<(), AuthError> {
        let entry = StoredEntry::new(session, self.ttl);
        let json = serde_json::to_string_pretty(&entry)?;

        // Atomic write: temp file then rename.
        fs::write(self.temp_path(), &json).await?;
        fs::rename(self.temp_path(), self.entry_path()).await?;
        Ok(())
    }

    async fn load(&self) -> Result<Option<Session>, AuthError> {
        let path = self.entry_path();
        if !path.exists() {
            return Ok(None);
        }

        let json = fs::read_to_string(&path).await?;
        let entry: StoredEntry = match serde_json::from_str(&json) {
            Ok(entry) => entry,
            Err(err) => {
                // A corrupt entry is indistinguishable from no session.
                debug!(error = %err, "discarding unreadable session entry");
                fs::remove_file(&path).await?;
                return Ok(None);
            }
        };

        if entry.is_expired() {
            debug!(expires_at = %entry.expires_at, "discarding expired session entry");
            fs::remove_file(&path).await?;
            return Ok(None);
        }

        Ok(Some(entry.session))
    }

    async fn clear(&self) -> Result<(), AuthError> {
        let mut entries = fs::read_dir(&self.base_path).await?;
        while let Some(entry) = entries.next_entry().await? {
            if entry.path().is_file() {
                fs::remove_file(entry.path()).await?;
            }
        }
        Ok(())
    }
}

/// In-memory session store for tests.
#[derive(Debug)]
pub struct MemorySessionStore {
    entry: Mutex<Option<StoredEntry>>,
    ttl: Duration,
}

impl Default for MemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemorySessionStore {
    /// Creates an empty store with the default TTL.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entry: Mutex::new(None),
            ttl: default_session_ttl(),
        }
    }

    /// Creates an empty store with an explicit expiry window.
    #[must_use]
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            entry: Mutex::new(None),
            ttl,
        }
    }
}

impl SessionStore for MemorySessionStore {
    async fn save(&self, session: &Session) -> Result<(), AuthError> {
        *self.entry.lock() = Some(StoredEntry::new(session, self.ttl));
        Ok(())
    }

    async fn load(&self) -> Result<Option<Session>, AuthError> {
        let mut guard = self.entry.lock();
        match guard.as_ref() {
            Some(entry) if entry.is_expired() => {
                *guard = None;
                Ok(None)
            }
            Some(entry) => Ok(Some(entry.session.clone())),
            None => Ok(None),
        }
    }

    async fn clear(&self) -> Result<(), AuthError> {
        *self.entry.lock() = None;
        Ok(())
    }
}
