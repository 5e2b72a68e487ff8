//! Session state
//!
//! The session owns the bearer token for the signed-in user. It keeps the
//! token in memory, mirrors every change to a [`TokenStore`], and publishes
//! [`SessionStatus`] changes on a watch channel so the application can react
//! to logouts and expired sessions.
//!
//! Writes are crate-private: only the client's auth operations and its
//! unauthorized-response handling change the token.

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use thiserror::Error;
use tokio::sync::{watch, RwLock};

/// Fixed key the token is stored under
pub const TOKEN_KEY: &str = "token";

/// Whether a session token is currently held
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    LoggedIn,
    LoggedOut,
}

/// Persistent storage for the session token
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Read the stored token, if any
    async fn load(&self) -> Result<Option<String>, SessionError>;

    /// Persist a token, replacing any previous one
    async fn save(&self, token: &str) -> Result<(), SessionError>;

    /// Remove the stored token
    async fn clear(&self) -> Result<(), SessionError>;
}

/// Token store backed by a small JSON object file
///
/// The file holds a flat key/value object; the token lives under [`TOKEN_KEY`]
/// and other keys are preserved across writes.
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_map(&self) -> Result<Map<String, Value>, SessionError> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => return Err(self.io_error(e)),
        };

        if content.trim().is_empty() {
            return Ok(Map::new());
        }

        match serde_json::from_str::<Value>(&content) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(_) => Err(SessionError::Corrupt {
                path: self.path.clone(),
                error: "expected a JSON object".to_string(),
            }),
            Err(e) => Err(SessionError::Corrupt {
                path: self.path.clone(),
                error: e.to_string(),
            }),
        }
    }

    async fn write_map(&self, map: &Map<String, Value>) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|e| self.io_error(e))?;
            }
        }

        let content = serde_json::to_string_pretty(map).map_err(|e| SessionError::Corrupt {
            path: self.path.clone(),
            error: e.to_string(),
        })?;

        tokio::fs::write(&self.path, content)
            .await
            .map_err(|e| self.io_error(e))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            tokio::fs::set_permissions(&self.path, std::fs::Permissions::from_mode(0o600))
                .await
                .map_err(|e| self.io_error(e))?;
        }

        Ok(())
    }

    fn io_error(&self, error: std::io::Error) -> SessionError {
        SessionError::Io {
            path: self.path.clone(),
            error,
        }
    }
}

#[async_trait]
impl TokenStore for FileTokenStore {
    async fn load(&self) -> Result<Option<String>, SessionError> {
        let map = self.read_map().await?;
        Ok(map
            .get(TOKEN_KEY)
            .and_then(Value::as_str)
            .filter(|t| !t.is_empty())
            .map(String::from))
    }

    async fn save(&self, token: &str) -> Result<(), SessionError> {
        let mut map = match self.read_map().await {
            Ok(map) => map,
            Err(SessionError::Corrupt { .. }) => Map::new(),
            Err(e) => return Err(e),
        };
        map.insert(TOKEN_KEY.to_string(), Value::String(token.to_string()));
        self.write_map(&map).await
    }

    async fn clear(&self) -> Result<(), SessionError> {
        if !self.path.exists() {
            return Ok(());
        }
        let mut map = match self.read_map().await {
            Ok(map) => map,
            // Unreadable file: overwrite it rather than leave a token behind
            Err(SessionError::Corrupt { .. }) => Map::new(),
            Err(e) => return Err(e),
        };
        map.remove(TOKEN_KEY);
        self.write_map(&map).await
    }
}

/// In-process token store
#[derive(Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Mutex::new(Some(token.into())),
        }
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn load(&self) -> Result<Option<String>, SessionError> {
        Ok(self.token.lock().map_err(|_| SessionError::Poisoned)?.clone())
    }

    async fn save(&self, token: &str) -> Result<(), SessionError> {
        *self.token.lock().map_err(|_| SessionError::Poisoned)? = Some(token.to_string());
        Ok(())
    }

    async fn clear(&self) -> Result<(), SessionError> {
        *self.token.lock().map_err(|_| SessionError::Poisoned)? = None;
        Ok(())
    }
}

/// The signed-in session, shared between the client and the application
pub struct Session {
    store: Box<dyn TokenStore>,
    token: RwLock<Option<String>>,
    status: watch::Sender<SessionStatus>,
}

impl Session {
    /// Restore a session from its store
    pub async fn restore(store: impl TokenStore + 'static) -> Result<Self, SessionError> {
        let token = store.load().await?;
        let (status, _) = watch::channel(status_for(&token));

        tracing::debug!(logged_in = token.is_some(), "Session restored");

        Ok(Self {
            store: Box::new(store),
            token: RwLock::new(token),
            status,
        })
    }

    /// A session that starts logged out and keeps the token in memory only
    pub fn ephemeral() -> Self {
        let (status, _) = watch::channel(SessionStatus::LoggedOut);
        Self {
            store: Box::new(MemoryTokenStore::new()),
            token: RwLock::new(None),
            status,
        }
    }

    /// Current bearer token, if logged in
    pub async fn token(&self) -> Option<String> {
        self.token.read().await.clone()
    }

    pub fn status(&self) -> SessionStatus {
        *self.status.borrow()
    }

    pub fn is_logged_in(&self) -> bool {
        self.status() == SessionStatus::LoggedIn
    }

    /// Watch for login/logout transitions
    pub fn subscribe(&self) -> watch::Receiver<SessionStatus> {
        self.status.subscribe()
    }

    pub(crate) async fn set_token(&self, token: String) -> Result<(), SessionError> {
        let mut guard = self.token.write().await;
        self.store.save(&token).await?;
        *guard = Some(token);
        self.status.send_replace(SessionStatus::LoggedIn);
        Ok(())
    }

    /// Drop the token unconditionally (logout).
    ///
    /// The store is cleared first; if that fails the session stays logged in.
    pub(crate) async fn clear(&self) -> Result<(), SessionError> {
        let mut guard = self.token.write().await;
        self.store.clear().await?;
        *guard = None;
        self.status.send_replace(SessionStatus::LoggedOut);
        Ok(())
    }

    /// Drop the token only if it is still the one a rejected request carried.
    ///
    /// Returns `true` when the session was cleared. The backend has already
    /// rejected the token, so it leaves memory and `LoggedOut` is published
    /// even when the store cannot be cleared; that store error is returned
    /// afterwards.
    pub(crate) async fn expire(&self, rejected: &str) -> Result<bool, SessionError> {
        let mut guard = self.token.write().await;
        if guard.as_deref() != Some(rejected) {
            return Ok(false);
        }
        let stored = self.store.clear().await;
        *guard = None;
        self.status.send_replace(SessionStatus::LoggedOut);
        stored.map(|_| true)
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("status", &self.status())
            .finish_non_exhaustive()
    }
}

fn status_for(token: &Option<String>) -> SessionStatus {
    if token.is_some() {
        SessionStatus::LoggedIn
    } else {
        SessionStatus::LoggedOut
    }
}

/// Errors from reading or writing the session token
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Failed to access session file {path:?}: {error}")]
    Io {
        path: PathBuf,
        #[source]
        error: std::io::Error,
    },

    #[error("Session file {path:?} is corrupt: {error}")]
    Corrupt { path: PathBuf, error: String },

    #[error("Token store lock poisoned")]
    Poisoned,
}

/// Token store that serves a fixed token and refuses every write
#[cfg(test)]
pub(crate) struct ReadOnlyTokenStore {
    token: Option<String>,
}

#[cfg(test)]
impl ReadOnlyTokenStore {
    pub(crate) fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
        }
    }

    fn refuse(&self) -> SessionError {
        SessionError::Io {
            path: PathBuf::from("read-only"),
            error: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only store"),
        }
    }
}

#[cfg(test)]
#[async_trait]
impl TokenStore for ReadOnlyTokenStore {
    async fn load(&self) -> Result<Option<String>, SessionError> {
        Ok(self.token.clone())
    }

    async fn save(&self, _token: &str) -> Result<(), SessionError> {
        Err(self.refuse())
    }

    async fn clear(&self) -> Result<(), SessionError> {
        Err(self.refuse())
    }
}
