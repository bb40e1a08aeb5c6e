//! Authenticated session and its thread-safe holder.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, RwLock};

use crate::domain::ConnectionParams;
use crate::errors::shorten_id;

/// A server-issued session: the id attached to every request plus auxiliary
/// tokens for preview and download URLs.
///
/// Renewal replaces the id and tokens in place (see
/// [`SessionHolder::apply_renewal`]); the owning connection parameters stay.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Session {
    /// The session identifier sent in the `X-Session-ID` header.
    pub id: String,
    /// Token embedded into preview (thumbnail) URLs.
    pub preview_token: String,
    /// Token embedded into original-file download URLs.
    pub download_token: String,
    /// Parameters of the instance this session belongs to.
    pub connection: ConnectionParams,
    /// When this session was created or last renewed.
    pub created_at: DateTime<Utc>,
}

impl Session {
    pub fn new(
        id: impl Into<String>,
        preview_token: impl Into<String>,
        download_token: impl Into<String>,
        connection: ConnectionParams,
    ) -> Self {
        Self {
            id: id.into(),
            preview_token: preview_token.into(),
            download_token: download_token.into(),
            connection,
            created_at: Utc::now(),
        }
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("id", &format!("{}...", shorten_id(&self.id)))
            .field("connection", &self.connection)
            .field("created_at", &self.created_at)
            .finish()
    }
}

/// Thread-safe mutable cell holding the current session.
///
/// This is the single source of truth for the session id: the attacher reads
/// it on every request instead of capturing a value at chain-construction
/// time, so a renewal on one worker thread is immediately visible to all
/// in-flight and future requests.
///
/// Cloning the holder shares the underlying cell.
#[derive(Clone, Default)]
pub struct SessionHolder {
    inner: Arc<RwLock<Option<Session>>>,
}

impl SessionHolder {
    /// Creates an empty holder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a holder pre-populated with a session.
    pub fn with_session(session: Session) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Some(session))),
        }
    }

    /// Returns a snapshot of the current session, if any.
    pub fn get(&self) -> Option<Session> {
        self.inner.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Returns the current session id, if a session is set.
    pub fn session_id(&self) -> Option<String> {
        self.inner
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .as_ref()
            .map(|s| s.id.clone())
    }

    /// Replaces the held session entirely.
    pub fn set(&self, session: Session) {
        *self.inner.write().unwrap_or_else(|e| e.into_inner()) = Some(session);
    }

    /// Removes the held session.
    pub fn clear(&self) {
        *self.inner.write().unwrap_or_else(|e| e.into_inner()) = None;
    }

    /// Updates the id and tokens in place from a renewed session.
    ///
    /// If no session is held yet, the renewed session is stored as-is.
    pub fn apply_renewal(&self, renewed: &Session) {
        let mut guard = self.inner.write().unwrap_or_else(|e| e.into_inner());
        match guard.as_mut() {
            Some(current) => {
                current.id = renewed.id.clone();
                current.preview_token = renewed.preview_token.clone();
                current.download_token = renewed.download_token.clone();
                current.created_at = renewed.created_at;
            }
            None => *guard = Some(renewed.clone()),
        }
    }
}

impl std::fmt::Debug for SessionHolder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionHolder")
            .field("session", &self.get())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use url::Url;

    fn connection() -> ConnectionParams {
        ConnectionParams::new(Url::parse("https://photos.example.com").unwrap(), None, None)
            .unwrap()
    }

    fn session(id: &str) -> Session {
        Session::new(id, "pt", "dt", connection())
    }

    #[test]
    fn test_holder_starts_empty() {
        let holder = SessionHolder::new();
        assert!(holder.get().is_none());
        assert!(holder.session_id().is_none());
    }

    #[test]
    fn test_set_and_get() {
        let holder = SessionHolder::new();
        holder.set(session("S1"));
        assert_eq!(holder.session_id().as_deref(), Some("S1"));
    }

    #[test]
    fn test_clones_share_the_cell() {
        let holder = SessionHolder::new();
        let clone = holder.clone();
        holder.set(session("S1"));
        assert_eq!(clone.session_id().as_deref(), Some("S1"));
    }

    #[test]
    fn test_apply_renewal_replaces_id_and_tokens_in_place() {
        let holder = SessionHolder::with_session(session("S1"));

        let mut renewed = session("S2");
        renewed.preview_token = "pt2".to_string();
        renewed.download_token = "dt2".to_string();
        holder.apply_renewal(&renewed);

        let current = holder.get().unwrap();
        assert_eq!(current.id, "S2");
        assert_eq!(current.preview_token, "pt2");
        assert_eq!(current.download_token, "dt2");
    }

    #[test]
    fn test_apply_renewal_on_empty_holder_stores_session() {
        let holder = SessionHolder::new();
        holder.apply_renewal(&session("S1"));
        assert_eq!(holder.session_id().as_deref(), Some("S1"));
    }

    #[test]
    fn test_debug_truncates_session_id() {
        let holder = SessionHolder::with_session(session("0123456789"));
        let debug = format!("{holder:?}");
        assert!(debug.contains("01234..."));
        assert!(!debug.contains("0123456789"));
    }
}
