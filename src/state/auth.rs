#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::watch;

use crate::error::SessionError;
use crate::net::api::AuthApi;
use crate::net::events::{AuthEvent, AuthEvents};
use crate::net::types::{AuthPayload, Credentials, SignupData, User, UserUpdate};
use crate::storage::{self, Storage, TOKEN_KEY, USER_KEY};

/// The authenticated identity and profile currently active in the client.
#[derive(Clone, Default, PartialEq)]
pub struct Session {
    pub token: Option<String>,
    /// May lag `token` between a login and a follow-up profile fetch.
    pub user: Option<User>,
    /// Advances on every token change (login, signup, logout, unauthorized).
    pub generation: u64,
}

impl Session {
    /// True iff the token is present and non-empty.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.token.as_deref().is_some_and(|t| !t.is_empty())
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("user", &self.user.as_ref().map(|u| u.id))
            .field("generation", &self.generation)
            .finish()
    }
}

/// Session store mirrored into persistent storage.
///
/// Cloning yields another handle to the same session. Every mutation
/// commits memory and storage together under one lock that is never held
/// across an `.await`.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<Inner>,
}

struct Inner {
    api: Arc<dyn AuthApi>,
    storage: Arc<dyn Storage>,
    state: watch::Sender<Session>,
    commit: Mutex<()>,
}

impl fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionStore")
            .field("session", &*self.inner.state.borrow())
            .finish_non_exhaustive()
    }
}

impl SessionStore {
    /// Create a store, restoring the session left in `storage`.
    ///
    /// A missing or malformed persisted user is treated as absent.
    pub fn new(api: Arc<dyn AuthApi>, storage: Arc<dyn Storage>) -> Self {
        let session = load_session(storage.as_ref());
        tracing::debug!(authenticated = session.is_authenticated(), "session restored");
        let (state, _) = watch::channel(session);
        Self { inner: Arc::new(Inner { api, storage, state, commit: Mutex::new(()) }) }
    }

    // =========================================================================
    // READS
    // =========================================================================

    #[must_use]
    pub fn snapshot(&self) -> Session {
        self.inner.state.borrow().clone()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.inner.state.borrow().is_authenticated()
    }

    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.inner.state.borrow().token.clone()
    }

    #[must_use]
    pub fn user(&self) -> Option<User> {
        self.inner.state.borrow().user.clone()
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.inner.state.borrow().generation
    }

    /// Receive every committed session from now on.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.inner.state.subscribe()
    }

    // =========================================================================
    // MUTATIONS
    // =========================================================================

    /// Log in and replace the session wholesale.
    ///
    /// # Errors
    ///
    /// Returns the API error unchanged; the current session is untouched.
    pub async fn login(&self, credentials: &Credentials) -> Result<AuthPayload, SessionError> {
        let payload = self.inner.api.login(credentials).await?;
        self.commit_auth(&payload);
        tracing::info!(user_id = payload.user.id, "logged in");
        Ok(payload)
    }

    /// Create an account and replace the session wholesale.
    ///
    /// # Errors
    ///
    /// Returns the API error unchanged; the current session is untouched.
    pub async fn signup(&self, data: &SignupData) -> Result<AuthPayload, SessionError> {
        let payload = self.inner.api.signup(data).await?;
        self.commit_auth(&payload);
        tracing::info!(user_id = payload.user.id, "signed up");
        Ok(payload)
    }

    /// Clear the session from memory and storage. Idempotent.
    pub fn logout(&self) {
        self.clear();
        tracing::info!("logged out");
    }

    /// Refresh the user record without re-authenticating.
    ///
    /// # Errors
    ///
    /// Returns the API error, or [`SessionError::Superseded`] if the session
    /// changed while the request was in flight.
    pub async fn fetch_user(&self) -> Result<User, SessionError> {
        let issued = self.generation();
        let user = self.inner.api.me().await?;
        self.commit_user(issued, user)
    }

    /// Update the profile and store the record the backend returns.
    ///
    /// # Errors
    ///
    /// Same as [`SessionStore::fetch_user`].
    pub async fn update_user(&self, update: &UserUpdate) -> Result<User, SessionError> {
        let issued = self.generation();
        let user = self.inner.api.update_me(update).await?;
        self.commit_user(issued, user)
    }

    /// Clear the session whenever the transport reports an unauthorized
    /// response.
    pub fn listen(&self, events: &AuthEvents) {
        events.subscribe_weak(&self.inner, |inner, event| {
            let AuthEvent::Unauthorized { path } = event;
            SessionStore { inner: Arc::clone(inner) }.clear();
            tracing::info!(path = %path, "session cleared after unauthorized response");
        });
    }

    fn commit_auth(&self, payload: &AuthPayload) {
        if payload.token.is_empty() {
            tracing::warn!(user_id = payload.user.id, "auth response carried an empty token; session cleared");
            self.clear();
            return;
        }

        let _guard = self.inner.commit.lock();
        self.persist(TOKEN_KEY, &payload.token);
        self.persist_user(&payload.user);

        self.inner.state.send_modify(|s| {
            s.token = Some(payload.token.clone());
            s.user = Some(payload.user.clone());
            s.generation += 1;
        });
    }

    fn commit_user(&self, issued: u64, user: User) -> Result<User, SessionError> {
        let _guard = self.inner.commit.lock();
        if self.generation() != issued {
            tracing::debug!(user_id = user.id, "discarding user record from a previous session");
            return Err(SessionError::Superseded);
        }

        self.persist_user(&user);
        self.inner
            .state
            .send_modify(|s| s.user = Some(user.clone()));
        Ok(user)
    }

    fn clear(&self) {
        let _guard = self.inner.commit.lock();
        storage::clear_session_keys(self.inner.storage.as_ref());
        self.inner.state.send_modify(|s| {
            s.token = None;
            s.user = None;
            s.generation += 1;
        });
    }

    fn persist(&self, key: &str, value: &str) {
        if let Err(e) = self.inner.storage.set(key, value) {
            tracing::warn!(error = %e, key, "failed to persist session key");
        }
    }

    fn persist_user(&self, user: &User) {
        match serde_json::to_string(user) {
            Ok(json) => self.persist(USER_KEY, &json),
            Err(e) => tracing::warn!(error = %e, "failed to encode user record"),
        }
    }
}

fn load_session(storage: &dyn Storage) -> Session {
    let token = storage::read_token(storage);
    let user = match storage.get(USER_KEY) {
        Ok(Some(raw)) => serde_json::from_str::<Option<User>>(&raw).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "ignoring malformed persisted user");
            None
        }),
        Ok(None) => None,
        Err(e) => {
            tracing::warn!(error = %e, "failed to read persisted user");
            None
        }
    };
    Session { token, user, generation: 0 }
}
