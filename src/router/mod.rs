//! Client-side navigation.
//!
//! ARCHITECTURE
//! ============
//! [`RouteTable`] maps paths to views, [`guard::evaluate`] decides whether
//! a navigation may proceed, and [`History`] records where the user has
//! been. [`Router`] ties them to the session and UI stores it was handed:
//! every navigation matches the path, consults the guard once, follows at
//! most one redirect, and only then commits to history.
//!
//! A 401 from the backend reaches the router through
//! [`AuthEvents`](crate::net::events::AuthEvents) and triggers a hard
//! navigation to `/`, independent of the guard's own decisions.

pub mod guard;
pub mod history;
pub mod table;

use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::RouterError;
use crate::net::events::{AuthEvent, AuthEvents};
use crate::state::{SessionStore, UiStore};

pub use guard::{GuardDecision, LOGIN_REQUIRED_NOTICE, RedirectReason};
pub use history::{History, Location, NavigationKind};
pub use table::{RouteEntry, RouteMatch, RouteTable, ViewId, names};

/// Outcome of a completed navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    /// Where the navigation actually ended up.
    pub location: Location,
    /// The requested path, when the guard redirected away from it.
    pub redirected_from: Option<String>,
    pub reason: Option<RedirectReason>,
}

impl Navigation {
    #[must_use]
    pub fn was_redirected(&self) -> bool {
        self.redirected_from.is_some()
    }
}

struct Resolved {
    route: RouteMatch,
    redirected_from: Option<String>,
    reason: Option<RedirectReason>,
}

/// Cloneable handle to the application's navigation state.
#[derive(Clone, Debug)]
pub struct Router {
    inner: Arc<RouterInner>,
}

#[derive(Debug)]
struct RouterInner {
    table: RouteTable,
    session: SessionStore,
    ui: UiStore,
    history: Mutex<History>,
}

impl Router {
    #[must_use]
    pub fn new(table: RouteTable, session: SessionStore, ui: UiStore) -> Self {
        Self {
            inner: Arc::new(RouterInner { table, session, ui, history: Mutex::new(History::default()) }),
        }
    }

    #[must_use]
    pub fn table(&self) -> &RouteTable {
        &self.inner.table
    }

    #[must_use]
    pub fn current(&self) -> Option<Location> {
        self.inner.history.lock().current().cloned()
    }

    #[must_use]
    pub fn history_len(&self) -> usize {
        self.inner.history.lock().len()
    }

    /// Navigate to `path`, applying the guard.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::NotFound`] for unknown paths and
    /// [`RouterError::RedirectLoop`] if the guard redirects twice. History
    /// is unchanged on error.
    pub fn push(&self, path: &str) -> Result<Navigation, RouterError> {
        let resolved = self.resolve_guarded(self.lookup(path)?)?;
        self.inner.history.lock().push(resolved.route.clone());
        Ok(Self::navigation(resolved, NavigationKind::Push))
    }

    /// Navigate to the route called `name`.
    ///
    /// # Errors
    ///
    /// Same as [`Router::push`], plus reverse-lookup failures.
    pub fn push_named(&self, name: &str, params: &[(&str, &str)]) -> Result<Navigation, RouterError> {
        let path = self.inner.table.resolve_named(name, params)?;
        self.push(&path)
    }

    /// Reload at `path`, discarding history. The guard still applies.
    ///
    /// # Errors
    ///
    /// Same as [`Router::push`].
    pub fn hard_navigate(&self, path: &str) -> Result<Navigation, RouterError> {
        let resolved = self.resolve_guarded(self.lookup(path)?)?;
        self.inner.history.lock().reset(resolved.route.clone());
        Ok(Self::navigation(resolved, NavigationKind::Hard))
    }

    /// Return to the previous location. The guard runs again, so going back
    /// into a protected view after logout lands on the redirect target.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::RedirectLoop`] if the guard redirects twice.
    /// History is unchanged on error.
    pub fn back(&self) -> Result<Option<Navigation>, RouterError> {
        // Held across the guard so no other navigation lands between the
        // peek and the pop.
        let mut history = self.inner.history.lock();
        let Some(previous) = history.previous().map(|l| l.route.clone()) else {
            return Ok(None);
        };
        let resolved = self.resolve_guarded(previous)?;

        history.back();
        if resolved.redirected_from.is_some() {
            history.replace(resolved.route.clone());
        }
        Ok(Some(Self::navigation(resolved, NavigationKind::Push)))
    }

    /// Hard-navigate to `/` whenever the transport reports an unauthorized
    /// response. Subscribe after the session store so the guard sees the
    /// cleared session.
    pub fn listen(&self, events: &AuthEvents) {
        events.subscribe_weak(&self.inner, |inner, event| {
            let AuthEvent::Unauthorized { path } = event;
            let router = Router { inner: Arc::clone(inner) };
            if let Err(e) = router.hard_navigate("/") {
                tracing::warn!(error = %e, path = %path, "failed to return to landing after unauthorized response");
            }
        });
    }

    fn lookup(&self, path: &str) -> Result<RouteMatch, RouterError> {
        self.inner
            .table
            .match_path(path)
            .ok_or_else(|| RouterError::NotFound(path.to_string()))
    }

    fn resolve_guarded(&self, target: RouteMatch) -> Result<Resolved, RouterError> {
        let authenticated = self.inner.session.is_authenticated();

        let (to, reason) = match guard::evaluate(&target, authenticated) {
            GuardDecision::Proceed => {
                return Ok(Resolved { route: target, redirected_from: None, reason: None });
            }
            GuardDecision::Redirect { to, reason } => (to, reason),
        };

        let redirect = self.lookup(&self.inner.table.resolve_named(to, &[])?)?;
        if guard::evaluate(&redirect, authenticated) != GuardDecision::Proceed {
            tracing::warn!(from = %target.full_path(), to, "redirect loop");
            return Err(RouterError::RedirectLoop(target.full_path()));
        }

        if reason == RedirectReason::LoginRequired {
            self.inner.ui.request_login(LOGIN_REQUIRED_NOTICE);
        }
        tracing::debug!(from = %target.full_path(), to = %redirect.path, ?reason, "navigation redirected");
        Ok(Resolved { route: redirect, redirected_from: Some(target.full_path()), reason: Some(reason) })
    }

    fn navigation(resolved: Resolved, kind: NavigationKind) -> Navigation {
        Navigation {
            location: Location { route: resolved.route, kind },
            redirected_from: resolved.redirected_from,
            reason: resolved.reason,
        }
    }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
