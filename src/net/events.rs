//! Authorization-failure events emitted by the transport.
//!
//! ARCHITECTURE
//! ============
//! The API client never reaches into session or navigation state. When the
//! backend answers 401 it emits [`AuthEvent::Unauthorized`] here, and the
//! components that own that state (the session store, the router) react in
//! their own listeners. Listeners run synchronously, in subscription order,
//! before the failing call returns to its caller.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthEvent {
    /// The backend rejected the request at `path` as not authenticated.
    Unauthorized { path: String },
}

/// Returns `false` once the listener's owner is gone.
type Listener = Arc<dyn Fn(&AuthEvent) -> bool + Send + Sync>;

/// Cloneable handle to a shared list of event listeners.
#[derive(Clone, Default)]
pub struct AuthEvents {
    listeners: Arc<RwLock<Vec<Listener>>>,
}

impl fmt::Debug for AuthEvents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthEvents")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

impl AuthEvents {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener for the lifetime of the hub.
    pub fn subscribe(&self, listener: impl Fn(&AuthEvent) + Send + Sync + 'static) {
        self.listeners.write().push(Arc::new(move |event: &AuthEvent| {
            listener(event);
            true
        }));
    }

    /// Register a listener on behalf of `owner` without keeping it alive.
    /// Once `owner` is dropped the listener is removed on the next emit.
    pub fn subscribe_weak<T>(&self, owner: &Arc<T>, listener: impl Fn(&Arc<T>, &AuthEvent) + Send + Sync + 'static)
    where
        T: Send + Sync + 'static,
    {
        let owner = Arc::downgrade(owner);
        self.listeners
            .write()
            .push(Arc::new(move |event: &AuthEvent| match owner.upgrade() {
                Some(owner) => {
                    listener(&owner, event);
                    true
                }
                None => false,
            }));
    }

    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.read().len()
    }

    /// Deliver `event` to every listener, then drop listeners whose owner
    /// is gone.
    pub fn emit(&self, event: &AuthEvent) {
        // Snapshot so listeners may subscribe or emit without deadlocking.
        let listeners: Vec<Listener> = self.listeners.read().clone();
        tracing::debug!(?event, listeners = listeners.len(), "auth event");

        let stale: Vec<Listener> = listeners
            .into_iter()
            .filter(|listener| !listener(event))
            .collect();
        if !stale.is_empty() {
            self.listeners
                .write()
                .retain(|l| !stale.iter().any(|s| Arc::ptr_eq(l, s)));
            tracing::debug!(removed = stale.len(), "dropped listeners of released owners");
        }
    }
}

#[cfg(test)]
#[path = "events_test.rs"]
mod tests;
