//! Application context.
//!
//! [`App`] owns one instance of every client component and wires them
//! together. Nothing here is global: tests build as many independent apps
//! as they like, each over its own storage.

use std::sync::Arc;

use crate::config::LivriaConfig;
use crate::error::AppError;
use crate::net::api::{ApiClient, AuthApi};
use crate::net::events::AuthEvents;
use crate::router::{RouteTable, Router};
use crate::state::{SessionStore, UiStore};
use crate::storage::{FileStorage, MemoryStorage, Storage};

#[derive(Clone, Debug)]
pub struct App {
    pub config: LivriaConfig,
    pub storage: Arc<dyn Storage>,
    pub events: AuthEvents,
    pub api: Arc<ApiClient>,
    pub session: SessionStore,
    pub ui: UiStore,
    pub router: Router,
}

impl App {
    /// Build the context from `config`, opening the file store at
    /// `storage_path` when one is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage file is unreadable or corrupt, or if
    /// the HTTP client cannot be built.
    pub fn new(config: LivriaConfig) -> Result<Self, AppError> {
        let storage: Arc<dyn Storage> = match &config.storage_path {
            Some(path) => Arc::new(FileStorage::open(path)?),
            None => Arc::new(MemoryStorage::new()),
        };
        Self::with_storage(config, storage)
    }

    /// Build the context over an existing storage backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn with_storage(config: LivriaConfig, storage: Arc<dyn Storage>) -> Result<Self, AppError> {
        let events = AuthEvents::new();
        let api = Arc::new(ApiClient::new(config.api_base_url.clone(), Arc::clone(&storage), events.clone())?);
        let auth_api: Arc<dyn AuthApi> = api.clone();
        let session = SessionStore::new(auth_api, Arc::clone(&storage));
        let ui = UiStore::new();
        let router = Router::new(RouteTable::library()?, session.clone(), ui.clone());

        // Listeners run in subscription order: the session must be cleared
        // before the router re-runs the guard for `/`.
        session.listen(&events);
        router.listen(&events);

        tracing::info!(
            api_base_url = %config.api_base_url,
            persistent = config.storage_path.is_some(),
            authenticated = session.is_authenticated(),
            "client initialized"
        );
        Ok(Self { config, storage, events, api, session, ui, router })
    }
}

#[cfg(test)]
#[path = "app_test.rs"]
mod tests;
