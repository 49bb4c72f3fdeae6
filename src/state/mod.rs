//! Shared client-side state modules.
//!
//! DESIGN
//! ======
//! State is split by domain (`auth`, `ui`) so each consumer depends on a
//! small focused model. Both live in `tokio::sync::watch` channels: reads
//! are synchronous, every commit replaces the whole value at once, and
//! observers can subscribe to changes. Stores are explicitly owned handles
//! passed to the router and app context, never process-wide singletons.

pub mod auth;
pub mod ui;

pub use auth::{Session, SessionStore};
pub use ui::{UiState, UiStore};
