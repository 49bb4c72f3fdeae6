//! Network layer: backend payload types, the REST client, and the
//! authorization-failure event hub the client emits into.

pub mod api;
pub mod events;
pub mod types;

pub use api::{ApiClient, AuthApi};
pub use events::{AuthEvent, AuthEvents};
