//! Error types for every layer of the client.
//!
//! ERROR HANDLING
//! ==============
//! Nothing here is fatal to the process. The worst outcome of any failure
//! is a cleared session and a hard navigation to the landing route, which
//! the transport triggers through [`crate::net::events::AuthEvents`] rather
//! than through these values.

use serde_json::Value;

/// Errors produced by API client operations.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),

    /// The request never produced a response (connect, DNS, I/O).
    #[error("API request failed: {0}")]
    Transport(String),

    /// The backend rejected the session. The persisted session has already
    /// been cleared and listeners notified when this is returned.
    #[error("not authenticated")]
    Unauthorized { body: Value },

    /// The backend returned a non-success status. `body` is the backend's
    /// payload, kept opaque.
    #[error("API response error: status {status}")]
    Response { status: u16, body: Value },

    /// The response body could not be deserialized.
    #[error("API response parse failed: {0}")]
    Decode(String),
}

impl ApiError {
    /// HTTP status carried by this error, if the backend answered.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized { .. } => Some(401),
            Self::Response { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Backend error payload, if one was returned.
    #[must_use]
    pub fn body(&self) -> Option<&Value> {
        match self {
            Self::Unauthorized { body } | Self::Response { body, .. } => Some(body),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }
}

/// Errors produced by persistent storage backends.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage file is not a JSON object: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Errors produced by session store operations.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The session changed (logout, login, unauthorized) while the request
    /// was in flight, so its result was discarded.
    #[error("session changed while request was in flight")]
    Superseded,
}

/// Errors produced by route table construction and navigation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouterError {
    #[error("no route matches path {0}")]
    NotFound(String),

    #[error("no route named {0}")]
    UnknownName(String),

    #[error("route {name} requires param {param}")]
    MissingParam { name: String, param: String },

    #[error("duplicate route name {0}")]
    DuplicateName(String),

    #[error("navigation to {0} redirected more than once")]
    RedirectLoop(String),
}

/// Errors produced while reading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid LIVRIA_API_BASE_URL '{value}': {reason}")]
    InvalidBaseUrl { value: String, reason: String },
}

/// Errors produced while assembling the application context.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Router(#[from] RouterError),
}
