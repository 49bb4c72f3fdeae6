//! REST client for the Livria backend.
//!
//! Every request reads the persisted token and, when present, sends it as
//! `Authorization: Token <value>`. Every 401 response clears the persisted
//! session keys and emits [`AuthEvent::Unauthorized`] before the call
//! returns its error, no matter which helper issued it.
//!
//! ERROR HANDLING
//! ==============
//! No retries, no backoff, no timeout override. Non-success responses carry
//! the backend payload untouched in [`ApiError::Response`]; presenting it is
//! the caller's job.

use std::sync::Arc;

use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::events::{AuthEvent, AuthEvents};
use super::types::{
    AuthPayload, Author, Book, BookQuery, BookRef, Category, Credentials, Genre, NewReview, Review, SignupData, User,
    UserUpdate,
};
use crate::error::ApiError;
use crate::storage::{self, Storage};

// =============================================================================
// AUTH SEAM
// =============================================================================

/// The calls the session store depends on.
///
/// [`ApiClient`] is the production implementation; tests substitute
/// scripted mocks.
#[async_trait::async_trait]
pub trait AuthApi: Send + Sync {
    async fn login(&self, credentials: &Credentials) -> Result<AuthPayload, ApiError>;
    async fn signup(&self, data: &SignupData) -> Result<AuthPayload, ApiError>;
    async fn me(&self) -> Result<User, ApiError>;
    async fn update_me(&self, update: &UserUpdate) -> Result<User, ApiError>;
}

// =============================================================================
// CLIENT
// =============================================================================

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    storage: Arc<dyn Storage>,
    events: AuthEvents,
}

impl ApiClient {
    /// Build a client rooted at `base_url` (e.g. `http://127.0.0.1:8001/api`).
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(base_url: impl Into<String>, storage: Arc<dyn Storage>, events: AuthEvents) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| ApiError::HttpClientBuild(e.to_string()))?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { http, base_url, storage, events })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[must_use]
    pub fn events(&self) -> &AuthEvents {
        &self.events
    }

    pub fn auth(&self) -> AuthCalls<'_> {
        AuthCalls(self)
    }

    pub fn books(&self) -> BookCalls<'_> {
        BookCalls(self)
    }

    pub fn reviews(&self) -> ReviewCalls<'_> {
        ReviewCalls(self)
    }

    pub fn user_books(&self) -> UserBookCalls<'_> {
        UserBookCalls(self)
    }

    pub fn recommendations(&self) -> RecommendationCalls<'_> {
        RecommendationCalls(self)
    }

    pub fn meta(&self) -> MetaCalls<'_> {
        MetaCalls(self)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let request = self.http.request(method, format!("{}{}", self.base_url, path));
        match storage::read_token(self.storage.as_ref()) {
            Some(token) => request.header(AUTHORIZATION, format!("Token {token}")),
            None => request,
        }
    }

    async fn send(&self, path: &str, request: RequestBuilder) -> Result<String, ApiError> {
        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        tracing::debug!(path, status = status.as_u16(), "api response");

        if status == StatusCode::UNAUTHORIZED {
            self.handle_unauthorized(path);
            return Err(ApiError::Unauthorized { body: error_body(&text) });
        }
        if !status.is_success() {
            return Err(ApiError::Response { status: status.as_u16(), body: error_body(&text) });
        }
        Ok(text)
    }

    fn handle_unauthorized(&self, path: &str) {
        tracing::warn!(path, "backend rejected session; clearing persisted credentials");
        storage::clear_session_keys(self.storage.as_ref());
        self.events
            .emit(&AuthEvent::Unauthorized { path: path.to_string() });
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let text = self.send(path, self.request(Method::GET, path)).await?;
        decode(&text)
    }

    async fn get_with<T: DeserializeOwned, Q: Serialize + ?Sized>(&self, path: &str, query: &Q) -> Result<T, ApiError> {
        let text = self
            .send(path, self.request(Method::GET, path).query(query))
            .await?;
        decode(&text)
    }

    async fn send_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let text = self.send(path, self.request(method, path).json(body)).await?;
        decode(&text)
    }

    /// Send a bodiless request whose response payload is not needed.
    async fn send_unit(&self, method: Method, path: &str) -> Result<(), ApiError> {
        self.send(path, self.request(method, path)).await?;
        Ok(())
    }
}

fn decode<T: DeserializeOwned>(text: &str) -> Result<T, ApiError> {
    serde_json::from_str(text).map_err(|e| ApiError::Decode(e.to_string()))
}

/// Keep the backend's error payload opaque: JSON when it parses, the raw
/// text otherwise, `null` when empty.
fn error_body(text: &str) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}

#[async_trait::async_trait]
impl AuthApi for ApiClient {
    async fn login(&self, credentials: &Credentials) -> Result<AuthPayload, ApiError> {
        self.auth().login(credentials).await
    }

    async fn signup(&self, data: &SignupData) -> Result<AuthPayload, ApiError> {
        self.auth().signup(data).await
    }

    async fn me(&self) -> Result<User, ApiError> {
        self.auth().me().await
    }

    async fn update_me(&self, update: &UserUpdate) -> Result<User, ApiError> {
        self.auth().update_me(update).await
    }
}

// =============================================================================
// CALL GROUPS
// =============================================================================

/// Signup, login, and the current-user record.
#[derive(Debug, Clone, Copy)]
pub struct AuthCalls<'a>(&'a ApiClient);

impl AuthCalls<'_> {
    pub async fn signup(&self, data: &SignupData) -> Result<AuthPayload, ApiError> {
        self.0.send_json(Method::POST, "/auth/signup", data).await
    }

    pub async fn login(&self, credentials: &Credentials) -> Result<AuthPayload, ApiError> {
        self.0
            .send_json(Method::POST, "/auth/login", credentials)
            .await
    }

    pub async fn me(&self) -> Result<User, ApiError> {
        self.0.get("/auth/users/me").await
    }

    pub async fn update_me(&self, update: &UserUpdate) -> Result<User, ApiError> {
        self.0
            .send_json(Method::PATCH, "/auth/users/me", update)
            .await
    }
}

#[derive(Debug, Clone, Copy)]
pub struct BookCalls<'a>(&'a ApiClient);

impl BookCalls<'_> {
    pub async fn list(&self, query: &BookQuery) -> Result<Vec<Book>, ApiError> {
        self.0.get_with("/books/", query).await
    }

    pub async fn get(&self, id: i64) -> Result<Book, ApiError> {
        self.0.get(&format!("/books/{id}/")).await
    }

    pub async fn best_sellers(&self) -> Result<Vec<Book>, ApiError> {
        self.0.get("/books/best-sellers/").await
    }

    pub async fn top_recommended(&self) -> Result<Vec<Book>, ApiError> {
        self.0.get("/books/top-recommended/").await
    }

    pub async fn age_based(&self, age: u32) -> Result<Vec<Book>, ApiError> {
        self.0.get_with("/books/age-based/", &[("age", age)]).await
    }

    pub async fn similar(&self, id: i64) -> Result<Vec<BookRef>, ApiError> {
        self.0.get(&format!("/books/{id}/similar/")).await
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ReviewCalls<'a>(&'a ApiClient);

impl ReviewCalls<'_> {
    pub async fn list(&self, book_id: i64) -> Result<Vec<Review>, ApiError> {
        self.0.get_with("/reviews/", &[("book", book_id)]).await
    }

    pub async fn create(&self, review: &NewReview) -> Result<Review, ApiError> {
        self.0.send_json(Method::POST, "/reviews/", review).await
    }

    pub async fn update(&self, id: i64, content: &str) -> Result<Review, ApiError> {
        #[derive(Serialize)]
        struct ContentPatch<'a> {
            content: &'a str,
        }
        self.0
            .send_json(Method::PATCH, &format!("/reviews/{id}/"), &ContentPatch { content })
            .await
    }

    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        self.0
            .send_unit(Method::DELETE, &format!("/reviews/{id}/"))
            .await
    }
}

/// Favorite and read-book toggles for the signed-in user.
#[derive(Debug, Clone, Copy)]
pub struct UserBookCalls<'a>(&'a ApiClient);

impl UserBookCalls<'_> {
    pub async fn add_favorite(&self, book_id: i64) -> Result<(), ApiError> {
        self.0
            .send_unit(Method::POST, &format!("/auth/users/me/favorites/{book_id}"))
            .await
    }

    pub async fn remove_favorite(&self, book_id: i64) -> Result<(), ApiError> {
        self.0
            .send_unit(Method::DELETE, &format!("/auth/users/me/favorites/{book_id}"))
            .await
    }

    pub async fn favorites(&self) -> Result<Vec<Book>, ApiError> {
        self.0.get("/auth/users/me/favorites").await
    }

    pub async fn add_read_book(&self, book_id: i64) -> Result<(), ApiError> {
        self.0
            .send_unit(Method::POST, &format!("/auth/users/me/read_books/{book_id}"))
            .await
    }

    pub async fn remove_read_book(&self, book_id: i64) -> Result<(), ApiError> {
        self.0
            .send_unit(Method::DELETE, &format!("/auth/users/me/read_books/{book_id}"))
            .await
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RecommendationCalls<'a>(&'a ApiClient);

impl RecommendationCalls<'_> {
    /// Books picked for the signed-in user from their profile and history.
    pub async fn personalized(&self) -> Result<Vec<Book>, ApiError> {
        self.0.get("/recommendations/me/").await
    }
}

/// Flat category, genre, and author lists.
#[derive(Debug, Clone, Copy)]
pub struct MetaCalls<'a>(&'a ApiClient);

impl MetaCalls<'_> {
    pub async fn categories(&self) -> Result<Vec<Category>, ApiError> {
        self.0.get("/categories/").await
    }

    pub async fn genres(&self) -> Result<Vec<Genre>, ApiError> {
        self.0.get("/genres/").await
    }

    pub async fn authors(&self) -> Result<Vec<Author>, ApiError> {
        self.0.get("/authors/").await
    }
}

#[cfg(test)]
#[path = "api_test.rs"]
mod tests;
