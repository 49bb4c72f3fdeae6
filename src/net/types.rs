//! Backend payload types.
//!
//! Response types are tolerant views of the backend's JSON: every field the
//! client does not strictly need is optional or defaulted, so additive
//! backend changes never break decoding. [`User`] also keeps unknown fields
//! so a persisted record round-trips unchanged.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// =============================================================================
// USERS & AUTH
// =============================================================================

/// Profile record of the signed-in user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub nickname: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    /// ISO date, `YYYY-MM-DD`.
    #[serde(default)]
    pub birthdate: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub status_message: Option<String>,
    /// Uploaded avatar URL; empty when the user has none.
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub default_avatar: Option<String>,
    #[serde(default)]
    pub occupation: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub interests: Option<String>,
    #[serde(default)]
    pub favorites: Vec<Book>,
    #[serde(default)]
    pub read_books: Vec<Book>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl User {
    /// Name to show in the UI: nickname, then name, then username.
    #[must_use]
    pub fn display_name(&self) -> &str {
        [&self.nickname, &self.name, &self.username]
            .into_iter()
            .filter_map(Option::as_deref)
            .find(|s| !s.is_empty())
            .unwrap_or("")
    }

    #[must_use]
    pub fn has_favorite(&self, book_id: i64) -> bool {
        self.favorites.iter().any(|b| b.id == book_id)
    }

    #[must_use]
    pub fn has_read(&self, book_id: i64) -> bool {
        self.read_books.iter().any(|b| b.id == book_id)
    }
}

/// Successful login/signup response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthPayload {
    pub token: String,
    pub user: User,
}

/// Login request body.
#[derive(Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self { email: email.into(), password: password.into() }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Signup request body. Only `email` and `password` are required.
#[derive(Clone, Default, Serialize)]
pub struct SignupData {
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birthdate: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub occupation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interests: Option<String>,
}

impl fmt::Debug for SignupData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignupData")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("name", &self.name)
            .field("nickname", &self.nickname)
            .finish_non_exhaustive()
    }
}

/// Partial profile update. Absent fields are not sent and stay unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UserUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birthdate: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_avatar: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub occupation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interests: Option<String>,
}

// =============================================================================
// BOOKS & METADATA
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub id: i64,
    #[serde(default)]
    pub name: String,
}

/// A category. Nested inside a book only `id` and `name` are present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub books: Vec<Book>,
}

/// A genre. Nested inside a book only `id` and `name` are present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Genre {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub books: Vec<Book>,
}

/// Minimal book card used for "similar books".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookRef {
    pub id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub cover_url: Option<String>,
    #[serde(default)]
    pub author_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    pub id: i64,
    #[serde(default)]
    pub isbn: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub publisher: Option<String>,
    #[serde(default)]
    pub cover_url: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub pub_date: Option<String>,
    #[serde(default)]
    pub category: Option<Category>,
    #[serde(default)]
    pub category_name: Option<String>,
    #[serde(default)]
    pub genre: Option<Genre>,
    #[serde(default)]
    pub genre_name: Option<String>,
    #[serde(default)]
    pub author: Option<Author>,
    #[serde(default)]
    pub author_name: Option<String>,
    #[serde(default)]
    pub global_recommend_count: Option<i64>,
    #[serde(default)]
    pub similar_books: Vec<BookRef>,
    #[serde(default)]
    pub reviews: Vec<Review>,
    #[serde(default)]
    pub review_count: Option<i64>,
}

/// Book listing filters, sent as query parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BookQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genre: Option<i64>,
}

impl BookQuery {
    #[must_use]
    pub fn search(term: impl Into<String>) -> Self {
        Self { search: Some(term.into()), ..Self::default() }
    }
}

// =============================================================================
// REVIEWS
// =============================================================================

/// A review or a reply to one. Replies nest one level deep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub id: i64,
    #[serde(default)]
    pub book_id: Option<i64>,
    #[serde(default)]
    pub book: Option<i64>,
    #[serde(default)]
    pub book_cover_url: Option<String>,
    #[serde(default)]
    pub parent: Option<i64>,
    #[serde(default)]
    pub parent_id: Option<i64>,
    /// Author's username.
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub user_nickname: Option<String>,
    #[serde(default)]
    pub user_avatar: Option<String>,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub replies: Vec<Review>,
}

/// New review body. Set `parent` to reply to an existing top-level review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewReview {
    pub book: i64,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<i64>,
}

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;
