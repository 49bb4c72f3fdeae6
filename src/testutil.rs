//! Shared test helpers: an in-process mock of the Livria backend.

use std::sync::{Arc, Mutex};

use axum::Router;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use serde_json::{Value, json};

/// One request as seen by the mock backend.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: Method,
    /// Path below `/api`, e.g. `/auth/users/me`.
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub body: String,
}

impl Recorded {
    pub fn json_body(&self) -> Value {
        serde_json::from_str(&self.body).unwrap_or(Value::Null)
    }
}

type Responder = Arc<dyn Fn(&Recorded) -> (u16, Value) + Send + Sync>;

#[derive(Clone)]
struct MockState {
    requests: Arc<Mutex<Vec<Recorded>>>,
    responder: Responder,
}

pub struct MockBackend {
    pub base_url: String,
    requests: Arc<Mutex<Vec<Recorded>>>,
}

impl MockBackend {
    /// Serve `responder` on an ephemeral local port under `/api`.
    pub async fn spawn(responder: impl Fn(&Recorded) -> (u16, Value) + Send + Sync + 'static) -> Self {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let state = MockState { requests: Arc::clone(&requests), responder: Arc::new(responder) };
        let app = Router::new().fallback(record).with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("mock backend should bind");
        let addr = listener.local_addr().expect("mock backend should have an address");
        tokio::spawn(async move {
            axum::serve(listener, app)
                .await
                .expect("mock backend should serve");
        });

        Self { base_url: format!("http://{addr}/api"), requests }
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.requests
            .lock()
            .expect("mock mutex should lock")
            .clone()
    }

    pub fn last(&self) -> Recorded {
        self.requests()
            .pop()
            .expect("mock backend should have received a request")
    }
}

async fn record(State(state): State<MockState>, method: Method, uri: Uri, headers: HeaderMap, body: String) -> Response {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    let recorded = Recorded {
        method,
        path: uri.path().trim_start_matches("/api").to_string(),
        query: uri.query().map(str::to_string),
        authorization: header("authorization"),
        content_type: header("content-type"),
        body,
    };
    let (status, payload) = (state.responder)(&recorded);
    state
        .requests
        .lock()
        .expect("mock mutex should lock")
        .push(recorded);

    let status = StatusCode::from_u16(status).expect("mock status should be valid");
    if status == StatusCode::NO_CONTENT {
        return status.into_response();
    }
    (status, axum::Json(payload)).into_response()
}

/// Canned backend: `reader@example.com` / `secret` logs in as user 1 with
/// token `T`; `/auth/users/me` requires that token.
pub fn library_backend(request: &Recorded) -> (u16, Value) {
    let authorized = request.authorization.as_deref() == Some("Token T");
    match (request.method.as_str(), request.path.as_str()) {
        ("POST", "/auth/login") => {
            let body = request.json_body();
            if body["email"] == "reader@example.com" && body["password"] == "secret" {
                (200, json!({ "token": "T", "user": { "id": 1, "username": "reader" } }))
            } else {
                (400, json!({ "error": "invalid credentials" }))
            }
        }
        ("POST", "/auth/signup") => {
            let body = request.json_body();
            if body["email"] == "taken@example.com" {
                (400, json!({ "error": "email already exists" }))
            } else {
                (200, json!({ "token": "S", "user": { "id": 2, "email": body["email"] } }))
            }
        }
        (_, "/auth/users/me") if !authorized => {
            (401, json!({ "detail": "Authentication credentials were not provided." }))
        }
        ("GET", "/auth/users/me") => (200, json!({ "id": 1, "username": "reader", "nickname": "bookworm" })),
        ("PATCH", "/auth/users/me") => {
            let mut user = json!({ "id": 1, "username": "reader" });
            if let (Some(target), Some(patch)) = (user.as_object_mut(), request.json_body().as_object()) {
                target.extend(patch.clone());
            }
            (200, user)
        }
        _ => (404, json!({ "detail": "Not found." })),
    }
}
