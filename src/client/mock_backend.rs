//! In-process stand-in for the journal backend used by tests.
//!
//! Serves the same routes and payload shapes over real HTTP on an ephemeral
//! port, records the `Authorization` header of every request, and can revoke
//! all tokens to simulate an expired session.

use super::{ClientConfig, JournalClient};
use crate::model::{EntryDraft, LoginForm, RegisterRequest, Sentiment};
use crate::session::Session;
use axum::{
    extract::{Path, Request, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Form, Json, Router,
};
use chrono::{DateTime, Duration, Utc};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::task::JoinHandle;

type Shared = Arc<Mutex<MockState>>;
type HandlerResult = Result<Response, (StatusCode, Json<Value>)>;

#[derive(Default)]
struct MockState {
    users: Vec<MockUser>,
    tokens: HashMap<String, i64>,
    entries: Vec<MockEntry>,
    next_entry_id: i64,
    next_token: u64,
    authorization: Vec<Option<String>>,
}

struct MockUser {
    id: i64,
    username: String,
    email: String,
    password: String,
}

struct MockEntry {
    id: i64,
    owner: i64,
    title: String,
    content: String,
    sentiment: Sentiment,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl MockState {
    fn add_user(&mut self, username: &str, email: &str, password: &str) -> i64 {
        let id = self.users.len() as i64 + 1;
        self.users.push(MockUser {
            id,
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        });
        id
    }

    fn issue_token(&mut self, user_id: i64) -> String {
        self.next_token += 1;
        let token = format!("token-{}-{}", user_id, self.next_token);
        self.tokens.insert(token.clone(), user_id);
        token
    }

    fn user_json(&self, id: i64) -> Value {
        let user = self.users.iter().find(|u| u.id == id);
        match user {
            Some(u) => json!({"id": u.id, "username": u.username, "email": u.email}),
            None => Value::Null,
        }
    }
}

fn naive(dt: &DateTime<Utc>) -> String {
    dt.naive_utc().format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
}

fn entry_json(entry: &MockEntry) -> Value {
    json!({
        "id": entry.id,
        "title": entry.title,
        "content": entry.content,
        "sentiment": entry.sentiment,
        "created_at": naive(&entry.created_at),
        "updated_at": naive(&entry.updated_at),
    })
}

/// Keyword classifier standing in for the backend's sentiment model
fn classify(text: &str) -> Sentiment {
    const POSITIVE: &[&str] = &[
        "happy", "joy", "great", "good", "love", "wonderful", "amazing", "excited", "grateful",
    ];
    const NEGATIVE: &[&str] = &[
        "sad", "bad", "angry", "frustrated", "depressed", "worried", "anxious", "stress",
    ];

    let lower = text.to_lowercase();
    let pos = POSITIVE.iter().filter(|w| lower.contains(*w)).count();
    let neg = NEGATIVE.iter().filter(|w| lower.contains(*w)).count();

    if pos > neg {
        Sentiment::Positive
    } else if neg > pos {
        Sentiment::Negative
    } else {
        Sentiment::Neutral
    }
}

fn error(status: StatusCode, detail: &str) -> (StatusCode, Json<Value>) {
    (status, Json(json!({ "detail": detail })))
}

fn authenticate(state: &MockState, headers: &HeaderMap) -> Result<i64, (StatusCode, Json<Value>)> {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .and_then(|token| state.tokens.get(token).copied())
        .ok_or_else(|| error(StatusCode::UNAUTHORIZED, "Could not validate credentials"))
}

async fn record_authorization(State(state): State<Shared>, request: Request, next: Next) -> Response {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(String::from);
    state.lock().unwrap().authorization.push(header);
    next.run(request).await
}

async fn health() -> Json<Value> {
    Json(json!({"status": "healthy"}))
}

async fn register(State(state): State<Shared>, Json(body): Json<RegisterRequest>) -> HandlerResult {
    let mut state = state.lock().unwrap();
    if state.users.iter().any(|u| u.username == body.username) {
        return Err(error(StatusCode::BAD_REQUEST, "Username already registered"));
    }
    if state.users.iter().any(|u| u.email == body.email) {
        return Err(error(StatusCode::BAD_REQUEST, "Email already registered"));
    }
    let id = state.add_user(&body.username, &body.email, &body.password);
    Ok((StatusCode::CREATED, Json(state.user_json(id))).into_response())
}

async fn login(State(state): State<Shared>, Form(form): Form<LoginForm>) -> HandlerResult {
    let mut state = state.lock().unwrap();
    let user_id = state
        .users
        .iter()
        .find(|u| u.username == form.username && u.password == form.password)
        .map(|u| u.id)
        .ok_or_else(|| error(StatusCode::UNAUTHORIZED, "Incorrect username or password"))?;
    let token = state.issue_token(user_id);
    Ok(Json(json!({"access_token": token, "token_type": "bearer"})).into_response())
}

async fn me(State(state): State<Shared>, headers: HeaderMap) -> HandlerResult {
    let state = state.lock().unwrap();
    let user_id = authenticate(&state, &headers)?;
    Ok(Json(state.user_json(user_id)).into_response())
}

async fn list_entries(State(state): State<Shared>, headers: HeaderMap) -> HandlerResult {
    let state = state.lock().unwrap();
    let user_id = authenticate(&state, &headers)?;
    let mut entries: Vec<&MockEntry> = state.entries.iter().filter(|e| e.owner == user_id).collect();
    entries.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
    let body: Vec<Value> = entries.into_iter().map(entry_json).collect();
    Ok(Json(Value::Array(body)).into_response())
}

async fn create_entry(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(draft): Json<EntryDraft>,
) -> HandlerResult {
    let mut state = state.lock().unwrap();
    let user_id = authenticate(&state, &headers)?;
    state.next_entry_id += 1;
    // Spread creation times so ordering is deterministic
    let created_at = Utc::now() + Duration::milliseconds(state.next_entry_id);
    let entry = MockEntry {
        id: state.next_entry_id,
        owner: user_id,
        sentiment: classify(&draft.content),
        title: draft.title,
        content: draft.content,
        created_at,
        updated_at: created_at,
    };
    let body = entry_json(&entry);
    state.entries.push(entry);
    Ok((StatusCode::CREATED, Json(body)).into_response())
}

async fn get_entry(State(state): State<Shared>, headers: HeaderMap, Path(id): Path<i64>) -> HandlerResult {
    let state = state.lock().unwrap();
    let user_id = authenticate(&state, &headers)?;
    state
        .entries
        .iter()
        .find(|e| e.id == id && e.owner == user_id)
        .map(|e| Json(entry_json(e)).into_response())
        .ok_or_else(|| error(StatusCode::NOT_FOUND, "Entry not found"))
}

async fn update_entry(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(draft): Json<EntryDraft>,
) -> HandlerResult {
    let mut state = state.lock().unwrap();
    let user_id = authenticate(&state, &headers)?;
    let entry = state
        .entries
        .iter_mut()
        .find(|e| e.id == id && e.owner == user_id)
        .ok_or_else(|| error(StatusCode::NOT_FOUND, "Entry not found"))?;
    entry.sentiment = classify(&draft.content);
    entry.title = draft.title;
    entry.content = draft.content;
    entry.updated_at = Utc::now();
    Ok(Json(entry_json(entry)).into_response())
}

async fn delete_entry(State(state): State<Shared>, headers: HeaderMap, Path(id): Path<i64>) -> HandlerResult {
    let mut state = state.lock().unwrap();
    let user_id = authenticate(&state, &headers)?;
    let index = state
        .entries
        .iter()
        .position(|e| e.id == id && e.owner == user_id)
        .ok_or_else(|| error(StatusCode::NOT_FOUND, "Entry not found"))?;
    state.entries.remove(index);
    Ok(StatusCode::NO_CONTENT.into_response())
}

async fn summary(State(state): State<Shared>, headers: HeaderMap) -> HandlerResult {
    let state = state.lock().unwrap();
    let user_id = authenticate(&state, &headers)?;
    let mine: Vec<&MockEntry> = state.entries.iter().filter(|e| e.owner == user_id).collect();
    let count = |s: Sentiment| mine.iter().filter(|e| e.sentiment == s).count();
    let (positive, neutral, negative) = (
        count(Sentiment::Positive),
        count(Sentiment::Neutral),
        count(Sentiment::Negative),
    );
    let total = mine.len();

    let average = if total == 0 {
        Sentiment::Neutral
    } else {
        let score = (positive * 2 + neutral) as f64 / total as f64;
        if score >= 1.5 {
            Sentiment::Positive
        } else if score >= 0.5 {
            Sentiment::Neutral
        } else {
            Sentiment::Negative
        }
    };

    Ok(Json(json!({
        "positive": positive,
        "neutral": neutral,
        "negative": negative,
        "total": total,
        "average_sentiment": average,
    }))
    .into_response())
}

/// A running mock backend; the server task stops when this is dropped
pub(crate) struct MockBackend {
    addr: std::net::SocketAddr,
    state: Shared,
    handle: JoinHandle<()>,
}

impl MockBackend {
    pub(crate) async fn start() -> Self {
        let state: Shared = Arc::new(Mutex::new(MockState::default()));

        let router = Router::new()
            .route("/health", get(health))
            .route("/api/auth/register", post(register))
            .route("/api/auth/login", post(login))
            .route("/api/auth/me", get(me))
            .route("/api/entries", get(list_entries).post(create_entry))
            .route("/api/entries/stats/summary", get(summary))
            .route(
                "/api/entries/:id",
                get(get_entry).put(update_entry).delete(delete_entry),
            )
            .layer(middleware::from_fn_with_state(
                Arc::clone(&state),
                record_authorization,
            ))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        Self { addr, state, handle }
    }

    pub(crate) fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub(crate) fn client(&self, session: Arc<Session>) -> JournalClient {
        let config = ClientConfig {
            base_url: self.base_url(),
            request_timeout_ms: 5000,
        };
        JournalClient::new(config, session).unwrap()
    }

    /// Register a user directly and hand out a valid token for them
    pub(crate) fn create_user_with_token(&self, username: &str, email: &str, password: &str) -> String {
        let mut state = self.state.lock().unwrap();
        let id = state.add_user(username, email, password);
        state.issue_token(id)
    }

    /// Invalidate every issued token
    pub(crate) fn revoke_tokens(&self) {
        self.state.lock().unwrap().tokens.clear();
    }

    /// `Authorization` header of each request received, in order
    pub(crate) fn authorization_headers(&self) -> Vec<Option<String>> {
        self.state.lock().unwrap().authorization.clone()
    }
}

impl Drop for MockBackend {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
