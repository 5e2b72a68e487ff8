//! Journal REST API Client
//!
//! Every call to the journal backend goes through [`JournalClient`]:
//!
//! - the session token, when present, is attached as a bearer credential;
//! - a 401 response clears the token it was sent with and surfaces as
//!   [`ClientError::Unauthorized`], leaving the navigation decision to the
//!   caller;
//! - other failures carry the backend's `detail` message unchanged.
//!
//! Operations are grouped like the backend's routers: [`AuthApi`] and
//! [`EntriesApi`]. There is no retry, backoff or caching.

mod auth;
mod entries;
mod error;
#[cfg(test)]
pub(crate) mod mock_backend;

pub use auth::AuthApi;
pub use entries::EntriesApi;
pub use error::ClientError;

use crate::model::HealthStatus;
use crate::session::Session;
use error::extract_detail;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

/// Header carrying the per-request correlation id
pub const REQUEST_ID_HEADER: &str = "X-Request-Id";

/// Configuration for the journal client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the journal backend (e.g., "http://localhost:8000")
    pub base_url: String,
    /// Request timeout in milliseconds
    pub request_timeout_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            request_timeout_ms: 30_000,
        }
    }
}

/// Session-aware client for the journal backend
pub struct JournalClient {
    http: Client,
    config: ClientConfig,
    session: Arc<Session>,
}

impl JournalClient {
    /// Create a client that authenticates with the given session
    pub fn new(config: ClientConfig, session: Arc<Session>) -> Result<Self, ClientError> {
        let http = Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .user_agent(concat!("wellbeing-journal/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            config,
            session,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    /// Registration, login and identity
    pub fn auth(&self) -> AuthApi<'_> {
        AuthApi::new(self)
    }

    /// Journal entry CRUD and summary statistics
    pub fn entries(&self) -> EntriesApi<'_> {
        EntriesApi::new(self)
    }

    /// Check that the backend is up
    pub async fn health(&self) -> Result<HealthStatus, ClientError> {
        self.fetch(self.request(Method::GET, "/health")).await
    }

    pub(crate) fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.config.base_url.trim_end_matches('/'), path);
        self.http.request(method, url)
    }

    /// Send a request with the session token and map the response status.
    pub(crate) async fn execute(&self, builder: RequestBuilder) -> Result<Response, ClientError> {
        let token = self.session.token().await;
        let request_id = Uuid::new_v4().to_string();

        let mut builder = builder.header(REQUEST_ID_HEADER, &request_id);
        if let Some(token) = &token {
            builder = builder.bearer_auth(token);
        }
        let request = builder.build()?;

        let method = request.method().clone();
        let path = request.url().path().to_string();
        tracing::debug!(
            request_id = %request_id,
            method = %method,
            path = %path,
            authenticated = token.is_some(),
            "Sending request"
        );

        let response = self
            .http
            .execute(request)
            .await
            .map_err(ClientError::transport)?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            let detail = extract_detail(&response.text().await.unwrap_or_default());
            if let Some(token) = token {
                match self.session.expire(&token).await {
                    Ok(true) => tracing::warn!(
                        request_id = %request_id,
                        path = %path,
                        "Session rejected by backend, token cleared"
                    ),
                    Ok(false) => {}
                    Err(e) => tracing::warn!(
                        request_id = %request_id,
                        path = %path,
                        error = %e,
                        "Session rejected by backend, stored token could not be cleared"
                    ),
                }
            }
            return Err(ClientError::Unauthorized { detail });
        }

        if !status.is_success() {
            let detail = extract_detail(&response.text().await.unwrap_or_default());
            tracing::debug!(
                request_id = %request_id,
                status = status.as_u16(),
                detail = ?detail,
                "Request failed"
            );
            return Err(ClientError::Api {
                status: status.as_u16(),
                detail,
            });
        }

        Ok(response)
    }

    /// Send a request and decode a JSON body
    pub(crate) async fn fetch<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
    ) -> Result<T, ClientError> {
        let response = self.execute(builder).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| ClientError::Decode(e.to_string()))
    }
}
