//! # Wellbeing Journal
//!
//! Client for a personal journaling service that classifies the sentiment of
//! each entry and aggregates a mood summary. The service does all of the
//! analysis; this crate signs the user in, moves entries back and forth, and
//! renders what comes back.
//!
//! ## Features
//!
//! - **Session-aware client**: bearer token on every request, uniform
//!   handling of expired sessions
//! - **Persistent session**: token kept in a small file under a fixed key
//! - **Dashboard**: summary cards, mood trend chart and entry cards for the terminal
//!
//! ## Modules
//!
//! - [`client`]: REST client for the journal backend
//! - [`session`]: Session token ownership and storage
//! - [`app`]: View state and reactions to client results
//! - [`views`]: Text rendering of the dashboard
//! - [`config`]: TOML configuration with environment overrides
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use wellbeing_journal::{ClientConfig, FileTokenStore, JournalClient, Session};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let session = Arc::new(Session::restore(FileTokenStore::new("session.json")).await?);
//!     let client = JournalClient::new(ClientConfig::default(), session)?;
//!
//!     client.auth().login("alice", "secret1").await?;
//!     client.entries().create("Morning", "Coffee on the balcony").await?;
//!
//!     let summary = client.entries().summary().await?;
//!     println!("{} entries, mostly {}", summary.total, summary.average_sentiment);
//!
//!     Ok(())
//! }
//! ```

pub mod app;
pub mod client;
pub mod config;
pub mod model;
pub mod session;
pub mod validation;
pub mod views;

pub use app::{ActionError, App, DashboardData, View};

pub use client::{AuthApi, ClientConfig, ClientError, EntriesApi, JournalClient};

pub use config::{ApiConfig, Config, ConfigError, LoggingConfig, SessionConfig};

pub use model::{Entry, EntryDraft, HealthStatus, Sentiment, Summary, User};

pub use session::{
    FileTokenStore, MemoryTokenStore, Session, SessionError, SessionStatus, TokenStore, TOKEN_KEY,
};

pub use validation::ValidationError;
