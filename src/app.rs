//! Application controller
//!
//! Holds the view the user is on and the dashboard data fetched for it, and
//! turns client results into what the front end shows. Session expiry is
//! decided here: an unauthorized response (or a `LoggedOut` status seen on
//! the session channel) while on the dashboard sends the user back to login.

use crate::client::{ClientError, JournalClient};
use crate::model::{Entry, Summary, User};
use crate::session::SessionStatus;
use crate::validation::ValidationError;
use serde::Serialize;
use thiserror::Error;
use tokio::sync::watch;

pub const LOGIN_FAILED: &str = "Login failed. Please try again.";
pub const REGISTRATION_FAILED: &str = "Registration failed. Please try again.";
pub const LOAD_FAILED: &str = "Failed to load entries";
pub const SAVE_FAILED: &str = "Failed to save entry";
pub const DELETE_FAILED: &str = "Failed to delete entry";
pub const PROFILE_FAILED: &str = "Failed to load profile";

/// Top-level views
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Login,
    Register,
    Dashboard,
}

/// Entries and summary shown on the dashboard, fetched together
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardData {
    pub entries: Vec<Entry>,
    pub summary: Summary,
}

/// Outcome of a failed user action
#[derive(Debug, Error)]
pub enum ActionError {
    /// A form constraint failed; nothing was sent
    #[error("{0}")]
    Invalid(ValidationError),

    /// The action failed; the message is ready to display
    #[error("{0}")]
    Failed(String),

    /// The session is gone and the view has moved to login
    #[error("Your session has expired. Please log in again.")]
    SessionExpired,

    /// The action needs a signed-in user
    #[error("You are not logged in.")]
    LoginRequired,
}

pub struct App {
    client: JournalClient,
    view: View,
    dashboard: Option<DashboardData>,
    session_status: watch::Receiver<SessionStatus>,
}

impl App {
    /// Start on the dashboard when a token is already stored, else on login
    pub fn new(client: JournalClient) -> Self {
        let session_status = client.session().subscribe();
        let view = if client.session().is_logged_in() {
            View::Dashboard
        } else {
            View::Login
        };

        Self {
            client,
            view,
            dashboard: None,
            session_status,
        }
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn client(&self) -> &JournalClient {
        &self.client
    }

    pub fn dashboard(&self) -> Option<&DashboardData> {
        self.dashboard.as_ref()
    }

    pub fn show_login(&mut self) {
        self.view = View::Login;
    }

    pub fn show_register(&mut self) {
        self.view = View::Register;
    }

    /// React to session transitions published by the client.
    ///
    /// Returns `true` when the user was sent back to the login view.
    pub fn observe_session(&mut self) -> bool {
        if !self.session_status.has_changed().unwrap_or(false) {
            return false;
        }
        let status = *self.session_status.borrow_and_update();
        if status == SessionStatus::LoggedOut && self.view == View::Dashboard {
            self.leave_dashboard();
            return true;
        }
        false
    }

    pub async fn login(&mut self, username: &str, password: &str) -> Result<(), ActionError> {
        self.view = View::Login;
        if let Err(e) = self.client.auth().login(username, password).await {
            return Err(self.fail(e, LOGIN_FAILED));
        }
        self.enter_dashboard();
        Ok(())
    }

    /// Create an account and sign straight in
    pub async fn register(
        &mut self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<(), ActionError> {
        self.view = View::Register;
        let result: Result<(), ClientError> = async {
            self.client.auth().register(username, email, password).await?;
            self.client.auth().login(username, password).await
        }
        .await;

        if let Err(e) = result {
            return Err(self.fail(e, REGISTRATION_FAILED));
        }
        self.enter_dashboard();
        Ok(())
    }

    /// Forget the session; a token that cannot be removed keeps the user signed in
    pub async fn logout(&mut self) -> Result<(), ActionError> {
        if let Err(e) = self.client.auth().logout().await {
            return Err(ActionError::Failed(e.to_string()));
        }
        self.leave_dashboard();
        Ok(())
    }

    pub async fn current_user(&mut self) -> Result<User, ActionError> {
        self.require_dashboard()?;
        match self.client.auth().current_user().await {
            Ok(user) => Ok(user),
            Err(e) => Err(self.fail(e, PROFILE_FAILED)),
        }
    }

    /// Fetch entries and summary concurrently and keep them for rendering
    pub async fn load_dashboard(&mut self) -> Result<&DashboardData, ActionError> {
        self.require_dashboard()?;

        let entries_api = self.client.entries();
        let result = tokio::try_join!(entries_api.list(), entries_api.summary());

        match result {
            Ok((entries, summary)) => {
                tracing::debug!(entries = entries.len(), total = summary.total, "Dashboard loaded");
                Ok(self.dashboard.insert(DashboardData { entries, summary }))
            }
            Err(e) => Err(self.fail(e, LOAD_FAILED)),
        }
    }

    /// Entries alone, without the summary
    pub async fn list_entries(&mut self) -> Result<Vec<Entry>, ActionError> {
        self.require_dashboard()?;
        match self.client.entries().list().await {
            Ok(entries) => Ok(entries),
            Err(e) => Err(self.fail(e, LOAD_FAILED)),
        }
    }

    /// Summary alone, without the entry list
    pub async fn summary(&mut self) -> Result<Summary, ActionError> {
        self.require_dashboard()?;
        match self.client.entries().summary().await {
            Ok(summary) => Ok(summary),
            Err(e) => Err(self.fail(e, LOAD_FAILED)),
        }
    }

    pub async fn entry(&mut self, id: i64) -> Result<Entry, ActionError> {
        self.require_dashboard()?;
        match self.client.entries().get(id).await {
            Ok(entry) => Ok(entry),
            Err(e) => Err(self.fail(e, LOAD_FAILED)),
        }
    }

    /// Create a new entry, or update `existing`, then refresh the dashboard
    pub async fn save_entry(
        &mut self,
        existing: Option<i64>,
        title: &str,
        content: &str,
    ) -> Result<Entry, ActionError> {
        self.require_dashboard()?;

        let result = match existing {
            Some(id) => self.client.entries().update(id, title, content).await,
            None => self.client.entries().create(title, content).await,
        };

        match result {
            Ok(entry) => {
                self.refresh().await;
                Ok(entry)
            }
            Err(e) => Err(self.fail(e, SAVE_FAILED)),
        }
    }

    pub async fn delete_entry(&mut self, id: i64) -> Result<(), ActionError> {
        self.require_dashboard()?;

        match self.client.entries().delete(id).await {
            Ok(()) => {
                self.refresh().await;
                Ok(())
            }
            Err(e) => Err(self.fail(e, DELETE_FAILED)),
        }
    }

    /// Reload after a write; a failed reload keeps the previous data
    async fn refresh(&mut self) {
        if let Err(e) = self.load_dashboard().await {
            tracing::warn!(error = %e, "Failed to refresh dashboard");
        }
    }

    fn require_dashboard(&mut self) -> Result<(), ActionError> {
        self.observe_session();
        if self.view == View::Dashboard {
            Ok(())
        } else {
            Err(ActionError::LoginRequired)
        }
    }

    fn enter_dashboard(&mut self) {
        self.view = View::Dashboard;
        self.dashboard = None;
        // Our own login is not news
        self.session_status.borrow_and_update();
    }

    fn leave_dashboard(&mut self) {
        self.view = View::Login;
        self.dashboard = None;
        self.session_status.borrow_and_update();
    }

    fn fail(&mut self, error: ClientError, fallback: &str) -> ActionError {
        match error {
            ClientError::Validation(e) => ActionError::Invalid(e),
            ClientError::Unauthorized { .. } if self.view == View::Dashboard => {
                tracing::info!("Session expired, returning to login");
                self.leave_dashboard();
                ActionError::SessionExpired
            }
            other => {
                tracing::debug!(error = %other, "Action failed");
                ActionError::Failed(other.message_or(fallback))
            }
        }
    }
}
