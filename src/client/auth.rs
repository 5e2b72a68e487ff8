//! Authentication operations

use super::{ClientError, JournalClient};
use crate::model::{LoginForm, RegisterRequest, TokenResponse, User};
use crate::validation::{validate_login, validate_registration};
use reqwest::Method;

/// `/api/auth` operations; the only code that writes the session token
pub struct AuthApi<'a> {
    client: &'a JournalClient,
}

impl<'a> AuthApi<'a> {
    pub(crate) fn new(client: &'a JournalClient) -> Self {
        Self { client }
    }

    /// Create an account.
    ///
    /// Returns the created user when the backend echoes one back. Registration
    /// does not log in; call [`AuthApi::login`] afterwards.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<Option<User>, ClientError> {
        validate_registration(username, email, password)?;

        let body = RegisterRequest {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        };

        let confirmation: serde_json::Value = self
            .client
            .fetch(
                self.client
                    .request(Method::POST, "/api/auth/register")
                    .json(&body),
            )
            .await?;

        tracing::info!(username = %username, "Account registered");
        Ok(serde_json::from_value(confirmation).ok())
    }

    /// Exchange form-encoded credentials for a session token and store it
    pub async fn login(&self, username: &str, password: &str) -> Result<(), ClientError> {
        validate_login(username, password)?;

        let form = LoginForm {
            username: username.to_string(),
            password: password.to_string(),
        };

        let token: TokenResponse = self
            .client
            .fetch(
                self.client
                    .request(Method::POST, "/api/auth/login")
                    .form(&form),
            )
            .await?;

        self.client.session().set_token(token.access_token).await?;
        tracing::info!(username = %username, "Logged in");
        Ok(())
    }

    /// The identity the current token belongs to
    pub async fn current_user(&self) -> Result<User, ClientError> {
        self.client
            .fetch(self.client.request(Method::GET, "/api/auth/me"))
            .await
    }

    /// Forget the session token
    pub async fn logout(&self) -> Result<(), ClientError> {
        self.client.session().clear().await?;
        tracing::info!("Logged out");
        Ok(())
    }
}
