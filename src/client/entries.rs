//! Journal entry operations

use super::{ClientError, JournalClient};
use crate::model::{Entry, EntryDraft, Summary};
use crate::validation::validate_entry;
use reqwest::Method;

/// `/api/entries` operations
pub struct EntriesApi<'a> {
    client: &'a JournalClient,
}

impl<'a> EntriesApi<'a> {
    pub(crate) fn new(client: &'a JournalClient) -> Self {
        Self { client }
    }

    /// All entries of the signed-in user, newest first
    pub async fn list(&self) -> Result<Vec<Entry>, ClientError> {
        self.client
            .fetch(self.client.request(Method::GET, "/api/entries"))
            .await
    }

    pub async fn get(&self, id: i64) -> Result<Entry, ClientError> {
        self.client
            .fetch(self.client.request(Method::GET, &format!("/api/entries/{}", id)))
            .await
    }

    /// Create an entry; the backend assigns its sentiment
    pub async fn create(&self, title: &str, content: &str) -> Result<Entry, ClientError> {
        validate_entry(title, content)?;

        let body = EntryDraft::new(title, content);
        self.client
            .fetch(
                self.client
                    .request(Method::POST, "/api/entries")
                    .json(&body),
            )
            .await
    }

    /// Replace title and content; the backend re-classifies sentiment
    pub async fn update(&self, id: i64, title: &str, content: &str) -> Result<Entry, ClientError> {
        validate_entry(title, content)?;

        let body = EntryDraft::new(title, content);
        self.client
            .fetch(
                self.client
                    .request(Method::PUT, &format!("/api/entries/{}", id))
                    .json(&body),
            )
            .await
    }

    pub async fn delete(&self, id: i64) -> Result<(), ClientError> {
        self.client
            .execute(
                self.client
                    .request(Method::DELETE, &format!("/api/entries/{}", id)),
            )
            .await?;
        Ok(())
    }

    /// Aggregate sentiment counts computed by the backend
    pub async fn summary(&self) -> Result<Summary, ClientError> {
        self.client
            .fetch(
                self.client
                    .request(Method::GET, "/api/entries/stats/summary"),
            )
            .await
    }
}
