//! Core data types for the journal client
//!
//! These mirror the payloads of the journal backend:
//! - `Entry`: a single journal record with its server-assigned sentiment
//! - `Sentiment`: the closed set of sentiment labels
//! - `Summary`: aggregate counts computed by the backend
//! - `User`, `TokenResponse`, `HealthStatus`: auth and liveness payloads
//!
//! Sentiment and summary values are only ever deserialized from responses.
//! Nothing in this crate derives them from entry text.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Server-assigned classification of an entry's emotional tone
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

impl Sentiment {
    /// All sentiments in display order
    pub fn all() -> &'static [Sentiment] {
        &[Sentiment::Positive, Sentiment::Neutral, Sentiment::Negative]
    }

    /// Capitalized label for headings and chart axes
    pub fn title(&self) -> &'static str {
        match self {
            Sentiment::Positive => "Positive",
            Sentiment::Neutral => "Neutral",
            Sentiment::Negative => "Negative",
        }
    }

    /// Position on the mood trend chart (negative=0, neutral=1, positive=2)
    pub fn mood_level(&self) -> u8 {
        match self {
            Sentiment::Positive => 2,
            Sentiment::Neutral => 1,
            Sentiment::Negative => 0,
        }
    }

    /// Terminal glyph used in place of the smile/meh/frown icons
    pub fn symbol(&self) -> &'static str {
        match self {
            Sentiment::Positive => ":)",
            Sentiment::Neutral => ":|",
            Sentiment::Negative => ":(",
        }
    }
}

impl std::fmt::Display for Sentiment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Sentiment::Positive => write!(f, "positive"),
            Sentiment::Neutral => write!(f, "neutral"),
            Sentiment::Negative => write!(f, "negative"),
        }
    }
}

/// A journal entry as returned by the backend
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Entry {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub sentiment: Sentiment,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(default, with = "timestamp::option")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Title and content sent when creating or updating an entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EntryDraft {
    pub title: String,
    pub content: String,
}

impl EntryDraft {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
        }
    }
}

/// Aggregate sentiment statistics computed by the backend
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Summary {
    pub positive: u64,
    pub neutral: u64,
    pub negative: u64,
    pub total: u64,
    pub average_sentiment: Sentiment,
}

impl Summary {
    /// Count reported for a given sentiment
    pub fn count(&self, sentiment: Sentiment) -> u64 {
        match sentiment {
            Sentiment::Positive => self.positive,
            Sentiment::Neutral => self.neutral,
            Sentiment::Negative => self.negative,
        }
    }
}

/// Authenticated identity returned by `/api/auth/me` and registration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(default, with = "timestamp::option", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Account registration payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Form-encoded login credentials
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// Login response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

/// Backend liveness payload from `/health`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HealthStatus {
    pub status: String,
}

/// Backend timestamps.
///
/// The journal service emits naive UTC datetimes (no offset). RFC 3339 is
/// accepted as well so either form deserializes to `DateTime<Utc>`.
pub mod timestamp {
    use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    const NAIVE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

    pub fn parse(s: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
        match DateTime::parse_from_rfc3339(s) {
            Ok(dt) => Ok(dt.with_timezone(&Utc)),
            Err(_) => NaiveDateTime::parse_from_str(s, NAIVE_FORMAT).map(|naive| naive.and_utc()),
        }
    }

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::AutoSi, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let s = String::deserialize(deserializer)?;
        parse(&s).map_err(serde::de::Error::custom)
    }

    pub mod option {
        use chrono::{DateTime, Utc};
        use serde::{Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(
            value: &Option<DateTime<Utc>>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match value {
                Some(dt) => super::serialize(dt, serializer),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<DateTime<Utc>>, D::Error> {
            Option::<String>::deserialize(deserializer)?
                .map(|s| super::parse(&s).map_err(serde::de::Error::custom))
                .transpose()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_entry_from_backend_json() {
        let json = r#"{
            "id": 7,
            "title": "Morning",
            "content": "Coffee and a walk",
            "sentiment": "positive",
            "created_at": "2024-05-01T10:20:30.123456",
            "updated_at": "2024-05-01T11:00:00"
        }"#;

        let entry: Entry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.id, 7);
        assert_eq!(entry.sentiment, Sentiment::Positive);
        assert_eq!(entry.created_at.day(), 1);
        assert_eq!(entry.created_at.hour(), 10);
        assert_eq!(entry.updated_at.unwrap().hour(), 11);
    }

    #[test]
    fn test_entry_accepts_rfc3339_and_missing_update() {
        let json = r#"{"id":1,"title":"t","content":"c","sentiment":"neutral","created_at":"2024-05-01T10:20:30+02:00"}"#;
        let entry: Entry = serde_json::from_str(json).unwrap();

        assert_eq!(entry.created_at.hour(), 8);
        assert!(entry.updated_at.is_none());
    }

    #[test]
    fn test_unknown_sentiment_rejected() {
        let json = r#"{"id":1,"title":"t","content":"c","sentiment":"ecstatic","created_at":"2024-05-01T10:20:30"}"#;
        assert!(serde_json::from_str::<Entry>(json).is_err());
    }

    #[test]
    fn test_summary_counts() {
        let summary: Summary = serde_json::from_str(
            r#"{"positive":3,"neutral":1,"negative":0,"total":4,"average_sentiment":"positive"}"#,
        )
        .unwrap();

        assert_eq!(summary.count(Sentiment::Positive), 3);
        assert_eq!(summary.count(Sentiment::Neutral), 1);
        assert_eq!(summary.count(Sentiment::Negative), 0);
        assert_eq!(summary.average_sentiment, Sentiment::Positive);
    }

    #[test]
    fn test_mood_levels() {
        assert_eq!(Sentiment::Negative.mood_level(), 0);
        assert_eq!(Sentiment::Neutral.mood_level(), 1);
        assert_eq!(Sentiment::Positive.mood_level(), 2);
        assert_eq!(Sentiment::Neutral.to_string(), "neutral");
    }

    #[test]
    fn test_token_type_defaults_to_bearer() {
        let token: TokenResponse = serde_json::from_str(r#"{"access_token":"abc"}"#).unwrap();
        assert_eq!(token.access_token, "abc");
        assert_eq!(token.token_type, "bearer");
    }
}
