//! # Feedback Records
//!
//! Shapes of the single feedback resource, on the wire and in the store.
//!
//! - `name` and `feedback` are trimmed, never empty
//! - `createdAt` is set by the create path, millisecond precision
//! - `_id` is a MongoDB ObjectId, hex encoded in JSON
//!
//! Every response is wrapped in a `{ success, ... }` envelope.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const FEEDBACK_COLLECTION: &str = "feedbacks";

pub const HEALTH_MESSAGE: &str = "Student Feedback Backend is running!";
pub const CREATED_MESSAGE: &str = "Feedback submitted successfully!";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackEntry {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub feedback: String,
    #[serde(rename = "createdAt", with = "iso_millis")]
    pub created_at: DateTime<Utc>,
}

/// RFC 3339 in UTC, always with three fractional digits.
mod iso_millis {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(at: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&at.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        DateTime::<Utc>::deserialize(deserializer)
    }
}

/// Validated input for a new entry, not yet persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewFeedback {
    pub name: String,
    pub feedback: String,
    pub created_at: DateTime<Utc>,
}

impl NewFeedback {
    pub fn new(name: impl Into<String>, feedback: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            feedback: feedback.into(),
            created_at: now_millis(),
        }
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }
}

/// Current time truncated to what a BSON date can hold.
pub fn now_millis() -> DateTime<Utc> {
    let now = Utc::now();

    DateTime::from_timestamp_millis(now.timestamp_millis()).unwrap_or(now)
}

/// Raw request body, scalars other than strings are coerced during validation.
#[derive(Debug, Default, Deserialize)]
pub struct CreateFeedback {
    pub name: Option<Value>,
    pub feedback: Option<Value>,
}

#[derive(Serialize)]
pub struct Created {
    pub success: bool,
    pub message: &'static str,
    pub data: FeedbackEntry,
}

impl Created {
    pub fn new(data: FeedbackEntry) -> Self {
        Self {
            success: true,
            message: CREATED_MESSAGE,
            data,
        }
    }
}

#[derive(Serialize)]
pub struct Listed {
    pub success: bool,
    pub count: usize,
    pub data: Vec<FeedbackEntry>,
}

impl Listed {
    pub fn new(data: Vec<FeedbackEntry>) -> Self {
        Self {
            success: true,
            count: data.len(),
            data,
        }
    }
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub success: bool,
    pub message: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

#[derive(Serialize)]
pub struct Health {
    pub status: &'static str,
    pub message: &'static str,
    pub uptime: f64,
}

#[derive(Serialize)]
pub struct DbStatus {
    pub database: &'static str,
}
