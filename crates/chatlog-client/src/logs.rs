//! Historical chat log loading.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::endpoints::Endpoints;
use crate::source::{JsonSource, fetch_json};

/// Default page size requested from the log service.
pub const DEFAULT_LOG_LIMIT: usize = 500;

/// A badge reference attached to a logged message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BadgeRef {
    /// Fully resolved badge carried by the log entry itself.
    Inline { name: String, url: String },
    /// Badge set key such as `moderator/1`.
    Key(String),
}

impl BadgeRef {
    /// Badge set name without its version suffix (`moderator/1` -> `moderator`).
    pub fn set_name(&self) -> &str {
        match self {
            Self::Inline { name, .. } => name,
            Self::Key(key) => key.split('/').next().unwrap_or(key),
        }
    }
}

/// A single logged chat message.
///
/// Only `text` must be well-formed when present; every other field falls
/// back to its default when null or of an unexpected shape.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ChatMessage {
    #[serde(default, deserialize_with = "lenient")]
    pub username: String,
    #[serde(default, alias = "displayName", deserialize_with = "lenient")]
    pub display_name: Option<String>,
    #[serde(default, alias = "userId", alias = "userID", deserialize_with = "lenient")]
    pub user_id: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub color: Option<String>,
    /// Absent for system messages.
    #[serde(default, alias = "message")]
    pub text: Option<String>,
    #[serde(default, deserialize_with = "deserialize_badges")]
    pub badges: Vec<BadgeRef>,
    #[serde(default, deserialize_with = "lenient")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl ChatMessage {
    /// Display name when present, login otherwise.
    pub fn author(&self) -> &str {
        self.display_name
            .as_deref()
            .filter(|name| !name.is_empty())
            .unwrap_or(&self.username)
    }
}

/// Decode `T`, falling back to `T::default()` when the value does not fit.
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawBadge {
    Inline {
        #[serde(default)]
        name: String,
        url: String,
    },
    /// `{name, version}` without a URL; resolved through the catalog.
    Versioned {
        name: String,
        #[serde(default)]
        version: Option<Value>,
    },
    Key(String),
}

impl From<RawBadge> for BadgeRef {
    fn from(raw: RawBadge) -> Self {
        match raw {
            RawBadge::Inline { name, url } => Self::Inline { name, url },
            RawBadge::Versioned { name, version } => match version {
                Some(Value::String(v)) => Self::Key(format!("{name}/{v}")),
                Some(Value::Number(v)) => Self::Key(format!("{name}/{v}")),
                _ => Self::Key(name),
            },
            RawBadge::Key(key) => Self::Key(key),
        }
    }
}

/// Badges arrive either as a list or as an IRC-style `set/version,...` tag.
///
/// List entries that match no known shape are dropped one by one.
fn deserialize_badges<'de, D>(deserializer: D) -> Result<Vec<BadgeRef>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(list) => list
            .into_iter()
            .filter_map(|entry| serde_json::from_value::<RawBadge>(entry).ok())
            .map(BadgeRef::from)
            .collect(),
        Value::String(tag) => tag
            .split(',')
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .map(|key| BadgeRef::Key(key.to_string()))
            .collect(),
        _ => Vec::new(),
    })
}

/// Ordered messages as delivered by the log service.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LogResult {
    pub messages: Vec<ChatMessage>,
    /// Entries dropped because they did not decode.
    pub skipped: usize,
}

impl LogResult {
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ChatMessage> {
        self.messages.iter()
    }
}

impl<'a> IntoIterator for &'a LogResult {
    type Item = &'a ChatMessage;
    type IntoIter = std::slice::Iter<'a, ChatMessage>;

    fn into_iter(self) -> Self::IntoIter {
        self.messages.iter()
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum LogsResponse {
    Bare(Vec<Value>),
    Wrapped { messages: Vec<Value> },
}

/// What to load: a channel, optionally narrowed to one user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogQuery {
    pub channel_id: String,
    pub user_id: Option<String>,
    pub limit: usize,
}

impl LogQuery {
    pub fn channel(channel_id: impl Into<String>) -> Self {
        Self {
            channel_id: channel_id.into(),
            user_id: None,
            limit: DEFAULT_LOG_LIMIT,
        }
    }

    pub fn user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Request URL for this query.
    pub fn url(&self, endpoints: &Endpoints) -> String {
        match self.user_id.as_deref().filter(|id| !id.is_empty()) {
            Some(user_id) => endpoints.user_logs(&self.channel_id, user_id, self.limit),
            None => endpoints.channel_logs(&self.channel_id, self.limit),
        }
    }
}

/// Load one page of logs. `None` when the log service is unavailable.
///
/// Entries whose text fails to decode are skipped individually. When the
/// service returns more than `limit` entries only the last `limit` are
/// kept.
pub async fn load_logs(
    source: &impl JsonSource,
    endpoints: &Endpoints,
    query: &LogQuery,
) -> Option<LogResult> {
    let url = query.url(endpoints);
    let raw = match fetch_json::<LogsResponse>(source, &url).await? {
        LogsResponse::Bare(raw) | LogsResponse::Wrapped { messages: raw } => raw,
    };

    let total = raw.len();
    let mut messages: Vec<ChatMessage> = raw
        .into_iter()
        .filter_map(|entry| match serde_json::from_value::<ChatMessage>(entry) {
            Ok(message) => Some(message),
            Err(e) => {
                tracing::debug!(error = %e, "Skipping malformed log entry");
                None
            }
        })
        .collect();
    let skipped = total - messages.len();

    if messages.len() > query.limit {
        messages.drain(..messages.len() - query.limit);
    }

    tracing::debug!(
        count = messages.len(),
        skipped,
        channel_id = %query.channel_id,
        "Fetched chat logs"
    );
    Some(LogResult { messages, skipped })
}
