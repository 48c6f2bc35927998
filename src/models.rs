use crate::errors::ApiError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Timely timestamps arrive as either epoch seconds or an ISO string
/// depending on the endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Timestamp {
    Seconds(i64),
    Text(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub created_at: Option<Timestamp>,
    #[serde(default)]
    pub updated_at: Option<Timestamp>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientRecord {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub active: Option<bool>,
    #[serde(default)]
    pub created_at: Option<Timestamp>,
    #[serde(default)]
    pub updated_at: Option<Timestamp>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub active: Option<bool>,
    #[serde(default)]
    pub client_id: Option<i64>,
    #[serde(default)]
    pub created_at: Option<Timestamp>,
    #[serde(default)]
    pub updated_at: Option<Timestamp>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub user_level: Option<String>,
    #[serde(default)]
    pub active: Option<bool>,
    #[serde(default)]
    pub created_at: Option<Timestamp>,
    #[serde(default)]
    pub updated_at: Option<Timestamp>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: i64,
    #[serde(default)]
    pub uid: Option<String>,
    pub project_id: i64,
    pub user_id: i64,
    pub day: String,
    #[serde(default)]
    pub from_time: Option<String>,
    #[serde(default)]
    pub to_time: Option<String>,
    #[serde(default)]
    pub duration: Option<i64>,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub created_at: Option<Timestamp>,
    #[serde(default)]
    pub updated_at: Option<Timestamp>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub created_at: Option<Timestamp>,
    #[serde(default)]
    pub updated_at: Option<Timestamp>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Label {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub created_at: Option<Timestamp>,
    #[serde(default)]
    pub updated_at: Option<Timestamp>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Forecast {
    pub id: i64,
    pub project_id: i64,
    pub user_id: i64,
    pub day: String,
    pub duration: i64,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub created_at: Option<Timestamp>,
    #[serde(default)]
    pub updated_at: Option<Timestamp>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Webhook {
    pub id: i64,
    pub target_url: String,
    pub event: String,
    #[serde(default)]
    pub created_at: Option<Timestamp>,
    #[serde(default)]
    pub updated_at: Option<Timestamp>,
}

/// Fallback shape used when a list item fails strict decoding. Keeps the
/// call useful instead of failing the whole collection over one odd record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MinimalRecord {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub created_at: Option<Timestamp>,
    #[serde(default)]
    pub updated_at: Option<Timestamp>,
}

impl MinimalRecord {
    fn from_raw(raw: &Value) -> Self {
        Self {
            id: raw.get("id").and_then(|v| v.as_i64()).unwrap_or(0),
            name: raw
                .get("name")
                .and_then(|v| v.as_str())
                .unwrap_or("Unknown")
                .to_string(),
            created_at: raw
                .get("created_at")
                .cloned()
                .and_then(|v| serde_json::from_value(v).ok()),
            updated_at: raw
                .get("updated_at")
                .cloned()
                .and_then(|v| serde_json::from_value(v).ok()),
        }
    }
}

/// Result of the two-stage decode: a fully validated record, or the
/// minimal fallback carrying whatever identity fields were present.
#[derive(Debug)]
pub enum ShapedRecord<T> {
    Full(T),
    Minimal(MinimalRecord),
}

impl<T: Serialize> ShapedRecord<T> {
    pub fn into_value(self) -> Value {
        match self {
            ShapedRecord::Full(record) => serde_json::to_value(record).unwrap_or(Value::Null),
            ShapedRecord::Minimal(record) => serde_json::to_value(record).unwrap_or(Value::Null),
        }
    }
}

/// Strict decode first, minimal fallback second. Used for list items only.
pub fn parse_lenient<T: DeserializeOwned>(raw: &Value) -> ShapedRecord<T> {
    match serde_json::from_value::<T>(raw.clone()) {
        Ok(record) => ShapedRecord::Full(record),
        Err(_) => ShapedRecord::Minimal(MinimalRecord::from_raw(raw)),
    }
}

/// Strict decode for single-record responses, where a missing `id` means
/// the remote payload itself is malformed.
pub fn parse_strict<T: DeserializeOwned>(raw: Value, what: &str) -> Result<T, ApiError> {
    serde_json::from_value(raw).map_err(|err| {
        ApiError::MalformedResponse(format!(
            "{} response did not match the expected shape: {}",
            what, err
        ))
    })
}

pub fn record_to_value<T: Serialize>(record: T) -> Result<Value, ApiError> {
    serde_json::to_value(record).map_err(|err| ApiError::Internal(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn lenient_parse_keeps_valid_records() {
        let raw = json!({"id": 4, "name": "Acme", "active": true, "extra_field": "ignored"});
        match parse_lenient::<ClientRecord>(&raw) {
            ShapedRecord::Full(client) => {
                assert_eq!(client.id, 4);
                assert_eq!(client.active, Some(true));
            }
            ShapedRecord::Minimal(_) => panic!("valid record must decode fully"),
        }
    }

    #[test]
    fn lenient_parse_degrades_to_minimal_record() {
        let raw = json!({"name": "No id here", "created_at": 1700000000});
        match parse_lenient::<ClientRecord>(&raw) {
            ShapedRecord::Full(_) => panic!("record without id must not decode fully"),
            ShapedRecord::Minimal(minimal) => {
                assert_eq!(minimal.id, 0);
                assert_eq!(minimal.name, "No id here");
                assert!(matches!(minimal.created_at, Some(Timestamp::Seconds(_))));
            }
        }
    }

    #[test]
    fn minimal_record_defaults_name_to_unknown() {
        let raw = json!({"weird": true});
        match parse_lenient::<Team>(&raw) {
            ShapedRecord::Minimal(minimal) => {
                assert_eq!(minimal.id, 0);
                assert_eq!(minimal.name, "Unknown");
            }
            ShapedRecord::Full(_) => panic!("unrecognizable payload must fall back"),
        }
    }

    #[test]
    fn strict_parse_reports_the_shape_mismatch() {
        let err = parse_strict::<Project>(json!({"name": "missing id"}), "project").unwrap_err();
        assert_eq!(err.kind(), "malformed_response");
        assert!(err.to_string().contains("project"));
    }

    #[test]
    fn timestamps_accept_seconds_and_text() {
        let raw = json!({"id": 1, "name": "a", "created_at": "2024-01-01T00:00:00Z", "updated_at": 1704067200});
        match parse_lenient::<Account>(&raw) {
            ShapedRecord::Full(account) => {
                assert!(matches!(account.created_at, Some(Timestamp::Text(_))));
                assert!(matches!(account.updated_at, Some(Timestamp::Seconds(_))));
            }
            ShapedRecord::Minimal(_) => panic!("account must decode fully"),
        }
    }
}
