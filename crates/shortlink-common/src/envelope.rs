//! The backend's uniform response wrapper.
//!
//! Every admin API response arrives as `{ code, message, data }`. The code is a
//! string on most endpoints and a number on a few, so it is normalized to a
//! string on decode.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Message used when the backend rejects a call without saying why.
pub const FALLBACK_FAILURE_MESSAGE: &str = "Operation failed";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope {
    #[serde(deserialize_with = "code_as_string")]
    pub code: String,
    #[serde(default)]
    pub message: Option<String>,
    /// Payload; `null` when the backend omits it.
    #[serde(default)]
    pub data: Value,
}

/// A non-success envelope, reduced to what callers act on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainFailure {
    pub code: String,
    pub message: String,
}

impl Envelope {
    /// True when `code` is any of the accepted success codes.
    pub fn is_success<S: AsRef<str>>(&self, success_codes: &[S]) -> bool {
        success_codes.iter().any(|c| c.as_ref() == self.code)
    }

    /// Split into the payload or the domain failure it reports.
    pub fn into_result<S: AsRef<str>>(self, success_codes: &[S]) -> Result<Value, DomainFailure> {
        if self.is_success(success_codes) {
            return Ok(self.data);
        }
        let message = self
            .message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| FALLBACK_FAILURE_MESSAGE.to_owned());
        Err(DomainFailure { code: self.code, message })
    }
}

fn code_as_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Code {
        Text(String),
        Number(i64),
    }

    Ok(match Code::deserialize(deserializer)? {
        Code::Text(s) => s,
        Code::Number(n) => n.to_string(),
    })
}

/// Pagination wrapper returned by every list endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Page<T> {
    /// Empty when the backend sends `null` or omits the field.
    #[serde(default = "Vec::new", deserialize_with = "null_as_empty")]
    pub records: Vec<T>,
    #[serde(default)]
    pub total: i64,
    #[serde(default)]
    pub size: i64,
    #[serde(default)]
    pub current: i64,
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

impl<T> Page<T> {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
