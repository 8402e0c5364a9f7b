//! DTOs for decoding conversion service replies.

use serde::Deserialize;
use serde_json::Value;

use crate::domain::ports::ConversionResponse;

/// Reply body of `GET /dl?id=<id>`.
///
/// Fields are kept as raw JSON so an unexpected type never fails the decode.
/// A missing or non-string `status` is never treated as success.
#[derive(Debug, Deserialize)]
pub(super) struct ConversionResponseDto {
    #[serde(default)]
    pub(super) status: Option<Value>,
    #[serde(default)]
    pub(super) title: Option<Value>,
    #[serde(default)]
    pub(super) link: Option<Value>,
    #[serde(default)]
    pub(super) msg: Option<Value>,
}

fn into_string(value: Option<Value>) -> Option<String> {
    match value {
        Some(Value::String(text)) => Some(text),
        _ => None,
    }
}

impl From<ConversionResponseDto> for ConversionResponse {
    fn from(value: ConversionResponseDto) -> Self {
        // Non-string statuses keep their JSON text for the rejection log.
        let status = match value.status {
            Some(Value::String(text)) => text,
            Some(other) => other.to_string(),
            None => String::new(),
        };
        Self {
            status,
            title: into_string(value.title),
            link: into_string(value.link),
            message: into_string(value.msg),
        }
    }
}
