//! Bodies for `POST /api/download` and its streaming variant.
//!
//! The request is parsed from a raw JSON value instead of a derived
//! `Deserialize` so each malformed shape gets its own 400 message.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use serde::Serialize;
use serde_json::Value;
use vidgrab_core::LinkResult;

use crate::error::HttpError;

pub const MISSING_LINKS_MESSAGE: &str = "links is required";
pub const NOT_AN_ARRAY_MESSAGE: &str = "links must be an array";
pub const NON_STRING_MESSAGE: &str = "links must contain only strings";

/// A validated-shape download request. Batch limits are checked later.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRequest {
    pub links: Vec<String>,
}

impl DownloadRequest {
    /// Parse the extractor result, mapping every shape problem to 400.
    pub fn from_body(body: Result<Json<Value>, JsonRejection>) -> Result<Self, HttpError> {
        let Json(value) = body?;
        Self::from_value(&value)
    }

    pub fn from_value(value: &Value) -> Result<Self, HttpError> {
        let links = match value.get("links") {
            None | Some(Value::Null) => {
                return Err(HttpError::BadRequest(MISSING_LINKS_MESSAGE.to_string()));
            }
            Some(Value::Array(items)) => items,
            Some(_) => return Err(HttpError::BadRequest(NOT_AN_ARRAY_MESSAGE.to_string())),
        };

        let links = links
            .iter()
            .map(|item| item.as_str().map(ToString::to_string))
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| HttpError::BadRequest(NON_STRING_MESSAGE.to_string()))?;

        Ok(Self { links })
    }
}

/// `200` body: one result per input link, in input order.
#[derive(Debug, Clone, Serialize)]
pub struct DownloadResponse {
    pub results: Vec<LinkResult>,
}

/// Data of a `link` event on the streaming endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct LinkEvent {
    pub index: usize,
    pub result: LinkResult,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn bad_request_message(value: &Value) -> String {
        match DownloadRequest::from_value(value) {
            Err(HttpError::BadRequest(msg)) => msg,
            other => panic!("expected bad request, got {other:?}"),
        }
    }

    #[test]
    fn test_parses_string_array() {
        let request = DownloadRequest::from_value(&json!({"links": ["a", "b"]})).unwrap();
        assert_eq!(request.links, ["a", "b"]);
    }

    #[test]
    fn test_empty_array_is_left_to_batch_validation() {
        let request = DownloadRequest::from_value(&json!({"links": []})).unwrap();
        assert!(request.links.is_empty());
    }

    #[test]
    fn test_rejects_malformed_shapes() {
        assert_eq!(bad_request_message(&json!({})), MISSING_LINKS_MESSAGE);
        assert_eq!(bad_request_message(&json!({"links": null})), MISSING_LINKS_MESSAGE);
        assert_eq!(bad_request_message(&json!({"links": "a"})), NOT_AN_ARRAY_MESSAGE);
        assert_eq!(bad_request_message(&json!({"links": ["a", 1]})), NON_STRING_MESSAGE);
        assert_eq!(bad_request_message(&json!([1, 2])), MISSING_LINKS_MESSAGE);
    }

    #[test]
    fn test_response_serializes_results() {
        let body = DownloadResponse {
            results: vec![LinkResult::completed("l", "/downloads/f.mp4")],
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["results"][0]["file"], "/downloads/f.mp4");
        assert_eq!(value["results"][0]["ok"], true);
    }
}
