//! JSON event boundary.
//!
//! The handler can be invoked through a JSON protocol whose response body
//! is a string: binary bodies are base64-transported, flagged with
//! `isBase64Encoded`, and never round-tripped through UTF-8 text (which
//! would corrupt compressed or image payloads).

use std::collections::{BTreeMap, HashMap};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::response::SiteResponse;

/// An inbound invocation: the request path and headers.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct RequestEvent {
    /// The request path.
    pub path: String,
    /// Request headers; matched case-insensitively downstream.
    #[serde(default)]
    pub headers: HashMap<String, String>,
}

/// The outbound response shape of the event boundary.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseEvent {
    /// HTTP status code.
    pub status_code: u16,
    /// Response headers.
    pub headers: BTreeMap<String, String>,
    /// Body: base64 when `is_base64_encoded`, plain text otherwise.
    pub body: String,
    /// Whether `body` is base64-encoded.
    pub is_base64_encoded: bool,
}

impl From<SiteResponse> for ResponseEvent {
    fn from(resp: SiteResponse) -> Self {
        let body = if resp.is_base64_encoded {
            STANDARD.encode(&resp.body)
        } else {
            String::from_utf8_lossy(&resp.body).into_owned()
        };
        Self {
            status_code: resp.status.as_u16(),
            headers: resp.headers,
            body,
            is_base64_encoded: resp.is_base64_encoded,
        }
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;
    use http::StatusCode;

    use super::*;
    use crate::response;

    #[test]
    fn test_should_base64_encode_binary_bodies() {
        let resp = SiteResponse {
            status: StatusCode::OK,
            headers: BTreeMap::new(),
            body: Bytes::from_static(&[0xFF, 0x00, 0xAB]),
            is_base64_encoded: true,
        };
        let event = ResponseEvent::from(resp);
        assert!(event.is_base64_encoded);
        assert_eq!(event.body, STANDARD.encode([0xFF, 0x00, 0xAB]));
    }

    #[test]
    fn test_should_pass_text_bodies_through() {
        let event = ResponseEvent::from(response::not_found());
        assert_eq!(event.status_code, 404);
        assert_eq!(event.body, "Not Found");
        assert!(!event.is_base64_encoded);
    }

    #[test]
    fn test_should_serialize_with_camel_case_field_names() {
        let event = ResponseEvent::from(response::not_found());
        let json = serde_json::to_value(&event).expect("serializable");
        assert_eq!(json["statusCode"], 404);
        assert_eq!(json["isBase64Encoded"], false);
        assert!(json["headers"]["Content-Type"].is_string());
    }

    #[test]
    fn test_should_deserialize_request_event_without_headers() {
        let event: RequestEvent =
            serde_json::from_str(r#"{"path": "/a/b"}"#).expect("deserializable");
        assert_eq!(event.path, "/a/b");
        assert!(event.headers.is_empty());
    }

    #[test]
    fn test_should_deserialize_request_event_with_headers() {
        let event: RequestEvent = serde_json::from_str(
            r#"{"path": "/", "headers": {"Accept-Encoding": "br"}}"#,
        )
        .expect("deserializable");
        assert_eq!(event.headers.get("Accept-Encoding").map(String::as_str), Some("br"));
    }
}
