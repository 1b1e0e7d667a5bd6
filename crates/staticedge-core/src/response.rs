//! Response assembly.
//!
//! Builds the final status/headers/body triple from fetched bytes, stored
//! metadata, and the variant actually served. Metadata headers propagate
//! only when present — absent fields emit no header at all — and `Vary` is
//! set only when a negotiation axis was actually exercised.

use std::collections::BTreeMap;

use bytes::Bytes;
use http::StatusCode;
use staticedge_store::ObjectMetadata;

use crate::variant::VariantCandidate;

/// A complete response, exactly one per request.
///
/// Headers live in a `BTreeMap` so identical inputs always produce
/// byte-identical header sequences. The base64 flag records whether the
/// body must be base64-transported on the JSON event boundary; served
/// object bodies are opaque bytes and always flagged, canned text responses
/// are not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteResponse {
    /// HTTP status code.
    pub status: StatusCode,
    /// Response headers.
    pub headers: BTreeMap<String, String>,
    /// Body bytes, never inspected or transformed here.
    pub body: Bytes,
    /// Whether the body needs base64 transport on the event boundary.
    pub is_base64_encoded: bool,
}

/// Assemble a 200 response for a served object.
///
/// `Cache-Control` always carries the configured max-age (static content is
/// immutable per key; cache busting happens by changing keys upstream).
/// The variant's encoding override, when present, replaces any encoding the
/// metadata recorded.
#[must_use]
pub fn assemble(
    body: Bytes,
    metadata: &ObjectMetadata,
    variant: &VariantCandidate,
    max_age_secs: u64,
) -> SiteResponse {
    let mut headers = BTreeMap::new();
    headers.insert(
        "Cache-Control".to_owned(),
        format!("public, max-age={max_age_secs}"),
    );
    headers.insert("Content-Type".to_owned(), variant.content_type.clone());

    let content_encoding = variant
        .content_encoding
        .map(ToOwned::to_owned)
        .or_else(|| metadata.content_encoding.clone());
    insert_present(&mut headers, "Content-Encoding", content_encoding);
    insert_present(
        &mut headers,
        "Content-Language",
        metadata.content_language.clone(),
    );
    insert_present(&mut headers, "ETag", metadata.e_tag.clone());
    insert_present(&mut headers, "Expires", metadata.expires.clone());
    insert_present(
        &mut headers,
        "Last-Modified",
        metadata
            .last_modified
            .map(|t| t.format("%a, %d %b %Y %H:%M:%S GMT").to_string()),
    );
    insert_present(&mut headers, "Vary", variant.vary.map(ToOwned::to_owned));

    SiteResponse {
        status: StatusCode::OK,
        headers,
        body,
        is_base64_encoded: true,
    }
}

/// The terminal 404 response: neither the primary key nor the folder index
/// exists.
#[must_use]
pub fn not_found() -> SiteResponse {
    plain_text(StatusCode::NOT_FOUND, "Not Found")
}

/// The 5xx response for a base-object fetch failure. Never used for
/// absence — a missing object is a 404.
#[must_use]
pub fn internal_error() -> SiteResponse {
    plain_text(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
}

fn plain_text(status: StatusCode, body: &'static str) -> SiteResponse {
    let mut headers = BTreeMap::new();
    headers.insert("Content-Type".to_owned(), "text/plain".to_owned());
    SiteResponse {
        status,
        headers,
        body: Bytes::from_static(body.as_bytes()),
        is_base64_encoded: false,
    }
}

fn insert_present(headers: &mut BTreeMap<String, String>, name: &str, value: Option<String>) {
    if let Some(v) = value {
        headers.insert(name.to_owned(), v);
    }
}
