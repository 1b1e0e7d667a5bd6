//! Descriptive attributes of a stored object.

use chrono::{DateTime, Utc};

/// Attributes returned by a metadata probe, without the object body.
///
/// Sourced once per request from the head probe of the resolved base key and
/// immutable for the lifetime of that request. Every field is optional: a
/// field the store does not record emits no response header downstream.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectMetadata {
    /// MIME type recorded for the object, if any.
    pub content_type: Option<String>,
    /// Transport encoding the object is stored with (e.g. already gzipped
    /// at rest). Objects with an encoding recorded here are never
    /// re-substituted with another encoding.
    pub content_encoding: Option<String>,
    /// Natural language of the content.
    pub content_language: Option<String>,
    /// Entity tag.
    pub e_tag: Option<String>,
    /// Expiry, as the raw HTTP-date string the store recorded.
    pub expires: Option<String>,
    /// Last modification time.
    pub last_modified: Option<DateTime<Utc>>,
}
