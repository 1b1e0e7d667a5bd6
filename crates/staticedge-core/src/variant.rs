//! Variant planning: which stored keys to try for a request, in order.
//!
//! Variants are pre-generated and stored under keys derived from the base
//! key by suffixing (`.webp`, `.br`, `.zst`, `.gz` — appended directly, no
//! separator). Planning is pure: the store is consulted only afterwards to
//! confirm existence, by the handler's probe loop.
//!
//! The plan is strictly ordered and first-match-wins, which bounds the worst
//! case at one round trip per supported encoding plus the base fetch and
//! makes the outcome deterministic for a given (object, capabilities) pair —
//! a requirement for correct downstream cache keying via `Vary`.

use staticedge_store::ObjectMetadata;

use crate::negotiate::ClientCapabilities;

/// Media type served for format-substituted images.
pub const WEBP_TYPE: &str = "image/webp";

/// Key suffix of the pre-generated webp variant.
pub const WEBP_SUFFIX: &str = ".webp";

/// Image types eligible for format substitution.
const IMAGE_TYPES: [&str; 2] = ["image/jpeg", "image/png"];

/// Text-like types eligible for encoding substitution.
const TEXT_TYPES: [&str; 6] = [
    "text/plain",
    "text/html",
    "text/css",
    "application/javascript",
    "application/json",
    "application/xml",
];

/// A transport encoding with its header token and derived-key suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransportEncoding {
    /// Token used in `Accept-Encoding` / `Content-Encoding`.
    pub token: &'static str,
    /// Suffix of the pre-generated variant key.
    pub suffix: &'static str,
}

/// Supported encodings, highest compression ratio first. The order is the
/// probe priority: an existing `.br` variant always beats `.zst` and `.gz`.
pub const ENCODINGS: [TransportEncoding; 3] = [
    TransportEncoding {
        token: "br",
        suffix: ".br",
    },
    TransportEncoding {
        token: "zstd",
        suffix: ".zst",
    },
    TransportEncoding {
        token: "gzip",
        suffix: ".gz",
    },
];

/// One concrete key to try, with the response headers a hit carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantCandidate {
    /// The derived (or base) key to fetch.
    pub key: String,
    /// `Content-Type` to serve on a hit.
    pub content_type: String,
    /// `Content-Encoding` override, if this candidate is encoded.
    pub content_encoding: Option<&'static str>,
    /// `Vary` header a hit emits: the negotiation axis that selected this
    /// candidate, or none for the unnegotiated base object.
    pub vary: Option<&'static str>,
}

/// The ordered candidates for a request plus the no-substitution fallback.
#[derive(Debug, Clone)]
pub struct VariantPlan {
    /// Substitution candidates, in probe order. May be empty.
    pub candidates: Vec<VariantCandidate>,
    /// The base object, always last.
    pub fallback: VariantCandidate,
}

/// Compute the variant plan for a base key.
///
/// Format substitution applies to allow-listed image types when the client
/// accepts webp, and varies on `Accept`. Encoding substitution applies to
/// allow-listed text types — unless the object is already encoded at rest —
/// and varies on `Accept-Encoding`. The two axes are mutually exclusive.
#[must_use]
pub fn plan(
    base_key: &str,
    metadata: &ObjectMetadata,
    caps: &ClientCapabilities,
) -> VariantPlan {
    let content_type = metadata
        .content_type
        .clone()
        .unwrap_or_else(|| guess_content_type(base_key));

    let mut candidates = Vec::new();

    if IMAGE_TYPES.contains(&content_type.as_str()) && caps.accepts_format(WEBP_TYPE) {
        candidates.push(VariantCandidate {
            key: format!("{base_key}{WEBP_SUFFIX}"),
            content_type: WEBP_TYPE.to_owned(),
            content_encoding: None,
            vary: Some("Accept"),
        });
    } else if TEXT_TYPES.contains(&content_type.as_str()) && metadata.content_encoding.is_none() {
        for encoding in &ENCODINGS {
            if caps.accepts_encoding(encoding.token) {
                candidates.push(VariantCandidate {
                    key: format!("{base_key}{}", encoding.suffix),
                    content_type: content_type.clone(),
                    content_encoding: Some(encoding.token),
                    vary: Some("Accept-Encoding"),
                });
            }
        }
    }

    let fallback = VariantCandidate {
        key: base_key.to_owned(),
        content_type,
        content_encoding: None,
        vary: None,
    };

    VariantPlan {
        candidates,
        fallback,
    }
}

/// Infer a content type from the key's extension when metadata omits one.
fn guess_content_type(key: &str) -> String {
    mime_guess::from_path(key)
        .first()
        .map_or_else(|| "application/octet-stream".to_owned(), |m| m.essence_str().to_owned())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn caps(accept: &str, accept_encoding: &str) -> ClientCapabilities {
        let mut headers = HashMap::new();
        headers.insert("accept".to_owned(), accept.to_owned());
        headers.insert("accept-encoding".to_owned(), accept_encoding.to_owned());
        ClientCapabilities::from_headers(&headers)
    }

    fn meta(content_type: &str) -> ObjectMetadata {
        ObjectMetadata {
            content_type: Some(content_type.to_owned()),
            ..ObjectMetadata::default()
        }
    }

    #[test]
    fn test_should_plan_webp_for_accepted_image() {
        let plan = plan("img/cat.jpg", &meta("image/jpeg"), &caps("image/webp", ""));
        assert_eq!(plan.candidates.len(), 1);
        let c = &plan.candidates[0];
        assert_eq!(c.key, "img/cat.jpg.webp");
        assert_eq!(c.content_type, "image/webp");
        assert_eq!(c.content_encoding, None);
        assert_eq!(c.vary, Some("Accept"));
    }

    #[test]
    fn test_should_not_plan_webp_without_client_support() {
        let plan = plan("img/cat.png", &meta("image/png"), &caps("image/png", "br"));
        assert!(plan.candidates.is_empty());
    }

    #[test]
    fn test_should_plan_encodings_in_strict_priority_order() {
        let plan = plan(
            "app.js",
            &meta("application/javascript"),
            &caps("", "gzip, br, zstd"),
        );
        let keys: Vec<&str> = plan.candidates.iter().map(|c| c.key.as_str()).collect();
        assert_eq!(keys, ["app.js.br", "app.js.zst", "app.js.gz"]);
        assert!(
            plan.candidates
                .iter()
                .all(|c| c.vary == Some("Accept-Encoding"))
        );
    }

    #[test]
    fn test_should_filter_encodings_to_client_support() {
        let plan = plan("style.css", &meta("text/css"), &caps("", "gzip"));
        let keys: Vec<&str> = plan.candidates.iter().map(|c| c.key.as_str()).collect();
        assert_eq!(keys, ["style.css.gz"]);
        assert_eq!(plan.candidates[0].content_encoding, Some("gzip"));
        assert_eq!(plan.candidates[0].content_type, "text/css");
    }

    #[test]
    fn test_should_skip_encoding_for_already_encoded_object() {
        let metadata = ObjectMetadata {
            content_type: Some("text/html".to_owned()),
            content_encoding: Some("gzip".to_owned()),
            ..ObjectMetadata::default()
        };
        let plan = plan("page.html", &metadata, &caps("", "br, gzip"));
        assert!(plan.candidates.is_empty());
    }

    #[test]
    fn test_should_not_substitute_unlisted_types() {
        let plan = plan(
            "video.mp4",
            &meta("video/mp4"),
            &caps("image/webp", "br, gzip"),
        );
        assert!(plan.candidates.is_empty());
        assert_eq!(plan.fallback.content_type, "video/mp4");
    }

    #[test]
    fn test_should_keep_fallback_unnegotiated() {
        let plan = plan("a.html", &meta("text/html"), &caps("", "br"));
        assert_eq!(plan.fallback.key, "a.html");
        assert_eq!(plan.fallback.content_encoding, None);
        assert_eq!(plan.fallback.vary, None);
    }

    #[test]
    fn test_should_guess_content_type_from_extension() {
        let plan = plan("docs/readme.html", &ObjectMetadata::default(), &caps("", "br"));
        assert_eq!(plan.fallback.content_type, "text/html");
        // The guessed type participates in substitution classification.
        assert_eq!(plan.candidates.len(), 1);
        assert_eq!(plan.candidates[0].key, "docs/readme.html.br");
    }

    #[test]
    fn test_should_fall_back_to_octet_stream_for_unknown_extension() {
        let plan = plan("blob.xyzzy", &ObjectMetadata::default(), &caps("", ""));
        assert_eq!(plan.fallback.content_type, "application/octet-stream");
    }

    #[test]
    fn test_should_prefer_format_substitution_over_encoding() {
        // An image type never gets encoding candidates, even if the client
        // advertises encodings.
        let plan = plan(
            "img/a.jpg",
            &meta("image/jpeg"),
            &caps("image/webp", "br, gzip"),
        );
        assert_eq!(plan.candidates.len(), 1);
        assert_eq!(plan.candidates[0].key, "img/a.jpg.webp");
    }
}
