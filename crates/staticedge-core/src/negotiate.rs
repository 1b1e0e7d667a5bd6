//! Client capability signals parsed from request headers.
//!
//! Matching is deliberately simple: header values are split on commas,
//! parameters (`;q=...` and friends) are stripped, and tokens compare
//! case-insensitively. Quality values are ignored entirely — presence of a
//! token is sufficient. Intermediate caches key on `Vary`, so this loose
//! matching stays consistent across cache layers.

use std::collections::HashMap;

/// Parsed `Accept` / `Accept-Encoding` signals of one request.
#[derive(Debug, Clone, Default)]
pub struct ClientCapabilities {
    accept: String,
    accept_encoding: String,
}

impl ClientCapabilities {
    /// Extract capability signals from a request header map.
    ///
    /// Header names match case-insensitively.
    #[must_use]
    pub fn from_headers(headers: &HashMap<String, String>) -> Self {
        let mut caps = Self::default();
        for (name, value) in headers {
            if name.eq_ignore_ascii_case("accept") {
                caps.accept = value.clone();
            } else if name.eq_ignore_ascii_case("accept-encoding") {
                caps.accept_encoding = value.clone();
            }
        }
        caps
    }

    /// Whether the client's `Accept` lists the given media type.
    #[must_use]
    pub fn accepts_format(&self, media_type: &str) -> bool {
        has_token(&self.accept, media_type)
    }

    /// Whether the client's `Accept-Encoding` lists the given encoding.
    #[must_use]
    pub fn accepts_encoding(&self, token: &str) -> bool {
        has_token(&self.accept_encoding, token)
    }
}

/// Token test on a comma-separated header value, parameters stripped.
fn has_token(header: &str, token: &str) -> bool {
    header
        .split(',')
        .filter_map(|part| part.split(';').next())
        .any(|t| t.trim().eq_ignore_ascii_case(token))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect()
    }

    #[test]
    fn test_should_match_header_names_case_insensitively() {
        let caps = ClientCapabilities::from_headers(&headers(&[
            ("Accept", "image/webp,image/png"),
            ("ACCEPT-ENCODING", "gzip, br"),
        ]));
        assert!(caps.accepts_format("image/webp"));
        assert!(caps.accepts_encoding("br"));
    }

    #[test]
    fn test_should_match_tokens_case_insensitively() {
        let caps = ClientCapabilities::from_headers(&headers(&[("accept-encoding", "GZIP")]));
        assert!(caps.accepts_encoding("gzip"));
    }

    #[test]
    fn test_should_ignore_quality_parameters() {
        let caps = ClientCapabilities::from_headers(&headers(&[(
            "accept-encoding",
            "gzip;q=0.8, br;q=1.0",
        )]));
        assert!(caps.accepts_encoding("gzip"));
        assert!(caps.accepts_encoding("br"));
        assert!(!caps.accepts_encoding("zstd"));
    }

    #[test]
    fn test_should_not_match_substrings_of_other_tokens() {
        // "abr" must not count as "br".
        let caps = ClientCapabilities::from_headers(&headers(&[("accept-encoding", "abr, zstdx")]));
        assert!(!caps.accepts_encoding("br"));
        assert!(!caps.accepts_encoding("zstd"));
    }

    #[test]
    fn test_should_handle_missing_headers() {
        let caps = ClientCapabilities::from_headers(&HashMap::new());
        assert!(!caps.accepts_format("image/webp"));
        assert!(!caps.accepts_encoding("gzip"));
    }

    #[test]
    fn test_should_match_media_type_in_accept_list() {
        let caps = ClientCapabilities::from_headers(&headers(&[(
            "accept",
            "text/html,application/xhtml+xml,image/webp,*/*;q=0.8",
        )]));
        assert!(caps.accepts_format("image/webp"));
        assert!(!caps.accepts_format("image/avif"));
    }
}
