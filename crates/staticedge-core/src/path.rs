//! Request path to object key resolution.
//!
//! Pure string transformation, no I/O: a request path is joined under the
//! configured prefix to form the direct-lookup key, and a folder-index key
//! (`<key>/index.html`) is always derived alongside it for the
//! directory-style fallback.

/// Suffix appended to a directory-like key to find its index document.
pub const FOLDER_SUFFIX: &str = "index.html";

/// The object keys a request path can resolve to, in probe order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyCandidates {
    /// Key for a direct object lookup. Absent when the path is empty or
    /// directory-like (trailing separator), in which case only the folder
    /// index is probed.
    pub object: Option<String>,
    /// Key of the folder index document for this path.
    pub folder_index: String,
}

/// Resolve a request path into its candidate object keys under `prefix`.
///
/// Dot segments are resolved structurally: `.` is dropped and `..` pops at
/// most back to the prefix root, so a resolved key can never escape the
/// prefix. Repeated and leading separators collapse away; keys carry no
/// leading separator.
#[must_use]
pub fn resolve_keys(prefix: &str, request_path: &str) -> KeyCandidates {
    let root: Vec<&str> = segments(prefix).collect();
    let mut parts = root.clone();

    for seg in segments(request_path) {
        if seg == ".." {
            if parts.len() > root.len() {
                parts.pop();
            }
        } else {
            parts.push(seg);
        }
    }

    let name = parts.join("/");
    let directory_like = name.is_empty() || request_path.ends_with('/');

    let object = if directory_like { None } else { Some(name.clone()) };
    let folder_index = if name.is_empty() {
        FOLDER_SUFFIX.to_owned()
    } else {
        format!("{name}/{FOLDER_SUFFIX}")
    };

    KeyCandidates {
        object,
        folder_index,
    }
}

/// Iterate the meaningful segments of a path: empty and `.` segments drop
/// out, `..` is passed through for the caller to resolve.
fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|seg| !seg.is_empty() && *seg != ".")
}
