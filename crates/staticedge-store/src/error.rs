//! Store error taxonomy.
//!
//! The resolution cascade in `staticedge-core` branches on the *kind* of a
//! store failure, so the kind is modeled as a tagged enum at this boundary
//! rather than inferred downstream from error identity:
//!
//! - [`StoreError::NotFound`] is an expected branch signal (the next
//!   fallback candidate is tried, nothing is logged as an error).
//! - [`StoreError::AccessDenied`] falls through the same way but is surfaced
//!   distinctly in diagnostics, since it usually means a per-object
//!   misconfiguration rather than absence.
//! - [`StoreError::Service`] covers transient/network/service faults.

/// Error type for object store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The key does not exist in the store.
    #[error("object not found: {key}")]
    NotFound {
        /// The key that was not found.
        key: String,
    },

    /// The store refused access to the key.
    #[error("access denied: {key}")]
    AccessDenied {
        /// The key access was denied for.
        key: String,
    },

    /// The store returned a failure that is neither absence nor denial.
    #[error("store request failed for {key}: {message}")]
    Service {
        /// The key the operation targeted.
        key: String,
        /// The underlying service error message.
        message: String,
    },

    /// Internal error with context.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl StoreError {
    /// Whether this error means the key simply does not exist.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Whether this error means access to the key was refused.
    #[must_use]
    pub fn is_access_denied(&self) -> bool {
        matches!(self, Self::AccessDenied { .. })
    }
}

/// Convenience result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_classify_not_found() {
        let err = StoreError::NotFound {
            key: "a/b.html".to_owned(),
        };
        assert!(err.is_not_found());
        assert!(!err.is_access_denied());
        assert!(err.to_string().contains("a/b.html"));
    }

    #[test]
    fn test_should_classify_access_denied() {
        let err = StoreError::AccessDenied {
            key: "private.css".to_owned(),
        };
        assert!(err.is_access_denied());
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_should_not_classify_service_fault_as_absence() {
        let err = StoreError::Service {
            key: "k".to_owned(),
            message: "timed out".to_owned(),
        };
        assert!(!err.is_not_found());
        assert!(!err.is_access_denied());
        assert!(err.to_string().contains("timed out"));
    }

    #[test]
    fn test_should_wrap_internal_errors() {
        let err: StoreError = anyhow::anyhow!("bad client state").into();
        assert!(!err.is_not_found());
    }
}
