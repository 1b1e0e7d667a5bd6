//! The object store trait consumed by the request handler.

use bytes::Bytes;

use crate::error::StoreResult;
use crate::metadata::ObjectMetadata;

/// A read-only object store exposing metadata and byte fetches per key.
///
/// Implementations must be safe for concurrent use across requests; the
/// handler holds a single shared handle for the lifetime of the process.
/// A missing key must surface as [`StoreError::NotFound`] and a refused key
/// as [`StoreError::AccessDenied`] — the resolution cascade treats those as
/// branch signals, distinct from genuine service faults.
///
/// [`StoreError::NotFound`]: crate::StoreError::NotFound
/// [`StoreError::AccessDenied`]: crate::StoreError::AccessDenied
#[async_trait::async_trait]
pub trait ObjectStore: Send + Sync {
    /// Fetch the descriptive attributes of `key` without its body.
    async fn head(&self, key: &str) -> StoreResult<ObjectMetadata>;

    /// Fetch the full body of `key`.
    async fn get(&self, key: &str) -> StoreResult<Bytes>;
}
