//! In-memory object store backend.
//!
//! Keeps whole objects as [`Bytes`] in a [`DashMap`] keyed by object key.
//! Used by tests and local runs in place of a real store, including the
//! fallback-resilience tests: individual keys can be marked as
//! access-denied or faulted so every branch of the error taxonomy can be
//! exercised without a network.

use bytes::Bytes;
use dashmap::DashMap;
use tracing::trace;

use crate::error::{StoreError, StoreResult};
use crate::metadata::ObjectMetadata;
use crate::store::ObjectStore;

/// How a stored entry responds to probes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EntryState {
    /// Normal entry: head and get succeed.
    Available,
    /// Every probe returns [`StoreError::AccessDenied`].
    Denied,
    /// Every probe returns [`StoreError::Service`].
    Faulted,
}

/// A stored object with its metadata and probe behavior.
#[derive(Debug, Clone)]
struct StoredObject {
    data: Bytes,
    metadata: ObjectMetadata,
    state: EntryState,
}

/// In-memory [`ObjectStore`] with per-key fault injection.
///
/// # Examples
///
/// ```
/// use bytes::Bytes;
/// use staticedge_store::{MemoryStore, ObjectMetadata, ObjectStore};
///
/// # tokio_test::block_on(async {
/// let store = MemoryStore::new();
/// store.put("site/index.html", Bytes::from("<html/>"), ObjectMetadata::default());
/// let data = store.get("site/index.html").await.unwrap();
/// assert_eq!(data.as_ref(), b"<html/>");
/// # });
/// ```
#[derive(Debug, Default)]
pub struct MemoryStore {
    objects: DashMap<String, StoredObject>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an object.
    pub fn put(&self, key: impl Into<String>, data: Bytes, metadata: ObjectMetadata) {
        let key = key.into();
        trace!(key, size = data.len(), "storing object");
        self.objects.insert(
            key,
            StoredObject {
                data,
                metadata,
                state: EntryState::Available,
            },
        );
    }

    /// Make every probe of `key` fail with [`StoreError::AccessDenied`].
    ///
    /// The key needs no stored body; denial is decided before the lookup
    /// would return data.
    pub fn deny(&self, key: impl Into<String>) {
        self.objects.insert(
            key.into(),
            StoredObject {
                data: Bytes::new(),
                metadata: ObjectMetadata::default(),
                state: EntryState::Denied,
            },
        );
    }

    /// Make every probe of `key` fail with [`StoreError::Service`].
    pub fn fault(&self, key: impl Into<String>) {
        self.objects.insert(
            key.into(),
            StoredObject {
                data: Bytes::new(),
                metadata: ObjectMetadata::default(),
                state: EntryState::Faulted,
            },
        );
    }

    /// Remove an object. No-op if the key does not exist.
    pub fn remove(&self, key: &str) {
        self.objects.remove(key);
    }

    /// Number of entries, including denied/faulted markers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether the store holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Look up an entry, resolving its injected probe behavior.
    fn entry(&self, key: &str) -> StoreResult<StoredObject> {
        let Some(entry) = self.objects.get(key) else {
            return Err(StoreError::NotFound {
                key: key.to_owned(),
            });
        };

        match entry.state {
            EntryState::Available => Ok(entry.value().clone()),
            EntryState::Denied => Err(StoreError::AccessDenied {
                key: key.to_owned(),
            }),
            EntryState::Faulted => Err(StoreError::Service {
                key: key.to_owned(),
                message: "injected fault".to_owned(),
            }),
        }
    }
}

#[async_trait::async_trait]
impl ObjectStore for MemoryStore {
    async fn head(&self, key: &str) -> StoreResult<ObjectMetadata> {
        self.entry(key).map(|obj| obj.metadata)
    }

    async fn get(&self, key: &str) -> StoreResult<Bytes> {
        self.entry(key).map(|obj| obj.data)
    }
}
