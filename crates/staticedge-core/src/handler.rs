//! Request orchestration.
//!
//! One request flows through: path resolution → metadata probe of the
//! primary key, then the folder-index key → variant plan evaluation →
//! response assembly. Every probe is single-attempt; absence is a silent
//! branch signal, access denial and service faults are logged and treated
//! as misses during optional probing. Only the base-object fetch itself —
//! the last resort, with nothing left to fall back to — turns a failure
//! into a 5xx response.

use std::collections::HashMap;
use std::sync::Arc;

use bytes::Bytes;
use tracing::{debug, error, warn};

use staticedge_store::{ObjectMetadata, ObjectStore};

use crate::config::SiteConfig;
use crate::negotiate::ClientCapabilities;
use crate::response::{self, SiteResponse};
use crate::{path, variant};

/// The stateless request handler.
///
/// Holds the only long-lived state in the system: the shared store handle
/// and the immutable configuration. Cheap to clone; safe to drive from any
/// number of concurrent requests.
#[derive(Clone)]
pub struct SiteHandler {
    store: Arc<dyn ObjectStore>,
    config: Arc<SiteConfig>,
}

impl std::fmt::Debug for SiteHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SiteHandler")
            .field("bucket", &self.config.bucket)
            .field("prefix", &self.config.prefix)
            .finish_non_exhaustive()
    }
}

impl SiteHandler {
    /// Create a handler over a store and configuration.
    #[must_use]
    pub fn new(store: Arc<dyn ObjectStore>, config: SiteConfig) -> Self {
        Self {
            store,
            config: Arc::new(config),
        }
    }

    /// Handle one request: resolve, negotiate, fetch, assemble.
    ///
    /// Always yields exactly one complete response; store failures surface
    /// as 404 or 500 responses, never as errors to the caller.
    pub async fn handle(&self, request_path: &str, headers: &HashMap<String, String>) -> SiteResponse {
        let caps = ClientCapabilities::from_headers(headers);
        let keys = path::resolve_keys(&self.config.prefix, request_path);

        if let Some(key) = &keys.object {
            if let Some(metadata) = self.probe(key).await {
                return self.serve(key, &metadata, &caps).await;
            }
        }

        let key = &keys.folder_index;
        if let Some(metadata) = self.probe(key).await {
            return self.serve(key, &metadata, &caps).await;
        }

        debug!(path = request_path, "no object at primary or folder-index key");
        response::not_found()
    }

    /// Metadata probe with the uniform miss policy: absence is silent,
    /// everything else logs and still counts as a miss for this key.
    async fn probe(&self, key: &str) -> Option<ObjectMetadata> {
        match self.store.head(key).await {
            Ok(metadata) => Some(metadata),
            Err(err) if err.is_not_found() => {
                debug!(key, "object absent");
                None
            }
            Err(err) if err.is_access_denied() => {
                warn!(key, error = %err, "metadata probe denied");
                None
            }
            Err(err) => {
                error!(key, error = %err, "metadata probe failed");
                None
            }
        }
    }

    /// Evaluate the variant plan for a resolved base key.
    ///
    /// Candidates are tried in order under the same miss policy as
    /// [`probe`](Self::probe); the base fetch at the end is the only call
    /// whose failure escalates.
    async fn serve(
        &self,
        base_key: &str,
        metadata: &ObjectMetadata,
        caps: &ClientCapabilities,
    ) -> SiteResponse {
        let plan = variant::plan(base_key, metadata, caps);

        for candidate in &plan.candidates {
            if let Some(body) = self.try_variant(&candidate.key).await {
                debug!(key = %candidate.key, "serving substituted variant");
                return response::assemble(body, metadata, candidate, self.config.cache_period_secs);
            }
        }

        match self.store.get(&plan.fallback.key).await {
            Ok(body) => {
                response::assemble(body, metadata, &plan.fallback, self.config.cache_period_secs)
            }
            Err(err) => {
                error!(key = %plan.fallback.key, error = %err, "base object fetch failed");
                response::internal_error()
            }
        }
    }

    /// Fetch one variant candidate, folding every failure into a miss.
    async fn try_variant(&self, key: &str) -> Option<Bytes> {
        match self.store.get(key).await {
            Ok(body) => Some(body),
            Err(err) if err.is_not_found() => {
                debug!(key, "variant absent");
                None
            }
            Err(err) if err.is_access_denied() => {
                warn!(key, error = %err, "variant probe denied");
                None
            }
            Err(err) => {
                error!(key, error = %err, "variant probe failed");
                None
            }
        }
    }
}
