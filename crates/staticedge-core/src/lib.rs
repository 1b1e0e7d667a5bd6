//! Content-negotiating request handling for object-store-backed static
//! sites.
//!
//! Sites are published as trees of objects alongside pre-generated
//! variants: webp transcodes of images and brotli/zstd/gzip encodings of
//! text assets, each stored under the base key plus a suffix. The handler
//! resolves a request path to candidate keys, reads the client's `Accept`
//! and `Accept-Encoding` signals, and serves the best variant that actually
//! exists, with caching and metadata headers assembled once per request.
//!
//! The crate is transport-agnostic: [`SiteHandler::handle`] takes a path
//! and header map and returns a [`SiteResponse`]; the [`event`] module
//! bridges that to a JSON invocation protocol, and an HTTP front end maps
//! it onto `http` types.

mod config;
mod event;
mod handler;
mod negotiate;
mod path;
mod response;
mod variant;

pub use config::{DEFAULT_CACHE_PERIOD_SECS, SiteConfig};
pub use event::{RequestEvent, ResponseEvent};
pub use handler::SiteHandler;
pub use negotiate::ClientCapabilities;
pub use path::{FOLDER_SUFFIX, KeyCandidates, resolve_keys};
pub use response::SiteResponse;
pub use variant::{ENCODINGS, TransportEncoding, VariantCandidate, VariantPlan, plan};
