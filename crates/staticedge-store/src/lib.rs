//! Object store gateway for StaticEdge.
//!
//! Abstracts "fetch metadata for key" and "fetch bytes for key" behind the
//! [`ObjectStore`] trait, with a tagged error taxonomy that keeps "does not
//! exist" distinguishable from every other failure. Two backends:
//! [`S3Store`] for production and [`MemoryStore`] for tests and local runs.

mod error;
mod memory;
mod metadata;
mod s3;
mod store;

pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use metadata::ObjectMetadata;
pub use s3::S3Store;
pub use store::ObjectStore;
