//! S3 object store backend.
//!
//! Thin adapter from the AWS SDK onto [`ObjectStore`]. The only logic here
//! is error classification: SDK failures are folded into the tagged
//! [`StoreError`] taxonomy at this boundary so the resolution cascade never
//! inspects SDK error types itself. A missing key (`NotFound` on head,
//! `NoSuchKey` on get) becomes [`StoreError::NotFound`]; an `AccessDenied`
//! service code becomes [`StoreError::AccessDenied`]; everything else,
//! including dispatch and timeout failures, becomes [`StoreError::Service`].

use aws_sdk_s3::Client;
use aws_sdk_s3::error::{ProvideErrorMetadata, SdkError};
use aws_sdk_s3::operation::get_object::GetObjectError;
use aws_sdk_s3::operation::head_object::HeadObjectError;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::metadata::ObjectMetadata;
use crate::store::ObjectStore;

/// [`ObjectStore`] backed by an S3 bucket.
///
/// The inner client is cheap to clone and safe for concurrent use; one
/// `S3Store` is shared across all requests for the process lifetime.
#[derive(Debug, Clone)]
pub struct S3Store {
    client: Client,
    bucket: String,
}

impl S3Store {
    /// Create a store over an existing client and bucket.
    #[must_use]
    pub fn new(client: Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }

    /// Create a store from the ambient AWS environment (credentials chain,
    /// region) for the given bucket.
    pub async fn from_env(bucket: impl Into<String>) -> Self {
        let config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        Self::new(Client::new(&config), bucket)
    }

    /// The bucket this store reads from.
    #[must_use]
    pub fn bucket(&self) -> &str {
        &self.bucket
    }
}

#[async_trait::async_trait]
impl ObjectStore for S3Store {
    async fn head(&self, key: &str) -> StoreResult<ObjectMetadata> {
        debug!(bucket = %self.bucket, key, "head object");
        let out = self
            .client
            .head_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|err| classify_head_error(key, err))?;

        Ok(ObjectMetadata {
            content_type: out.content_type().map(ToOwned::to_owned),
            content_encoding: out.content_encoding().map(ToOwned::to_owned),
            content_language: out.content_language().map(ToOwned::to_owned),
            e_tag: out.e_tag().map(ToOwned::to_owned),
            expires: out.expires_string().map(ToOwned::to_owned),
            last_modified: out.last_modified().and_then(to_chrono),
        })
    }

    async fn get(&self, key: &str) -> StoreResult<Bytes> {
        debug!(bucket = %self.bucket, key, "get object");
        let out = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|err| classify_get_error(key, err))?;

        let collected = out.body.collect().await.map_err(|err| StoreError::Service {
            key: key.to_owned(),
            message: format!("failed to read object body: {err}"),
        })?;
        Ok(collected.into_bytes())
    }
}

/// Convert an SDK timestamp to chrono.
fn to_chrono(ts: &aws_sdk_s3::primitives::DateTime) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(ts.secs(), ts.subsec_nanos())
}

/// Classify a `HeadObject` failure into the store taxonomy.
fn classify_head_error(key: &str, err: SdkError<HeadObjectError>) -> StoreError {
    let service_err = match err {
        SdkError::ServiceError(ctx) => ctx.into_err(),
        other => {
            return StoreError::Service {
                key: key.to_owned(),
                message: other.to_string(),
            };
        }
    };

    if service_err.is_not_found() {
        StoreError::NotFound {
            key: key.to_owned(),
        }
    } else if is_access_denied(&service_err) {
        StoreError::AccessDenied {
            key: key.to_owned(),
        }
    } else {
        StoreError::Service {
            key: key.to_owned(),
            message: service_err.to_string(),
        }
    }
}

/// Classify a `GetObject` failure into the store taxonomy.
fn classify_get_error(key: &str, err: SdkError<GetObjectError>) -> StoreError {
    let service_err = match err {
        SdkError::ServiceError(ctx) => ctx.into_err(),
        other => {
            return StoreError::Service {
                key: key.to_owned(),
                message: other.to_string(),
            };
        }
    };

    if service_err.is_no_such_key() {
        StoreError::NotFound {
            key: key.to_owned(),
        }
    } else if is_access_denied(&service_err) {
        StoreError::AccessDenied {
            key: key.to_owned(),
        }
    } else {
        StoreError::Service {
            key: key.to_owned(),
            message: service_err.to_string(),
        }
    }
}

/// `AccessDenied` has no modeled variant on these operations; it only shows
/// up in the error metadata code.
fn is_access_denied<E: ProvideErrorMetadata>(err: &E) -> bool {
    err.code() == Some("AccessDenied")
}

#[cfg(test)]
mod tests {
    use aws_sdk_s3::error::ErrorMetadata;
    use aws_sdk_s3::types::error::NotFound;

    use super::*;

    #[test]
    fn test_should_detect_access_denied_from_error_code() {
        let err = HeadObjectError::generic(
            ErrorMetadata::builder()
                .code("AccessDenied")
                .message("Access Denied")
                .build(),
        );
        assert!(is_access_denied(&err));
    }

    #[test]
    fn test_should_not_flag_other_codes_as_access_denied() {
        let err = HeadObjectError::generic(
            ErrorMetadata::builder().code("SlowDown").build(),
        );
        assert!(!is_access_denied(&err));
    }

    #[test]
    fn test_should_mark_head_not_found_variant() {
        let err = HeadObjectError::NotFound(NotFound::builder().build());
        assert!(err.is_not_found());
    }

    #[test]
    fn test_should_convert_sdk_timestamp() {
        // 2024-01-01T00:00:00Z
        let ts = aws_sdk_s3::primitives::DateTime::from_secs(1_704_067_200);
        let converted = to_chrono(&ts).expect("in range");
        assert_eq!(converted.timestamp(), 1_704_067_200);
    }
}
