//! In-memory storage provider for testing.
//!
//! # Feature Flag
//!
//! This module is only available when the `test-utils` feature is enabled:
//!
//! ```toml
//! [dev-dependencies]
//! s3put-core = { version = "...", features = ["test-utils"] }
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use s3put_core::mock::MockProvider;
//! use s3put_core::{ObjectService, Uploader};
//!
//! let provider = MockProvider::new().with_latency(Duration::from_millis(50));
//! let uploader = Uploader::new(ObjectService::new(provider.clone()));
//! ```

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use bytes::Bytes;
use tokio::sync::RwLock;

use crate::{
    CannedAcl, Error, ObjectProvider, PutObjectOutput, PutObjectRequest, RemoteError, Result,
};

/// An object held by the [`MockProvider`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    /// Object payload.
    pub body: Bytes,
    /// Content-Type sent with the object.
    pub content_type: Option<String>,
    /// Canned ACL sent with the object.
    pub acl: Option<CannedAcl>,
}

#[derive(Debug, Default)]
struct MockState {
    objects: RwLock<HashMap<(String, String), StoredObject>>,
    puts: AtomicUsize,
}

/// In-memory [`ObjectProvider`] with optional latency and failure injection.
///
/// Clones share the same object map, so a test can keep one handle for
/// assertions while the uploader owns another.
#[derive(Debug, Clone, Default)]
pub struct MockProvider {
    state: Arc<MockState>,
    latency: Option<Duration>,
    failure: Option<RemoteError>,
}

impl MockProvider {
    /// Creates an empty mock provider that accepts every upload.
    pub fn new() -> Self {
        Self::default()
    }

    /// Delays every put-object call by `latency`.
    #[must_use]
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Fails every put-object call with the given remote error.
    #[must_use]
    pub fn with_failure(mut self, failure: RemoteError) -> Self {
        self.failure = Some(failure);
        self
    }

    /// Returns the payload stored at `bucket`/`key`.
    pub async fn object(&self, bucket: &str, key: &str) -> Option<Bytes> {
        self.stored(bucket, key).await.map(|object| object.body)
    }

    /// Returns the stored object at `bucket`/`key`, including its metadata.
    pub async fn stored(&self, bucket: &str, key: &str) -> Option<StoredObject> {
        let objects = self.state.objects.read().await;
        objects.get(&(bucket.to_owned(), key.to_owned())).cloned()
    }

    /// Number of put-object calls that reached the provider.
    pub fn put_count(&self) -> usize {
        self.state.puts.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl ObjectProvider for MockProvider {
    async fn put_object(&self, request: PutObjectRequest) -> Result<PutObjectOutput> {
        let sequence = self.state.puts.fetch_add(1, Ordering::SeqCst) + 1;

        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        if let Some(failure) = &self.failure {
            return Err(Error::remote_api(failure.clone()));
        }

        let object = StoredObject {
            body: request.body,
            content_type: request.content_type,
            acl: request.acl,
        };
        let mut objects = self.state.objects.write().await;
        objects.insert((request.bucket, request.key), object);

        Ok(PutObjectOutput {
            e_tag: Some(format!("\"mock-{sequence}\"")),
            version_id: None,
            request_id: Some(format!("mock-request-{sequence}")),
        })
    }
}
