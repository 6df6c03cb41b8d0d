//! Object service wrapper with observability.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use crate::{ObjectProvider, PutObjectOutput, PutObjectRequest, Result, TRACING_TARGET_PROVIDER};

/// Object service wrapper with observability.
///
/// This wrapper adds structured logging to any storage provider.
/// The inner provider is wrapped in `Arc` for cheap cloning.
#[derive(Clone)]
pub struct ObjectService {
    inner: Arc<dyn ObjectProvider>,
}

impl fmt::Debug for ObjectService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectService").finish_non_exhaustive()
    }
}

impl ObjectService {
    /// Create a new object service wrapper.
    pub fn new<P>(provider: P) -> Self
    where
        P: ObjectProvider + 'static,
    {
        Self {
            inner: Arc::new(provider),
        }
    }

    /// Stores an object through the wrapped provider.
    pub async fn put_object(&self, request: PutObjectRequest) -> Result<PutObjectOutput> {
        let started_at = Instant::now();
        let bucket = request.bucket.clone();
        let key = request.key.clone();

        tracing::debug!(
            target: TRACING_TARGET_PROVIDER,
            bucket = %bucket,
            key = %key,
            size = request.body.len(),
            content_type = ?request.content_type,
            acl = ?request.acl,
            "Putting object"
        );

        let result = self.inner.put_object(request).await;
        let elapsed = started_at.elapsed();

        match &result {
            Ok(output) => {
                tracing::debug!(
                    target: TRACING_TARGET_PROVIDER,
                    bucket = %bucket,
                    key = %key,
                    e_tag = ?output.e_tag,
                    request_id = ?output.request_id,
                    elapsed_ms = elapsed.as_millis(),
                    "Object stored"
                );
            }
            Err(error) => {
                tracing::debug!(
                    target: TRACING_TARGET_PROVIDER,
                    bucket = %bucket,
                    key = %key,
                    kind = %error.kind,
                    error = %error,
                    elapsed_ms = elapsed.as_millis(),
                    "Put object failed"
                );
            }
        }

        result
    }
}
