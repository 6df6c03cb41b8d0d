//! Storage provider trait.

use crate::{PutObjectOutput, PutObjectRequest, Result};

/// Core trait for object storage backends.
///
/// Implement this trait to plug a different storage client into the
/// [`Uploader`](crate::Uploader) without touching the CLI or the error
/// classification.
#[async_trait::async_trait]
pub trait ObjectProvider: Send + Sync {
    /// Stores `request.body` at `request.bucket`/`request.key`.
    ///
    /// Implementations issue exactly one request and never retry on their own.
    async fn put_object(&self, request: PutObjectRequest) -> Result<PutObjectOutput>;
}
