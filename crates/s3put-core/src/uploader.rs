//! Deadline-bound single-object upload.

use std::future::Future;
use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken;

use crate::{
    Error, ObjectService, PutObjectOutput, PutObjectRequest, Result, TRACING_TARGET_UPLOAD,
    UploadOutput, UploadRequest,
};

/// Uploads one object per call through an [`ObjectService`].
///
/// The whole operation (draining the body and the put-object call) runs
/// under the request's deadline. When the deadline elapses or the
/// cancellation token fires, the in-flight future is dropped, which aborts
/// the network request and releases everything it holds.
#[derive(Debug, Clone)]
pub struct Uploader {
    service: ObjectService,
}

impl Uploader {
    /// Creates an uploader backed by the given service.
    pub fn new(service: ObjectService) -> Self {
        Self { service }
    }

    /// Returns the underlying object service.
    pub fn service(&self) -> &ObjectService {
        &self.service
    }

    /// Uploads a single object.
    ///
    /// # Errors
    ///
    /// Returns a classified [`Error`]: `Configuration` for an invalid request,
    /// `Canceled` when the deadline elapses, and whatever the provider
    /// reports otherwise.
    pub async fn upload(&self, request: UploadRequest) -> Result<UploadOutput> {
        self.upload_with_cancellation(request, CancellationToken::new())
            .await
    }

    /// Uploads a single object, aborting early when `token` is cancelled.
    ///
    /// # Errors
    ///
    /// Same as [`upload`](Self::upload); cancellation through `token` is
    /// reported as a `Canceled` error.
    pub async fn upload_with_cancellation(
        &self,
        request: UploadRequest,
        token: CancellationToken,
    ) -> Result<UploadOutput> {
        request.validate()?;

        let started_at = Instant::now();
        let deadline = request.deadline();
        let bucket = request.bucket.clone();
        let key = request.key.clone();

        tracing::debug!(
            target: TRACING_TARGET_UPLOAD,
            bucket = %bucket,
            key = %key,
            deadline = ?deadline,
            "Starting upload"
        );

        let result = tokio::select! {
            biased;
            () = token.cancelled() => {
                Err(Error::canceled().with_message("upload interrupted"))
            }
            result = with_deadline(deadline, self.execute(request)) => result,
        };

        let elapsed = started_at.elapsed();
        match result {
            Ok((size, output)) => {
                tracing::info!(
                    target: TRACING_TARGET_UPLOAD,
                    bucket = %bucket,
                    key = %key,
                    size,
                    e_tag = ?output.e_tag,
                    elapsed_ms = elapsed.as_millis(),
                    "Upload completed"
                );

                Ok(UploadOutput {
                    bucket,
                    key,
                    size,
                    e_tag: output.e_tag,
                    version_id: output.version_id,
                    elapsed,
                })
            }
            Err(error) => {
                tracing::debug!(
                    target: TRACING_TARGET_UPLOAD,
                    bucket = %bucket,
                    key = %key,
                    kind = %error.kind,
                    elapsed_ms = elapsed.as_millis(),
                    "Upload aborted"
                );
                Err(error)
            }
        }
    }

    /// Drains the body and issues the put-object call.
    async fn execute(&self, request: UploadRequest) -> Result<(u64, PutObjectOutput)> {
        let UploadRequest {
            bucket,
            key,
            content_type,
            acl,
            body,
            ..
        } = request;

        let body = body.collect().await?;
        let size = body.len() as u64;

        let request = PutObjectRequest::new(bucket, key, body)
            .with_content_type(content_type)
            .with_acl(acl);
        let output = self.service.put_object(request).await?;
        Ok((size, output))
    }
}

/// Runs `future` to completion, or fails with `Canceled` once `deadline` elapses.
async fn with_deadline<T, F>(deadline: Option<Duration>, future: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    let Some(limit) = deadline else {
        return future.await;
    };

    match tokio::time::timeout(limit, future).await {
        Ok(result) => result,
        Err(_elapsed) => Err(Error::canceled().with_message(format!(
            "deadline of {limit:?} exceeded before the upload completed"
        ))),
    }
}
