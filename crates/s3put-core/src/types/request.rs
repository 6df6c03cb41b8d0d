//! Upload request types.

use std::time::Duration;

use bytes::Bytes;

use super::{CannedAcl, ObjectBody};
use crate::{Error, Result};

/// A single object upload as requested by the caller.
#[derive(Debug)]
pub struct UploadRequest {
    /// Target bucket name.
    pub bucket: String,
    /// Target object key.
    pub key: String,
    /// Upload deadline; `None` or zero means no deadline.
    pub timeout: Option<Duration>,
    /// Content-Type to store with the object, left to the backend when unset.
    pub content_type: Option<String>,
    /// Canned ACL applied to the object, the bucket default when unset.
    pub acl: Option<CannedAcl>,
    /// Object payload.
    pub body: ObjectBody,
}

impl UploadRequest {
    /// Creates an upload request without a deadline.
    pub fn new(bucket: impl Into<String>, key: impl Into<String>, body: ObjectBody) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
            timeout: None,
            content_type: None,
            acl: None,
            body,
        }
    }

    /// Sets the upload timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the Content-Type of the object.
    #[must_use]
    pub fn with_content_type(mut self, content_type: Option<String>) -> Self {
        self.content_type = content_type;
        self
    }

    /// Sets the canned ACL of the object.
    #[must_use]
    pub fn with_acl(mut self, acl: Option<CannedAcl>) -> Self {
        self.acl = acl;
        self
    }

    /// Returns the effective deadline, treating zero as no deadline.
    pub fn deadline(&self) -> Option<Duration> {
        self.timeout.filter(|timeout| !timeout.is_zero())
    }

    /// Checks that the bucket and key are non-empty.
    ///
    /// # Errors
    ///
    /// Returns a [`Configuration`](crate::ErrorKind::Configuration) error
    /// naming the empty field.
    pub fn validate(&self) -> Result<()> {
        if self.bucket.is_empty() {
            return Err(Error::configuration().with_message("bucket name must not be empty"));
        }
        if self.key.is_empty() {
            return Err(Error::configuration().with_message("object key must not be empty"));
        }
        Ok(())
    }
}

/// A put-object call as seen by a storage provider.
#[derive(Debug, Clone)]
pub struct PutObjectRequest {
    /// Target bucket name.
    pub bucket: String,
    /// Target object key.
    pub key: String,
    /// Complete object payload.
    pub body: Bytes,
    /// Optional Content-Type header value.
    pub content_type: Option<String>,
    /// Optional `x-amz-acl` header value.
    pub acl: Option<CannedAcl>,
}

impl PutObjectRequest {
    /// Creates a put-object request.
    pub fn new(bucket: impl Into<String>, key: impl Into<String>, body: Bytes) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
            body,
            content_type: None,
            acl: None,
        }
    }

    /// Sets the Content-Type header value.
    #[must_use]
    pub fn with_content_type(mut self, content_type: Option<String>) -> Self {
        self.content_type = content_type;
        self
    }

    /// Sets the canned ACL.
    #[must_use]
    pub fn with_acl(mut self, acl: Option<CannedAcl>) -> Self {
        self.acl = acl;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    #[test]
    fn zero_timeout_means_no_deadline() {
        let request = UploadRequest::new("alice", "sample.txt", ObjectBody::default())
            .with_timeout(Some(Duration::ZERO));
        assert_eq!(request.deadline(), None);

        let request = request.with_timeout(Some(Duration::from_secs(30)));
        assert_eq!(request.deadline(), Some(Duration::from_secs(30)));

        let request = request.with_timeout(None);
        assert_eq!(request.deadline(), None);
    }

    #[test]
    fn validate_rejects_empty_bucket_and_key() {
        let request = UploadRequest::new("", "sample.txt", ObjectBody::default());
        let error = request.validate().unwrap_err();
        assert_eq!(error.kind, ErrorKind::Configuration);
        assert!(error.to_string().contains("bucket"));

        let request = UploadRequest::new("alice", "", ObjectBody::default());
        let error = request.validate().unwrap_err();
        assert!(error.to_string().contains("key"));

        let request = UploadRequest::new("alice", "sample.txt", ObjectBody::default());
        assert!(request.validate().is_ok());
    }
}
