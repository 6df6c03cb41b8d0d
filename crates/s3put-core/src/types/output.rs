//! Upload result types.

use std::time::Duration;

/// Response metadata of a successful put-object call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PutObjectOutput {
    /// Entity tag of the stored object, if the backend returned one.
    pub e_tag: Option<String>,
    /// Version identifier of the stored object, if versioning is enabled.
    pub version_id: Option<String>,
    /// Request identifier assigned by the backend.
    pub request_id: Option<String>,
}

/// Outcome of a successful upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadOutput {
    /// Bucket the object was written to, unchanged from the request.
    pub bucket: String,
    /// Key the object was written to, unchanged from the request.
    pub key: String,
    /// Number of payload bytes uploaded.
    pub size: u64,
    /// Entity tag of the stored object.
    pub e_tag: Option<String>,
    /// Version identifier of the stored object.
    pub version_id: Option<String>,
    /// Wall-clock time spent on the upload.
    pub elapsed: Duration,
}

impl UploadOutput {
    /// Returns the `{bucket}/{key}` location of the uploaded object.
    pub fn location(&self) -> String {
        format!("{}/{}", self.bucket, self.key)
    }
}
