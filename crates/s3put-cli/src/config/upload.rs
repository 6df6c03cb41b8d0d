//! Upload target and credential arguments.

use std::time::Duration;

use clap::Args;
use jiff::SignedDuration;
use s3put_core::{CannedAcl, Credentials, ObjectBody, UploadRequest};

/// What to upload, where, and with which credentials.
#[derive(Clone, Args)]
pub struct UploadArgs {
    /// Access key (API key) of the storage account
    #[arg(short = 'a', long = "access-key", env = "S3PUT_ACCESS_KEY")]
    pub access_key: String,

    /// Secret key of the storage account
    #[arg(
        short = 's',
        long = "secret-key",
        env = "S3PUT_SECRET_KEY",
        hide_env_values = true
    )]
    pub secret_key: String,

    /// Target bucket
    #[arg(short = 'b', long = "bucket", env = "S3PUT_BUCKET")]
    pub bucket: String,

    /// Target object key
    #[arg(short = 'k', long = "key", env = "S3PUT_KEY")]
    pub key: String,

    /// Upload timeout, e.g. `30s`, `1m30s`; `0` disables the deadline
    #[arg(short = 'd', long = "timeout", env = "S3PUT_TIMEOUT", value_parser = parse_timeout)]
    pub timeout: Option<Duration>,

    /// Content-Type stored with the object
    #[arg(long = "content-type", env = "S3PUT_CONTENT_TYPE")]
    pub content_type: Option<String>,

    /// Canned ACL applied to the object
    #[arg(long = "acl", env = "S3PUT_ACL", value_enum)]
    pub acl: Option<CannedAcl>,
}

impl std::fmt::Debug for UploadArgs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadArgs")
            .field("access_key", &self.access_key)
            .field("secret_key", &"[REDACTED]")
            .field("bucket", &self.bucket)
            .field("key", &self.key)
            .field("timeout", &self.timeout)
            .field("content_type", &self.content_type)
            .field("acl", &self.acl)
            .finish()
    }
}

impl UploadArgs {
    /// Returns the static credentials.
    pub fn credentials(&self) -> Credentials {
        Credentials::new(&self.access_key, &self.secret_key)
    }

    /// Builds the upload request for `body`.
    pub fn request(&self, body: ObjectBody) -> UploadRequest {
        UploadRequest::new(&self.bucket, &self.key, body)
            .with_timeout(self.timeout)
            .with_content_type(self.content_type.clone())
            .with_acl(self.acl)
    }
}

/// Parses a timeout such as `30s`, `1ms` or `1m30s`.
///
/// A bare `0` is accepted and means no deadline. Negative durations are
/// rejected.
fn parse_timeout(input: &str) -> Result<Duration, String> {
    let input = input.trim();
    if input == "0" {
        return Ok(Duration::ZERO);
    }

    let duration: SignedDuration = input
        .parse()
        .map_err(|e| format!("invalid duration '{input}': {e}"))?;
    if duration.is_negative() {
        return Err(format!("timeout must not be negative, got '{input}'"));
    }

    Duration::try_from(duration).map_err(|e| format!("invalid duration '{input}': {e}"))
}
