//! CLI configuration management.
//!
//! ```text
//! Cli
//! ├── upload: UploadArgs   # Credentials, bucket, key, timeout, content type, ACL
//! └── s3: S3Config         # Signing version, debug logging
//! ```
//!
//! Every option can also be set through its `S3PUT_*` environment variable.
//! Endpoint and region are fixed and cannot be overridden.

mod upload;

use std::process;

use clap::Parser;
use s3put_aws::S3Config;
pub use upload::UploadArgs;

use crate::{TRACING_TARGET_CONFIG, TRACING_TARGET_STARTUP};

/// Complete CLI configuration.
#[derive(Debug, Clone, Parser)]
#[command(name = "s3put")]
#[command(about = "Upload standard input to S3-compatible object storage")]
#[command(version)]
pub struct Cli {
    /// Upload target and credentials.
    #[clap(flatten)]
    pub upload: UploadArgs,

    /// Storage client configuration.
    #[clap(flatten)]
    pub s3: S3Config,
}

impl Cli {
    /// Loads environment variables from .env file (if enabled) and parses CLI arguments.
    pub fn init() -> Self {
        Self::load_dotenv();
        Self::parse()
    }

    /// Loads environment variables from .env file if the dotenv feature is enabled.
    #[cfg(feature = "dotenv")]
    fn load_dotenv() {
        if let Err(err) = dotenvy::dotenv()
            && !err.not_found()
        {
            eprintln!("Warning: failed to load .env file: {err}");
        }
    }

    /// No-op when dotenv feature is disabled.
    #[cfg(not(feature = "dotenv"))]
    fn load_dotenv() {}

    /// Logs build information at debug level.
    fn log_build_info() {
        tracing::debug!(
            target: TRACING_TARGET_STARTUP,
            version = env!("CARGO_PKG_VERSION"),
            pid = process::id(),
            arch = std::env::consts::ARCH,
            os = std::env::consts::OS,
            features = ?Self::enabled_features(),
            "Build information"
        );
    }

    /// Logs configuration at debug level (no sensitive information).
    pub fn log(&self) {
        Self::log_build_info();

        tracing::debug!(
            target: TRACING_TARGET_CONFIG,
            bucket = %self.upload.bucket,
            key = %self.upload.key,
            timeout = ?self.upload.timeout,
            content_type = ?self.upload.content_type,
            acl = ?self.upload.acl,
            endpoint = %self.s3.endpoint,
            region = %self.s3.region,
            signing_version = %self.s3.signing_version,
            "Upload configuration"
        );
    }

    /// Returns a list of enabled compile-time features.
    fn enabled_features() -> Vec<&'static str> {
        [cfg!(feature = "dotenv").then_some("dotenv")]
            .into_iter()
            .flatten()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use clap::CommandFactory;
    use s3put_aws::{DEFAULT_ENDPOINT, DEFAULT_REGION, SigningVersion};
    use s3put_core::CannedAcl;

    use super::*;

    #[test]
    fn command_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_short_flags() {
        let cli = Cli::try_parse_from([
            "s3put", "-a", "access", "-s", "secret", "-b", "alice", "-k", "sample.txt", "-d",
            "30s",
        ])
        .unwrap();

        assert_eq!(cli.upload.access_key, "access");
        assert_eq!(cli.upload.secret_key, "secret");
        assert_eq!(cli.upload.bucket, "alice");
        assert_eq!(cli.upload.key, "sample.txt");
        assert_eq!(cli.upload.timeout, Some(Duration::from_secs(30)));
        assert_eq!(cli.s3.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(cli.s3.region, DEFAULT_REGION);
        assert!(cli.s3.path_style);
        assert_eq!(cli.s3.signing_version, SigningVersion::V4);
        assert_eq!(cli.upload.acl, None);
        assert!(!cli.s3.debug);
    }

    #[test]
    fn parses_long_flags() {
        let cli = Cli::try_parse_from([
            "s3put",
            "--access-key=access",
            "--secret-key=secret",
            "--bucket=alice",
            "--key=dir/sample.txt",
            "--content-type=text/plain",
            "--acl=public-read",
            "--signing-version=v2",
            "--debug",
        ])
        .unwrap();

        assert_eq!(cli.upload.key, "dir/sample.txt");
        assert_eq!(cli.upload.timeout, None);
        assert_eq!(cli.upload.content_type.as_deref(), Some("text/plain"));
        assert_eq!(cli.upload.acl, Some(CannedAcl::PublicRead));
        assert_eq!(cli.s3.signing_version, SigningVersion::V2);
        assert!(cli.s3.debug);
    }

    #[test]
    fn rejects_unknown_acl() {
        let error = Cli::try_parse_from([
            "s3put", "-a", "access", "-s", "secret", "-b", "alice", "-k", "sample.txt", "--acl",
            "world-writable",
        ])
        .unwrap_err();
        assert_eq!(error.exit_code(), 2);
        assert_ne!(
            error.exit_code(),
            crate::report::exit_code(s3put_core::ErrorKind::Configuration)
        );
    }

    #[test]
    fn rejects_invalid_timeout() {
        let result = Cli::try_parse_from([
            "s3put", "-a", "access", "-s", "secret", "-b", "alice", "-k", "sample.txt", "-d",
            "soon",
        ]);
        assert!(result.is_err());
    }
}
