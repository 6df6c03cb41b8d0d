//! S3 client configuration.

#[cfg(feature = "config")]
use clap::Args;
use strum::{AsRefStr, Display, EnumString};
use url::Url;

use s3put_core::{Error, Result};

/// Base endpoint of the S3-compatible storage service.
pub const DEFAULT_ENDPOINT: &str = "https://ds.jp-east.idcfcloud.com";

/// Region used in request signatures.
///
/// The endpoint is not an AWS region; this is the value the service has been
/// accepting for SigV4 credential scopes.
pub const DEFAULT_REGION: &str = "us-west-2";

/// Request-signing algorithm expected by the storage backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[derive(AsRefStr, Display, EnumString)]
#[cfg_attr(feature = "config", derive(clap::ValueEnum))]
#[strum(serialize_all = "lowercase")]
pub enum SigningVersion {
    /// AWS Signature Version 2 (`AWS access:signature`, HMAC-SHA1).
    V2,
    /// AWS Signature Version 4 (`AWS4-HMAC-SHA256`).
    #[default]
    V4,
}

/// Configuration for the S3 client.
///
/// Endpoint, region and addressing style are fixed by the deployment and are
/// not exposed on the command line.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "config", derive(Args))]
pub struct S3Config {
    /// Base endpoint URL; `https://` is assumed when no scheme is given.
    #[cfg_attr(feature = "config", arg(skip = DEFAULT_ENDPOINT.to_owned()))]
    pub endpoint: String,

    /// Region used in the SigV4 credential scope.
    #[cfg_attr(feature = "config", arg(skip = DEFAULT_REGION.to_owned()))]
    pub region: String,

    /// Place the bucket in the URL path instead of the host name.
    #[cfg_attr(feature = "config", arg(skip = true))]
    pub path_style: bool,

    /// Request signing algorithm
    #[cfg_attr(
        feature = "config",
        arg(
            long = "signing-version",
            env = "S3PUT_SIGNING_VERSION",
            value_enum,
            default_value_t = SigningVersion::V4
        )
    )]
    pub signing_version: SigningVersion,

    /// User-Agent header to send with requests.
    #[cfg_attr(feature = "config", arg(skip))]
    pub user_agent: Option<String>,

    /// Log every request and response at debug level
    #[cfg_attr(feature = "config", arg(long = "debug", env = "S3PUT_DEBUG"))]
    pub debug: bool,
}

impl Default for S3Config {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_owned(),
            region: DEFAULT_REGION.to_owned(),
            path_style: true,
            signing_version: SigningVersion::default(),
            user_agent: None,
            debug: false,
        }
    }
}

impl S3Config {
    /// Creates a configuration for the given endpoint with default settings.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Self::default()
        }
    }

    /// Set the signing version.
    #[must_use]
    pub fn with_signing_version(mut self, signing_version: SigningVersion) -> Self {
        self.signing_version = signing_version;
        self
    }

    /// Set the region.
    #[must_use]
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    /// Enable or disable path-style addressing.
    #[must_use]
    pub fn with_path_style(mut self, path_style: bool) -> Self {
        self.path_style = path_style;
        self
    }

    /// Enable or disable request/response debug logging.
    #[must_use]
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Returns the effective user agent, using default if not set.
    pub fn effective_user_agent(&self) -> String {
        self.user_agent
            .clone()
            .unwrap_or_else(|| format!("s3put/{}", env!("CARGO_PKG_VERSION")))
    }

    /// Parses the endpoint into a base URL.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the endpoint is not a valid
    /// `http`/`https` URL with a host.
    pub fn endpoint_url(&self) -> Result<Url> {
        let endpoint = self.endpoint.trim();
        if endpoint.is_empty() {
            return Err(Error::configuration().with_message("endpoint must not be empty"));
        }

        let endpoint = if endpoint.contains("://") {
            endpoint.to_owned()
        } else {
            format!("https://{endpoint}")
        };

        let url = Url::parse(&endpoint).map_err(|e| {
            Error::configuration()
                .with_message(format!("invalid endpoint '{endpoint}': {e}"))
                .with_source(e)
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::configuration().with_message(format!(
                "endpoint '{endpoint}' must use http or https"
            )));
        }
        if url.host_str().is_none() {
            return Err(
                Error::configuration().with_message(format!("endpoint '{endpoint}' has no host"))
            );
        }

        Ok(url)
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for an invalid endpoint or an empty region.
    pub fn validate(&self) -> Result<()> {
        self.endpoint_url()?;
        if self.region.trim().is_empty() {
            return Err(Error::configuration().with_message("region must not be empty"));
        }
        Ok(())
    }
}
