//! Structured error handling for upload operations.

use std::fmt;

use strum::{AsRefStr, Display, EnumString, IntoStaticStr};
use thiserror::Error;

/// Type alias for boxed dynamic errors that can be sent across threads.
pub type BoxedError = Box<dyn std::error::Error + Send + Sync>;

/// Type alias for Results with our custom Error type.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Categories of errors that can occur while uploading an object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(AsRefStr, Display, EnumString, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
    /// Client, credential or request construction failed before any network call.
    Configuration,
    /// The upload did not finish before its deadline or was interrupted.
    Canceled,
    /// The storage service answered with a structured error response.
    RemoteApi,
    /// Any other network or I/O failure.
    Transport,
}

/// Structured error returned by the storage service.
///
/// Both `code` and `message` are kept verbatim as the service sent them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteError {
    /// Machine-readable error code (e.g. `AccessDenied`).
    pub code: String,
    /// Human-readable error message (e.g. `Access Denied`).
    pub message: String,
    /// HTTP status code of the response.
    pub status: u16,
    /// Request identifier assigned by the service, if any.
    pub request_id: Option<String>,
    /// Resource the error refers to, if any.
    pub resource: Option<String>,
}

impl RemoteError {
    /// Creates a remote error from a code and a message.
    pub fn new(status: u16, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            status,
            request_id: None,
            resource: None,
        }
    }

    /// Sets the request identifier.
    #[must_use]
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    /// Sets the resource the error refers to.
    #[must_use]
    pub fn with_resource(mut self, resource: impl Into<String>) -> Self {
        self.resource = Some(resource.into());
        self
    }
}

/// Structured error type with classification and remote details.
///
/// The `Display` output is the single-line diagnostic shown to operators.
#[must_use]
#[derive(Debug, Error)]
#[error("{}", Diagnostic { kind: *kind, message: message.as_deref(), remote: remote.as_ref() })]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Primary error message.
    pub message: Option<String>,
    /// Underlying source error, if any.
    #[source]
    pub source: Option<BoxedError>,
    /// Structured details for [`ErrorKind::RemoteApi`] errors.
    pub remote: Option<RemoteError>,
}

impl Error {
    /// Creates a new error with the given kind.
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            message: None,
            source: None,
            remote: None,
        }
    }

    /// Creates a configuration error.
    pub fn configuration() -> Self {
        Self::new(ErrorKind::Configuration)
    }

    /// Creates a cancellation error.
    pub fn canceled() -> Self {
        Self::new(ErrorKind::Canceled)
    }

    /// Creates a transport error.
    pub fn transport() -> Self {
        Self::new(ErrorKind::Transport)
    }

    /// Creates a remote API error carrying the service's code and message.
    pub fn remote_api(remote: RemoteError) -> Self {
        Self {
            kind: ErrorKind::RemoteApi,
            message: Some(remote.message.clone()),
            source: None,
            remote: Some(remote),
        }
    }

    /// Adds a message to this error.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Sets the source of the error.
    pub fn with_source(mut self, source: impl Into<BoxedError>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Returns the structured remote error, if this is a remote API error.
    pub fn remote(&self) -> Option<&RemoteError> {
        self.remote.as_ref()
    }

    /// Returns `true` if the upload was canceled by a deadline or interrupt.
    #[must_use]
    pub fn is_canceled(&self) -> bool {
        self.kind == ErrorKind::Canceled
    }
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::transport()
            .with_message(format!("failed to read object body: {error}"))
            .with_source(error)
    }
}

/// Renders the operator-facing line for an error.
struct Diagnostic<'a> {
    kind: ErrorKind,
    message: Option<&'a str>,
    remote: Option<&'a RemoteError>,
}

impl fmt::Display for Diagnostic<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(remote) = self.remote {
            return write!(
                f,
                "unexpected API error, code: {}, message: {}",
                remote.code, remote.message
            );
        }

        let prefix = match self.kind {
            ErrorKind::Configuration => "configuration error",
            ErrorKind::Canceled => "upload canceled",
            ErrorKind::RemoteApi => "unexpected API error",
            ErrorKind::Transport => "transport error",
        };

        match self.message {
            Some(message) => write!(f, "{prefix}: {message}"),
            None => f.write_str(prefix),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn test_error_new() {
        let error = Error::new(ErrorKind::Transport);
        assert_eq!(error.kind, ErrorKind::Transport);
        assert!(error.message.is_none());
        assert!(error.source.is_none());
        assert!(error.remote.is_none());
    }

    #[test]
    fn test_remote_error_display_is_verbatim() {
        let remote = RemoteError::new(403, "AccessDenied", "Access Denied")
            .with_request_id("4442587FB7D0A2F9");
        let error = Error::remote_api(remote);

        assert_eq!(error.kind, ErrorKind::RemoteApi);
        assert_eq!(
            error.to_string(),
            "unexpected API error, code: AccessDenied, message: Access Denied"
        );
        let remote = error.remote().unwrap();
        assert_eq!(remote.code, "AccessDenied");
        assert_eq!(remote.message, "Access Denied");
        assert_eq!(remote.request_id.as_deref(), Some("4442587FB7D0A2F9"));
    }

    #[test]
    fn test_display_prefix_per_kind() {
        let canceled = Error::canceled().with_message("deadline of 1ms exceeded");
        assert_eq!(canceled.to_string(), "upload canceled: deadline of 1ms exceeded");

        let transport = Error::transport().with_message("connection refused");
        assert_eq!(transport.to_string(), "transport error: connection refused");

        let config = Error::configuration();
        assert_eq!(config.to_string(), "configuration error");
    }

    #[test]
    fn test_canceled_and_transport_diagnostics_differ() {
        let canceled = Error::canceled().with_message("x").to_string();
        let transport = Error::transport().with_message("x").to_string();
        assert_ne!(canceled, transport);
    }

    #[test]
    fn test_error_from_io() {
        let io_error = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed");
        let error = Error::from(io_error);

        assert_eq!(error.kind, ErrorKind::Transport);
        assert!(error.source.is_some());
        assert!(error.to_string().contains("pipe closed"));
    }

    #[test]
    fn test_kind_from_str() {
        assert_eq!(
            ErrorKind::from_str("remote_api").unwrap(),
            ErrorKind::RemoteApi
        );
        assert_eq!(ErrorKind::from_str("canceled").unwrap(), ErrorKind::Canceled);
        assert!(ErrorKind::from_str("timeout").is_err());
        assert_eq!(ErrorKind::Configuration.as_ref(), "configuration");
    }
}
