//! Error types for the S3 client.

use aws_sdk_s3::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_s3::operation::RequestId;
use aws_sdk_s3::operation::put_object::PutObjectError;
use reqwest::StatusCode;
use s3put_core::RemoteError;
use serde::Deserialize;
use thiserror::Error;

/// Result type alias for S3 client operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Error type for SigV2 requests sent with `reqwest`.
#[derive(Debug, Error)]
pub enum Error {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Reqwest(#[from] reqwest::Error),
    /// The service returned a structured error document.
    #[error("API error: {} ({})", .0.code, .0.message)]
    Api(RemoteError),
    /// The service returned a non-success status without a decodable error body.
    #[error("unexpected HTTP status {status}: {body}")]
    Status {
        /// Response status.
        status: StatusCode,
        /// Truncated response body.
        body: String,
    },
}

impl From<Error> for s3put_core::Error {
    fn from(err: Error) -> Self {
        match err {
            Error::Reqwest(e) => {
                if e.is_timeout() {
                    s3put_core::Error::canceled()
                        .with_message(e.to_string())
                        .with_source(e)
                } else if e.is_connect() {
                    s3put_core::Error::transport()
                        .with_message(format!("connection failed: {e}"))
                        .with_source(e)
                } else {
                    s3put_core::Error::transport()
                        .with_message(e.to_string())
                        .with_source(e)
                }
            }
            Error::Api(remote) => s3put_core::Error::remote_api(remote),
            Error::Status { status, body } => s3put_core::Error::transport().with_message(
                if body.is_empty() {
                    format!("unexpected HTTP status {status}")
                } else {
                    format!("unexpected HTTP status {status}: {body}")
                },
            ),
        }
    }
}

/// Classifies a failed SDK `PutObject` call.
///
/// A service error carrying an error code becomes a remote API error with the
/// service's code and message; a service error without one (HTML from a
/// proxy, an empty body) is a transport failure like any other I/O problem.
pub(crate) fn from_sdk(err: SdkError<PutObjectError>) -> s3put_core::Error {
    let context = DisplayErrorContext(&err).to_string();
    match &err {
        SdkError::ConstructionFailure(_) => s3put_core::Error::configuration()
            .with_message(format!("failed to build request: {context}"))
            .with_source(err),
        SdkError::TimeoutError(_) => s3put_core::Error::canceled()
            .with_message(context)
            .with_source(err),
        SdkError::DispatchFailure(failure) if failure.is_timeout() => {
            s3put_core::Error::canceled()
                .with_message(context)
                .with_source(err)
        }
        SdkError::ServiceError(service) => {
            let status = service.raw().status().as_u16();
            let put_error = service.err();
            match put_error.code() {
                Some(code) => {
                    let message = put_error.message().unwrap_or_default();
                    let mut remote = RemoteError::new(status, code, message);
                    if let Some(request_id) = put_error.request_id() {
                        remote = remote.with_request_id(request_id);
                    }
                    s3put_core::Error::remote_api(remote)
                }
                None => s3put_core::Error::transport()
                    .with_message(format!("unexpected HTTP status {status}"))
                    .with_source(err),
            }
        }
        _ => s3put_core::Error::transport()
            .with_message(context)
            .with_source(err),
    }
}

/// Maximum number of body characters kept in a [`Error::Status`].
const MAX_BODY_EXCERPT: usize = 256;

/// S3 `<Error>` response document.
#[derive(Debug, Deserialize)]
#[serde(rename = "Error", rename_all = "PascalCase")]
struct ErrorResponse {
    code: String,
    #[serde(default)]
    message: String,
    #[serde(default)]
    request_id: Option<String>,
    #[serde(default)]
    resource: Option<String>,
}

/// Classifies a non-success response.
///
/// An XML error document with a `Code` yields [`Error::Api`]; anything else
/// (HTML from a proxy, an empty body) yields [`Error::Status`].
pub(crate) fn from_response(status: StatusCode, body: &str) -> Error {
    match quick_xml::de::from_str::<ErrorResponse>(body) {
        Ok(response) if !response.code.is_empty() => {
            let mut remote = RemoteError::new(status.as_u16(), response.code, response.message);
            if let Some(request_id) = response.request_id {
                remote = remote.with_request_id(request_id);
            }
            if let Some(resource) = response.resource {
                remote = remote.with_resource(resource);
            }
            Error::Api(remote)
        }
        _ => Error::Status {
            status,
            body: body.trim().chars().take(MAX_BODY_EXCERPT).collect(),
        },
    }
}
