#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

/// Tracing target for storage provider calls.
pub const TRACING_TARGET_PROVIDER: &str = "s3put_core::provider";

/// Tracing target for upload orchestration.
pub const TRACING_TARGET_UPLOAD: &str = "s3put_core::upload";

mod error;
mod provider;
mod service;
mod uploader;

pub mod types;

#[cfg(any(test, feature = "test-utils"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-utils")))]
pub mod mock;

pub use error::{BoxedError, Error, ErrorKind, RemoteError, Result};
pub use provider::ObjectProvider;
pub use service::ObjectService;
pub use types::{
    CannedAcl, Credentials, ObjectBody, PutObjectOutput, PutObjectRequest, UploadOutput,
    UploadRequest,
};
pub use uploader::Uploader;
