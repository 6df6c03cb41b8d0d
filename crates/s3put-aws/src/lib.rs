//! S3-compatible client for s3put.
//!
//! This crate provides [`S3Client`], an implementation of the
//! [`ObjectProvider`](s3put_core::ObjectProvider) trait. SigV4 requests go
//! through `aws-sdk-s3`; SigV2 requests are signed locally and sent with
//! `reqwest`. The scheme is an explicit configuration switch
//! ([`SigningVersion`]).
//!
//! # Example
//!
//! ```rust,ignore
//! use s3put_core::{Credentials, ObjectBody, UploadRequest, Uploader};
//! use s3put_aws::{S3Client, S3Config};
//!
//! let client = S3Client::new(S3Config::default(), Credentials::new(access, secret))?;
//! let uploader = Uploader::new(client.into_service());
//!
//! let request = UploadRequest::new("alice", "sample.txt", ObjectBody::from("hoge"));
//! let output = uploader.upload(request).await?;
//! ```

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod client;
mod config;
mod debug;
mod error;
mod legacy;

pub use crate::client::S3Client;
pub use crate::config::{DEFAULT_ENDPOINT, DEFAULT_REGION, S3Config, SigningVersion};
pub use crate::error::{Error, Result};

/// Tracing target for S3 client operations.
pub const TRACING_TARGET: &str = "s3put_aws::client";
