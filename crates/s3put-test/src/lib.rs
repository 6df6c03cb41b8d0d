#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod server;

pub use server::{MockS3Server, RecordedRequest};

/// Tracing target for mock server events.
pub const TRACING_TARGET: &str = "s3put_test::server";
