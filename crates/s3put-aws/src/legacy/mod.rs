//! SigV2 requests sent with `reqwest`.
//!
//! `aws-sdk-s3` only signs with SigV4, so backends that still expect the
//! `AWS access:signature` scheme are served by this small client.

mod encode;
mod signature;

use jiff::Timestamp;
use reqwest::header::{CONTENT_TYPE, ETAG, HeaderMap};
use reqwest::{Client, Url};
use s3put_core::{Credentials, PutObjectOutput, PutObjectRequest, Result};

use self::encode::encode_key;
use self::signature::{SignatureV2, SigningRequest};
use crate::debug::redacted;
use crate::error::{self, Error};
use crate::{S3Config, TRACING_TARGET};

const ACL: &str = "x-amz-acl";
const VERSION_ID: &str = "x-amz-version-id";
const REQUEST_ID: &str = "x-amz-request-id";

/// Reqwest client signing every `PUT` with SigV2.
pub(crate) struct LegacyClient {
    http: Client,
    endpoint: Url,
    credentials: Credentials,
    path_style: bool,
    debug: bool,
}

impl LegacyClient {
    pub(crate) fn new(config: &S3Config, endpoint: Url, credentials: Credentials) -> Result<Self> {
        let http = Client::builder()
            .user_agent(config.effective_user_agent())
            .build()
            .map_err(|e| {
                s3put_core::Error::configuration()
                    .with_message(format!("failed to create HTTP client: {e}"))
                    .with_source(e)
            })?;

        Ok(Self {
            http,
            endpoint,
            credentials,
            path_style: config.path_style,
            debug: config.debug,
        })
    }

    /// Builds the request URL for an object.
    ///
    /// Keys with `.` or `..` segments are refused: `Url` resolves them.
    fn object_url(&self, bucket: &str, key: &str) -> Result<Url> {
        if key.split('/').any(|segment| matches!(segment, "." | "..")) {
            return Err(s3put_core::Error::configuration().with_message(format!(
                "key '{key}' contains '.' or '..' path segments, \
                 which signature version v2 cannot address"
            )));
        }

        let mut url = self.endpoint.clone();
        let base = url.path().trim_end_matches('/').to_owned();
        let key = encode_key(key);

        if self.path_style {
            url.set_path(&format!("{base}/{}/{key}", encode_key(bucket)));
        } else {
            let host = url.host_str().unwrap_or_default().to_owned();
            url.set_host(Some(&format!("{bucket}.{host}"))).map_err(|e| {
                s3put_core::Error::configuration()
                    .with_message(format!("bucket '{bucket}' is not a valid host label: {e}"))
                    .with_source(e)
            })?;
            url.set_path(&format!("{base}/{key}"));
        }

        Ok(url)
    }

    pub(crate) async fn put_object(&self, request: PutObjectRequest) -> Result<PutObjectOutput> {
        let url = self.object_url(&request.bucket, &request.key)?;
        let resource = format!("/{}/{}", request.bucket, encode_key(&request.key));

        let signed = SignatureV2::new(&self.credentials).sign(&SigningRequest {
            method: "PUT",
            resource: &resource,
            content_type: request.content_type.as_deref(),
            acl: request.acl,
            timestamp: Timestamp::now(),
        });

        if self.debug {
            tracing::debug!(
                target: TRACING_TARGET,
                method = "PUT",
                url = %url,
                content_length = request.body.len(),
                content_type = ?request.content_type,
                acl = ?request.acl,
                headers = ?redacted(signed.iter().map(|(name, value)| (*name, value.as_str()))),
                "Sending request"
            );
        }

        let mut http_request = self.http.put(url);
        if let Some(content_type) = &request.content_type {
            http_request = http_request.header(CONTENT_TYPE, content_type);
        }
        if let Some(acl) = request.acl {
            http_request = http_request.header(ACL, acl.as_ref());
        }
        for (name, value) in &signed {
            http_request = http_request.header(*name, value);
        }

        let response = http_request
            .body(request.body)
            .send()
            .await
            .map_err(Error::from)?;

        let status = response.status();
        let headers = response.headers().clone();

        if self.debug {
            tracing::debug!(
                target: TRACING_TARGET,
                status = status.as_u16(),
                headers = ?headers,
                "Received response"
            );
        }

        if !status.is_success() {
            let body = response.text().await.map_err(Error::from)?;
            if self.debug {
                tracing::debug!(target: TRACING_TARGET, body = %body, "Error response body");
            }
            return Err(error::from_response(status, &body).into());
        }

        Ok(PutObjectOutput {
            e_tag: header_value(&headers, ETAG),
            version_id: header_value(&headers, VERSION_ID),
            request_id: header_value(&headers, REQUEST_ID),
        })
    }
}

fn header_value(headers: &HeaderMap, name: impl reqwest::header::AsHeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned)
}
