//! AWS Signature Version 2 (legacy).

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use hmac::{Hmac, Mac};
use jiff::Timestamp;
use jiff::tz::TimeZone;
use s3put_core::{CannedAcl, Credentials};
use sha1::Sha1;

type HmacSha1 = Hmac<Sha1>;

/// Request fields covered by a V2 signature.
#[derive(Debug, Clone)]
pub(crate) struct SigningRequest<'a> {
    pub method: &'a str,
    /// `/bucket/key` with the key percent-encoded as on the wire.
    pub resource: &'a str,
    pub content_type: Option<&'a str>,
    pub acl: Option<CannedAcl>,
    pub timestamp: Timestamp,
}

/// Signs requests with `AWS access:base64(hmac-sha1)`.
pub(crate) struct SignatureV2<'a> {
    credentials: &'a Credentials,
}

impl<'a> SignatureV2<'a> {
    pub(crate) fn new(credentials: &'a Credentials) -> Self {
        Self { credentials }
    }

    /// Returns `date` and `authorization`.
    pub(crate) fn sign(&self, request: &SigningRequest<'_>) -> Vec<(&'static str, String)> {
        let date = request
            .timestamp
            .to_zoned(TimeZone::UTC)
            .strftime("%a, %d %b %Y %H:%M:%S GMT")
            .to_string();

        let amz_headers = request
            .acl
            .map(|acl| format!("x-amz-acl:{acl}\n"))
            .unwrap_or_default();

        let string_to_sign = string_to_sign(
            request.method,
            request.content_type.unwrap_or_default(),
            &date,
            &amz_headers,
            request.resource,
        );
        let signature = signature(self.credentials.secret_key(), &string_to_sign);

        let authorization = format!("AWS {}:{signature}", self.credentials.access_key());
        vec![("date", date), ("authorization", authorization)]
    }
}

/// No Content-MD5 is sent, so that line stays empty.
///
/// `amz_headers` holds the canonicalized `x-amz-*` headers, each already
/// terminated by a newline.
fn string_to_sign(
    method: &str,
    content_type: &str,
    date: &str,
    amz_headers: &str,
    resource: &str,
) -> String {
    format!("{method}\n\n{content_type}\n{date}\n{amz_headers}{resource}")
}

fn signature(secret_key: &str, string_to_sign: &str) -> String {
    let mut mac =
        HmacSha1::new_from_slice(secret_key.as_bytes()).expect("HMAC can take key of any size");
    mac.update(string_to_sign.as_bytes());
    STANDARD.encode(mac.finalize().into_bytes())
}
