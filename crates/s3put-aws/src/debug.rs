//! Request/response logging for `--debug`.

use aws_sdk_s3::config::interceptors::{
    BeforeDeserializationInterceptorContextRef, BeforeTransmitInterceptorContextRef,
};
use aws_sdk_s3::config::{ConfigBag, Intercept, RuntimeComponents};
use aws_sdk_s3::error::BoxError;

use crate::TRACING_TARGET;

/// Header names whose values never reach the log.
const SENSITIVE_HEADERS: &[&str] = &["authorization", "x-amz-security-token"];

/// Renders headers for logging with credentials removed.
pub(crate) fn redacted<'a, I>(headers: I) -> Vec<(&'a str, &'a str)>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    headers
        .into_iter()
        .map(|(name, value)| {
            if SENSITIVE_HEADERS.iter().any(|s| name.eq_ignore_ascii_case(s)) {
                (name, "[REDACTED]")
            } else {
                (name, value)
            }
        })
        .collect()
}

/// Logs every signed request and raw response the SDK exchanges.
#[derive(Debug, Default)]
pub(crate) struct DebugLog;

impl Intercept for DebugLog {
    fn name(&self) -> &'static str {
        "s3put.DebugLog"
    }

    fn read_before_transmit(
        &self,
        context: &BeforeTransmitInterceptorContextRef<'_>,
        _runtime_components: &RuntimeComponents,
        _cfg: &mut ConfigBag,
    ) -> Result<(), BoxError> {
        let request = context.request();
        tracing::debug!(
            target: TRACING_TARGET,
            method = %request.method(),
            url = %request.uri(),
            content_length = ?request.body().content_length(),
            headers = ?redacted(request.headers().iter()),
            "Sending request"
        );
        Ok(())
    }

    fn read_before_deserialization(
        &self,
        context: &BeforeDeserializationInterceptorContextRef<'_>,
        _runtime_components: &RuntimeComponents,
        _cfg: &mut ConfigBag,
    ) -> Result<(), BoxError> {
        let response = context.response();
        tracing::debug!(
            target: TRACING_TARGET,
            status = response.status().as_u16(),
            headers = ?response.headers().iter().collect::<Vec<_>>(),
            "Received response"
        );
        if !response.status().is_success() {
            if let Some(body) = response.body().bytes() {
                tracing::debug!(
                    target: TRACING_TARGET,
                    body = %String::from_utf8_lossy(body),
                    "Error response body"
                );
            }
        }
        Ok(())
    }
}
