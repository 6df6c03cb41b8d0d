//! S3 client dispatching on the configured signing version.

use std::sync::Arc;

use aws_sdk_s3::config::retry::RetryConfig;
use aws_sdk_s3::config::{
    AppName, BehaviorVersion, Builder, Credentials as SdkCredentials, Region,
    RequestChecksumCalculation, ResponseChecksumValidation,
};
use aws_sdk_s3::operation::RequestId;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::ObjectCannedAcl;
use s3put_core::{
    Credentials, ObjectProvider, ObjectService, PutObjectOutput, PutObjectRequest, Result,
};

use crate::debug::DebugLog;
use crate::error;
use crate::legacy::LegacyClient;
use crate::{S3Config, SigningVersion, TRACING_TARGET};

/// Name the SDK appends to its User-Agent.
const APP_NAME: &str = "s3put";

/// Wire-level implementation selected by [`SigningVersion`].
enum Transport {
    Sdk(aws_sdk_s3::Client),
    Legacy(LegacyClient),
}

/// Inner client that holds the transport and configuration.
struct S3ClientInner {
    transport: Transport,
    config: S3Config,
    credentials: Credentials,
}

/// S3-compatible object storage client.
///
/// Implements [`ObjectProvider`] with a single `PutObject` per object. The
/// client retries nothing and applies no timeout of its own; deadlines are
/// enforced by the caller (see [`Uploader`](s3put_core::Uploader)).
#[derive(Clone)]
pub struct S3Client {
    inner: Arc<S3ClientInner>,
}

impl std::fmt::Debug for S3Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("S3Client")
            .field("config", &self.inner.config)
            .field("credentials", &self.inner.credentials)
            .finish_non_exhaustive()
    }
}

impl S3Client {
    /// Creates a new client.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for empty credentials, an invalid
    /// endpoint or region, or when the HTTP client cannot be built.
    pub fn new(config: S3Config, credentials: Credentials) -> Result<Self> {
        credentials.validate()?;
        config.validate()?;
        let endpoint = config.endpoint_url()?;

        tracing::debug!(
            target: TRACING_TARGET,
            endpoint = %endpoint,
            region = %config.region,
            signing_version = %config.signing_version,
            path_style = config.path_style,
            "Creating S3 client"
        );

        let transport = match config.signing_version {
            SigningVersion::V4 => {
                Transport::Sdk(sdk_client(&config, endpoint.as_str(), &credentials)?)
            }
            SigningVersion::V2 => {
                Transport::Legacy(LegacyClient::new(&config, endpoint, credentials.clone())?)
            }
        };

        let inner = S3ClientInner {
            transport,
            config,
            credentials,
        };

        Ok(Self {
            inner: Arc::new(inner),
        })
    }

    /// Gets the client configuration.
    pub fn config(&self) -> &S3Config {
        &self.inner.config
    }

    /// Converts this client into an [`ObjectService`].
    pub fn into_service(self) -> ObjectService {
        ObjectService::new(self)
    }
}

async fn sdk_put_object(
    sdk: &aws_sdk_s3::Client,
    request: PutObjectRequest,
) -> Result<PutObjectOutput> {
    let output = sdk
        .put_object()
        .bucket(request.bucket)
        .key(request.key)
        .body(ByteStream::from(request.body))
        .set_content_type(request.content_type)
        .set_acl(request.acl.map(|acl| ObjectCannedAcl::from(acl.as_ref())))
        .send()
        .await
        .map_err(error::from_sdk)?;

    Ok(PutObjectOutput {
        e_tag: output.e_tag().map(str::to_owned),
        version_id: output.version_id().map(str::to_owned),
        request_id: output.request_id().map(str::to_owned),
    })
}

/// Builds an SDK client for one fixed endpoint and static credentials.
///
/// Retries are disabled and checksums are only computed where the operation
/// requires them, so each upload is exactly one plain `PUT`.
fn sdk_client(
    config: &S3Config,
    endpoint: &str,
    credentials: &Credentials,
) -> Result<aws_sdk_s3::Client> {
    let app_name = AppName::new(APP_NAME).map_err(|e| {
        s3put_core::Error::configuration()
            .with_message(format!("invalid application name '{APP_NAME}': {e}"))
            .with_source(e)
    })?;

    let provider = SdkCredentials::new(
        credentials.access_key(),
        credentials.secret_key(),
        None,
        None,
        APP_NAME,
    );

    let mut builder = Builder::new()
        .behavior_version(BehaviorVersion::latest())
        .app_name(app_name)
        .region(Region::new(config.region.clone()))
        .endpoint_url(endpoint.trim_end_matches('/'))
        .force_path_style(config.path_style)
        .credentials_provider(provider)
        .retry_config(RetryConfig::disabled())
        .request_checksum_calculation(RequestChecksumCalculation::WhenRequired)
        .response_checksum_validation(ResponseChecksumValidation::WhenRequired);

    if config.debug {
        builder = builder.interceptor(DebugLog);
    }

    Ok(aws_sdk_s3::Client::from_conf(builder.build()))
}

#[async_trait::async_trait]
impl ObjectProvider for S3Client {
    async fn put_object(&self, request: PutObjectRequest) -> Result<PutObjectOutput> {
        match &self.inner.transport {
            Transport::Sdk(sdk) => sdk_put_object(sdk, request).await,
            Transport::Legacy(legacy) => legacy.put_object(request).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use bytes::Bytes;
    use s3put_core::{CannedAcl, ErrorKind, ObjectBody, UploadRequest, Uploader};
    use s3put_test::MockS3Server;

    use super::*;

    fn client(server: &MockS3Server, config: S3Config) -> S3Client {
        let config = S3Config {
            endpoint: server.endpoint(),
            ..config
        };
        S3Client::new(config, Credentials::new("access", "secret")).unwrap()
    }

    fn v2() -> S3Config {
        S3Config::default().with_signing_version(SigningVersion::V2)
    }

    fn put(bucket: &str, key: &str, body: &'static str) -> PutObjectRequest {
        PutObjectRequest::new(bucket, key, Bytes::from_static(body.as_bytes()))
    }

    #[tokio::test]
    async fn put_object_stores_body() {
        let server = MockS3Server::start().await;
        let client = client(&server, S3Config::default());

        let output = client
            .put_object(put("alice", "sample.txt", "hoge"))
            .await
            .unwrap();

        assert!(output.e_tag.is_some());
        assert!(output.request_id.is_some());
        assert_eq!(
            server.object("alice", "sample.txt"),
            Some(Bytes::from_static(b"hoge"))
        );

        let requests = server.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, "PUT");
        assert_eq!(requests[0].path, "/alice/sample.txt");
        assert!(
            requests[0]
                .header("authorization")
                .unwrap()
                .starts_with("AWS4-HMAC-SHA256 Credential=access/")
        );
        assert!(requests[0].header("x-amz-content-sha256").is_some());
        assert!(requests[0].header("x-amz-acl").is_none());
    }

    #[tokio::test]
    async fn key_is_percent_encoded() {
        let server = MockS3Server::start().await;
        let client = client(&server, S3Config::default());

        client
            .put_object(put("alice", "dir/a b+c.txt", "data"))
            .await
            .unwrap();

        assert_eq!(server.requests()[0].path, "/alice/dir/a%20b%2Bc.txt");
        assert!(server.object("alice", "dir/a b+c.txt").is_some());
    }

    #[tokio::test]
    async fn dot_segments_are_stored_verbatim() {
        let server = MockS3Server::start().await;
        let client = client(&server, S3Config::default());

        client
            .put_object(put("alice", "dir/../secret.txt", "data"))
            .await
            .unwrap();

        assert_eq!(server.requests()[0].path, "/alice/dir/../secret.txt");
        assert!(server.object("alice", "dir/../secret.txt").is_some());
        assert!(server.object("alice", "secret.txt").is_none());
    }

    #[tokio::test]
    async fn dot_segments_are_refused_with_v2() {
        let server = MockS3Server::start().await;
        let client = client(&server, v2());

        let error = client
            .put_object(put("alice", "dir/../secret.txt", "data"))
            .await
            .unwrap_err();

        assert_eq!(error.kind, ErrorKind::Configuration);
        assert!(server.requests().is_empty());
        assert!(server.object("alice", "secret.txt").is_none());
    }

    #[tokio::test]
    async fn content_type_is_sent() {
        let server = MockS3Server::start().await;
        let client = client(&server, S3Config::default());

        let request = put("alice", "sample.txt", "hoge").with_content_type(Some("text/plain".into()));
        client.put_object(request).await.unwrap();

        assert_eq!(server.requests()[0].header("content-type"), Some("text/plain"));
    }

    #[tokio::test]
    async fn acl_is_sent_and_signed() {
        let server = MockS3Server::start().await;
        let client = client(&server, S3Config::default());

        let request = put("alice", "sample.txt", "hoge").with_acl(Some(CannedAcl::PublicRead));
        client.put_object(request).await.unwrap();

        let request = &server.requests()[0];
        assert_eq!(request.header("x-amz-acl"), Some("public-read"));
        let authorization = request.header("authorization").unwrap();
        assert!(authorization.contains("x-amz-acl"), "{authorization}");
    }

    #[tokio::test]
    async fn acl_is_sent_with_v2() {
        let server = MockS3Server::start().await;
        let client = client(&server, v2());

        let request = put("alice", "sample.txt", "hoge").with_acl(Some(CannedAcl::PublicRead));
        client.put_object(request).await.unwrap();

        assert_eq!(server.requests()[0].header("x-amz-acl"), Some("public-read"));
    }

    #[tokio::test]
    async fn signature_v2_header() {
        let server = MockS3Server::start().await;
        let client = client(&server, v2());

        client
            .put_object(put("alice", "sample.txt", "hoge"))
            .await
            .unwrap();

        let request = &server.requests()[0];
        assert!(request.header("authorization").unwrap().starts_with("AWS access:"));
        assert!(request.header("date").unwrap().ends_with(" GMT"));
        assert!(request.header("x-amz-date").is_none());
        assert_eq!(server.object("alice", "sample.txt"), Some(Bytes::from_static(b"hoge")));
    }

    #[tokio::test]
    async fn api_error_is_remote_api() {
        for config in [S3Config::default(), v2()] {
            let server = MockS3Server::start().await;
            server.set_error(403, "AccessDenied", "Access Denied");
            let client = client(&server, config);

            let error = client
                .put_object(put("alice", "sample.txt", "hoge"))
                .await
                .unwrap_err();

            assert_eq!(error.kind, ErrorKind::RemoteApi);
            let remote = error.remote().unwrap();
            assert_eq!(remote.code, "AccessDenied");
            assert_eq!(remote.message, "Access Denied");
            assert_eq!(remote.status, 403);
            assert_eq!(remote.request_id.as_deref(), Some("MOCKREQUEST"));
            assert_eq!(
                error.to_string(),
                "unexpected API error, code: AccessDenied, message: Access Denied"
            );
        }
    }

    #[tokio::test]
    async fn undecodable_error_is_transport() {
        for config in [S3Config::default(), v2()] {
            let server = MockS3Server::start().await;
            server.set_raw_response(502, "<html><body>Bad Gateway</body></html>");
            let client = client(&server, config);

            let error = client
                .put_object(put("alice", "sample.txt", "hoge"))
                .await
                .unwrap_err();

            assert_eq!(error.kind, ErrorKind::Transport);
            assert!(error.remote().is_none());
            assert_eq!(server.requests().len(), 1);
        }
    }

    #[tokio::test]
    async fn deadline_cancels_slow_upload() {
        let server = MockS3Server::start().await;
        server.set_delay(Duration::from_millis(500));
        let uploader = Uploader::new(client(&server, S3Config::default()).into_service());

        let request = UploadRequest::new("alice", "sample.txt", ObjectBody::from("hoge"))
            .with_timeout(Some(Duration::from_millis(1)));
        let error = uploader.upload(request).await.unwrap_err();

        assert_eq!(error.kind, ErrorKind::Canceled);
        assert!(error.remote().is_none());
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_transport() {
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };

        for config in [S3Config::default(), v2()] {
            let config = S3Config {
                endpoint: format!("http://127.0.0.1:{port}"),
                ..config
            };
            let client = S3Client::new(config, Credentials::new("access", "secret")).unwrap();

            let error = client
                .put_object(put("alice", "sample.txt", "hoge"))
                .await
                .unwrap_err();

            assert_eq!(error.kind, ErrorKind::Transport);
        }
    }

    #[test]
    fn empty_credentials_are_rejected() {
        let error = S3Client::new(S3Config::default(), Credentials::new("", "secret")).unwrap_err();
        assert_eq!(error.kind, ErrorKind::Configuration);

        let error = S3Client::new(S3Config::default(), Credentials::new("access", "")).unwrap_err();
        assert_eq!(error.kind, ErrorKind::Configuration);
    }
}
