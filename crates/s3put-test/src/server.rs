//! Mock S3 server built on axum.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use axum::Router;
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, HeaderValue, Method, StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use axum::routing::any;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

use crate::TRACING_TARGET;

/// A request as received by [`MockS3Server`].
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// HTTP method.
    pub method: String,
    /// Raw (still percent-encoded) request path.
    pub path: String,
    /// Header names (lowercase) and values, in arrival order.
    pub headers: Vec<(String, String)>,
    /// Request body.
    pub body: Bytes,
}

impl RecordedRequest {
    /// Returns the first value of the header `name`, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(header, _)| header.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Canned response returned instead of storing the object.
#[derive(Debug, Clone)]
struct Failure {
    status: StatusCode,
    body: String,
}

#[derive(Debug, Default)]
struct Inner {
    objects: HashMap<(String, String), Bytes>,
    requests: Vec<RecordedRequest>,
    delay: Option<Duration>,
    failure: Option<Failure>,
}

#[derive(Debug, Default)]
struct ServerState {
    inner: Mutex<Inner>,
    sequence: AtomicU64,
}

impl ServerState {
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

/// In-process S3-compatible server accepting path-style `PutObject` calls.
///
/// The server runs on the current tokio runtime and shuts down when dropped.
#[derive(Debug)]
pub struct MockS3Server {
    addr: SocketAddr,
    state: Arc<ServerState>,
    shutdown: Option<oneshot::Sender<()>>,
}

impl MockS3Server {
    /// Binds an ephemeral local port and starts serving.
    ///
    /// # Panics
    ///
    /// Panics if no local port can be bound.
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind mock S3 server");
        let addr = listener
            .local_addr()
            .expect("mock S3 server has no local address");

        let state = Arc::new(ServerState::default());
        let router = Router::new()
            .route("/{*path}", any(handle))
            .with_state(state.clone());

        let (shutdown, signal) = oneshot::channel::<()>();
        tokio::spawn(async move {
            let server = axum::serve(listener, router).with_graceful_shutdown(async move {
                let _ = signal.await;
            });
            if let Err(error) = server.await {
                tracing::warn!(target: TRACING_TARGET, error = %error, "Mock S3 server failed");
            }
        });

        tracing::debug!(target: TRACING_TARGET, addr = %addr, "Mock S3 server started");

        Self {
            addr,
            state,
            shutdown: Some(shutdown),
        }
    }

    /// Returns the base endpoint, e.g. `http://127.0.0.1:41234`.
    pub fn endpoint(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Delays every response by `delay`.
    pub fn set_delay(&self, delay: Duration) {
        self.state.lock().delay = Some(delay);
    }

    /// Answers every request with an S3 XML error document.
    pub fn set_error(&self, status: u16, code: &str, message: &str) {
        self.set_raw_response(status, error_document(code, message));
    }

    /// Answers every request with `status` and a verbatim `body`.
    pub fn set_raw_response(&self, status: u16, body: impl Into<String>) {
        let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        self.state.lock().failure = Some(Failure {
            status,
            body: body.into(),
        });
    }

    /// Returns the stored body of `bucket/key`, if it was uploaded.
    pub fn object(&self, bucket: &str, key: &str) -> Option<Bytes> {
        self.state
            .lock()
            .objects
            .get(&(bucket.to_owned(), key.to_owned()))
            .cloned()
    }

    /// Returns every request received so far.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.lock().requests.clone()
    }
}

impl Drop for MockS3Server {
    fn drop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
    }
}

/// Request id carried by every error response, in the body and the header.
const ERROR_REQUEST_ID: &str = "MOCKREQUEST";

fn error_document(code: &str, message: &str) -> String {
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <Error><Code>{code}</Code><Message>{message}</Message>\
         <RequestId>{ERROR_REQUEST_ID}</RequestId></Error>"
    )
}

fn xml_response(status: StatusCode, body: String) -> Response {
    (
        status,
        [
            (header::CONTENT_TYPE.as_str(), "application/xml"),
            ("x-amz-request-id", ERROR_REQUEST_ID),
        ],
        body,
    )
        .into_response()
}

async fn handle(
    State(state): State<Arc<ServerState>>,
    method: Method,
    uri: Uri,
    Path(path): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let recorded = RecordedRequest {
        method: method.to_string(),
        path: uri.path().to_owned(),
        headers: headers
            .iter()
            .map(|(name, value)| {
                let value = String::from_utf8_lossy(value.as_bytes()).into_owned();
                (name.as_str().to_owned(), value)
            })
            .collect(),
        body: body.clone(),
    };

    tracing::debug!(
        target: TRACING_TARGET,
        method = %recorded.method,
        path = %recorded.path,
        size = body.len(),
        "Request received"
    );

    let (delay, failure) = {
        let mut inner = state.lock();
        inner.requests.push(recorded);
        (inner.delay, inner.failure.clone())
    };

    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }

    if method != Method::PUT {
        return xml_response(
            StatusCode::METHOD_NOT_ALLOWED,
            error_document("MethodNotAllowed", "The specified method is not allowed"),
        );
    }
    if !headers.contains_key(header::AUTHORIZATION) {
        return xml_response(
            StatusCode::FORBIDDEN,
            error_document("AccessDenied", "Access Denied"),
        );
    }
    if let Some(failure) = failure {
        return xml_response(failure.status, failure.body);
    }

    let Some((bucket, key)) = path.split_once('/').filter(|(_, key)| !key.is_empty()) else {
        return xml_response(
            StatusCode::BAD_REQUEST,
            error_document("InvalidRequest", "An object key is required"),
        );
    };

    let sequence = state.sequence.fetch_add(1, Ordering::Relaxed) + 1;
    state
        .lock()
        .objects
        .insert((bucket.to_owned(), key.to_owned()), body);

    let mut response = StatusCode::OK.into_response();
    let headers = response.headers_mut();
    if let Ok(value) = HeaderValue::from_str(&format!("\"mock-etag-{sequence}\"")) {
        headers.insert(header::ETAG, value);
    }
    if let Ok(value) = HeaderValue::from_str(&format!("MOCK{sequence:012}")) {
        headers.insert("x-amz-request-id", value);
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn stores_authorized_put() {
        let server = MockS3Server::start().await;
        let response = reqwest::Client::new()
            .put(format!("{}/alice/dir/sample%20one.txt", server.endpoint()))
            .header("authorization", "test")
            .body("hoge")
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), 200);
        assert!(response.headers().contains_key("etag"));
        assert_eq!(
            server.object("alice", "dir/sample one.txt"),
            Some(Bytes::from_static(b"hoge"))
        );
        assert_eq!(server.requests()[0].path, "/alice/dir/sample%20one.txt");
    }

    #[tokio::test]
    async fn rejects_unsigned_request() {
        let server = MockS3Server::start().await;
        let response = reqwest::Client::new()
            .put(format!("{}/alice/sample.txt", server.endpoint()))
            .body("hoge")
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), 403);
        assert!(response.text().await.unwrap().contains("<Code>AccessDenied</Code>"));
        assert!(server.object("alice", "sample.txt").is_none());
    }

    #[tokio::test]
    async fn configured_error_is_returned() {
        let server = MockS3Server::start().await;
        server.set_error(404, "NoSuchBucket", "The specified bucket does not exist");

        let response = reqwest::Client::new()
            .put(format!("{}/missing/sample.txt", server.endpoint()))
            .header("authorization", "test")
            .body("hoge")
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), 404);
        let body = response.text().await.unwrap();
        assert!(body.contains("<Code>NoSuchBucket</Code>"));
        assert_eq!(server.requests().len(), 1);
    }
}
