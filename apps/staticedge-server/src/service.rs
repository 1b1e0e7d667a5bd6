//! The hyper `Service` bridging HTTP connections to the site handler.
//!
//! [`SiteHttpService`] handles:
//!
//! 1. Health check interception (`GET /_health`)
//! 2. JSON invocation requests (`POST /_invoke`)
//! 3. Plain `GET`/`HEAD` site serving (everything else)
//!
//! Plain serving converts the handler's response into an `http` response
//! directly; the JSON route wraps the same response in the event envelope.

use std::collections::HashMap;
use std::convert::Infallible;
use std::future::Future;
use std::pin::Pin;

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::service::Service;
use tracing::{debug, error, warn};

use staticedge_core::{RequestEvent, ResponseEvent, SiteHandler, SiteResponse};

/// Path of the health check endpoint.
const HEALTH_PATH: &str = "/_health";

/// Path of the JSON invocation endpoint.
const INVOKE_PATH: &str = "/_invoke";

/// Server version reported in health check responses.
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// The HTTP service wrapping a [`SiteHandler`].
#[derive(Debug, Clone)]
pub struct SiteHttpService {
    handler: SiteHandler,
}

impl SiteHttpService {
    /// Create a service over a handler.
    #[must_use]
    pub fn new(handler: SiteHandler) -> Self {
        Self { handler }
    }
}

impl Service<http::Request<Incoming>> for SiteHttpService {
    type Response = http::Response<Full<Bytes>>;
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn call(&self, req: http::Request<Incoming>) -> Self::Future {
        let handler = self.handler.clone();
        Box::pin(async move { Ok(process_request(req, &handler).await) })
    }
}

/// Route one request to the health, invoke, or serve path.
async fn process_request(
    req: http::Request<Incoming>,
    handler: &SiteHandler,
) -> http::Response<Full<Bytes>> {
    let method = req.method().clone();
    let path = req.uri().path().to_owned();
    debug!(%method, path, "processing request");

    match (method.as_str(), path.as_str()) {
        ("GET", HEALTH_PATH) => health_response(),
        ("POST", INVOKE_PATH) => invoke(req, handler).await,
        ("GET" | "HEAD", _) => {
            let headers = collect_headers(req.headers());
            let resp = handler.handle(&path, &headers).await;
            // HEAD responses carry the full header set but no body.
            let elide_body = method == http::Method::HEAD;
            to_http(resp, elide_body)
        }
        _ => {
            warn!(%method, path, "method not allowed");
            text_response(http::StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed")
        }
    }
}

/// Handle a `POST /_invoke` request carrying a JSON request event.
async fn invoke(
    req: http::Request<Incoming>,
    handler: &SiteHandler,
) -> http::Response<Full<Bytes>> {
    let body = match req.into_body().collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(err) => {
            error!(error = %err, "failed to collect invocation body");
            return text_response(http::StatusCode::BAD_REQUEST, "Bad Request");
        }
    };

    let event: RequestEvent = match serde_json::from_slice(&body) {
        Ok(event) => event,
        Err(err) => {
            warn!(error = %err, "malformed invocation event");
            return text_response(http::StatusCode::BAD_REQUEST, "Bad Request");
        }
    };

    let resp = handler.handle(&event.path, &event.headers).await;
    let envelope = ResponseEvent::from(resp);
    match serde_json::to_vec(&envelope) {
        Ok(json) => json_response(http::StatusCode::OK, Bytes::from(json)),
        Err(err) => {
            error!(error = %err, "failed to serialize response event");
            text_response(
                http::StatusCode::INTERNAL_SERVER_ERROR,
                "Internal Server Error",
            )
        }
    }
}

/// Flatten hyper's header map into the handler's name/value map.
///
/// Values that are not valid UTF-8 are dropped; the negotiation headers this
/// service cares about are always ASCII.
fn collect_headers(headers: &http::HeaderMap) -> HashMap<String, String> {
    headers
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|v| (name.as_str().to_owned(), v.to_owned()))
        })
        .collect()
}

/// Convert a handler response into an `http` response.
fn to_http(resp: SiteResponse, elide_body: bool) -> http::Response<Full<Bytes>> {
    let mut builder = http::Response::builder().status(resp.status);
    for (name, value) in &resp.headers {
        builder = builder.header(name, value);
    }
    let body = if elide_body { Bytes::new() } else { resp.body };
    match builder.body(Full::new(body)) {
        Ok(response) => response,
        Err(err) => {
            // Stored metadata produced an invalid header value.
            error!(error = %err, "failed to build response");
            text_response(
                http::StatusCode::INTERNAL_SERVER_ERROR,
                "Internal Server Error",
            )
        }
    }
}

fn health_response() -> http::Response<Full<Bytes>> {
    let body = format!(r#"{{"status":"running","version":"{VERSION}"}}"#);
    json_response(http::StatusCode::OK, Bytes::from(body))
}

fn json_response(status: http::StatusCode, body: Bytes) -> http::Response<Full<Bytes>> {
    let mut response = http::Response::new(Full::new(body));
    *response.status_mut() = status;
    response.headers_mut().insert(
        http::header::CONTENT_TYPE,
        http::HeaderValue::from_static("application/json"),
    );
    response
}

fn text_response(status: http::StatusCode, body: &'static str) -> http::Response<Full<Bytes>> {
    let mut response = http::Response::new(Full::new(Bytes::from_static(body.as_bytes())));
    *response.status_mut() = status;
    response.headers_mut().insert(
        http::header::CONTENT_TYPE,
        http::HeaderValue::from_static("text/plain"),
    );
    response
}
