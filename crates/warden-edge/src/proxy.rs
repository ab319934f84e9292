//! Verbatim request forwarding to the backend process.
use std::time::Duration;

use axum::body::Body;
use axum::http::{HeaderMap, Method, Request, Response, Uri, header};
use hyper_util::client::legacy::{Client, connect::HttpConnector};
use hyper_util::rt::TokioExecutor;
use tracing::debug;

use crate::error::EdgeError;

pub(crate) type ProxyClient = Client<HttpConnector, Body>;

/// Plain-HTTP client for the internal backend hop.
pub(crate) fn build_client() -> ProxyClient {
    Client::builder(TokioExecutor::new()).build_http()
}

/// Forward one request to `backend` and relay the response verbatim.
///
/// The deadline covers the whole exchange up to response headers; bodies
/// stream through afterwards.
pub(crate) async fn forward(
    client: &ProxyClient,
    backend: &str,
    req: Request<Body>,
    timeout: Duration,
) -> Result<Response<Body>, EdgeError> {
    let (mut parts, body) = req.into_parts();

    let path_and_query = parts
        .uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");
    parts.uri = format!("http://{backend}{path_and_query}")
        .parse::<Uri>()
        .map_err(|e| EdgeError::Body(format!("backend uri: {e}")))?;
    // The client derives Host from the rewritten authority.
    parts.headers.remove(header::HOST);

    let req = Request::from_parts(parts, body);
    match tokio::time::timeout(timeout, client.request(req)).await {
        Ok(Ok(resp)) => Ok(resp.map(Body::new)),
        Ok(Err(e)) => Err(EdgeError::BackendUnreachable(e.to_string())),
        Err(_) => Err(EdgeError::BackendTimeout(timeout)),
    }
}

/// Forward with an optional single retry after a short backoff.
///
/// Retrying needs a replayable body, so the request body is buffered
/// up front when a retry delay is configured. Timeouts are never
/// retried; only an unreachable backend is.
pub(crate) async fn forward_with_retry(
    client: &ProxyClient,
    backend: &str,
    req: Request<Body>,
    timeout: Duration,
    retry_after: Option<Duration>,
) -> Result<Response<Body>, EdgeError> {
    let Some(backoff) = retry_after else {
        return forward(client, backend, req, timeout).await;
    };

    let (parts, body) = req.into_parts();
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .map_err(|e| EdgeError::Body(e.to_string()))?;

    let first = rebuild(&parts.method, &parts.uri, &parts.headers, bytes.clone());
    match forward(client, backend, first, timeout).await {
        Err(EdgeError::BackendUnreachable(reason)) => {
            debug!(reason = %reason, "backend unreachable; retrying once");
            tokio::time::sleep(backoff).await;
            let second = rebuild(&parts.method, &parts.uri, &parts.headers, bytes);
            forward(client, backend, second, timeout).await
        }
        other => other,
    }
}

/// Rebuild a request from its replayable pieces.
fn rebuild(
    method: &Method,
    uri: &Uri,
    headers: &HeaderMap,
    bytes: axum::body::Bytes,
) -> Request<Body> {
    let mut req = Request::new(Body::from(bytes));
    *req.method_mut() = method.clone();
    *req.uri_mut() = uri.clone();
    *req.headers_mut() = headers.clone();
    req
}
