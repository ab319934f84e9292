use std::time::Duration;

use axum::body::Body;
use axum::http::{Response, StatusCode};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EdgeError {
    #[error("invalid edge configuration: {0}")]
    InvalidConfig(String),

    #[error("backend unreachable: {0}")]
    BackendUnreachable(String),

    #[error("backend timed out after {0:?}")]
    BackendTimeout(Duration),

    #[error("request body error: {0}")]
    Body(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl EdgeError {
    /// Metrics label for a failed proxy attempt.
    pub(crate) fn proxy_outcome_label(&self) -> &'static str {
        match self {
            EdgeError::BackendTimeout(_) => "timeout",
            _ => "gateway_error",
        }
    }

    /// Gateway-error response relayed to the caller.
    ///
    /// Request-level failures never escape as anything but a response.
    pub(crate) fn gateway_response(&self) -> Response<Body> {
        let status = match self {
            EdgeError::BackendTimeout(_) => StatusCode::GATEWAY_TIMEOUT,
            _ => StatusCode::BAD_GATEWAY,
        };
        Response::builder()
            .status(status)
            .body(Body::from(status.canonical_reason().unwrap_or("gateway error")))
            .unwrap_or_else(|_| {
                let mut resp = Response::new(Body::empty());
                *resp.status_mut() = StatusCode::BAD_GATEWAY;
                resp
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeouts_map_to_504_and_the_rest_to_502() {
        let timeout = EdgeError::BackendTimeout(Duration::from_secs(30));
        assert_eq!(
            timeout.gateway_response().status(),
            StatusCode::GATEWAY_TIMEOUT
        );
        assert_eq!(timeout.proxy_outcome_label(), "timeout");

        let refused = EdgeError::BackendUnreachable("connection refused".into());
        assert_eq!(refused.gateway_response().status(), StatusCode::BAD_GATEWAY);
        assert_eq!(refused.proxy_outcome_label(), "gateway_error");
    }
}
