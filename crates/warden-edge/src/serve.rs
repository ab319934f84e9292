use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    Json, Router,
    body::Body,
    extract::{Request, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde_json::json;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tower::ServiceExt;
use tower_http::services::ServeDir;
use tracing::{debug, info, warn};

use warden_core::{
    MetricsHandle, ProcessStatus, ProcessTable, TaskError, TaskFn, TaskRef, noop_metrics,
};
use warden_model::RouteTarget;

use crate::{
    config::EdgeConfig,
    proxy::{self, ProxyClient},
    route::RouteTable,
};

/// Lifecycle phase of the edge listener.
///
/// Forward path: Unbound → Bound → Serving. Shutdown path: Draining
/// (new connections refused, in-flight requests finishing) → Stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgePhase {
    Unbound,
    Bound,
    Serving,
    Draining,
    Stopped,
}

struct EdgeState {
    routes: RouteTable,
    static_dir: ServeDir,
    client: ProxyClient,
    backend: String,
    timeout: Duration,
    retry_after: Option<Duration>,
    processes: ProcessTable,
    metrics: MetricsHandle,
}

/// The edge listener, packaged as a supervisable task.
///
/// Construction validates the configuration; binding happens inside the
/// task so that a port conflict surfaces as a fatal task error.
pub struct EdgeListener {
    cfg: EdgeConfig,
    processes: ProcessTable,
    metrics: MetricsHandle,
    phase_tx: watch::Sender<EdgePhase>,
    phase_rx: watch::Receiver<EdgePhase>,
    addr_tx: watch::Sender<Option<SocketAddr>>,
    addr_rx: watch::Receiver<Option<SocketAddr>>,
}

impl EdgeListener {
    /// Create a listener over a validated config and a process table to
    /// expose through the health endpoint.
    pub fn new(cfg: EdgeConfig, processes: ProcessTable) -> Result<Self, crate::EdgeError> {
        cfg.validate()?;
        let (phase_tx, phase_rx) = watch::channel(EdgePhase::Unbound);
        let (addr_tx, addr_rx) = watch::channel(None);
        Ok(Self {
            cfg,
            processes,
            metrics: noop_metrics(),
            phase_tx,
            phase_rx,
            addr_tx,
            addr_rx,
        })
    }

    pub fn with_metrics(mut self, metrics: MetricsHandle) -> Self {
        self.metrics = metrics;
        self
    }

    /// Observe lifecycle phases (used by tests and diagnostics).
    pub fn phase(&self) -> watch::Receiver<EdgePhase> {
        self.phase_rx.clone()
    }

    /// Observe the actually bound address (set after binding).
    pub fn bound_addr(&self) -> watch::Receiver<Option<SocketAddr>> {
        self.addr_rx.clone()
    }

    /// Package the listener as a named supervisable task.
    pub fn into_task(self) -> TaskRef {
        let cfg = Arc::new(self.cfg);
        let processes = self.processes;
        let metrics = self.metrics;
        let phase = self.phase_tx;
        let addr = self.addr_tx;

        TaskFn::arc("edge", move |cancel: CancellationToken| {
            let cfg = Arc::clone(&cfg);
            let processes = processes.clone();
            let metrics = metrics.clone();
            let phase = phase.clone();
            let addr = addr.clone();
            async move { run_edge(cfg, processes, metrics, phase, addr, cancel).await }
        })
    }
}

async fn run_edge(
    cfg: Arc<EdgeConfig>,
    processes: ProcessTable,
    metrics: MetricsHandle,
    phase: watch::Sender<EdgePhase>,
    addr: watch::Sender<Option<SocketAddr>>,
    cancel: CancellationToken,
) -> Result<(), TaskError> {
    phase.send_replace(EdgePhase::Unbound);

    // The external port is owned exclusively by the edge; failing to
    // take it is fatal, not retryable.
    let listener = TcpListener::bind(cfg.listen)
        .await
        .map_err(|e| TaskError::Fatal {
            reason: format!("failed to bind {}: {e}", cfg.listen),
        })?;
    addr.send_replace(listener.local_addr().ok());
    phase.send_replace(EdgePhase::Bound);
    info!(addr = %cfg.listen, "edge listener bound");

    let state = Arc::new(EdgeState {
        routes: RouteTable::new(cfg.routes.clone()),
        static_dir: ServeDir::new(&cfg.static_root),
        client: proxy::build_client(),
        backend: cfg.backend.clone(),
        timeout: Duration::from_millis(cfg.proxy_timeout_ms),
        retry_after: cfg
            .retry_backend
            .is_enabled()
            .then(|| Duration::from_millis(cfg.retry_backoff_ms)),
        processes,
        metrics,
    });

    let app = Router::new()
        .route("/healthz", get(healthz))
        .fallback(dispatch)
        .with_state(Arc::clone(&state));

    phase.send_replace(EdgePhase::Serving);
    info!(addr = %cfg.listen, backend = %cfg.backend, "edge listener serving");

    let drain_phase = phase.clone();
    let drain = cancel.clone();
    let shutdown = async move {
        drain.cancelled().await;
        info!("drain requested; refusing new connections");
        drain_phase.send_replace(EdgePhase::Draining);
    };

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await;
    phase.send_replace(EdgePhase::Stopped);

    match served {
        Ok(()) if cancel.is_cancelled() => Err(TaskError::Canceled),
        Ok(()) => Ok(()),
        Err(e) => Err(TaskError::Fail {
            reason: format!("edge serve error: {e}"),
        }),
    }
}

/// Route every non-health request by longest prefix.
async fn dispatch(State(state): State<Arc<EdgeState>>, req: Request) -> Response {
    let path = req.uri().path().to_string();
    match state.routes.resolve(&path) {
        Some(RouteTarget::Backend) => proxy_to_backend(state, req).await,
        Some(RouteTarget::Static) => serve_static(state, req).await,
        None => {
            debug!(path, "no route matched");
            (StatusCode::NOT_FOUND, "not found").into_response()
        }
    }
}

async fn proxy_to_backend(state: Arc<EdgeState>, req: Request) -> Response {
    match proxy::forward_with_retry(
        &state.client,
        &state.backend,
        req,
        state.timeout,
        state.retry_after,
    )
    .await
    {
        Ok(resp) => {
            state.metrics.record_proxy_request("forwarded");
            resp.into_response()
        }
        Err(err) => {
            state.metrics.record_proxy_request(err.proxy_outcome_label());
            warn!(error = %err, "backend request failed");
            err.gateway_response().into_response()
        }
    }
}

async fn serve_static(state: Arc<EdgeState>, req: Request) -> Response {
    // The file service never reads a body.
    let (parts, _body) = req.into_parts();
    let req = Request::from_parts(parts, Body::empty());

    match state.static_dir.clone().oneshot(req).await {
        Ok(resp) => resp.map(Body::new).into_response(),
        Err(_) => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
    }
}

/// Liveness plus a snapshot of the supervised process table.
async fn healthz(State(state): State<Arc<EdgeState>>) -> Response {
    let snapshot = state.processes.snapshot();
    let degraded = snapshot
        .values()
        .any(|s| matches!(s.status, ProcessStatus::Exhausted | ProcessStatus::Dead));

    let processes: serde_json::Map<String, serde_json::Value> = snapshot
        .iter()
        .map(|(name, s)| {
            (
                name.clone(),
                json!({
                    "status": s.status.as_label(),
                    "pid": s.pid,
                    "restarts": s.restarts,
                    "lastExitCode": s.last_exit_code,
                }),
            )
        })
        .collect();

    let status = if degraded {
        StatusCode::SERVICE_UNAVAILABLE
    } else {
        StatusCode::OK
    };
    (
        status,
        Json(json!({
            "status": if degraded { "degraded" } else { "ok" },
            "processes": processes,
        })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::routing::post;
    use http_body_util::BodyExt;
    use std::path::PathBuf;
    use warden_model::{Flag, RouteRule};

    /// Minimal stand-in for the backend process.
    async fn spawn_stub_backend(addr: SocketAddr) -> (SocketAddr, tokio::task::JoinHandle<()>) {
        let app = Router::new()
            .route("/api/ping", get(|| async { "pong" }))
            .route(
                "/api/echo",
                post(|body: String| async move { format!("echo:{body}") }),
            )
            .route(
                "/api/slow",
                get(|| async {
                    tokio::time::sleep(Duration::from_millis(300)).await;
                    "slow-done"
                }),
            );
        let listener = TcpListener::bind(addr).await.expect("stub bind");
        let local = listener.local_addr().expect("stub addr");
        let handle = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        (local, handle)
    }

    fn static_root() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("warden-edge-static-{}", std::process::id()));
        std::fs::create_dir_all(&dir).expect("static root");
        std::fs::write(dir.join("hello.txt"), "hello from static").expect("asset");
        dir
    }

    fn edge_config(backend: SocketAddr, retry: bool) -> EdgeConfig {
        EdgeConfig {
            listen: SocketAddr::from(([127, 0, 0, 1], 0)),
            static_root: static_root(),
            backend: backend.to_string(),
            routes: vec![
                RouteRule::new("/", RouteTarget::Static),
                RouteRule::new("/api", RouteTarget::Backend),
            ],
            proxy_timeout_ms: 2_000,
            retry_backend: Flag::from(retry),
            retry_backoff_ms: 50,
        }
    }

    struct RunningEdge {
        addr: SocketAddr,
        cancel: CancellationToken,
        phase: watch::Receiver<EdgePhase>,
        task: tokio::task::JoinHandle<Result<(), TaskError>>,
    }

    async fn start_edge(cfg: EdgeConfig) -> RunningEdge {
        let listener = EdgeListener::new(cfg, ProcessTable::new()).expect("edge config");
        let mut phase = listener.phase();
        let mut addr_rx = listener.bound_addr();
        let task_ref = listener.into_task();

        let cancel = CancellationToken::new();
        let run_cancel = cancel.clone();
        let task = tokio::spawn(async move { task_ref.run(run_cancel).await });

        phase
            .wait_for(|p| *p == EdgePhase::Serving)
            .await
            .expect("edge reaches serving");
        let addr = addr_rx
            .wait_for(|a| a.is_some())
            .await
            .expect("bound addr")
            .expect("addr present");

        RunningEdge {
            addr,
            cancel,
            phase,
            task,
        }
    }

    async fn http_get(addr: SocketAddr, path: &str) -> (StatusCode, String) {
        let client = proxy::build_client();
        let uri: axum::http::Uri = format!("http://{addr}{path}").parse().unwrap();
        let resp = client
            .request(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .expect("request");
        let status = resp.status();
        let bytes = resp.into_body().collect().await.expect("body").to_bytes();
        (status, String::from_utf8_lossy(&bytes).into_owned())
    }

    #[tokio::test]
    async fn static_and_backend_routes_are_dispatched() {
        let (backend, stub) = spawn_stub_backend(SocketAddr::from(([127, 0, 0, 1], 0))).await;
        let edge = start_edge(edge_config(backend, false)).await;

        let (status, body) = http_get(edge.addr, "/api/ping").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "pong");

        let (status, body) = http_get(edge.addr, "/hello.txt").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "hello from static");

        let (status, _) = http_get(edge.addr, "/missing.txt").await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        edge.cancel.cancel();
        let _ = edge.task.await;
        stub.abort();
    }

    #[tokio::test]
    async fn request_bodies_reach_the_backend_verbatim() {
        let (backend, stub) = spawn_stub_backend(SocketAddr::from(([127, 0, 0, 1], 0))).await;
        let edge = start_edge(edge_config(backend, true)).await;

        let client = proxy::build_client();
        let uri: axum::http::Uri = format!("http://{}/api/echo", edge.addr).parse().unwrap();
        let resp = client
            .request(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .body(Body::from("swap 1 FLR"))
                    .unwrap(),
            )
            .await
            .expect("request");
        assert_eq!(resp.status(), StatusCode::OK);
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&bytes[..], b"echo:swap 1 FLR");

        edge.cancel.cancel();
        let _ = edge.task.await;
        stub.abort();
    }

    #[tokio::test]
    async fn dead_backend_yields_gateway_errors_and_recovery_needs_no_edge_restart() {
        let (backend, stub) = spawn_stub_backend(SocketAddr::from(([127, 0, 0, 1], 0))).await;
        let edge = start_edge(edge_config(backend, false)).await;

        let (status, _) = http_get(edge.addr, "/api/ping").await;
        assert_eq!(status, StatusCode::OK);

        // Kill the backend: subsequent requests become gateway errors.
        stub.abort();
        let _ = stub.await;
        tokio::time::sleep(Duration::from_millis(50)).await;

        let (status, _) = http_get(edge.addr, "/api/ping").await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);

        // "Supervisor restarts the backend" on the same address; the edge
        // must resume forwarding without restarting itself.
        let (rebound, stub2) = spawn_stub_backend(backend).await;
        assert_eq!(rebound, backend);

        let mut recovered = false;
        for _ in 0..50 {
            let (status, body) = http_get(edge.addr, "/api/ping").await;
            if status == StatusCode::OK && body == "pong" {
                recovered = true;
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        assert!(recovered, "edge must resume forwarding after backend restart");

        edge.cancel.cancel();
        let _ = edge.task.await;
        stub2.abort();
    }

    #[tokio::test]
    async fn drain_finishes_in_flight_requests_then_stops() {
        let (backend, stub) = spawn_stub_backend(SocketAddr::from(([127, 0, 0, 1], 0))).await;
        let edge = start_edge(edge_config(backend, false)).await;
        let mut phase = edge.phase.clone();

        // In-flight before the drain signal: must complete.
        let addr = edge.addr;
        let inflight = tokio::spawn(async move { http_get(addr, "/api/slow").await });
        tokio::time::sleep(Duration::from_millis(50)).await;

        edge.cancel.cancel();
        phase
            .wait_for(|p| *p == EdgePhase::Draining || *p == EdgePhase::Stopped)
            .await
            .expect("drain observed");

        let (status, body) = inflight.await.expect("in-flight join");
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "slow-done");

        let result = edge.task.await.expect("edge task join");
        assert!(matches!(result, Err(TaskError::Canceled)), "got {result:?}");
        assert_eq!(*phase.borrow(), EdgePhase::Stopped);

        // The port is released: new connections are refused.
        let refused = tokio::net::TcpStream::connect(edge.addr).await;
        assert!(refused.is_err(), "listener must be closed after drain");
        stub.abort();
    }

    #[tokio::test]
    async fn port_conflict_is_fatal() {
        let occupied = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0)))
            .await
            .expect("occupy port");
        let addr = occupied.local_addr().unwrap();

        let mut cfg = edge_config(SocketAddr::from(([127, 0, 0, 1], 9)), false);
        cfg.listen = addr;

        let listener = EdgeListener::new(cfg, ProcessTable::new()).expect("edge config");
        let task = listener.into_task();
        let res = task.run(CancellationToken::new()).await;

        assert!(matches!(res, Err(TaskError::Fatal { .. })), "got {res:?}");
    }

    #[tokio::test]
    async fn healthz_reports_the_process_table() {
        let table = ProcessTable::new();
        table.register("backend");
        table.update_status("backend", ProcessStatus::Running, None);
        table.set_pid("backend", 4242);

        let (backend, stub) = spawn_stub_backend(SocketAddr::from(([127, 0, 0, 1], 0))).await;
        let listener =
            EdgeListener::new(edge_config(backend, false), table.clone()).expect("edge config");
        let mut phase = listener.phase();
        let mut addr_rx = listener.bound_addr();
        let task_ref = listener.into_task();
        let cancel = CancellationToken::new();
        let run_cancel = cancel.clone();
        let task = tokio::spawn(async move { task_ref.run(run_cancel).await });
        phase.wait_for(|p| *p == EdgePhase::Serving).await.unwrap();
        let addr = addr_rx.wait_for(|a| a.is_some()).await.unwrap().unwrap();

        let (status, body) = http_get(addr, "/healthz").await;
        assert_eq!(status, StatusCode::OK);
        let parsed: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(parsed["status"], "ok");
        assert_eq!(parsed["processes"]["backend"]["status"], "running");
        assert_eq!(parsed["processes"]["backend"]["pid"], 4242);

        table.update_status("backend", ProcessStatus::Dead, Some("gone".into()));
        let (status, body) = http_get(addr, "/healthz").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        let parsed: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(parsed["status"], "degraded");

        cancel.cancel();
        let _ = task.await;
        stub.abort();
    }
}
