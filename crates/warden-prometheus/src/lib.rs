//! Prometheus metrics backend for the warden supervision runtime.
//!
//! Provides a [`PrometheusMetrics`] implementation of
//! [`warden_core::MetricsBackend`] that exposes supervision and proxy
//! counters in Prometheus format.
//!
//! ## Metrics
//! - `warden_tasks_started_total{process}` - Counter of started attempts
//! - `warden_tasks_completed_total{process, outcome}` - Counter of finished attempts
//! - `warden_task_duration_seconds{process}` - Histogram of attempt duration
//! - `warden_restarts_total{process}` - Counter of scheduled restarts
//! - `warden_proxy_requests_total{outcome}` - Counter of proxied requests
//!
//! This crate does not serve `/metrics`; call [`PrometheusMetrics::gather`]
//! from whatever HTTP surface the deployment exposes.

mod backend;
pub use backend::PrometheusMetrics;

pub use prometheus::{Encoder, Registry, TextEncoder};
