use std::sync::Arc;

use prometheus::{CounterVec, HistogramVec, Opts, Registry, proto::MetricFamily};

use warden_core::{MetricsBackend, TaskOutcome};

/// Prometheus metrics backend for the supervision runtime.
///
/// All labels are bounded (low cardinality): `process` names come from
/// static configuration, `outcome` from fixed enums.
#[derive(Clone)]
pub struct PrometheusMetrics {
    tasks_started: CounterVec,
    tasks_completed: CounterVec,
    tasks_duration: HistogramVec,
    restarts: CounterVec,
    proxy_requests: CounterVec,
    registry: Arc<Registry>,
}

impl PrometheusMetrics {
    /// Create a backend registered against a custom registry.
    pub fn new_with_registry(registry: Arc<Registry>) -> Result<Self, prometheus::Error> {
        let tasks_started = CounterVec::new(
            Opts::new("tasks_started_total", "Total attempts started").namespace("warden"),
            &["process"],
        )?;
        registry.register(Box::new(tasks_started.clone()))?;

        let tasks_completed = CounterVec::new(
            Opts::new("tasks_completed_total", "Total attempts finished").namespace("warden"),
            &["process", "outcome"],
        )?;
        registry.register(Box::new(tasks_completed.clone()))?;

        let tasks_duration = HistogramVec::new(
            prometheus::HistogramOpts::new(
                "task_duration_seconds",
                "Attempt duration in seconds",
            )
            .namespace("warden")
            .buckets(vec![0.01, 0.1, 1.0, 10.0, 60.0, 600.0, 3600.0]),
            &["process"],
        )?;
        registry.register(Box::new(tasks_duration.clone()))?;

        let restarts = CounterVec::new(
            Opts::new("restarts_total", "Total restarts scheduled").namespace("warden"),
            &["process"],
        )?;
        registry.register(Box::new(restarts.clone()))?;

        let proxy_requests = CounterVec::new(
            Opts::new("proxy_requests_total", "Total proxied requests").namespace("warden"),
            &["outcome"],
        )?;
        registry.register(Box::new(proxy_requests.clone()))?;

        Ok(Self {
            tasks_started,
            tasks_completed,
            tasks_duration,
            restarts,
            proxy_requests,
            registry,
        })
    }

    /// Create a backend with its own registry.
    pub fn new() -> Result<Self, prometheus::Error> {
        Self::new_with_registry(Arc::new(Registry::new()))
    }

    /// Gather all metrics for exposition.
    pub fn gather(&self) -> Vec<MetricFamily> {
        self.registry.gather()
    }

    /// Underlying registry, for registering custom metrics alongside.
    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }
}

impl MetricsBackend for PrometheusMetrics {
    fn record_task_started(&self, task: &str) {
        self.tasks_started.with_label_values(&[task]).inc();
    }

    fn record_task_completed(&self, task: &str, outcome: TaskOutcome, duration_ms: u64) {
        self.tasks_completed
            .with_label_values(&[task, outcome.as_label()])
            .inc();

        self.tasks_duration
            .with_label_values(&[task])
            .observe(duration_ms as f64 / 1000.0);
    }

    fn record_restart(&self, task: &str) {
        self.restarts.with_label_values(&[task]).inc();
    }

    fn record_proxy_request(&self, outcome: &str) {
        self.proxy_requests.with_label_values(&[outcome]).inc();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_show_up_in_the_text_exposition() {
        use prometheus::{Encoder, TextEncoder};

        let metrics = PrometheusMetrics::new().expect("metrics");

        metrics.record_task_started("backend");
        metrics.record_task_completed("backend", TaskOutcome::Failure, 1_200);
        metrics.record_restart("backend");
        metrics.record_proxy_request("gateway_error");

        let mut buf = Vec::new();
        TextEncoder::new()
            .encode(&metrics.gather(), &mut buf)
            .expect("encode");
        let text = String::from_utf8(buf).expect("utf8");

        assert!(text.contains("warden_tasks_started_total"));
        assert!(text.contains("warden_tasks_completed_total"));
        assert!(text.contains("warden_restarts_total"));
        assert!(text.contains("warden_proxy_requests_total"));
        assert!(text.contains("outcome=\"failure\""));
    }

    #[test]
    fn duplicate_registration_fails() {
        let registry = Arc::new(Registry::new());
        assert!(PrometheusMetrics::new_with_registry(Arc::clone(&registry)).is_ok());
        assert!(PrometheusMetrics::new_with_registry(registry).is_err());
    }
}
