use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tracing::info;

use warden_core::{
    BuildContext, ManagedTask, ProcessTable, RunnerRouter, Supervisor, SupervisorConfig,
    map::to_task_policy,
    policy::{BackoffPolicy, BudgetPolicy, JitterPolicy, RestartPolicy, TaskPolicy},
};
use warden_edge::EdgeListener;
use warden_exec::subprocess::register_subprocess_runner;
use warden_observe::{Subscriber, init_local_offset, init_logger};
use warden_prometheus::PrometheusMetrics;

mod config;
use config::AgentConfig;

const DEFAULT_CONFIG_PATH: &str = "/etc/warden/warden.json";

fn main() -> anyhow::Result<()> {
    // Local timezone must be read before any threads exist.
    init_local_offset();

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    let cfg = AgentConfig::load(Path::new(&config_path))?;

    init_logger(&cfg.logger)?;
    info!(config = %config_path, "configuration loaded");

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("building runtime")?
        .block_on(run(cfg))
}

async fn run(cfg: AgentConfig) -> anyhow::Result<()> {
    // 1) launch-time env overrides (allow-listed names only)
    let overrides = cfg.capture_overrides();
    info!(count = overrides.len(), "allow-listed launch overrides captured");

    // 2) startup validation: fail fast before anything spawns
    Supervisor::validate(&cfg.processes, &overrides).context("startup validation")?;

    // 3) shared plumbing: metrics, state table, runner router
    let metrics = Arc::new(PrometheusMetrics::new().context("metrics registry")?);
    let table = ProcessTable::new();

    let ctx = BuildContext::new(overrides, table.clone(), metrics.clone());
    let mut router = RunnerRouter::new().with_context(ctx);
    register_subprocess_runner(
        &mut router,
        Duration::from_millis(cfg.supervisor.term_grace_ms),
    );

    // 4) managed tasks: children in declaration order, edge last so that
    //    shutdown (reverse order) drains the edge before the children
    let mut tasks = Vec::with_capacity(cfg.processes.len() + 1);
    for spec in &cfg.processes {
        tasks.push(ManagedTask::new(router.build(spec)?, to_task_policy(spec)));
    }

    let edge = EdgeListener::new(cfg.edge.clone(), table.clone())?
        .with_metrics(metrics.clone());
    tasks.push(ManagedTask::new(edge.into_task(), edge_policy()));

    // 5) supervise until clean shutdown or a critical failure
    let supervisor = Supervisor::builder(SupervisorConfig {
        grace: Duration::from_millis(cfg.supervisor.grace_ms),
    })
    .with_table(table)
    .with_metrics(metrics)
    .with_subscriber(Arc::new(Subscriber))
    .build();

    supervisor
        .run(tasks)
        .await
        .context("supervisor terminated with error")
}

/// Lifecycle policy for the edge listener.
///
/// Serve-loop failures are retried with backoff; a port conflict is
/// fatal inside the task and never reaches the retry path.
fn edge_policy() -> TaskPolicy {
    TaskPolicy::new(
        RestartPolicy::OnFailure,
        BackoffPolicy {
            success_delay: None,
            first: Duration::from_millis(500),
            max: Duration::from_secs(10),
            factor: 2.0,
            jitter: JitterPolicy::Full,
        },
        BudgetPolicy {
            max_restarts: 3,
            window: Duration::from_secs(60),
        },
        true,
    )
}
