//! Runner router: selects a [`Runner`] implementation for a given spec.
//!
//! Runners are checked in registration order; the first one that reports
//! `supports(spec) == true` builds the task.
use std::sync::Arc;

use tracing::{debug, trace};

use crate::{
    error::CoreError,
    runner::{BuildContext, Runner},
    task::TaskRef,
};
use warden_model::ProcessSpec;

/// Ordered registry of runners sharing one [`BuildContext`].
#[derive(Default)]
pub struct RunnerRouter {
    runners: Vec<Arc<dyn Runner>>,
    ctx: BuildContext,
}

impl RunnerRouter {
    /// Create an empty router with a default build context.
    #[inline]
    pub fn new() -> Self {
        Self {
            runners: Vec::new(),
            ctx: BuildContext::default(),
        }
    }

    /// Set the build context shared by all runners.
    #[inline]
    pub fn with_context(mut self, ctx: BuildContext) -> Self {
        self.ctx = ctx;
        self
    }

    /// Register a runner; earlier registrations win on overlap.
    #[inline]
    pub fn register(&mut self, runner: Arc<dyn Runner>) {
        self.runners.push(runner);
    }

    /// Pick the first runner that supports the given spec.
    pub fn pick(&self, spec: &ProcessSpec) -> Option<&Arc<dyn Runner>> {
        self.runners.iter().find(|r| r.supports(spec))
    }

    /// Build a [`TaskRef`] for the spec using the selected runner.
    pub fn build(&self, spec: &ProcessSpec) -> Result<TaskRef, CoreError> {
        trace!(process = %spec.name, "router received spec");

        let runner = self
            .pick(spec)
            .ok_or_else(|| CoreError::NoRunner(spec.name.clone()))?;

        let task = runner.build_task(spec, &self.ctx).map_err(CoreError::from)?;
        debug!(process = %spec.name, runner = runner.name(), "runner built task");
        Ok(task)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::RunnerError;
    use crate::task::TaskFn;

    struct AcceptsAll;

    impl Runner for AcceptsAll {
        fn name(&self) -> &'static str {
            "accepts-all"
        }

        fn supports(&self, _spec: &ProcessSpec) -> bool {
            true
        }

        fn build_task(
            &self,
            spec: &ProcessSpec,
            _ctx: &BuildContext,
        ) -> Result<TaskRef, RunnerError> {
            Ok(TaskFn::arc(spec.name.clone(), |_cancel| async { Ok(()) }))
        }
    }

    struct AcceptsNone;

    impl Runner for AcceptsNone {
        fn name(&self) -> &'static str {
            "accepts-none"
        }

        fn supports(&self, _spec: &ProcessSpec) -> bool {
            false
        }

        fn build_task(
            &self,
            _spec: &ProcessSpec,
            _ctx: &BuildContext,
        ) -> Result<TaskRef, RunnerError> {
            Err(RunnerError::Internal("unreachable".into()))
        }
    }

    fn spec(name: &str) -> ProcessSpec {
        serde_json::from_str(&format!(
            r#"{{"name": "{name}", "command": "/bin/true"}}"#
        ))
        .unwrap()
    }

    #[test]
    fn build_fails_without_a_supporting_runner() {
        let mut router = RunnerRouter::new();
        router.register(Arc::new(AcceptsNone));

        match router.build(&spec("backend")) {
            Err(CoreError::NoRunner(name)) => assert_eq!(name, "backend"),
            other => panic!("expected NoRunner, got {other:?}"),
        }
    }

    #[test]
    fn first_supporting_runner_wins() {
        let mut router = RunnerRouter::new();
        router.register(Arc::new(AcceptsNone));
        router.register(Arc::new(AcceptsAll));

        let picked = router.pick(&spec("backend")).expect("runner picked");
        assert_eq!(picked.name(), "accepts-all");

        let task = router.build(&spec("backend")).expect("task built");
        assert_eq!(task.name(), "backend");
    }
}
