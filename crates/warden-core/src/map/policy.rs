use std::time::Duration;

use crate::policy::{BudgetPolicy, TaskPolicy};
use warden_model::ProcessSpec;

use super::{to_backoff_policy, to_restart_policy};

/// Build the runtime policy for one configured process.
pub fn to_task_policy(spec: &ProcessSpec) -> TaskPolicy {
    TaskPolicy {
        restart: to_restart_policy(spec.restart),
        backoff: to_backoff_policy(&spec.backoff),
        budget: BudgetPolicy {
            max_restarts: spec.budget.max_restarts,
            window: Duration::from_millis(spec.budget.window_ms),
        },
        critical: spec.critical.is_enabled(),
    }
}

#[cfg(test)]
mod tests {
    use super::to_task_policy;
    use crate::policy::RestartPolicy;

    #[test]
    fn spec_fields_land_in_the_policy() {
        let spec: warden_model::ProcessSpec = serde_json::from_str(
            r#"{
                "name": "backend",
                "command": "uvicorn",
                "restart": "always",
                "critical": false,
                "budget": {"maxRestarts": 7, "windowMs": 5000}
            }"#,
        )
        .unwrap();

        let policy = to_task_policy(&spec);
        assert_eq!(policy.restart, RestartPolicy::Always);
        assert_eq!(policy.budget.max_restarts, 7);
        assert_eq!(policy.budget.window.as_millis(), 5_000);
        assert!(!policy.critical);
    }
}
