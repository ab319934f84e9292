use serde::{Deserialize, Serialize};

/// Bound on how often a process may be restarted.
///
/// A process is restarted at most `max_restarts` times within any
/// `window_ms` span; once the budget is spent the process is declared
/// permanently failed and no further attempts are made.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RestartBudget {
    pub max_restarts: u32,
    pub window_ms: u64,
}

impl Default for RestartBudget {
    fn default() -> Self {
        Self {
            max_restarts: 5,
            window_ms: 60_000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::RestartBudget;

    #[test]
    fn default_allows_five_per_minute() {
        let b = RestartBudget::default();
        assert_eq!(b.max_restarts, 5);
        assert_eq!(b.window_ms, 60_000);
    }

    #[test]
    fn partial_json_keeps_remaining_defaults() {
        let b: RestartBudget = serde_json::from_str(r#"{"maxRestarts": 2}"#).unwrap();
        assert_eq!(b.max_restarts, 2);
        assert_eq!(b.window_ms, 60_000);
    }
}
