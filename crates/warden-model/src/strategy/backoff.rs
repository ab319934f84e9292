use serde::{Deserialize, Serialize};

/// Delay configuration between restart attempts.
///
/// Delays grow geometrically from `first_ms` by `factor` up to `max_ms`,
/// with jitter applied per [`super::JitterStrategy`]. `delay_ms` is the
/// optional pause before rescheduling a *successful* exit under
/// `RestartStrategy::Always`.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BackoffStrategy {
    pub jitter: super::JitterStrategy,
    pub delay_ms: Option<u64>,
    pub first_ms: u64,
    pub max_ms: u64,
    pub factor: f64,
}

impl Default for BackoffStrategy {
    fn default() -> Self {
        Self {
            jitter: super::JitterStrategy::default(),
            delay_ms: None,
            first_ms: 500,
            max_ms: 30_000,
            factor: 2.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::BackoffStrategy;
    use crate::JitterStrategy;

    #[test]
    fn default_is_capped_exponential_with_full_jitter() {
        let b = BackoffStrategy::default();
        assert_eq!(b.jitter, JitterStrategy::Full);
        assert_eq!(b.first_ms, 500);
        assert_eq!(b.max_ms, 30_000);
        assert!(b.delay_ms.is_none());
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let b: BackoffStrategy = serde_json::from_str(r#"{"firstMs": 100}"#).unwrap();
        assert_eq!(b.first_ms, 100);
        assert_eq!(b.max_ms, 30_000);
    }
}
