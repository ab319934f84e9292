use std::time::Duration;

use super::JitterPolicy;

/// Delay computation between attempts of one task.
#[derive(Debug, Clone)]
pub struct BackoffPolicy {
    /// Optional pause before rescheduling a successful exit
    /// (`RestartPolicy::Always` only).
    pub success_delay: Option<Duration>,
    /// Delay before the first retry.
    pub first: Duration,
    /// Upper bound for the computed delay.
    pub max: Duration,
    /// Geometric growth factor per consecutive failure.
    pub factor: f64,
    /// Randomization applied to the computed delay.
    pub jitter: JitterPolicy,
}

impl BackoffPolicy {
    /// Delay before retry number `attempt` (1-based, consecutive
    /// failures since the last success).
    ///
    /// The base grows as `first * factor^(attempt-1)`, saturating at
    /// `max`; jitter is applied last.
    pub fn delay(&self, attempt: u32) -> Duration {
        let exp = attempt.saturating_sub(1).min(63);
        let factor = if self.factor.is_finite() && self.factor >= 1.0 {
            self.factor
        } else {
            1.0
        };

        let base_ms = (self.first.as_millis() as f64) * factor.powi(exp as i32);
        let capped_ms = if base_ms.is_finite() {
            (base_ms as u64).min(self.max.as_millis() as u64)
        } else {
            self.max.as_millis() as u64
        };

        self.jitter
            .apply(Duration::from_millis(capped_ms), self.max)
    }
}
