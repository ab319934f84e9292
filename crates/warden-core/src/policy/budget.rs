use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Restart bound carried by a task policy.
#[derive(Debug, Clone, Copy)]
pub struct BudgetPolicy {
    pub max_restarts: u32,
    pub window: Duration,
}

/// Sliding-window restart accounting for one actor.
///
/// Each retry must acquire a slot; slots are released as their timestamps
/// age out of the window. An actor that cannot acquire a slot declares
/// the process permanently failed.
#[derive(Debug)]
pub struct RestartWindow {
    policy: BudgetPolicy,
    marks: VecDeque<Instant>,
}

impl RestartWindow {
    pub fn new(policy: BudgetPolicy) -> Self {
        Self {
            policy,
            marks: VecDeque::new(),
        }
    }

    /// Try to record a restart at `now`.
    ///
    /// Returns `false` when `max_restarts` timestamps already sit inside
    /// the window, leaving the window unchanged.
    pub fn try_acquire(&mut self, now: Instant) -> bool {
        while let Some(front) = self.marks.front() {
            if now.duration_since(*front) >= self.policy.window {
                self.marks.pop_front();
            } else {
                break;
            }
        }
        if self.marks.len() >= self.policy.max_restarts as usize {
            return false;
        }
        self.marks.push_back(now);
        true
    }

    /// Restarts currently accounted inside the window.
    pub fn used(&self) -> usize {
        self.marks.len()
    }

    pub fn policy(&self) -> &BudgetPolicy {
        &self.policy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window(max_restarts: u32, window_ms: u64) -> RestartWindow {
        RestartWindow::new(BudgetPolicy {
            max_restarts,
            window: Duration::from_millis(window_ms),
        })
    }

    #[test]
    fn denies_after_budget_is_spent() {
        let mut w = window(3, 60_000);
        let t0 = Instant::now();

        assert!(w.try_acquire(t0));
        assert!(w.try_acquire(t0 + Duration::from_secs(1)));
        assert!(w.try_acquire(t0 + Duration::from_secs(2)));
        assert!(!w.try_acquire(t0 + Duration::from_secs(3)));
        assert_eq!(w.used(), 3);
    }

    #[test]
    fn slots_age_out_of_the_window() {
        let mut w = window(2, 10_000);
        let t0 = Instant::now();

        assert!(w.try_acquire(t0));
        assert!(w.try_acquire(t0 + Duration::from_secs(1)));
        assert!(!w.try_acquire(t0 + Duration::from_secs(2)));

        // First mark expires 10s after t0.
        assert!(w.try_acquire(t0 + Duration::from_secs(11)));
    }

    #[test]
    fn zero_budget_never_admits() {
        let mut w = window(0, 10_000);
        assert!(!w.try_acquire(Instant::now()));
    }

    #[test]
    fn denied_acquire_does_not_consume_a_slot() {
        let mut w = window(1, 10_000);
        let t0 = Instant::now();

        assert!(w.try_acquire(t0));
        assert!(!w.try_acquire(t0 + Duration::from_secs(1)));
        assert!(!w.try_acquire(t0 + Duration::from_secs(2)));

        // Only the granted restart occupies the window.
        assert!(w.try_acquire(t0 + Duration::from_secs(11)));
    }
}
