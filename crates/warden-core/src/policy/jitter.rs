use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Randomization applied to a computed backoff delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JitterPolicy {
    /// Deterministic delays.
    None,
    /// Uniform sample from `[0, base]`.
    Full,
    /// `base/2` plus a uniform sample from `[0, base/2]`.
    Equal,
    /// Uniform sample from `[0, base * 3]`, capped at `max`.
    Decorrelated,
}

impl JitterPolicy {
    /// Apply the policy to a base delay.
    ///
    /// `max` caps the decorrelated variant only; the other variants never
    /// exceed `base` by construction.
    pub fn apply(&self, base: Duration, max: Duration) -> Duration {
        let base_ms = base.as_millis() as u64;
        let jittered_ms = match self {
            JitterPolicy::None => base_ms,
            JitterPolicy::Full => rand_below(base_ms.saturating_add(1)),
            JitterPolicy::Equal => {
                let half = base_ms / 2;
                half + rand_below(base_ms - half + 1)
            }
            JitterPolicy::Decorrelated => {
                let upper = base_ms.saturating_mul(3).saturating_add(1);
                rand_below(upper).min(max.as_millis() as u64)
            }
        };
        Duration::from_millis(jittered_ms)
    }
}

/// Process-wide xorshift64* state.
///
/// Backoff jitter needs spread, not cryptographic quality, so a tiny
/// self-seeding generator avoids pulling a randomness dependency into the
/// supervision core.
static RNG_STATE: AtomicU64 = AtomicU64::new(0);

fn rand_below(upper: u64) -> u64 {
    if upper <= 1 {
        return 0;
    }
    next_u64() % upper
}

fn next_u64() -> u64 {
    let mut state = RNG_STATE.load(Ordering::Relaxed);
    if state == 0 {
        state = seed();
    }
    state ^= state << 13;
    state ^= state >> 7;
    state ^= state << 17;
    RNG_STATE.store(state, Ordering::Relaxed);
    state.wrapping_mul(0x2545_F491_4F6C_DD1D)
}

fn seed() -> u64 {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0x9E37_79B9_7F4A_7C15);
    let pid = std::process::id() as u64;
    // The low bit keeps the xorshift state away from the zero fixpoint.
    (nanos ^ (pid << 32)) | 1
}
