use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::{ModelError, ModelResult};

/// Controls how random jitter is applied to backoff delays.
///
/// Jitter spreads restart attempts over time so that simultaneously
/// crashing processes do not retry in lockstep.
///
/// Strategies:
/// - `None`: deterministic delays.
/// - `Full`: delay uniformly sampled from `[0, base]`.
/// - `Equal`: delay sampled around the midpoint, `base/2 + rand(base/2)`.
/// - `Decorrelated`: delay sampled from `min(max, rand(base * 3))`.
///
/// The math lives in the supervision engine; this enum only names the
/// policy.
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum JitterStrategy {
    /// No randomness applied.
    None,
    /// Delay uniformly sampled from `[0, base]`.
    #[default]
    Full,
    /// Delay sampled around the midpoint of the base delay.
    Equal,
    /// Delay sampled from `min(max, rand(base * 3))`.
    Decorrelated,
}

impl FromStr for JitterStrategy {
    type Err = ModelError;
    fn from_str(s: &str) -> ModelResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "equal" => Ok(JitterStrategy::Equal),
            "" | "none" => Ok(JitterStrategy::None),
            "full" | "default" => Ok(JitterStrategy::Full),
            "decorrelated" => Ok(JitterStrategy::Decorrelated),
            other => Err(ModelError::UnknownJitter(other.to_string())),
        }
    }
}
