use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::{ModelError, ModelResult};

/// Destination of a matched route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RouteTarget {
    /// Serve the file from the static root.
    Static,
    /// Forward the request to the backend's internal address.
    Backend,
}

impl FromStr for RouteTarget {
    type Err = ModelError;
    fn from_str(s: &str) -> ModelResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "static" => Ok(RouteTarget::Static),
            "backend" => Ok(RouteTarget::Backend),
            other => Err(ModelError::UnknownRouteTarget(other.to_string())),
        }
    }
}

/// Single routing rule for the edge listener.
///
/// Rules are matched by path prefix; the longest matching prefix wins,
/// ties resolve by declaration order. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteRule {
    /// Path prefix, e.g. `/` or `/api`.
    pub prefix: String,
    /// Where matching requests go.
    pub target: RouteTarget,
}

impl RouteRule {
    /// Create a rule for the given prefix and target.
    pub fn new(prefix: impl Into<String>, target: RouteTarget) -> Self {
        Self {
            prefix: prefix.into(),
            target,
        }
    }

    /// Validate the rule: the prefix must be non-empty and absolute.
    pub fn validate(&self) -> ModelResult<()> {
        if self.prefix.is_empty() {
            return Err(ModelError::Invalid("route prefix is empty".into()));
        }
        if !self.prefix.starts_with('/') {
            return Err(ModelError::Invalid(format!(
                "route prefix must start with '/': {}",
                self.prefix
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{RouteRule, RouteTarget};
    use std::str::FromStr;

    #[test]
    fn target_parses_case_insensitive() {
        assert_eq!(
            RouteTarget::from_str("Static").unwrap(),
            RouteTarget::Static
        );
        assert_eq!(
            RouteTarget::from_str("BACKEND").unwrap(),
            RouteTarget::Backend
        );
        assert!(RouteTarget::from_str("upstream").is_err());
    }

    #[test]
    fn validate_rejects_relative_prefix() {
        assert!(RouteRule::new("/", RouteTarget::Static).validate().is_ok());
        assert!(
            RouteRule::new("api", RouteTarget::Backend)
                .validate()
                .is_err()
        );
        assert!(RouteRule::new("", RouteTarget::Static).validate().is_err());
    }

    #[test]
    fn serde_roundtrip_uses_camel_case_target() {
        let rule = RouteRule::new("/api", RouteTarget::Backend);
        let json = serde_json::to_string(&rule).unwrap();
        assert!(json.contains("\"target\":\"backend\""));

        let back: RouteRule = serde_json::from_str(&json).unwrap();
        assert_eq!(back, rule);
    }
}
