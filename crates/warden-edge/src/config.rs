use std::net::SocketAddr;
use std::path::PathBuf;

use axum::http::uri::Authority;
use serde::{Deserialize, Serialize};

use crate::EdgeError;
use warden_model::{Flag, RouteRule, RouteTarget, TimeoutMs};

/// Edge listener configuration.
///
/// Defaults mirror the original container: the edge owns port 80, the
/// backend listens internally on 8080, `/api` is proxied and everything
/// else is served from the static root.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EdgeConfig {
    /// The single externally exposed address.
    pub listen: SocketAddr,
    /// Directory of prebuilt frontend assets served as-is.
    pub static_root: PathBuf,
    /// Internal `host:port` of the backend process.
    pub backend: String,
    /// Routing rules; longest prefix wins, declaration order breaks ties.
    pub routes: Vec<RouteRule>,
    /// Per-request deadline for proxied calls.
    pub proxy_timeout_ms: TimeoutMs,
    /// Retry an unreachable backend once before answering 502.
    pub retry_backend: Flag,
    /// Pause before that single retry.
    pub retry_backoff_ms: TimeoutMs,
}

impl Default for EdgeConfig {
    fn default() -> Self {
        Self {
            listen: SocketAddr::from(([0, 0, 0, 0], 80)),
            static_root: PathBuf::from("/usr/share/warden/html"),
            backend: "127.0.0.1:8080".to_string(),
            routes: vec![
                RouteRule::new("/", RouteTarget::Static),
                RouteRule::new("/api", RouteTarget::Backend),
            ],
            proxy_timeout_ms: 30_000,
            retry_backend: Flag::enabled(),
            retry_backoff_ms: 250,
        }
    }
}

impl EdgeConfig {
    /// Validate the configuration before binding anything.
    pub fn validate(&self) -> Result<(), EdgeError> {
        if self.routes.is_empty() {
            return Err(EdgeError::InvalidConfig("no routes configured".into()));
        }
        for rule in &self.routes {
            rule.validate()
                .map_err(|e| EdgeError::InvalidConfig(e.to_string()))?;
        }
        self.backend
            .parse::<Authority>()
            .map_err(|e| EdgeError::InvalidConfig(format!("backend '{}': {e}", self.backend)))?;
        if self.proxy_timeout_ms == 0 {
            return Err(EdgeError::InvalidConfig("proxy timeout must be non-zero".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::EdgeConfig;

    #[test]
    fn default_config_is_valid_and_mirrors_the_container() {
        let cfg = EdgeConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.listen.port(), 80);
        assert_eq!(cfg.backend, "127.0.0.1:8080");
        assert_eq!(cfg.routes.len(), 2);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg: EdgeConfig =
            serde_json::from_str(r#"{"listen": "127.0.0.1:8000"}"#).unwrap();
        assert_eq!(cfg.listen.port(), 8000);
        assert_eq!(cfg.backend, "127.0.0.1:8080");
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn garbage_backend_authority_is_rejected() {
        let mut cfg = EdgeConfig::default();
        cfg.backend = "not a host".into();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn empty_route_set_is_rejected() {
        let mut cfg = EdgeConfig::default();
        cfg.routes.clear();
        assert!(cfg.validate().is_err());
    }
}
