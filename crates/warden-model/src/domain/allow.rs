use serde::{Deserialize, Serialize};

use crate::Env;

/// Environment-variable names the launch environment may override.
///
/// Variables not on the list keep their image-baked defaults no matter
/// what the ambient environment carries at launch. The list itself is
/// read-only at runtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AllowList(pub Vec<String>);

impl AllowList {
    /// Create an empty allow-list (no overrides permitted).
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    /// Returns `true` if the given variable name may be overridden.
    pub fn permits(&self, name: &str) -> bool {
        self.0.iter().any(|n| n == name)
    }

    /// Iterate over the allowed names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|s| s.as_str())
    }

    /// Keep only the allow-listed entries of `ambient`.
    ///
    /// This is the single filtering point between the launch environment
    /// and the processes: anything not on the list is dropped here.
    pub fn filter(&self, ambient: &Env) -> Env {
        let mut out = Env::new();
        for kv in ambient.iter() {
            if self.permits(kv.key()) {
                out.push(kv.key(), kv.value());
            }
        }
        out
    }
}

impl Default for AllowList {
    /// The override set declared by the original launch policy.
    fn default() -> Self {
        Self(vec![
            "GEMINI_API_KEY".to_string(),
            "GEMINI_MODEL".to_string(),
            "WEB3_PROVIDER_URL".to_string(),
            "WEB3_EXPLORER_URL".to_string(),
            "SIMULATE_ATTESTATION".to_string(),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::AllowList;
    use crate::Env;

    #[test]
    fn default_list_matches_launch_policy() {
        let allow = AllowList::default();
        assert!(allow.permits("GEMINI_API_KEY"));
        assert!(allow.permits("SIMULATE_ATTESTATION"));
        assert!(!allow.permits("PATH"));
        assert!(!allow.permits("gemini_api_key"));
    }

    #[test]
    fn filter_drops_names_off_the_list() {
        let mut ambient = Env::new();
        ambient.push("GEMINI_API_KEY", "secret");
        ambient.push("LD_PRELOAD", "/tmp/evil.so");
        ambient.push("WEB3_EXPLORER_URL", "https://explorer.example");

        let kept = AllowList::default().filter(&ambient);
        assert_eq!(kept.len(), 2);
        assert_eq!(kept.get("GEMINI_API_KEY"), Some("secret"));
        assert!(kept.get("LD_PRELOAD").is_none());
    }

    #[test]
    fn empty_list_permits_nothing() {
        let mut ambient = Env::new();
        ambient.push("GEMINI_API_KEY", "secret");

        let kept = AllowList::empty().filter(&ambient);
        assert!(kept.is_empty());
    }

    #[test]
    fn serde_is_a_plain_string_array() {
        let allow = AllowList(vec!["A".into(), "B".into()]);
        let json = serde_json::to_string(&allow).unwrap();
        assert_eq!(json, r#"["A","B"]"#);

        let back: AllowList = serde_json::from_str(&json).unwrap();
        assert!(back.permits("A"));
        assert!(!back.permits("C"));
    }
}
