use warden_model::{RouteRule, RouteTarget};

/// Longest-prefix route matcher over an immutable rule set.
///
/// Matching is plain string-prefix (nginx prefix-location semantics).
/// The longest matching prefix wins; equal lengths resolve to the rule
/// declared first.
#[derive(Debug, Clone)]
pub struct RouteTable {
    rules: Vec<RouteRule>,
}

impl RouteTable {
    pub fn new(rules: Vec<RouteRule>) -> Self {
        Self { rules }
    }

    /// Resolve a request path to a target, if any rule matches.
    pub fn resolve(&self, path: &str) -> Option<RouteTarget> {
        let mut best: Option<(usize, RouteTarget)> = None;
        for rule in &self.rules {
            if !path.starts_with(rule.prefix.as_str()) {
                continue;
            }
            let len = rule.prefix.len();
            match best {
                // Strictly longer wins; equal length keeps the earlier rule.
                Some((best_len, _)) if best_len >= len => {}
                _ => best = Some((len, rule.target)),
            }
        }
        best.map(|(_, target)| target)
    }
}
