use std::time::Duration;

pub const DEFAULT_API_ROOT: &str = "http://localhost:8000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
const GENERATE_PATH: &str = "generate-itinerary";

/// Where the planning service lives and how long to wait for it.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannerConfig {
    pub api_root: String,
    pub timeout: Duration,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            api_root: DEFAULT_API_ROOT.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl PlannerConfig {
    /// Reads `PLANNER_API_ROOT` and `PLANNER_TIMEOUT_SECS`, falling back to
    /// defaults when unset or unparsable.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let api_root = lookup("PLANNER_API_ROOT")
            .map(|root| root.trim().to_string())
            .filter(|root| !root.is_empty())
            .unwrap_or(defaults.api_root);
        let timeout = match lookup("PLANNER_TIMEOUT_SECS") {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    tracing::warn!("ignoring invalid PLANNER_TIMEOUT_SECS={raw:?}");
                    defaults.timeout
                }
            },
            None => defaults.timeout,
        };
        Self { api_root, timeout }
    }

    pub fn endpoint(&self) -> String {
        format!("{}/{GENERATE_PATH}", self.api_root.trim_end_matches('/'))
    }
}
