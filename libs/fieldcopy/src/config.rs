use serde::{Deserialize, Serialize};

/// What a batch does when one element cannot be produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Record the failure, drop the element, keep going.
    #[default]
    Skip,
    /// Record the failure and stop. Elements produced so far are kept.
    #[serde(alias = "stop")]
    Abort,
}

/// Batch mapping settings. Usually embedded in a caller's TOML config.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchConfig {
    #[serde(default)]
    pub policy: FailurePolicy,
}

impl BatchConfig {
    pub fn with_policy(policy: FailurePolicy) -> Self {
        Self { policy }
    }
}
