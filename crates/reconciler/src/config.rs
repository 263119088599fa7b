//! Reconciler configuration.

use std::env;

/// What the patcher does when a patch does not fit the live tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StructuralPolicy {
    /// Stop and return the error.
    FailFast,
    /// Report a diagnostic, skip the patch and continue.
    Skip,
}

impl Default for StructuralPolicy {
    fn default() -> Self {
        if cfg!(debug_assertions) {
            StructuralPolicy::FailFast
        } else {
            StructuralPolicy::Skip
        }
    }
}

impl StructuralPolicy {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "fail" | "failfast" | "fail-fast" => Some(StructuralPolicy::FailFast),
            "skip" => Some(StructuralPolicy::Skip),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReconcilerConfig {
    pub structural: StructuralPolicy,
}

impl ReconcilerConfig {
    pub const ENV_STRUCTURAL: &'static str = "RETREE_STRUCTURAL";

    /// Defaults, overridden by `RETREE_STRUCTURAL=fail|skip` when set.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(raw) = env::var(Self::ENV_STRUCTURAL) {
            match StructuralPolicy::parse(&raw) {
                Some(policy) => config.structural = policy,
                None => log::warn!(
                    target: "reconciler.patch",
                    "ignoring {}={raw:?}; expected 'fail' or 'skip'",
                    Self::ENV_STRUCTURAL
                ),
            }
        }
        config
    }

    pub fn with_structural(mut self, policy: StructuralPolicy) -> Self {
        self.structural = policy;
        self
    }
}
