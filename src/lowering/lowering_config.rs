use serde::{Deserialize, Serialize};

/// Knobs of the lowering pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoweringConfig {
    /// When false, output reconciliation treats `T` and `Nullable(T)` as the
    /// same type and inserts no conversion for a nullability-only difference.
    pub strict_nullability: bool,
    /// Record each required column once, in first-seen order.
    pub dedup_required_columns: bool,
}

impl Default for LoweringConfig {
    fn default() -> Self {
        Self { strict_nullability: true, dedup_required_columns: true }
    }
}

impl LoweringConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lenient_nullability() -> Self {
        Self { strict_nullability: false, ..Self::default() }
    }

    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}
