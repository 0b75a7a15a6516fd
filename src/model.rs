//! Upstream language-model identifiers.

use serde::{Deserialize, Serialize};

/// Closed enumeration of the upstream models whose responses are cached.
///
/// The cache treats the model purely as an opaque discriminator: it becomes
/// part of the derived key and of per-model invalidation, and is never
/// interpreted beyond equality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum AiModel {
    /// Fast, low-cost model used for simple operations.
    #[default]
    #[serde(rename = "claude-3-5-haiku-latest")]
    ClaudeHaiku,
    /// Balanced model used for complex task reasoning.
    #[serde(rename = "claude-sonnet-4-20250514")]
    ClaudeSonnet,
    /// Highest-capability model.
    #[serde(rename = "claude-opus-4-20250514")]
    ClaudeOpus,
}

impl AiModel {
    /// The wire identifier sent to the upstream provider.
    pub fn as_str(&self) -> &'static str {
        match self {
            AiModel::ClaudeHaiku => "claude-3-5-haiku-latest",
            AiModel::ClaudeSonnet => "claude-sonnet-4-20250514",
            AiModel::ClaudeOpus => "claude-opus-4-20250514",
        }
    }
}

impl std::fmt::Display for AiModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
