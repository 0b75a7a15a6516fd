//! Cache key derivation.
//!
//! A [`PromptKey`] captures the semantic identity of a completion request:
//! the user prompt, the target model, and the optional system prompt and
//! max-token budget. [`PromptKey::derive`] maps it to a fixed-length hex
//! SHA-256 digest that serves as the entry's sole identity.
//!
//! The prompt is trimmed and lower-cased before hashing, so trivial
//! casing/whitespace variants of the same prompt share an entry. This is a
//! deliberate hit-rate trade-off: the cache is lossy about case and
//! surrounding whitespace, and the tests pin that behavior down.

use sha2::{Digest, Sha256};

use crate::model::AiModel;

/// Request parameters that identify a cacheable completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromptKey<'a> {
    prompt: &'a str,
    model: AiModel,
    system_prompt: Option<&'a str>,
    max_tokens: Option<u32>,
}

impl<'a> PromptKey<'a> {
    /// Identify a request by prompt text and model.
    pub fn new(prompt: &'a str, model: AiModel) -> Self {
        Self {
            prompt,
            model,
            system_prompt: None,
            max_tokens: None,
        }
    }

    /// Include a system prompt in the identity.
    pub fn with_system_prompt(mut self, system_prompt: &'a str) -> Self {
        self.system_prompt = Some(system_prompt);
        self
    }

    /// Include a max-token budget in the identity.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// The model this request targets.
    pub fn model(&self) -> AiModel {
        self.model
    }

    /// Derive the cache key: SHA-256 over the normalized request identity.
    ///
    /// Uses length-prefixed encoding to prevent separator collisions
    /// (e.g. `prompt="a|b"` vs `prompt="a", system="|b"`), and a tag byte for
    /// the optional fields so an absent value is a distinguishing value
    /// rather than ignored. Deterministic across processes.
    pub fn derive(&self) -> String {
        let normalized = self.prompt.trim().to_lowercase();

        let mut hasher = Sha256::new();
        update_str(&mut hasher, &normalized);
        update_str(&mut hasher, self.model.as_str());
        match self.system_prompt {
            Some(system) => {
                hasher.update([1u8]);
                update_str(&mut hasher, system);
            }
            None => hasher.update([0u8]),
        }
        match self.max_tokens {
            Some(max) => {
                hasher.update([1u8]);
                hasher.update(max.to_le_bytes());
            }
            None => hasher.update([0u8]),
        }
        hex::encode(hasher.finalize())
    }
}

fn update_str(hasher: &mut Sha256, s: &str) {
    hasher.update((s.len() as u64).to_le_bytes());
    hasher.update(s.as_bytes());
}
