use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// Library-level settings. Distinct from the per-owner
/// [`BudgetConfiguration`](super::configuration::BudgetConfiguration).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Where and how to reach the LLM suggestion endpoint.
    pub suggestion: SuggestionSettings,

    /// How many rows `recent_transactions` returns.
    pub recent_limit: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            suggestion: SuggestionSettings::default(),
            recent_limit: 10,
        }
    }
}

impl Settings {
    /// Parse a JSON settings document. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        Ok(serde_json::from_str(json)?)
    }
}

#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SuggestionSettings {
    /// Base URL of an OpenAI-compatible API (without `/chat/completions`).
    pub endpoint: String,

    /// Model name sent with every request.
    pub model: String,

    /// The LLM provider is only registered when a key is present.
    pub api_key: Option<String>,

    /// Upper bound for a single provider call.
    pub timeout_secs: u64,

    /// Register the offline keyword suggester after the LLM provider.
    pub keyword_fallback: bool,
}

impl Default for SuggestionSettings {
    fn default() -> Self {
        Self {
            endpoint: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            api_key: None,
            timeout_secs: 15,
            keyword_fallback: true,
        }
    }
}

impl SuggestionSettings {
    pub fn has_api_key(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.trim().is_empty())
    }
}

// The key never shows up in logs.
impl std::fmt::Debug for SuggestionSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SuggestionSettings")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("timeout_secs", &self.timeout_secs)
            .field("keyword_fallback", &self.keyword_fallback)
            .finish()
    }
}
