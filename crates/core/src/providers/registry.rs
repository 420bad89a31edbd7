use crate::models::settings::SuggestionSettings;

use super::keyword::KeywordSuggester;
use super::llm::LlmSuggester;
use super::traits::CategorySuggester;

/// Ordered list of suggestion providers.
///
/// Registration order is priority order: the suggestion service asks the
/// first provider, and only moves on when it fails.
pub struct SuggesterRegistry {
    providers: Vec<Box<dyn CategorySuggester>>,
}

impl SuggesterRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            providers: Vec::new(),
        }
    }

    /// Create a registry from settings.
    ///
    /// The LLM provider comes first when an API key is configured; the
    /// keyword rules follow when `keyword_fallback` is on.
    pub fn new_with_defaults(settings: &SuggestionSettings) -> Self {
        let mut registry = Self::new();

        if let Some(llm) = LlmSuggester::from_settings(settings) {
            registry.register(Box::new(llm));
        }

        if settings.keyword_fallback {
            registry.register(Box::new(KeywordSuggester::new()));
        }

        registry
    }

    /// Register a provider at the lowest priority.
    pub fn register(&mut self, provider: Box<dyn CategorySuggester>) {
        self.providers.push(provider);
    }

    /// All providers, highest priority first.
    pub fn providers(&self) -> Vec<&dyn CategorySuggester> {
        self.providers.iter().map(|p| p.as_ref()).collect()
    }

    pub fn names(&self) -> Vec<String> {
        self.providers.iter().map(|p| p.name().to_string()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }
}

impl Default for SuggesterRegistry {
    fn default() -> Self {
        Self::new()
    }
}
