use std::time::Duration;
use tracing::{debug, warn};

use crate::errors::CoreError;
use crate::models::settings::SuggestionSettings;
use crate::models::suggestion::CategorySuggestion;
use crate::providers::registry::SuggesterRegistry;
use crate::providers::traits::CategorySuggester;
use crate::services::category_resolver::CategoryResolver;

/// Asks suggestion providers for a category, with fallback and a per-call
/// time limit.
///
/// Providers are tried in registry order; the first success wins. When
/// every provider fails the caller gets `SuggestionUnavailable`, or
/// `NoSuggestionProvider` when none is registered, and keeps its manual
/// selection.
pub struct SuggestionService {
    registry: SuggesterRegistry,
    timeout: Duration,
}

impl SuggestionService {
    pub fn new(registry: SuggesterRegistry, timeout: Duration) -> Self {
        Self { registry, timeout }
    }

    pub fn from_settings(settings: &SuggestionSettings) -> Self {
        Self::new(
            SuggesterRegistry::new_with_defaults(settings),
            Duration::from_secs(settings.timeout_secs),
        )
    }

    pub fn provider_names(&self) -> Vec<String> {
        self.registry.names()
    }

    pub fn has_provider(&self) -> bool {
        !self.registry.is_empty()
    }

    /// Suggest a category. Input is validated before any provider is called.
    pub async fn suggest(
        &self,
        description: &str,
        amount: f64,
    ) -> Result<CategorySuggestion, CoreError> {
        CategoryResolver::validate_input(description, amount)?;

        let providers = self.registry.providers();
        if providers.is_empty() {
            return Err(CoreError::NoSuggestionProvider);
        }

        let mut failures = Vec::with_capacity(providers.len());
        for provider in providers {
            match self.call(provider, description, amount).await {
                Ok(suggestion) => {
                    debug!(
                        provider = provider.name(),
                        category = %suggestion.category,
                        "suggestion received"
                    );
                    return Ok(suggestion);
                }
                Err(e) => {
                    warn!(provider = provider.name(), error = %e, "suggestion provider failed");
                    failures.push(format!("{}: {e}", provider.name()));
                }
            }
        }

        Err(CoreError::SuggestionUnavailable(failures.join("; ")))
    }

    #[cfg(not(target_arch = "wasm32"))]
    async fn call(
        &self,
        provider: &dyn CategorySuggester,
        description: &str,
        amount: f64,
    ) -> Result<CategorySuggestion, CoreError> {
        match tokio::time::timeout(self.timeout, provider.suggest_category(description, amount))
            .await
        {
            Ok(result) => result,
            Err(_) => Err(CoreError::Api {
                provider: provider.name().to_string(),
                message: format!("timed out after {}s", self.timeout.as_secs_f32()),
            }),
        }
    }

    #[cfg(target_arch = "wasm32")]
    async fn call(
        &self,
        provider: &dyn CategorySuggester,
        description: &str,
        amount: f64,
    ) -> Result<CategorySuggestion, CoreError> {
        provider.suggest_category(description, amount).await
    }
}
