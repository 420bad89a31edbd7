use async_trait::async_trait;

use crate::errors::CoreError;
use crate::models::suggestion::CategorySuggestion;

/// Anything that can propose a 50/30/20 category for a transaction.
///
/// Implementations are black boxes to the core: they may be slow, fail,
/// or return nonsense, and the suggestion service treats every error the
/// same way (try the next provider, then give up).
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait CategorySuggester: Send + Sync {
    /// Human-readable name of this provider (for logs/errors).
    fn name(&self) -> &str;

    /// Suggest a category for a description and a positive amount.
    async fn suggest_category(
        &self,
        description: &str,
        amount: f64,
    ) -> Result<CategorySuggestion, CoreError>;
}
