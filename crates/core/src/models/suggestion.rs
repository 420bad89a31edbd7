use serde::{Deserialize, Serialize};

use super::transaction::Category;

/// Result of the suggestion step: a category plus the reason for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySuggestion {
    pub category: Category,
    pub explanation: String,
}

impl CategorySuggestion {
    pub fn new(category: Category, explanation: impl Into<String>) -> Self {
        Self {
            category,
            explanation: explanation.into(),
        }
    }
}

/// Token for one in-flight suggestion request.
///
/// Carries the inputs captured when the request started, the draft
/// generation at that moment and the request's sequence number. A response
/// is stale once the draft was edited or a newer request was started.
#[derive(Debug, Clone, PartialEq)]
pub struct SuggestionTicket {
    pub generation: u64,
    pub request: u64,
    pub description: String,
    pub amount: f64,
}

/// What happened when a suggestion response was applied to a draft.
#[derive(Debug, Clone, PartialEq)]
pub enum SuggestionOutcome {
    /// Fresh response; the draft now uses the suggested category.
    Applied(CategorySuggestion),
    /// The draft changed or a newer request started; response discarded.
    Stale,
    /// Fresh failure; the draft keeps its previous category.
    Unavailable(String),
}
