use async_trait::async_trait;

use crate::errors::CoreError;
use crate::models::suggestion::CategorySuggestion;
use crate::models::transaction::Category;
use super::traits::CategorySuggester;

const SAVINGS_KEYWORDS: &[&str] = &[
    "savings", "saving", "deposit", "investment", "invest", "retirement", "401k",
    "pension", "emergency fund", "brokerage", "index fund", "etf", "stocks", "bonds",
    "loan prepayment", "extra payment",
];

const NEEDS_KEYWORDS: &[&str] = &[
    "rent", "mortgage", "grocer", "supermarket", "utility", "utilities", "electric",
    "electricity", "water bill", "gas bill", "heating", "internet", "phone bill", "insurance",
    "pharmacy", "doctor", "medical", "dentist", "hospital", "prescription", "tuition",
    "childcare", "daycare", "bus fare", "train", "metro", "transit", "fuel", "petrol",
    "car payment", "tax",
];

const WANTS_KEYWORDS: &[&str] = &[
    "restaurant", "dining", "takeout", "take-out", "delivery", "coffee", "cafe", "pub",
    "cinema", "movie", "concert", "netflix", "spotify", "streaming", "subscription", "game",
    "gaming", "hobby", "vacation", "travel", "hotel", "flight", "shopping", "clothes",
    "fashion", "gadget", "gym", "spa", "gift",
];

/// Offline, rules-based category suggestions.
///
/// Matches lowercase description keywords in priority order
/// Savings → Needs → Wants, so "savings deposit at the bank" is never
/// read as a want. Unmatched descriptions are suggested as Wants, the
/// conservative choice for budget alerts.
pub struct KeywordSuggester;

impl KeywordSuggester {
    pub fn new() -> Self {
        Self
    }

    /// Synchronous core of the rules; exposed for callers without a runtime.
    pub fn classify(description: &str, amount: f64) -> CategorySuggestion {
        let text = description.to_lowercase();

        if let Some(kw) = first_match(&text, SAVINGS_KEYWORDS) {
            return CategorySuggestion::new(
                Category::Savings,
                format!("'{kw}' indicates money set aside rather than spent"),
            );
        }
        if let Some(kw) = first_match(&text, NEEDS_KEYWORDS) {
            return CategorySuggestion::new(
                Category::Needs,
                format!("'{kw}' is an essential living cost"),
            );
        }
        if let Some(kw) = first_match(&text, WANTS_KEYWORDS) {
            return CategorySuggestion::new(
                Category::Wants,
                format!("'{kw}' is discretionary spending"),
            );
        }

        CategorySuggestion::new(
            Category::Wants,
            format!("No known keyword; treating {amount:.2} as discretionary spending"),
        )
    }
}

impl Default for KeywordSuggester {
    fn default() -> Self {
        Self::new()
    }
}

fn first_match<'a>(text: &str, keywords: &[&'a str]) -> Option<&'a str> {
    keywords.iter().copied().find(|kw| text.contains(kw))
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl CategorySuggester for KeywordSuggester {
    fn name(&self) -> &str {
        "Keywords"
    }

    async fn suggest_category(
        &self,
        description: &str,
        amount: f64,
    ) -> Result<CategorySuggestion, CoreError> {
        Ok(Self::classify(description, amount))
    }
}
