use chrono::NaiveDate;
use tracing::debug;

use crate::errors::CoreError;
use crate::models::suggestion::{CategorySuggestion, SuggestionOutcome, SuggestionTicket};
use crate::models::transaction::{Category, TransactionDraft, TransactionType};
use crate::services::category_resolver::CategoryResolver;

/// Editable state of a transaction that is being entered.
///
/// Every edit bumps a generation counter. Suggestion requests capture the
/// generation in a [`SuggestionTicket`]; when the response comes back it
/// is applied only if nothing was edited in between and no newer request
/// was started. This keeps a slow suggestion for an old description from
/// overwriting what the user has chosen since.
#[derive(Debug, Clone)]
pub struct DraftCategorizer {
    date: NaiveDate,
    description: String,
    amount: f64,
    transaction_type: TransactionType,
    selected_category: Category,
    accepted_suggestion: Option<CategorySuggestion>,
    generation: u64,
    latest_request: u64,
}

impl DraftCategorizer {
    /// Empty expense draft on `date`, preselected as Wants.
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            description: String::new(),
            amount: 0.0,
            transaction_type: TransactionType::Expense,
            selected_category: Category::Wants,
            accepted_suggestion: None,
            generation: 0,
            latest_request: 0,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn amount(&self) -> f64 {
        self.amount
    }

    pub fn transaction_type(&self) -> TransactionType {
        self.transaction_type
    }

    /// Category the draft would be stored with right now.
    pub fn category(&self) -> Category {
        CategoryResolver::new().resolve_category(&self.to_draft())
    }

    /// Explanation of the accepted suggestion, if the category came from one.
    pub fn explanation(&self) -> Option<&str> {
        self.accepted_suggestion
            .as_ref()
            .map(|s| s.explanation.as_str())
    }

    pub fn set_date(&mut self, date: NaiveDate) {
        self.date = date;
        self.bump();
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
        self.bump();
    }

    pub fn set_amount(&mut self, amount: f64) {
        self.amount = amount;
        self.bump();
    }

    pub fn set_type(&mut self, transaction_type: TransactionType) {
        self.transaction_type = transaction_type;
        self.bump();
    }

    /// Manual choice. Drops any accepted suggestion.
    pub fn select_category(&mut self, category: Category) {
        self.selected_category = category;
        self.accepted_suggestion = None;
        self.bump();
    }

    /// Start a suggestion request for the current description and amount.
    ///
    /// Fails with `ValidationError` when the inputs are not usable; no
    /// request should be made in that case. A successful call supersedes
    /// every ticket handed out before it.
    pub fn begin_suggestion(&mut self) -> Result<SuggestionTicket, CoreError> {
        CategoryResolver::validate_input(&self.description, self.amount)?;
        self.latest_request = self.latest_request.wrapping_add(1);
        Ok(SuggestionTicket {
            generation: self.generation,
            request: self.latest_request,
            description: self.description.clone(),
            amount: self.amount,
        })
    }

    /// Apply the response to a ticket from [`begin_suggestion`](Self::begin_suggestion).
    ///
    /// Stale tickets are dropped whatever the result. A fresh failure
    /// leaves the category untouched. A fresh success becomes the accepted
    /// suggestion and the draft's category.
    pub fn apply_suggestion(
        &mut self,
        ticket: &SuggestionTicket,
        result: Result<CategorySuggestion, CoreError>,
    ) -> SuggestionOutcome {
        if ticket.generation != self.generation || ticket.request != self.latest_request {
            debug!(
                ticket = ticket.generation,
                current = self.generation,
                request = ticket.request,
                latest_request = self.latest_request,
                "discarding stale suggestion"
            );
            return SuggestionOutcome::Stale;
        }

        match result {
            Ok(suggestion) => {
                self.selected_category = suggestion.category;
                self.accepted_suggestion = Some(suggestion.clone());
                SuggestionOutcome::Applied(suggestion)
            }
            Err(e) => SuggestionOutcome::Unavailable(e.to_string()),
        }
    }

    /// Snapshot for the resolver.
    pub fn to_draft(&self) -> TransactionDraft {
        TransactionDraft {
            date: self.date,
            description: self.description.clone(),
            amount: self.amount,
            transaction_type: self.transaction_type,
            selected_category: self.selected_category,
            accepted_suggestion: self.accepted_suggestion.clone(),
        }
    }

    /// Clear the form after a successful submit. Outstanding tickets
    /// become stale.
    pub fn reset(&mut self) {
        let (generation, latest_request) = (self.generation, self.latest_request);
        *self = Self::new(self.date);
        self.generation = generation;
        self.latest_request = latest_request;
        self.bump();
    }

    fn bump(&mut self) {
        self.generation = self.generation.wrapping_add(1);
    }
}
