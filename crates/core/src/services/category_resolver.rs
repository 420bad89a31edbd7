use chrono::{NaiveDate, Utc};
use tracing::{debug, info, warn};

use crate::errors::CoreError;
use crate::models::transaction::{
    Category, NewTransaction, Transaction, TransactionDraft, TransactionType,
};
use crate::storage::traits::BudgetStore;

/// Decides the category a new transaction is stored with, and stores it.
///
/// Order of precedence, last rule wins:
/// 1. the user's selected category
/// 2. an explicitly accepted suggestion (expenses only)
/// 3. income is always Savings
pub struct CategoryResolver;

impl CategoryResolver {
    pub fn new() -> Self {
        Self
    }

    /// Preconditions shared by submission and the suggestion step:
    /// non-blank description and a finite, positive amount.
    pub fn validate_input(description: &str, amount: f64) -> Result<(), CoreError> {
        if description.trim().is_empty() {
            return Err(CoreError::ValidationError(
                "Description must not be empty".into(),
            ));
        }
        if !amount.is_finite() || amount <= 0.0 {
            return Err(CoreError::ValidationError(format!(
                "Amount must be a positive number (got {amount})"
            )));
        }
        Ok(())
    }

    /// Full draft validation.
    ///
    /// Rules:
    /// - description and amount as in [`validate_input`](Self::validate_input)
    /// - date not before 1900-01-01
    /// - date at most one day ahead of today (timezone tolerance)
    pub fn validate_draft(&self, draft: &TransactionDraft) -> Result<(), CoreError> {
        Self::validate_input(&draft.description, draft.amount)?;

        let earliest = NaiveDate::from_ymd_opt(1900, 1, 1).unwrap_or(NaiveDate::MIN);
        if draft.date < earliest {
            return Err(CoreError::ValidationError(format!(
                "Transaction date {} is before {earliest}",
                draft.date
            )));
        }

        let today = Utc::now().date_naive();
        if let Some(tomorrow) = today.succ_opt() {
            if draft.date > tomorrow {
                return Err(CoreError::ValidationError(format!(
                    "Transaction date {} is in the future",
                    draft.date
                )));
            }
        }

        Ok(())
    }

    /// The category a valid draft resolves to.
    pub fn resolve_category(&self, draft: &TransactionDraft) -> Category {
        match draft.transaction_type {
            TransactionType::Income => Category::Savings,
            TransactionType::Expense => draft
                .accepted_suggestion
                .as_ref()
                .map(|s| s.category)
                .unwrap_or(draft.selected_category),
        }
    }

    /// Validate and resolve a draft into a storable transaction.
    pub fn resolve(&self, draft: TransactionDraft) -> Result<NewTransaction, CoreError> {
        if let Err(e) = self.validate_draft(&draft) {
            warn!(error = %e, "transaction draft rejected");
            return Err(e);
        }

        let category = self.resolve_category(&draft);
        if category != draft.selected_category {
            debug!(
                selected = %draft.selected_category,
                resolved = %category,
                transaction_type = %draft.transaction_type,
                "category overridden"
            );
        }

        Ok(NewTransaction {
            date: draft.date,
            description: draft.description.trim().to_string(),
            amount: draft.amount,
            transaction_type: draft.transaction_type,
            category,
        })
    }

    /// Resolve and issue exactly one write. Nothing is written when
    /// validation fails; a failed write is reported and not retried.
    pub async fn submit(
        &self,
        store: &dyn BudgetStore,
        owner_id: &str,
        draft: TransactionDraft,
    ) -> Result<Transaction, CoreError> {
        let resolved = self.resolve(draft)?;

        let id = match store.create_transaction(owner_id, resolved.clone()).await {
            Ok(id) => id,
            Err(e) => {
                let e = e.into_persistence();
                warn!(owner = owner_id, error = %e, "transaction write failed");
                return Err(e);
            }
        };

        info!(
            owner = owner_id,
            %id,
            transaction_type = %resolved.transaction_type,
            category = %resolved.category,
            "transaction stored"
        );
        Ok(resolved.into_transaction(id, owner_id))
    }
}

impl Default for CategoryResolver {
    fn default() -> Self {
        Self::new()
    }
}
