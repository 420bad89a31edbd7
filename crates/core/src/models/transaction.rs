use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::suggestion::CategorySuggestion;

/// Direction of money flow. The stored amount is always a magnitude;
/// the sign lives here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Expense,
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionType::Income => write!(f, "income"),
            TransactionType::Expense => write!(f, "expense"),
        }
    }
}

/// The three buckets of the 50/30/20 rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    Needs,
    Wants,
    Savings,
}

impl Category {
    /// All categories in reporting order.
    pub const ALL: [Category; 3] = [Category::Needs, Category::Wants, Category::Savings];

    /// Case-insensitive parse of a category name.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "needs" => Some(Category::Needs),
            "wants" => Some(Category::Wants),
            "savings" => Some(Category::Savings),
            _ => None,
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Category::Needs => write!(f, "Needs"),
            Category::Wants => write!(f, "Wants"),
            Category::Savings => write!(f, "Savings"),
        }
    }
}

/// A persisted income or expense record.
///
/// Income transactions always carry `Category::Savings`. The resolver
/// enforces this at write time; nothing re-checks it on read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Assigned by the store at creation
    pub id: Uuid,

    /// Owning user; aggregation never mixes owners
    pub owner_id: String,

    /// Calendar date of the transaction
    pub date: NaiveDate,

    /// Free-form text, used for suggestions and display
    pub description: String,

    /// Non-negative magnitude
    pub amount: f64,

    pub transaction_type: TransactionType,

    pub category: Category,
}

impl Transaction {
    pub fn is_income(&self) -> bool {
        self.transaction_type == TransactionType::Income
    }

    pub fn is_expense(&self) -> bool {
        self.transaction_type == TransactionType::Expense
    }
}

/// A resolved transaction that has not been stored yet (no id).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTransaction {
    pub date: NaiveDate,
    pub description: String,
    pub amount: f64,
    pub transaction_type: TransactionType,
    pub category: Category,
}

impl NewTransaction {
    /// Attach the storage-assigned identity.
    pub fn into_transaction(self, id: Uuid, owner_id: impl Into<String>) -> Transaction {
        Transaction {
            id,
            owner_id: owner_id.into(),
            date: self.date,
            description: self.description,
            amount: self.amount,
            transaction_type: self.transaction_type,
            category: self.category,
        }
    }
}

/// User input for a new transaction, before category resolution.
///
/// `accepted_suggestion` is set only when the caller explicitly took the
/// suggested category; a manual selection afterwards must clear it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionDraft {
    pub date: NaiveDate,
    pub description: String,
    pub amount: f64,
    pub transaction_type: TransactionType,
    pub selected_category: Category,
    #[serde(default)]
    pub accepted_suggestion: Option<CategorySuggestion>,
}

impl TransactionDraft {
    pub fn expense(
        date: NaiveDate,
        description: impl Into<String>,
        amount: f64,
        category: Category,
    ) -> Self {
        Self {
            date,
            description: description.into(),
            amount,
            transaction_type: TransactionType::Expense,
            selected_category: category,
            accepted_suggestion: None,
        }
    }

    /// Income drafts start on `Savings`; the resolver forces it anyway.
    pub fn income(date: NaiveDate, description: impl Into<String>, amount: f64) -> Self {
        Self {
            date,
            description: description.into(),
            amount,
            transaction_type: TransactionType::Income,
            selected_category: Category::Savings,
            accepted_suggestion: None,
        }
    }

    /// Mark a suggestion as explicitly accepted.
    pub fn with_accepted_suggestion(mut self, suggestion: CategorySuggestion) -> Self {
        self.accepted_suggestion = Some(suggestion);
        self
    }
}
