use serde::{Deserialize, Serialize};

use super::transaction::Category;

/// One slice of the 50/30/20 overview chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub category: Category,
    pub total: f64,
}

/// Totals derived from one owner's transaction set. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateResult {
    /// Sum of all income amounts
    pub total_income: f64,

    /// Sum of all expense amounts
    pub total_expenses: f64,

    /// total_income - total_expenses
    pub net_savings: f64,

    /// Expenses tagged Needs
    pub needs_total: f64,

    /// Expenses tagged Wants
    pub wants_total: f64,

    /// Savings-tagged expenses plus the income left over after all expenses.
    /// Signed: a deficit shows up as a negative value.
    pub savings_total: f64,

    /// Needs, Wants, Savings in that order, only those with a total > 0
    pub chart_data: Vec<CategoryTotal>,
}

impl AggregateResult {
    /// All-zero result for an empty transaction set.
    pub fn empty() -> Self {
        Self {
            total_income: 0.0,
            total_expenses: 0.0,
            net_savings: 0.0,
            needs_total: 0.0,
            wants_total: 0.0,
            savings_total: 0.0,
            chart_data: Vec::new(),
        }
    }

    pub fn total_for(&self, category: Category) -> f64 {
        match category {
            Category::Needs => self.needs_total,
            Category::Wants => self.wants_total,
            Category::Savings => self.savings_total,
        }
    }

    /// Share of income spent on a category, or `None` without income.
    pub fn share_of_income(&self, category: Category) -> Option<f64> {
        if self.total_income > 0.0 {
            Some(self.total_for(category) / self.total_income * 100.0)
        } else {
            None
        }
    }
}

impl Default for AggregateResult {
    fn default() -> Self {
        Self::empty()
    }
}
