use serde::{Deserialize, Serialize};

use super::transaction::Category;

/// Per-owner target split of income across the three categories.
///
/// The three values must sum to exactly 100 before a configuration may
/// replace the stored one. Owners that never saved a configuration get
/// the classic 50/30/20 split.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BudgetConfiguration {
    pub needs_percentage: f64,
    pub wants_percentage: f64,
    pub savings_percentage: f64,
}

impl BudgetConfiguration {
    pub const DEFAULT_NEEDS: f64 = 50.0;
    pub const DEFAULT_WANTS: f64 = 30.0;
    pub const DEFAULT_SAVINGS: f64 = 20.0;

    pub fn new(needs_percentage: f64, wants_percentage: f64, savings_percentage: f64) -> Self {
        Self {
            needs_percentage,
            wants_percentage,
            savings_percentage,
        }
    }

    /// Target percentage for one category.
    pub fn percentage_for(&self, category: Category) -> f64 {
        match category {
            Category::Needs => self.needs_percentage,
            Category::Wants => self.wants_percentage,
            Category::Savings => self.savings_percentage,
        }
    }

    pub fn total(&self) -> f64 {
        self.needs_percentage + self.wants_percentage + self.savings_percentage
    }
}

impl Default for BudgetConfiguration {
    fn default() -> Self {
        Self {
            needs_percentage: Self::DEFAULT_NEEDS,
            wants_percentage: Self::DEFAULT_WANTS,
            savings_percentage: Self::DEFAULT_SAVINGS,
        }
    }
}
