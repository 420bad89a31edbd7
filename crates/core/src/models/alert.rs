use serde::{Deserialize, Serialize};

use super::transaction::Category;

/// Raised when a category's share of income goes over its target.
///
/// Percentages are kept unrounded; use [`BudgetAlert::rounded_actual`] for
/// display.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BudgetAlert {
    pub category: Category,
    pub actual_percentage: f64,
    pub allowed_percentage: f64,
}

impl BudgetAlert {
    /// Actual share rounded to the nearest whole percent.
    pub fn rounded_actual(&self) -> i64 {
        self.actual_percentage.round() as i64
    }

    /// Allowed share rounded to the nearest whole percent.
    pub fn rounded_allowed(&self) -> i64 {
        self.allowed_percentage.round() as i64
    }

    /// Notification text for the UI layer.
    pub fn message(&self) -> String {
        format!(
            "You've spent {}% of your income on {}, which is over the {}% target.",
            self.rounded_actual(),
            self.category.to_string().to_lowercase(),
            self.rounded_allowed(),
        )
    }
}

impl std::fmt::Display for BudgetAlert {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Budget alert ({}): {}", self.category, self.message())
    }
}
