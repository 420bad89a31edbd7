use tracing::debug;

use crate::models::aggregate::AggregateResult;
use crate::models::alert::BudgetAlert;
use crate::models::configuration::BudgetConfiguration;
use crate::models::transaction::Category;

/// Categories checked against their targets. Savings is not alerted:
/// saving more than planned is not a budget problem.
const ALERTED: [Category; 2] = [Category::Needs, Category::Wants];

/// Compares spending shares with configured targets.
///
/// Pure: produces alerts, delivers nothing. Sinks handle delivery.
pub struct ThresholdEvaluator;

impl ThresholdEvaluator {
    pub fn new() -> Self {
        Self
    }

    /// Alerts for every alerted category whose share of income is strictly
    /// above its target, in Needs, Wants order.
    ///
    /// Without income there is nothing to compare against, so no alerts
    /// are produced at all. The comparison uses the unrounded share.
    pub fn evaluate(
        &self,
        summary: &AggregateResult,
        configuration: &BudgetConfiguration,
    ) -> Vec<BudgetAlert> {
        if summary.total_income <= 0.0 {
            debug!("no income in window, skipping threshold evaluation");
            return Vec::new();
        }

        ALERTED
            .iter()
            .filter_map(|&category| {
                let actual = summary.share_of_income(category)?;
                let allowed = configuration.percentage_for(category);
                (actual > allowed).then_some(BudgetAlert {
                    category,
                    actual_percentage: actual,
                    allowed_percentage: allowed,
                })
            })
            .collect()
    }
}

impl Default for ThresholdEvaluator {
    fn default() -> Self {
        Self::new()
    }
}
