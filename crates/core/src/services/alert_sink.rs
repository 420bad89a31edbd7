use tracing::warn;

use crate::models::alert::BudgetAlert;

/// Fire-and-forget delivery of budget alerts to the UI layer.
pub trait AlertSink: Send + Sync {
    fn emit(&self, alert: &BudgetAlert);
}

/// Default sink: every alert becomes a `warn!` event.
pub struct TracingAlertSink;

impl AlertSink for TracingAlertSink {
    fn emit(&self, alert: &BudgetAlert) {
        warn!(
            category = %alert.category,
            actual = alert.actual_percentage,
            allowed = alert.allowed_percentage,
            "{}",
            alert.message()
        );
    }
}

/// Discards every alert.
pub struct NullAlertSink;

impl AlertSink for NullAlertSink {
    fn emit(&self, _alert: &BudgetAlert) {}
}
