use tracing::{info, warn};

use crate::errors::CoreError;
use crate::models::configuration::BudgetConfiguration;
use crate::storage::traits::BudgetStore;

/// Checks that a candidate configuration may replace the stored one.
pub struct ConfigurationValidator;

impl ConfigurationValidator {
    pub fn new() -> Self {
        Self
    }

    /// Rules:
    /// - each percentage within [0, 100]
    /// - the three sum to exactly 100, no tolerance
    pub fn validate(&self, candidate: &BudgetConfiguration) -> Result<(), CoreError> {
        let fields = [
            ("needs_percentage", candidate.needs_percentage),
            ("wants_percentage", candidate.wants_percentage),
            ("savings_percentage", candidate.savings_percentage),
        ];

        for (name, value) in fields {
            if !(0.0..=100.0).contains(&value) {
                return Err(CoreError::ValidationError(format!(
                    "{name} must be between 0 and 100 (got {value})"
                )));
            }
        }

        let total = candidate.total();
        if total != 100.0 {
            return Err(CoreError::ValidationError(format!(
                "percentages must sum to exactly 100 (got {total})"
            )));
        }

        Ok(())
    }
}

impl Default for ConfigurationValidator {
    fn default() -> Self {
        Self::new()
    }
}

/// Reads and replaces per-owner configuration through the store.
pub struct ConfigurationService {
    validator: ConfigurationValidator,
}

impl ConfigurationService {
    pub fn new() -> Self {
        Self {
            validator: ConfigurationValidator::new(),
        }
    }

    pub fn validator(&self) -> &ConfigurationValidator {
        &self.validator
    }

    /// The owner's active configuration; 50/30/20 if none was ever saved.
    pub async fn get(
        &self,
        store: &dyn BudgetStore,
        owner_id: &str,
    ) -> Result<BudgetConfiguration, CoreError> {
        let stored = store
            .get_configuration(owner_id)
            .await
            .map_err(CoreError::into_persistence)?;
        Ok(stored.unwrap_or_default())
    }

    /// Validate, then write. A rejected candidate never reaches the store,
    /// so the previous configuration stays authoritative.
    pub async fn save(
        &self,
        store: &dyn BudgetStore,
        owner_id: &str,
        candidate: BudgetConfiguration,
    ) -> Result<BudgetConfiguration, CoreError> {
        if let Err(e) = self.validator.validate(&candidate) {
            warn!(owner = owner_id, error = %e, "configuration rejected");
            return Err(e);
        }

        store
            .set_configuration(owner_id, candidate)
            .await
            .map_err(CoreError::into_persistence)?;

        info!(
            owner = owner_id,
            needs = candidate.needs_percentage,
            wants = candidate.wants_percentage,
            savings = candidate.savings_percentage,
            "configuration saved"
        );
        Ok(candidate)
    }
}

impl Default for ConfigurationService {
    fn default() -> Self {
        Self::new()
    }
}
