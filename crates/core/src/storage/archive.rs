use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::models::configuration::BudgetConfiguration;
use crate::models::transaction::Transaction;

/// Everything a store holds, in a serializable shape.
///
/// This is what gets bincode-encoded and sealed into a ledger file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LedgerArchive {
    /// owner id → that owner's transactions, in insertion order
    pub transactions: HashMap<String, Vec<Transaction>>,

    /// owner id → saved configuration (absent owners use the default)
    pub configurations: HashMap<String, BudgetConfiguration>,
}

impl LedgerArchive {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn owner_count(&self) -> usize {
        let mut owners: Vec<&String> = self
            .transactions
            .keys()
            .chain(self.configurations.keys())
            .collect();
        owners.sort();
        owners.dedup();
        owners.len()
    }
}
