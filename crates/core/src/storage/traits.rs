use async_trait::async_trait;
use tokio::sync::watch;
use uuid::Uuid;

use crate::errors::CoreError;
use crate::models::configuration::BudgetConfiguration;
use crate::models::transaction::{NewTransaction, Transaction};

/// Persistence collaborator for transactions and per-owner configuration.
///
/// Every call is a single-shot operation: the core awaits one outcome and
/// never retries. Implementations should report failures as
/// `CoreError::Persistence`; anything else is folded into it by callers.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait BudgetStore: Send + Sync {
    /// Store a new transaction for `owner_id` and return its assigned id.
    async fn create_transaction(
        &self,
        owner_id: &str,
        transaction: NewTransaction,
    ) -> Result<Uuid, CoreError>;

    /// Current snapshot of the owner's transactions.
    async fn list_transactions(&self, owner_id: &str) -> Result<Vec<Transaction>, CoreError>;

    /// Live view of the owner's transactions: one snapshot now, then one per change.
    async fn subscribe_transactions(&self, owner_id: &str) -> Result<TransactionFeed, CoreError>;

    /// The owner's saved configuration, or `None` if none was ever saved.
    async fn get_configuration(
        &self,
        owner_id: &str,
    ) -> Result<Option<BudgetConfiguration>, CoreError>;

    /// Replace the owner's configuration. Callers validate beforehand.
    async fn set_configuration(
        &self,
        owner_id: &str,
        configuration: BudgetConfiguration,
    ) -> Result<(), CoreError>;
}

/// Lazy, unbounded sequence of transaction snapshots.
///
/// The first `next()` yields the snapshot current at subscription time.
/// Later calls wait for the next change; intermediate changes may be
/// coalesced, and only the latest snapshot is delivered. Returns `None`
/// once the producing side is gone.
pub struct TransactionFeed {
    receiver: watch::Receiver<Vec<Transaction>>,
    primed: bool,
}

impl TransactionFeed {
    pub fn new(receiver: watch::Receiver<Vec<Transaction>>) -> Self {
        Self {
            receiver,
            primed: false,
        }
    }

    pub async fn next(&mut self) -> Option<Vec<Transaction>> {
        if !self.primed {
            self.primed = true;
            return Some(self.receiver.borrow_and_update().clone());
        }
        self.receiver.changed().await.ok()?;
        Some(self.receiver.borrow_and_update().clone())
    }
}
