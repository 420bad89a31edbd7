use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio::sync::watch;
use uuid::Uuid;

use crate::errors::CoreError;
use crate::models::configuration::BudgetConfiguration;
use crate::models::transaction::{NewTransaction, Transaction};

use super::archive::LedgerArchive;
use super::manager::StorageManager;
use super::traits::{BudgetStore, TransactionFeed};

/// Transactions of one owner plus the channel that publishes them.
struct OwnerBook {
    transactions: Vec<Transaction>,
    feed: watch::Sender<Vec<Transaction>>,
}

impl OwnerBook {
    fn new(transactions: Vec<Transaction>) -> Self {
        let (feed, _) = watch::channel(transactions.clone());
        Self { transactions, feed }
    }

    fn publish(&self) {
        self.feed.send_replace(self.transactions.clone());
    }
}

#[derive(Default)]
struct Books {
    owners: HashMap<String, OwnerBook>,
    configurations: HashMap<String, BudgetConfiguration>,
}

/// In-process store keyed by owner id.
///
/// Can be sealed into a [`LedgerArchive`] and restored from one, which is
/// how it is persisted to disk.
#[derive(Default)]
pub struct MemoryStore {
    books: RwLock<Books>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a store from archived contents.
    pub fn from_archive(archive: LedgerArchive) -> Self {
        let owners = archive
            .transactions
            .into_iter()
            .map(|(owner, transactions)| (owner, OwnerBook::new(transactions)))
            .collect();
        Self {
            books: RwLock::new(Books {
                owners,
                configurations: archive.configurations,
            }),
        }
    }

    /// Copy of the full contents, ready to be sealed.
    pub fn archive(&self) -> Result<LedgerArchive, CoreError> {
        let books = self.read()?;
        Ok(LedgerArchive {
            transactions: books
                .owners
                .iter()
                .filter(|(_, book)| !book.transactions.is_empty())
                .map(|(owner, book)| (owner.clone(), book.transactions.clone()))
                .collect(),
            configurations: books.configurations.clone(),
        })
    }

    /// Seal the current contents with a password.
    pub fn save_to_bytes(&self, password: &str) -> Result<Vec<u8>, CoreError> {
        StorageManager::save_to_bytes(&self.archive()?, password)
    }

    /// Open a sealed ledger into a fresh store.
    pub fn load_from_bytes(data: &[u8], password: &str) -> Result<Self, CoreError> {
        Ok(Self::from_archive(StorageManager::load_from_bytes(data, password)?))
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to_file(
        &self,
        path: impl AsRef<std::path::Path>,
        password: &str,
    ) -> Result<(), CoreError> {
        StorageManager::save_to_file(&self.archive()?, path, password)
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_file(path: impl AsRef<std::path::Path>, password: &str) -> Result<Self, CoreError> {
        Ok(Self::from_archive(StorageManager::load_from_file(path, password)?))
    }

    /// Number of transactions across all owners.
    pub fn transaction_count(&self) -> Result<usize, CoreError> {
        Ok(self.read()?.owners.values().map(|b| b.transactions.len()).sum())
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Books>, CoreError> {
        self.books
            .read()
            .map_err(|_| CoreError::Persistence("store lock poisoned".into()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Books>, CoreError> {
        self.books
            .write()
            .map_err(|_| CoreError::Persistence("store lock poisoned".into()))
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl BudgetStore for MemoryStore {
    async fn create_transaction(
        &self,
        owner_id: &str,
        transaction: NewTransaction,
    ) -> Result<Uuid, CoreError> {
        let id = Uuid::new_v4();
        let mut books = self.write()?;
        let book = books
            .owners
            .entry(owner_id.to_string())
            .or_insert_with(|| OwnerBook::new(Vec::new()));
        book.transactions
            .push(transaction.into_transaction(id, owner_id));
        book.publish();
        Ok(id)
    }

    async fn list_transactions(&self, owner_id: &str) -> Result<Vec<Transaction>, CoreError> {
        let books = self.read()?;
        Ok(books
            .owners
            .get(owner_id)
            .map(|b| b.transactions.clone())
            .unwrap_or_default())
    }

    async fn subscribe_transactions(&self, owner_id: &str) -> Result<TransactionFeed, CoreError> {
        let mut books = self.write()?;
        let book = books
            .owners
            .entry(owner_id.to_string())
            .or_insert_with(|| OwnerBook::new(Vec::new()));
        Ok(TransactionFeed::new(book.feed.subscribe()))
    }

    async fn get_configuration(
        &self,
        owner_id: &str,
    ) -> Result<Option<BudgetConfiguration>, CoreError> {
        Ok(self.read()?.configurations.get(owner_id).copied())
    }

    async fn set_configuration(
        &self,
        owner_id: &str,
        configuration: BudgetConfiguration,
    ) -> Result<(), CoreError> {
        self.write()?
            .configurations
            .insert(owner_id.to_string(), configuration);
        Ok(())
    }
}
