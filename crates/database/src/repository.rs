use crate::DbError;
use chrono::{DateTime, Utc};
use core_types::{Currency, ExchangeRate, Store, StoreSnapshot, Transaction};
use rust_decimal::Decimal;
use tracing::info;

/// How many sales the dashboard lists under "recent activity".
pub const RECENT_ACTIVITY_LIMIT: usize = 5;

/// Read-only access to the records the leaderboard is computed from.
///
/// The statistics and ranking code only ever reads through this trait, so it
/// can be fed from the on-disk blob store, an in-memory registry or a fixture.
pub trait DataSource {
    fn list_stores(&self) -> Result<Vec<Store>, DbError>;

    fn list_transactions(&self) -> Result<Vec<Transaction>, DbError>;

    fn exchange_rate(&self) -> Result<ExchangeRate, DbError>;

    /// Copies everything into one consistent snapshot.
    fn snapshot(&self) -> Result<StoreSnapshot, DbError> {
        Ok(StoreSnapshot {
            stores: self.list_stores()?,
            transactions: self.list_transactions()?,
            exchange_rate: self.exchange_rate()?,
        })
    }
}

/// Fields of a store that may be changed after registration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub url: Option<String>,
    pub currency: Option<Currency>,
}

/// The `Repository` is the in-memory registry of stores and their sales.
///
/// It enforces the registration rules (unique id, unique email, sales only for
/// known stores) and the delete cascade. Persisting it is the job of `BlobStore`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Repository {
    stores: Vec<Store>,
    transactions: Vec<Transaction>,
    exchange_rate: ExchangeRate,
}

impl Repository {
    /// Creates an empty registry using `exchange_rate` for conversions.
    pub fn new(exchange_rate: ExchangeRate) -> Self {
        Self {
            stores: Vec::new(),
            transactions: Vec::new(),
            exchange_rate,
        }
    }

    /// Rebuilds a registry from previously persisted records, as-is.
    pub fn from_parts(
        stores: Vec<Store>,
        transactions: Vec<Transaction>,
        exchange_rate: ExchangeRate,
    ) -> Self {
        Self { stores, transactions, exchange_rate }
    }

    pub fn stores(&self) -> &[Store] {
        &self.stores
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn rate(&self) -> ExchangeRate {
        self.exchange_rate
    }

    pub fn is_empty(&self) -> bool {
        self.stores.is_empty()
    }

    /// Registers a new store.
    ///
    /// # Errors
    ///
    /// `DbError::DuplicateEmail` if another store uses the same email (compared
    /// case-insensitively), `DbError::DuplicateStoreId` if the id is taken.
    pub fn register_store(&mut self, store: Store) -> Result<&Store, DbError> {
        if self.store_by_email(&store.email).is_some() {
            return Err(DbError::DuplicateEmail(store.email));
        }
        if self.store_by_id(&store.id).is_some() {
            return Err(DbError::DuplicateStoreId(store.id));
        }

        info!(store_id = %store.id, name = %store.name, currency = %store.currency, "Store registered");
        self.stores.push(store);
        Ok(&self.stores[self.stores.len() - 1])
    }

    /// Applies `update` to the store with `store_id` and returns the new record.
    pub fn update_store(&mut self, store_id: &str, update: StoreUpdate) -> Result<Store, DbError> {
        if let Some(email) = &update.email {
            let taken = self
                .stores
                .iter()
                .any(|s| s.id != store_id && s.email.eq_ignore_ascii_case(email));
            if taken {
                return Err(DbError::DuplicateEmail(email.clone()));
            }
        }

        let store = self
            .stores
            .iter_mut()
            .find(|s| s.id == store_id)
            .ok_or_else(|| DbError::StoreNotFound(store_id.to_string()))?;

        if let Some(name) = update.name {
            store.name = name;
        }
        if let Some(email) = update.email {
            store.email = email;
        }
        if let Some(url) = update.url {
            store.url = url;
        }
        if let Some(currency) = update.currency {
            store.currency = currency;
        }

        info!(store_id, "Store updated");
        Ok(store.clone())
    }

    /// Removes a store together with all of its transactions.
    ///
    /// Returns the number of transactions that were removed.
    pub fn delete_store(&mut self, store_id: &str) -> Result<usize, DbError> {
        let before = self.stores.len();
        self.stores.retain(|s| s.id != store_id);
        if self.stores.len() == before {
            return Err(DbError::StoreNotFound(store_id.to_string()));
        }

        let tx_before = self.transactions.len();
        self.transactions.retain(|t| t.store_id != store_id);
        let removed = tx_before - self.transactions.len();

        info!(store_id, removed_transactions = removed, "Store deleted");
        Ok(removed)
    }

    /// Records a sale of `amount` (in the store's own currency) at `timestamp`.
    pub fn record_transaction(
        &mut self,
        store_id: &str,
        amount: Decimal,
        timestamp: DateTime<Utc>,
    ) -> Result<Transaction, DbError> {
        let tx = Transaction::new(store_id, amount, timestamp)?;
        self.insert_transaction(tx.clone())?;
        Ok(tx)
    }

    /// Adds an already-built transaction; its store must be registered.
    pub fn insert_transaction(&mut self, tx: Transaction) -> Result<(), DbError> {
        if self.store_by_id(&tx.store_id).is_none() {
            return Err(DbError::StoreNotFound(tx.store_id));
        }
        self.transactions.push(tx);
        Ok(())
    }

    pub fn store_by_id(&self, store_id: &str) -> Option<&Store> {
        self.stores.iter().find(|s| s.id == store_id)
    }

    pub fn store_by_email(&self, email: &str) -> Option<&Store> {
        self.stores.iter().find(|s| s.email.eq_ignore_ascii_case(email))
    }

    /// All stores, most recently registered first.
    pub fn all_stores(&self) -> Vec<&Store> {
        let mut stores: Vec<&Store> = self.stores.iter().collect();
        stores.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        stores
    }

    /// The `limit` most recent sales of one store, newest first.
    pub fn recent_transactions(&self, store_id: &str, limit: usize) -> Vec<&Transaction> {
        let mut recent: Vec<&Transaction> = self
            .transactions
            .iter()
            .filter(|t| t.store_id == store_id)
            .collect();
        recent.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        recent.truncate(limit);
        recent
    }

    pub fn set_exchange_rate(&mut self, rate: ExchangeRate) {
        info!(old = %self.exchange_rate.as_decimal(), new = %rate.as_decimal(), "Exchange rate updated");
        self.exchange_rate = rate;
    }
}

impl DataSource for Repository {
    fn list_stores(&self) -> Result<Vec<Store>, DbError> {
        Ok(self.stores.clone())
    }

    fn list_transactions(&self) -> Result<Vec<Transaction>, DbError> {
        Ok(self.transactions.clone())
    }

    fn exchange_rate(&self) -> Result<ExchangeRate, DbError> {
        Ok(self.exchange_rate)
    }
}
