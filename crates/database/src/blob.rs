use crate::DbError;
use crate::repository::{DataSource, Repository};
use core_types::{ExchangeRate, Store, Transaction};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

const STORES_FILE: &str = "stores.json";
const TRANSACTIONS_FILE: &str = "transactions.json";
const SETTINGS_FILE: &str = "settings.json";

/// Persisted settings document.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct Settings {
    exchange_rate: ExchangeRate,
}

/// A directory of JSON documents holding the whole registry.
///
/// Each collection is one blob: `stores.json`, `transactions.json` and
/// `settings.json`. Missing documents read as empty collections and the
/// configured default rate, so a fresh directory needs no setup.
#[derive(Debug, Clone)]
pub struct BlobStore {
    dir: PathBuf,
    default_rate: ExchangeRate,
}

impl BlobStore {
    pub fn new(dir: impl Into<PathBuf>, default_rate: ExchangeRate) -> Self {
        Self {
            dir: dir.into(),
            default_rate,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Reads every document into an in-memory `Repository`.
    pub fn load(&self) -> Result<Repository, DbError> {
        let repo = Repository::from_parts(
            self.list_stores()?,
            self.list_transactions()?,
            self.exchange_rate()?,
        );
        debug!(
            dir = %self.dir.display(),
            stores = repo.stores().len(),
            transactions = repo.transactions().len(),
            "Loaded blob store"
        );
        Ok(repo)
    }

    /// Writes every document of `repo`, replacing the previous contents.
    pub fn save(&self, repo: &Repository) -> Result<(), DbError> {
        fs::create_dir_all(&self.dir).map_err(|e| DbError::io(&self.dir, e))?;
        self.write_document(STORES_FILE, repo.stores())?;
        self.write_document(TRANSACTIONS_FILE, repo.transactions())?;
        self.write_document(SETTINGS_FILE, &Settings { exchange_rate: repo.rate() })?;
        debug!(dir = %self.dir.display(), "Saved blob store");
        Ok(())
    }

    fn read_document<T: DeserializeOwned>(&self, name: &str) -> Result<Option<T>, DbError> {
        let path = self.dir.join(name);
        match fs::read(&path) {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(DbError::io(path, e)),
        }
    }

    /// Writes to a sibling temp file first so a crash never leaves half a document.
    fn write_document<T: Serialize + ?Sized>(&self, name: &str, value: &T) -> Result<(), DbError> {
        let path = self.dir.join(name);
        let tmp = self.dir.join(format!("{}.tmp", name));
        let bytes = serde_json::to_vec_pretty(value)?;
        fs::write(&tmp, bytes).map_err(|e| DbError::io(&tmp, e))?;
        fs::rename(&tmp, &path).map_err(|e| DbError::io(&path, e))?;
        Ok(())
    }
}

impl DataSource for BlobStore {
    fn list_stores(&self) -> Result<Vec<Store>, DbError> {
        Ok(self.read_document(STORES_FILE)?.unwrap_or_default())
    }

    fn list_transactions(&self) -> Result<Vec<Transaction>, DbError> {
        Ok(self.read_document(TRANSACTIONS_FILE)?.unwrap_or_default())
    }

    fn exchange_rate(&self) -> Result<ExchangeRate, DbError> {
        Ok(self
            .read_document::<Settings>(SETTINGS_FILE)?
            .map(|s| s.exchange_rate)
            .unwrap_or(self.default_rate))
    }
}
