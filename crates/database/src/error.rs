use core_types::CoreError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("An error occurred during JSON serialization/deserialization: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("A store with id '{0}' already exists.")]
    DuplicateStoreId(String),

    #[error("A store with email '{0}' already exists.")]
    DuplicateEmail(String),

    #[error("Store '{0}' was not found.")]
    StoreNotFound(String),

    #[error("Invalid record: {0}")]
    Invalid(#[from] CoreError),
}

impl DbError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }
}
