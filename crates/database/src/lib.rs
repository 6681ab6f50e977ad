//! # Leaderboard Database Crate
//!
//! This crate is the persistence collaborator of the leaderboard: the place
//! stores and their sales are registered, kept and read back from.
//!
//! ## Architectural Principles
//!
//! - **Adapter:** This crate encapsulates all storage details. The statistics and
//!   ranking crates only see the `DataSource` trait and plain records.
//! - **Blob documents:** The registry is persisted as a handful of JSON documents
//!   in a directory, one per collection, read and written whole.
//!
//! ## Public API
//!
//! - `DataSource`: read-only access (`list_stores`, `list_transactions`, `exchange_rate`).
//! - `Repository`: the in-memory registry with registration, update, cascade delete
//!   and purchase recording.
//! - `BlobStore`: loads and saves a `Repository` from a data directory.
//! - `seed_demo_data`: deterministic demo stores and sales.
//! - `DbError`: The specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod blob;
pub mod demo;
pub mod error;
pub mod repository;

// Re-export the key components to create a clean, public-facing API.
pub use blob::BlobStore;
pub use demo::seed_demo_data;
pub use error::DbError;
pub use repository::{DataSource, RECENT_ACTIVITY_LIMIT, Repository, StoreUpdate};
