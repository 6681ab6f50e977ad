//! # Leaderboard Core Types
//!
//! Layer 0 of the workspace: the plain data records every other crate reads
//! (stores, transactions, the exchange rate, milestone targets) and the single
//! currency conversion rule they all share.

pub mod currency;
pub mod enums;
pub mod error;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use currency::convert;
pub use enums::Currency;
pub use error::CoreError;
pub use structs::{ExchangeRate, MilestoneTarget, Store, StoreId, StoreSnapshot, Transaction};
