//! # Leaderboard Analytics Engine
//!
//! This crate turns raw stores and transactions into the numbers the
//! leaderboard displays.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** This is a pure logic crate. It has no knowledge of external systems.
//!   It depends only on `core-types` (Layer 0).
//! - **Stateless Calculation:** The `StatisticsEngine` is a stateless calculator. It takes
//!   the current records as input and produces `StoreStats` as output. Nothing is cached,
//!   so repeated calls with the same input give identical results.
//!
//! ## Public API
//!
//! - `StatisticsEngine`: per-store revenue, order count, average order value and rank.
//! - `monthly_revenue` / `AxisScale`: trailing calendar-month revenue and its chart axis.
//! - `AnalyticsError`: The specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod engine;
pub mod error;
pub mod report;
pub mod timeseries;

// Re-export the key components to create a clean, public-facing API.
pub use engine::StatisticsEngine;
pub use error::AnalyticsError;
pub use report::{PlatformSummary, StoreStats};
pub use timeseries::{AxisScale, DEFAULT_WINDOW_MONTHS, MonthlyBucket, compact_amount, monthly_revenue};
