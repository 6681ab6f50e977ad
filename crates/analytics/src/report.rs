use core_types::StoreId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Per-store aggregates derived from the current transactions.
///
/// Never persisted; recomputed from the raw records on every request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreStats {
    pub store_id: StoreId,
    /// Sum of all sales in the store's own currency.
    pub total_revenue_native: Decimal,
    /// The same sum converted into the reference currency.
    pub total_revenue_reference: Decimal,
    pub order_count: usize,
    /// Average sale in the store's own currency, zero without orders.
    pub avg_order_value: Decimal,
    /// 1-based position by reference revenue across all stores.
    pub rank: usize,
}

impl StoreStats {
    /// Creates a zeroed-out entry for a store with no sales yet.
    pub fn empty(store_id: impl Into<StoreId>, rank: usize) -> Self {
        Self {
            store_id: store_id.into(),
            total_revenue_native: Decimal::ZERO,
            total_revenue_reference: Decimal::ZERO,
            order_count: 0,
            avg_order_value: Decimal::ZERO,
            rank,
        }
    }
}

/// Platform-wide totals shown above the leaderboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformSummary {
    pub total_stores: usize,
    pub total_transactions: usize,
    pub total_sales_reference: Decimal,
}
