use crate::report::{PlatformSummary, StoreStats};
use core_types::{ExchangeRate, Store, Transaction, convert};
use rust_decimal::Decimal;
use std::collections::HashMap;
use tracing::debug;

/// Running native-currency totals for one store.
#[derive(Debug, Clone, Copy, Default)]
struct NativeTotals {
    revenue: Decimal,
    orders: usize,
}

/// A stateless calculator for deriving per-store statistics from sales activity.
#[derive(Debug, Default)]
pub struct StatisticsEngine {}

impl StatisticsEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Computes the statistics of a single store.
    ///
    /// # Arguments
    ///
    /// * `store_id` - The store to report on.
    /// * `stores` - Every registered store; needed to compute the global rank.
    /// * `transactions` - Every recorded sale, across all stores.
    /// * `rate` - The exchange rate used to normalize foreign revenue.
    ///
    /// If `store_id` is not among `stores` its revenue is left unconverted and its
    /// rank falls back to the number of stores (last place).
    pub fn compute_stats(
        &self,
        store_id: &str,
        stores: &[Store],
        transactions: &[Transaction],
        rate: ExchangeRate,
    ) -> StoreStats {
        let totals = group_by_store(transactions);
        let own = totals.get(store_id).copied().unwrap_or_default();

        let total_revenue_reference = match stores.iter().find(|s| s.id == store_id) {
            Some(store) => convert(own.revenue, store.currency, rate),
            None => {
                debug!(store_id, "Store not registered; revenue left unconverted");
                own.revenue
            }
        };

        let rank = revenue_standings(stores, &totals, rate)
            .iter()
            .position(|(id, _)| *id == store_id)
            .map(|index| index + 1)
            .unwrap_or(stores.len());

        build_stats(store_id, own, total_revenue_reference, rank)
    }

    /// Computes the statistics of every store in a single pass.
    ///
    /// Results come back in the same order as `stores` and agree with
    /// `compute_stats` for each of them.
    pub fn compute_all(
        &self,
        stores: &[Store],
        transactions: &[Transaction],
        rate: ExchangeRate,
    ) -> Vec<StoreStats> {
        let totals = group_by_store(transactions);
        let standings = revenue_standings(stores, &totals, rate);

        let mut ranks: HashMap<&str, usize> = HashMap::with_capacity(standings.len());
        for (index, (id, _)) in standings.iter().enumerate() {
            ranks.entry(*id).or_insert(index + 1);
        }

        let stats: Vec<StoreStats> = stores
            .iter()
            .map(|store| {
                let rank = ranks.get(store.id.as_str()).copied().unwrap_or(stores.len());
                match totals.get(store.id.as_str()) {
                    Some(own) => build_stats(
                        &store.id,
                        *own,
                        convert(own.revenue, store.currency, rate),
                        rank,
                    ),
                    None => StoreStats::empty(store.id.clone(), rank),
                }
            })
            .collect();

        debug!(
            stores = stores.len(),
            transactions = transactions.len(),
            "Computed statistics for all stores"
        );
        stats
    }

    /// Totals shown in the platform overview.
    ///
    /// Sales of transactions whose store is no longer registered are not counted
    /// in `total_sales_reference`.
    pub fn platform_summary(
        &self,
        stores: &[Store],
        transactions: &[Transaction],
        rate: ExchangeRate,
    ) -> PlatformSummary {
        let total_sales_reference = self
            .compute_all(stores, transactions, rate)
            .iter()
            .map(|s| s.total_revenue_reference)
            .sum();

        PlatformSummary {
            total_stores: stores.len(),
            total_transactions: transactions.len(),
            total_sales_reference,
        }
    }
}

/// Sums native revenue and order counts per store id.
fn group_by_store(transactions: &[Transaction]) -> HashMap<&str, NativeTotals> {
    let mut totals: HashMap<&str, NativeTotals> = HashMap::new();
    for tx in transactions {
        let entry = totals.entry(tx.store_id.as_str()).or_default();
        entry.revenue += tx.amount;
        entry.orders += 1;
    }
    totals
}

/// Every store's reference revenue, highest first.
///
/// The sort is stable, so stores with equal revenue keep their input order.
fn revenue_standings<'a>(
    stores: &'a [Store],
    totals: &HashMap<&str, NativeTotals>,
    rate: ExchangeRate,
) -> Vec<(&'a str, Decimal)> {
    let mut standings: Vec<(&str, Decimal)> = stores
        .iter()
        .map(|store| {
            let native = totals
                .get(store.id.as_str())
                .map(|t| t.revenue)
                .unwrap_or(Decimal::ZERO);
            (store.id.as_str(), convert(native, store.currency, rate))
        })
        .collect();
    standings.sort_by(|a, b| b.1.cmp(&a.1));
    standings
}

fn build_stats(
    store_id: &str,
    own: NativeTotals,
    total_revenue_reference: Decimal,
    rank: usize,
) -> StoreStats {
    let avg_order_value = if own.orders > 0 {
        own.revenue / Decimal::from(own.orders)
    } else {
        Decimal::ZERO
    };

    StoreStats {
        store_id: store_id.to_string(),
        total_revenue_native: own.revenue,
        total_revenue_reference,
        order_count: own.orders,
        avg_order_value,
        rank,
    }
}
