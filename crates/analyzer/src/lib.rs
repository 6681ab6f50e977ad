use crate::error::AnalyzerError;
use analytics::{StatisticsEngine, StoreStats};
use chrono::{DateTime, Utc};
use configuration::{PODIUM_SIZE, Ranking, SortKey};
use core_types::{ExchangeRate, MilestoneTarget, Store, Transaction};
use database::DataSource;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tracing::{debug, info};

pub mod error;

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// A store together with its statistics and growth metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedStore {
    pub store: Store,
    pub stats: StoreStats,
    /// Days since registration, never less than one.
    pub days_active: Decimal,
    /// Reference revenue per active day.
    pub growth_rate: Decimal,
    /// Signed deviation of `growth_rate` from the population mean, in percent.
    pub growth_percent: Decimal,
}

/// One of the podium places above the table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PodiumSlot {
    /// A real store holds this place.
    Store(RankedStore),
    /// No store has crossed this milestone yet; the target itself is shown.
    Milestone(MilestoneTarget),
    /// Not enough stores to fill the place.
    Vacant,
}

impl PodiumSlot {
    pub fn as_store(&self) -> Option<&RankedStore> {
        match self {
            PodiumSlot::Store(entry) => Some(entry),
            _ => None,
        }
    }
}

/// A row below the podium.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableEntry {
    /// Display rank; the first table row is rank 4.
    pub rank: usize,
    pub entry: RankedStore,
}

/// The full leaderboard: podium places followed by the ranked table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Leaderboard {
    pub sort_key: SortKey,
    pub mean_growth_rate: Decimal,
    /// Always exactly `PODIUM_SIZE` places, first place first.
    pub podium: Vec<PodiumSlot>,
    pub table: Vec<TableEntry>,
}

impl Leaderboard {
    /// Every real store on the board, podium first.
    pub fn ranked_stores(&self) -> impl Iterator<Item = &RankedStore> {
        self.podium
            .iter()
            .filter_map(PodiumSlot::as_store)
            .chain(self.table.iter().map(|row| &row.entry))
    }
}

/// The leaderboard engine.
pub struct LeaderboardRanker {
    config: Ranking,
    engine: StatisticsEngine,
}

impl LeaderboardRanker {
    pub fn new(config: Ranking) -> Self {
        Self {
            config,
            engine: StatisticsEngine::new(),
        }
    }

    /// Snapshots `source` and ranks it by the configured sort key.
    pub fn run(
        &self,
        source: &dyn DataSource,
        as_of: DateTime<Utc>,
    ) -> Result<Leaderboard, AnalyzerError> {
        let snapshot = source.snapshot()?;
        Ok(self.rank(
            &snapshot.stores,
            &snapshot.transactions,
            snapshot.exchange_rate,
            self.config.sort_key,
            as_of,
        ))
    }

    /// Orders every store by `sort_key` and splits the result into podium and table.
    ///
    /// Growth is measured at `as_of`. Equal metrics are ordered by store id.
    pub fn rank(
        &self,
        stores: &[Store],
        transactions: &[Transaction],
        rate: ExchangeRate,
        sort_key: SortKey,
        as_of: DateTime<Utc>,
    ) -> Leaderboard {
        // 1. Statistics and revenue velocity
        let stats = self.engine.compute_all(stores, transactions, rate);
        let mut entries: Vec<RankedStore> = stores
            .iter()
            .zip(stats)
            .map(|(store, stats)| {
                let days_active = days_active(store.created_at, as_of);
                let growth_rate = stats.total_revenue_reference / days_active;
                RankedStore {
                    store: store.clone(),
                    stats,
                    days_active,
                    growth_rate,
                    growth_percent: Decimal::ZERO,
                }
            })
            .collect();

        // 2. Population mean
        let mean_growth_rate = if entries.is_empty() {
            Decimal::ZERO
        } else {
            let total: Decimal = entries.iter().map(|e| e.growth_rate).sum();
            total / Decimal::from(entries.len())
        };

        // 3. Deviation from the mean
        for entry in &mut entries {
            entry.growth_percent = growth_percent(entry.growth_rate, mean_growth_rate);
        }

        // 4. Order
        entries.sort_by(|a, b| compare_desc(a, b, |e| sort_metric(e, sort_key)));

        // 5. Podium
        let (podium, remainder) = if self.config.milestone_targets.is_empty() {
            plain_podium(entries)
        } else {
            milestone_podium(entries, &self.config.milestone_targets)
        };

        // 6. Positional table ranks
        let table: Vec<TableEntry> = remainder
            .into_iter()
            .enumerate()
            .map(|(index, entry)| TableEntry {
                rank: index + PODIUM_SIZE + 1,
                entry,
            })
            .collect();

        info!(
            sort_key = %sort_key,
            stores = stores.len(),
            podium_stores = podium.iter().filter(|s| s.as_store().is_some()).count(),
            table_rows = table.len(),
            "Leaderboard ranked"
        );

        Leaderboard {
            sort_key,
            mean_growth_rate,
            podium,
            table,
        }
    }
}

/// Fractional days between registration and `as_of`, floored at one.
fn days_active(created_at: DateTime<Utc>, as_of: DateTime<Utc>) -> Decimal {
    let elapsed = (as_of - created_at).num_milliseconds();
    let days = Decimal::from(elapsed) / Decimal::from(MILLIS_PER_DAY);
    days.max(Decimal::ONE)
}

fn growth_percent(growth_rate: Decimal, mean: Decimal) -> Decimal {
    if mean > Decimal::ZERO {
        (growth_rate - mean) / mean * Decimal::ONE_HUNDRED
    } else {
        Decimal::ZERO
    }
}

fn sort_metric(entry: &RankedStore, sort_key: SortKey) -> Decimal {
    match sort_key {
        SortKey::Revenue => entry.stats.total_revenue_reference,
        SortKey::Orders => Decimal::from(entry.stats.order_count),
        SortKey::Growth => entry.growth_rate,
    }
}

/// Highest metric first; equal metrics fall back to store id ascending.
fn compare_desc<F>(a: &RankedStore, b: &RankedStore, metric: F) -> Ordering
where
    F: Fn(&RankedStore) -> Decimal,
{
    metric(b)
        .cmp(&metric(a))
        .then_with(|| a.store.id.cmp(&b.store.id))
}

/// The first `PODIUM_SIZE` entries take the podium, in order.
fn plain_podium(mut entries: Vec<RankedStore>) -> (Vec<PodiumSlot>, Vec<RankedStore>) {
    let remainder = entries.split_off(PODIUM_SIZE.min(entries.len()));
    let mut podium: Vec<PodiumSlot> = entries.into_iter().map(PodiumSlot::Store).collect();
    podium.resize(PODIUM_SIZE, PodiumSlot::Vacant);
    (podium, remainder)
}

/// Each milestone goes to the first remaining store, in board order, whose
/// reference revenue is strictly above its threshold. The table is then
/// ordered by reference revenue whatever the board's sort key.
fn milestone_podium(
    mut pool: Vec<RankedStore>,
    targets: &[MilestoneTarget],
) -> (Vec<PodiumSlot>, Vec<RankedStore>) {
    let mut podium = Vec::with_capacity(PODIUM_SIZE);

    for target in targets.iter().take(PODIUM_SIZE) {
        let qualifier = pool
            .iter()
            .position(|e| e.stats.total_revenue_reference > target.threshold);
        match qualifier {
            Some(index) => podium.push(PodiumSlot::Store(pool.remove(index))),
            None => {
                debug!(milestone = %target.label, threshold = %target.threshold, "Milestone not reached");
                podium.push(PodiumSlot::Milestone(target.clone()));
            }
        }
    }
    podium.resize(PODIUM_SIZE, PodiumSlot::Vacant);

    pool.sort_by(|a, b| compare_desc(a, b, |e| e.stats.total_revenue_reference));
    (podium, pool)
}
