//! Terminal rendering of the reports. Nothing here computes figures; every
//! function formats data the core crates already produced.

use analytics::{AxisScale, MonthlyBucket, PlatformSummary, StoreStats, compact_amount};
use analyzer::{Leaderboard, PodiumSlot, RankedStore};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, CellAlignment, Table};
use core_types::{Currency, Store, Transaction};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

const PODIUM_LABELS: [&str; 3] = ["1st", "2nd", "3rd"];
const BAR_WIDTH: u32 = 40;

/// Reference revenue as whole, comma-grouped points, e.g. `1,235 pts`.
pub fn format_points(value: Decimal) -> String {
    let rounded = value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    format!("{} pts", group_thousands(rounded))
}

/// Signed growth deviation with one decimal, e.g. `+12.3%` or `-4.0%`.
///
/// The sign follows the unrounded value, so a tiny negative deviation reads `-0.0%`.
pub fn format_growth(percent: Decimal) -> String {
    let rounded = percent
        .abs()
        .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero);
    let sign = if percent < Decimal::ZERO { "-" } else { "+" };
    format!("{}{:.1}%", sign, rounded)
}

/// Inserts a comma between every group of three integer digits.
fn group_thousands(whole: Decimal) -> String {
    let digits = whole.abs().trunc().normalize().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if whole < Decimal::ZERO && !whole.is_zero() {
        grouped.push('-');
    }
    for (i, digit) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    grouped
}

/// An amount in its own currency, e.g. `RD$1500.00` or `$12.50`.
pub fn format_money(amount: Decimal, currency: Currency) -> String {
    format!("{}{:.2}", currency.symbol(), amount.round_dp(2))
}

/// The store URL without its scheme or trailing slash.
pub fn display_url(url: &str) -> &str {
    let trimmed = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .unwrap_or(url);
    trimmed.trim_end_matches('/')
}

fn new_table() -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table
}

fn entry_cells(position: String, entry: &RankedStore) -> Vec<Cell> {
    vec![
        Cell::new(position),
        Cell::new(&entry.store.name),
        Cell::new(display_url(&entry.store.url)),
        Cell::new(format_points(entry.stats.total_revenue_reference))
            .set_alignment(CellAlignment::Right),
        Cell::new(entry.stats.order_count).set_alignment(CellAlignment::Right),
        Cell::new(format_growth(entry.growth_percent)).set_alignment(CellAlignment::Right),
    ]
}

const BOARD_HEADER: [&str; 6] = ["#", "Store", "Site", "Revenue", "Orders", "Growth"];

pub fn podium_table(board: &Leaderboard) -> Table {
    let mut table = new_table();
    table.set_header(BOARD_HEADER.to_vec());
    for (slot, label) in board.podium.iter().zip(PODIUM_LABELS) {
        match slot {
            PodiumSlot::Store(entry) => {
                table.add_row(entry_cells(label.to_string(), entry));
            }
            PodiumSlot::Milestone(target) => {
                table.add_row(vec![
                    Cell::new(label),
                    Cell::new(format!("{} milestone", target.label)),
                    Cell::new(""),
                    Cell::new(format!("> {}", format_points(target.threshold)))
                        .set_alignment(CellAlignment::Right),
                    Cell::new(""),
                    Cell::new(""),
                ]);
            }
            PodiumSlot::Vacant => {
                table.add_row(vec![Cell::new(label), Cell::new("-")]);
            }
        }
    }
    table
}

pub fn ranking_table(board: &Leaderboard) -> Table {
    let mut table = new_table();
    table.set_header(BOARD_HEADER.to_vec());
    for row in &board.table {
        table.add_row(entry_cells(row.rank.to_string(), &row.entry));
    }
    table
}

pub fn stats_table(store: &Store, stats: &StoreStats) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Metric", "Value"]);
    table.add_row(vec!["Store".to_string(), format!("{} ({})", store.name, store.id)]);
    table.add_row(vec!["Site".to_string(), display_url(&store.url).to_string()]);
    table.add_row(vec![
        "Revenue".to_string(),
        format_money(stats.total_revenue_native, store.currency),
    ]);
    table.add_row(vec![
        format!("Revenue ({})", Currency::REFERENCE.code()),
        format_money(stats.total_revenue_reference, Currency::REFERENCE),
    ]);
    table.add_row(vec!["Orders".to_string(), stats.order_count.to_string()]);
    table.add_row(vec![
        "Average order".to_string(),
        format_money(stats.avg_order_value, store.currency),
    ]);
    table.add_row(vec!["Rank".to_string(), format!("#{}", stats.rank)]);
    table
}

pub fn recent_sales_table(store: &Store, recent: &[&Transaction]) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Date", "Transaction", "Amount"]);
    for tx in recent {
        table.add_row(vec![
            Cell::new(tx.timestamp.format("%Y-%m-%d %H:%M")),
            Cell::new(&tx.id),
            Cell::new(format_money(tx.amount, store.currency)).set_alignment(CellAlignment::Right),
        ]);
    }
    table
}

/// One row per month with a bar scaled against the axis ceiling.
pub fn monthly_table(buckets: &[MonthlyBucket], axis: &AxisScale) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Month", "Sales", ""]);
    for bucket in buckets {
        table.add_row(vec![
            Cell::new(&bucket.label),
            Cell::new(compact_amount(bucket.total_reference)).set_alignment(CellAlignment::Right),
            Cell::new(bar(bucket.total_reference, axis.ceiling)),
        ]);
    }
    table
}

fn bar(value: Decimal, ceiling: Decimal) -> String {
    if ceiling <= Decimal::ZERO {
        return String::new();
    }
    let filled = (value / ceiling * Decimal::from(BAR_WIDTH))
        .round()
        .to_usize()
        .unwrap_or(0)
        .min(BAR_WIDTH as usize);
    "█".repeat(filled)
}

pub fn summary_table(summary: &PlatformSummary) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Stores", "Transactions", "Total sales"]);
    table.add_row(vec![
        summary.total_stores.to_string(),
        summary.total_transactions.to_string(),
        format_money(summary.total_sales_reference, Currency::REFERENCE),
    ]);
    table
}
