//! Calendar-month revenue buckets and the chart axis derived from them.

use crate::error::AnalyticsError;
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use core_types::{Currency, ExchangeRate, Store, Transaction, convert};
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// Default trailing window, in calendar months.
pub const DEFAULT_WINDOW_MONTHS: u32 = 12;

/// Reference-currency revenue booked in one calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyBucket {
    pub year: i32,
    /// 1-based month number.
    pub month: u32,
    /// Short display label, e.g. `Oct 2026`.
    pub label: String,
    pub total_reference: Decimal,
}

/// Sums converted revenue into the `window_months` calendar months ending with
/// the month that contains `as_of`, oldest first.
///
/// Every month of the window is present even when nothing was sold in it.
/// Transactions outside the window, or belonging to a store that is not in
/// `stores`, are ignored.
///
/// # Errors
///
/// Returns `AnalyticsError::InvalidWindow` if `window_months` is zero.
pub fn monthly_revenue(
    transactions: &[Transaction],
    stores: &[Store],
    rate: ExchangeRate,
    window_months: u32,
    as_of: DateTime<Utc>,
) -> Result<Vec<MonthlyBucket>, AnalyticsError> {
    if window_months == 0 {
        return Err(AnalyticsError::InvalidWindow(window_months));
    }

    let newest = month_index(as_of.year(), as_of.month());
    let oldest = newest - i64::from(window_months) + 1;

    let mut buckets = (oldest..=newest)
        .map(|index| -> Result<MonthlyBucket, AnalyticsError> {
            let (year, month) = from_month_index(index);
            let label = NaiveDate::from_ymd_opt(year, month, 1)
                .ok_or_else(|| {
                    AnalyticsError::InternalError(format!("invalid calendar month {}-{}", year, month))
                })?
                .format("%b %Y")
                .to_string();
            Ok(MonthlyBucket { year, month, label, total_reference: Decimal::ZERO })
        })
        .collect::<Result<Vec<_>, AnalyticsError>>()?;

    let currencies: HashMap<&str, Currency> =
        stores.iter().map(|s| (s.id.as_str(), s.currency)).collect();

    let mut orphaned = 0usize;
    for tx in transactions {
        let Some(currency) = currencies.get(tx.store_id.as_str()) else {
            orphaned += 1;
            continue;
        };
        let index = month_index(tx.timestamp.year(), tx.timestamp.month());
        if index < oldest || index > newest {
            continue;
        }
        // `index - oldest` is within 0..window_months here.
        let bucket = &mut buckets[(index - oldest) as usize];
        bucket.total_reference += convert(tx.amount, *currency, rate);
    }

    if orphaned > 0 {
        debug!(orphaned, "Skipped transactions without a registered store");
    }
    Ok(buckets)
}

fn month_index(year: i32, month: u32) -> i64 {
    i64::from(year) * 12 + i64::from(month) - 1
}

fn from_month_index(index: i64) -> (i32, u32) {
    (index.div_euclid(12) as i32, index.rem_euclid(12) as u32 + 1)
}

/// The vertical axis of the monthly revenue chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisScale {
    pub max_sale: Decimal,
    pub ceiling: Decimal,
    /// Evenly spaced values from zero to `ceiling`, inclusive.
    pub ticks: Vec<Decimal>,
}

impl AxisScale {
    pub const TICK_COUNT: usize = 5;
    pub const DEFAULT_FLOOR: Decimal = dec!(1000);

    /// Derives a "nice" axis for `buckets`: the largest bucket rounded up to a
    /// multiple of five, but never below `floor`.
    pub fn for_buckets(buckets: &[MonthlyBucket], floor: Decimal) -> Self {
        let max_sale = buckets
            .iter()
            .map(|b| b.total_reference)
            .max()
            .unwrap_or(Decimal::ZERO);

        let rounded = (max_sale / dec!(5)).ceil() * dec!(5);
        let ceiling = rounded.max(floor);

        let steps = Decimal::from(Self::TICK_COUNT - 1);
        let ticks = (0..Self::TICK_COUNT)
            .map(|i| ceiling / steps * Decimal::from(i))
            .collect();

        Self { max_sale, ceiling, ticks }
    }

    /// The ticks in compact display form, lowest first.
    pub fn tick_labels(&self) -> Vec<String> {
        self.ticks.iter().map(|t| compact_amount(*t)).collect()
    }
}

/// Formats an amount compactly: `1.5k`, `2M`, `750`.
///
/// The suffix is chosen after rounding, so `999.6` is `1k` and `999,960` is `1M`.
pub fn compact_amount(value: Decimal) -> String {
    const THOUSAND: Decimal = dec!(1000);
    const MILLION: Decimal = dec!(1000000);

    let whole = value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    if whole.abs() < THOUSAND {
        return whole.normalize().to_string();
    }
    let thousands = one_decimal(value / THOUSAND);
    if thousands.abs() < THOUSAND {
        return format!("{}k", thousands);
    }
    format!("{}M", one_decimal(value / MILLION))
}

fn one_decimal(value: Decimal) -> Decimal {
    value
        .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
        .normalize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn as_of() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, 15, 30, 0).unwrap()
    }

    fn stores() -> Vec<Store> {
        let created = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        vec![
            Store::new("1001", "ElectroMundo", "a@x.com", "https://a.com", Currency::Dop, created),
            Store::new("1003", "USA Gadgets", "b@x.com", "https://b.com", Currency::Usd, created),
        ]
    }

    fn tx(id: &str, store_id: &str, amount: Decimal, at: DateTime<Utc>) -> Transaction {
        Transaction::with_id(id, store_id, amount, at).unwrap()
    }

    fn rate() -> ExchangeRate {
        ExchangeRate::new(dec!(60)).unwrap()
    }

    #[test]
    fn test_window_has_every_month_oldest_first() {
        let buckets = monthly_revenue(&[], &stores(), rate(), 12, as_of()).unwrap();

        assert_eq!(buckets.len(), 12);
        assert_eq!((buckets[0].year, buckets[0].month), (2025, 11));
        assert_eq!(buckets[0].label, "Nov 2025");
        assert_eq!((buckets[2].year, buckets[2].month), (2026, 1));
        assert_eq!(buckets[11].label, "Oct 2026");
        assert!(buckets.iter().all(|b| b.total_reference.is_zero()));
    }

    #[test]
    fn test_oldest_boundary_is_inclusive() {
        let boundary = Utc.with_ymd_and_hms(2025, 11, 1, 0, 0, 0).unwrap();
        let transactions = vec![
            tx("in", "1001", dec!(700), boundary),
            tx("out", "1001", dec!(900), boundary - Duration::days(1)),
        ];

        let buckets = monthly_revenue(&transactions, &stores(), rate(), 12, as_of()).unwrap();

        assert_eq!(buckets[0].total_reference, dec!(700));
        let total: Decimal = buckets.iter().map(|b| b.total_reference).sum();
        assert_eq!(total, dec!(700));
    }

    #[test]
    fn test_bucket_sum_matches_converted_revenue() {
        let transactions = vec![
            tx("t1", "1001", dec!(1500), Utc.with_ymd_and_hms(2026, 3, 10, 9, 0, 0).unwrap()),
            tx("t2", "1003", dec!(25), Utc.with_ymd_and_hms(2026, 3, 31, 23, 59, 59).unwrap()),
            tx("t3", "1003", dec!(10), Utc.with_ymd_and_hms(2026, 10, 2, 8, 0, 0).unwrap()),
        ];

        let buckets = monthly_revenue(&transactions, &stores(), rate(), 12, as_of()).unwrap();

        let march = buckets.iter().find(|b| b.year == 2026 && b.month == 3).unwrap();
        assert_eq!(march.total_reference, dec!(3000));
        assert_eq!(buckets[11].total_reference, dec!(600));

        let total: Decimal = buckets.iter().map(|b| b.total_reference).sum();
        assert_eq!(total, dec!(3600));
    }

    #[test]
    fn test_orphaned_and_future_transactions_are_ignored() {
        let transactions = vec![
            tx("ghost", "9999", dec!(500), Utc.with_ymd_and_hms(2026, 9, 1, 0, 0, 0).unwrap()),
            tx("future", "1001", dec!(500), Utc.with_ymd_and_hms(2026, 11, 1, 0, 0, 0).unwrap()),
        ];

        let buckets = monthly_revenue(&transactions, &stores(), rate(), 12, as_of()).unwrap();
        assert!(buckets.iter().all(|b| b.total_reference.is_zero()));
    }

    #[test]
    fn test_window_crossing_year_boundary() {
        let jan = Utc.with_ymd_and_hms(2027, 1, 5, 0, 0, 0).unwrap();
        let buckets = monthly_revenue(&[], &stores(), rate(), 3, jan).unwrap();

        let months: Vec<(i32, u32)> = buckets.iter().map(|b| (b.year, b.month)).collect();
        assert_eq!(months, vec![(2026, 11), (2026, 12), (2027, 1)]);
    }

    #[test]
    fn test_zero_window_is_rejected() {
        let result = monthly_revenue(&[], &stores(), rate(), 0, as_of());
        assert_eq!(result, Err(AnalyticsError::InvalidWindow(0)));
    }

    #[test]
    fn test_axis_uses_floor_for_small_sales() {
        let buckets = monthly_revenue(&[], &stores(), rate(), 2, as_of()).unwrap();
        let axis = AxisScale::for_buckets(&buckets, AxisScale::DEFAULT_FLOOR);

        assert_eq!(axis.max_sale, Decimal::ZERO);
        assert_eq!(axis.ceiling, dec!(1000));
        assert_eq!(axis.ticks, vec![dec!(0), dec!(250), dec!(500), dec!(750), dec!(1000)]);
        assert_eq!(axis.tick_labels(), vec!["0", "250", "500", "750", "1k"]);
    }

    #[test]
    fn test_axis_rounds_up_to_multiple_of_five() {
        let transactions = vec![tx(
            "t1",
            "1003",
            dec!(20000.02),
            Utc.with_ymd_and_hms(2026, 10, 1, 0, 0, 0).unwrap(),
        )];
        let buckets = monthly_revenue(&transactions, &stores(), rate(), 12, as_of()).unwrap();
        let axis = AxisScale::for_buckets(&buckets, AxisScale::DEFAULT_FLOOR);

        assert_eq!(axis.max_sale, dec!(1200001.2));
        assert_eq!(axis.ceiling, dec!(1200005));
        assert_eq!(axis.ticks.len(), AxisScale::TICK_COUNT);
        assert_eq!(axis.ticks[4], dec!(1200005));
        assert_eq!(axis.tick_labels()[2], "600k");
    }

    #[test]
    fn test_compact_amount() {
        assert_eq!(compact_amount(dec!(0)), "0");
        assert_eq!(compact_amount(dec!(999.4)), "999");
        assert_eq!(compact_amount(dec!(999.5)), "1k");
        assert_eq!(compact_amount(dec!(999.6)), "1k");
        assert_eq!(compact_amount(dec!(999949)), "999.9k");
        assert_eq!(compact_amount(dec!(1500)), "1.5k");
        assert_eq!(compact_amount(dec!(2000)), "2k");
        assert_eq!(compact_amount(dec!(12345)), "12.3k");
        assert_eq!(compact_amount(dec!(999960)), "1M");
        assert_eq!(compact_amount(dec!(1250000)), "1.3M");
        assert_eq!(compact_amount(dec!(10000000)), "10M");
    }
}
