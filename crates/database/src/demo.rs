//! Seedable synthetic data for demos and manual testing.

use crate::DbError;
use crate::repository::Repository;
use chrono::{DateTime, Duration, Utc};
use core_types::{Currency, Store, Transaction};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;
use tracing::info;

const DEMO_STORES: [(&str, &str, &str, &str, Currency); 5] = [
    ("1001", "ElectroMundo", "demo@electromundo.com", "https://electromundo.com", Currency::Dop),
    ("1002", "Moda Caribeña", "demo@modacaribe.com", "https://modacaribe.com", Currency::Dop),
    ("1003", "USA Gadgets", "demo@usagadgets.com", "https://usagadgets.com", Currency::Usd),
    ("1004", "Deportes Total", "demo@deportestotal.com", "https://deportestotal.com", Currency::Dop),
    ("1005", "Belleza Tropical", "demo@bellezatropical.com", "https://bellezatropical.com", Currency::Usd),
];

const HISTORY_DAYS: i64 = 30;

/// Fills an empty registry with five demo stores and their sales history.
///
/// Store `i` registers `30 - 5 * i` days before `now`. Each store gets between
/// 20 and 69 sales spread over the last 30 days; dollar sales are 20 to 170
/// USD, peso sales 1,000 to 9,000 DOP. The same `seed` always produces the same
/// data. A registry that already has stores is left untouched.
///
/// Returns the number of transactions created.
pub fn seed_demo_data(repo: &mut Repository, seed: u64, now: DateTime<Utc>) -> Result<usize, DbError> {
    if !repo.is_empty() {
        info!("Registry already has stores; skipping demo data");
        return Ok(0);
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut created = 0usize;

    for (i, (id, name, email, url, currency)) in DEMO_STORES.iter().enumerate() {
        let registered_at = now - Duration::days(HISTORY_DAYS - 5 * i as i64);
        repo.register_store(Store::new(*id, *name, *email, *url, *currency, registered_at))?;

        let count = rng.gen_range(20..70);
        for n in 0..count {
            let cents: i64 = match currency {
                Currency::Usd => rng.gen_range(2_000..17_000),
                Currency::Dop => rng.gen_range(100_000..900_000),
            };
            let offset_ms = rng.gen_range(0..HISTORY_DAYS * 24 * 60 * 60 * 1000);
            let tx = Transaction::with_id(
                format!("tx_{}_{}", id, n),
                *id,
                Decimal::new(cents, 2),
                now - Duration::milliseconds(offset_ms),
            )?;
            repo.insert_transaction(tx)?;
            created += 1;
        }
    }

    info!(seed, stores = DEMO_STORES.len(), transactions = created, "Seeded demo data");
    Ok(created)
}
