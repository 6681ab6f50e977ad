use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::enums::Currency;
use crate::error::CoreError;

/// Externally assigned store identifier (e.g. "1001").
pub type StoreId = String;

/// A registered storefront.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Store {
    pub id: StoreId,
    pub name: String,
    pub email: String,
    pub url: String,
    pub currency: Currency,
    pub created_at: DateTime<Utc>,
}

impl Store {
    pub fn new(
        id: impl Into<StoreId>,
        name: impl Into<String>,
        email: impl Into<String>,
        url: impl Into<String>,
        currency: Currency,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: email.into(),
            url: url.into(),
            currency,
            created_at,
        }
    }
}

/// A single completed sale, recorded in the owning store's currency.
///
/// # Invariants
/// - `0 <= amount <= Transaction::MAX_AMOUNT`, also when read back from JSON
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TransactionRecord")]
pub struct Transaction {
    pub id: String,
    pub store_id: StoreId,
    pub amount: Decimal,
    pub timestamp: DateTime<Utc>,
}

/// Unvalidated wire form of a `Transaction`.
#[derive(Deserialize)]
struct TransactionRecord {
    id: String,
    store_id: StoreId,
    amount: Decimal,
    timestamp: DateTime<Utc>,
}

impl TryFrom<TransactionRecord> for Transaction {
    type Error = CoreError;

    fn try_from(record: TransactionRecord) -> Result<Self, Self::Error> {
        Self::with_id(record.id, record.store_id, record.amount, record.timestamp)
    }
}

impl Transaction {
    /// Largest single sale accepted, in the store's own currency.
    pub const MAX_AMOUNT: Decimal = dec!(1000000000000);

    /// Creates a transaction with a freshly generated identifier.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::NegativeAmount` if `amount` is below zero and
    /// `CoreError::AmountTooLarge` if it is above `MAX_AMOUNT`.
    pub fn new(
        store_id: impl Into<StoreId>,
        amount: Decimal,
        timestamp: DateTime<Utc>,
    ) -> Result<Self, CoreError> {
        Self::with_id(format!("tx_{}", Uuid::new_v4().simple()), store_id, amount, timestamp)
    }

    /// Creates a transaction with a caller-supplied identifier.
    pub fn with_id(
        id: impl Into<String>,
        store_id: impl Into<StoreId>,
        amount: Decimal,
        timestamp: DateTime<Utc>,
    ) -> Result<Self, CoreError> {
        if amount < Decimal::ZERO {
            return Err(CoreError::NegativeAmount(amount));
        }
        if amount > Self::MAX_AMOUNT {
            return Err(CoreError::AmountTooLarge(amount));
        }
        Ok(Self {
            id: id.into(),
            store_id: store_id.into(),
            amount,
            timestamp,
        })
    }
}

/// Reference-currency units obtained for one unit of foreign currency.
///
/// # Invariants
/// - Must be > 0 and <= `ExchangeRate::MAX`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct ExchangeRate(Decimal);

impl ExchangeRate {
    pub const DEFAULT: Decimal = dec!(60.50);
    pub const MAX: Decimal = dec!(1000000);

    /// # Errors
    ///
    /// Returns `CoreError::InvalidExchangeRate` if `value <= 0` or `value > MAX`.
    pub fn new(value: Decimal) -> Result<Self, CoreError> {
        if value <= Decimal::ZERO || value > Self::MAX {
            return Err(CoreError::InvalidExchangeRate(value));
        }
        Ok(Self(value))
    }

    pub fn as_decimal(&self) -> Decimal {
        self.0
    }
}

impl Default for ExchangeRate {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

impl TryFrom<Decimal> for ExchangeRate {
    type Error = CoreError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ExchangeRate> for Decimal {
    fn from(rate: ExchangeRate) -> Self {
        rate.0
    }
}

/// A revenue threshold (reference currency) that gates a podium slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MilestoneTarget {
    pub label: String,
    pub threshold: Decimal,
}

impl MilestoneTarget {
    pub fn new(label: impl Into<String>, threshold: Decimal) -> Self {
        Self { label: label.into(), threshold }
    }
}

/// A consistent, owned view of everything the statistics and ranking
/// computations read. Take one per rendering pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreSnapshot {
    pub stores: Vec<Store>,
    pub transactions: Vec<Transaction>,
    pub exchange_rate: ExchangeRate,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_exchange_rate_rejects_non_positive() {
        assert_eq!(
            ExchangeRate::new(Decimal::ZERO),
            Err(CoreError::InvalidExchangeRate(Decimal::ZERO))
        );
        assert!(ExchangeRate::new(dec!(-1)).is_err());
        assert_eq!(ExchangeRate::new(dec!(58.25)).unwrap().as_decimal(), dec!(58.25));
    }

    #[test]
    fn test_exchange_rate_deserialization_is_validated() {
        let ok: ExchangeRate = serde_json::from_str("\"61.10\"").unwrap();
        assert_eq!(ok.as_decimal(), dec!(61.10));

        let bad: Result<ExchangeRate, _> = serde_json::from_str("\"0\"");
        assert!(bad.is_err());
    }

    #[test]
    fn test_transaction_rejects_negative_amount() {
        let ts = Utc.with_ymd_and_hms(2026, 1, 5, 12, 0, 0).unwrap();
        assert!(Transaction::new("1001", dec!(-0.01), ts).is_err());

        let zero = Transaction::new("1001", Decimal::ZERO, ts).unwrap();
        assert_eq!(zero.amount, Decimal::ZERO);
        assert!(zero.id.starts_with("tx_"));
    }

    #[test]
    fn test_exchange_rate_has_an_upper_bound() {
        assert_eq!(ExchangeRate::new(ExchangeRate::MAX).unwrap().as_decimal(), dec!(1000000));
        assert_eq!(
            ExchangeRate::new(dec!(1000000.01)),
            Err(CoreError::InvalidExchangeRate(dec!(1000000.01)))
        );
    }

    #[test]
    fn test_transaction_rejects_oversized_amount() {
        let ts = Utc.with_ymd_and_hms(2026, 1, 5, 12, 0, 0).unwrap();
        let huge = dec!(10000000000000000000000000000);

        assert_eq!(
            Transaction::with_id("tx_1", "1003", huge, ts),
            Err(CoreError::AmountTooLarge(huge))
        );
        let largest = Transaction::with_id("tx_2", "1003", Transaction::MAX_AMOUNT, ts).unwrap();
        assert_eq!(largest.amount, dec!(1000000000000));
    }

    #[test]
    fn test_transaction_deserialization_is_validated() {
        let ts = Utc.with_ymd_and_hms(2026, 1, 5, 12, 0, 0).unwrap();
        let tx = Transaction::with_id("tx_1", "1001", dec!(250.75), ts).unwrap();
        let json = serde_json::to_string(&tx).unwrap();
        let back: Transaction = serde_json::from_str(&json).unwrap();
        assert_eq!(back, tx);

        let oversized = json.replace("250.75", "10000000000000000000000000000");
        assert!(serde_json::from_str::<Transaction>(&oversized).is_err());

        let negative = json.replace("250.75", "-1");
        assert!(serde_json::from_str::<Transaction>(&negative).is_err());
    }

    #[test]
    fn test_store_serializes_currency_code() {
        let created = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let store = Store::new(
            "1003",
            "USA Gadgets",
            "demo@usagadgets.com",
            "https://usagadgets.com",
            Currency::Usd,
            created,
        );
        let json = serde_json::to_string(&store).unwrap();
        assert!(json.contains("\"currency\":\"USD\""));

        let back: Store = serde_json::from_str(&json).unwrap();
        assert_eq!(back, store);
    }
}
