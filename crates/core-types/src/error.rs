use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("Invalid input for {0}: {1}")]
    InvalidInput(String, String),

    #[error("Exchange rate must be positive and at most 1000000, got {0}")]
    InvalidExchangeRate(Decimal),

    #[error("Transaction amount must not be negative, got {0}")]
    NegativeAmount(Decimal),

    #[error("Transaction amount must not exceed 1000000000000, got {0}")]
    AmountTooLarge(Decimal),
}
