//! Conversion of store revenue into the reference currency.

use rust_decimal::Decimal;

use crate::enums::Currency;
use crate::structs::ExchangeRate;

/// Converts `amount`, expressed in `currency`, into the reference currency.
///
/// Reference-currency amounts pass through unchanged; foreign amounts are
/// multiplied by `rate`. No rounding happens here.
pub fn convert(amount: Decimal, currency: Currency, rate: ExchangeRate) -> Decimal {
    if currency.is_reference() {
        amount
    } else {
        amount * rate.as_decimal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_reference_amount_is_unchanged_for_any_rate() {
        for rate in [dec!(0.0001), dec!(1), dec!(60.50), dec!(1000000)] {
            let rate = ExchangeRate::new(rate).unwrap();
            assert_eq!(convert(dec!(1234.56), Currency::Dop, rate), dec!(1234.56));
        }
    }

    #[test]
    fn test_foreign_amount_is_multiplied() {
        let rate = ExchangeRate::new(dec!(60)).unwrap();
        assert_eq!(convert(dec!(10), Currency::Usd, rate), dec!(600));
        assert_eq!(convert(dec!(19.99), Currency::Usd, rate), dec!(1199.40));
    }
}
