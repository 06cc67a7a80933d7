//! Minor-unit amount conversion.
//!
//! The payment-intent backend expects integer amounts in the currency's
//! minor unit (cents for two-decimal currencies). Cart totals are kept
//! as [`Decimal`] so that the conversion is exact; a binary float total
//! of `12.345` would multiply to `1234.4999…` and round the wrong way.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::Error;

/// Default minor-unit factor, assuming a two-decimal currency.
///
/// Not generalized to zero- or three-decimal currencies.
pub const MINOR_UNIT_FACTOR: u32 = 100;

/// Convert a cart grand total to integer minor units.
///
/// A missing total normalizes to zero. Rounding is half-up
/// (`MidpointAwayFromZero`): `12.345` with factor 100 becomes `1235`.
pub fn minor_units(total: Option<Decimal>, factor: u32) -> Result<i64, Error> {
    let total = total.unwrap_or(Decimal::ZERO);

    let scaled = total
        .checked_mul(Decimal::from(factor))
        .ok_or(Error::AmountOverflow)?;

    scaled
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or(Error::AmountOverflow)
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn rounds_half_up_on_third_decimal() {
        assert_eq!(minor_units(Some(dec!(12.345)), 100).unwrap(), 1235);
    }

    #[test]
    fn missing_total_is_zero() {
        assert_eq!(minor_units(None, 100).unwrap(), 0);
    }

    #[test]
    fn exact_two_decimal_totals_pass_through() {
        assert_eq!(minor_units(Some(dec!(19.99)), 100).unwrap(), 1999);
        assert_eq!(minor_units(Some(dec!(0.01)), 100).unwrap(), 1);
        assert_eq!(minor_units(Some(dec!(100)), 100).unwrap(), 10000);
    }

    #[test]
    fn overflow_is_an_error() {
        assert_eq!(
            minor_units(Some(Decimal::MAX), 100).unwrap_err(),
            Error::AmountOverflow
        );
    }
}
