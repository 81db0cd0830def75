use rust_decimal::{Decimal, RoundingStrategy};

use crate::constants::{AMOUNT_PRECISION, BPS_DENOMINATOR, DISPLAY_DECIMAL_PRECISION};
use crate::errors::{Error, ValidationError};

/// Validation error for an amount that no longer fits a `Decimal`.
pub fn amount_out_of_range(what: &str) -> Error {
    Error::Validation(ValidationError::AmountOutOfRange(what.to_string()))
}

/// Rounds half away from zero to `dp` fractional digits.
pub fn round_half_away(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}

/// Rounds an amount (cost, fee, cash-out) to 4 places.
pub fn round_amount(value: Decimal) -> Decimal {
    round_half_away(value, AMOUNT_PRECISION)
}

/// Rounds a valued or displayed amount to 2 places.
pub fn round_display(value: Decimal) -> Decimal {
    round_half_away(value, DISPLAY_DECIMAL_PRECISION)
}

/// Applies a basis-point rate to `amount`, rounded to 4 places.
/// A zero rate yields exactly zero. `None` when the product overflows.
pub fn apply_bps(amount: Decimal, bps: Decimal) -> Option<Decimal> {
    if bps.is_zero() {
        return Some(Decimal::ZERO);
    }
    amount
        .checked_mul(bps)?
        .checked_div(Decimal::from(BPS_DENOMINATOR))
        .map(round_amount)
}

/// `round2(shares * price)`, or `None` when the product overflows.
pub fn position_value(shares: Decimal, price: Decimal) -> Option<Decimal> {
    shares.checked_mul(price).map(round_display)
}

/// Divides, returning zero when the divisor is zero and `None` on overflow.
pub fn div_or_zero(numerator: Decimal, divisor: Decimal) -> Option<Decimal> {
    if divisor.is_zero() {
        Some(Decimal::ZERO)
    } else {
        numerator.checked_div(divisor)
    }
}
