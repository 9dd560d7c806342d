use rust_decimal::{Decimal, RoundingStrategy};

/// Decimal places shown in report output
pub const DISPLAY_SCALE: u32 = 2;

/// Round a value for presentation
///
/// Accumulation always happens at full precision; this is applied only when
/// building response DTOs or export rows.
pub fn round_for_display(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DISPLAY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Render a value with exactly two decimal places
pub fn display_amount(value: Decimal) -> String {
    let mut rounded = round_for_display(value);
    rounded.rescale(DISPLAY_SCALE);
    rounded.to_string()
}
