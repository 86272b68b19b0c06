use rust_decimal::{Decimal, RoundingStrategy};

/// Number of decimal places currency amounts are shown with.
pub const DISPLAY_PLACES: u32 = 2;

/// Rounds a full-precision amount for display. Stored values are never rounded.
pub fn round_for_display(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(DISPLAY_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Formats an amount with a currency symbol, e.g. `₱12.50` or `₱-10.00`.
pub fn format_amount(symbol: &str, amount: Decimal) -> String {
    format!("{symbol}{:.2}", round_for_display(amount))
}
