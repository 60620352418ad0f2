//! Monetary rounding and formatting
//!
//! `round` is the single rounding authority of the engine: every value that
//! leaves a calculation passes through it, no component rounds on its own.

use rust_decimal::{Decimal, RoundingStrategy};

/// Round a monetary value to the nearest cent, half away from zero.
///
/// Exact values pass through unchanged: `round(266.75) == 266.75`, while
/// `round(240.075) == 240.08`.
pub fn round(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Format a monetary value using Brazilian locale conventions:
/// thousands separator `.`, decimal separator `,`, "R$ " prefix.
pub fn format_currency(value: Decimal) -> String {
    let is_negative = value < Decimal::ZERO;
    let formatted = format!("{:.2}", value.abs());
    let mut parts = formatted.split('.');
    let integer_part = parts.next().unwrap_or("0");
    let decimal_part = parts.next().unwrap_or("00");

    let with_separators: String = integer_part
        .chars()
        .rev()
        .enumerate()
        .flat_map(|(i, c)| {
            if i > 0 && i % 3 == 0 {
                vec!['.', c]
            } else {
                vec![c]
            }
        })
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();

    let sign = if is_negative { "-" } else { "" };
    format!("R$ {}{},{}", sign, with_separators, decimal_part)
}
