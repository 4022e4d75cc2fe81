//! Amount formatting helpers shared by the stats and reward summaries.

use num::{BigUint, Zero};

/// Render a raw base-unit `amount` as a decimal string with at most
/// `max_fraction_digits` digits after the point.
///
/// Extra digits are truncated (never rounded up) and trailing zeros are
/// dropped, so `1_500_000_000` with 9 decimals reads `1.5`.
pub fn format_amount_as_decimal(decimals: u8, amount: &BigUint, max_fraction_digits: u8) -> String {
    let scale = BigUint::from(10u32).pow(u32::from(decimals));
    let whole = amount / &scale;
    let fraction = amount % &scale;

    let mut out = with_thousands_separators(&whole.to_string());

    let digits = usize::from(max_fraction_digits.min(decimals));
    if digits > 0 && !fraction.is_zero() {
        let padded = format!("{:0>width$}", fraction.to_string(), width = usize::from(decimals));
        let shown = padded[..digits].trim_end_matches('0');
        if !shown.is_empty() {
            out.push('.');
            out.push_str(shown);
        }
    }
    out
}

/// Group the digits of an unsigned integer string in threes: `1234567` → `1,234,567`.
pub fn with_thousands_separators(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
