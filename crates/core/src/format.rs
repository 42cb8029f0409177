//! Display formatting for monetary amounts and percentages.
//!
//! Both formatters are total: missing or non-numeric input renders as a
//! fixed zero string instead of failing.

/// Rendered for missing, NaN or infinite amounts.
pub const ZERO_CURRENCY: &str = "$0.00";

/// Rendered for missing or NaN percentages.
pub const ZERO_PERCENTAGE: &str = "0.00%";

/// Format an amount as US dollars with thousands separators: `"$1,234.50"`.
///
/// Negative amounts render as `"-$1,234.50"`.
pub fn format_currency(amount: Option<f64>) -> String {
    let amount = match amount {
        Some(a) if a.is_finite() => a,
        _ => return ZERO_CURRENCY.to_string(),
    };

    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = group_thousands(cents / 100);
    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    format!("{sign}${whole}.{:02}", cents % 100)
}

/// Format a percentage with two decimals and an explicit sign for
/// non-negative values: `"+3.00%"`, `"-2.50%"`.
pub fn format_percentage(value: Option<f64>) -> String {
    let value = match value {
        Some(v) if !v.is_nan() => v,
        _ => return ZERO_PERCENTAGE.to_string(),
    };

    if value >= 0.0 {
        // -0.0 compares equal to 0.0; add 0.0 to drop the sign bit before formatting.
        format!("+{:.2}%", value + 0.0)
    } else {
        format!("{value:.2}%")
    }
}

fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
