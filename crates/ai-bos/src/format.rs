//! Display formatting for amounts, timestamps, and percentages.
//!
//! Amounts follow the en-IN convention used by the calculation service: a
//! rupee sign, two decimals, and lakh/crore digit grouping (`₹1,23,456.00`).

use chrono::{DateTime, NaiveDateTime};

const CURRENCY_SYMBOL: &str = "₹";

/// Formats an amount as Indian rupees, e.g. `625.0` -> `₹625.00`.
pub fn format_currency(amount: f64) -> String {
    let amount = if amount.is_finite() { amount } else { 0.0 };
    let fixed = format!("{:.2}", amount.abs());
    let (whole, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let sign = if amount < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!(
        "{sign}{CURRENCY_SYMBOL}{}.{fraction}",
        group_indian_digits(whole)
    )
}

/// Lakh grouping: the last three digits, then pairs.
fn group_indian_digits(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }

    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(2);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();

    format!("{},{tail}", groups.join(","))
}

/// Renders an ISO-8601 timestamp as `18/10/2026, 2:30:00 pm`.
///
/// Timestamps carrying an offset are shown in that offset; naive timestamps
/// are shown as-is. Unparseable input is returned unchanged.
pub fn format_timestamp(raw: &str) -> String {
    let trimmed = raw.trim();
    let naive = DateTime::parse_from_rfc3339(trimmed)
        .map(|value| value.naive_local())
        .or_else(|_| NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f"));

    match naive {
        Ok(value) => value.format("%d/%m/%Y, %-I:%M:%S %P").to_string(),
        Err(_) => trimmed.to_string(),
    }
}

pub fn format_delay(minutes: u32) -> String {
    if minutes == 1 {
        "1 minute".to_string()
    } else {
        format!("{minutes} minutes")
    }
}

/// Confidence scores arrive in `[0, 1]`; out-of-range values are clamped.
pub fn format_confidence(score: f64) -> String {
    format!("{}%", confidence_percent(score))
}

pub fn confidence_percent(score: f64) -> u8 {
    if !score.is_finite() {
        return 0;
    }
    (score.clamp(0.0, 1.0) * 100.0).round() as u8
}
