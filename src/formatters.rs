//! Text helpers shared by alerts and command replies.

use chrono::{DateTime, Local};
use num_format::{Locale, ToFormattedString};

pub const TIMESTAMP_FORMAT: &str = "%H:%M:%S %d.%m.%Y";

/// `1234.5` -> `1,234.50`. Rounds to cents; keeps the sign.
pub fn format_amount(value: f64) -> String {
    let cents = (value.abs() * 100.0).round() as u64;
    let sign = if value < 0.0 && cents > 0 { "-" } else { "" };
    format!(
        "{sign}{}.{:02}",
        (cents / 100).to_formatted_string(&Locale::en),
        cents % 100
    )
}

/// Prefix symbol for the common fiat quote currencies.
fn currency_symbol(currency: &str) -> Option<&'static str> {
    match currency.to_ascii_lowercase().as_str() {
        "usd" => Some("$"),
        "eur" => Some("€"),
        "gbp" => Some("£"),
        "jpy" | "cny" => Some("¥"),
        "rub" => Some("₽"),
        _ => None,
    }
}

/// `(3060.0, "usd")` -> `$3,060.00`; currencies without a symbol get the
/// code instead: `(0.5, "btc")` -> `0.50 BTC`.
pub fn format_money(value: f64, currency: &str) -> String {
    match currency_symbol(currency) {
        Some(symbol) => format!("{symbol}{}", format_amount(value)),
        None => format!("{} {}", format_amount(value), currency.to_uppercase()),
    }
}

/// `60.0` -> `+60.00`, `-12.3` -> `-12.30`
pub fn format_signed(value: f64) -> String {
    if value < 0.0 {
        format_amount(value)
    } else {
        format!("+{}", format_amount(value))
    }
}

pub fn format_timestamp(at: DateTime<Local>) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

/// `ethereum` -> `Ethereum`
pub fn display_asset(asset_id: &str) -> String {
    let mut chars = asset_id.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
