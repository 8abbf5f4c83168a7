//! Display helpers for user records.
//!
//! Every function here is pure. Outputs are fixed formats that golden tests
//! compare byte for byte, so do not localise them.

use chrono::{DateTime, Local, TimeZone, Utc};

use crate::model::{Address, User};

/// `DD.MM.YYYY` in the local time zone; `None` if `iso` is not RFC 3339.
#[must_use]
pub fn format_date(iso: &str) -> Option<String> {
    let timestamp = DateTime::parse_from_rfc3339(iso).ok()?;
    Some(format_date_in(&timestamp.with_timezone(&Utc), &Local))
}

/// `DD.MM.YYYY` of `timestamp` as seen in `tz`.
pub fn format_date_in<Tz: TimeZone>(timestamp: &DateTime<Utc>, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    timestamp.with_timezone(tz).format("%d.%m.%Y").to_string()
}

/// Symbol the en-US currency style prints for well-known codes.
fn currency_symbol(code: &str) -> Option<&'static str> {
    let symbol = match code {
        "USD" => "$",
        "EUR" => "€",
        "GBP" => "£",
        "JPY" => "¥",
        "CNY" => "CN¥",
        "INR" => "₹",
        "KRW" => "₩",
        "ILS" => "₪",
        "VND" => "₫",
        "BRL" => "R$",
        "MXN" => "MX$",
        "CAD" => "CA$",
        "AUD" => "A$",
        "NZD" => "NZ$",
        "HKD" => "HK$",
        "TWD" => "NT$",
        "PHP" => "₱",
        _ => return None,
    };
    Some(symbol)
}

/// Insert `,` every three digits of an integer digit string.
fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

/// en-US currency string with exactly two fractional digits.
///
/// Known codes print their symbol (`$1,234.50`, `€12.00`); any other code
/// prints itself followed by a no-break space (`CHF\u{a0}1,234.50`).
#[must_use]
pub fn format_currency(amount: f64, currency_code: &str) -> String {
    let code = currency_code.trim().to_ascii_uppercase();
    let fixed = format!("{:.2}", amount.abs());
    let (integer, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let negative = amount.is_sign_negative() && !amount.is_nan();

    let prefix = match currency_symbol(&code) {
        Some(symbol) => symbol.to_string(),
        None => format!("{code}\u{a0}"),
    };

    format!(
        "{}{}{}.{}",
        if negative { "-" } else { "" },
        prefix,
        group_thousands(integer),
        fraction
    )
}

/// `street, city, zip, country`
#[must_use]
pub fn format_address(address: &Address) -> String {
    format!(
        "{}, {}, {}, {}",
        address.street, address.city, address.zip, address.country
    )
}

/// `firstName lastName`
#[must_use]
pub fn format_full_name(user: &User) -> String {
    format!("{} {}", user.first_name, user.last_name)
}

/// Upper-cased first letters of first and last name, e.g. `AL`.
///
/// An empty name contributes nothing, so `("", "Lovelace")` gives `L`.
#[must_use]
pub fn initials(user: &User) -> String {
    [&user.first_name, &user.last_name]
        .iter()
        .filter_map(|name| name.chars().next())
        .flat_map(char::to_uppercase)
        .collect()
}
