//! Number formatting with thousands separators.

use num_format::{Locale, ToFormattedString};

/// Formats a count with a comma between every group of three digits, e.g. `1,234,567`.
pub(crate) fn group_thousands(value: u64) -> String {
    value.to_formatted_string(&Locale::en)
}

/// Formats a value with two decimals and thousands separators, e.g. `12,345.68`.
///
/// Values that have no decimal representation (infinities, NaN) are formatted as-is.
pub(crate) fn fixed_two_decimals(value: f64) -> String {
    let sign = if value < 0.0 { "-" } else { "" };
    let formatted = format!("{:.2}", value.abs());

    let Some((integer, fraction)) = formatted.split_once('.') else {
        return format!("{sign}{formatted}");
    };

    match integer.parse::<u128>() {
        Ok(integer) => format!(
            "{sign}{}.{fraction}",
            integer.to_formatted_string(&Locale::en)
        ),
        Err(_) => format!("{sign}{formatted}"),
    }
}
