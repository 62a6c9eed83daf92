//! Compact interval strings such as `30m` or `1h`

use std::time::Duration;

use crate::config::error::{ConfigError, Result};

/// Parse `<integer><unit>` where unit is one of `s`, `m`, `h`, `d`, `w`
pub fn parse_interval(text: &str) -> Result<Duration> {
    let invalid = || ConfigError::format(0, format!("Incorrect time interval definition: {}", text));

    let text = text.trim();
    let unit = text.chars().last().ok_or_else(invalid)?;
    let digits = &text[..text.len() - unit.len_utf8()];

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }

    let seconds_per_unit: u64 = match unit {
        's' => 1,
        'm' => 60,
        'h' => 60 * 60,
        'd' => 24 * 60 * 60,
        'w' => 7 * 24 * 60 * 60,
        _ => return Err(invalid()),
    };

    let magnitude: u64 = digits.parse().map_err(|_| invalid())?;
    let seconds = magnitude.checked_mul(seconds_per_unit).ok_or_else(invalid)?;
    Ok(Duration::from_secs(seconds))
}
