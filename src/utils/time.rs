use chrono::{DateTime, Utc};

use crate::errors::BotError;

const UNITS: [(&str, u64); 4] = [
    ("days", 86_400),
    ("hours", 3_600),
    ("minutes", 60),
    ("seconds", 1),
];

/// Renders a duration as `"2 days 3 minutes"`, leaving out zero units.
///
/// # Examples
///
/// ```
/// use aibot::utils::readable_duration;
///
/// assert_eq!(readable_duration(0), "less than 1 second");
/// assert_eq!(readable_duration(3661), "1 hours 1 minutes 1 seconds");
/// ```
#[must_use]
pub fn readable_duration(seconds: u64) -> String {
    let mut remaining = seconds;
    let mut parts = Vec::with_capacity(UNITS.len());

    for (name, size) in UNITS {
        let value = remaining / size;
        remaining %= size;
        if value > 0 {
            parts.push(format!("{value} {name}"));
        }
    }

    if parts.is_empty() {
        "less than 1 second".to_string()
    } else {
        parts.join(" ")
    }
}

/// Whole seconds between a Slack message `ts` and `now`, clamped at zero.
///
/// The fractional part of `ts` is dropped before subtracting.
///
/// # Errors
///
/// Returns `BotError::ParseError` if `ts` is not a Slack timestamp.
pub fn elapsed_seconds(ts: &str, now: DateTime<Utc>) -> Result<u64, BotError> {
    let whole = ts.split('.').next().unwrap_or_default();
    let sent = whole
        .parse::<i64>()
        .map_err(|e| BotError::ParseError(format!("Invalid Slack ts '{}': {}", ts, e)))?;

    Ok(u64::try_from(now.timestamp().saturating_sub(sent)).unwrap_or(0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn omits_zero_units() {
        assert_eq!(readable_duration(59), "59 seconds");
        assert_eq!(readable_duration(60), "1 minutes");
        assert_eq!(readable_duration(86_400 + 5), "1 days 5 seconds");
        assert_eq!(readable_duration(2 * 86_400 + 3 * 3_600), "2 days 3 hours");
    }

    #[test]
    fn elapsed_drops_fraction_and_clamps() {
        let now = Utc.timestamp_opt(1_700_000_100, 0).unwrap();
        assert_eq!(elapsed_seconds("1700000000.999999", now).unwrap(), 100);
        assert_eq!(elapsed_seconds("1700000200.000100", now).unwrap(), 0);
        assert_eq!(elapsed_seconds("1700000100", now).unwrap(), 0);
    }

    #[test]
    fn elapsed_rejects_garbage() {
        let now = Utc.timestamp_opt(1_700_000_100, 0).unwrap();
        assert!(matches!(
            elapsed_seconds("yesterday", now),
            Err(BotError::ParseError(_))
        ));
    }
}
