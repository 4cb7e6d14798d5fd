//! Parsing of user-entered durations

use crate::error::{ChainError, Result};

/// Parse user text into whole seconds.
///
/// Accepts `"90"`, clock form `"1:30"` / `"1:02:03"`, or unit form such as
/// `"1m30s"` and `"2h"`. Anything else is rejected rather than coerced.
pub fn parse_duration_input(input: &str) -> Result<u32> {
    let text = input.trim();
    if text.is_empty() {
        return Err(ChainError::invalid_duration(input, "empty"));
    }
    if text.starts_with('-') {
        return Err(ChainError::invalid_duration(input, "must not be negative"));
    }

    let seconds = if text.bytes().all(|b| b.is_ascii_digit()) {
        parse_number(input, text)?
    } else if text.contains(':') {
        parse_clock(input, text)?
    } else {
        parse_units(input, &text.to_ascii_lowercase())?
    };

    u32::try_from(seconds).map_err(|_| ChainError::invalid_duration(input, "too large"))
}

fn parse_number(input: &str, digits: &str) -> Result<u64> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ChainError::invalid_duration(input, "expected a whole number"));
    }
    digits
        .parse::<u64>()
        .map_err(|_| ChainError::invalid_duration(input, "too large"))
}

fn parse_clock(input: &str, text: &str) -> Result<u64> {
    let parts: Vec<&str> = text.split(':').collect();
    let (hours, minutes, seconds) = match parts.as_slice() {
        [m, s] => (0, parse_number(input, m)?, parse_number(input, s)?),
        [h, m, s] => {
            let minutes = parse_number(input, m)?;
            if minutes >= 60 {
                return Err(ChainError::invalid_duration(input, "minutes must be below 60"));
            }
            (parse_number(input, h)?, minutes, parse_number(input, s)?)
        }
        _ => return Err(ChainError::invalid_duration(input, "expected M:SS or H:MM:SS")),
    };
    if seconds >= 60 {
        return Err(ChainError::invalid_duration(input, "seconds must be below 60"));
    }
    hours
        .checked_mul(3600)
        .and_then(|h| minutes.checked_mul(60).and_then(|m| h.checked_add(m)))
        .and_then(|hm| hm.checked_add(seconds))
        .ok_or_else(|| ChainError::invalid_duration(input, "too large"))
}

fn parse_units(input: &str, text: &str) -> Result<u64> {
    let mut total: u64 = 0;
    let mut digits = String::new();

    for ch in text.chars() {
        let scale = match ch {
            '0'..='9' => {
                digits.push(ch);
                continue;
            }
            'h' => 3600,
            'm' => 60,
            's' => 1,
            c if c.is_whitespace() => continue,
            _ => return Err(ChainError::invalid_duration(input, "unexpected character")),
        };
        let amount = parse_number(input, &digits)?;
        digits.clear();
        total = amount
            .checked_mul(scale)
            .and_then(|secs| total.checked_add(secs))
            .ok_or_else(|| ChainError::invalid_duration(input, "too large"))?;
    }

    if !digits.is_empty() {
        return Err(ChainError::invalid_duration(input, "number without unit"));
    }
    Ok(total)
}

/// Format seconds as `MM:SS`; minutes are not wrapped at an hour
pub fn format_clock(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_supported_forms() {
        assert_eq!(parse_duration_input("90").unwrap(), 90);
        assert_eq!(parse_duration_input(" 0 ").unwrap(), 0);
        assert_eq!(parse_duration_input("1:30").unwrap(), 90);
        assert_eq!(parse_duration_input("1:02:03").unwrap(), 3723);
        assert_eq!(parse_duration_input("1m30s").unwrap(), 90);
        assert_eq!(parse_duration_input("2H").unwrap(), 7200);
        assert_eq!(parse_duration_input("1h 5m").unwrap(), 3900);
    }

    #[test]
    fn rejects_bad_input() {
        for bad in [
            "",
            "   ",
            "abc",
            "-5",
            "1.5",
            "NaN",
            "1:75",
            "1:",
            ":30",
            "5x",
            "1m30",
            "m",
            "99999999999",
        ] {
            assert!(
                matches!(parse_duration_input(bad), Err(ChainError::InvalidDuration { .. })),
                "accepted {:?}",
                bad
            );
        }
    }

    #[test]
    fn formats_clock() {
        assert_eq!(format_clock(0), "00:00");
        assert_eq!(format_clock(61), "01:01");
        assert_eq!(format_clock(3725), "62:05");
    }
}
