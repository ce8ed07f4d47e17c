//! Structural checks on card data.

use chrono::{DateTime, Duration, NaiveDate, Utc};

/// Months of validity a card must have left, each approximated as 30 days.
pub const EXPIRATION_HORIZON_MONTHS: i64 = 6;

/// Luhn checksum over the digits of `card_number`.
///
/// Non-digit characters are ignored; an input with no digits is invalid.
pub fn is_valid_luhn(card_number: &str) -> bool {
    let digits: Vec<u32> = card_number
        .chars()
        .filter_map(|c| c.to_digit(10))
        .collect();

    if digits.is_empty() {
        return false;
    }

    let sum: u32 = digits
        .iter()
        .rev()
        .enumerate()
        .map(|(idx, &digit)| {
            if idx % 2 == 1 {
                let doubled = digit * 2;
                if doubled > 9 {
                    doubled - 9
                } else {
                    doubled
                }
            } else {
                digit
            }
        })
        .sum();

    sum % 10 == 0
}

/// Parses `MM/YY` (or `MM/YYYY`) into the first day of the expiration month.
///
/// Two-digit years are read as `20YY`.
pub fn parse_expiration(expiration: &str) -> Option<NaiveDate> {
    let (month, year) = expiration.trim().split_once('/')?;
    let month: u32 = month.trim().parse().ok()?;
    let year = year.trim();

    let year: i32 = match year.len() {
        2 => 2000 + year.parse::<i32>().ok()?,
        4 => year.parse().ok()?,
        _ => return None,
    };

    NaiveDate::from_ymd_opt(year, month, 1)
}

/// Whether a card expiring at `expiration` is still valid more than
/// [`EXPIRATION_HORIZON_MONTHS`] after `now`. Unparseable dates fail.
pub fn expires_beyond_horizon(expiration: &str, now: DateTime<Utc>) -> bool {
    let Some(expires_on) = parse_expiration(expiration) else {
        return false;
    };
    let expires_at = expires_on.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());

    match expires_at {
        Some(expires_at) => expires_at - now > Duration::days(30 * EXPIRATION_HORIZON_MONTHS),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_luhn_known_values() {
        assert!(is_valid_luhn("4539148803436467"));
        assert!(is_valid_luhn("4539 1488 0343 6467"));
        assert!(is_valid_luhn("79927398713"));
        assert!(!is_valid_luhn("1234567812345678"));
        assert!(!is_valid_luhn("79927398710"));
    }

    #[test]
    fn test_luhn_without_digits() {
        assert!(!is_valid_luhn(""));
        assert!(!is_valid_luhn("----"));
        assert!(!is_valid_luhn("abcd"));
    }

    #[test]
    fn test_parse_expiration() {
        assert_eq!(parse_expiration("12/99"), NaiveDate::from_ymd_opt(2099, 12, 1));
        assert_eq!(parse_expiration("03/27"), NaiveDate::from_ymd_opt(2027, 3, 1));
        assert_eq!(parse_expiration("12/2031"), NaiveDate::from_ymd_opt(2031, 12, 1));
        assert_eq!(parse_expiration("13/30"), None);
        assert_eq!(parse_expiration("00/30"), None);
        assert_eq!(parse_expiration("1230"), None);
        assert_eq!(parse_expiration("ab/cd"), None);
        assert_eq!(parse_expiration("12/999"), None);
    }

    #[test]
    fn test_horizon() {
        let now = at(2026, 1, 15);
        assert!(expires_beyond_horizon("12/99", now));
        assert!(expires_beyond_horizon("09/26", now));
        assert!(!expires_beyond_horizon("06/26", now));
        assert!(!expires_beyond_horizon("01/20", now));
        assert!(!expires_beyond_horizon("garbage", now));
    }

    #[test]
    fn test_horizon_is_strict() {
        // 2026-07-01 is exactly 180 days after 2026-01-02.
        let now = at(2026, 1, 2);
        assert!(!expires_beyond_horizon("07/26", now));
        assert!(expires_beyond_horizon("07/26", at(2026, 1, 1)));
    }
}
