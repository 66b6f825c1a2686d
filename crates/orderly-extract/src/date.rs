// SPDX-FileCopyrightText: 2026 Orderly Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Date handling: standalone date lines and order timestamps.

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, Utc};
use regex::Regex;

/// Timestamp layout stored on every order.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M UTC";

static DATE_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap());

/// Parses a line that holds nothing but a `YYYY-MM-DD` date.
///
/// Colons are removed and a leading bullet is tolerated. Tokens that are
/// not a real calendar date (`2026-13-40`) yield `None`.
pub fn parse_date_marker(line: &str) -> Option<NaiveDate> {
    let stripped = line.replace(':', "");
    let token = stripped.trim().trim_start_matches('•').trim();
    if !DATE_TOKEN.is_match(token) {
        return None;
    }
    NaiveDate::parse_from_str(token, "%Y-%m-%d").ok()
}

/// Parses a user-supplied `YYYY-MM-DD` filter bound.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

/// Date part of a stored `created_at` timestamp.
pub fn created_on(created_at: &str) -> Option<NaiveDate> {
    let date = created_at.trim().split_whitespace().next()?;
    parse_date(date)
}

/// Creation timestamp for a new record: midnight of the override date, or `now`.
pub fn creation_timestamp(date_override: Option<NaiveDate>, now: DateTime<Utc>) -> String {
    match date_override {
        Some(date) => format!("{} 00:00 UTC", date.format("%Y-%m-%d")),
        None => now.format(TIMESTAMP_FORMAT).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn marker_accepts_plain_and_decorated_dates() {
        let expected = NaiveDate::from_ymd_opt(2026, 2, 4);
        assert_eq!(parse_date_marker("2026-02-04"), expected);
        assert_eq!(parse_date_marker("  2026-02-04 : "), expected);
        assert_eq!(parse_date_marker("• 2026-02-04"), expected);
    }

    #[test]
    fn marker_rejects_invalid_or_embedded_dates() {
        assert_eq!(parse_date_marker("2026-13-40"), None);
        assert_eq!(parse_date_marker("2026-02-30"), None);
        assert_eq!(parse_date_marker("consegna 2026-02-04"), None);
        assert_eq!(parse_date_marker("04/02/2026"), None);
        assert_eq!(parse_date_marker(""), None);
    }

    #[test]
    fn timestamp_uses_override_midnight() {
        let now = Utc.with_ymd_and_hms(2026, 5, 1, 14, 7, 0).unwrap();
        let date = NaiveDate::from_ymd_opt(2026, 2, 4);
        assert_eq!(creation_timestamp(date, now), "2026-02-04 00:00 UTC");
        assert_eq!(creation_timestamp(None, now), "2026-05-01 14:07 UTC");
    }

    #[test]
    fn created_on_reads_the_date_part() {
        assert_eq!(
            created_on("2026-05-01 14:07 UTC"),
            NaiveDate::from_ymd_opt(2026, 5, 1)
        );
        assert_eq!(created_on("ieri"), None);
        assert_eq!(created_on(""), None);
    }
}
