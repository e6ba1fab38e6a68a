//! NBA season-string derivation.
//!
//! A season spans July 1 of year Y through June 30 of Y+1 and is named
//! `"Y-(Y+1 mod 100)"`, e.g. `"2025-26"`.

use chrono::{DateTime, Datelike, NaiveDate, Utc};

/// Derive the season string containing the given date.
pub fn season_for_date(date: NaiveDate) -> String {
    let start_year = if date.month() >= 7 {
        date.year()
    } else {
        date.year() - 1
    };
    format_season(start_year)
}

/// The season containing today's date in UTC.
pub fn current_season() -> String {
    season_for_instant(Utc::now())
}

/// The season containing the given instant (UTC calendar date).
pub fn season_for_instant(now: DateTime<Utc>) -> String {
    season_for_date(now.date_naive())
}

/// The season immediately before `season`, or `None` if the string does
/// not start with a parseable year (e.g. `"2024-25"` -> `"2023-24"`).
pub fn previous_season(season: &str) -> Option<String> {
    let start_year: i32 = season.split('-').next()?.parse().ok()?;
    Some(format_season(start_year - 1))
}

/// Season cache keys drop the dash: `"2025-26"` -> `"202526"`.
pub fn season_file_stem(season: &str) -> String {
    season.replace('-', "")
}

fn format_season(start_year: i32) -> String {
    format!("{start_year}-{:02}", (start_year + 1) % 100)
}
