// SPDX-FileCopyrightText: 2026 Velora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bilingual date and time preference parsing for the booking flow.
//!
//! Understands relative days (today/tomorrow), weekday names, month + day,
//! numeric dates, explicit clock times, and vague times of day, in English
//! and Spanish. Dates always resolve forward: a weekday or a month/day that
//! already passed rolls into the next week or year.

use std::sync::LazyLock;

use chrono::{Datelike, NaiveDate};
use regex::Regex;

const DAY_NAMES: &[(&str, u32)] = &[
    ("monday", 0),
    ("tuesday", 1),
    ("wednesday", 2),
    ("thursday", 3),
    ("friday", 4),
    ("saturday", 5),
    ("sunday", 6),
    ("lunes", 0),
    ("martes", 1),
    ("miercoles", 2),
    ("jueves", 3),
    ("viernes", 4),
    ("sabado", 5),
    ("domingo", 6),
];

const MONTH_NAMES: &[(&str, u32)] = &[
    ("january", 1),
    ("february", 2),
    ("march", 3),
    ("april", 4),
    ("may", 5),
    ("june", 6),
    ("july", 7),
    ("august", 8),
    ("september", 9),
    ("october", 10),
    ("november", 11),
    ("december", 12),
    ("enero", 1),
    ("febrero", 2),
    ("marzo", 3),
    ("abril", 4),
    ("mayo", 5),
    ("junio", 6),
    ("julio", 7),
    ("agosto", 8),
    ("septiembre", 9),
    ("octubre", 10),
    ("noviembre", 11),
    ("diciembre", 12),
];

static BARE_DAY_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b(\d{1,2})\b").unwrap());
static NUMERIC_DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d{1,2})[/-](\d{1,2})(?:[/-](\d{2,4}))?\b").unwrap());
static CLOCK_TIME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d{1,2}):(\d{2})\s*(am|pm)?\b").unwrap());
static HOUR_AMPM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d{1,2})\s*(am|pm)\b").unwrap());

/// Lowercase and fold accents, keeping punctuation (slashes and colons
/// carry meaning here).
fn fold(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .map(|c| match c {
            'á' => 'a',
            'é' => 'e',
            'í' => 'i',
            'ó' => 'o',
            'ú' | 'ü' => 'u',
            'ñ' => 'n',
            _ => c,
        })
        .collect()
}

/// Parse a date preference relative to `reference`. Returns `None` when
/// the text carries no recognizable date.
pub fn parse_date_preference(text: &str, reference: NaiveDate) -> Option<NaiveDate> {
    let normalized = fold(text);
    let normalized = normalized.trim();

    if normalized.contains("today") || normalized.contains("hoy") {
        return Some(reference);
    }
    if normalized.contains("tomorrow") || normalized.contains("manana") {
        return reference.succ_opt();
    }

    let next_week = normalized.contains("next");
    for (name, day_num) in DAY_NAMES {
        if normalized.contains(name) {
            let mut days_ahead =
                (i64::from(*day_num) - i64::from(reference.weekday().num_days_from_monday()))
                    .rem_euclid(7);
            if days_ahead == 0 {
                days_ahead = 7;
            }
            if next_week {
                days_ahead += 7;
            }
            return reference.checked_add_days(chrono::Days::new(days_ahead as u64));
        }
    }

    for (name, month_num) in MONTH_NAMES {
        if normalized.contains(name)
            && let Some(caps) = BARE_DAY_RE.captures(normalized)
            && let Ok(day) = caps[1].parse::<u32>()
        {
            let mut year = reference.year();
            if *month_num < reference.month()
                || (*month_num == reference.month() && day < reference.day())
            {
                year += 1;
            }
            if let Some(date) = NaiveDate::from_ymd_opt(year, *month_num, day) {
                return Some(date);
            }
        }
    }

    if let Some(caps) = NUMERIC_DATE_RE.captures(normalized) {
        let month: u32 = caps[1].parse().ok()?;
        let day: u32 = caps[2].parse().ok()?;
        let explicit_year: Option<i32> = caps.get(3).and_then(|m| m.as_str().parse().ok());
        let mut year = explicit_year.unwrap_or(reference.year());
        if year < 100 {
            year += 2000;
        }
        // Only year-less dates roll forward past the reference.
        if explicit_year.is_none()
            && (month < reference.month() || (month == reference.month() && day < reference.day()))
        {
            year += 1;
        }
        if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
            return Some(date);
        }
    }

    None
}

/// Parse an explicit clock time. Returns `(hour, minute)` in 24h form.
pub fn parse_time_preference(text: &str) -> Option<(u32, u32)> {
    let normalized = fold(text);

    let (hour, minute, am_pm) = if let Some(caps) = CLOCK_TIME_RE.captures(&normalized) {
        let hour: u32 = caps[1].parse().ok()?;
        let minute: u32 = caps[2].parse().ok()?;
        let am_pm = caps.get(3).map(|m| m.as_str().to_string());
        (hour, minute, am_pm)
    } else if let Some(caps) = HOUR_AMPM_RE.captures(&normalized) {
        let hour: u32 = caps[1].parse().ok()?;
        (hour, 0, Some(caps[2].to_string()))
    } else {
        return None;
    };

    let hour = match am_pm.as_deref() {
        Some("pm") if hour != 12 => hour + 12,
        Some("am") if hour == 12 => 0,
        _ => hour,
    };

    if hour <= 23 && minute <= 59 {
        Some((hour, minute))
    } else {
        None
    }
}

/// Map a vague time of day to an hour range `(start, end)`.
pub fn map_vague_time_to_range(text: &str) -> Option<(u32, u32)> {
    let normalized = fold(text);
    let normalized = normalized.trim();
    let ranges: &[(&str, (u32, u32))] = &[
        ("morning", (9, 12)),
        ("afternoon", (12, 17)),
        ("evening", (17, 20)),
        ("night", (18, 21)),
        ("manana", (9, 12)),
        ("tarde", (12, 17)),
        ("noche", (17, 20)),
    ];
    ranges
        .iter()
        .find(|(name, _)| normalized.contains(name))
        .map(|(_, range)| *range)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wednesday() -> NaiveDate {
        // 2026-03-04 is a Wednesday.
        NaiveDate::from_ymd_opt(2026, 3, 4).unwrap()
    }

    #[test]
    fn today_and_tomorrow() {
        let reference = wednesday();
        assert_eq!(parse_date_preference("today works", reference), Some(reference));
        assert_eq!(
            parse_date_preference("tomorrow", reference),
            NaiveDate::from_ymd_opt(2026, 3, 5)
        );
        assert_eq!(
            parse_date_preference("mañana por favor", reference),
            NaiveDate::from_ymd_opt(2026, 3, 5)
        );
    }

    #[test]
    fn weekday_resolves_forward() {
        let reference = wednesday();
        // Friday of the same week.
        assert_eq!(
            parse_date_preference("friday", reference),
            NaiveDate::from_ymd_opt(2026, 3, 6)
        );
        // Same weekday means next week, not today.
        assert_eq!(
            parse_date_preference("wednesday", reference),
            NaiveDate::from_ymd_opt(2026, 3, 11)
        );
        // "next friday" skips a week.
        assert_eq!(
            parse_date_preference("next friday", reference),
            NaiveDate::from_ymd_opt(2026, 3, 13)
        );
        assert_eq!(
            parse_date_preference("el sábado", reference),
            NaiveDate::from_ymd_opt(2026, 3, 7)
        );
    }

    #[test]
    fn month_and_day() {
        let reference = wednesday();
        assert_eq!(
            parse_date_preference("march 20", reference),
            NaiveDate::from_ymd_opt(2026, 3, 20)
        );
        // A date already past rolls to next year.
        assert_eq!(
            parse_date_preference("january 15", reference),
            NaiveDate::from_ymd_opt(2027, 1, 15)
        );
    }

    #[test]
    fn numeric_dates() {
        let reference = wednesday();
        assert_eq!(
            parse_date_preference("3/20", reference),
            NaiveDate::from_ymd_opt(2026, 3, 20)
        );
        assert_eq!(
            parse_date_preference("12/25/26", reference),
            NaiveDate::from_ymd_opt(2026, 12, 25)
        );
        assert_eq!(
            parse_date_preference("1/15", reference),
            NaiveDate::from_ymd_opt(2027, 1, 15)
        );
    }

    #[test]
    fn no_date_found() {
        assert_eq!(parse_date_preference("how much is a facial", wednesday()), None);
    }

    #[test]
    fn explicit_times() {
        assert_eq!(parse_time_preference("2pm"), Some((14, 0)));
        assert_eq!(parse_time_preference("10:30 am"), Some((10, 30)));
        assert_eq!(parse_time_preference("12pm"), Some((12, 0)));
        assert_eq!(parse_time_preference("12am"), Some((0, 0)));
        assert_eq!(parse_time_preference("14:30"), Some((14, 30)));
        assert_eq!(parse_time_preference("sometime in the afternoon"), None);
    }

    #[test]
    fn vague_ranges() {
        assert_eq!(map_vague_time_to_range("morning"), Some((9, 12)));
        assert_eq!(map_vague_time_to_range("in the afternoon"), Some((12, 17)));
        assert_eq!(map_vague_time_to_range("por la noche"), Some((17, 20)));
        assert_eq!(map_vague_time_to_range("2pm"), None);
    }
}
