//! Date inputs for the calendar tools.
//!
//! Bad input never fails a tool: it falls back to the clock, and the caller
//! gets a note saying so.

use chrono::{Datelike, NaiveDate};

pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

pub fn month_name(month: u32) -> &'static str {
    month
        .checked_sub(1)
        .and_then(|i| MONTH_NAMES.get(i as usize))
        .copied()
        .unwrap_or("Unknown")
}

/// "December 25"
pub fn month_day_label(month: u32, day: u32) -> String {
    format!("{} {}", month_name(month), day)
}

/// "December 22, 2025"
pub fn long_date_label(d: NaiveDate) -> String {
    format!("{} {}, {}", month_name(d.month()), d.day(), d.year())
}

/// "12/25 (Thu)"
pub fn short_day_label(d: NaiveDate) -> String {
    d.format("%m/%d (%a)").to_string()
}

/// Source of "today". `Fixed` keeps tests deterministic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Clock {
    System,
    Fixed(NaiveDate),
}

impl Clock {
    pub fn today(self) -> NaiveDate {
        match self {
            Self::System => chrono::Local::now().date_naive(),
            Self::Fixed(d) => d,
        }
    }
}

/// Parse "MM-DD". Month must be 1..=12 and day 1..=31; no per-month check.
pub fn parse_month_day(s: &str) -> Option<(u32, u32)> {
    let (m, d) = s.trim().split_once('-')?;
    let month = m.trim().parse::<u32>().ok()?;
    let day = d.trim().parse::<u32>().ok()?;
    ((1..=12).contains(&month) && (1..=31).contains(&day)).then_some((month, day))
}

/// Parse "YYYY-MM-DD" into a real calendar date.
pub fn parse_ymd(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}

/// Monday of the week containing `d`.
pub fn week_start(d: NaiveDate) -> NaiveDate {
    d - chrono::Duration::days(d.weekday().num_days_from_monday() as i64)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved<T> {
    pub value: T,
    /// Set when the input was present but unusable.
    pub fallback_note: Option<String>,
}

pub fn resolve_month_day(input: &str, today: NaiveDate) -> Resolved<(u32, u32)> {
    let input = input.trim();
    let today_md = (today.month(), today.day());
    if input.is_empty() {
        return Resolved {
            value: today_md,
            fallback_note: None,
        };
    }
    match parse_month_day(input) {
        Some(md) => Resolved {
            value: md,
            fallback_note: None,
        },
        None => Resolved {
            value: today_md,
            fallback_note: Some(format!(
                "Could not read date '{input}' as MM-DD (e.g. 12-25); showing today instead."
            )),
        },
    }
}

/// Empty input means the current week (from Monday); bad input means today.
pub fn resolve_week_start(input: &str, today: NaiveDate) -> Resolved<NaiveDate> {
    let input = input.trim();
    if input.is_empty() {
        return Resolved {
            value: week_start(today),
            fallback_note: None,
        };
    }
    match parse_ymd(input) {
        Some(d) => Resolved {
            value: d,
            fallback_note: None,
        },
        None => Resolved {
            value: today,
            fallback_note: Some(format!(
                "Could not read date '{input}' as YYYY-MM-DD (e.g. 2025-01-15); starting from today instead."
            )),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn month_day_parsing() {
        assert_eq!(parse_month_day("12-25"), Some((12, 25)));
        assert_eq!(parse_month_day(" 1-5 "), Some((1, 5)));
        // Calendar correctness is the upstream's business.
        assert_eq!(parse_month_day("02-30"), Some((2, 30)));
        assert_eq!(parse_month_day("13-01"), None);
        assert_eq!(parse_month_day("12-32"), None);
        assert_eq!(parse_month_day("12/25"), None);
        assert_eq!(parse_month_day("2025-12-25"), None);
        assert_eq!(parse_month_day("xx-yy"), None);
    }

    #[test]
    fn labels() {
        assert_eq!(month_day_label(12, 25), "December 25");
        assert_eq!(month_name(0), "Unknown");
        assert_eq!(long_date_label(ymd(2025, 1, 6)), "January 6, 2025");
        assert_eq!(short_day_label(ymd(2024, 12, 30)), "12/30 (Mon)");
    }

    #[test]
    fn week_start_is_monday() {
        assert_eq!(week_start(ymd(2024, 3, 7)), ymd(2024, 3, 4));
        assert_eq!(week_start(ymd(2024, 3, 4)), ymd(2024, 3, 4));
        assert_eq!(week_start(ymd(2024, 3, 10)), ymd(2024, 3, 4));
    }

    #[test]
    fn resolve_month_day_falls_back_with_note() {
        let today = ymd(2024, 3, 5);
        let r = resolve_month_day("", today);
        assert_eq!(r.value, (3, 5));
        assert!(r.fallback_note.is_none());
        let r = resolve_month_day("nonsense", today);
        assert_eq!(r.value, (3, 5));
        assert!(r.fallback_note.unwrap().contains("nonsense"));
        assert_eq!(resolve_month_day("07-04", today).value, (7, 4));
    }

    #[test]
    fn resolve_week_start_modes() {
        let today = ymd(2024, 3, 7);
        assert_eq!(resolve_week_start("", today).value, ymd(2024, 3, 4));
        assert_eq!(resolve_week_start("2024-12-30", today).value, ymd(2024, 12, 30));
        let bad = resolve_week_start("2024-02-30", today);
        assert_eq!(bad.value, today);
        assert!(bad.fallback_note.is_some());
    }

    #[test]
    fn fixed_clock_is_fixed() {
        let d = ymd(2020, 2, 29);
        assert_eq!(Clock::Fixed(d).today(), d);
    }

    proptest! {
        #[test]
        fn month_day_accepts_exactly_the_valid_ranges(m in 0u32..20, d in 0u32..40) {
            let parsed = parse_month_day(&format!("{m:02}-{d:02}"));
            let valid = (1..=12).contains(&m) && (1..=31).contains(&d);
            prop_assert_eq!(parsed.is_some(), valid);
            if valid {
                prop_assert_eq!(parsed, Some((m, d)));
            }
        }

        #[test]
        fn resolve_month_day_never_panics(s in ".{0,24}") {
            let today = ymd(2024, 6, 1);
            let r = resolve_month_day(&s, today);
            prop_assert!((1..=12).contains(&r.value.0));
        }

        #[test]
        fn week_start_is_a_monday_within_six_days(offset in 0i64..3650) {
            let d = ymd(2020, 1, 1) + chrono::Duration::days(offset);
            let m = week_start(d);
            prop_assert_eq!(m.weekday(), chrono::Weekday::Mon);
            prop_assert!((d - m).num_days() < 7 && m <= d);
        }
    }
}
