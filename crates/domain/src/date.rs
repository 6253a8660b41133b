use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{de::Visitor, Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};
use thiserror::Error;

/// A calendar date in the platform's single civil time zone, exchanged
/// everywhere as a canonical `YYYY-MM-DD` string. Carries no time of day
/// and no zone offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DateKey(NaiveDate);

#[derive(Error, Debug)]
pub enum InvalidDateKey {
    #[error("Date key: {0} is not a valid YYYY-MM-DD date")]
    Malformed(String),
}

impl DateKey {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    pub fn as_date(&self) -> NaiveDate {
        self.0
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    pub fn day(&self) -> u32 {
        self.0.day()
    }

    pub fn weekday(&self) -> Weekday {
        self.0.weekday()
    }

    pub fn add_days(self, days: i64) -> Self {
        Self(self.0 + Duration::days(days))
    }

    /// Number of whole days from `self` to `other`, negative if `other`
    /// is earlier.
    pub fn days_until(self, other: DateKey) -> i64 {
        (other.0 - self.0).num_days()
    }

    /// The first date on or after `self` that falls on `weekday`.
    pub fn next_on_or_after(self, weekday: Weekday) -> Self {
        let offset = (7 + weekday.num_days_from_monday() as i64
            - self.weekday().num_days_from_monday() as i64)
            % 7;
        self.add_days(offset)
    }
}

impl Display for DateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl FromStr for DateKey {
    type Err = InvalidDateKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Self)
            .map_err(|_| InvalidDateKey::Malformed(s.to_string()))
    }
}

impl Serialize for DateKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for DateKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct DateKeyVisitor;

        impl Visitor<'_> for DateKeyVisitor {
            type Value = DateKey;

            fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                formatter.write_str("A YYYY-MM-DD date string")
            }

            fn visit_str<E>(self, value: &str) -> Result<DateKey, E>
            where
                E: serde::de::Error,
            {
                value
                    .parse::<DateKey>()
                    .map_err(|_| E::custom(format!("Malformed date key: {}", value)))
            }
        }

        deserializer.deserialize_str(DateKeyVisitor)
    }
}

/// An inclusive closed range of `DateKey`s. An inverted window
/// (`start > end`) is legal and simply contains nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateWindow {
    start: DateKey,
    end: DateKey,
}

impl DateWindow {
    pub fn new(start: DateKey, end: DateKey) -> Self {
        Self { start, end }
    }

    pub fn start(&self) -> DateKey {
        self.start
    }

    pub fn end(&self) -> DateKey {
        self.end
    }

    pub fn contains(&self, date: DateKey) -> bool {
        self.start <= date && date <= self.end
    }

    /// Number of dates in the window, zero when inverted.
    pub fn num_days(&self) -> i64 {
        (self.start.days_until(self.end) + 1).max(0)
    }
}

pub fn parse_weekday(name: &str) -> Option<Weekday> {
    match name.trim().to_lowercase().as_str() {
        "monday" => Some(Weekday::Mon),
        "tuesday" => Some(Weekday::Tue),
        "wednesday" => Some(Weekday::Wed),
        "thursday" => Some(Weekday::Thu),
        "friday" => Some(Weekday::Fri),
        "saturday" => Some(Weekday::Sat),
        "sunday" => Some(Weekday::Sun),
        _ => None,
    }
}

pub fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

pub fn is_leap_year(year: i32) -> bool {
    year % 400 == 0 || (year % 100 != 0 && year % 4 == 0)
}

// month: January -> 1
pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 => 31,
        2 => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
        3 => 31,
        4 => 30,
        5 => 31,
        6 => 30,
        7 => 31,
        8 => 31,
        9 => 30,
        10 => 31,
        11 => 30,
        12 => 31,
        _ => panic!("Invalid month"),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn key(s: &str) -> DateKey {
        s.parse().expect("Valid date key")
    }

    #[test]
    fn it_accepts_valid_date_keys() {
        let valid_dates = vec!["2018-01-01", "2025-12-31", "2020-02-29", "2026-08-23"];
        for date in &valid_dates {
            assert!(date.parse::<DateKey>().is_ok());
        }
    }

    #[test]
    fn it_rejects_invalid_date_keys() {
        let invalid_dates = vec![
            "2018--1-1",
            "2020-1-32",
            "2021-02-29",
            "2020-0-1",
            "not a date",
            "2020/01/01",
            "",
        ];
        for date in &invalid_dates {
            assert!(date.parse::<DateKey>().is_err());
        }
    }

    #[test]
    fn it_formats_zero_padded() {
        assert_eq!(key("2026-3-4").to_string(), "2026-03-04");
    }

    #[test]
    fn window_bounds_are_inclusive() {
        let window = DateWindow::new(key("2026-08-02"), key("2026-08-08"));
        assert!(window.contains(key("2026-08-02")));
        assert!(window.contains(key("2026-08-08")));
        assert!(!window.contains(key("2026-08-01")));
        assert!(!window.contains(key("2026-08-09")));
        assert_eq!(window.num_days(), 7);
    }

    #[test]
    fn inverted_window_contains_nothing() {
        let window = DateWindow::new(key("2026-08-08"), key("2026-08-02"));
        assert!(!window.contains(key("2026-08-05")));
        assert_eq!(window.num_days(), 0);
    }

    #[test]
    fn next_on_or_after_finds_the_weekday() {
        // 2026-08-23 is a Sunday
        assert_eq!(
            key("2026-08-23").next_on_or_after(Weekday::Mon),
            key("2026-08-24")
        );
        assert_eq!(
            key("2026-08-23").next_on_or_after(Weekday::Sun),
            key("2026-08-23")
        );
        assert_eq!(
            key("2026-08-24").next_on_or_after(Weekday::Sun),
            key("2026-08-30")
        );
    }

    #[test]
    fn recognizes_weekday_names() {
        assert_eq!(parse_weekday("Monday"), Some(Weekday::Mon));
        assert_eq!(parse_weekday("saturday"), Some(Weekday::Sat));
        assert_eq!(parse_weekday(" Sunday "), Some(Weekday::Sun));
        assert_eq!(parse_weekday("Mondays"), None);
        assert_eq!(parse_weekday(""), None);
    }

    #[test]
    fn month_lengths() {
        assert_eq!(days_in_month(2020, 2), 29);
        assert_eq!(days_in_month(2021, 2), 28);
        assert_eq!(days_in_month(2026, 9), 30);
        assert_eq!(days_in_month(2026, 12), 31);
    }
}
