//! Calendar helpers: month keys and day windows
//!
//! All day and month boundaries are computed in UTC. A transaction belongs to
//! the calendar day (and month) of its UTC timestamp.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Days, Months, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Day and month keys are written with four-digit years
const MIN_YEAR: i32 = 0;
const MAX_YEAR: i32 = 9999;

const SECONDS_PER_DAY: i64 = 86_400;

/// A calendar month, printed and parsed as `YYYY-MM`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Month {
    first: NaiveDate,
}

impl Month {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
            return None;
        }
        NaiveDate::from_ymd_opt(year, month, 1).map(|first| Self { first })
    }

    /// The month containing `date`
    pub fn of(date: NaiveDate) -> Self {
        Self {
            first: date - Days::new(u64::from(date.day0())),
        }
    }

    pub fn year(&self) -> i32 {
        self.first.year()
    }

    pub fn month(&self) -> u32 {
        self.first.month()
    }

    pub fn first_day(&self) -> NaiveDate {
        self.first
    }

    pub fn last_day(&self) -> NaiveDate {
        self.next().first - Days::new(1)
    }

    /// Number of days in the month (28-31)
    pub fn days(&self) -> u32 {
        self.last_day().day()
    }

    pub fn previous(&self) -> Self {
        Self {
            first: self.first - Months::new(1),
        }
    }

    pub fn next(&self) -> Self {
        Self {
            first: self.first + Months::new(1),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        Self::of(date) == *self
    }

    /// Chart label, e.g. "Oct 2026"
    pub fn short_label(&self) -> String {
        self.first.format("%b %Y").to_string()
    }

    /// Narrative label, e.g. "October 2026"
    pub fn long_label(&self) -> String {
        self.first.format("%B %Y").to_string()
    }

    /// First instant of the month
    pub fn start(&self) -> DateTime<Utc> {
        start_of_day(self.first)
    }

    /// Last instant of the month
    pub fn end(&self) -> DateTime<Utc> {
        end_of_day(self.last_day())
    }

    /// The `count` months ending at (and including) `self`, oldest first
    pub fn trailing(&self, count: u32) -> Vec<Month> {
        let mut months: Vec<Month> = (0..count)
            .map(|back| Self {
                first: self.first - Months::new(back),
            })
            .collect();
        months.reverse();
        months
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month())
    }
}

impl FromStr for Month {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidData(format!("Invalid month '{}' (use YYYY-MM)", s));

        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        if year.len() != 4 || month.len() != 2 {
            return Err(invalid());
        }
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        Self::new(year, month).ok_or_else(invalid)
    }
}

impl TryFrom<String> for Month {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Month> for String {
    fn from(month: Month) -> Self {
        month.to_string()
    }
}

/// First instant of `date`
pub fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

/// Last instant of `date` at the store's one-second resolution
pub fn end_of_day(date: NaiveDate) -> DateTime<Utc> {
    start_of_day(date) + chrono::Duration::seconds(SECONDS_PER_DAY - 1)
}

/// Reject days whose year does not fit a `YYYY` key
pub fn check_day(date: NaiveDate) -> Result<NaiveDate> {
    if (MIN_YEAR..=MAX_YEAR).contains(&date.year()) {
        Ok(date)
    } else {
        Err(Error::InvalidData(format!(
            "Date {} is out of range (years {:04}-{:04})",
            date, MIN_YEAR, MAX_YEAR
        )))
    }
}

/// Parse a `YYYY-MM-DD` day key
pub fn parse_day(s: &str) -> Result<NaiveDate> {
    let date = NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| Error::InvalidData(format!("Invalid date '{}' (use YYYY-MM-DD)", s)))?;
    check_day(date)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_and_display_round_trip() {
        let month: Month = "2024-02".parse().unwrap();
        assert_eq!(month.year(), 2024);
        assert_eq!(month.month(), 2);
        assert_eq!(month.to_string(), "2024-02");
    }

    #[test]
    fn test_parse_rejects_bad_months() {
        assert!("2024-13".parse::<Month>().is_err());
        assert!("2024-1".parse::<Month>().is_err());
        assert!("24-01".parse::<Month>().is_err());
        assert!("2024/01".parse::<Month>().is_err());
        assert!("".parse::<Month>().is_err());
    }

    #[test]
    fn test_days_in_month() {
        assert_eq!(Month::new(2024, 2).unwrap().days(), 29);
        assert_eq!(Month::new(2023, 2).unwrap().days(), 28);
        assert_eq!(Month::new(2024, 7).unwrap().days(), 31);
        assert_eq!(Month::new(2024, 9).unwrap().days(), 30);
    }

    #[test]
    fn test_of_and_last_day() {
        let month = Month::of(date(2024, 12, 17));
        assert_eq!(month.first_day(), date(2024, 12, 1));
        assert_eq!(month.last_day(), date(2024, 12, 31));
        assert_eq!(month.next().to_string(), "2025-01");
        assert_eq!(month.previous().to_string(), "2024-11");
    }

    #[test]
    fn test_trailing_months_cross_year() {
        let months = Month::new(2024, 2).unwrap().trailing(4);
        let keys: Vec<String> = months.iter().map(|m| m.to_string()).collect();
        assert_eq!(keys, vec!["2023-11", "2023-12", "2024-01", "2024-02"]);
    }

    #[test]
    fn test_labels() {
        let month = Month::new(2026, 10).unwrap();
        assert_eq!(month.short_label(), "Oct 2026");
        assert_eq!(month.long_label(), "October 2026");
    }

    #[test]
    fn test_day_window() {
        let d = date(2024, 3, 10);
        assert_eq!(start_of_day(d).to_rfc3339(), "2024-03-10T00:00:00+00:00");
        assert_eq!(end_of_day(d).to_rfc3339(), "2024-03-10T23:59:59+00:00");
    }

    #[test]
    fn test_extreme_dates_are_rejected() {
        assert!(parse_day("+262142-12-31").is_err());
        assert!(parse_day("-0001-01-01").is_err());
        assert!(check_day(NaiveDate::MAX).is_err());
        assert!(check_day(NaiveDate::MIN).is_err());
        assert!(Month::new(10000, 1).is_none());

        let last = parse_day("9999-12-31").unwrap();
        assert_eq!(end_of_day(last).to_rfc3339(), "9999-12-31T23:59:59+00:00");
        assert_eq!(Month::of(last).days(), 31);
        assert_eq!(
            start_of_day(parse_day("0000-01-01").unwrap()).to_rfc3339(),
            "0000-01-01T00:00:00+00:00"
        );
    }

    #[test]
    fn test_month_serde_as_string() {
        let month = Month::new(2025, 1).unwrap();
        let json = serde_json::to_string(&month).unwrap();
        assert_eq!(json, "\"2025-01\"");
        let back: Month = serde_json::from_str(&json).unwrap();
        assert_eq!(back, month);
        assert!(serde_json::from_str::<Month>("\"2025-1\"").is_err());
    }
}
