//! Calendar and cyclic date bins
//!
//! Calendar bins (hour, day, week, month, year) are keyed by the start of the
//! bucket in epoch milliseconds. Cyclic bins (hour of day, day of week, month
//! of year) are keyed by their index in the cycle. All bucketing is in UTC.

use crate::error::HistoError;
use crate::key::BinKey;
use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, TimeZone, Timelike, Utc};
use os_filter::record::is_empty_value;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

const WEEKDAYS: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

const MONTHS: [&str; 12] = [
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

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateBinType {
    Hour,
    #[default]
    Day,
    Week,
    Month,
    Year,
    HourOfDay,
    DayOfWeek,
    MonthOfYear,
}

impl DateBinType {
    pub const ALL: [DateBinType; 8] = [
        Self::Hour,
        Self::Day,
        Self::Week,
        Self::Month,
        Self::Year,
        Self::HourOfDay,
        Self::DayOfWeek,
        Self::MonthOfYear,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Hour => "hour",
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
            Self::Year => "year",
            Self::HourOfDay => "hour_of_day",
            Self::DayOfWeek => "day_of_week",
            Self::MonthOfYear => "month_of_year",
        }
    }

    /// Whether bins repeat every cycle instead of covering one time range
    pub fn is_cyclic(&self) -> bool {
        matches!(self, Self::HourOfDay | Self::DayOfWeek | Self::MonthOfYear)
    }

    pub fn key(&self, value: Option<&Value>) -> BinKey {
        match parse_date(value) {
            DateSample::Missing => BinKey::Empty,
            DateSample::Invalid => BinKey::Invalid,
            DateSample::Date(date) => {
                if self.is_cyclic() {
                    BinKey::Number(f64::from(self.cycle_index(&date)))
                } else {
                    match self.bucket_start(&date) {
                        Some(start) => BinKey::Number(start.timestamp_millis() as f64),
                        None => BinKey::Invalid,
                    }
                }
            }
        }
    }

    pub fn label(&self, value: Option<&Value>) -> String {
        self.key_label(&self.key(value))
    }

    /// Display label for a key produced by [`DateBinType::key`]
    pub fn key_label(&self, key: &BinKey) -> String {
        let BinKey::Number(n) = key else {
            return key.to_string();
        };

        if self.is_cyclic() {
            let index = *n as usize;
            return match self {
                Self::HourOfDay => format!("{:02}", index),
                Self::DayOfWeek => WEEKDAYS.get(index).map(|s| s.to_string()).unwrap_or_default(),
                _ => MONTHS.get(index).map(|s| s.to_string()).unwrap_or_default(),
            };
        }

        let Some(start) = from_millis(*n) else {
            return key.to_string();
        };

        match self {
            Self::Hour => start.format("%Y-%m-%d %H:00").to_string(),
            Self::Day => start.format("%Y-%m-%d").to_string(),
            Self::Week => {
                let week = start.iso_week();
                format!("{}-W{:02}", week.year(), week.week())
            }
            Self::Month => start.format("%Y-%m").to_string(),
            _ => start.format("%Y").to_string(),
        }
    }

    /// Start and exclusive end of a calendar bucket; `None` for cyclic types
    /// and for buckets running past the representable date range
    pub fn bucket_range(&self, start_millis: f64) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        if self.is_cyclic() {
            return None;
        }

        let start = from_millis(start_millis)?;
        let end = match self {
            Self::Hour => start.checked_add_signed(Duration::hours(1))?,
            Self::Day => start.checked_add_signed(Duration::days(1))?,
            Self::Week => start.checked_add_signed(Duration::days(7))?,
            Self::Month => {
                let (year, month) = if start.month() == 12 {
                    (start.year() + 1, 1)
                } else {
                    (start.year(), start.month() + 1)
                };
                midnight(NaiveDate::from_ymd_opt(year, month, 1)?)?
            }
            _ => midnight(NaiveDate::from_ymd_opt(start.year() + 1, 1, 1)?)?,
        };

        Some((start, end))
    }

    fn bucket_start(&self, date: &DateTime<Utc>) -> Option<DateTime<Utc>> {
        let day = date.date_naive();
        match self {
            Self::Hour => day
                .and_hms_opt(date.hour(), 0, 0)
                .map(|naive| Utc.from_utc_datetime(&naive)),
            Self::Day => midnight(day),
            Self::Week => {
                let back = i64::from(day.weekday().num_days_from_monday());
                midnight(day.checked_sub_signed(Duration::days(back))?)
            }
            Self::Month => midnight(NaiveDate::from_ymd_opt(day.year(), day.month(), 1)?),
            Self::Year => midnight(NaiveDate::from_ymd_opt(day.year(), 1, 1)?),
            _ => None,
        }
    }

    fn cycle_index(&self, date: &DateTime<Utc>) -> u32 {
        match self {
            Self::HourOfDay => date.hour(),
            Self::DayOfWeek => date.weekday().num_days_from_monday(),
            _ => date.month0(),
        }
    }
}

impl fmt::Display for DateBinType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DateBinType {
    type Err = HistoError;

    /// Accepts `hour_of_day`, `hour-of-day`, `Hour of Day` and the like
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .map(|c| match c {
                '-' | ' ' => '_',
                c => c.to_ascii_lowercase(),
            })
            .collect();

        Self::ALL
            .into_iter()
            .find(|t| t.name() == normalized)
            .ok_or_else(|| HistoError::unknown_date_type(s))
    }
}

pub enum DateSample {
    Missing,
    Invalid,
    Date(DateTime<Utc>),
}

/// Read a date from an RFC 3339 string, a `YYYY-MM-DD` string, a naive
/// `YYYY-MM-DDTHH:MM:SS` string (taken as UTC) or epoch milliseconds
pub fn parse_date(value: Option<&Value>) -> DateSample {
    if is_empty_value(value) {
        return DateSample::Missing;
    }

    let parsed = match value {
        Some(Value::Number(n)) => n.as_f64().and_then(from_millis),
        Some(Value::String(s)) => parse_date_text(s.trim()),
        _ => None,
    };

    parsed.map(DateSample::Date).unwrap_or(DateSample::Invalid)
}

fn parse_date_text(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(date) = DateTime::parse_from_rfc3339(text) {
        return Some(date.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }

    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(midnight)
}

fn from_millis(millis: f64) -> Option<DateTime<Utc>> {
    if !millis.is_finite() {
        return None;
    }
    Utc.timestamp_millis_opt(millis.floor() as i64).single()
}

fn midnight(day: NaiveDate) -> Option<DateTime<Utc>> {
    day.and_hms_opt(0, 0, 0)
        .map(|naive| Utc.from_utc_datetime(&naive))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const SAMPLE: &str = "2021-01-05T13:45:00Z";

    fn label(bin_type: DateBinType, value: Value) -> String {
        bin_type.label(Some(&value))
    }

    #[test]
    fn test_labels() {
        assert_eq!(label(DateBinType::Hour, json!(SAMPLE)), "2021-01-05 13:00");
        assert_eq!(label(DateBinType::Day, json!(SAMPLE)), "2021-01-05");
        assert_eq!(label(DateBinType::Week, json!(SAMPLE)), "2021-W01");
        assert_eq!(label(DateBinType::Month, json!(SAMPLE)), "2021-01");
        assert_eq!(label(DateBinType::Year, json!(SAMPLE)), "2021");
        assert_eq!(label(DateBinType::HourOfDay, json!(SAMPLE)), "13");
        assert_eq!(label(DateBinType::DayOfWeek, json!(SAMPLE)), "Tuesday");
        assert_eq!(label(DateBinType::MonthOfYear, json!(SAMPLE)), "January");
    }

    #[test]
    fn test_keys() {
        assert_eq!(
            DateBinType::Day.key(Some(&json!(SAMPLE))),
            BinKey::Number(1_609_804_800_000.0)
        );
        assert_eq!(
            DateBinType::Week.key(Some(&json!("2021-01-10"))),
            BinKey::Number(1_609_718_400_000.0)
        );
        assert_eq!(DateBinType::DayOfWeek.key(Some(&json!(SAMPLE))), BinKey::Number(1.0));
        assert_eq!(DateBinType::Day.key(Some(&json!("not a date"))), BinKey::Invalid);
        assert_eq!(DateBinType::Day.key(Some(&json!(true))), BinKey::Invalid);
        assert_eq!(DateBinType::Day.key(None), BinKey::Empty);
        assert_eq!(DateBinType::Day.key(Some(&json!(""))), BinKey::Empty);
    }

    #[test]
    fn test_value_forms() {
        assert_eq!(label(DateBinType::Day, json!(1_609_854_300_000i64)), "2021-01-05");
        assert_eq!(label(DateBinType::Day, json!("2021-01-05")), "2021-01-05");
        assert_eq!(label(DateBinType::Hour, json!("2021-01-05 13:10:00")), "2021-01-05 13:00");
        assert_eq!(label(DateBinType::Day, json!("2021-01-05T01:00:00+02:00")), "2021-01-04");
    }

    #[test]
    fn test_bucket_range() {
        let start = match DateBinType::Month.key(Some(&json!("2021-12-15"))) {
            BinKey::Number(n) => n,
            other => panic!("unexpected key {:?}", other),
        };
        let (from, to) = DateBinType::Month.bucket_range(start).unwrap();
        assert_eq!(from.to_rfc3339(), "2021-12-01T00:00:00+00:00");
        assert_eq!(to.to_rfc3339(), "2022-01-01T00:00:00+00:00");

        assert!(DateBinType::HourOfDay.bucket_range(13.0).is_none());
    }

    #[test]
    fn test_range_limits() {
        let min = json!(DateTime::<Utc>::MIN_UTC.timestamp_millis());
        let max = json!(DateTime::<Utc>::MAX_UTC.timestamp_millis());

        // The earliest representable day is not a Monday
        assert_eq!(DateBinType::Week.key(Some(&min)), BinKey::Invalid);
        assert!(matches!(DateBinType::DayOfWeek.key(Some(&min)), BinKey::Number(_)));

        for bin_type in [DateBinType::Hour, DateBinType::Day, DateBinType::Year] {
            let BinKey::Number(start) = bin_type.key(Some(&max)) else {
                panic!("{} key at the upper limit should be a number", bin_type);
            };
            assert!(bin_type.bucket_range(start).is_none());
        }
    }

    #[test]
    fn test_from_str() {
        assert_eq!("Hour of Day".parse::<DateBinType>().unwrap(), DateBinType::HourOfDay);
        assert_eq!("month-of-year".parse::<DateBinType>().unwrap(), DateBinType::MonthOfYear);
        assert_eq!("WEEK".parse::<DateBinType>().unwrap(), DateBinType::Week);
        assert!("fortnight".parse::<DateBinType>().is_err());
    }
}
