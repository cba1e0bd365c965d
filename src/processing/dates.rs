//! Free-text date parsing and employment duration in whole months

use chrono::{Datelike, Local, NaiveDate};
use log::warn;
use thiserror::Error;

/// End-date spellings that mean the position is still held.
pub const OPEN_ENDED_MARKERS: [&str; 6] = [
    "current",
    "present",
    "till date",
    "ongoing",
    "to present",
    "till",
];

/// A parsed date reduced to the parts duration arithmetic needs.
/// `month` is `None` when only a year was written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApproximateDate {
    pub year: i32,
    pub month: Option<u32>,
}

impl ApproximateDate {
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month: Some(month) }
    }

    pub fn year_only(year: i32) -> Self {
        Self { year, month: None }
    }

    fn from_date(date: NaiveDate) -> Self {
        Self::new(date.year(), date.month())
    }
}

pub trait DateParser {
    fn parse_approximate(&self, raw: &str) -> Option<ApproximateDate>;
}

/// Source of "today" for open-ended ranges and missing months.
pub trait Clock {
    fn today(&self) -> NaiveDate;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

#[derive(Debug, Error)]
enum DateRangeError {
    #[error("unrecognized start date '{0}'")]
    Start(String),

    #[error("unrecognized end date '{0}'")]
    End(String),
}

/// Resolves a `(start, end)` pair of free-text dates into whole months.
pub struct DateRangeResolver<P = LenientDateParser, C = SystemClock> {
    parser: P,
    clock: C,
}

impl DateRangeResolver {
    pub fn new() -> Self {
        Self::with_parts(LenientDateParser, SystemClock)
    }
}

impl Default for DateRangeResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: DateParser, C: Clock> DateRangeResolver<P, C> {
    pub fn with_parts(parser: P, clock: C) -> Self {
        Self { parser, clock }
    }

    /// Whole months from `start_raw` to `end_raw`, ignoring the day.
    ///
    /// Never fails: an unparsable side is logged and yields 0. The result is
    /// negative when the end precedes the start.
    pub fn months_between(&self, start_raw: &str, end_raw: &str) -> i64 {
        match self.try_months_between(start_raw, end_raw) {
            Ok(months) => months,
            Err(e) => {
                warn!("Error parsing dates: {} - {}, Error: {}", start_raw, end_raw, e);
                0
            }
        }
    }

    fn try_months_between(&self, start_raw: &str, end_raw: &str) -> Result<i64, DateRangeError> {
        let today = self.clock.today();

        let start = self
            .parser
            .parse_approximate(start_raw)
            .ok_or_else(|| DateRangeError::Start(start_raw.to_string()))?;

        let end_normalized = end_raw.trim().to_lowercase();
        let end = if is_open_ended(&end_normalized) {
            ApproximateDate::from_date(today)
        } else {
            self.parser
                .parse_approximate(&end_normalized)
                .ok_or_else(|| DateRangeError::End(end_raw.to_string()))?
        };

        let default_month = today.month();
        let start_month = start.month.unwrap_or(default_month) as i64;
        let end_month = end.month.unwrap_or(default_month) as i64;

        Ok((end.year as i64 - start.year as i64) * 12 + (end_month - start_month))
    }
}

pub fn is_open_ended(end: &str) -> bool {
    OPEN_ENDED_MARKERS.contains(&end.trim().to_lowercase().as_str())
}

/// Parser for the loose date spellings found on resumes.
///
/// Handles ISO dates, month-first numeric dates, month names and their
/// abbreviations anywhere in the text, two-digit years and bare years.
#[derive(Debug, Clone, Copy, Default)]
pub struct LenientDateParser;

#[derive(Debug, Clone, Copy)]
struct Number {
    value: u32,
    digits: usize,
}

const FILLER_WORDS: [&str; 5] = ["of", "the", "on", "at", "in"];

impl DateParser for LenientDateParser {
    fn parse_approximate(&self, raw: &str) -> Option<ApproximateDate> {
        let lowered = raw.trim().to_lowercase();
        if lowered.is_empty() {
            return None;
        }

        let mut month_name = None;
        let mut numbers = Vec::new();

        for token in lowered
            .split(|c: char| !c.is_ascii_alphanumeric())
            .filter(|t| !t.is_empty())
        {
            if token.chars().all(|c| c.is_ascii_digit()) {
                numbers.push(Number {
                    value: token.parse().ok()?,
                    digits: token.len(),
                });
            } else if token.chars().all(|c| c.is_ascii_alphabetic()) {
                if let Some(month) = month_from_name(token) {
                    if month_name.replace(month).is_some() {
                        return None;
                    }
                } else if !FILLER_WORDS.contains(&token) {
                    return None;
                }
            } else {
                // ordinals such as "1st" or "23rd"
                numbers.push(Number {
                    value: parse_ordinal(token)?,
                    digits: 2,
                });
            }
        }

        match month_name {
            Some(month) => with_month_name(month, &numbers),
            None => numeric_only(&numbers),
        }
    }
}

fn with_month_name(month: u32, numbers: &[Number]) -> Option<ApproximateDate> {
    let mut short = Vec::new();
    let mut years = Vec::new();
    for number in numbers {
        match number.digits {
            1 | 2 => short.push(number.value),
            4 => years.push(number.value as i32),
            _ => return None,
        }
    }

    let year = match years.as_slice() {
        [year] => *year,
        // "Mar 21" and "15 Mar 21": the last short number is the year
        [] => expand_two_digit_year(short.pop()?),
        _ => return None,
    };

    match short.as_slice() {
        [] => {}
        [day] => {
            NaiveDate::from_ymd_opt(year, month, *day)?;
        }
        _ => return None,
    }

    Some(ApproximateDate::new(year, month))
}

fn numeric_only(numbers: &[Number]) -> Option<ApproximateDate> {
    match numbers {
        [year] if year.digits == 4 => Some(ApproximateDate::year_only(year.value as i32)),
        [year, month] if year.digits == 4 && month.digits <= 2 => {
            checked(year.value as i32, month.value, None)
        }
        [month, year] if year.digits == 4 && month.digits <= 2 => {
            checked(year.value as i32, month.value, None)
        }
        [year, month, day] if year.digits == 4 && month.digits <= 2 && day.digits <= 2 => {
            checked(year.value as i32, month.value, Some(day.value))
        }
        [first, second, year] if first.digits <= 2 && second.digits <= 2 && matches!(year.digits, 2 | 4) => {
            let year = if year.digits == 2 {
                expand_two_digit_year(year.value)
            } else {
                year.value as i32
            };
            // month first unless the first number cannot be a month
            if first.value > 12 {
                checked(year, second.value, Some(first.value))
            } else {
                checked(year, first.value, Some(second.value))
            }
        }
        _ => None,
    }
}

fn checked(year: i32, month: u32, day: Option<u32>) -> Option<ApproximateDate> {
    NaiveDate::from_ymd_opt(year, month, day.unwrap_or(1))?;
    Some(ApproximateDate::new(year, month))
}

fn expand_two_digit_year(value: u32) -> i32 {
    if value < 69 {
        2000 + value as i32
    } else {
        1900 + value as i32
    }
}

fn parse_ordinal(token: &str) -> Option<u32> {
    let split = token.find(|c: char| !c.is_ascii_digit())?;
    let (digits, suffix) = token.split_at(split);
    if digits.is_empty() || !matches!(suffix, "st" | "nd" | "rd" | "th") {
        return None;
    }
    digits.parse().ok()
}

fn month_from_name(token: &str) -> Option<u32> {
    let month = match token {
        "jan" | "january" => 1,
        "feb" | "february" => 2,
        "mar" | "march" => 3,
        "apr" | "april" => 4,
        "may" => 5,
        "jun" | "june" => 6,
        "jul" | "july" => 7,
        "aug" | "august" => 8,
        "sep" | "sept" | "september" => 9,
        "oct" | "october" => 10,
        "nov" | "november" => 11,
        "dec" | "december" => 12,
        _ => return None,
    };
    Some(month)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver_at(year: i32, month: u32, day: u32) -> DateRangeResolver<LenientDateParser, FixedClock> {
        let today = NaiveDate::from_ymd_opt(year, month, day).unwrap();
        DateRangeResolver::with_parts(LenientDateParser, FixedClock(today))
    }

    fn parse(raw: &str) -> Option<ApproximateDate> {
        LenientDateParser.parse_approximate(raw)
    }

    #[test]
    fn test_full_years() {
        let resolver = resolver_at(2024, 6, 1);
        assert_eq!(resolver.months_between("2020-01-01", "2021-01-01"), 12);
    }

    #[test]
    fn test_day_is_ignored() {
        let resolver = resolver_at(2024, 6, 1);
        assert_eq!(resolver.months_between("2020-01-31", "2020-02-01"), 1);
    }

    #[test]
    fn test_open_ended_uses_clock() {
        let resolver = resolver_at(2024, 3, 10);
        assert_eq!(resolver.months_between("Jan 2022", "present"), 26);
        assert_eq!(resolver.months_between("Jan 2022", "  Till Date "), 26);
        assert_eq!(resolver.months_between("Jan 2022", "Ongoing"), 26);
    }

    #[test]
    fn test_open_ended_moves_with_time() {
        let earlier = resolver_at(2024, 3, 10).months_between("Jan 2022", "current");
        let later = resolver_at(2025, 3, 10).months_between("Jan 2022", "current");
        assert_eq!(later - earlier, 12);
    }

    #[test]
    fn test_garbage_is_zero() {
        let resolver = resolver_at(2024, 6, 1);
        assert_eq!(resolver.months_between("garbage", "2020-01"), 0);
        assert_eq!(resolver.months_between("2020-01", "someday"), 0);
        assert_eq!(resolver.months_between("", ""), 0);
    }

    #[test]
    fn test_reversed_range_is_negative() {
        let resolver = resolver_at(2024, 6, 1);
        assert_eq!(resolver.months_between("May 2021", "May 2020"), -12);
    }

    #[test]
    fn test_year_only_takes_current_month() {
        let resolver = resolver_at(2024, 6, 1);
        assert_eq!(resolver.months_between("2019", "2021"), 24);
        assert_eq!(resolver.months_between("2019", "Mar 2020"), 12 + 3 - 6);
    }

    #[test]
    fn test_month_name_forms() {
        assert_eq!(parse("January, 2019"), Some(ApproximateDate::new(2019, 1)));
        assert_eq!(parse("Sept. 2019"), Some(ApproximateDate::new(2019, 9)));
        assert_eq!(parse("15 March 2020"), Some(ApproximateDate::new(2020, 3)));
        assert_eq!(parse("March 15th, 2020"), Some(ApproximateDate::new(2020, 3)));
        assert_eq!(parse("Mar '21"), Some(ApproximateDate::new(2021, 3)));
        assert_eq!(parse("Dec 98"), Some(ApproximateDate::new(1998, 12)));
    }

    #[test]
    fn test_numeric_forms() {
        assert_eq!(parse("2020-01"), Some(ApproximateDate::new(2020, 1)));
        assert_eq!(parse("01/2020"), Some(ApproximateDate::new(2020, 1)));
        assert_eq!(parse("03.2020"), Some(ApproximateDate::new(2020, 3)));
        assert_eq!(parse("03/15/2020"), Some(ApproximateDate::new(2020, 3)));
        assert_eq!(parse("15/03/2020"), Some(ApproximateDate::new(2020, 3)));
        assert_eq!(parse("2019"), Some(ApproximateDate::year_only(2019)));
    }

    #[test]
    fn test_rejections() {
        assert_eq!(parse("13/2020"), None);
        assert_eq!(parse("Feb 30 2021"), None);
        assert_eq!(parse("Jan Feb 2020"), None);
        assert_eq!(parse("2019 2020"), None);
        assert_eq!(parse("summer 2020"), None);
        assert_eq!(parse("   "), None);
    }

    #[test]
    fn test_marker_detection() {
        assert!(is_open_ended("To Present"));
        assert!(is_open_ended("till"));
        assert!(!is_open_ended("presently"));
    }
}
