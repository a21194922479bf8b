mod breakdown;
mod consts;
mod driver;
mod prelude;
mod session;
mod types;
mod validate;

pub use breakdown::{AgeBreakdown, compute_breakdown};
pub use consts::*;
pub use driver::{AgeEvent, RefreshDriver};
pub use session::{AgeSession, TickUpdate};
pub use types::{Day, Month, Year};
pub use validate::{FieldError, FieldErrors, GeneralError, validate};

use crate::prelude::*;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use std::str::FromStr;

/// A validated Gregorian birth date, normalized to midnight.
///
/// The structural invariant (the day exists in that year/month pair,
/// leap years included) is guaranteed by construction. The
/// strictly-in-the-past invariant is enforced by [`validate`], which is
/// the only producer during a live session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
#[display(fmt = "{:04}-{:02}-{:02}", "year.get()", "month.get()", "day.get()")]
pub struct BirthDate {
    year: types::Year,
    month: types::Month,
    day: types::Day,
}

#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum DateError {
    #[display(fmt = "Invalid date format: {_0}")]
    InvalidFormat(String),
    #[display(fmt = "Invalid year: {} (must be {}-{})", "_0", MIN_YEAR, MAX_YEAR)]
    InvalidYear(u16),
    #[display(fmt = "Invalid month: {} (must be 1-{})", "_0", MAX_MONTH)]
    InvalidMonth(u8),
    #[display(fmt = "Invalid day {day} for month {year}-{month:02}")]
    InvalidDay { month: u8, day: u8, year: u16 },
    #[display(fmt = "Empty date string")]
    EmptyInput,
}

impl std::error::Error for DateError {}

impl BirthDate {
    /// Creates a birth date from raw numeric components, validating each
    /// one and the day-for-month combination.
    ///
    /// # Errors
    /// Returns the `DateError` for the first component that fails.
    pub fn from_parts(year: u16, month: u8, day: u8) -> Result<Self, DateError> {
        let year_t = types::Year::new(year)?;
        let month_t = types::Month::new(month)?;
        let day_t = types::Day::new(day, year, month)?;
        Ok(Self {
            year: year_t,
            month: month_t,
            day: day_t,
        })
    }

    /// Returns the year component
    pub const fn year(&self) -> u16 {
        self.year.get()
    }

    /// Returns the month component
    pub const fn month(&self) -> u8 {
        self.month.get()
    }

    /// Returns the day-of-month component
    pub const fn day(&self) -> u8 {
        self.day.get()
    }

    /// Converts to a chrono `NaiveDate`.
    pub fn to_naive_date(self) -> NaiveDate {
        // Components are validated at construction, so this cannot fail.
        NaiveDate::from_ymd_opt(
            i32::from(self.year.get()),
            u32::from(self.month.get()),
            u32::from(self.day.get()),
        )
        .expect("birth date components are validated at construction")
    }

    /// The birth instant: this date at 00:00:00, time-of-day zeroed.
    pub fn at_midnight(self) -> NaiveDateTime {
        NaiveDateTime::new(self.to_naive_date(), NaiveTime::MIN)
    }
}

impl BirthDate {
    /// Helper to parse u16 with better error messages
    fn parse_u16(s: &str) -> Result<u16, DateError> {
        s.parse::<u16>()
            .map_err(|_| DateError::InvalidFormat(s.to_owned()))
    }

    /// Helper to parse u8 with better error messages
    fn parse_u8(s: &str) -> Result<u8, DateError> {
        s.parse::<u8>()
            .map_err(|_| DateError::InvalidFormat(s.to_owned()))
    }
}

impl FromStr for BirthDate {
    type Err = DateError;

    /// Parses the ISO `YYYY-MM-DD` form.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(DateError::EmptyInput);
        }

        let parts: Vec<&str> = trimmed.split(DATE_SEPARATOR).map(str::trim).collect();
        if parts.len() != 3 {
            return Err(DateError::InvalidFormat(trimmed.to_owned()));
        }

        let year = Self::parse_u16(parts[0])?;
        let month = Self::parse_u8(parts[1])?;
        let day = Self::parse_u8(parts[2])?;

        Self::from_parts(year, month, day)
    }
}

impl TryFrom<(u16, u8, u8)> for BirthDate {
    type Error = DateError;

    fn try_from(value: (u16, u8, u8)) -> Result<Self, Self::Error> {
        Self::from_parts(value.0, value.1, value.2)
    }
}

impl serde::Serialize for BirthDate {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> serde::Deserialize<'de> for BirthDate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn test_from_parts() {
        let date = BirthDate::from_parts(1991, 8, 15).unwrap();
        assert_eq!(date.year(), 1991);
        assert_eq!(date.month(), 8);
        assert_eq!(date.day(), 15);
    }

    #[test]
    fn test_from_parts_invalid_day_combination() {
        let result = BirthDate::from_parts(2023, 2, 30);
        assert!(matches!(result, Err(DateError::InvalidDay { .. })));

        let result = BirthDate::from_parts(2024, 4, 31);
        assert!(matches!(result, Err(DateError::InvalidDay { .. })));
    }

    #[test]
    fn test_from_parts_leap_year() {
        assert!(BirthDate::from_parts(2024, 2, 29).is_ok());
        let result = BirthDate::from_parts(2023, 2, 29);
        assert!(matches!(result, Err(DateError::InvalidDay { .. })));
    }

    #[test]
    fn test_from_parts_year_floor() {
        let result = BirthDate::from_parts(1899, 12, 31);
        assert!(matches!(result, Err(DateError::InvalidYear(1899))));
        assert!(BirthDate::from_parts(1900, 1, 1).is_ok());
    }

    #[test]
    fn test_parse_iso() {
        let date = "1991-08-15".parse::<BirthDate>().unwrap();
        assert_eq!(date, BirthDate::from_parts(1991, 8, 15).unwrap());
    }

    #[test]
    fn test_parse_with_whitespace() {
        let date = " 1991 - 08 - 15 ".parse::<BirthDate>().unwrap();
        assert_eq!(date, BirthDate::from_parts(1991, 8, 15).unwrap());
    }

    #[test]
    fn test_parse_empty() {
        let result = "".parse::<BirthDate>();
        assert!(matches!(result, Err(DateError::EmptyInput)));

        let result = "   ".parse::<BirthDate>();
        assert!(matches!(result, Err(DateError::EmptyInput)));
    }

    #[test]
    fn test_parse_wrong_shape() {
        let result = "1991-08".parse::<BirthDate>();
        assert!(matches!(result, Err(DateError::InvalidFormat(_))));

        let result = "1991-08-15-23".parse::<BirthDate>();
        assert!(matches!(result, Err(DateError::InvalidFormat(_))));
    }

    #[test]
    fn test_parse_bad_tokens() {
        let result = "199A-08-15".parse::<BirthDate>();
        assert!(matches!(result, Err(DateError::InvalidFormat(_))));

        let result = "1991-XX-15".parse::<BirthDate>();
        assert!(matches!(result, Err(DateError::InvalidFormat(_))));

        let result = "1991-08-XX".parse::<BirthDate>();
        assert!(matches!(result, Err(DateError::InvalidFormat(_))));
    }

    #[test]
    fn test_display() {
        let date = BirthDate::from_parts(1991, 8, 15).unwrap();
        assert_eq!(date.to_string(), "1991-08-15");

        let date = BirthDate::from_parts(2000, 1, 5).unwrap();
        assert_eq!(date.to_string(), "2000-01-05");
    }

    #[test]
    fn test_ordering() {
        let d1 = BirthDate::from_parts(1990, 12, 31).unwrap();
        let d2 = BirthDate::from_parts(1991, 1, 1).unwrap();
        let d3 = BirthDate::from_parts(1991, 1, 2).unwrap();
        assert!(d1 < d2);
        assert!(d2 < d3);
    }

    #[test]
    fn test_at_midnight_zeroes_time() {
        let date = BirthDate::from_parts(1991, 8, 15).unwrap();
        let instant = date.at_midnight();
        assert_eq!(instant.hour(), 0);
        assert_eq!(instant.minute(), 0);
        assert_eq!(instant.second(), 0);
        assert_eq!(instant.date(), date.to_naive_date());
    }

    #[test]
    fn test_try_from_tuple() {
        let date: BirthDate = (1991, 8, 15).try_into().unwrap();
        assert_eq!(date.year(), 1991);

        let result: Result<BirthDate, _> = (2023, 2, 30).try_into();
        assert!(result.is_err());
    }

    #[test]
    fn test_serde_string_format() {
        let date = BirthDate::from_parts(1991, 8, 15).unwrap();
        let json = serde_json::to_string(&date).unwrap();
        assert_eq!(json, r#""1991-08-15""#);
        let parsed: BirthDate = serde_json::from_str(&json).unwrap();
        assert_eq!(date, parsed);
    }

    #[test]
    fn test_serde_validation() {
        // Invalid month (13) should be rejected
        let result: Result<BirthDate, _> = serde_json::from_str(r#""2024-13-01""#);
        assert!(result.is_err());

        // Invalid day for February (30) should be rejected
        let result: Result<BirthDate, _> = serde_json::from_str(r#""2024-02-30""#);
        assert!(result.is_err());

        // Below the year floor should be rejected
        let result: Result<BirthDate, _> = serde_json::from_str(r#""1850-01-01""#);
        assert!(result.is_err());

        // Valid leap day should succeed
        let result: Result<BirthDate, _> = serde_json::from_str(r#""2024-02-29""#);
        assert!(result.is_ok());
    }
}
