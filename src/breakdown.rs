use crate::BirthDate;
use crate::consts::{HOURS_PER_DAY, MINUTES_PER_HOUR, MONTHS_PER_YEAR, SECONDS_PER_MINUTE};
use crate::prelude::*;
use crate::types::days_in_month;
use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Calendar-aware elapsed time between a birth instant and "now",
/// expressed in mixed units.
///
/// A fresh value is produced for every computation; nothing is mutated
/// in place. After borrowing, months is in 0..=11, hours in 0..=23 and
/// minutes/seconds in 0..=59; years and days are unbounded upward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[display(fmt = "{years} years, {months} months, {days} days, {hours:02}:{minutes:02}:{seconds:02}")]
pub struct AgeBreakdown {
    pub years: u32,
    pub months: u32,
    pub days: u32,
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
}

impl AgeBreakdown {
    /// Calendar-aware subtraction, largest unit first, with borrowing.
    ///
    /// Peels off whole years, then whole months, then whole days, hours,
    /// minutes and seconds, advancing an intermediate instant after each
    /// step. Negative remainders are then corrected bottom-up by
    /// borrowing one unit of the next-larger granularity, and every
    /// component is floored at zero as a final guard against clock skew.
    pub fn between(start: NaiveDateTime, now: NaiveDateTime) -> Self {
        let mut years = whole_years_between(start, now);
        let after_years = add_months(start, years.saturating_mul(MONTHS_PER_YEAR as i32));

        let mut months = whole_months_between(after_years, now);
        let after_months = add_months(after_years, months);

        let mut days = (now - after_months).num_days();
        let after_days = after_months + Duration::days(days);

        let mut hours = (now - after_days).num_hours();
        let after_hours = after_days + Duration::hours(hours);

        let mut minutes = (now - after_hours).num_minutes();
        let after_minutes = after_hours + Duration::minutes(minutes);

        let mut seconds = (now - after_minutes).num_seconds();

        // Bottom-up borrow corrections
        if seconds < 0 {
            minutes -= 1;
            seconds += i64::from(SECONDS_PER_MINUTE);
        }
        if minutes < 0 {
            hours -= 1;
            minutes += i64::from(MINUTES_PER_HOUR);
        }
        if hours < 0 {
            days -= 1;
            hours += i64::from(HOURS_PER_DAY);
        }
        if days < 0 {
            months -= 1;
            // The borrow size is the length of the month immediately
            // preceding the post-months intermediate date, not of the
            // month before `now`. The two diverge around 31/30-day
            // transitions.
            let prev = add_months(after_months, -1);
            days += i64::from(days_in_month(prev.year(), prev.month()));
        }
        if months < 0 {
            years -= 1;
            months += MONTHS_PER_YEAR as i32;
        }

        Self {
            years: clamp_component(i64::from(years)),
            months: clamp_component(i64::from(months)),
            days: clamp_component(days),
            hours: clamp_component(hours),
            minutes: clamp_component(minutes),
            seconds: clamp_component(seconds),
        }
    }

    /// The `hh:mm:ss` line of the live counter
    pub fn clock_string(&self) -> String {
        format!("{:02}:{:02}:{:02}", self.hours, self.minutes, self.seconds)
    }
}

/// Computes the live breakdown for a validated birth date at `now`.
///
/// Deterministic: identical `(birth, now)` inputs always yield identical
/// results.
pub fn compute_breakdown(birth: BirthDate, now: NaiveDateTime) -> AgeBreakdown {
    AgeBreakdown::between(birth.at_midnight(), now)
}

/// Floors a component at zero (guards against clock skew producing a
/// near-zero negative)
const fn clamp_component(value: i64) -> u32 {
    if value < 0 { 0 } else { value as u32 }
}

/// Adds `months` calendar months (may be negative), clamping the
/// day-of-month to the target month's length (Feb 29 + 12 months lands
/// on Feb 28).
fn add_months(instant: NaiveDateTime, months: i32) -> NaiveDateTime {
    let date = instant.date();
    let total = date.year() * MONTHS_PER_YEAR as i32 + date.month0() as i32 + months;
    let year = total.div_euclid(MONTHS_PER_YEAR as i32);
    let month = total.rem_euclid(MONTHS_PER_YEAR as i32) as u32 + 1;
    let day = date.day().min(days_in_month(year, month));

    NaiveDate::from_ymd_opt(year, month, day)
        .map_or(instant, |d| NaiveDateTime::new(d, instant.time()))
}

/// Whole calendar years between two instants, truncated toward zero
fn whole_years_between(from: NaiveDateTime, to: NaiveDateTime) -> i32 {
    let mut years = to.year() - from.year();
    if years > 0 && add_months(from, years * MONTHS_PER_YEAR as i32) > to {
        years -= 1;
    } else if years < 0 && add_months(from, years * MONTHS_PER_YEAR as i32) < to {
        years += 1;
    }
    years
}

/// Whole calendar months between two instants, truncated toward zero
fn whole_months_between(from: NaiveDateTime, to: NaiveDateTime) -> i32 {
    let mut months = (to.year() - from.year()) * MONTHS_PER_YEAR as i32 + to.month0() as i32
        - from.month0() as i32;
    if months > 0 && add_months(from, months) > to {
        months -= 1;
    } else if months < 0 && add_months(from, months) < to {
        months += 1;
    }
    months
}
