use crate::BirthDate;
use crate::consts::{MAX_DAY, MAX_MONTH, MIN_DAY, MIN_YEAR};
use crate::types::days_in_month;
use chrono::{Datelike, NaiveDate};
use log::debug;
use std::fmt;

/// Error attached to a single input field.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    #[error("This field is required")]
    Required,

    #[error("Must be a valid day")]
    InvalidDay,

    #[error("Must be a valid month")]
    InvalidMonth,

    #[error("Must be between {min}-{max}")]
    YearOutOfRange { min: u16, max: i32 },

    /// The field took part in a day-for-month combination that does not
    /// exist on the calendar. Supersedes the per-field range errors.
    #[error("Must be a valid date")]
    InvalidCombination,

    /// The field took part in a date that is not strictly in the past.
    #[error("Must be in the past")]
    NotInPast,
}

/// Cross-field error carried alongside the per-field ones.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GeneralError {
    #[error("Invalid date combination.")]
    InvalidCombination,

    #[error("Birth date must be in the past.")]
    NotInPast,
}

/// Per-field validation errors plus an optional cross-field message.
///
/// Every rejection path in [`validate`] produces a non-empty value of
/// this type; there is no panicking failure mode.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    pub day: Option<FieldError>,
    pub month: Option<FieldError>,
    pub year: Option<FieldError>,
    pub general: Option<GeneralError>,
}

impl FieldErrors {
    /// Returns true when no field or general error is set
    pub const fn is_empty(&self) -> bool {
        self.day.is_none() && self.month.is_none() && self.year.is_none() && self.general.is_none()
    }

    /// All three fields flagged plus the combined-date general message
    fn invalid_combination() -> Self {
        Self {
            day: Some(FieldError::InvalidCombination),
            month: Some(FieldError::InvalidCombination),
            year: Some(FieldError::InvalidCombination),
            general: Some(GeneralError::InvalidCombination),
        }
    }

    /// All three fields flagged plus the must-be-in-the-past general message
    fn not_in_past() -> Self {
        Self {
            day: Some(FieldError::NotInPast),
            month: Some(FieldError::NotInPast),
            year: Some(FieldError::NotInPast),
            general: Some(GeneralError::NotInPast),
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if let Some(err) = &self.general {
            parts.push(err.to_string());
        }
        if let Some(err) = &self.day {
            parts.push(format!("day: {err}"));
        }
        if let Some(err) = &self.month {
            parts.push(format!("month: {err}"));
        }
        if let Some(err) = &self.year {
            parts.push(format!("year: {err}"));
        }
        write!(f, "{}", parts.join("; "))
    }
}

impl std::error::Error for FieldErrors {}

/// Validates three free-text fields into a [`BirthDate`].
///
/// A pure function of its explicit inputs: `today` is the evaluation
/// instant, injected rather than read from the ambient clock. Rules are
/// applied per field first, then combined:
///
/// 1. each field is required and must parse to an integer in range
///    (day 1-31, month 1-12, year `MIN_YEAR`..=`today`'s year);
/// 2. the day must exist in the given year/month pair (leap-aware); a
///    failure here flags all three fields and supersedes step 1;
/// 3. the resulting date must be strictly before `today`.
///
/// # Errors
/// Returns a non-empty [`FieldErrors`] on any rejection path.
pub fn validate(
    day: &str,
    month: &str,
    year: &str,
    today: NaiveDate,
) -> Result<BirthDate, FieldErrors> {
    let mut errors = FieldErrors::default();
    let max_year = today.year();

    let day = day.trim();
    let day_num = if day.is_empty() {
        errors.day = Some(FieldError::Required);
        None
    } else {
        match day.parse::<u8>() {
            Ok(d) if (MIN_DAY..=MAX_DAY).contains(&d) => Some(d),
            _ => {
                errors.day = Some(FieldError::InvalidDay);
                None
            }
        }
    };

    let month = month.trim();
    let month_num = if month.is_empty() {
        errors.month = Some(FieldError::Required);
        None
    } else {
        match month.parse::<u8>() {
            Ok(m) if (1..=MAX_MONTH).contains(&m) => Some(m),
            _ => {
                errors.month = Some(FieldError::InvalidMonth);
                None
            }
        }
    };

    let year = year.trim();
    let year_num = if year.is_empty() {
        errors.year = Some(FieldError::Required);
        None
    } else {
        match year.parse::<u16>() {
            Ok(y) if i32::from(y) >= i32::from(MIN_YEAR) && i32::from(y) <= max_year => Some(y),
            _ => {
                errors.year = Some(FieldError::YearOutOfRange {
                    min: MIN_YEAR,
                    max: max_year,
                });
                None
            }
        }
    };

    let (Some(day_num), Some(month_num), Some(year_num)) = (day_num, month_num, year_num) else {
        debug!("validation rejected: {errors}");
        return Err(errors);
    };

    // Per-field checks passed; recheck the day against the actual month
    // length for that year.
    let max_day = days_in_month(i32::from(year_num), u32::from(month_num));
    if u32::from(day_num) > max_day {
        let errors = FieldErrors::invalid_combination();
        debug!("validation rejected: {errors}");
        return Err(errors);
    }

    let birth = BirthDate::from_parts(year_num, month_num, day_num).map_err(|_| {
        let errors = FieldErrors::invalid_combination();
        debug!("validation rejected: {errors}");
        errors
    })?;

    if birth.to_naive_date() >= today {
        let errors = FieldErrors::not_in_past();
        debug!("validation rejected: {errors}");
        return Err(errors);
    }

    Ok(birth)
}
