/// Earliest accepted birth year (inclusive)
pub const MIN_YEAR: u16 = 1900;

/// Maximum valid year (inclusive)
pub const MAX_YEAR: u16 = 9999;

/// Maximum valid month (December)
pub const MAX_MONTH: u8 = 12;

/// Maximum day value any month can have
pub const MAX_DAY: u8 = 31;

/// First day of month
pub const MIN_DAY: u8 = 1;

/// Month number for February
pub const FEBRUARY: u32 = 2;

/// Days in February for leap years
pub const FEBRUARY_DAYS_LEAP: u32 = 29;

/// Maximum days in each month (index 0 is unused, months are 1-indexed)
/// February shows 28 days (non-leap year default)
pub const DAYS_IN_MONTH: [u32; 13] = [
    0,  // index 0 unused (months are 1-indexed)
    31, // January
    28, // February (non-leap, adjusted by is_leap_year check)
    31, // March
    30, // April
    31, // May
    30, // June
    31, // July
    31, // August
    30, // September
    31, // October
    30, // November
    31, // December
];

/// Leap year occurs every 4 years
pub(crate) const LEAP_YEAR_CYCLE: i32 = 4;
/// Century years are not leap years unless...
pub(crate) const CENTURY_CYCLE: i32 = 100;
/// ...they are divisible by 400 (Gregorian calendar correction)
pub(crate) const GREGORIAN_CYCLE: i32 = 400;

/// Months in a calendar year, used by the month borrow
pub const MONTHS_PER_YEAR: u32 = 12;
/// Hours added back when a day is borrowed
pub const HOURS_PER_DAY: u32 = 24;
/// Minutes added back when an hour is borrowed
pub const MINUTES_PER_HOUR: u32 = 60;
/// Seconds added back when a minute is borrowed
pub const SECONDS_PER_MINUTE: u32 = 60;

/// Date component separator (ISO 8601 format)
pub const DATE_SEPARATOR: char = '-';
