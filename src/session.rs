use crate::breakdown::{AgeBreakdown, compute_breakdown};
use crate::validate::{FieldErrors, validate};
use crate::BirthDate;
use chrono::{NaiveDate, NaiveDateTime};
use log::info;

/// Result of one refresh tick: the fresh breakdown plus whether the
/// years component just crossed upward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickUpdate {
    pub breakdown: AgeBreakdown,
    /// True exactly once per anniversary crossing, on the tick where
    /// `years` strictly exceeds the previous tick's value. Never true on
    /// the first tick after the birth date changes.
    pub anniversary: bool,
}

/// Tick-driven age session over an optional birth date.
///
/// Holds the single mutable piece of session state: the previous tick's
/// breakdown, used only for anniversary detection. The slot is reset
/// whenever the birth date is replaced or cleared, so a fresh date can
/// never be compared against a stale date's breakdown.
///
/// The clock is injected into [`AgeSession::tick`] and
/// [`AgeSession::submit`], keeping the whole state machine deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AgeSession {
    birth: Option<BirthDate>,
    previous: Option<AgeBreakdown>,
}

impl AgeSession {
    /// An empty session with no birth date armed
    pub const fn new() -> Self {
        Self {
            birth: None,
            previous: None,
        }
    }

    /// A session armed with an already-validated birth date
    pub const fn with_birth_date(birth: BirthDate) -> Self {
        Self {
            birth: Some(birth),
            previous: None,
        }
    }

    /// Validates the three fields against `today` and, on success,
    /// replaces the birth date wholesale and resets the previous-tick
    /// memory. On failure the session is cleared.
    ///
    /// # Errors
    /// Returns the validator's [`FieldErrors`] unchanged.
    pub fn submit(
        &mut self,
        day: &str,
        month: &str,
        year: &str,
        today: NaiveDate,
    ) -> Result<BirthDate, FieldErrors> {
        match validate(day, month, year, today) {
            Ok(birth) => {
                self.birth = Some(birth);
                self.previous = None;
                Ok(birth)
            }
            Err(errors) => {
                self.clear();
                Err(errors)
            }
        }
    }

    /// Clears the birth date and the previous-tick memory
    pub fn clear(&mut self) {
        self.birth = None;
        self.previous = None;
    }

    /// The currently armed birth date, if any
    pub const fn birth_date(&self) -> Option<BirthDate> {
        self.birth
    }

    /// Runs one refresh tick at `now`.
    ///
    /// Returns `None` while no birth date is armed. Otherwise computes a
    /// fresh breakdown, flags the anniversary crossing against the
    /// previous tick, then stores the new breakdown as "previous".
    pub fn tick(&mut self, now: NaiveDateTime) -> Option<TickUpdate> {
        let birth = self.birth?;
        let breakdown = compute_breakdown(birth, now);
        let anniversary = self
            .previous
            .is_some_and(|previous| breakdown.years > previous.years);
        if anniversary {
            info!("anniversary crossing: {} years", breakdown.years);
        }
        self.previous = Some(breakdown);
        Some(TickUpdate {
            breakdown,
            anniversary,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn dt(year: i32, month: u32, day: u32, hour: u32, min: u32, sec: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(year, month, day)
            .unwrap()
            .and_hms_opt(hour, min, sec)
            .unwrap()
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 20).unwrap()
    }

    #[test]
    fn test_empty_session_does_not_tick() {
        let mut session = AgeSession::new();
        assert_eq!(session.tick(dt(2024, 5, 20, 12, 0, 0)), None);
        assert_eq!(session.birth_date(), None);
    }

    #[test]
    fn test_submit_arms_session() {
        let mut session = AgeSession::new();
        let birth = session.submit("15", "5", "2000", today()).unwrap();
        assert_eq!(session.birth_date(), Some(birth));

        let update = session.tick(dt(2024, 5, 20, 0, 0, 0)).unwrap();
        assert_eq!(update.breakdown.years, 24);
        assert!(!update.anniversary);
    }

    #[test]
    fn test_failed_submit_clears_session() {
        let mut session = AgeSession::new();
        session.submit("15", "5", "2000", today()).unwrap();
        session.tick(dt(2024, 5, 20, 12, 0, 0)).unwrap();

        let errors = session.submit("30", "2", "2023", today()).unwrap_err();
        assert!(!errors.is_empty());
        assert_eq!(session.birth_date(), None);
        assert_eq!(session.tick(dt(2024, 5, 20, 12, 0, 1)), None);
    }

    #[test]
    fn test_anniversary_fires_exactly_once_per_crossing() {
        let mut session = AgeSession::with_birth_date(
            BirthDate::from_parts(2000, 5, 15).unwrap(),
        );

        // Just before the birthday
        let update = session.tick(dt(2024, 5, 14, 23, 59, 58)).unwrap();
        assert_eq!(update.breakdown.years, 23);
        assert!(!update.anniversary);

        let update = session.tick(dt(2024, 5, 14, 23, 59, 59)).unwrap();
        assert!(!update.anniversary);

        // Midnight: years increments, event fires once
        let update = session.tick(dt(2024, 5, 15, 0, 0, 0)).unwrap();
        assert_eq!(update.breakdown.years, 24);
        assert!(update.anniversary);

        // Subsequent ticks in the elevated year stay quiet
        let update = session.tick(dt(2024, 5, 15, 0, 0, 1)).unwrap();
        assert_eq!(update.breakdown.years, 24);
        assert!(!update.anniversary);

        let update = session.tick(dt(2024, 5, 15, 0, 0, 2)).unwrap();
        assert!(!update.anniversary);
    }

    #[test]
    fn test_first_tick_never_fires_anniversary() {
        let mut session = AgeSession::with_birth_date(
            BirthDate::from_parts(2000, 5, 15).unwrap(),
        );
        // First observation is already past the birthday; no previous
        // breakdown exists, so no crossing can be detected
        let update = session.tick(dt(2024, 5, 15, 0, 0, 5)).unwrap();
        assert_eq!(update.breakdown.years, 24);
        assert!(!update.anniversary);
    }

    #[test]
    fn test_replacing_date_resets_previous_memory() {
        let mut session = AgeSession::new();
        session.submit("15", "5", "1990", today()).unwrap();
        let update = session.tick(dt(2024, 5, 20, 12, 0, 0)).unwrap();
        assert_eq!(update.breakdown.years, 34);

        // Switch to a much younger date; the very next tick must not
        // compare against the old date's breakdown
        session.submit("15", "5", "2020", today()).unwrap();
        let update = session.tick(dt(2024, 5, 20, 12, 0, 1)).unwrap();
        assert_eq!(update.breakdown.years, 4);
        assert!(!update.anniversary);
    }

    #[test]
    fn test_clear_stops_ticking() {
        let mut session = AgeSession::new();
        session.submit("15", "5", "2000", today()).unwrap();
        assert!(session.tick(dt(2024, 5, 20, 12, 0, 0)).is_some());

        session.clear();
        assert_eq!(session.birth_date(), None);
        assert_eq!(session.tick(dt(2024, 5, 20, 12, 0, 1)), None);
    }

    #[test]
    fn test_each_tick_produces_fresh_value() {
        let mut session = AgeSession::with_birth_date(
            BirthDate::from_parts(2000, 5, 15).unwrap(),
        );
        let first = session.tick(dt(2024, 5, 20, 12, 0, 0)).unwrap();
        let second = session.tick(dt(2024, 5, 20, 12, 0, 1)).unwrap();
        assert_ne!(first.breakdown, second.breakdown);
        assert_eq!(second.breakdown.seconds, first.breakdown.seconds + 1);
    }
}
