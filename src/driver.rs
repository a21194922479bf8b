use crate::BirthDate;
use crate::session::{AgeSession, TickUpdate};
use crate::validate::FieldErrors;
use chrono::Local;
use log::debug;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Default refresh cadence
const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Event emitted to the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgeEvent {
    /// A fresh breakdown, once per tick while a birth date is armed
    Tick(TickUpdate),
    /// The birth date was cleared (or replaced by a failed validation);
    /// any displayed breakdown should be dropped
    Cleared,
}

/// Once-per-second refresh loop over an armed birth date.
///
/// Owns the cancellation handle for the repeating timer task. Arming a
/// new date aborts the previous task before spawning its replacement
/// within the same synchronous call, so at most one timer is ever live.
/// Each task starts from a fresh [`AgeSession`], which is what resets
/// the previous-breakdown memory on every date change.
///
/// This is the impure shell: it reads the local wall clock once per tick
/// and hands the instant to the deterministic session underneath. Must
/// be used from within a Tokio runtime.
#[derive(Debug)]
pub struct RefreshDriver {
    updates: mpsc::UnboundedSender<AgeEvent>,
    task: Option<JoinHandle<()>>,
    period: Duration,
}

impl RefreshDriver {
    /// Creates a driver emitting on `updates` at the one-second cadence
    pub const fn new(updates: mpsc::UnboundedSender<AgeEvent>) -> Self {
        Self::with_period(updates, TICK_PERIOD)
    }

    /// Test hook: same driver with a custom tick period
    pub(crate) const fn with_period(
        updates: mpsc::UnboundedSender<AgeEvent>,
        period: Duration,
    ) -> Self {
        Self {
            updates,
            task: None,
            period,
        }
    }

    /// Validates the three fields against the current local date and, on
    /// success, arms the refresh timer for the resulting birth date.
    /// Failure cancels any running timer and emits [`AgeEvent::Cleared`].
    ///
    /// # Errors
    /// Returns the validator's [`FieldErrors`] unchanged.
    pub fn submit(
        &mut self,
        day: &str,
        month: &str,
        year: &str,
    ) -> Result<BirthDate, FieldErrors> {
        let today = Local::now().date_naive();
        match crate::validate(day, month, year, today) {
            Ok(birth) => {
                self.set_birth_date(birth);
                Ok(birth)
            }
            Err(errors) => {
                self.clear();
                Err(errors)
            }
        }
    }

    /// Arms the timer for an already-validated birth date, replacing any
    /// previous one. The first tick fires immediately.
    pub fn set_birth_date(&mut self, birth: BirthDate) {
        self.cancel_task();
        debug!("arming refresh timer for {birth}");

        let updates = self.updates.clone();
        let period = self.period;
        self.task = Some(tokio::spawn(async move {
            let mut session = AgeSession::with_birth_date(birth);
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                interval.tick().await;
                let now = Local::now().naive_local();
                if let Some(update) = session.tick(now) {
                    // Receiver gone means the session is being torn down
                    if updates.send(AgeEvent::Tick(update)).is_err() {
                        break;
                    }
                }
            }
        }));
    }

    /// Cancels the timer and tells the presentation layer to drop the
    /// displayed breakdown
    pub fn clear(&mut self) {
        self.cancel_task();
        let _ = self.updates.send(AgeEvent::Cleared);
    }

    /// True while a timer task is armed
    pub const fn is_armed(&self) -> bool {
        self.task.is_some()
    }

    fn cancel_task(&mut self) {
        if let Some(task) = self.task.take() {
            debug!("cancelling refresh timer");
            task.abort();
        }
    }
}

impl Drop for RefreshDriver {
    fn drop(&mut self) {
        self.cancel_task();
    }
}
