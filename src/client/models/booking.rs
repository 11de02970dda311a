//! Booking workflow for a single doctor, modelled as an explicit state machine.
//!
//! `SelectingDate -> SelectingTime -> Confirming -> Submitting -> Succeeded | Failed`.
//! A workflow value is one modal instance; its `id` ties delayed events
//! (auto-dismiss, request completion) back to the instance that scheduled them.

use std::fmt;
use std::time::Duration;

use chrono::{NaiveDate, NaiveTime, Timelike};
use thiserror::Error;
use uuid::Uuid;

use crate::common::models::{CreateAppointmentRequest, Doctor};

pub const FIRST_SLOT_HOUR: u32 = 9;
pub const LAST_SLOT_HOUR: u32 = 17;
pub const SLOT_MINUTES: u32 = 30;
pub const AUTO_DISMISS: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeSlot {
    hour: u32,
}

impl TimeSlot {
    pub fn new(hour: u32) -> Option<Self> {
        (FIRST_SLOT_HOUR..=LAST_SLOT_HOUR)
            .contains(&hour)
            .then_some(TimeSlot { hour })
    }

    /// Accepts `HH:MM` on the hour, e.g. `"11:00"`.
    pub fn parse(value: &str) -> Option<Self> {
        let time = NaiveTime::parse_from_str(value.trim(), "%H:%M").ok()?;
        if time.minute() != 0 {
            return None;
        }
        Self::new(time.hour())
    }

    pub fn hour(&self) -> u32 {
        self.hour
    }

    pub fn start(&self) -> NaiveTime {
        NaiveTime::from_hms_opt(self.hour, 0, 0).unwrap_or(NaiveTime::MIN)
    }

    pub fn label(&self) -> String {
        format!("{:02}:00", self.hour)
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// Bookable slots; the same for every date.
pub fn available_slots() -> Vec<TimeSlot> {
    (FIRST_SLOT_HOUR..=LAST_SLOT_HOUR).map(|hour| TimeSlot { hour }).collect()
}

pub fn parse_date_input(value: &str) -> Result<NaiveDate, BookingError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| BookingError::InvalidDate(value.trim().to_string()))
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BookingError {
    #[error("'{0}' is not a date (expected YYYY-MM-DD)")]
    InvalidDate(String),
    #[error("{0} is in the past")]
    PastDate(NaiveDate),
    #[error("no bookable slot at {0}")]
    InvalidSlot(String),
    #[error("cannot {action} while {step}")]
    InvalidTransition { action: &'static str, step: &'static str },
    #[error("a booking request is already in flight")]
    AlreadySubmitting,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookingStep {
    SelectingDate,
    SelectingTime { date: NaiveDate },
    Confirming { date: NaiveDate, slot: TimeSlot },
    Submitting { date: NaiveDate, slot: TimeSlot },
    Succeeded { date: NaiveDate, slot: TimeSlot },
    Failed { date: NaiveDate, slot: TimeSlot, message: String },
}

impl BookingStep {
    pub fn name(&self) -> &'static str {
        match self {
            BookingStep::SelectingDate => "selecting a date",
            BookingStep::SelectingTime { .. } => "selecting a time",
            BookingStep::Confirming { .. } => "confirming",
            BookingStep::Submitting { .. } => "submitting",
            BookingStep::Succeeded { .. } => "booked",
            BookingStep::Failed { .. } => "failed",
        }
    }
}

/// Read-only confirmation summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingSummary {
    pub doctor: String,
    pub specialization: String,
    pub date: NaiveDate,
    pub time: String,
    pub duration_minutes: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BookingWorkflow {
    pub id: Uuid,
    pub doctor: Doctor,
    step: BookingStep,
}

impl BookingWorkflow {
    pub fn new(doctor: Doctor) -> Self {
        Self { id: Uuid::new_v4(), doctor, step: BookingStep::SelectingDate }
    }

    pub fn step(&self) -> &BookingStep {
        &self.step
    }

    fn invalid(&self, action: &'static str) -> BookingError {
        if matches!(self.step, BookingStep::Submitting { .. }) {
            return BookingError::AlreadySubmitting;
        }
        BookingError::InvalidTransition { action, step: self.step.name() }
    }

    /// Picks a calendar date; anything before `today` is refused.
    pub fn select_date(&mut self, date: NaiveDate, today: NaiveDate) -> Result<(), BookingError> {
        match self.step {
            BookingStep::SelectingDate | BookingStep::SelectingTime { .. } => {
                if date < today {
                    return Err(BookingError::PastDate(date));
                }
                self.step = BookingStep::SelectingTime { date };
                Ok(())
            }
            _ => Err(self.invalid("pick a date")),
        }
    }

    pub fn select_slot(&mut self, slot: TimeSlot) -> Result<(), BookingError> {
        match self.step {
            BookingStep::SelectingTime { date } => {
                self.step = BookingStep::Confirming { date, slot };
                Ok(())
            }
            _ => Err(self.invalid("pick a time")),
        }
    }

    pub fn back(&mut self) -> Result<(), BookingError> {
        self.step = match self.step {
            BookingStep::SelectingTime { .. } => BookingStep::SelectingDate,
            BookingStep::Confirming { date, .. } => BookingStep::SelectingTime { date },
            _ => return Err(self.invalid("go back")),
        };
        Ok(())
    }

    /// Enters `Submitting` and hands back the one request to send.
    pub fn confirm(&mut self) -> Result<CreateAppointmentRequest, BookingError> {
        match self.step {
            BookingStep::Confirming { date, slot } => {
                self.step = BookingStep::Submitting { date, slot };
                Ok(CreateAppointmentRequest::at(&self.doctor.id, date.and_time(slot.start())))
            }
            _ => Err(self.invalid("confirm")),
        }
    }

    /// Applies the outcome of the outstanding request. Ignored unless submitting.
    pub fn resolve(&mut self, outcome: Result<(), String>) -> bool {
        let BookingStep::Submitting { date, slot } = self.step else {
            return false;
        };
        self.step = match outcome {
            Ok(()) => BookingStep::Succeeded { date, slot },
            Err(message) => BookingStep::Failed { date, slot, message },
        };
        true
    }

    /// Failed bookings go back to the summary with the same parameters.
    pub fn retry(&mut self) -> Result<(), BookingError> {
        match self.step {
            BookingStep::Failed { date, slot, .. } => {
                self.step = BookingStep::Confirming { date, slot };
                Ok(())
            }
            _ => Err(self.invalid("retry")),
        }
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self.step, BookingStep::Submitting { .. })
    }

    pub fn can_close(&self) -> bool {
        !self.is_submitting()
    }

    pub fn controls_enabled(&self) -> bool {
        !self.is_submitting()
    }

    pub fn summary(&self) -> Option<BookingSummary> {
        let (date, slot) = match &self.step {
            BookingStep::Confirming { date, slot }
            | BookingStep::Submitting { date, slot }
            | BookingStep::Succeeded { date, slot }
            | BookingStep::Failed { date, slot, .. } => (*date, *slot),
            _ => return None,
        };
        Some(BookingSummary {
            doctor: self.doctor.name.clone(),
            specialization: self.doctor.specialization.clone(),
            date,
            time: slot.label(),
            duration_minutes: SLOT_MINUTES,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn smith() -> Doctor {
        Doctor {
            id: "d1".into(),
            name: "Smith".into(),
            specialization: "Cardiology".into(),
            photo_url: None,
        }
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn slots_cover_nine_to_five_hourly() {
        let labels: Vec<String> = available_slots().iter().map(TimeSlot::label).collect();
        assert_eq!(labels.first().map(String::as_str), Some("09:00"));
        assert_eq!(labels.last().map(String::as_str), Some("17:00"));
        assert_eq!(labels.len(), 9);
        assert_eq!(TimeSlot::parse("11:00"), TimeSlot::new(11));
        assert!(TimeSlot::parse("11:30").is_none());
        assert!(TimeSlot::parse("08:00").is_none());
        assert!(TimeSlot::new(18).is_none());
    }

    #[test]
    fn booking_smith_at_eleven_builds_utc_request() {
        let mut booking = BookingWorkflow::new(smith());
        booking.select_date(day(2025, 6, 10), day(2025, 6, 1)).unwrap();
        booking.select_slot(TimeSlot::parse("11:00").unwrap()).unwrap();
        let summary = booking.summary().unwrap();
        assert_eq!(summary.time, "11:00");
        assert_eq!(summary.duration_minutes, 30);

        let request = booking.confirm().unwrap();
        assert_eq!(request.doctor_id, "d1");
        assert_eq!(request.date, "2025-06-10T11:00:00.000Z");
        assert!(booking.is_submitting());
    }

    #[test]
    fn past_dates_are_refused_today_is_allowed() {
        let today = day(2025, 6, 10);
        let mut booking = BookingWorkflow::new(smith());
        assert_eq!(
            booking.select_date(day(2025, 6, 9), today),
            Err(BookingError::PastDate(day(2025, 6, 9)))
        );
        assert_eq!(booking.step(), &BookingStep::SelectingDate);
        booking.select_date(today, today).unwrap();
        assert_eq!(booking.step(), &BookingStep::SelectingTime { date: today });
    }

    #[test]
    fn only_one_request_in_flight() {
        let mut booking = BookingWorkflow::new(smith());
        booking.select_date(day(2025, 6, 10), day(2025, 6, 1)).unwrap();
        booking.select_slot(TimeSlot::new(9).unwrap()).unwrap();
        booking.confirm().unwrap();
        assert_eq!(booking.confirm(), Err(BookingError::AlreadySubmitting));
        assert_eq!(booking.back(), Err(BookingError::AlreadySubmitting));
        assert!(!booking.can_close());
        assert!(!booking.controls_enabled());
    }

    #[test]
    fn failure_allows_retry_with_same_parameters() {
        let mut booking = BookingWorkflow::new(smith());
        booking.select_date(day(2025, 6, 10), day(2025, 6, 1)).unwrap();
        booking.select_slot(TimeSlot::new(11).unwrap()).unwrap();
        let first = booking.confirm().unwrap();
        assert!(booking.resolve(Err("Doctor already booked".into())));
        assert!(booking.can_close());

        booking.retry().unwrap();
        let second = booking.confirm().unwrap();
        assert_eq!(first, second);
        assert!(booking.resolve(Ok(())));
        assert!(matches!(booking.step(), BookingStep::Succeeded { .. }));
        assert!(!booking.resolve(Ok(())));
    }

    #[test]
    fn back_walks_the_steps_in_reverse() {
        let date = day(2025, 6, 10);
        let mut booking = BookingWorkflow::new(smith());
        booking.select_date(date, date).unwrap();
        booking.select_slot(TimeSlot::new(10).unwrap()).unwrap();
        booking.back().unwrap();
        assert_eq!(booking.step(), &BookingStep::SelectingTime { date });
        booking.back().unwrap();
        assert_eq!(booking.step(), &BookingStep::SelectingDate);
        assert!(booking.back().is_err());
    }

    #[test]
    fn instances_have_distinct_ids() {
        assert_ne!(BookingWorkflow::new(smith()).id, BookingWorkflow::new(smith()).id);
        assert!(parse_date_input("2025-13-01").is_err());
        assert_eq!(parse_date_input(" 2025-06-10 "), Ok(day(2025, 6, 10)));
    }
}
