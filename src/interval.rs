//! Shift duration from a date and a pair of punches.

use chrono::{NaiveDate, NaiveTime};

use crate::config::OvernightPolicy;

const SECONDS_PER_DAY: i64 = 24 * 60 * 60;

/// Classification of a single attendance record's interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntervalStatus {
    /// Both punches present, check-out not before check-in.
    Valid,
    /// Check-out earlier than check-in, moved to the next day.
    Wrapped,
    /// A punch is missing.
    MissingPunch,
    /// Check-out earlier than check-in and rejected.
    Malformed,
}

impl IntervalStatus {
    /// Value stored in `attendance.interval_status`. Aggregates include
    /// `valid` and `wrapped` rows only.
    pub fn as_str(&self) -> &'static str {
        match self {
            IntervalStatus::Valid => "valid",
            IntervalStatus::Wrapped => "wrapped",
            IntervalStatus::MissingPunch => "missing_punch",
            IntervalStatus::Malformed => "malformed",
        }
    }
}

/// A resolved interval: status plus worked seconds when the shift counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    pub status: IntervalStatus,
    pub seconds: Option<i64>,
}

impl Interval {
    /// Resolve the worked duration of a shift on `date`.
    ///
    /// The duration is measured between full timestamps so that a wrapped
    /// check-out lands on `date + 1`.
    pub fn resolve(
        date: NaiveDate,
        check_in: Option<NaiveTime>,
        check_out: Option<NaiveTime>,
        policy: OvernightPolicy,
    ) -> Self {
        let (Some(check_in), Some(check_out)) = (check_in, check_out) else {
            return Self {
                status: IntervalStatus::MissingPunch,
                seconds: None,
            };
        };

        let start = date.and_time(check_in);
        let end = date.and_time(check_out);
        let seconds = (end - start).num_seconds();
        if seconds >= 0 {
            return Self {
                status: IntervalStatus::Valid,
                seconds: Some(seconds),
            };
        }

        match policy {
            OvernightPolicy::Reject => Self {
                status: IntervalStatus::Malformed,
                seconds: None,
            },
            OvernightPolicy::Wrap => Self {
                status: IntervalStatus::Wrapped,
                seconds: Some(seconds + SECONDS_PER_DAY),
            },
        }
    }
}
