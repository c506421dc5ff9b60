//! Meeting domain model.
//!
//! # Responsibility
//! - Represent one same-day calendar block consumed by the available-hours
//!   view.
//!
//! # Invariants
//! - `end_time` is strictly after `start_time`.

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for a meeting.
pub type MeetingId = Uuid;

/// Validation failures for meeting records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MeetingValidationError {
    /// Nil UUID would break stable-identity guarantees.
    NilUuid,
    /// Title must contain at least one non-whitespace character.
    BlankTitle,
    /// End does not come after start.
    InvalidTimeWindow { start: NaiveTime, end: NaiveTime },
}

impl Display for MeetingValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NilUuid => write!(f, "meeting uuid must not be nil"),
            Self::BlankTitle => write!(f, "meeting title must not be blank"),
            Self::InvalidTimeWindow { start, end } => {
                write!(f, "end_time ({end}) must be after start_time ({start})")
            }
        }
    }
}

impl Error for MeetingValidationError {}

/// One same-day calendar block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meeting {
    pub uuid: MeetingId,
    pub title: String,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

impl Meeting {
    /// Creates a meeting with a generated stable ID.
    pub fn new(title: impl Into<String>, start_time: NaiveTime, end_time: NaiveTime) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            title: title.into(),
            start_time,
            end_time,
        }
    }

    /// Checks all record-level invariants.
    pub fn validate(&self) -> Result<(), MeetingValidationError> {
        if self.uuid.is_nil() {
            return Err(MeetingValidationError::NilUuid);
        }
        if self.title.trim().is_empty() {
            return Err(MeetingValidationError::BlankTitle);
        }
        if self.end_time <= self.start_time {
            return Err(MeetingValidationError::InvalidTimeWindow {
                start: self.start_time,
                end: self.end_time,
            });
        }
        Ok(())
    }

    /// Start offset in minutes from midnight.
    pub fn start_minutes(&self) -> u32 {
        self.start_time.hour() * 60 + self.start_time.minute()
    }

    /// End offset in minutes from midnight.
    pub fn end_minutes(&self) -> u32 {
        self.end_time.hour() * 60 + self.end_time.minute()
    }
}
