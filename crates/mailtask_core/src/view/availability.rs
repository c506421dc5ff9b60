//! Available-hours computation for the working day.
//!
//! # Responsibility
//! - Split the 07:00-15:00 working day into half-hour rows and mark which
//!   parts are taken by meetings.
//!
//! # Invariants
//! - Segments inside one row never overlap and are ordered left to right.
//! - Available plus meeting minutes per row never exceed the slot length.

use crate::model::meeting::Meeting;

/// Working day starts at 07:00.
pub const WORKDAY_START_HOUR: u32 = 7;

/// Working day ends at 15:00.
pub const WORKDAY_END_HOUR: u32 = 15;

/// Row granularity in minutes.
pub const SLOT_MINUTES: u32 = 30;

/// What one segment of a row is used for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SegmentKind {
    Available,
    Meeting { title: String },
}

/// One contiguous span inside a half-hour row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotSegment {
    /// Offset from the row start, minutes.
    pub offset_minutes: u32,
    pub length_minutes: u32,
    pub kind: SegmentKind,
}

/// One half-hour row of the working day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotRow {
    /// Row start in minutes from midnight.
    pub start_minute: u32,
    /// Display label, e.g. `7:30 AM`.
    pub label: String,
    pub segments: Vec<SlotSegment>,
}

/// Full availability picture for one working day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DaySchedule {
    pub rows: Vec<SlotRow>,
    pub available_minutes: u32,
    pub meeting_minutes: u32,
}

impl DaySchedule {
    /// Available time in fractional hours.
    pub fn available_hours(&self) -> f64 {
        f64::from(self.available_minutes) / 60.0
    }

    /// Meeting time in fractional hours.
    pub fn meeting_hours(&self) -> f64 {
        f64::from(self.meeting_minutes) / 60.0
    }
}

/// Computes the half-hour availability rows for the working day.
///
/// Meetings outside 07:00-15:00 are clipped to the window; overlapping
/// meetings never double-book a span.
pub fn day_schedule(meetings: &[Meeting]) -> DaySchedule {
    let mut rows = Vec::new();
    let mut available_minutes = 0;
    let mut meeting_minutes = 0;

    let day_start = WORKDAY_START_HOUR * 60;
    let day_end = WORKDAY_END_HOUR * 60;

    let mut slot_start = day_start;
    while slot_start < day_end {
        let slot_end = slot_start + SLOT_MINUTES;

        // Meetings clipped to this row, ordered by clipped start.
        let mut overlapping: Vec<(u32, u32, &Meeting)> = meetings
            .iter()
            .filter(|meeting| {
                meeting.start_minutes() < slot_end && meeting.end_minutes() > slot_start
            })
            .map(|meeting| {
                let from = meeting.start_minutes().max(slot_start) - slot_start;
                let to = meeting.end_minutes().min(slot_end) - slot_start;
                (from, to, meeting)
            })
            .collect();
        overlapping.sort_by_key(|(from, to, meeting)| (*from, *to, meeting.uuid));

        let mut segments = Vec::new();
        let mut cursor = 0;

        for (from, to, meeting) in overlapping {
            if from > cursor {
                segments.push(SlotSegment {
                    offset_minutes: cursor,
                    length_minutes: from - cursor,
                    kind: SegmentKind::Available,
                });
                available_minutes += from - cursor;
            }

            let begin = from.max(cursor);
            if to <= begin {
                continue;
            }
            segments.push(SlotSegment {
                offset_minutes: begin,
                length_minutes: to - begin,
                kind: SegmentKind::Meeting {
                    title: meeting.title.clone(),
                },
            });
            meeting_minutes += to - begin;
            cursor = to;
        }

        if cursor < SLOT_MINUTES {
            segments.push(SlotSegment {
                offset_minutes: cursor,
                length_minutes: SLOT_MINUTES - cursor,
                kind: SegmentKind::Available,
            });
            available_minutes += SLOT_MINUTES - cursor;
        }

        rows.push(SlotRow {
            start_minute: slot_start,
            label: slot_label(slot_start),
            segments,
        });

        slot_start = slot_end;
    }

    DaySchedule {
        rows,
        available_minutes,
        meeting_minutes,
    }
}

/// Formats a minute-of-day as a 12-hour label, e.g. `7:30 AM`.
pub fn slot_label(minute_of_day: u32) -> String {
    let hour = minute_of_day / 60;
    let minute = minute_of_day % 60;
    let suffix = if hour < 12 { "AM" } else { "PM" };
    let display_hour = match hour % 12 {
        0 => 12,
        other => other,
    };
    format!("{display_hour}:{minute:02} {suffix}")
}
