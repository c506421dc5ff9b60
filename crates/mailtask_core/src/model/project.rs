//! Project and milestone domain model.
//!
//! # Responsibility
//! - Represent a named grouping of tasks with an optional schedule window.
//! - Carry the ordered milestone list edited as one unit by callers.
//!
//! # Invariants
//! - `end_date` is never earlier than `start_date` when both are set.
//! - Milestone names are never blank.
//! - Deleting a project detaches referencing tasks instead of deleting them.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for a project.
pub type ProjectId = Uuid;

/// Stable identifier for a milestone.
pub type MilestoneId = Uuid;

/// Well-known deadline categories used in delivery workflows.
///
/// `Custom` milestones carry a free-form name; typed milestones render their
/// code as the name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DeadlineType {
    Ifp,
    Ifc,
    Ifr,
    Ifa,
    Ifb,
    Ifd,
    Ifi,
    Afc,
    Final,
    Milestone,
    Review,
    Approval,
    #[serde(rename = "custom")]
    Custom,
}

impl DeadlineType {
    /// Stable storage/wire code for this deadline type.
    pub fn code(self) -> &'static str {
        match self {
            Self::Ifp => "IFP",
            Self::Ifc => "IFC",
            Self::Ifr => "IFR",
            Self::Ifa => "IFA",
            Self::Ifb => "IFB",
            Self::Ifd => "IFD",
            Self::Ifi => "IFI",
            Self::Afc => "AFC",
            Self::Final => "FINAL",
            Self::Milestone => "MILESTONE",
            Self::Review => "REVIEW",
            Self::Approval => "APPROVAL",
            Self::Custom => "custom",
        }
    }

    /// Human-readable label shown in pickers and listings.
    pub fn label(self) -> &'static str {
        match self {
            Self::Ifp => "Issued for Pricing",
            Self::Ifc => "Issued for Construction",
            Self::Ifr => "Issued for Review",
            Self::Ifa => "Issued for Approval",
            Self::Ifb => "Issued for Bid",
            Self::Ifd => "Issued for Design",
            Self::Ifi => "Issued for Information",
            Self::Afc => "Approved for Construction",
            Self::Final => "Final Submission",
            Self::Milestone => "Project Milestone",
            Self::Review => "Review Deadline",
            Self::Approval => "Approval Deadline",
            Self::Custom => "Custom",
        }
    }

    /// Parses one storage/wire code.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "IFP" => Some(Self::Ifp),
            "IFC" => Some(Self::Ifc),
            "IFR" => Some(Self::Ifr),
            "IFA" => Some(Self::Ifa),
            "IFB" => Some(Self::Ifb),
            "IFD" => Some(Self::Ifd),
            "IFI" => Some(Self::Ifi),
            "AFC" => Some(Self::Afc),
            "FINAL" => Some(Self::Final),
            "MILESTONE" => Some(Self::Milestone),
            "REVIEW" => Some(Self::Review),
            "APPROVAL" => Some(Self::Approval),
            "custom" => Some(Self::Custom),
            _ => None,
        }
    }
}

/// Dated sub-deadline attached to a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Milestone {
    pub uuid: MilestoneId,
    pub name: String,
    pub deadline_type: DeadlineType,
    pub date: NaiveDate,
    pub completed: bool,
}

impl Milestone {
    /// Creates a milestone with a generated stable ID.
    ///
    /// Typed milestones take their name from the deadline-type code.
    pub fn new(deadline_type: DeadlineType, name: impl Into<String>, date: NaiveDate) -> Self {
        let name = match deadline_type {
            DeadlineType::Custom => name.into(),
            typed => typed.code().to_string(),
        };
        Self {
            uuid: Uuid::new_v4(),
            name,
            deadline_type,
            date,
            completed: false,
        }
    }
}

/// Validation failures for project records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectValidationError {
    /// Nil UUID would break stable-identity guarantees.
    NilUuid,
    /// Project name must contain at least one non-whitespace character.
    BlankName,
    /// Color must be a `#RRGGBB` hex value.
    InvalidColor(String),
    /// Schedule end precedes schedule start.
    InvalidScheduleWindow { start: NaiveDate, end: NaiveDate },
    /// Milestone has a nil UUID.
    NilMilestoneUuid,
    /// Milestone name must not be blank.
    BlankMilestoneName,
}

impl Display for ProjectValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NilUuid => write!(f, "project uuid must not be nil"),
            Self::BlankName => write!(f, "project name must not be blank"),
            Self::InvalidColor(value) => {
                write!(f, "project color must be #RRGGBB, got `{value}`")
            }
            Self::InvalidScheduleWindow { start, end } => {
                write!(f, "end_date ({end}) must be >= start_date ({start})")
            }
            Self::NilMilestoneUuid => write!(f, "milestone uuid must not be nil"),
            Self::BlankMilestoneName => write!(f, "milestone name must not be blank"),
        }
    }
}

impl Error for ProjectValidationError {}

/// Named grouping of tasks with an optional schedule window and milestones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    /// Stable global ID used for task links.
    pub uuid: ProjectId,
    pub name: String,
    pub description: String,
    /// Display color as `#RRGGBB`.
    pub color: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    /// Hard project deadline, independent of the schedule window.
    pub deadline: Option<NaiveDate>,
    /// Creation timestamp in epoch milliseconds.
    pub created_at: i64,
    /// Ordered milestone list, replaced as one unit on update.
    pub milestones: Vec<Milestone>,
}

impl Project {
    /// Creates a project with a generated stable ID and no schedule.
    pub fn new(name: impl Into<String>, color: impl Into<String>, created_at: i64) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            name: name.into(),
            description: String::new(),
            color: color.into(),
            start_date: None,
            end_date: None,
            deadline: None,
            created_at,
            milestones: Vec::new(),
        }
    }

    /// Checks all record-level invariants, milestones included.
    pub fn validate(&self) -> Result<(), ProjectValidationError> {
        if self.uuid.is_nil() {
            return Err(ProjectValidationError::NilUuid);
        }
        if self.name.trim().is_empty() {
            return Err(ProjectValidationError::BlankName);
        }
        if !is_hex_color(&self.color) {
            return Err(ProjectValidationError::InvalidColor(self.color.clone()));
        }
        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            if end < start {
                return Err(ProjectValidationError::InvalidScheduleWindow { start, end });
            }
        }
        for milestone in &self.milestones {
            if milestone.uuid.is_nil() {
                return Err(ProjectValidationError::NilMilestoneUuid);
            }
            if milestone.name.trim().is_empty() {
                return Err(ProjectValidationError::BlankMilestoneName);
            }
        }
        Ok(())
    }
}

fn is_hex_color(value: &str) -> bool {
    let mut chars = value.chars();
    if chars.next() != Some('#') {
        return false;
    }
    let digits: Vec<char> = chars.collect();
    digits.len() == 6 && digits.iter().all(char::is_ascii_hexdigit)
}

#[cfg(test)]
mod tests {
    use super::{is_hex_color, DeadlineType, Milestone, Project, ProjectValidationError};
    use chrono::NaiveDate;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn typed_milestone_takes_code_as_name() {
        let milestone = Milestone::new(DeadlineType::Ifr, "ignored", day(2026, 9, 1));
        assert_eq!(milestone.name, "IFR");

        let custom = Milestone::new(DeadlineType::Custom, "Kickoff", day(2026, 9, 1));
        assert_eq!(custom.name, "Kickoff");
    }

    #[test]
    fn deadline_type_codes_and_labels_roundtrip() {
        for deadline_type in [
            DeadlineType::Ifp,
            DeadlineType::Afc,
            DeadlineType::Final,
            DeadlineType::Review,
            DeadlineType::Custom,
        ] {
            assert_eq!(DeadlineType::parse(deadline_type.code()), Some(deadline_type));
            assert!(!deadline_type.label().is_empty());
        }
        assert_eq!(DeadlineType::Ifr.label(), "Issued for Review");
        assert_eq!(DeadlineType::parse("bogus"), None);
    }

    #[test]
    fn reversed_schedule_window_is_rejected() {
        let mut project = Project::new("Launch", "#007AFF", 0);
        project.start_date = Some(day(2026, 9, 10));
        project.end_date = Some(day(2026, 9, 1));

        let err = project.validate().unwrap_err();
        assert_eq!(
            err,
            ProjectValidationError::InvalidScheduleWindow {
                start: day(2026, 9, 10),
                end: day(2026, 9, 1),
            }
        );
    }

    #[test]
    fn hex_color_check() {
        assert!(is_hex_color("#007AFF"));
        assert!(!is_hex_color("007AFF"));
        assert!(!is_hex_color("#07AFF"));
        assert!(!is_hex_color("#00ZAFF"));
    }
}
