//! User settings record.
//!
//! # Responsibility
//! - Hold the tunable knobs the conversion and briefing flows read.
//!
//! # Invariants
//! - Exactly one settings row exists per database.
//! - `sync_interval_minutes` is at least one.

use crate::model::task::Priority;
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Folder name monitored when no explicit configuration exists.
pub const DEFAULT_ACTION_REQUIRED_FOLDER: &str = "Action Required";

/// Validation failures for the settings record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsValidationError {
    /// Sync interval must be at least one minute.
    ZeroSyncInterval,
    /// Monitored folder name must not be blank.
    BlankFolderName,
}

impl Display for SettingsValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ZeroSyncInterval => {
                write!(f, "sync_interval_minutes must be at least 1")
            }
            Self::BlankFolderName => {
                write!(f, "action_required_folder must not be blank")
            }
        }
    }
}

impl Error for SettingsValidationError {}

/// Persisted user preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Whether the daily hot-task briefing is shown.
    pub daily_notification_enabled: bool,
    /// Time of day for the daily briefing.
    pub notification_time: NaiveTime,
    /// Mailbox poll interval in minutes.
    pub sync_interval_minutes: u32,
    /// Priority assigned to converted tasks from non-urgent mail.
    pub default_priority: Priority,
    /// Name of the mail folder polled for candidate messages.
    pub action_required_folder: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            daily_notification_enabled: true,
            notification_time: NaiveTime::from_hms_opt(9, 0, 0)
                .unwrap_or(NaiveTime::MIN),
            sync_interval_minutes: 15,
            default_priority: Priority::Medium,
            action_required_folder: DEFAULT_ACTION_REQUIRED_FOLDER.to_string(),
        }
    }
}

impl Settings {
    /// Checks all record-level invariants.
    pub fn validate(&self) -> Result<(), SettingsValidationError> {
        if self.sync_interval_minutes == 0 {
            return Err(SettingsValidationError::ZeroSyncInterval);
        }
        if self.action_required_folder.trim().is_empty() {
            return Err(SettingsValidationError::BlankFolderName);
        }
        Ok(())
    }
}
