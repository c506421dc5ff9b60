//! Email message domain model.
//!
//! # Responsibility
//! - Represent one candidate message pulled from the action-required folder.
//! - Carry the read/importance flags the conversion flow depends on.
//!
//! # Invariants
//! - `id` is the external message identifier and is never blank.
//! - `is_read` is local state and survives re-sync of the same message.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// External message identifier assigned by the mail source.
pub type EmailId = String;

/// Sender-declared importance of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Importance {
    Low,
    Normal,
    High,
}

impl Importance {
    /// Stable storage/wire token for this importance level.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Normal => "normal",
            Self::High => "high",
        }
    }

    /// Parses one storage/wire token.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "low" => Some(Self::Low),
            "normal" => Some(Self::Normal),
            "high" => Some(Self::High),
            _ => None,
        }
    }
}

/// Validation failures for email records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmailValidationError {
    /// External message id must not be blank.
    BlankId,
    /// Received timestamp must not be negative.
    NegativeReceivedAt(i64),
}

impl Display for EmailValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankId => write!(f, "email id must not be blank"),
            Self::NegativeReceivedAt(value) => {
                write!(f, "email received_at must not be negative, got {value}")
            }
        }
    }
}

impl Error for EmailValidationError {}

/// One message from the monitored mail folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailMessage {
    /// External message id from the mail source.
    pub id: EmailId,
    pub subject: String,
    /// Display name of the sender.
    pub from_name: String,
    /// Address of the sender.
    pub from_address: String,
    /// Receive timestamp in epoch milliseconds.
    pub received_at: i64,
    pub body: String,
    /// Local read flag, toggled when the user opens the message.
    pub is_read: bool,
    pub importance: Importance,
}

impl EmailMessage {
    /// Checks all record-level invariants.
    pub fn validate(&self) -> Result<(), EmailValidationError> {
        if self.id.trim().is_empty() {
            return Err(EmailValidationError::BlankId);
        }
        if self.received_at < 0 {
            return Err(EmailValidationError::NegativeReceivedAt(self.received_at));
        }
        Ok(())
    }

    /// Returns whether the message should appear under the `flagged` filter.
    pub fn is_flagged(&self) -> bool {
        self.importance == Importance::High
    }
}
