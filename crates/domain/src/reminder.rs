use crate::shared::entity::{Entity, ID};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;
use thiserror::Error;

/// Semantic category of a `Reminder`. It only affects the wording of the
/// notification, never how delivery is scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReminderType {
    Interview,
    FollowUp,
    Deadline,
}

impl ReminderType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Interview => "interview",
            Self::FollowUp => "follow-up",
            Self::Deadline => "deadline",
        }
    }

    /// Human readable label used in notification subjects, e.g. "Follow up"
    pub fn label(&self) -> &'static str {
        match self {
            Self::Interview => "Interview",
            Self::FollowUp => "Follow up",
            Self::Deadline => "Deadline",
        }
    }
}

impl Display for ReminderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Error, Debug)]
pub enum InvalidReminderTypeError {
    #[error("Invalid reminder type: {0}")]
    Malformed(String),
}

impl FromStr for ReminderType {
    type Err = InvalidReminderTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "interview" => Ok(Self::Interview),
            "follow-up" => Ok(Self::FollowUp),
            "deadline" => Ok(Self::Deadline),
            _ => Err(InvalidReminderTypeError::Malformed(s.to_string())),
        }
    }
}

/// Offset before `reminder_date` at which an optional early notification
/// fires. `None` means no early notification is scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RemindBefore {
    #[serde(rename = "15m")]
    Min15,
    #[serde(rename = "30m")]
    Min30,
    #[serde(rename = "1h")]
    Hour1,
    #[serde(rename = "2h")]
    Hour2,
    #[serde(rename = "none")]
    None,
}

impl RemindBefore {
    /// Every offset that can actually fire an early notification
    pub const OFFSETS: [RemindBefore; 4] = [Self::Min15, Self::Min30, Self::Hour1, Self::Hour2];

    pub fn delta_millis(&self) -> i64 {
        match self {
            Self::Min15 => 15 * 60 * 1000,
            Self::Min30 => 30 * 60 * 1000,
            Self::Hour1 => 60 * 60 * 1000,
            Self::Hour2 => 2 * 60 * 60 * 1000,
            Self::None => 0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Min15 => "15m",
            Self::Min30 => "30m",
            Self::Hour1 => "1h",
            Self::Hour2 => "2h",
            Self::None => "none",
        }
    }

    /// Label used in the early notification wording, e.g. "30 minutes"
    pub fn label(&self) -> &'static str {
        match self {
            Self::Min15 => "15 minutes",
            Self::Min30 => "30 minutes",
            Self::Hour1 => "1 hour",
            Self::Hour2 => "2 hours",
            Self::None => "none",
        }
    }
}

impl Display for RemindBefore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Error, Debug)]
pub enum InvalidRemindBeforeError {
    #[error("Invalid remind before value: {0}")]
    Malformed(String),
}

impl FromStr for RemindBefore {
    type Err = InvalidRemindBeforeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "15m" => Ok(Self::Min15),
            "30m" => Ok(Self::Min30),
            "1h" => Ok(Self::Hour1),
            "2h" => Ok(Self::Hour2),
            "none" => Ok(Self::None),
            _ => Err(InvalidRemindBeforeError::Malformed(s.to_string())),
        }
    }
}

/// State machine for the main notification of a `Reminder`.
/// `Sent` and `Cancelled` are both terminal with respect to delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReminderStatus {
    Pending,
    Sent,
    Cancelled,
}

impl ReminderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Sent => "sent",
            Self::Cancelled => "cancelled",
        }
    }
}

impl Display for ReminderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Error, Debug)]
pub enum InvalidReminderStatusError {
    #[error("Invalid reminder status: {0}")]
    Malformed(String),
}

impl FromStr for ReminderStatus {
    type Err = InvalidReminderStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "sent" => Ok(Self::Sent),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(InvalidReminderStatusError::Malformed(s.to_string())),
        }
    }
}

/// A `Reminder` is one scheduled notification set for a `JobApplication`
/// event: a main notification at `reminder_date` and optionally an early
/// one `remind_before` ahead of it. The two delivery flags are independent:
/// `status` tracks the main notification, `remind_before_sent` the early one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reminder {
    pub id: ID,
    /// The `JobApplication` this `Reminder` belongs to
    pub application_id: ID,
    pub reminder_type: ReminderType,
    /// Timestamp in millis the main notification targets
    pub reminder_date: i64,
    pub remind_before: RemindBefore,
    /// True once the early notification has been delivered
    pub remind_before_sent: bool,
    pub status: ReminderStatus,
    /// Free text annotation included in the notification body
    pub message: String,
    pub created: i64,
    pub updated: i64,
}

impl Reminder {
    pub fn new(
        application_id: ID,
        reminder_type: ReminderType,
        reminder_date: i64,
        remind_before: RemindBefore,
        message: String,
        now: i64,
    ) -> Self {
        Self {
            id: Default::default(),
            application_id,
            reminder_type,
            reminder_date,
            remind_before,
            remind_before_sent: false,
            status: ReminderStatus::Pending,
            message,
            created: now,
            updated: now,
        }
    }

    /// Timestamp at which the early notification should fire, if one is
    /// configured at all
    pub fn remind_before_fire_at(&self) -> Option<i64> {
        match self.remind_before {
            RemindBefore::None => None,
            offset => Some(self.reminder_date - offset.delta_millis()),
        }
    }
}

impl Entity<ID> for Reminder {
    fn id(&self) -> ID {
        self.id.clone()
    }
}
