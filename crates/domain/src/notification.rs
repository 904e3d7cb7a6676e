use crate::shared::entity::ID;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Which of the two notifications of a `Reminder` a dispatch refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NotificationKind {
    /// The at-due-time delivery at `reminder_date`
    Main,
    /// The advance warning delivery `remind_before` ahead of `reminder_date`
    RemindBefore,
}

impl Display for NotificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Main => write!(f, "main"),
            Self::RemindBefore => write!(f, "remind-before"),
        }
    }
}

/// The unit of work handed to the delayed job queue: deliver one
/// notification kind for one reminder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationJob {
    pub reminder_id: ID,
    pub kind: NotificationKind,
}

/// Bounded retry with exponential backoff. Retries are kept small on
/// purpose: a late retry is only useful while it still lands reasonably
/// close to the original fire time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff_millis: i64,
}

impl RetryPolicy {
    pub fn main() -> Self {
        Self {
            max_attempts: 3,
            backoff_millis: 30 * 1000,
        }
    }

    pub fn remind_before() -> Self {
        Self {
            max_attempts: 1,
            backoff_millis: 0,
        }
    }

    /// Backoff before attempt number `attempt` (zero indexed), doubling
    /// per attempt
    pub fn backoff_for(&self, attempt: u32) -> i64 {
        self.backoff_millis << attempt.min(16)
    }
}

/// A `NotificationJob` as it lives on the delayed queue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueuedNotificationJob {
    /// Distinguishes requeued attempts of the same job on the backing store
    pub id: ID,
    pub job: NotificationJob,
    /// Timestamp in millis at which the job becomes due
    pub fire_at: i64,
    /// Number of already failed delivery attempts
    pub attempt: u32,
    pub retry: RetryPolicy,
}

impl QueuedNotificationJob {
    pub fn new(job: NotificationJob, fire_at: i64, retry: RetryPolicy) -> Self {
        Self {
            id: Default::default(),
            job,
            fire_at,
            attempt: 0,
            retry,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_doubles_per_attempt() {
        let retry = RetryPolicy::main();
        assert_eq!(retry.backoff_for(0), 30 * 1000);
        assert_eq!(retry.backoff_for(1), 60 * 1000);
        assert_eq!(retry.backoff_for(2), 120 * 1000);
    }
}
