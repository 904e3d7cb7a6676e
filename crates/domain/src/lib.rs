mod job_application;
mod notification;
mod reminder;
mod shared;
mod user;

pub use job_application::JobApplication;
pub use notification::{NotificationJob, NotificationKind, QueuedNotificationJob, RetryPolicy};
pub use reminder::{Reminder, ReminderStatus, ReminderType, RemindBefore};
pub use shared::entity::{Entity, InvalidIDError, ID};
pub use user::User;
