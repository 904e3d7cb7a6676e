mod brevo;
mod inmemory;

use careercare_domain::{NotificationKind, ReminderType, RemindBefore};
pub use brevo::BrevoMailerService;
pub use inmemory::InMemoryMailerService;

/// Everything the mail transport needs to word and address one reminder
/// notification. `kind` only changes the subject and body wording, never
/// the delivery mechanics.
#[derive(Debug, Clone, PartialEq)]
pub struct ReminderEmail {
    pub to: String,
    pub kind: NotificationKind,
    pub reminder_type: ReminderType,
    /// Timestamp in millis the reminder targets
    pub reminder_date: i64,
    pub remind_before: RemindBefore,
    pub job_title: String,
    pub company_name: String,
    pub message: String,
}

/// The notification transport. Fire and forget beyond success/failure,
/// each send is bounded by the underlying http client timeout.
#[async_trait::async_trait]
pub trait IMailerService: Send + Sync {
    async fn send_reminder(&self, email: &ReminderEmail) -> anyhow::Result<()>;
}
