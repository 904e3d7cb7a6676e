mod inmemory;
mod postgres;

use careercare_domain::{Reminder, ReminderType, RemindBefore, ID};
pub use inmemory::InMemoryReminderRepo;
pub use postgres::PostgresReminderRepo;

/// Persistence for the `Reminder` state machine. The three transition
/// methods are conditional writes: they only apply while the reminder is
/// still `pending` (and, for the early flag, while it is unset) and report
/// whether anything changed, so a lost race shows up as `false` instead of
/// an illegal transition.
#[async_trait::async_trait]
pub trait IReminderRepo: Send + Sync {
    async fn insert(&self, reminder: &Reminder) -> anyhow::Result<()>;
    async fn find(&self, reminder_id: &ID) -> Option<Reminder>;
    async fn find_by_application(&self, application_id: &ID) -> Vec<Reminder>;
    async fn find_pending_by_application_and_type(
        &self,
        application_id: &ID,
        reminder_type: ReminderType,
    ) -> Option<Reminder>;
    /// Pending reminders whose `reminder_date` lies in `[from, to]`
    async fn find_main_due(&self, from: i64, to: i64, limit: usize) -> Vec<Reminder>;
    /// Reminders with the given offset, an unsent early notification and a
    /// `reminder_date` in `[from, to]`
    async fn find_remind_before_due(
        &self,
        remind_before: RemindBefore,
        from: i64,
        to: i64,
        limit: usize,
    ) -> Vec<Reminder>;
    /// `pending -> sent`
    async fn mark_sent(&self, reminder_id: &ID, updated: i64) -> anyhow::Result<bool>;
    /// `remind_before_sent: false -> true`, only while `pending`
    async fn mark_remind_before_sent(&self, reminder_id: &ID, updated: i64)
        -> anyhow::Result<bool>;
    /// `pending -> cancelled`
    async fn cancel(&self, reminder_id: &ID, updated: i64) -> anyhow::Result<bool>;
}
