use super::IReminderRepo;
use crate::repos::shared::inmemory_repo::*;
use careercare_domain::{Reminder, ReminderStatus, ReminderType, RemindBefore, ID};
use std::sync::Mutex;

pub struct InMemoryReminderRepo {
    reminders: Mutex<Vec<Reminder>>,
}

impl InMemoryReminderRepo {
    pub fn new() -> Self {
        Self {
            reminders: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait::async_trait]
impl IReminderRepo for InMemoryReminderRepo {
    async fn insert(&self, reminder: &Reminder) -> anyhow::Result<()> {
        insert(reminder, &self.reminders);
        Ok(())
    }

    async fn find(&self, reminder_id: &ID) -> Option<Reminder> {
        find(reminder_id, &self.reminders)
    }

    async fn find_by_application(&self, application_id: &ID) -> Vec<Reminder> {
        find_by(&self.reminders, |r| &r.application_id == application_id)
    }

    async fn find_pending_by_application_and_type(
        &self,
        application_id: &ID,
        reminder_type: ReminderType,
    ) -> Option<Reminder> {
        find_by(&self.reminders, |r| {
            &r.application_id == application_id
                && r.reminder_type == reminder_type
                && r.status == ReminderStatus::Pending
        })
        .into_iter()
        .next()
    }

    async fn find_main_due(&self, from: i64, to: i64, limit: usize) -> Vec<Reminder> {
        let mut due = find_by(&self.reminders, |r| {
            r.status == ReminderStatus::Pending && r.reminder_date >= from && r.reminder_date <= to
        });
        due.truncate(limit);
        due
    }

    async fn find_remind_before_due(
        &self,
        remind_before: RemindBefore,
        from: i64,
        to: i64,
        limit: usize,
    ) -> Vec<Reminder> {
        let mut due = find_by(&self.reminders, |r| {
            r.remind_before == remind_before
                && !r.remind_before_sent
                && r.reminder_date >= from
                && r.reminder_date <= to
        });
        due.truncate(limit);
        due
    }

    async fn mark_sent(&self, reminder_id: &ID, updated: i64) -> anyhow::Result<bool> {
        Ok(update_if(
            reminder_id,
            &self.reminders,
            |r| r.status == ReminderStatus::Pending,
            |r| {
                r.status = ReminderStatus::Sent;
                r.updated = updated;
            },
        ))
    }

    async fn mark_remind_before_sent(
        &self,
        reminder_id: &ID,
        updated: i64,
    ) -> anyhow::Result<bool> {
        Ok(update_if(
            reminder_id,
            &self.reminders,
            |r| r.status == ReminderStatus::Pending && !r.remind_before_sent,
            |r| {
                r.remind_before_sent = true;
                r.updated = updated;
            },
        ))
    }

    async fn cancel(&self, reminder_id: &ID, updated: i64) -> anyhow::Result<bool> {
        Ok(update_if(
            reminder_id,
            &self.reminders,
            |r| r.status == ReminderStatus::Pending,
            |r| {
                r.status = ReminderStatus::Cancelled;
                r.updated = updated;
            },
        ))
    }
}
