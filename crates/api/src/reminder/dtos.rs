use careercare_domain::{Reminder, ReminderStatus, ReminderType, RemindBefore, ID};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderDTO {
    pub id: ID,
    pub application_id: ID,
    #[serde(rename = "type")]
    pub reminder_type: ReminderType,
    pub reminder_date: i64,
    pub remind_before: RemindBefore,
    pub remind_before_sent: bool,
    pub status: ReminderStatus,
    pub message: String,
    pub created_at: i64,
    pub updated_at: i64,
}

impl ReminderDTO {
    pub fn new(reminder: &Reminder) -> Self {
        Self {
            id: reminder.id.clone(),
            application_id: reminder.application_id.clone(),
            reminder_type: reminder.reminder_type,
            reminder_date: reminder.reminder_date,
            remind_before: reminder.remind_before,
            remind_before_sent: reminder.remind_before_sent,
            status: reminder.status,
            message: reminder.message.clone(),
            created_at: reminder.created,
            updated_at: reminder.updated,
        }
    }
}
