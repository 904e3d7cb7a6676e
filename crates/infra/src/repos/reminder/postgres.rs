use super::IReminderRepo;
use careercare_domain::{Reminder, ReminderType, RemindBefore, ID};
use sqlx::{types::Uuid, FromRow, PgPool};
use std::convert::TryFrom;
use tracing::warn;

pub struct PostgresReminderRepo {
    pool: PgPool,
}

impl PostgresReminderRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct ReminderRaw {
    reminder_uid: Uuid,
    application_uid: Uuid,
    reminder_type: String,
    reminder_date: i64,
    remind_before: String,
    remind_before_sent: bool,
    status: String,
    message: String,
    created: i64,
    updated: i64,
}

impl TryFrom<ReminderRaw> for Reminder {
    type Error = anyhow::Error;

    fn try_from(raw: ReminderRaw) -> anyhow::Result<Self> {
        Ok(Reminder {
            id: raw.reminder_uid.into(),
            application_id: raw.application_uid.into(),
            reminder_type: raw.reminder_type.parse()?,
            reminder_date: raw.reminder_date,
            remind_before: raw.remind_before.parse()?,
            remind_before_sent: raw.remind_before_sent,
            status: raw.status.parse()?,
            message: raw.message,
            created: raw.created,
            updated: raw.updated,
        })
    }
}

fn into_reminders(raw: Vec<ReminderRaw>) -> Vec<Reminder> {
    raw.into_iter()
        .filter_map(|row| match Reminder::try_from(row) {
            Ok(reminder) => Some(reminder),
            Err(e) => {
                warn!("Skipping malformed reminder row: {:?}", e);
                None
            }
        })
        .collect()
}

#[async_trait::async_trait]
impl IReminderRepo for PostgresReminderRepo {
    async fn insert(&self, reminder: &Reminder) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO reminders
            (reminder_uid, application_uid, reminder_type, reminder_date, remind_before, remind_before_sent, status, message, created, updated)
            VALUES($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(reminder.id.inner_ref())
        .bind(reminder.application_id.inner_ref())
        .bind(reminder.reminder_type.as_str())
        .bind(reminder.reminder_date)
        .bind(reminder.remind_before.as_str())
        .bind(reminder.remind_before_sent)
        .bind(reminder.status.as_str())
        .bind(&reminder.message)
        .bind(reminder.created)
        .bind(reminder.updated)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find(&self, reminder_id: &ID) -> Option<Reminder> {
        sqlx::query_as::<_, ReminderRaw>(
            r#"
            SELECT * FROM reminders
            WHERE reminder_uid = $1
            "#,
        )
        .bind(reminder_id.inner_ref())
        .fetch_optional(&self.pool)
        .await
        .ok()
        .flatten()
        .and_then(|raw| Reminder::try_from(raw).ok())
    }

    async fn find_by_application(&self, application_id: &ID) -> Vec<Reminder> {
        let raw = sqlx::query_as::<_, ReminderRaw>(
            r#"
            SELECT * FROM reminders
            WHERE application_uid = $1
            ORDER BY reminder_date
            "#,
        )
        .bind(application_id.inner_ref())
        .fetch_all(&self.pool)
        .await
        .unwrap_or_default();
        into_reminders(raw)
    }

    async fn find_pending_by_application_and_type(
        &self,
        application_id: &ID,
        reminder_type: ReminderType,
    ) -> Option<Reminder> {
        sqlx::query_as::<_, ReminderRaw>(
            r#"
            SELECT * FROM reminders
            WHERE application_uid = $1 AND reminder_type = $2 AND status = 'pending'
            "#,
        )
        .bind(application_id.inner_ref())
        .bind(reminder_type.as_str())
        .fetch_optional(&self.pool)
        .await
        .ok()
        .flatten()
        .and_then(|raw| Reminder::try_from(raw).ok())
    }

    async fn find_main_due(&self, from: i64, to: i64, limit: usize) -> Vec<Reminder> {
        let raw = sqlx::query_as::<_, ReminderRaw>(
            r#"
            SELECT * FROM reminders
            WHERE status = 'pending' AND reminder_date >= $1 AND reminder_date <= $2
            ORDER BY reminder_date
            LIMIT $3
            "#,
        )
        .bind(from)
        .bind(to)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .unwrap_or_default();
        into_reminders(raw)
    }

    async fn find_remind_before_due(
        &self,
        remind_before: RemindBefore,
        from: i64,
        to: i64,
        limit: usize,
    ) -> Vec<Reminder> {
        let raw = sqlx::query_as::<_, ReminderRaw>(
            r#"
            SELECT * FROM reminders
            WHERE remind_before = $1 AND remind_before_sent = FALSE
              AND reminder_date >= $2 AND reminder_date <= $3
            ORDER BY reminder_date
            LIMIT $4
            "#,
        )
        .bind(remind_before.as_str())
        .bind(from)
        .bind(to)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .unwrap_or_default();
        into_reminders(raw)
    }

    async fn mark_sent(&self, reminder_id: &ID, updated: i64) -> anyhow::Result<bool> {
        let res = sqlx::query(
            r#"
            UPDATE reminders
            SET status = 'sent', updated = $2
            WHERE reminder_uid = $1 AND status = 'pending'
            "#,
        )
        .bind(reminder_id.inner_ref())
        .bind(updated)
        .execute(&self.pool)
        .await?;
        Ok(res.rows_affected() == 1)
    }

    async fn mark_remind_before_sent(
        &self,
        reminder_id: &ID,
        updated: i64,
    ) -> anyhow::Result<bool> {
        let res = sqlx::query(
            r#"
            UPDATE reminders
            SET remind_before_sent = TRUE, updated = $2
            WHERE reminder_uid = $1 AND status = 'pending' AND remind_before_sent = FALSE
            "#,
        )
        .bind(reminder_id.inner_ref())
        .bind(updated)
        .execute(&self.pool)
        .await?;
        Ok(res.rows_affected() == 1)
    }

    async fn cancel(&self, reminder_id: &ID, updated: i64) -> anyhow::Result<bool> {
        let res = sqlx::query(
            r#"
            UPDATE reminders
            SET status = 'cancelled', updated = $2
            WHERE reminder_uid = $1 AND status = 'pending'
            "#,
        )
        .bind(reminder_id.inner_ref())
        .bind(updated)
        .execute(&self.pool)
        .await?;
        Ok(res.rows_affected() == 1)
    }
}
