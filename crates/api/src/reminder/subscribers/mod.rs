use super::create_reminder::CreateReminderUseCase;
use super::schedule_notification::ScheduleNotificationUseCase;
use crate::shared::usecase::{execute, Subscriber};
use careercare_domain::{NotificationKind, Reminder};
use careercare_infra::CareerCareContext;
use tracing::{info, warn};

/// On creation, register one delayed job per notification the reminder
/// carries. A job that cannot be queued is not an error for the caller:
/// the polling fallback covers it.
pub struct ScheduleNotificationJobsOnReminderCreated;

#[async_trait::async_trait(?Send)]
impl Subscriber<CreateReminderUseCase> for ScheduleNotificationJobsOnReminderCreated {
    async fn notify(&self, reminder: &Reminder, ctx: &CareerCareContext) {
        schedule(ctx, reminder, NotificationKind::Main, reminder.reminder_date).await;
        if let Some(fire_at) = reminder.remind_before_fire_at() {
            schedule(ctx, reminder, NotificationKind::RemindBefore, fire_at).await;
        }
    }
}

async fn schedule(
    ctx: &CareerCareContext,
    reminder: &Reminder,
    kind: NotificationKind,
    fire_at: i64,
) {
    let usecase = ScheduleNotificationUseCase {
        reminder_id: reminder.id.clone(),
        kind,
        fire_at,
    };
    match execute(usecase, ctx).await {
        Ok(decision) if decision.queued => {
            info!("Reminder: {} {} notification job queued", reminder.id, kind)
        }
        Ok(decision) if decision.fallback_to_cron => info!(
            "Reminder: {} {} notification left to the polling fallback",
            reminder.id, kind
        ),
        Ok(_) => info!(
            "Reminder: {} {} notification fire time already passed, not queued",
            reminder.id, kind
        ),
        Err(e) => warn!(
            "Reminder: {} {} notification could not be queued: {:?}, the polling fallback will not cover it unless quota stays exceeded",
            reminder.id, kind, e
        ),
    }
}
