use crate::shared::usecase::UseCase;
use careercare_domain::{NotificationKind, ReminderStatus, ID};
use careercare_infra::{CareerCareContext, ReminderEmail};
use tracing::{error, info, warn};

/// Sends one notification for one reminder and commits the matching
/// delivery flag. Safe to call any number of times for the same
/// `(reminder_id, kind)` pair: every terminal or already-handled state
/// short-circuits before the transport is touched.
#[derive(Debug)]
pub struct DispatchNotificationUseCase {
    pub reminder_id: ID,
    pub kind: NotificationKind,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DispatchOutcome {
    Sent,
    Skipped(SkipReason),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SkipReason {
    ReminderNotFound,
    Cancelled,
    AlreadySent,
    ApplicationNotFound,
    UserNotFound,
}

#[derive(Debug)]
pub enum UseCaseError {
    SendFailed,
}

#[async_trait::async_trait(?Send)]
impl UseCase for DispatchNotificationUseCase {
    type Response = DispatchOutcome;

    type Error = UseCaseError;

    const NAME: &'static str = "DispatchNotification";

    async fn execute(&mut self, ctx: &CareerCareContext) -> Result<Self::Response, Self::Error> {
        let reminder = match ctx.repos.reminders.find(&self.reminder_id).await {
            Some(reminder) => reminder,
            None => {
                // The owning application may have been deleted with its
                // reminders cascading after the job was enqueued
                warn!("Reminder: {} not found, skipping dispatch", self.reminder_id);
                return Ok(DispatchOutcome::Skipped(SkipReason::ReminderNotFound));
            }
        };

        if reminder.status == ReminderStatus::Cancelled {
            info!("Reminder: {} was cancelled, skipping", reminder.id);
            return Ok(DispatchOutcome::Skipped(SkipReason::Cancelled));
        }

        // Guards against duplicate delivery from overlapping queue and
        // fallback windows
        let already_sent = match self.kind {
            NotificationKind::RemindBefore => reminder.remind_before_sent,
            NotificationKind::Main => reminder.status == ReminderStatus::Sent,
        };
        if already_sent {
            info!(
                "Reminder: {} {} notification already sent, skipping",
                reminder.id, self.kind
            );
            return Ok(DispatchOutcome::Skipped(SkipReason::AlreadySent));
        }

        let application = match ctx.repos.applications.find(&reminder.application_id).await {
            Some(application) => application,
            None => {
                error!("Job application not found for reminder: {}", reminder.id);
                return Ok(DispatchOutcome::Skipped(SkipReason::ApplicationNotFound));
            }
        };
        let user = match ctx.repos.users.find(&application.user_id).await {
            Some(user) => user,
            None => {
                error!("User email not found for reminder: {}", reminder.id);
                return Ok(DispatchOutcome::Skipped(SkipReason::UserNotFound));
            }
        };

        let email = ReminderEmail {
            to: user.email,
            kind: self.kind,
            reminder_type: reminder.reminder_type,
            reminder_date: reminder.reminder_date,
            remind_before: reminder.remind_before,
            job_title: application.job_title,
            company_name: application.company_name,
            message: reminder.message.clone(),
        };
        if let Err(e) = ctx.mailer.send_reminder(&email).await {
            error!("Failed to send reminder: {} notification: {:?}", reminder.id, e);
            return Err(UseCaseError::SendFailed);
        }

        // The sole commit of delivery. Losing it after a successful send
        // leaves a delivered-but-unmarked reminder, which is an accepted
        // inconsistency: a later duplicate beats a silently dropped send.
        let now = ctx.sys.get_timestamp_millis();
        let committed = match self.kind {
            NotificationKind::RemindBefore => {
                ctx.repos
                    .reminders
                    .mark_remind_before_sent(&reminder.id, now)
                    .await
            }
            NotificationKind::Main => ctx.repos.reminders.mark_sent(&reminder.id, now).await,
        };
        match committed {
            Ok(true) => info!(
                "Reminder: {} {} notification sent successfully",
                reminder.id, self.kind
            ),
            Ok(false) => warn!(
                "Reminder: {} {} notification delivered but was already marked by a concurrent dispatch",
                reminder.id, self.kind
            ),
            Err(e) => error!(
                "Reminder: {} {} notification delivered but marking it failed: {:?}",
                reminder.id, self.kind, e
            ),
        }

        Ok(DispatchOutcome::Sent)
    }
}
