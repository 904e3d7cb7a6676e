use crate::shared::usecase::UseCase;
use careercare_domain::{NotificationJob, NotificationKind, QueuedNotificationJob, RetryPolicy, ID};
use careercare_infra::CareerCareContext;

/// Outcome of one scheduling decision. `queued` means a delayed job was
/// registered; `fallback_to_cron` means the polling fallback is implicitly
/// responsible for the notification. Neither flag set means the fire time
/// had already passed, which the polling path treats as missed-and-caught.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DispatchDecision {
    pub queued: bool,
    pub fallback_to_cron: bool,
}

/// Decides, per notification, whether to register a delayed job on the
/// queue or to leave delivery to the polling fallback, based on the
/// remaining quota of the queue backend.
#[derive(Debug)]
pub struct ScheduleNotificationUseCase {
    pub reminder_id: ID,
    pub kind: NotificationKind,
    /// Timestamp in millis the notification should fire at
    pub fire_at: i64,
}

#[derive(Debug)]
pub enum UseCaseError {
    QueueUnavailable,
}

#[async_trait::async_trait(?Send)]
impl UseCase for ScheduleNotificationUseCase {
    type Response = DispatchDecision;

    type Error = UseCaseError;

    const NAME: &'static str = "ScheduleNotification";

    async fn execute(&mut self, ctx: &CareerCareContext) -> Result<Self::Response, Self::Error> {
        let now = ctx.sys.get_timestamp_millis();

        // Can happen for remind-before when the offset window has nearly
        // elapsed at creation time. Not actionable here, the polling path
        // will catch it within its lookback if it is still relevant.
        if self.fire_at < now {
            return Ok(DispatchDecision {
                queued: false,
                fallback_to_cron: false,
            });
        }

        let quota = ctx.quota.check_quota().await;
        if quota.exceeded {
            return Ok(DispatchDecision {
                queued: false,
                fallback_to_cron: true,
            });
        }

        let retry = match self.kind {
            NotificationKind::Main => RetryPolicy::main(),
            NotificationKind::RemindBefore => RetryPolicy::remind_before(),
        };
        let job = QueuedNotificationJob::new(
            NotificationJob {
                reminder_id: self.reminder_id.clone(),
                kind: self.kind,
            },
            self.fire_at,
            retry,
        );
        ctx.job_queue
            .enqueue(&job)
            .await
            .map_err(|_| UseCaseError::QueueUnavailable)?;

        Ok(DispatchDecision {
            queued: true,
            fallback_to_cron: false,
        })
    }
}
