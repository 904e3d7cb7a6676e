use crate::reminder::dispatch_notification::DispatchNotificationUseCase;
use crate::reminder::process_due_reminders::ProcessDueRemindersUseCase;
use crate::shared::usecase::execute;
use actix_web::rt::time::{interval, sleep_until, Instant};
use careercare_infra::CareerCareContext;
use careercare_domain::QueuedNotificationJob;
use futures::StreamExt;
use std::time::Duration;
use tracing::{error, info, warn};

/// How many due jobs one worker pass claims from the queue
const WORKER_PULL_LIMIT: usize = 100;
/// How many notifications are in flight at once within a worker pass
const WORKER_CONCURRENCY: usize = 2;

pub fn get_start_delay(now_ts: usize, secs_before_min: usize) -> usize {
    let secs_to_next_minute = 60 - (now_ts / 1000) % 60;
    if secs_to_next_minute > secs_before_min {
        secs_to_next_minute - secs_before_min
    } else {
        secs_to_next_minute + (60 - secs_before_min)
    }
}

/// Drains due jobs from the delayed queue every second and dispatches
/// them. Failed jobs are re-queued with their policy's backoff until the
/// attempts run out.
pub fn start_notification_queue_worker(ctx: CareerCareContext) {
    actix_web::rt::spawn(async move {
        let mut secondly_interval = interval(Duration::from_secs(1));
        loop {
            secondly_interval.tick().await;

            let now = ctx.sys.get_timestamp_millis();
            let due = match ctx.job_queue.pull_due(now, WORKER_PULL_LIMIT).await {
                Ok(due) => due,
                Err(e) => {
                    error!("Unable to pull due jobs from the queue: {:?}", e);
                    continue;
                }
            };

            futures::stream::iter(due)
                .for_each_concurrent(WORKER_CONCURRENCY, |job| process_queued_job(&ctx, job))
                .await;
        }
    });
}

pub async fn process_queued_job(ctx: &CareerCareContext, queued: QueuedNotificationJob) {
    let usecase = DispatchNotificationUseCase {
        reminder_id: queued.job.reminder_id.clone(),
        kind: queued.job.kind,
    };
    if execute(usecase, ctx).await.is_ok() {
        return;
    }

    let next_attempt = queued.attempt + 1;
    if next_attempt >= queued.retry.max_attempts {
        error!(
            "Giving up on reminder: {} {} notification after {} attempts",
            queued.job.reminder_id, queued.job.kind, next_attempt
        );
        return;
    }

    let now = ctx.sys.get_timestamp_millis();
    let retry_job = QueuedNotificationJob {
        fire_at: now + queued.retry.backoff_for(queued.attempt),
        attempt: next_attempt,
        ..queued
    };
    warn!(
        "Reminder: {} {} notification failed, retry {} of {} queued",
        retry_job.job.reminder_id,
        retry_job.job.kind,
        next_attempt,
        retry_job.retry.max_attempts - 1
    );
    if let Err(e) = ctx.job_queue.enqueue(&retry_job).await {
        error!(
            "Unable to queue retry for reminder: {} {} notification: {:?}",
            retry_job.job.reminder_id, retry_job.job.kind, e
        );
    }
}

/// Runs the polling fallback once a minute, aligned to minute boundaries.
/// The previous quota state is kept so the handover between the queue and
/// the fallback is logged once per transition instead of every tick.
pub struct PollingFallbackScheduler {
    ctx: CareerCareContext,
    last_quota_exceeded: Option<bool>,
}

impl PollingFallbackScheduler {
    pub fn new(ctx: CareerCareContext) -> Self {
        Self {
            ctx,
            last_quota_exceeded: None,
        }
    }

    pub async fn tick(&mut self) {
        let res = match execute(ProcessDueRemindersUseCase, &self.ctx).await {
            Ok(res) => res,
            Err(e) => {
                error!("Polling fallback tick failed: {:?}", e);
                return;
            }
        };

        if self.last_quota_exceeded != Some(res.quota_exceeded) {
            if res.quota_exceeded {
                info!("Queue backend quota exceeded, the polling fallback is handling reminders");
            } else {
                info!("Queue backend quota available, the delayed queue handles reminders");
            }
            self.last_quota_exceeded = Some(res.quota_exceeded);
        }
    }
}

pub fn start_reminder_fallback_job(ctx: CareerCareContext) {
    actix_web::rt::spawn(async move {
        let now = ctx.sys.get_timestamp_millis();
        let secs_to_next_run = get_start_delay(now as usize, 0);
        let start = Instant::now() + Duration::from_secs(secs_to_next_run as u64);
        sleep_until(start).await;

        let mut scheduler = PollingFallbackScheduler::new(ctx);
        let mut minutely_interval = interval(Duration::from_secs(60));
        loop {
            minutely_interval.tick().await;
            // Awaited inline so a slow sweep can never overlap the next one
            scheduler.tick().await;
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use careercare_domain::{
        JobApplication, NotificationJob, NotificationKind, Reminder, ReminderStatus, ReminderType,
        RemindBefore, RetryPolicy, User,
    };
    use careercare_infra::{
        setup_context_inmemory, IJobQueue, InMemoryJobQueue, InMemoryMailerService,
    };
    use std::sync::Arc;

    #[test]
    fn start_delay_works() {
        assert_eq!(get_start_delay(50 * 1000, 5), 5);
        assert_eq!(get_start_delay(50 * 1000, 10), 60);
        assert_eq!(get_start_delay(50 * 1000, 15), 55);
        assert_eq!(get_start_delay(60 * 1000, 60), 60);
        assert_eq!(get_start_delay(60 * 1000, 10), 50);
        assert_eq!(get_start_delay(59 * 1000, 0), 1);
        assert_eq!(get_start_delay(59 * 1000, 1), 60);
    }

    #[actix_web::test]
    async fn failed_jobs_are_requeued_with_backoff_until_attempts_run_out() {
        let mut ctx = setup_context_inmemory();
        let mailer = Arc::new(InMemoryMailerService::new());
        let queue = Arc::new(InMemoryJobQueue::new());
        ctx.mailer = mailer.clone();
        ctx.job_queue = queue.clone();
        mailer.fail_for("jane@doe.com");

        let user = User::new("jane@doe.com");
        ctx.repos.users.insert(&user).await.unwrap();
        let application = JobApplication::new(user.id.clone(), "Backend Engineer", "Acme");
        ctx.repos.applications.insert(&application).await.unwrap();

        let now = ctx.sys.get_timestamp_millis();
        let reminder = Reminder::new(
            application.id.clone(),
            ReminderType::Interview,
            now,
            RemindBefore::None,
            "".into(),
            now,
        );
        ctx.repos.reminders.insert(&reminder).await.unwrap();

        let job = QueuedNotificationJob::new(
            NotificationJob {
                reminder_id: reminder.id.clone(),
                kind: NotificationKind::Main,
            },
            now,
            RetryPolicy::main(),
        );

        // First attempt fails and queues a retry with the base backoff
        process_queued_job(&ctx, job).await;
        let retries = queue.jobs();
        assert_eq!(retries.len(), 1);
        assert_eq!(retries[0].attempt, 1);
        assert!(retries[0].fire_at >= now + RetryPolicy::main().backoff_millis);

        // Second attempt fails and queues the last retry
        let retry = queue
            .pull_due(retries[0].fire_at, 1)
            .await
            .unwrap()
            .remove(0);
        process_queued_job(&ctx, retry).await;
        let retries = queue.jobs();
        assert_eq!(retries.len(), 1);
        assert_eq!(retries[0].attempt, 2);

        // Third attempt exhausts the policy, nothing is requeued
        let retry = queue
            .pull_due(retries[0].fire_at, 1)
            .await
            .unwrap()
            .remove(0);
        process_queued_job(&ctx, retry).await;
        assert!(queue.jobs().is_empty());
        assert!(mailer.sent().is_empty());
    }

    #[actix_web::test]
    async fn successful_jobs_are_not_requeued() {
        let mut ctx = setup_context_inmemory();
        let mailer = Arc::new(InMemoryMailerService::new());
        let queue = Arc::new(InMemoryJobQueue::new());
        ctx.mailer = mailer.clone();
        ctx.job_queue = queue.clone();

        let user = User::new("jane@doe.com");
        ctx.repos.users.insert(&user).await.unwrap();
        let application = JobApplication::new(user.id.clone(), "Backend Engineer", "Acme");
        ctx.repos.applications.insert(&application).await.unwrap();

        let now = ctx.sys.get_timestamp_millis();
        let reminder = Reminder::new(
            application.id.clone(),
            ReminderType::FollowUp,
            now,
            RemindBefore::None,
            "".into(),
            now,
        );
        ctx.repos.reminders.insert(&reminder).await.unwrap();

        let job = QueuedNotificationJob::new(
            NotificationJob {
                reminder_id: reminder.id.clone(),
                kind: NotificationKind::Main,
            },
            now,
            RetryPolicy::main(),
        );
        process_queued_job(&ctx, job).await;

        assert!(queue.jobs().is_empty());
        assert_eq!(mailer.sent().len(), 1);
        let stored = ctx.repos.reminders.find(&reminder.id).await.unwrap();
        assert_eq!(stored.status, ReminderStatus::Sent);
    }
}
