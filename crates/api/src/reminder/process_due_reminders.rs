use crate::reminder::dispatch_notification::DispatchNotificationUseCase;
use crate::shared::usecase::{execute, UseCase};
use careercare_domain::{NotificationKind, Reminder, RemindBefore};
use careercare_infra::CareerCareContext;
use tracing::info;

/// Upper bound on reminders handled per notification kind per tick. Load
/// above this rolls over to the next tick since the windows overlap.
pub const FALLBACK_BATCH_SIZE: usize = 50;
/// How far behind `now` a tick reaches, so reminders that fell between two
/// ticks (or were missed while the process was down briefly) still go out.
pub const LOOKBACK_MILLIS: i64 = 5 * 60 * 1000;
/// How far ahead of `now` a tick reaches. Sending up to this early is
/// preferred over being a full tick late.
pub const LOOKAHEAD_MILLIS: i64 = 2 * 60 * 1000;

/// One sweep of the polling fallback: when the queue backend is out of
/// quota, find every reminder due around now and dispatch it inline.
/// When quota is available this is a no-op, the delayed queue owns delivery.
#[derive(Debug)]
pub struct ProcessDueRemindersUseCase;

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct BatchReport {
    pub attempted: usize,
    pub succeeded: usize,
    pub failed: usize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProcessDueRemindersResponse {
    pub quota_exceeded: bool,
    pub main: BatchReport,
    pub remind_before: BatchReport,
}

#[derive(Debug)]
pub enum UseCaseError {}

#[async_trait::async_trait(?Send)]
impl UseCase for ProcessDueRemindersUseCase {
    type Response = ProcessDueRemindersResponse;

    type Error = UseCaseError;

    const NAME: &'static str = "ProcessDueReminders";

    async fn execute(&mut self, ctx: &CareerCareContext) -> Result<Self::Response, Self::Error> {
        let quota = ctx.quota.check_quota().await;
        if !quota.exceeded {
            return Ok(ProcessDueRemindersResponse {
                quota_exceeded: false,
                main: BatchReport::default(),
                remind_before: BatchReport::default(),
            });
        }

        let now = ctx.sys.get_timestamp_millis();

        let due_main = ctx
            .repos
            .reminders
            .find_main_due(now - LOOKBACK_MILLIS, now + LOOKAHEAD_MILLIS, FALLBACK_BATCH_SIZE)
            .await;
        let main = dispatch_batch(ctx, due_main, NotificationKind::Main).await;
        if main.attempted > 0 {
            info!(
                "Polling fallback dispatched main notifications: {} succeeded, {} failed",
                main.succeeded, main.failed
            );
        }

        // Each offset shifts the window forward by its delta: a reminder
        // whose early notification is due now has its reminder_date delta
        // millis in the future.
        let mut due_early = Vec::new();
        for offset in RemindBefore::OFFSETS {
            let delta = offset.delta_millis();
            let mut batch = ctx
                .repos
                .reminders
                .find_remind_before_due(
                    offset,
                    now + delta - LOOKBACK_MILLIS,
                    now + delta + LOOKAHEAD_MILLIS,
                    FALLBACK_BATCH_SIZE,
                )
                .await;
            due_early.append(&mut batch);
        }
        let remind_before = dispatch_batch(ctx, due_early, NotificationKind::RemindBefore).await;
        if remind_before.attempted > 0 {
            info!(
                "Polling fallback dispatched early notifications: {} succeeded, {} failed",
                remind_before.succeeded, remind_before.failed
            );
        }

        Ok(ProcessDueRemindersResponse {
            quota_exceeded: true,
            main,
            remind_before,
        })
    }
}

async fn dispatch_batch(
    ctx: &CareerCareContext,
    reminders: Vec<Reminder>,
    kind: NotificationKind,
) -> BatchReport {
    let attempted = reminders.len();
    let dispatches = reminders.into_iter().map(|reminder| {
        execute(
            DispatchNotificationUseCase {
                reminder_id: reminder.id,
                kind,
            },
            ctx,
        )
    });
    let failed = futures::future::join_all(dispatches)
        .await
        .into_iter()
        .filter(|res| res.is_err())
        .count();

    BatchReport {
        attempted,
        succeeded: attempted - failed,
        failed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reminder::create_reminder::CreateReminderUseCase;
    use careercare_domain::{JobApplication, ReminderStatus, ReminderType, User};
    use careercare_infra::{
        setup_context_inmemory, InMemoryMailerService, ISys, StaticQuotaService,
    };
    use std::sync::atomic::{AtomicI64, Ordering};
    use std::sync::Arc;

    /// Clock that the test can move forward to reach the delivery windows
    struct TestSys {
        now: AtomicI64,
    }

    impl TestSys {
        fn new(now: i64) -> Self {
            Self {
                now: AtomicI64::new(now),
            }
        }

        fn set(&self, now: i64) {
            self.now.store(now, Ordering::SeqCst);
        }
    }

    impl ISys for TestSys {
        fn get_timestamp_millis(&self) -> i64 {
            self.now.load(Ordering::SeqCst)
        }
    }

    async fn insert_owner(ctx: &CareerCareContext, email: &str) -> JobApplication {
        let user = User::new(email);
        ctx.repos.users.insert(&user).await.unwrap();
        let application = JobApplication::new(user.id.clone(), "Backend Engineer", "Acme");
        ctx.repos.applications.insert(&application).await.unwrap();
        application
    }

    #[actix_web::test]
    async fn is_a_no_op_while_quota_is_available() {
        let mut ctx = setup_context_inmemory();
        let mailer = Arc::new(InMemoryMailerService::new());
        ctx.mailer = mailer.clone();

        let application = insert_owner(&ctx, "jane@doe.com").await;
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

        let res = execute(ProcessDueRemindersUseCase, &ctx).await.unwrap();
        assert!(!res.quota_exceeded);
        assert_eq!(res.main, BatchReport::default());
        assert!(mailer.sent().is_empty());
    }

    #[actix_web::test]
    async fn dispatches_reminders_due_within_the_window() {
        let mut ctx = setup_context_inmemory();
        let mailer = Arc::new(InMemoryMailerService::new());
        ctx.mailer = mailer.clone();
        ctx.quota = Arc::new(StaticQuotaService::new(true));

        let application = insert_owner(&ctx, "jane@doe.com").await;
        let now = ctx.sys.get_timestamp_millis();

        // Three minutes overdue: inside the lookback
        let overdue = Reminder::new(
            application.id.clone(),
            ReminderType::Interview,
            now - 3 * 60 * 1000,
            RemindBefore::None,
            "".into(),
            now,
        );
        // One minute ahead: inside the lookahead
        let upcoming = Reminder::new(
            application.id.clone(),
            ReminderType::FollowUp,
            now + 60 * 1000,
            RemindBefore::None,
            "".into(),
            now,
        );
        // Ten minutes ahead: outside the window
        let distant = Reminder::new(
            application.id.clone(),
            ReminderType::Deadline,
            now + 10 * 60 * 1000,
            RemindBefore::None,
            "".into(),
            now,
        );
        for reminder in [&overdue, &upcoming, &distant] {
            ctx.repos.reminders.insert(reminder).await.unwrap();
        }

        let res = execute(ProcessDueRemindersUseCase, &ctx).await.unwrap();
        assert!(res.quota_exceeded);
        assert_eq!(
            res.main,
            BatchReport {
                attempted: 2,
                succeeded: 2,
                failed: 0
            }
        );
        assert_eq!(mailer.sent().len(), 2);

        for (reminder, expected) in [
            (&overdue, ReminderStatus::Sent),
            (&upcoming, ReminderStatus::Sent),
            (&distant, ReminderStatus::Pending),
        ] {
            let stored = ctx.repos.reminders.find(&reminder.id).await.unwrap();
            assert_eq!(stored.status, expected);
        }
    }

    #[actix_web::test]
    async fn dispatches_early_notifications_in_their_shifted_window() {
        let mut ctx = setup_context_inmemory();
        let mailer = Arc::new(InMemoryMailerService::new());
        ctx.mailer = mailer.clone();
        ctx.quota = Arc::new(StaticQuotaService::new(true));

        let application = insert_owner(&ctx, "jane@doe.com").await;
        let now = ctx.sys.get_timestamp_millis();

        // Due in 30 minutes with a 30 minute offset: the early
        // notification fires now, the main one does not
        let reminder = Reminder::new(
            application.id.clone(),
            ReminderType::Interview,
            now + 30 * 60 * 1000,
            RemindBefore::Min30,
            "".into(),
            now,
        );
        ctx.repos.reminders.insert(&reminder).await.unwrap();

        let res = execute(ProcessDueRemindersUseCase, &ctx).await.unwrap();
        assert_eq!(res.main.attempted, 0);
        assert_eq!(
            res.remind_before,
            BatchReport {
                attempted: 1,
                succeeded: 1,
                failed: 0
            }
        );

        let sent = mailer.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].kind, NotificationKind::RemindBefore);

        let stored = ctx.repos.reminders.find(&reminder.id).await.unwrap();
        assert!(stored.remind_before_sent);
        assert_eq!(stored.status, ReminderStatus::Pending);

        // The next tick must not send it again
        let res = execute(ProcessDueRemindersUseCase, &ctx).await.unwrap();
        assert_eq!(res.remind_before.attempted, 0);
        assert_eq!(mailer.sent().len(), 1);
    }

    #[actix_web::test]
    async fn counts_transport_failures_without_aborting_the_batch() {
        let mut ctx = setup_context_inmemory();
        let mailer = Arc::new(InMemoryMailerService::new());
        ctx.mailer = mailer.clone();
        ctx.quota = Arc::new(StaticQuotaService::new(true));

        let now = ctx.sys.get_timestamp_millis();
        for i in 0..FALLBACK_BATCH_SIZE {
            let email = if i < 3 {
                format!("bouncing-{}@doe.com", i)
            } else {
                format!("user-{}@doe.com", i)
            };
            let application = insert_owner(&ctx, &email).await;
            let reminder = Reminder::new(
                application.id.clone(),
                ReminderType::Deadline,
                now,
                RemindBefore::None,
                "".into(),
                now,
            );
            ctx.repos.reminders.insert(&reminder).await.unwrap();
        }
        for i in 0..3 {
            mailer.fail_for(&format!("bouncing-{}@doe.com", i));
        }

        let res = execute(ProcessDueRemindersUseCase, &ctx).await.unwrap();
        assert_eq!(
            res.main,
            BatchReport {
                attempted: FALLBACK_BATCH_SIZE,
                succeeded: FALLBACK_BATCH_SIZE - 3,
                failed: 3
            }
        );
        assert_eq!(mailer.sent().len(), FALLBACK_BATCH_SIZE - 3);

        // The failed reminders are still pending, the next tick will pick
        // them up again through the lookback
        let still_pending = ctx
            .repos
            .reminders
            .find_main_due(now - LOOKBACK_MILLIS, now + LOOKAHEAD_MILLIS, FALLBACK_BATCH_SIZE)
            .await;
        assert_eq!(still_pending.len(), 3);
    }

    #[actix_web::test]
    async fn fallback_takes_over_a_created_reminder_when_quota_flips() {
        let mut ctx = setup_context_inmemory();
        let mailer = Arc::new(InMemoryMailerService::new());
        let quota = Arc::new(StaticQuotaService::new(false));
        let sys = Arc::new(TestSys::new(1_700_000_000_000));
        ctx.mailer = mailer.clone();
        ctx.quota = quota.clone();
        ctx.sys = sys.clone();

        let application = insert_owner(&ctx, "jane@doe.com").await;
        let now = sys.get_timestamp_millis();
        let reminder_date = now + 60 * 60 * 1000;

        // Created while quota is available, so both notifications also get
        // delayed jobs. Those jobs never run in this test, the fallback
        // alone has to deliver once quota flips.
        let reminder = execute(
            CreateReminderUseCase {
                application_id: application.id.clone(),
                reminder_type: ReminderType::Interview,
                reminder_date,
                remind_before: RemindBefore::Min15,
                message: "Bring portfolio".into(),
            },
            &ctx,
        )
        .await
        .unwrap();

        quota.set_exceeded(true);

        // At the early window only the remind-before notification goes out
        sys.set(reminder_date - 15 * 60 * 1000);
        let res = execute(ProcessDueRemindersUseCase, &ctx).await.unwrap();
        assert_eq!(res.remind_before.succeeded, 1);
        assert_eq!(res.main.attempted, 0);

        // At the main window only the main notification goes out
        sys.set(reminder_date);
        let res = execute(ProcessDueRemindersUseCase, &ctx).await.unwrap();
        assert_eq!(res.main.succeeded, 1);
        assert_eq!(res.remind_before.attempted, 0);

        let sent = mailer.sent();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].kind, NotificationKind::RemindBefore);
        assert_eq!(sent[1].kind, NotificationKind::Main);

        let stored = ctx.repos.reminders.find(&reminder.id).await.unwrap();
        assert_eq!(stored.status, ReminderStatus::Sent);
        assert!(stored.remind_before_sent);

        // A later tick within the lookback must not send anything twice
        sys.set(reminder_date + 60 * 1000);
        let res = execute(ProcessDueRemindersUseCase, &ctx).await.unwrap();
        assert_eq!(res.main.attempted, 0);
        assert_eq!(res.remind_before.attempted, 0);
        assert_eq!(mailer.sent().len(), 2);
    }
}
