use crate::error::CareerCareError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use careercare_domain::{Reminder, ReminderStatus, ID};
use careercare_infra::CareerCareContext;
use serde::Deserialize;

pub async fn cancel_reminder_controller(
    ctx: web::Data<CareerCareContext>,
    path_params: web::Path<PathParams>,
) -> Result<HttpResponse, CareerCareError> {
    let usecase = CancelReminderUseCase {
        reminder_id: path_params.reminder_id.clone(),
        application_id: path_params.application_id.clone(),
    };

    execute(usecase, &ctx)
        .await
        .map(|_| HttpResponse::Ok().finish())
        .map_err(|e| match e {
            UseCaseError::NotFound(reminder_id) => CareerCareError::NotFound(format!(
                "Reminder with id: {} was not found",
                reminder_id
            )),
            UseCaseError::AlreadyTerminal(status) => CareerCareError::BadClientData(format!(
                "Reminder is already {} and can no longer be cancelled",
                status
            )),
            UseCaseError::StorageError => CareerCareError::InternalError,
        })
}

#[derive(Debug, Deserialize)]
pub struct PathParams {
    pub application_id: ID,
    pub reminder_id: ID,
}

/// Cancels a pending reminder. Any job already sitting on the delayed
/// queue stays there; the dispatcher drops it when it sees the status.
#[derive(Debug)]
pub struct CancelReminderUseCase {
    pub reminder_id: ID,
    pub application_id: ID,
}

#[derive(Debug)]
pub enum UseCaseError {
    NotFound(ID),
    AlreadyTerminal(ReminderStatus),
    StorageError,
}

#[async_trait::async_trait(?Send)]
impl UseCase for CancelReminderUseCase {
    type Response = Reminder;

    type Error = UseCaseError;

    const NAME: &'static str = "CancelReminder";

    async fn execute(&mut self, ctx: &CareerCareContext) -> Result<Self::Response, Self::Error> {
        let reminder = match ctx.repos.reminders.find(&self.reminder_id).await {
            Some(reminder) if reminder.application_id == self.application_id => reminder,
            _ => return Err(UseCaseError::NotFound(self.reminder_id.clone())),
        };

        if reminder.status != ReminderStatus::Pending {
            return Err(UseCaseError::AlreadyTerminal(reminder.status));
        }

        let now = ctx.sys.get_timestamp_millis();
        let cancelled = ctx
            .repos
            .reminders
            .cancel(&reminder.id, now)
            .await
            .map_err(|_| UseCaseError::StorageError)?;
        if !cancelled {
            // Lost the race against a concurrent dispatch or cancel.
            // Re-read so the error names the state that actually won.
            return match ctx.repos.reminders.find(&reminder.id).await {
                Some(reminder) => Err(UseCaseError::AlreadyTerminal(reminder.status)),
                None => Err(UseCaseError::NotFound(reminder.id.clone())),
            };
        }

        ctx.repos
            .reminders
            .find(&reminder.id)
            .await
            .ok_or(UseCaseError::StorageError)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reminder::dispatch_notification::{
        DispatchNotificationUseCase, DispatchOutcome, SkipReason,
    };
    use careercare_domain::{
        JobApplication, NotificationKind, ReminderType, RemindBefore, User,
    };
    use careercare_infra::{setup_context_inmemory, IReminderRepo, InMemoryMailerService};
    use std::sync::Arc;

    /// Reminder repo where every cancel loses the race: a concurrent
    /// transition to `winner` lands between the caller's read and its
    /// conditional write.
    struct RacingCancelRepo {
        inner: Arc<dyn IReminderRepo>,
        winner: ReminderStatus,
    }

    #[async_trait::async_trait]
    impl IReminderRepo for RacingCancelRepo {
        async fn insert(&self, reminder: &Reminder) -> anyhow::Result<()> {
            self.inner.insert(reminder).await
        }

        async fn find(&self, reminder_id: &ID) -> Option<Reminder> {
            self.inner.find(reminder_id).await
        }

        async fn find_by_application(&self, application_id: &ID) -> Vec<Reminder> {
            self.inner.find_by_application(application_id).await
        }

        async fn find_pending_by_application_and_type(
            &self,
            application_id: &ID,
            reminder_type: ReminderType,
        ) -> Option<Reminder> {
            self.inner
                .find_pending_by_application_and_type(application_id, reminder_type)
                .await
        }

        async fn find_main_due(&self, from: i64, to: i64, limit: usize) -> Vec<Reminder> {
            self.inner.find_main_due(from, to, limit).await
        }

        async fn find_remind_before_due(
            &self,
            remind_before: RemindBefore,
            from: i64,
            to: i64,
            limit: usize,
        ) -> Vec<Reminder> {
            self.inner
                .find_remind_before_due(remind_before, from, to, limit)
                .await
        }

        async fn mark_sent(&self, reminder_id: &ID, updated: i64) -> anyhow::Result<bool> {
            self.inner.mark_sent(reminder_id, updated).await
        }

        async fn mark_remind_before_sent(
            &self,
            reminder_id: &ID,
            updated: i64,
        ) -> anyhow::Result<bool> {
            self.inner.mark_remind_before_sent(reminder_id, updated).await
        }

        async fn cancel(&self, reminder_id: &ID, updated: i64) -> anyhow::Result<bool> {
            match self.winner {
                ReminderStatus::Sent => {
                    self.inner.mark_sent(reminder_id, updated).await?;
                }
                _ => {
                    self.inner.cancel(reminder_id, updated).await?;
                }
            }
            self.inner.cancel(reminder_id, updated).await
        }
    }

    async fn setup() -> (CareerCareContext, Arc<InMemoryMailerService>, Reminder) {
        let mut ctx = setup_context_inmemory();
        let mailer = Arc::new(InMemoryMailerService::new());
        ctx.mailer = mailer.clone();

        let user = User::new("jane@doe.com");
        ctx.repos.users.insert(&user).await.unwrap();
        let application = JobApplication::new(user.id.clone(), "Backend Engineer", "Acme");
        ctx.repos.applications.insert(&application).await.unwrap();

        let now = ctx.sys.get_timestamp_millis();
        let reminder = Reminder::new(
            application.id.clone(),
            ReminderType::Interview,
            now + 30 * 60 * 1000,
            RemindBefore::None,
            "".into(),
            now,
        );
        ctx.repos.reminders.insert(&reminder).await.unwrap();

        (ctx, mailer, reminder)
    }

    #[actix_web::test]
    async fn cancelling_prevents_a_later_dispatch() {
        let (ctx, mailer, reminder) = setup().await;

        let cancelled = execute(
            CancelReminderUseCase {
                reminder_id: reminder.id.clone(),
                application_id: reminder.application_id.clone(),
            },
            &ctx,
        )
        .await
        .unwrap();
        assert_eq!(cancelled.status, ReminderStatus::Cancelled);

        // The stale queue job arrives afterwards and must be dropped
        let outcome = execute(
            DispatchNotificationUseCase {
                reminder_id: reminder.id.clone(),
                kind: NotificationKind::Main,
            },
            &ctx,
        )
        .await
        .unwrap();
        assert_eq!(outcome, DispatchOutcome::Skipped(SkipReason::Cancelled));
        assert!(mailer.sent().is_empty());
    }

    #[actix_web::test]
    async fn rejects_cancelling_through_another_application() {
        let (ctx, _, reminder) = setup().await;

        let res = execute(
            CancelReminderUseCase {
                reminder_id: reminder.id.clone(),
                application_id: ID::new(),
            },
            &ctx,
        )
        .await;
        assert!(matches!(res, Err(UseCaseError::NotFound(_))));
    }

    #[actix_web::test]
    async fn lost_cancel_race_reports_the_status_that_won() {
        for winner in [ReminderStatus::Sent, ReminderStatus::Cancelled] {
            let (mut ctx, _, reminder) = setup().await;
            ctx.repos.reminders = Arc::new(RacingCancelRepo {
                inner: ctx.repos.reminders.clone(),
                winner,
            });

            let res = execute(
                CancelReminderUseCase {
                    reminder_id: reminder.id.clone(),
                    application_id: reminder.application_id.clone(),
                },
                &ctx,
            )
            .await;
            match res {
                Err(UseCaseError::AlreadyTerminal(status)) => assert_eq!(status, winner),
                other => panic!("Expected AlreadyTerminal, got: {:?}", other),
            }
        }
    }

    #[actix_web::test]
    async fn rejects_cancelling_a_sent_reminder() {
        let (ctx, _, reminder) = setup().await;

        let now = ctx.sys.get_timestamp_millis();
        assert!(ctx
            .repos
            .reminders
            .mark_sent(&reminder.id, now)
            .await
            .unwrap());

        let res = execute(
            CancelReminderUseCase {
                reminder_id: reminder.id.clone(),
                application_id: reminder.application_id.clone(),
            },
            &ctx,
        )
        .await;
        assert!(matches!(
            res,
            Err(UseCaseError::AlreadyTerminal(ReminderStatus::Sent))
        ));
    }
}
