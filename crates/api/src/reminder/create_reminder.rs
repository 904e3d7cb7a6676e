use super::dtos::ReminderDTO;
use super::subscribers::ScheduleNotificationJobsOnReminderCreated;
use crate::error::CareerCareError;
use crate::shared::usecase::{execute, Subscriber, UseCase};
use actix_web::{web, HttpResponse};
use careercare_domain::{Reminder, ReminderType, RemindBefore, ID};
use careercare_infra::CareerCareContext;
use serde::Deserialize;

/// Creation below this advance is rejected outright: the delayed job or
/// fallback window would have no room to deliver on time.
pub const MIN_ADVANCE_MILLIS: i64 = 10 * 60 * 1000;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReminderBody {
    #[serde(rename = "type")]
    pub reminder_type: ReminderType,
    pub reminder_date: i64,
    #[serde(default = "default_remind_before")]
    pub remind_before: RemindBefore,
    #[serde(default)]
    pub message: String,
}

fn default_remind_before() -> RemindBefore {
    RemindBefore::None
}

pub async fn create_reminder_controller(
    ctx: web::Data<CareerCareContext>,
    path_params: web::Path<PathParams>,
    body: web::Json<CreateReminderBody>,
) -> Result<HttpResponse, CareerCareError> {
    let body = body.into_inner();
    let usecase = CreateReminderUseCase {
        application_id: path_params.application_id.clone(),
        reminder_type: body.reminder_type,
        reminder_date: body.reminder_date,
        remind_before: body.remind_before,
        message: body.message,
    };

    execute(usecase, &ctx)
        .await
        .map(|reminder| HttpResponse::Created().json(ReminderDTO::new(&reminder)))
        .map_err(|e| match e {
            UseCaseError::ApplicationNotFound(application_id) => CareerCareError::NotFound(
                format!("Job application with id: {} was not found", application_id),
            ),
            UseCaseError::DateInThePast => {
                CareerCareError::BadClientData("Cannot create a reminder in the past".into())
            }
            UseCaseError::DateTooSoon => CareerCareError::BadClientData(format!(
                "Reminders must be scheduled at least {} minutes ahead",
                MIN_ADVANCE_MILLIS / 1000 / 60
            )),
            UseCaseError::DuplicatePending(reminder_type) => CareerCareError::Conflict(format!(
                "A pending {} reminder already exists for this job application",
                reminder_type
            )),
            UseCaseError::StorageError => CareerCareError::InternalError,
        })
}

#[derive(Debug, Deserialize)]
pub struct PathParams {
    pub application_id: ID,
}

#[derive(Debug)]
pub struct CreateReminderUseCase {
    pub application_id: ID,
    pub reminder_type: ReminderType,
    pub reminder_date: i64,
    pub remind_before: RemindBefore,
    pub message: String,
}

#[derive(Debug)]
pub enum UseCaseError {
    ApplicationNotFound(ID),
    DateInThePast,
    DateTooSoon,
    DuplicatePending(ReminderType),
    StorageError,
}

#[async_trait::async_trait(?Send)]
impl UseCase for CreateReminderUseCase {
    type Response = Reminder;

    type Error = UseCaseError;

    const NAME: &'static str = "CreateReminder";

    async fn execute(&mut self, ctx: &CareerCareContext) -> Result<Self::Response, Self::Error> {
        if ctx
            .repos
            .applications
            .find(&self.application_id)
            .await
            .is_none()
        {
            return Err(UseCaseError::ApplicationNotFound(self.application_id.clone()));
        }

        let now = ctx.sys.get_timestamp_millis();
        if self.reminder_date <= now {
            return Err(UseCaseError::DateInThePast);
        }
        if self.reminder_date - now < MIN_ADVANCE_MILLIS {
            return Err(UseCaseError::DateTooSoon);
        }

        if ctx
            .repos
            .reminders
            .find_pending_by_application_and_type(&self.application_id, self.reminder_type)
            .await
            .is_some()
        {
            return Err(UseCaseError::DuplicatePending(self.reminder_type));
        }

        // An offset whose fire time is not in the future anymore cannot
        // deliver, so it is silently dropped rather than rejected
        let mut remind_before = self.remind_before;
        if remind_before != RemindBefore::None
            && self.reminder_date - remind_before.delta_millis() <= now
        {
            remind_before = RemindBefore::None;
        }

        let reminder = Reminder::new(
            self.application_id.clone(),
            self.reminder_type,
            self.reminder_date,
            remind_before,
            self.message.clone(),
            now,
        );
        ctx.repos
            .reminders
            .insert(&reminder)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        Ok(reminder)
    }

    fn subscribers() -> Vec<Box<dyn Subscriber<Self>>> {
        vec![Box::new(ScheduleNotificationJobsOnReminderCreated)]
    }
}
