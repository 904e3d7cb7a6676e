use super::dtos::ReminderDTO;
use crate::error::CareerCareError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use careercare_domain::{Reminder, ID};
use careercare_infra::CareerCareContext;
use serde::Deserialize;

pub async fn get_reminders_controller(
    ctx: web::Data<CareerCareContext>,
    path_params: web::Path<PathParams>,
) -> Result<HttpResponse, CareerCareError> {
    let usecase = GetRemindersUseCase {
        application_id: path_params.application_id.clone(),
    };

    execute(usecase, &ctx)
        .await
        .map(|reminders| {
            let dtos = reminders.iter().map(ReminderDTO::new).collect::<Vec<_>>();
            HttpResponse::Ok().json(dtos)
        })
        .map_err(|e| match e {
            UseCaseError::ApplicationNotFound(application_id) => CareerCareError::NotFound(
                format!("Job application with id: {} was not found", application_id),
            ),
        })
}

#[derive(Debug, Deserialize)]
pub struct PathParams {
    pub application_id: ID,
}

#[derive(Debug)]
pub struct GetRemindersUseCase {
    pub application_id: ID,
}

#[derive(Debug)]
pub enum UseCaseError {
    ApplicationNotFound(ID),
}

#[async_trait::async_trait(?Send)]
impl UseCase for GetRemindersUseCase {
    type Response = Vec<Reminder>;

    type Error = UseCaseError;

    const NAME: &'static str = "GetReminders";

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

        let mut reminders = ctx
            .repos
            .reminders
            .find_by_application(&self.application_id)
            .await;
        reminders.sort_by_key(|reminder| reminder.reminder_date);

        Ok(reminders)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use careercare_domain::{JobApplication, ReminderType, RemindBefore, User};
    use careercare_infra::setup_context_inmemory;

    #[actix_web::test]
    async fn lists_reminders_ordered_by_date() {
        let ctx = setup_context_inmemory();

        let user = User::new("jane@doe.com");
        ctx.repos.users.insert(&user).await.unwrap();
        let application = JobApplication::new(user.id.clone(), "Backend Engineer", "Acme");
        ctx.repos.applications.insert(&application).await.unwrap();

        let now = ctx.sys.get_timestamp_millis();
        for (reminder_type, offset_min) in
            [(ReminderType::Deadline, 60), (ReminderType::Interview, 30)]
        {
            let reminder = Reminder::new(
                application.id.clone(),
                reminder_type,
                now + offset_min * 60 * 1000,
                RemindBefore::None,
                "".into(),
                now,
            );
            ctx.repos.reminders.insert(&reminder).await.unwrap();
        }

        let reminders = execute(
            GetRemindersUseCase {
                application_id: application.id.clone(),
            },
            &ctx,
        )
        .await
        .unwrap();
        assert_eq!(reminders.len(), 2);
        assert_eq!(reminders[0].reminder_type, ReminderType::Interview);
        assert_eq!(reminders[1].reminder_type, ReminderType::Deadline);
    }

    #[actix_web::test]
    async fn rejects_unknown_applications() {
        let ctx = setup_context_inmemory();

        let res = execute(
            GetRemindersUseCase {
                application_id: ID::new(),
            },
            &ctx,
        )
        .await;
        assert!(matches!(res, Err(UseCaseError::ApplicationNotFound(_))));
    }
}
