mod cancel_reminder;
mod create_reminder;
mod dtos;
mod get_reminders;
mod subscribers;

pub mod dispatch_notification;
pub mod process_due_reminders;
pub mod schedule_notification;

use actix_web::web;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route(
        "/applications/{application_id}/reminders",
        web::post().to(create_reminder::create_reminder_controller),
    );
    cfg.route(
        "/applications/{application_id}/reminders",
        web::get().to(get_reminders::get_reminders_controller),
    );
    cfg.route(
        "/applications/{application_id}/reminders/{reminder_id}",
        web::delete().to(cancel_reminder::cancel_reminder_controller),
    );
}
