use super::{IMailerService, ReminderEmail};
use crate::config::BrevoConfig;
use anyhow::{anyhow, Context};
use careercare_domain::NotificationKind;
use chrono::{TimeZone, Utc};
use serde::Serialize;

const BREVO_SEND_URL: &str = "https://api.brevo.com/v3/smtp/email";

/// Sends reminder notifications through the Brevo transactional email API.
pub struct BrevoMailerService {
    http: reqwest::Client,
    config: BrevoConfig,
}

#[derive(Debug, Serialize)]
struct EmailAddress {
    email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SendEmailRequest {
    sender: EmailAddress,
    to: Vec<EmailAddress>,
    subject: String,
    html_content: String,
    text_content: String,
}

impl BrevoMailerService {
    pub fn new(config: BrevoConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    fn build_request(&self, email: &ReminderEmail) -> SendEmailRequest {
        let type_label = email.reminder_type.label();
        let type_text = email.reminder_type.as_str().replace('-', " ");
        let date_str = match Utc.timestamp_millis_opt(email.reminder_date).single() {
            Some(date) => date.format("%Y-%m-%d %H:%M UTC").to_string(),
            None => email.reminder_date.to_string(),
        };
        let notes_html = if email.message.is_empty() {
            String::new()
        } else {
            format!("<p><strong>Notes:</strong> {}</p>", email.message)
        };
        let notes_text = if email.message.is_empty() {
            String::new()
        } else {
            format!(" Notes: {}", email.message)
        };

        let (subject, html_content, text_content) = match email.kind {
            NotificationKind::RemindBefore => {
                let time_label = email.remind_before.label();
                (
                    format!(
                        "Heads up: {} in {} - {} at {}",
                        type_label, time_label, email.job_title, email.company_name
                    ),
                    format!(
                        "<h1>{} Coming Up!</h1>\
                         <p>This is your <strong>{}</strong> heads-up for your upcoming {}.</p>\
                         <p><strong>Scheduled:</strong> {}</p>\
                         <p><strong>Position:</strong> {}</p>\
                         <p><strong>Company:</strong> {}</p>\
                         {}\
                         <p>Make sure you're prepared. Good luck!</p>",
                        type_label,
                        time_label,
                        type_text,
                        date_str,
                        email.job_title,
                        email.company_name,
                        notes_html
                    ),
                    format!(
                        "Heads up: {} in {} for {} at {} on {}.{} Good luck!",
                        type_label,
                        time_label,
                        email.job_title,
                        email.company_name,
                        date_str,
                        notes_text
                    ),
                )
            }
            NotificationKind::Main => (
                format!(
                    "Reminder: {} NOW - {} at {}",
                    type_label, email.job_title, email.company_name
                ),
                format!(
                    "<h1>{} Reminder</h1>\
                     <p>Your {} is scheduled for <strong>now</strong>!</p>\
                     <p><strong>Time:</strong> {}</p>\
                     <p><strong>Position:</strong> {}</p>\
                     <p><strong>Company:</strong> {}</p>\
                     {}\
                     <p>Best of luck!</p>",
                    type_label, type_text, date_str, email.job_title, email.company_name, notes_html
                ),
                format!(
                    "Reminder: {} NOW for {} at {}. Time: {}.{} Best of luck!",
                    type_label, email.job_title, email.company_name, date_str, notes_text
                ),
            ),
        };

        SendEmailRequest {
            sender: EmailAddress {
                email: self.config.sender_email.clone(),
                name: Some(self.config.sender_name.clone()),
            },
            to: vec![EmailAddress {
                email: email.to.clone(),
                name: None,
            }],
            subject,
            html_content,
            text_content,
        }
    }
}

#[async_trait::async_trait]
impl IMailerService for BrevoMailerService {
    async fn send_reminder(&self, email: &ReminderEmail) -> anyhow::Result<()> {
        if self.config.api_key.is_empty() || self.config.sender_email.is_empty() {
            return Err(anyhow!("Brevo API key or sender email not configured"));
        }

        let request = self.build_request(email);
        let res = self
            .http
            .post(BREVO_SEND_URL)
            .header("api-key", &self.config.api_key)
            .json(&request)
            .send()
            .await
            .context("Unable to reach the Brevo API")?;

        if !res.status().is_success() {
            return Err(anyhow!(
                "Brevo API rejected the reminder email with status: {}",
                res.status()
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use careercare_domain::{ReminderType, RemindBefore};

    fn email(kind: NotificationKind) -> ReminderEmail {
        ReminderEmail {
            to: "jane@doe.com".into(),
            kind,
            reminder_type: ReminderType::Interview,
            reminder_date: 1613862000000,
            remind_before: RemindBefore::Min30,
            job_title: "Backend Engineer".into(),
            company_name: "Acme".into(),
            message: "Bring portfolio".into(),
        }
    }

    fn service() -> BrevoMailerService {
        BrevoMailerService::new(BrevoConfig {
            api_key: "key".into(),
            sender_email: "noreply@careercare.app".into(),
            sender_name: "CareerCare".into(),
        })
    }

    #[test]
    fn early_notification_uses_heads_up_wording() {
        let req = service().build_request(&email(NotificationKind::RemindBefore));
        assert_eq!(
            req.subject,
            "Heads up: Interview in 30 minutes - Backend Engineer at Acme"
        );
        assert!(req.text_content.contains("Notes: Bring portfolio"));
    }

    #[test]
    fn main_notification_uses_due_now_wording() {
        let req = service().build_request(&email(NotificationKind::Main));
        assert_eq!(req.subject, "Reminder: Interview NOW - Backend Engineer at Acme");
        assert!(req.html_content.contains("scheduled for <strong>now</strong>"));
    }
}
