mod job_queue;
mod mailer;
mod quota;

pub use job_queue::{IJobQueue, InMemoryJobQueue, RedisJobQueue};
pub use mailer::{BrevoMailerService, IMailerService, InMemoryMailerService, ReminderEmail};
pub use quota::{IQuotaService, QuotaSnapshot, StaticQuotaService, UpstashQuotaService};
