mod inmemory;
mod redis;

use careercare_domain::QueuedNotificationJob;
pub use inmemory::InMemoryJobQueue;
pub use self::redis::RedisJobQueue;

/// Delayed job queue with at-least-once semantics. Jobs become visible to
/// `pull_due` once their `fire_at` has passed; a pulled job is claimed and
/// will not be handed out again unless it is re-enqueued by the worker.
#[async_trait::async_trait]
pub trait IJobQueue: Send + Sync {
    async fn enqueue(&self, job: &QueuedNotificationJob) -> anyhow::Result<()>;
    async fn pull_due(&self, now: i64, limit: usize) -> anyhow::Result<Vec<QueuedNotificationJob>>;
}
