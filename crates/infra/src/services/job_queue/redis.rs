use super::IJobQueue;
use careercare_domain::QueuedNotificationJob;
use redis::{aio::MultiplexedConnection, AsyncCommands};
use tracing::warn;

const QUEUE_KEY: &str = "careercare:notification_jobs";

/// Delayed queue on a redis sorted set: the member is the serialized job
/// and the score its fire time. Claiming happens with ZREM, so a member
/// that two workers pull at once is only processed by the one whose ZREM
/// removed it.
pub struct RedisJobQueue {
    conn: MultiplexedConnection,
    key: String,
}

impl RedisJobQueue {
    pub async fn connect(redis_url: &str) -> anyhow::Result<Self> {
        let client = redis::Client::open(redis_url)?;
        let conn = client.get_multiplexed_tokio_connection().await?;
        Ok(Self {
            conn,
            key: QUEUE_KEY.to_string(),
        })
    }
}

#[async_trait::async_trait]
impl IJobQueue for RedisJobQueue {
    async fn enqueue(&self, job: &QueuedNotificationJob) -> anyhow::Result<()> {
        let payload = serde_json::to_string(job)?;
        let mut conn = self.conn.clone();
        conn.zadd::<_, _, _, ()>(&self.key, payload, job.fire_at)
            .await?;
        Ok(())
    }

    async fn pull_due(&self, now: i64, limit: usize) -> anyhow::Result<Vec<QueuedNotificationJob>> {
        let mut conn = self.conn.clone();
        let members: Vec<String> = conn
            .zrangebyscore_limit(&self.key, "-inf", now, 0, limit as isize)
            .await?;

        let mut jobs = Vec::with_capacity(members.len());
        for member in members {
            let removed: i64 = conn.zrem(&self.key, &member).await?;
            if removed == 0 {
                // Another worker claimed it first
                continue;
            }
            match serde_json::from_str::<QueuedNotificationJob>(&member) {
                Ok(job) => jobs.push(job),
                Err(e) => warn!("Discarding malformed notification job payload: {:?}", e),
            }
        }
        Ok(jobs)
    }
}
