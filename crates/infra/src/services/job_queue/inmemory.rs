use super::IJobQueue;
use careercare_domain::QueuedNotificationJob;
use std::sync::Mutex;

pub struct InMemoryJobQueue {
    jobs: Mutex<Vec<QueuedNotificationJob>>,
}

impl InMemoryJobQueue {
    pub fn new() -> Self {
        Self {
            jobs: Mutex::new(Vec::new()),
        }
    }

    /// Every job currently on the queue, due or not
    pub fn jobs(&self) -> Vec<QueuedNotificationJob> {
        self.jobs.lock().unwrap().clone()
    }
}

impl Default for InMemoryJobQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl IJobQueue for InMemoryJobQueue {
    async fn enqueue(&self, job: &QueuedNotificationJob) -> anyhow::Result<()> {
        self.jobs.lock().unwrap().push(job.clone());
        Ok(())
    }

    async fn pull_due(&self, now: i64, limit: usize) -> anyhow::Result<Vec<QueuedNotificationJob>> {
        let mut jobs = self.jobs.lock().unwrap();
        let mut due = Vec::new();
        let mut i = 0;
        while i < jobs.len() {
            if due.len() == limit {
                break;
            }
            if jobs[i].fire_at <= now {
                due.push(jobs.remove(i));
            } else {
                i += 1;
            }
        }
        Ok(due)
    }
}
