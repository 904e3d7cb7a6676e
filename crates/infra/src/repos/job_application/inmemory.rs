use super::IJobApplicationRepo;
use crate::repos::shared::inmemory_repo::*;
use careercare_domain::{JobApplication, ID};
use std::sync::Mutex;

pub struct InMemoryJobApplicationRepo {
    applications: Mutex<Vec<JobApplication>>,
}

impl InMemoryJobApplicationRepo {
    pub fn new() -> Self {
        Self {
            applications: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait::async_trait]
impl IJobApplicationRepo for InMemoryJobApplicationRepo {
    async fn insert(&self, application: &JobApplication) -> anyhow::Result<()> {
        insert(application, &self.applications);
        Ok(())
    }

    async fn find(&self, application_id: &ID) -> Option<JobApplication> {
        find(application_id, &self.applications)
    }
}
