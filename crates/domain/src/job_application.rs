use crate::shared::entity::{Entity, ID};
use serde::{Deserialize, Serialize};

/// A tracked job application. Owned and mutated by the job application
/// feature; this subsystem only reads it to resolve notification content
/// and the owning `User`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobApplication {
    pub id: ID,
    pub user_id: ID,
    pub job_title: String,
    pub company_name: String,
}

impl JobApplication {
    pub fn new(user_id: ID, job_title: &str, company_name: &str) -> Self {
        Self {
            id: Default::default(),
            user_id,
            job_title: job_title.to_string(),
            company_name: company_name.to_string(),
        }
    }
}

impl Entity<ID> for JobApplication {
    fn id(&self) -> ID {
        self.id.clone()
    }
}
