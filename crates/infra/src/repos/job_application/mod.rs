mod inmemory;
mod postgres;

use careercare_domain::{JobApplication, ID};
pub use inmemory::InMemoryJobApplicationRepo;
pub use postgres::PostgresJobApplicationRepo;

/// Read access to `JobApplication`s. The full CRUD surface is owned by the
/// job application feature, this subsystem only resolves the fields that go
/// into a notification.
#[async_trait::async_trait]
pub trait IJobApplicationRepo: Send + Sync {
    async fn insert(&self, application: &JobApplication) -> anyhow::Result<()>;
    async fn find(&self, application_id: &ID) -> Option<JobApplication>;
}
