use super::IJobApplicationRepo;
use careercare_domain::{JobApplication, ID};
use sqlx::{types::Uuid, FromRow, PgPool};

pub struct PostgresJobApplicationRepo {
    pool: PgPool,
}

impl PostgresJobApplicationRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct JobApplicationRaw {
    application_uid: Uuid,
    user_uid: Uuid,
    job_title: String,
    company_name: String,
}

impl From<JobApplicationRaw> for JobApplication {
    fn from(raw: JobApplicationRaw) -> Self {
        Self {
            id: raw.application_uid.into(),
            user_id: raw.user_uid.into(),
            job_title: raw.job_title,
            company_name: raw.company_name,
        }
    }
}

#[async_trait::async_trait]
impl IJobApplicationRepo for PostgresJobApplicationRepo {
    async fn insert(&self, application: &JobApplication) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO job_applications
            (application_uid, user_uid, job_title, company_name)
            VALUES($1, $2, $3, $4)
            "#,
        )
        .bind(application.id.inner_ref())
        .bind(application.user_id.inner_ref())
        .bind(&application.job_title)
        .bind(&application.company_name)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find(&self, application_id: &ID) -> Option<JobApplication> {
        sqlx::query_as::<_, JobApplicationRaw>(
            r#"
            SELECT * FROM job_applications
            WHERE application_uid = $1
            "#,
        )
        .bind(application_id.inner_ref())
        .fetch_optional(&self.pool)
        .await
        .ok()
        .flatten()
        .map(|raw| raw.into())
    }
}
