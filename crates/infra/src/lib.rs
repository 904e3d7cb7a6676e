mod config;
mod repos;
mod services;
mod system;

pub use config::{BrevoConfig, Config, UpstashConfig};
pub use repos::{IJobApplicationRepo, IReminderRepo, IUserRepo, Repos};
pub use services::*;
use sqlx::migrate::MigrateError;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
pub use system::ISys;
use system::RealSys;

#[derive(Clone)]
pub struct CareerCareContext {
    pub repos: Repos,
    pub config: Config,
    pub sys: Arc<dyn ISys>,
    pub mailer: Arc<dyn IMailerService>,
    pub quota: Arc<dyn IQuotaService>,
    pub job_queue: Arc<dyn IJobQueue>,
}

struct ContextParams {
    pub postgres_connection_string: String,
}

impl CareerCareContext {
    async fn create(params: ContextParams) -> Self {
        let repos = Repos::create_postgres(&params.postgres_connection_string)
            .await
            .expect("Postgres credentials must be set and valid");
        let config = Config::new();
        let job_queue = RedisJobQueue::connect(&config.redis_url)
            .await
            .expect("Redis credentials must be set and valid");
        Self {
            repos,
            sys: Arc::new(RealSys {}),
            mailer: Arc::new(BrevoMailerService::new(config.brevo.clone())),
            quota: Arc::new(UpstashQuotaService::new(config.upstash.clone())),
            job_queue: Arc::new(job_queue),
            config,
        }
    }
}

/// Will setup the infrastructure context given the environment
pub async fn setup_context() -> CareerCareContext {
    CareerCareContext::create(ContextParams {
        postgres_connection_string: get_psql_connection_string(),
    })
    .await
}

/// Context where every repository and external service is replaced by an
/// in-process double. This is what the use case tests run against.
pub fn setup_context_inmemory() -> CareerCareContext {
    CareerCareContext {
        repos: Repos::create_inmemory(),
        config: Config::new(),
        sys: Arc::new(RealSys {}),
        mailer: Arc::new(InMemoryMailerService::new()),
        quota: Arc::new(StaticQuotaService::new(false)),
        job_queue: Arc::new(InMemoryJobQueue::new()),
    }
}

fn get_psql_connection_string() -> String {
    const PSQL_CONNECTION_STRING: &str = "DATABASE_URL";

    std::env::var(PSQL_CONNECTION_STRING)
        .unwrap_or_else(|_| panic!("{} env var to be present.", PSQL_CONNECTION_STRING))
}

pub async fn run_migration() -> Result<(), MigrateError> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&get_psql_connection_string())
        .await
        .expect("TO CONNECT TO POSTGRES");

    sqlx::migrate!().run(&pool).await
}
