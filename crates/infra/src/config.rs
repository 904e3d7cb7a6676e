use tracing::warn;

/// Credentials for the Upstash metrics endpoint that backs the quota
/// monitor. When these are missing every quota check fails and therefore
/// reports exceeded, which routes all deliveries through the polling
/// fallback.
#[derive(Debug, Clone)]
pub struct UpstashConfig {
    pub redis_id: String,
    pub api_token: String,
}

/// Credentials for the Brevo transactional email API.
#[derive(Debug, Clone)]
pub struct BrevoConfig {
    pub api_key: String,
    pub sender_email: String,
    pub sender_name: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Port for the application to run on
    pub port: usize,
    /// Connection string for the redis instance backing the delayed job queue
    pub redis_url: String,
    pub upstash: UpstashConfig,
    pub brevo: BrevoConfig,
}

fn env_or_empty(name: &str) -> String {
    match std::env::var(name) {
        Ok(value) => value,
        Err(_) => {
            warn!(
                "Did not find {} environment variable, the dependent integration will be degraded.",
                name
            );
            String::new()
        }
    }
}

impl Config {
    pub fn new() -> Self {
        let default_port = "5000";
        let port = std::env::var("PORT").unwrap_or_else(|_| default_port.into());
        let port = match port.parse::<usize>() {
            Ok(port) => port,
            Err(_) => {
                warn!(
                    "The given PORT: {} is not valid, falling back to the default port: {}.",
                    port, default_port
                );
                default_port.parse::<usize>().unwrap()
            }
        };

        Self {
            port,
            redis_url: std::env::var("REDIS_URL")
                .unwrap_or_else(|_| "redis://localhost:6379".into()),
            upstash: UpstashConfig {
                redis_id: env_or_empty("UPSTASH_REDIS_ID"),
                api_token: env_or_empty("UPSTASH_API_TOKEN"),
            },
            brevo: BrevoConfig {
                api_key: env_or_empty("BREVO_API_KEY"),
                sender_email: env_or_empty("BREVO_SENDER_EMAIL"),
                sender_name: "CareerCare".into(),
            },
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
