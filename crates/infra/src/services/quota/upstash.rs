use super::{IQuotaService, QuotaSnapshot};
use crate::config::UpstashConfig;
use serde::Deserialize;
use tracing::warn;

const DEFAULT_COMMAND_LIMIT: i64 = 500_000;

/// Quota monitor backed by the Upstash redis metrics endpoint.
pub struct UpstashQuotaService {
    http: reqwest::Client,
    config: UpstashConfig,
}

#[derive(Debug, Deserialize)]
struct MetricsResponse {
    commands: Option<i64>,
    max_commands: Option<i64>,
}

impl UpstashQuotaService {
    pub fn new(config: UpstashConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    async fn fetch_metrics(&self) -> anyhow::Result<MetricsResponse> {
        let url = format!(
            "https://api.upstash.com/v1/redis/{}/metrics",
            self.config.redis_id
        );
        let res = self
            .http
            .get(&url)
            .bearer_auth(&self.config.api_token)
            .send()
            .await?
            .error_for_status()?;
        Ok(res.json().await?)
    }
}

#[async_trait::async_trait]
impl IQuotaService for UpstashQuotaService {
    async fn check_quota(&self) -> QuotaSnapshot {
        match self.fetch_metrics().await {
            Ok(metrics) => {
                let used = metrics.commands.unwrap_or(0);
                let limit = metrics.max_commands.unwrap_or(DEFAULT_COMMAND_LIMIT);
                QuotaSnapshot {
                    used,
                    limit,
                    exceeded: used >= limit,
                }
            }
            Err(e) => {
                warn!("Failed to check queue backend quota: {:?}", e);
                // Fail safe: assume exceeded so we do not burn quota
                QuotaSnapshot {
                    used: 0,
                    limit: 0,
                    exceeded: true,
                }
            }
        }
    }
}
