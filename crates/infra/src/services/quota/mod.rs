mod inmemory;
mod upstash;

pub use inmemory::StaticQuotaService;
pub use upstash::UpstashQuotaService;

/// Point in time read of the queue backend usage. `exceeded` is the only
/// field the scheduling strategy looks at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuotaSnapshot {
    pub used: i64,
    pub limit: i64,
    pub exceeded: bool,
}

/// Classifies the delayed queue backend as usable or not. Implementations
/// must fail safe: whenever the usage cannot be determined they report
/// `exceeded = true` so delivery falls back to polling instead of relying
/// on capacity that may not exist.
#[async_trait::async_trait]
pub trait IQuotaService: Send + Sync {
    async fn check_quota(&self) -> QuotaSnapshot;
}
