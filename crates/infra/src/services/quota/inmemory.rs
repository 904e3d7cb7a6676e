use super::{IQuotaService, QuotaSnapshot};
use std::sync::atomic::{AtomicBool, Ordering};

/// Quota double with a flippable exceeded flag, used to drive either
/// scheduling strategy in tests.
pub struct StaticQuotaService {
    exceeded: AtomicBool,
}

impl StaticQuotaService {
    pub fn new(exceeded: bool) -> Self {
        Self {
            exceeded: AtomicBool::new(exceeded),
        }
    }

    pub fn set_exceeded(&self, exceeded: bool) {
        self.exceeded.store(exceeded, Ordering::SeqCst);
    }
}

#[async_trait::async_trait]
impl IQuotaService for StaticQuotaService {
    async fn check_quota(&self) -> QuotaSnapshot {
        let exceeded = self.exceeded.load(Ordering::SeqCst);
        QuotaSnapshot {
            used: if exceeded { 500_000 } else { 0 },
            limit: 500_000,
            exceeded,
        }
    }
}
