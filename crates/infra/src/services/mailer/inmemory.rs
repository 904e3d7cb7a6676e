use super::{IMailerService, ReminderEmail};
use anyhow::anyhow;
use std::collections::HashSet;
use std::sync::Mutex;

/// Mail transport double that records every delivery and can be told to
/// fail for specific recipients.
pub struct InMemoryMailerService {
    sent: Mutex<Vec<ReminderEmail>>,
    failing_recipients: Mutex<HashSet<String>>,
}

impl InMemoryMailerService {
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            failing_recipients: Mutex::new(HashSet::new()),
        }
    }

    pub fn sent(&self) -> Vec<ReminderEmail> {
        self.sent.lock().unwrap().clone()
    }

    pub fn fail_for(&self, recipient: &str) {
        self.failing_recipients
            .lock()
            .unwrap()
            .insert(recipient.to_string());
    }
}

impl Default for InMemoryMailerService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl IMailerService for InMemoryMailerService {
    async fn send_reminder(&self, email: &ReminderEmail) -> anyhow::Result<()> {
        if self.failing_recipients.lock().unwrap().contains(&email.to) {
            return Err(anyhow!("Mail transport rejected recipient: {}", email.to));
        }
        self.sent.lock().unwrap().push(email.clone());
        Ok(())
    }
}
