#![allow(dead_code, unused_imports)]

use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use tisa::email::EmailSender;

/// Record of an email call
#[derive(Debug, Clone, Default)]
pub struct EmailCall {
    pub to: String,
    pub code: String,
}

/// Mock email service for testing
pub struct MockEmailService {
    pub calls: Arc<Mutex<Vec<EmailCall>>>,
    pub should_fail: Arc<Mutex<bool>>,
}

impl MockEmailService {
    pub fn new() -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            should_fail: Arc::new(Mutex::new(false)),
        }
    }

    /// Configure the mock to return errors
    pub fn set_should_fail(&self, value: bool) {
        *self.should_fail.lock().unwrap() = value;
    }

    /// Get all recorded email calls
    pub fn get_calls(&self) -> Vec<EmailCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Code of the most recent email sent to `to`
    pub fn last_code_for(&self, to: &str) -> Option<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|c| c.to == to)
            .map(|c| c.code.clone())
    }
}

#[async_trait]
impl EmailSender for MockEmailService {
    async fn send_verification_code(&self, to: &str, code: &str) -> anyhow::Result<()> {
        if *self.should_fail.lock().unwrap() {
            anyhow::bail!("mock email failure");
        }

        self.calls.lock().unwrap().push(EmailCall {
            to: to.to_string(),
            code: code.to_string(),
        });
        Ok(())
    }
}

impl Default for MockEmailService {
    fn default() -> Self {
        Self::new()
    }
}
