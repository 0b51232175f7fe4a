// SPDX-FileCopyrightText: 2026 Velora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Outbound platform mock that captures sent messages for assertions.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use velora_core::{MessagePlatform, VeloraError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub recipient_id: String,
    pub text: String,
}

pub struct MockPlatform {
    sent: Mutex<Vec<SentMessage>>,
    fail_next: AtomicBool,
}

impl MockPlatform {
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail_next: AtomicBool::new(false),
        }
    }

    /// All messages passed to `send_text`, in order.
    pub async fn sent_messages(&self) -> Vec<SentMessage> {
        self.sent.lock().await.clone()
    }

    pub async fn sent_count(&self) -> usize {
        self.sent.lock().await.len()
    }

    /// Make the next send fail with a platform error.
    pub fn fail_next(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }
}

impl Default for MockPlatform {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MessagePlatform for MockPlatform {
    async fn send_text(&self, recipient_id: &str, text: &str) -> Result<(), VeloraError> {
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(VeloraError::Platform {
                message: "mock send failure".to_string(),
                source: None,
            });
        }
        self.sent.lock().await.push(SentMessage {
            recipient_id: recipient_id.to_string(),
            text: text.to_string(),
        });
        Ok(())
    }
}
