// SPDX-FileCopyrightText: 2026 Velora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Pre-wired mock set for engine integration tests.
//!
//! Bundles the in-memory store, mock calendar/classifier/platform, the real
//! knowledge base and catalog, and a default configuration with auto-reply
//! enabled. Tests construct the engine from these parts and then drive it
//! with synthetic messages.

use std::sync::Arc;

use velora_config::VeloraConfig;
use velora_core::{Message, MessageId, ThreadId};
use velora_knowledge::{ServiceCatalogStore, StructuredKnowledgeBase};

use crate::{MemoryStore, MockCalendar, MockClassifier, MockPlatform};

pub struct TestHarness {
    pub store: Arc<MemoryStore>,
    pub calendar: Arc<MockCalendar>,
    pub classifier: Arc<MockClassifier>,
    pub platform: Arc<MockPlatform>,
    pub kb: Arc<StructuredKnowledgeBase>,
    pub catalog: Arc<ServiceCatalogStore>,
    pub config: VeloraConfig,
}

impl TestHarness {
    pub fn new() -> Self {
        let mut config = VeloraConfig::default();
        config.engine.auto_reply = true;
        Self {
            store: Arc::new(MemoryStore::new()),
            calendar: Arc::new(MockCalendar::new()),
            classifier: Arc::new(MockClassifier::new()),
            platform: Arc::new(MockPlatform::new()),
            kb: Arc::new(StructuredKnowledgeBase),
            catalog: Arc::new(ServiceCatalogStore),
            config,
        }
    }

    /// Synthetic inbound message on a fixed thread.
    pub fn message(id: &str, text: &str, timestamp: i64) -> Message {
        Message {
            id: MessageId(id.to_string()),
            thread_id: ThreadId("ig:thread-1".to_string()),
            sender_id: "sender-1".to_string(),
            text: text.to_string(),
            timestamp,
            platform: "instagram".to_string(),
        }
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}
