// SPDX-FileCopyrightText: 2026 Velora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Velora conversational automation engine.
//!
//! This crate provides the foundational trait definitions, error type, and
//! common value types used throughout the Velora workspace. The engine
//! crate consumes external systems (storage, calendar, messaging platform,
//! intent classifier, knowledge base) only through the ports defined here.

pub mod error;
pub mod state;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::VeloraError;
pub use state::{BookingState, BookingStatus, ConversationState, SelectionState, SelectionStatus};
pub use types::{
    DebounceDecision, HistoryEntry, HistoryRole, Intent, IntentClassification, Language, Message,
    MessageId, ResponseTemplate, ServiceEntry, ThreadId,
};

// Re-export all port traits at crate root.
pub use traits::{
    Calendar, ConversationStore, IntentClassifier, KnowledgeBase, MessagePlatform, ServiceCatalog,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn velora_error_has_all_variants() {
        // Verify all 7 error variants exist and can be constructed.
        let _config = VeloraError::Config("test".into());
        let _storage = VeloraError::Storage {
            source: Box::new(std::io::Error::other("test")),
        };
        let _calendar = VeloraError::Calendar {
            message: "test".into(),
            source: None,
        };
        let _platform = VeloraError::Platform {
            message: "test".into(),
            source: None,
        };
        let _upstream = VeloraError::ClassifierUpstream {
            message: "test".into(),
            source: None,
        };
        let _contract = VeloraError::ClassifierContract("test".into());
        let _internal = VeloraError::Internal("test".into());
    }

    #[test]
    fn thread_and_message_ids() {
        let tid = ThreadId("ig:17841400".into());
        let mid = MessageId("mid.abc123".into());

        let tid2 = tid.clone();
        assert_eq!(tid, tid2);
        assert_eq!(tid.to_string(), "ig:17841400");

        let mid2 = mid.clone();
        assert_eq!(mid, mid2);
        assert_eq!(mid.to_string(), "mid.abc123");
    }

    #[test]
    fn all_port_traits_are_exported() {
        // This test verifies that all 6 port traits compile and are
        // accessible through the public API. If any module is missing or
        // has a compile error, this test won't compile.
        fn _assert_store<T: ConversationStore>() {}
        fn _assert_calendar<T: Calendar>() {}
        fn _assert_platform<T: MessagePlatform>() {}
        fn _assert_classifier<T: IntentClassifier>() {}
        fn _assert_knowledge<T: KnowledgeBase>() {}
        fn _assert_catalog<T: ServiceCatalog>() {}
    }
}
