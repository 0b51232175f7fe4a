// SPDX-FileCopyrightText: 2026 Velora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Port trait definitions for the Velora engine.
//!
//! The engine speaks to the outside world only through these traits:
//! persistence, calendar, messaging platform, intent classification, and
//! the knowledge base. I/O-bound ports use `#[async_trait]` for dynamic
//! dispatch; the knowledge ports are pure lookups and stay synchronous.

pub mod calendar;
pub mod catalog;
pub mod classifier;
pub mod conversation_store;
pub mod knowledge;
pub mod platform;

// Re-export all traits at the traits module level for convenience.
pub use calendar::Calendar;
pub use catalog::ServiceCatalog;
pub use classifier::IntentClassifier;
pub use conversation_store::ConversationStore;
pub use knowledge::KnowledgeBase;
pub use platform::MessagePlatform;
