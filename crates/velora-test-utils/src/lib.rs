// SPDX-FileCopyrightText: 2026 Velora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Velora integration tests.
//!
//! Provides in-memory and mock port implementations for fast,
//! deterministic, CI-runnable tests without external services.
//!
//! # Components
//!
//! - [`MemoryStore`] - In-memory [`velora_core::ConversationStore`]
//! - [`MockCalendar`] - Deterministic calendar with a 30-minute slot grid
//! - [`MockClassifier`] - Keyword-heuristic classifier with scripted overrides
//! - [`MockPlatform`] - Outbound platform that captures sent messages
//! - [`TestHarness`] - Pre-wired mock set plus a default configuration

pub mod harness;
pub mod memory_store;
pub mod mock_calendar;
pub mod mock_classifier;
pub mod mock_platform;

pub use harness::TestHarness;
pub use memory_store::MemoryStore;
pub use mock_calendar::MockCalendar;
pub use mock_classifier::MockClassifier;
pub use mock_platform::MockPlatform;
