// SPDX-FileCopyrightText: 2026 Velora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Outbound messaging port.

use async_trait::async_trait;

use crate::error::VeloraError;

/// Channel-specific delivery of composed replies.
#[async_trait]
pub trait MessagePlatform: Send + Sync {
    /// Sends a plain-text message to a recipient on this platform.
    async fn send_text(&self, recipient_id: &str, text: &str) -> Result<(), VeloraError>;
}
