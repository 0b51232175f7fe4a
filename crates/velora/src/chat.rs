// SPDX-FileCopyrightText: 2026 Velora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `velora chat` command implementation.
//!
//! Interactive REPL driving the full message pipeline with the real
//! knowledge base and SQLite store, and mock calendar/classifier/platform
//! adapters. Replies are printed instead of delivered, so the session is
//! safe to run anywhere.

use std::sync::Arc;

use chrono::{FixedOffset, Offset, Utc};
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing::info;

use velora_config::VeloraConfig;
use velora_core::{Message, MessageId, ThreadId, VeloraError};
use velora_engine::{HandleOutcome, MessageHandler};
use velora_knowledge::{ServiceCatalogStore, StructuredKnowledgeBase};
use velora_storage::{Database, SqliteConversationStore};
use velora_test_utils::{MockCalendar, MockClassifier, MockPlatform};

/// Runs the `velora chat` interactive REPL.
pub async fn run_chat(config: VeloraConfig) -> Result<(), VeloraError> {
    let db = Database::open(&config.storage.database_path, config.storage.wal_mode).await?;
    let offset = FixedOffset::east_opt(config.business.timezone_offset_hours * 3600)
        .unwrap_or_else(|| Utc.fix());
    let store = Arc::new(SqliteConversationStore::new(
        db,
        offset,
        config.engine.history_limit,
        config.engine.processed_cap,
    ));

    let handler = MessageHandler::new(
        store.clone(),
        Arc::new(StructuredKnowledgeBase),
        Arc::new(ServiceCatalogStore),
        Arc::new(MockClassifier::new()),
        Arc::new(MockCalendar::new()),
        Arc::new(MockPlatform::new()),
        &config,
    );

    let thread = ThreadId("cli:local".to_string());
    info!(thread_id = %thread, "chat session started");
    println!(
        "{}",
        format!("{} chat - Ctrl+D to exit", config.business.name).dimmed()
    );

    let mut editor = DefaultEditor::new()
        .map_err(|e| VeloraError::Internal(format!("readline init failed: {e}")))?;
    let mut sequence: u64 = 0;

    loop {
        match editor.readline(&"you> ".cyan().to_string()) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                let _ = editor.add_history_entry(trimmed);

                sequence += 1;
                let message = Message {
                    id: MessageId(format!("cli-{sequence}")),
                    thread_id: thread.clone(),
                    sender_id: "local".to_string(),
                    text: trimmed.to_string(),
                    timestamp: Utc::now().timestamp(),
                    platform: "cli".to_string(),
                };

                match handler.handle(&message).await {
                    HandleOutcome::Replied(text) => {
                        println!("{} {text}", "velora>".green());
                    }
                    HandleOutcome::Skipped => {
                        println!("{}", "(no reply)".dimmed());
                    }
                    HandleOutcome::Handoff(reason) => {
                        println!("{}", format!("(handed off: {reason})").yellow());
                    }
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("{}: {e}", "error".red());
                break;
            }
        }
    }

    store.database().close().await?;
    println!("{}", "goodbye".dimmed());
    Ok(())
}
