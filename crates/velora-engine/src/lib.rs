// SPDX-FileCopyrightText: 2026 Velora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The Velora message-handling engine.
//!
//! Turns one inbound chat message into at most one policy-compliant reply.
//! [`orchestrator::MessageHandler`] runs the pipeline; the other modules
//! are its deterministic building blocks: text predicates ([`rules`]),
//! date/time extraction ([`dates`]), per-turn context resolution
//! ([`context`]), the booking and selection dialogues ([`booking`],
//! [`selection`]), and reply composition with content validation
//! ([`composer`]).

pub mod booking;
pub mod composer;
pub mod context;
pub mod dates;
pub mod orchestrator;
pub mod rules;
pub mod selection;

pub use booking::{BookingAction, BookingFlow, BookingOutcome};
pub use composer::{ComposeRequest, ComposedReply, ReplyComposer};
pub use context::{resolve_context, ResolvedContext};
pub use orchestrator::{HandleOutcome, MessageHandler};
pub use selection::{SelectionFlow, SelectionOutcome};
