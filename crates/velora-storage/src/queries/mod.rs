// SPDX-FileCopyrightText: 2026 Velora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Query modules for the conversation store tables.

pub mod debounce;
pub mod history;
pub mod processed;
pub mod threads;
