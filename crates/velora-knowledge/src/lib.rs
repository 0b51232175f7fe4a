// SPDX-FileCopyrightText: 2026 Velora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Structured business knowledge for the Velora engine.
//!
//! Everything in this crate is static data plus pure lookup logic: the
//! service registry (canonical keys, aliases, prices, durations), canned
//! reply templates, and the resolution pipeline that maps free text onto
//! canonical service keys.

pub mod catalog;
pub mod kb;
pub mod registry;
pub mod templates;

pub use catalog::ServiceCatalogStore;
pub use kb::StructuredKnowledgeBase;
pub use registry::{service_def, ServiceDef, SERVICES};
