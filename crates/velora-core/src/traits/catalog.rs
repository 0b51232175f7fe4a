// SPDX-FileCopyrightText: 2026 Velora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Service catalog port: structured per-service attributes.

use crate::types::ServiceEntry;

/// Structured attributes for bookable services, keyed by canonical
/// registry key.
pub trait ServiceCatalog: Send + Sync {
    fn service(&self, key: &str) -> Option<ServiceEntry>;

    /// Appointment length used for slot math. Prefers the upper bound of a
    /// range; unknown services default to 60 minutes.
    fn duration_minutes(&self, key: &str) -> u32 {
        match self.service(key) {
            Some(entry) => entry
                .duration_minutes_max
                .unwrap_or(entry.duration_minutes_min),
            None => 60,
        }
    }

    /// Price range in whole dollars, when published.
    fn price_range(&self, key: &str) -> Option<(u32, Option<u32>)> {
        let entry = self.service(key)?;
        entry.price_min.map(|min| (min, entry.price_max))
    }
}
