// SPDX-FileCopyrightText: 2026 Velora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Service catalog over the static registry: structured attributes used by
//! scheduling and pricing logic.

use velora_core::{ServiceCatalog, ServiceEntry};

use crate::registry::service_def;

#[derive(Debug, Default)]
pub struct ServiceCatalogStore;

impl ServiceCatalogStore {
    pub fn new() -> Self {
        Self
    }
}

impl ServiceCatalog for ServiceCatalogStore {
    fn service(&self, key: &str) -> Option<ServiceEntry> {
        let def = service_def(key)?;
        Some(ServiceEntry {
            key: def.key.to_string(),
            display_name: def.display_name.to_string(),
            category: def.category.to_string(),
            price_min: def.price_min,
            price_max: def.price_max,
            duration_minutes_min: def.duration_minutes_min,
            duration_minutes_max: def.duration_minutes_max,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_service_has_attributes() {
        let catalog = ServiceCatalogStore::new();
        let entry = catalog.service("brazilian_bikini").expect("entry");
        assert_eq!(entry.display_name, "Brazilian (Bikini)");
        assert_eq!(entry.price_min, Some(65));
        assert_eq!(entry.category, "laser");
    }

    #[test]
    fn duration_prefers_range_upper_bound() {
        let catalog = ServiceCatalogStore::new();
        // full_body_diode_laser is 90-120 minutes.
        assert_eq!(catalog.duration_minutes("full_body_diode_laser"), 120);
        // chin has a single 10-minute figure.
        assert_eq!(catalog.duration_minutes("chin"), 10);
        // unknown services fall back to an hour.
        assert_eq!(catalog.duration_minutes("mystery"), 60);
    }

    #[test]
    fn price_range_for_ranged_and_flat_prices() {
        let catalog = ServiceCatalogStore::new();
        assert_eq!(
            catalog.price_range("facial_deep_blackhead_removal"),
            Some((120, Some(150)))
        );
        assert_eq!(catalog.price_range("chin"), Some((30, None)));
        assert_eq!(catalog.price_range("mystery"), None);
    }
}
