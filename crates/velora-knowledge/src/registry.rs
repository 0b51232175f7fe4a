// SPDX-FileCopyrightText: 2026 Velora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Static service registry: the single source of truth for canonical
//! service keys, display names, aliases, prices, and durations.
//!
//! Every other component refers to services by the canonical `key` defined
//! here; free text is resolved to a key exactly once, at the knowledge-base
//! boundary.

/// A service definition in the static registry.
#[derive(Debug, Clone, Copy)]
pub struct ServiceDef {
    /// Canonical registry key, snake_case.
    pub key: &'static str,
    pub display_name: &'static str,
    /// Coarse category used for disambiguation ("laser", "facial", ...).
    pub category: &'static str,
    /// Price range in whole dollars. `None` means unpublished.
    pub price_min: Option<u32>,
    pub price_max: Option<u32>,
    /// Appointment duration range in minutes.
    pub duration_minutes_min: u32,
    pub duration_minutes_max: Option<u32>,
    /// Matchable user phrasings, longest-specific first is not required;
    /// the resolver sorts at match time.
    pub aliases: &'static [&'static str],
    /// Session guidance shown with service answers, (en, es).
    pub facts: Option<(&'static str, &'static str)>,
    /// Pre-approved message lines, English then Spanish.
    pub canonical_en: &'static [&'static str],
    pub canonical_es: &'static [&'static str],
}

const SESSIONS_FACT_EN: &str = "Most clients need about 6 sessions for best results.";
const SESSIONS_FACT_ES: &str =
    "La mayoría de los clientes necesitan aproximadamente 6 sesiones para mejores resultados.";

/// All registered services.
pub const SERVICES: &[ServiceDef] = &[
    ServiceDef {
        key: "laser_hair_removal",
        display_name: "Laser Hair Removal",
        category: "laser",
        price_min: Some(150),
        price_max: None,
        duration_minutes_min: 90,
        duration_minutes_max: Some(120),
        aliases: &["laser", "laser hair", "laser hair removal", "depilacion laser"],
        facts: Some((SESSIONS_FACT_EN, SESSIONS_FACT_ES)),
        canonical_en: &[
            "Laser Hair Removal",
            "Pricing: $150, full body diode laser",
            "Add-on: Full face, $50, with full body",
            "Recommended: about 6 sessions",
            "Promo: price stays if sessions are consecutive",
            "Brazilian available, please confirm full body or Brazilian only",
        ],
        canonical_es: &[
            "Depilación Láser",
            "Precio: $150, cuerpo completo con diodo",
            "Extra: rostro completo, $50, con cuerpo completo",
            "Recomendado: aproximadamente 6 sesiones",
            "Promo: el precio se mantiene si las sesiones son consecutivas",
            "Brazilian disponible, confirma si es cuerpo completo o solo Brazilian",
        ],
    },
    ServiceDef {
        key: "full_body_diode_laser",
        display_name: "Full Body Diode Laser",
        category: "laser",
        price_min: Some(150),
        price_max: None,
        duration_minutes_min: 90,
        duration_minutes_max: Some(120),
        aliases: &[
            "full body diode laser",
            "full body laser",
            "diode full body",
            "full body diode",
            "full body",
        ],
        facts: Some((SESSIONS_FACT_EN, SESSIONS_FACT_ES)),
        canonical_en: &[],
        canonical_es: &[],
    },
    ServiceDef {
        key: "full_face_laser",
        display_name: "Full Face Laser",
        category: "laser",
        price_min: Some(50),
        price_max: None,
        duration_minutes_min: 30,
        duration_minutes_max: None,
        aliases: &["full face laser", "full face", "face laser"],
        facts: None,
        canonical_en: &["Full Face Laser", "Pricing: $50", "Add-on with Full Body only."],
        canonical_es: &["Full Face Laser", "Precio: $50", "Agregado solo con Full Body."],
    },
    ServiceDef {
        key: "full_legs",
        display_name: "Full Legs",
        category: "laser",
        price_min: Some(60),
        price_max: None,
        duration_minutes_min: 45,
        duration_minutes_max: None,
        aliases: &["full legs", "legs"],
        facts: Some((SESSIONS_FACT_EN, SESSIONS_FACT_ES)),
        canonical_en: &[],
        canonical_es: &[],
    },
    ServiceDef {
        key: "lower_legs",
        display_name: "Lower Legs",
        category: "laser",
        price_min: Some(35),
        price_max: None,
        duration_minutes_min: 30,
        duration_minutes_max: None,
        aliases: &["lower legs", "lower leg"],
        facts: Some((SESSIONS_FACT_EN, SESSIONS_FACT_ES)),
        canonical_en: &[],
        canonical_es: &[],
    },
    ServiceDef {
        key: "full_arms",
        display_name: "Full Arms",
        category: "laser",
        price_min: Some(50),
        price_max: None,
        duration_minutes_min: 40,
        duration_minutes_max: None,
        aliases: &["full arms", "arms"],
        facts: Some((SESSIONS_FACT_EN, SESSIONS_FACT_ES)),
        canonical_en: &[],
        canonical_es: &[],
    },
    ServiceDef {
        key: "lower_arms",
        display_name: "Lower Arms",
        category: "laser",
        price_min: Some(30),
        price_max: None,
        duration_minutes_min: 30,
        duration_minutes_max: None,
        aliases: &["lower arms", "lower arm"],
        facts: Some((SESSIONS_FACT_EN, SESSIONS_FACT_ES)),
        canonical_en: &[],
        canonical_es: &[],
    },
    ServiceDef {
        key: "chest",
        display_name: "Chest",
        category: "laser",
        price_min: Some(30),
        price_max: None,
        duration_minutes_min: 20,
        duration_minutes_max: None,
        aliases: &["chest"],
        facts: None,
        canonical_en: &[],
        canonical_es: &[],
    },
    ServiceDef {
        key: "abdomen",
        display_name: "Abdomen",
        category: "laser",
        price_min: Some(30),
        price_max: None,
        duration_minutes_min: 20,
        duration_minutes_max: None,
        aliases: &["abdomen", "stomach", "belly"],
        facts: None,
        canonical_en: &[],
        canonical_es: &[],
    },
    ServiceDef {
        key: "brazilian_bikini",
        display_name: "Brazilian (Bikini)",
        category: "laser",
        price_min: Some(65),
        price_max: None,
        duration_minutes_min: 30,
        duration_minutes_max: None,
        aliases: &[
            "brazilian bikini",
            "brazilian",
            "bikini",
            "brazilian laser",
            "bikini laser",
        ],
        facts: Some((SESSIONS_FACT_EN, SESSIONS_FACT_ES)),
        canonical_en: &[],
        canonical_es: &[],
    },
    ServiceDef {
        key: "back",
        display_name: "Back",
        category: "laser",
        price_min: Some(45),
        price_max: None,
        duration_minutes_min: 30,
        duration_minutes_max: None,
        aliases: &["back"],
        facts: None,
        canonical_en: &[],
        canonical_es: &[],
    },
    ServiceDef {
        key: "underarms",
        display_name: "Underarms",
        category: "laser",
        price_min: Some(45),
        price_max: None,
        duration_minutes_min: 15,
        duration_minutes_max: None,
        aliases: &["underarms", "underarm", "armpits", "armpit"],
        facts: None,
        canonical_en: &[],
        canonical_es: &[],
    },
    ServiceDef {
        key: "upper_lip",
        display_name: "Upper Lip",
        category: "laser",
        price_min: Some(30),
        price_max: None,
        duration_minutes_min: 10,
        duration_minutes_max: None,
        aliases: &["upper lip", "lip", "upper lip laser"],
        facts: None,
        canonical_en: &[],
        canonical_es: &[],
    },
    ServiceDef {
        key: "forehead",
        display_name: "Forehead",
        category: "laser",
        price_min: Some(40),
        price_max: None,
        duration_minutes_min: 15,
        duration_minutes_max: None,
        aliases: &["forehead"],
        facts: None,
        canonical_en: &[],
        canonical_es: &[],
    },
    ServiceDef {
        key: "sideburns_cheeks",
        display_name: "Sideburns / Cheeks",
        category: "laser",
        price_min: Some(40),
        price_max: None,
        duration_minutes_min: 15,
        duration_minutes_max: None,
        aliases: &["sideburns cheeks", "sideburns", "cheeks", "cheek", "sideburn"],
        facts: None,
        canonical_en: &[],
        canonical_es: &[],
    },
    ServiceDef {
        key: "chin",
        display_name: "Chin",
        category: "laser",
        price_min: Some(30),
        price_max: None,
        duration_minutes_min: 10,
        duration_minutes_max: None,
        aliases: &["chin"],
        facts: None,
        canonical_en: &[],
        canonical_es: &[],
    },
    ServiceDef {
        key: "neck",
        display_name: "Neck",
        category: "laser",
        price_min: Some(45),
        price_max: None,
        duration_minutes_min: 15,
        duration_minutes_max: None,
        aliases: &["neck"],
        facts: None,
        canonical_en: &[],
        canonical_es: &[],
    },
    ServiceDef {
        key: "jawline",
        display_name: "Jawline",
        category: "laser",
        price_min: Some(30),
        price_max: None,
        duration_minutes_min: 15,
        duration_minutes_max: None,
        aliases: &["jawline", "jaw line", "jaw"],
        facts: None,
        canonical_en: &[],
        canonical_es: &[],
    },
    ServiceDef {
        key: "nose_diode_laser",
        display_name: "Nose (Diode Laser)",
        category: "laser",
        price_min: Some(40),
        price_max: None,
        duration_minutes_min: 10,
        duration_minutes_max: None,
        aliases: &["nose diode laser", "nose laser", "nose"],
        facts: None,
        canonical_en: &[],
        canonical_es: &[],
    },
    ServiceDef {
        key: "full_upper_body_diode_laser_men",
        display_name: "Full Upper Body Diode Laser (Men)",
        category: "laser",
        price_min: Some(250),
        price_max: None,
        duration_minutes_min: 90,
        duration_minutes_max: None,
        aliases: &[
            "full upper body diode laser men",
            "full upper body men",
            "upper body men",
            "men full upper body",
            "men upper body",
        ],
        facts: Some((SESSIONS_FACT_EN, SESSIONS_FACT_ES)),
        canonical_en: &[],
        canonical_es: &[],
    },
    ServiceDef {
        key: "full_face_laser_men",
        display_name: "Full Face Laser (Men)",
        category: "laser",
        price_min: Some(80),
        price_max: None,
        duration_minutes_min: 30,
        duration_minutes_max: None,
        aliases: &["full face laser men", "full face men", "men full face", "men face laser"],
        facts: None,
        canonical_en: &[],
        canonical_es: &[],
    },
    ServiceDef {
        key: "upper_body_one_part_men",
        display_name: "Upper Body - One Part (Men)",
        category: "laser",
        price_min: Some(90),
        price_max: None,
        duration_minutes_min: 30,
        duration_minutes_max: None,
        aliases: &["upper body one part men", "one part men", "men one part"],
        facts: None,
        canonical_en: &[],
        canonical_es: &[],
    },
    ServiceDef {
        key: "facial_deep_blackhead_removal",
        display_name: "Facial + Deep Blackhead Removal",
        category: "facial",
        price_min: Some(120),
        price_max: Some(150),
        duration_minutes_min: 60,
        duration_minutes_max: Some(75),
        aliases: &[
            "facial",
            "blackhead",
            "black head",
            "blackhead removal",
            "black head removal",
            "deep blackhead removal",
            "facial deep blackhead",
            "facial blackhead",
            "facial blackhead removal",
        ],
        facts: None,
        canonical_en: &[
            "LIMITED TIME PROMO",
            "Facial + Deep Blackhead Removal",
            "Pricing: $120–150",
            "Deep cleansing",
            "Blackhead removal",
            "Gentle exfoliation",
            "Calming mask",
            "Ultrasonic Skin Treatment",
            "Hydration + SPF finish",
            "This treatment is customized based on your skin to ensure the best results possible.",
        ],
        canonical_es: &[
            "LIMITED TIME PROMO",
            "Facial + Deep Blackhead Removal",
            "Precio: $120–150",
            "Limpieza profunda",
            "Extraccion de puntos negros",
            "Exfoliacion suave",
            "Mascarilla calmante",
            "Ultrasonic Skin Treatment",
            "Hidratacion + SPF",
            "Este tratamiento se personaliza segun tu piel para lograr los mejores resultados posibles.",
        ],
    },
    ServiceDef {
        key: "microdermabrasion",
        display_name: "Microdermabrasion",
        category: "facial",
        price_min: Some(180),
        price_max: None,
        duration_minutes_min: 60,
        duration_minutes_max: None,
        aliases: &["microdermabrasion", "microderm", "micro dermabrasion"],
        facts: None,
        canonical_en: &[],
        canonical_es: &[],
    },
    ServiceDef {
        key: "facelift_massage",
        display_name: "Facelift Massage",
        category: "facial",
        price_min: Some(90),
        price_max: None,
        duration_minutes_min: 60,
        duration_minutes_max: None,
        aliases: &["facelift massage", "facelift", "face lift massage"],
        facts: None,
        canonical_en: &[],
        canonical_es: &[],
    },
    ServiceDef {
        key: "facial_blackhead_removal_lash_lamination",
        display_name: "Facial (Blackhead Removal) + Lash Lamination",
        category: "facial",
        price_min: Some(155),
        price_max: None,
        duration_minutes_min: 90,
        duration_minutes_max: None,
        aliases: &[
            "facial blackhead removal lash lamination",
            "facial and lash lamination",
            "facial lash lamination",
            "facial lash",
        ],
        facts: None,
        canonical_en: &[],
        canonical_es: &[],
    },
    ServiceDef {
        key: "facial_blackhead_removal_laser",
        display_name: "Facial (Blackhead Removal) + Laser",
        category: "facial",
        price_min: Some(200),
        price_max: None,
        duration_minutes_min: 90,
        duration_minutes_max: None,
        aliases: &["facial blackhead removal laser", "facial laser"],
        facts: None,
        canonical_en: &[],
        canonical_es: &[],
    },
    ServiceDef {
        key: "facial_blackhead_removal_eyebrow_lamination",
        display_name: "Facial (Blackhead Removal) + Eyebrow Lamination",
        category: "facial",
        price_min: Some(175),
        price_max: None,
        duration_minutes_min: 90,
        duration_minutes_max: None,
        aliases: &[
            "facial blackhead removal eyebrow lamination",
            "facial eyebrow lamination",
            "facial brow lamination",
        ],
        facts: None,
        canonical_en: &[],
        canonical_es: &[],
    },
    ServiceDef {
        key: "lash_lamination_tinting",
        display_name: "Eyelash Lamination + Tinting",
        category: "lashes",
        price_min: Some(85),
        price_max: None,
        duration_minutes_min: 60,
        duration_minutes_max: None,
        aliases: &[
            "lash",
            "lashes",
            "lash lamination",
            "lamination",
            "eyelash lamination",
            "lash combo",
        ],
        facts: None,
        canonical_en: &[
            "LASH LAMINATION PROMO",
            "Lash Combo",
            "Pricing: $85",
            "Includes:",
            "Lash Lamination",
            "Tinting",
            "Bonus: Complimentary aftercare gift",
        ],
        canonical_es: &[
            "LASH LAMINATION PROMO",
            "Lash Combo",
            "Precio: $85",
            "Incluye:",
            "Lash Lamination",
            "Tinting",
            "Bonus: Complimentary aftercare gift",
        ],
    },
    ServiceDef {
        key: "lash_extensions_all_shapes",
        display_name: "Lash Extensions (All Shapes)",
        category: "lashes",
        price_min: Some(120),
        price_max: None,
        duration_minutes_min: 90,
        duration_minutes_max: None,
        aliases: &[
            "lash extensions all shapes",
            "lash extensions",
            "lash extension",
            "extensions",
            "extension",
        ],
        facts: None,
        canonical_en: &[],
        canonical_es: &[],
    },
    ServiceDef {
        key: "lash_lamination_eyebrow_lamination",
        display_name: "Lash Lamination + Eyebrow Lamination",
        category: "lashes",
        price_min: Some(150),
        price_max: None,
        duration_minutes_min: 90,
        duration_minutes_max: None,
        aliases: &[
            "lash lamination eyebrow lamination",
            "lash eyebrow lamination",
            "lash brow lamination",
        ],
        facts: None,
        canonical_en: &[],
        canonical_es: &[],
    },
    ServiceDef {
        key: "eyebrow_lamination_tint_shaping",
        display_name: "Eyebrow Lamination + Tint + Shaping",
        category: "brows",
        price_min: Some(110),
        price_max: None,
        duration_minutes_min: 75,
        duration_minutes_max: None,
        aliases: &[
            "eyebrow lamination tint shaping",
            "eyebrow lamination tint",
            "brow lamination tint shaping",
            "brow lamination tint",
            "eyebrow shaping lamination tinting",
        ],
        facts: None,
        canonical_en: &[
            "Eyebrow Shaping + Lamination + Tinting",
            "Includes:",
            "Shaping",
            "Lamination",
            "Tinting",
        ],
        canonical_es: &[
            "Eyebrow Shaping + Lamination + Tinting",
            "Incluye:",
            "Shaping",
            "Lamination",
            "Tinting",
        ],
    },
    ServiceDef {
        key: "eyebrow_lamination",
        display_name: "Eyebrow Lamination",
        category: "brows",
        price_min: Some(85),
        price_max: None,
        duration_minutes_min: 45,
        duration_minutes_max: None,
        aliases: &["eyebrow lamination", "brow lamination"],
        facts: None,
        canonical_en: &[],
        canonical_es: &[],
    },
    ServiceDef {
        key: "eyebrow_tinting",
        display_name: "Eyebrow Tinting",
        category: "brows",
        price_min: Some(85),
        price_max: None,
        duration_minutes_min: 30,
        duration_minutes_max: None,
        aliases: &[
            "eyebrow tinting",
            "eyebrow tint",
            "brow tinting",
            "brow tint",
            "eyebrow dye",
            "brow dye",
        ],
        facts: None,
        canonical_en: &[],
        canonical_es: &[],
    },
    ServiceDef {
        key: "eyebrow_shaping",
        display_name: "Eyebrow Shaping",
        category: "brows",
        price_min: Some(85),
        price_max: None,
        duration_minutes_min: 30,
        duration_minutes_max: None,
        aliases: &["eyebrow shaping", "brow shaping", "eyebrow shape", "brow shape", "brow", "brows", "eyebrow"],
        facts: None,
        canonical_en: &[],
        canonical_es: &[],
    },
    ServiceDef {
        key: "pmu_lips",
        display_name: "PMU - Lips",
        category: "pmu",
        price_min: Some(300),
        price_max: None,
        duration_minutes_min: 120,
        duration_minutes_max: None,
        aliases: &[
            "pmu lips",
            "lip pmu",
            "pmu lip",
            "permanent makeup lips",
            "permanent lip",
            "lip permanent makeup",
        ],
        facts: None,
        canonical_en: &[],
        canonical_es: &[],
    },
    ServiceDef {
        key: "pmu_eyebrows",
        display_name: "PMU - Eyebrows",
        category: "pmu",
        price_min: Some(350),
        price_max: None,
        duration_minutes_min: 150,
        duration_minutes_max: None,
        aliases: &[
            "pmu eyebrows",
            "pmu eyebrow",
            "pmu brows",
            "pmu brow",
            "permanent makeup eyebrows",
            "permanent eyebrow",
            "eyebrow permanent makeup",
            "permanent makeup",
        ],
        facts: None,
        canonical_en: &[],
        canonical_es: &[],
    },
    ServiceDef {
        key: "pmu_eyeliner",
        display_name: "PMU - Eyeliner",
        category: "pmu",
        price_min: Some(250),
        price_max: None,
        duration_minutes_min: 120,
        duration_minutes_max: None,
        aliases: &[
            "pmu eyeliner",
            "pmu liner",
            "permanent makeup eyeliner",
            "permanent eyeliner",
            "eyeliner permanent makeup",
        ],
        facts: None,
        canonical_en: &[],
        canonical_es: &[],
    },
    ServiceDef {
        key: "lip_pmu_touchup",
        display_name: "Lip PMU Touch-up",
        category: "pmu",
        price_min: Some(200),
        price_max: None,
        duration_minutes_min: 90,
        duration_minutes_max: None,
        aliases: &[
            "lip pmu touchup",
            "lip pmu touch up",
            "lip touchup",
            "lip touch up",
            "pmu lip touchup",
        ],
        facts: None,
        canonical_en: &[],
        canonical_es: &[],
    },
    ServiceDef {
        key: "deposit_hold",
        display_name: "Deposit Hold",
        category: "other",
        price_min: Some(20),
        price_max: None,
        duration_minutes_min: 15,
        duration_minutes_max: None,
        aliases: &["deposit hold", "deposit"],
        facts: None,
        canonical_en: &[],
        canonical_es: &[],
    },
];

/// Look up a service definition by canonical key.
pub fn service_def(key: &str) -> Option<&'static ServiceDef> {
    let key = key.trim().to_ascii_lowercase();
    SERVICES.iter().find(|def| def.key == key)
}

/// Phrasings that map to a registry key by meaning rather than by name.
/// Checked before alias matching because they are more specific.
pub const SEMANTIC_BUCKETS: &[(&str, &[&str])] = &[
    (
        "facial_deep_blackhead_removal",
        &[
            "deep clean",
            "deep cleaning",
            "deep cleanse",
            "exfoliate",
            "exfoliation",
            "exfoliating",
            "clean pores",
            "pores",
            "pore cleaning",
            "blackheads",
            "whiteheads",
            "clogged pores",
        ],
    ),
    (
        "microdermabrasion",
        &[
            "exfoliate my skin",
            "skin exfoliation",
            "rough texture",
            "skin resurfacing",
            "microderm",
            "microdermabrasion",
        ],
    ),
    (
        "full_face_laser",
        &[
            "razor bumps",
            "ingrowns on face",
            "chin hair",
            "upper lip hair",
            "face hair",
            "facial hair",
        ],
    ),
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn keys_are_unique() {
        let mut seen = HashSet::new();
        for def in SERVICES {
            assert!(seen.insert(def.key), "duplicate key {}", def.key);
        }
    }

    #[test]
    fn semantic_buckets_point_at_real_keys() {
        for (key, _) in SEMANTIC_BUCKETS {
            assert!(service_def(key).is_some(), "bucket key {key} not in registry");
        }
    }

    #[test]
    fn lookup_normalizes_case_and_whitespace() {
        assert!(service_def("  Full_Body_Diode_Laser ").is_some());
        assert!(service_def("not_a_service").is_none());
    }

    #[test]
    fn every_service_has_display_name_and_category() {
        for def in SERVICES {
            assert!(!def.display_name.is_empty());
            assert!(
                ["laser", "facial", "lashes", "brows", "pmu", "other"].contains(&def.category),
                "unexpected category {} for {}",
                def.category,
                def.key
            );
        }
    }
}
