// SPDX-FileCopyrightText: 2026 Velora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Canned reply templates for intents that do not depend on a specific
//! service. Service-specific pricing templates are generated from the
//! registry instead of being written out here.

use velora_core::{Intent, Language};

pub const SERVICES_LIST_EN: &str = "Here is a list of the services we offer\n\n\
✨Laser Hair Removal\n\
✨Eyelash Lamination + Tinting\n\
✨Permanent Makeup\n\
✨Facial + Deep Blackhead Removal\n\
✨Eyebrow Shaping + Lamination + Tinting";

pub const SERVICES_LIST_ES: &str = "Aquí está la lista de servicios que ofrecemos\n\n\
✨Depilación Láser\n\
✨Laminación + Tinte de Pestañas\n\
✨Maquillaje Permanente\n\
✨Facial + Extracción Profunda de Puntos Negros\n\
✨Diseño + Laminación + Tinte de Cejas";

pub const LOCATION_EN: &str = "We are located at:\n📍 375 N First St, Burbank, CA 91502";
pub const LOCATION_ES: &str = "Estamos ubicados en:\n📍 375 N First St, Burbank, CA 91502";

pub const HOURS_EN: &str = "Hours: Monday to Sunday, 10:00 AM to 7:00 PM.";
pub const HOURS_ES: &str = "Horario: Lunes a Domingo, 10:00 AM a 7:00 PM.";

pub const EQUIPMENT_EN: &str = "Laser machine: DM40P Non Crystal Diode Laser. \
Wavelengths: 755 nm, 808 nm, 940 nm, 1064 nm. \
Safe for all skin types. Advanced cooling. Virtually pain-free.";

pub const ELIGIBILITY_EN: &str = "If using Tretinoin, stop 5 to 7 days before treatment.";
pub const ELIGIBILITY_ES: &str =
    "Si usas Tretinoin, debes suspenderlo 5 a 7 dias antes del tratamiento.";

pub const BOOKING_EN: &str = "Please share your preferred day and time to check availability.";
pub const BOOKING_ES: &str = "Por favor comparte tu dia y hora preferidos para revisar disponibilidad.";

pub const CLOSING_EN: &str = "You are very welcome.";
pub const CLOSING_ES: &str = "Con mucho gusto.";

pub const LASH_PROMO_EN: &str = "LASH LAMINATION PROMO\n\n\
Lash Combo\n\
Pricing: $85\n\n\
Includes:\n\
Lash Lamination\n\
Tinting\n\n\
Bonus: Complimentary aftercare gift";

pub const LASH_PROMO_ES: &str = "LASH LAMINATION PROMO\n\n\
Lash Combo\n\
Precio: $85\n\n\
Incluye:\n\
Lash Lamination\n\
Tinting\n\n\
Bonus: Complimentary aftercare gift";

pub const LASER_CLARIFICATION_EN: &str = "Laser Hair Removal pricing depends on the area.\n\n\
We offer:\n\
• Full Body\n\
• Face\n\
• Arms\n\
• Legs\n\
• Brazilian\n\
• Men's Laser Services";

pub const LASER_CLARIFICATION_ES: &str = "El precio de Depilación Láser depende del área.\n\n\
Ofrecemos:\n\
• Full Body\n\
• Face\n\
• Arms\n\
• Legs\n\
• Brazilian\n\
• Men's Laser Services";

/// Look up the default (service-independent) template text for an intent.
pub fn default_template(intent: Intent, language: Language) -> Option<&'static str> {
    let text = match (intent, language) {
        (Intent::ServicesList, Language::En) => SERVICES_LIST_EN,
        (Intent::ServicesList, Language::Es) => SERVICES_LIST_ES,
        (Intent::Location, Language::En) => LOCATION_EN,
        (Intent::Location, Language::Es) => LOCATION_ES,
        (Intent::Hours, Language::En) => HOURS_EN,
        (Intent::Hours, Language::Es) => HOURS_ES,
        // Equipment copy is English-only by owner request.
        (Intent::Equipment, _) => EQUIPMENT_EN,
        (Intent::Eligibility, Language::En) => ELIGIBILITY_EN,
        (Intent::Eligibility, Language::Es) => ELIGIBILITY_ES,
        (Intent::Availability | Intent::Booking, Language::En) => BOOKING_EN,
        (Intent::Availability | Intent::Booking, Language::Es) => BOOKING_ES,
        (Intent::Closing, Language::En) => CLOSING_EN,
        (Intent::Closing, Language::Es) => CLOSING_ES,
        (Intent::PromoPricing, Language::En) => LASH_PROMO_EN,
        (Intent::PromoPricing, Language::Es) => LASH_PROMO_ES,
        _ => return None,
    };
    Some(text)
}
