use chrono::{TimeZone, Utc};

use crate::consts::consts::RegistrationId;

use super::registration::{Gender, Registration};

struct ShowcaseEntry {
    first_name: &'static str,
    middle_name: Option<&'static str>,
    last_name: &'static str,
    age: i32,
    country: &'static str,
    gender: Gender,
    amount_paid: f64,
    registered: (i32, u32, u32),
}

const SHOWCASE: [ShowcaseEntry; 8] = [
    ShowcaseEntry {
        first_name: "Amara",
        middle_name: Some("Ngozi"),
        last_name: "Okafor",
        age: 34,
        country: "Nigeria",
        gender: Gender::Female,
        amount_paid: 250.0,
        registered: (2025, 1, 14),
    },
    ShowcaseEntry {
        first_name: "Daniel",
        middle_name: None,
        last_name: "Mensah",
        age: 41,
        country: "Ghana",
        gender: Gender::Male,
        amount_paid: 180.0,
        registered: (2025, 1, 12),
    },
    ShowcaseEntry {
        first_name: "Lucia",
        middle_name: None,
        last_name: "Fernandes",
        age: 29,
        country: "Brazil",
        gender: Gender::Female,
        amount_paid: 320.0,
        registered: (2025, 1, 10),
    },
    ShowcaseEntry {
        first_name: "Joseph",
        middle_name: Some("Kiprono"),
        last_name: "Kiptoo",
        age: 52,
        country: "Kenya",
        gender: Gender::Male,
        amount_paid: 150.0,
        registered: (2025, 1, 9),
    },
    ShowcaseEntry {
        first_name: "Priya",
        middle_name: None,
        last_name: "Raman",
        age: 38,
        country: "India",
        gender: Gender::Female,
        amount_paid: 275.0,
        registered: (2025, 1, 7),
    },
    ShowcaseEntry {
        first_name: "Mateo",
        middle_name: None,
        last_name: "Alvarez",
        age: 45,
        country: "Mexico",
        gender: Gender::Male,
        amount_paid: 200.0,
        registered: (2025, 1, 5),
    },
    ShowcaseEntry {
        first_name: "Grace",
        middle_name: Some("Akosua"),
        last_name: "Boateng",
        age: 27,
        country: "Ghana",
        gender: Gender::Female,
        amount_paid: 120.0,
        registered: (2025, 1, 3),
    },
    ShowcaseEntry {
        first_name: "Samuel",
        middle_name: None,
        last_name: "Tesfaye",
        age: 60,
        country: "Ethiopia",
        gender: Gender::Male,
        amount_paid: 300.0,
        registered: (2025, 1, 2),
    },
];

/// Demonstration rows shown ahead of the live list. Never persisted, ids are synthetic.
pub fn showcase_registrations() -> Vec<Registration> {
    SHOWCASE
        .iter()
        .enumerate()
        .filter_map(|(index, entry)| {
            let (year, month, day) = entry.registered;

            let created_at = Utc
                .with_ymd_and_hms(year, month, day, 9, 0, 0)
                .single()?;

            Some(Registration {
                id: RegistrationId(format!("showcase-{}", index + 1)),
                first_name: entry.first_name.to_string(),
                middle_name: entry.middle_name.map(str::to_string),
                last_name: entry.last_name.to_string(),
                email: None,
                age: entry.age,
                country: entry.country.to_string(),
                address: String::new(),
                phone: String::new(),
                gender: Some(entry.gender),
                amount_paid: Some(entry.amount_paid),
                form_uploaded: true,
                created_at,
            })
        })
        .collect()
}

pub fn is_showcase(registration: &Registration) -> bool {
    registration.id.as_str().starts_with("showcase-")
}
