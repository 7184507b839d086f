use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::consts::consts::RegistrationId;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Gender {
    Male,
    Female,
    Other,
    PreferNotToSay,
}

impl Gender {
    pub fn label(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Other => "Other",
            Gender::PreferNotToSay => "Prefer not to say",
        }
    }
}

/// Validated registration data, not yet persisted (no id / timestamp)
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct NewRegistration {
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,
    pub email: Option<String>,
    pub age: i32,
    pub country: String,
    pub address: String,
    pub phone: String,
    pub gender: Option<Gender>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Registration {
    pub id: RegistrationId,
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,
    pub email: Option<String>,
    pub age: i32,
    pub country: String,
    pub address: String,
    pub phone: String,
    #[serde(default)]
    pub gender: Option<Gender>,
    /// Display-only, nothing in the application computes it
    #[serde(default)]
    pub amount_paid: Option<f64>,
    #[serde(default)]
    pub form_uploaded: bool,
    pub created_at: DateTime<Utc>,
}

impl Registration {
    pub fn from_new(
        new_registration: NewRegistration,
        id: RegistrationId,
        created_at: DateTime<Utc>,
    ) -> Self {
        let NewRegistration {
            first_name,
            middle_name,
            last_name,
            email,
            age,
            country,
            address,
            phone,
            gender,
        } = new_registration;

        Registration {
            id,
            first_name,
            middle_name,
            last_name,
            email,
            age,
            country,
            address,
            phone,
            gender,
            amount_paid: None,
            form_uploaded: false,
            created_at,
        }
    }

    pub fn full_name(&self) -> String {
        match &self.middle_name {
            Some(middle_name) => format!("{} {} {}", self.first_name, middle_name, self.last_name),
            None => self.display_name(),
        }
    }

    /// Name used in the upload view and in the email relay
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn registered_on(&self) -> String {
        self.created_at.format("%-m/%-d/%Y").to_string()
    }

    pub fn new_test() -> Self {
        Registration::from_new(
            NewRegistration::new_test(),
            RegistrationId("1".to_string()),
            Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0)
                .single()
                .unwrap_or_default(),
        )
    }
}

impl NewRegistration {
    pub fn new_test() -> Self {
        NewRegistration {
            first_name: "Jane".to_string(),
            middle_name: None,
            last_name: "Doe".to_string(),
            email: Some("jane@example.com".to_string()),
            age: 30,
            country: "Kenya".to_string(),
            address: "1 Main St".to_string(),
            phone: "555-0100".to_string(),
            gender: None,
        }
    }

    pub fn with_email(mut self, email: &str) -> Self {
        self.email = Some(email.to_string());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_name_skips_absent_middle_name() {
        let registration = Registration::new_test();

        assert_eq!(registration.full_name(), "Jane Doe");
    }

    #[test]
    fn full_name_includes_middle_name() {
        let mut registration = Registration::new_test();
        registration.middle_name = Some("Wanjiru".to_string());

        assert_eq!(registration.full_name(), "Jane Wanjiru Doe");
        assert_eq!(registration.display_name(), "Jane Doe");
    }

    #[test]
    fn registered_on_is_month_day_year() {
        let mut registration = Registration::new_test();
        registration.created_at = "2025-03-09T16:30:00Z".parse().unwrap();

        assert_eq!(registration.registered_on(), "3/9/2025");
    }

    #[test]
    fn new_registrations_are_not_uploaded() {
        let registration = Registration::from_new(
            NewRegistration::new_test(),
            RegistrationId::new(),
            Utc::now(),
        );

        assert!(!registration.form_uploaded);
        assert!(registration.amount_paid.is_none());
    }

    #[test]
    fn gender_parses_case_insensitively() {
        assert_eq!("Female".parse::<Gender>().unwrap(), Gender::Female);
        assert_eq!(
            "prefer_not_to_say".parse::<Gender>().unwrap(),
            Gender::PreferNotToSay
        );
        assert!("unknown".parse::<Gender>().is_err());
    }

    #[test]
    fn serializes_with_snake_case_keys() {
        let json = serde_json::to_value(Registration::new_test()).unwrap();

        assert_eq!(json["first_name"], "Jane");
        assert_eq!(json["form_uploaded"], false);
        assert_eq!(json["id"], "1");
    }
}
