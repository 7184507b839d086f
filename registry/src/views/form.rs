use serde::{Deserialize, Serialize};

use crate::model::request::{AgeInput, RegistrationRequest};

use super::toast::Toast;

pub const MISSING_FIELDS_MESSAGE: &str = "Please fill in all required fields.";
pub const REGISTRATION_FAILED_MESSAGE: &str = "Registration failed. Please try again.";
pub const REGISTRATION_SUCCESS_MESSAGE: &str =
    "Registration successful! A notification has been sent.";

/// Raw values of the registration form, exactly as typed
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct RegistrationForm {
    pub first_name: String,
    pub middle_name: String,
    pub last_name: String,
    pub email: String,
    pub age: String,
    pub country: String,
    pub address: String,
    pub phone: String,
    pub gender: String,
}

impl RegistrationForm {
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("firstName", &self.first_name),
            ("lastName", &self.last_name),
            ("email", &self.email),
            ("age", &self.age),
            ("country", &self.country),
            ("address", &self.address),
            ("phone", &self.phone),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| field)
        .collect()
    }

    /// Checks the required fields before anything is sent to the backend
    pub fn submission(&self) -> Result<RegistrationRequest, Toast> {
        if !self.missing_fields().is_empty() {
            return Err(Toast::error(MISSING_FIELDS_MESSAGE));
        }

        let optional = |value: &str| {
            let value = value.trim();
            (!value.is_empty()).then(|| value.to_string())
        };

        Ok(RegistrationRequest {
            first_name: optional(&self.first_name),
            middle_name: optional(&self.middle_name),
            last_name: optional(&self.last_name),
            email: optional(&self.email),
            age: optional(&self.age).map(AgeInput::Text),
            country: optional(&self.country),
            address: optional(&self.address),
            phone: optional(&self.phone),
            gender: optional(&self.gender),
        })
    }

    pub fn new_test() -> Self {
        RegistrationForm {
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            email: "jane@example.com".to_string(),
            age: "30".to_string(),
            country: "Kenya".to_string(),
            address: "1 Main St".to_string(),
            phone: "555-0100".to_string(),
            ..Default::default()
        }
    }
}
