use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::consts::MAX_AGE;

use super::registration::{Gender, NewRegistration};

/// Age arrives either as a JSON number or as the raw string from a number input
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(untagged)]
pub enum AgeInput {
    Number(f64),
    Text(String),
}

/// Body accepted by the `register` backend function
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationRequest {
    pub first_name: Option<String>,
    pub middle_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub age: Option<AgeInput>,
    pub country: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub gender: Option<String>,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Missing required fields: {}", .0.join(", "))]
    MissingRequiredFields(Vec<&'static str>),

    #[error("Invalid age: {0}")]
    InvalidAge(String),

    #[error("Invalid gender: {0}")]
    InvalidGender(String),
}

impl ValidationError {
    /// Message returned to the caller of the backend function
    pub fn user_message(&self) -> String {
        match self {
            ValidationError::MissingRequiredFields(_) => {
                "All required fields must be filled".to_string()
            }
            ValidationError::InvalidAge(_) => {
                format!("Age must be a whole number between 1 and {}", MAX_AGE)
            }
            ValidationError::InvalidGender(_) => {
                "Gender must be one of: male, female, other, prefer_not_to_say".to_string()
            }
        }
    }
}

enum ParsedAge {
    Missing,
    Invalid(String),
    Valid(i32),
}

fn parse_age(age: &Option<AgeInput>) -> ParsedAge {
    match age {
        None => ParsedAge::Missing,
        Some(AgeInput::Text(text)) => {
            let text = text.trim();

            if text.is_empty() {
                return ParsedAge::Missing;
            }

            match text.parse::<i32>() {
                Ok(0) => ParsedAge::Missing,
                Ok(age) if age > 0 && age <= MAX_AGE => ParsedAge::Valid(age),
                _ => ParsedAge::Invalid(text.to_string()),
            }
        }
        Some(AgeInput::Number(number)) => {
            if *number == 0.0 {
                return ParsedAge::Missing;
            }

            if number.fract() != 0.0 || *number < 1.0 || *number > MAX_AGE as f64 {
                return ParsedAge::Invalid(number.to_string());
            }

            ParsedAge::Valid(*number as i32)
        }
    }
}

fn trimmed(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

impl RegistrationRequest {
    /// Server side validation, mirrors the form checks so a direct call cannot skip them
    pub fn validate(&self) -> Result<NewRegistration, ValidationError> {
        let first_name = trimmed(&self.first_name);
        let last_name = trimmed(&self.last_name);
        let email = trimmed(&self.email);
        let country = trimmed(&self.country);
        let address = trimmed(&self.address);
        let phone = trimmed(&self.phone);
        let age = parse_age(&self.age);

        let mut missing = vec![];

        let required = [
            ("firstName", first_name.is_none()),
            ("lastName", last_name.is_none()),
            ("email", email.is_none()),
            ("age", matches!(age, ParsedAge::Missing)),
            ("country", country.is_none()),
            ("address", address.is_none()),
            ("phone", phone.is_none()),
        ];

        for (field, is_missing) in required {
            if is_missing {
                missing.push(field);
            }
        }

        if !missing.is_empty() {
            return Err(ValidationError::MissingRequiredFields(missing));
        }

        let age = match age {
            ParsedAge::Valid(age) => age,
            ParsedAge::Invalid(raw) => return Err(ValidationError::InvalidAge(raw)),
            ParsedAge::Missing => return Err(ValidationError::MissingRequiredFields(vec!["age"])),
        };

        let gender = match trimmed(&self.gender) {
            Some(raw) => Some(
                raw.parse::<Gender>()
                    .map_err(|_| ValidationError::InvalidGender(raw))?,
            ),
            None => None,
        };

        // All required fields were checked above, unwrap_or_default never hits the default
        Ok(NewRegistration {
            first_name: first_name.unwrap_or_default(),
            middle_name: trimmed(&self.middle_name),
            last_name: last_name.unwrap_or_default(),
            email,
            age,
            country: country.unwrap_or_default(),
            address: address.unwrap_or_default(),
            phone: phone.unwrap_or_default(),
            gender,
        })
    }

    pub fn new_test() -> Self {
        RegistrationRequest {
            first_name: Some("Jane".to_string()),
            middle_name: None,
            last_name: Some("Doe".to_string()),
            email: Some("jane@example.com".to_string()),
            age: Some(AgeInput::Number(30.0)),
            country: Some("Kenya".to_string()),
            address: Some("1 Main St".to_string()),
            phone: Some("555-0100".to_string()),
            gender: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    mod required_fields {
        use super::*;

        #[test]
        fn complete_request_is_valid() {
            let new_registration = RegistrationRequest::new_test()
                .validate()
                .expect("should be valid");

            assert_eq!(new_registration, NewRegistration::new_test());
        }

        #[rstest]
        #[case::first_name("firstName")]
        #[case::last_name("lastName")]
        #[case::email("email")]
        #[case::age("age")]
        #[case::country("country")]
        #[case::address("address")]
        #[case::phone("phone")]
        fn missing_field_is_rejected(#[case] field: &'static str) {
            // Given a request with one required field removed
            let mut request = RegistrationRequest::new_test();

            match field {
                "firstName" => request.first_name = None,
                "lastName" => request.last_name = None,
                "email" => request.email = None,
                "age" => request.age = None,
                "country" => request.country = None,
                "address" => request.address = None,
                "phone" => request.phone = None,
                _ => unreachable!(),
            }

            // When we validate it
            let err = request.validate().err().expect("should error");

            // Then the field is reported and the user sees the generic message
            assert_eq!(err, ValidationError::MissingRequiredFields(vec![field]));
            assert_eq!(err.user_message(), "All required fields must be filled");
        }

        #[test]
        fn whitespace_only_counts_as_missing() {
            let mut request = RegistrationRequest::new_test();
            request.country = Some("   ".to_string());

            assert_eq!(
                request.validate(),
                Err(ValidationError::MissingRequiredFields(vec!["country"]))
            );
        }

        #[test]
        fn optional_fields_may_be_absent_or_blank() {
            let mut request = RegistrationRequest::new_test();
            request.middle_name = Some("  ".to_string());
            request.gender = Some("".to_string());

            let new_registration = request.validate().expect("should be valid");

            assert_eq!(new_registration.middle_name, None);
            assert_eq!(new_registration.gender, None);
        }

        #[test]
        fn fields_are_trimmed() {
            let mut request = RegistrationRequest::new_test();
            request.first_name = Some("  Jane ".to_string());
            request.middle_name = Some(" Wanjiru ".to_string());

            let new_registration = request.validate().expect("should be valid");

            assert_eq!(new_registration.first_name, "Jane");
            assert_eq!(new_registration.middle_name, Some("Wanjiru".to_string()));
        }
    }

    mod age {
        use super::*;

        #[rstest]
        #[case(AgeInput::Number(30.0), 30)]
        #[case(AgeInput::Text("30".to_string()), 30)]
        #[case(AgeInput::Text(" 42 ".to_string()), 42)]
        #[case(AgeInput::Number(150.0), 150)]
        fn accepts_positive_whole_numbers(#[case] input: AgeInput, #[case] expected: i32) {
            let mut request = RegistrationRequest::new_test();
            request.age = Some(input);

            assert_eq!(request.validate().unwrap().age, expected);
        }

        #[rstest]
        #[case(AgeInput::Number(0.0))]
        #[case(AgeInput::Text("0".to_string()))]
        #[case(AgeInput::Text("".to_string()))]
        fn zero_or_blank_is_missing(#[case] input: AgeInput) {
            let mut request = RegistrationRequest::new_test();
            request.age = Some(input);

            assert_eq!(
                request.validate(),
                Err(ValidationError::MissingRequiredFields(vec!["age"]))
            );
        }

        #[rstest]
        #[case(AgeInput::Number(-4.0))]
        #[case(AgeInput::Number(30.5))]
        #[case(AgeInput::Number(151.0))]
        #[case(AgeInput::Text("thirty".to_string()))]
        fn invalid_ages_are_rejected(#[case] input: AgeInput) {
            let mut request = RegistrationRequest::new_test();
            request.age = Some(input);

            assert!(matches!(
                request.validate(),
                Err(ValidationError::InvalidAge(_))
            ));
        }
    }

    #[test]
    fn unknown_gender_is_rejected() {
        let mut request = RegistrationRequest::new_test();
        request.gender = Some("robot".to_string());

        assert_eq!(
            request.validate(),
            Err(ValidationError::InvalidGender("robot".to_string()))
        );
    }

    #[test]
    fn deserializes_camel_case_body() {
        let body = r#"{
            "firstName": "Jane",
            "middleName": null,
            "lastName": "Doe",
            "email": "jane@example.com",
            "age": "30",
            "country": "Kenya",
            "address": "1 Main St",
            "phone": "555-0100"
        }"#;

        let request: RegistrationRequest = serde_json::from_str(body).unwrap();

        assert_eq!(request.age, Some(AgeInput::Text("30".to_string())));
        assert_eq!(request.validate().unwrap(), NewRegistration::new_test());
    }
}
