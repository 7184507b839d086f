use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// Types
pub type ErrorString = String;

// New Type Pattern -- https://doc.rust-lang.org/rust-by-example/generics/new_types.html
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct RegistrationId(pub String);

impl RegistrationId {
    pub fn new() -> RegistrationId {
        RegistrationId(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for RegistrationId {
    fn default() -> Self {
        RegistrationId::new()
    }
}

impl fmt::Display for RegistrationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for RegistrationId {
    fn from(value: &str) -> Self {
        RegistrationId(value.to_string())
    }
}

// Values
pub const FOUNDATION_NAME: &str = "HopeRise Foundation";

/// Key the superseded browser-local variant stored its registrant list under
pub const LOCAL_STORAGE_KEY: &str = "foundation_registrants";

pub const PDF_MIME_TYPE: &str = "application/pdf";

pub const VERIFIED_STATUS: &str = "Verified";

pub const MAX_AGE: i32 = 150;

pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;
