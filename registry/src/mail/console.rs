use num_format::{Locale, ToFormattedString};

use crate::model::upload::UploadedForm;

use super::{MailRelay, RelayError};

/// Development relay, the form never leaves the process
pub struct LogRelay;

impl MailRelay for LogRelay {
    fn relay(&self, registrant_name: &str, form: &UploadedForm) -> Result<(), RelayError> {
        log::info!(
            "📧 Registration form received [Registrant: {}, File: {}, Bytes: {}]",
            registrant_name,
            form.file_name,
            form.size().to_formatted_string(&Locale::en)
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test_log::test]
    fn always_accepts() {
        assert_eq!(LogRelay.relay("Jane Doe", &UploadedForm::new_test()), Ok(()));
    }
}
