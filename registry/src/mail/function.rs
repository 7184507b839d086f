use std::{sync::OnceLock, time::Duration};

use reqwest::blocking::multipart::{Form, Part};

use crate::model::upload::UploadedForm;

use super::{check_status, transport_error, MailRelay, RelayError};

pub const FILE_FIELD: &str = "file";
pub const REGISTRANT_NAME_FIELD: &str = "registrantName";

/// Hands the form to a hosted `send-registration-email` function, which does the mailing
pub struct FunctionRelay {
    url: String,
    client: OnceLock<reqwest::blocking::Client>,
}

impl FunctionRelay {
    pub fn new(url: String) -> Self {
        Self {
            url,
            client: OnceLock::new(),
        }
    }

    fn client(&self) -> &reqwest::blocking::Client {
        self.client.get_or_init(|| {
            reqwest::blocking::Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .unwrap_or_default()
        })
    }
}

fn build_form(registrant_name: &str, form: &UploadedForm) -> Result<Form, RelayError> {
    let file = Part::bytes(form.bytes.clone())
        .file_name(form.file_name.clone())
        .mime_str(&form.content_type)
        .map_err(transport_error)?;

    Ok(Form::new()
        .part(FILE_FIELD, file)
        .text(REGISTRANT_NAME_FIELD, registrant_name.to_string()))
}

impl MailRelay for FunctionRelay {
    #[tracing::instrument(skip(self, form))]
    fn relay(&self, registrant_name: &str, form: &UploadedForm) -> Result<(), RelayError> {
        let response = self
            .client()
            .post(&self.url)
            .multipart(build_form(registrant_name, form)?)
            .send()
            .map_err(transport_error)?;

        let status = response.status();

        if !status.is_success() {
            log::error!(
                "send-registration-email failed [Url: {}, Status: {}]",
                self.url,
                status
            );
        }

        check_status(status)
    }
}
