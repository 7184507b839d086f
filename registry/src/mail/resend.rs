use std::{sync::OnceLock, time::Duration};

use askama::Template;
use base64::{engine::general_purpose::STANDARD, Engine};
use serde::Serialize;

use crate::{consts::consts::FOUNDATION_NAME, model::upload::UploadedForm};

use super::{check_status, transport_error, MailRelay, RelayError};

pub const RESEND_API_URL: &str = "https://api.resend.com/emails";
pub const RESEND_API_KEY_VAR: &str = "RESEND_API_KEY";

#[derive(Debug, Clone, PartialEq)]
pub struct ResendOptions {
    pub api_key: String,
    pub api_url: String,
    /// Inbox the uploaded forms are delivered to
    pub notify_email: String,
    pub sender_email: String,
}

impl ResendOptions {
    /// Reads the key from `RESEND_API_KEY`
    pub fn from_env(notify_email: String, sender_email: String) -> Result<Self, RelayError> {
        let api_key = std::env::var(RESEND_API_KEY_VAR)
            .map_err(|_| RelayError::NotConfigured(format!("{} is not set", RESEND_API_KEY_VAR)))?;

        Ok(ResendOptions {
            api_key,
            api_url: RESEND_API_URL.to_string(),
            notify_email,
            sender_email,
        })
    }
}

#[derive(Serialize, Debug, PartialEq)]
struct Attachment {
    filename: String,
    content: String,
}

#[derive(Serialize, Debug, PartialEq)]
struct Email {
    from: String,
    to: Vec<String>,
    subject: String,
    html: String,
    attachments: Vec<Attachment>,
}

/// The name is caller supplied, the html extension keeps it escaped
#[derive(Template)]
#[template(
    source = "<p><strong>{{ registrant_name }}</strong> has uploaded their signed registration form.</p><p>The form is attached.</p>",
    ext = "html"
)]
struct EmailBody<'a> {
    registrant_name: &'a str,
}

fn build_email(
    options: &ResendOptions,
    registrant_name: &str,
    form: &UploadedForm,
) -> Result<Email, RelayError> {
    let html = EmailBody { registrant_name }
        .render()
        .map_err(|e| RelayError::Compose(e.to_string()))?;

    Ok(Email {
        from: format!("{} <{}>", FOUNDATION_NAME, options.sender_email),
        to: vec![options.notify_email.clone()],
        subject: format!("Registration form uploaded: {}", registrant_name),
        html,
        attachments: vec![Attachment {
            filename: form.file_name.clone(),
            content: STANDARD.encode(&form.bytes),
        }],
    })
}

pub struct ResendRelay {
    options: ResendOptions,
    client: OnceLock<reqwest::blocking::Client>,
}

impl ResendRelay {
    pub fn new(options: ResendOptions) -> Self {
        Self {
            options,
            client: OnceLock::new(),
        }
    }

    // Built on first use, a blocking client must not be created inside an async runtime
    fn client(&self) -> &reqwest::blocking::Client {
        self.client.get_or_init(|| {
            reqwest::blocking::Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .unwrap_or_default()
        })
    }
}

impl MailRelay for ResendRelay {
    #[tracing::instrument(skip(self, form))]
    fn relay(&self, registrant_name: &str, form: &UploadedForm) -> Result<(), RelayError> {
        let email = build_email(&self.options, registrant_name, form)?;

        let response = self
            .client()
            .post(&self.options.api_url)
            .bearer_auth(&self.options.api_key)
            .json(&email)
            .send()
            .map_err(transport_error)?;

        let status = response.status();

        if !status.is_success() {
            log::error!(
                "Resend rejected registration email [Status: {}, Body: {}]",
                status,
                response.text().unwrap_or_default()
            );
        }

        check_status(status)
    }
}
