use std::sync::Arc;

use thiserror::Error;

use crate::{consts::consts::ErrorString, model::upload::UploadedForm};

pub mod console;
pub mod function;
pub mod resend;

use console::LogRelay;
use function::FunctionRelay;
use resend::{ResendOptions, ResendRelay};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RelayError {
    #[error("Mail relay rejected the form with status {0}")]
    Rejected(u16),

    #[error("Mail relay could not be reached: {0}")]
    Transport(ErrorString),

    #[error("Mail relay is not configured: {0}")]
    NotConfigured(ErrorString),

    #[error("Unable to compose the email: {0}")]
    Compose(ErrorString),
}

/// Forwards an uploaded registration form to the foundation
pub trait MailRelay: Send + Sync {
    fn relay(&self, registrant_name: &str, form: &UploadedForm) -> Result<(), RelayError>;
}

#[derive(Debug, Clone, PartialEq)]
pub enum RelayEngine {
    /// Logs the form and drops it
    Log,
    /// Sends the form through the Resend email API
    Resend(ResendOptions),
    /// Posts the form to a hosted `send-registration-email` function
    Function(String),
}

impl RelayEngine {
    pub fn get_engine(engine: RelayEngine) -> Arc<dyn MailRelay> {
        match engine {
            RelayEngine::Log => Arc::new(LogRelay),
            RelayEngine::Resend(options) => Arc::new(ResendRelay::new(options)),
            RelayEngine::Function(url) => Arc::new(FunctionRelay::new(url)),
        }
    }

    pub fn describe(&self) -> String {
        match self {
            RelayEngine::Log => "log".to_string(),
            RelayEngine::Resend(options) => format!("resend [To: {}]", options.notify_email),
            RelayEngine::Function(url) => format!("function [{}]", url),
        }
    }
}

/// Shared by the http relays
fn check_status(status: reqwest::StatusCode) -> Result<(), RelayError> {
    if status.is_success() {
        Ok(())
    } else {
        Err(RelayError::Rejected(status.as_u16()))
    }
}

fn transport_error(err: reqwest::Error) -> RelayError {
    RelayError::Transport(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_success_status_is_rejected() {
        assert_eq!(check_status(reqwest::StatusCode::OK), Ok(()));
        assert_eq!(check_status(reqwest::StatusCode::ACCEPTED), Ok(()));
        assert_eq!(
            check_status(reqwest::StatusCode::UNPROCESSABLE_ENTITY),
            Err(RelayError::Rejected(422))
        );
    }

    #[test]
    fn describe_names_the_destination() {
        assert_eq!(RelayEngine::Log.describe(), "log");
        assert_eq!(
            RelayEngine::Function("https://fn.example.com/send".to_string()).describe(),
            "function [https://fn.example.com/send]"
        );
    }
}
