use actix_multipart::Multipart;
use actix_web::{
    error::BlockingError,
    http::StatusCode,
    post,
    web::{self, Bytes, Data},
    HttpResponse, ResponseError,
};
use registry::{
    consts::consts::MAX_UPLOAD_BYTES,
    mail::function::{FILE_FIELD, REGISTRANT_NAME_FIELD},
    model::{request::RegistrationRequest, upload::UploadedForm},
    registrar::registrar::{Registrar, RegistrarError},
};
use serde_json::json;
use thiserror::Error;

use crate::multipart::{collect_parts, find, PayloadError};

/// Errors of the backend functions. The message is what the caller sees, details are logged.
#[derive(Error, Debug, PartialEq)]
pub enum FunctionError {
    #[error("{0}")]
    BadRequest(String),

    #[error("This email has already been registered")]
    DuplicateEmail,

    #[error("Upload exceeds the 10 MiB limit")]
    PayloadTooLarge,

    #[error("Failed to save registration")]
    SaveFailed,

    #[error("Failed to send registration email")]
    SendFailed,
}

impl ResponseError for FunctionError {
    fn status_code(&self) -> StatusCode {
        match self {
            FunctionError::BadRequest(_) => StatusCode::BAD_REQUEST,
            FunctionError::DuplicateEmail => StatusCode::CONFLICT,
            FunctionError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            FunctionError::SaveFailed | FunctionError::SendFailed => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({ "error": self.to_string() }))
    }
}

fn blocking_failed(err: BlockingError) -> RegistrarError {
    RegistrarError::Store(registry::store::StoreError::Backend(err.to_string()))
}

/// Validates the payload and inserts the registration
#[post("/functions/v1/register")]
async fn register(registrar: Data<Registrar>, body: Bytes) -> Result<HttpResponse, FunctionError> {
    let request: RegistrationRequest = serde_json::from_slice(&body).map_err(|e| {
        log::debug!("Rejected register body: {}", e);
        FunctionError::BadRequest("Invalid request body".to_string())
    })?;

    let result = web::block(move || registrar.register(&request))
        .await
        .unwrap_or_else(|e| Err(blocking_failed(e)));

    match result {
        Ok(registration) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "registration": registration,
        }))),
        Err(RegistrarError::Validation(e)) => Err(FunctionError::BadRequest(e.user_message())),
        Err(RegistrarError::DuplicateEmail(_)) => Err(FunctionError::DuplicateEmail),
        Err(e) => {
            log::error!("Failed to save registration: {}", e);
            Err(FunctionError::SaveFailed)
        }
    }
}

/// Relays an uploaded registration form by email
#[post("/functions/v1/send-registration-email")]
async fn send_registration_email(
    registrar: Data<Registrar>,
    payload: Multipart,
) -> Result<HttpResponse, FunctionError> {
    let parts = collect_parts(payload, MAX_UPLOAD_BYTES)
        .await
        .map_err(|e| match e {
            PayloadError::TooLarge(_) => FunctionError::PayloadTooLarge,
            PayloadError::Malformed(message) => FunctionError::BadRequest(message),
        })?;

    let file = find(&parts, FILE_FIELD)
        .filter(|part| !part.bytes.is_empty())
        .ok_or_else(|| FunctionError::BadRequest("A PDF file is required".to_string()))?;

    let registrant_name = find(&parts, REGISTRANT_NAME_FIELD)
        .map(|part| part.text())
        .filter(|name| !name.is_empty())
        .ok_or_else(|| FunctionError::BadRequest("Registrant name is required".to_string()))?;

    let form = UploadedForm::new(
        file.file_name
            .clone()
            .unwrap_or_else(|| "registration.pdf".to_string()),
        file.content_type.as_deref().unwrap_or_default(),
        file.bytes.clone(),
    )
    .map_err(|e| FunctionError::BadRequest(e.to_string()))?;

    let result = web::block(move || registrar.send_form(&registrant_name, &form))
        .await
        .unwrap_or_else(|e| Err(blocking_failed(e)));

    match result {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({ "success": true }))),
        Err(e) => {
            log::error!("Failed to send registration email: {}", e);
            Err(FunctionError::SendFailed)
        }
    }
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(register).service(send_registration_email);
}
