use actix_multipart::Multipart;
use actix_web::{
    get,
    http::{
        header::{ContentDisposition, DispositionParam, DispositionType},
        StatusCode,
    },
    post,
    web::{self, Data, Path, Query},
    CustomizeResponder, HttpResponse, Responder, ResponseError,
};
use actix_web_lab::respond::Html;
use askama::Template;
use registry::{
    consts::consts::{RegistrationId, FOUNDATION_NAME, MAX_UPLOAD_BYTES, PDF_MIME_TYPE},
    export::pdf::{export_registration, ExportError},
    mail::function::FILE_FIELD,
    model::registration::Registration,
    registrar::registrar::{Registrar, RegistrarError},
    views::{
        form::{
            RegistrationForm, REGISTRATION_FAILED_MESSAGE, REGISTRATION_SUCCESS_MESSAGE,
        },
        listing::{Listing, EMPTY_STATE},
        toast::Toast,
        upload::{
            header, select_pdf, SelectedFile, NO_FILE_MESSAGE, UPLOAD_COMPLETE_TITLE,
            UPLOAD_FAILED_MESSAGE, UPLOAD_SUCCESS_MESSAGE,
        },
    },
};
use serde::Deserialize;
use thiserror::Error;

use crate::multipart::{collect_parts, find, PayloadError};

#[derive(Error, Debug)]
pub enum PageError {
    #[error("Unable to render page: {0}")]
    Render(#[from] askama::Error),

    #[error("Unable to render registration form: {0}")]
    Export(#[from] ExportError),

    #[error("Registrations are unavailable right now")]
    Unavailable,
}

impl ResponseError for PageError {
    fn status_code(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }

    fn error_response(&self) -> HttpResponse {
        log::error!("{}", self);

        HttpResponse::InternalServerError()
            .content_type("text/plain; charset=utf-8")
            .body("Something went wrong. Please try again.")
    }
}

type Page = CustomizeResponder<Html>;

fn render(template: &impl Template, status: StatusCode) -> Result<Page, PageError> {
    Ok(Html(template.render()?).customize().with_status(status))
}

/// Runs a registrar call on the blocking pool
async fn blocking<T: Send + 'static>(
    registrar: Data<Registrar>,
    call: impl FnOnce(&Registrar) -> Result<T, RegistrarError> + Send + 'static,
) -> Result<T, RegistrarError> {
    web::block(move || call(&registrar))
        .await
        .unwrap_or_else(|e| {
            Err(RegistrarError::Store(
                registry::store::StoreError::Backend(e.to_string()),
            ))
        })
}

#[derive(Template)]
#[template(path = "index.html")]
struct IndexTemplate {
    foundation: &'static str,
    toast: Option<Toast>,
}

#[get("/")]
async fn index() -> Result<Page, PageError> {
    render(
        &IndexTemplate {
            foundation: FOUNDATION_NAME,
            toast: None,
        },
        StatusCode::OK,
    )
}

#[derive(Template)]
#[template(path = "register.html")]
struct RegisterTemplate {
    form: RegistrationForm,
    toast: Option<Toast>,
}

#[derive(Template)]
#[template(path = "register_success.html")]
struct RegisterSuccessTemplate {
    registration: Registration,
    toast: Option<Toast>,
}

#[get("/register")]
async fn register_form() -> Result<Page, PageError> {
    render(
        &RegisterTemplate {
            form: RegistrationForm::default(),
            toast: None,
        },
        StatusCode::OK,
    )
}

#[post("/register")]
async fn register_submit(
    registrar: Data<Registrar>,
    form: web::Form<RegistrationForm>,
) -> Result<Page, PageError> {
    let form = form.into_inner();

    let request = match form.submission() {
        Ok(request) => request,
        Err(toast) => {
            return render(
                &RegisterTemplate {
                    form,
                    toast: Some(toast),
                },
                StatusCode::BAD_REQUEST,
            )
        }
    };

    match blocking(registrar, move |registrar| registrar.register(&request)).await {
        Ok(registration) => render(
            &RegisterSuccessTemplate {
                registration,
                toast: Some(Toast::success(REGISTRATION_SUCCESS_MESSAGE)),
            },
            StatusCode::OK,
        ),
        Err(e) => {
            log::warn!("Registration failed: {}", e);

            let status = match e {
                RegistrarError::Validation(_) => StatusCode::BAD_REQUEST,
                RegistrarError::DuplicateEmail(_) => StatusCode::CONFLICT,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            };

            render(
                &RegisterTemplate {
                    form,
                    toast: Some(Toast::error(REGISTRATION_FAILED_MESSAGE)),
                },
                status,
            )
        }
    }
}

#[derive(Template)]
#[template(path = "not_found.html")]
struct NotFoundTemplate {
    toast: Option<Toast>,
}

#[get("/registrations/{id}/form.pdf")]
async fn download_form(
    registrar: Data<Registrar>,
    id: Path<String>,
) -> Result<HttpResponse, PageError> {
    let id = RegistrationId(id.into_inner());

    let registration = blocking(registrar, move |registrar| registrar.find(&id))
        .await
        .map_err(|e| {
            log::error!("Unable to load registration: {}", e);
            PageError::Unavailable
        })?;

    let Some(registration) = registration else {
        let page = NotFoundTemplate { toast: None }.render()?;

        return Ok(HttpResponse::NotFound()
            .content_type("text/html; charset=utf-8")
            .body(page));
    };

    let export = web::block(move || export_registration(&registration))
        .await
        .map_err(|_| PageError::Unavailable)??;

    Ok(HttpResponse::Ok()
        .content_type(PDF_MIME_TYPE)
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(export.file_name)],
        })
        .body(export.bytes))
}

#[derive(Deserialize)]
struct UploadQuery {
    id: Option<String>,
}

#[derive(Template)]
#[template(path = "upload.html")]
struct UploadTemplate {
    header: String,
    id: Option<String>,
    toast: Option<Toast>,
}

#[derive(Template)]
#[template(path = "upload_success.html")]
struct UploadSuccessTemplate {
    title: &'static str,
    toast: Option<Toast>,
}

async fn find_registrant(registrar: Data<Registrar>, id: Option<String>) -> Option<Registration> {
    let id = RegistrationId(id?);

    // An unknown or unreadable registrant only changes the header
    blocking(registrar, move |registrar| registrar.find(&id))
        .await
        .ok()
        .flatten()
}

#[get("/upload")]
async fn upload_form(
    registrar: Data<Registrar>,
    query: Query<UploadQuery>,
) -> Result<Page, PageError> {
    let id = query.into_inner().id;
    let registrant = find_registrant(registrar, id.clone()).await;

    render(
        &UploadTemplate {
            header: header(registrant.as_ref()),
            id,
            toast: None,
        },
        StatusCode::OK,
    )
}

#[post("/upload")]
async fn upload_submit(
    registrar: Data<Registrar>,
    query: Query<UploadQuery>,
    payload: Multipart,
) -> Result<Page, PageError> {
    let id = query.into_inner().id;
    let registrant = find_registrant(registrar.clone(), id.clone()).await;

    let retry = |toast: Toast, status: StatusCode| {
        render(
            &UploadTemplate {
                header: header(registrant.as_ref()),
                id: id.clone(),
                toast: Some(toast),
            },
            status,
        )
    };

    let parts = match collect_parts(payload, MAX_UPLOAD_BYTES).await {
        Ok(parts) => parts,
        Err(PayloadError::TooLarge(limit)) => {
            log::warn!("Rejected upload over {} bytes", limit);
            return retry(Toast::error(UPLOAD_FAILED_MESSAGE), StatusCode::PAYLOAD_TOO_LARGE);
        }
        Err(PayloadError::Malformed(e)) => {
            log::warn!("Rejected malformed upload: {}", e);
            return retry(Toast::error(NO_FILE_MESSAGE), StatusCode::BAD_REQUEST);
        }
    };

    let selected = find(&parts, FILE_FIELD).map(|part| SelectedFile {
        file_name: part.file_name.clone().unwrap_or_default(),
        content_type: part.content_type.clone().unwrap_or_default(),
        bytes: part.bytes.clone(),
    });

    let form = match select_pdf(selected) {
        Ok(form) => form,
        Err(toast) => return retry(toast, StatusCode::BAD_REQUEST),
    };

    let Some(id) = id.clone() else {
        return retry(Toast::error(NO_FILE_MESSAGE), StatusCode::BAD_REQUEST);
    };

    let id = RegistrationId(id);

    match blocking(registrar, move |registrar| registrar.complete_upload(&id, &form)).await {
        Ok(_) => render(
            &UploadSuccessTemplate {
                title: UPLOAD_COMPLETE_TITLE,
                toast: Some(Toast::success(UPLOAD_SUCCESS_MESSAGE)),
            },
            StatusCode::OK,
        ),
        Err(e) => {
            log::error!("Upload failed: {}", e);

            let status = match e {
                RegistrarError::NotFound(_) => StatusCode::NOT_FOUND,
                _ => StatusCode::BAD_GATEWAY,
            };

            retry(Toast::error(UPLOAD_FAILED_MESSAGE), status)
        }
    }
}

#[derive(Template)]
#[template(path = "registered.html")]
struct RegisteredTemplate {
    listing: Listing,
    empty_state: &'static str,
    toast: Option<Toast>,
}

#[get("/registered")]
async fn registered(registrar: Data<Registrar>) -> Result<Page, PageError> {
    let listing = blocking(registrar, |registrar| registrar.listing())
        .await
        .map_err(|e| {
            log::error!("Unable to list registrations: {}", e);
            PageError::Unavailable
        })?;

    render(
        &RegisteredTemplate {
            listing,
            empty_state: EMPTY_STATE,
            toast: None,
        },
        StatusCode::OK,
    )
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(index)
        .service(register_form)
        .service(register_submit)
        .service(download_form)
        .service(upload_form)
        .service(upload_submit)
        .service(registered);
}
