use thiserror::Error;

use crate::consts::consts::PDF_MIME_TYPE;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum UploadError {
    #[error("Only PDF files are accepted, got: {0}")]
    NotPdf(String),

    #[error("Uploaded file is empty")]
    Empty,
}

/// A signed registration form received from the registrant
#[derive(Clone, Debug, PartialEq)]
pub struct UploadedForm {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl UploadedForm {
    pub fn new(file_name: String, content_type: &str, bytes: Vec<u8>) -> Result<Self, UploadError> {
        // Parameters such as `; charset=binary` are not part of the MIME type
        let essence = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        if essence != PDF_MIME_TYPE {
            return Err(UploadError::NotPdf(content_type.to_string()));
        }

        if bytes.is_empty() {
            return Err(UploadError::Empty);
        }

        Ok(UploadedForm {
            file_name,
            content_type: PDF_MIME_TYPE.to_string(),
            bytes,
        })
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    pub fn new_test() -> Self {
        UploadedForm {
            file_name: "HopeRise_Registration_Jane_Doe.pdf".to_string(),
            content_type: PDF_MIME_TYPE.to_string(),
            bytes: b"%PDF-1.3 test".to_vec(),
        }
    }
}
