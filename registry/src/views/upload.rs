use crate::model::{
    registration::Registration,
    upload::{UploadError, UploadedForm},
};

use super::toast::Toast;

pub const NO_FILE_MESSAGE: &str = "Please select a PDF file to upload.";
pub const NOT_PDF_MESSAGE: &str = "Please upload a PDF file.";
pub const UPLOAD_FAILED_MESSAGE: &str = "Upload failed. Please try again.";
pub const UPLOAD_SUCCESS_MESSAGE: &str = "Form uploaded successfully!";
pub const UPLOAD_COMPLETE_TITLE: &str = "Upload Complete!";

const UNKNOWN_REGISTRANT_HEADER: &str =
    "Upload your downloaded registration form to complete the process.";

pub fn header(registrant: Option<&Registration>) -> String {
    match registrant {
        Some(registrant) => format!(
            "Upload the downloaded PDF for {}",
            registrant.display_name()
        ),
        None => UNKNOWN_REGISTRANT_HEADER.to_string(),
    }
}

/// A file picked in the upload view, before it reaches the relay
pub struct SelectedFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Turns the picked file into a form the registrar accepts, or the toast to show instead
pub fn select_pdf(file: Option<SelectedFile>) -> Result<UploadedForm, Toast> {
    let file = match file {
        // An empty file input still submits a part with no name and no bytes
        Some(file) if !(file.file_name.is_empty() && file.bytes.is_empty()) => file,
        _ => return Err(Toast::error(NO_FILE_MESSAGE)),
    };

    UploadedForm::new(file.file_name, &file.content_type, file.bytes).map_err(|e| match e {
        UploadError::NotPdf(_) => Toast::error(NOT_PDF_MESSAGE),
        UploadError::Empty => Toast::error(NO_FILE_MESSAGE),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pdf() -> SelectedFile {
        SelectedFile {
            file_name: "form.pdf".to_string(),
            content_type: "application/pdf".to_string(),
            bytes: b"%PDF-1.3".to_vec(),
        }
    }

    #[test]
    fn header_names_a_known_registrant() {
        assert_eq!(
            header(Some(&Registration::new_test())),
            "Upload the downloaded PDF for Jane Doe"
        );
        assert_eq!(header(None), UNKNOWN_REGISTRANT_HEADER);
    }

    #[test]
    fn pdf_is_selected() {
        let form = select_pdf(Some(pdf())).expect("should accept a pdf");

        assert_eq!(form.file_name, "form.pdf");
    }

    #[test]
    fn missing_file_asks_for_one() {
        assert_eq!(select_pdf(None).err(), Some(Toast::error(NO_FILE_MESSAGE)));

        let blank = SelectedFile {
            file_name: String::new(),
            content_type: "application/octet-stream".to_string(),
            bytes: vec![],
        };

        assert_eq!(
            select_pdf(Some(blank)).err(),
            Some(Toast::error(NO_FILE_MESSAGE))
        );
    }

    #[test]
    fn other_types_are_refused() {
        let mut image = pdf();
        image.file_name = "photo.png".to_string();
        image.content_type = "image/png".to_string();

        assert_eq!(
            select_pdf(Some(image)).err(),
            Some(Toast::error(NOT_PDF_MESSAGE))
        );
    }
}
