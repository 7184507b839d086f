use actix_multipart::Multipart;
use futures_util::TryStreamExt;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum PayloadError {
    #[error("Upload exceeds the {0} byte limit")]
    TooLarge(usize),

    #[error("Invalid multipart body: {0}")]
    Malformed(String),
}

/// One part of a multipart body, read fully into memory
#[derive(Debug, Clone, PartialEq)]
pub struct Part {
    pub name: String,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl Part {
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.bytes).trim().to_string()
    }
}

/// Reads every part of the body. `limit` caps the total size across parts.
pub async fn collect_parts(mut payload: Multipart, limit: usize) -> Result<Vec<Part>, PayloadError> {
    let mut parts = vec![];
    let mut total = 0usize;

    while let Some(mut field) = payload
        .try_next()
        .await
        .map_err(|e| PayloadError::Malformed(e.to_string()))?
    {
        let disposition = field.content_disposition();

        let name = disposition.get_name().unwrap_or_default().to_string();
        let file_name = disposition.get_filename().map(str::to_string);
        let content_type = field.content_type().map(|mime| mime.to_string());

        let mut bytes = vec![];

        while let Some(chunk) = field
            .try_next()
            .await
            .map_err(|e| PayloadError::Malformed(e.to_string()))?
        {
            total += chunk.len();

            if total > limit {
                return Err(PayloadError::TooLarge(limit));
            }

            bytes.extend_from_slice(&chunk);
        }

        parts.push(Part {
            name,
            file_name,
            content_type,
            bytes,
        });
    }

    Ok(parts)
}

pub fn find<'a>(parts: &'a [Part], name: &str) -> Option<&'a Part> {
    parts.iter().find(|part| part.name == name)
}
