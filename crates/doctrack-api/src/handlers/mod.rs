//! HTTP request handlers.

pub mod download;
pub mod health;
pub mod history;
pub mod track;

use axum::http::{HeaderMap, header};
use axum::response::Response;
use axum::body::Body;

use doctrack_core::error::AppError;
use doctrack_entity::document::DocumentRef;

use crate::state::AppState;

/// Rejects requests lacking a valid signature header when signing is on.
pub(crate) fn authorize(state: &AppState, headers: &HeaderMap) -> Result<(), AppError> {
    let value = headers
        .get(state.authenticator.header_name())
        .and_then(|v| v.to_str().ok());
    state.authenticator.authorize_header(value)
}

/// Rejects document references that cannot address a file.
pub(crate) fn addressable(doc: DocumentRef) -> Result<DocumentRef, AppError> {
    if doc.is_addressable() {
        Ok(doc)
    } else {
        Err(AppError::validation(format!(
            "'{doc}' does not address a document"
        )))
    }
}

/// Builds an attachment response for file content.
pub(crate) fn attachment(file_name: &str, data: bytes::Bytes) -> Result<Response, AppError> {
    Response::builder()
        .header(header::CONTENT_TYPE, content_type_for(file_name))
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", file_name.replace('"', "")),
        )
        .header(header::CONTENT_LENGTH, data.len())
        .body(Body::from(data))
        .map_err(|e| AppError::internal(format!("Failed to build response: {e}")))
}

fn content_type_for(file_name: &str) -> String {
    mime_guess::from_path(file_name)
        .first_or_octet_stream()
        .to_string()
}
