//! Callback endpoint of the document service.

use axum::Json;
use axum::extract::{Query, State};
use axum::extract::rejection::QueryRejection;
use axum::http::HeaderMap;
use bytes::Bytes;
use serde_json::Value;
use tracing::debug;

use doctrack_auth::SignedQuery;
use doctrack_core::error::AppError;

use crate::error::ApiError;
use doctrack_entity::callback::CallbackEvent;
use doctrack_entity::document::DocumentRef;
use doctrack_service::TrackResponse;

use crate::dto::request::TrackQuery;
use crate::handlers::addressable;
use crate::state::AppState;

/// POST /track?filename=&useraddress=
///
/// Everything is validated before any storage or network access. A
/// document address signed into the header token replaces the one in the
/// query string. Once the callback is accepted, the answer is always
/// `{"error": 0|1}`.
pub async fn track(
    State(state): State<AppState>,
    query: Result<Query<TrackQuery>, QueryRejection>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<TrackResponse>, ApiError> {
    let Query(query) = query.map_err(|e| AppError::validation(e.body_text()))?;

    let raw: Value = serde_json::from_slice(&body)
        .map_err(|e| AppError::validation(format!("Malformed callback body: {e}")))?;

    let header_value = headers
        .get(state.authenticator.header_name())
        .and_then(|v| v.to_str().ok());
    let trusted = state.authenticator.authenticate(raw, header_value)?;

    let doc = match &trusted.query {
        Some(signed) => signed_document(query.document(), signed),
        None => query.document(),
    };
    let doc = addressable(doc)?;

    let event: CallbackEvent = serde_json::from_value(trusted.body)
        .map_err(|e| AppError::validation(format!("Malformed callback: {e}")))?;

    debug!(
        file_name = %doc.file_name,
        user_address = %doc.user_address,
        status = event.status.as_str(),
        "Callback received"
    );

    Ok(Json(state.track_service.handle(&doc, &event).await))
}

fn signed_document(doc: DocumentRef, signed: &SignedQuery) -> DocumentRef {
    let user_address = signed.useraddress.clone().unwrap_or(doc.user_address);
    let file_name = signed.filename.as_deref().unwrap_or(&doc.file_name);
    DocumentRef::new(file_name, user_address)
}
