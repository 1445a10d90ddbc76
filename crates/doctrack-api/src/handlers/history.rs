//! Version history endpoints.

use axum::Json;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::response::Response;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

use doctrack_core::error::AppError;

use crate::error::ApiError;
use doctrack_core::types::RevisionKey;
use doctrack_entity::document::{DocumentRef, VersionId};

use crate::dto::request::{HistoryFileQuery, VersionsQuery};
use crate::dto::response::VersionListResponse;
use crate::handlers::{addressable, attachment, authorize};
use crate::state::AppState;

/// GET /history?fileName=&useraddress=&ver=&file=
pub async fn history_file(
    State(state): State<AppState>,
    query: Result<Query<HistoryFileQuery>, QueryRejection>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    authorize(&state, &headers)?;
    let Query(query) = query.map_err(|e| AppError::validation(e.body_text()))?;
    let doc = addressable(query.document())?;
    if query.ver == 0 {
        return Err(AppError::validation("Versions are numbered from 1").into());
    }

    let data = state
        .history_reader
        .read_artifact(&doc, VersionId(query.ver), &query.file)
        .await?;
    attachment(&query.file, data).map_err(ApiError::from)
}

/// GET /history/versions?fileName=&useraddress=
pub async fn list_versions(
    State(state): State<AppState>,
    query: Result<Query<VersionsQuery>, QueryRejection>,
    headers: HeaderMap,
) -> Result<Json<VersionListResponse>, ApiError> {
    authorize(&state, &headers)?;
    let Query(query) = query.map_err(|e| AppError::validation(e.body_text()))?;
    let doc = addressable(query.document())?;

    let current = state.storage.metadata(&state.layout.storage_path(&doc)).await?;
    let modified = current.last_modified.unwrap_or_else(chrono::Utc::now);
    let key = RevisionKey::for_document(&doc.user_address, &download_uri(&state, &doc), modified);

    let versions = state.history_reader.list_versions(&doc).await?;
    let meta = state.history_reader.read_meta(&doc).await?;

    Ok(Json(VersionListResponse {
        file_name: doc.file_name.clone(),
        current_version: VersionId(versions.len() as u32).next().get(),
        key: key.into_string(),
        versions,
        meta,
    }))
}

/// Query values keep RFC 3986 unreserved characters as they are.
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

fn download_uri(state: &AppState, doc: &DocumentRef) -> String {
    download_uri_at(&state.config.storage.public_url, doc)
}

fn download_uri_at(public_url: &str, doc: &DocumentRef) -> String {
    format!(
        "{}/download?fileName={}&useraddress={}",
        public_url.trim_end_matches('/'),
        utf8_percent_encode(&doc.file_name, QUERY_VALUE),
        utf8_percent_encode(&doc.user_address, QUERY_VALUE)
    )
}
