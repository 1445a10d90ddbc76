//! Document downloads for the editing service.

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::response::Response;

use doctrack_core::error::AppError;

use crate::error::ApiError;

use crate::dto::request::DownloadQuery;
use crate::handlers::{addressable, attachment, authorize};
use crate::state::AppState;

/// GET /download?fileName=&useraddress=[&forcesave=true]
///
/// With `forcesave=true` the forcesave artifact is served when one
/// exists, otherwise the canonical file.
pub async fn download(
    State(state): State<AppState>,
    query: Result<Query<DownloadQuery>, QueryRejection>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    authorize(&state, &headers)?;
    let Query(query) = query.map_err(|e| AppError::validation(e.body_text()))?;
    let doc = addressable(query.document())?;

    let mut path = state.layout.storage_path(&doc);
    if query.forcesave {
        let artifact = state.layout.forcesave_path(&doc);
        if state.storage.exists(&artifact).await? {
            path = artifact;
        }
    }

    let data = state.storage.read_bytes(&path).await?;
    attachment(&doc.file_name, data).map_err(ApiError::from)
}
