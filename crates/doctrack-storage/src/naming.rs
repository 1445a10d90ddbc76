//! Conflict-free document names.

use doctrack_core::error::AppError;
use doctrack_core::result::AppResult;
use doctrack_core::traits::StorageProvider;
use doctrack_entity::document::DocumentRef;

use crate::layout::StorageLayout;

/// Upper bound on suffixes tried before giving up.
const MAX_SUFFIX: u32 = 10_000;

/// Returns `desired.file_name` if no document of that name exists in the
/// user's area, otherwise the first free `"<stem> (<n>).<ext>"`.
pub async fn correct_name(
    storage: &dyn StorageProvider,
    layout: &StorageLayout,
    desired: &DocumentRef,
) -> AppResult<String> {
    if !storage.exists(&layout.storage_path(desired)).await? {
        return Ok(desired.file_name.clone());
    }

    let stem = desired.stem();
    let ext = desired.extension();
    for n in 1..=MAX_SUFFIX {
        let candidate = if ext.is_empty() {
            format!("{stem} ({n})")
        } else {
            format!("{stem} ({n}).{ext}")
        };
        let candidate_doc = desired.sibling(&candidate);
        if !storage.exists(&layout.storage_path(&candidate_doc)).await? {
            return Ok(candidate);
        }
    }

    Err(AppError::conflict(format!(
        "No free name left for '{}'",
        desired.file_name
    )))
}
