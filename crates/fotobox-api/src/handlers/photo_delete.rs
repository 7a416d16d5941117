use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;

/// Delete one stored photo by name.
///
/// The name must be a bare filename; anything containing path separators or
/// parent-directory segments is rejected before the filesystem is touched.
#[utoipa::path(
    delete,
    path = "/api/v0/photos/{filename}",
    tag = "photos",
    params(
        ("filename" = String, Path, description = "Stored file name")
    ),
    responses(
        (status = 204, description = "Photo deleted successfully"),
        (status = 400, description = "Invalid file name", body = ErrorResponse),
        (status = 404, description = "Photo not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(filename = %filename, operation = "delete_photo"))]
pub async fn delete_photo(
    Path(filename): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpAppError> {
    state
        .store
        .delete(&filename)
        .await
        .map_err(HttpAppError::from)?;

    Ok(StatusCode::NO_CONTENT)
}
