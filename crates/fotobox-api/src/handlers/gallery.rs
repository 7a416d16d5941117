use std::sync::Arc;

use axum::{extract::State, response::IntoResponse, Json};
use fotobox_core::models::GalleryResponse;

use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;

/// Gallery listing handler. Scans the storage directory on every call; the
/// full set is returned, newest first.
#[utoipa::path(
    get,
    path = "/api/v0/photos",
    tag = "photos",
    responses(
        (status = 200, description = "Gallery listing, newest first", body = GalleryResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(operation = "list_photos"))]
pub async fn list_photos(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpAppError> {
    let photos = state.store.list().await.map_err(HttpAppError::from)?;
    let count = photos.len();

    Ok(Json(GalleryResponse { photos, count }))
}
