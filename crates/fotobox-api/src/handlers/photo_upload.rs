use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use fotobox_core::models::UploadResponse;
use fotobox_core::AppError;

use crate::error::{ErrorResponse, HttpAppError};
use crate::services::upload::UploadCandidate;
use crate::state::AppState;

/// Multipart field name the browser form submits files under.
const FILE_FIELD: &str = "files";

/// Upload photos handler
///
/// Accepts one or more files in a single multipart request, validates the
/// whole batch before any write, then persists the files in parallel on the
/// bounded worker pool.
///
/// # Returns
/// `UploadResponse` listing the stored names/URLs and the accepted total
/// size. HTTP 201 when every file persisted; HTTP 200 when some persisted
/// and the rest are reported in `failed`.
///
/// # Errors
/// - `AppError::UnsupportedFormat` - Extension not in the allow-list
/// - `AppError::PayloadTooLarge` - Single file over the per-file cap
/// - `AppError::BatchTooLarge` - Batch total over the aggregate cap
/// - `AppError::Storage` - No file in the batch could be persisted
#[utoipa::path(
    post,
    path = "/api/v0/photos",
    tag = "photos",
    responses(
        (status = 201, description = "All photos stored", body = UploadResponse),
        (status = 200, description = "Batch completed with partial failures", body = UploadResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 413, description = "File or batch too large", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, multipart), fields(operation = "upload_photos"))]
pub async fn upload_photos(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Response, HttpAppError> {
    let candidates = collect_multipart_files(multipart).await?;

    let outcome = state
        .uploader
        .save_batch(candidates)
        .await
        .map_err(HttpAppError::from)?;

    if outcome.saved.is_empty() && !outcome.failed.is_empty() {
        return Err(HttpAppError(AppError::Storage(format!(
            "All {} files in the batch failed to persist",
            outcome.failed.len()
        ))));
    }

    let status = if outcome.failed.is_empty() {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };

    Ok((
        status,
        Json(UploadResponse {
            saved: outcome.saved,
            failed: outcome.failed,
            total_size: outcome.total_size,
        }),
    )
        .into_response())
}

/// Drain all file parts under the `files` field into upload candidates.
/// Non-file fields are ignored; a file part without a filename is rejected.
async fn collect_multipart_files(
    mut multipart: Multipart,
) -> Result<Vec<UploadCandidate>, HttpAppError> {
    let mut candidates = Vec::new();

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        HttpAppError(AppError::InvalidInput(format!(
            "Failed to read multipart: {}",
            e
        )))
    })? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let filename = field
            .file_name()
            .map(|s: &str| s.to_string())
            .ok_or_else(|| {
                HttpAppError(AppError::InvalidInput(
                    "File part is missing a filename".to_string(),
                ))
            })?;

        let bytes = field.bytes().await.map_err(|e| {
            HttpAppError(AppError::InvalidInput(format!(
                "Failed to read file data for {}: {}",
                filename, e
            )))
        })?;

        candidates.push(UploadCandidate { filename, bytes });
    }

    Ok(candidates)
}
