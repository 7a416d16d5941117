//! OpenAPI documentation.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use fotobox_core::models;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Fotobox API",
        version = "0.1.0",
        description = "Minimal photo-upload service: multi-file uploads stored on local disk under collision-avoiding names, with a gallery listing and per-file delete. All endpoints are versioned under /api/v0/."
    ),
    paths(
        handlers::photo_upload::upload_photos,
        handlers::gallery::list_photos,
        handlers::photo_delete::delete_photo,
    ),
    components(schemas(
        models::SavedFile,
        models::FailedSave,
        models::GalleryEntry,
        models::UploadResponse,
        models::GalleryResponse,
        error::ErrorResponse,
    )),
    tags(
        (name = "photos", description = "Photo upload, gallery, and delete operations")
    )
)]
pub struct ApiDoc;
