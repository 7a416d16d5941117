//! Domain models
//!
//! Result types produced by the storage layer and returned over the API.
//! The storage directory on disk is the single source of truth; none of
//! these are cached or persisted separately from the underlying files.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

/// A successfully persisted upload. Immutable once created.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SavedFile {
    /// Final basename, unique within the storage directory at creation time.
    pub name: String,
    /// Public URL the file is served under.
    pub url: String,
    /// Bytes written to disk.
    pub size: u64,
}

/// Per-file failure report for a persist that did not complete.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct FailedSave {
    /// Client-supplied filename of the candidate that failed.
    pub filename: String,
    pub reason: String,
}

/// One entry in the gallery listing, built fresh on every scan.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct GalleryEntry {
    pub name: String,
    pub url: String,
    /// Size in bytes.
    pub size: u64,
    /// Modification time, serialized as seconds since the Unix epoch.
    #[serde(with = "chrono::serde::ts_seconds")]
    #[schema(value_type = i64)]
    pub modified: DateTime<Utc>,
}

/// Response body for a batch upload request.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UploadResponse {
    pub saved: Vec<SavedFile>,
    /// Files that passed validation but failed to persist. Empty on full success.
    pub failed: Vec<FailedSave>,
    /// Total bytes accepted by validation for this batch.
    pub total_size: u64,
}

/// Response body for the gallery listing, newest first.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct GalleryResponse {
    pub photos: Vec<GalleryEntry>,
    pub count: usize,
}
