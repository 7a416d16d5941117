use bytes::Bytes;
use fotobox_core::models::{FailedSave, SavedFile};

/// One incoming file from a multipart request. Request-scoped.
#[derive(Debug, Clone)]
pub struct UploadCandidate {
    /// Client-supplied filename, untrusted.
    pub filename: String,
    /// Buffered file content; its length is the candidate's size.
    pub bytes: Bytes,
}

/// Aggregate result of one batch upload after all persist tasks completed.
#[derive(Debug)]
pub struct BatchOutcome {
    pub saved: Vec<SavedFile>,
    pub failed: Vec<FailedSave>,
    /// Total bytes accepted by validation for this batch.
    pub total_size: u64,
}
