//! Application state shared across handlers.

use std::sync::Arc;

use fotobox_core::Config;
use fotobox_storage::LocalStore;

use crate::services::upload::UploadService;

/// Everything a request handler needs: the startup configuration, the local
/// photo store, and the batch upload orchestrator built on top of it.
pub struct AppState {
    pub config: Config,
    pub store: Arc<LocalStore>,
    pub uploader: UploadService,
}
