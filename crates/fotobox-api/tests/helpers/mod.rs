//! Shared fixtures for API integration tests.

use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use axum_test::multipart::Part;
use axum_test::TestServer;
use fotobox_core::Config;
use tempfile::TempDir;

/// A test server backed by a throwaway storage directory.
pub struct TestApp {
    pub server: TestServer,
    storage: TempDir,
}

impl TestApp {
    pub fn storage_path(&self) -> &Path {
        self.storage.path()
    }
}

/// Small caps so limit tests stay cheap: 1 MiB per file, 2 MiB per batch.
pub fn test_config(storage_dir: &Path) -> Config {
    Config {
        server_port: 0,
        cors_origins: vec!["*".to_string()],
        environment: "test".to_string(),
        storage_dir: PathBuf::from(storage_dir),
        public_base_url: "/photos".to_string(),
        allowed_extensions: vec![
            "jpg".to_string(),
            "jpeg".to_string(),
            "png".to_string(),
            "heic".to_string(),
            "heif".to_string(),
        ],
        max_file_size_bytes: 1024 * 1024,
        max_batch_size_bytes: 2 * 1024 * 1024,
        upload_workers: 4,
    }
}

pub async fn setup_test_app() -> TestApp {
    let storage = TempDir::new().expect("create temp storage dir");
    let config = test_config(storage.path());

    let state = fotobox_api::setup::build_state(&config)
        .await
        .expect("build app state");
    let router = fotobox_api::setup::routes::setup_routes(&config, state).expect("build router");

    TestApp {
        server: TestServer::new(router).expect("start test server"),
        storage,
    }
}

/// A multipart file part as a phone browser would send it.
pub fn photo_part(filename: &str, data: Vec<u8>) -> Part {
    Part::bytes(data)
        .file_name(filename.to_string())
        .mime_type("image/jpeg")
}

pub fn set_mtime(path: &Path, epoch_secs: u64) {
    let file = std::fs::File::options()
        .write(true)
        .open(path)
        .expect("open file for mtime update");
    file.set_modified(SystemTime::UNIX_EPOCH + Duration::from_secs(epoch_secs))
        .expect("set mtime");
}
