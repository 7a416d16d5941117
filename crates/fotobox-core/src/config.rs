//! Configuration module
//!
//! Process-wide settings for the photo service: where files land on disk,
//! which extensions are accepted, the per-file and per-batch size caps, and
//! the width of the persist worker pool. Everything is read once at startup
//! from the environment and handed to components explicitly.

use std::env;
use std::path::PathBuf;

// Default limits, matching the phone camera-roll use case
const MAX_FILE_SIZE_MB: usize = 20;
const MAX_BATCH_SIZE_MB: usize = 2048;
const UPLOAD_WORKERS: usize = 4;
const DEFAULT_PORT: u16 = 4000;
const DEFAULT_STORAGE_DIR: &str = "uploads";
const DEFAULT_PUBLIC_BASE_URL: &str = "/photos";
const DEFAULT_ALLOWED_EXTENSIONS: &str = "jpg,jpeg,png,heic,heif";

/// Application configuration. Fixed at process start; never mutated at runtime.
#[derive(Clone, Debug)]
pub struct Config {
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub environment: String,
    /// Root directory where uploaded photos are stored.
    pub storage_dir: PathBuf,
    /// URL prefix under which stored photos are served.
    pub public_base_url: String,
    pub allowed_extensions: Vec<String>,
    pub max_file_size_bytes: usize,
    pub max_batch_size_bytes: usize,
    /// Width of the bounded worker pool for parallel file persists.
    pub upload_workers: usize,
}

impl Config {
    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let cors_origins_str = env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".to_string());
        let is_production =
            environment.to_lowercase() == "production" || environment.to_lowercase() == "prod";
        if is_production && cors_origins_str.trim() == "*" {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        let cors_origins: Vec<String> = cors_origins_str
            .split(',')
            .map(|s| s.trim().to_string())
            .collect();

        let max_file_size_mb = env::var("MAX_FILE_SIZE_MB")
            .unwrap_or_else(|_| MAX_FILE_SIZE_MB.to_string())
            .parse::<usize>()
            .unwrap_or(MAX_FILE_SIZE_MB);

        let max_batch_size_mb = env::var("MAX_BATCH_SIZE_MB")
            .unwrap_or_else(|_| MAX_BATCH_SIZE_MB.to_string())
            .parse::<usize>()
            .unwrap_or(MAX_BATCH_SIZE_MB);

        let allowed_extensions = env::var("ALLOWED_EXTENSIONS")
            .unwrap_or_else(|_| DEFAULT_ALLOWED_EXTENSIONS.to_string())
            .split(',')
            .map(|s| s.trim().trim_start_matches('.').to_lowercase())
            .filter(|s| !s.is_empty())
            .collect();

        let config = Config {
            server_port: env::var("PORT")
                .unwrap_or_else(|_| DEFAULT_PORT.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            cors_origins,
            environment,
            storage_dir: PathBuf::from(
                env::var("STORAGE_DIR").unwrap_or_else(|_| DEFAULT_STORAGE_DIR.to_string()),
            ),
            public_base_url: env::var("PUBLIC_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_PUBLIC_BASE_URL.to_string()),
            allowed_extensions,
            max_file_size_bytes: max_file_size_mb * 1024 * 1024,
            max_batch_size_bytes: max_batch_size_mb * 1024 * 1024,
            upload_workers: env::var("UPLOAD_WORKERS")
                .unwrap_or_else(|_| UPLOAD_WORKERS.to_string())
                .parse()
                .unwrap_or(UPLOAD_WORKERS),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.allowed_extensions.is_empty() {
            return Err(anyhow::anyhow!(
                "ALLOWED_EXTENSIONS must contain at least one extension"
            ));
        }

        if self.upload_workers == 0 {
            return Err(anyhow::anyhow!("UPLOAD_WORKERS must be at least 1"));
        }

        if self.max_file_size_bytes == 0 || self.max_batch_size_bytes == 0 {
            return Err(anyhow::anyhow!(
                "MAX_FILE_SIZE_MB and MAX_BATCH_SIZE_MB must be greater than zero"
            ));
        }

        if self.max_file_size_bytes > self.max_batch_size_bytes {
            return Err(anyhow::anyhow!(
                "MAX_FILE_SIZE_MB cannot exceed MAX_BATCH_SIZE_MB"
            ));
        }

        if self.storage_dir.as_os_str().is_empty() {
            return Err(anyhow::anyhow!("STORAGE_DIR must not be empty"));
        }

        // Stored photos are served under this prefix by the router.
        if !self.public_base_url.starts_with('/') || self.public_base_url.len() < 2 {
            return Err(anyhow::anyhow!(
                "PUBLIC_BASE_URL must be an absolute path like '/photos'"
            ));
        }

        Ok(())
    }
}
