//! Application setup and initialization
//!
//! This module contains all application initialization logic extracted from main.rs
//! for better organization and testability.

pub mod routes;
pub mod server;

use std::sync::Arc;

use anyhow::{Context, Result};
use fotobox_core::Config;
use fotobox_storage::LocalStore;

use crate::services::upload::{BatchValidator, UploadService};
use crate::state::AppState;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    // Validate configuration first - fail fast on misconfiguration
    config
        .validate()
        .context("Configuration validation failed")?;

    // Initialize telemetry first
    crate::telemetry::init_telemetry()
        .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    tracing::info!("Configuration loaded and validated successfully");

    let state = build_state(&config).await?;
    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}

/// Build the application state: local store plus upload orchestrator.
/// Split out from [initialize_app] so tests can construct the app without
/// touching global telemetry.
pub async fn build_state(config: &Config) -> Result<Arc<AppState>> {
    let store = Arc::new(
        LocalStore::new(
            config.storage_dir.clone(),
            config.public_base_url.clone(),
            config.allowed_extensions.clone(),
        )
        .await
        .context("Failed to initialize photo store")?,
    );

    let validator = BatchValidator::new(
        config.max_file_size_bytes,
        config.max_batch_size_bytes,
        config.allowed_extensions.clone(),
    );
    let uploader = UploadService::new(store.clone(), validator, config.upload_workers);

    Ok(Arc::new(AppState {
        config: config.clone(),
        store,
        uploader,
    }))
}
