//! Fotobox API Library
//!
//! This crate provides the HTTP API handlers, upload orchestration, and
//! application setup for the photo service.

// Module declarations
mod api_doc;
mod handlers;
mod services;
mod telemetry;

// Public modules
pub mod error;
pub mod setup;
pub mod state;

// Re-exports
pub use error::ErrorResponse;
pub use services::upload::{BatchOutcome, BatchValidator, UploadCandidate, UploadService, ValidationError};
