//! Fotobox Core Library
//!
//! Shared foundation for the fotobox photo-upload service: configuration,
//! the unified application error type, and the domain models exchanged
//! between the storage layer and the HTTP API.

pub mod config;
pub mod error;
pub mod models;

pub use config::Config;
pub use error::{AppError, ErrorMetadata, LogLevel};
